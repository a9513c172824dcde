use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct App {
    pub(super) host: String,
    pub(super) port: String,

    #[serde(default = "default_body_limit")]
    pub(super) body_limit: usize,

    #[serde(default = "default_timeout_secs")]
    pub(super) timeout_secs: u64,
}

impl App {
    pub fn get_app_config(&self) -> (String, String) {
        (self.host.to_owned(), self.port.to_owned())
    }

    pub fn get_body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn get_timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: "8080".to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ToValidate for App {
    fn validate(&self) -> Result<(), CommonError> {
        if self.host.is_empty() {
            return Err(CommonError::ValidationError(
                "config: app:host is missing".to_string(),
            ));
        }

        if self.port.parse::<u16>().is_err() {
            return Err(CommonError::ValidationError(format!(
                "config: app:port is invalid: {}",
                self.port
            )));
        }

        if self.body_limit == 0 {
            return Err(CommonError::ValidationError(
                "config: app:body_limit should be greater than zero".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(CommonError::ValidationError(
                "config: app:timeout_secs should be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::env;
    use std::path::PathBuf;

    use rstdev_config::format::use_toml;
    use rstdev_config::parser::from_file;
    use rstdev_config::{types::ConfigError, Builder};

    use crate::common::helpers;

    #[test]
    fn test_parse_app_config() -> Result<(), ConfigError> {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("src/config/fixtures");

        let toml_file = format!("{}/config_app.toml", path.display());
        let config_toml = {
            let config_builder: Result<App, ConfigError> =
                Builder::new(from_file(toml_file)).fetch()?.parse(use_toml);

            config_builder
        };

        assert!(!config_toml.is_err());

        let config_app = config_toml.unwrap();
        assert_eq!(config_app.host, "localhost".to_string());
        assert_eq!(config_app.port, "8181".to_string());
        assert_eq!(config_app.get_body_limit(), DEFAULT_BODY_LIMIT);
        assert_eq!(config_app.get_timeout_secs(), 5);
        Ok(())
    }

    #[test]
    fn test_app_validation() {
        assert!(helpers::validate(App::default()).is_ok());

        let mut app = App::default();
        app.port = "http".to_string();
        let validation = helpers::validate(app);
        assert!(validation.unwrap_err().to_string().contains("app:port"));

        let mut app = App::default();
        app.body_limit = 0;
        let validation = helpers::validate(app);
        assert!(validation
            .unwrap_err()
            .to_string()
            .contains("app:body_limit"));
    }
}
