use rst_common::standard::serde::{self, Deserialize};

use prople_herald_core::comm::types::{MEDIA_TYPE_PLAIN_MESSAGE, MEDIA_TYPE_ZKP_MESSAGE};
use prople_herald_core::protocol::proposal::ProposalTemplate;

use crate::common::types::{CommonError, ToValidate};

pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 15 * 60;
pub const MAX_FRESHNESS_WINDOW_SECS: u64 = 24 * 60 * 60;

fn default_freshness_window_secs() -> u64 {
    DEFAULT_FRESHNESS_WINDOW_SECS
}

fn default_accept_media_types() -> Vec<String> {
    vec![MEDIA_TYPE_ZKP_MESSAGE.to_string()]
}

/// `Agent` configures the agent endpoint
///
/// The `proposal` section is optional, when it's missing the agent proposes the default
/// credential
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Agent {
    pub(super) verification_url: String,
    pub(super) verification_key_path: String,

    #[serde(default = "default_freshness_window_secs")]
    pub(super) freshness_window_secs: u64,

    #[serde(default = "default_accept_media_types")]
    pub(super) accept_media_types: Vec<String>,

    #[serde(default)]
    pub(super) proposal: Option<ProposalTemplate>,
}

impl Agent {
    pub fn get_verification_url(&self) -> String {
        self.verification_url.trim_end_matches('/').to_string()
    }

    pub fn get_verification_key_path(&self) -> String {
        self.verification_key_path.to_owned()
    }

    pub fn get_freshness_window_secs(&self) -> u64 {
        self.freshness_window_secs
    }

    pub fn get_accept_media_types(&self) -> Vec<String> {
        self.accept_media_types.to_owned()
    }

    pub fn get_proposal(&self) -> ProposalTemplate {
        self.proposal.to_owned().unwrap_or_default()
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            verification_url: "".to_string(),
            verification_key_path: "".to_string(),
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            accept_media_types: default_accept_media_types(),
            proposal: None,
        }
    }
}

impl ToValidate for Agent {
    fn validate(&self) -> Result<(), CommonError> {
        if self.verification_url.is_empty() {
            return Err(CommonError::ValidationError(
                "config: agent:verification_url is missing".to_string(),
            ));
        }

        if self.verification_key_path.is_empty() {
            return Err(CommonError::ValidationError(
                "config: agent:verification_key_path is missing".to_string(),
            ));
        }

        if self.freshness_window_secs == 0 {
            return Err(CommonError::ValidationError(
                "config: agent:freshness_window_secs should be greater than zero".to_string(),
            ));
        }

        if self.freshness_window_secs > MAX_FRESHNESS_WINDOW_SECS {
            return Err(CommonError::ValidationError(format!(
                "config: agent:freshness_window_secs should not exceed {}",
                MAX_FRESHNESS_WINDOW_SECS
            )));
        }

        if self.accept_media_types.is_empty() {
            return Err(CommonError::ValidationError(
                "config: agent:accept_media_types is empty".to_string(),
            ));
        }

        let unknown = self.accept_media_types.iter().find(|media_type| {
            media_type.as_str() != MEDIA_TYPE_PLAIN_MESSAGE
                && media_type.as_str() != MEDIA_TYPE_ZKP_MESSAGE
        });

        if let Some(media_type) = unknown {
            return Err(CommonError::ValidationError(format!(
                "config: agent:accept_media_types unknown media type: {}",
                media_type
            )));
        }

        if let Some(proposal) = &self.proposal {
            if proposal.credential_type.is_empty() || proposal.proposal_type.is_empty() {
                return Err(CommonError::ValidationError(
                    "config: agent:proposal types are missing".to_string(),
                ));
            }
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

    fn parse_fixture(name: &str) -> Result<Agent, ConfigError> {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("src/config/fixtures");

        let toml_file = format!("{}/{}", path.display(), name);
        Builder::new(from_file(toml_file)).fetch()?.parse(use_toml)
    }

    mod expect_success {
        use super::*;

        #[test]
        fn test_parse_agent_config() {
            let agent = parse_fixture("config_agent.toml").unwrap();

            assert_eq!(agent.get_verification_url(), "https://issuer.example.com");
            assert_eq!(agent.get_verification_key_path(), "./keys/authV2.json");
            assert_eq!(agent.get_freshness_window_secs(), 600);
            assert_eq!(
                agent.get_accept_media_types(),
                vec![MEDIA_TYPE_ZKP_MESSAGE.to_string()]
            );

            let proposal = agent.get_proposal();
            assert_eq!(proposal.credential_type, "KYCAgeCredential");
            assert_eq!(proposal.proposal_type, "kyc");
            assert!(helpers::validate(agent).is_ok());
        }

        #[test]
        fn test_parse_agent_config_defaults() {
            let agent = parse_fixture("config_agent_minimal.toml").unwrap();

            assert_eq!(agent.get_freshness_window_secs(), DEFAULT_FRESHNESS_WINDOW_SECS);
            assert_eq!(
                agent.get_accept_media_types(),
                vec![MEDIA_TYPE_ZKP_MESSAGE.to_string()]
            );
            assert_eq!(agent.get_proposal(), ProposalTemplate::default());
        }
    }

    mod expect_error {
        use super::*;

        #[test]
        fn test_freshness_window_too_large() {
            let mut agent = Agent::default();
            agent.verification_url = "https://issuer.example.com".to_string();
            agent.verification_key_path = "./keys/authV2.json".to_string();
            agent.freshness_window_secs = 100_000_000_000_000;

            let validation = helpers::validate(agent);
            assert!(validation
                .unwrap_err()
                .to_string()
                .contains("should not exceed"));
        }

        #[test]
        fn test_missing_verification_url() {
            let validation = helpers::validate(Agent::default());
            assert!(validation
                .unwrap_err()
                .to_string()
                .contains("agent:verification_url"));
        }

        #[test]
        fn test_unknown_media_type() {
            let mut agent = Agent::default();
            agent.verification_url = "https://issuer.example.com".to_string();
            agent.verification_key_path = "./keys/authV2.json".to_string();
            agent.accept_media_types = vec!["application/json".to_string()];

            let validation = helpers::validate(agent);
            assert!(matches!(
                validation,
                Err(CommonError::ValidationError(msg)) if msg.contains("application/json")
            ));
        }

        #[test]
        fn test_zero_freshness_window() {
            let mut agent = Agent::default();
            agent.verification_url = "https://issuer.example.com".to_string();
            agent.verification_key_path = "./keys/authV2.json".to_string();
            agent.freshness_window_secs = 0;

            let validation = helpers::validate(agent);
            assert!(validation
                .unwrap_err()
                .to_string()
                .contains("agent:freshness_window_secs"));
        }
    }
}
