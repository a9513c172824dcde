use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

use super::{Agent, App, Resolver};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(crate = "self::serde")]
pub struct Config {
    pub(super) app: App,
    pub(super) agent: Agent,

    #[serde(default)]
    pub(super) resolvers: Vec<Resolver>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn resolvers(&self) -> &[Resolver] {
        &self.resolvers
    }
}

impl ToValidate for Config {
    fn validate(&self) -> Result<(), CommonError> {
        _ = self.app.validate()?;
        _ = self.agent.validate()?;

        if self.resolvers.is_empty() {
            return Err(CommonError::ValidationError(
                "config: resolvers is empty".to_string(),
            ));
        }

        for (idx, resolver) in self.resolvers.iter().enumerate() {
            _ = resolver.validate()?;

            let duplicated = self.resolvers[..idx]
                .iter()
                .any(|other| other.chain_id == resolver.chain_id);

            if duplicated {
                return Err(CommonError::ValidationError(format!(
                    "config: resolvers:chain_id is duplicated: {}",
                    resolver.chain_id
                )));
            }
        }

        Ok(())
    }
}
