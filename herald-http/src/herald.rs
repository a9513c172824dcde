use std::fs;
use std::sync::Arc;
use std::time::Duration;

use rst_common::with_logging::log::info;

use prople_herald_core::agent::Agent;
use prople_herald_core::comm::manager::PackageManager;
use prople_herald_core::comm::plain::PlainPacker;
use prople_herald_core::comm::types::Packer;
use prople_herald_core::comm::zkp::context::VerificationContext;
use prople_herald_core::comm::zkp::packer::ZKPPacker;

use crate::common::helpers;
use crate::common::types::CommonError;
use crate::config::{App, Config, Parser};
use crate::http::AgentState;
use crate::resolver::HttpResolver;
use crate::verifier::Groth16Verifier;

/// `HeraldHTTP` builds the agent endpoint components from a configuration file
pub struct HeraldHTTP {
    config: Config,
}

impl HeraldHTTP {
    pub fn new(conf_file: &str) -> Result<Self, CommonError> {
        let config = Parser::new(conf_file.to_string())
            .parse()
            .map_err(|err| CommonError::ConfigError(err.to_string()))?;

        helpers::validate(config.clone())?;
        Ok(Self { config })
    }

    pub fn build_app_config(&self) -> App {
        self.config.app().to_owned()
    }

    pub fn build_context(&self) -> Result<VerificationContext, CommonError> {
        let agent = self.config.agent();
        let key_path = agent.get_verification_key_path();
        let verification_key = fs::read(&key_path)
            .map_err(|err| CommonError::BuildError(format!("{}: {}", key_path, err)))?;

        let verifier = Groth16Verifier::new(&verification_key)
            .map_err(|err| CommonError::BuildError(err.to_string()))?;

        let context = self.config.resolvers().iter().fold(
            VerificationContext::new(verification_key, Arc::new(verifier)),
            |context, resolver| {
                context.with_resolver(
                    resolver.get_chain_id(),
                    Arc::new(HttpResolver::new(
                        resolver.get_endpoint(),
                        resolver.get_contract(),
                    )),
                )
            },
        );

        Ok(context.with_freshness_window(Duration::from_secs(agent.get_freshness_window_secs())))
    }

    pub fn build_agent(&self) -> Result<Agent, CommonError> {
        let context = self.build_context()?;
        let packers: Vec<Box<dyn Packer>> = vec![
            Box::new(PlainPacker::new()),
            Box::new(ZKPPacker::new(context)),
        ];

        let mut manager = PackageManager::new();
        manager
            .register_packers(packers)
            .map_err(|err| CommonError::BuildError(err.to_string()))?;

        let agent_config = self.config.agent();
        info!(
            "[herald:build_agent] accepted media types: {:?}",
            agent_config.get_accept_media_types()
        );

        let agent = Agent::new(Arc::new(manager), agent_config.get_verification_url())
            .with_proposal(agent_config.get_proposal())
            .with_accept_media_types(agent_config.get_accept_media_types());

        Ok(agent)
    }

    pub fn build_state(&self) -> Result<AgentState<Agent>, CommonError> {
        let agent = self.build_agent()?;
        Ok(AgentState::new(
            Arc::new(agent),
            self.config.app().get_body_limit(),
        ))
    }
}
