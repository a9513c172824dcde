use rst_common::standard::serde::{self, Deserialize};

use prople_herald_core::comm::zkp::signals::NETWORKS;

use crate::common::types::{CommonError, ToValidate};

/// `Resolver` binds a chain id to the state resolver service answering for it
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Resolver {
    pub(super) chain_id: u64,
    pub(super) endpoint: String,
    pub(super) contract: String,
}

impl Resolver {
    pub fn get_chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn get_endpoint(&self) -> String {
        self.endpoint.trim_end_matches('/').to_string()
    }

    pub fn get_contract(&self) -> String {
        self.contract.to_owned()
    }
}

impl ToValidate for Resolver {
    fn validate(&self) -> Result<(), CommonError> {
        if !NETWORKS.iter().any(|network| network.chain_id == self.chain_id) {
            return Err(CommonError::ValidationError(format!(
                "config: resolvers:chain_id is unknown: {}",
                self.chain_id
            )));
        }

        if self.endpoint.is_empty() {
            return Err(CommonError::ValidationError(
                "config: resolvers:endpoint is missing".to_string(),
            ));
        }

        let is_address = self.contract.len() == 42
            && self.contract.starts_with("0x")
            && self.contract[2..].chars().all(|c| c.is_ascii_hexdigit());

        if !is_address {
            return Err(CommonError::ValidationError(format!(
                "config: resolvers:contract is not an address: {}",
                self.contract
            )));
        }

        Ok(())
    }
}
