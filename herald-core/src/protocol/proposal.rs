use rst_common::standard::serde::{self, Deserialize, Serialize};
use rst_common::standard::serde_json;

use rstdev_domain::entity::ToJSON;
use rstdev_domain::BaseError;

pub const CREDENTIAL_PROPOSAL_MESSAGE_TYPE: &str =
    "https://iden3-communication.io/credentials/0.1/proposal";

pub const DEFAULT_CREDENTIAL_CONTEXT: &str =
    "https://raw.githubusercontent.com/anon-aadhaar/privado-contracts/main/assets/anon-aadhaar.jsonld";
pub const DEFAULT_CREDENTIAL_TYPE: &str = "AnonAadhaarCredential";
pub const DEFAULT_PROPOSAL_TYPE: &str = "anon-aadhaar";
pub const DEFAULT_PROPOSAL_DESCRIPTION: &str = "anon aadhaar credential";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct CredentialInfo {
    pub context: String,

    #[serde(rename = "type")]
    pub credential_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct CredentialProposalInfo {
    pub credentials: Vec<CredentialInfo>,

    #[serde(rename = "type")]
    pub proposal_type: String,

    pub url: String,
    pub description: String,
}

/// `CredentialsProposalBody` is the body of a credential proposal message, it tells the wallet
/// which credentials it can claim and where
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct CredentialsProposalBody {
    pub proposals: Vec<CredentialProposalInfo>,
}

impl CredentialsProposalBody {
    /// `build` proposes the default credential, see [`ProposalTemplate::default`]
    pub fn build(url: String) -> Self {
        ProposalTemplate::default().build(url)
    }
}

impl ToJSON for CredentialsProposalBody {
    fn to_json(&self) -> Result<String, BaseError> {
        let json_str =
            serde_json::to_string(&self).map_err(|err| BaseError::ToJSONError(err.to_string()))?;

        Ok(json_str)
    }
}

/// `ProposalTemplate` describes the single credential proposed by the agent
///
/// Building a proposal from a template never fails and doesn't validate the given url, it's
/// embedded as it is
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(crate = "self::serde")]
pub struct ProposalTemplate {
    pub context: String,
    pub credential_type: String,
    pub proposal_type: String,
    pub description: String,
}

impl ProposalTemplate {
    pub fn build(&self, url: String) -> CredentialsProposalBody {
        CredentialsProposalBody {
            proposals: vec![CredentialProposalInfo {
                credentials: vec![CredentialInfo {
                    context: self.context.to_owned(),
                    credential_type: self.credential_type.to_owned(),
                }],
                proposal_type: self.proposal_type.to_owned(),
                url,
                description: self.description.to_owned(),
            }],
        }
    }
}

impl Default for ProposalTemplate {
    fn default() -> Self {
        Self {
            context: DEFAULT_CREDENTIAL_CONTEXT.to_string(),
            credential_type: DEFAULT_CREDENTIAL_TYPE.to_string(),
            proposal_type: DEFAULT_PROPOSAL_TYPE.to_string(),
            description: DEFAULT_PROPOSAL_DESCRIPTION.to_string(),
        }
    }
}
