//! Connector configuration for the Hangouts Chat connector.
//!
//! This crate only describes and validates the parameters; loading the
//! credential and talking to the platform belong to the transport layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub const CONNECTOR_CONFIG_SCHEMA_VERSION: u32 = 1;
pub const CHAT_SCOPE: &str = "https://www.googleapis.com/auth/chat.bot";
pub const BOT_PROJECT_NUMBER_PARAMETER: &str = "botProjectNumber";
pub const SERVICE_CREDENTIAL_PATH_PARAMETER: &str = "serviceCredentialPath";
pub const SERVICE_CREDENTIAL_CONTENT_PARAMETER: &str = "serviceCredentialContent";

fn default_schema_version() -> u32 {
    CONNECTOR_CONFIG_SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Application id shown on the platform's bot configuration page.
    #[serde(default)]
    pub bot_project_number: String,
    #[serde(default)]
    pub service_credential_path: Option<PathBuf>,
    #[serde(default)]
    pub service_credential_content: Option<String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            schema_version: CONNECTOR_CONFIG_SCHEMA_VERSION,
            bot_project_number: String::new(),
            service_credential_path: None,
            service_credential_content: None,
        }
    }
}

/// Where the service account credential comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource<'a> {
    Path(&'a PathBuf),
    Content(&'a str),
}

impl ConnectorConfig {
    /// Reads the flat parameter map stored with a connector registration.
    /// Blank values count as absent.
    pub fn from_parameters(parameters: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            parameters
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Self {
            schema_version: CONNECTOR_CONFIG_SCHEMA_VERSION,
            bot_project_number: get(BOT_PROJECT_NUMBER_PARAMETER).unwrap_or_default(),
            service_credential_path: get(SERVICE_CREDENTIAL_PATH_PARAMETER).map(PathBuf::from),
            service_credential_content: get(SERVICE_CREDENTIAL_CONTENT_PARAMETER),
        }
    }

    pub fn validate(&self) -> Result<(), ConnectorConfigError> {
        if self.schema_version != CONNECTOR_CONFIG_SCHEMA_VERSION {
            return Err(ConnectorConfigError::UnsupportedSchemaVersion {
                expected: CONNECTOR_CONFIG_SCHEMA_VERSION,
                got: self.schema_version,
            });
        }
        if self.bot_project_number.trim().is_empty() {
            return Err(ConnectorConfigError::MissingBotProjectNumber);
        }
        self.credential_source().map(|_| ())
    }

    /// The credential path wins over inline content when both are set.
    pub fn credential_source(&self) -> Result<CredentialSource<'_>, ConnectorConfigError> {
        match (&self.service_credential_path, &self.service_credential_content) {
            (Some(path), _) => Ok(CredentialSource::Path(path)),
            (None, Some(content)) => Ok(CredentialSource::Content(content)),
            (None, None) => Err(ConnectorConfigError::MissingCredential),
        }
    }
}

/// Describes one connector parameter for admin forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurationField {
    pub label: String,
    pub key: String,
    pub mandatory: bool,
}

impl ConfigurationField {
    fn new(label: &str, key: &str, mandatory: bool) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            mandatory,
        }
    }
}

pub fn configuration_fields() -> Vec<ConfigurationField> {
    vec![
        ConfigurationField::new(
            "Bot project number (application ID in google hangouts configuration page)",
            BOT_PROJECT_NUMBER_PARAMETER,
            true,
        ),
        ConfigurationField::new(
            "Service account credential file path (default : /service-account-{connectorId}.json)",
            SERVICE_CREDENTIAL_PATH_PARAMETER,
            false,
        ),
        ConfigurationField::new(
            "Service account credential json content",
            SERVICE_CREDENTIAL_CONTENT_PARAMETER,
            false,
        ),
    ]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectorConfigError {
    #[error("unsupported schema version: expected {expected}, got {got}")]
    UnsupportedSchemaVersion { expected: u32, got: u32 },
    #[error("parameter botProjectNumber is missing")]
    MissingBotProjectNumber,
    #[error(
        "service credential missing: either serviceCredentialPath or serviceCredentialContent must be provided"
    )]
    MissingCredential,
}
