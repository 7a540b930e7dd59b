use crate::message::ConnectorType;
use crate::model::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connector-agnostic view of an outbound message, used by consumers that do
/// not understand cards (logs, analytics, fallback rendering).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<ConnectorType>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub texts: BTreeMap<String, String>,
    #[serde(default)]
    pub sub_elements: Vec<GenericElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericElement {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub texts: BTreeMap<String, String>,
}

/// Skeleton projection of a card: one empty element per section and nothing
/// for the header. Widgets are not looked at.
pub fn project_card(card: &Card, connector_type: Option<ConnectorType>) -> GenericMessage {
    GenericMessage {
        connector_type,
        texts: BTreeMap::new(),
        sub_elements: card
            .sections()
            .iter()
            .map(|_| GenericElement::default())
            .collect(),
    }
}

/// Projection of a plain text message: the text under the `text` key.
pub fn project_text(text: &str, connector_type: Option<ConnectorType>) -> GenericMessage {
    GenericMessage {
        connector_type,
        texts: BTreeMap::from([("text".to_string(), text.to_string())]),
        sub_elements: Vec::new(),
    }
}
