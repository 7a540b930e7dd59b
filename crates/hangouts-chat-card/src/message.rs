use crate::errors::CardError;
use crate::generic::{GenericMessage, project_card, project_text};
use crate::i18n::I18nTranslator;
use crate::model::Card;
use crate::serializer::to_card_message;
use crate::wire::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HANGOUTS_CHAT_CONNECTOR_TYPE_ID: &str = "hangouts_chat";

/// Identifier of the connector a message is meant for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorType(String);

impl ConnectorType {
    pub fn new(id: impl Into<String>) -> Self {
        ConnectorType(id.into())
    }

    pub fn hangouts_chat() -> Self {
        ConnectorType::new(HANGOUTS_CHAT_CONNECTOR_TYPE_ID)
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message a connector knows how to send. Both projections are computed on
/// demand and never mutate the message.
pub trait ConnectorMessage {
    fn connector_type(&self) -> ConnectorType;

    fn to_message(&self) -> Result<Message, CardError>;

    fn to_generic_message(&self) -> Option<GenericMessage>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMessageOut {
    card: Card,
}

impl CardMessageOut {
    pub fn new(card: Card) -> Self {
        Self { card }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn into_card(self) -> Card {
        self.card
    }
}

impl ConnectorMessage for CardMessageOut {
    fn connector_type(&self) -> ConnectorType {
        ConnectorType::hangouts_chat()
    }

    fn to_message(&self) -> Result<Message, CardError> {
        to_card_message(&self.card)
    }

    fn to_generic_message(&self) -> Option<GenericMessage> {
        Some(project_card(&self.card, Some(self.connector_type())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessageOut {
    text: String,
}

impl TextMessageOut {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl ConnectorMessage for TextMessageOut {
    fn connector_type(&self) -> ConnectorType {
        ConnectorType::hangouts_chat()
    }

    fn to_message(&self) -> Result<Message, CardError> {
        Ok(Message {
            text: Some(self.text.clone()),
            cards: Vec::new(),
        })
    }

    fn to_generic_message(&self) -> Option<GenericMessage> {
        Some(project_text(&self.text, Some(self.connector_type())))
    }
}

/// Builds a text message, translating `template` with `args`.
pub fn text_message(
    translator: &dyn I18nTranslator,
    template: &str,
    args: &[&str],
) -> Result<TextMessageOut, CardError> {
    Ok(TextMessageOut::new(translator.translate(template, args)?))
}

/// Any outbound message of this connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HangoutsChatMessage {
    Text(TextMessageOut),
    Card(CardMessageOut),
}

impl From<TextMessageOut> for HangoutsChatMessage {
    fn from(message: TextMessageOut) -> Self {
        HangoutsChatMessage::Text(message)
    }
}

impl From<CardMessageOut> for HangoutsChatMessage {
    fn from(message: CardMessageOut) -> Self {
        HangoutsChatMessage::Card(message)
    }
}

impl ConnectorMessage for HangoutsChatMessage {
    fn connector_type(&self) -> ConnectorType {
        match self {
            HangoutsChatMessage::Text(message) => message.connector_type(),
            HangoutsChatMessage::Card(message) => message.connector_type(),
        }
    }

    fn to_message(&self) -> Result<Message, CardError> {
        match self {
            HangoutsChatMessage::Text(message) => message.to_message(),
            HangoutsChatMessage::Card(message) => message.to_message(),
        }
    }

    fn to_generic_message(&self) -> Option<GenericMessage> {
        match self {
            HangoutsChatMessage::Text(message) => message.to_generic_message(),
            HangoutsChatMessage::Card(message) => message.to_generic_message(),
        }
    }
}
