//! Card messages for the Hangouts Chat connector.
//! A card is described once through [`builder`], then rendered on demand either
//! to the platform wire payload ([`serializer`]) or to the connector-agnostic
//! [`GenericMessage`] ([`generic`]).

pub mod builder;
pub mod errors;
pub mod generic;
pub mod i18n;
pub mod icon;
pub mod message;
pub mod model;
pub mod serializer;
pub mod wire;

pub use builder::{
    ACTION_SEND_CHOICE, ACTION_SEND_SENTENCE, ButtonBuilder, ButtonsBuilder, CardBuilder,
    ClickAction, INTENT_PARAMETER, ImageBuilder, Intent, KeyValueFields, Parameters,
    SectionBuilder, TEXT_PARAMETER, card,
};
pub use errors::{CardError, TranslationError};
pub use generic::{GenericElement, GenericMessage, project_card, project_text};
pub use i18n::{CatalogTranslator, I18nTranslator, PassthroughTranslator};
pub use icon::{ChatIcon, UnknownIcon};
pub use message::{
    CardMessageOut, ConnectorMessage, ConnectorType, HANGOUTS_CHAT_CONNECTOR_TYPE_ID,
    HangoutsChatMessage, TextMessageOut, text_message,
};
pub use model::{
    Button, ButtonAction, ButtonKind, Buttons, Card, Header, Image, ImageStyle, KeyValue,
    KeyValueIcon, Section, TextParagraph, Widget,
};
pub use serializer::to_card_message;
pub use wire::Message;
