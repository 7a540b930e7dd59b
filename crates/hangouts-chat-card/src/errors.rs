use thiserror::Error;

/// Failure reported by an [`crate::I18nTranslator`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot translate `{text}`: {reason}")]
pub struct TranslationError {
    pub text: String,
    pub reason: String,
}

impl TranslationError {
    pub fn new(text: impl Into<String>, reason: impl Into<String>) -> Self {
        TranslationError {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or serializing a card.
///
/// None of these are recoverable at runtime: they point at a card that was
/// built incorrectly, and the send attempt for that card has to be aborted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("button {button} at {path} has no action")]
    MissingButtonAction { path: String, button: String },
    #[error("card already has a header")]
    DuplicateHeader,
    #[error(transparent)]
    Translation(#[from] TranslationError),
}

impl CardError {
    pub fn missing_button_action(path: impl Into<String>, button: impl Into<String>) -> Self {
        CardError::MissingButtonAction {
            path: path.into(),
            button: button.into(),
        }
    }
}
