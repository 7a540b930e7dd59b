//! Translation capability consumed by the card builder.
//!
//! Every user-facing text of a card goes through an [`I18nTranslator`] once,
//! when the node holding it is constructed. Serializers never translate.

use crate::errors::TranslationError;
use std::collections::BTreeMap;

/// Turns a text template plus positional arguments into localized text.
pub trait I18nTranslator: Send + Sync {
    fn translate(&self, text: &str, args: &[&str]) -> Result<String, TranslationError>;
}

impl<F> I18nTranslator for F
where
    F: Fn(&str, &[&str]) -> Result<String, TranslationError> + Send + Sync,
{
    fn translate(&self, text: &str, args: &[&str]) -> Result<String, TranslationError> {
        self(text, args)
    }
}

/// Translator that keeps the template and only fills the `{n}` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTranslator;

impl I18nTranslator for PassthroughTranslator {
    fn translate(&self, text: &str, args: &[&str]) -> Result<String, TranslationError> {
        Ok(substitute(text, args))
    }
}

/// Translator backed by a template -> localized template table.
#[derive(Debug, Default, Clone)]
pub struct CatalogTranslator {
    entries: BTreeMap<String, String>,
    strict: bool,
}

impl CatalogTranslator {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries,
            strict: false,
        }
    }

    /// Parses a flat JSON object of `"template": "localized"` pairs.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<BTreeMap<String, String>>(raw).map(Self::new)
    }

    /// In strict mode a template without an entry is a [`TranslationError`]
    /// instead of being rendered as-is.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn insert(&mut self, template: impl Into<String>, localized: impl Into<String>) {
        self.entries.insert(template.into(), localized.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl I18nTranslator for CatalogTranslator {
    fn translate(&self, text: &str, args: &[&str]) -> Result<String, TranslationError> {
        match self.entries.get(text) {
            Some(localized) => Ok(substitute(localized, args)),
            None if self.strict => Err(TranslationError::new(text, "no catalog entry")),
            None => {
                tracing::debug!(template = text, "no catalog entry, keeping template");
                Ok(substitute(text, args))
            }
        }
    }
}

/// Replaces `{0}`, `{1}`, ... with the matching argument. Placeholders without
/// an argument are left untouched. The template is scanned once, so argument
/// text is copied verbatim even when it contains placeholders itself.
pub fn substitute(template: &str, args: &[&str]) -> String {
    if args.is_empty() {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        match placeholder(tail, args) {
            Some((arg, consumed)) => {
                out.push_str(arg);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolves `n}` at the start of `tail`, returning the argument and the
/// number of bytes the placeholder body takes.
fn placeholder<'a>(tail: &str, args: &[&'a str]) -> Option<(&'a str, usize)> {
    let close = tail.find('}')?;
    let digits = &tail[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = digits.parse().ok()?;
    args.get(index).map(|arg| (*arg, close + 1))
}
