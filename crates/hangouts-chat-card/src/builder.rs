//! Card tree construction.
//!
//! Every entry point follows the same protocol: translate the text arguments,
//! construct the node, hand it to the caller's configuration step (when the
//! entry point takes one), then append it to its parent. Configuration steps
//! only ever see the node being built, never a half-built parent.
//!
//! ```
//! use hangouts_chat_card::{card, ClickAction, ImageStyle, PassthroughTranslator};
//!
//! let message = card(&PassthroughTranslator, |card| {
//!     card.header("Trip", None, None, ImageStyle::Avatar)?;
//!     card.section(None, |section| {
//!         section.text_paragraph("Hello")?;
//!         section.buttons(|buttons| {
//!             buttons.text_button("Book", |button| {
//!                 button.link("https://example.test");
//!                 Ok(())
//!             })?;
//!             Ok(())
//!         })?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })
//! .expect("card");
//! assert_eq!(message.card().sections().len(), 1);
//! ```

use crate::errors::CardError;
use crate::i18n::I18nTranslator;
use crate::icon::ChatIcon;
use crate::message::CardMessageOut;
use crate::model::{
    Button, ButtonAction, ButtonKind, Buttons, Card, Header, Image, ImageStyle, KeyValue,
    KeyValueIcon, Section, TextParagraph, Widget,
};
use std::collections::BTreeMap;

pub const ACTION_SEND_SENTENCE: &str = "SEND_SENTENCE";
pub const ACTION_SEND_CHOICE: &str = "SEND_CHOICE";
pub const TEXT_PARAMETER: &str = "TEXT";
pub const INTENT_PARAMETER: &str = "INTENT";

/// Builds a card message, running `init` against a fresh card.
pub fn card<F>(translator: &dyn I18nTranslator, init: F) -> Result<CardMessageOut, CardError>
where
    F: FnOnce(&mut CardBuilder<'_>) -> Result<(), CardError>,
{
    let mut builder = CardBuilder::new(translator);
    init(&mut builder)?;
    Ok(CardMessageOut::new(builder.build()))
}

/// Name of the intent a choice button points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Intent(String);

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Intent(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Extra parameters carried by a choice button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Parameters(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

fn translate(translator: &dyn I18nTranslator, text: &str) -> Result<String, CardError> {
    Ok(translator.translate(text, &[])?)
}

fn translate_opt(
    translator: &dyn I18nTranslator,
    text: Option<&str>,
) -> Result<Option<String>, CardError> {
    text.map(|text| translate(translator, text)).transpose()
}

pub struct CardBuilder<'t> {
    translator: &'t dyn I18nTranslator,
    card: Card,
}

impl<'t> CardBuilder<'t> {
    pub fn new(translator: &'t dyn I18nTranslator) -> Self {
        Self {
            translator,
            card: Card::default(),
        }
    }

    /// Sets the card header. A card has at most one header.
    pub fn header(
        &mut self,
        title: &str,
        subtitle: Option<&str>,
        image_url: Option<&str>,
        image_style: ImageStyle,
    ) -> Result<&Header, CardError> {
        if self.card.header.is_some() {
            return Err(CardError::DuplicateHeader);
        }
        let header = Header {
            title: translate(self.translator, title)?,
            subtitle: translate_opt(self.translator, subtitle)?,
            image_url: image_url.map(str::to_string),
            image_style,
        };
        let header: &Header = self.card.header.insert(header);
        Ok(header)
    }

    pub fn section<F>(&mut self, header: Option<&str>, init: F) -> Result<&Section, CardError>
    where
        F: FnOnce(&mut SectionBuilder<'t>) -> Result<(), CardError>,
    {
        let mut builder = SectionBuilder {
            translator: self.translator,
            section: Section {
                header: translate_opt(self.translator, header)?,
                widgets: Vec::new(),
            },
        };
        init(&mut builder)?;
        let index = self.card.sections.len();
        self.card.sections.push(builder.section);
        tracing::trace!(index, "section appended");
        Ok(&self.card.sections[index])
    }

    pub fn build(self) -> Card {
        self.card
    }
}

/// Optional fields of a key/value widget.
#[derive(Debug, Clone, Default)]
pub struct KeyValueFields<'a> {
    pub top_label: Option<&'a str>,
    pub content: &'a str,
    pub bottom_label: Option<&'a str>,
    pub content_multiline: bool,
    pub icon: Option<KeyValueIcon>,
}

impl<'a> KeyValueFields<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            ..Default::default()
        }
    }

    pub fn top_label(mut self, label: &'a str) -> Self {
        self.top_label = Some(label);
        self
    }

    pub fn bottom_label(mut self, label: &'a str) -> Self {
        self.bottom_label = Some(label);
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.content_multiline = multiline;
        self
    }

    pub fn icon(mut self, icon: ChatIcon) -> Self {
        self.icon = Some(KeyValueIcon::Catalog(icon));
        self
    }

    pub fn icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon = Some(KeyValueIcon::Url(url.into()));
        self
    }
}

pub struct SectionBuilder<'t> {
    translator: &'t dyn I18nTranslator,
    section: Section,
}

impl<'t> SectionBuilder<'t> {
    fn push(&mut self, widget: Widget) -> &Widget {
        let index = self.section.widgets.len();
        self.section.widgets.push(widget);
        tracing::trace!(index, "widget appended");
        &self.section.widgets[index]
    }

    pub fn text_paragraph(&mut self, text: &str) -> Result<&Widget, CardError> {
        let text = translate(self.translator, text)?;
        Ok(self.push(Widget::TextParagraph(TextParagraph { text })))
    }

    pub fn key_value(&mut self, fields: KeyValueFields<'_>) -> Result<&Widget, CardError> {
        let key_value = KeyValue {
            top_label: translate_opt(self.translator, fields.top_label)?,
            content: translate(self.translator, fields.content)?,
            bottom_label: translate_opt(self.translator, fields.bottom_label)?,
            content_multiline: fields.content_multiline,
            icon: fields.icon,
        };
        Ok(self.push(Widget::KeyValue(key_value)))
    }

    pub fn image<F>(&mut self, image_url: &str, init: F) -> Result<&Widget, CardError>
    where
        F: FnOnce(&mut ImageBuilder<'t>) -> Result<(), CardError>,
    {
        let mut builder = ImageBuilder {
            translator: self.translator,
            image: Image {
                image_url: image_url.to_string(),
                on_click: None,
            },
        };
        init(&mut builder)?;
        Ok(self.push(Widget::Image(builder.image)))
    }

    pub fn buttons<F>(&mut self, init: F) -> Result<&Widget, CardError>
    where
        F: FnOnce(&mut ButtonsBuilder<'t>) -> Result<(), CardError>,
    {
        let mut builder = ButtonsBuilder {
            translator: self.translator,
            buttons: Buttons::default(),
        };
        init(&mut builder)?;
        Ok(self.push(Widget::Buttons(builder.buttons)))
    }
}

pub struct ButtonsBuilder<'t> {
    translator: &'t dyn I18nTranslator,
    buttons: Buttons,
}

impl<'t> ButtonsBuilder<'t> {
    fn append<F>(&mut self, kind: ButtonKind, init: F) -> Result<&Button, CardError>
    where
        F: FnOnce(&mut ButtonBuilder<'t>) -> Result<(), CardError>,
    {
        let mut builder = ButtonBuilder {
            translator: self.translator,
            button: Button { kind, action: None },
        };
        init(&mut builder)?;
        self.buttons.buttons.push(builder.button);
        let index = self.buttons.buttons.len() - 1;
        Ok(&self.buttons.buttons[index])
    }

    pub fn text_button<F>(&mut self, text: &str, init: F) -> Result<&Button, CardError>
    where
        F: FnOnce(&mut ButtonBuilder<'t>) -> Result<(), CardError>,
    {
        let text = translate(self.translator, text)?;
        self.append(ButtonKind::Text(text), init)
    }

    /// Text button that sends its own label back as a user sentence.
    pub fn nlp_text_button(&mut self, text: &str) -> Result<&Button, CardError> {
        let label = translate(self.translator, text)?;
        let action = sentence_action(label.clone());
        self.append(ButtonKind::Text(label), |button| {
            button.set_action(action);
            Ok(())
        })
    }

    pub fn icon_button_url<F>(&mut self, icon_url: &str, init: F) -> Result<&Button, CardError>
    where
        F: FnOnce(&mut ButtonBuilder<'t>) -> Result<(), CardError>,
    {
        self.append(ButtonKind::IconExternal(icon_url.to_string()), init)
    }

    pub fn icon_button<F>(&mut self, icon: ChatIcon, init: F) -> Result<&Button, CardError>
    where
        F: FnOnce(&mut ButtonBuilder<'t>) -> Result<(), CardError>,
    {
        self.append(ButtonKind::IconEmbedded(icon), init)
    }
}

fn sentence_action(text: String) -> ButtonAction {
    ButtonAction::action(
        ACTION_SEND_SENTENCE,
        BTreeMap::from([(TEXT_PARAMETER.to_string(), text)]),
    )
}

/// Setters shared by everything that carries a click handler. Setting an
/// action twice keeps the last one.
pub trait ClickAction {
    fn translator(&self) -> &dyn I18nTranslator;

    fn set_action(&mut self, action: ButtonAction);

    fn link(&mut self, url: &str) {
        self.set_action(ButtonAction::link(url));
    }

    fn action(&mut self, action: &str, parameters: BTreeMap<String, String>) {
        self.set_action(ButtonAction::action(action, parameters));
    }

    /// Sends `text`, translated, back to the bot as if the user typed it.
    fn nlp_action(&mut self, text: &str) -> Result<(), CardError> {
        let text = translate(self.translator(), text)?;
        self.set_action(sentence_action(text));
        Ok(())
    }

    /// Routes the click to `intent`. Entries of `parameters` win over the
    /// intent entry on key collision.
    fn choice_action(&mut self, intent: &Intent, parameters: &Parameters) {
        let mut merged =
            BTreeMap::from([(INTENT_PARAMETER.to_string(), intent.name().to_string())]);
        merged.extend(
            parameters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        self.set_action(ButtonAction::action(ACTION_SEND_CHOICE, merged));
    }
}

pub struct ButtonBuilder<'t> {
    translator: &'t dyn I18nTranslator,
    button: Button,
}

impl ButtonBuilder<'_> {
    pub fn kind(&self) -> &ButtonKind {
        &self.button.kind
    }
}

impl ClickAction for ButtonBuilder<'_> {
    fn translator(&self) -> &dyn I18nTranslator {
        self.translator
    }

    fn set_action(&mut self, action: ButtonAction) {
        self.button.action = Some(action);
    }
}

pub struct ImageBuilder<'t> {
    translator: &'t dyn I18nTranslator,
    image: Image,
}

impl ClickAction for ImageBuilder<'_> {
    fn translator(&self) -> &dyn I18nTranslator {
        self.translator
    }

    fn set_action(&mut self, action: ButtonAction) {
        self.image.on_click = Some(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TranslationError;
    use crate::i18n::PassthroughTranslator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTranslator(AtomicUsize);

    impl I18nTranslator for CountingTranslator {
        fn translate(&self, text: &str, _args: &[&str]) -> Result<String, TranslationError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{text}]"))
        }
    }

    fn single_button(init: impl FnOnce(&mut ButtonBuilder<'_>) -> Result<(), CardError>) -> Button {
        let mut builder = CardBuilder::new(&PassthroughTranslator);
        builder
            .section(None, |section| {
                section.buttons(|buttons| {
                    buttons.text_button("Go", init)?;
                    Ok(())
                })?;
                Ok(())
            })
            .expect("section");
        let card = builder.build();
        match &card.sections()[0].widgets()[0] {
            Widget::Buttons(buttons) => buttons.buttons()[0].clone(),
            other => panic!("unexpected widget {other:?}"),
        }
    }

    #[test]
    fn children_keep_call_order() {
        let mut builder = CardBuilder::new(&PassthroughTranslator);
        builder
            .section(Some("first"), |section| {
                section.text_paragraph("a")?;
                section.image("https://img.test/b.png", |_| Ok(()))?;
                section.key_value(KeyValueFields::new("c"))?;
                Ok(())
            })
            .expect("first");
        builder.section(Some("second"), |_| Ok(())).expect("second");
        let card = builder.build();

        let headers: Vec<_> = card.sections().iter().map(|s| s.header.as_deref()).collect();
        assert_eq!(headers, vec![Some("first"), Some("second")]);
        let widgets = card.sections()[0].widgets();
        assert!(matches!(&widgets[0], Widget::TextParagraph(p) if p.text == "a"));
        assert!(matches!(&widgets[1], Widget::Image(i) if i.image_url == "https://img.test/b.png"));
        assert!(matches!(&widgets[2], Widget::KeyValue(kv) if kv.content == "c"));
    }

    #[test]
    fn every_text_field_is_translated_once() {
        let translator = CountingTranslator(AtomicUsize::new(0));
        let mut builder = CardBuilder::new(&translator);
        builder
            .header("Trip", Some("Tomorrow"), Some("https://img.test/h.png"), ImageStyle::Image)
            .expect("header");
        builder
            .section(Some("Details"), |section| {
                section.key_value(
                    KeyValueFields::new("Paris")
                        .top_label("From")
                        .bottom_label("Gare de Lyon"),
                )?;
                section.buttons(|buttons| {
                    buttons.nlp_text_button("Yes")?;
                    Ok(())
                })?;
                Ok(())
            })
            .expect("section");
        // title, subtitle, section header, three key/value labels, button label
        assert_eq!(translator.0.load(Ordering::SeqCst), 7);

        let card = builder.build();
        assert_eq!(card.header().map(|h| h.title.as_str()), Some("[Trip]"));
        assert_eq!(
            card.header().and_then(|h| h.image_url.as_deref()),
            Some("https://img.test/h.png")
        );
    }

    #[test]
    fn second_header_is_rejected() {
        let mut builder = CardBuilder::new(&PassthroughTranslator);
        builder.header("One", None, None, ImageStyle::Image).expect("first header");
        let err = builder
            .header("Two", None, None, ImageStyle::Avatar)
            .unwrap_err();
        assert_eq!(err, CardError::DuplicateHeader);
        assert_eq!(builder.build().header().map(|h| h.title.as_str()), Some("One"));
    }

    #[test]
    fn nlp_action_sends_translated_text() {
        let button = single_button(|button| button.nlp_action("Maybe {0}"));
        assert_eq!(
            button.action(),
            Some(&ButtonAction::action(
                ACTION_SEND_SENTENCE,
                BTreeMap::from([(TEXT_PARAMETER.to_string(), "Maybe {0}".to_string())]),
            ))
        );
    }

    #[test]
    fn nlp_text_button_reuses_its_label() {
        let translator = CountingTranslator(AtomicUsize::new(0));
        let mut builder = CardBuilder::new(&translator);
        builder
            .section(None, |section| {
                section.buttons(|buttons| {
                    let button = buttons.nlp_text_button("Yes")?;
                    assert_eq!(button.kind, ButtonKind::Text("[Yes]".into()));
                    match button.action() {
                        Some(ButtonAction::Action { action, parameters }) => {
                            assert_eq!(action, ACTION_SEND_SENTENCE);
                            assert_eq!(parameters.len(), 1);
                            assert_eq!(parameters[TEXT_PARAMETER], "[Yes]");
                        }
                        other => panic!("unexpected action {other:?}"),
                    }
                    Ok(())
                })?;
                Ok(())
            })
            .expect("section");
        assert_eq!(translator.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn choice_action_merges_intent_and_parameters() {
        let parameters = Parameters::new().with("city", "Rome").with("day", "monday");
        let button = single_button(|button| {
            button.choice_action(&Intent::new("book_trip"), &parameters);
            Ok(())
        });
        match button.action() {
            Some(ButtonAction::Action { action, parameters }) => {
                assert_eq!(action, ACTION_SEND_CHOICE);
                assert_eq!(parameters.len(), 3);
                assert_eq!(parameters[INTENT_PARAMETER], "book_trip");
                assert_eq!(parameters["city"], "Rome");
                assert_eq!(parameters["day"], "monday");
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn caller_intent_parameter_overrides_the_intent_name() {
        let parameters = Parameters::new().with(INTENT_PARAMETER, "override");
        let button = single_button(|button| {
            button.choice_action(&Intent::new("book_trip"), &parameters);
            Ok(())
        });
        assert_eq!(
            button.action(),
            Some(&ButtonAction::action(
                ACTION_SEND_CHOICE,
                BTreeMap::from([(INTENT_PARAMETER.to_string(), "override".to_string())]),
            ))
        );
    }

    #[test]
    fn last_key_value_icon_setter_wins() {
        let fields = KeyValueFields::new("08:15")
            .icon(ChatIcon::Clock)
            .icon_url("https://img.test/clock.png");
        assert_eq!(
            fields.icon,
            Some(KeyValueIcon::Url("https://img.test/clock.png".into()))
        );

        let message = card(&PassthroughTranslator, |card| {
            card.section(None, |section| {
                section.key_value(fields)?;
                Ok(())
            })?;
            Ok(())
        })
        .expect("card");
        let wire = crate::serializer::to_card_message(message.card()).expect("wire");
        let wire = serde_json::to_value(wire).expect("json");
        let key_value = &wire["cards"][0]["sections"][0]["widgets"][0]["keyValue"];
        assert_eq!(key_value["iconUrl"], "https://img.test/clock.png");
        assert!(key_value.get("icon").is_none());
    }

    #[test]
    fn last_action_wins() {
        let button = single_button(|button| {
            button.link("https://first.test");
            button.link("https://second.test");
            Ok(())
        });
        assert_eq!(button.action(), Some(&ButtonAction::link("https://second.test")));
    }

    #[test]
    fn button_without_configuration_has_no_action() {
        let button = single_button(|_| Ok(()));
        assert_eq!(button.action(), None);
    }

    #[test]
    fn translation_failure_aborts_the_card() {
        let failing = |text: &str, _: &[&str]| -> Result<String, TranslationError> {
            Err(TranslationError::new(text, "catalog offline"))
        };
        let err = card(&failing, |card| {
            card.section(Some("Details"), |_| Ok(()))?;
            Ok(())
        })
        .unwrap_err();
        assert_eq!(
            err,
            CardError::Translation(TranslationError::new("Details", "catalog offline"))
        );
    }

    #[test]
    fn image_configuration_sets_on_click() {
        let mut builder = CardBuilder::new(&PassthroughTranslator);
        builder
            .section(None, |section| {
                section.image("https://img.test/map.png", |image| {
                    image.link("https://maps.test");
                    Ok(())
                })?;
                Ok(())
            })
            .expect("section");
        let card = builder.build();
        match &card.sections()[0].widgets()[0] {
            Widget::Image(image) => {
                assert_eq!(image.on_click(), Some(&ButtonAction::link("https://maps.test")))
            }
            other => panic!("unexpected widget {other:?}"),
        }
    }
}
