//! Declarative card files (JSON or YAML).
//!
//! A card file is replayed through the card builder, so its texts are
//! translated exactly like cards written in code.

use hangouts_chat_card::{
    ButtonsBuilder, CardBuilder, CardError, CardMessageOut, ChatIcon, ClickAction,
    I18nTranslator, ImageStyle, Intent, KeyValueFields, Parameters, SectionBuilder, card,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardFile {
    #[serde(default)]
    pub header: Option<HeaderDoc>,
    #[serde(default)]
    pub sections: Vec<SectionDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderDoc {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_style: StyleDoc,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleDoc {
    #[default]
    Image,
    Avatar,
}

impl From<StyleDoc> for ImageStyle {
    fn from(style: StyleDoc) -> Self {
        match style {
            StyleDoc::Image => ImageStyle::Image,
            StyleDoc::Avatar => ImageStyle::Avatar,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDoc {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub widgets: Vec<WidgetDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum WidgetDoc {
    TextParagraph(String),
    KeyValue(KeyValueDoc),
    Image {
        url: String,
        #[serde(default)]
        on_click: Option<ClickDoc>,
    },
    Buttons(Vec<ButtonDoc>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyValueDoc {
    #[serde(default)]
    pub top_label: Option<String>,
    pub content: String,
    #[serde(default)]
    pub bottom_label: Option<String>,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default)]
    pub icon: Option<ChatIcon>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ButtonDoc {
    Text {
        label: String,
        #[serde(default)]
        on_click: Option<ClickDoc>,
    },
    IconUrl {
        url: String,
        #[serde(default)]
        on_click: Option<ClickDoc>,
    },
    Icon {
        icon: ChatIcon,
        #[serde(default)]
        on_click: Option<ClickDoc>,
    },
    NlpText(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ClickDoc {
    Link(String),
    Action {
        name: String,
        #[serde(default)]
        parameters: BTreeMap<String, String>,
    },
    Nlp(String),
    Choice {
        intent: String,
        #[serde(default)]
        parameters: BTreeMap<String, String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CardFileError {
    #[error("key/value `{0}` sets both icon and icon_url")]
    ConflictingIcons(String),
    #[error("invalid JSON card: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML card: {0}")]
    Yaml(#[from] serde_yaml_bw::Error),
    #[error(transparent)]
    Card(#[from] CardError),
}

impl CardFile {
    /// Parses a card file, picking YAML for `.yaml`/`.yml` paths and JSON otherwise.
    pub fn parse(raw: &str, path: Option<&Path>) -> Result<Self, CardFileError> {
        let is_yaml = path
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "yaml" | "yml"));
        if is_yaml {
            Ok(serde_yaml_bw::from_str(raw)?)
        } else {
            Ok(serde_json::from_str(raw)?)
        }
    }

    pub fn build(&self, translator: &dyn I18nTranslator) -> Result<CardMessageOut, CardFileError> {
        for section in &self.sections {
            for widget in &section.widgets {
                if let WidgetDoc::KeyValue(kv) = widget {
                    if kv.icon.is_some() && kv.icon_url.is_some() {
                        return Err(CardFileError::ConflictingIcons(kv.content.clone()));
                    }
                }
            }
        }
        Ok(card(translator, |builder| self.fill(builder))?)
    }

    fn fill(&self, builder: &mut CardBuilder<'_>) -> Result<(), CardError> {
        if let Some(header) = &self.header {
            builder.header(
                &header.title,
                header.subtitle.as_deref(),
                header.image_url.as_deref(),
                header.image_style.into(),
            )?;
        }
        for section in &self.sections {
            builder.section(section.header.as_deref(), |builder| fill_section(builder, section))?;
        }
        Ok(())
    }
}

fn fill_section(builder: &mut SectionBuilder<'_>, section: &SectionDoc) -> Result<(), CardError> {
    for widget in &section.widgets {
        match widget {
            WidgetDoc::TextParagraph(text) => {
                builder.text_paragraph(text)?;
            }
            WidgetDoc::KeyValue(kv) => {
                let mut fields = KeyValueFields::new(&kv.content).multiline(kv.multiline);
                fields.top_label = kv.top_label.as_deref();
                fields.bottom_label = kv.bottom_label.as_deref();
                if let Some(icon) = kv.icon {
                    fields = fields.icon(icon);
                }
                if let Some(url) = &kv.icon_url {
                    fields = fields.icon_url(url.clone());
                }
                builder.key_value(fields)?;
            }
            WidgetDoc::Image { url, on_click } => {
                builder.image(url, |image| apply_click(image, on_click.as_ref()))?;
            }
            WidgetDoc::Buttons(buttons) => {
                builder.buttons(|builder| fill_buttons(builder, buttons))?;
            }
        }
    }
    Ok(())
}

fn fill_buttons(builder: &mut ButtonsBuilder<'_>, buttons: &[ButtonDoc]) -> Result<(), CardError> {
    for button in buttons {
        match button {
            ButtonDoc::Text { label, on_click } => {
                builder.text_button(label, |button| apply_click(button, on_click.as_ref()))?;
            }
            ButtonDoc::IconUrl { url, on_click } => {
                builder.icon_button_url(url, |button| apply_click(button, on_click.as_ref()))?;
            }
            ButtonDoc::Icon { icon, on_click } => {
                builder.icon_button(*icon, |button| apply_click(button, on_click.as_ref()))?;
            }
            ButtonDoc::NlpText(text) => {
                builder.nlp_text_button(text)?;
            }
        }
    }
    Ok(())
}

fn apply_click(target: &mut impl ClickAction, click: Option<&ClickDoc>) -> Result<(), CardError> {
    match click {
        None => Ok(()),
        Some(ClickDoc::Link(url)) => {
            target.link(url);
            Ok(())
        }
        Some(ClickDoc::Action { name, parameters }) => {
            target.action(name, parameters.clone());
            Ok(())
        }
        Some(ClickDoc::Nlp(text)) => target.nlp_action(text),
        Some(ClickDoc::Choice { intent, parameters }) => {
            let parameters: Parameters = parameters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            target.choice_action(&Intent::new(intent.clone()), &parameters);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangouts_chat_card::{ConnectorMessage, PassthroughTranslator};
    use serde_json::json;

    #[test]
    fn json_card_builds_through_the_builder() {
        let raw = json!({
            "header": { "title": "Trip", "image_style": "AVATAR" },
            "sections": [{
                "widgets": [
                    { "text_paragraph": "Hello" },
                    { "buttons": [
                        { "text": { "label": "Book", "on_click": { "link": "https://example.test" } } },
                        { "nlp_text": "Later" }
                    ] }
                ]
            }]
        })
        .to_string();
        let file = CardFile::parse(&raw, None).expect("parse");
        let message = file.build(&PassthroughTranslator).expect("build");
        let wire = serde_json::to_value(message.to_message().expect("wire")).expect("json");
        assert_eq!(wire["cards"][0]["header"]["imageStyle"], "AVATAR");
        let button = &wire["cards"][0]["sections"][0]["widgets"][1]["buttons"][1];
        assert_eq!(
            button["textButton"]["onClick"]["action"]["actionMethodName"],
            "SEND_SENTENCE"
        );
    }

    #[test]
    fn yaml_card_is_picked_by_extension() {
        let raw = "sections:\n  - header: Details\n    widgets:\n      - key_value:\n          \
                   content: \"08:15\"\n          icon: CLOCK\n";
        let file = CardFile::parse(raw, Some(Path::new("trip.yaml"))).expect("parse");
        assert_eq!(file.sections.len(), 1);
        assert!(matches!(
            &file.sections[0].widgets[0],
            WidgetDoc::KeyValue(kv) if kv.icon == Some(ChatIcon::Clock)
        ));
    }

    #[test]
    fn conflicting_key_value_icons_are_rejected() {
        let raw = json!({
            "sections": [{ "widgets": [{ "key_value": {
                "content": "x", "icon": "CAR", "icon_url": "https://img.test/car.png"
            } }] }]
        })
        .to_string();
        let file = CardFile::parse(&raw, Some(Path::new("card.json"))).expect("parse");
        let err = file.build(&PassthroughTranslator).unwrap_err();
        assert!(matches!(err, CardFileError::ConflictingIcons(content) if content == "x"));
    }

    #[test]
    fn unknown_widget_kinds_fail_to_parse() {
        let raw = r#"{"sections":[{"widgets":[{"carousel":[]}]}]}"#;
        assert!(matches!(CardFile::parse(raw, None), Err(CardFileError::Json(_))));
    }

    #[test]
    fn wire_style_keys_are_rejected() {
        let image = r#"{"sections":[{"widgets":[
            {"image":{"url":"https://img.test/a.png","onClick":{"link":"https://x.test"}}}
        ]}]}"#;
        let err = CardFile::parse(image, None).unwrap_err();
        assert!(err.to_string().contains("unknown field `onClick`"), "{err}");

        let button = r#"{"sections":[{"widgets":[{"buttons":[
            {"text":{"label":"Book","onClick":{"link":"https://x.test"}}}
        ]}]}]}"#;
        assert!(matches!(CardFile::parse(button, None), Err(CardFileError::Json(_))));

        let click = r#"{"sections":[{"widgets":[{"buttons":[
            {"text":{"label":"Book","on_click":{"action":{"name":"BOOK","params":{}}}}}
        ]}]}]}"#;
        assert!(matches!(CardFile::parse(click, None), Err(CardFileError::Json(_))));
    }
}
