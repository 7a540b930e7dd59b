//! In-memory card document.
//!
//! Nodes are only created by [`crate::builder`]; once a [`Card`] is built its
//! tree is read-only and child order is the render order.

use crate::icon::ChatIcon;
use std::collections::BTreeMap;
use std::fmt;

/// Root of a card message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub(crate) header: Option<Header>,
    pub(crate) sections: Vec<Section>,
}

impl Card {
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageStyle {
    #[default]
    Image,
    Avatar,
}

impl ImageStyle {
    pub fn name(self) -> &'static str {
        match self {
            ImageStyle::Image => "IMAGE",
            ImageStyle::Avatar => "AVATAR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub image_style: ImageStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub header: Option<String>,
    pub(crate) widgets: Vec<Widget>,
}

impl Section {
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    TextParagraph(TextParagraph),
    KeyValue(KeyValue),
    Image(Image),
    Buttons(Buttons),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextParagraph {
    pub text: String,
}

/// Icon shown next to a key/value: either a hosted image or a catalog icon,
/// never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValueIcon {
    Url(String),
    Catalog(ChatIcon),
}

impl From<ChatIcon> for KeyValueIcon {
    fn from(icon: ChatIcon) -> Self {
        KeyValueIcon::Catalog(icon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub top_label: Option<String>,
    pub content: String,
    pub bottom_label: Option<String>,
    pub content_multiline: bool,
    pub icon: Option<KeyValueIcon>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub image_url: String,
    pub(crate) on_click: Option<ButtonAction>,
}

impl Image {
    pub fn on_click(&self) -> Option<&ButtonAction> {
        self.on_click.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buttons {
    pub(crate) buttons: Vec<Button>,
}

impl Buttons {
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonKind {
    Text(String),
    IconExternal(String),
    IconEmbedded(ChatIcon),
}

impl fmt::Display for ButtonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonKind::Text(text) => write!(f, "text {text:?}"),
            ButtonKind::IconExternal(url) => write!(f, "icon {url:?}"),
            ButtonKind::IconEmbedded(icon) => write!(f, "icon {icon}"),
        }
    }
}

/// A button and its click handler. The action is set by the builder's
/// configuration step and is required by the wire serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub kind: ButtonKind,
    pub(crate) action: Option<ButtonAction>,
}

impl Button {
    pub fn action(&self) -> Option<&ButtonAction> {
        self.action.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    Link(String),
    Action {
        action: String,
        parameters: BTreeMap<String, String>,
    },
}

impl ButtonAction {
    pub fn link(url: impl Into<String>) -> Self {
        ButtonAction::Link(url.into())
    }

    pub fn action(action: impl Into<String>, parameters: BTreeMap<String, String>) -> Self {
        ButtonAction::Action {
            action: action.into(),
            parameters,
        }
    }
}
