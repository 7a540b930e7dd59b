//! Card document -> platform wire payload.
//!
//! Every match below is exhaustive on purpose: a new widget, button or action
//! variant does not compile until it has a mapping here.

use crate::errors::CardError;
use crate::model::{
    Button, ButtonAction, ButtonKind, Card, Header, KeyValue, KeyValueIcon, Section, Widget,
};
use crate::wire::{
    ActionParameter, CardHeader, FormAction, ImageButton, Message, OnClick, OpenLink, TextButton,
    WidgetMarkup, WireButton, WireCard, WireImage, WireKeyValue, WireSection, WireTextParagraph,
};

/// Maps a built card to the platform message. The card is left untouched, so
/// calling this repeatedly yields the same payload.
pub fn to_card_message(card: &Card) -> Result<Message, CardError> {
    tracing::debug!(
        sections = card.sections().len(),
        has_header = card.header().is_some(),
        "serializing card"
    );
    let sections = card
        .sections()
        .iter()
        .enumerate()
        .map(|(index, section)| to_section(index, section))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Message {
        text: None,
        cards: vec![WireCard {
            header: card.header().map(to_card_header),
            sections,
        }],
    })
}

fn to_card_header(header: &Header) -> CardHeader {
    CardHeader {
        title: header.title.clone(),
        subtitle: header.subtitle.clone(),
        image_url: header.image_url.clone(),
        image_style: header.image_style.name().to_string(),
    }
}

fn to_section(index: usize, section: &Section) -> Result<WireSection, CardError> {
    let widgets = section
        .widgets()
        .iter()
        .enumerate()
        .map(|(widget_index, widget)| {
            to_widget(&format!("sections[{index}].widgets[{widget_index}]"), widget)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WireSection {
        header: section.header.clone(),
        widgets,
    })
}

fn to_widget(path: &str, widget: &Widget) -> Result<WidgetMarkup, CardError> {
    let markup = match widget {
        Widget::TextParagraph(paragraph) => WidgetMarkup::TextParagraph(WireTextParagraph {
            text: paragraph.text.clone(),
        }),
        Widget::Image(image) => WidgetMarkup::Image(WireImage {
            image_url: image.image_url.clone(),
            on_click: image.on_click().map(to_on_click),
        }),
        Widget::KeyValue(key_value) => WidgetMarkup::KeyValue(to_key_value(key_value)),
        Widget::Buttons(buttons) => WidgetMarkup::Buttons(
            buttons
                .buttons()
                .iter()
                .enumerate()
                .map(|(index, button)| to_button(&format!("{path}.buttons[{index}]"), button))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };
    Ok(markup)
}

fn to_key_value(key_value: &KeyValue) -> WireKeyValue {
    let (icon_url, icon) = match &key_value.icon {
        Some(KeyValueIcon::Url(url)) => (Some(url.clone()), None),
        Some(KeyValueIcon::Catalog(icon)) => (None, Some(icon.name().to_string())),
        None => (None, None),
    };
    WireKeyValue {
        top_label: key_value.top_label.clone(),
        content: key_value.content.clone(),
        content_multiline: key_value.content_multiline,
        bottom_label: key_value.bottom_label.clone(),
        icon_url,
        icon,
    }
}

fn to_button(path: &str, button: &Button) -> Result<WireButton, CardError> {
    let on_click = button
        .action()
        .map(to_on_click)
        .ok_or_else(|| CardError::missing_button_action(path, button.kind.to_string()))?;
    let wire = match &button.kind {
        ButtonKind::Text(text) => WireButton::TextButton(TextButton {
            text: text.clone(),
            on_click,
        }),
        ButtonKind::IconExternal(icon_url) => WireButton::ImageButton(ImageButton {
            icon_url: Some(icon_url.clone()),
            icon: None,
            on_click,
        }),
        ButtonKind::IconEmbedded(icon) => WireButton::ImageButton(ImageButton {
            icon_url: None,
            icon: Some(icon.name().to_string()),
            on_click,
        }),
    };
    Ok(wire)
}

fn to_on_click(action: &ButtonAction) -> OnClick {
    match action {
        ButtonAction::Link(url) => OnClick::OpenLink(OpenLink { url: url.clone() }),
        ButtonAction::Action { action, parameters } => OnClick::Action(FormAction {
            action_method_name: action.clone(),
            parameters: parameters
                .iter()
                .map(|(key, value)| ActionParameter {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }),
    }
}
