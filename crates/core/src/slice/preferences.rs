// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reader preferences: theme and typography

use super::UnknownChoice;
use crate::schema::{FieldKind, FieldSpec, Schema};
use serde::{Deserialize, Serialize};

choice_enum! {
    /// Color theme
    Theme default System {
        System => "system",
        Light => "light",
        Dark => "dark",
    }
}

choice_enum! {
    /// Body font family
    FontFamily default Serif {
        System => "system",
        Serif => "serif",
        SansSerif => "sans-serif",
        Monospace => "monospace",
    }
}

choice_enum! {
    FontSize default Medium {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

choice_enum! {
    LineHeight default Normal {
        Compact => "compact",
        Normal => "normal",
        Relaxed => "relaxed",
    }
}

choice_enum! {
    TextAlign default Left {
        Left => "left",
        Center => "center",
        Justify => "justify",
    }
}

choice_enum! {
    /// Maximum width of the text column
    PageWidth default Normal {
        Narrow => "narrow",
        Normal => "normal",
        Wide => "wide",
    }
}

/// Typography and theme choices, replaced wholesale on every save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub font: FontFamily,
    pub font_size: FontSize,
    pub line_height: LineHeight,
    pub text_align: TextAlign,
    pub page_width: PageWidth,
}

pub const PREFERENCES_SCHEMA: Schema = Schema {
    name: "preferences",
    fields: &[
        FieldSpec::required("theme", FieldKind::Choice(Theme::NAMES)),
        FieldSpec::required("font", FieldKind::Choice(FontFamily::NAMES)),
        FieldSpec::required("fontSize", FieldKind::Choice(FontSize::NAMES)),
        FieldSpec::required("lineHeight", FieldKind::Choice(LineHeight::NAMES)),
        FieldSpec::required("textAlign", FieldKind::Choice(TextAlign::NAMES)),
        FieldSpec::required("pageWidth", FieldKind::Choice(PageWidth::NAMES)),
    ],
};

/// A single settings action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    Theme(Theme),
    Font(FontFamily),
    FontSize(FontSize),
    LineHeight(LineHeight),
    TextAlign(TextAlign),
    PageWidth(PageWidth),
}

impl PreferenceChange {
    /// Field names accepted by [`PreferenceChange::parse`]
    pub const FIELDS: &'static [&'static str] = &[
        "theme",
        "font",
        "fontSize",
        "lineHeight",
        "textAlign",
        "pageWidth",
    ];

    /// Parse a `field = value` pair as used by the settings surface
    pub fn parse(field: &str, value: &str) -> Result<Self, UnknownChoice> {
        Ok(match field {
            "theme" => PreferenceChange::Theme(value.parse()?),
            "font" => PreferenceChange::Font(value.parse()?),
            "fontSize" | "font-size" => PreferenceChange::FontSize(value.parse()?),
            "lineHeight" | "line-height" => PreferenceChange::LineHeight(value.parse()?),
            "textAlign" | "text-align" => PreferenceChange::TextAlign(value.parse()?),
            "pageWidth" | "page-width" => PreferenceChange::PageWidth(value.parse()?),
            other => {
                return Err(UnknownChoice {
                    kind: "preference",
                    value: other.to_string(),
                    expected: Self::FIELDS.join("|"),
                })
            }
        })
    }
}

impl Preferences {
    /// Return a copy with one setting changed
    pub fn apply(mut self, change: PreferenceChange) -> Self {
        match change {
            PreferenceChange::Theme(theme) => self.theme = theme,
            PreferenceChange::Font(font) => self.font = font,
            PreferenceChange::FontSize(size) => self.font_size = size,
            PreferenceChange::LineHeight(height) => self.line_height = height,
            PreferenceChange::TextAlign(align) => self.text_align = align,
            PreferenceChange::PageWidth(width) => self.page_width = width,
        }
        self
    }
}
