//! Font selection as seen by layout: the triplet the metrics provider is
//! queried with, plus size and line height.

use crate::serde_length;
use folio_types::Length;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Numeric(u16),
}

impl FontWeight {
    /// Returns the numeric weight value (100-900 scale).
    pub fn numeric_value(&self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
            FontWeight::Numeric(n) => *n,
        }
    }

    fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(FontWeight::Normal),
            "bold" => Ok(FontWeight::Bold),
            _ => s
                .parse::<u16>()
                .map(FontWeight::Numeric)
                .map_err(|_| format!("Invalid font weight: '{}'", s)),
        }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FontWeightDef {
            Str(String),
            Num(u16),
        }

        match FontWeightDef::deserialize(deserializer)? {
            FontWeightDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            FontWeightDef::Num(n) => Ok(FontWeight::Numeric(n)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

fn default_family() -> Arc<str> {
    Arc::from("sans-serif")
}

fn default_size() -> Length {
    12_000
}

/// Resolved font properties of a block or inline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    #[serde(default = "default_family")]
    pub family: Arc<str>,
    #[serde(default = "default_size", deserialize_with = "serde_length::deserialize")]
    pub size: Length,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub style: FontStyle,
    /// Explicit line height; `None` means "normal".
    #[serde(default, deserialize_with = "serde_length::option::deserialize")]
    pub line_height: Option<Length>,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: default_family(),
            size: default_size(),
            weight: FontWeight::default(),
            style: FontStyle::default(),
            line_height: None,
        }
    }
}

impl FontSpec {
    pub fn with_size(mut self, size: Length) -> Self {
        self.size = size;
        self
    }

    /// Line height: the explicit value, or `size * normal_factor`.
    pub fn line_height(&self, normal_factor: f32) -> Length {
        self.line_height
            .unwrap_or_else(|| (self.size as f32 * normal_factor).round() as Length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_forms() {
        let w: FontWeight = serde_json::from_str("\"bold\"").unwrap();
        assert_eq!(w.numeric_value(), 700);
        let w: FontWeight = serde_json::from_str("300").unwrap();
        assert_eq!(w, FontWeight::Numeric(300));
        assert!(serde_json::from_str::<FontWeight>("\"heavy-ish\"").is_err());
    }

    #[test]
    fn test_line_height_normal() {
        let font: FontSpec = serde_json::from_str(r#"{"size": "10pt"}"#).unwrap();
        assert_eq!(font.line_height(1.2), 12_000);
        assert_eq!(&*font.family, "sans-serif");

        let font: FontSpec = serde_json::from_str(r#"{"lineHeight": "14pt"}"#).unwrap();
        assert_eq!(font.line_height(1.2), 14_000);
        assert_eq!(font.size, 12_000);
    }
}
