use crate::parsers::{parse_shorthand_margins, StyleParseError};
use crate::serde_length;
use folio_types::Length;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Page and region margins in millipoints.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Margins {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Margins {
    pub fn all(value: Length) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Builds margins from 1, 2 or 4 values in CSS order.
    pub fn from_values(values: &[Length]) -> Result<Self, StyleParseError> {
        match *values {
            [all] => Ok(Margins::all(all)),
            [vertical, horizontal] => Ok(Margins {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, right, bottom, left] => Ok(Margins { top, right, bottom, left }),
            _ => Err(StyleParseError::Parse(format!(
                "Invalid number of values for margin shorthand: got {}, expected 1, 2, or 4.",
                values.len()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(default)]
        struct MarginsMap {
            #[serde(deserialize_with = "serde_length::deserialize")]
            top: Length,
            #[serde(deserialize_with = "serde_length::deserialize")]
            right: Length,
            #[serde(deserialize_with = "serde_length::deserialize")]
            bottom: Length,
            #[serde(deserialize_with = "serde_length::deserialize")]
            left: Length,
        }

        impl Default for MarginsMap {
            fn default() -> Self {
                Self { top: 0, right: 0, bottom: 0, left: 0 }
            }
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MarginsDef {
            Num(i64),
            Str(String),
            Map(MarginsMap),
        }

        match MarginsDef::deserialize(deserializer)? {
            MarginsDef::Num(n) => Length::try_from(n).map(Margins::all).map_err(de::Error::custom),
            MarginsDef::Str(s) => parse_shorthand_margins(&s).map_err(de::Error::custom),
            MarginsDef::Map(m) => Ok(Margins {
                top: m.top,
                right: m.right,
                bottom: m.bottom,
                left: m.left,
            }),
        }
    }
}
