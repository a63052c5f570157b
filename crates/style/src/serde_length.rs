//! Serde helpers for length-valued properties.
//!
//! Integers are millipoints; strings go through [`length_from_str`] and may
//! carry a unit (`"12pt"`, `"1in"`, `"5mm"`).
//!
//! ```ignore
//! #[serde(default, deserialize_with = "folio_style::serde_length::deserialize")]
//! pub padding: Length,
//! ```

use crate::parsers::length_from_str;
use folio_types::Length;
use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthDef {
    Int(i64),
    Float(f64),
    Str(String),
}

fn resolve<E: de::Error>(def: LengthDef) -> Result<Length, E> {
    match def {
        LengthDef::Int(n) => Length::try_from(n).map_err(E::custom),
        LengthDef::Float(f) => Ok(f.round() as Length),
        LengthDef::Str(s) => length_from_str(&s).map_err(E::custom),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Length, D::Error>
where
    D: Deserializer<'de>,
{
    resolve(LengthDef::deserialize(deserializer)?)
}

pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Length>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<LengthDef>::deserialize(deserializer)? {
            Some(def) => resolve(def).map(Some),
            None => Ok(None),
        }
    }
}
