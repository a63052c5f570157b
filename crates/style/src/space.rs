//! Space-before/after specifications and length ranges
//! (block-progression-dimension, row height).

use crate::border::Conditionality;
use crate::serde_length;
use folio_types::{Length, MinOptMax};
use serde::{Deserialize, Deserializer, Serialize};

/// Space-before or space-after: a min/opt/max length that is discarded at
/// breaks unless retained.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct SpaceSpec {
    pub space: MinOptMax,
    pub conditionality: Conditionality,
}

impl SpaceSpec {
    pub fn fixed(length: Length) -> Self {
        Self {
            space: MinOptMax::stiff(length),
            conditionality: Conditionality::Discard,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.space.is_zero()
    }

    pub fn is_discardable(&self) -> bool {
        self.conditionality == Conditionality::Discard
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpaceMap {
    #[serde(default, deserialize_with = "serde_length::option::deserialize")]
    minimum: Option<Length>,
    #[serde(deserialize_with = "serde_length::deserialize")]
    optimum: Length,
    #[serde(default, deserialize_with = "serde_length::option::deserialize")]
    maximum: Option<Length>,
    #[serde(default)]
    conditionality: Conditionality,
}

impl<'de> Deserialize<'de> for SpaceSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum SpaceDef {
            Map(SpaceMap),
            Plain(#[serde(deserialize_with = "serde_length::deserialize")] Length),
        }

        Ok(match SpaceDef::deserialize(deserializer)? {
            SpaceDef::Plain(length) => SpaceSpec::fixed(length),
            SpaceDef::Map(m) => SpaceSpec {
                space: MinOptMax::new(
                    m.minimum.unwrap_or(m.optimum),
                    m.optimum,
                    m.maximum.unwrap_or(m.optimum),
                ),
                conditionality: m.conditionality,
            },
        })
    }
}

/// A length range where any component may be `auto`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct LengthRange {
    pub minimum: Option<Length>,
    pub optimum: Option<Length>,
    pub maximum: Option<Length>,
}

impl LengthRange {
    pub fn exact(length: Length) -> Self {
        Self {
            minimum: Some(length),
            optimum: Some(length),
            maximum: Some(length),
        }
    }

    pub fn is_auto(&self) -> bool {
        self.minimum.is_none() && self.optimum.is_none() && self.maximum.is_none()
    }

    /// Resolves to a min/opt/max triple; `auto` minimum is 0, `auto`
    /// optimum is the minimum and `auto` maximum is unbounded.
    pub fn to_min_opt_max(&self) -> MinOptMax {
        let min = self.minimum.unwrap_or(0);
        let opt = self.optimum.unwrap_or(min);
        let max = self.maximum.unwrap_or(Length::MAX);
        MinOptMax::new(min, opt, max)
    }
}

impl<'de> Deserialize<'de> for LengthRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RangeMap {
            #[serde(default, deserialize_with = "serde_length::option::deserialize")]
            minimum: Option<Length>,
            #[serde(default, deserialize_with = "serde_length::option::deserialize")]
            optimum: Option<Length>,
            #[serde(default, deserialize_with = "serde_length::option::deserialize")]
            maximum: Option<Length>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RangeDef {
            Map(RangeMap),
            Plain(#[serde(deserialize_with = "serde_length::deserialize")] Length),
        }

        Ok(match RangeDef::deserialize(deserializer)? {
            RangeDef::Plain(length) => LengthRange::exact(length),
            RangeDef::Map(m) => LengthRange {
                minimum: m.minimum,
                optimum: m.optimum,
                maximum: m.maximum,
            },
        })
    }
}
