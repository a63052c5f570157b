//! Keep-together / keep-with-next / keep-with-previous constraints.
//!
//! A keep property carries one value per context (line, column, page). Layout
//! reduces it to a single [`Keep`] that can be compared, turned into a
//! penalty value and mapped to the break class a violation would need.

use crate::INFINITE;
use crate::breaks::BreakClass;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::cmp::Ordering;

/// A keep strength as written on the formatting object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum KeepValue {
    #[default]
    Auto,
    Strength(i32),
    Always,
}

impl KeepValue {
    fn rank(self) -> i64 {
        match self {
            KeepValue::Auto => i64::MIN,
            KeepValue::Strength(n) => n as i64,
            KeepValue::Always => i64::MAX,
        }
    }

    pub fn is_auto(self) -> bool {
        self == KeepValue::Auto
    }
}

impl PartialOrd for KeepValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeepValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl<'de> Deserialize<'de> for KeepValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum KeepValueDef {
            Str(String),
            Num(i32),
        }

        match KeepValueDef::deserialize(deserializer)? {
            KeepValueDef::Num(n) => Ok(KeepValue::Strength(n)),
            KeepValueDef::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "auto" => Ok(KeepValue::Auto),
                "always" => Ok(KeepValue::Always),
                other => other
                    .parse::<i32>()
                    .map(KeepValue::Strength)
                    .map_err(|_| de::Error::custom(format!("Invalid keep value: '{}'", s))),
            },
        }
    }
}

/// The `within-line` / `within-column` / `within-page` components of a keep.
///
/// A bare value (`"always"`, `5`) applies to the page context, which is how
/// the shorthand `keep-with-next="always"` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "KeepPropertyDef")]
pub struct KeepProperty {
    pub within_line: KeepValue,
    pub within_column: KeepValue,
    pub within_page: KeepValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeepPropertyDef {
    Shorthand(KeepValue),
    Components {
        #[serde(default, rename = "withinLine")]
        within_line: KeepValue,
        #[serde(default, rename = "withinColumn")]
        within_column: KeepValue,
        #[serde(default, rename = "withinPage")]
        within_page: KeepValue,
    },
}

impl From<KeepPropertyDef> for KeepProperty {
    fn from(def: KeepPropertyDef) -> Self {
        match def {
            KeepPropertyDef::Shorthand(value) => KeepProperty {
                within_page: value,
                ..KeepProperty::default()
            },
            KeepPropertyDef::Components {
                within_line,
                within_column,
                within_page,
            } => KeepProperty {
                within_line,
                within_column,
                within_page,
            },
        }
    }
}

impl KeepProperty {
    pub const AUTO: KeepProperty = KeepProperty {
        within_line: KeepValue::Auto,
        within_column: KeepValue::Auto,
        within_page: KeepValue::Auto,
    };

    pub fn always() -> Self {
        KeepProperty {
            within_page: KeepValue::Always,
            ..KeepProperty::default()
        }
    }

    pub fn is_auto(&self) -> bool {
        *self == KeepProperty::AUTO
    }
}

/// Context a keep applies in. Lower priority numbers win when two keeps of
/// different contexts are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeepContext {
    Line,
    Column,
    Page,
    Auto,
}

impl KeepContext {
    fn priority(self) -> u8 {
        match self {
            KeepContext::Line => 0,
            KeepContext::Column => 1,
            KeepContext::Page => 2,
            KeepContext::Auto => 3,
        }
    }
}

/// A resolved keep: one strength in one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keep {
    strength: KeepValue,
    context: KeepContext,
}

impl Default for Keep {
    fn default() -> Self {
        Keep::AUTO
    }
}

impl Keep {
    pub const AUTO: Keep = Keep {
        strength: KeepValue::Auto,
        context: KeepContext::Auto,
    };

    pub fn new(strength: KeepValue, context: KeepContext) -> Self {
        if strength.is_auto() {
            Keep::AUTO
        } else {
            Keep { strength, context }
        }
    }

    pub fn strength(&self) -> KeepValue {
        self.strength
    }

    pub fn context(&self) -> KeepContext {
        self.context
    }

    pub fn is_auto(&self) -> bool {
        self.strength.is_auto()
    }

    /// Penalty value for a break point this keep applies to.
    pub fn penalty(&self) -> i32 {
        match self.strength {
            KeepValue::Auto => 0,
            KeepValue::Strength(_) => INFINITE - 1,
            KeepValue::Always => INFINITE,
        }
    }

    /// Break class a violated keep implies.
    pub fn break_class(&self) -> BreakClass {
        match self.context {
            KeepContext::Column => BreakClass::Column,
            KeepContext::Page => BreakClass::Page,
            KeepContext::Line | KeepContext::Auto => BreakClass::Auto,
        }
    }

    /// Returns the keep that dominates.
    ///
    /// `always` beats anything weaker regardless of context. Otherwise keeps of
    /// the same context are decided by strength, and different contexts by
    /// context priority (line before column before page).
    pub fn compare(self, other: Keep) -> Keep {
        if self.strength == KeepValue::Always && self.strength > other.strength {
            return self;
        }
        if other.strength == KeepValue::Always && other.strength > self.strength {
            return other;
        }
        match self.context.priority().cmp(&other.context.priority()) {
            Ordering::Equal => {
                if self.strength >= other.strength {
                    self
                } else {
                    other
                }
            }
            Ordering::Less => self,
            Ordering::Greater => other,
        }
    }
}

impl From<KeepProperty> for Keep {
    /// The page component is consulted first, then column, then line; the
    /// first non-auto component decides.
    fn from(property: KeepProperty) -> Self {
        if !property.within_page.is_auto() {
            Keep::new(property.within_page, KeepContext::Page)
        } else if !property.within_column.is_auto() {
            Keep::new(property.within_column, KeepContext::Column)
        } else if !property.within_line.is_auto() {
            Keep::new(property.within_line, KeepContext::Line)
        } else {
            Keep::AUTO
        }
    }
}
