//! Border and padding specifications.
//!
//! Before/after borders and paddings carry a conditionality: a `discard`
//! component is dropped where the area is split by a page or column break.

use crate::parsers::{parse_border, run_parser};
use crate::serde_length;
use folio_types::{Color, Length};
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Dotted,
    Dashed,
    Solid,
    Double,
}

impl BorderStyle {
    /// Rank used to settle collapsed borders of equal width.
    pub fn precedence(self) -> u8 {
        match self {
            BorderStyle::Double => 4,
            BorderStyle::Solid => 3,
            BorderStyle::Dashed => 2,
            BorderStyle::Dotted => 1,
            BorderStyle::None => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Conditionality {
    #[default]
    Discard,
    Retain,
}

/// A single border edge.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct Border {
    pub width: Length,
    pub style: BorderStyle,
    pub color: Color,
}

impl Border {
    pub fn new(width: Length, style: BorderStyle, color: Color) -> Self {
        Self { width, style, color }
    }

    pub fn solid(width: Length) -> Self {
        Self::new(width, BorderStyle::Solid, Color::BLACK)
    }

    /// Width that actually takes up space; a `none` border has none.
    pub fn effective_width(&self) -> Length {
        if self.style == BorderStyle::None {
            0
        } else {
            self.width.max(0)
        }
    }

    pub fn is_visible(&self) -> bool {
        self.effective_width() > 0
    }

    /// Collapsed-border resolution between two adjacent edges: the wider
    /// border wins, then the style with higher precedence, then `self`.
    pub fn collapse(self, other: Border) -> Border {
        let (w1, w2) = (self.effective_width(), other.effective_width());
        if w2 > w1 || (w2 == w1 && other.style.precedence() > self.style.precedence()) {
            other
        } else {
            self
        }
    }
}

impl<'de> Deserialize<'de> for Border {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BorderMap {
            #[serde(deserialize_with = "serde_length::deserialize")]
            width: Length,
            #[serde(default)]
            style: BorderStyle,
            #[serde(default)]
            color: Color,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum BorderDef {
            Shorthand(String),
            Map(BorderMap),
        }

        match BorderDef::deserialize(deserializer)? {
            BorderDef::Shorthand(s) => run_parser(parse_border, &s).map_err(de::Error::custom),
            BorderDef::Map(m) => Ok(Border::new(m.width, m.style, m.color)),
        }
    }
}

/// A length with conditionality (padding-before/after).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct CondLength {
    pub length: Length,
    pub conditionality: Conditionality,
}

impl CondLength {
    pub fn discard(length: Length) -> Self {
        Self { length, conditionality: Conditionality::Discard }
    }

    pub fn retain(length: Length) -> Self {
        Self { length, conditionality: Conditionality::Retain }
    }

    /// Length to use; `discard` drops discardable lengths.
    pub fn resolve(&self, discard: bool) -> Length {
        if discard && self.conditionality == Conditionality::Discard {
            0
        } else {
            self.length
        }
    }
}

impl<'de> Deserialize<'de> for CondLength {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CondMap {
            #[serde(deserialize_with = "serde_length::deserialize")]
            length: Length,
            #[serde(default)]
            conditionality: Conditionality,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CondDef {
            Map(CondMap),
            Plain(#[serde(deserialize_with = "serde_length::deserialize")] Length),
        }

        Ok(match CondDef::deserialize(deserializer)? {
            CondDef::Map(m) => CondLength { length: m.length, conditionality: m.conditionality },
            CondDef::Plain(length) => CondLength::discard(length),
        })
    }
}

/// How the borders of a table are drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderModel {
    #[default]
    Separate,
    Collapse,
}

/// Borders and paddings on the four sides of an area.
///
/// Before/after borders are discardable at breaks unless their
/// conditionality is `retain`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub struct BorderPadding {
    pub border_before: Border,
    pub border_after: Border,
    pub border_start: Border,
    pub border_end: Border,
    pub border_before_conditionality: Conditionality,
    pub border_after_conditionality: Conditionality,
    pub padding_before: CondLength,
    pub padding_after: CondLength,
    pub padding_start: Length,
    pub padding_end: Length,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct BorderPaddingDef {
    border: Option<Border>,
    border_before: Option<Border>,
    border_after: Option<Border>,
    border_start: Option<Border>,
    border_end: Option<Border>,
    border_before_conditionality: Conditionality,
    border_after_conditionality: Conditionality,
    padding: Option<CondLength>,
    padding_before: Option<CondLength>,
    padding_after: Option<CondLength>,
    padding_start: Option<CondLength>,
    padding_end: Option<CondLength>,
}

impl<'de> Deserialize<'de> for BorderPadding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let def = BorderPaddingDef::deserialize(deserializer)?;
        let border = def.border.unwrap_or_default();
        let padding = def.padding.unwrap_or_default();
        Ok(BorderPadding {
            border_before: def.border_before.unwrap_or(border),
            border_after: def.border_after.unwrap_or(border),
            border_start: def.border_start.unwrap_or(border),
            border_end: def.border_end.unwrap_or(border),
            border_before_conditionality: def.border_before_conditionality,
            border_after_conditionality: def.border_after_conditionality,
            padding_before: def.padding_before.unwrap_or(padding),
            padding_after: def.padding_after.unwrap_or(padding),
            padding_start: def.padding_start.unwrap_or(padding).length,
            padding_end: def.padding_end.unwrap_or(padding).length,
        })
    }
}

impl BorderPadding {
    pub fn uniform(border: Border, padding: Length) -> Self {
        Self {
            border_before: border,
            border_after: border,
            border_start: border,
            border_end: border,
            padding_before: CondLength::discard(padding),
            padding_after: CondLength::discard(padding),
            padding_start: padding,
            padding_end: padding,
            ..Self::default()
        }
    }

    pub fn border_before_width(&self, discard: bool) -> Length {
        if discard && self.border_before_conditionality == Conditionality::Discard {
            0
        } else {
            self.border_before.effective_width()
        }
    }

    pub fn border_after_width(&self, discard: bool) -> Length {
        if discard && self.border_after_conditionality == Conditionality::Discard {
            0
        } else {
            self.border_after.effective_width()
        }
    }

    /// Border plus padding before the content. `discard` is true where the
    /// area continues from a previous page or column.
    pub fn before(&self, discard: bool) -> Length {
        self.border_before_width(discard) + self.padding_before.resolve(discard)
    }

    pub fn after(&self, discard: bool) -> Length {
        self.border_after_width(discard) + self.padding_after.resolve(discard)
    }

    pub fn start(&self) -> Length {
        self.border_start.effective_width() + self.padding_start
    }

    pub fn end(&self) -> Length {
        self.border_end.effective_width() + self.padding_end
    }

    pub fn is_empty(&self) -> bool {
        self.before(false) == 0 && self.after(false) == 0 && self.start() == 0 && self.end() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_prefers_wider_then_style() {
        let thin = Border::solid(500);
        let wide = Border::new(2_000, BorderStyle::Dotted, Color::BLACK);
        assert_eq!(thin.collapse(wide), wide);
        assert_eq!(wide.collapse(thin), wide);

        let double = Border::new(500, BorderStyle::Double, Color::BLACK);
        assert_eq!(thin.collapse(double), double);
        let dashed = Border::new(500, BorderStyle::Dashed, Color::WHITE);
        assert_eq!(thin.collapse(dashed), thin);
    }

    #[test]
    fn test_none_style_has_no_width() {
        let b = Border::new(3_000, BorderStyle::None, Color::BLACK);
        assert_eq!(b.effective_width(), 0);
        assert_eq!(b.collapse(Border::solid(100)), Border::solid(100));
    }

    #[test]
    fn test_discard_at_breaks() {
        let mut bp = BorderPadding::uniform(Border::solid(1_000), 2_000);
        assert_eq!(bp.before(false), 3_000);
        assert_eq!(bp.before(true), 0);

        bp.padding_after = CondLength::retain(2_000);
        bp.border_after_conditionality = Conditionality::Retain;
        assert_eq!(bp.after(true), 3_000);
        assert_eq!(bp.start(), 3_000);
    }

    #[test]
    fn test_deserialize_shorthands() {
        let bp: BorderPadding = serde_json::from_str(
            r#"{"border": "1pt solid #000", "padding": "2pt", "paddingAfter": {"length": 500, "conditionality": "retain"}}"#,
        )
        .unwrap();
        assert_eq!(bp.border_end.width, 1_000);
        assert_eq!(bp.padding_start, 2_000);
        assert_eq!(bp.padding_after, CondLength::retain(500));
        assert_eq!(bp.after(true), 500);
    }
}
