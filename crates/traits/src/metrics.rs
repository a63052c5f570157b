//! Font metrics capability.
//!
//! All values are millipoints at the size carried by the [`FontSpec`].

use folio_style::FontSpec;
use folio_types::Length;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Unknown font family: {0}")]
    UnknownFont(String),

    #[error("No glyph for {codepoint:?} in '{family}'")]
    MissingGlyph { family: String, codepoint: char },
}

/// Provides glyph widths and vertical metrics.
///
/// Layout never aborts on a metrics failure: callers log the error and fall
/// back to a zero width.
pub trait FontMetricsProvider: Send + Sync + Debug {
    fn glyph_width(&self, font: &FontSpec, codepoint: char) -> Result<Length, MetricsError>;

    fn ascender(&self, font: &FontSpec) -> Result<Length, MetricsError>;

    /// Negative below the baseline.
    fn descender(&self, font: &FontSpec) -> Result<Length, MetricsError>;

    fn cap_height(&self, font: &FontSpec) -> Result<Length, MetricsError>;

    fn x_height(&self, font: &FontSpec) -> Result<Length, MetricsError>;

    /// Width of a string; the default sums glyph widths.
    fn text_width(&self, font: &FontSpec, text: &str) -> Result<Length, MetricsError> {
        text.chars().try_fold(0, |acc, c| Ok(acc + self.glyph_width(font, c)?))
    }

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Monospaced metrics expressed in thousandths of the font size.
///
/// Useful where real font files are not available, and deterministic for
/// tests. Optionally restricted to a set of families so lookups for other
/// families fail.
#[derive(Debug, Clone)]
pub struct FixedWidthMetrics {
    advance: i32,
    ascender: i32,
    descender: i32,
    families: Option<Vec<String>>,
}

impl Default for FixedWidthMetrics {
    fn default() -> Self {
        Self {
            advance: 500,
            ascender: 800,
            descender: -200,
            families: None,
        }
    }
}

impl FixedWidthMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the advance of every glyph, per mille of the font size.
    pub fn with_advance(mut self, per_mille: i32) -> Self {
        self.advance = per_mille;
        self
    }

    pub fn with_families<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families = Some(families.into_iter().map(Into::into).collect());
        self
    }

    fn check_family(&self, font: &FontSpec) -> Result<(), MetricsError> {
        match &self.families {
            Some(families) if !families.iter().any(|f| f.as_str() == &*font.family) => {
                Err(MetricsError::UnknownFont(font.family.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn scale(font: &FontSpec, per_mille: i32) -> Length {
        ((font.size as i64 * per_mille as i64) / 1000) as Length
    }
}

impl FontMetricsProvider for FixedWidthMetrics {
    fn glyph_width(&self, font: &FontSpec, codepoint: char) -> Result<Length, MetricsError> {
        self.check_family(font)?;
        if codepoint.is_control() && codepoint != '\t' {
            return Err(MetricsError::MissingGlyph {
                family: font.family.to_string(),
                codepoint,
            });
        }
        Ok(Self::scale(font, self.advance))
    }

    fn ascender(&self, font: &FontSpec) -> Result<Length, MetricsError> {
        self.check_family(font)?;
        Ok(Self::scale(font, self.ascender))
    }

    fn descender(&self, font: &FontSpec) -> Result<Length, MetricsError> {
        self.check_family(font)?;
        Ok(Self::scale(font, self.descender))
    }

    fn cap_height(&self, font: &FontSpec) -> Result<Length, MetricsError> {
        self.check_family(font)?;
        Ok(Self::scale(font, 700))
    }

    fn x_height(&self, font: &FontSpec) -> Result<Length, MetricsError> {
        self.check_family(font)?;
        Ok(Self::scale(font, 500))
    }

    fn name(&self) -> &'static str {
        "FixedWidthMetrics"
    }
}
