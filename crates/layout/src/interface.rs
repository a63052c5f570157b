use crate::LayoutError;
use crate::config::LayoutConfig;
use crate::nodes::BlockElements;
use folio_style::{FontSpec, TextAlign};
use folio_traits::{FixedWidthMetrics, FontMetricsProvider, ImageLoader, InMemoryImageLoader};
use folio_types::Length;
use std::fmt::Debug;
use std::sync::Arc;

// --- Context and Environment ---

/// Collaborators and configuration shared by a whole layout session.
#[derive(Debug, Clone)]
pub struct LayoutEnvironment {
    pub metrics: Arc<dyn FontMetricsProvider>,
    pub images: Arc<dyn ImageLoader>,
    pub config: LayoutConfig,
}

impl Default for LayoutEnvironment {
    fn default() -> Self {
        Self {
            metrics: Arc::new(FixedWidthMetrics::new()),
            images: Arc::new(InMemoryImageLoader::new()),
            config: LayoutConfig::default(),
        }
    }
}

impl LayoutEnvironment {
    pub fn new(
        metrics: Arc<dyn FontMetricsProvider>,
        images: Arc<dyn ImageLoader>,
        config: LayoutConfig,
    ) -> Self {
        Self {
            metrics,
            images,
            config,
        }
    }

    /// Glyph width with the zero-width fallback applied on failure.
    pub fn glyph_width(&self, font: &FontSpec, c: char) -> Length {
        match self.metrics.glyph_width(font, c) {
            Ok(w) => w,
            Err(e) => {
                log::warn!("{} (using zero width): {}", self.metrics.name(), e);
                0
            }
        }
    }

    /// Width of `text`, falling back per glyph like [`Self::glyph_width`].
    pub fn text_width(&self, font: &FontSpec, text: &str) -> Length {
        match self.metrics.text_width(font, text) {
            Ok(w) => w,
            Err(_) => text.chars().map(|c| self.glyph_width(font, c)).sum(),
        }
    }

    /// Ascender, falling back to the font size.
    pub fn ascender(&self, font: &FontSpec) -> Length {
        self.metrics.ascender(font).unwrap_or_else(|e| {
            log::warn!("{} (using font size as ascender): {}", self.metrics.name(), e);
            font.size
        })
    }

    pub fn descender(&self, font: &FontSpec) -> Length {
        self.metrics.descender(font).unwrap_or_else(|e| {
            log::warn!("{} (using zero descender): {}", self.metrics.name(), e);
            0
        })
    }
}

/// Inherited state passed down while building element lists.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext {
    /// Available inline-progression dimension.
    pub ipd: Length,
    pub font: FontSpec,
    pub text_align: TextAlign,
}

impl LayoutContext {
    pub fn new(ipd: Length) -> Self {
        Self {
            ipd,
            font: FontSpec::default(),
            text_align: TextAlign::default(),
        }
    }

    pub fn with_ipd(&self, ipd: Length) -> Self {
        Self {
            ipd: ipd.max(0),
            ..self.clone()
        }
    }

    /// Context for children of a node with the given overrides.
    pub fn inherit(&self, font: Option<&FontSpec>, text_align: Option<TextAlign>) -> Self {
        Self {
            ipd: self.ipd,
            font: font.cloned().unwrap_or_else(|| self.font.clone()),
            text_align: text_align.unwrap_or(self.text_align),
        }
    }
}

/// A block-level formatting object that can turn itself into elements.
pub trait ElementProducer: Debug {
    fn produce_elements(
        &self,
        ctx: &LayoutContext,
        env: &LayoutEnvironment,
    ) -> Result<BlockElements, LayoutError>;
}
