use folio_types::Size;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Line height used when a font's line-height is "normal", as a factor of
    /// the font size.
    ///
    /// Defaults to `1.2`.
    pub line_height_factor: f32,

    /// Minimum number of lines of a paragraph left at the top of a page.
    ///
    /// Defaults to `2`.
    pub default_widows: u32,

    /// Minimum number of lines of a paragraph left at the bottom of a page.
    ///
    /// Defaults to `2`.
    pub default_orphans: u32,

    /// Space reserved above the first footnote on a page, in millipoints.
    ///
    /// Defaults to `0`.
    pub footnote_separator: i32,

    /// Bound on stepping loops: `step_limit_factor * element_count + 64`
    /// iterations before a `StepExhaustion` error is raised.
    ///
    /// Defaults to `8`.
    pub step_limit_factor: usize,

    /// Size used for an external graphic whose image cannot be resolved.
    ///
    /// Defaults to 72pt x 72pt.
    pub placeholder_image_size: Size,
}

impl LayoutConfig {
    pub fn step_limit(&self, element_count: usize) -> usize {
        self.step_limit_factor.saturating_mul(element_count).saturating_add(64)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_height_factor: 1.2,
            default_widows: 2,
            default_orphans: 2,
            footnote_separator: 0,
            step_limit_factor: 8,
            placeholder_image_size: Size::new(72_000, 72_000),
        }
    }
}
