pub mod fixtures;

use folio::{DocumentReport, PageViewport, PipelineBuilder, PipelineConfig, PipelineError, RecordingRenderer};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Height of one line of the default 12pt font.
pub const LINE: i32 = 14_400;

/// The outcome of formatting a document into a recording renderer.
pub struct Formatted {
    pub report: DocumentReport,
    pub renderer: RecordingRenderer,
}

impl Formatted {
    pub fn page_count(&self) -> usize {
        self.renderer.page_count()
    }

    pub fn pages(&self) -> Vec<&PageViewport> {
        self.renderer.pages().collect()
    }

    /// Line texts per page.
    pub fn page_texts(&self) -> Vec<Vec<String>> {
        self.renderer.pages().map(|p| p.line_texts()).collect()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Formats a document given as JSON with the default configuration.
pub fn format_document(document: &Value) -> Result<Formatted, PipelineError> {
    format_with_config(document, PipelineConfig::default())
}

pub fn format_with_config(document: &Value, config: PipelineConfig) -> Result<Formatted, PipelineError> {
    init_logging();
    let json = serde_json::to_string(document)?;
    let pipeline = PipelineBuilder::new()
        .with_document_json(&json)?
        .with_config(config)
        .build()?;
    let mut renderer = RecordingRenderer::new();
    let report = pipeline.run(&mut renderer)?;
    Ok(Formatted { report, renderer })
}

/// Asserts the number of pages rendered.
#[macro_export]
macro_rules! assert_page_count {
    ($formatted:expr, $expected:expr) => {
        assert_eq!(
            $formatted.page_count(),
            $expected,
            "Expected {} pages, got {}: {:?}",
            $expected,
            $formatted.page_count(),
            $formatted.page_texts()
        );
    };
}
