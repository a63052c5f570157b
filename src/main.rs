use folio::{PipelineBuilder, PipelineConfig, PipelineError, RecordingRenderer};
use std::env;
use std::fs;

/// A simple CLI that lays out a formatting object document and prints what
/// landed on each page.
fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Lays out a formatting object tree given as JSON.");
        eprintln!();
        eprintln!("Usage: {} <path/to/document.json> [path/to/config.json]", args[0]);
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };
    let pipeline = PipelineBuilder::new()
        .with_document_file(&args[1])?
        .with_config(config)
        .build()?;

    let mut renderer = RecordingRenderer::new();
    let report = pipeline.run(&mut renderer)?;

    for page in renderer.pages() {
        let marker = if page.blank { " (blank)" } else { "" };
        println!("page {} [{}]{}", page.page_number, page.master_name, marker);
        for line in page.line_texts() {
            println!("  {}", line);
        }
    }
    for failure in report.failures() {
        if let Err(e) = &failure.result {
            eprintln!("page-sequence {} failed: {}", failure.index, e);
        }
    }
    println!("{} page(s)", report.page_count());
    Ok(())
}
