mod common;

use common::fixtures::*;
use common::{TestResult, init_logging};
use folio::{Area, PipelineBuilder, RecordingRenderer, TraitKey};
use folio_traits::InMemoryImageLoader;
use folio_types::Size;
use serde_json::json;
use std::sync::Arc;

fn graphics(renderer: &RecordingRenderer) -> Vec<(i32, i32, Option<String>)> {
    let mut out = Vec::new();
    for page in renderer.pages() {
        page.visit(&mut |area, rect| {
            if let Area::Viewport(v) = area {
                out.push((rect.width, rect.height, v.traits.text().map(str::to_string)));
            }
        });
    }
    out
}

#[test]
fn test_external_graphic_uses_loader_size() -> TestResult {
    init_logging();
    let images = InMemoryImageLoader::new();
    images.add("logo.png", Size::new(100_000, 50_000))?;
    let doc = document(4, vec![json!({ "type": "external-graphic", "src": "logo.png" })]);
    let pipeline = PipelineBuilder::new()
        .with_document_json(&serde_json::to_string(&doc)?)?
        .with_image_loader(Arc::new(images))
        .build()?;
    let mut renderer = RecordingRenderer::new();
    pipeline.run(&mut renderer)?;
    assert_eq!(graphics(&renderer), vec![(100_000, 50_000, None)]);
    Ok(())
}

#[test]
fn test_missing_graphic_gets_placeholder() -> TestResult {
    init_logging();
    let doc = document(
        8,
        vec![json!({ "type": "external-graphic", "src": "missing.png", "contentHeight": "36pt" })],
    );
    let pipeline = PipelineBuilder::new()
        .with_document_json(&serde_json::to_string(&doc)?)?
        .build()?;
    let mut renderer = RecordingRenderer::new();
    pipeline.run(&mut renderer)?;
    assert_eq!(
        graphics(&renderer),
        vec![(36_000, 36_000, Some("[image unavailable]".to_string()))]
    );
    Ok(())
}

#[test]
fn test_block_border_is_painted_once_across_pages() -> TestResult {
    init_logging();
    let boxed = with(
        multi_line(&["a", "b", "c", "d"]),
        "border",
        json!("1pt solid #000000"),
    );
    let pipeline = PipelineBuilder::new()
        .with_document_json(&serde_json::to_string(&document(3, vec![boxed]))?)?
        .build()?;
    let mut renderer = RecordingRenderer::new();
    pipeline.run(&mut renderer)?;

    let mut befores = Vec::new();
    for page in renderer.pages() {
        page.visit(&mut |area, _| {
            if let Area::Block(b) = area
                && b.traits.text().is_none()
                && !b.children.is_empty()
            {
                befores.push(b.traits.contains(TraitKey::BorderBefore));
            }
        });
    }
    // The before border is discarded where the block continues.
    assert_eq!(befores, vec![true, false]);
    Ok(())
}
