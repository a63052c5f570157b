mod common;

use common::fixtures::*;
use common::{LINE, TestResult, format_document};
use folio::{Area, TraitKey, TraitValue};
use serde_json::{Value, json};

fn body(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| row(&[&format!("a{}", i), &format!("b{}", i)]))
        .collect()
}

fn cells(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range.flat_map(|i| [format!("a{}", i), format!("b{}", i)]).collect()
}

fn header_then(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    let mut out = vec!["H1".to_string(), "H2".to_string()];
    out.extend(cells(range));
    out
}

#[test]
fn test_table_fits_on_one_page() -> TestResult {
    let formatted = format_document(&document(4, vec![table(None, body(3))]))?;
    assert_page_count!(formatted, 1);
    assert_eq!(formatted.page_texts(), vec![cells(1..=3)]);
    Ok(())
}

#[test]
fn test_header_is_repeated_on_every_page() -> TestResult {
    let t = table(Some(row(&["H1", "H2"])), body(6));
    let formatted = format_document(&document(4, vec![t]))?;
    assert_page_count!(formatted, 2);
    assert_eq!(
        formatted.page_texts(),
        vec![header_then(1..=3), header_then(4..=6)]
    );
    Ok(())
}

#[test]
fn test_omitted_header_appears_only_once() -> TestResult {
    let t = with(
        table(Some(row(&["H1", "H2"])), body(6)),
        "tableOmitHeaderAtBreak",
        json!(true),
    );
    let formatted = format_document(&document(4, vec![t]))?;
    assert_page_count!(formatted, 2);
    assert_eq!(formatted.page_texts()[0], header_then(1..=3));
    assert_eq!(formatted.page_texts()[1], cells(4..=6));
    Ok(())
}

#[test]
fn test_cell_padding_and_border_grow_the_row() -> TestResult {
    let boxed = json!({
        "id": "boxed",
        "border": "1pt solid #000000",
        "padding": "2pt",
        "children": [paragraph("boxed")]
    });
    let plain = json!({ "children": [paragraph("plain")] });
    let t = table(None, vec![json!({ "cells": [boxed, plain] })]);
    let formatted = format_document(&document(4, vec![t]))?;

    let page = formatted.pages()[0];
    let areas = page.areas_for_id("boxed");
    assert_eq!(areas.len(), 1);
    let (_, rect) = areas[0];
    assert_eq!(rect.height, LINE + 6_000);
    assert_eq!(rect.width, 100_000);

    let mut heights = Vec::new();
    page.visit(&mut |area, rect| {
        if let Area::Block(b) = area
            && b.traits.get(TraitKey::Producer) == Some(&TraitValue::Text("table-cell".to_string()))
        {
            heights.push(rect.height);
        }
    });
    assert_eq!(heights, vec![LINE + 6_000, LINE + 6_000]);
    Ok(())
}

#[test]
fn test_spanning_rows_move_together() -> TestResult {
    // A cell spanning two rows ties them into one group that is not split
    // across pages when there is room for it on the next one.
    let span = json!({
        "numberRowsSpanned": 2,
        "children": [multi_line(&["x", "y"])]
    });
    let rows = vec![
        row(&["a1", "b1"]),
        row(&["a2", "b2"]),
        json!({ "cells": [span, { "children": [paragraph("b3")] }] }),
        row(&["b4"]),
    ];
    let formatted = format_document(&document(3, vec![table(None, rows)]))?;
    assert_page_count!(formatted, 2);
    assert_eq!(formatted.page_texts()[0], cells(1..=2));
    assert_eq!(formatted.page_texts()[1], vec!["x", "y", "b3", "b4"]);
    Ok(())
}
