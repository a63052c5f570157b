use super::LINE;
use serde_json::{Value, json};

/// A master 200pt wide, without margins, whose body holds `lines` lines.
pub fn master(name: &str, lines: i32) -> Value {
    json!({
        "masterName": name,
        "pageWidth": "200pt",
        "pageHeight": LINE * lines + LINE / 2
    })
}

/// A document with one sequence on the master "page".
pub fn document(lines_per_page: i32, children: Vec<Value>) -> Value {
    json!({
        "layoutMasterSet": { "simplePageMasters": [master("page", lines_per_page)] },
        "pageSequences": [sequence("page", children)]
    })
}

pub fn document_with_sequences(lines_per_page: i32, sequences: Vec<Value>) -> Value {
    json!({
        "layoutMasterSet": { "simplePageMasters": [master("page", lines_per_page)] },
        "pageSequences": sequences
    })
}

pub fn sequence(master_reference: &str, children: Vec<Value>) -> Value {
    json!({
        "masterReference": master_reference,
        "flow": { "flowName": "xsl-region-body", "children": children }
    })
}

pub fn text(content: &str) -> Value {
    json!({ "type": "text", "text": content })
}

/// A block holding one line of text.
pub fn paragraph(content: &str) -> Value {
    json!({ "type": "block", "children": [text(content)] })
}

pub fn paragraphs(count: usize) -> Vec<Value> {
    (1..=count).map(|i| paragraph(&format!("line {}", i))).collect()
}

/// A block with one line per entry, separated by explicit line breaks.
pub fn multi_line(lines: &[&str]) -> Value {
    let mut children = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            children.push(json!({ "type": "line-break" }));
        }
        children.push(text(line));
    }
    json!({ "type": "block", "children": children })
}

pub fn with(mut node: Value, key: &str, value: Value) -> Value {
    if let Some(map) = node.as_object_mut() {
        map.insert(key.to_string(), value);
    }
    node
}

pub fn list(items: Vec<(&str, Value)>) -> Value {
    let items: Vec<Value> = items
        .into_iter()
        .map(|(label, body)| {
            json!({
                "label": { "children": [paragraph(label)] },
                "body": { "children": [body] }
            })
        })
        .collect();
    json!({
        "type": "list-block",
        "provisionalDistanceBetweenStarts": "24pt",
        "provisionalLabelSeparation": "6pt",
        "items": items
    })
}

pub fn row(cells: &[&str]) -> Value {
    let cells: Vec<Value> = cells.iter().map(|c| json!({ "children": [paragraph(c)] })).collect();
    json!({ "cells": cells })
}

/// A two-column table with equal proportional columns.
pub fn table(header: Option<Value>, body_rows: Vec<Value>) -> Value {
    let mut table = json!({
        "type": "table",
        "columns": [{ "columnWidth": "*", "numberColumnsRepeated": 2 }],
        "body": [{ "rows": body_rows }]
    });
    if let Some(header) = header {
        table = with(table, "header", json!({ "rows": [header] }));
    }
    table
}

pub fn footnote(citation: &str, body: &str) -> Value {
    json!({
        "type": "footnote",
        "inline": [text(citation)],
        "body": [paragraph(body)]
    })
}
