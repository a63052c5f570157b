mod common;

use common::fixtures::*;
use common::{LINE, TestResult, format_document};
use folio::{Area, TraitKey, TraitValue};
use serde_json::json;

fn producer(area: &Area) -> Option<&str> {
    match area.traits().get(TraitKey::Producer) {
        Some(TraitValue::Text(s)) => Some(s.as_str()),
        _ => None,
    }
}

#[test]
fn test_label_and_body_share_the_line() -> TestResult {
    let l = list(vec![("1.", paragraph("first")), ("2.", paragraph("second"))]);
    let formatted = format_document(&document(4, vec![l]))?;
    assert_page_count!(formatted, 1);

    let mut bodies = Vec::new();
    formatted.pages()[0].visit(&mut |area, rect| {
        if producer(area) == Some("list-item-body") {
            bodies.push((rect.x, rect.y));
        }
    });
    assert_eq!(bodies, vec![(24_000, 0), (24_000, LINE)]);
    assert_eq!(formatted.page_texts()[0], vec!["1.", "first", "2.", "second"]);
    Ok(())
}

#[test]
fn test_long_body_breaks_across_pages() -> TestResult {
    let l = list(vec![("1.", multi_line(&["a", "b", "c", "d", "e"]))]);
    let formatted = format_document(&document(3, vec![l]))?;
    assert_eq!(
        formatted.page_texts(),
        vec![vec!["1.", "a", "b", "c"], vec!["d", "e"]]
    );
    Ok(())
}

#[test]
fn test_kept_together_list_moves_whole() -> TestResult {
    // Without the keep the item would break after its second body line.
    let l = list(vec![("1.", multi_line(&["a", "b", "c", "d"]))]);
    let l = with(l, "keepTogether", json!("always"));
    let formatted = format_document(&document(4, vec![paragraph("intro"), l]))?;
    assert_eq!(
        formatted.page_texts(),
        vec![vec!["intro"], vec!["1.", "a", "b", "c", "d"]]
    );
    Ok(())
}
