//! Explicit block-progression-dimension applied to an element list.
//!
//! The padding is computed once, when the list is built. Only the first
//! break taken inside the content is guaranteed to honour the minimum; later
//! breaks of the same list are not re-adjusted.

use crate::element_list::content_length;
use crate::elements::{KnuthElement, KnuthPenalty};
use crate::position::{OwnPart, Position};
use folio_style::BreakClass;
use folio_types::Length;

fn filler_penalty(width: Length, template: Option<&KnuthPenalty>) -> KnuthElement {
    let mut el = match template {
        Some(p) => KnuthElement::penalty(width, p.value, p.break_class, Position::Own(OwnPart::Filler)),
        None => KnuthElement::penalty(width, 0, BreakClass::Auto, Position::Own(OwnPart::Filler)),
    };
    if let KnuthElement::Penalty(p) = &mut el {
        p.auxiliary = true;
        if let Some(t) = template {
            p.flagged = t.flagged;
            p.leading_width = t.leading_width;
        }
    }
    el
}

/// Pads `elements` so that a break taken before `min` is reached still
/// fills `min`, and so that the content is at least `opt` long.
pub fn apply_explicit_height(elements: &mut Vec<KnuthElement>, min: Length, opt: Length) {
    if min > 0 {
        let mut cumulative = 0;
        let mut prev_is_box = false;
        let mut i = 0;
        while i < elements.len() && cumulative < min {
            match &elements[i] {
                KnuthElement::Box(b) => {
                    prev_is_box = true;
                    cumulative += b.width;
                }
                KnuthElement::Glue(g) => {
                    let width = g.width;
                    if prev_is_box {
                        elements.insert(i, filler_penalty(min - cumulative, None));
                        i += 1;
                    }
                    prev_is_box = false;
                    cumulative += width;
                }
                KnuthElement::Penalty(p) => {
                    prev_is_box = false;
                    if cumulative + p.width < min {
                        let replacement = filler_penalty(min - cumulative, Some(p));
                        elements[i] = replacement;
                    }
                }
            }
            i += 1;
        }
    }

    let opt = opt.max(min);
    let length = content_length(elements);
    if length < opt {
        elements.push(KnuthElement::aux_box(opt - length, Position::Own(OwnPart::Filler)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_list::is_legal_break;

    fn lines(n: usize, height: Length) -> Vec<KnuthElement> {
        let mut out = Vec::new();
        for i in 0..n {
            if i > 0 {
                out.push(KnuthElement::penalty(0, 0, BreakClass::Auto, Position::None));
            }
            out.push(KnuthElement::new_box(height, Position::None));
        }
        out
    }

    #[test]
    fn test_short_content_gets_filler_box() {
        let mut list = lines(1, 10_000);
        apply_explicit_height(&mut list, 0, 30_000);
        assert_eq!(list.len(), 2);
        assert!(list[1].is_auxiliary());
        assert_eq!(content_length(&list), 30_000);
    }

    #[test]
    fn test_breaks_before_minimum_are_widened() {
        let mut list = lines(3, 10_000);
        apply_explicit_height(&mut list, 25_000, 0);
        // Breaking after the first line still fills the minimum.
        assert_eq!(list[1].width(), 15_000);
        assert_eq!(list[3].width(), 5_000);
        assert!(list[1].is_auxiliary());
        assert_eq!(content_length(&list), 30_000);
    }

    #[test]
    fn test_glue_after_box_gets_filler_penalty() {
        let mut list = vec![
            KnuthElement::new_box(10_000, Position::None),
            KnuthElement::glue(2_000, 0, 0, Position::None),
            KnuthElement::new_box(10_000, Position::None),
        ];
        apply_explicit_height(&mut list, 20_000, 0);
        assert_eq!(list.len(), 4);
        assert!(is_legal_break(&list, 1));
        assert!(!is_legal_break(&list, 2));
        assert_eq!(list[1].width(), 10_000);
    }

    #[test]
    fn test_long_content_is_untouched() {
        let mut list = lines(2, 10_000);
        apply_explicit_height(&mut list, 5_000, 8_000);
        assert_eq!(list[1].width(), 0);
        assert_eq!(list.len(), 3);
    }
}
