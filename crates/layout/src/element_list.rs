//! Helpers over element lists.

use crate::elements::KnuthElement;
use crate::position::Position;
use folio_style::{BreakClass, INFINITE};
use folio_types::Length;
use std::ops::Range;

/// An inclusive element range `start..=end` of one element list. `end` is
/// `None` or below `start` when the range is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl ElementRange {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end.is_none_or(|end| end < self.start)
    }

    /// The range as a half-open index range.
    pub fn indices(&self) -> Range<usize> {
        match self.end {
            Some(end) if end >= self.start => self.start..end + 1,
            _ => self.start..self.start,
        }
    }

    /// Smallest range covering both.
    pub fn union(self, other: ElementRange) -> ElementRange {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => other,
            (_, true) => self,
            _ => ElementRange {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            },
        }
    }

    pub fn slice<'a>(&self, list: &'a [KnuthElement]) -> &'a [KnuthElement] {
        let r = self.indices();
        &list[r.start.min(list.len())..r.end.min(list.len())]
    }
}

/// Sum of the box and glue widths. Penalty widths only count when a break is
/// taken, so they are left out.
pub fn content_length(elements: &[KnuthElement]) -> Length {
    elements
        .iter()
        .filter(|el| !el.is_penalty())
        .map(KnuthElement::width)
        .sum()
}

/// Content length of `start..end`, clamped to the list.
pub fn content_length_range(elements: &[KnuthElement], range: Range<usize>) -> Length {
    let end = range.end.min(elements.len());
    let start = range.start.min(end);
    content_length(&elements[start..end])
}

/// True if a break may be taken at `index`.
pub fn is_legal_break(elements: &[KnuthElement], index: usize) -> bool {
    match elements.get(index) {
        Some(KnuthElement::Penalty(p)) => p.is_legal(),
        Some(KnuthElement::Glue(_)) => index > 0 && elements[index - 1].is_box(),
        _ => false,
    }
}

pub fn ends_with_forced_break(elements: &[KnuthElement]) -> bool {
    elements.last().is_some_and(KnuthElement::is_forced_break)
}

/// Break class of a trailing forced break, if any.
pub fn trailing_break_class(elements: &[KnuthElement]) -> Option<BreakClass> {
    elements
        .last()
        .and_then(KnuthElement::as_penalty)
        .filter(|p| p.is_forced())
        .map(|p| p.break_class)
}

/// Turns every legal break into a non-break: penalties are raised to
/// `INFINITE` and a forbidding penalty is inserted before every glue that
/// follows a box. Used for content that must stay in one piece.
pub fn remove_legal_breaks(elements: &mut Vec<KnuthElement>) {
    let mut i = 0;
    while i < elements.len() {
        let glue_after_box = elements[i].is_glue() && i > 0 && elements[i - 1].is_box();
        if glue_after_box {
            elements.insert(i, KnuthElement::no_break(Position::None));
            i += 2;
            continue;
        }
        if let KnuthElement::Penalty(p) = &mut elements[i] {
            p.value = INFINITE;
        }
        i += 1;
    }
}

pub fn first_box_index(elements: &[KnuthElement]) -> Option<usize> {
    elements.iter().position(KnuthElement::is_box)
}

pub fn last_box_index(elements: &[KnuthElement]) -> Option<usize> {
    elements.iter().rposition(KnuthElement::is_box)
}

/// Drops trailing penalties and glue.
pub fn trim_trailing_discardables(elements: &mut Vec<KnuthElement>) {
    while elements.last().is_some_and(|el| el.is_discardable() && !el.is_forced_break()) {
        elements.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_style::BreakClass;

    fn sample() -> Vec<KnuthElement> {
        vec![
            KnuthElement::new_box(10, Position::None),
            KnuthElement::glue(5, 0, 0, Position::None),
            KnuthElement::new_box(10, Position::None),
            KnuthElement::penalty(3, 0, BreakClass::Auto, Position::None),
            KnuthElement::new_box(7, Position::None),
        ]
    }

    #[test]
    fn test_content_length_skips_penalties() {
        assert_eq!(content_length(&sample()), 32);
        assert_eq!(content_length_range(&sample(), 1..3), 15);
    }

    #[test]
    fn test_legal_breaks() {
        let list = sample();
        assert!(!is_legal_break(&list, 0));
        assert!(is_legal_break(&list, 1));
        assert!(is_legal_break(&list, 3));
        assert!(!is_legal_break(&list, 9));
    }

    #[test]
    fn test_remove_legal_breaks() {
        let mut list = sample();
        remove_legal_breaks(&mut list);
        assert_eq!(list.len(), 6);
        assert!((0..list.len()).all(|i| !is_legal_break(&list, i)));
        assert_eq!(content_length(&list), 32);
    }

    #[test]
    fn test_element_range() {
        let r = ElementRange::new(2, Some(1));
        assert!(r.is_empty());
        assert_eq!(r.indices(), 2..2);
        let r = ElementRange::new(0, Some(0));
        assert!(!r.is_empty());
        assert_eq!(r.union(ElementRange::new(1, Some(3))), ElementRange::new(0, Some(3)));
        assert_eq!(ElementRange::new(0, None).union(r), r);
    }

    #[test]
    fn test_trailing_break_class() {
        let mut list = sample();
        assert_eq!(trailing_break_class(&list), None);
        list.push(KnuthElement::forced_break(BreakClass::OddPage, Position::None));
        assert!(ends_with_forced_break(&list));
        assert_eq!(trailing_break_class(&list), Some(BreakClass::OddPage));
    }
}
