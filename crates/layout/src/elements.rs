//! The Knuth element model: boxes, glue and penalties along the
//! block-progression direction.
//!
//! A legal break exists only at a penalty whose value is below `INFINITE`, or
//! at a glue immediately preceded by a box.

use crate::position::Position;
use folio_style::{BreakClass, INFINITE, Keep};
use folio_types::Length;
use std::sync::Arc;

/// A footnote cited from inside a box. The body's element list is built
/// once and placed whole on the page where the citing box lands.
#[derive(Debug, Clone)]
pub struct FootnoteRef {
    pub body: Arc<Vec<KnuthElement>>,
    pub length: Length,
}

impl FootnoteRef {
    pub fn new(body: Vec<KnuthElement>) -> Self {
        let length = crate::element_list::content_length(&body);
        Self {
            body: Arc::new(body),
            length,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KnuthBox {
    pub width: Length,
    pub position: Position,
    /// Auxiliary boxes (fillers, border/padding) carry no visible content.
    pub auxiliary: bool,
    pub footnotes: Vec<FootnoteRef>,
}

#[derive(Debug, Clone)]
pub struct KnuthGlue {
    pub width: Length,
    pub stretch: Length,
    pub shrink: Length,
    pub position: Position,
    pub auxiliary: bool,
}

#[derive(Debug, Clone)]
pub struct KnuthPenalty {
    /// Length added to the page if the break is taken here.
    pub width: Length,
    /// Length added to the top of the next page if the break is taken here
    /// (repeated table headers, retained borders).
    pub leading_width: Length,
    pub value: i32,
    pub flagged: bool,
    pub break_class: BreakClass,
    pub position: Position,
    pub auxiliary: bool,
}

impl KnuthPenalty {
    pub fn is_forced(&self) -> bool {
        self.value <= -INFINITE
    }

    pub fn is_legal(&self) -> bool {
        self.value < INFINITE
    }

    /// The class of a forced break. A forced break without a class of its
    /// own ends the current column.
    pub fn forced_break_class(&self) -> Option<BreakClass> {
        if !self.is_forced() {
            None
        } else if self.break_class.is_auto() {
            Some(BreakClass::Column)
        } else {
            Some(self.break_class)
        }
    }
}

#[derive(Debug, Clone)]
pub enum KnuthElement {
    Box(KnuthBox),
    Glue(KnuthGlue),
    Penalty(KnuthPenalty),
}

impl KnuthElement {
    pub fn new_box(width: Length, position: Position) -> Self {
        KnuthElement::Box(KnuthBox {
            width,
            position,
            auxiliary: false,
            footnotes: Vec::new(),
        })
    }

    pub fn aux_box(width: Length, position: Position) -> Self {
        KnuthElement::Box(KnuthBox {
            width,
            position,
            auxiliary: true,
            footnotes: Vec::new(),
        })
    }

    pub fn glue(width: Length, stretch: Length, shrink: Length, position: Position) -> Self {
        KnuthElement::Glue(KnuthGlue {
            width,
            stretch,
            shrink,
            position,
            auxiliary: false,
        })
    }

    pub fn penalty(width: Length, value: i32, break_class: BreakClass, position: Position) -> Self {
        KnuthElement::Penalty(KnuthPenalty {
            width,
            leading_width: 0,
            value: value.clamp(-INFINITE, INFINITE),
            flagged: false,
            break_class,
            position,
            auxiliary: false,
        })
    }

    /// A penalty that forbids breaking.
    pub fn no_break(position: Position) -> Self {
        Self::penalty(0, INFINITE, BreakClass::Auto, position)
    }

    /// A forced break of the given class.
    pub fn forced_break(break_class: BreakClass, position: Position) -> Self {
        Self::penalty(0, -INFINITE, break_class, position)
    }

    /// A break opportunity between two pieces of content: the penalty and
    /// break class follow from the keep in force there.
    pub fn break_element(position: Position, width: Length, value: i32, break_class: BreakClass) -> Self {
        Self::penalty(width, value, break_class, position)
    }

    /// A break opportunity carrying the keep's penalty and context.
    pub fn keep_break(keep: Keep, position: Position) -> Self {
        Self::penalty(0, keep.penalty(), keep.break_class(), position)
    }

    pub fn width(&self) -> Length {
        match self {
            KnuthElement::Box(b) => b.width,
            KnuthElement::Glue(g) => g.width,
            KnuthElement::Penalty(p) => p.width,
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            KnuthElement::Box(b) => &b.position,
            KnuthElement::Glue(g) => &g.position,
            KnuthElement::Penalty(p) => &p.position,
        }
    }

    pub fn position_mut(&mut self) -> &mut Position {
        match self {
            KnuthElement::Box(b) => &mut b.position,
            KnuthElement::Glue(g) => &mut g.position,
            KnuthElement::Penalty(p) => &mut p.position,
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self, KnuthElement::Box(_))
    }

    pub fn is_glue(&self) -> bool {
        matches!(self, KnuthElement::Glue(_))
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self, KnuthElement::Penalty(_))
    }

    pub fn is_auxiliary(&self) -> bool {
        match self {
            KnuthElement::Box(b) => b.auxiliary,
            KnuthElement::Glue(g) => g.auxiliary,
            KnuthElement::Penalty(p) => p.auxiliary,
        }
    }

    pub fn as_penalty(&self) -> Option<&KnuthPenalty> {
        match self {
            KnuthElement::Penalty(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_forced_break(&self) -> bool {
        self.as_penalty().is_some_and(KnuthPenalty::is_forced)
    }

    /// Glue and penalties vanish at the top of a page or column.
    pub fn is_discardable(&self) -> bool {
        !self.is_box()
    }

    pub fn footnotes(&self) -> &[FootnoteRef] {
        match self {
            KnuthElement::Box(b) => &b.footnotes,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_value_is_clamped() {
        let p = KnuthElement::penalty(0, 5_000, BreakClass::Auto, Position::None);
        assert_eq!(p.as_penalty().map(|p| p.value), Some(INFINITE));
        assert!(!p.as_penalty().is_some_and(KnuthPenalty::is_legal));

        let forced = KnuthElement::forced_break(BreakClass::Page, Position::None);
        assert!(forced.is_forced_break());
        assert!(forced.is_discardable());
    }

    #[test]
    fn test_keep_break_uses_keep_penalty() {
        let keep = Keep::from(folio_style::KeepProperty::always());
        let p = KnuthElement::keep_break(keep, Position::None);
        let p = p.as_penalty().unwrap();
        assert_eq!(p.value, INFINITE);
        assert_eq!(p.break_class, BreakClass::Page);
    }
}
