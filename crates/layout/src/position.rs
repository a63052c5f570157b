//! Positions tie elements back to the content that produced them.
//!
//! They are self-describing: materialization needs nothing but the positions
//! of the elements that landed on a page to rebuild the areas.

use crate::element_list::ElementRange;
use crate::elements::KnuthElement;
use crate::nodes::table::{TableContentPosition, TableLayout};
use folio_style::{BorderPadding, FontSpec, TextAlign};
use folio_types::{Color, FoId, Length, ResourceUri};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub enum Position {
    /// Carries nothing to materialize (keeps, forced breaks, spacing glue).
    #[default]
    None,
    /// A position of content nested inside a block-level producer.
    Wrapped {
        owner: Arc<BlockInfo>,
        inner: Arc<Position>,
        /// Set on the first / last element of the owner's list.
        first: bool,
        last: bool,
    },
    /// An element belonging to the enclosing owner itself.
    Own(OwnPart),
    Line(Arc<LineInfo>),
    Graphic(Arc<GraphicInfo>),
    ListItem(Arc<ListItemPosition>),
    Table(TablePosition),
}

impl Position {
    pub fn wrap(owner: &Arc<BlockInfo>, inner: Position) -> Position {
        Position::Wrapped {
            owner: Arc::clone(owner),
            inner: Arc::new(inner),
            first: false,
            last: false,
        }
    }

    /// Unwraps one level, returning the owner and the inner position.
    pub fn unwrap_owner(&self) -> Option<(&Arc<BlockInfo>, &Position)> {
        match self {
            Position::Wrapped { owner, inner, .. } => Some((owner, inner.as_ref())),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Position::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnPart {
    BorderPaddingBefore,
    BorderPaddingAfter,
    Space,
    Filler,
}

/// What a block-level producer contributes to its area.
#[derive(Debug, Clone, Default)]
pub struct BlockInfo {
    pub id: Option<FoId>,
    pub producer: &'static str,
    pub border_padding: BorderPadding,
    pub background: Option<Color>,
    /// Offset of the border box from the parent's content start edge.
    pub start_indent: Length,
    /// Inline-progression dimension of the border box.
    pub width: Length,
}

impl BlockInfo {
    pub fn content_width(&self) -> Length {
        (self.width - self.border_padding.start() - self.border_padding.end()).max(0)
    }
}

/// A run of text placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineRun {
    pub x: Length,
    pub width: Length,
    pub text: String,
    pub font: FontSpec,
    pub id: Option<FoId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineInfo {
    pub height: Length,
    /// Distance from the top of the line to the baseline.
    pub baseline: Length,
    pub width: Length,
    pub align: TextAlign,
    pub runs: Vec<InlineRun>,
    pub footnote_citations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicInfo {
    pub id: Option<FoId>,
    pub src: ResourceUri,
    pub width: Length,
    pub height: Length,
    /// True when the image could not be resolved and a placeholder size is
    /// used.
    pub placeholder: bool,
}

/// Label and body element lists of one list-item.
#[derive(Debug)]
pub struct ListItemContent {
    pub label: Vec<KnuthElement>,
    pub body: Vec<KnuthElement>,
    pub label_width: Length,
    pub body_start: Length,
    pub body_width: Length,
}

/// One combined step of a list-item: the label and body elements included
/// in it.
#[derive(Debug, Clone)]
pub struct ListItemPosition {
    pub item: Arc<ListItemContent>,
    pub label: ElementRange,
    pub body: ElementRange,
}

#[derive(Debug, Clone)]
pub enum TablePosition {
    Header(Arc<TableLayout>),
    Footer(Arc<TableLayout>),
    Content(Arc<TableContentPosition>),
    /// A break between steps of the table body.
    Break(Arc<TableLayout>),
}

impl TablePosition {
    pub fn table(&self) -> &Arc<TableLayout> {
        match self {
            TablePosition::Header(t) | TablePosition::Footer(t) | TablePosition::Break(t) => t,
            TablePosition::Content(c) => &c.table,
        }
    }
}
