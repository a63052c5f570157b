//! Block- and inline-level formatting objects.

use crate::table::Table;
use folio_style::serde_length;
use folio_style::{
    BorderPadding, BreakClass, FontSpec, KeepProperty, LengthRange, SpaceSpec, TextAlign,
};
use folio_types::{Color, FoId, Length, ResourceUri};
use serde::{Deserialize, Serialize};

/// A node of the flow content tree.
///
/// Block-level nodes (`Block`, `ListBlock`, `Table`, `ExternalGraphic`) stack
/// in the block-progression direction; runs of inline-level nodes (`Text`,
/// `Inline`, `Footnote`, `LineBreak`) inside a block are set as lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FoNode {
    Block(Block),
    ListBlock(ListBlock),
    Table(Table),
    ExternalGraphic(ExternalGraphic),
    Text(TextRun),
    Inline(Inline),
    Footnote(Footnote),
    LineBreak,
}

impl FoNode {
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            FoNode::Text(_) | FoNode::Inline(_) | FoNode::Footnote(_) | FoNode::LineBreak
        )
    }

    pub fn id(&self) -> Option<&FoId> {
        match self {
            FoNode::Block(b) => b.props.id.as_ref(),
            FoNode::ListBlock(l) => l.props.id.as_ref(),
            FoNode::Table(t) => t.props.id.as_ref(),
            FoNode::ExternalGraphic(g) => g.id.as_ref(),
            FoNode::Inline(i) => i.id.as_ref(),
            FoNode::Text(_) | FoNode::Footnote(_) | FoNode::LineBreak => None,
        }
    }

    /// Returns a string identifier for the node type, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FoNode::Block(_) => "block",
            FoNode::ListBlock(_) => "list-block",
            FoNode::Table(_) => "table",
            FoNode::ExternalGraphic(_) => "external-graphic",
            FoNode::Text(_) => "text",
            FoNode::Inline(_) => "inline",
            FoNode::Footnote(_) => "footnote",
            FoNode::LineBreak => "line-break",
        }
    }

    /// A short description naming the node for error messages.
    pub fn describe(&self) -> String {
        match self.id() {
            Some(id) => format!("{} '{}'", self.kind(), id),
            None => self.kind().to_string(),
        }
    }
}

/// Properties shared by block-level formatting objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockProps {
    pub id: Option<FoId>,
    /// `None` inherits the parent's font.
    pub font: Option<FontSpec>,
    pub text_align: Option<TextAlign>,
    #[serde(flatten)]
    pub border_padding: BorderPadding,
    pub background_color: Option<Color>,
    pub space_before: SpaceSpec,
    pub space_after: SpaceSpec,
    #[serde(deserialize_with = "serde_length::deserialize")]
    pub start_indent: Length,
    #[serde(deserialize_with = "serde_length::deserialize")]
    pub end_indent: Length,
    pub break_before: BreakClass,
    pub break_after: BreakClass,
    pub keep_together: KeepProperty,
    pub keep_with_next: KeepProperty,
    pub keep_with_previous: KeepProperty,
    pub block_progression_dimension: LengthRange,
    pub widows: Option<u32>,
    pub orphans: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(flatten)]
    pub props: BlockProps,
    #[serde(default)]
    pub children: Vec<FoNode>,
}

impl Block {
    pub fn new(children: Vec<FoNode>) -> Self {
        Self {
            props: BlockProps::default(),
            children,
        }
    }

    /// A block holding a single run of text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(vec![FoNode::Text(TextRun::new(text))])
    }
}

fn default_label_distance() -> Length {
    24_000
}

fn default_label_separation() -> Length {
    6_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBlock {
    #[serde(flatten)]
    pub props: BlockProps,
    /// Distance from the list's start edge to the body's start edge.
    #[serde(
        default = "default_label_distance",
        deserialize_with = "serde_length::deserialize"
    )]
    pub provisional_distance_between_starts: Length,
    #[serde(
        default = "default_label_separation",
        deserialize_with = "serde_length::deserialize"
    )]
    pub provisional_label_separation: Length,
    #[serde(default)]
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    #[serde(flatten)]
    pub props: BlockProps,
    pub label: ListItemPart,
    pub body: ListItemPart,
}

/// `list-item-label` or `list-item-body`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemPart {
    #[serde(default)]
    pub keep_together: KeepProperty,
    #[serde(default)]
    pub children: Vec<FoNode>,
}

impl ListItemPart {
    pub fn new(children: Vec<FoNode>) -> Self {
        Self {
            keep_together: KeepProperty::default(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalGraphic {
    #[serde(default)]
    pub id: Option<FoId>,
    pub src: ResourceUri,
    #[serde(default, deserialize_with = "serde_length::option::deserialize")]
    pub content_width: Option<Length>,
    #[serde(default, deserialize_with = "serde_length::option::deserialize")]
    pub content_height: Option<Length>,
    #[serde(default)]
    pub space_before: SpaceSpec,
    #[serde(default)]
    pub space_after: SpaceSpec,
    #[serde(default)]
    pub keep_with_next: KeepProperty,
    #[serde(default)]
    pub keep_with_previous: KeepProperty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// An inline carrying its own font for the text below it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inline {
    #[serde(default)]
    pub id: Option<FoId>,
    #[serde(default)]
    pub font: Option<FontSpec>,
    #[serde(default)]
    pub children: Vec<FoNode>,
}

/// An inline footnote: the citation stays in the text, the body goes to the
/// footnote area of the page the citation lands on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footnote {
    #[serde(default)]
    pub inline: Vec<FoNode>,
    #[serde(default)]
    pub body: Vec<FoNode>,
}
