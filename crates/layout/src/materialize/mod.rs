//! Turns the elements placed in a column back into areas.
//!
//! Positions are self-describing, so the elements of a column are enough:
//! consecutive elements with the same owner form one area for that owner,
//! recursively, in document order.

mod table;

use crate::area::{Area, BlockArea, InlineArea, LineArea, TraitKey, TraitValue, Traits, ViewportArea};
use crate::element_list::ElementRange;
use crate::elements::{FootnoteRef, KnuthElement};
use crate::painting::box_painter::{block_traits, producer_traits};
use crate::position::{
    BlockInfo, GraphicInfo, LineInfo, ListItemContent, OwnPart, Position, TablePosition,
};
use crate::nodes::table::TableLayout;
use folio_types::{FoId, Length, Rect};
use itertools::Itertools;
use std::sync::Arc;

/// One element as seen from some nesting level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Item<'a> {
    pub width: Length,
    pub position: &'a Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKey {
    Owner(*const BlockInfo),
    ListItem(*const ListItemContent),
    Table(*const TableLayout),
    Single(usize),
}

fn group_key(index: usize, item: &Item<'_>) -> GroupKey {
    match item.position {
        Position::Wrapped { owner, .. } => GroupKey::Owner(Arc::as_ptr(owner)),
        Position::ListItem(p) => GroupKey::ListItem(Arc::as_ptr(&p.item)),
        Position::Table(t) => GroupKey::Table(Arc::as_ptr(t.table())),
        _ => GroupKey::Single(index),
    }
}

/// Items of an element list; penalties hold no content.
pub(crate) fn items(elements: &[KnuthElement]) -> Vec<Item<'_>> {
    elements
        .iter()
        .filter(|el| !el.is_penalty())
        .map(|el| Item {
            width: el.width(),
            position: el.position(),
        })
        .collect()
}

/// Elements of `range`, without the discardable elements at a break.
/// Leading ones are kept when the range starts the list.
pub(crate) fn trimmed<'a>(elements: &'a [KnuthElement], range: ElementRange) -> &'a [KnuthElement] {
    let mut slice = range.slice(elements);
    if range.start > 0 {
        let skip = slice.iter().take_while(|el| el.is_discardable()).count();
        slice = &slice[skip..];
    }
    let keep = slice.len() - slice.iter().rev().take_while(|el| el.is_discardable()).count();
    &slice[..keep]
}

/// Builds areas and records the ids of the nodes that produce them.
#[derive(Debug, Default)]
pub struct Materializer {
    ids: Vec<FoId>,
}

impl Materializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn note_id(&mut self, id: Option<&FoId>) {
        if let Some(id) = id
            && !self.ids.contains(id)
        {
            self.ids.push(id.clone());
        }
    }

    /// Ids seen so far, in first-seen order.
    pub fn take_ids(&mut self) -> Vec<FoId> {
        std::mem::take(&mut self.ids)
    }

    /// Areas of the elements placed in one column of width `width`. Space a
    /// break adds at the top of the column is drawn by the content it
    /// belongs to: a repeated table header, a retained border.
    pub fn column(&mut self, elements: &[KnuthElement], width: Length) -> Vec<Area> {
        let (areas, height) = self.stack(&items(elements), 0, 0, width);
        log::trace!("column: {} areas, height {}", areas.len(), height);
        areas
    }

    /// The footnote bodies of a page stacked in cited order, with `separator`
    /// above the first. Returns the areas and their height.
    pub fn footnotes(&mut self, notes: &[FootnoteRef], width: Length, separator: Length) -> (Vec<Area>, Length) {
        let mut areas = Vec::new();
        let mut y = separator;
        for note in notes {
            let (mut body, height) = self.stack(&items(&note.body), 0, y, width);
            areas.append(&mut body);
            y += height;
        }
        (areas, y)
    }

    /// Stacks `items` downwards from `(x, y)`; returns the areas and the
    /// height they take.
    pub(crate) fn stack(&mut self, items: &[Item<'_>], x: Length, y: Length, width: Length) -> (Vec<Area>, Length) {
        let mut areas = Vec::new();
        let mut cursor = y;
        let groups = items.iter().enumerate().chunk_by(|(i, item)| group_key(*i, item));
        for (_, group) in &groups {
            let group: Vec<Item<'_>> = group.map(|(_, item)| *item).collect();
            match group[0].position {
                Position::Wrapped { owner, .. } => {
                    let area = self.block(owner, &group, x, cursor);
                    cursor += area.rect().height;
                    areas.push(area);
                }
                Position::Line(info) => {
                    areas.push(self.line(info, x, cursor, width));
                    cursor += group[0].width;
                }
                Position::Graphic(info) => {
                    areas.push(self.graphic(info, x, cursor));
                    cursor += group[0].width;
                }
                Position::ListItem(p) => {
                    let height = group.iter().map(|i| i.width).sum::<Length>();
                    let (label, body) = group
                        .iter()
                        .filter_map(|i| match i.position {
                            Position::ListItem(p) => Some((p.label, p.body)),
                            _ => None,
                        })
                        .fold((ElementRange::new(0, None), ElementRange::new(0, None)), |(l, b), (pl, pb)| {
                            (l.union(pl), b.union(pb))
                        });
                    areas.extend(self.list_item(&p.item, label, body, x, cursor));
                    cursor += height;
                }
                Position::Table(_) => {
                    let (mut table_areas, height) = table::table_fragment(self, &group, x, cursor);
                    areas.append(&mut table_areas);
                    cursor += height;
                }
                Position::Own(_) | Position::None => {
                    cursor += group.iter().map(|i| i.width).sum::<Length>();
                }
            }
        }
        (areas, cursor - y)
    }

    fn block(&mut self, owner: &Arc<BlockInfo>, group: &[Item<'_>], x: Length, y: Length) -> Area {
        let mut is_first = false;
        let mut is_last = false;
        let mut inner = Vec::with_capacity(group.len());
        for item in group {
            if let Position::Wrapped {
                inner: pos,
                first,
                last,
                ..
            } = item.position
            {
                is_first |= *first;
                is_last |= *last;
                if !matches!(
                    pos.as_ref(),
                    Position::Own(OwnPart::BorderPaddingBefore | OwnPart::BorderPaddingAfter)
                ) {
                    inner.push(Item {
                        width: item.width,
                        position: pos.as_ref(),
                    });
                }
            }
        }
        self.note_id(owner.id.as_ref());
        let (traits, edges) = block_traits(owner, is_first, is_last);
        let bp = &owner.border_padding;
        let (children, content_height) = self.stack(&inner, bp.start(), edges.before(), owner.content_width());
        let height = edges.before() + content_height + edges.after();
        let mut area = BlockArea::new(Rect::new(x + owner.start_indent, y, owner.width, height), traits);
        area.children = children;
        Area::Block(area)
    }

    fn line(&mut self, info: &LineInfo, x: Length, y: Length, width: Length) -> Area {
        let inlines = info
            .runs
            .iter()
            .map(|run| {
                self.note_id(run.id.as_ref());
                let mut traits = Traits::new()
                    .with(TraitKey::Text, TraitValue::Text(run.text.clone()))
                    .with(TraitKey::Font, TraitValue::Font(run.font.clone()));
                if let Some(id) = &run.id {
                    traits.set(TraitKey::ProducerId, TraitValue::Id(id.clone()));
                }
                Area::Inline(InlineArea {
                    rect: Rect::new(run.x, 0, run.width, info.height),
                    traits,
                })
            })
            .collect();
        Area::Line(LineArea {
            rect: Rect::new(x, y, width, info.height),
            traits: Traits::new(),
            baseline: info.baseline,
            inlines,
        })
    }

    fn graphic(&mut self, info: &GraphicInfo, x: Length, y: Length) -> Area {
        self.note_id(info.id.as_ref());
        let mut traits = producer_traits("external-graphic", info.id.as_ref(), true, true)
            .with(TraitKey::Source, TraitValue::Uri(info.src.clone()));
        if info.placeholder {
            traits.set(TraitKey::Text, TraitValue::Text("[image unavailable]".to_string()));
        }
        Area::Viewport(ViewportArea {
            rect: Rect::new(x, y, info.width, info.height),
            traits,
        })
    }

    /// Label and body areas of the part of a list item on this page.
    fn list_item(
        &mut self,
        item: &ListItemContent,
        label: ElementRange,
        body: ElementRange,
        x: Length,
        y: Length,
    ) -> Vec<Area> {
        let mut out = Vec::with_capacity(2);
        let parts = [
            ("list-item-label", &item.label, label, 0, item.label_width),
            ("list-item-body", &item.body, body, item.body_start, item.body_width),
        ];
        for (producer, elements, range, offset, width) in parts {
            if range.is_empty() {
                continue;
            }
            let slice = trimmed(elements, range);
            let is_first = range.start == 0;
            let is_last = range.end.is_some_and(|e| e + 1 >= elements.len());
            let (children, height) = self.stack(&items(slice), 0, 0, width);
            let mut area = BlockArea::new(
                Rect::new(x + offset, y, width, height),
                producer_traits(producer, None, is_first, is_last),
            );
            area.children = children;
            out.push(Area::Block(area));
        }
        out
    }
}

/// The table a run of table positions belongs to.
fn table_of<'a>(items: &[Item<'a>]) -> Option<&'a Arc<TableLayout>> {
    items.iter().find_map(|i| match i.position {
        Position::Table(t) => Some(t.table()),
        _ => None,
    })
}

/// Table steps placed in a run of table positions.
fn table_positions<'a>(items: &[Item<'a>]) -> impl Iterator<Item = &'a TablePosition> {
    items.iter().filter_map(|i| match i.position {
        Position::Table(t) => Some(t),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{ElementProducer, LayoutContext, LayoutEnvironment};
    use folio_fo::Block;
    use folio_style::{Border, BorderPadding};

    #[test]
    fn test_block_fragment_geometry() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut block = Block::text("hello");
        block.props.id = Some(FoId::new("b"));
        block.props.border_padding = BorderPadding::uniform(Border::solid(1_000), 2_000);
        let out = block.produce_elements(&ctx, &env).unwrap();

        let mut m = Materializer::new();
        let areas = m.column(&out.elements, 100_000);
        assert_eq!(areas.len(), 1);
        let block_area = areas[0].as_block().unwrap();
        assert_eq!(block_area.rect.height, 3_000 + 14_400 + 3_000);
        assert!(block_area.traits.flag(TraitKey::IsFirst));
        assert!(block_area.traits.flag(TraitKey::IsLast));
        let Area::Line(line) = &block_area.children[0] else {
            panic!("expected a line");
        };
        assert_eq!((line.rect.x, line.rect.y), (3_000, 3_000));
        assert_eq!(line.text(), "hello");
        assert_eq!(m.take_ids(), vec![FoId::new("b")]);
    }

    #[test]
    fn test_nested_block_starts_inside_parent_border_and_padding() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut inner = Block::text("inner");
        inner.props.start_indent = 5_000;
        let mut outer = Block::new(vec![folio_fo::FoNode::Block(inner)]);
        outer.props.border_padding = BorderPadding::uniform(Border::solid(1_000), 2_000);
        let out = outer.produce_elements(&ctx, &env).unwrap();

        let mut m = Materializer::new();
        let areas = m.column(&out.elements, 100_000);
        let outer_area = areas[0].as_block().unwrap();
        assert_eq!((outer_area.rect.x, outer_area.rect.width), (0, 100_000));
        let inner_area = outer_area.children[0].as_block().unwrap();
        assert_eq!(
            (inner_area.rect.x, inner_area.rect.y, inner_area.rect.width),
            (3_000 + 5_000, 3_000, 94_000 - 5_000)
        );
        let Area::Line(line) = &inner_area.children[0] else {
            panic!("expected a line");
        };
        assert_eq!(line.rect.x, 0);
    }

    #[test]
    fn test_continued_block_drops_discarded_border() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut block = Block::new(vec![
            folio_fo::FoNode::Block(Block::text("one")),
            folio_fo::FoNode::Block(Block::text("two")),
        ]);
        block.props.border_padding = BorderPadding::uniform(Border::solid(1_000), 0);
        let out = block.produce_elements(&ctx, &env).unwrap();
        // Everything after the first line: the part placed on a second page.
        let second = out.elements.iter().rposition(KnuthElement::is_penalty).unwrap() + 1;

        let mut m = Materializer::new();
        let areas = m.column(&out.elements[second..], 100_000);
        let block_area = areas[0].as_block().unwrap();
        assert!(!block_area.traits.flag(TraitKey::IsFirst));
        assert!(!block_area.traits.contains(TraitKey::BorderBefore));
        assert_eq!(block_area.rect.height, 14_400 + 1_000);
    }

    #[test]
    fn test_trimmed_drops_break_glue() {
        let els = vec![
            KnuthElement::new_box(10, Position::None),
            KnuthElement::glue(5, 0, 0, Position::None),
            KnuthElement::new_box(10, Position::None),
            KnuthElement::glue(5, 0, 0, Position::None),
        ];
        assert_eq!(trimmed(&els, ElementRange::new(1, Some(3))).len(), 1);
        assert_eq!(trimmed(&els, ElementRange::new(0, Some(1))).len(), 1);
    }
}
