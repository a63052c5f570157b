//! Element-list producers for the formatting objects.

pub mod block;
pub mod filler;
pub mod image;
pub mod list_block;
pub mod list_item;
pub mod paragraph;
pub mod table;

use crate::LayoutError;
use crate::element_list::remove_legal_breaks;
use crate::elements::KnuthElement;
use crate::interface::{ElementProducer, LayoutContext, LayoutEnvironment};
use crate::position::{OwnPart, Position};
use folio_fo::FoNode;
use folio_style::{BreakClass, INFINITE, Keep, SpaceSpec};

pub use self::paragraph::ParagraphOptions;

/// The element list of one block-level child together with what it
/// contributes at its edges.
#[derive(Debug, Clone, Default)]
pub struct BlockElements {
    pub elements: Vec<KnuthElement>,
    pub space_before: SpaceSpec,
    pub space_after: SpaceSpec,
    pub keep_with_previous: Keep,
    pub keep_with_next: Keep,
    pub break_before: BreakClass,
    pub break_after: BreakClass,
}

impl BlockElements {
    pub fn new(elements: Vec<KnuthElement>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Produces the elements of one block-level node.
pub fn produce_block_level(
    node: &FoNode,
    ctx: &LayoutContext,
    env: &LayoutEnvironment,
) -> Result<BlockElements, LayoutError> {
    let result = match node {
        FoNode::Block(b) => b.produce_elements(ctx, env),
        FoNode::ListBlock(l) => l.produce_elements(ctx, env),
        FoNode::Table(t) => t.produce_elements(ctx, env),
        FoNode::ExternalGraphic(g) => g.produce_elements(ctx, env),
        other => Err(LayoutError::ElementProduction {
            node: other.describe(),
            message: "inline content outside of a paragraph".to_string(),
        }),
    };
    result.map_err(|e| match e {
        LayoutError::ElementProduction { .. } | LayoutError::Structural { .. } => e,
        LayoutError::StepExhaustion { .. } => LayoutError::ElementProduction {
            node: node.describe(),
            message: e.to_string(),
        },
    })
}

/// Produces the elements of mixed content: runs of inline nodes become
/// paragraphs, block-level nodes produce their own lists.
pub fn produce_children(
    children: &[FoNode],
    ctx: &LayoutContext,
    env: &LayoutEnvironment,
    options: &ParagraphOptions,
) -> Result<Vec<BlockElements>, LayoutError> {
    let mut out = Vec::new();
    let mut run_start = None;
    for (i, child) in children.iter().enumerate() {
        if child.is_inline() {
            run_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = run_start.take() {
            let lines = paragraph::produce_paragraph(&children[start..i], ctx, env, options)?;
            out.push(BlockElements::new(lines));
        }
        out.push(produce_block_level(child, ctx, env)?);
    }
    if let Some(start) = run_start {
        let lines = paragraph::produce_paragraph(&children[start..], ctx, env, options)?;
        out.push(BlockElements::new(lines));
    }
    Ok(out)
}

/// Stacks the children of a block-level container.
///
/// Between two children goes a forced break if either side asks for one,
/// otherwise a penalty for the strongest keep in force there. The resolved
/// space between them follows as glue. What the first and last child carry
/// at the outer edges is handed up in the result.
pub fn stack_children(children: Vec<BlockElements>, keep_together: Keep) -> BlockElements {
    let mut out = BlockElements::default();
    let mut pending_break = BreakClass::Auto;
    let mut prev: Option<(SpaceSpec, Keep, BreakClass)> = None;

    for child in children {
        if child.is_empty() {
            pending_break = pending_break
                .max_priority(child.break_before)
                .max_priority(child.break_after);
            continue;
        }
        match prev {
            Some((space_after, keep_with_next, break_after)) => {
                let brk = break_after
                    .max_priority(pending_break)
                    .max_priority(child.break_before);
                if brk.is_auto() {
                    let keep = keep_with_next
                        .compare(child.keep_with_previous)
                        .compare(keep_together);
                    out.elements.push(KnuthElement::keep_break(keep, Position::None));
                } else {
                    out.elements.push(KnuthElement::forced_break(brk, Position::None));
                }
                push_space(&mut out.elements, resolve_space(space_after, child.space_before));
            }
            None => {
                out.space_before = child.space_before;
                out.keep_with_previous = child.keep_with_previous;
                out.break_before = pending_break.max_priority(child.break_before);
            }
        }
        pending_break = BreakClass::Auto;
        prev = Some((child.space_after, child.keep_with_next, child.break_after));
        out.elements.extend(child.elements);
    }

    match prev {
        Some((space_after, keep_with_next, break_after)) => {
            out.space_after = space_after;
            out.keep_with_next = keep_with_next;
            out.break_after = break_after.max_priority(pending_break);
        }
        None => out.break_before = pending_break,
    }
    out
}

/// The larger of two adjacent spaces wins; a retained space stays retained.
pub fn resolve_space(after: SpaceSpec, before: SpaceSpec) -> SpaceSpec {
    let winner = if before.space.opt() > after.space.opt() {
        before
    } else {
        after
    };
    SpaceSpec {
        conditionality: if after.is_discardable() && before.is_discardable() {
            winner.conditionality
        } else {
            folio_style::Conditionality::Retain
        },
        ..winner
    }
}

/// Prepares stacked content for a fixed frame (list label or body, table
/// cell): the frame's keep-together is applied to every break and the outer
/// spaces become fixed boxes.
pub(crate) fn seal_content(mut stacked: BlockElements, keep: Keep) -> BlockElements {
    if keep.penalty() >= INFINITE {
        remove_legal_breaks(&mut stacked.elements);
    } else if !keep.is_auto() {
        for el in stacked.elements.iter_mut() {
            if let KnuthElement::Penalty(p) = el
                && !p.is_forced()
            {
                p.value = p.value.max(keep.penalty());
            }
        }
    }
    if !stacked.space_before.is_zero() {
        stacked.elements.insert(
            0,
            KnuthElement::aux_box(stacked.space_before.space.opt(), Position::Own(OwnPart::Space)),
        );
    }
    if !stacked.space_after.is_zero() {
        stacked.elements.push(KnuthElement::aux_box(
            stacked.space_after.space.opt(),
            Position::Own(OwnPart::Space),
        ));
    }
    stacked
}

/// Discardable space becomes glue, retained space an auxiliary box.
fn push_space(elements: &mut Vec<KnuthElement>, space: SpaceSpec) {
    if space.is_zero() {
        return;
    }
    if space.is_discardable() {
        elements.push(KnuthElement::glue(
            space.space.opt(),
            space.space.stretch(),
            space.space.shrink(),
            Position::Own(OwnPart::Space),
        ));
    } else {
        elements.push(KnuthElement::aux_box(space.space.opt(), Position::Own(OwnPart::Space)));
    }
}
