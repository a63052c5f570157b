//! List items: label and body stepped side by side.
//!
//! The two element lists are combined into one list whose boxes each cover a
//! joint step of the label and the body, so that any break of the combined
//! list is a legal break of both.

use crate::LayoutError;
use crate::algorithms::step::StepComputer;
use crate::element_list::content_length;
use crate::elements::KnuthElement;
use crate::interface::{LayoutContext, LayoutEnvironment};
use crate::nodes::block::{BlockShell, paragraph_options};
use crate::nodes::{BlockElements, produce_children, seal_content, stack_children};
use crate::position::{ListItemContent, ListItemPosition, Position};
use folio_fo::{ListBlock, ListItem, ListItemPart};
use folio_style::{BreakClass, INFINITE, Keep};
use std::sync::Arc;

/// Keeps that shape the breaks between combined steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListItemKeeps {
    pub keep_together: Keep,
    /// Keep-with-next of the label's content, in force once the label ends.
    pub label_keep_with_next: Keep,
    pub body_keep_with_next: Keep,
}

/// Combines the label and body element lists of a list item.
pub fn combine_list_item(
    content: &Arc<ListItemContent>,
    keeps: &ListItemKeeps,
    limit: usize,
) -> Result<Vec<KnuthElement>, LayoutError> {
    let full = [content_length(&content.label), content_length(&content.body)];
    let total = full[0].max(full[1]);
    let mut computer = StepComputer::new(vec![&content.label, &content.body]);
    let mut added = 0;
    let mut keep_with_next_active = Keep::AUTO;
    let mut out = Vec::new();
    let mut iterations = 0;

    while let Some(step) = computer.advance() {
        iterations += 1;
        if iterations > limit {
            return Err(LayoutError::StepExhaustion {
                context: "list-item".to_string(),
                limit,
            });
        }
        if computer.is_exhausted(0) {
            keep_with_next_active = keep_with_next_active.compare(keeps.label_keep_with_next);
        }
        if computer.is_exhausted(1) {
            keep_with_next_active = keep_with_next_active.compare(keeps.body_keep_with_next);
        }

        let heights = computer.heights();
        let max_remaining = (0..2).map(|i| full[i] - heights[i]).max().unwrap_or(0);
        let mut penalty_height = step.step + max_remaining - total;

        let mut additional_penalty_height = 0;
        let mut step_penalty = 0;
        let mut break_class = BreakClass::Auto;
        for chunk in step.chunks.iter().flatten() {
            if chunk.break_at != Some(chunk.end) {
                continue;
            }
            additional_penalty_height = additional_penalty_height.max(chunk.penalty_length);
            step_penalty = if chunk.penalty_value <= -INFINITE || step_penalty <= -INFINITE {
                -INFINITE
            } else {
                step_penalty.max(chunk.penalty_value)
            };
            break_class = break_class.max_priority(chunk.break_class);
        }

        let mut box_height = step.step - added - penalty_height;
        if box_height < 0 {
            log::warn!("list-item step produced a negative box height {}; clamped to 0", box_height);
            box_height = 0;
        }
        penalty_height += additional_penalty_height;
        added += box_height;
        log::trace!(
            "list-item step {}: box {} penalty {} label {:?} body {:?}",
            step.step,
            box_height,
            penalty_height,
            step.ranges[0],
            step.ranges[1]
        );

        let position = Position::ListItem(Arc::new(ListItemPosition {
            item: Arc::clone(content),
            label: step.ranges[0],
            body: step.ranges[1],
        }));
        let mut item_box = KnuthElement::new_box(box_height, position);
        if let KnuthElement::Box(b) = &mut item_box {
            b.footnotes = step.footnotes().cloned().collect();
        }
        out.push(item_box);

        if added < total {
            let keep = keep_with_next_active.compare(keeps.keep_together);
            let mut value = step_penalty;
            if value > -INFINITE {
                value = value.max(keep.penalty());
                break_class = keep.break_class();
            }
            out.push(KnuthElement::break_element(
                Position::None,
                penalty_height.max(0),
                value,
                break_class,
            ));
        }
    }
    Ok(out)
}

/// The stacked content of a label or body, with its keep-together applied.
fn part_elements(
    part: &ListItemPart,
    ctx: &LayoutContext,
    env: &LayoutEnvironment,
    item: &ListItem,
) -> Result<BlockElements, LayoutError> {
    let keep = Keep::from(part.keep_together);
    let options = paragraph_options(&item.props, env);
    let children = produce_children(&part.children, ctx, env, &options)?;
    Ok(seal_content(stack_children(children, keep), keep))
}

/// Produces the elements of one item of `list`.
pub fn produce_list_item(
    item: &ListItem,
    list: &ListBlock,
    ctx: &LayoutContext,
    env: &LayoutEnvironment,
) -> Result<BlockElements, LayoutError> {
    let shell = BlockShell::from_props(&item.props, "list-item", ctx);
    let item_ctx = shell.content_context(ctx, &item.props);
    let ipd = item_ctx.ipd;
    let body_start = list.provisional_distance_between_starts.clamp(0, ipd);
    let label_width = (list.provisional_distance_between_starts - list.provisional_label_separation)
        .clamp(0, body_start);
    let body_width = ipd - body_start;

    let label = part_elements(&item.label, &item_ctx.with_ipd(label_width), env, item)?;
    let body = part_elements(&item.body, &item_ctx.with_ipd(body_width), env, item)?;

    let keeps = ListItemKeeps {
        keep_together: shell.keep_together,
        label_keep_with_next: label.keep_with_next,
        body_keep_with_next: body.keep_with_next,
    };
    let inner = BlockElements {
        keep_with_previous: label.keep_with_previous.compare(body.keep_with_previous),
        keep_with_next: label.keep_with_next.compare(body.keep_with_next),
        break_before: label.break_before.max_priority(body.break_before),
        break_after: label.break_after.max_priority(body.break_after),
        ..BlockElements::default()
    };
    let content = Arc::new(ListItemContent {
        label: label.elements,
        body: body.elements,
        label_width,
        body_start,
        body_width,
    });
    let element_count = content.label.len() + content.body.len();
    let elements = combine_list_item(&content, &keeps, env.config.step_limit(element_count))?;
    Ok(shell.wrap(BlockElements { elements, ..inner }))
}
