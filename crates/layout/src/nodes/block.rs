use crate::LayoutError;
use crate::elements::KnuthElement;
use crate::interface::{ElementProducer, LayoutContext, LayoutEnvironment};
use crate::nodes::filler::apply_explicit_height;
use crate::nodes::{BlockElements, ParagraphOptions, produce_children, stack_children};
use crate::position::{BlockInfo, OwnPart, Position};
use folio_fo::{Block, BlockProps};
use folio_style::{BorderPadding, BreakClass, Keep, LengthRange, SpaceSpec};
use std::sync::Arc;

/// What a block-level container adds around the elements of its content:
/// border and padding, spaces, breaks, keeps and an explicit height.
#[derive(Debug, Clone)]
pub struct BlockShell {
    pub info: Arc<BlockInfo>,
    pub space_before: SpaceSpec,
    pub space_after: SpaceSpec,
    pub break_before: BreakClass,
    pub break_after: BreakClass,
    pub keep_together: Keep,
    pub keep_with_previous: Keep,
    pub keep_with_next: Keep,
    pub block_progression_dimension: LengthRange,
}

impl BlockShell {
    pub fn from_props(props: &BlockProps, producer: &'static str, ctx: &LayoutContext) -> Self {
        let info = BlockInfo {
            id: props.id.clone(),
            producer,
            border_padding: props.border_padding,
            background: props.background_color,
            start_indent: props.start_indent,
            width: (ctx.ipd - props.start_indent - props.end_indent).max(0),
        };
        Self {
            info: Arc::new(info),
            space_before: props.space_before,
            space_after: props.space_after,
            break_before: props.break_before,
            break_after: props.break_after,
            keep_together: Keep::from(props.keep_together),
            keep_with_previous: Keep::from(props.keep_with_previous),
            keep_with_next: Keep::from(props.keep_with_next),
            block_progression_dimension: props.block_progression_dimension,
        }
    }

    pub fn border_padding(&self) -> &BorderPadding {
        &self.info.border_padding
    }

    /// Context for the content: the ipd inside indents, borders and padding.
    pub fn content_context(&self, ctx: &LayoutContext, props: &BlockProps) -> LayoutContext {
        ctx.inherit(props.font.as_ref(), props.text_align)
            .with_ipd(self.info.content_width())
    }

    /// Wraps the stacked content into this block's own element list.
    pub fn wrap(&self, inner: BlockElements) -> BlockElements {
        let bp = self.border_padding();
        let mut elements = inner.elements;

        if !self.block_progression_dimension.is_auto() {
            let range = self.block_progression_dimension.to_min_opt_max();
            apply_explicit_height(&mut elements, range.min(), range.opt());
        }

        let retained_before = bp.before(true);
        let retained_after = bp.after(true);
        if !self.keep_together.is_auto() || retained_before > 0 || retained_after > 0 {
            make_glue_breaks_explicit(&mut elements);
        }
        let keep_penalty = self.keep_together.penalty();
        for el in elements.iter_mut() {
            if let KnuthElement::Penalty(p) = el
                && !p.is_forced()
            {
                if !self.keep_together.is_auto() && keep_penalty > p.value {
                    p.value = keep_penalty;
                    p.break_class = self.keep_together.break_class();
                }
                p.width += retained_after;
                p.leading_width += retained_before;
            }
        }

        let mut space_before = self.space_before;
        let mut space_after = self.space_after;
        if bp.before(false) > 0 {
            if !inner.space_before.is_zero() {
                elements.insert(
                    0,
                    KnuthElement::aux_box(inner.space_before.space.opt(), Position::Own(OwnPart::Space)),
                );
            }
            elements.insert(
                0,
                KnuthElement::aux_box(bp.before(false), Position::Own(OwnPart::BorderPaddingBefore)),
            );
        } else {
            space_before = super::resolve_space(inner.space_before, space_before);
        }
        if bp.after(false) > 0 {
            if !inner.space_after.is_zero() {
                elements.push(KnuthElement::aux_box(
                    inner.space_after.space.opt(),
                    Position::Own(OwnPart::Space),
                ));
            }
            elements.push(KnuthElement::aux_box(
                bp.after(false),
                Position::Own(OwnPart::BorderPaddingAfter),
            ));
        } else {
            space_after = super::resolve_space(space_after, inner.space_after);
        }

        if elements.is_empty() && self.info.id.is_some() {
            elements.push(KnuthElement::aux_box(0, Position::Own(OwnPart::Filler)));
        }

        let last = elements.len().saturating_sub(1);
        for (i, el) in elements.iter_mut().enumerate() {
            let inner_pos = std::mem::take(el.position_mut());
            *el.position_mut() = Position::Wrapped {
                owner: Arc::clone(&self.info),
                inner: Arc::new(inner_pos),
                first: i == 0,
                last: i == last,
            };
        }

        BlockElements {
            elements,
            space_before,
            space_after,
            keep_with_previous: self.keep_with_previous.compare(inner.keep_with_previous),
            keep_with_next: self.keep_with_next.compare(inner.keep_with_next),
            break_before: self.break_before.max_priority(inner.break_before),
            break_after: self.break_after.max_priority(inner.break_after),
        }
    }
}

/// Puts a zero penalty in front of every glue that follows a box, so each
/// break opportunity is a penalty that can carry widths and keep values.
fn make_glue_breaks_explicit(elements: &mut Vec<KnuthElement>) {
    let mut i = 1;
    while i < elements.len() {
        if elements[i].is_glue() && elements[i - 1].is_box() {
            elements.insert(i, KnuthElement::penalty(0, 0, BreakClass::Auto, Position::None));
            i += 1;
        }
        i += 1;
    }
}

pub(crate) fn paragraph_options(props: &BlockProps, env: &LayoutEnvironment) -> ParagraphOptions {
    ParagraphOptions {
        widows: props.widows.unwrap_or(env.config.default_widows),
        orphans: props.orphans.unwrap_or(env.config.default_orphans),
    }
}

impl ElementProducer for Block {
    fn produce_elements(
        &self,
        ctx: &LayoutContext,
        env: &LayoutEnvironment,
    ) -> Result<BlockElements, LayoutError> {
        let shell = BlockShell::from_props(&self.props, "block", ctx);
        let inner_ctx = shell.content_context(ctx, &self.props);
        let options = paragraph_options(&self.props, env);
        let children = produce_children(&self.children, &inner_ctx, env, &options)?;
        let stacked = stack_children(children, shell.keep_together);
        Ok(shell.wrap(stacked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_list::{content_length, is_legal_break};
    use folio_fo::FoNode;
    use folio_style::{Border, CondLength, KeepProperty};

    fn para(words: &str) -> FoNode {
        FoNode::Block(Block::text(words))
    }

    #[test]
    fn test_border_padding_boxes_and_wrapping() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut block = Block::new(vec![para("one")]);
        block.props.border_padding = BorderPadding::uniform(Border::solid(1_000), 2_000);
        let out = block.produce_elements(&ctx, &env).unwrap();
        assert_eq!(out.elements.len(), 3);
        assert!(out.elements[0].is_auxiliary());
        assert_eq!(content_length(&out.elements), 3_000 + 14_400 + 3_000);
        let Position::Wrapped { first, last, owner, .. } = out.elements[0].position() else {
            panic!("expected wrapped position");
        };
        assert!(*first && !*last);
        assert_eq!(owner.content_width(), 94_000);
    }

    #[test]
    fn test_keep_together_raises_inner_penalties() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut block = Block::new(vec![para("one"), para("two")]);
        block.props.keep_together = KeepProperty::always();
        let out = block.produce_elements(&ctx, &env).unwrap();
        assert!((0..out.elements.len()).all(|i| !is_legal_break(&out.elements, i)));
    }

    #[test]
    fn test_retained_padding_widens_inner_breaks() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut block = Block::new(vec![para("one"), para("two")]);
        block.props.border_padding.padding_before = CondLength::retain(4_000);
        block.props.border_padding.padding_after = CondLength::retain(5_000);
        let out = block.produce_elements(&ctx, &env).unwrap();
        let penalty = out.elements.iter().find_map(KnuthElement::as_penalty).unwrap();
        assert_eq!(penalty.width, 5_000);
        assert_eq!(penalty.leading_width, 4_000);
    }

    #[test]
    fn test_space_bubbles_without_border() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut inner = Block::text("x");
        inner.props.space_before = SpaceSpec::fixed(8_000);
        let mut outer = Block::new(vec![FoNode::Block(inner)]);
        outer.props.space_before = SpaceSpec::fixed(3_000);
        let out = outer.produce_elements(&ctx, &env).unwrap();
        assert_eq!(out.space_before.space.opt(), 8_000);
        assert_eq!(out.elements.len(), 1);
    }

    #[test]
    fn test_explicit_height_pads_content() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let mut block = Block::text("x");
        block.props.block_progression_dimension = LengthRange::exact(40_000);
        let out = block.produce_elements(&ctx, &env).unwrap();
        assert_eq!(content_length(&out.elements), 40_000);
    }
}
