use crate::LayoutError;
use crate::elements::FootnoteRef;
use crate::interface::{LayoutContext, LayoutEnvironment};
use crate::nodes::{ParagraphOptions, produce_children, stack_children};
use folio_fo::FoNode;
use folio_style::{FontSpec, Keep};
use folio_types::{FoId, Length};

/// Inline content flattened into measured words and break opportunities.
#[derive(Debug, Clone)]
pub enum InlineItem {
    Word {
        text: String,
        font: FontSpec,
        id: Option<FoId>,
        width: Length,
    },
    /// A collapsed run of white space; the only place a line may break
    /// besides an explicit line break.
    Space { font: FontSpec, width: Length },
    LineBreak { font: FontSpec },
    Footnote(FootnoteRef),
}

/// Walks inline nodes and produces [`InlineItem`]s. White space collapses
/// to a single space between words.
pub struct InlineBuilder<'a> {
    ctx: &'a LayoutContext,
    env: &'a LayoutEnvironment,
    options: &'a ParagraphOptions,
    items: Vec<InlineItem>,
    pending_space: Option<FontSpec>,
}

impl<'a> InlineBuilder<'a> {
    pub fn new(ctx: &'a LayoutContext, env: &'a LayoutEnvironment, options: &'a ParagraphOptions) -> Self {
        Self {
            ctx,
            env,
            options,
            items: Vec::new(),
            pending_space: None,
        }
    }

    pub fn process(&mut self, nodes: &[FoNode], font: &FontSpec, id: Option<&FoId>) -> Result<(), LayoutError> {
        for node in nodes {
            match node {
                FoNode::Text(run) => self.push_text(&run.text, font, id),
                FoNode::Inline(inline) => {
                    let font = inline.font.as_ref().unwrap_or(font);
                    let id = inline.id.as_ref().or(id);
                    self.process(&inline.children, font, id)?;
                }
                FoNode::LineBreak => {
                    self.pending_space = None;
                    self.items.push(InlineItem::LineBreak { font: font.clone() });
                }
                FoNode::Footnote(footnote) => {
                    self.process(&footnote.inline, font, id)?;
                    let body = produce_children(&footnote.body, self.ctx, self.env, self.options)?;
                    let body = stack_children(body, Keep::AUTO);
                    self.items.push(InlineItem::Footnote(FootnoteRef::new(body.elements)));
                }
                other => {
                    return Err(LayoutError::ElementProduction {
                        node: other.describe(),
                        message: "block-level node inside inline content".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str, font: &FontSpec, id: Option<&FoId>) {
        let mut word = String::new();
        for c in text.chars() {
            if c.is_whitespace() {
                self.flush_word(&mut word, font, id);
                self.pending_space = Some(font.clone());
            } else {
                word.push(c);
            }
        }
        self.flush_word(&mut word, font, id);
    }

    fn flush_word(&mut self, word: &mut String, font: &FontSpec, id: Option<&FoId>) {
        if word.is_empty() {
            return;
        }
        if let Some(space_font) = self.pending_space.take()
            && self.items.last().is_some_and(|last| !matches!(last, InlineItem::LineBreak { .. }))
        {
            let width = self.env.glyph_width(&space_font, ' ');
            self.items.push(InlineItem::Space {
                font: space_font,
                width,
            });
        }
        let text = std::mem::take(word);
        let width = self.env.text_width(font, &text);
        self.items.push(InlineItem::Word {
            text,
            font: font.clone(),
            id: id.cloned(),
            width,
        });
    }

    pub fn finish(self) -> Vec<InlineItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_fo::{Inline, TextRun};

    fn text(s: &str) -> FoNode {
        FoNode::Text(TextRun::new(s))
    }

    #[test]
    fn test_white_space_collapses_between_runs() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let options = ParagraphOptions::default();
        let mut builder = InlineBuilder::new(&ctx, &env, &options);
        let nodes = vec![
            text("  one   two "),
            FoNode::Inline(Inline {
                children: vec![text(" three")],
                ..Inline::default()
            }),
        ];
        builder.process(&nodes, &FontSpec::default(), None).unwrap();
        let items = builder.finish();
        let kinds: Vec<&str> = items
            .iter()
            .map(|i| match i {
                InlineItem::Word { .. } => "w",
                InlineItem::Space { .. } => "s",
                InlineItem::LineBreak { .. } => "b",
                InlineItem::Footnote(_) => "f",
            })
            .collect();
        assert_eq!(kinds, vec!["w", "s", "w", "s", "w"]);
        match &items[0] {
            InlineItem::Word { text, width, .. } => {
                assert_eq!(text, "one");
                // 3 glyphs at 500/1000 of 12pt
                assert_eq!(*width, 18_000);
            }
            _ => unreachable!(),
        }
    }
}
