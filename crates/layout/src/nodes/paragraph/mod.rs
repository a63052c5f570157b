//! Paragraphs: inline content set as lines.
//!
//! Lines are filled greedily. Each line becomes one box; between two lines
//! sits a penalty that forbids the break where it would leave fewer than
//! `orphans` lines before it or fewer than `widows` lines after it.

pub mod builder;

use self::builder::{InlineBuilder, InlineItem};
use crate::LayoutError;
use crate::elements::{FootnoteRef, KnuthElement};
use crate::interface::{LayoutContext, LayoutEnvironment};
use crate::position::{InlineRun, LineInfo, Position};
use folio_fo::FoNode;
use folio_style::{BreakClass, FontSpec, INFINITE, TextAlign};
use folio_types::{FoId, Length};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphOptions {
    pub widows: u32,
    pub orphans: u32,
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        Self {
            widows: 2,
            orphans: 2,
        }
    }
}

#[derive(Debug, Clone)]
enum Piece {
    Word {
        text: String,
        font: FontSpec,
        id: Option<FoId>,
        width: Length,
    },
    Space(Length),
    Footnote(FootnoteRef),
}

impl Piece {
    fn width(&self) -> Length {
        match self {
            Piece::Word { width, .. } => *width,
            Piece::Space(w) => *w,
            Piece::Footnote(_) => 0,
        }
    }
}

struct RawLine {
    pieces: Vec<Piece>,
    /// Font of an explicit line break, used to size an empty line.
    break_font: Option<FontSpec>,
    /// Last line of the paragraph or ended by an explicit break.
    hard_end: bool,
}

fn trim_trailing_space(pieces: &mut Vec<Piece>) {
    while let Some(idx) = pieces.iter().rposition(|p| !matches!(p, Piece::Footnote(_)))
        && matches!(pieces[idx], Piece::Space(_))
    {
        pieces.remove(idx);
    }
}

fn break_lines(items: Vec<InlineItem>, ipd: Length) -> Vec<RawLine> {
    let mut lines = Vec::new();
    let mut current: Vec<Piece> = Vec::new();
    let mut width = 0;

    for item in items {
        match item {
            InlineItem::Space { width: w, .. } => {
                if current.iter().any(|p| matches!(p, Piece::Word { .. }))
                    && !matches!(current.last(), Some(Piece::Space(_)))
                {
                    current.push(Piece::Space(w));
                    width += w;
                }
            }
            InlineItem::Word {
                text,
                font,
                id,
                width: w,
            } => {
                current.push(Piece::Word {
                    text,
                    font,
                    id,
                    width: w,
                });
                width += w;
                if width > ipd
                    && let Some(space) = current.iter().rposition(|p| matches!(p, Piece::Space(_)))
                {
                    let rest = current.split_off(space + 1);
                    current.pop();
                    trim_trailing_space(&mut current);
                    lines.push(RawLine {
                        pieces: std::mem::take(&mut current),
                        break_font: None,
                        hard_end: false,
                    });
                    width = rest.iter().map(Piece::width).sum();
                    current = rest;
                }
            }
            InlineItem::LineBreak { font } => {
                trim_trailing_space(&mut current);
                lines.push(RawLine {
                    pieces: std::mem::take(&mut current),
                    break_font: Some(font),
                    hard_end: true,
                });
                width = 0;
            }
            InlineItem::Footnote(f) => current.push(Piece::Footnote(f)),
        }
    }
    trim_trailing_space(&mut current);
    if !current.is_empty() {
        lines.push(RawLine {
            pieces: current,
            break_font: None,
            hard_end: true,
        });
    }
    lines
}

/// Builds the line box for one raw line.
fn set_line(
    line: RawLine,
    ctx: &LayoutContext,
    env: &LayoutEnvironment,
) -> (LineInfo, Vec<FootnoteRef>) {
    let factor = env.config.line_height_factor;
    let mut height = 0;
    let mut baseline = 0;
    let mut fonts: Vec<&FontSpec> = line
        .pieces
        .iter()
        .filter_map(|p| match p {
            Piece::Word { font, .. } => Some(font),
            _ => None,
        })
        .collect();
    if fonts.is_empty() {
        fonts.push(line.break_font.as_ref().unwrap_or(&ctx.font));
    }
    for font in fonts {
        let line_height = font.line_height(factor);
        let ascender = env.ascender(font);
        let descender = env.descender(font);
        let half_leading = (line_height - (ascender - descender)) / 2;
        height = height.max(line_height);
        baseline = baseline.max(half_leading + ascender);
    }

    let natural: Length = line.pieces.iter().map(Piece::width).sum();
    let spaces = line.pieces.iter().filter(|p| matches!(p, Piece::Space(_))).count() as Length;
    let slack = (ctx.ipd - natural).max(0);
    let (offset, extra_per_space, mut remainder) = match ctx.text_align {
        TextAlign::Start => (0, 0, 0),
        TextAlign::Center => (slack / 2, 0, 0),
        TextAlign::End => (slack, 0, 0),
        TextAlign::Justify if !line.hard_end && spaces > 0 => (0, slack / spaces, slack % spaces),
        TextAlign::Justify => (0, 0, 0),
    };

    let mut runs: Vec<InlineRun> = Vec::new();
    let mut footnotes = Vec::new();
    let mut x = offset;
    let mut citations = 0;
    for piece in line.pieces {
        match piece {
            Piece::Word {
                text,
                font,
                id,
                width,
            } => {
                runs.push(InlineRun {
                    x,
                    width,
                    text,
                    font,
                    id,
                });
                x += width;
            }
            Piece::Space(w) => {
                if let Some(last) = runs.last_mut() {
                    last.text.push(' ');
                }
                x += w + extra_per_space;
                if remainder > 0 {
                    x += 1;
                    remainder -= 1;
                }
            }
            Piece::Footnote(f) => {
                citations += 1;
                footnotes.push(f);
            }
        }
    }

    let info = LineInfo {
        height,
        baseline,
        width: x - offset,
        align: ctx.text_align,
        runs,
        footnote_citations: citations,
    };
    (info, footnotes)
}

/// Produces the element list of a run of inline nodes.
pub fn produce_paragraph(
    inlines: &[FoNode],
    ctx: &LayoutContext,
    env: &LayoutEnvironment,
    options: &ParagraphOptions,
) -> Result<Vec<KnuthElement>, LayoutError> {
    let mut builder = InlineBuilder::new(ctx, env, options);
    builder.process(inlines, &ctx.font, None)?;
    let lines = break_lines(builder.finish(), ctx.ipd);
    let count = lines.len();
    log::trace!("paragraph set in {} lines at ipd {}", count, ctx.ipd);

    let mut elements = Vec::with_capacity(count * 2);
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            let protected = i < options.orphans as usize || count - i < options.widows as usize;
            let value = if protected { INFINITE } else { 0 };
            elements.push(KnuthElement::penalty(0, value, BreakClass::Auto, Position::None));
        }
        let (info, footnotes) = set_line(line, ctx, env);
        let mut line_box = KnuthElement::new_box(info.height, Position::Line(Arc::new(info)));
        if let KnuthElement::Box(b) = &mut line_box {
            b.footnotes = footnotes;
        }
        elements.push(line_box);
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_list::is_legal_break;
    use folio_fo::{Block, Footnote, TextRun};

    fn text(s: &str) -> FoNode {
        FoNode::Text(TextRun::new(s))
    }

    fn line_texts(elements: &[KnuthElement]) -> Vec<String> {
        elements
            .iter()
            .filter_map(|el| match el.position() {
                Position::Line(info) => Some(info.runs.iter().map(|r| r.text.as_str()).collect()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_greedy_line_filling() {
        let env = LayoutEnvironment::default();
        // 6pt per glyph: "aaaa bbbb" is 54pt wide.
        let ctx = LayoutContext::new(60_000);
        let elements =
            produce_paragraph(&[text("aaaa bbbb cccc dddd")], &ctx, &env, &ParagraphOptions::default()).unwrap();
        assert_eq!(line_texts(&elements), vec!["aaaa bbbb", "cccc dddd"]);
        assert_eq!(elements[0].width(), 14_400);
    }

    #[test]
    fn test_widows_and_orphans_protect_breaks() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(30_000);
        let elements = produce_paragraph(
            &[text("aaaa bbbb cccc dddd eeee")],
            &ctx,
            &env,
            &ParagraphOptions::default(),
        )
        .unwrap();
        // Five lines: only the breaks after line 2 and line 3 are allowed.
        let legal: Vec<usize> = (0..elements.len()).filter(|i| is_legal_break(&elements, *i)).collect();
        assert_eq!(legal, vec![3, 5]);
    }

    #[test]
    fn test_explicit_line_break_and_empty_line() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(100_000);
        let nodes = vec![text("one"), FoNode::LineBreak, FoNode::LineBreak, text("two")];
        let elements = produce_paragraph(&nodes, &ctx, &env, &ParagraphOptions::default()).unwrap();
        assert_eq!(line_texts(&elements), vec!["one", "", "two"]);
    }

    #[test]
    fn test_footnote_attaches_to_citing_line() {
        let env = LayoutEnvironment::default();
        let ctx = LayoutContext::new(60_000);
        let footnote = FoNode::Footnote(Footnote {
            inline: vec![text("1")],
            body: vec![FoNode::Block(Block::text("note"))],
        });
        let nodes = vec![text("aaaa bbbb cccc"), footnote, text(" dddd")];
        let elements = produce_paragraph(&nodes, &ctx, &env, &ParagraphOptions::default()).unwrap();
        assert_eq!(line_texts(&elements), vec!["aaaa bbbb", "cccc1 dddd"]);
        assert!(elements[0].footnotes().is_empty());
        let refs = elements[2].footnotes();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].length, 14_400);
    }

    #[test]
    fn test_justify_spreads_spaces_except_last_line() {
        let env = LayoutEnvironment::default();
        let mut ctx = LayoutContext::new(60_000);
        ctx.text_align = TextAlign::Justify;
        let elements =
            produce_paragraph(&[text("aa bb ccc dddd")], &ctx, &env, &ParagraphOptions::default()).unwrap();
        let Position::Line(first) = elements[0].position() else {
            panic!("expected a line");
        };
        assert_eq!(first.width, 60_000);
        let Position::Line(last) = elements.last().unwrap().position() else {
            panic!("expected a line");
        };
        assert!(last.width < 60_000);
    }
}
