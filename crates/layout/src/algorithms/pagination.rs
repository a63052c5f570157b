//! First-fit page breaking over a flow's element list.
//!
//! Columns are filled one at a time. Discardable elements at the top of a
//! column are dropped, content is added until the next element would
//! overflow, and the column then ends at the cheapest feasible break seen so
//! far, the latest one on ties. A forced break ends the column at once.

use crate::LayoutError;
use crate::elements::{FootnoteRef, KnuthElement, KnuthPenalty};
use folio_style::BreakClass;
use folio_types::Length;
use std::ops::Range;

/// The content of one filled column.
#[derive(Debug, Clone, Default)]
pub struct ColumnFill {
    /// Elements placed in the column, breaks at either end excluded.
    pub range: Range<usize>,
    /// Height taken by the placed elements, footnotes excluded.
    pub height: Length,
    /// Width added at the top by the break that opened the column.
    pub leading_width: Length,
    /// Width added at the bottom by the break that closed the column.
    pub trailing_width: Length,
    pub footnotes: Vec<FootnoteRef>,
    /// Set when the column ended on a forced break.
    pub break_class: BreakClass,
    /// Content did not fit even an empty column and was placed anyway.
    pub overflow: bool,
}

impl ColumnFill {
    pub fn footnote_height(&self) -> Length {
        self.footnotes.iter().map(|f| f.length).sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Index of the break element.
    index: usize,
    value: i32,
    height: Length,
    width: Length,
    leading_width: Length,
    next_start: usize,
    footnote_count: usize,
    footnote_height: Length,
}

/// Walks a flow's element list column by column.
pub struct PageBreaker<'a> {
    elements: &'a [KnuthElement],
    position: usize,
    pending_leading: Length,
    footnote_separator: Length,
    fills: usize,
    limit: usize,
}

impl<'a> PageBreaker<'a> {
    pub fn new(elements: &'a [KnuthElement], footnote_separator: Length, limit: usize) -> Self {
        Self {
            elements,
            position: 0,
            pending_leading: 0,
            footnote_separator,
            fills: 0,
            limit,
        }
    }

    /// Discardable elements at the current position are skipped.
    fn skip_discardables(&mut self) -> BreakClass {
        let mut class = BreakClass::Auto;
        while let Some(el) = self.elements.get(self.position) {
            if !el.is_discardable() {
                break;
            }
            if let Some(forced) = el.as_penalty().and_then(KnuthPenalty::forced_break_class) {
                class = class.max_priority(forced);
            }
            self.position += 1;
        }
        class
    }

    /// Strongest forced break among the discardable elements the next column
    /// would drop. Lets the caller honour page parity before starting a page.
    pub fn leading_break_class(&self) -> BreakClass {
        self.elements[self.position.min(self.elements.len())..]
            .iter()
            .take_while(|el| el.is_discardable())
            .filter_map(KnuthElement::as_penalty)
            .filter_map(KnuthPenalty::forced_break_class)
            .fold(BreakClass::Auto, BreakClass::max_priority)
    }

    pub fn is_finished(&self) -> bool {
        self.elements[self.position.min(self.elements.len())..]
            .iter()
            .all(|el| el.is_discardable())
    }

    /// Fills the next column of height `available`. `footnotes_placed` tells
    /// whether the page already holds footnotes, in which case no separator
    /// is reserved again.
    pub fn next_column(
        &mut self,
        available: Length,
        footnotes_placed: bool,
    ) -> Result<Option<ColumnFill>, LayoutError> {
        self.skip_discardables();
        if self.position >= self.elements.len() {
            return Ok(None);
        }
        self.fills += 1;
        if self.fills > self.limit {
            return Err(LayoutError::StepExhaustion {
                context: "page breaker".to_string(),
                limit: self.limit,
            });
        }

        let start = self.position;
        let leading = std::mem::take(&mut self.pending_leading);
        let mut height = leading;
        let mut footnotes: Vec<FootnoteRef> = Vec::new();
        let mut footnote_height = 0;
        let mut best: Option<Candidate> = None;
        let mut prev_is_box = false;
        let mut overflow = false;

        let candidate = |index, value, height, width, leading_width, next_start, footnotes: &Vec<FootnoteRef>, fh| Candidate {
            index,
            value,
            height,
            width,
            leading_width,
            next_start,
            footnote_count: footnotes.len(),
            footnote_height: fh,
        };

        let mut index = start;
        while index < self.elements.len() {
            match &self.elements[index] {
                KnuthElement::Box(b) => {
                    let mut extra = 0;
                    if !b.footnotes.is_empty() {
                        extra = b.footnotes.iter().map(|f| f.length).sum::<Length>();
                        if footnote_height == 0 && !footnotes_placed {
                            extra += self.footnote_separator;
                        }
                    }
                    if height + b.width + footnote_height + extra > available {
                        if let Some(c) = best {
                            return Ok(Some(self.close(start, leading, c, footnotes, false)));
                        }
                        if !overflow {
                            log::warn!(
                                "content at element {} does not fit an empty column of {}; placed anyway",
                                index,
                                available
                            );
                            overflow = true;
                        }
                    }
                    height += b.width;
                    footnote_height += extra;
                    footnotes.extend(b.footnotes.iter().cloned());
                    prev_is_box = true;
                }
                KnuthElement::Glue(g) => {
                    if prev_is_box {
                        if overflow {
                            let c = candidate(index, 0, height, 0, 0, index, &footnotes, footnote_height);
                            return Ok(Some(self.close(start, leading, c, footnotes, true)));
                        }
                        if height + footnote_height <= available
                            && best.is_none_or(|b| b.value >= 0)
                        {
                            best = Some(candidate(index, 0, height, 0, 0, index, &footnotes, footnote_height));
                        }
                    }
                    height += g.width;
                    prev_is_box = false;
                }
                KnuthElement::Penalty(p) => {
                    prev_is_box = false;
                    if let Some(forced) = p.forced_break_class() {
                        let c = candidate(index, p.value, height, p.width, p.leading_width, index + 1, &footnotes, footnote_height);
                        let mut fill = self.close(start, leading, c, footnotes, overflow);
                        fill.break_class = forced;
                        return Ok(Some(fill));
                    }
                    if p.is_legal() {
                        let c = candidate(index, p.value, height, p.width, p.leading_width, index + 1, &footnotes, footnote_height);
                        if overflow {
                            return Ok(Some(self.close(start, leading, c, footnotes, true)));
                        }
                        if height + p.width + footnote_height <= available {
                            if best.is_none_or(|b| p.value <= b.value) {
                                best = Some(c);
                            }
                        } else if let Some(b) = best {
                            return Ok(Some(self.close(start, leading, b, footnotes, false)));
                        }
                    }
                }
            }
            index += 1;
        }

        if height + footnote_height > available && !overflow {
            if let Some(c) = best {
                return Ok(Some(self.close(start, leading, c, footnotes, false)));
            }
        }
        self.position = self.elements.len();
        let fill = ColumnFill {
            range: start..self.elements.len(),
            height,
            leading_width: leading,
            trailing_width: 0,
            footnotes,
            break_class: BreakClass::Auto,
            overflow,
        };
        log::trace!("last column: elements {:?} height {}", fill.range, fill.height);
        Ok(Some(fill))
    }

    fn close(
        &mut self,
        start: usize,
        leading: Length,
        c: Candidate,
        mut footnotes: Vec<FootnoteRef>,
        overflow: bool,
    ) -> ColumnFill {
        footnotes.truncate(c.footnote_count);
        self.position = c.next_start;
        self.pending_leading = c.leading_width;
        let fill = ColumnFill {
            range: start..c.index,
            height: c.height,
            leading_width: leading,
            trailing_width: c.width,
            footnotes,
            break_class: BreakClass::Auto,
            overflow,
        };
        log::trace!(
            "column break at {} (value {}): elements {:?} height {} footnotes {}",
            c.index,
            c.value,
            fill.range,
            fill.height,
            c.footnote_height
        );
        fill
    }
}
