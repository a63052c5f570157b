//! Joint stepping over parallel element lists.
//!
//! Every step ends, for each sequence taking part, at one of the sequence's
//! own legal breaks. Sequences that would overshoot the chosen step sit the
//! step out and are scanned again from the same place next time.

use crate::element_list::ElementRange;
use crate::elements::{FootnoteRef, KnuthElement};
use folio_style::BreakClass;
use folio_types::Length;

/// One chunk of a sequence: the elements from a start index up to the next
/// legal break.
#[derive(Debug, Clone, Default)]
pub struct ScannedBreak {
    /// Last element included in the chunk.
    pub end: usize,
    /// The element the break is taken at, `None` when the chunk runs to the
    /// end of the sequence. A glue break is not part of the chunk; it opens
    /// the next one.
    pub break_at: Option<usize>,
    /// Box and glue widths of the chunk.
    pub content_length: Length,
    /// Glue widths before the first box, dropped when the chunk starts a page.
    pub cond_before: Length,
    pub penalty_length: Length,
    pub penalty_value: i32,
    /// Set only when the chunk ends on a forced break.
    pub break_class: BreakClass,
    pub footnotes: Vec<FootnoteRef>,
}

impl ScannedBreak {
    /// Where the following chunk starts.
    pub fn next_start(&self) -> usize {
        match self.break_at {
            Some(at) if at > self.end => at,
            _ => self.end + 1,
        }
    }

    pub fn ends_on_forced_break(&self) -> bool {
        !self.break_class.is_auto()
    }
}

/// Scans `elements` from `start` to the next legal break. Returns `None`
/// when nothing is left.
pub fn scan_to_break(elements: &[KnuthElement], start: usize) -> Option<ScannedBreak> {
    if start >= elements.len() {
        return None;
    }
    let mut scan = ScannedBreak::default();
    let mut prev_is_box = false;
    let mut seen_box = false;
    for (index, el) in elements.iter().enumerate().skip(start) {
        match el {
            KnuthElement::Penalty(p) => {
                if p.is_legal() {
                    scan.end = index;
                    scan.break_at = Some(index);
                    scan.penalty_length = p.width;
                    scan.penalty_value = p.value;
                    if let Some(class) = p.forced_break_class() {
                        scan.break_class = class;
                    }
                    return Some(scan);
                }
                prev_is_box = false;
            }
            KnuthElement::Glue(g) => {
                if prev_is_box {
                    scan.end = index - 1;
                    scan.break_at = Some(index);
                    return Some(scan);
                }
                scan.content_length += g.width;
                if !seen_box {
                    scan.cond_before += g.width;
                }
                prev_is_box = false;
            }
            KnuthElement::Box(b) => {
                scan.content_length += b.width;
                scan.footnotes.extend(b.footnotes.iter().cloned());
                seen_box = true;
                prev_is_box = true;
            }
        }
    }
    scan.end = elements.len() - 1;
    Some(scan)
}

/// One joint step over all sequences.
#[derive(Debug, Clone)]
pub struct JointStep {
    /// Cumulative length reached by the sequences taking part.
    pub step: Length,
    /// Elements newly included per sequence; empty for sequences sitting the
    /// step out.
    pub ranges: Vec<ElementRange>,
    /// The chunk included per sequence.
    pub chunks: Vec<Option<ScannedBreak>>,
    /// Cumulative included length per sequence once the step is taken.
    pub heights: Vec<Length>,
}

impl JointStep {
    pub fn footnotes(&self) -> impl Iterator<Item = &FootnoteRef> {
        self.chunks.iter().flatten().flat_map(|c| c.footnotes.iter())
    }
}

/// Steps K parallel sequences in lock-step.
///
/// The very first step takes the largest first chunk, so the smallest piece
/// holds content from every sequence. Later steps take the smallest growth.
#[derive(Debug, Clone)]
pub struct StepComputer<'a> {
    sequences: Vec<&'a [KnuthElement]>,
    starts: Vec<usize>,
    heights: Vec<Length>,
}

impl<'a> StepComputer<'a> {
    pub fn new(sequences: Vec<&'a [KnuthElement]>) -> Self {
        let n = sequences.len();
        Self {
            sequences,
            starts: vec![0; n],
            heights: vec![0; n],
        }
    }

    /// Cumulative committed length per sequence.
    pub fn heights(&self) -> &[Length] {
        &self.heights
    }

    /// First element not yet included, per sequence.
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn is_exhausted(&self, seq: usize) -> bool {
        self.starts[seq] >= self.sequences[seq].len()
    }

    pub fn is_finished(&self) -> bool {
        (0..self.sequences.len()).all(|i| self.is_exhausted(i))
    }

    /// Computes the next joint step without committing it. `None` once no
    /// sequence can advance.
    pub fn peek(&self) -> Option<JointStep> {
        let first = self.heights.iter().all(|h| *h == 0);
        let mut chunks: Vec<Option<ScannedBreak>> = self
            .sequences
            .iter()
            .zip(&self.starts)
            .map(|(seq, &start)| scan_to_break(seq, start))
            .collect();

        let partials = chunks
            .iter()
            .zip(&self.heights)
            .filter_map(|(chunk, h)| chunk.as_ref().map(|c| h + c.content_length));
        let step = if first { partials.max()? } else { partials.min()? };

        let mut ranges = Vec::with_capacity(chunks.len());
        let mut heights = self.heights.clone();
        for (i, chunk) in chunks.iter_mut().enumerate() {
            let partial = chunk.as_ref().map(|c| self.heights[i] + c.content_length);
            match partial {
                Some(p) if p <= step => {
                    heights[i] = p;
                    let end = chunk.as_ref().map(|c| c.end);
                    ranges.push(ElementRange::new(self.starts[i], end));
                }
                _ => {
                    if partial.is_some() {
                        log::trace!("sequence {} rolled back: {:?} > step {}", i, partial, step);
                    }
                    *chunk = None;
                    ranges.push(ElementRange::new(self.starts[i], None));
                }
            }
        }
        Some(JointStep {
            step,
            ranges,
            chunks,
            heights,
        })
    }

    /// Computes the next joint step and commits it.
    pub fn advance(&mut self) -> Option<JointStep> {
        let step = self.peek()?;
        for (i, chunk) in step.chunks.iter().enumerate() {
            if let Some(c) = chunk {
                self.starts[i] = c.next_start();
            }
        }
        self.heights.clone_from(&step.heights);
        Some(step)
    }
}
