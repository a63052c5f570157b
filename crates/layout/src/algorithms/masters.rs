//! Page master selection.
//!
//! A page-sequence references either a simple-page-master, used for every
//! page, or a page-sequence-master whose sub-sequences are consumed in
//! order as pages are produced.

use crate::LayoutError;
use folio_fo::{
    BlankOrNotBlank, ConditionalMasterReference, LayoutMasterSet, OddOrEven, PagePosition,
    PageSequenceMaster, SimplePageMaster, SubSequence,
};
use folio_types::{Length, Rect};

/// What is known about a page when its master is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConditions {
    /// First page of the page-sequence.
    pub first: bool,
    pub page_number: u32,
    /// The page is inserted to fix page parity and gets no content.
    pub blank: bool,
}

impl PageConditions {
    pub fn is_odd(&self) -> bool {
        self.page_number % 2 == 1
    }

    fn matches(&self, alt: &ConditionalMasterReference) -> bool {
        let position = match alt.page_position {
            PagePosition::Any => true,
            PagePosition::First => self.first,
            PagePosition::Rest => !self.first,
            // The last page is not known while pages are being filled.
            PagePosition::Last => false,
        };
        let parity = match alt.odd_or_even {
            OddOrEven::Any => true,
            OddOrEven::Odd => self.is_odd(),
            OddOrEven::Even => !self.is_odd(),
        };
        let blank = match alt.blank_or_not_blank {
            BlankOrNotBlank::Any => true,
            BlankOrNotBlank::Blank => self.blank,
            BlankOrNotBlank::NotBlank => !self.blank,
        };
        position && parity && blank
    }
}

/// Region-body geometry of a page master.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRegion {
    pub master_name: String,
    pub region_name: String,
    pub page_width: Length,
    pub page_height: Length,
    /// Region-body rectangle relative to the page.
    pub rect: Rect,
    pub column_count: usize,
    pub column_gap: Length,
}

impl PageRegion {
    /// Resolves the body region of `master`.
    pub fn from_master(master: &SimplePageMaster) -> Result<Self, LayoutError> {
        let page = &master.margin;
        let body = &master.region_body.margin;
        let x = page.left + body.left;
        let y = page.top + body.top;
        let width = master.page_width - x - page.right - body.right;
        let height = master.page_height - y - page.bottom - body.bottom;
        if height <= 0 || width <= 0 {
            return Err(LayoutError::structural(
                format!("simple-page-master '{}'", master.master_name),
                format!("region-body has no room ({} x {})", width, height),
            ));
        }
        Ok(Self {
            master_name: master.master_name.clone(),
            region_name: master.region_body.region_name.clone(),
            page_width: master.page_width,
            page_height: master.page_height,
            rect: Rect::new(x, y, width, height),
            column_count: master.region_body.column_count.max(1) as usize,
            column_gap: master.region_body.column_gap,
        })
    }

    pub fn column_width(&self) -> Length {
        let n = self.column_count as Length;
        ((self.rect.width - self.column_gap * (n - 1)) / n).max(0)
    }

    /// Offset of column `index` from the region's start edge.
    pub fn column_x(&self, index: usize) -> Length {
        (self.column_width() + self.column_gap) * index as Length
    }
}

enum MasterSource<'a> {
    Simple(&'a SimplePageMaster),
    Sequence(&'a PageSequenceMaster),
}

/// Hands out the page master for each successive page of a sequence.
pub struct PageMasterSelector<'a> {
    set: &'a LayoutMasterSet,
    source: MasterSource<'a>,
    sub_index: usize,
    /// Pages taken from the current sub-sequence.
    used: u32,
}

impl<'a> PageMasterSelector<'a> {
    pub fn new(set: &'a LayoutMasterSet, reference: &str) -> Result<Self, LayoutError> {
        let source = if let Some(m) = set.simple_page_master(reference) {
            MasterSource::Simple(m)
        } else if let Some(m) = set.page_sequence_master(reference) {
            MasterSource::Sequence(m)
        } else {
            return Err(LayoutError::structural(
                "page-sequence",
                format!("master-reference '{}' names no page master", reference),
            ));
        };
        Ok(Self {
            set,
            source,
            sub_index: 0,
            used: 0,
        })
    }

    fn resolve(&self, name: &str) -> Result<&'a SimplePageMaster, LayoutError> {
        self.set.simple_page_master(name).ok_or_else(|| {
            LayoutError::structural(
                "page-sequence-master",
                format!("master-reference '{}' names no simple-page-master", name),
            )
        })
    }

    /// The master of the next page.
    pub fn next_master(&mut self, conditions: PageConditions) -> Result<&'a SimplePageMaster, LayoutError> {
        let psm = match self.source {
            MasterSource::Simple(m) => return Ok(m),
            MasterSource::Sequence(psm) => psm,
        };
        while let Some(sub) = psm.sub_sequences.get(self.sub_index) {
            let picked = match sub {
                SubSequence::SinglePageMasterReference { master_reference } => {
                    (self.used == 0).then_some(master_reference.as_str())
                }
                SubSequence::RepeatablePageMasterReference {
                    master_reference,
                    maximum_repeats,
                } => maximum_repeats
                    .is_none_or(|max| self.used < max)
                    .then_some(master_reference.as_str()),
                SubSequence::RepeatablePageMasterAlternatives {
                    maximum_repeats,
                    alternatives,
                } => {
                    if maximum_repeats.is_none_or(|max| self.used < max) {
                        alternatives
                            .iter()
                            .find(|alt| conditions.matches(alt))
                            .map(|alt| alt.master_reference.as_str())
                    } else {
                        None
                    }
                }
            };
            match picked {
                Some(name) => {
                    self.used += 1;
                    log::trace!(
                        "page {} uses master '{}' from sub-sequence {}",
                        conditions.page_number,
                        name,
                        self.sub_index
                    );
                    return self.resolve(name);
                }
                None => {
                    self.sub_index += 1;
                    self.used = 0;
                }
            }
        }
        Err(LayoutError::structural(
            format!("page-sequence-master '{}'", psm.master_name),
            format!("sub-sequences exhausted at page {}", conditions.page_number),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(first: bool, page_number: u32) -> PageConditions {
        PageConditions {
            first,
            page_number,
            blank: false,
        }
    }

    fn set_with(sub_sequences: Vec<SubSequence>) -> LayoutMasterSet {
        LayoutMasterSet {
            simple_page_masters: vec![
                SimplePageMaster::new("first", 100_000, 100_000),
                SimplePageMaster::new("odd", 100_000, 100_000),
                SimplePageMaster::new("even", 100_000, 100_000),
            ],
            page_sequence_masters: vec![PageSequenceMaster {
                master_name: "doc".to_string(),
                sub_sequences,
            }],
        }
    }

    fn alt(name: &str, page_position: PagePosition, odd_or_even: OddOrEven) -> ConditionalMasterReference {
        ConditionalMasterReference {
            master_reference: name.to_string(),
            page_position,
            odd_or_even,
            blank_or_not_blank: BlankOrNotBlank::Any,
        }
    }

    #[test]
    fn test_alternatives_follow_position_and_parity() {
        let set = set_with(vec![SubSequence::RepeatablePageMasterAlternatives {
            maximum_repeats: None,
            alternatives: vec![
                alt("first", PagePosition::First, OddOrEven::Any),
                alt("odd", PagePosition::Rest, OddOrEven::Odd),
                alt("even", PagePosition::Rest, OddOrEven::Even),
            ],
        }]);
        let mut selector = PageMasterSelector::new(&set, "doc").unwrap();
        let names: Vec<_> = [cond(true, 1), cond(false, 2), cond(false, 3)]
            .into_iter()
            .map(|c| selector.next_master(c).unwrap().master_name.clone())
            .collect();
        assert_eq!(names, vec!["first", "even", "odd"]);
    }

    #[test]
    fn test_single_then_bounded_repeats_exhaust() {
        let set = set_with(vec![
            SubSequence::SinglePageMasterReference {
                master_reference: "first".to_string(),
            },
            SubSequence::RepeatablePageMasterReference {
                master_reference: "odd".to_string(),
                maximum_repeats: Some(2),
            },
        ]);
        let mut selector = PageMasterSelector::new(&set, "doc").unwrap();
        assert_eq!(selector.next_master(cond(true, 1)).unwrap().master_name, "first");
        assert_eq!(selector.next_master(cond(false, 2)).unwrap().master_name, "odd");
        assert_eq!(selector.next_master(cond(false, 3)).unwrap().master_name, "odd");
        assert!(matches!(
            selector.next_master(cond(false, 4)),
            Err(LayoutError::Structural { .. })
        ));
    }

    #[test]
    fn test_unknown_reference_is_structural() {
        let set = set_with(Vec::new());
        assert!(matches!(
            PageMasterSelector::new(&set, "missing"),
            Err(LayoutError::Structural { .. })
        ));
    }

    #[test]
    fn test_region_geometry_and_columns() {
        let mut master = SimplePageMaster::new("p", 200_000, 300_000);
        master.margin = folio_style::Margins::all(10_000);
        master.region_body.column_count = 2;
        master.region_body.column_gap = 20_000;
        let region = PageRegion::from_master(&master).unwrap();
        assert_eq!(region.rect, Rect::new(10_000, 10_000, 180_000, 280_000));
        assert_eq!(region.column_width(), 80_000);
        assert_eq!(region.column_x(1), 100_000);
    }

    #[test]
    fn test_region_without_room_is_structural() {
        let mut master = SimplePageMaster::new("p", 100_000, 100_000);
        master.margin = folio_style::Margins::all(50_000);
        assert!(PageRegion::from_master(&master).is_err());
    }
}
