use crate::area::{TraitKey, TraitValue, Traits};
use crate::position::BlockInfo;
use folio_style::{Border, BorderPadding};
use folio_types::{Color, FoId, Length};

/// Borders, padding and background of one rectangular area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxEdges {
    pub border_before: Border,
    pub border_after: Border,
    pub border_start: Border,
    pub border_end: Border,
    pub padding_before: Length,
    pub padding_after: Length,
    pub padding_start: Length,
    pub padding_end: Length,
    pub background: Option<Color>,
}

impl BoxEdges {
    /// Edges of a block fragment. A fragment that does not hold the start of
    /// the block keeps only the retained part of its before edge; the same
    /// goes for the after edge and the end of the block.
    pub fn from_border_padding(
        bp: &BorderPadding,
        background: Option<Color>,
        draw_before: bool,
        draw_after: bool,
    ) -> Self {
        let mut border_before = bp.border_before;
        border_before.width = bp.border_before_width(!draw_before);
        let mut border_after = bp.border_after;
        border_after.width = bp.border_after_width(!draw_after);
        Self {
            border_before,
            border_after,
            border_start: bp.border_start,
            border_end: bp.border_end,
            padding_before: bp.padding_before.resolve(!draw_before),
            padding_after: bp.padding_after.resolve(!draw_after),
            padding_start: bp.padding_start,
            padding_end: bp.padding_end,
            background,
        }
    }

    pub fn before(&self) -> Length {
        self.border_before.effective_width() + self.padding_before
    }

    pub fn after(&self) -> Length {
        self.border_after.effective_width() + self.padding_after
    }

    /// Writes the visible edges and the background into `traits`.
    pub fn paint(&self, traits: &mut Traits) {
        let borders = [
            (TraitKey::BorderBefore, self.border_before),
            (TraitKey::BorderAfter, self.border_after),
            (TraitKey::BorderStart, self.border_start),
            (TraitKey::BorderEnd, self.border_end),
        ];
        for (key, border) in borders {
            if border.is_visible() {
                traits.set(key, TraitValue::Border(border));
            }
        }
        let paddings = [
            (TraitKey::PaddingBefore, self.padding_before),
            (TraitKey::PaddingAfter, self.padding_after),
            (TraitKey::PaddingStart, self.padding_start),
            (TraitKey::PaddingEnd, self.padding_end),
        ];
        for (key, padding) in paddings {
            if padding > 0 {
                traits.set(key, TraitValue::Length(padding));
            }
        }
        if let Some(color) = self.background {
            traits.set(TraitKey::BackgroundColor, TraitValue::Color(color));
        }
    }
}

/// Identity traits shared by every area a producer generates.
pub fn producer_traits(producer: &'static str, id: Option<&FoId>, is_first: bool, is_last: bool) -> Traits {
    let mut traits = Traits::new().with(TraitKey::Producer, TraitValue::Text(producer.to_string()));
    if let Some(id) = id {
        traits.set(TraitKey::ProducerId, TraitValue::Id(id.clone()));
    }
    traits.set(TraitKey::IsFirst, TraitValue::Flag(is_first));
    traits.set(TraitKey::IsLast, TraitValue::Flag(is_last));
    traits
}

/// Traits of one fragment of a block-level producer.
pub fn block_traits(info: &BlockInfo, is_first: bool, is_last: bool) -> (Traits, BoxEdges) {
    let mut traits = producer_traits(info.producer, info.id.as_ref(), is_first, is_last);
    let edges = BoxEdges::from_border_padding(&info.border_padding, info.background, is_first, is_last);
    edges.paint(&mut traits);
    (traits, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_style::CondLength;

    #[test]
    fn test_discarded_edges_are_not_painted_on_continuation() {
        let mut bp = BorderPadding::uniform(Border::solid(1_000), 2_000);
        bp.padding_after = CondLength::retain(3_000);
        let edges = BoxEdges::from_border_padding(&bp, None, false, false);
        assert_eq!(edges.before(), 0);
        assert_eq!(edges.after(), 3_000);

        let mut traits = Traits::new();
        edges.paint(&mut traits);
        assert!(!traits.contains(TraitKey::BorderBefore));
        assert_eq!(traits.length(TraitKey::PaddingAfter), Some(3_000));
        assert_eq!(traits.border(TraitKey::BorderStart).map(|b| b.width), Some(1_000));
    }

    #[test]
    fn test_block_traits_carry_identity() {
        let info = BlockInfo {
            id: Some(FoId::new("b1")),
            producer: "block",
            background: Some(Color::WHITE),
            ..BlockInfo::default()
        };
        let (traits, edges) = block_traits(&info, true, false);
        assert_eq!(traits.id().map(|i| i.as_str()), Some("b1"));
        assert!(traits.flag(TraitKey::IsFirst));
        assert!(!traits.flag(TraitKey::IsLast));
        assert_eq!(traits.color(TraitKey::BackgroundColor), Some(Color::WHITE));
        assert_eq!(edges.before(), 0);
    }
}
