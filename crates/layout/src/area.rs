//! The area tree: the positioned output of layout.
//!
//! All geometry is in millipoints and relative to the parent area's origin
//! (the top-left corner of its border box).

use folio_style::{Border, FontSpec};
use folio_types::{Color, FoId, Length, Rect, ResourceUri};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraitKey {
    BorderBefore,
    BorderAfter,
    BorderStart,
    BorderEnd,
    PaddingBefore,
    PaddingAfter,
    PaddingStart,
    PaddingEnd,
    BackgroundColor,
    Font,
    IsFirst,
    IsLast,
    ProducerId,
    Producer,
    Text,
    Source,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraitValue {
    Border(Border),
    Length(Length),
    Color(Color),
    Font(FontSpec),
    Flag(bool),
    Id(FoId),
    Text(String),
    Uri(ResourceUri),
}

/// Closed, ordered trait map with typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traits(BTreeMap<TraitKey, TraitValue>);

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: TraitKey, value: TraitValue) {
        self.0.insert(key, value);
    }

    pub fn with(mut self, key: TraitKey, value: TraitValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: TraitKey) -> Option<&TraitValue> {
        self.0.get(&key)
    }

    pub fn contains(&self, key: TraitKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TraitKey, &TraitValue)> {
        self.0.iter()
    }

    pub fn border(&self, key: TraitKey) -> Option<&Border> {
        match self.get(key) {
            Some(TraitValue::Border(b)) => Some(b),
            _ => None,
        }
    }

    pub fn length(&self, key: TraitKey) -> Option<Length> {
        match self.get(key) {
            Some(TraitValue::Length(l)) => Some(*l),
            _ => None,
        }
    }

    pub fn color(&self, key: TraitKey) -> Option<Color> {
        match self.get(key) {
            Some(TraitValue::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn font(&self) -> Option<&FontSpec> {
        match self.get(TraitKey::Font) {
            Some(TraitValue::Font(f)) => Some(f),
            _ => None,
        }
    }

    pub fn flag(&self, key: TraitKey) -> bool {
        matches!(self.get(key), Some(TraitValue::Flag(true)))
    }

    pub fn id(&self) -> Option<&FoId> {
        match self.get(TraitKey::ProducerId) {
            Some(TraitValue::Id(id)) => Some(id),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.get(TraitKey::Text) {
            Some(TraitValue::Text(t)) => Some(t),
            _ => None,
        }
    }
}

/// Anything that accepts child areas in document order.
pub trait AreaContainer {
    fn add_child_area(&mut self, area: Area);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Area {
    Block(BlockArea),
    Line(LineArea),
    Inline(InlineArea),
    Viewport(ViewportArea),
}

impl Area {
    pub fn rect(&self) -> Rect {
        match self {
            Area::Block(a) => a.rect,
            Area::Line(a) => a.rect,
            Area::Inline(a) => a.rect,
            Area::Viewport(a) => a.rect,
        }
    }

    pub fn traits(&self) -> &Traits {
        match self {
            Area::Block(a) => &a.traits,
            Area::Line(a) => &a.traits,
            Area::Inline(a) => &a.traits,
            Area::Viewport(a) => &a.traits,
        }
    }

    pub fn children(&self) -> &[Area] {
        match self {
            Area::Block(a) => &a.children,
            Area::Line(a) => &a.inlines,
            Area::Inline(_) | Area::Viewport(_) => &[],
        }
    }

    pub fn as_block(&self) -> Option<&BlockArea> {
        match self {
            Area::Block(b) => Some(b),
            _ => None,
        }
    }

    /// Depth-first walk with absolute rectangles.
    pub fn visit<'a>(&'a self, origin: (Length, Length), f: &mut dyn FnMut(&'a Area, Rect)) {
        let r = self.rect();
        let abs = Rect::new(origin.0 + r.x, origin.1 + r.y, r.width, r.height);
        f(self, abs);
        for child in self.children() {
            child.visit((abs.x, abs.y), f);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockArea {
    pub rect: Rect,
    pub traits: Traits,
    pub children: Vec<Area>,
}

impl BlockArea {
    pub fn new(rect: Rect, traits: Traits) -> Self {
        Self {
            rect,
            traits,
            children: Vec::new(),
        }
    }
}

impl AreaContainer for BlockArea {
    fn add_child_area(&mut self, area: Area) {
        self.children.push(area);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineArea {
    pub rect: Rect,
    pub traits: Traits,
    /// Distance from the top of the line to its baseline.
    pub baseline: Length,
    pub inlines: Vec<Area>,
}

impl LineArea {
    pub fn text(&self) -> String {
        self.inlines
            .iter()
            .filter_map(|a| a.traits().text())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineArea {
    pub rect: Rect,
    pub traits: Traits,
}

/// Holds replaced content such as an image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportArea {
    pub rect: Rect,
    pub traits: Traits,
}

/// One column of a span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowArea {
    pub rect: Rect,
    pub children: Vec<Area>,
}

impl AreaContainer for FlowArea {
    fn add_child_area(&mut self, area: Area) {
        self.children.push(area);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanArea {
    pub rect: Rect,
    pub flows: Vec<FlowArea>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainReference {
    pub spans: Vec<SpanArea>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionArea {
    pub region_name: String,
    /// Relative to the page.
    pub rect: Rect,
    pub main: MainReference,
    /// Footnote bodies placed at the bottom of the region.
    pub footnotes: Option<BlockArea>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageViewport {
    /// Zero-based index of the page in its sequence.
    pub page_index: usize,
    pub page_number: u32,
    pub master_name: String,
    pub width: Length,
    pub height: Length,
    pub blank: bool,
    pub region_body: RegionArea,
    /// Ids of nodes that have an area on this page, in first-seen order.
    pub ids: Vec<FoId>,
}

impl PageViewport {
    pub fn flows(&self) -> impl Iterator<Item = &FlowArea> {
        self.region_body.main.spans.iter().flat_map(|s| s.flows.iter())
    }

    /// Depth-first walk of all areas with rectangles relative to the page.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Area, Rect)) {
        let region = self.region_body.rect;
        for span in &self.region_body.main.spans {
            for flow in &span.flows {
                let origin = (region.x + span.rect.x + flow.rect.x, region.y + span.rect.y + flow.rect.y);
                for area in &flow.children {
                    area.visit(origin, f);
                }
            }
        }
        if let Some(footnotes) = &self.region_body.footnotes {
            let origin = (region.x + footnotes.rect.x, region.y + footnotes.rect.y);
            for area in &footnotes.children {
                area.visit(origin, f);
            }
        }
    }

    /// Text of every line on the page, in document order.
    pub fn line_texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.visit(&mut |area, _| {
            if let Area::Line(line) = area {
                out.push(line.text());
            }
        });
        out
    }

    /// Block areas produced by the node with `id`, with page-relative rects.
    pub fn areas_for_id(&self, id: &str) -> Vec<(&BlockArea, Rect)> {
        let mut out = Vec::new();
        self.visit(&mut |area, rect| {
            if let Area::Block(b) = area
                && b.traits.id().is_some_and(|i| i.as_str() == id)
            {
                out.push((b, rect));
            }
        });
        out
    }

    pub fn is_empty(&self) -> bool {
        self.flows().all(|f| f.children.is_empty())
    }
}
