use crate::LayoutError;
use crate::engine::{LayoutEngine, SequenceLayout};
use crate::interface::{LayoutContext, LayoutEnvironment};
use crate::nodes::BlockElements;
use folio_fo::{Block, Flow, FoNode, LayoutMasterSet, PageSequence, SimplePageMaster};
use folio_types::{FoId, Length};

/// Height of one line of the default 12pt font.
pub const LINE: Length = 14_400;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_env() -> LayoutEnvironment {
    init_logging();
    LayoutEnvironment::default()
}

pub fn produce(node: &FoNode, ipd: Length) -> Result<BlockElements, LayoutError> {
    crate::nodes::produce_block_level(node, &LayoutContext::new(ipd), &test_env())
}

/// A block with a single line of text.
pub fn line(text: &str) -> Block {
    Block::text(text)
}

pub fn line_with_id(text: &str, id: &str) -> Block {
    let mut block = Block::text(text);
    block.props.id = Some(FoId::new(id));
    block
}

/// One block per text, each a single line.
pub fn lines(texts: &[&str]) -> Vec<FoNode> {
    texts.iter().map(|t| FoNode::Block(line(t))).collect()
}

/// `count` single-line blocks reading "line 1", "line 2", ...
pub fn numbered_lines(count: usize) -> Vec<FoNode> {
    (1..=count)
        .map(|i| FoNode::Block(line(&format!("line {}", i))))
        .collect()
}

/// A master with no margins whose body holds `lines_per_page` lines.
pub fn master(name: &str, lines_per_page: i32) -> SimplePageMaster {
    SimplePageMaster::new(name, 200_000, LINE * lines_per_page + LINE / 2)
}

pub fn masters(list: Vec<SimplePageMaster>) -> LayoutMasterSet {
    LayoutMasterSet {
        simple_page_masters: list,
        page_sequence_masters: Vec::new(),
    }
}

pub fn sequence(master_reference: &str, children: Vec<FoNode>) -> PageSequence {
    PageSequence {
        id: None,
        master_reference: master_reference.to_string(),
        initial_page_number: None,
        flow: Flow::new(children),
    }
}

pub fn layout(set: &LayoutMasterSet, seq: &PageSequence) -> Result<SequenceLayout, LayoutError> {
    LayoutEngine::new(test_env()).layout_sequence(set, seq, 1)
}

/// Lays out `children` on pages of `lines_per_page` lines.
pub fn paginate(children: Vec<FoNode>, lines_per_page: i32) -> Result<SequenceLayout, LayoutError> {
    let set = masters(vec![master("page", lines_per_page)]);
    layout(&set, &sequence("page", children))
}

/// Line texts per page.
pub fn page_texts(result: &SequenceLayout) -> Vec<Vec<String>> {
    result.pages.iter().map(|p| p.line_texts()).collect()
}
