use crate::area::{Area, TraitKey, TraitValue};
use crate::elements::KnuthElement;
use crate::nodes::table::stepper::{BreakExtras, StepperItem, TableStepper};
use crate::nodes::table::{CellLayout, RowLayout, SectionId, SectionLayout};
use crate::position::Position;
use crate::test_utils::*;
use folio_fo::{
    Block, BlockProps, ColumnWidth, FoNode, Table, TableCell, TableColumn, TableRow, TableSection,
    TextRun,
};
use folio_style::{Border, BorderModel, BorderPadding, BreakClass, Keep};
use folio_types::{FoId, Length, MinOptMax};

fn boxes_with_breaks(heights: &[Length]) -> Vec<KnuthElement> {
    let mut out = Vec::new();
    for (i, h) in heights.iter().enumerate() {
        if i > 0 {
            out.push(KnuthElement::penalty(0, 0, BreakClass::Auto, Position::None));
        }
        out.push(KnuthElement::new_box(*h, Position::None));
    }
    out
}

fn one_row_section(height: Length, cells: Vec<Vec<KnuthElement>>) -> SectionLayout {
    let cells = cells
        .into_iter()
        .enumerate()
        .map(|(col, elements)| CellLayout {
            col,
            col_span: 1,
            row_span: 1,
            width: 50_000,
            x: col as Length * 50_000,
            elements,
            ..CellLayout::default()
        })
        .collect();
    SectionLayout {
        rows: vec![RowLayout {
            height: MinOptMax::new(height, height, height),
            ..RowLayout::default()
        }],
        cells,
        groups: vec![0..1],
    }
}

fn run(section: &SectionLayout) -> Vec<StepperItem> {
    init_logging();
    TableStepper::new(section, SectionId::Body(0), 0, Keep::AUTO, BreakExtras::default())
        .run(100)
        .unwrap()
}

#[test]
fn test_row_first_step_is_the_largest_first_break() {
    // Cell A breaks at 50 and 120, cell B only at 80.
    let section = one_row_section(120, vec![boxes_with_breaks(&[50, 70]), boxes_with_breaks(&[80])]);
    let items = run(&section);
    assert_eq!(items.len(), 4);

    let StepperItem::Step { length, step, .. } = &items[0] else {
        panic!("expected a step, got {:?}", items[0]);
    };
    let StepperItem::Break { width, value, .. } = &items[1] else {
        panic!("expected a break, got {:?}", items[1]);
    };
    // The first step is 80: the box and the break together.
    assert_eq!(length + width, 80);
    assert_eq!(*length, 50);
    assert_eq!(*value, 0);
    assert!(step.row_start);
    assert!(!step.row_finished);
    // Cell A stops at its break of 50; the one at 120 is beyond the step.
    assert_eq!(step.parts[0].length, 50);
    assert_eq!(step.parts[0].end, Some(1));
    assert_eq!(step.parts[1].length, 80);
    assert_eq!(step.parts[1].end, Some(0));

    let StepperItem::Step { length, step, .. } = &items[2] else {
        panic!("expected a step, got {:?}", items[2]);
    };
    assert_eq!(*length, 70);
    assert!(step.row_finished);
    assert!(step.last_in_group);
    assert!(step.parts[1].is_empty());
}

#[test]
fn test_steps_conserve_the_row_height() {
    let section = one_row_section(
        100,
        vec![boxes_with_breaks(&[20, 30, 50]), boxes_with_breaks(&[40, 10]), boxes_with_breaks(&[35])],
    );
    let items = run(&section);
    let boxes: Length = items
        .iter()
        .filter_map(|i| match i {
            StepperItem::Step { length, .. } => Some(*length),
            StepperItem::Glue(length) => Some(*length),
            StepperItem::Break { .. } => None,
        })
        .sum();
    assert_eq!(boxes, 100);
}

#[test]
fn test_forced_break_inside_a_cell_forces_the_step_break() {
    let mut forced = boxes_with_breaks(&[30]);
    forced.push(KnuthElement::forced_break(BreakClass::Page, Position::None));
    forced.push(KnuthElement::new_box(30, Position::None));
    let section = one_row_section(60, vec![forced, boxes_with_breaks(&[20])]);
    let items = run(&section);
    let StepperItem::Break { value, break_class, .. } = &items[1] else {
        panic!("expected a break, got {:?}", items[1]);
    };
    assert_eq!(*value, -folio_style::INFINITE);
    assert_eq!(*break_class, BreakClass::Page);
}

#[test]
fn test_unclassed_forced_break_inside_a_cell_still_breaks() {
    let mut forced = boxes_with_breaks(&[30]);
    forced.push(KnuthElement::penalty(0, -folio_style::INFINITE, BreakClass::Auto, Position::None));
    forced.push(KnuthElement::new_box(30, Position::None));
    let section = one_row_section(60, vec![forced, boxes_with_breaks(&[20])]);
    let items = run(&section);
    let StepperItem::Break { value, break_class, .. } = &items[1] else {
        panic!("expected a break, got {:?}", items[1]);
    };
    assert_eq!(*value, -folio_style::INFINITE);
    assert_eq!(*break_class, BreakClass::Column);
}

fn cell(text: &str) -> TableCell {
    TableCell::new(vec![FoNode::Block(Block::text(text))])
}

fn row(texts: &[&str]) -> TableRow {
    TableRow::new(texts.iter().map(|t| cell(t)).collect())
}

fn table(header: Option<TableSection>, rows: Vec<TableRow>) -> Table {
    Table {
        props: BlockProps::default(),
        columns: vec![TableColumn {
            column_width: ColumnWidth::Proportional(1.0),
            number_columns_repeated: 2,
        }],
        border_collapse: BorderModel::Separate,
        border_separation: 0,
        header,
        footer: None,
        body: vec![TableSection { rows }],
        table_omit_header_at_break: false,
        table_omit_footer_at_break: false,
    }
}

fn body_rows(count: usize) -> Vec<TableRow> {
    (1..=count)
        .map(|i| row(&[&format!("a{}", i), &format!("b{}", i)]))
        .collect()
}

fn header() -> Option<TableSection> {
    Some(TableSection {
        rows: vec![row(&["H1", "H2"])],
    })
}

fn texts(rows: std::ops::RangeInclusive<usize>) -> Vec<String> {
    rows.flat_map(|i| [format!("a{}", i), format!("b{}", i)]).collect()
}

#[test]
fn test_table_elements_carry_header_and_breaks() {
    let node = FoNode::Table(table(header(), body_rows(3)));
    let out = produce(&node, 200_000).unwrap();
    let boxes: Vec<Length> = out.elements.iter().filter(|e| e.is_box()).map(|e| e.width()).collect();
    assert_eq!(boxes, vec![LINE; 4]);
    let breaks: Vec<_> = out.elements.iter().filter_map(|e| e.as_penalty()).collect();
    assert_eq!(breaks.len(), 2);
    assert!(breaks.iter().all(|p| p.leading_width == LINE && p.value == 0));
    assert!(!out.elements.last().unwrap().is_penalty());
}

#[test]
fn test_header_repeats_after_page_break() {
    let result = paginate(vec![FoNode::Table(table(header(), body_rows(6)))], 4).unwrap();
    assert_eq!(result.page_count(), 2);

    let mut first = vec!["H1".to_string(), "H2".to_string()];
    first.extend(texts(1..=3));
    let mut second = vec!["H1".to_string(), "H2".to_string()];
    second.extend(texts(4..=6));
    assert_eq!(page_texts(&result), vec![first, second]);
}

#[test]
fn test_omitted_header_is_not_repeated() {
    let mut t = table(header(), body_rows(6));
    t.table_omit_header_at_break = true;
    let result = paginate(vec![FoNode::Table(t)], 4).unwrap();
    assert_eq!(result.page_count(), 2);
    assert_eq!(result.pages[1].line_texts(), texts(4..=6));
}

#[test]
fn test_cells_are_placed_in_column_order() {
    let result = paginate(vec![FoNode::Table(table(None, body_rows(2)))], 4).unwrap();
    let mut cells = Vec::new();
    result.pages[0].visit(&mut |area, rect| {
        if let Area::Block(b) = area
            && b.traits.get(TraitKey::Producer) == Some(&TraitValue::Text("table-cell".to_string()))
        {
            cells.push((rect.x, rect.y, rect.width, rect.height));
        }
    });
    assert_eq!(
        cells,
        vec![
            (0, 0, 100_000, LINE),
            (100_000, 0, 100_000, LINE),
            (0, LINE, 100_000, LINE),
            (100_000, LINE, 100_000, LINE),
        ]
    );
}

#[test]
fn test_row_spanning_cell_covers_both_rows() {
    let mut spanning = TableCell::new(vec![FoNode::Block(Block::new(vec![
        FoNode::Text(TextRun::new("x")),
        FoNode::LineBreak,
        FoNode::Text(TextRun::new("y")),
    ]))]);
    spanning.number_rows_spanned = 2;
    spanning.id = Some(FoId::new("span"));
    let rows = vec![
        TableRow::new(vec![spanning, cell("b1")]),
        TableRow::new(vec![cell("b2")]),
    ];
    let result = paginate(vec![FoNode::Table(table(None, rows))], 4).unwrap();
    let areas = result.pages[0].areas_for_id("span");
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].1.height, 2 * LINE);
}

#[test]
fn test_cell_borders_and_padding_are_painted() {
    let mut bordered = cell("boxed");
    bordered.border_padding = BorderPadding::uniform(Border::solid(1_000), 2_000);
    bordered.id = Some(FoId::new("c"));
    let rows = vec![TableRow::new(vec![bordered, cell("plain")])];
    let result = paginate(vec![FoNode::Table(table(None, rows))], 4).unwrap();

    let areas = result.pages[0].areas_for_id("c");
    let (area, rect) = areas[0];
    assert_eq!(rect.height, LINE + 6_000);
    assert_eq!(area.traits.border(TraitKey::BorderBefore).map(|b| b.width), Some(1_000));
    assert_eq!(area.traits.length(TraitKey::PaddingBefore), Some(2_000));

    let mut line_origin = None;
    area.children[0].visit((rect.x, rect.y), &mut |a, r| {
        if let Area::Line(_) = a {
            line_origin.get_or_insert((r.x, r.y));
        }
    });
    assert_eq!(line_origin, Some((3_000, 3_000)));
}
