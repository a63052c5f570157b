//! Tables: columns, header/footer/body sections, rows and cells.

use crate::node::{BlockProps, FoNode};
use folio_style::parsers::length_from_str;
use folio_style::serde_length;
use folio_style::{BorderModel, BorderPadding, BreakClass, KeepProperty, LengthRange};
use folio_types::{Color, FoId, Length};
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(flatten)]
    pub props: BlockProps,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub border_collapse: BorderModel,
    /// Spacing between adjacent cell borders in the separate model.
    #[serde(default, deserialize_with = "serde_length::deserialize")]
    pub border_separation: Length,
    #[serde(default)]
    pub header: Option<TableSection>,
    #[serde(default)]
    pub footer: Option<TableSection>,
    #[serde(default)]
    pub body: Vec<TableSection>,
    #[serde(default)]
    pub table_omit_header_at_break: bool,
    #[serde(default)]
    pub table_omit_footer_at_break: bool,
}

/// Width of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ColumnWidth {
    Fixed(Length),
    /// Share of the width left after fixed columns (`"2*"`).
    Proportional(f32),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Proportional(1.0)
    }
}

impl<'de> Deserialize<'de> for ColumnWidth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColumnWidthDef {
            Num(i64),
            Str(String),
        }

        match ColumnWidthDef::deserialize(deserializer)? {
            ColumnWidthDef::Num(n) => Length::try_from(n)
                .map(ColumnWidth::Fixed)
                .map_err(de::Error::custom),
            ColumnWidthDef::Str(s) => {
                let s = s.trim();
                if s == "auto" {
                    Ok(ColumnWidth::Proportional(1.0))
                } else if let Some(factor) = s.strip_suffix('*') {
                    let factor = if factor.is_empty() { "1" } else { factor };
                    factor
                        .trim()
                        .parse::<f32>()
                        .map(ColumnWidth::Proportional)
                        .map_err(|_| de::Error::custom(format!("Invalid column width: '{}'", s)))
                } else {
                    length_from_str(s).map(ColumnWidth::Fixed).map_err(de::Error::custom)
                }
            }
        }
    }
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    #[serde(default)]
    pub column_width: ColumnWidth,
    #[serde(default = "one")]
    pub number_columns_repeated: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSection {
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowProps {
    pub id: Option<FoId>,
    pub block_progression_dimension: LengthRange,
    pub keep_together: KeepProperty,
    pub keep_with_next: KeepProperty,
    pub keep_with_previous: KeepProperty,
    pub break_before: BreakClass,
    pub break_after: BreakClass,
    pub background_color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(flatten)]
    pub props: RowProps,
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            props: RowProps::default(),
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub id: Option<FoId>,
    /// 1-based column the cell starts in; the next free column when absent.
    #[serde(default)]
    pub column_number: Option<usize>,
    #[serde(default = "one")]
    pub number_columns_spanned: usize,
    #[serde(default = "one")]
    pub number_rows_spanned: usize,
    #[serde(flatten)]
    pub border_padding: BorderPadding,
    #[serde(default)]
    pub background_color: Option<Color>,
    #[serde(default)]
    pub block_progression_dimension: LengthRange,
    #[serde(default)]
    pub keep_together: KeepProperty,
    #[serde(default)]
    pub children: Vec<FoNode>,
}

impl TableCell {
    pub fn new(children: Vec<FoNode>) -> Self {
        Self {
            id: None,
            column_number: None,
            number_columns_spanned: 1,
            number_rows_spanned: 1,
            border_padding: BorderPadding::default(),
            background_color: None,
            block_progression_dimension: LengthRange::default(),
            keep_together: KeepProperty::default(),
            children,
        }
    }
}
