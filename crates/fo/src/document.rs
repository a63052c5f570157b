use crate::FoError;
use crate::master::{DEFAULT_REGION_BODY, LayoutMasterSet};
use crate::node::FoNode;
use crate::table::TableSection;
use folio_types::FoId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The root of a formatting object tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub layout_master_set: LayoutMasterSet,
    #[serde(default)]
    pub page_sequences: Vec<PageSequence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSequence {
    #[serde(default)]
    pub id: Option<FoId>,
    /// Name of a simple-page-master or page-sequence-master.
    pub master_reference: String,
    #[serde(default)]
    pub initial_page_number: Option<u32>,
    pub flow: Flow,
}

fn default_flow_name() -> String {
    DEFAULT_REGION_BODY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    #[serde(default = "default_flow_name")]
    pub flow_name: String,
    #[serde(default)]
    pub children: Vec<FoNode>,
}

impl Flow {
    pub fn new(children: Vec<FoNode>) -> Self {
        Self {
            flow_name: default_flow_name(),
            children,
        }
    }
}

impl Document {
    /// Parses and validates a document.
    pub fn from_json(json: &str) -> Result<Self, FoError> {
        let doc: Document = serde_json::from_str(json)?;
        doc.validate()?;
        log::debug!(
            "Loaded formatting object tree with {} page-sequence(s)",
            doc.page_sequences.len()
        );
        Ok(doc)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, FoError> {
        let doc: Document = serde_json::from_value(value)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Checks constraints that make the whole tree unusable. Problems local to
    /// one page-sequence (such as an unknown master reference) are left to
    /// layout, which reports them per sequence.
    pub fn validate(&self) -> Result<(), FoError> {
        let mut names = HashSet::new();
        let master_names = self
            .layout_master_set
            .simple_page_masters
            .iter()
            .map(|m| &m.master_name)
            .chain(self.layout_master_set.page_sequence_masters.iter().map(|m| &m.master_name));
        for name in master_names {
            if !names.insert(name.as_str()) {
                return Err(FoError::Invalid(format!("Duplicate master name '{}'", name)));
            }
        }

        for master in &self.layout_master_set.simple_page_masters {
            if master.region_body.column_count == 0 {
                return Err(FoError::Invalid(format!(
                    "column-count of region-body in '{}' must be at least 1",
                    master.master_name
                )));
            }
        }

        for seq in &self.page_sequences {
            validate_nodes(&seq.flow.children)?;
        }
        Ok(())
    }
}

fn validate_nodes(nodes: &[FoNode]) -> Result<(), FoError> {
    for node in nodes {
        match node {
            FoNode::Block(b) => validate_nodes(&b.children)?,
            FoNode::Inline(i) => validate_nodes(&i.children)?,
            FoNode::Footnote(f) => {
                validate_nodes(&f.inline)?;
                validate_nodes(&f.body)?;
            }
            FoNode::ListBlock(l) => {
                for item in &l.items {
                    validate_nodes(&item.label.children)?;
                    validate_nodes(&item.body.children)?;
                }
            }
            FoNode::Table(t) => {
                let sections = t.header.iter().chain(t.footer.iter()).chain(t.body.iter());
                for section in sections {
                    validate_section(section)?;
                }
            }
            FoNode::ExternalGraphic(_) | FoNode::Text(_) | FoNode::LineBreak => {}
        }
    }
    Ok(())
}

fn validate_section(section: &TableSection) -> Result<(), FoError> {
    for row in &section.rows {
        for cell in &row.cells {
            if cell.number_columns_spanned == 0 || cell.number_rows_spanned == 0 {
                return Err(FoError::Invalid(
                    "table-cell spans must be at least 1".to_string(),
                ));
            }
            if cell.column_number == Some(0) {
                return Err(FoError::Invalid(
                    "table-cell column-number is 1-based".to_string(),
                ));
            }
            validate_nodes(&cell.children)?;
        }
    }
    Ok(())
}
