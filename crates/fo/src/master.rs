//! Page masters and page-sequence masters.

use folio_style::Margins;
use folio_style::serde_length;
use folio_types::Length;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION_BODY: &str = "xsl-region-body";

fn default_region_name() -> String {
    DEFAULT_REGION_BODY.to_string()
}

fn default_column_count() -> u32 {
    1
}

fn default_column_gap() -> Length {
    12_000
}

fn default_page_width() -> Length {
    595_276
}

fn default_page_height() -> Length {
    841_890
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMasterSet {
    #[serde(default)]
    pub simple_page_masters: Vec<SimplePageMaster>,
    #[serde(default)]
    pub page_sequence_masters: Vec<PageSequenceMaster>,
}

impl LayoutMasterSet {
    pub fn simple_page_master(&self, name: &str) -> Option<&SimplePageMaster> {
        self.simple_page_masters.iter().find(|m| m.master_name == name)
    }

    pub fn page_sequence_master(&self, name: &str) -> Option<&PageSequenceMaster> {
        self.page_sequence_masters.iter().find(|m| m.master_name == name)
    }
}

/// A page geometry with its body region. Defaults to A4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplePageMaster {
    pub master_name: String,
    #[serde(default = "default_page_width", deserialize_with = "serde_length::deserialize")]
    pub page_width: Length,
    #[serde(default = "default_page_height", deserialize_with = "serde_length::deserialize")]
    pub page_height: Length,
    #[serde(default)]
    pub margin: Margins,
    #[serde(default)]
    pub region_body: RegionBody,
}

impl SimplePageMaster {
    pub fn new(name: impl Into<String>, page_width: Length, page_height: Length) -> Self {
        Self {
            master_name: name.into(),
            page_width,
            page_height,
            margin: Margins::default(),
            region_body: RegionBody::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBody {
    #[serde(default = "default_region_name")]
    pub region_name: String,
    #[serde(default)]
    pub margin: Margins,
    #[serde(default = "default_column_count")]
    pub column_count: u32,
    #[serde(default = "default_column_gap", deserialize_with = "serde_length::deserialize")]
    pub column_gap: Length,
}

impl Default for RegionBody {
    fn default() -> Self {
        Self {
            region_name: default_region_name(),
            margin: Margins::default(),
            column_count: default_column_count(),
            column_gap: default_column_gap(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSequenceMaster {
    pub master_name: String,
    pub sub_sequences: Vec<SubSequence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SubSequence {
    #[serde(rename_all = "camelCase")]
    SinglePageMasterReference { master_reference: String },
    #[serde(rename_all = "camelCase")]
    RepeatablePageMasterReference {
        master_reference: String,
        #[serde(default)]
        maximum_repeats: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    RepeatablePageMasterAlternatives {
        #[serde(default)]
        maximum_repeats: Option<u32>,
        alternatives: Vec<ConditionalMasterReference>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePosition {
    #[default]
    Any,
    First,
    Last,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddOrEven {
    #[default]
    Any,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlankOrNotBlank {
    #[default]
    Any,
    Blank,
    NotBlank,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalMasterReference {
    pub master_reference: String,
    #[serde(default)]
    pub page_position: PagePosition,
    #[serde(default)]
    pub odd_or_even: OddOrEven,
    #[serde(default)]
    pub blank_or_not_blank: BlankOrNotBlank,
}
