//! Forced-break granularity shared by penalties, keeps and break-before/after.

use serde::{Deserialize, Serialize};

/// The class of a break: how far the content after it is pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakClass {
    /// No forced break granularity.
    #[default]
    Auto,
    Column,
    Page,
    EvenPage,
    OddPage,
}

impl BreakClass {
    fn priority(self) -> u8 {
        match self {
            BreakClass::Auto => 0,
            BreakClass::Column => 1,
            BreakClass::Page => 2,
            BreakClass::EvenPage | BreakClass::OddPage => 3,
        }
    }

    /// Returns the stronger of two break classes. On equal priority the
    /// receiver wins, so `EvenPage.max_priority(OddPage)` stays `EvenPage`.
    pub fn max_priority(self, other: BreakClass) -> BreakClass {
        if other.priority() > self.priority() { other } else { self }
    }

    pub fn is_auto(self) -> bool {
        self == BreakClass::Auto
    }

    /// True for the classes that end the current page, not just the column.
    pub fn is_page_level(self) -> bool {
        self.priority() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(BreakClass::Auto.max_priority(BreakClass::Column), BreakClass::Column);
        assert_eq!(BreakClass::Page.max_priority(BreakClass::Column), BreakClass::Page);
        assert_eq!(BreakClass::Column.max_priority(BreakClass::OddPage), BreakClass::OddPage);
    }

    #[test]
    fn test_first_operand_wins_ties() {
        assert_eq!(BreakClass::EvenPage.max_priority(BreakClass::OddPage), BreakClass::EvenPage);
        assert_eq!(BreakClass::OddPage.max_priority(BreakClass::EvenPage), BreakClass::OddPage);
    }

    #[test]
    fn test_deserialize_kebab_case() {
        let c: BreakClass = serde_json::from_str("\"even-page\"").unwrap();
        assert_eq!(c, BreakClass::EvenPage);
        assert!(c.is_page_level());
        assert!(!BreakClass::Column.is_page_level());
    }
}
