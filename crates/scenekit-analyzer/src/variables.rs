//! Variable table: assignments versus interpolation sites.
//!
//! A variable is "assigned" when a `set <name> = ...` line binds it and
//! "interpolated" when `{<name>}` appears anywhere on a non-comment line.
//! Reads through other syntax (conditions, engine defaults) are invisible
//! here, so both derived sets are hints rather than errors.

use crate::syntax;
use scenekit_core::source_lines;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One place a variable name appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSite {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

/// Assigned and interpolated variables of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableTable {
    assignments: Vec<VariableSite>,
    interpolations: Vec<VariableSite>,
    assigned: BTreeSet<String>,
    interpolated: BTreeSet<String>,
}

impl VariableTable {
    /// Extract the table from `source`.
    pub fn build(source: &str) -> Self {
        let mut table = Self::default();

        for line in source_lines(source) {
            if syntax::is_comment(line.text) {
                continue;
            }
            if let Some((name, column)) = syntax::assignment(line.text) {
                table.assigned.insert(name.to_string());
                table.assignments.push(VariableSite {
                    name: name.to_string(),
                    line: line.number,
                    column,
                });
            }
            for (name, column) in syntax::interpolations(line.text) {
                table.interpolated.insert(name.to_string());
                table.interpolations.push(VariableSite {
                    name: name.to_string(),
                    line: line.number,
                    column,
                });
            }
        }

        table
    }

    pub fn assigned(&self) -> &BTreeSet<String> {
        &self.assigned
    }

    pub fn interpolated(&self) -> &BTreeSet<String> {
        &self.interpolated
    }

    /// Assignment sites in document order.
    pub fn assignments(&self) -> &[VariableSite] {
        &self.assignments
    }

    /// Interpolation sites in document order.
    pub fn interpolations(&self) -> &[VariableSite] {
        &self.interpolations
    }

    /// Variables assigned but never interpolated.
    pub fn unused(&self) -> BTreeSet<String> {
        self.assigned.difference(&self.interpolated).cloned().collect()
    }

    /// Variables interpolated but never assigned.
    pub fn undefined(&self) -> BTreeSet<String> {
        self.interpolated.difference(&self.assigned).cloned().collect()
    }

    /// First assignment of `name`.
    pub fn first_assignment(&self, name: &str) -> Option<&VariableSite> {
        self.assignments.iter().find(|site| site.name == name)
    }

    /// First interpolation of `name`.
    pub fn first_interpolation(&self, name: &str) -> Option<&VariableSite> {
        self.interpolations.iter().find(|site| site.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unused_variable() {
        let table = VariableTable::build("scene a {\n  set health=10\n  \"You feel fine.\"\n}");

        assert_eq!(table.unused(), BTreeSet::from(["health".to_string()]));
        assert_eq!(table.first_assignment("health").map(|s| (s.line, s.column)), Some((2, 7)));
    }

    #[test]
    fn test_interpolated_variable_is_used() {
        let source = indoc! {r#"
            set gold = 5
            set name = "Ari"
            "{name} has {gold} gold and {title}."
        "#};
        let table = VariableTable::build(source);

        assert!(table.unused().is_empty());
        assert_eq!(table.undefined(), BTreeSet::from(["title".to_string()]));
        assert_eq!(table.interpolations().len(), 3);
    }

    #[test]
    fn test_reassignment_counts_once() {
        let table = VariableTable::build("set gold = 1\nset gold = gold + 1\n");

        assert_eq!(table.assignments().len(), 2);
        assert_eq!(table.assigned().len(), 1);
    }

    #[test]
    fn test_comment_lines_ignored() {
        let table = VariableTable::build("// set ghost = 1\n# {phantom}\nset real = 1\n");

        assert_eq!(table.assigned(), &BTreeSet::from(["real".to_string()]));
        assert!(table.interpolated().is_empty());
    }
}
