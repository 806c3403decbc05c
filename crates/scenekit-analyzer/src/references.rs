//! Scene reference graph.
//!
//! Collects scene definitions (`scene <name>`) and choice targets
//! (`choice "..." -> <name>`) from a snapshot. Extraction is order independent:
//! a choice may target a scene defined further down.
//!
//! Unreachable-scene detection only sees choice arrows. A scene entered some
//! other way (an engine-level jump, an external loader) is reported as
//! unreachable even though it is not; callers must treat that set as
//! informational.

use crate::syntax;
use scenekit_core::source_lines;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a scene is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDefinition {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

/// A choice arrow pointing at a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneReference {
    pub target: String,
    pub line: usize,
    pub column: usize,
}

/// Scene definitions and references of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceGraph {
    definitions: Vec<SceneDefinition>,
    references: Vec<SceneReference>,
    defined: BTreeSet<String>,
    referenced: BTreeSet<String>,
}

impl ReferenceGraph {
    /// Extract the graph from `source`.
    pub fn build(source: &str) -> Self {
        let mut graph = Self::default();

        for line in source_lines(source) {
            if syntax::is_comment(line.text) {
                continue;
            }
            if let Some((name, column)) = syntax::scene_definition(line.text) {
                graph.defined.insert(name.to_string());
                graph.definitions.push(SceneDefinition {
                    name: name.to_string(),
                    line: line.number,
                    column,
                });
            }
            if let Some((target, column)) = syntax::choice_target(line.text) {
                graph.referenced.insert(target.to_string());
                graph.references.push(SceneReference {
                    target: target.to_string(),
                    line: line.number,
                    column,
                });
            }
        }

        tracing::trace!(
            scenes = graph.definitions.len(),
            references = graph.references.len(),
            "reference graph built"
        );
        graph
    }

    /// Definitions in document order (duplicates included).
    pub fn definitions(&self) -> &[SceneDefinition] {
        &self.definitions
    }

    /// References in document order.
    pub fn references(&self) -> &[SceneReference] {
        &self.references
    }

    pub fn defined_scenes(&self) -> &BTreeSet<String> {
        &self.defined
    }

    pub fn referenced_scenes(&self) -> &BTreeSet<String> {
        &self.referenced
    }

    /// The first scene defined in the document.
    pub fn first_scene(&self) -> Option<&str> {
        self.definitions.first().map(|d| d.name.as_str())
    }

    /// Scenes referenced by a choice but never defined.
    pub fn missing_scenes(&self) -> BTreeSet<String> {
        self.referenced.difference(&self.defined).cloned().collect()
    }

    /// Scenes defined but never referenced, excluding the entry scene.
    ///
    /// `entry` defaults to [`first_scene`](Self::first_scene) when `None`.
    pub fn unreachable_scenes(&self, entry: Option<&str>) -> BTreeSet<String> {
        let entry = entry.or_else(|| self.first_scene());
        self.defined
            .difference(&self.referenced)
            .filter(|name| Some(name.as_str()) != entry)
            .cloned()
            .collect()
    }

    /// Every definition after the first one of the same name.
    pub fn duplicate_definitions(&self) -> Vec<&SceneDefinition> {
        let mut seen = BTreeSet::new();
        self.definitions
            .iter()
            .filter(|def| !seen.insert(def.name.as_str()))
            .collect()
    }

    /// First reference to `target`, if any.
    pub fn first_reference_to(&self, target: &str) -> Option<&SceneReference> {
        self.references.iter().find(|r| r.target == target)
    }

    /// Definition of `name`, if any.
    pub fn definition_of(&self, name: &str) -> Option<&SceneDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_missing_scene() {
        let graph = ReferenceGraph::build("scene a {\n choice \"go\" -> b\n}");

        assert_eq!(graph.missing_scenes(), set(&["b"]));
        assert_eq!(graph.defined_scenes(), &set(&["a"]));
        assert_eq!(graph.first_reference_to("b").map(|r| (r.line, r.column)), Some((2, 17)));
    }

    #[test]
    fn test_forward_references_resolve() {
        let source = indoc! {r#"
            scene start {
                choice "Onward" -> middle
            }
            scene middle {
                choice "Finish" -> end
            }
            scene end {
            }
        "#};
        let graph = ReferenceGraph::build(source);

        assert!(graph.missing_scenes().is_empty());
        assert!(graph.unreachable_scenes(None).is_empty());
    }

    #[test]
    fn test_unreachable_excludes_entry() {
        let source = indoc! {r#"
            scene start {
                choice "Go" -> hub
            }
            scene hub {
            }
            scene secret {
            }
        "#};
        let graph = ReferenceGraph::build(source);

        assert_eq!(graph.unreachable_scenes(None), set(&["secret"]));
        assert_eq!(graph.unreachable_scenes(Some("secret")), set(&["start"]));
    }

    #[test]
    fn test_build_is_deterministic() {
        let source = "scene z {\n choice \"a\" -> y\n choice \"b\" -> x\n}\nscene w {}\n";
        let first = ReferenceGraph::build(source);
        let second = ReferenceGraph::build(source);

        assert_eq!(first.missing_scenes(), second.missing_scenes());
        assert_eq!(first.unreachable_scenes(None), second.unreachable_scenes(None));
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicates_and_comments() {
        let source = "scene a {}\n// scene ghost {}\n# choice \"x\" -> ghost2\nscene a {}\n";
        let graph = ReferenceGraph::build(source);

        assert_eq!(graph.definitions().len(), 2);
        let duplicates = graph.duplicate_definitions();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].line, 4);
        assert!(graph.definition_of("ghost").is_none());
        assert!(graph.references().is_empty());
    }

    #[test]
    fn test_choice_without_arrow_is_not_a_reference() {
        let graph = ReferenceGraph::build("scene a {\n  choice \"Wait\"\n}");

        assert!(graph.referenced_scenes().is_empty());
    }
}
