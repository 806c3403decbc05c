//! Line patterns for the story-script surface syntax.
//!
//! These are heuristics over single lines, not a grammar. They recognize:
//! - `scene <name> {` definitions
//! - `choice "<text>" -> <target>` choices
//! - `set <name> = <expr>` assignments
//! - `{<name>}` interpolations
//! - `if` / `elif` / `else` conditional blocks
//! - `//` and `#` comment lines

use regex::Regex;
use std::sync::LazyLock;

static SCENE_DEFINITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*scene\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex")
});

static CHOICE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*choice\b").expect("valid regex"));

static CHOICE_TARGET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"->\s*([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

static ASSIGNMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*set\s+([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("valid regex")
});

static INTERPOLATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}").expect("valid regex")
});

static CONDITIONAL_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\}?\s*(?:if|elif|else)\b").expect("valid regex"));

static CONDITIONAL_BRANCH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\}?\s*(?:else\s+)?(?:if|elif)\b").expect("valid regex")
});

static STRING_LITERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).expect("valid regex"));

/// Kind of a `{ ... }` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Scene,
    Conditional,
    Other,
}

/// Returns true for `//` and `#` comment lines.
pub fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with('#')
}

/// Name and char column of a scene definition on this line.
pub fn scene_definition(line: &str) -> Option<(&str, usize)> {
    let name = SCENE_DEFINITION_REGEX.captures(line)?.get(1)?;
    Some((name.as_str(), char_column(line, name.start())))
}

/// Returns true if the line is a choice.
pub fn is_choice(line: &str) -> bool {
    CHOICE_REGEX.is_match(line)
}

/// Target scene and char column of a choice arrow, if the line is a choice with one.
pub fn choice_target(line: &str) -> Option<(&str, usize)> {
    if !is_choice(line) {
        return None;
    }
    let target = CHOICE_TARGET_REGEX.captures(line)?.get(1)?;
    Some((target.as_str(), char_column(line, target.start())))
}

/// Variable bound by an assignment on this line.
pub fn assignment(line: &str) -> Option<(&str, usize)> {
    let name = ASSIGNMENT_REGEX.captures(line)?.get(1)?;
    Some((name.as_str(), char_column(line, name.start())))
}

/// Variables interpolated on this line, with their char columns.
pub fn interpolations(line: &str) -> impl Iterator<Item = (&str, usize)> {
    INTERPOLATION_REGEX
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(move |name| (name.as_str(), char_column(line, name.start())))
}

/// Returns true if the line starts an `if` / `elif` branch (including `else if`).
pub fn is_conditional_branch(line: &str) -> bool {
    CONDITIONAL_BRANCH_REGEX.is_match(line)
}

/// Kind of the first block a line opens.
pub fn opening_kind(line: &str) -> BlockKind {
    if CONDITIONAL_OPEN_REGEX.is_match(line) {
        BlockKind::Conditional
    } else if SCENE_DEFINITION_REGEX.is_match(line) {
        BlockKind::Scene
    } else {
        BlockKind::Other
    }
}

/// The line with string literals and interpolation markers blanked out, so
/// only structural braces remain.
pub fn structural_text(line: &str) -> String {
    let without_strings = STRING_LITERAL_REGEX.replace_all(line, "");
    INTERPOLATION_REGEX
        .replace_all(&without_strings, "")
        .into_owned()
}

fn char_column(line: &str, byte: usize) -> usize {
    line[..byte].chars().count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scene_definition() {
        assert_eq!(scene_definition("scene intro {"), Some(("intro", 7)));
        assert_eq!(scene_definition("  scene dark_room"), Some(("dark_room", 9)));
        assert_eq!(scene_definition("scenery is nice"), None);
        assert_eq!(scene_definition("\"the scene is set\""), None);
    }

    #[test]
    fn test_choice_target() {
        assert_eq!(choice_target("  choice \"go\" -> b"), Some(("b", 18)));
        assert_eq!(choice_target("choice \"wait\""), None);
        assert_eq!(choice_target("\"a -> b\""), None);
        assert!(is_choice("choice \"wait\""));
        assert!(!is_choice("choices matter"));
    }

    #[test]
    fn test_assignment() {
        assert_eq!(assignment("set health=10"), Some(("health", 5)));
        assert_eq!(assignment("  set gold = gold + 1"), Some(("gold", 7)));
        assert_eq!(assignment("settle down"), None);
        assert_eq!(assignment("set health"), None);
    }

    #[test]
    fn test_interpolations() {
        let found: Vec<_> = interpolations("\"{name} has { gold } coins\"").collect();

        assert_eq!(found, vec![("name", 3), ("gold", 15)]);
        assert_eq!(interpolations("scene a {").count(), 0);
    }

    #[test]
    fn test_comments() {
        assert!(is_comment("// note"));
        assert!(is_comment("   # note"));
        assert!(!is_comment("scene a { // trailing"));
    }

    #[test]
    fn test_conditionals() {
        assert!(is_conditional_branch("if gold > 3 {"));
        assert!(is_conditional_branch("} elif gold > 1 {"));
        assert!(is_conditional_branch("} else if gold > 1 {"));
        assert!(!is_conditional_branch("} else {"));
        assert!(!is_conditional_branch("iffy {"));

        assert_eq!(opening_kind("} else {"), BlockKind::Conditional);
        assert_eq!(opening_kind("scene a {"), BlockKind::Scene);
        assert_eq!(opening_kind("{"), BlockKind::Other);
    }

    #[test]
    fn test_structural_text() {
        assert_eq!(structural_text("\"a { brace\" {gold} {"), "  {");
        assert_eq!(structural_text("\"escaped \\\" {\" }"), " }");
    }
}
