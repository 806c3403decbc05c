//! Structural scan: counts, block nesting and line metrics.
//!
//! Nesting is tracked with a block stack. A `{` pushes a block whose kind
//! comes from the line that opens it; a `}` pops one. Conditional depth is the
//! number of conditional blocks on the stack. A `}` with nothing to close is
//! recorded as malformed and ignored, so depth never goes below zero.

use crate::references::ReferenceGraph;
use crate::syntax::{self, BlockKind};
use scenekit_core::{SourceLine, source_lines};
use serde::{Deserialize, Serialize};

/// Line-based metrics of a source snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_lines: usize,
    /// Non-blank, non-comment lines.
    pub code_lines: usize,
    pub comment_lines: usize,
    /// `comment_lines / total_lines`, 0 for empty text.
    pub comment_ratio: f64,
    /// Mean char length over all lines.
    pub avg_line_length: f64,
}

/// A conditional block that was opened at a given depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalOpening {
    pub line: usize,
    /// Conditional depth including this block (1 for a top-level `if`).
    pub depth: usize,
}

/// A block still open at the end of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenBlock {
    pub line: usize,
    pub kind: BlockKind,
}

/// The char extent of one scene, from its definition line up to the next
/// definition or the end of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSpan {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub chars: usize,
}

/// Result of scanning the block structure of a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureScan {
    pub choices: usize,
    pub conditionals: usize,
    pub max_depth: usize,
    pub openings: Vec<ConditionalOpening>,
    /// Lines holding a `}` with no open block.
    pub unmatched_closings: Vec<usize>,
    pub unclosed: Vec<OpenBlock>,
    pub metrics: Metrics,
}

impl StructureScan {
    /// Scan `source`.
    pub fn scan(source: &str) -> Self {
        let mut scan = Self::default();
        let mut stack: Vec<OpenBlock> = Vec::new();
        let mut depth = 0usize;
        let mut total_chars = 0usize;

        for line in source_lines(source) {
            scan.metrics.total_lines += 1;
            total_chars += line.char_len();

            if syntax::is_comment(line.text) {
                scan.metrics.comment_lines += 1;
                continue;
            }
            if line.is_blank() {
                continue;
            }
            scan.metrics.code_lines += 1;

            if syntax::is_choice(line.text) {
                scan.choices += 1;
            }
            if syntax::is_conditional_branch(line.text) {
                scan.conditionals += 1;
            }

            let mut line_kind = Some(syntax::opening_kind(line.text));
            for c in syntax::structural_text(line.text).chars() {
                match c {
                    '{' => {
                        let kind = line_kind.take().unwrap_or(BlockKind::Other);
                        if kind == BlockKind::Conditional {
                            depth += 1;
                            scan.max_depth = scan.max_depth.max(depth);
                            scan.openings.push(ConditionalOpening {
                                line: line.number,
                                depth,
                            });
                        }
                        stack.push(OpenBlock {
                            line: line.number,
                            kind,
                        });
                    }
                    '}' => match stack.pop() {
                        Some(block) => {
                            if block.kind == BlockKind::Conditional {
                                depth = depth.saturating_sub(1);
                            }
                        }
                        None => {
                            tracing::trace!(line = line.number, "unmatched closing brace");
                            scan.unmatched_closings.push(line.number);
                        }
                    },
                    _ => {}
                }
            }
        }

        scan.unclosed = stack;
        if scan.metrics.total_lines > 0 {
            let total = scan.metrics.total_lines as f64;
            scan.metrics.comment_ratio = scan.metrics.comment_lines as f64 / total;
            scan.metrics.avg_line_length = total_chars as f64 / total;
        }
        scan
    }
}

/// Split `source` into scene spans using the definitions in `graph`.
///
/// Text before the first definition belongs to no scene.
pub fn scene_spans(source: &str, graph: &ReferenceGraph) -> Vec<SceneSpan> {
    let lines: Vec<SourceLine<'_>> = source_lines(source).collect();
    let definitions = graph.definitions();

    definitions
        .iter()
        .enumerate()
        .map(|(i, def)| {
            let end_line = definitions
                .get(i + 1)
                .map(|next| next.line - 1)
                .unwrap_or(lines.len());
            let chars = lines[def.line - 1..end_line]
                .iter()
                .map(|line| line.char_len() + 1)
                .sum();
            SceneSpan {
                name: def.name.clone(),
                start_line: def.line,
                end_line,
                chars,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_and_depth() {
        let source = indoc! {r#"
            scene a {
                if gold > 1 {
                    if gold > 2 {
                        "Rich!"
                    } elif gold > 0 {
                        "Comfortable."
                    } else {
                        "Poor."
                    }
                }
                choice "go" -> b
                choice "stay"
            }
        "#};
        let scan = StructureScan::scan(source);

        assert_eq!(scan.choices, 2);
        assert_eq!(scan.conditionals, 3);
        assert_eq!(scan.max_depth, 2);
        assert!(scan.unmatched_closings.is_empty());
        assert!(scan.unclosed.is_empty());
        let depths: Vec<_> = scan.openings.iter().map(|o| (o.line, o.depth)).collect();
        assert_eq!(depths, vec![(2, 1), (3, 2), (5, 2), (7, 2)]);
    }

    #[test]
    fn test_unmatched_closing_is_clamped() {
        let source = "}\n}\nif x {\n  \"deep\"\n}\n";
        let scan = StructureScan::scan(source);

        assert_eq!(scan.unmatched_closings, vec![1, 2]);
        assert_eq!(scan.openings, vec![ConditionalOpening { line: 3, depth: 1 }]);
        assert_eq!(scan.max_depth, 1);
    }

    #[test]
    fn test_unclosed_blocks_reported() {
        let scan = StructureScan::scan("scene a {\n  if x {\n");

        assert_eq!(
            scan.unclosed,
            vec![
                OpenBlock { line: 1, kind: BlockKind::Scene },
                OpenBlock { line: 2, kind: BlockKind::Conditional },
            ]
        );
    }

    #[test]
    fn test_braces_in_strings_and_interpolations_ignored() {
        let scan = StructureScan::scan("scene a {\n  \"{name} says: }}}\"\n}");

        assert!(scan.unmatched_closings.is_empty());
        assert!(scan.unclosed.is_empty());
    }

    #[test]
    fn test_metrics() {
        let source = "// intro\nscene a {\n\n  \"hi\"\n}";
        let scan = StructureScan::scan(source);

        assert_eq!(scan.metrics.total_lines, 5);
        assert_eq!(scan.metrics.comment_lines, 1);
        assert_eq!(scan.metrics.code_lines, 3);
        assert!((scan.metrics.comment_ratio - 0.2).abs() < f64::EPSILON);
        // 8 + 9 + 0 + 6 + 1 chars
        assert!((scan.metrics.avg_line_length - 4.8).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_empty() {
        let scan = StructureScan::scan("");

        assert_eq!(scan.metrics, Metrics::default());
    }

    #[test]
    fn test_scene_spans() {
        let source = "// header\nscene a {\n  \"x\"\n}\nscene bb {\n}";
        let graph = ReferenceGraph::build(source);
        let spans = scene_spans(source, &graph);

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start_line, spans[0].end_line), (2, 4));
        assert_eq!(spans[0].chars, 10 + 6 + 2);
        assert_eq!((spans[1].start_line, spans[1].end_line), (5, 6));
        assert_eq!(spans[1].chars, 11 + 2);
    }
}
