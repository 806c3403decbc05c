//! Script Analyzer - Warnings and Suggestions
//!
//! This module combines the reference graph, the variable table and the
//! structural scan into an [`AnalysisReport`]. Everything it produces is
//! advisory: the analyzer never touches the source.
//!
//! The complexity score is `scenes + choices + conditionals`. It is meant for
//! comparing revisions of the same document, not as an absolute quality
//! measure.

use crate::references::ReferenceGraph;
use crate::structure::{Metrics, StructureScan, scene_spans};
use crate::syntax::BlockKind;
use crate::variables::VariableTable;
use scenekit_core::content_hash;
use serde::{Deserialize, Serialize};

/// Priority of a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Likely a real defect (a choice leading nowhere)
    High,
    /// Probably worth a look
    Medium,
    /// Informational
    Low,
}

impl Priority {
    /// Returns the priority as a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Type of suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// A choice targets a scene that is never defined
    MissingScene,
    /// A variable is assigned but never interpolated
    UnusedVariable,
    /// A variable is interpolated but never assigned
    UndefinedVariable,
    /// A scene is defined but no choice leads to it
    UnreachableScene,
    /// The script has very few comments
    AddComments,
}

impl SuggestionKind {
    /// Returns a human-readable description of this suggestion kind
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingScene => "Choice targets an undefined scene",
            Self::UnusedVariable => "Variable is never interpolated",
            Self::UndefinedVariable => "Variable is never assigned",
            Self::UnreachableScene => "Scene is not targeted by any choice",
            Self::AddComments => "Consider adding comments",
        }
    }

    /// Default priority for this kind
    pub fn priority(&self) -> Priority {
        match self {
            Self::MissingScene => Priority::High,
            Self::UnusedVariable => Priority::Medium,
            Self::UndefinedVariable | Self::UnreachableScene | Self::AddComments => Priority::Low,
        }
    }
}

/// A single suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub priority: Priority,
    /// Human-readable message explaining the finding
    pub message: String,
    /// Ready-to-insert text that resolves the finding, if any
    pub remediation: Option<String>,
    /// Scene or variable the suggestion is about
    pub subject: Option<String>,
    /// Line the finding points at
    pub line: Option<usize>,
}

impl Suggestion {
    /// Creates a suggestion with the kind's default priority
    pub fn new(kind: SuggestionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            priority: kind.priority(),
            message: message.into(),
            remediation: None,
            subject: None,
            line: None,
        }
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }
}

/// Type of warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A scene's text exceeds the length threshold
    LongScene,
    /// Conditionals nest deeper than the threshold
    DeepNesting,
    /// A closing brace has nothing to close
    MalformedStructure,
    /// A block is still open at the end of the text
    UnclosedBlock,
    /// A scene name is defined more than once
    DuplicateScene,
}

/// A single warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub line: Option<usize>,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }
}

/// Structural counts and the derived complexity score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub scenes: usize,
    pub choices: usize,
    pub conditionals: usize,
    pub variables: usize,
    /// `scenes + choices + conditionals`
    pub score: usize,
}

/// Result of analyzing one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Hash of the analyzed snapshot
    pub source_hash: u64,
    pub complexity: Complexity,
    pub metrics: Metrics,
    pub warnings: Vec<Warning>,
    /// Sorted high priority first
    pub suggestions: Vec<Suggestion>,
}

impl AnalysisReport {
    /// Returns true if any suggestion is high priority
    pub fn has_high_priority(&self) -> bool {
        self.suggestions.iter().any(|s| s.priority == Priority::High)
    }

    /// Suggestions of the given priority
    pub fn suggestions_with(&self, priority: Priority) -> impl Iterator<Item = &Suggestion> {
        self.suggestions
            .iter()
            .filter(move |s| s.priority == priority)
    }

    /// Suggestions of the given kind
    pub fn suggestions_of(&self, kind: SuggestionKind) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(move |s| s.kind == kind)
    }

    /// Warnings of the given kind
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    /// One-line summary of the report
    pub fn summary(&self) -> String {
        let high = self.suggestions_with(Priority::High).count();
        let medium = self.suggestions_with(Priority::Medium).count();
        let low = self.suggestions_with(Priority::Low).count();

        if self.suggestions.is_empty() && self.warnings.is_empty() {
            format!(
                "No issues detected. Complexity score: {}",
                self.complexity.score
            )
        } else {
            format!(
                "{} warning(s); {} high, {} medium and {} low priority suggestion(s). Complexity score: {}",
                self.warnings.len(),
                high,
                medium,
                low,
                self.complexity.score
            )
        }
    }
}

/// Configuration for the script analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Scenes longer than this many chars get a "consider splitting" warning
    pub long_scene_chars: usize,
    /// Conditional nesting deeper than this gets a warning
    pub max_nesting_depth: usize,
    /// Scene the story starts in; defaults to the first defined scene
    pub entry_scene: Option<String>,
    /// Comment ratio below which an "add comments" suggestion is made
    pub min_comment_ratio: f64,
    /// Minimum code lines before the comment ratio is checked
    pub comment_check_min_lines: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            long_scene_chars: 2_000,
            max_nesting_depth: 3,
            entry_scene: None,
            min_comment_ratio: 0.05,
            comment_check_min_lines: 20,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the long scene threshold
    pub fn with_long_scene_chars(mut self, chars: usize) -> Self {
        self.long_scene_chars = chars;
        self
    }

    /// Sets the nesting depth threshold
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Sets the entry scene
    pub fn with_entry_scene(mut self, scene: impl Into<String>) -> Self {
        self.entry_scene = Some(scene.into());
        self
    }

    /// Sets the minimum comment ratio
    pub fn with_min_comment_ratio(mut self, ratio: f64) -> Self {
        self.min_comment_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the minimum code lines for the comment check
    pub fn with_comment_check_min_lines(mut self, lines: usize) -> Self {
        self.comment_check_min_lines = lines;
        self
    }
}

/// Script analyzer that produces warnings and suggestions
#[derive(Debug, Clone, Default)]
pub struct ScriptAnalyzer {
    config: AnalyzerConfig,
}

impl ScriptAnalyzer {
    /// Creates a new analyzer with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new analyzer with custom config
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Returns the analyzer config
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes a source snapshot
    pub fn analyze(&self, source: &str) -> AnalysisReport {
        let graph = ReferenceGraph::build(source);
        let variables = VariableTable::build(source);
        let scan = StructureScan::scan(source);

        let scenes = graph.definitions().len();
        let complexity = Complexity {
            scenes,
            choices: scan.choices,
            conditionals: scan.conditionals,
            variables: variables.assigned().len(),
            score: scenes + scan.choices + scan.conditionals,
        };

        let mut warnings = Vec::new();
        self.check_duplicate_scenes(&graph, &mut warnings);
        self.check_long_scenes(source, &graph, &mut warnings);
        self.check_nesting(&scan, &mut warnings);
        self.check_malformed_structure(&scan, &mut warnings);
        warnings.sort_by_key(|w| w.line.unwrap_or(usize::MAX));

        let mut suggestions = Vec::new();
        self.check_missing_scenes(&graph, &mut suggestions);
        self.check_unused_variables(&variables, &mut suggestions);
        self.check_undefined_variables(&variables, &mut suggestions);
        self.check_unreachable_scenes(&graph, &mut suggestions);
        self.check_comment_ratio(&scan.metrics, &mut suggestions);
        // Stable sort keeps document order within a priority.
        suggestions.sort_by_key(|s| s.priority);

        let report = AnalysisReport {
            source_hash: content_hash(source),
            complexity,
            metrics: scan.metrics,
            warnings,
            suggestions,
        };
        tracing::debug!(
            score = report.complexity.score,
            warnings = report.warnings.len(),
            suggestions = report.suggestions.len(),
            "script analyzed"
        );
        report
    }

    fn check_duplicate_scenes(&self, graph: &ReferenceGraph, warnings: &mut Vec<Warning>) {
        for duplicate in graph.duplicate_definitions() {
            warnings.push(Warning::new(
                WarningKind::DuplicateScene,
                format!(
                    "Scene '{}' is defined more than once; choices will only reach one of them",
                    duplicate.name
                ),
                Some(duplicate.line),
            ));
        }
    }

    fn check_long_scenes(&self, source: &str, graph: &ReferenceGraph, warnings: &mut Vec<Warning>) {
        for span in scene_spans(source, graph) {
            if span.chars > self.config.long_scene_chars {
                warnings.push(Warning::new(
                    WarningKind::LongScene,
                    format!(
                        "Scene '{}' is {} characters long (limit {}); consider splitting it into smaller scenes",
                        span.name, span.chars, self.config.long_scene_chars
                    ),
                    Some(span.start_line),
                ));
            }
        }
    }

    fn check_nesting(&self, scan: &StructureScan, warnings: &mut Vec<Warning>) {
        let limit = self.config.max_nesting_depth;
        // One warning per deep region: where nesting first crosses the limit.
        for opening in scan.openings.iter().filter(|o| o.depth == limit + 1) {
            warnings.push(Warning::new(
                WarningKind::DeepNesting,
                format!(
                    "Conditionals nested more than {} levels deep (max {} in this script); consider flattening",
                    limit, scan.max_depth
                ),
                Some(opening.line),
            ));
        }
    }

    fn check_malformed_structure(&self, scan: &StructureScan, warnings: &mut Vec<Warning>) {
        for &line in &scan.unmatched_closings {
            warnings.push(Warning::new(
                WarningKind::MalformedStructure,
                "Unmatched '}' closes nothing; nesting depth clamped at zero",
                Some(line),
            ));
        }
        for block in &scan.unclosed {
            let what = match block.kind {
                BlockKind::Scene => "Scene block",
                BlockKind::Conditional => "Conditional block",
                BlockKind::Other => "Block",
            };
            warnings.push(Warning::new(
                WarningKind::UnclosedBlock,
                format!("{} opened here is never closed", what),
                Some(block.line),
            ));
        }
    }

    fn check_missing_scenes(&self, graph: &ReferenceGraph, suggestions: &mut Vec<Suggestion>) {
        for name in graph.missing_scenes() {
            let line = graph.first_reference_to(&name).map(|r| r.line);
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::MissingScene,
                    format!("Scene '{}' is targeted by a choice but never defined", name),
                )
                .with_remediation(scene_skeleton(&name))
                .with_subject(name)
                .with_line(line),
            );
        }
    }

    fn check_unused_variables(&self, variables: &VariableTable, suggestions: &mut Vec<Suggestion>) {
        for name in variables.unused() {
            let line = variables.first_assignment(&name).map(|s| s.line);
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::UnusedVariable,
                    format!(
                        "Variable '{}' is set but never shown with {{{}}}; it may still be read by the engine",
                        name, name
                    ),
                )
                .with_subject(name)
                .with_line(line),
            );
        }
    }

    fn check_undefined_variables(
        &self,
        variables: &VariableTable,
        suggestions: &mut Vec<Suggestion>,
    ) {
        for name in variables.undefined() {
            let line = variables.first_interpolation(&name).map(|s| s.line);
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::UndefinedVariable,
                    format!(
                        "Variable '{}' is shown but never set in this script; it must come from the engine",
                        name
                    ),
                )
                .with_remediation(format!("set {} = ", name))
                .with_subject(name)
                .with_line(line),
            );
        }
    }

    fn check_unreachable_scenes(&self, graph: &ReferenceGraph, suggestions: &mut Vec<Suggestion>) {
        let entry = self.config.entry_scene.as_deref();
        for name in graph.unreachable_scenes(entry) {
            let line = graph.definition_of(&name).map(|d| d.line);
            suggestions.push(
                Suggestion::new(
                    SuggestionKind::UnreachableScene,
                    format!(
                        "No choice leads to scene '{}'; ignore this if it is entered from outside the script",
                        name
                    ),
                )
                .with_subject(name)
                .with_line(line),
            );
        }
    }

    fn check_comment_ratio(&self, metrics: &Metrics, suggestions: &mut Vec<Suggestion>) {
        if metrics.code_lines < self.config.comment_check_min_lines {
            return;
        }
        if metrics.comment_ratio < self.config.min_comment_ratio {
            suggestions.push(Suggestion::new(
                SuggestionKind::AddComments,
                format!(
                    "Only {:.0}% of lines are comments; consider documenting scene intent",
                    metrics.comment_ratio * 100.0
                ),
            ));
        }
    }
}

/// Ready-to-insert body for a missing scene.
fn scene_skeleton(name: &str) -> String {
    format!("scene {} {{\n    \"\"\n}}\n", name)
}
