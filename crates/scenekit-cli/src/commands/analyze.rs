use anyhow::Result;
use scenekit_analyzer::{AnalysisEngine, AnalysisReport};

use super::{new_table, read_script};
use crate::AnalyzeArgs;
use crate::config::CliConfig;

pub fn run(args: &AnalyzeArgs, config: &CliConfig) -> Result<String> {
    let source = read_script(&args.file)?;
    let engine = AnalysisEngine::new(config.analyzer.clone());
    let report = engine.analyze(&source);

    if args.json {
        return Ok(serde_json::to_string_pretty(report.as_ref())? + "\n");
    }
    Ok(render(&report))
}

fn render(report: &AnalysisReport) -> String {
    let mut output = String::new();

    let c = &report.complexity;
    let m = &report.metrics;
    output.push_str(&format!(
        "Scenes: {}  Choices: {}  Conditionals: {}  Variables: {}\n",
        c.scenes, c.choices, c.conditionals, c.variables
    ));
    output.push_str(&format!(
        "Lines: {} ({} code, {} comment)  Avg line length: {:.1}\n",
        m.total_lines, m.code_lines, m.comment_lines, m.avg_line_length
    ));

    if !report.warnings.is_empty() {
        let mut table = new_table(["Line", "Warning"]);
        for warning in &report.warnings {
            table.add_row(vec![line_cell(warning.line), warning.message.clone()]);
        }
        output.push_str(&format!("\n{table}\n"));
    }

    if !report.suggestions.is_empty() {
        let mut table = new_table(["Priority", "Line", "Suggestion"]);
        for suggestion in &report.suggestions {
            table.add_row(vec![
                suggestion.priority.as_str().to_string(),
                line_cell(suggestion.line),
                suggestion.message.clone(),
            ]);
        }
        output.push_str(&format!("\n{table}\n"));
    }

    output.push_str(&format!("\n{}\n", report.summary()));
    output
}

fn line_cell(line: Option<usize>) -> String {
    line.map(|l| l.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::path::PathBuf;

    fn analyze(content: &str, json: bool, config: &CliConfig) -> String {
        let dir = tempfile::tempdir().unwrap();
        let file: PathBuf = dir.path().join("story.txt");
        std::fs::write(&file, content).unwrap();
        run(&AnalyzeArgs { file, json }, config).unwrap()
    }

    #[test]
    fn test_analyze_text_report() {
        let output = analyze(
            indoc! {r#"
                scene a {
                    set health = 10
                    choice "go" -> b
                }
            "#},
            false,
            &CliConfig::default(),
        );

        assert!(output.contains("Scenes: 1  Choices: 1"));
        assert!(output.contains("Scene 'b' is targeted by a choice but never defined"));
        assert!(output.contains("Variable 'health' is set"));
        assert!(output.contains("1 high, 1 medium and 0 low"));
    }

    #[test]
    fn test_analyze_json_uses_config() {
        let config = CliConfig::parse("[analyzer]\nlong_scene_chars = 5").unwrap();
        let output = analyze("scene a {\n  \"hello\"\n}\n", true, &config);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["warnings"][0]["kind"], "long_scene");
        assert_eq!(value["complexity"]["score"], 1);
    }
}
