use anyhow::Result;
use scenekit_core::ScenekitError;
use scenekit_editor::{SearchSession, SessionConfig, validate_pattern};

use super::{new_table, read_script};
use crate::FindArgs;
use crate::config::CliConfig;

pub fn run(args: &FindArgs, config: &CliConfig) -> Result<String> {
    let source = read_script(&args.file)?;
    let options = config.search_options(args.flags);
    validate_pattern(&args.query, &options).map_err(ScenekitError::from)?;

    let mut session = SearchSession::new(SessionConfig::default());
    let matches = session.search(&args.query, options, &source);
    tracing::debug!(file = ?args.file, count = matches.len(), "find complete");

    if args.json {
        return Ok(serde_json::to_string_pretty(matches)? + "\n");
    }
    if matches.is_empty() {
        return Ok("No matches\n".to_string());
    }

    let mut table = new_table(["Line", "Column", "Match", "Text"]);
    for m in matches {
        table.add_row(vec![
            m.line.to_string(),
            m.column.to_string(),
            m.matched_text.clone(),
            m.line_text.trim().to_string(),
        ]);
    }
    Ok(format!("{table}\n{} match(es)\n", matches.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchFlags;
    use std::io::Write;

    fn script(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(file: &tempfile::NamedTempFile, query: &str, json: bool) -> FindArgs {
        FindArgs {
            file: file.path().to_path_buf(),
            query: query.to_string(),
            flags: SearchFlags::default(),
            json,
        }
    }

    #[test]
    fn test_find_table() {
        let file = script("scene a {\n  choice \"go\" -> b\n}\n");
        let output = run(&args(&file, "go", false), &CliConfig::default()).unwrap();

        assert!(output.contains("\"go\" -> b"));
        assert!(output.ends_with("1 match(es)\n"));
    }

    #[test]
    fn test_find_json() {
        let file = script("choice \"go\" -> b");
        let output = run(&args(&file, "go", true), &CliConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["matches"][0]["column"], 9);
        assert_eq!(value["matches"][0]["end_column"], 11);
    }

    #[test]
    fn test_find_invalid_regex() {
        let file = script("text (");
        let mut find_args = args(&file, "(", false);
        find_args.flags.regex = true;

        let err = run(&find_args, &CliConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid pattern"));
    }

    #[test]
    fn test_find_no_matches() {
        let file = script("scene a {}");
        let output = run(&args(&file, "dragon", false), &CliConfig::default()).unwrap();

        assert_eq!(output, "No matches\n");
    }
}
