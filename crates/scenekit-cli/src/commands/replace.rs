use anyhow::{Context, Result};
use scenekit_core::ScenekitError;
use scenekit_editor::{HostEditor, MemoryBuffer, SearchSession, SessionConfig, validate_pattern};

use super::read_script;
use crate::ReplaceArgs;
use crate::config::CliConfig;

/// Replace every match in the file, printing the result or writing it back
pub fn run(args: &ReplaceArgs, config: &CliConfig) -> Result<String> {
    let source = read_script(&args.file)?;
    let options = config.search_options(args.flags);
    validate_pattern(&args.query, &options).map_err(ScenekitError::from)?;
    let mut buffer = MemoryBuffer::new(&source);

    let mut session = SearchSession::new(SessionConfig::default());
    session.search(&args.query, options, &source);
    let operations = session
        .replace_all(&args.replacement, &mut buffer)
        .map_err(ScenekitError::from)
        .context("Failed to apply replacements")?;
    tracing::debug!(file = ?args.file, count = operations.len(), "replace complete");

    if !args.write {
        return Ok(buffer.text());
    }
    if !operations.is_empty() {
        std::fs::write(&args.file, buffer.text())
            .with_context(|| format!("Failed to write script {:?}", args.file))?;
    }
    Ok(format!(
        "Replaced {} match(es) in {}\n",
        operations.len(),
        args.file.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchFlags;
    use pretty_assertions::assert_eq;

    fn args(path: &std::path::Path, query: &str, replacement: &str, write: bool) -> ReplaceArgs {
        ReplaceArgs {
            file: path.to_path_buf(),
            query: query.to_string(),
            replacement: replacement.to_string(),
            flags: SearchFlags::default(),
            write,
        }
    }

    #[test]
    fn test_replace_prints_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");
        std::fs::write(&path, "abc abc abc\n").unwrap();

        let output = run(&args(&path, "abc", "x", false), &CliConfig::default()).unwrap();

        assert_eq!(output, "x x x\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "abc abc abc\n");
    }

    #[test]
    fn test_replace_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");
        std::fs::write(&path, "choice \"a\" -> north\nchoice \"b\" -> south\n").unwrap();
        let mut replace_args = args(&path, r"->\s*(\w+)", "-> room_$1", true);
        replace_args.flags.regex = true;

        let output = run(&replace_args, &CliConfig::default()).unwrap();

        assert!(output.starts_with("Replaced 2 match(es)"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "choice \"a\" -> room_north\nchoice \"b\" -> room_south\n"
        );
    }

    #[test]
    fn test_replace_invalid_regex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");
        std::fs::write(&path, "text (").unwrap();
        let mut replace_args = args(&path, "(", "x", true);
        replace_args.flags.regex = true;

        let err = run(&replace_args, &CliConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScenekitError>(),
            Some(ScenekitError::InvalidPattern(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "text (");
    }

    #[test]
    fn test_replace_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = run(&args(&path, "a", "b", false), &CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read script"));
        assert!(matches!(
            err.downcast_ref::<ScenekitError>(),
            Some(ScenekitError::Io(io)) if io.kind() == std::io::ErrorKind::NotFound
        ));
    }
}
