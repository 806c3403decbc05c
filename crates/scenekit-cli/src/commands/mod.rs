pub mod analyze;
pub mod find;
pub mod replace;

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use scenekit_core::ScenekitError;

/// Read a story script from disk
pub(crate) fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(ScenekitError::from)
        .with_context(|| format!("Failed to read script {:?}", path))
}

pub(crate) fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}
