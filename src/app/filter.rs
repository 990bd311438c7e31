use std::fs;
use std::path::Path;

use crate::app::error::MigrateError;

/// File name of the filter specification, written next to the checkout.
pub const FILTER_FILE_NAME: &str = "repo-filter.txt";

/// One path per line, newline-terminated, in the order given.
pub fn render_filter_spec(paths: &[String]) -> String {
    let mut spec = String::new();
    for path in paths {
        spec.push_str(path);
        spec.push('\n');
    }
    spec
}

/// Write the filter specification consumed by `git filter-repo`.
pub fn write_filter_spec(path: &Path, paths: &[String]) -> Result<(), MigrateError> {
    fs::write(path, render_filter_spec(paths)).map_err(|source| MigrateError::FilterWrite {
        path: path.to_path_buf(),
        source,
    })
}
