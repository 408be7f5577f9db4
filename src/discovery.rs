use crate::error::LintError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extensions of the scripting languages supported by WeeChat.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["js", "lua", "php", "pl", "py", "rb", "scm", "tcl"];

/// Whether `path` looks like a WeeChat script: not hidden, supported extension.
pub fn is_script(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(true, |name| name.starts_with('.'));
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| SUPPORTED_EXTENSIONS.iter().any(|e| *e == ext));
    !hidden && supported
}

/// Splits a comma-separated list of file names.
pub fn parse_ignored_files(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collects the scripts to analyze under `path`.
///
/// A directory is listed in file name order, sub-directories included only when
/// `recursive` is set. A path that is neither a file nor a directory is an error.
pub fn collect_scripts(
    path: &Path,
    recursive: bool,
    ignored_files: &[String],
) -> Result<Vec<PathBuf>, LintError> {
    if path.is_dir() {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut scripts = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| LintError::Walk {
                path: path.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file() && accept(entry.path(), ignored_files) {
                scripts.push(entry.into_path());
            }
        }
        debug!(path = %path.display(), scripts = scripts.len(), "Directory scanned");
        Ok(scripts)
    } else if path.is_file() {
        if accept(path, ignored_files) {
            Ok(vec![path.to_path_buf()])
        } else {
            Ok(Vec::new())
        }
    } else {
        Err(LintError::InvalidPath(path.to_path_buf()))
    }
}

fn accept(path: &Path, ignored_files: &[String]) -> bool {
    if !is_script(path) {
        return false;
    }
    let ignored = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| ignored_files.iter().any(|f| f == name));
    if ignored {
        info!("{}: file ignored", path.display());
    }
    !ignored
}
