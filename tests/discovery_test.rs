// Tests of the script discovery in files and directories.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use weechat_script_lint::discovery::collect_scripts;
use weechat_script_lint::LintError;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "# script\n").unwrap();
}

fn names(base: &Path, scripts: &[PathBuf]) -> Vec<String> {
    scripts
        .iter()
        .map(|p| {
            p.strip_prefix(base)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn sample_tree(base: &Path) {
    for name in [
        "zzz.py",
        "buffers.pl",
        "autosort.py",
        ".hidden.py",
        "notes.txt",
        "sub/go.py",
        "sub/deeper/colorize.lua",
    ] {
        touch(&base.join(name));
    }
}

#[test]
fn test_directory_not_recursive() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let scripts = collect_scripts(dir.path(), false, &[]).unwrap();
    assert_eq!(
        names(dir.path(), &scripts),
        vec!["autosort.py", "buffers.pl", "zzz.py"]
    );
}

#[test]
fn test_directory_recursive() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let scripts = collect_scripts(dir.path(), true, &[]).unwrap();
    let found = names(dir.path(), &scripts);
    assert_eq!(found.len(), 5);
    for expected in [
        "autosort.py",
        "buffers.pl",
        "zzz.py",
        "sub/go.py",
        "sub/deeper/colorize.lua",
    ] {
        assert!(found.contains(&expected.to_string()), "{} not found", expected);
    }
    assert!(!found.iter().any(|name| name.ends_with(".hidden.py")));
}

#[test]
fn test_ignored_files() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let ignored = vec!["zzz.py".to_string(), "go.py".to_string()];
    let scripts = collect_scripts(dir.path(), true, &ignored).unwrap();
    let found = names(dir.path(), &scripts);
    assert_eq!(found.len(), 3);
    assert!(!found.contains(&"zzz.py".to_string()));
    assert!(!found.contains(&"sub/go.py".to_string()));
}

#[test]
fn test_single_file() {
    let dir = tempdir().unwrap();
    sample_tree(dir.path());

    let script = dir.path().join("buffers.pl");
    assert_eq!(
        collect_scripts(&script, false, &[]).unwrap(),
        vec![script.clone()]
    );

    // a file given explicitly is still filtered
    let ignored = vec!["buffers.pl".to_string()];
    assert!(collect_scripts(&script, false, &ignored).unwrap().is_empty());
    assert!(collect_scripts(&dir.path().join("notes.txt"), false, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();
    assert!(collect_scripts(dir.path(), true, &[]).unwrap().is_empty());
}

#[test]
fn test_invalid_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    match collect_scripts(&missing, false, &[]) {
        Err(LintError::InvalidPath(path)) => assert_eq!(path, missing),
        other => panic!("unexpected result: {:?}", other),
    }
}
