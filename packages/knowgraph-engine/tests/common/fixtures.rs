//! Test fixtures
//!
//! On-disk fixture trees live under `tests/fixtures/`; generators build
//! small annotated sources inline.

use std::fs;
use std::path::{Path, PathBuf};

use knowgraph_engine::SourceFile;
use walkdir::WalkDir;

/// Absolute path of a fixture directory
pub fn fixture_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Load every file of a fixture tree as in-memory sources, paths relative to the tree
pub fn load_sources(name: &str) -> Vec<SourceFile> {
    let root = fixture_dir(name);
    let mut sources: Vec<SourceFile> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(&root).unwrap().to_string_lossy().to_string();
            let content = fs::read_to_string(e.path()).unwrap();
            SourceFile::new(relative, content)
        })
        .collect();
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    sources
}

/// Python function carrying one annotation
pub fn fixture_annotated_function(name: &str, sentinel: &str, extra_yaml: &str) -> String {
    let extra: String = extra_yaml
        .lines()
        .map(|line| format!("    {line}\n"))
        .collect();
    format!(
        "def {name}():\n    \"\"\"\n    {sentinel}\n    type: function\n    description: {name} handler\n{extra}    \"\"\"\n    pass\n"
    )
}

/// Python module with `n` annotated functions
pub fn fixture_annotated_module(description: &str, n: usize) -> String {
    let mut source = format!("\"\"\"\n@knowgraph\ntype: module\ndescription: {description}\n\"\"\"\n");
    for i in 0..n {
        source.push_str("\n\n");
        source.push_str(&fixture_annotated_function(&format!("func_{i}"), "@knowgraph", ""));
    }
    source
}

/// Write `(relative path, content)` pairs under `root`
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let target = root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(target, content).unwrap();
    }
}
