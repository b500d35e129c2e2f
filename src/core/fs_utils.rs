//! File system utility helpers (BOM-aware readers, etc.)
use std::fs;
use std::path::Path;

/// Read a TChecker model as UTF-8 text, stripping UTF-8 BOM if present.
pub fn read_tck_file(path: &Path) -> std::io::Result<String> {
    let mut content = fs::read_to_string(path)?;
    if content.starts_with('\u{FEFF}') {
        content = content.trim_start_matches('\u{FEFF}').to_string();
    }
    Ok(content)
}

/// True for paths with the `.tck` extension.
pub fn is_tck_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("tck"))
}
