//! Test fixtures for common preprocessing scenarios.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Create an on-disk project with two C sources, a shared header, and the
/// standard directory layout the driver expects.
///
/// Layout:
/// ```text
/// project/
///   src/a.c
///   src/b.c
///   include/common.h
///   headers/            (project header root)
///   out/                (created by the driver on demand)
/// ```
///
/// Returns the temp dir guard and the canonicalized project root.
pub fn fixture_project() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().canonicalize().unwrap();

    std::fs::create_dir_all(project.join("src")).unwrap();
    std::fs::create_dir_all(project.join("include")).unwrap();
    std::fs::create_dir_all(project.join("headers")).unwrap();

    std::fs::write(
        project.join("src/a.c"),
        "#include \"common.h\"\nint a(void) { return COMMON; }\n",
    )
    .unwrap();
    std::fs::write(
        project.join("src/b.c"),
        "#include \"common.h\"\nint b(void) { return COMMON; }\n",
    )
    .unwrap();
    std::fs::write(project.join("include/common.h"), "#define COMMON 1\n").unwrap();

    (tmp, project)
}

/// Canned preprocessed output referencing the given paths via GNU line
/// markers, interleaved with ordinary code lines.
pub fn line_marker_output<P: AsRef<Path>>(paths: &[P]) -> String {
    let mut out = String::new();
    for (i, path) in paths.iter().enumerate() {
        out.push_str(&format!("# {} \"{}\" 1\n", i + 1, path.as_ref().display()));
        out.push_str("int filler;\n");
    }
    out
}
