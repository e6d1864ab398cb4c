//! Source files and source sets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::language::Language;
use crate::util::fs::{glob_files, relative_path};

/// A single source file in a preprocessing run.
///
/// Holds both the absolute path (handed to the preprocessor) and the path
/// relative to the scanned root (used to mirror the directory structure
/// under the output root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Path relative to the source root
    pub relative: PathBuf,
}

impl SourceFile {
    /// Create a source file from a root and an absolute path.
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative = relative_path(root, &path);
        SourceFile { path, relative }
    }

    /// Classify this file's language by extension.
    pub fn language(&self) -> Option<Language> {
        Language::from_path(&self.path)
    }

    /// Derive the preprocessed output path under `output_dir`.
    ///
    /// The relative directory structure is preserved and the source
    /// extension is replaced with the language's preprocessed suffix.
    /// Returns `None` for unrecognized file types.
    pub fn preprocessed_path(&self, output_dir: &Path) -> Option<PathBuf> {
        let lang = self.language()?;
        Some(output_dir.join(self.relative.with_extension(lang.preprocessed_extension())))
    }
}

/// The set of files considered by one preprocessing run.
///
/// The set keeps every regular file it finds; classification and skipping
/// of unrecognized types happens in the driver.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    files: Vec<SourceFile>,
}

impl SourceSet {
    /// Scan a directory recursively for source files.
    pub fn scan(root: &Path) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("source directory not found: {}", root.display()))?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("failed to walk source directory: {}", root.display()))?;
            if entry.file_type().is_file() {
                files.push(SourceFile::new(&root, entry.into_path()));
            }
        }

        Ok(SourceSet { files })
    }

    /// Collect source files matching glob patterns relative to `root`.
    pub fn from_globs(root: &Path, patterns: &[String]) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("source directory not found: {}", root.display()))?;

        let files = glob_files(&root, patterns)?
            .into_iter()
            .map(|path| SourceFile::new(&root, path))
            .collect();

        Ok(SourceSet { files })
    }

    /// Iterate over the files in the set.
    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    /// The files in the set, as a slice.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Number of files in the set (recognized or not).
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of files the driver will actually preprocess.
    pub fn recognized_count(&self) -> usize {
        self.files.iter().filter(|f| f.language().is_some()).count()
    }
}

impl<'a> IntoIterator for &'a SourceSet {
    type Item = &'a SourceFile;
    type IntoIter = std::slice::Iter<'a, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_finds_nested_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("main.c"), "int main() {}").unwrap();
        fs::write(tmp.path().join("sub/util.cpp"), "void util() {}").unwrap();
        fs::write(tmp.path().join("notes.txt"), "notes").unwrap();

        let set = SourceSet::scan(tmp.path()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.recognized_count(), 2);

        let relatives: Vec<_> = set.iter().map(|f| f.relative.clone()).collect();
        assert!(relatives.contains(&PathBuf::from("main.c")));
        assert!(relatives.contains(&PathBuf::from("sub/util.cpp")));
    }

    #[test]
    fn test_preprocessed_path_c() {
        let file = SourceFile {
            path: PathBuf::from("/proj/src/main.c"),
            relative: PathBuf::from("main.c"),
        };

        assert_eq!(
            file.preprocessed_path(Path::new("/proj/out")),
            Some(PathBuf::from("/proj/out/main.i"))
        );
    }

    #[test]
    fn test_preprocessed_path_cpp_preserves_structure() {
        let file = SourceFile {
            path: PathBuf::from("/proj/src/gui/window.cpp"),
            relative: PathBuf::from("gui/window.cpp"),
        };

        assert_eq!(
            file.preprocessed_path(Path::new("/proj/out")),
            Some(PathBuf::from("/proj/out/gui/window.ii"))
        );
    }

    #[test]
    fn test_preprocessed_path_unrecognized() {
        let file = SourceFile {
            path: PathBuf::from("/proj/src/readme.txt"),
            relative: PathBuf::from("readme.txt"),
        };

        assert_eq!(file.preprocessed_path(Path::new("/proj/out")), None);
    }

    #[test]
    fn test_from_globs() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.c"), "").unwrap();
        fs::write(tmp.path().join("b.cpp"), "").unwrap();
        fs::write(tmp.path().join("c.h"), "").unwrap();

        let set = SourceSet::from_globs(tmp.path(), &["*.c".to_string(), "*.cpp".to_string()])
            .unwrap();
        assert_eq!(set.len(), 2);
    }
}
