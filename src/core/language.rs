//! Source language classification.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Source language of a native translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language (default)
    #[default]
    C,
    /// C++ language
    #[serde(alias = "cpp", alias = "cxx", alias = "c++")]
    Cxx,
}

impl Language {
    /// Classify a source file by its extension.
    ///
    /// Only `.c` and `.cpp` are recognized; everything else returns `None`
    /// and is skipped by the preprocessing driver.
    pub fn from_path(path: &Path) -> Option<Language> {
        match path.extension()?.to_str()? {
            "c" => Some(Language::C),
            "cpp" => Some(Language::Cxx),
            _ => None,
        }
    }

    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// Extension of the preprocessed output for this language.
    pub fn preprocessed_extension(&self) -> &'static str {
        match self {
            Language::C => "i",
            Language::Cxx => "ii",
        }
    }
}
