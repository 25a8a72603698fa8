//! Input sources for segment dumps.
//!
//! The analyzer never runs `pg_xlogdump` itself. A source hands over the text
//! the dump tool already produced for one segment.

use crate::error::{AnalyzerError, AnalyzerResult};
use std::path::{Path, PathBuf};

/// Provides the dump output of one xlog segment.
///
/// # Implementors
///
/// - [`FileSource`] - dump output saved to a file
/// - [`TextSource`] - dump output already in memory
pub trait SegmentSource: Send + Sync {
    /// Name of the segment, used as the report title.
    fn name(&self) -> &str;

    /// Reads the complete dump output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output can't be obtained.
    fn read_text(&self) -> AnalyzerResult<String>;
}

/// Dump output stored in a file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    /// Creates a source for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SegmentSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> AnalyzerResult<String> {
        if !self.path.is_file() {
            return Err(AnalyzerError::input_not_found(&self.path));
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Dump output held in memory.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    /// Creates a named in-memory source.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl SegmentSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> AnalyzerResult<String> {
        Ok(self.text.clone())
    }
}
