//! Relation name resolution.
//!
//! Dumps only carry relation file nodes. A [`RelationResolver`] maps them to
//! human readable names when one is available. Resolution is optional and
//! best effort: a miss or a failure just means the file node is displayed.

use crate::error::{AnalyzerError, AnalyzerResult};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Maps relation ids to names.
pub trait RelationResolver: Send + Sync {
    /// Looks up the name of a relation.
    ///
    /// Returns `Ok(None)` if the relation is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself failed (e.g. the backing
    /// directory is unreachable). Callers treat this as "no name".
    fn resolve(&self, relation_id: &str) -> AnalyzerResult<Option<String>>;
}

/// A resolver backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    names: HashMap<String, String>,
}

impl MapResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name for a relation id.
    #[must_use]
    pub fn with_name(mut self, relation_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(relation_id.into(), name.into());
        self
    }

    /// Parses a JSON object of `"relation id": "name"` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Mapping`] if the input is not such an object.
    pub fn from_json_reader(reader: impl Read) -> AnalyzerResult<Self> {
        let names: HashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self { names })
    }

    /// Loads a JSON mapping file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InputNotFound`] if the file doesn't exist,
    /// or a mapping/I/O error if it can't be read.
    pub fn from_json_file(path: &Path) -> AnalyzerResult<Self> {
        if !path.is_file() {
            return Err(AnalyzerError::input_not_found(path));
        }
        let resolver = Self::from_json_reader(BufReader::new(File::open(path)?))?;
        tracing::debug!(path = %path.display(), names = resolver.len(), "loaded relation names");
        Ok(resolver)
    }

    /// Number of known names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no names are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl RelationResolver for MapResolver {
    fn resolve(&self, relation_id: &str) -> AnalyzerResult<Option<String>> {
        Ok(self.names.get(relation_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builder_names() {
        let resolver = MapResolver::new().with_name("16385", "pgbench_accounts");
        assert_eq!(
            resolver.resolve("16385").unwrap().as_deref(),
            Some("pgbench_accounts")
        );
        assert_eq!(resolver.resolve("1").unwrap(), None);
    }

    #[test]
    fn json_mapping() {
        let json = r#"{"16385": "pgbench_accounts", "16390": "pgbench_branches"}"#;
        let resolver = MapResolver::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(resolver.len(), 2);
        assert_eq!(
            resolver.resolve("16390").unwrap().as_deref(),
            Some("pgbench_branches")
        );
    }

    #[test]
    fn invalid_json_mapping() {
        let result = MapResolver::from_json_reader(&b"[1, 2]"[..]);
        assert!(matches!(result, Err(AnalyzerError::Mapping(_))));
    }

    #[test]
    fn json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"1": "one"}}"#).unwrap();

        let resolver = MapResolver::from_json_file(file.path()).unwrap();
        assert_eq!(resolver.resolve("1").unwrap().as_deref(), Some("one"));
    }

    #[test]
    fn missing_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = MapResolver::from_json_file(&dir.path().join("names.json"));
        assert!(matches!(result, Err(AnalyzerError::InputNotFound { .. })));
    }
}
