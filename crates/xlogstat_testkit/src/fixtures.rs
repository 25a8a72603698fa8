//! Dump fixtures.
//!
//! Produces `pg_xlogdump` style output without a running server.

use std::io::Write;
use tempfile::NamedTempFile;

/// Tablespace oid used in generated relation paths.
pub const TABLESPACE: u32 = 1663;
/// Database oid used in generated relation paths.
pub const DATABASE: u32 = 12029;

/// A single generated dump record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Heap insert into `relation` at `block`.
    HeapInsert {
        /// Relation file node.
        relation: u32,
        /// Block number.
        block: u32,
    },
    /// Heap update.
    HeapUpdate {
        /// Relation file node.
        relation: u32,
        /// Block number.
        block: u32,
    },
    /// Heap-only tuple update.
    HotUpdate {
        /// Relation file node.
        relation: u32,
        /// Block number.
        block: u32,
    },
    /// Heap delete.
    HeapDelete {
        /// Relation file node.
        relation: u32,
        /// Block number.
        block: u32,
    },
    /// B-tree insert.
    BtreeInsert {
        /// Index file node.
        relation: u32,
        /// Block number.
        block: u32,
    },
    /// Heap2 clean; carries a block but no `tid`.
    Heap2Clean {
        /// Relation file node.
        relation: u32,
        /// Block number.
        block: u32,
    },
    /// Transaction commit.
    Commit,
    /// Transaction abort.
    Abort,
    /// A line the dump tool prints that isn't a record.
    Noise(String),
}

impl Record {
    /// The page referenced through `rel .../tid`, if any.
    #[must_use]
    pub fn page(&self) -> Option<(u32, u32)> {
        match *self {
            Self::HeapInsert { relation, block }
            | Self::HeapUpdate { relation, block }
            | Self::HotUpdate { relation, block }
            | Self::HeapDelete { relation, block }
            | Self::BtreeInsert { relation, block } => Some((relation, block)),
            Self::Heap2Clean { .. } | Self::Commit | Self::Abort | Self::Noise(_) => None,
        }
    }

    /// Renders the record as a dump line.
    #[must_use]
    pub fn render(&self, xid: u32, lsn: u64, bkp: [u8; 4]) -> String {
        let (rmgr, desc) = match self {
            Self::HeapInsert { relation, block } => ("Heap", format!("insert: {}", tid(*relation, *block))),
            Self::HeapUpdate { relation, block } => ("Heap", format!("update: {}", tid(*relation, *block))),
            Self::HotUpdate { relation, block } => ("Heap", format!("hotupdate: {}", tid(*relation, *block))),
            Self::HeapDelete { relation, block } => ("Heap", format!("delete: {}", tid(*relation, *block))),
            Self::BtreeInsert { relation, block } => ("Btree", format!("insert: {}", tid(*relation, *block))),
            Self::Heap2Clean { relation, block } => (
                "Heap2",
                format!("clean: rel {TABLESPACE}/{DATABASE}/{relation}; blk {block} remxid 0"),
            ),
            Self::Commit => ("Transaction", "commit: 2014-01-20 10:10:10.123456 CET".to_string()),
            Self::Abort => ("Transaction", "abort: 2014-01-20 10:10:11.654321 CET".to_string()),
            Self::Noise(text) => return text.clone(),
        };
        let bkp: String = bkp.iter().map(|d| char::from(b'0' + d)).collect();
        format!(
            "rmgr: {rmgr:<11} len (rec/tot): {:>6}/{:>6}, tx: {xid:>10}, lsn: 0/{:08X}, prev 0/{:08X}, bkp: {bkp}, desc: {desc}",
            31,
            63,
            lsn,
            lsn.saturating_sub(64),
        )
    }
}

fn tid(relation: u32, block: u32) -> String {
    format!("rel {TABLESPACE}/{DATABASE}/{relation}; tid {block}/1")
}

/// Builds the dump output of one segment.
///
/// # Example
///
/// ```rust
/// use xlogstat_testkit::DumpBuilder;
///
/// let dump = DumpBuilder::new()
///     .record(xlogstat_testkit::Record::HeapInsert { relation: 16385, block: 0 })
///     .commit()
///     .build();
/// assert_eq!(dump.lines().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DumpBuilder {
    lines: Vec<String>,
    xid: u32,
    lsn: u64,
    trailing_newline: bool,
}

impl Default for DumpBuilder {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            xid: 684,
            lsn: 0x017D_6A28,
            trailing_newline: true,
        }
    }
}

impl DumpBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record without backup blocks.
    #[must_use]
    pub fn record(self, record: Record) -> Self {
        self.record_with_backup(record, [0; 4])
    }

    /// Appends a record with the given backup block bitmap.
    #[must_use]
    pub fn record_with_backup(mut self, record: Record, bkp: [u8; 4]) -> Self {
        let line = record.render(self.xid, self.lsn, bkp);
        self.lines.push(line);
        self.lsn += 64;
        if matches!(record, Record::Commit | Record::Abort) {
            self.xid += 1;
        }
        self
    }

    /// Appends a commit record.
    #[must_use]
    pub fn commit(self) -> Self {
        self.record(Record::Commit)
    }

    /// Appends an abort record.
    #[must_use]
    pub fn abort(self) -> Self {
        self.record(Record::Abort)
    }

    /// Appends a raw line.
    #[must_use]
    pub fn raw(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Sets whether the output ends with a newline (default true).
    #[must_use]
    pub fn trailing_newline(mut self, value: bool) -> Self {
        self.trailing_newline = value;
        self
    }

    /// Number of lines the analyzer will count for the built output.
    #[must_use]
    pub fn line_count(&self) -> u64 {
        if self.lines.is_empty() {
            // Empty text still splits into one (empty) line.
            return 1;
        }
        self.lines.len() as u64 + u64::from(self.trailing_newline)
    }

    /// Returns the dump text.
    #[must_use]
    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// Writes dump text to a temporary file.
///
/// # Panics
///
/// Panics if the file can't be written.
pub fn write_dump_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(text.as_bytes())
        .expect("Failed to write dump file");
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlogstat_core::{classify, Operation, RecordKind};

    #[test]
    fn rendered_heap_insert_classifies() {
        let line = Record::HeapInsert {
            relation: 16385,
            block: 7,
        }
        .render(684, 0x100, [1, 0, 0, 0]);

        let c = classify(&line);
        assert!(c.has_kind(RecordKind::Heap));
        assert!(!c.has_kind(RecordKind::Heap2));
        assert!(c.has_operation(Operation::Insert));
        let page = c.page.unwrap();
        assert_eq!((page.relation_id.as_str(), page.page_id.as_str()), ("16385", "7"));
        assert_eq!(c.backup.unwrap().set_count(), 1);
    }

    #[test]
    fn rendered_heap2_clean_has_no_page() {
        let line = Record::Heap2Clean {
            relation: 1,
            block: 2,
        }
        .render(1, 0, [0; 4]);
        let c = classify(&line);
        assert!(c.has_kind(RecordKind::Heap2));
        assert!(c.page.is_none());
    }

    #[test]
    fn builder_line_count() {
        let builder = DumpBuilder::new().commit().abort();
        assert_eq!(builder.line_count(), 3);
        assert_eq!(builder.build().split('\n').count(), 3);

        let builder = builder.trailing_newline(false);
        assert_eq!(builder.line_count(), 2);
        assert_eq!(builder.build().split('\n').count(), 2);

        assert_eq!(DumpBuilder::new().line_count(), 1);
    }

    #[test]
    fn dump_file_roundtrip() {
        let file = write_dump_file("a\nb\n");
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "a\nb\n");
    }
}
