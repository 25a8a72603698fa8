//! Line classification for `pg_xlogdump` output.
//!
//! A dump line mixes the resource manager name, the record description and
//! the referenced block in free text, e.g.
//!
//! ```text
//! rmgr: Heap        len (rec/tot):     31/    63, tx:        684, lsn: 0/017D6A28, prev 0/017D69F0, bkp: 0000, desc: insert: rel 1663/12029/16385; tid 0/3
//! ```
//!
//! Every tag is detected independently of the others. A line can carry several
//! record kinds or operations at once, or none at all.

use regex::Regex;
use std::sync::OnceLock;

static PAGE_RE: OnceLock<Regex> = OnceLock::new();
static BACKUP_RE: OnceLock<Regex> = OnceLock::new();

fn page_regex() -> &'static Regex {
    PAGE_RE.get_or_init(|| {
        Regex::new(r"^.*rel [0-9]*/[0-9]*/([0-9]*).*tid ([0-9]*)").expect("valid page regex")
    })
}

fn backup_regex() -> &'static Regex {
    BACKUP_RE.get_or_init(|| {
        Regex::new(r"bkp: ([0-9])([0-9])([0-9])([0-9])(?:[^0-9]|$)").expect("valid bkp regex")
    })
}

/// Coarse resource manager category of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// Heap records.
    Heap,
    /// Heap2 records (freeze, clean, visible, multi insert).
    Heap2,
    /// B-tree index records.
    Btree,
    /// Transaction records (commit, abort).
    Transaction,
}

impl RecordKind {
    /// All record kinds, in counter order.
    pub const ALL: [RecordKind; 4] = [Self::Heap, Self::Heap2, Self::Btree, Self::Transaction];

    /// The text marker identifying this kind in a dump line.
    ///
    /// `Heap` requires a trailing space so that `Heap2` lines don't match.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Heap => " Heap ",
            Self::Heap2 => " Heap2",
            Self::Btree => " Btree",
            Self::Transaction => " Transaction",
        }
    }
}

/// Record operation named in the description part of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// Tuple insert.
    Insert,
    /// Tuple update.
    Update,
    /// Heap-only tuple update.
    HotUpdate,
    /// Tuple delete.
    Delete,
    /// Transaction commit.
    Commit,
    /// Transaction abort.
    Abort,
}

impl Operation {
    /// All operations, in counter order.
    pub const ALL: [Operation; 6] = [
        Self::Insert,
        Self::Update,
        Self::HotUpdate,
        Self::Delete,
        Self::Commit,
        Self::Abort,
    ];

    /// The text marker identifying this operation in a dump line.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Insert => " insert",
            Self::Update => " update",
            Self::HotUpdate => " hotupdate",
            Self::Delete => " delete",
            Self::Commit => " commit",
            Self::Abort => " abort",
        }
    }
}

/// A block referenced by a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageReference {
    /// Relation file node, the last component of `rel spc/db/rel`.
    pub relation_id: String,
    /// Block number following `tid`.
    pub page_id: String,
}

/// The `bkp: XXXX` backup block bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupFlags([u8; 4]);

impl BackupFlags {
    /// Creates flags from the four bitmap digits.
    #[must_use]
    pub const fn new(digits: [u8; 4]) -> Self {
        Self(digits)
    }

    /// The raw bitmap digits.
    #[must_use]
    pub const fn digits(&self) -> [u8; 4] {
        self.0
    }

    /// Number of backup blocks, one per digit equal to `1`.
    #[must_use]
    pub fn set_count(&self) -> u64 {
        self.0.iter().filter(|&&d| d == 1).count() as u64
    }
}

/// Tags detected in a single dump line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    kinds: [bool; 4],
    operations: [bool; 6],
    /// Referenced relation and page, if both were found.
    pub page: Option<PageReference>,
    /// Backup block bitmap, if well formed.
    pub backup: Option<BackupFlags>,
}

impl Classification {
    /// Returns true if the line matched the given record kind.
    #[must_use]
    pub fn has_kind(&self, kind: RecordKind) -> bool {
        self.kinds[kind as usize]
    }

    /// Returns true if the line matched the given operation.
    #[must_use]
    pub fn has_operation(&self, op: Operation) -> bool {
        self.operations[op as usize]
    }

    /// Iterates over the matched record kinds.
    pub fn kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        RecordKind::ALL.into_iter().filter(|k| self.has_kind(*k))
    }

    /// Iterates over the matched operations.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::ALL.into_iter().filter(|op| self.has_operation(*op))
    }

    /// Returns true if nothing at all was recognized.
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        !self.kinds.contains(&true)
            && !self.operations.contains(&true)
            && self.page.is_none()
            && self.backup.is_none()
    }
}

/// Classifies one dump line.
///
/// Never fails: anything that doesn't match simply yields absent tags.
#[must_use]
pub fn classify(line: &str) -> Classification {
    let mut result = Classification::default();

    for kind in RecordKind::ALL {
        result.kinds[kind as usize] = line.contains(kind.marker());
    }
    for op in Operation::ALL {
        result.operations[op as usize] = line.contains(op.marker());
    }

    result.page = page_regex().captures(line).map(|caps| PageReference {
        relation_id: caps[1].to_string(),
        page_id: caps[2].to_string(),
    });

    result.backup = backup_regex().captures(line).map(|caps| {
        let mut digits = [0u8; 4];
        for (i, digit) in digits.iter_mut().enumerate() {
            // Each group is exactly one ASCII digit.
            *digit = caps[i + 1].as_bytes()[0] - b'0';
        }
        BackupFlags::new(digits)
    });

    result
}
