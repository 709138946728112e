//! Key-based grouping of file records.
//!
//! # Overview
//!
//! [`group_by_key`] buckets records by an arbitrary key (content hash, file
//! name, ...) and keeps only keys shared by two or more records. Group order
//! is unspecified; member order within a group follows input order.
//!
//! # Example
//!
//! ```
//! use clean_files::scanner::FileRecord;
//! use clean_files::duplicates::group_by_key;
//! use std::convert::Infallible;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let make = |p: &str| FileRecord::new(PathBuf::from(p), PathBuf::from("/"), 1, SystemTime::now(), 0o644);
//! let files = vec![make("/a/x.txt"), make("/b/x.txt"), make("/c/y.txt")];
//!
//! let grouping = group_by_key(files, |f| Ok::<_, Infallible>(f.file_name().to_os_string()));
//!
//! assert_eq!(grouping.groups.len(), 1);
//! assert_eq!(grouping.groups[0].key.as_os_str(), "x.txt");
//! assert_eq!(grouping.stats.eliminated_unique, 1);
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash as StdHash;
use std::path::PathBuf;

use crate::scanner::FileRecord;

/// Which member of a group is kept when duplicates are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// Earliest modification time
    Oldest,
    /// Latest modification time
    Newest,
}

/// Records sharing a key. Always holds at least two members when returned
/// from [`group_by_key`].
#[derive(Debug, Clone)]
pub struct Group<K> {
    /// Shared key
    pub key: K,
    /// Members in input order
    pub files: Vec<FileRecord>,
}

impl<K> Group<K> {
    /// Create a group.
    #[must_use]
    pub fn new(key: K, files: Vec<FileRecord>) -> Self {
        Self { key, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Index of the representative member.
    ///
    /// Comparison is strict on modification time, so among exact ties the
    /// first member in input order wins.
    #[must_use]
    pub fn representative_index(&self, keep: Keep) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, file) in self.files.iter().enumerate() {
            best = match best {
                None => Some(i),
                Some(b) => {
                    let current = self.files[b].modified;
                    let better = match keep {
                        Keep::Oldest => file.modified < current,
                        Keep::Newest => file.modified > current,
                    };
                    if better {
                        Some(i)
                    } else {
                        Some(b)
                    }
                }
            };
        }
        best
    }

    /// The member that is kept.
    #[must_use]
    pub fn representative(&self, keep: Keep) -> Option<&FileRecord> {
        self.representative_index(keep).map(|i| &self.files[i])
    }

    /// Every member except the representative, in input order.
    #[must_use]
    pub fn redundant(&self, keep: Keep) -> Vec<&FileRecord> {
        let keep_index = self.representative_index(keep);
        self.files
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != keep_index)
            .map(|(_, f)| f)
            .collect()
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from a grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of records seen
    pub total_files: usize,
    /// Records whose key could not be computed
    pub failed: usize,
    /// Number of distinct keys
    pub unique_keys: usize,
    /// Records that belong to a group of 2+
    pub grouped_files: usize,
    /// Records eliminated as unique (singleton keys)
    pub eliminated_unique: usize,
    /// Number of groups with 2+ files
    pub groups: usize,
}

/// Result of [`group_by_key`].
#[derive(Debug)]
pub struct Grouping<K, E> {
    /// Groups with 2+ members, in unspecified order
    pub groups: Vec<Group<K>>,
    /// Counters
    pub stats: GroupingStats,
    /// Records whose key extraction failed, with the error
    pub failures: Vec<(PathBuf, E)>,
}

/// Group records by a key and keep only keys with two or more members.
///
/// A failing key extraction is logged, recorded in
/// [`Grouping::failures`] and the record is left out.
pub fn group_by_key<K, E, F>(
    files: impl IntoIterator<Item = FileRecord>,
    mut key_fn: F,
) -> Grouping<K, E>
where
    K: Eq + StdHash + Clone,
    E: Display,
    F: FnMut(&FileRecord) -> Result<K, E>,
{
    let mut order: Vec<K> = Vec::new();
    let mut buckets: HashMap<K, Vec<FileRecord>> = HashMap::new();
    let mut stats = GroupingStats::default();
    let mut failures = Vec::new();

    for file in files {
        stats.total_files += 1;
        match key_fn(&file) {
            Ok(key) => {
                let bucket = buckets.entry(key.clone()).or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                });
                bucket.push(file);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", file.path.display(), e);
                stats.failed += 1;
                failures.push((file.path, e));
            }
        }
    }

    stats.unique_keys = buckets.len();

    let mut groups = Vec::new();
    for key in order {
        let Some(files) = buckets.remove(&key) else {
            continue;
        };
        if files.len() < 2 {
            stats.eliminated_unique += files.len();
            continue;
        }
        stats.grouped_files += files.len();
        stats.groups += 1;
        groups.push(Group::new(key, files));
    }

    log::debug!(
        "Grouping complete: {} files -> {} group(s) covering {} file(s)",
        stats.total_files,
        stats.groups,
        stats.grouped_files
    );

    Grouping {
        groups,
        stats,
        failures,
    }
}
