//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Generic key-based grouping (content hash, file name)
//! - Representative selection (oldest / newest)
//! - Missing-file detection against the main directory

pub mod finder;
pub mod groups;

pub use finder::{find_missing, find_same_content, find_same_name, relocate, MissingEntry, MissingScan};
pub use groups::{group_by_key, Group, Grouping, GroupingStats, Keep};
