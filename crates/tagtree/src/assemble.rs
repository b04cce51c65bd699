//! Tree assembly.
//!
//! Visits prefix groups in first-seen order, resolves the folder of each
//! prefix in the shared [`Forest`], and appends one instance per distinct
//! instance name of the group.

use log::debug;

use tagtree_core::{record::TagRecord, tree::Forest};
use tagtree_parser::{PrefixGroups, group_by_instance};

use crate::{TagTreeError, instantiate::Instantiator};

/// Counters collected while assembling a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub records: usize,
    pub prefixes: usize,
    pub folders: usize,
    pub instances: usize,
    /// Descriptions dropped because their template has no matching slot.
    pub unmatched_bits: usize,
}

/// The assembled tree and its counters.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub forest: Forest,
    pub stats: BuildStats,
}

/// Assembles `records` into a new forest.
///
/// # Errors
///
/// Stops at the first instance whose template is missing and returns
/// [`TagTreeError::MissingTemplate`].
pub fn assemble(
    records: &[TagRecord],
    instantiator: &Instantiator<'_>,
) -> Result<Assembly, TagTreeError> {
    let groups = PrefixGroups::new(records);
    let mut forest = Forest::new();
    let mut stats = BuildStats {
        records: records.len(),
        prefixes: groups.len(),
        ..BuildStats::default()
    };

    for (prefix, group) in groups.iter() {
        debug!(prefix, records = group.len(); "Processing prefix");
        let children = forest.resolve(prefix);

        for (instance_name, instance_records) in group_by_instance(group) {
            let built = instantiator.instantiate(instance_name, &instance_records)?;
            stats.unmatched_bits += built.unmatched_bits;
            stats.instances += 1;
            children.push_instance(built.instance);
        }
    }

    stats.folders = forest.folder_count();

    Ok(Assembly { forest, stats })
}
