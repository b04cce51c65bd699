//! Grouping of records by prefix and instance name.
//!
//! Both groupings keep first-seen order. Folder creation downstream depends
//! on the order groups are visited, so the output tree follows the input.

use indexmap::IndexMap;
use log::debug;

use tagtree_core::record::TagRecord;

/// Records partitioned by prefix, in first-seen prefix order.
#[derive(Debug, Clone, Default)]
pub struct PrefixGroups<'r> {
    groups: IndexMap<&'r str, Vec<&'r TagRecord>>,
}

impl<'r> PrefixGroups<'r> {
    /// Groups `records` by prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagtree_core::record::TagRecord;
    /// use tagtree_parser::PrefixGroups;
    ///
    /// let records = vec![
    ///     TagRecord::new("P2", "a", None, None),
    ///     TagRecord::new("P1", "b", None, None),
    ///     TagRecord::new("P2", "c", None, None),
    /// ];
    ///
    /// let groups = PrefixGroups::new(&records);
    /// let prefixes: Vec<_> = groups.prefixes().collect();
    /// assert_eq!(prefixes, ["P2", "P1"]);
    /// assert_eq!(groups.get("P2").unwrap().len(), 2);
    /// ```
    pub fn new(records: &'r [TagRecord]) -> Self {
        let mut groups: IndexMap<&'r str, Vec<&'r TagRecord>> = IndexMap::new();
        for record in records {
            groups.entry(record.prefix()).or_default().push(record);
        }
        debug!(prefixes = groups.len(); "Records grouped by prefix");
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the distinct prefixes in first-seen order.
    pub fn prefixes(&self) -> impl Iterator<Item = &'r str> + '_ {
        self.groups.keys().copied()
    }

    /// Returns the records of one prefix, in input order.
    pub fn get(&self, prefix: &str) -> Option<&[&'r TagRecord]> {
        self.groups.get(prefix).map(Vec::as_slice)
    }

    /// Iterates over `(prefix, records)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&'r str, &[&'r TagRecord])> + '_ {
        self.groups
            .iter()
            .map(|(prefix, records)| (*prefix, records.as_slice()))
    }
}

/// Splits the records of one prefix by instance name, in first-seen order.
pub fn group_by_instance<'r>(records: &[&'r TagRecord]) -> IndexMap<&'r str, Vec<&'r TagRecord>> {
    let mut instances: IndexMap<&'r str, Vec<&'r TagRecord>> = IndexMap::new();
    for &record in records {
        instances
            .entry(record.instance_name())
            .or_default()
            .push(record);
    }
    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prefix: &str, instance: &str, bit: &str) -> TagRecord {
        TagRecord::new(prefix, instance, Some(bit.to_string()), None)
    }

    #[test]
    fn test_first_seen_prefix_order() {
        let records = vec![
            record("Zeta", "a", "1"),
            record("Alpha", "b", "1"),
            record("Zeta", "c", "2"),
            record("Mid", "d", "1"),
        ];

        let groups = PrefixGroups::new(&records);
        let prefixes: Vec<_> = groups.prefixes().collect();

        assert_eq!(prefixes, ["Zeta", "Alpha", "Mid"]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_group_keeps_record_order() {
        let records = vec![
            record("P", "a", "3"),
            record("Q", "x", "1"),
            record("P", "a", "1"),
        ];

        let groups = PrefixGroups::new(&records);
        let bits: Vec<_> = groups
            .get("P")
            .unwrap()
            .iter()
            .filter_map(|r| r.bit())
            .collect();

        assert_eq!(bits, ["3", "1"]);
    }

    #[test]
    fn test_group_by_instance_first_seen() {
        let records = vec![
            record("P", "M2", "1"),
            record("P", "M1", "1"),
            record("P", "M2", "2"),
        ];
        let refs: Vec<_> = records.iter().collect();

        let instances = group_by_instance(&refs);
        let names: Vec<_> = instances.keys().copied().collect();

        assert_eq!(names, ["M2", "M1"]);
        assert_eq!(instances["M2"].len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let groups = PrefixGroups::new(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.iter().count(), 0);
    }
}
