use crate::phototree_core::criterion::{Criterion, CriterionValue};
use crate::phototree_core::record::Record;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A folder in the planned output tree together with the records it governs
/// and the criteria still to be applied beneath it.
///
/// Nodes are never mutated after construction. Children are built on demand
/// and owned by the caller, so a full tree is never held in memory at once.
#[derive(Debug, Clone)]
pub struct PartitionNode {
    folder: PathBuf,
    records: Vec<Record>,
    remaining: Vec<Criterion>,
}

impl PartitionNode {
    pub fn new(folder: impl Into<PathBuf>, records: Vec<Record>, criteria: Vec<Criterion>) -> Self {
        Self {
            folder: folder.into(),
            records,
            remaining: criteria,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn remaining_criteria(&self) -> &[Criterion] {
        &self.remaining
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.records.iter().map(|r| r.path.clone()).collect()
    }

    /// True once every criterion has been applied.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Split this node on its first remaining criterion.
    ///
    /// Returns one child per distinct value, each holding the matching
    /// records in their original order. Exhausted or empty nodes have no
    /// children.
    pub fn children(&self) -> Vec<PartitionNode> {
        let Some((criterion, rest)) = self.remaining.split_first() else {
            return Vec::new();
        };

        let mut groups: BTreeMap<CriterionValue, Vec<Record>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry(criterion.extract(record))
                .or_default()
                .push(record.clone());
        }

        groups
            .into_iter()
            .map(|(value, records)| PartitionNode {
                folder: self.folder.join(value.render()),
                records,
                remaining: rest.to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use time::macros::datetime;

    fn record(path: &str, ts: time::OffsetDateTime, country: Option<&str>, city: Option<&str>) -> Record {
        Record::new(path, ts, country.map(String::from), city.map(String::from))
    }

    fn sample() -> Vec<Record> {
        vec![
            record("p1.jpg", datetime!(2020-01-01 0:00 UTC), Some("Aus"), Some("Bri")),
            record("p2.jpg", datetime!(2020-02-01 0:00 UTC), Some("Aus"), Some("Mel")),
            record("p3.jpg", datetime!(2021-01-01 0:00 UTC), Some("NZ"), Some("Akl")),
            record("p4.jpg", datetime!(2021-05-09 0:00 UTC), None, None),
        ]
    }

    #[test]
    fn test_exhausted_node_has_no_children() {
        let node = PartitionNode::new("out", sample(), vec![]);
        assert!(node.is_exhausted());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_empty_node_has_no_children() {
        let node = PartitionNode::new("out", vec![], vec![Criterion::Year]);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_children_partition_records() {
        let node = PartitionNode::new("out", sample(), vec![Criterion::Year, Criterion::Country]);
        let children = node.children();
        assert_eq!(children.len(), 2);

        let folders: HashSet<PathBuf> = children.iter().map(|c| c.folder().to_path_buf()).collect();
        assert!(folders.contains(Path::new("out/2020")));
        assert!(folders.contains(Path::new("out/2021")));

        for child in &children {
            assert_eq!(child.remaining_criteria(), &[Criterion::Country]);
        }

        let total: usize = children.iter().map(|c| c.records().len()).sum();
        assert_eq!(total, node.records().len());

        let all: HashSet<PathBuf> = children.iter().flat_map(|c| c.file_paths()).collect();
        assert_eq!(all.len(), node.records().len());
    }

    #[test]
    fn test_children_keep_record_order() {
        let node = PartitionNode::new("out", sample(), vec![Criterion::Year]);
        let children = node.children();
        let y2020 = children
            .iter()
            .find(|c| c.folder() == Path::new("out/2020"))
            .unwrap();
        assert_eq!(
            y2020.file_paths(),
            vec![PathBuf::from("p1.jpg"), PathBuf::from("p2.jpg")]
        );
    }

    #[test]
    fn test_missing_country_grouped_under_sentinel() {
        let node = PartitionNode::new("out", sample(), vec![Criterion::Country]);
        let children = node.children();
        let unknown = children
            .iter()
            .find(|c| c.folder() == Path::new("out/Unknown_country"))
            .expect("records without a country must not be dropped");
        assert_eq!(unknown.file_paths(), vec![PathBuf::from("p4.jpg")]);
    }

    #[test]
    fn test_missing_city_grouped_under_sentinel() {
        let node = PartitionNode::new("out", sample(), vec![Criterion::City]);
        let children = node.children();
        assert_eq!(children.len(), 4);
        assert!(children.iter().any(|c| c.folder() == Path::new("out/Unknown_city")));
    }
}
