// Copyright 2025 Oxide Computer Company

//! Diff report assembly
//!
//! Comparators build fresh partial reports and callers merge them upward,
//! optionally attaching a context label to every finding as it crosses a
//! level.  Buckets are ordered sets, so findings are unique and serialize in
//! a stable order; serializing the same report twice yields identical bytes.

use serde::Serialize;
use std::collections::BTreeSet;

/// Classified findings for the endpoint tree: paths, methods, parameters,
/// and responses.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EndpointFindings {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub deprecated: BTreeSet<String>,
    pub breaking: BTreeSet<String>,
    pub updated: BTreeSet<String>,
}

/// Classified findings for named model schemas.  Findings here are bare
/// model names.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ModelFindings {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub breaking: BTreeSet<String>,
    pub updated: BTreeSet<String>,
}

/// Aggregate result of one diff invocation.
///
/// Created empty, populated only by merging the partial reports of nested
/// comparators, and not modified after being returned.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DiffReport {
    pub endpoints: EndpointFindings,
    pub models: ModelFindings,
}

impl DiffReport {
    pub fn new() -> DiffReport {
        DiffReport::default()
    }

    /// Returns true if every bucket in every group is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of findings across all buckets.
    pub fn len(&self) -> usize {
        let endpoints = &self.endpoints;
        let models = &self.models;
        endpoints.added.len()
            + endpoints.removed.len()
            + endpoints.deprecated.len()
            + endpoints.breaking.len()
            + endpoints.updated.len()
            + models.added.len()
            + models.removed.len()
            + models.breaking.len()
            + models.updated.len()
    }

    /// Folds `source` into this report.
    ///
    /// With a label, every finding from `source` is prefixed with the label
    /// and a single space as it lands.  Set semantics absorb exact
    /// duplicates.
    pub fn merge_from(&mut self, source: DiffReport, label: Option<&str>) {
        merge_bucket(&mut self.endpoints.added, source.endpoints.added, label);
        merge_bucket(
            &mut self.endpoints.removed,
            source.endpoints.removed,
            label,
        );
        merge_bucket(
            &mut self.endpoints.deprecated,
            source.endpoints.deprecated,
            label,
        );
        merge_bucket(
            &mut self.endpoints.breaking,
            source.endpoints.breaking,
            label,
        );
        merge_bucket(
            &mut self.endpoints.updated,
            source.endpoints.updated,
            label,
        );
        merge_bucket(&mut self.models.added, source.models.added, label);
        merge_bucket(&mut self.models.removed, source.models.removed, label);
        merge_bucket(&mut self.models.breaking, source.models.breaking, label);
        merge_bucket(&mut self.models.updated, source.models.updated, label);
    }
}

fn merge_bucket(
    target: &mut BTreeSet<String>,
    source: BTreeSet<String>,
    label: Option<&str>,
) {
    for finding in source {
        target.insert(match label {
            Some(label) => format!("{} {}", label, finding),
            None => finding,
        });
    }
}

/// Renders a bracketed context label for finding messages.
/// `format_label(&["GET", "/items"])` produces `"[GET /items]"`.
pub fn format_label(parts: &[&str]) -> String {
    format!("[{}]", parts.join(" "))
}

#[cfg(test)]
mod test {
    use super::format_label;
    use super::DiffReport;

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(&["/users"]), "[/users]");
        assert_eq!(format_label(&["GET", "/items"]), "[GET /items]");
    }

    #[test]
    fn test_empty_report() {
        let report = DiffReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
    }

    #[test]
    fn test_merge_applies_label_once() {
        let mut inner = DiffReport::new();
        inner
            .endpoints
            .breaking
            .insert("query parameter limit is now required".to_string());

        let mut outer = DiffReport::new();
        outer.merge_from(inner, Some("[GET /items]"));

        let mut top = DiffReport::new();
        top.merge_from(outer, None);

        assert_eq!(top.endpoints.breaking.len(), 1);
        assert!(top
            .endpoints
            .breaking
            .contains("[GET /items] query parameter limit is now required"));
    }

    #[test]
    fn test_merge_absorbs_duplicates() {
        let mut a = DiffReport::new();
        a.models.updated.insert("User".to_string());
        let mut b = DiffReport::new();
        b.models.updated.insert("User".to_string());

        let mut target = DiffReport::new();
        target.merge_from(a, None);
        target.merge_from(b, None);
        assert_eq!(target.models.updated.len(), 1);
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn test_serialized_buckets_are_sorted() {
        let mut report = DiffReport::new();
        report.endpoints.added.insert("/b".to_string());
        report.endpoints.added.insert("/a".to_string());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["endpoints"]["added"],
            serde_json::json!(["/a", "/b"])
        );
    }
}
