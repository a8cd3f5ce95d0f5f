#![forbid(unsafe_code)]

//! The pure unsaved-change decision.
//!
//! [`ChangeDetector::is_dirty`] looks at a form snapshot plus the active
//! operation tab and answers one question: would navigating away lose
//! something the user typed? It never mutates state; the guard consumes
//! the answer.
//!
//! Rules, in priority order:
//!
//! 1. The status tab never reports dirty.
//! 2. A non-empty multi-row buffer or a massive-form data marker is dirty
//!    regardless of field contents.
//! 3. Update: dirty iff any non-marker field is present.
//! 4. Insert/massive/assign: scan every field outside the audit exclusion
//!    list; text counts after trim, numbers count when nonzero and away
//!    from their configured default (foreign-key selectors only count when
//!    a sibling non-key field holds a real value), booleans count only
//!    when true, lists when non-empty.
//!
//! # Failure Modes
//!
//! Missing form data (`None`) is treated as "no changes" — a data-shape
//! error must never trap the user on a screen.

use wayline_core::access::TableFlags;

use crate::form::{FieldValue, FormSnapshot, MassiveMarker, MultiRowBuffer, OperationTab};

/// Field names excluded from change scanning (audit metadata).
pub const AUDIT_FIELDS: [&str; 7] = [
    "usercreatedid",
    "usermodifiedid",
    "datecreated",
    "datemodified",
    "modified_at",
    "modified_by",
    "auditid",
];

/// The status field with a default-active value that never counts alone.
pub const STATUS_FIELD: &str = "statusid";

/// Detector knobs.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    audit_fields: Vec<String>,
    status_field: String,
    /// Fallback default-active status value when table flags configure none.
    status_active_default: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            audit_fields: AUDIT_FIELDS.iter().map(|s| (*s).to_owned()).collect(),
            status_field: STATUS_FIELD.to_owned(),
            status_active_default: 1.0,
        }
    }
}

impl DetectorConfig {
    /// Defaults matching the standard table schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the audit exclusion list.
    #[must_use]
    pub fn with_audit_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audit_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    fn is_audit(&self, field: &str) -> bool {
        self.audit_fields.iter().any(|f| f == field)
    }
}

/// The pure change-detection function, parameterized by config.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    config: DetectorConfig,
}

impl ChangeDetector {
    /// Detector with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector with explicit configuration.
    #[must_use]
    pub fn with_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Whether the screen holds a significant unsaved change.
    #[must_use]
    pub fn is_dirty(
        &self,
        form: Option<&FormSnapshot>,
        flags: &TableFlags,
        tab: OperationTab,
        rows: &MultiRowBuffer,
        massive: &MassiveMarker,
    ) -> bool {
        if tab == OperationTab::Status {
            return false;
        }
        if !rows.is_empty() || massive.has_data {
            return true;
        }
        match tab {
            OperationTab::Status => false,
            OperationTab::Update => Self::update_has_edits(form),
            OperationTab::Insert | OperationTab::Massive | OperationTab::Assign => {
                self.scan_fields(form, flags)
            }
        }
    }

    /// Update rule: any field beyond the reserved markers means edits.
    fn update_has_edits(form: Option<&FormSnapshot>) -> bool {
        let Some(form) = form else {
            return false;
        };
        if form.is_empty() {
            return false;
        }
        form.real_keys().next().is_some()
    }

    /// Insert/massive scan over every non-audit field.
    fn scan_fields(&self, form: Option<&FormSnapshot>, flags: &TableFlags) -> bool {
        let Some(form) = form else {
            return false;
        };

        for (name, value) in form.iter() {
            if self.config.is_audit(name) {
                continue;
            }
            if name == self.config.status_field {
                if self.status_counts(value, flags) {
                    return true;
                }
                continue;
            }
            if self.field_counts(name, value, form, flags) {
                return true;
            }
        }
        false
    }

    /// The status selector counts only away from its default-active value.
    fn status_counts(&self, value: &FieldValue, flags: &TableFlags) -> bool {
        let active_default = flags
            .configured_default(&self.config.status_field)
            .unwrap_or(self.config.status_active_default);
        matches!(value, FieldValue::Number(n) if *n != active_default)
    }

    fn field_counts(
        &self,
        name: &str,
        value: &FieldValue,
        form: &FormSnapshot,
        flags: &TableFlags,
    ) -> bool {
        match value {
            FieldValue::Empty => false,
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Flag(b) => *b,
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Group(members) => members.values().any(group_member_present),
            FieldValue::Number(n) => {
                if *n == 0.0 || *n == flags.default_for(name) {
                    return false;
                }
                if is_foreign_key(name) {
                    // A pre-filled selector alone is a default, not an edit.
                    self.has_real_sibling(form, name)
                } else {
                    true
                }
            }
        }
    }

    /// Whether some non-key, non-audit sibling of `fk` holds a real value.
    fn has_real_sibling(&self, form: &FormSnapshot, fk: &str) -> bool {
        form.iter().any(|(name, value)| {
            if name == fk || is_foreign_key(name) || self.config.is_audit(name) {
                return false;
            }
            match value {
                FieldValue::Text(s) => !s.trim().is_empty(),
                FieldValue::Number(n) => *n > 0.0,
                FieldValue::Flag(b) => *b,
                _ => false,
            }
        })
    }
}

/// Reference-selector heuristic: `*id` names point at other tables.
fn is_foreign_key(name: &str) -> bool {
    name.ends_with("id") && name != STATUS_FIELD
}

/// Membership test for nested group values.
fn group_member_present(value: &FieldValue) -> bool {
    match value {
        FieldValue::Empty => false,
        FieldValue::Text(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ChangeDetector {
        ChangeDetector::new()
    }

    fn clean_context() -> (TableFlags, MultiRowBuffer, MassiveMarker) {
        (TableFlags::new(), MultiRowBuffer::new(), MassiveMarker::empty())
    }

    #[test]
    fn missing_form_is_never_dirty() {
        let (flags, rows, massive) = clean_context();
        assert!(!detector().is_dirty(None, &flags, OperationTab::Insert, &rows, &massive));
        assert!(!detector().is_dirty(None, &flags, OperationTab::Update, &rows, &massive));
    }

    #[test]
    fn status_tab_is_never_dirty() {
        let (flags, _, _) = clean_context();
        let form = FormSnapshot::new().with("anything", "typed");
        let mut rows = MultiRowBuffer::new();
        rows.push(FormSnapshot::new());
        // Even buffered rows do not make the status tab dirty.
        assert!(!detector().is_dirty(
            Some(&form),
            &flags,
            OperationTab::Status,
            &rows,
            &MassiveMarker::with_data(),
        ));
    }

    #[test]
    fn trimmed_empty_text_does_not_count() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("name", "   ");
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn nonempty_text_counts_against_empty_default() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("sensorType", "temp");
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn number_at_configured_default_does_not_count() {
        let (_, rows, massive) = clean_context();
        let flags = TableFlags::new().with_default("threshold", 5.0);
        let form = FormSnapshot::new().with("threshold", 5.0);
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));

        let form = FormSnapshot::new().with("threshold", 7.0);
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn lone_foreign_key_is_a_default_not_an_edit() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("nodeid", 3.0);
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn foreign_key_counts_with_a_real_sibling() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("nodeid", 3.0).with("name", "north field");
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn sibling_foreign_keys_do_not_vouch_for_each_other() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("nodeid", 3.0).with("metricid", 2.0);
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn default_active_status_alone_is_clean() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("statusid", 1.0);
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));

        let form = FormSnapshot::new().with("statusid", 2.0);
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn audit_fields_are_ignored() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new()
            .with("usercreatedid", 9.0)
            .with("datecreated", "2026-01-01")
            .with("auditid", 44.0);
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn false_flag_does_not_count_true_does() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("enabled", false);
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));

        let form = FormSnapshot::new().with("enabled", true);
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn list_counts_when_nonempty() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("targets", FieldValue::List(vec![]));
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));

        let form =
            FormSnapshot::new().with("targets", FieldValue::List(vec![FieldValue::text("a")]));
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn update_marker_only_form_is_clean() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::open_marker(false);
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Update, &rows, &massive));
    }

    #[test]
    fn update_with_real_field_is_dirty() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::open_marker(false).with("name", "renamed");
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Update, &rows, &massive));
    }

    #[test]
    fn buffered_rows_override_field_scan() {
        let (flags, _, massive) = clean_context();
        let mut rows = MultiRowBuffer::new();
        rows.push(FormSnapshot::new());
        assert!(detector().is_dirty(None, &flags, OperationTab::Insert, &rows, &massive));
    }

    #[test]
    fn massive_marker_overrides_field_scan() {
        let (flags, rows, _) = clean_context();
        assert!(detector().is_dirty(
            None,
            &flags,
            OperationTab::Massive,
            &rows,
            &MassiveMarker::with_data(),
        ));
    }

    #[test]
    fn assign_detects_like_insert() {
        let (flags, rows, massive) = clean_context();
        let form = FormSnapshot::new().with("profile", "operators");
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Assign, &rows, &massive));
    }

    #[test]
    fn group_counts_when_any_member_present() {
        let (flags, rows, massive) = clean_context();
        let mut members = ahash::HashMap::default();
        members.insert("street".to_owned(), FieldValue::text(""));
        let form = FormSnapshot::new().with("address", FieldValue::Group(members.clone()));
        assert!(!detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));

        members.insert("city".to_owned(), FieldValue::text("lima"));
        let form = FormSnapshot::new().with("address", FieldValue::Group(members));
        assert!(detector().is_dirty(Some(&form), &flags, OperationTab::Insert, &rows, &massive));
    }
}
