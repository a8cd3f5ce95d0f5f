#![forbid(unsafe_code)]

//! Form state as the navigation subsystem sees it.
//!
//! Screens report their editable state as a [`FormSnapshot`]: a flat map
//! from field name to [`FieldValue`]. The subsystem never interprets what
//! the fields mean; it only decides whether they amount to a significant
//! unsaved change. Two reserved marker keys let the update form signal
//! "open but untouched" without exposing its real fields.

use ahash::{HashMap, HashMapExt};

use wayline_core::menu::Operation;

/// Marker key: the update form is open.
pub const MARKER_FORM_OPEN: &str = "__form_open";

/// Marker key: the update form has real edits.
pub const MARKER_HAS_CHANGES: &str = "__has_changes";

/// The operation tab a screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationTab {
    /// Read-only listing.
    Status,
    /// Creation form.
    Insert,
    /// Edit-existing form.
    Update,
    /// Bulk-entry form.
    Massive,
    /// Permission-assignment form (detected like insert).
    Assign,
}

impl From<Operation> for OperationTab {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Status => Self::Status,
            Operation::Insert => Self::Insert,
            Operation::Update => Self::Update,
            Operation::Massive => Self::Massive,
            Operation::Assign => Self::Assign,
        }
    }
}

/// One field's value, shaped after what forms actually hold.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null/unset.
    Empty,
    /// Free text.
    Text(String),
    /// Numeric input or selector id.
    Number(f64),
    /// Checkbox.
    Flag(bool),
    /// Multi-select or accumulated entries.
    List(Vec<FieldValue>),
    /// Nested sub-form.
    Group(HashMap<String, FieldValue>),
}

impl FieldValue {
    /// Shorthand for a text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

/// A screen's editable state at one instant.
#[derive(Debug, Clone, Default)]
pub struct FormSnapshot {
    fields: HashMap<String, FieldValue>,
}

impl FormSnapshot {
    /// An empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Set a field, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The "open but untouched" update-form marker snapshot.
    #[must_use]
    pub fn open_marker(has_changes: bool) -> Self {
        Self::new()
            .with(MARKER_FORM_OPEN, true)
            .with(MARKER_HAS_CHANGES, has_changes)
    }

    /// Set a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Iterate `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names that are not reserved markers.
    pub fn real_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .filter(|k| *k != MARKER_FORM_OPEN && *k != MARKER_HAS_CHANGES)
    }

    /// The `__has_changes` marker, if present and boolean.
    #[must_use]
    pub fn has_changes_marker(&self) -> Option<bool> {
        match self.fields.get(MARKER_HAS_CHANGES) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }
}

impl<S: Into<String>, V: Into<FieldValue>> FromIterator<(S, V)> for FormSnapshot {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

/// Accumulated multi-record rows awaiting submission.
#[derive(Debug, Clone, Default)]
pub struct MultiRowBuffer {
    rows: Vec<FormSnapshot>,
}

impl MultiRowBuffer {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push(&mut self, row: FormSnapshot) {
        self.rows.push(row);
    }

    /// Number of buffered rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Signal from the massive-entry form that it holds data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MassiveMarker {
    /// Whether the bulk form holds anything worth keeping.
    pub has_data: bool,
}

impl MassiveMarker {
    /// No data.
    #[must_use]
    pub const fn empty() -> Self {
        Self { has_data: false }
    }

    /// Data present.
    #[must_use]
    pub const fn with_data() -> Self {
        Self { has_data: true }
    }
}
