use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// SpeedLimit – numeric cell that can live in ordered collections
// ---------------------------------------------------------------------------

/// A posted speed limit in km/h.
///
/// Wraps `f64` with a total order so values can be grouped in `BTreeMap`s.
#[derive(Debug, Clone, Copy)]
pub struct SpeedLimit(pub f64);

impl SpeedLimit {
    /// Coerce a raw cell into a speed limit. Non-numeric text is missing.
    /// `-0` is folded into `0` so both group as one value.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| SpeedLimit(if v == 0.0 { 0.0 } else { v }))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for SpeedLimit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SpeedLimit {}

impl PartialOrd for SpeedLimit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SpeedLimit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for SpeedLimit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for SpeedLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for SpeedLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

// ---------------------------------------------------------------------------
// Column – the fields the dashboard understands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    District,
    Jurisdiction,
    SpeedLimit,
    CameraDirection,
    InstallationLocation,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::District,
        Column::Jurisdiction,
        Column::SpeedLimit,
        Column::CameraDirection,
        Column::InstallationLocation,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of recognised columns present in a loaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSet(u8);

impl ColumnSet {
    pub fn all() -> Self {
        Column::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, column: Column) {
        self.0 |= column.bit();
    }

    pub fn contains(self, column: Column) -> bool {
        self.0 & column.bit() != 0
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        let mut set = ColumnSet::default();
        for column in iter {
            set.insert(column);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single enforcement device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub district: Option<String>,
    pub jurisdiction: Option<String>,
    pub speed_limit: Option<SpeedLimit>,
    pub camera_direction: Option<String>,
    pub installation_location: Option<String>,
    /// Every cell of the source row, in header order, for tabular display.
    pub cells: Vec<String>,
}

/// Blank cells are missing; anything else is kept verbatim.
pub fn text_cell(raw: &str) -> Option<String> {
    (!raw.trim().is_empty()).then(|| raw.to_string())
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table. Immutable once loaded; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records in file order.
    pub records: Vec<Record>,
    /// Trimmed header names in file order.
    pub headers: Vec<String>,
    /// Recognised columns found in the header.
    pub columns: ColumnSet,
    /// Header name of each recognised column, used in notices.
    pub column_labels: [String; 5],
}

impl Dataset {
    pub fn new(
        records: Vec<Record>,
        headers: Vec<String>,
        columns: ColumnSet,
        column_labels: [String; 5],
    ) -> Self {
        Self {
            records,
            headers,
            columns,
            column_labels,
        }
    }

    /// Build a dataset straight from records, with every column present.
    /// Mostly useful for tests and generated data.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            headers: Vec::new(),
            columns: ColumnSet::all(),
            column_labels: [
                "district".to_string(),
                "jurisdiction".to_string(),
                "speed_limit".to_string(),
                "camera_direction".to_string(),
                "installation_location".to_string(),
            ],
        }
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(column)
    }

    /// Header name of a recognised column.
    pub fn label(&self, column: Column) -> &str {
        &self.column_labels[column as usize]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
