//! Domain types shared by the store, the ingestion pipeline and analytics.

/// A stored row derived from one ingested directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Surrogate identifier assigned by the store
    pub id: i64,
    /// Display name of the entry
    pub name: String,
    /// Originating locality (persisted as `state`)
    pub region: String,
    /// Character count of `name` at ingestion time (persisted as `size`)
    pub name_length: i64,
    /// Character count of the contact string at ingestion time (persisted as `length`)
    pub contact_length: f64,
}

/// A record that has not been stored yet.
///
/// The derived lengths are computed once, from the strings observed at
/// ingestion, and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub name: String,
    pub region: String,
    pub name_length: i64,
    pub contact_length: f64,
}

impl NewRecord {
    /// Build a record from its source strings, deriving both lengths.
    pub fn derive(name: &str, region: &str, contact: &str) -> Self {
        Self {
            name: name.to_string(),
            region: region.to_string(),
            name_length: name.chars().count() as i64,
            contact_length: contact.chars().count() as f64,
        }
    }

    /// Build a record with explicit lengths.
    pub fn with_lengths(name: &str, region: &str, name_length: i64, contact_length: f64) -> Self {
        Self {
            name: name.to_string(),
            region: region.to_string(),
            name_length,
            contact_length,
        }
    }
}

/// Numeric columns that support aggregate and value queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    NameLength,
    ContactLength,
}

impl NumericColumn {
    /// Column name in the persisted table.
    pub fn as_sql(&self) -> &'static str {
        match self {
            NumericColumn::NameLength => "size",
            NumericColumn::ContactLength => "length",
        }
    }
}
