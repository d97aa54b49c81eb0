//! Catalog - Table metadata (fields, types, sensitivity labels)
//!
//! The catalog stores the schema of every table the guard knows about.
//! Each field carries a sensitivity label that the role policy uses to
//! decide visibility. The catalog is built once at startup and is
//! read-only afterwards.

pub mod builtin;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Integer
    Int,
    /// Character data
    String,
    /// Floating point
    Float,
    /// Calendar date
    Date,
    /// Date and time
    Timestamp,
    /// Boolean (true/false)
    Boolean,
}

impl FieldType {
    /// Lower-case name used in prompts and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::String => "string",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Timestamp => "timestamp",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data sensitivity label attached to every field
///
/// The three standard labels have their own variants. Any other label is
/// kept by name and matches only the same name. A field with no label
/// loads as `Unclassified`, which no role can be granted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sensitivity {
    /// Visible to everyone with any access
    Public,
    /// Personally identifiable information
    Pii,
    /// Business confidential
    Confidential,
    /// Deployment-defined label, stored lower-cased
    Label(String),
    /// Missing label
    #[default]
    Unclassified,
}

impl Sensitivity {
    /// Parse a label (case-insensitive). Blank text maps to `Unclassified`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unclassified" => Sensitivity::Unclassified,
            "public" => Sensitivity::Public,
            "pii" => Sensitivity::Pii,
            "confidential" => Sensitivity::Confidential,
            other => Sensitivity::Label(other.to_string()),
        }
    }

    /// Canonical label text
    pub fn as_str(&self) -> &str {
        match self {
            Sensitivity::Public => "public",
            Sensitivity::Pii => "PII",
            Sensitivity::Confidential => "confidential",
            Sensitivity::Label(name) => name.as_str(),
            Sensitivity::Unclassified => "unclassified",
        }
    }

    /// Whether a role may ever be granted this label
    pub fn is_grantable(&self) -> bool {
        !matches!(self, Sensitivity::Unclassified)
    }
}

impl From<String> for Sensitivity {
    fn from(s: String) -> Self {
        Sensitivity::parse(&s)
    }
}

impl From<Sensitivity> for String {
    fn from(s: Sensitivity) -> Self {
        match s {
            Sensitivity::Label(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name (unique within its table)
    pub name: String,
    /// Data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Sensitivity label
    #[serde(default)]
    pub sensitivity: Sensitivity,
}

impl FieldDef {
    /// Create a new field definition
    pub fn new(name: impl Into<String>, field_type: FieldType, sensitivity: Sensitivity) -> Self {
        Self {
            name: name.into(),
            field_type,
            sensitivity,
        }
    }

    /// "name (type)" rendering used in responses
    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, self.field_type)
    }
}

/// Table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDef {
    /// Table name
    #[serde(skip)]
    pub name: String,
    /// Field definitions, in declaration order
    pub fields: Vec<FieldDef>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    fn check_unique_fields(&self) -> CatalogResult<()> {
        let mut seen = BTreeSet::new();
        for f in &self.fields {
            if !seen.insert(f.name.to_lowercase()) {
                return Err(CatalogError::DuplicateField(
                    self.name.clone(),
                    f.name.clone(),
                ));
            }
        }
        Ok(())
    }
}

/// Catalog error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableExists(String),
    /// Table not found
    #[error("Table '{0}' not found")]
    TableNotFound(String),
    /// Two fields share a name within one table
    #[error("Duplicate field '{1}' in table '{0}'")]
    DuplicateField(String, String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Schema catalog - table name to table definition
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    /// Tables by name
    tables: HashMap<String, TableDef>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Add a table. Fails on a duplicate table or duplicate field names.
    pub fn create_table(&mut self, def: TableDef) -> CatalogResult<()> {
        if self.tables.contains_key(&def.name) {
            return Err(CatalogError::TableExists(def.name.clone()));
        }
        def.check_unique_fields()?;
        self.tables.insert(def.name.clone(), def);
        Ok(())
    }

    /// Look up a table definition
    pub fn lookup(&self, name: &str) -> CatalogResult<&TableDef> {
        self.tables
            .get(name)
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// List all table names, sorted
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// All table names, lower-cased (used to drop table references during extraction)
    pub fn table_names(&self) -> BTreeSet<String> {
        self.tables.keys().map(|s| s.to_lowercase()).collect()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the catalog has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
