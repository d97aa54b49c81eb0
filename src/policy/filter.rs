//! Access filter - the fields of a table a role may see

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{FieldDef, Sensitivity, TableDef};

/// Fields of a table that are visible under a role's labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGrant {
    pub role: String,
    pub table: String,
    /// Allowed fields, in table order
    pub allowed: Vec<FieldDef>,
}

impl AccessGrant {
    /// Filter `table` by `sensitivities` on behalf of `role`
    pub fn new(role: &str, table: &TableDef, sensitivities: &BTreeSet<Sensitivity>) -> Self {
        Self {
            role: role.to_string(),
            table: table.name.clone(),
            allowed: compute_allowed_fields(table, sensitivities),
        }
    }

    /// Whether the role can see nothing in this table
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// "name (type)" entries for display
    pub fn describe(&self) -> Vec<String> {
        self.allowed.iter().map(|f| f.describe()).collect()
    }
}

/// Fields of `table` whose label is in `sensitivities`, preserving table order
///
/// `Unclassified` fields are never returned, even if the set names them.
pub fn compute_allowed_fields(
    table: &TableDef,
    sensitivities: &BTreeSet<Sensitivity>,
) -> Vec<FieldDef> {
    table
        .fields
        .iter()
        .filter(|f| f.sensitivity.is_grantable() && sensitivities.contains(&f.sensitivity))
        .cloned()
        .collect()
}
