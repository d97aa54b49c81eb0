//! Built-in demo catalog
//!
//! Used when no policy file is configured. Two tables: `users` carries a
//! mix of public, PII and confidential fields; `orders` is all public.

use super::{Catalog, CatalogResult, FieldDef, FieldType, Sensitivity, TableDef};

/// Demo table names
pub const USERS_TABLE: &str = "users";
pub const ORDERS_TABLE: &str = "orders";

/// Create the TableDef for `users`
pub fn users_table_def() -> TableDef {
    TableDef::new(USERS_TABLE)
        .field(FieldDef::new("id", FieldType::Int, Sensitivity::Public))
        .field(FieldDef::new("name", FieldType::String, Sensitivity::Public))
        .field(FieldDef::new("email", FieldType::String, Sensitivity::Pii))
        .field(FieldDef::new(
            "salary",
            FieldType::Float,
            Sensitivity::Confidential,
        ))
}

/// Create the TableDef for `orders`
pub fn orders_table_def() -> TableDef {
    TableDef::new(ORDERS_TABLE)
        .field(FieldDef::new("order_id", FieldType::Int, Sensitivity::Public))
        .field(FieldDef::new("user_id", FieldType::Int, Sensitivity::Public))
        .field(FieldDef::new("amount", FieldType::Float, Sensitivity::Public))
        .field(FieldDef::new("order_date", FieldType::Date, Sensitivity::Public))
}

/// Get all demo table definitions
pub fn demo_tables() -> Vec<TableDef> {
    vec![users_table_def(), orders_table_def()]
}

/// Build a catalog holding the demo tables
pub fn demo_catalog() -> CatalogResult<Catalog> {
    let mut catalog = Catalog::new();
    for def in demo_tables() {
        catalog.create_table(def)?;
    }
    Ok(catalog)
}
