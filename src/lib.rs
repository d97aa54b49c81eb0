//! fieldguard - field-level access guard for generated SQL
//!
//! Sits between a natural-language-to-SQL generator and a catalog of
//! sensitivity-labelled tables:
//! - the role policy decides which fields of a table a role may see
//! - only those fields are offered to the generator
//! - the generated SQL is checked for references to any other field
//! - every decision is appended to an in-memory audit log

pub mod audit;
pub mod catalog;
pub mod config;
pub mod decision;
pub mod generator;
pub mod guard;
pub mod policy;
pub mod server;
pub mod sql;

pub use audit::{AuditError, AuditLog};
pub use catalog::{Catalog, CatalogError, FieldDef, FieldType, Sensitivity, TableDef};
pub use decision::{Decision, DecisionEngine, Outcome, QueryRequest, Verdict};
pub use guard::{GuardError, GuardOutcome, QueryGuard};
pub use policy::{AccessGrant, RolePolicy};
pub use sql::{Extraction, ExtractionPath, FieldExtractor};
