//! Shared test utilities
//!
//! Note: clippy reports false-positive dead_code warnings because it can't
//! trace usage across test binaries. These utilities are used by multiple tests.

#![allow(dead_code)]

pub mod generators;

use std::sync::Arc;

use fieldguard::catalog::builtin::demo_catalog;
use fieldguard::generator::Generator;
use fieldguard::{AuditLog, QueryGuard, RolePolicy};

pub use generators::{FailingGenerator, ScriptedGenerator};

/// Guard over the demo catalog and built-in roles.
pub fn demo_guard(generator: Arc<dyn Generator>) -> (QueryGuard, Arc<AuditLog>) {
    let audit = Arc::new(AuditLog::new());
    let guard = QueryGuard::new(
        Arc::new(demo_catalog().unwrap()),
        Arc::new(RolePolicy::builtin()),
        Arc::clone(&audit),
        generator,
    );
    (guard, audit)
}
