//! Query guard - the request pipeline
//!
//! role + table → allowed fields → generator → decision → audit log.
//! Table lookup failures stop the request before the generator runs.
//! Generator failures still produce a logged, rejected decision.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::audit::{AuditError, AuditLog};
use crate::catalog::{Catalog, CatalogError, TableDef};
use crate::decision::{Decision, DecisionEngine, QueryRequest, Verdict, NO_ACCESS_RESPONSE};
use crate::generator::{build_prompt, Generator};
use crate::policy::{AccessGrant, RolePolicy};
use crate::sql::FieldExtractor;

/// Pipeline errors. Anything else ends in a logged decision.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Requested table is not in the catalog
    #[error("Table '{0}' not found")]
    TableNotFound(String),
    /// Any other catalog failure
    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
    /// Decision could not be recorded
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}

impl From<CatalogError> for GuardError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::TableNotFound(name) => GuardError::TableNotFound(name),
            other => GuardError::Catalog(other),
        }
    }
}

/// Result type for pipeline operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Everything produced for one processed request
#[derive(Debug, Clone)]
pub struct GuardOutcome {
    pub grant: AccessGrant,
    pub decision: Decision,
    /// Position of the decision in the audit log
    pub position: usize,
}

/// Validates generated SQL against what a role may see
pub struct QueryGuard {
    catalog: Arc<Catalog>,
    policy: Arc<RolePolicy>,
    engine: DecisionEngine,
    audit: Arc<AuditLog>,
    generator: Arc<dyn Generator>,
}

impl QueryGuard {
    /// Create a guard. The extractor ignores the catalog's table names.
    pub fn new(
        catalog: Arc<Catalog>,
        policy: Arc<RolePolicy>,
        audit: Arc<AuditLog>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let engine = DecisionEngine::new(FieldExtractor::new(catalog.table_names()));
        Self {
            catalog,
            policy,
            engine,
            audit,
            generator,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Table metadata
    pub fn metadata(&self, table: &str) -> GuardResult<&TableDef> {
        Ok(self.catalog.lookup(table)?)
    }

    /// Fields of `table` visible to `role`
    pub fn grant(&self, role: &str, table: &str) -> GuardResult<AccessGrant> {
        let def = self.catalog.lookup(table)?;
        Ok(AccessGrant::new(
            role,
            def,
            &self.policy.allowed_sensitivities(role),
        ))
    }

    /// Run one request through the pipeline and record the decision
    pub async fn process(&self, request: &QueryRequest) -> GuardResult<GuardOutcome> {
        let grant = self.grant(&request.role, &request.table)?;

        if grant.is_empty() {
            warn!(
                role = %request.role,
                table = %request.table,
                "no accessible fields, rejecting without generation"
            );
            let decision = Decision::new(request, NO_ACCESS_RESPONSE, Verdict::no_access());
            return self.record(grant, decision);
        }

        let prompt = build_prompt(&request.table, &grant.allowed, &request.query);

        let decision = match self.generator.generate(&prompt).await {
            Ok(generated) => {
                let verdict = self.engine.decide(&generated, &grant.allowed);
                Decision::new(request, generated, verdict)
            }
            Err(e) => {
                error!(
                    model = %self.generator.model_name(),
                    error = %e,
                    "generator call failed"
                );
                let text = format!("Error calling generator: {}", e);
                Decision::new(request, text, Verdict::generator_failed(&e.to_string()))
            }
        };

        self.record(grant, decision)
    }

    fn record(&self, grant: AccessGrant, decision: Decision) -> GuardResult<GuardOutcome> {
        let position = self.audit.append(decision.clone())?;

        if decision.is_accepted() {
            info!(
                role = %decision.role,
                table = %decision.table,
                position,
                "query accepted"
            );
        } else {
            warn!(
                role = %decision.role,
                table = %decision.table,
                reason = %decision.reason,
                position,
                "query rejected"
            );
        }

        Ok(GuardOutcome {
            grant,
            decision,
            position,
        })
    }
}
