//! Decision engine - accept or reject generated SQL
//!
//! One pass over the generated text:
//! 1. Refusal marker present: rejected, nothing unauthorized.
//! 2. Text does not start with SELECT: accepted as passthrough.
//! 3. Otherwise extract referenced fields and reject any outside the
//!    allowed set.
//!
//! Step 2 lets any non-query text through without a field check. It is
//! kept as-is and pinned by tests so a change to it has to be explicit.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::catalog::FieldDef;
use crate::sql::{ExtractionPath, FieldExtractor};

/// Text the generator is told to answer with when it cannot comply
pub const REFUSAL_MESSAGE: &str = "Cannot generate query: required fields are not accessible.";

/// Substring that marks a generator refusal
pub const REFUSAL_MARKER: &str = "Cannot generate query";

pub const REASON_REFUSED: &str = "generator declined due to inaccessible fields";
pub const REASON_PASSTHROUGH: &str = "generated content treated as non-query / passthrough";
pub const REASON_VALIDATED: &str = "query validated against allowed fields";
pub const REASON_UNAUTHORIZED: &str = "query references fields outside the authorized set";
pub const REASON_NO_ACCESS: &str = "no fields accessible for this role";
pub const REASON_GENERATOR_FAILED: &str = "generator call failed";

/// Generated text recorded when the role sees no fields
pub const NO_ACCESS_RESPONSE: &str = "No accessible fields for this role";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accept or reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => write!(f, "accepted"),
            Outcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// A decision before it is stamped and logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub reason: String,
    pub unauthorized_fields: BTreeSet<String>,
    /// Set when fields were extracted from the text
    pub extraction: Option<ExtractionPath>,
}

impl Verdict {
    fn new(outcome: Outcome, reason: impl Into<String>) -> Self {
        Self {
            outcome,
            reason: reason.into(),
            unauthorized_fields: BTreeSet::new(),
            extraction: None,
        }
    }

    /// Role sees no fields in the table; the generator is never called
    pub fn no_access() -> Self {
        Self::new(Outcome::Rejected, REASON_NO_ACCESS)
    }

    /// Generator call failed; the decision engine is never called
    pub fn generator_failed(error: &str) -> Self {
        Self::new(
            Outcome::Rejected,
            format!("{}: {}", REASON_GENERATOR_FAILED, error),
        )
    }
}

/// Request context recorded with every decision
///
/// Missing members deserialize as empty text, so a request without a role
/// is rejected by the policy rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    pub role: String,
    pub table: String,
    /// Natural-language question
    pub query: String,
}

impl QueryRequest {
    pub fn new(
        role: impl Into<String>,
        table: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            table: table.into(),
            query: query.into(),
        }
    }
}

/// A logged decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub role: String,
    pub table: String,
    pub user_query: String,
    #[serde(rename = "llm_response")]
    pub generated_sql: String,
    #[serde(rename = "decision")]
    pub outcome: Outcome,
    pub reason: String,
    pub unauthorized_fields: BTreeSet<String>,
    pub extraction: Option<ExtractionPath>,
}

impl Decision {
    /// Stamp a verdict with the current time
    pub fn new(request: &QueryRequest, generated_sql: impl Into<String>, verdict: Verdict) -> Self {
        Self::at(Utc::now(), request, generated_sql, verdict)
    }

    /// Stamp a verdict with the given time
    pub fn at(
        timestamp: DateTime<Utc>,
        request: &QueryRequest,
        generated_sql: impl Into<String>,
        verdict: Verdict,
    ) -> Self {
        Self {
            timestamp,
            role: request.role.clone(),
            table: request.table.clone(),
            user_query: request.query.clone(),
            generated_sql: generated_sql.into(),
            outcome: verdict.outcome,
            reason: verdict.reason,
            unauthorized_fields: verdict.unauthorized_fields,
            extraction: verdict.extraction,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome.is_accepted()
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}

/// Whether the text opens with SELECT, ignoring case and surrounding whitespace
fn starts_with_select(text: &str) -> bool {
    text.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}

/// Checks generated SQL against the allowed field set
#[derive(Debug)]
pub struct DecisionEngine {
    extractor: FieldExtractor,
}

impl DecisionEngine {
    pub fn new(extractor: FieldExtractor) -> Self {
        Self { extractor }
    }

    /// Decide on generated text. Total: every input yields a verdict.
    pub fn decide(&self, generated_sql: &str, allowed: &[FieldDef]) -> Verdict {
        if generated_sql.contains(REFUSAL_MARKER) {
            return Verdict::new(Outcome::Rejected, REASON_REFUSED);
        }

        if !starts_with_select(generated_sql) {
            return Verdict::new(Outcome::Accepted, REASON_PASSTHROUGH);
        }

        let extraction = self.extractor.extract(generated_sql);
        let allowed_names: BTreeSet<String> =
            allowed.iter().map(|f| f.name.to_lowercase()).collect();

        let unauthorized: BTreeSet<String> = extraction
            .fields
            .difference(&allowed_names)
            .cloned()
            .collect();

        if unauthorized.is_empty() {
            Verdict {
                outcome: Outcome::Accepted,
                reason: REASON_VALIDATED.to_string(),
                unauthorized_fields: unauthorized,
                extraction: Some(extraction.path),
            }
        } else {
            let list: Vec<&str> = unauthorized.iter().map(|s| s.as_str()).collect();
            Verdict {
                outcome: Outcome::Rejected,
                reason: format!("{}: {}", REASON_UNAUTHORIZED, list.join(", ")),
                unauthorized_fields: unauthorized,
                extraction: Some(extraction.path),
            }
        }
    }
}
