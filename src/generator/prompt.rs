//! Prompt builder
//!
//! Lists only the fields the role may see and tells the generator to
//! answer with the refusal message when those fields are not enough.

use crate::catalog::FieldDef;
use crate::decision::REFUSAL_MESSAGE;

/// System message sent with every prompt
pub const SYSTEM_PROMPT: &str = "You are a SQL query generator. Follow the instructions exactly.";

/// System and user text for one generator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the prompt for `question` against the allowed fields of `table`
pub fn build_prompt(table: &str, allowed: &[FieldDef], question: &str) -> Prompt {
    let fields = allowed
        .iter()
        .map(|f| format!("- {}: {}", f.name, f.field_type))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "You are a helpful assistant that generates SQL queries based on natural language questions.\n\
         Given the following table schema, generate a SQL query to answer the user's question.\n\
         You must use only the provided fields. If the question requires fields not listed, respond with \"{refusal}\"\n\
         \n\
         Table: {table}\n\
         Fields:\n\
         {fields}\n\
         \n\
         User question: {question}\n\
         Generate the SQL query or the rejection message:",
        refusal = REFUSAL_MESSAGE,
    );

    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}
