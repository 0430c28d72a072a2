//! # Text Parser Boundary
//!
//! `compile_text` (spec §6.2) takes a `&dyn TextParser` rather than hard
//! coding a grammar — the textual GraphQL parser is an external
//! collaborator, explicitly out of scope (spec §1). This module owns only
//! the trait the elaborator consumes and, under `#[cfg(test)]`, a tiny
//! fixture parser used to exercise [`crate::elaborate::compile_text`]
//! without a real parser present.

use crate::effect::UntypedOperation;
#[cfg(test)]
use crate::error::CompileError;
use crate::result::Outcome;

/// Parses operation text into the untyped shape the elaborator consumes
/// (spec §6.1/§6.2). Implementations own the grammar entirely; a malformed
/// input surfaces as `CompileError::Parse`, which is never accumulated
/// alongside semantic errors (spec §7).
pub trait TextParser {
    fn parse(&self, text: &str) -> Outcome<Vec<UntypedOperation>>;
}

/// A fixture parser for tests: recognizes exactly the handful of operation
/// shapes used in this crate's own test suite (`"empty"` for a text with no
/// recognized operations, anything else as a single field-less `query`
/// operation named after the field). Not a GraphQL grammar.
#[cfg(test)]
pub struct FixtureParser;

#[cfg(test)]
impl TextParser for FixtureParser {
    fn parse(&self, text: &str) -> Outcome<Vec<UntypedOperation>> {
        use crate::effect::UntypedOperationKind;
        use crate::query::Query;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Outcome::Success(Vec::new());
        }
        if trimmed.starts_with("!!!") {
            return Outcome::failure_one(CompileError::Parse {
                line: 1,
                col: 1,
                snippet: trimmed.to_string(),
                caret: "^".to_string(),
            });
        }

        Outcome::Success(vec![UntypedOperation {
            kind: UntypedOperationKind::Query,
            name: None,
            variables: Vec::new(),
            selection: Query::leaf(trimmed, Vec::new()),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_operations() {
        let result = FixtureParser.parse("   ");
        assert_eq!(result.value().unwrap().len(), 0);
    }

    #[test]
    fn malformed_marker_yields_parse_error() {
        let result = FixtureParser.parse("!!! broken");
        assert!(result.is_failure());
        assert!(matches!(result.problems()[0].error, CompileError::Parse { .. }));
    }

    #[test]
    fn single_field_yields_one_query_operation() {
        let result = FixtureParser.parse("name");
        let ops = result.value().unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, crate::effect::UntypedOperationKind::Query);
    }
}
