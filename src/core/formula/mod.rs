//! Weightage formula language.
//!
//! A formula is a small spreadsheet-style expression over scope item
//! attributes, e.g. `=IF(Account[InScope]="YES",Account[Details]*2,0)`.
//! Formulas are compiled once when the catalog loads and evaluated per
//! request against the request's scope states.

pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

use thiserror::Error;

use crate::domain::ports::ScopeLookup;
use lexer::Lexer;
use parser::{Expr, Parser};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("empty formula")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("unknown attribute '{attribute}' on '{item}', expected InScope or Details")]
    UnknownAttribute { item: String, attribute: String },

    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        offset: usize,
    },

    #[error("unknown name '{0}'")]
    UnknownName(String),

    #[error("{function} takes {expected} arguments, got {found}")]
    Arity {
        function: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("cannot apply '{op}' to {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result '{0}' is not numeric")]
    NonNumericResult(String),
}

/// A formula compiled from its source text.
///
/// Source that fails to compile is kept together with the error, so every
/// evaluation reports it and yields a weightage of 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    program: Result<Expr, FormulaError>,
}

impl Formula {
    pub fn compile(source: &str) -> Self {
        let body = source.strip_prefix('=').unwrap_or(source);
        let program = Lexer::new(body)
            .tokenize()
            .and_then(|tokens| Parser::new(tokens).parse());

        Self {
            source: source.to_string(),
            program,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.program.is_ok()
    }

    pub fn compile_error(&self) -> Option<&FormulaError> {
        self.program.as_ref().err()
    }

    /// Evaluate strictly, surfacing the first error.
    pub fn try_evaluate<S: ScopeLookup + ?Sized>(&self, scope: &S) -> Result<f64, FormulaError> {
        let expr = self.program.as_ref().map_err(|e| e.clone())?;
        eval::evaluate(expr, scope)?.into_weightage()
    }

    /// Evaluate to a weightage. Any failure is logged and yields 0.
    pub fn evaluate<S: ScopeLookup + ?Sized>(&self, item: &str, scope: &S) -> f64 {
        match self.try_evaluate(scope) {
            Ok(weightage) => weightage,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Formula for '{}' failed ({}), weightage set to 0: {}",
                    item,
                    e,
                    self.source
                );
                0.0
            }
        }
    }
}

/// Compile and evaluate a formula in one step.
///
/// An empty formula is 0 without a warning.
pub fn evaluate<S: ScopeLookup + ?Sized>(source: &str, scope: &S) -> f64 {
    if source.is_empty() {
        return 0.0;
    }
    Formula::compile(source).evaluate("<inline>", scope)
}
