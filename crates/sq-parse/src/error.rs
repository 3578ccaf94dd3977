//! Error types for query parsing.

use std::{error::Error, fmt};

use crate::scan::Marker;

/// The specific grammar violation behind a [`SyntaxError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    /// A phrase was opened with `"` but never closed.
    #[error("unclosed quote")]
    UnclosedQuote,

    /// A `(` had no matching `)` before the input ran out.
    #[error("missing closing parenthesis for group opened at {open_position}")]
    UnclosedGroup {
        /// Byte position of the opening parenthesis.
        open_position: usize,
    },

    /// A parenthesized group contained nothing parseable.
    #[error("empty group")]
    EmptyGroup,

    /// A field prefix appeared inside another field scope.
    #[error("field '{field}:' is nested inside another field scope")]
    NestedField {
        /// The offending inner field name.
        field: String,
    },

    /// A `field:` prefix with no value after it.
    #[error("expected a value after '{field}:'")]
    MissingFieldValue {
        /// The field missing its value.
        field: String,
    },

    /// An operator keyword with no operand after it.
    #[error("expected an expression after {operator}")]
    MissingOperand {
        /// The operator missing its operand.
        operator: &'static str,
    },

    /// Input that no clause could consume, such as a stray `)`.
    #[error("unexpected input")]
    UnexpectedInput,
}

/// A fatal query-syntax failure with position and diagnostic context.
///
/// Carries the original input and the innermost grammar-rule marker that
/// was active when the error was raised, so the message can point at the
/// exact offending position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// What went wrong.
    pub kind: SyntaxErrorKind,
    /// Byte position in the input where the error was raised.
    pub position: usize,
    /// The original input string.
    pub input: String,
    /// The innermost grammar rule active when the error was raised.
    pub marker: Option<Marker>,
}

impl SyntaxError {
    /// Formats the error with a caret pointing at the failure position.
    pub fn format_with_context(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {}\n", self.kind));
        result.push_str(&format!("  {}\n", self.input));
        let clamped = self.position.min(self.input.len());
        result.push_str(&format!("  {}^", " ".repeat(clamped)));
        if let Some(marker) = &self.marker {
            result.push_str(&format!("\nwhile parsing {marker}"));
        }
        result
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_context())
    }
}

impl Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Rule;

    #[test]
    fn display_points_at_position() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::UnclosedQuote,
            position: 4,
            input: "abc \"def".to_string(),
            marker: None,
        };
        let display = err.to_string();
        assert!(display.contains("unclosed quote"));
        assert!(display.contains("abc \"def"));
        assert!(display.contains("    ^"));
    }

    #[test]
    fn display_names_the_active_rule() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::MissingOperand { operator: "OR" },
            position: 4,
            input: "a OR".to_string(),
            marker: Some(Marker {
                rule: Rule::Or,
                position: 4,
                rest: String::new(),
            }),
        };
        let display = err.to_string();
        assert!(display.contains("expected an expression after OR"));
        assert!(display.contains("while parsing 'or' at 4"));
    }

    #[test]
    fn caret_clamps_to_input_length() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::UnexpectedInput,
            position: 99,
            input: "ab".to_string(),
            marker: None,
        };
        // Must not panic on an out-of-range position.
        let display = err.to_string();
        assert!(display.contains("  ab"));
    }
}
