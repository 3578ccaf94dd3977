//! Recursive descent parser for the query language.
//!
//! # Grammar
//!
//! ```text
//! query   → clause*                      (clauses separated by whitespace)
//! clause  → or
//! or      → and ("OR" or)?
//! and     → fielded ("AND" and)?
//! fielded → FIELD ":" not | not
//! not     → "NOT" fielded | value
//! value   → "(" clause ")" | terms
//! terms   → (PHRASE | WORD)+
//! ```
//!
//! # Precedence (loosest to tightest)
//!
//! 1. OR
//! 2. AND
//! 3. Field prefix: `field:`
//! 4. Negation: `NOT`
//! 5. Grouping: `(...)`
//!
//! Precedence is encoded by the call order alone; `OR` and `AND` are
//! right-associative because each level recurses into itself on the right
//! instead of looping. A field prefix inside an active field scope is
//! rejected via the diagnostic rule stack, so `NOT title:x` parses but
//! `title:NOT title:x` does not.

use std::collections::BTreeSet;

use crate::{
    error::{SyntaxError, SyntaxErrorKind},
    node::Node,
    scan::{Rule, ScanContext},
};

/// The `OR` operator keyword.
const OR_OP: &str = "OR";
/// The `AND` operator keyword.
const AND_OP: &str = "AND";
/// The `NOT` operator keyword.
const NOT_OP: &str = "NOT";
/// All operator keywords; any of them ends a term run.
const OPERATORS: [&str; 3] = [AND_OP, OR_OP, NOT_OP];

/// Why an inner grammar rule produced no node.
///
/// `EndOfInput` is control flow, not a user-facing error: the rule found
/// nothing to consume at a position where that may be legitimate (end of
/// the query, or just before a `)`). Callers either stop collecting or
/// promote it to a [`SyntaxError`] where a value was mandatory.
enum Fail {
    /// Nothing left to consume at this position.
    EndOfInput,
    /// A fatal grammar violation.
    Syntax(SyntaxError),
}

impl From<SyntaxError> for Fail {
    fn from(err: SyntaxError) -> Self {
        Self::Syntax(err)
    }
}

/// Result alias for the inner grammar rules.
type RuleResult = Result<Node, Fail>;

/// Promotes `EndOfInput` to a syntax error at the current position.
///
/// Used wherever a value is mandatory: after an operator keyword, after a
/// field prefix, and inside a group. Called inside the rule's `with_rule`
/// scope so the raised error captures the rule as its innermost marker.
fn require(outcome: RuleResult, cx: &ScanContext, kind: SyntaxErrorKind) -> RuleResult {
    match outcome {
        Err(Fail::EndOfInput) => Err(cx.error(kind, cx.position()).into()),
        other => other,
    }
}

/// A reusable query parser configured with the recognized field names.
///
/// Construction is cheap and the parser holds no mutable state: a single
/// instance may be shared across threads, with each [`Parser::parse`] call
/// owning its own scan context.
#[derive(Debug, Clone)]
pub struct Parser {
    /// Field names accepted as `name:` prefixes, matched exactly.
    fields: BTreeSet<String>,
}

impl Parser {
    /// Creates a parser recognizing the given field names.
    pub fn new<I, S>(field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: field_names.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured field names.
    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    /// Parses `input` into a canonical query tree.
    ///
    /// Returns the shaken [`Node::Query`] root; an empty or all-whitespace
    /// input yields a query with zero clauses.
    pub fn parse(&self, input: &str) -> Result<Node, SyntaxError> {
        let mut cx = ScanContext::new(input);
        let clauses = self.collect_clauses(&mut cx)?;
        Ok(Node::Query(clauses).shake())
    }

    /// Parses clauses until the input is exhausted.
    fn collect_clauses(&self, cx: &mut ScanContext) -> Result<Vec<Node>, SyntaxError> {
        let mut clauses = Vec::new();
        loop {
            cx.skip_space();
            if cx.at_end() {
                return Ok(clauses);
            }
            match self.parse_clause(cx) {
                Ok(clause) => clauses.push(clause),
                // Input remains but no clause can start here: a stray `)`
                // or an operator with nothing before it.
                Err(Fail::EndOfInput) => {
                    return Err(cx.error(SyntaxErrorKind::UnexpectedInput, cx.position()));
                }
                Err(Fail::Syntax(err)) => return Err(err),
            }
        }
    }

    /// Parses: clause → or, wrapping the result in a structural clause.
    fn parse_clause(&self, cx: &mut ScanContext) -> RuleResult {
        cx.skip_space();
        Ok(Node::clause(self.parse_or(cx)?))
    }

    /// Parses: or → and ("OR" or)?
    fn parse_or(&self, cx: &mut ScanContext) -> RuleResult {
        let left = self.parse_and(cx)?;
        cx.skip_space();
        if !cx.consume_literal(OR_OP) {
            return Ok(left);
        }
        let right = cx.with_rule(Rule::Or, |cx| {
            cx.skip_space();
            require(
                self.parse_or(cx),
                cx,
                SyntaxErrorKind::MissingOperand { operator: OR_OP },
            )
        })?;
        Ok(Node::or(left, right))
    }

    /// Parses: and → fielded ("AND" and)?
    fn parse_and(&self, cx: &mut ScanContext) -> RuleResult {
        let left = self.parse_fielded(cx)?;
        cx.skip_space();
        if !cx.consume_literal(AND_OP) {
            return Ok(left);
        }
        let right = cx.with_rule(Rule::And, |cx| {
            cx.skip_space();
            require(
                self.parse_and(cx),
                cx,
                SyntaxErrorKind::MissingOperand { operator: AND_OP },
            )
        })?;
        Ok(Node::and(left, right))
    }

    /// Parses: fielded → FIELD ":" not | not
    ///
    /// Rejects a field prefix while a field scope is already active, which
    /// is what keeps field scopes from nesting.
    fn parse_fielded(&self, cx: &mut ScanContext) -> RuleResult {
        cx.skip_space();
        let prefix_position = cx.position();
        let Some(field) = cx.consume_field_prefix(&self.fields) else {
            return self.parse_not(cx);
        };
        if cx.in_rule(Rule::Fielded) {
            return Err(cx
                .error(SyntaxErrorKind::NestedField { field }, prefix_position)
                .into());
        }
        let value = cx.with_rule(Rule::Fielded, |cx| {
            match self.parse_not(cx) {
                // The value stopped before it began. If it stopped at
                // another field prefix the real problem is a nested field
                // scope, not a missing value.
                Err(Fail::EndOfInput) => {
                    let kind = match cx.peek_field_prefix(&self.fields) {
                        Some(inner) => SyntaxErrorKind::NestedField {
                            field: inner.to_string(),
                        },
                        None => SyntaxErrorKind::MissingFieldValue {
                            field: field.clone(),
                        },
                    };
                    Err(cx.error(kind, cx.position()).into())
                }
                other => other,
            }
        })?;
        Ok(Node::fielded(field, value))
    }

    /// Parses: not → "NOT" fielded | value
    fn parse_not(&self, cx: &mut ScanContext) -> RuleResult {
        cx.skip_space();
        if !cx.consume_literal(NOT_OP) {
            return self.parse_value(cx);
        }
        let value = cx.with_rule(Rule::Not, |cx| {
            cx.skip_space();
            require(
                self.parse_fielded(cx),
                cx,
                SyntaxErrorKind::MissingOperand { operator: NOT_OP },
            )
        })?;
        Ok(Node::not(value))
    }

    /// Parses: value → "(" clause ")" | terms
    fn parse_value(&self, cx: &mut ScanContext) -> RuleResult {
        cx.skip_space();
        let open_position = cx.position();
        if !cx.consume_char('(') {
            return self.parse_terms(cx);
        }
        cx.with_rule(Rule::Paren, |cx| {
            match self.parse_clause(cx) {
                Ok(node) => {
                    cx.skip_space();
                    if cx.consume_char(')') {
                        Ok(node)
                    } else {
                        Err(cx
                            .error(SyntaxErrorKind::UnclosedGroup { open_position }, open_position)
                            .into())
                    }
                }
                // Nothing inside the group. With the `)` present that is an
                // empty group; without it the group was never closed.
                Err(Fail::EndOfInput) => {
                    cx.skip_space();
                    let kind = if cx.consume_char(')') {
                        SyntaxErrorKind::EmptyGroup
                    } else {
                        SyntaxErrorKind::UnclosedGroup { open_position }
                    };
                    Err(cx.error(kind, open_position).into())
                }
                fail => fail,
            }
        })
    }

    /// Parses: terms → (PHRASE | WORD)+
    ///
    /// An empty collection is the end-of-input signal for the caller.
    fn parse_terms(&self, cx: &mut ScanContext) -> RuleResult {
        let words = self.collect_terms(cx)?;
        if words.is_empty() {
            return Err(Fail::EndOfInput);
        }
        Ok(Node::TermRun(words))
    }

    /// Collects adjacent phrases and words until a boundary.
    fn collect_terms(&self, cx: &mut ScanContext) -> Result<Vec<Node>, Fail> {
        let mut words = Vec::new();
        loop {
            cx.skip_space();
            if self.end_of_terms(cx) {
                return Ok(words);
            }
            if let Some(phrase) = cx.consume_phrase()? {
                words.push(Node::Phrase(phrase));
                continue;
            }
            match cx.consume_word() {
                Some(word) => words.push(Node::Term(word)),
                // A paren ends the run without being part of it.
                None => return Ok(words),
            }
        }
    }

    /// True when a term run must stop: end of input, an operator keyword,
    /// or a field prefix.
    fn end_of_terms(&self, cx: &ScanContext) -> bool {
        cx.at_end()
            || cx.peek_field_prefix(&self.fields).is_some()
            || OPERATORS.iter().any(|op| cx.peek_literal(op))
    }
}
