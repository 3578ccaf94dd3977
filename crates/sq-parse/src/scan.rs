//! Scan context: a cursor over the input string plus a diagnostic rule stack.
//!
//! The scanner knows nothing about the grammar. It exposes low-level
//! matching primitives (whole-word literals, quoted phrases, bare words,
//! field prefixes) and tracks which grammar rules are currently active so
//! that errors can be reported with precise context.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{SyntaxError, SyntaxErrorKind};

/// Grammar rules tracked on the diagnostic stack.
///
/// A rule is pushed when the parser commits to a branch (after consuming
/// the operator, field prefix, or opening parenthesis) and popped when the
/// branch finishes, so the stack always mirrors the live call chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Right side of an `OR`.
    Or,
    /// Right side of an `AND`.
    And,
    /// Operand of a `NOT`.
    Not,
    /// Value of a `field:` prefix.
    Fielded,
    /// Inside a parenthesized group.
    Paren,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Not => "not",
            Self::Fielded => "fielded",
            Self::Paren => "paren",
        };
        write!(f, "{name}")
    }
}

/// A snapshot of scanner state taken when a grammar rule was entered.
///
/// Markers exist only for diagnostics: when a parse fails, the innermost
/// marker names the rule that was active, where it started, and what text
/// remained unconsumed at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The rule that was entered.
    pub rule: Rule,
    /// Byte position of the cursor when the rule was entered.
    pub position: usize,
    /// The unconsumed input at that position.
    pub rest: String,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' at {} ({})", self.rule, self.position, self.rest)
    }
}

/// Returns true for characters that may appear inside a bare word.
///
/// Everything except whitespace and parentheses is a word character, so a
/// keyword like `AND` stays an ordinary word when more word characters
/// follow it.
fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && ch != '(' && ch != ')'
}

/// A cursor over the input string with a diagnostic rule stack.
pub struct ScanContext<'a> {
    /// The full input being parsed.
    input: &'a str,
    /// Current byte position in `input`.
    position: usize,
    /// Markers for the grammar rules currently being parsed.
    stack: Vec<Marker>,
}

impl<'a> ScanContext<'a> {
    /// Creates a scan context at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            stack: Vec::new(),
        }
    }

    /// Current byte position in the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// True when the cursor is past the last character.
    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes a run of whitespace; no-op if there is none.
    pub fn skip_space(&mut self) {
        let trimmed = self.rest().trim_start();
        self.position = self.input.len() - trimmed.len();
    }

    /// Returns the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes `expected` if it is the next character.
    pub fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Checks for `literal` at the cursor as a whole word.
    ///
    /// The match requires a non-word character (or the input edge) after
    /// the literal, so `AND` matches in `a AND b` but not in `ANDroid`.
    /// The boundary on the left is the caller's responsibility: the parser
    /// only ever checks literals with the cursor at a token start (after
    /// whitespace, a paren, or a consumed field prefix).
    pub fn peek_literal(&self, literal: &str) -> bool {
        let rest = self.rest();
        rest.starts_with(literal)
            && rest[literal.len()..]
                .chars()
                .next()
                .is_none_or(|ch| !is_word_char(ch))
    }

    /// Consumes `literal` if it matches as a whole word.
    pub fn consume_literal(&mut self, literal: &str) -> bool {
        if self.peek_literal(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }

    /// Consumes a double-quoted phrase, returning its inner text.
    ///
    /// Returns `Ok(None)` if the next character is not `"`. A quote with no
    /// closing partner is a syntax error. There is no escaping: the phrase
    /// runs to the first `"` after the opener.
    pub fn consume_phrase(&mut self) -> Result<Option<String>, SyntaxError> {
        if self.peek_char() != Some('"') {
            return Ok(None);
        }
        let start = self.position;
        let inner = &self.rest()[1..];
        match inner.find('"') {
            Some(end) => {
                let content = inner[..end].to_string();
                self.position += 1 + end + 1;
                Ok(Some(content))
            }
            None => Err(self.error(SyntaxErrorKind::UnclosedQuote, start)),
        }
    }

    /// Consumes the longest run of word characters at the cursor.
    ///
    /// Returns `None` at end of input or at a non-word character. Callers
    /// that want quoted phrases must try [`Self::consume_phrase`] first,
    /// since `"` counts as a word character away from a token boundary.
    pub fn consume_word(&mut self) -> Option<String> {
        let rest = self.rest();
        let end = rest
            .find(|ch| !is_word_char(ch))
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        let word = rest[..end].to_string();
        self.position += end;
        Some(word)
    }

    /// Checks for a field prefix at the cursor.
    ///
    /// A field prefix is a configured field name, matched exactly and
    /// case-sensitively, immediately followed by `:` with a non-space
    /// character (or end of input) after the colon. `title: x` is not a
    /// prefix; `title:x` is.
    pub fn peek_field_prefix<'f>(&self, fields: &'f BTreeSet<String>) -> Option<&'f str> {
        let rest = self.rest();
        for name in fields {
            if let Some(after) = rest.strip_prefix(name.as_str())
                && let Some(after_colon) = after.strip_prefix(':')
                && !after_colon.starts_with(char::is_whitespace)
            {
                return Some(name);
            }
        }
        None
    }

    /// Consumes a field prefix (name and colon), returning the field name.
    pub fn consume_field_prefix(&mut self, fields: &BTreeSet<String>) -> Option<String> {
        let name = self.peek_field_prefix(fields)?.to_string();
        self.position += name.len() + 1;
        Some(name)
    }

    /// Runs `body` with `rule` on the diagnostic stack.
    ///
    /// The marker is pushed before `body` and popped after it returns, on
    /// every exit path, so the stack can never leak a stale rule.
    pub fn with_rule<T>(&mut self, rule: Rule, body: impl FnOnce(&mut Self) -> T) -> T {
        self.stack.push(Marker {
            rule,
            position: self.position,
            rest: self.rest().to_string(),
        });
        let out = body(self);
        self.stack.pop();
        out
    }

    /// True if a marker with `rule` is anywhere on the stack.
    pub fn in_rule(&self, rule: Rule) -> bool {
        self.stack.iter().any(|marker| marker.rule == rule)
    }

    /// The marker for the most recently entered rule, if any.
    pub fn innermost(&self) -> Option<&Marker> {
        self.stack.last()
    }

    /// Builds a syntax error at `position`, attaching the innermost marker.
    pub fn error(&self, kind: SyntaxErrorKind, position: usize) -> SyntaxError {
        SyntaxError {
            kind,
            position,
            input: self.input.to_string(),
            marker: self.innermost().cloned(),
        }
    }
}
