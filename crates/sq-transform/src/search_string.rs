//! Transformer producing a fully parenthesized search string.

use sq_parse::Node;

use crate::transform::Transform;

/// Rewrites a query tree as a fully parenthesized boolean search string.
///
/// Unlike [`sq_parse::Node::render`], which elides parentheses at the top
/// level, this form wraps every operator so downstream query engines never
/// have to re-derive precedence: `(a AND (b OR c))`, `(NOT x)`,
/// `field:(v)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchString;

impl Transform for SearchString {
    type Output = String;

    fn term(&self, text: &str) -> String {
        text.to_string()
    }

    fn phrase(&self, text: &str) -> String {
        format!("\"{text}\"")
    }

    fn term_run(&self, items: &[Node]) -> String {
        let parts: Vec<String> = items.iter().map(|item| self.transform(item)).collect();
        if parts.len() == 1 {
            parts.into_iter().next().unwrap_or_default()
        } else {
            format!("({})", parts.join(" "))
        }
    }

    fn fielded(&self, field: &str, value: &Node) -> String {
        format!("{}:({})", field, self.transform(value))
    }

    fn not(&self, value: &Node) -> String {
        format!("(NOT {})", self.transform(value))
    }

    fn and(&self, left: &Node, right: &Node) -> String {
        format!("({} AND {})", self.transform(left), self.transform(right))
    }

    fn or(&self, left: &Node, right: &Node) -> String {
        format!("({} OR {})", self.transform(left), self.transform(right))
    }

    fn query(&self, clauses: &[Node]) -> String {
        let parts: Vec<String> = clauses.iter().map(|clause| self.transform(clause)).collect();
        parts.join(" ")
    }
}
