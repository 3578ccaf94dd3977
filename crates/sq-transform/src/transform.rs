//! The transformer contract: one handling rule per node kind.

use sq_parse::Node;

/// A read-only visitor that rewrites a query tree into another form.
///
/// Implementors supply one method per node kind; [`Transform::transform`]
/// dispatches exhaustively, so an unhandled kind is a compile error rather
/// than a runtime surprise. The tree is borrowed immutably throughout:
/// transformers produce independent output and never rewrite the AST.
pub trait Transform {
    /// The produced output, typically a string in another query syntax.
    type Output;

    /// Handles a bare term.
    fn term(&self, text: &str) -> Self::Output;

    /// Handles a quoted phrase (text is unquoted content).
    fn phrase(&self, text: &str) -> Self::Output;

    /// Handles a run of adjacent terms and phrases.
    fn term_run(&self, items: &[Node]) -> Self::Output;

    /// Handles a field-scoped value.
    fn fielded(&self, field: &str, value: &Node) -> Self::Output;

    /// Handles a negation.
    fn not(&self, value: &Node) -> Self::Output;

    /// Handles a conjunction.
    fn and(&self, left: &Node, right: &Node) -> Self::Output;

    /// Handles a disjunction.
    fn or(&self, left: &Node, right: &Node) -> Self::Output;

    /// Handles the query root.
    fn query(&self, clauses: &[Node]) -> Self::Output;

    /// Dispatches `node` to its handling rule.
    ///
    /// A structural `Clause` wrapper is transparent: canonical trees
    /// contain none, and a pre-canonical tree means the same thing with or
    /// without it.
    fn transform(&self, node: &Node) -> Self::Output {
        match node {
            Node::Term(text) => self.term(text),
            Node::Phrase(text) => self.phrase(text),
            Node::TermRun(items) => self.term_run(items),
            Node::Fielded { field, value } => self.fielded(field, value),
            Node::Not(value) => self.not(value),
            Node::And(left, right) => self.and(left, right),
            Node::Or(left, right) => self.or(left, right),
            Node::Clause(inner) => self.transform(inner),
            Node::Query(clauses) => self.query(clauses),
        }
    }
}
