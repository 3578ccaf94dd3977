//! Query abstract syntax tree.
//!
//! A closed set of node kinds with two behaviors attached: `shake`, which
//! canonicalizes a raw parse tree, and `render`, which converts a tree back
//! into a normalized surface string. Nodes are immutable once built;
//! `shake` consumes its input and produces a new tree. Children are owned
//! exclusively by their parents and carry no back-references.

use std::fmt;

/// A node in a parsed query tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A bare search term.
    Term(String),

    /// A quoted phrase, stored without the surrounding quotes.
    Phrase(String),

    /// A run of adjacent terms and phrases with no operator between them.
    /// Never empty: an empty run is an end-of-input signal inside the
    /// parser, not a node.
    TermRun(Vec<Self>),

    /// A sub-query restricted to one named field. The value never contains
    /// another field scope (the parser rejects nesting).
    Fielded {
        /// The configured field name.
        field: String,
        /// The scoped value.
        value: Box<Self>,
    },

    /// Negation of a single child.
    Not(Box<Self>),

    /// Strictly binary conjunction.
    And(Box<Self>, Box<Self>),

    /// Strictly binary disjunction.
    Or(Box<Self>, Box<Self>),

    /// A meaning-free wrapper introduced once per grammar level; removed
    /// by [`Node::shake`].
    Clause(Box<Self>),

    /// The root: zero or more whitespace-separated clauses.
    Query(Vec<Self>),
}

impl Node {
    /// Creates a term leaf.
    pub fn term(text: impl Into<String>) -> Self {
        Self::Term(text.into())
    }

    /// Creates a phrase leaf from unquoted content.
    pub fn phrase(text: impl Into<String>) -> Self {
        Self::Phrase(text.into())
    }

    /// Wraps a node in a structural clause.
    pub fn clause(inner: Self) -> Self {
        Self::Clause(Box::new(inner))
    }

    /// Creates a negation.
    pub fn not(value: Self) -> Self {
        Self::Not(Box::new(value))
    }

    /// Creates a binary conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Creates a binary disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Creates a field-scoped node.
    pub fn fielded(field: impl Into<String>, value: Self) -> Self {
        Self::Fielded {
            field: field.into(),
            value: Box::new(value),
        }
    }

    /// Canonicalizes the tree by removing redundant `Clause` wrappers.
    ///
    /// Idempotent: `shake(shake(n)) == shake(n)`. Only `Clause` wrappers
    /// are eliminated. `TermRun` keeps its wrapper at any arity (it records
    /// genuine term adjacency) and `Query` keeps its wrapper as the root;
    /// `And`/`Or`/`Not`/`Fielded` carry semantics and always survive.
    pub fn shake(self) -> Self {
        match self {
            Self::Term(_) | Self::Phrase(_) => self,
            Self::TermRun(items) => Self::TermRun(items.into_iter().map(Self::shake).collect()),
            Self::Fielded { field, value } => Self::Fielded {
                field,
                value: Box::new(value.shake()),
            },
            Self::Not(value) => Self::Not(Box::new(value.shake())),
            Self::And(left, right) => Self::And(Box::new(left.shake()), Box::new(right.shake())),
            Self::Or(left, right) => Self::Or(Box::new(left.shake()), Box::new(right.shake())),
            Self::Clause(inner) => inner.shake(),
            Self::Query(clauses) => {
                Self::Query(clauses.into_iter().map(Self::shake).collect())
            }
        }
    }

    /// Renders the tree as a normalized query string.
    ///
    /// The output of `render` on a shaken tree re-parses to the same tree.
    pub fn render(&self) -> String {
        self.rendered(false)
    }

    /// Renders with an explicit grouping requirement from the container.
    ///
    /// `needs_grouping` is false only at the outermost position: the single
    /// clause of a one-clause query. Everywhere else containers ask their
    /// children to group themselves.
    fn rendered(&self, needs_grouping: bool) -> String {
        match self {
            Self::Term(text) => text.clone(),
            Self::Phrase(text) => format!("\"{text}\""),
            Self::TermRun(items) => {
                let parts: Vec<String> = items.iter().map(|item| item.rendered(false)).collect();
                let joined = parts.join(" ");
                if needs_grouping && items.len() > 1 {
                    format!("({joined})")
                } else {
                    joined
                }
            }
            Self::Fielded { field, value } => {
                // The value is always parenthesized to keep the scope
                // unambiguous, so the inner render never adds its own.
                format!("{}:({})", field, value.rendered(false))
            }
            Self::Not(value) => {
                let body = format!("NOT {}", value.rendered(true));
                if needs_grouping {
                    format!("({body})")
                } else {
                    body
                }
            }
            Self::And(left, right) => {
                let body = format!("{} AND {}", left.rendered(true), right.rendered(true));
                if needs_grouping {
                    format!("({body})")
                } else {
                    body
                }
            }
            Self::Or(left, right) => {
                let body = format!("{} OR {}", left.rendered(true), right.rendered(true));
                if needs_grouping {
                    format!("({body})")
                } else {
                    body
                }
            }
            Self::Clause(inner) => inner.rendered(needs_grouping),
            Self::Query(clauses) => match clauses.len() {
                0 => String::new(),
                1 => clauses[0].rendered(false),
                _ => {
                    let parts: Vec<String> =
                        clauses.iter().map(|clause| clause.rendered(true)).collect();
                    parts.join(" ")
                }
            },
        }
    }

    /// Formats the node as an indented tree with the given depth.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term(text) => writeln!(f, "{prefix}Term({text:?})"),
            Self::Phrase(text) => writeln!(f, "{prefix}Phrase({text:?})"),
            Self::TermRun(items) => {
                writeln!(f, "{prefix}TermRun")?;
                for item in items {
                    item.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Fielded { field, value } => {
                writeln!(f, "{prefix}Fielded({field:?})")?;
                value.fmt_tree(f, indent + 1)
            }
            Self::Not(value) => {
                writeln!(f, "{prefix}Not")?;
                value.fmt_tree(f, indent + 1)
            }
            Self::And(left, right) => {
                writeln!(f, "{prefix}And")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Or(left, right) => {
                writeln!(f, "{prefix}Or")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Clause(inner) => {
                writeln!(f, "{prefix}Clause")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::Query(clauses) => {
                writeln!(f, "{prefix}Query ({} clauses)", clauses.len())?;
                for clause in clauses {
                    clause.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(words: &[&str]) -> Node {
        Node::TermRun(words.iter().map(|w| Node::term(*w)).collect())
    }

    #[test]
    fn shake_removes_clause_wrappers() {
        let raw = Node::Query(vec![Node::clause(run(&["a"]))]);
        assert_eq!(raw.shake(), Node::Query(vec![run(&["a"])]));
    }

    #[test]
    fn shake_removes_stacked_clauses() {
        let raw = Node::clause(Node::clause(Node::clause(Node::term("a"))));
        assert_eq!(raw.shake(), Node::term("a"));
    }

    #[test]
    fn shake_descends_through_operators() {
        let raw = Node::and(
            Node::clause(run(&["a"])),
            Node::not(Node::clause(run(&["b"]))),
        );
        assert_eq!(raw.shake(), Node::and(run(&["a"]), Node::not(run(&["b"]))));
    }

    #[test]
    fn shake_keeps_term_run_at_any_arity() {
        let single = run(&["only"]);
        assert_eq!(single.clone().shake(), single);
    }

    #[test]
    fn shake_keeps_query_root() {
        let raw = Node::Query(vec![Node::clause(run(&["a"]))]);
        let shaken = raw.shake();
        assert!(matches!(shaken, Node::Query(_)));
    }

    #[test]
    fn shake_is_idempotent() {
        let raw = Node::Query(vec![
            Node::clause(Node::or(
                Node::clause(run(&["a", "b"])),
                Node::fielded("title", Node::clause(run(&["c"]))),
            )),
            Node::clause(Node::not(run(&["d"]))),
        ]);
        let once = raw.shake();
        assert_eq!(once.clone().shake(), once);
    }

    #[test]
    fn render_empty_query() {
        assert_eq!(Node::Query(vec![]).render(), "");
    }

    #[test]
    fn render_single_clause_ungrouped() {
        let query = Node::Query(vec![Node::and(run(&["one"]), run(&["two"]))]);
        assert_eq!(query.render(), "one AND two");
    }

    #[test]
    fn render_groups_multi_term_operand() {
        let query = Node::Query(vec![Node::and(run(&["one", "two"]), run(&["three"]))]);
        assert_eq!(query.render(), "(one two) AND three");
    }

    #[test]
    fn render_multiple_clauses_grouped() {
        let query = Node::Query(vec![run(&["a"]), Node::not(run(&["b"]))]);
        assert_eq!(query.render(), "a (NOT b)");
    }

    #[test]
    fn render_phrase_requotes() {
        assert_eq!(Node::phrase("two words").render(), "\"two words\"");
    }

    #[test]
    fn render_fielded_always_parenthesizes_value() {
        let node = Node::fielded("title", run(&["dog"]));
        assert_eq!(node.render(), "title:(dog)");
        let node = Node::fielded("title", Node::or(run(&["a"]), run(&["b"])));
        assert_eq!(node.render(), "title:(a OR b)");
    }

    #[test]
    fn render_not_at_top_is_bare() {
        let query = Node::Query(vec![Node::not(run(&["x"]))]);
        assert_eq!(query.render(), "NOT x");
    }

    #[test]
    fn render_nested_operators_group() {
        let query = Node::Query(vec![Node::or(
            run(&["a"]),
            Node::and(run(&["b"]), run(&["c"])),
        )]);
        assert_eq!(query.render(), "a OR (b AND c)");
    }

    #[test]
    fn render_single_term_run_never_self_groups() {
        let query = Node::Query(vec![Node::and(run(&["a"]), run(&["b"]))]);
        // Each operand is a one-element run: no parentheses around them.
        assert_eq!(query.render(), "a AND b");
    }

    #[test]
    fn display_shows_tree_shape() {
        let query = Node::Query(vec![Node::and(run(&["a"]), run(&["b"]))]);
        let tree = query.to_string();
        assert!(tree.contains("Query (1 clauses)"));
        assert!(tree.contains("And"));
        assert!(tree.contains("Term(\"a\")"));
    }
}
