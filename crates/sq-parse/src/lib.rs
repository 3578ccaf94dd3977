//! Boolean search-query parsing, canonicalization, and rendering.
//!
//! This crate parses a small boolean query language into an AST:
//!
//! - **Terms**: `rust` - bare words
//! - **Phrases**: `"error handling"` - quoted exact sequences
//! - **Operators**: `AND`, `OR`, `NOT` - case-sensitive, whole words only
//! - **Fields**: `title:guide` - restrict a value to one configured field
//! - **Grouping**: `(a OR b) AND c` - precedence control
//!
//! Parsing canonicalizes the tree (removing the structural clause wrappers
//! the grammar introduces) so that semantically equivalent inputs produce
//! equal trees, and rendering turns a tree back into a normalized string
//! that re-parses to the same tree.
//!
//! # Example
//!
//! ```
//! use sq_parse::Parser;
//!
//! let parser = Parser::new(["title", "author"]);
//! let query = parser.parse("title:guide NOT deprecated").unwrap();
//! assert_eq!(query.render(), "title:(guide) (NOT deprecated)");
//! ```

#![warn(missing_docs)]

mod error;
mod node;
mod parser;
mod scan;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use node::Node;
pub use parser::Parser;
pub use scan::{Marker, Rule};
