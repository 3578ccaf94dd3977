//! Read-only transformers over parsed query trees.
//!
//! A [`Transform`] walks a canonical [`sq_parse::Node`] tree and produces
//! an independent output, typically a string in another query syntax. The
//! trait requires one handling rule per node kind with no silent default:
//! adding a node kind to the AST breaks compilation here until every
//! transformer handles it.
//!
//! # Example
//!
//! ```
//! use sq_parse::Parser;
//! use sq_transform::{SearchString, Transform};
//!
//! let parser = Parser::new(["title"]);
//! let query = parser.parse("title:guide OR rust").unwrap();
//! assert_eq!(
//!     SearchString.transform(&query),
//!     "(title:(guide) OR rust)"
//! );
//! ```

#![warn(missing_docs)]

mod search_string;
mod transform;

pub use search_string::SearchString;
pub use transform::Transform;
