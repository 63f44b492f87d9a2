//! Shared types for the kata assessment engine.
//!
//! Home of the AST for the learner-JavaScript subset, source spans with
//! byte offsets (the guard transformer splices source text by offset), the
//! generic pre-order tree walker, and JS-flavored stringification helpers.

pub mod ast;
pub mod error;
pub mod jsfmt;
pub mod span;
pub mod visit;

pub use error::SyntaxError;
pub use span::Span;
