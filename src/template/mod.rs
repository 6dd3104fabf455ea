//! Scoped template interpreter producing seed requests from a line-oriented
//! grammar. One statement per line; `#` comments, `(`/`)` nested groups with
//! an optional `* <max>` repeat header, `var` declarations resolved through
//! an explicit generator registry, and everything else a binding invocation
//! resolved by lexical-scope search (innermost wins).

pub mod engine;
pub mod generators;
mod parser;
pub mod scope;

pub use engine::TemplateEngine;
pub use generators::{Generator, GeneratorRegistry, Param};
pub use scope::{ScopeId, ScopeTree};
