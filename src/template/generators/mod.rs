pub mod common;
pub mod registry;

pub use common::{LiteralText, RandomChoice, RandomString};
pub use registry::{GeneratorFactory, GeneratorRegistry};

use std::fmt;

use super::engine::Ctx;

/// One parsed statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Quoted literal, unescaped to raw bytes.
    Literal(Vec<u8>),
    /// Bare numeric token.
    Number(i64),
    /// Bare word, resolved through the lexical-scope search when it runs.
    Reference(String),
}

/// Reason generation ended before the template was fully interpreted.
/// None of these are errors: the output produced so far is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    /// The next write would exceed the output capacity.
    Overflow,
    /// Binding invocations nested past the recursion limit.
    DepthLimit,
    /// A reference failed to resolve at generation time. Parse-time
    /// validation makes this unreachable for trees built by `parse`.
    Unresolved(String),
}

pub type EmitResult = Result<(), Stop>;

/// A byte-producing binding. Implementations draw from the context's RNG,
/// write through the context's bounded buffer, and may recursively invoke
/// other bindings via [`Ctx::invoke`].
pub trait Generator: fmt::Debug + Send + Sync {
    fn emit(&self, call_args: &[Param], ctx: &mut Ctx<'_>) -> EmitResult;

    /// Parse-time check of call-site parameters for ambient invocations.
    /// Construction arguments of `var` declarations are checked by the
    /// registry factory instead.
    fn validate_call(&self, _args: &[Param]) -> Result<(), String> {
        Ok(())
    }
}
