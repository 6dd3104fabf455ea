use rand::{Rng, RngCore};

use super::generators::{EmitResult, GeneratorRegistry, Param, Stop};
use super::parser;
use super::scope::{Env, Invocable, ScopeId, ScopeMode, ScopeTree, Stmt};
use crate::error::Result;

/// Bindings may invoke each other (a `random-choice` alternative can name
/// another `random-choice`), so a cyclic template could recurse forever.
const MAX_INVOKE_DEPTH: u32 = 64;

/// Fixed-capacity output buffer. Writes are all-or-nothing: a write that
/// would exceed the capacity leaves the buffer untouched and signals
/// [`Stop::Overflow`].
#[derive(Debug)]
pub struct OutBuf {
    buf: Vec<u8>,
    cap: usize,
}

impl OutBuf {
    pub fn new(cap: usize) -> Self {
        OutBuf {
            buf: Vec::with_capacity(cap),
            cap,
        }
    }

    pub fn put(&mut self, bytes: &[u8]) -> EmitResult {
        if self.buf.len() + bytes.len() > self.cap {
            return Err(Stop::Overflow);
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Zero-fill the unwritten tail up to capacity.
    pub(crate) fn into_padded(mut self) -> Vec<u8> {
        self.buf.resize(self.cap, 0);
        self.buf
    }
}

/// Interpretation context handed to generators: the scope tree, the
/// resolution environment of the tokens being emitted, the bounded output
/// buffer and the randomness source.
pub struct Ctx<'a> {
    pub(crate) tree: &'a ScopeTree,
    pub(crate) env: Env,
    pub(crate) out: &'a mut OutBuf,
    pub(crate) rng: &'a mut dyn RngCore,
    pub(crate) depth: u32,
}

impl Ctx<'_> {
    pub fn put(&mut self, bytes: &[u8]) -> EmitResult {
        self.out.put(bytes)
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    /// Emit a single parameter: literals as their bytes, numbers as decimal
    /// ASCII, references by invoking the named binding.
    pub fn emit_param(&mut self, param: &Param) -> EmitResult {
        match param {
            Param::Literal(bytes) => self.put(bytes),
            Param::Number(n) => self.put(n.to_string().as_bytes()),
            Param::Reference(name) => {
                let name = name.clone();
                self.invoke(&name, &[])
            }
        }
    }

    /// Resolve `name` in the current environment and run it. Bindings
    /// declared via `var` ignore call-site parameters and emit under their
    /// declaration environment; ambient built-ins read the call site.
    pub fn invoke(&mut self, name: &str, call_args: &[Param]) -> EmitResult {
        if self.depth >= MAX_INVOKE_DEPTH {
            return Err(Stop::DepthLimit);
        }
        let tree = self.tree;
        let invocable = match tree.resolve(self.env, name) {
            Some(binding) => binding.invocable.clone(),
            None => return Err(Stop::Unresolved(name.to_string())),
        };
        self.depth += 1;
        let result = match invocable {
            Invocable::Ambient(gen) => gen.emit(call_args, self),
            Invocable::Declared { gen, env } => {
                let saved = self.env;
                self.env = env;
                let result = gen.emit(&[], self);
                self.env = saved;
                result
            }
        };
        self.depth -= 1;
        result
    }
}

/// A parsed template, ready to be interpreted any number of times.
#[derive(Debug)]
pub struct TemplateEngine {
    tree: ScopeTree,
}

impl TemplateEngine {
    /// Parse the template source into a scope tree, validating every
    /// binding reference against the lexical-scope rule.
    pub fn parse(source: &str, registry: &GeneratorRegistry) -> Result<Self> {
        Ok(TemplateEngine {
            tree: parser::parse(source, registry)?,
        })
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    /// Interpret the template into exactly `capacity` bytes. If the output
    /// outgrows the capacity, generation stops at the last completed
    /// statement and the tail stays zero-filled; this is an expected
    /// outcome, not an error.
    pub fn generate<R: Rng>(&self, capacity: usize, rng: &mut R) -> Vec<u8> {
        let mut out = OutBuf::new(capacity);
        let mut ctx = Ctx {
            tree: &self.tree,
            env: Env {
                scope: ScopeTree::ROOT,
                seq: 0,
            },
            out: &mut out,
            rng,
            depth: 0,
        };
        match run_scope(ScopeTree::ROOT, &mut ctx) {
            Ok(()) => {}
            Err(Stop::Overflow) => {
                log::debug!("template output reached capacity, truncated at statement boundary");
            }
            Err(Stop::DepthLimit) => {
                log::warn!("template invocation depth limit reached, output truncated");
            }
            Err(Stop::Unresolved(name)) => {
                log::warn!("binding {name:?} did not resolve at generation time");
            }
        }
        out.into_padded()
    }
}

/// Run every statement of a scope in order. An overflowing statement is
/// rolled back to its own start before the stop propagates, so completed
/// statements of enclosing scopes are kept.
fn run_scope(scope: ScopeId, ctx: &mut Ctx<'_>) -> EmitResult {
    let tree = ctx.tree;
    for stmt in &tree.node(scope).statements {
        match stmt {
            Stmt::Invoke {
                name, args, seq, ..
            } => {
                let checkpoint = ctx.out.len();
                ctx.env = Env { scope, seq: *seq };
                if let Err(stop) = ctx.invoke(name, args) {
                    ctx.out.truncate(checkpoint);
                    return Err(stop);
                }
            }
            Stmt::Nested { child } => match tree.node(*child).mode {
                ScopeMode::Once => run_scope(*child, ctx)?,
                ScopeMode::Repeat { max } => {
                    let count = ctx.rng.gen_range(0..max);
                    for _ in 0..count {
                        run_scope(*child, ctx)?;
                    }
                }
            },
        }
    }
    Ok(())
}
