use std::collections::HashMap;
use std::sync::Arc;

use super::generators::{Generator, Param};

/// Index of a scope within a [`ScopeTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(pub(crate) usize);

/// Resolution environment: the scope and in-scope position of the tokens
/// currently being interpreted. Local bindings are visible only when declared
/// before `seq`; bindings of enclosing scopes are visible at any position.
#[derive(Debug, Clone, Copy)]
pub struct Env {
    pub scope: ScopeId,
    pub seq: u32,
}

/// How a nested group is re-invoked from its placeholder statement.
#[derive(Debug, Clone, Copy)]
pub enum ScopeMode {
    /// Group body runs exactly once.
    Once,
    /// Group body runs `count` times, `count` drawn uniformly in `[0, max)`
    /// per invocation.
    Repeat { max: u32 },
}

/// One executable statement of a scope.
#[derive(Debug)]
pub enum Stmt {
    /// Invoke the binding `name` with the given call-site parameters.
    Invoke {
        name: String,
        args: Vec<Param>,
        seq: u32,
        line: usize,
    },
    /// Placeholder marking where a nested group's output is interleaved.
    Nested { child: ScopeId },
}

/// How a binding resolves its parameters when invoked.
#[derive(Debug, Clone)]
pub enum Invocable {
    /// Built-in usable anywhere; reads its parameters from the call site.
    Ambient(Arc<dyn Generator>),
    /// Declared via `var`; parameters were captured at the declaration and
    /// resolve in the declaration's environment.
    Declared { gen: Arc<dyn Generator>, env: Env },
}

/// A named binding stored in a scope's local table.
#[derive(Debug)]
pub struct Binding {
    pub(crate) seq: u32,
    pub(crate) line: usize,
    /// Construction arguments, kept for reference validation after parsing.
    pub(crate) decl_args: Vec<Param>,
    pub invocable: Invocable,
}

/// A lexical scope: ordered statements plus a local binding table shadowing
/// ancestor bindings along the `parent` chain.
#[derive(Debug)]
pub struct ScopeNode {
    pub statements: Vec<Stmt>,
    pub(crate) bindings: HashMap<String, Binding>,
    pub parent: Option<ScopeId>,
    pub mode: ScopeMode,
}

/// The scope tree built once per template parse, read-only afterwards.
#[derive(Debug)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl ScopeTree {
    pub const ROOT: ScopeId = ScopeId(0);

    pub(crate) fn new() -> Self {
        ScopeTree {
            nodes: vec![ScopeNode {
                statements: Vec::new(),
                bindings: HashMap::new(),
                parent: None,
                mode: ScopeMode::Once,
            }],
        }
    }

    pub(crate) fn push_child(&mut self, parent: ScopeId, mode: ScopeMode) -> ScopeId {
        let id = ScopeId(self.nodes.len());
        self.nodes.push(ScopeNode {
            statements: Vec::new(),
            bindings: HashMap::new(),
            parent: Some(parent),
            mode,
        });
        id
    }

    pub fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.nodes[id.0]
    }

    pub(crate) fn scope_ids(&self) -> impl Iterator<Item = ScopeId> {
        (0..self.nodes.len()).map(ScopeId)
    }

    /// Lexical-scope search: innermost wins. In the starting scope only
    /// bindings declared before `env.seq` match; enclosing scopes match
    /// regardless of declaration order.
    pub fn resolve(&self, env: Env, name: &str) -> Option<&Binding> {
        let local = self.node(env.scope);
        if let Some(binding) = local.bindings.get(name) {
            if binding.seq < env.seq {
                return Some(binding);
            }
        }
        let mut current = local.parent;
        while let Some(id) = current {
            let node = self.node(id);
            if let Some(binding) = node.bindings.get(name) {
                return Some(binding);
            }
            current = node.parent;
        }
        None
    }
}
