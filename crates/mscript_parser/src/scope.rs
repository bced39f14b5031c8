//! Active scope tracking while parsing.
//!
//! The chain of enclosing scopes only lives here, so the finished tree keeps
//! no back pointers besides a function's `parent` id.

use mscript_ast::node::{Ast, NodeId};
use mscript_core::intern::InternedString;

#[derive(Debug, Default)]
pub struct ScopeTracker {
    current: Option<NodeId>,
    outer: Vec<NodeId>,
    /// Every function scope entered, in discovery order.
    scopes: Vec<NodeId>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `scope` the active scope. The first scope entered is the chunk
    /// and is not recorded as a function scope.
    pub fn enter(&mut self, scope: NodeId) {
        if let Some(current) = self.current.replace(scope) {
            self.scopes.push(scope);
            self.outer.push(current);
        }
    }

    /// Restore the enclosing scope.
    pub fn exit(&mut self) {
        self.current = self.outer.pop();
    }

    /// The active scope. `None` only before the chunk is entered or after
    /// it was exited.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Number of scopes enclosing the active one.
    pub fn depth(&self) -> usize {
        self.outer.len()
    }

    pub fn scopes(&self) -> &[NodeId] {
        &self.scopes
    }

    pub fn take_scopes(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.scopes)
    }

    /// Add a name to the active scope's namespace set.
    pub fn bind(&self, ast: &mut Ast, name: InternedString) {
        if let Some(scope) = self.current.and_then(|id| ast.scope_mut(id)) {
            scope.namespaces.insert(name);
        }
    }

    /// Record a completed assignment in `scope`.
    pub fn add_assignment(ast: &mut Ast, scope: NodeId, assignment: NodeId) {
        if let Some(data) = ast.scope_mut(scope) {
            data.assignments.push(assignment);
        }
    }

    /// Record a completed return statement in `scope`.
    pub fn add_return(ast: &mut Ast, scope: NodeId, statement: NodeId) {
        if let Some(data) = ast.scope_mut(scope) {
            data.returns.push(statement);
        }
    }
}
