//! AST visitor trait for traversing the syntax tree.
//!
//! `AstVisitor::visit` dispatches on the node kind. Every `visit_*` method
//! defaults to walking into the node's children, so implementors only
//! override the kinds they care about.

use crate::node::*;
use crate::types::IdentifierKind;

pub trait AstVisitor {
    fn visit(&mut self, ast: &Ast, id: NodeId) {
        match ast.kind(id) {
            NodeKind::Chunk(chunk) => self.visit_chunk(ast, id, chunk),
            NodeKind::FunctionDeclaration(func) => self.visit_function_declaration(ast, id, func),
            NodeKind::AssignmentStatement { .. } => self.visit_assignment_statement(ast, id),
            NodeKind::CallStatement { .. } => self.visit_call_statement(ast, id),
            NodeKind::ReturnStatement { .. } => self.visit_return_statement(ast, id),
            NodeKind::IfStatement { .. } | NodeKind::Clause { .. } => self.visit_if_statement(ast, id),
            NodeKind::WhileStatement { .. } | NodeKind::ForGenericStatement { .. } => {
                self.visit_loop(ast, id)
            }
            NodeKind::BreakStatement | NodeKind::ContinueStatement => {}
            NodeKind::Comment { value, .. } => self.visit_comment(ast, id, value),
            NodeKind::Identifier { name, kind } => {
                self.visit_identifier(ast, id, ast.resolve(*name), *kind)
            }
            NodeKind::Literal(literal) => self.visit_literal(ast, id, literal),
            _ => self.visit_expression(ast, id),
        }
    }

    fn visit_chunk(&mut self, ast: &Ast, id: NodeId, _chunk: &Chunk) {
        walk_children(self, ast, id);
    }

    fn visit_function_declaration(&mut self, ast: &Ast, id: NodeId, _func: &FunctionDeclaration) {
        walk_children(self, ast, id);
    }

    fn visit_assignment_statement(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_call_statement(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_return_statement(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    /// If statements and their clauses, block and shortcut forms alike.
    fn visit_if_statement(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    /// While and for loops.
    fn visit_loop(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }

    fn visit_comment(&mut self, _ast: &Ast, _id: NodeId, _value: &str) {}

    fn visit_identifier(&mut self, _ast: &Ast, _id: NodeId, _name: &str, _kind: IdentifierKind) {}

    fn visit_literal(&mut self, _ast: &Ast, _id: NodeId, _literal: &Literal) {}

    fn visit_expression(&mut self, ast: &Ast, id: NodeId) {
        walk_children(self, ast, id);
    }
}

/// Visit every child of `id` in source order.
pub fn walk_children<V: AstVisitor + ?Sized>(visitor: &mut V, ast: &Ast, id: NodeId) {
    ast.for_each_child(id, |child| visitor.visit(ast, child));
}

/// Counts nodes by category; used for summaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeCounter {
    pub functions: usize,
    pub assignments: usize,
    pub calls: usize,
    pub blocks: usize,
    pub identifiers: usize,
    pub literals: usize,
    pub comments: usize,
    pub invalid: usize,
}

impl NodeCounter {
    pub fn count(ast: &Ast, root: NodeId) -> Self {
        let mut counter = Self::default();
        counter.visit(ast, root);
        counter
    }
}

impl AstVisitor for NodeCounter {
    fn visit_function_declaration(&mut self, ast: &Ast, id: NodeId, _func: &FunctionDeclaration) {
        self.functions += 1;
        walk_children(self, ast, id);
    }

    fn visit_assignment_statement(&mut self, ast: &Ast, id: NodeId) {
        self.assignments += 1;
        walk_children(self, ast, id);
    }

    fn visit_call_statement(&mut self, ast: &Ast, id: NodeId) {
        self.calls += 1;
        walk_children(self, ast, id);
    }

    fn visit_if_statement(&mut self, ast: &Ast, id: NodeId) {
        if matches!(ast.kind(id), NodeKind::IfStatement { .. }) {
            self.blocks += 1;
        }
        walk_children(self, ast, id);
    }

    fn visit_loop(&mut self, ast: &Ast, id: NodeId) {
        self.blocks += 1;
        walk_children(self, ast, id);
    }

    fn visit_comment(&mut self, _ast: &Ast, _id: NodeId, _value: &str) {
        self.comments += 1;
    }

    fn visit_identifier(&mut self, _ast: &Ast, _id: NodeId, _name: &str, _kind: IdentifierKind) {
        self.identifiers += 1;
    }

    fn visit_literal(&mut self, _ast: &Ast, _id: NodeId, _literal: &Literal) {
        self.literals += 1;
    }

    fn visit_expression(&mut self, ast: &Ast, id: NodeId) {
        if matches!(ast.kind(id), NodeKind::InvalidCodeExpression) {
            self.invalid += 1;
        }
        walk_children(self, ast, id);
    }
}
