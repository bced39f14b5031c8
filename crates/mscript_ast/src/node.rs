//! Syntax node model.
//!
//! Nodes are stored in an [`Ast`] arena and refer to their children by
//! [`NodeId`]. The tree is acyclic: the only upward links are the optional
//! `parent` and `assignment` references of a function declaration, which are
//! plain ids and never walked as children.

use crate::syntax_kind::Operator;
use crate::types::{IdentifierKind, LiteralValue, NodeFlags};
use indexmap::IndexSet;
use mscript_core::arena::{Arena, Id};
use mscript_core::collections::MultiMap;
use mscript_core::intern::{InternedString, StringInterner};
use mscript_core::text::{Position, Range, TextPos, TextRange};

pub type NodeId = Id<Node>;

// ============================================================================
// Node data
// ============================================================================

/// Location and flags common to every node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeData {
    pub start: Position,
    pub end: Position,
    pub range: TextRange,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(start: Position, end: Position, range: TextRange) -> Self {
        Self {
            start,
            end,
            range,
            flags: NodeFlags::NONE,
        }
    }

    /// Data for a block opened at `start` whose end is not known yet.
    pub fn pending(start: Position, pos: TextPos) -> Self {
        Self {
            start,
            end: start,
            range: TextRange::empty(pos),
            flags: NodeFlags::PENDING,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Line/character range covered by the node.
    pub fn span(&self) -> Range {
        Range::new(self.start, self.end)
    }

    pub fn is_pending(&self) -> bool {
        self.flags.contains(NodeFlags::PENDING)
    }

    pub fn is_synthesized(&self) -> bool {
        self.flags.contains(NodeFlags::SYNTHESIZED)
    }
}

/// A syntax node: shared data plus the variant payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub kind: NodeKind,
}

/// Bindings collected for a chunk or function body.
#[derive(Debug, Clone, Default)]
pub struct ScopeData {
    /// Every name bound in the scope, in first-seen order.
    pub namespaces: IndexSet<InternedString>,
    /// Assignment statements, in completion order.
    pub assignments: Vec<NodeId>,
    /// Return statements, in completion order.
    pub returns: Vec<NodeId>,
}

/// The root of a parsed script.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub body: Vec<NodeId>,
    pub scope: ScopeData,
    /// Every literal node in source order.
    pub literals: Vec<NodeId>,
    /// Every function declaration in discovery order.
    pub scopes: Vec<NodeId>,
    /// Line number to the nodes touching that line.
    pub lines: MultiMap<u32, NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionDeclaration {
    /// Parameters: identifiers, assignments for defaulted parameters, or
    /// invalid-code placeholders.
    pub parameters: Vec<NodeId>,
    pub body: Vec<NodeId>,
    pub scope: ScopeData,
    /// The enclosing chunk or function.
    pub parent: Option<NodeId>,
    /// The assignment statement this function is the value of, if any.
    pub assignment: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub raw: String,
    /// Set when a unary minus was folded into a numeric or boolean literal.
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    If,
    ElseIf,
    Else,
    IfShortcut,
    ElseIfShortcut,
    ElseShortcut,
}

impl ClauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKind::If => "IfClause",
            ClauseKind::ElseIf => "ElseifClause",
            ClauseKind::Else => "ElseClause",
            ClauseKind::IfShortcut => "IfShortcutClause",
            ClauseKind::ElseIfShortcut => "ElseifShortcutClause",
            ClauseKind::ElseShortcut => "ElseShortcutClause",
        }
    }

    pub fn is_shortcut(self) -> bool {
        matches!(
            self,
            ClauseKind::IfShortcut | ClauseKind::ElseIfShortcut | ClauseKind::ElseShortcut
        )
    }
}

/// The variant payload of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    // -- Blocks with scope --
    Chunk(Box<Chunk>),
    FunctionDeclaration(Box<FunctionDeclaration>),

    // -- Statements --
    AssignmentStatement {
        variable: NodeId,
        init: NodeId,
        /// The compound operator for `a += b` style assignments.
        operator: Option<Operator>,
    },
    CallStatement {
        expression: NodeId,
    },
    ReturnStatement {
        argument: Option<NodeId>,
    },
    BreakStatement,
    ContinueStatement,
    IfStatement {
        clauses: Vec<NodeId>,
        shortcut: bool,
    },
    Clause {
        kind: ClauseKind,
        condition: Option<NodeId>,
        body: Vec<NodeId>,
    },
    WhileStatement {
        condition: NodeId,
        body: Vec<NodeId>,
        shortcut: bool,
    },
    ForGenericStatement {
        variable: NodeId,
        iterator: NodeId,
        body: Vec<NodeId>,
        shortcut: bool,
    },
    Comment {
        value: String,
        is_statement: bool,
    },

    // -- Expressions --
    Identifier {
        name: InternedString,
        kind: IdentifierKind,
    },
    Literal(Literal),
    MemberExpression {
        base: NodeId,
        identifier: NodeId,
    },
    IndexExpression {
        base: NodeId,
        index: NodeId,
    },
    SliceExpression {
        base: NodeId,
        left: NodeId,
        right: NodeId,
    },
    CallExpression {
        base: NodeId,
        arguments: Vec<NodeId>,
    },
    UnaryExpression {
        operator: Operator,
        argument: NodeId,
    },
    BinaryExpression {
        operator: Operator,
        left: NodeId,
        right: NodeId,
    },
    LogicalExpression {
        operator: Operator,
        left: NodeId,
        right: NodeId,
    },
    IsaExpression {
        left: NodeId,
        right: NodeId,
    },
    ComparisonGroupExpression {
        operators: Vec<Operator>,
        expressions: Vec<NodeId>,
    },
    ParenthesisExpression {
        expression: NodeId,
    },
    ListConstructorExpression {
        fields: Vec<NodeId>,
    },
    ListValue {
        value: NodeId,
    },
    MapConstructorExpression {
        fields: Vec<NodeId>,
    },
    MapKeyString {
        key: NodeId,
        value: NodeId,
    },
    EmptyExpression,
    Unknown,
    InvalidCodeExpression,
}

impl NodeKind {
    /// The display name of the node type.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Chunk(_) => "Chunk",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::AssignmentStatement { .. } => "AssignmentStatement",
            NodeKind::CallStatement { .. } => "CallStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::IfStatement { shortcut: false, .. } => "IfStatement",
            NodeKind::IfStatement { shortcut: true, .. } => "IfShortcutStatement",
            NodeKind::Clause { kind, .. } => kind.as_str(),
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::ForGenericStatement { .. } => "ForGenericStatement",
            NodeKind::Comment { .. } => "Comment",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal(lit) => match lit.value {
                LiteralValue::String(_) => "StringLiteral",
                LiteralValue::Number(_) => "NumericLiteral",
                LiteralValue::Boolean(_) => "BooleanLiteral",
                LiteralValue::Nil => "NilLiteral",
            },
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::IndexExpression { .. } => "IndexExpression",
            NodeKind::SliceExpression { .. } => "SliceExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::UnaryExpression { operator, .. } => match operator {
                Operator::Not => "NegationExpression",
                Operator::Minus | Operator::Plus => "BinaryNegatedExpression",
                _ => "UnaryExpression",
            },
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::IsaExpression { .. } => "IsaExpression",
            NodeKind::ComparisonGroupExpression { .. } => "ComparisonGroupExpression",
            NodeKind::ParenthesisExpression { .. } => "ParenthesisExpression",
            NodeKind::ListConstructorExpression { .. } => "ListConstructorExpression",
            NodeKind::ListValue { .. } => "ListValue",
            NodeKind::MapConstructorExpression { .. } => "MapConstructorExpression",
            NodeKind::MapKeyString { .. } => "MapKeyString",
            NodeKind::EmptyExpression => "EmptyExpression",
            NodeKind::Unknown => "Unknown",
            NodeKind::InvalidCodeExpression => "InvalidCodeExpression",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, NodeKind::Literal(_))
    }

    /// Child node ids in source order. Scope bookkeeping lists and the
    /// upward links of functions are not children.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::Chunk(chunk) => out.extend_from_slice(&chunk.body),
            NodeKind::FunctionDeclaration(func) => {
                out.extend_from_slice(&func.parameters);
                out.extend_from_slice(&func.body);
            }
            NodeKind::AssignmentStatement { variable, init, .. } => {
                out.push(*variable);
                out.push(*init);
            }
            NodeKind::CallStatement { expression } => out.push(*expression),
            NodeKind::ReturnStatement { argument } => out.extend(argument.iter().copied()),
            NodeKind::IfStatement { clauses, .. } => out.extend_from_slice(clauses),
            NodeKind::Clause {
                condition, body, ..
            } => {
                out.extend(condition.iter().copied());
                out.extend_from_slice(body);
            }
            NodeKind::WhileStatement {
                condition, body, ..
            } => {
                out.push(*condition);
                out.extend_from_slice(body);
            }
            NodeKind::ForGenericStatement {
                variable,
                iterator,
                body,
                ..
            } => {
                out.push(*variable);
                out.push(*iterator);
                out.extend_from_slice(body);
            }
            NodeKind::MemberExpression { base, identifier } => {
                out.push(*base);
                out.push(*identifier);
            }
            NodeKind::IndexExpression { base, index } => {
                out.push(*base);
                out.push(*index);
            }
            NodeKind::SliceExpression { base, left, right } => {
                out.push(*base);
                out.push(*left);
                out.push(*right);
            }
            NodeKind::CallExpression { base, arguments } => {
                out.push(*base);
                out.extend_from_slice(arguments);
            }
            NodeKind::UnaryExpression { argument, .. } => out.push(*argument),
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::IsaExpression { left, right } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::ComparisonGroupExpression { expressions, .. } => {
                out.extend_from_slice(expressions)
            }
            NodeKind::ParenthesisExpression { expression } => out.push(*expression),
            NodeKind::ListConstructorExpression { fields }
            | NodeKind::MapConstructorExpression { fields } => out.extend_from_slice(fields),
            NodeKind::ListValue { value } => out.push(*value),
            NodeKind::MapKeyString { key, value } => {
                out.push(*key);
                out.push(*value);
            }
            NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::Comment { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Literal(_)
            | NodeKind::EmptyExpression
            | NodeKind::Unknown
            | NodeKind::InvalidCodeExpression => {}
        }
        out
    }

    /// Mutable child slots, in the same order as [`NodeKind::children`].
    fn child_slots_mut(&mut self) -> Vec<&mut NodeId> {
        let mut out: Vec<&mut NodeId> = Vec::new();
        match self {
            NodeKind::Chunk(chunk) => out.extend(chunk.body.iter_mut()),
            NodeKind::FunctionDeclaration(func) => {
                let FunctionDeclaration {
                    parameters, body, ..
                } = &mut **func;
                out.extend(parameters.iter_mut());
                out.extend(body.iter_mut());
            }
            NodeKind::AssignmentStatement { variable, init, .. } => {
                out.push(variable);
                out.push(init);
            }
            NodeKind::CallStatement { expression } => out.push(expression),
            NodeKind::ReturnStatement { argument } => out.extend(argument.iter_mut()),
            NodeKind::IfStatement { clauses, .. } => out.extend(clauses.iter_mut()),
            NodeKind::Clause {
                condition, body, ..
            } => {
                out.extend(condition.iter_mut());
                out.extend(body.iter_mut());
            }
            NodeKind::WhileStatement {
                condition, body, ..
            } => {
                out.push(condition);
                out.extend(body.iter_mut());
            }
            NodeKind::ForGenericStatement {
                variable,
                iterator,
                body,
                ..
            } => {
                out.push(variable);
                out.push(iterator);
                out.extend(body.iter_mut());
            }
            NodeKind::MemberExpression { base, identifier } => {
                out.push(base);
                out.push(identifier);
            }
            NodeKind::IndexExpression { base, index } => {
                out.push(base);
                out.push(index);
            }
            NodeKind::SliceExpression { base, left, right } => {
                out.push(base);
                out.push(left);
                out.push(right);
            }
            NodeKind::CallExpression { base, arguments } => {
                out.push(base);
                out.extend(arguments.iter_mut());
            }
            NodeKind::UnaryExpression { argument, .. } => out.push(argument),
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::IsaExpression { left, right } => {
                out.push(left);
                out.push(right);
            }
            NodeKind::ComparisonGroupExpression { expressions, .. } => {
                out.extend(expressions.iter_mut())
            }
            NodeKind::ParenthesisExpression { expression } => out.push(expression),
            NodeKind::ListConstructorExpression { fields }
            | NodeKind::MapConstructorExpression { fields } => out.extend(fields.iter_mut()),
            NodeKind::ListValue { value } => out.push(value),
            NodeKind::MapKeyString { key, value } => {
                out.push(key);
                out.push(value);
            }
            NodeKind::BreakStatement
            | NodeKind::ContinueStatement
            | NodeKind::Comment { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Literal(_)
            | NodeKind::EmptyExpression
            | NodeKind::Unknown
            | NodeKind::InvalidCodeExpression => {}
        }
        out
    }
}

// ============================================================================
// Ast arena
// ============================================================================

/// Owner of every node produced by one parse.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Arena<Node>,
    interner: StringInterner,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena that shares an existing interner.
    pub fn with_interner(interner: StringInterner) -> Self {
        Self {
            nodes: Arena::new(),
            interner,
        }
    }

    #[inline]
    pub fn alloc(&mut self, kind: NodeKind, data: NodeData) -> NodeId {
        self.nodes.alloc(Node { data, kind })
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    #[inline]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id].data
    }

    #[inline]
    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id].data
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    #[inline]
    pub fn intern(&self, name: &str) -> InternedString {
        self.interner.intern(name)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.interner.resolve(key)
    }

    /// The name of an identifier node.
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name, .. } => Some(self.resolve(*name)),
            _ => None,
        }
    }

    pub fn chunk(&self, id: NodeId) -> Option<&Chunk> {
        match self.kind(id) {
            NodeKind::Chunk(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn chunk_mut(&mut self, id: NodeId) -> Option<&mut Chunk> {
        match &mut self.nodes[id].kind {
            NodeKind::Chunk(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn function(&self, id: NodeId) -> Option<&FunctionDeclaration> {
        match self.kind(id) {
            NodeKind::FunctionDeclaration(func) => Some(func),
            _ => None,
        }
    }

    pub fn function_mut(&mut self, id: NodeId) -> Option<&mut FunctionDeclaration> {
        match &mut self.nodes[id].kind {
            NodeKind::FunctionDeclaration(func) => Some(func),
            _ => None,
        }
    }

    /// Scope bookkeeping of a chunk or function node.
    pub fn scope(&self, id: NodeId) -> Option<&ScopeData> {
        match self.kind(id) {
            NodeKind::Chunk(chunk) => Some(&chunk.scope),
            NodeKind::FunctionDeclaration(func) => Some(&func.scope),
            _ => None,
        }
    }

    pub fn scope_mut(&mut self, id: NodeId) -> Option<&mut ScopeData> {
        match &mut self.nodes[id].kind {
            NodeKind::Chunk(chunk) => Some(&mut chunk.scope),
            NodeKind::FunctionDeclaration(func) => Some(&mut func.scope),
            _ => None,
        }
    }

    /// The statement list of a block node. If statements expose their
    /// clause list.
    pub fn body(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.kind(id) {
            NodeKind::Chunk(chunk) => Some(&chunk.body),
            NodeKind::FunctionDeclaration(func) => Some(&func.body),
            NodeKind::IfStatement { clauses, .. } => Some(clauses),
            NodeKind::Clause { body, .. }
            | NodeKind::WhileStatement { body, .. }
            | NodeKind::ForGenericStatement { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn body_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.nodes[id].kind {
            NodeKind::Chunk(chunk) => Some(&mut chunk.body),
            NodeKind::FunctionDeclaration(func) => Some(&mut func.body),
            NodeKind::IfStatement { clauses, .. } => Some(clauses),
            NodeKind::Clause { body, .. }
            | NodeKind::WhileStatement { body, .. }
            | NodeKind::ForGenericStatement { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    pub fn for_each_child(&self, id: NodeId, mut f: impl FnMut(NodeId)) {
        for child in self.kind(id).children() {
            f(child);
        }
    }

    /// Deep-copy the subtree rooted at `id`, returning the new root.
    ///
    /// Scope bookkeeping of copied functions still names the original
    /// assignment and return nodes.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let node = self.nodes[id].clone();
        let copies: Vec<NodeId> = node
            .kind
            .children()
            .into_iter()
            .map(|child| self.clone_subtree(child))
            .collect();
        let mut kind = node.kind;
        for (slot, copy) in kind.child_slots_mut().into_iter().zip(copies) {
            *slot = copy;
        }
        self.alloc(kind, node.data)
    }
}
