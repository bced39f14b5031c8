//! Builders for block statements awaiting their terminator.
//!
//! A block node is allocated when its header is parsed, flagged `PENDING`,
//! and filled in exactly once when the block completes. Completing yields a
//! [`Completion`] that the parser uses to hook the node into the tree.

use mscript_ast::node::{Ast, NodeId};
use mscript_ast::types::NodeFlags;
use mscript_lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Chunk,
    If {
        /// The clause whose body is being collected.
        current_clause: NodeId,
    },
    While,
    For,
    Function {
        /// Statement or entry whose value is this function. Its end is
        /// patched when the function completes.
        owner: Option<NodeId>,
    },
}

impl PendingKind {
    /// The keyword naming this block in diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            PendingKind::Chunk => "chunk",
            PendingKind::If { .. } => "if",
            PendingKind::While => "while",
            PendingKind::For => "for",
            PendingKind::Function { .. } => "function",
        }
    }
}

#[derive(Debug)]
pub struct PendingBlock {
    pub kind: PendingKind,
    pub node: NodeId,
    /// Statements collected so far. For if blocks, the current clause's.
    pub body: Vec<NodeId>,
}

/// What a completed block asks of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub node: NodeId,
    pub owner: Option<NodeId>,
    /// Statement blocks join the enclosing body; functions and the chunk
    /// do not.
    pub appends_to_parent: bool,
}

impl PendingBlock {
    pub fn new(kind: PendingKind, node: NodeId) -> Self {
        Self {
            kind,
            node,
            body: Vec::new(),
        }
    }

    /// Close the current if clause at `end` and append it to the if
    /// statement. `next` becomes the clause collecting further statements.
    pub fn next_clause(&mut self, ast: &mut Ast, end: &Token, next: Option<NodeId>) {
        if let PendingKind::If { current_clause } = &mut self.kind {
            let finished = *current_clause;
            if let Some(body) = ast.body_mut(finished) {
                *body = std::mem::take(&mut self.body);
            }
            close(ast, finished, end, false);
            if let Some(clauses) = ast.body_mut(self.node) {
                clauses.push(finished);
            }
            if let Some(next) = next {
                *current_clause = next;
            }
        }
    }

    /// Write body, end and range into the block node. `forced` marks a
    /// block closed at end of input without its terminator.
    pub fn complete(mut self, ast: &mut Ast, end: &Token, forced: bool) -> Completion {
        match self.kind {
            PendingKind::If { .. } => self.next_clause(ast, end, None),
            _ => {
                if let Some(body) = ast.body_mut(self.node) {
                    *body = std::mem::take(&mut self.body);
                }
            }
        }
        close(ast, self.node, end, forced);

        let (owner, appends_to_parent) = match self.kind {
            PendingKind::Function { owner } => (owner, false),
            PendingKind::Chunk => (None, false),
            _ => (None, true),
        };
        Completion {
            node: self.node,
            owner,
            appends_to_parent,
        }
    }
}

fn close(ast: &mut Ast, id: NodeId, end: &Token, forced: bool) {
    let data = ast.data_mut(id);
    data.end = data.end.max(end.end);
    data.range.end = data.range.end.max(end.span.end);
    data.flags.remove(NodeFlags::PENDING);
    if forced {
        data.flags.insert(NodeFlags::FORCE_CLOSED);
    }
}

/// Stack of open blocks above a permanent chunk entry.
#[derive(Debug)]
pub struct PendingStack {
    chunk: PendingBlock,
    open: Vec<PendingBlock>,
}

impl PendingStack {
    pub fn new(chunk: NodeId) -> Self {
        Self {
            chunk: PendingBlock::new(PendingKind::Chunk, chunk),
            open: Vec::new(),
        }
    }

    pub fn push(&mut self, block: PendingBlock) {
        self.open.push(block);
    }

    pub fn peek(&self) -> &PendingBlock {
        self.open.last().unwrap_or(&self.chunk)
    }

    pub fn peek_mut(&mut self) -> &mut PendingBlock {
        self.open.last_mut().unwrap_or(&mut self.chunk)
    }

    /// Pop the innermost open block. The chunk is never popped.
    pub fn pop(&mut self) -> Option<PendingBlock> {
        self.open.pop()
    }

    /// Number of open blocks above the chunk.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Body of the block that was on top when the stack had `depth` open
    /// blocks.
    pub fn body_at_mut(&mut self, depth: usize) -> &mut Vec<NodeId> {
        match depth.checked_sub(1).and_then(|i| self.open.get_mut(i)) {
            Some(block) => &mut block.body,
            None => &mut self.chunk.body,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.open.is_empty()
    }

    pub fn into_chunk(self) -> PendingBlock {
        self.chunk
    }
}
