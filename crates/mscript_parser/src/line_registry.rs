//! Line number to node index.

use mscript_ast::node::{Ast, NodeId};
use mscript_core::collections::MultiMap;

#[derive(Debug, Default)]
pub struct LineRegistry {
    lines: MultiMap<u32, NodeId>,
}

impl LineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` on every line from its start line to its end line.
    pub fn add_item(&mut self, ast: &Ast, id: NodeId) {
        let data = ast.data(id);
        self.add_range(data.start.line, data.end.line, id);
    }

    pub fn add_to_line(&mut self, line: u32, id: NodeId) {
        self.add_range(line, line, id);
    }

    pub fn add_range(&mut self, start_line: u32, end_line: u32, id: NodeId) {
        for line in start_line..=end_line {
            self.lines.insert(line, id);
        }
    }

    pub fn get(&self, line: u32) -> &[NodeId] {
        self.lines.get(&line).unwrap_or(&[])
    }

    pub fn into_lines(self) -> MultiMap<u32, NodeId> {
        self.lines
    }
}
