//! Textual tree dump.
//!
//! Every node renders as `Type[start-end][payload]`. Block bodies are put
//! on their own lines, each indented by one tab per nesting level. The
//! format is stable and used for snapshot-style assertions.

use crate::node::*;
use crate::types::LiteralValue;

/// Render the subtree rooted at `id`.
pub fn print_tree(ast: &Ast, id: NodeId) -> String {
    TreePrinter::new(ast).render(id)
}

pub struct TreePrinter<'a> {
    ast: &'a Ast,
}

impl<'a> TreePrinter<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    pub fn render(&self, id: NodeId) -> String {
        let node = self.ast.node(id);
        let head = format!("{}[{}-{}]", node.kind.name(), node.data.start, node.data.end);

        match &node.kind {
            NodeKind::Chunk(chunk) => format!("{}[{}]", head, self.block(&chunk.body)),
            NodeKind::FunctionDeclaration(func) => {
                let params = self.list(&func.parameters, ", ");
                format!("{}[{}{}]", head, params, self.block(&func.body))
            }
            NodeKind::AssignmentStatement { variable, init, .. } => {
                format!("{}[{} = {}]", head, self.render(*variable), self.render(*init))
            }
            NodeKind::CallStatement { expression } => {
                format!("{}[{}]", head, self.render(*expression))
            }
            NodeKind::ReturnStatement { argument } => match argument {
                Some(arg) => format!("{}[{}]", head, self.render(*arg)),
                None => format!("{}[]", head),
            },
            NodeKind::BreakStatement | NodeKind::ContinueStatement => head,
            NodeKind::IfStatement { clauses, .. } => format!("{}[{}]", head, self.block(clauses)),
            NodeKind::Clause {
                condition, body, ..
            } => {
                let condition = condition.map(|c| self.render(c)).unwrap_or_default();
                format!("{}[{}{}]", head, condition, self.block(body))
            }
            NodeKind::WhileStatement {
                condition, body, ..
            } => format!("{}[{}{}]", head, self.render(*condition), self.block(body)),
            NodeKind::ForGenericStatement {
                variable,
                iterator,
                body,
                ..
            } => format!(
                "{}[{} in {}{}]",
                head,
                self.render(*variable),
                self.render(*iterator),
                self.block(body)
            ),
            NodeKind::Comment { value, .. } => format!("{}[{}]", head, value),
            NodeKind::Identifier { name, .. } => {
                format!("Identifier[{}-{}][{}]", node.data.start, node.data.end, self.ast.resolve(*name))
            }
            NodeKind::Literal(literal) => {
                let sign = if literal.negated { "-" } else { "" };
                let value = match &literal.value {
                    LiteralValue::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("Literal[{}-{}][{}{}]", node.data.start, node.data.end, sign, value)
            }
            NodeKind::MemberExpression { base, identifier } => {
                format!("{}[{}.{}]", head, self.render(*base), self.render(*identifier))
            }
            NodeKind::IndexExpression { base, index } => {
                format!("{}[{}[{}]]", head, self.render(*base), self.render(*index))
            }
            NodeKind::SliceExpression { base, left, right } => format!(
                "{}[{}[{}:{}]]",
                head,
                self.render(*base),
                self.render(*left),
                self.render(*right)
            ),
            NodeKind::CallExpression { base, arguments } => format!(
                "{}[{}({})]",
                head,
                self.render(*base),
                self.list(arguments, ", ")
            ),
            NodeKind::UnaryExpression { operator, argument } => {
                format!("{}[{} {}]", head, operator, self.render(*argument))
            }
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
            | NodeKind::LogicalExpression {
                operator,
                left,
                right,
            } => format!(
                "{}[{} {} {}]",
                head,
                self.render(*left),
                operator,
                self.render(*right)
            ),
            NodeKind::IsaExpression { left, right } => {
                format!("{}[{} isa {}]", head, self.render(*left), self.render(*right))
            }
            NodeKind::ComparisonGroupExpression {
                operators,
                expressions,
            } => {
                let mut group = Vec::with_capacity(expressions.len() * 2);
                for (i, expr) in expressions.iter().enumerate() {
                    if i > 0 {
                        if let Some(op) = operators.get(i - 1) {
                            group.push(op.to_string());
                        }
                    }
                    group.push(self.render(*expr));
                }
                format!("{}[{}]", head, group.join(" "))
            }
            NodeKind::ParenthesisExpression { expression } => {
                format!("{}[{}]", head, self.render(*expression))
            }
            NodeKind::ListConstructorExpression { fields }
            | NodeKind::MapConstructorExpression { fields } => {
                format!("{}[{}]", head, self.block(fields))
            }
            NodeKind::ListValue { value } => format!("{}[{}]", head, self.render(*value)),
            NodeKind::MapKeyString { key, value } => {
                format!("{}[{}: {}]", head, self.render(*key), self.render(*value))
            }
            NodeKind::EmptyExpression | NodeKind::Unknown | NodeKind::InvalidCodeExpression => {
                format!("{}[]", head)
            }
        }
    }

    fn list(&self, items: &[NodeId], separator: &str) -> String {
        items
            .iter()
            .map(|item| self.render(*item))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Newline-separated items indented one tab, or nothing when empty.
    fn block(&self, items: &[NodeId]) -> String {
        if items.is_empty() {
            return String::new();
        }
        let mut out = String::from("\n");
        for item in items {
            for line in self.render(*item).lines() {
                out.push('\t');
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}
