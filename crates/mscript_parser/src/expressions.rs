//! Expressions, from `or` down to atoms.
//!
//! Binary levels are folded by one precedence-climbing loop, so a nesting
//! level costs a handful of frames rather than one per precedence level.

use crate::parser::{token_data, ExprFlags, Mark, Parser, MAX_RECURSION_DEPTH};
use crate::pending_block::PendingKind;
use crate::precedence::{infix_operator, prefix_operator, Precedence};
use crate::scope::ScopeTracker;
use crate::selector::{groups, selectors};
use mscript_ast::node::*;
use mscript_ast::syntax_kind::{Operator, TokenKind};
use mscript_ast::types::{IdentifierKind, LiteralValue, NodeFlags};
use mscript_core::text::TextPos;
use mscript_diagnostics::{messages, SyntaxError};

type ParseResult = Result<NodeId, SyntaxError>;

/// Remaining stack below which a nesting level runs on a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each heap-allocated stack segment.
const STACK_SEGMENT: usize = 1024 * 1024;

impl<'src> Parser<'src> {
    pub(crate) fn parse_expr(&mut self, flags: ExprFlags) -> ParseResult {
        self.nested(|parser| {
            if selectors::FUNCTION.is(&parser.token) {
                parser.parse_function_declaration()
            } else {
                parser.parse_binary(Precedence::Or, flags)
            }
        })
    }

    /// Run `parse` one nesting level deeper, growing the stack on the heap
    /// when it runs low.
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult) -> ParseResult {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            self.depth += 1;
            let result = if self.depth > MAX_RECURSION_DEPTH {
                self.nesting_limit_reached()
            } else {
                parse(self)
            };
            self.depth -= 1;
            result
        })
    }

    /// Past the limit every enclosing level has to unwind, so the remaining
    /// tokens are consumed and the statement reports nothing further.
    /// Permissive recovery replays them from the line after the statement.
    fn nesting_limit_reached(&mut self) -> ParseResult {
        let limit = MAX_RECURSION_DEPTH.to_string();
        self.raise_at_token(&messages::MAXIMUM_NESTING_DEPTH_0_EXCEEDED, &[limit.as_str()]);
        self.nesting_exceeded = true;

        let invalid = self
            .ast
            .alloc(NodeKind::InvalidCodeExpression, token_data(&self.token));
        while !selectors::END_OF_FILE.is(&self.token) {
            self.next()?;
        }
        Ok(invalid)
    }

    /// Fold every infix operator binding at `min` or tighter. Prefix
    /// operators are only recognized at or below their own level, so
    /// `a ^ -b` is rejected the same way the grammar rejects it.
    fn parse_binary(&mut self, min: Precedence, flags: ExprFlags) -> ParseResult {
        let mark = Mark::of(&self.token);
        let mut base = self.parse_prefix(min, flags)?;
        // `isa` does not chain; after it only looser operators may follow.
        let mut ceiling = Precedence::Postfix;

        while let Some((level, operator)) = self.infix_operator_at(flags) {
            if level < min || level > ceiling {
                break;
            }
            self.next()?;
            self.skip_newlines()?;

            base = match level {
                Precedence::Comparison => self.parse_comparisons(base, operator, mark)?,
                Precedence::Isa => {
                    let right = self.parse_binary(Precedence::BitwiseOr, ExprFlags::NONE)?;
                    ceiling = Precedence::Not;
                    self.node_from(NodeKind::IsaExpression { left: base, right }, mark)
                }
                _ => {
                    // `^` is right-associative.
                    let right = if level == Precedence::Power {
                        self.nested(|parser| parser.parse_binary(Precedence::Power, ExprFlags::NONE))?
                    } else {
                        self.parse_binary(level.next(), ExprFlags::NONE)?
                    };
                    let kind = if level.is_logical() {
                        NodeKind::LogicalExpression {
                            operator,
                            left: base,
                            right,
                        }
                    } else {
                        NodeKind::BinaryExpression {
                            operator,
                            left: base,
                            right,
                        }
                    };
                    self.node_from(kind, mark)
                }
            };
        }
        Ok(base)
    }

    fn infix_operator_at(&self, flags: ExprFlags) -> Option<(Precedence, Operator)> {
        let (level, operator) = infix_operator(&self.token)?;
        // `print -1` passes a negative argument; `print - 1` and `print-1`
        // subtract.
        if operator == Operator::Minus
            && flags.contains(ExprFlags::STATEMENT_START)
            && self.token.after_space()
            && !self.lexer.is_whitespace_at(self.token.span.end)
        {
            return None;
        }
        Some((level, operator))
    }

    /// A single comparison is a binary expression; a chain such as
    /// `a < b < c` becomes one comparison group.
    fn parse_comparisons(&mut self, first: NodeId, operator: Operator, mark: Mark) -> ParseResult {
        let mut expressions = vec![first, self.parse_binary(Precedence::Additive, ExprFlags::NONE)?];
        let mut operators = vec![operator];

        while let Some((Precedence::Comparison, operator)) = infix_operator(&self.token) {
            self.next()?;
            self.skip_newlines()?;
            operators.push(operator);
            expressions.push(self.parse_binary(Precedence::Additive, ExprFlags::NONE)?);
        }

        let kind = if operators.len() == 1 {
            NodeKind::BinaryExpression {
                operator: operators[0],
                left: expressions[0],
                right: expressions[1],
            }
        } else {
            NodeKind::ComparisonGroupExpression {
                operators,
                expressions,
            }
        };
        Ok(self.node_from(kind, mark))
    }

    fn parse_prefix(&mut self, min: Precedence, flags: ExprFlags) -> ParseResult {
        let operator = match prefix_operator(&self.token) {
            Some((level, operator)) if level >= min => operator,
            _ => return self.parse_call_expr(flags),
        };

        let mark = Mark::of(&self.token);
        self.next()?;
        self.skip_newlines()?;

        let argument = match operator {
            Operator::Not => self.nested(|parser| parser.parse_binary(Precedence::Not, ExprFlags::NONE))?,
            Operator::New => self.nested(|parser| parser.parse_binary(Precedence::New, ExprFlags::NONE))?,
            Operator::Minus => {
                let argument = self.parse_binary(Precedence::New, ExprFlags::NONE)?;
                if let NodeKind::Literal(literal) = &mut self.ast.node_mut(argument).kind {
                    if matches!(literal.value, LiteralValue::Number(_) | LiteralValue::Boolean(_)) {
                        literal.negated = true;
                        return Ok(argument);
                    }
                }
                argument
            }
            _ => self.parse_binary(Precedence::Power, ExprFlags::NONE)?,
        };

        Ok(self.node_from(NodeKind::UnaryExpression { operator, argument }, mark))
    }

    // ========================================================================
    // Postfix chain
    // ========================================================================

    fn parse_call_expr(&mut self, flags: ExprFlags) -> ParseResult {
        let mark = Mark::of(&self.token);
        let mut base = self.parse_primary()?;
        // Inside an l-value, whitespace before `(` or `[` ends the chain so
        // that `print (a)` and `print [a]` stay command calls.
        let detached = |token: &mscript_lexer::Token| {
            flags.contains(ExprFlags::AS_LVAL) && token.after_space()
        };

        while !selectors::END_OF_FILE.is(&self.token) {
            if selectors::MEMBER_SEPARATOR.is(&self.token) {
                self.next()?;
                self.skip_newlines()?;
                let identifier = self.parse_identifier(IdentifierKind::Property)?;
                base = self.node_from(NodeKind::MemberExpression { base, identifier }, mark);
            } else if selectors::L_BRACKET.is(&self.token) && !detached(&self.token) {
                base = self.parse_index_or_slice(base, mark)?;
            } else if selectors::L_PARENTHESIS.is(&self.token) && !detached(&self.token) {
                let arguments = self.parse_call_args()?;
                base = self.node_from(NodeKind::CallExpression { base, arguments }, mark);
            } else {
                break;
            }
        }
        Ok(base)
    }

    fn parse_index_or_slice(&mut self, base: NodeId, mark: Mark) -> ParseResult {
        self.next()?;
        self.skip_newlines()?;

        let node = if selectors::SLICE_SEPARATOR.is(&self.token) {
            let left = self.empty_at_previous();
            self.next()?;
            self.skip_newlines()?;
            let right = self.parse_slice_bound()?;
            self.node_through_current(NodeKind::SliceExpression { base, left, right }, mark)
        } else {
            let index = self.parse_expr(ExprFlags::NONE)?;
            if selectors::SLICE_SEPARATOR.is(&self.token) {
                self.next()?;
                self.skip_newlines()?;
                let right = self.parse_slice_bound()?;
                self.node_through_current(
                    NodeKind::SliceExpression {
                        base,
                        left: index,
                        right,
                    },
                    mark,
                )
            } else {
                self.node_through_current(NodeKind::IndexExpression { base, index }, mark)
            }
        };

        self.require_token(selectors::R_BRACKET, Some(mark))?;
        Ok(node)
    }

    fn parse_slice_bound(&mut self) -> ParseResult {
        if selectors::R_BRACKET.is(&self.token) {
            return Ok(self.empty_at_previous());
        }
        self.parse_expr(ExprFlags::NONE)
    }

    fn empty_at_previous(&mut self) -> NodeId {
        self.ast
            .alloc(NodeKind::EmptyExpression, token_data(&self.previous))
    }

    fn parse_call_args(&mut self) -> Result<Vec<NodeId>, SyntaxError> {
        let mut arguments = Vec::new();
        self.next()?;

        if selectors::R_PARENTHESIS.is(&self.token) {
            self.next()?;
            return Ok(arguments);
        }

        while !selectors::END_OF_FILE.is(&self.token) {
            self.skip_newlines()?;
            let mark = Mark::of(&self.token);
            arguments.push(self.parse_expr(ExprFlags::NONE)?);
            self.skip_newlines()?;
            if self.require_token_of_any(groups::CALL_ARGUMENT_END, Some(mark))?
                && selectors::R_PARENTHESIS.is(&self.previous)
            {
                break;
            }
        }
        Ok(arguments)
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    fn parse_primary(&mut self) -> ParseResult {
        if selectors::L_BRACE.is(&self.token) {
            self.parse_map()
        } else if selectors::L_BRACKET.is(&self.token) {
            self.parse_list()
        } else if selectors::L_PARENTHESIS.is(&self.token) {
            self.parse_quantity()
        } else {
            self.parse_atom()
        }
    }

    fn parse_map(&mut self) -> ParseResult {
        let mark = Mark::of(&self.token);
        let mut fields = Vec::new();
        self.next()?;

        if selectors::R_BRACE.is(&self.token) {
            self.next()?;
        } else {
            self.skip_newlines()?;
            while !selectors::END_OF_FILE.is(&self.token) {
                if selectors::R_BRACE.is(&self.token) {
                    self.next()?;
                    break;
                }

                let entry_mark = Mark::of(&self.token);
                let key = self.parse_expr(ExprFlags::NONE)?;
                self.require_token(selectors::SLICE_SEPARATOR, None)?;
                self.skip_newlines()?;
                let value = self.parse_expr(ExprFlags::NONE)?;

                let entry = self.node_from(NodeKind::MapKeyString { key, value }, entry_mark);
                self.adopt_function_owner(entry, value);
                if self.destructures_at(mark.pos) {
                    self.destructure_entry(entry, key, value);
                }
                fields.push(entry);

                if selectors::COMMA.is(&self.token) {
                    self.next()?;
                    self.skip_newlines()?;
                }
                if selectors::R_BRACE.is(&self.token) {
                    self.next()?;
                    break;
                }
            }
        }

        Ok(self.node_from(NodeKind::MapConstructorExpression { fields }, mark))
    }

    fn parse_list(&mut self) -> ParseResult {
        let mark = Mark::of(&self.token);
        let mut fields = Vec::new();
        self.next()?;

        if selectors::R_BRACKET.is(&self.token) {
            self.next()?;
        } else {
            self.skip_newlines()?;
            while !selectors::END_OF_FILE.is(&self.token) {
                if selectors::R_BRACKET.is(&self.token) {
                    self.next()?;
                    break;
                }

                let entry_mark = Mark::of(&self.token);
                let value = self.parse_expr(ExprFlags::NONE)?;

                let entry = self.node_from(NodeKind::ListValue { value }, entry_mark);
                self.adopt_function_owner(entry, value);
                if self.destructures_at(mark.pos) {
                    let position = fields.len();
                    let data = self.ast.data(entry).with_flags(NodeFlags::SYNTHESIZED);
                    let index = self.ast.alloc(
                        NodeKind::Literal(Literal {
                            value: LiteralValue::Number(position as f64),
                            raw: position.to_string(),
                            negated: false,
                        }),
                        data,
                    );
                    self.destructure_entry(entry, index, value);
                }
                fields.push(entry);

                if selectors::COMMA.is(&self.token) {
                    self.next()?;
                    self.skip_newlines()?;
                }
                if selectors::R_BRACKET.is(&self.token) {
                    self.next()?;
                    break;
                }
            }
        }

        Ok(self.node_from(NodeKind::ListConstructorExpression { fields }, mark))
    }

    fn destructures_at(&self, start: TextPos) -> bool {
        self.destructure
            .as_ref()
            .is_some_and(|destructure| destructure.value_start == start)
    }

    /// Queue `variable[index] = value` for the active assignment.
    fn destructure_entry(&mut self, entry: NodeId, index: NodeId, value: NodeId) {
        let Some(variable) = self.destructure.as_ref().map(|d| d.variable) else {
            return;
        };
        let data: NodeData = self.ast.data(entry).with_flags(NodeFlags::SYNTHESIZED);
        let target = self
            .ast
            .alloc(NodeKind::IndexExpression { base: variable, index }, data);
        let assignment = self.ast.alloc(
            NodeKind::AssignmentStatement {
                variable: target,
                init: value,
                operator: None,
            },
            data,
        );
        if let Some(destructure) = self.destructure.as_mut() {
            destructure.assignments.push(assignment);
        }
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    fn parse_quantity(&mut self) -> ParseResult {
        let mark = Mark::of(&self.token);
        self.next()?;
        self.skip_newlines()?;
        let expression = self.parse_expr(ExprFlags::NONE)?;
        self.require_token(selectors::R_PARENTHESIS, Some(mark))?;
        Ok(self.node_from(NodeKind::ParenthesisExpression { expression }, mark))
    }

    fn parse_atom(&mut self) -> ParseResult {
        if self.token.kind.is_literal() {
            return self.parse_literal();
        }
        if self.token.kind == TokenKind::Identifier {
            return self.parse_identifier(IdentifierKind::Variable);
        }

        let got = self.token.to_string();
        self.raise_at_token(&messages::GOT_0_WHERE_NUMBER_STRING_OR_IDENTIFIER_IS_REQUIRED, &[got.as_str()]);
        self.parse_invalid_code()
    }

    fn parse_literal(&mut self) -> ParseResult {
        let token = &self.token;
        let value = token
            .literal
            .clone()
            .unwrap_or_else(|| LiteralValue::String(token.value.clone()));
        let raw = token.raw.clone().unwrap_or_else(|| token.value.clone());
        let literal = self.ast.alloc(
            NodeKind::Literal(Literal {
                value,
                raw,
                negated: false,
            }),
            token_data(token),
        );
        self.literals.push(literal);
        self.next()?;
        Ok(literal)
    }

    pub(crate) fn parse_identifier(&mut self, kind: IdentifierKind) -> ParseResult {
        if self.token.kind != TokenKind::Identifier {
            let got = self.token.to_string();
            self.raise_at_token(
                &messages::GOT_0_WHERE_TYPE_1_IS_REQUIRED,
                &[got.as_str(), TokenKind::Identifier.as_str()],
            );
            return self.parse_invalid_code();
        }

        let name = self.ast.intern(&self.token.value);
        let identifier = self
            .ast
            .alloc(NodeKind::Identifier { name, kind }, token_data(&self.token));
        if kind.binds_name() {
            self.scopes.bind(&mut self.ast, name);
        }
        self.next()?;
        Ok(identifier)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    fn parse_function_declaration(&mut self) -> ParseResult {
        let mark = Mark::of(&self.token);
        self.next()?;

        let function = self.alloc_pending(
            NodeKind::FunctionDeclaration(Box::new(FunctionDeclaration {
                parent: self.scopes.current(),
                ..FunctionDeclaration::default()
            })),
            mark,
        );
        self.scopes.enter(function);

        let mut parameters = Vec::new();
        if !groups::BLOCK_END_OF_LINE.is(&self.token) {
            self.require_token(selectors::L_PARENTHESIS, Some(mark))?;

            while !groups::FUNCTION_PARAMETER_END.is(&self.token) {
                parameters.push(self.parse_parameter(function)?);

                if selectors::R_PARENTHESIS.is(&self.token) {
                    break;
                }
                self.require_token(selectors::COMMA, Some(mark))?;
                if selectors::R_PARENTHESIS.is(&self.token) {
                    let (end, pos) = (self.previous.end, self.previous.span.end);
                    self.raise(
                        &messages::EXPECTED_ARGUMENT_RECEIVED_RIGHT_PARENTHESIS,
                        &[],
                        mscript_core::text::Range::new(end, end),
                        mscript_core::text::TextRange::empty(pos),
                    );
                    break;
                }
            }

            self.require_token(selectors::R_PARENTHESIS, Some(mark))?;
        }

        if let Some(func) = self.ast.function_mut(function) {
            func.parameters = parameters;
        }
        self.open_block(PendingKind::Function { owner: None }, function);
        Ok(function)
    }

    /// A parameter with an optional literal default. Every parameter is
    /// recorded as an assignment in the function's scope.
    fn parse_parameter(&mut self, function: NodeId) -> ParseResult {
        let mark = Mark::of(&self.token);
        let parameter = self.parse_identifier(IdentifierKind::Argument)?;

        if !selectors::ASSIGN.is(&self.token) {
            let data = self.ast.data(parameter).with_flags(NodeFlags::SYNTHESIZED);
            let unknown = self.ast.alloc(NodeKind::Unknown, data);
            let assignment = self.ast.alloc(
                NodeKind::AssignmentStatement {
                    variable: parameter,
                    init: unknown,
                    operator: None,
                },
                data,
            );
            ScopeTracker::add_assignment(&mut self.ast, function, assignment);
            return Ok(parameter);
        }

        self.next()?;
        let default = self.parse_expr(ExprFlags::NONE)?;
        if !self.ast.kind(default).is_literal() {
            self.raise_from(Some(mark), &messages::PARAMETER_DEFAULT_MUST_BE_LITERAL, &[]);
            return Ok(self.node_from(NodeKind::InvalidCodeExpression, mark));
        }

        let assignment = self.node_from(
            NodeKind::AssignmentStatement {
                variable: parameter,
                init: default,
                operator: None,
            },
            mark,
        );
        ScopeTracker::add_assignment(&mut self.ast, function, assignment);
        Ok(assignment)
    }
}
