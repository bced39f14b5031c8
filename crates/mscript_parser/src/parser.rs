//! The mscript parser.
//!
//! A line-oriented recursive descent parser. Statements are read one at a
//! time; block statements (`if`, `while`, `for`, `function`) allocate their
//! node up front and stay on a pending stack until their terminator shows
//! up, at which point the node is backpatched in place.
//!
//! Errors found inside a statement are collected rather than thrown. Once
//! the statement ends, strict mode surfaces the first one; permissive mode
//! keeps them all, rewinds the lexer to the start of the statement and
//! skips the rest of its line.

use crate::line_registry::LineRegistry;
use crate::pending_block::{PendingBlock, PendingKind, PendingStack};
use crate::scope::ScopeTracker;
use crate::selector::{groups, selectors, Selector, SelectorGroup};
use bitflags::bitflags;
use mscript_ast::node::*;
use mscript_ast::printer::print_tree;
use mscript_ast::syntax_kind::{Keyword, Operator, TokenKind};
use mscript_ast::types::{IdentifierKind, LiteralValue, NodeFlags};
use mscript_core::text::{Position, Range, TextPos, TextRange};
use mscript_diagnostics::{
    messages, Diagnostic, DiagnosticCollection, DiagnosticMessage, DiagnosticSource,
    ErrorPolicy, SyntaxError,
};
use mscript_lexer::{Lexer, Token};
use mscript_options::ParserOptions;
use tracing::debug;

/// Maximum expression nesting before the parser gives up on a statement.
pub const MAX_RECURSION_DEPTH: u32 = 200;

bitflags! {
    /// Context passed down through expression parsing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ExprFlags: u8 {
        const NONE            = 0;
        /// The expression may be the target of an assignment.
        const AS_LVAL         = 1 << 0;
        /// The expression is the first one of its statement.
        const STATEMENT_START = 1 << 1;
    }
}

/// Where a node starts: the first token it covers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    pub start: Position,
    pub pos: TextPos,
}

impl Mark {
    pub fn of(token: &Token) -> Self {
        Self {
            start: token.start,
            pos: token.span.pos,
        }
    }
}

/// Entries of a list or map literal assigned to `variable` also record
/// hidden `variable[index] = value` assignments.
#[derive(Debug)]
pub(crate) struct Destructure {
    pub variable: NodeId,
    /// Start of the assigned value; only a constructor starting here is
    /// destructured.
    pub value_start: TextPos,
    pub assignments: Vec<NodeId>,
}

/// The result of parsing one script.
#[derive(Debug)]
pub struct SyntaxTree {
    pub ast: Ast,
    pub root: NodeId,
    pub lexer_errors: Vec<Diagnostic>,
    pub parser_errors: Vec<Diagnostic>,
}

impl SyntaxTree {
    pub fn chunk(&self) -> Option<&Chunk> {
        self.ast.chunk(self.root)
    }

    pub fn has_errors(&self) -> bool {
        !self.lexer_errors.is_empty() || !self.parser_errors.is_empty()
    }

    /// Lexer errors followed by parser errors.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lexer_errors.iter().chain(self.parser_errors.iter())
    }

    /// Render the whole tree with the stable textual printer.
    pub fn print(&self) -> String {
        print_tree(&self.ast, self.root)
    }
}

/// Parse `source` into a syntax tree.
pub fn parse(source: &str, options: &ParserOptions) -> Result<SyntaxTree, SyntaxError> {
    Parser::new(source, options).parse_chunk()
}

pub struct Parser<'src> {
    pub(crate) lexer: Lexer<'src>,
    pub(crate) token: Token,
    pub(crate) previous: Token,
    pub(crate) ast: Ast,
    pub(crate) chunk: NodeId,
    policy: ErrorPolicy,
    pub(crate) pending: PendingStack,
    pub(crate) scopes: ScopeTracker,
    pub(crate) lines: LineRegistry,
    pub(crate) literals: Vec<NodeId>,
    statement_errors: Vec<Diagnostic>,
    errors: DiagnosticCollection,
    pub(crate) destructure: Option<Destructure>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    pub(crate) depth: u32,
    /// Set once the current statement hits the nesting limit.
    pub(crate) nesting_exceeded: bool,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: &ParserOptions) -> Self {
        Self::with_lexer(Lexer::new(source, options.lexer_options()))
    }

    /// Parse from a pre-configured lexer. Its policy applies to the parser
    /// as well.
    pub fn with_lexer(lexer: Lexer<'src>) -> Self {
        let mut ast = Ast::new();
        let origin = Position::new(1, 1);
        let chunk = ast.alloc(
            NodeKind::Chunk(Box::default()),
            NodeData::pending(origin, 0),
        );
        Self {
            policy: lexer.policy(),
            lexer,
            token: Token::start_of_input(),
            previous: Token::start_of_input(),
            ast,
            chunk,
            pending: PendingStack::new(chunk),
            scopes: ScopeTracker::new(),
            lines: LineRegistry::new(),
            literals: Vec::new(),
            statement_errors: Vec::new(),
            errors: DiagnosticCollection::new(),
            destructure: None,
            depth: 0,
            nesting_exceeded: false,
        }
    }

    pub fn parse_chunk(mut self) -> Result<SyntaxTree, SyntaxError> {
        self.next()?;
        let data = self.ast.data_mut(self.chunk);
        data.start = self.token.start;
        data.end = self.token.start;
        data.range = TextRange::empty(self.token.span.pos);
        self.scopes.enter(self.chunk);

        while !selectors::END_OF_FILE.is(&self.token) {
            self.skip_newlines()?;
            if selectors::END_OF_FILE.is(&self.token) {
                break;
            }

            self.lexer.record_snapshot();
            self.statement_errors.clear();
            self.nesting_exceeded = false;

            self.parse_statement()?;

            if self.statement_errors.is_empty() {
                self.lexer.clear_snapshot();
            } else {
                self.try_to_recover()?;
            }
        }

        self.finish_remaining_blocks()?;
        self.scopes.exit();

        let Parser {
            mut ast,
            mut lexer,
            token,
            chunk,
            pending,
            mut scopes,
            lines,
            literals,
            errors,
            ..
        } = self;

        pending.into_chunk().complete(&mut ast, &token, false);
        if let Some(root) = ast.chunk_mut(chunk) {
            root.literals = literals;
            root.scopes = scopes.take_scopes();
            root.lines = lines.into_lines();
        }

        Ok(SyntaxTree {
            ast,
            root: chunk,
            lexer_errors: lexer.take_errors(),
            parser_errors: errors.into_diagnostics(),
        })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    pub(crate) fn next(&mut self) -> Result<(), SyntaxError> {
        let token = self.lexer.next()?;
        self.previous = std::mem::replace(&mut self.token, token);
        Ok(())
    }

    /// Consume the current token if it matches `selector`.
    pub(crate) fn require_token(
        &mut self,
        selector: Selector,
        from: Option<Mark>,
    ) -> Result<bool, SyntaxError> {
        if selector.is(&self.token) {
            self.next()?;
            return Ok(true);
        }
        let got = self.token.to_string();
        self.raise_from(from, &messages::GOT_0_WHERE_1_IS_REQUIRED, &[&got, selector.describe()]);
        Ok(false)
    }

    /// Consume the current token if any member of `group` matches it.
    pub(crate) fn require_token_of_any(
        &mut self,
        group: SelectorGroup,
        from: Option<Mark>,
    ) -> Result<bool, SyntaxError> {
        if group.is(&self.token) {
            self.next()?;
            return Ok(true);
        }
        let got = self.token.to_string();
        let expected = group.describe();
        self.raise_from(from, &messages::GOT_0_WHERE_ANY_OF_1_IS_REQUIRED, &[&got, &expected]);
        Ok(false)
    }

    /// Skip end-of-line tokens, turning comments into nodes on the way.
    /// Returns the number of line ends skipped.
    pub(crate) fn skip_newlines(&mut self) -> Result<u32, SyntaxError> {
        let mut lines = 0;
        loop {
            match self.token.kind {
                TokenKind::Comment => {
                    let is_statement = self.previous.line() != self.token.line();
                    let comment = self.ast.alloc(
                        NodeKind::Comment {
                            value: self.token.value.clone(),
                            is_statement,
                        },
                        token_data(&self.token),
                    );
                    self.lines.add_item(&self.ast, comment);
                    if is_statement {
                        self.pending.peek_mut().body.push(comment);
                    }
                }
                TokenKind::EndOfLine => lines += 1,
                _ => return Ok(lines),
            }
            self.next()?;
        }
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    /// Allocate a node spanning from `mark` to the end of the last consumed
    /// token.
    pub(crate) fn node_from(&mut self, kind: NodeKind, mark: Mark) -> NodeId {
        let end = self.previous.end.max(mark.start);
        let range = TextRange::new(mark.pos, self.previous.span.end.max(mark.pos));
        self.ast.alloc(kind, NodeData::new(mark.start, end, range))
    }

    /// Allocate a node spanning from `mark` through the current token.
    pub(crate) fn node_through_current(&mut self, kind: NodeKind, mark: Mark) -> NodeId {
        let end = self.token.end.max(mark.start);
        let range = TextRange::new(mark.pos, self.token.span.end.max(mark.pos));
        self.ast.alloc(kind, NodeData::new(mark.start, end, range))
    }

    pub(crate) fn alloc_pending(&mut self, kind: NodeKind, mark: Mark) -> NodeId {
        self.ast.alloc(kind, NodeData::pending(mark.start, mark.pos))
    }

    /// Placeholder for a token that cannot start an expression. Always
    /// consumes the token.
    pub(crate) fn parse_invalid_code(&mut self) -> Result<NodeId, SyntaxError> {
        let invalid = self
            .ast
            .alloc(NodeKind::InvalidCodeExpression, token_data(&self.token));
        self.next()?;
        Ok(invalid)
    }

    // ========================================================================
    // Error reporting and recovery
    // ========================================================================

    pub(crate) fn raise(
        &mut self,
        message: &DiagnosticMessage,
        args: &[&str],
        range: Range,
        span: TextRange,
    ) {
        if self.nesting_exceeded {
            return;
        }
        let diagnostic =
            Diagnostic::with_location(DiagnosticSource::Parser, range, span, message, args);
        debug!(target: "mscript::parser", at = %range.start, "{}", diagnostic.message_text);
        self.statement_errors.push(diagnostic);
    }

    /// Report an error covering the current token.
    pub(crate) fn raise_at_token(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let (range, span) = (self.token.range(), self.token.span);
        self.raise(message, args, range, span);
    }

    /// Report an error from `from` (or the current token's start) to the end
    /// of the current token.
    pub(crate) fn raise_from(&mut self, from: Option<Mark>, message: &DiagnosticMessage, args: &[&str]) {
        let from = from.unwrap_or_else(|| Mark::of(&self.token));
        let range = Range::new(from.start, self.token.end);
        let span = TextRange::new(from.pos, self.token.span.end);
        self.raise(message, args, range, span);
    }

    fn try_to_recover(&mut self) -> Result<(), SyntaxError> {
        let statement_errors = std::mem::take(&mut self.statement_errors);
        if !self.policy.is_permissive() {
            if let Some(first) = statement_errors.into_iter().next() {
                self.errors.add(first.clone());
                return Err(SyntaxError::Parser(first));
            }
            return Ok(());
        }

        debug!(
            target: "mscript::parser",
            errors = statement_errors.len(),
            line = self.token.line(),
            "recovering from statement errors"
        );
        self.errors.extend_from_slice(&statement_errors);
        self.lexer.recover_from_snapshot();
        self.next()?;
        while !selectors::END_OF_LINE.is(&self.token) && !selectors::END_OF_FILE.is(&self.token) {
            self.next()?;
        }
        Ok(())
    }

    /// Force-close every block still open at end of input, innermost first.
    fn finish_remaining_blocks(&mut self) -> Result<(), SyntaxError> {
        while let Some(block) = self.pending.pop() {
            let data = *self.ast.data(block.node);
            let name = self.ast.kind(block.node).name();
            let diagnostic = Diagnostic::with_location(
                DiagnosticSource::Parser,
                Range::new(data.start, data.start),
                TextRange::empty(data.range.pos),
                &messages::FOUND_OPEN_BLOCK_0,
                &[name],
            );
            debug!(target: "mscript::parser", block = name, at = %data.start, "force closing open block");

            if matches!(block.kind, PendingKind::Function { .. }) {
                self.scopes.exit();
            }
            let end = self.previous.clone();
            self.finish_block(block, &end, true);

            self.errors.add(diagnostic.clone());
            if !self.policy.is_permissive() {
                return Err(SyntaxError::Parser(diagnostic));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    pub(crate) fn open_block(&mut self, kind: PendingKind, node: NodeId) {
        debug!(target: "mscript::parser", block = kind.keyword(), depth = self.pending.depth() + 1, "open block");
        self.pending.push(PendingBlock::new(kind, node));
    }

    /// Complete a popped block and hook it into the tree.
    fn finish_block(&mut self, block: PendingBlock, end: &Token, forced: bool) {
        let keyword = block.kind.keyword();
        let completion = block.complete(&mut self.ast, end, forced);
        debug!(target: "mscript::parser", block = keyword, forced, line = end.line(), "close block");

        match completion.owner {
            Some(owner) => {
                let closed = *self.ast.data(completion.node);
                let data = self.ast.data_mut(owner);
                data.end = data.end.max(closed.end);
                data.range.end = data.range.end.max(closed.range.end);
                data.flags.remove(NodeFlags::PENDING);
                self.lines.add_item(&self.ast, owner);
            }
            None => self.lines.add_item(&self.ast, completion.node),
        }

        if completion.appends_to_parent {
            self.pending.peek_mut().body.push(completion.node);
        }
    }

    /// Close the innermost block if it was opened by `keyword`.
    fn close_block(&mut self, keyword: &'static str) -> Result<(), SyntaxError> {
        if self.pending.peek().kind.keyword() != keyword {
            let (range, span) = (self.previous.range(), self.previous.span);
            self.raise(&messages::NO_MATCHING_OPEN_0_BLOCK, &[keyword], range, span);
            return Ok(());
        }
        if keyword == "function" {
            self.scopes.exit();
        }
        if let Some(block) = self.pending.pop() {
            let end = self.previous.clone();
            self.finish_block(block, &end, false);
        }
        Ok(())
    }

    /// Let the statement or entry whose value is a freshly opened function
    /// be patched when that function closes.
    pub(crate) fn adopt_function_owner(&mut self, owner: NodeId, value: NodeId) {
        let block = self.pending.peek_mut();
        if let PendingKind::Function { owner: slot @ None } = &mut block.kind {
            if block.node == value {
                *slot = Some(owner);
                self.ast.data_mut(owner).flags.insert(NodeFlags::PENDING);
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> Result<(), SyntaxError> {
        if self.token.kind == TokenKind::Keyword && !selectors::NOT.is(&self.token) {
            return self.parse_keyword();
        }

        let target = self.pending.depth();
        let item = self.parse_assignment()?;
        self.add_statement(target, item);
        Ok(())
    }

    /// Append a finished statement to the body that was on top at `target`.
    fn add_statement(&mut self, target: usize, item: NodeId) {
        if !self.ast.data(item).is_pending() {
            self.lines.add_item(&self.ast, item);
        }
        self.pending.body_at_mut(target).push(item);
    }

    fn parse_keyword(&mut self) -> Result<(), SyntaxError> {
        let target = self.pending.depth();
        match Keyword::from_token_value(&self.token.value) {
            Some(Keyword::Return) => {
                self.next()?;
                let item = self.parse_return_statement()?;
                self.add_statement(target, item);
            }
            Some(Keyword::If) => {
                self.next()?;
                self.parse_if_statement()?;
            }
            Some(Keyword::ElseIf) => {
                self.next()?;
                self.next_if_clause(Some(ClauseKind::ElseIf))?;
            }
            Some(Keyword::Else) => {
                self.next()?;
                self.next_if_clause(Some(ClauseKind::Else))?;
            }
            Some(Keyword::EndIf) => {
                self.next()?;
                self.next_if_clause(None)?;
            }
            Some(Keyword::While) => {
                self.next()?;
                self.parse_while_statement()?;
            }
            Some(Keyword::For) => {
                self.next()?;
                self.parse_for_statement()?;
            }
            Some(Keyword::EndFunction) => {
                self.next()?;
                self.close_block("function")?;
            }
            Some(Keyword::EndFor) => {
                self.next()?;
                self.close_block("for")?;
            }
            Some(Keyword::EndWhile) => {
                self.next()?;
                self.close_block("while")?;
            }
            Some(keyword @ (Keyword::Continue | Keyword::Break)) => {
                self.next()?;
                let item = self.parse_jump(keyword);
                self.add_statement(target, item);
            }
            _ => {
                let got = self.token.to_string();
                self.raise_at_token(&messages::UNEXPECTED_KEYWORD_0_AT_START_OF_LINE, &[&got]);
            }
        }
        Ok(())
    }

    /// `break` or `continue`, already consumed.
    fn parse_jump(&mut self, keyword: Keyword) -> NodeId {
        let kind = match keyword {
            Keyword::Break => NodeKind::BreakStatement,
            _ => NodeKind::ContinueStatement,
        };
        self.ast.alloc(kind, token_data(&self.previous))
    }

    /// The single statement allowed after a shortcut `if`, `while` or `for`.
    fn parse_shortcut_statement(&mut self) -> Result<NodeId, SyntaxError> {
        if self.token.kind == TokenKind::Keyword && !selectors::NOT.is(&self.token) {
            return match Keyword::from_token_value(&self.token.value) {
                Some(Keyword::Return) => {
                    self.next()?;
                    self.parse_return_statement()
                }
                Some(keyword @ (Keyword::Continue | Keyword::Break)) => {
                    self.next()?;
                    Ok(self.parse_jump(keyword))
                }
                _ => {
                    let got = self.token.to_string();
                    self.raise_at_token(&messages::UNEXPECTED_KEYWORD_0_IN_SHORTHAND_STATEMENT, &[&got]);
                    self.parse_invalid_code()
                }
            };
        }
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<NodeId, SyntaxError> {
        let scope = self.scopes.current();
        let mark = Mark::of(&self.token);
        let expr = self.parse_expr(ExprFlags::AS_LVAL | ExprFlags::STATEMENT_START)?;

        if groups::END_OF_STATEMENT.is(&self.token) {
            return Ok(self.node_from(NodeKind::CallStatement { expression: expr }, mark));
        }

        if selectors::ASSIGN.is(&self.token) {
            self.next()?;
            return self.parse_assignment_value(expr, mark, scope);
        }

        if groups::ASSIGNMENT_SHORTHAND.is(&self.token) {
            return self.parse_compound_assignment(expr, mark, scope);
        }

        self.parse_command_call(expr, mark)
    }

    fn parse_assignment_value(
        &mut self,
        variable: NodeId,
        mark: Mark,
        scope: Option<NodeId>,
    ) -> Result<NodeId, SyntaxError> {
        let first_function = self.scopes.scopes().len();
        let outer = self.destructure.replace(Destructure {
            variable,
            value_start: self.token.span.pos,
            assignments: Vec::new(),
        });
        let init = self.parse_expr(ExprFlags::NONE);
        let destructure = std::mem::replace(&mut self.destructure, outer);
        let init = init?;

        let assignment = self.node_from(
            NodeKind::AssignmentStatement {
                variable,
                init,
                operator: None,
            },
            mark,
        );

        let functions = self
            .scopes
            .scopes()
            .get(first_function..)
            .unwrap_or_default()
            .to_vec();
        for function in functions {
            if let Some(func) = self.ast.function_mut(function) {
                func.assignment.get_or_insert(assignment);
            }
        }
        self.adopt_function_owner(assignment, init);

        if let Some(scope) = scope {
            let is_constructor = matches!(
                self.ast.kind(init),
                NodeKind::ListConstructorExpression { .. } | NodeKind::MapConstructorExpression { .. }
            );
            if let Some(destructure) = destructure.filter(|_| is_constructor) {
                for entry in destructure.assignments {
                    ScopeTracker::add_assignment(&mut self.ast, scope, entry);
                }
            }
            ScopeTracker::add_assignment(&mut self.ast, scope, assignment);
        }
        Ok(assignment)
    }

    /// `a op= b`, stored as `a = a op (b)` with the left side deep-copied.
    fn parse_compound_assignment(
        &mut self,
        variable: NodeId,
        mark: Mark,
        scope: Option<NodeId>,
    ) -> Result<NodeId, SyntaxError> {
        let operator = Operator::from_str(&self.token.value);
        self.next()?;

        let value_mark = Mark::of(&self.token);
        let right = self.parse_expr(ExprFlags::NONE)?;
        let right_data = *self.ast.data(right);
        let quantity = self
            .ast
            .alloc(NodeKind::ParenthesisExpression { expression: right }, right_data);

        let init = match operator.and_then(Operator::shorthand_base) {
            Some(base) => {
                let left = self.ast.clone_subtree(variable);
                self.node_from(
                    NodeKind::BinaryExpression {
                        operator: base,
                        left,
                        right: quantity,
                    },
                    value_mark,
                )
            }
            None => quantity,
        };

        let assignment = self.node_from(
            NodeKind::AssignmentStatement {
                variable,
                init,
                operator,
            },
            mark,
        );
        self.adopt_function_owner(assignment, right);
        if let Some(scope) = scope {
            ScopeTracker::add_assignment(&mut self.ast, scope, assignment);
        }
        Ok(assignment)
    }

    /// Parenthesis-free call: `print a, b`.
    fn parse_command_call(&mut self, base: NodeId, mark: Mark) -> Result<NodeId, SyntaxError> {
        let mut arguments = Vec::new();

        while !selectors::END_OF_FILE.is(&self.token) {
            arguments.push(self.parse_expr(ExprFlags::NONE)?);

            if groups::END_OF_STATEMENT.is(&self.token) {
                break;
            }
            if selectors::COMMA.is(&self.token) {
                self.next()?;
                self.skip_newlines()?;
                continue;
            }
            if self.require_token_of_any(groups::COMMAND_ARGUMENT_END, Some(mark))?
                && matches!(self.previous.kind, TokenKind::EndOfLine | TokenKind::EndOfFile)
            {
                break;
            }
        }

        if arguments.is_empty() {
            return Ok(self.node_from(NodeKind::CallStatement { expression: base }, mark));
        }
        let call = self.node_from(NodeKind::CallExpression { base, arguments }, mark);
        Ok(self.node_from(NodeKind::CallStatement { expression: call }, mark))
    }

    fn parse_return_statement(&mut self) -> Result<NodeId, SyntaxError> {
        let scope = self.scopes.current();
        let mark = Mark::of(&self.previous);

        let argument = if groups::RETURN_STATEMENT_END.is(&self.token) {
            None
        } else {
            Some(self.parse_expr(ExprFlags::NONE)?)
        };

        let statement = self.node_from(NodeKind::ReturnStatement { argument }, mark);
        if let Some(argument) = argument {
            self.adopt_function_owner(statement, argument);
        }
        if let Some(scope) = scope {
            ScopeTracker::add_return(&mut self.ast, scope, statement);
        }
        Ok(statement)
    }

    // ========================================================================
    // If
    // ========================================================================

    fn parse_if_statement(&mut self) -> Result<(), SyntaxError> {
        let mark = Mark::of(&self.previous);
        let target = self.pending.depth();
        let condition = self.parse_expr(ExprFlags::NONE)?;

        self.lines.add_item(&self.ast, condition);
        self.require_token(selectors::THEN, Some(mark))?;

        if !groups::BLOCK_END_OF_LINE.is(&self.token) {
            return self.parse_if_shortcut_statement(condition, mark, target);
        }

        let clause = self.alloc_pending(
            NodeKind::Clause {
                kind: ClauseKind::If,
                condition: Some(condition),
                body: Vec::new(),
            },
            mark,
        );
        let statement = self.alloc_pending(
            NodeKind::IfStatement {
                clauses: Vec::new(),
                shortcut: false,
            },
            mark,
        );
        self.open_block(PendingKind::If { current_clause: clause }, statement);
        Ok(())
    }

    /// `else if`, `else` or (with `None`) `end if` inside an open if block.
    fn next_if_clause(&mut self, kind: Option<ClauseKind>) -> Result<(), SyntaxError> {
        let Some(kind) = kind else {
            return self.close_block("if");
        };

        if !matches!(self.pending.peek().kind, PendingKind::If { .. }) {
            let (range, span) = (self.previous.range(), self.previous.span);
            self.raise(&messages::NO_MATCHING_OPEN_0_BLOCK, &["if"], range, span);
            return Ok(());
        }

        let mark = Mark::of(&self.previous);
        let clause = self.alloc_pending(
            NodeKind::Clause {
                kind,
                condition: None,
                body: Vec::new(),
            },
            mark,
        );
        self.pending
            .peek_mut()
            .next_clause(&mut self.ast, &self.previous, Some(clause));

        if kind == ClauseKind::ElseIf {
            let condition = self.parse_expr(ExprFlags::NONE)?;
            if let NodeKind::Clause { condition: slot, .. } = &mut self.ast.node_mut(clause).kind {
                *slot = Some(condition);
            }
            self.require_token(selectors::THEN, Some(mark))?;
        }
        Ok(())
    }

    fn parse_if_shortcut_statement(
        &mut self,
        condition: NodeId,
        mark: Mark,
        target: usize,
    ) -> Result<(), SyntaxError> {
        let mut clauses = vec![self.parse_shortcut_clause(ClauseKind::IfShortcut, Some(condition), mark)?];

        while selectors::ELSE_IF.is(&self.token) {
            let clause_mark = Mark::of(&self.token);
            self.next()?;
            let condition = self.parse_expr(ExprFlags::NONE)?;
            self.require_token(selectors::THEN, Some(clause_mark))?;
            clauses.push(self.parse_shortcut_clause(
                ClauseKind::ElseIfShortcut,
                Some(condition),
                clause_mark,
            )?);
        }

        if selectors::ELSE.is(&self.token) {
            let clause_mark = Mark::of(&self.token);
            self.next()?;
            clauses.push(self.parse_shortcut_clause(ClauseKind::ElseShortcut, None, clause_mark)?);
        }

        let statement = self.node_from(
            NodeKind::IfStatement {
                clauses,
                shortcut: true,
            },
            mark,
        );
        self.add_statement(target, statement);
        Ok(())
    }

    fn parse_shortcut_clause(
        &mut self,
        kind: ClauseKind,
        condition: Option<NodeId>,
        mark: Mark,
    ) -> Result<NodeId, SyntaxError> {
        let item = self.parse_shortcut_statement()?;
        Ok(self.node_from(
            NodeKind::Clause {
                kind,
                condition,
                body: vec![item],
            },
            mark,
        ))
    }

    // ========================================================================
    // Loops
    // ========================================================================

    fn parse_while_statement(&mut self) -> Result<(), SyntaxError> {
        let mark = Mark::of(&self.previous);
        let target = self.pending.depth();
        let condition = self.parse_expr(ExprFlags::NONE)?;

        if !groups::BLOCK_END_OF_LINE.is(&self.token) {
            let item = self.parse_shortcut_statement()?;
            let statement = self.node_from(
                NodeKind::WhileStatement {
                    condition,
                    body: vec![item],
                    shortcut: true,
                },
                mark,
            );
            self.add_statement(target, statement);
            return Ok(());
        }

        let statement = self.alloc_pending(
            NodeKind::WhileStatement {
                condition,
                body: Vec::new(),
                shortcut: false,
            },
            mark,
        );
        self.open_block(PendingKind::While, statement);
        Ok(())
    }

    fn parse_for_statement(&mut self) -> Result<(), SyntaxError> {
        let mark = Mark::of(&self.previous);
        let target = self.pending.depth();
        let scope = self.scopes.current();

        let variable = self.parse_identifier(IdentifierKind::ForInVariable)?;
        if let Some(name) = self.ast.identifier_name(variable) {
            let index_name = format!("__{}_idx", name);
            self.synthesize_loop_assignments(scope, variable, &index_name);
        }

        self.require_token(selectors::IN, Some(mark))?;
        let iterator = self.parse_expr(ExprFlags::NONE)?;

        if !groups::BLOCK_END_OF_LINE.is(&self.token) {
            let item = self.parse_shortcut_statement()?;
            let statement = self.node_from(
                NodeKind::ForGenericStatement {
                    variable,
                    iterator,
                    body: vec![item],
                    shortcut: true,
                },
                mark,
            );
            self.add_statement(target, statement);
            return Ok(());
        }

        let statement = self.alloc_pending(
            NodeKind::ForGenericStatement {
                variable,
                iterator,
                body: Vec::new(),
                shortcut: false,
            },
            mark,
        );
        self.open_block(PendingKind::For, statement);
        Ok(())
    }

    /// Record `<var> = unknown` and `__<var>_idx = 0` for a for loop.
    fn synthesize_loop_assignments(&mut self, scope: Option<NodeId>, variable: NodeId, index_name: &str) {
        let data = self.ast.data(variable).with_flags(NodeFlags::SYNTHESIZED);

        let unknown = self.ast.alloc(NodeKind::Unknown, data);
        let variable_assignment = self.ast.alloc(
            NodeKind::AssignmentStatement {
                variable,
                init: unknown,
                operator: None,
            },
            data,
        );

        let name = self.ast.intern(index_name);
        let index = self.ast.alloc(
            NodeKind::Identifier {
                name,
                kind: IdentifierKind::ForInIdxVariable,
            },
            data,
        );
        self.scopes.bind(&mut self.ast, name);
        let zero = self.ast.alloc(
            NodeKind::Literal(Literal {
                value: LiteralValue::Number(0.0),
                raw: "0".to_string(),
                negated: false,
            }),
            data,
        );
        let index_assignment = self.ast.alloc(
            NodeKind::AssignmentStatement {
                variable: index,
                init: zero,
                operator: None,
            },
            data,
        );

        if let Some(scope) = scope {
            ScopeTracker::add_assignment(&mut self.ast, scope, variable_assignment);
            ScopeTracker::add_assignment(&mut self.ast, scope, index_assignment);
        }
    }
}

/// Node data covering exactly `token`.
pub(crate) fn token_data(token: &Token) -> NodeData {
    NodeData::new(token.start, token.end, token.span)
}
