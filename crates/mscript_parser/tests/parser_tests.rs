//! Parser integration tests.
//!
//! Verifies that the parser builds the expected trees, scopes and indexes
//! from well-formed mscript source.

use mscript_ast::node::{ClauseKind, NodeId, NodeKind};
use mscript_ast::printer::print_tree;
use mscript_ast::syntax_kind::Operator;
use mscript_ast::types::{IdentifierKind, LiteralValue};
use mscript_parser::{parse, ParserOptions, SyntaxTree};

/// Helper: parse strictly and insist on a clean result.
fn parse_ok(source: &str) -> SyntaxTree {
    let tree = parse(source, &ParserOptions::strict())
        .unwrap_or_else(|err| panic!("source: {:?}\nerror: {}", source, err.diagnostic().message_text));
    assert!(!tree.has_errors(), "source: {:?}", source);
    tree
}

/// Helper: top-level statements of the chunk.
fn body(tree: &SyntaxTree) -> Vec<NodeId> {
    tree.chunk().unwrap().body.clone()
}

/// Helper: the value of the single top-level assignment.
fn assigned_value(tree: &SyntaxTree) -> NodeId {
    let statements = body(tree);
    assert_eq!(statements.len(), 1);
    match tree.ast.kind(statements[0]) {
        NodeKind::AssignmentStatement { init, .. } => *init,
        other => panic!("expected assignment, got {}", other.name()),
    }
}

fn kind_name(tree: &SyntaxTree, id: NodeId) -> &'static str {
    tree.ast.kind(id).name()
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_empty_source() {
    let tree = parse_ok("");
    assert!(body(&tree).is_empty());
    let tree = parse_ok("\n\n   \n");
    assert!(body(&tree).is_empty());
}

#[test]
fn test_simple_assignment_print() {
    let tree = parse_ok("x = 1");
    let statements = body(&tree);
    assert_eq!(
        print_tree(&tree.ast, statements[0]),
        "AssignmentStatement[1:1-1:6][Identifier[1:1-1:2][x] = Literal[1:5-1:6][1]]"
    );
}

#[test]
fn test_statement_count() {
    let tree = parse_ok("a = 1\nb = 2\nprint a + b\n");
    let names: Vec<_> = body(&tree).iter().map(|id| kind_name(&tree, *id)).collect();
    assert_eq!(
        names,
        vec!["AssignmentStatement", "AssignmentStatement", "CallStatement"]
    );
}

#[test]
fn test_command_call_arguments() {
    let tree = parse_ok("print a, b, 3");
    let statements = body(&tree);
    let NodeKind::CallStatement { expression } = tree.ast.kind(statements[0]) else {
        panic!("expected call statement");
    };
    let NodeKind::CallExpression { arguments, .. } = tree.ast.kind(*expression) else {
        panic!("expected call expression");
    };
    assert_eq!(arguments.len(), 3);
}

#[test]
fn test_bare_call_statement() {
    let tree = parse_ok("reset");
    let statements = body(&tree);
    let NodeKind::CallStatement { expression } = tree.ast.kind(statements[0]) else {
        panic!("expected call statement");
    };
    assert_eq!(tree.ast.identifier_name(*expression), Some("reset"));
}

#[test]
fn test_spaced_parenthesis_is_command_argument() {
    let tree = parse_ok("print (a)");
    let NodeKind::CallStatement { expression } = tree.ast.kind(body(&tree)[0]) else {
        panic!("expected call statement");
    };
    let NodeKind::CallExpression { arguments, .. } = tree.ast.kind(*expression) else {
        panic!("expected call expression");
    };
    assert_eq!(kind_name(&tree, arguments[0]), "ParenthesisExpression");
}

#[test]
fn test_compound_assignment() {
    let tree = parse_ok("x -= 2");
    let statements = body(&tree);
    let NodeKind::AssignmentStatement {
        variable,
        init,
        operator,
    } = tree.ast.kind(statements[0])
    else {
        panic!("expected assignment");
    };
    assert_eq!(*operator, Some(Operator::SubtractShorthand));
    let NodeKind::BinaryExpression {
        operator,
        left,
        right,
    } = tree.ast.kind(*init)
    else {
        panic!("expected binary expression");
    };
    assert_eq!(*operator, Operator::Minus);
    assert_ne!(left, variable);
    assert_eq!(tree.ast.identifier_name(*left), Some("x"));
    assert_eq!(kind_name(&tree, *right), "ParenthesisExpression");
}

#[test]
fn test_comments() {
    let tree = parse_ok("// leading\nx = 1 // trailing\n");
    let statements = body(&tree);
    assert_eq!(statements.len(), 2);
    assert!(matches!(
        tree.ast.kind(statements[0]),
        NodeKind::Comment { is_statement: true, .. }
    ));
    assert_eq!(kind_name(&tree, statements[1]), "AssignmentStatement");
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_negative_number_literal() {
    let tree = parse_ok("x = -5");
    let value = assigned_value(&tree);
    let NodeKind::Literal(literal) = tree.ast.kind(value) else {
        panic!("expected literal");
    };
    assert!(literal.negated);
    assert_eq!(literal.value, LiteralValue::Number(5.0));
}

#[test]
fn test_negated_identifier_is_unary() {
    let tree = parse_ok("x = -y");
    let value = assigned_value(&tree);
    assert!(matches!(
        tree.ast.kind(value),
        NodeKind::UnaryExpression {
            operator: Operator::Minus,
            ..
        }
    ));
}

#[test]
fn test_minus_after_command_is_argument() {
    let tree = parse_ok("print -1");
    let NodeKind::CallStatement { expression } = tree.ast.kind(body(&tree)[0]) else {
        panic!("expected call statement");
    };
    let NodeKind::CallExpression { arguments, .. } = tree.ast.kind(*expression) else {
        panic!("expected command call");
    };
    assert!(matches!(tree.ast.kind(arguments[0]), NodeKind::Literal(l) if l.negated));

    let tree = parse_ok("a - 1");
    let NodeKind::CallStatement { expression } = tree.ast.kind(body(&tree)[0]) else {
        panic!("expected call statement");
    };
    assert_eq!(kind_name(&tree, *expression), "BinaryExpression");
}

#[test]
fn test_single_comparison_is_binary() {
    let tree = parse_ok("y = a < b");
    let value = assigned_value(&tree);
    assert!(matches!(
        tree.ast.kind(value),
        NodeKind::BinaryExpression {
            operator: Operator::LessThan,
            ..
        }
    ));
}

#[test]
fn test_comparison_chain_is_group() {
    let tree = parse_ok("y = a < b <= c");
    let value = assigned_value(&tree);
    let NodeKind::ComparisonGroupExpression {
        operators,
        expressions,
    } = tree.ast.kind(value)
    else {
        panic!("expected comparison group");
    };
    assert_eq!(operators, &vec![Operator::LessThan, Operator::LessThanOrEqual]);
    assert_eq!(expressions.len(), 3);
}

#[test]
fn test_precedence() {
    let tree = parse_ok("x = 1 + 2 * 3");
    let value = assigned_value(&tree);
    let NodeKind::BinaryExpression {
        operator, right, ..
    } = tree.ast.kind(value)
    else {
        panic!("expected binary expression");
    };
    assert_eq!(*operator, Operator::Plus);
    assert!(matches!(
        tree.ast.kind(*right),
        NodeKind::BinaryExpression {
            operator: Operator::Asterisk,
            ..
        }
    ));
}

/// Helper: operator and operands of a binary expression.
fn binary_parts(tree: &SyntaxTree, id: NodeId) -> (Operator, NodeId, NodeId) {
    match tree.ast.kind(id) {
        NodeKind::BinaryExpression {
            operator,
            left,
            right,
        } => (*operator, *left, *right),
        other => panic!("expected binary expression, got {}", other.name()),
    }
}

#[test]
fn test_power_is_right_associative() {
    let tree = parse_ok("x = 2 ^ 3 ^ 2");
    let (operator, left, right) = binary_parts(&tree, assigned_value(&tree));
    assert_eq!(operator, Operator::Power);
    assert_eq!(kind_name(&tree, left), "NumericLiteral");
    let (operator, left, right) = binary_parts(&tree, right);
    assert_eq!(operator, Operator::Power);
    assert_eq!(kind_name(&tree, left), "NumericLiteral");
    assert_eq!(kind_name(&tree, right), "NumericLiteral");
}

#[test]
fn test_subtraction_is_left_associative() {
    let tree = parse_ok("x = 8 - 4 - 2");
    let (operator, left, right) = binary_parts(&tree, assigned_value(&tree));
    assert_eq!(operator, Operator::Minus);
    assert_eq!(kind_name(&tree, right), "NumericLiteral");
    let (operator, _, _) = binary_parts(&tree, left);
    assert_eq!(operator, Operator::Minus);
}

#[test]
fn test_unary_minus_applies_to_power() {
    let tree = parse_ok("x = -2 ^ 2");
    let NodeKind::UnaryExpression { operator, argument } = tree.ast.kind(assigned_value(&tree)) else {
        panic!("expected unary expression");
    };
    assert_eq!(*operator, Operator::Minus);
    let (operator, _, _) = binary_parts(&tree, *argument);
    assert_eq!(operator, Operator::Power);
}

#[test]
fn test_logical_and_not() {
    let tree = parse_ok("x = not a and b or c");
    let value = assigned_value(&tree);
    let NodeKind::LogicalExpression { operator, left, .. } = tree.ast.kind(value) else {
        panic!("expected logical expression");
    };
    assert_eq!(*operator, Operator::Or);
    let NodeKind::LogicalExpression { operator, left, .. } = tree.ast.kind(*left) else {
        panic!("expected logical expression");
    };
    assert_eq!(*operator, Operator::And);
    assert!(matches!(
        tree.ast.kind(*left),
        NodeKind::UnaryExpression {
            operator: Operator::Not,
            ..
        }
    ));
}

#[test]
fn test_isa_new_and_reference() {
    let tree = parse_ok("x = new Foo isa Foo");
    assert_eq!(kind_name(&tree, assigned_value(&tree)), "IsaExpression");

    let tree = parse_ok("f = @g");
    assert!(matches!(
        tree.ast.kind(assigned_value(&tree)),
        NodeKind::UnaryExpression {
            operator: Operator::Reference,
            ..
        }
    ));
}

#[test]
fn test_member_index_and_call_chain() {
    let tree = parse_ok("x = a.b[1](2, 3)");
    let value = assigned_value(&tree);
    let NodeKind::CallExpression { base, arguments } = tree.ast.kind(value) else {
        panic!("expected call expression");
    };
    assert_eq!(arguments.len(), 2);
    let NodeKind::IndexExpression { base, .. } = tree.ast.kind(*base) else {
        panic!("expected index expression");
    };
    let NodeKind::MemberExpression { identifier, .. } = tree.ast.kind(*base) else {
        panic!("expected member expression");
    };
    assert!(matches!(
        tree.ast.kind(*identifier),
        NodeKind::Identifier {
            kind: IdentifierKind::Property,
            ..
        }
    ));
}

#[test]
fn test_slices() {
    let tree = parse_ok("x = s[1:]");
    let NodeKind::SliceExpression { left, right, .. } = tree.ast.kind(assigned_value(&tree)) else {
        panic!("expected slice");
    };
    assert_eq!(kind_name(&tree, *left), "Literal");
    assert_eq!(kind_name(&tree, *right), "EmptyExpression");

    let tree = parse_ok("x = s[:2]");
    let NodeKind::SliceExpression { left, right, .. } = tree.ast.kind(assigned_value(&tree)) else {
        panic!("expected slice");
    };
    assert_eq!(kind_name(&tree, *left), "EmptyExpression");
    assert_eq!(kind_name(&tree, *right), "Literal");
}

#[test]
fn test_string_literal_unescape() {
    let tree = parse_ok(r#"x = "say ""hi""""#);
    let NodeKind::Literal(literal) = tree.ast.kind(assigned_value(&tree)) else {
        panic!("expected literal");
    };
    assert_eq!(literal.value, LiteralValue::String("say \"hi\"".to_string()));
}

#[test]
fn test_multi_line_call_arguments() {
    let tree = parse_ok("x = f(1,\n  2,\n  3)");
    let NodeKind::CallExpression { arguments, .. } = tree.ast.kind(assigned_value(&tree)) else {
        panic!("expected call expression");
    };
    assert_eq!(arguments.len(), 3);
}

// ============================================================================
// Constructors
// ============================================================================

#[test]
fn test_list_destructuring_assignments() {
    let tree = parse_ok("l = [1, 2]");
    let chunk = tree.chunk().unwrap();
    let assignments = &chunk.scope.assignments;
    assert_eq!(assignments.len(), 3);
    assert!(tree.ast.data(assignments[0]).is_synthesized());
    assert!(tree.ast.data(assignments[1]).is_synthesized());
    assert_eq!(assignments[2], body(&tree)[0]);

    let NodeKind::AssignmentStatement { variable, .. } = tree.ast.kind(assignments[1]) else {
        panic!("expected assignment");
    };
    let NodeKind::IndexExpression { index, .. } = tree.ast.kind(*variable) else {
        panic!("expected index target");
    };
    let NodeKind::Literal(literal) = tree.ast.kind(*index) else {
        panic!("expected literal index");
    };
    assert_eq!(literal.value, LiteralValue::Number(1.0));
    // Synthesized indexes are not source literals.
    assert_eq!(chunk.literals.len(), 2);
}

#[test]
fn test_map_destructuring_assignments() {
    let tree = parse_ok("m = {\"a\": 1, \"b\": 2}");
    let chunk = tree.chunk().unwrap();
    assert_eq!(chunk.scope.assignments.len(), 3);
    let NodeKind::MapConstructorExpression { fields } = tree.ast.kind(assigned_value(&tree)) else {
        panic!("expected map");
    };
    assert_eq!(fields.len(), 2);
}

#[test]
fn test_nested_constructor_is_not_destructured() {
    let tree = parse_ok("x = f([1, 2])");
    assert_eq!(tree.chunk().unwrap().scope.assignments.len(), 1);
}

#[test]
fn test_multi_line_list() {
    let tree = parse_ok("l = [\n  1,\n  2,\n]");
    let NodeKind::ListConstructorExpression { fields } = tree.ast.kind(assigned_value(&tree)) else {
        panic!("expected list");
    };
    assert_eq!(fields.len(), 2);
}

#[test]
fn test_empty_constructors() {
    let tree = parse_ok("l = []\nm = {}");
    let statements = body(&tree);
    assert_eq!(statements.len(), 2);
    assert_eq!(tree.chunk().unwrap().scope.assignments.len(), 2);
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_if_block_clauses() {
    let source = "if a then\n  b = 1\nelse if c then\n  b = 2\nelse\n  b = 3\nend if";
    let tree = parse_ok(source);
    let statements = body(&tree);
    assert_eq!(statements.len(), 1);
    let NodeKind::IfStatement { clauses, shortcut } = tree.ast.kind(statements[0]) else {
        panic!("expected if statement");
    };
    assert!(!shortcut);
    let kinds: Vec<_> = clauses
        .iter()
        .map(|clause| match tree.ast.kind(*clause) {
            NodeKind::Clause { kind, body, .. } => {
                assert_eq!(body.len(), 1);
                *kind
            }
            other => panic!("expected clause, got {}", other.name()),
        })
        .collect();
    assert_eq!(kinds, vec![ClauseKind::If, ClauseKind::ElseIf, ClauseKind::Else]);
    assert!(matches!(
        tree.ast.kind(clauses[1]),
        NodeKind::Clause { condition: Some(_), .. }
    ));
    assert_eq!(tree.ast.data(statements[0]).end.line, 7);
}

#[test]
fn test_if_shortcut() {
    let tree = parse_ok("if a then b = 1 else if c then b = 2 else return");
    let NodeKind::IfStatement { clauses, shortcut } = tree.ast.kind(body(&tree)[0]) else {
        panic!("expected if statement");
    };
    assert!(shortcut);
    let kinds: Vec<_> = clauses
        .iter()
        .filter_map(|clause| match tree.ast.kind(*clause) {
            NodeKind::Clause { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ClauseKind::IfShortcut,
            ClauseKind::ElseIfShortcut,
            ClauseKind::ElseShortcut
        ]
    );
}

#[test]
fn test_while_block_and_shortcut() {
    let tree = parse_ok("while i < 3\n  i += 1\n  if i == 2 then break\nend while\nwhile true continue");
    let statements = body(&tree);
    assert_eq!(statements.len(), 2);
    assert!(matches!(
        tree.ast.kind(statements[0]),
        NodeKind::WhileStatement { shortcut: false, body, .. } if body.len() == 2
    ));
    assert!(matches!(
        tree.ast.kind(statements[1]),
        NodeKind::WhileStatement { shortcut: true, .. }
    ));
}

#[test]
fn test_for_loop_assignments() {
    let tree = parse_ok("for i in range(3)\n  print i\nend for");
    let chunk = tree.chunk().unwrap();
    let assignments = &chunk.scope.assignments;
    assert_eq!(assignments.len(), 2);

    let names: Vec<_> = assignments
        .iter()
        .map(|id| match tree.ast.kind(*id) {
            NodeKind::AssignmentStatement { variable, .. } => {
                tree.ast.identifier_name(*variable).unwrap_or_default()
            }
            _ => "",
        })
        .collect();
    assert_eq!(names, vec!["i", "__i_idx"]);
    assert!(assignments.iter().all(|id| tree.ast.data(*id).is_synthesized()));

    // The hidden counter's zero is not a source literal.
    assert_eq!(chunk.literals.len(), 1);
    assert!(chunk.scope.namespaces.contains(&tree.ast.intern("__i_idx")));

    let NodeKind::ForGenericStatement { body, shortcut, .. } = tree.ast.kind(chunk.body[0]) else {
        panic!("expected for statement");
    };
    assert!(!shortcut);
    assert_eq!(body.len(), 1);
}

#[test]
fn test_nested_blocks_balance() {
    let source = "\
f = function(n)
  for i in range(n)
    while i > 0
      if i % 2 == 0 then
        i -= 1
      else
        continue
      end if
    end while
  end for
  return n
end function
f 3
";
    let tree = parse_ok(source);
    let statements = body(&tree);
    assert_eq!(statements.len(), 2);
    assert!(tree.ast.iter().all(|(_, node)| !node.data.is_pending()));
}

// ============================================================================
// Functions and scopes
// ============================================================================

#[test]
fn test_function_assignment() {
    let source = "f = function(a, b=1)\n  return a + b\nend function\nf 1";
    let tree = parse_ok(source);
    let statements = body(&tree);
    assert_eq!(statements.len(), 2);

    let assignment = statements[0];
    let NodeKind::AssignmentStatement { init, .. } = tree.ast.kind(assignment) else {
        panic!("expected assignment");
    };
    let func = tree.ast.function(*init).unwrap();
    assert_eq!(func.parameters.len(), 2);
    assert_eq!(kind_name(&tree, func.parameters[0]), "Identifier");
    assert_eq!(kind_name(&tree, func.parameters[1]), "AssignmentStatement");
    assert_eq!(func.body.len(), 1);
    assert_eq!(func.assignment, Some(assignment));
    assert_eq!(func.parent, Some(tree.root));
    assert_eq!(func.scope.assignments.len(), 2);
    assert_eq!(func.scope.returns.len(), 1);
    assert_eq!(func.scope.namespaces.len(), 2);

    // The owning assignment spans the whole function.
    assert_eq!(tree.ast.data(assignment).end.line, 3);
    assert!(!tree.ast.data(assignment).is_pending());

    let chunk = tree.chunk().unwrap();
    assert_eq!(chunk.scopes, vec![*init]);
    assert_eq!(chunk.scope.assignments, vec![assignment]);
    assert_eq!(chunk.scope.namespaces.len(), 1);
    assert_eq!(chunk.literals.len(), 2);
}

#[test]
fn test_function_without_parameters() {
    let tree = parse_ok("f = function\nend function");
    let init = assigned_value(&tree);
    assert!(tree.ast.function(init).unwrap().parameters.is_empty());
}

#[test]
fn test_nested_function_parent() {
    let source = "outer = function\n  inner = function\n  end function\nend function";
    let tree = parse_ok(source);
    let chunk = tree.chunk().unwrap();
    assert_eq!(chunk.scopes.len(), 2);
    let outer = chunk.scopes[0];
    let inner = chunk.scopes[1];
    assert_eq!(tree.ast.function(inner).unwrap().parent, Some(outer));
    assert_eq!(tree.ast.function(outer).unwrap().body.len(), 1);
}

#[test]
fn test_returned_function_extends_return() {
    let source = "make = function\n  return function(x)\n    return x\n  end function\nend function";
    let tree = parse_ok(source);
    let chunk = tree.chunk().unwrap();
    assert_eq!(chunk.scopes.len(), 2);

    let outer = tree.ast.function(chunk.scopes[0]).unwrap();
    assert_eq!(outer.body.len(), 1);
    let statement = outer.body[0];
    assert_eq!(kind_name(&tree, statement), "ReturnStatement");
    assert_eq!(tree.ast.data(statement).end.line, 4);
    assert_eq!(outer.scope.returns, vec![statement]);

    let inner = tree.ast.function(chunk.scopes[1]).unwrap();
    assert_eq!(inner.scope.returns.len(), 1);
    assert_eq!(inner.assignment, None);
}

// ============================================================================
// Line registry
// ============================================================================

#[test]
fn test_lines_index_statements() {
    let tree = parse_ok("x = 1\n\ny = 2");
    let chunk = tree.chunk().unwrap();
    let statements = body(&tree);
    assert!(chunk.lines.get(&1).unwrap().contains(&statements[0]));
    assert!(chunk.lines.get(&3).unwrap().contains(&statements[1]));
    assert!(chunk.lines.get(&2).is_none());
}

#[test]
fn test_lines_cover_block_span() {
    let tree = parse_ok("while a\n  b\nend while");
    let chunk = tree.chunk().unwrap();
    let statement = body(&tree)[0];
    for line in 1..=3 {
        assert!(chunk.lines.get(&line).unwrap().contains(&statement), "line {}", line);
    }
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_tab_width_affects_columns() {
    let tree = parse(
        "\tx = 1",
        &ParserOptions::strict().with_tab_width(4),
    )
    .unwrap();
    let statement = body(&tree)[0];
    assert_eq!(tree.ast.data(statement).start.character, 5);
}
