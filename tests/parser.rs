//! Integration tests for ziust-parser crate.

use ziust_parser::parse;
use ziust_syntax::{MAX_NESTING, Node, NodeKind, SyntaxTree};

fn parse_clean(source: &str) -> SyntaxTree {
    let tree = parse(source);
    assert!(
        tree.diagnostics().is_empty(),
        "{source}: {:?}",
        tree.diagnostics()
    );
    tree
}

fn sexp(source: &str) -> String {
    parse_clean(source).to_sexp()
}

fn first(tree: &SyntaxTree, kind: NodeKind) -> &Node {
    tree.root()
        .descendants()
        .find(|n| n.kind == kind)
        .unwrap_or_else(|| panic!("no {kind} in {}", tree.to_sexp()))
}

fn count(tree: &SyntaxTree, kind: NodeKind) -> usize {
    tree.root().descendants().filter(|n| n.kind == kind).count()
}

fn field_text<'a>(tree: &'a SyntaxTree, node: &Node, field: &str) -> &'a str {
    node.child_by_field(field)
        .unwrap_or_else(|| panic!("no field {field} on {}", node.kind))
        .text(tree.source())
}

fn top_level(tree: &SyntaxTree) -> Vec<NodeKind> {
    tree.root().node_children().map(|n| n.kind).collect()
}

// ============================================================================
// Acceptance Scenarios
// ============================================================================

#[test]
fn test_struct_declaration() {
    let source = "struct Point { x: i32, y: i32, }";
    assert_eq!(
        sexp(source),
        "(module (struct_declaration name: (identifier) \
         member: (struct_member_declaration name: (identifier) type: (named_type path: (path (identifier)))) \
         member: (struct_member_declaration name: (identifier) type: (named_type path: (path (identifier))))))"
    );

    let tree = parse_clean(source);
    let decl = first(&tree, NodeKind::StructDeclaration);
    assert_eq!(field_text(&tree, decl, "name"), "Point");
    let members: Vec<_> = decl
        .children_by_field("member")
        .filter_map(|m| m.as_node())
        .map(|m| (field_text(&tree, m, "name"), field_text(&tree, m, "type")))
        .collect();
    assert_eq!(members, vec![("x", "i32"), ("y", "i32")]);
}

#[test]
fn test_if_let_expression() {
    let source = "if let Some(x) = y { x } else { 0 }";
    assert_eq!(
        sexp(source),
        "(module (if_statement (if_expression \
         condition: (if_condition_let pattern: (enum_pattern path: (path (identifier)) argument: (identifier_pattern name: (identifier))) value: (path (identifier))) \
         consequence: (block_expression value: (path (identifier))) \
         alternative: (block_expression value: (number)))))"
    );

    let tree = parse_clean(source);
    let condition = first(&tree, NodeKind::IfConditionLet);
    assert_eq!(field_text(&tree, condition, "pattern"), "Some(x)");
    assert_eq!(field_text(&tree, condition, "value"), "y");
}

#[test]
fn test_return_operand_takes_cast() {
    assert_eq!(
        sexp("return 1 as i64;"),
        "(module (expression_statement expression: (return_expression \
         value: (as_expression value: (number) type: (named_type path: (path (identifier)))))))"
    );
}

#[test]
fn test_labeled_loop_and_break() {
    let source = "loop 'outer: { break 'outer 5; }";
    assert_eq!(
        sexp(source),
        "(module (loop_statement (loop_expression label: (label) body: (block_expression \
         (expression_statement expression: (break_expression label: (label) value: (number)))))))"
    );

    let tree = parse_clean(source);
    let looped = first(&tree, NodeKind::LoopExpression);
    assert_eq!(field_text(&tree, looped, "label"), "'outer");
    let brk = first(&tree, NodeKind::BreakExpression);
    assert_eq!(field_text(&tree, brk, "label"), "'outer");
    assert_eq!(field_text(&tree, brk, "value"), "5");
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_forward_struct() {
    assert_eq!(
        sexp("pub struct Opaque;"),
        "(module (struct_declaration visibility: \"pub\" name: (identifier)))"
    );
}

#[test]
fn test_template_and_generic_parameters() {
    let tree = parse_clean(
        "struct Pair[T: Eq + Hash | Ord, U = i32]<V: (Clone, Send), W: Show> { a: T, b: U }",
    );
    let templates = first(&tree, NodeKind::TemplateParameters);
    assert_eq!(templates.children_by_field("parameter").count(), 2);

    let bound = first(&tree, NodeKind::TemplateBound);
    let clauses: Vec<_> = bound
        .children_by_field("clause")
        .filter_map(|c| c.as_node())
        .collect();
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0].children_by_field("term").count(), 2);
    assert_eq!(clauses[1].children_by_field("term").count(), 1);

    let defaulted = templates
        .children_by_field("parameter")
        .filter_map(|p| p.as_node())
        .nth(1)
        .unwrap();
    assert_eq!(field_text(&tree, defaulted, "default"), "i32");

    let generics = first(&tree, NodeKind::GenericParameters);
    assert_eq!(generics.children_by_field("parameter").count(), 2);
    let bounds: Vec<_> = tree
        .root()
        .descendants()
        .filter(|n| n.kind == NodeKind::GenericBound)
        .map(|b| b.children_by_field("term").count())
        .collect();
    assert_eq!(bounds, vec![2, 1]);
}

#[test]
fn test_enum_declaration() {
    let tree = parse_clean("pub enum Shape(u8) { Circle(f32), Rect(f32, f32) = 2, Empty }");
    let decl = first(&tree, NodeKind::EnumDeclaration);
    assert_eq!(field_text(&tree, decl, "tag_type"), "u8");
    let members: Vec<_> = decl
        .children_by_field("member")
        .filter_map(|m| m.as_node())
        .collect();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0].children_by_field("payload").count(), 1);
    assert_eq!(members[1].children_by_field("payload").count(), 2);
    assert_eq!(field_text(&tree, members[1], "value"), "2");
    assert!(members[2].child_by_field("payload").is_none());
}

#[test]
fn test_type_alias_with_every_type_form() {
    let tree = parse_clean("type A = (i32, &!mut u8, *?const Node, [*]const u8, [4]mut i32, !);");
    let tuple = first(&tree, NodeKind::TupleType);
    let kinds: Vec<_> = tuple
        .children_by_field("element")
        .filter_map(|e| e.as_node())
        .map(|e| e.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::NamedType,
            NodeKind::ReferenceType,
            NodeKind::PointerType,
            NodeKind::ArrayType,
            NodeKind::ArrayType,
            NodeKind::NeverType,
        ]
    );
    let reference = first(&tree, NodeKind::ReferenceType);
    assert_eq!(field_text(&tree, reference, "modifier"), "!");
    assert_eq!(field_text(&tree, reference, "mutability"), "mut");
    let pointer = first(&tree, NodeKind::PointerType);
    assert_eq!(field_text(&tree, pointer, "modifier"), "?");
    let array = first(&tree, NodeKind::ArrayType);
    assert_eq!(field_text(&tree, array, "size"), "*");
}

#[test]
fn test_template_and_generic_arguments() {
    let tree = parse_clean("type M = std.Map[K, V]<Alloc>;");
    let named = first(&tree, NodeKind::NamedType);
    assert_eq!(field_text(&tree, named, "path"), "std.Map");
    assert_eq!(
        named
            .node_by_field("template_arguments")
            .unwrap()
            .children_by_field("argument")
            .count(),
        2
    );
    assert!(named.node_by_field("generic_arguments").is_some());
}

#[test]
fn test_trait_and_impl() {
    let tree = parse_clean(
        "trait Show { const N: u32; fn show(self: &const Self) -> string; }\n\
         impl[T] Show for List[T] {\n\
             const N: u32 = 1;\n\
             pub fn show(self: &const Self) -> string { return \"list\"; }\n\
         }",
    );
    assert_eq!(
        top_level(&tree),
        vec![NodeKind::TraitDeclaration, NodeKind::ImplDeclaration]
    );

    let members: Vec<_> = first(&tree, NodeKind::TraitDeclaration)
        .children_by_field("member")
        .filter_map(|m| m.as_node())
        .map(|m| m.kind)
        .collect();
    assert_eq!(
        members,
        vec![NodeKind::ConstantSignature, NodeKind::FunctionSignature]
    );

    let imp = first(&tree, NodeKind::ImplDeclaration);
    assert!(imp.node_by_field("template_parameters").is_some());
    assert_eq!(field_text(&tree, imp, "trait"), "Show");
    assert_eq!(field_text(&tree, imp, "type"), "List[T]");
    assert_eq!(imp.children_by_field("member").count(), 2);
}

#[test]
fn test_impl_without_trait() {
    let tree = parse_clean("impl Point { fn norm(p: Point) -> f64 { p.x } }");
    let imp = first(&tree, NodeKind::ImplDeclaration);
    assert!(imp.child_by_field("trait").is_none());
    assert_eq!(field_text(&tree, imp, "type"), "Point");
}

#[test]
fn test_function_declaration() {
    let tree = parse_clean("pub fn add(a: i32, b: i32) -> i32 { a }");
    let func = first(&tree, NodeKind::FunctionDeclaration);
    assert_eq!(field_text(&tree, func, "visibility"), "pub");
    assert_eq!(field_text(&tree, func, "name"), "add");
    assert_eq!(field_text(&tree, func, "return_type"), "i32");
    let params = func.node_by_field("parameters").unwrap();
    assert_eq!(params.children_by_field("parameter").count(), 2);
    let body = func.node_by_field("body").unwrap();
    assert_eq!(body.kind, NodeKind::BlockExpression);
    assert_eq!(field_text(&tree, body, "value"), "a");
}

#[test]
fn test_const_and_let() {
    let tree = parse_clean("const N: u32 = 4;\nlet x: i32 = N;\nlet y;");
    assert_eq!(
        top_level(&tree),
        vec![
            NodeKind::ConstDeclaration,
            NodeKind::LetDeclaration,
            NodeKind::LetDeclaration,
        ]
    );
    let lets: Vec<_> = tree
        .root()
        .node_children()
        .filter(|n| n.kind == NodeKind::LetDeclaration)
        .collect();
    assert_eq!(field_text(&tree, lets[0], "type"), "i32");
    assert!(lets[1].child_by_field("value").is_none());
}

#[test]
fn test_let_else() {
    let tree = parse_clean("let Some(x) = y else { return; };");
    assert_eq!(top_level(&tree), vec![NodeKind::LetElseDeclaration]);
    let decl = first(&tree, NodeKind::LetElseDeclaration);
    assert_eq!(field_text(&tree, decl, "pattern"), "Some(x)");
    assert_eq!(field_text(&tree, decl, "value"), "y");
    assert_eq!(field_text(&tree, decl, "alternative"), "{ return; }");
}

#[test]
fn test_let_else_without_semicolon() {
    let tree = parse_clean("let Some(x) = y else { return; }\nlet z = 1;");
    assert_eq!(
        top_level(&tree),
        vec![NodeKind::LetElseDeclaration, NodeKind::LetDeclaration]
    );
}

#[test]
fn test_attributes() {
    let tree = parse_clean("![inline, derive(Debug, \")\")] pub fn f() {}");
    let stmt = first(&tree, NodeKind::AttributeStatement);
    let attr = stmt.node_by_field("attribute").unwrap();
    let members: Vec<_> = attr
        .children_by_field("member")
        .filter_map(|m| m.as_node())
        .collect();
    assert_eq!(members.len(), 2);
    assert!(members[0].child_by_field("arguments").is_none());
    assert_eq!(field_text(&tree, members[1], "arguments"), "(Debug, \")\")");
    assert_eq!(
        stmt.node_by_field("statement").unwrap().kind,
        NodeKind::FunctionDeclaration
    );
}

#[test]
fn test_stacked_attributes() {
    let tree = parse_clean("![a] ![b] struct S;");
    assert_eq!(count(&tree, NodeKind::AttributeStatement), 2);
    assert_eq!(count(&tree, NodeKind::StructDeclaration), 1);
}

#[test]
fn test_test_statement() {
    let tree = parse_clean("test \"math\" { check(add(1, 2)); }");
    let test = first(&tree, NodeKind::TestStatement);
    assert_eq!(field_text(&tree, test, "name"), "\"math\"");
    assert_eq!(test.node_by_field("body").unwrap().kind, NodeKind::BlockExpression);
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_statements_in_block() {
    let tree = parse_clean(
        "fn main() {\n\
             for 'rows: row in rows { continue 'rows; }\n\
             while let Some(x) = it.next() { defer { close(x); } }\n\
             match v { Some(x) if x => 1, None => 0, _ => 2 }\n\
             x.y = 5;\n\
             ;\n\
             errdefer 'outer cleanup();\n\
         }",
    );
    let body = first(&tree, NodeKind::BlockExpression);
    let kinds: Vec<_> = body.node_children().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ForStatement,
            NodeKind::WhileStatement,
            NodeKind::MatchStatement,
            NodeKind::AssignmentStatement,
            NodeKind::NullStatement,
            NodeKind::ErrdeferStatement,
        ]
    );

    let for_stmt = first(&tree, NodeKind::ForStatement);
    assert_eq!(field_text(&tree, for_stmt, "label"), "'rows");
    assert_eq!(field_text(&tree, for_stmt, "pattern"), "row");
    assert_eq!(field_text(&tree, for_stmt, "iterable"), "rows");

    let while_stmt = first(&tree, NodeKind::WhileStatement);
    assert_eq!(
        while_stmt.node_by_field("condition").unwrap().kind,
        NodeKind::IfConditionLet
    );
    assert_eq!(count(&tree, NodeKind::DeferStatement), 1);

    let arms: Vec<_> = first(&tree, NodeKind::MatchExpression)
        .children_by_field("arm")
        .filter_map(|a| a.as_node())
        .collect();
    assert_eq!(arms.len(), 3);
    assert_eq!(field_text(&tree, arms[0], "guard"), "x");
    assert!(arms[1].child_by_field("guard").is_none());

    let assign = first(&tree, NodeKind::AssignmentStatement);
    assert_eq!(field_text(&tree, assign, "left"), "x.y");
    assert_eq!(field_text(&tree, assign, "right"), "5");

    let errdefer = first(&tree, NodeKind::ErrdeferStatement);
    assert_eq!(field_text(&tree, errdefer, "label"), "'outer");
    assert_eq!(
        errdefer.node_by_field("statement").unwrap().kind,
        NodeKind::ExpressionStatement
    );
}

#[test]
fn test_statement_position_prefers_statement() {
    let tree = parse_clean("fn f() { if a { 1 } else { 2 } }");
    let body = first(&tree, NodeKind::FunctionDeclaration)
        .node_by_field("body")
        .unwrap();
    assert!(body.child_by_field("value").is_none());
    assert_eq!(
        body.node_children().map(|n| n.kind).collect::<Vec<_>>(),
        vec![NodeKind::IfStatement]
    );
}

#[test]
fn test_expression_position_keeps_expression() {
    let tree = parse_clean("let x = if a { 1 } else if b { 2 } else { 3 };");
    let decl = first(&tree, NodeKind::LetDeclaration);
    let value = decl.node_by_field("value").unwrap();
    assert_eq!(value.kind, NodeKind::IfExpression);
    let alternative = value.node_by_field("alternative").unwrap();
    assert_eq!(alternative.kind, NodeKind::IfExpression);
    assert_eq!(
        alternative.node_by_field("alternative").unwrap().kind,
        NodeKind::BlockExpression
    );
    assert_eq!(count(&tree, NodeKind::IfStatement), 0);
}

#[test]
fn test_labeled_block_value() {
    let tree = parse_clean("let r = 'blk: { break 'blk 1; };");
    let block = first(&tree, NodeKind::BlockExpression);
    assert_eq!(field_text(&tree, block, "label"), "'blk");
}

#[test]
fn test_return_without_operand() {
    let tree = parse_clean("fn f() { return; }");
    let ret = first(&tree, NodeKind::ReturnExpression);
    assert!(ret.child_by_field("value").is_none());
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_path_continuation_and_member_chain() {
    let tree = parse_clean("a.b.c(1).d[0].*;");
    let outer = first(&tree, NodeKind::MemberExpression);
    assert_eq!(field_text(&tree, outer, "operator"), ".*");

    let mut node = outer;
    let mut depth = 0;
    while let Some(object) = node.node_by_field("object") {
        node = object;
        depth += 1;
    }
    assert_eq!(depth, 4);
    assert_eq!(node.kind, NodeKind::Path);
    assert_eq!(node.text(tree.source()), "a.b.c");
}

#[test]
fn test_turbofish_ends_path() {
    let tree = parse_clean("let n = s.parse::<i32>();");
    assert_eq!(first(&tree, NodeKind::Path).text(tree.source()), "s");
    let field = tree
        .root()
        .descendants()
        .find(|n| n.kind == NodeKind::MemberExpression && n.child_by_field("field").is_some())
        .unwrap();
    assert_eq!(field_text(&tree, field, "field"), "parse");
    assert!(field.node_by_field("generic_arguments").is_some());
}

#[test]
fn test_tuple_index_and_address_of() {
    let tree = parse_clean("let z = f().0.&;");
    let members: Vec<_> = tree
        .root()
        .descendants()
        .filter(|n| n.kind == NodeKind::MemberExpression)
        .collect();
    assert_eq!(members.len(), 3);
    assert_eq!(field_text(&tree, members[0], "operator"), ".&");
    assert_eq!(field_text(&tree, members[1], "tuple_index"), "0");
}

#[test]
fn test_dotted_numbers_stay_in_path() {
    let tree = parse_clean("let z = t.0.1;");
    assert_eq!(first(&tree, NodeKind::Path).text(tree.source()), "t.0.1");
    assert_eq!(count(&tree, NodeKind::MemberExpression), 0);
}

#[test]
fn test_logical_precedence() {
    let tree = parse_clean("let v = a || b && c;");
    let or = first(&tree, NodeKind::OrExpression);
    assert_eq!(field_text(&tree, or, "left"), "a");
    assert_eq!(or.node_by_field("right").unwrap().kind, NodeKind::AndExpression);

    let tree = parse_clean("let v = a && b || c;");
    let or = first(&tree, NodeKind::OrExpression);
    assert_eq!(or.node_by_field("left").unwrap().kind, NodeKind::AndExpression);
    assert_eq!(field_text(&tree, or, "right"), "c");
}

#[test]
fn test_operators_are_left_associative() {
    let tree = parse_clean("let v = a || b || c;");
    let or = first(&tree, NodeKind::OrExpression);
    assert_eq!(field_text(&tree, or, "left"), "a || b");

    let tree = parse_clean("let v = x as u8 as u32;");
    let cast = first(&tree, NodeKind::AsExpression);
    assert_eq!(field_text(&tree, cast, "value"), "x as u8");
    assert_eq!(field_text(&tree, cast, "type"), "u32");
}

#[test]
fn test_cast_binds_tighter_than_logic() {
    let tree = parse_clean("let v = a as bool && b;");
    let and = first(&tree, NodeKind::AndExpression);
    assert_eq!(and.node_by_field("left").unwrap().kind, NodeKind::AsExpression);
}

#[test]
fn test_break_operand_is_greedy() {
    let tree = parse_clean("loop { break x || y; }");
    let brk = first(&tree, NodeKind::BreakExpression);
    assert_eq!(brk.node_by_field("value").unwrap().kind, NodeKind::OrExpression);
}

#[test]
fn test_parenthesized_expression() {
    let tree = parse_clean("let v = (a || b) && c;");
    let and = first(&tree, NodeKind::AndExpression);
    let left = and.node_by_field("left").unwrap();
    assert_eq!(left.kind, NodeKind::ParenthesizedExpression);
    assert_eq!(field_text(&tree, left, "expression"), "a || b");
}

#[test]
fn test_builtin_and_macro_calls() {
    let tree = parse_clean("let n = @sizeOf(T);\nprint!(\"{} {\", x);\nlet v = vec![1, 2];\nm!<T>;");
    let builtin = first(&tree, NodeKind::BuiltinCall);
    assert_eq!(field_text(&tree, builtin, "name"), "sizeOf");

    let bodies: Vec<_> = tree
        .root()
        .descendants()
        .filter(|n| n.kind == NodeKind::MacroCall)
        .map(|m| field_text(&tree, m, "body"))
        .collect();
    assert_eq!(bodies, vec!["(\"{} {\", x)", "[1, 2]", "<T>"]);
}

#[test]
fn test_nested_macro_groups() {
    let tree = parse_clean("m!((a (b)) [c]);");
    let body = first(&tree, NodeKind::MacroCall).node_by_field("body").unwrap();
    assert_eq!(body.kind, NodeKind::Group);
    assert_eq!(
        body.descendants().filter(|n| n.kind == NodeKind::Group).count(),
        3
    );
}

#[test]
fn test_struct_literal() {
    let tree = parse_clean("let p = #Point::<T>{ x: 1, y, ..base };");
    let literal = first(&tree, NodeKind::StructLiteral);
    assert_eq!(field_text(&tree, literal, "type"), "Point");
    assert!(literal.node_by_field("generic_arguments").is_some());
    let fields: Vec<_> = literal
        .children_by_field("field")
        .filter_map(|f| f.as_node())
        .map(|f| f.kind)
        .collect();
    assert_eq!(
        fields,
        vec![
            NodeKind::StructLiteralField,
            NodeKind::StructLiteralField,
            NodeKind::SpreadElement,
        ]
    );
}

#[test]
fn test_anonymous_struct_tuple_and_array_literals() {
    let tree = parse_clean("let a = #{ x: 1 };\nlet t = #(1, \"two\", true);\nlet e = #[];");
    assert!(first(&tree, NodeKind::StructLiteral).child_by_field("type").is_none());
    assert_eq!(
        first(&tree, NodeKind::TupleLiteral)
            .children_by_field("element")
            .count(),
        3
    );
    assert_eq!(
        first(&tree, NodeKind::ArrayLiteral)
            .children_by_field("element")
            .count(),
        0
    );
}

#[test]
fn test_patterns() {
    let tree = parse_clean(
        "match v { Point { x, y: 0 } => 1, a.B => 2, C(_, \"s\") => 3, null => 4, n => 5 }",
    );
    let patterns: Vec<_> = tree
        .root()
        .descendants()
        .filter(|n| n.kind == NodeKind::MatchArm)
        .map(|arm| arm.node_by_field("pattern").unwrap().kind)
        .collect();
    assert_eq!(
        patterns,
        vec![
            NodeKind::StructPattern,
            NodeKind::PathPattern,
            NodeKind::EnumPattern,
            NodeKind::LiteralPattern,
            NodeKind::IdentifierPattern,
        ]
    );
    let fields: Vec<_> = first(&tree, NodeKind::StructPattern)
        .children_by_field("field")
        .filter_map(|f| f.as_node())
        .collect();
    assert!(fields[0].child_by_field("pattern").is_none());
    assert_eq!(
        fields[1].node_by_field("pattern").unwrap().kind,
        NodeKind::LiteralPattern
    );
}

// ============================================================================
// Tree Shape
// ============================================================================

#[test]
fn test_module_span_covers_input() {
    let source = "  // leading\nstruct A; /* trailing */\n";
    let tree = parse_clean(source);
    assert_eq!(tree.root().span.range(), 0..source.len());
    let decl = first(&tree, NodeKind::StructDeclaration);
    assert_eq!(decl.text(source), "struct A;");
}

#[test]
fn test_node_span_includes_interleaved_comments() {
    let source = "struct /* c */ A { x /* d */ : i32 }";
    let tree = parse_clean(source);
    assert_eq!(first(&tree, NodeKind::StructDeclaration).text(source), source);
    assert_eq!(
        first(&tree, NodeKind::StructMemberDeclaration).text(source),
        "x /* d */ : i32"
    );
}

#[test]
fn test_empty_input() {
    let tree = parse_clean("");
    assert_eq!(tree.to_sexp(), "(module)");
    let tree = parse_clean("  // only a comment\n");
    assert_eq!(tree.to_sexp(), "(module)");
}

fn nested_parens(depth: usize) -> String {
    format!("let x = {}1{};", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_deep_nesting() {
    let tree = parse_clean(&nested_parens(30));
    assert_eq!(count(&tree, NodeKind::ParenthesizedExpression), 30);
}

#[test]
fn test_nesting_up_to_the_limit() {
    // `let_declaration` takes one level.
    let depth = MAX_NESTING - 1;
    let tree = parse_clean(&nested_parens(depth));
    assert_eq!(count(&tree, NodeKind::ParenthesizedExpression), depth);
}

#[test]
fn test_nesting_past_the_limit() {
    let source = nested_parens(MAX_NESTING);
    let tree = parse(&source);
    assert_eq!(tree.diagnostics().len(), 1, "{:?}", tree.diagnostics());
    assert!(tree.diagnostics()[0].message.contains("shallower nesting"));
    assert_eq!(tree.text(), source);
}

#[test]
fn test_parse_on_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SyntaxTree>();

    let sources = ["struct A { x: i32 }", "fn f() { g(1); }", "let x = #[1, 2];"];
    let trees: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(move || parse(source)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (source, tree) in sources.iter().zip(trees) {
        assert_eq!(tree, ziust_workspace::parse(source));
    }
}
