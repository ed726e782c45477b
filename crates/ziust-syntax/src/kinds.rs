//! Node kinds.
//! 节点种类。

use serde::Serialize;

macro_rules! node_kinds {
    ($($(#[$meta:meta])* $variant:ident => $name:literal,)*) => {
        /// The kind tag of a syntax node, one per visible nonterminal.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum NodeKind {
            $($(#[$meta])* $variant,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)*];

            /// The stable snake_case name of this kind.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$variant => $name,)*
                }
            }

            /// Inverse of [`NodeKind::as_str`].
            pub fn from_name(name: &str) -> Option<NodeKind> {
                match name {
                    $($name => Some(NodeKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

node_kinds! {
    Module => "module",

    // Declarations
    StructDeclaration => "struct_declaration",
    StructMemberDeclaration => "struct_member_declaration",
    EnumDeclaration => "enum_declaration",
    EnumMemberDeclaration => "enum_member_declaration",
    TypeAliasDeclaration => "type_alias_declaration",
    TraitDeclaration => "trait_declaration",
    ConstantSignature => "constant_signature",
    FunctionSignature => "function_signature",
    ImplDeclaration => "impl_declaration",
    ConstDeclaration => "const_declaration",
    FunctionDeclaration => "function_declaration",
    Parameters => "parameters",
    Parameter => "parameter",
    LetDeclaration => "let_declaration",
    LetElseDeclaration => "let_else_declaration",
    NullStatement => "null_statement",
    DeferStatement => "defer_statement",
    ErrdeferStatement => "errdefer_statement",
    TestStatement => "test_statement",
    AttributeStatement => "attribute_statement",
    Attribute => "attribute",
    AttributeMember => "attribute_member",

    // Templates and generics
    TemplateParameters => "template_parameters",
    TemplateParameter => "template_parameter",
    TemplateBound => "template_bound",
    TemplateBoundClause => "template_bound_clause",
    GenericParameters => "generic_parameters",
    GenericParameter => "generic_parameter",
    GenericBound => "generic_bound",

    // Types
    NeverType => "never_type",
    TupleType => "tuple_type",
    ReferenceType => "reference_type",
    PointerType => "pointer_type",
    ArrayType => "array_type",
    NamedType => "named_type",
    TemplateArguments => "template_arguments",
    GenericArguments => "generic_arguments",

    // Statements
    BlockStatement => "block_statement",
    IfStatement => "if_statement",
    LoopStatement => "loop_statement",
    MatchStatement => "match_statement",
    ForStatement => "for_statement",
    WhileStatement => "while_statement",
    AssignmentStatement => "assignment_statement",
    ExpressionStatement => "expression_statement",

    // Expressions
    MemberExpression => "member_expression",
    Path => "path",
    ParenthesizedExpression => "parenthesized_expression",
    BuiltinCall => "builtin_call",
    MacroCall => "macro_call",
    Arguments => "arguments",
    BlockExpression => "block_expression",
    IfExpression => "if_expression",
    IfConditionLet => "if_condition_let",
    LoopExpression => "loop_expression",
    MatchExpression => "match_expression",
    MatchArm => "match_arm",
    ReturnExpression => "return_expression",
    BreakExpression => "break_expression",
    ContinueExpression => "continue_expression",
    OrExpression => "or_expression",
    AndExpression => "and_expression",
    AsExpression => "as_expression",

    // Literals
    StructLiteral => "struct_literal",
    StructLiteralField => "struct_literal_field",
    SpreadElement => "spread_element",
    TupleLiteral => "tuple_literal",
    ArrayLiteral => "array_literal",

    // Patterns
    IdentifierPattern => "identifier_pattern",
    PathPattern => "path_pattern",
    EnumPattern => "enum_pattern",
    StructPattern => "struct_pattern",
    StructPatternField => "struct_pattern_field",
    LiteralPattern => "literal_pattern",

    // Opaque bodies
    Group => "group",

    /// Tokens the parser could not fit into the grammar.
    Error => "ERROR",
}

impl NodeKind {
    pub fn is_error(self) -> bool {
        self == NodeKind::Error
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for &kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("struct_decl"), None);
    }
}
