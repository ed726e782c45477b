//! The rule catalog.
//! 规则目录。

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use ziust_lexer::Keyword::*;
use ziust_lexer::TokenKind::{self, *};
use ziust_syntax::NodeKind as N;

use crate::resolver::{Conflict, PREFIX_OPERAND_PRECEDENCE};
use crate::rule::*;
use crate::symbol::{Hidden as H, Symbol};

/// The complete grammar: one rule per symbol, in definition order.
pub struct Grammar {
    rules: HashMap<Symbol, Rule>,
    order: Vec<Symbol>,
}

impl Grammar {
    fn new(definitions: Vec<(Symbol, Rule)>) -> Self {
        let order = definitions.iter().map(|(symbol, _)| *symbol).collect();
        Self {
            rules: definitions.into_iter().collect(),
            order,
        }
    }

    pub fn start(&self) -> Symbol {
        Symbol::Node(N::Module)
    }

    pub fn rule(&self, symbol: Symbol) -> Option<&Rule> {
        self.rules.get(&symbol)
    }

    /// Symbols in definition order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.order.iter().copied()
    }

    /// Symbols that are referenced somewhere but never defined.
    pub fn undefined_symbols(&self) -> Vec<Symbol> {
        let mut missing: Vec<Symbol> = self
            .rules
            .values()
            .flat_map(Rule::symbols)
            .filter(|symbol| !self.rules.contains_key(symbol))
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.symbols() {
            if let Some(rule) = self.rule(symbol) {
                writeln!(f, "{symbol} := {rule}")?;
            }
        }
        Ok(())
    }
}

pub static GRAMMAR: Lazy<Grammar> = Lazy::new(|| Grammar::new(definitions()));

fn label_prefix() -> Rule {
    opt(seq([field("label", tok(Label)), tok(Colon)]))
}

fn visibility() -> Rule {
    opt(field("visibility", kw(Pub)))
}

/// Template then generic parameter lists, both optional.
fn parameter_lists() -> Rule {
    seq([
        opt_in(
            Conflict::PathVsParameters,
            field("template_parameters", node(N::TemplateParameters)),
        ),
        opt_in(
            Conflict::PathVsParameters,
            field("generic_parameters", node(N::GenericParameters)),
        ),
    ])
}

fn type_arguments() -> Rule {
    seq([
        opt(field("template_arguments", node(N::TemplateArguments))),
        opt(field("generic_arguments", node(N::GenericArguments))),
    ])
}

fn return_type() -> Rule {
    opt(seq([tok(Arrow), field("return_type", hidden(H::Type))]))
}

fn mutability() -> Rule {
    field("mutability", choice([kw(Mut), kw(Const)]))
}

fn prefix_operand() -> Rule {
    opt_in(
        Conflict::ReturnOperand,
        field("value", infix(H::UnaryExpression, PREFIX_OPERAND_PRECEDENCE)),
    )
}

fn comma_list(item: Rule, open: TokenKind, closer: TokenKind) -> Rule {
    delimited(open, item, Some(Comma), closer)
}

fn definitions() -> Vec<(Symbol, Rule)> {
    use Symbol::{Hidden as Hid, Node as Nod};

    vec![
        (Nod(N::Module), list(hidden(H::Statement), None, Eof)),
        (
            Hid(H::Statement),
            choice([
                node(N::StructDeclaration),
                node(N::EnumDeclaration),
                node(N::TypeAliasDeclaration),
                node(N::TraitDeclaration),
                node(N::ImplDeclaration),
                node(N::ConstDeclaration),
                node(N::FunctionDeclaration),
                hidden(H::Let),
                node(N::NullStatement),
                node(N::DeferStatement),
                node(N::ErrdeferStatement),
                node(N::TestStatement),
                node(N::AttributeStatement),
                hidden(H::DeferrableStatement),
            ]),
        ),
        (
            Hid(H::Let),
            choice_in(
                Conflict::LetElse,
                [node(N::LetElseDeclaration), node(N::LetDeclaration)],
            ),
        ),
        (
            Hid(H::DeferrableStatement),
            choice_in(
                Conflict::StatementVsExpression,
                [
                    node(N::BlockStatement),
                    node(N::IfStatement),
                    node(N::ForStatement),
                    node(N::WhileStatement),
                    node(N::LoopStatement),
                    node(N::MatchStatement),
                    node(N::AssignmentStatement),
                    node(N::ExpressionStatement),
                ],
            ),
        ),
        // Declarations
        (
            Nod(N::StructDeclaration),
            seq([
                visibility(),
                kw(Struct),
                field("name", ident()),
                parameter_lists(),
                choice([
                    comma_list(field("member", node(N::StructMemberDeclaration)), LBrace, RBrace),
                    tok(Semicolon),
                ]),
            ]),
        ),
        (
            Nod(N::StructMemberDeclaration),
            seq([field("name", ident()), tok(Colon), field("type", hidden(H::Type))]),
        ),
        (
            Nod(N::EnumDeclaration),
            seq([
                visibility(),
                kw(Enum),
                field("name", ident()),
                parameter_lists(),
                opt(seq([
                    tok(LParen),
                    field("tag_type", hidden(H::Type)),
                    close(RParen),
                ])),
                comma_list(field("member", node(N::EnumMemberDeclaration)), LBrace, RBrace),
            ]),
        ),
        (
            Nod(N::EnumMemberDeclaration),
            seq([
                field("name", ident()),
                opt(comma_list(field("payload", hidden(H::Type)), LParen, RParen)),
                opt(seq([tok(Eq), field("value", hidden(H::Expression))])),
            ]),
        ),
        (
            Nod(N::TypeAliasDeclaration),
            seq([
                visibility(),
                kw(Type),
                field("name", ident()),
                parameter_lists(),
                tok(Eq),
                field("type", hidden(H::Type)),
                tok(Semicolon),
            ]),
        ),
        (
            Nod(N::TraitDeclaration),
            seq([
                visibility(),
                kw(Trait),
                field("name", ident()),
                parameter_lists(),
                delimited(LBrace, field("member", hidden(H::TraitMember)), None, RBrace),
            ]),
        ),
        (
            Hid(H::TraitMember),
            choice([node(N::ConstantSignature), node(N::FunctionSignature)]),
        ),
        (
            Nod(N::ConstantSignature),
            seq([
                kw(Const),
                field("name", ident()),
                tok(Colon),
                field("type", hidden(H::Type)),
                tok(Semicolon),
            ]),
        ),
        (
            Nod(N::FunctionSignature),
            seq([
                kw(Fn),
                field("name", ident()),
                parameter_lists(),
                field("parameters", node(N::Parameters)),
                return_type(),
                tok(Semicolon),
            ]),
        ),
        (
            Nod(N::ImplDeclaration),
            seq([
                kw(Impl),
                parameter_lists(),
                opt(seq([field("trait", node(N::NamedType)), kw(For)])),
                field("type", hidden(H::Type)),
                delimited(LBrace, field("member", hidden(H::ImplMember)), None, RBrace),
            ]),
        ),
        (
            Hid(H::ImplMember),
            choice([node(N::ConstDeclaration), node(N::FunctionDeclaration)]),
        ),
        (
            Nod(N::ConstDeclaration),
            seq([
                visibility(),
                kw(Const),
                field("name", ident()),
                opt(seq([tok(Colon), field("type", hidden(H::Type))])),
                tok(Eq),
                field("value", hidden(H::Expression)),
                tok(Semicolon),
            ]),
        ),
        (
            Nod(N::FunctionDeclaration),
            seq([
                visibility(),
                kw(Fn),
                field("name", ident()),
                parameter_lists(),
                field("parameters", node(N::Parameters)),
                return_type(),
                field("body", node(N::BlockExpression)),
            ]),
        ),
        (
            Nod(N::Parameters),
            comma_list(field("parameter", node(N::Parameter)), LParen, RParen),
        ),
        (
            Nod(N::Parameter),
            seq([field("name", ident()), tok(Colon), field("type", hidden(H::Type))]),
        ),
        (
            Hid(H::LetHead),
            seq([
                kw(Let),
                field("pattern", hidden(H::Pattern)),
                opt(seq([tok(Colon), field("type", hidden(H::Type))])),
                opt(seq([tok(Eq), field("value", hidden(H::Expression))])),
            ]),
        ),
        (
            Nod(N::LetDeclaration),
            seq([hidden(H::LetHead), tok(Semicolon)]),
        ),
        (
            Nod(N::LetElseDeclaration),
            seq([
                hidden(H::LetHead),
                kw(Else),
                field("alternative", node(N::BlockExpression)),
                opt(tok(Semicolon)),
            ]),
        ),
        (Nod(N::NullStatement), tok(Semicolon)),
        (
            Nod(N::DeferStatement),
            seq([
                kw(Defer),
                opt(field("label", tok(Label))),
                field("statement", hidden(H::DeferrableStatement)),
            ]),
        ),
        (
            Nod(N::ErrdeferStatement),
            seq([
                kw(Errdefer),
                opt(field("label", tok(Label))),
                field("statement", hidden(H::DeferrableStatement)),
            ]),
        ),
        (
            Nod(N::TestStatement),
            seq([
                kw(Test),
                field("name", tok(TokenKind::String)),
                field("body", node(N::BlockExpression)),
            ]),
        ),
        (
            Nod(N::AttributeStatement),
            seq([
                field("attribute", node(N::Attribute)),
                field("statement", hidden(H::Statement)),
            ]),
        ),
        (
            Nod(N::Attribute),
            seq([
                tok(Bang),
                comma_list(field("member", node(N::AttributeMember)), LBracket, RBracket),
            ]),
        ),
        (
            Nod(N::AttributeMember),
            seq([field("path", node(N::Path)), opt(field("arguments", group()))]),
        ),
        // Templates and generics
        (
            Nod(N::TemplateParameters),
            comma_list(field("parameter", node(N::TemplateParameter)), LBracket, RBracket),
        ),
        (
            Nod(N::TemplateParameter),
            seq([
                field("name", ident()),
                opt(seq([tok(Colon), field("bound", node(N::TemplateBound))])),
                opt(seq([tok(Eq), field("default", hidden(H::Type))])),
            ]),
        ),
        (
            Nod(N::TemplateBound),
            seq([
                field("clause", node(N::TemplateBoundClause)),
                rep(seq([tok(Pipe), field("clause", node(N::TemplateBoundClause))])),
            ]),
        ),
        (
            Nod(N::TemplateBoundClause),
            seq([
                field("term", node(N::NamedType)),
                rep(seq([tok(Plus), field("term", node(N::NamedType))])),
            ]),
        ),
        (
            Nod(N::GenericParameters),
            comma_list(field("parameter", node(N::GenericParameter)), Lt, Gt),
        ),
        (
            Nod(N::GenericParameter),
            seq([
                field("name", ident()),
                opt(seq([tok(Colon), field("bound", node(N::GenericBound))])),
                opt(seq([tok(Eq), field("default", hidden(H::Type))])),
            ]),
        ),
        (
            Nod(N::GenericBound),
            choice([
                field("term", node(N::NamedType)),
                comma_list(field("term", node(N::NamedType)), LParen, RParen),
            ]),
        ),
        // Types
        (
            Hid(H::Type),
            choice([
                node(N::NeverType),
                node(N::TupleType),
                node(N::ReferenceType),
                node(N::PointerType),
                node(N::ArrayType),
                node(N::NamedType),
            ]),
        ),
        (Nod(N::NeverType), tok(Bang)),
        (
            Nod(N::TupleType),
            comma_list(field("element", hidden(H::Type)), LParen, RParen),
        ),
        (
            Nod(N::ReferenceType),
            seq([
                tok(Amp),
                opt(field("modifier", choice([tok(Bang), tok(Question)]))),
                mutability(),
                field("type", hidden(H::Type)),
            ]),
        ),
        (
            Nod(N::PointerType),
            seq([
                tok(Star),
                opt(field("modifier", choice([tok(Bang), tok(Question)]))),
                mutability(),
                field("type", hidden(H::Type)),
            ]),
        ),
        (
            Nod(N::ArrayType),
            seq([
                tok(LBracket),
                field("size", choice([tok(Star), hidden(H::Expression)])),
                close(RBracket),
                mutability(),
                field("type", hidden(H::Type)),
            ]),
        ),
        (
            Nod(N::NamedType),
            seq([field("path", node(N::Path)), type_arguments()]),
        ),
        (
            Nod(N::TemplateArguments),
            comma_list(field("argument", hidden(H::Type)), LBracket, RBracket),
        ),
        (
            Nod(N::GenericArguments),
            comma_list(field("argument", hidden(H::Type)), Lt, Gt),
        ),
        // Statements
        (Nod(N::BlockStatement), node(N::BlockExpression)),
        (Nod(N::IfStatement), node(N::IfExpression)),
        (Nod(N::LoopStatement), node(N::LoopExpression)),
        (Nod(N::MatchStatement), node(N::MatchExpression)),
        (
            Nod(N::ForStatement),
            seq([
                kw(For),
                label_prefix(),
                field("pattern", hidden(H::Pattern)),
                kw(In),
                field("iterable", hidden(H::Expression)),
                field("body", node(N::BlockExpression)),
            ]),
        ),
        (
            Nod(N::WhileStatement),
            seq([
                kw(While),
                label_prefix(),
                field("condition", hidden(H::Condition)),
                field("body", node(N::BlockExpression)),
            ]),
        ),
        (
            Nod(N::AssignmentStatement),
            seq([
                field("left", hidden(H::Expression)),
                tok(Eq),
                field("right", hidden(H::Expression)),
                tok(Semicolon),
            ]),
        ),
        (
            Nod(N::ExpressionStatement),
            seq([field("expression", hidden(H::Expression)), tok(Semicolon)]),
        ),
        // Expressions
        (Hid(H::Expression), infix(H::UnaryExpression, 0)),
        (
            Hid(H::UnaryExpression),
            choice([
                node(N::ReturnExpression),
                node(N::BreakExpression),
                node(N::ContinueExpression),
                node(N::IfExpression),
                node(N::MatchExpression),
                node(N::LoopExpression),
                node(N::BlockExpression),
                hidden(H::PostfixExpression),
            ]),
        ),
        (
            Hid(H::PostfixExpression),
            postfix(
                H::SimpleExpression,
                hidden(H::MemberSuffix),
                N::MemberExpression,
                "object",
            ),
        ),
        (
            Hid(H::MemberSuffix),
            choice([
                seq([
                    tok(Dot),
                    field("field", ident()),
                    opt(seq([tok(ColonColon), type_arguments()])),
                ]),
                seq([tok(Dot), field("tuple_index", tok(Number))]),
                field("operator", tok(DotStar)),
                field("operator", tok(DotAmp)),
                comma_list(field("index", hidden(H::Expression)), LBracket, RBracket),
                field("arguments", node(N::Arguments)),
            ]),
        ),
        (
            Hid(H::SimpleExpression),
            choice_in(
                Conflict::PathContinuation,
                [
                    hidden(H::Literal),
                    node(N::ParenthesizedExpression),
                    node(N::BuiltinCall),
                    node(N::MacroCall),
                    node(N::Path),
                ],
            ),
        ),
        (
            Nod(N::Path),
            seq([
                ident(),
                rep(seq([
                    tok(Dot),
                    choice([seq([ident(), not(tok(ColonColon))]), tok(Number)]),
                ])),
            ]),
        ),
        (
            Nod(N::ParenthesizedExpression),
            seq([
                tok(LParen),
                field("expression", hidden(H::Expression)),
                close(RParen),
            ]),
        ),
        (
            Nod(N::BuiltinCall),
            seq([
                tok(At),
                field("name", ident()),
                field("arguments", node(N::Arguments)),
            ]),
        ),
        (
            Nod(N::MacroCall),
            seq([field("path", node(N::Path)), tok(Bang), field("body", group())]),
        ),
        (
            Nod(N::Arguments),
            comma_list(field("argument", hidden(H::Expression)), LParen, RParen),
        ),
        (
            Nod(N::BlockExpression),
            seq([
                label_prefix(),
                delimited(
                    LBrace,
                    choice_in(
                        Conflict::StatementVsExpression,
                        [
                            hidden(H::Statement),
                            seq([
                                field("value", hidden(H::Expression)),
                                lookahead(tok(RBrace)),
                            ]),
                        ],
                    ),
                    None,
                    RBrace,
                ),
            ]),
        ),
        (
            Nod(N::IfExpression),
            seq([
                kw(If),
                field("condition", hidden(H::Condition)),
                field("consequence", node(N::BlockExpression)),
                opt(seq([
                    kw(Else),
                    field(
                        "alternative",
                        choice([node(N::IfExpression), node(N::BlockExpression)]),
                    ),
                ])),
            ]),
        ),
        (
            Hid(H::Condition),
            choice([node(N::IfConditionLet), hidden(H::Expression)]),
        ),
        (
            Nod(N::IfConditionLet),
            seq([
                kw(Let),
                field("pattern", hidden(H::Pattern)),
                tok(Eq),
                field("value", hidden(H::Expression)),
            ]),
        ),
        (
            Nod(N::LoopExpression),
            seq([kw(Loop), label_prefix(), field("body", node(N::BlockExpression))]),
        ),
        (
            Nod(N::MatchExpression),
            seq([
                kw(Match),
                field("value", hidden(H::Expression)),
                delimited(LBrace, field("arm", node(N::MatchArm)), None, RBrace),
            ]),
        ),
        (
            Nod(N::MatchArm),
            seq([
                field("pattern", hidden(H::Pattern)),
                opt(seq([kw(If), field("guard", hidden(H::Expression))])),
                tok(FatArrow),
                field("value", hidden(H::Expression)),
                opt(tok(Comma)),
            ]),
        ),
        (
            Nod(N::ReturnExpression),
            seq([kw(Return), prefix_operand()]),
        ),
        (
            Nod(N::BreakExpression),
            seq([kw(Break), opt(field("label", tok(Label))), prefix_operand()]),
        ),
        (
            Nod(N::ContinueExpression),
            seq([kw(Continue), opt(field("label", tok(Label)))]),
        ),
        // Literals
        (
            Hid(H::Literal),
            choice([
                tok(Number),
                tok(TokenKind::String),
                tok(ValueLiteral),
                node(N::StructLiteral),
                node(N::TupleLiteral),
                node(N::ArrayLiteral),
            ]),
        ),
        (
            Nod(N::StructLiteral),
            seq([
                tok(Hash),
                opt(field("type", node(N::Path))),
                opt(seq([tok(ColonColon), type_arguments()])),
                comma_list(
                    field(
                        "field",
                        choice([node(N::SpreadElement), node(N::StructLiteralField)]),
                    ),
                    LBrace,
                    RBrace,
                ),
            ]),
        ),
        (
            Nod(N::StructLiteralField),
            seq([
                field("name", ident()),
                opt(seq([tok(Colon), field("value", hidden(H::Expression))])),
            ]),
        ),
        (
            Nod(N::SpreadElement),
            seq([tok(DotDot), field("value", hidden(H::Expression))]),
        ),
        (
            Nod(N::TupleLiteral),
            seq([
                tok(Hash),
                comma_list(field("element", hidden(H::Expression)), LParen, RParen),
            ]),
        ),
        (
            Nod(N::ArrayLiteral),
            seq([
                tok(Hash),
                comma_list(field("element", hidden(H::Expression)), LBracket, RBracket),
            ]),
        ),
        // Patterns
        (
            Hid(H::Pattern),
            choice_in(
                Conflict::PathContinuation,
                [
                    node(N::IdentifierPattern),
                    node(N::PathPattern),
                    node(N::EnumPattern),
                    node(N::StructPattern),
                    node(N::LiteralPattern),
                ],
            ),
        ),
        (Nod(N::IdentifierPattern), field("name", ident())),
        (Nod(N::PathPattern), field("path", node(N::Path))),
        (
            Nod(N::EnumPattern),
            seq([
                field("path", node(N::Path)),
                comma_list(field("argument", hidden(H::Pattern)), LParen, RParen),
            ]),
        ),
        (
            Nod(N::StructPattern),
            seq([
                field("path", node(N::Path)),
                comma_list(field("field", node(N::StructPatternField)), LBrace, RBrace),
            ]),
        ),
        (
            Nod(N::StructPatternField),
            seq([
                field("name", ident()),
                opt(seq([tok(Colon), field("pattern", hidden(H::Pattern))])),
            ]),
        ),
        (
            Nod(N::LiteralPattern),
            field(
                "value",
                choice([tok(Number), tok(TokenKind::String), tok(ValueLiteral)]),
            ),
        ),
    ]
}
