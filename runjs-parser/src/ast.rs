// runjs AST Definitions
// Typed syntax tree for the ES5/ES6 subset, with source spans on every node

use std::fmt;
use std::rc::Rc;

/// Byte range of a node in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Top-level program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
    pub source_file: Option<String>,
    pub span: Span,
}

/// Identifier with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Expression(Expression),
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(Rc<Function>),
    Block(BlockStatement),
    Empty,
    If(IfStatement),
    For(ForStatement),
    ForIn(ForEachStatement),
    ForOf(ForEachStatement),
    While(WhileStatement),
    DoWhile(WhileStatement),
    Break,
    Continue,
    Return(Option<Expression>),
    Throw(Expression),
    Try(TryStatement),
    Switch(SwitchStatement),
}

impl StatementKind {
    /// ESTree-style node name, used in diagnostics
    pub fn node_name(&self) -> &'static str {
        match self {
            StatementKind::Expression(_) => "ExpressionStatement",
            StatementKind::VariableDeclaration(_) => "VariableDeclaration",
            StatementKind::FunctionDeclaration(_) => "FunctionDeclaration",
            StatementKind::Block(_) => "BlockStatement",
            StatementKind::Empty => "EmptyStatement",
            StatementKind::If(_) => "IfStatement",
            StatementKind::For(_) => "ForStatement",
            StatementKind::ForIn(_) => "ForInStatement",
            StatementKind::ForOf(_) => "ForOfStatement",
            StatementKind::While(_) => "WhileStatement",
            StatementKind::DoWhile(_) => "DoWhileStatement",
            StatementKind::Break => "BreakStatement",
            StatementKind::Continue => "ContinueStatement",
            StatementKind::Return(_) => "ReturnStatement",
            StatementKind::Throw(_) => "ThrowStatement",
            StatementKind::Try(_) => "TryStatement",
            StatementKind::Switch(_) => "SwitchStatement",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
    pub span: Span,
}

/// `var`, `let` or `const`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Var => write!(f, "var"),
            DeclarationKind::Let => write!(f, "let"),
            DeclarationKind::Const => write!(f, "const"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub kind: DeclarationKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(VariableDeclaration),
    Expression(Expression),
}

/// Shared shape of `for-in` and `for-of`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStatement {
    pub left: ForEachTarget,
    pub right: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForEachTarget {
    /// `for (const x of ...)`
    Declaration {
        kind: DeclarationKind,
        pattern: Pattern,
    },
    /// `for (x of ...)`, `for (obj.key in ...)`
    Pattern(Pattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: BlockStatement,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for the `default` case
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
    pub span: Span,
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
}

/// Function declarations, function expressions, arrows and object methods.
///
/// Shared through `Rc` so that closures created at runtime can keep their
/// body alive independently of the program tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub kind: FunctionKind,
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub span: Span,
}

impl Function {
    pub fn is_arrow(&self) -> bool {
        self.kind == FunctionKind::Arrow
    }

    pub fn name(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.name.as_str())
    }

    /// Number of parameters before the first default or rest parameter
    pub fn arity(&self) -> usize {
        self.params
            .iter()
            .take_while(|param| {
                matches!(
                    param.kind,
                    PatternKind::Identifier(_) | PatternKind::Array(_) | PatternKind::Object(_)
                )
            })
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(BlockStatement),
    /// Concise arrow body
    Expression(Box<Expression>),
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Template(TemplateLiteral),
    Identifier(Identifier),
    This,
    Array(Vec<ArrayElement>),
    Object(Vec<ObjectMember>),
    Function(Rc<Function>),
    Unary(UnaryOperation),
    Update(UpdateOperation),
    Binary(BinaryOperation),
    Logical(LogicalOperation),
    Assignment(AssignmentOperation),
    Conditional(ConditionalExpression),
    Call(CallExpression),
    New(CallExpression),
    Member(MemberExpression),
    Sequence(Vec<Expression>),
}

impl ExpressionKind {
    /// ESTree-style node name, used in diagnostics
    pub fn node_name(&self) -> &'static str {
        match self {
            ExpressionKind::Number(_)
            | ExpressionKind::String(_)
            | ExpressionKind::Boolean(_)
            | ExpressionKind::Null => "Literal",
            ExpressionKind::Template(_) => "TemplateLiteral",
            ExpressionKind::Identifier(_) => "Identifier",
            ExpressionKind::This => "ThisExpression",
            ExpressionKind::Array(_) => "ArrayExpression",
            ExpressionKind::Object(_) => "ObjectExpression",
            ExpressionKind::Function(function) if function.is_arrow() => "ArrowFunctionExpression",
            ExpressionKind::Function(_) => "FunctionExpression",
            ExpressionKind::Unary(_) => "UnaryExpression",
            ExpressionKind::Update(_) => "UpdateExpression",
            ExpressionKind::Binary(_) => "BinaryExpression",
            ExpressionKind::Logical(_) => "LogicalExpression",
            ExpressionKind::Assignment(_) => "AssignmentExpression",
            ExpressionKind::Conditional(_) => "ConditionalExpression",
            ExpressionKind::Call(_) => "CallExpression",
            ExpressionKind::New(_) => "NewExpression",
            ExpressionKind::Member(_) => "MemberExpression",
            ExpressionKind::Sequence(_) => "SequenceExpression",
        }
    }
}

/// Template literal; `quasis` always holds one more entry than `expressions`
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    pub quasis: Vec<String>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Expression(Expression),
    Spread(Expression),
    Hole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    /// `key: value`, shorthand `key` and methods `key() {}`
    Property { key: PropertyKey, value: Expression },
    Spread(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier or string key
    Static(String),
    Number(f64),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    BitwiseNot,
    TypeOf,
    Void,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub operator: UnaryOperator,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOperation {
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    In,
    InstanceOf,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::UnsignedShiftRight => ">>>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Exponent => "**",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::In => "in",
            BinaryOperator::InstanceOf => "instanceof",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    NullishCoalescing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalOperation {
    pub left: Box<Expression>,
    pub operator: LogicalOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    Nullish,
}

impl AssignmentOperator {
    /// Binary operator applied by a compound assignment (`+=` applies `+`)
    pub fn binary_operator(self) -> Option<BinaryOperator> {
        match self {
            AssignmentOperator::Add => Some(BinaryOperator::Add),
            AssignmentOperator::Subtract => Some(BinaryOperator::Subtract),
            AssignmentOperator::Multiply => Some(BinaryOperator::Multiply),
            AssignmentOperator::Divide => Some(BinaryOperator::Divide),
            AssignmentOperator::Modulo => Some(BinaryOperator::Modulo),
            AssignmentOperator::Exponent => Some(BinaryOperator::Exponent),
            AssignmentOperator::ShiftLeft => Some(BinaryOperator::ShiftLeft),
            AssignmentOperator::ShiftRight => Some(BinaryOperator::ShiftRight),
            AssignmentOperator::UnsignedShiftRight => Some(BinaryOperator::UnsignedShiftRight),
            AssignmentOperator::BitwiseAnd => Some(BinaryOperator::BitwiseAnd),
            AssignmentOperator::BitwiseOr => Some(BinaryOperator::BitwiseOr),
            AssignmentOperator::BitwiseXor => Some(BinaryOperator::BitwiseXor),
            AssignmentOperator::Assign
            | AssignmentOperator::LogicalAnd
            | AssignmentOperator::LogicalOr
            | AssignmentOperator::Nullish => None,
        }
    }

    /// Logical operator applied by a short-circuiting assignment (`||=`)
    pub fn logical_operator(self) -> Option<LogicalOperator> {
        match self {
            AssignmentOperator::LogicalAnd => Some(LogicalOperator::And),
            AssignmentOperator::LogicalOr => Some(LogicalOperator::Or),
            AssignmentOperator::Nullish => Some(LogicalOperator::NullishCoalescing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentOperation {
    pub target: Pattern,
    pub operator: AssignmentOperator,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Expression(Expression),
    Spread(Expression),
}

/// Call and `new` expressions
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: MemberProperty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `object.name`
    Static(Identifier),
    /// `object[expression]`
    Computed(Box<Expression>),
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Binding and assignment targets
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Identifier(Identifier),
    Array(ArrayPattern),
    Object(ObjectPattern),
    /// `target = default`
    Assignment(AssignmentPattern),
    /// `...target`; only valid as the last array element or parameter
    Rest(Box<Pattern>),
    /// Only produced for assignment targets, never for declarations
    Member(MemberExpression),
}

impl PatternKind {
    /// ESTree-style node name, used in diagnostics
    pub fn node_name(&self) -> &'static str {
        match self {
            PatternKind::Identifier(_) => "Identifier",
            PatternKind::Array(_) => "ArrayPattern",
            PatternKind::Object(_) => "ObjectPattern",
            PatternKind::Assignment(_) => "AssignmentPattern",
            PatternKind::Rest(_) => "RestElement",
            PatternKind::Member(_) => "MemberExpression",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPattern {
    /// `None` marks an elision (`[, b]`)
    pub elements: Vec<Option<Pattern>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub rest: Option<Box<Pattern>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Pattern,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPattern {
    pub target: Box<Pattern>,
    pub default: Box<Expression>,
}
