//! AST node definitions for DPL.
//!
//! The parser produces a [`Script`] — an ordered list of packs — and all
//! nodes are immutable once built. The generator walks them by shared
//! reference.

use dplc_lex::Token;
use dplc_util::Span;

/// AST root: an ordered list of packs.
pub type Script = Vec<Pack>;

/// One `pack "<title>" namespace <ns> { … }` unit.
#[derive(Debug, Clone)]
pub struct Pack {
    /// Human-readable pack title.
    pub title: String,
    /// Namespace, lowercased.
    pub namespace: String,
    /// Namespace as written in source.
    pub namespace_raw: String,
    pub globals: Vec<GlobalVar>,
    pub functions: Vec<Function>,
    pub items: Vec<ItemDef>,
    pub recipes: Vec<Recipe>,
    pub advancements: Vec<Advancement>,
    pub tags: Vec<TagDef>,
    pub span: Span,
}

/// Scalar kind of a DPL variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Int,
    Float,
    Double,
    Bool,
    Str,
    Ent,
}

impl VarKind {
    /// Parse a type name as written in source.
    pub fn from_name(name: &str) -> Option<VarKind> {
        match name {
            "int" => Some(VarKind::Int),
            "float" => Some(VarKind::Float),
            "double" => Some(VarKind::Double),
            "bool" => Some(VarKind::Bool),
            "string" => Some(VarKind::Str),
            "Ent" => Some(VarKind::Ent),
            _ => None,
        }
    }

    /// True for kinds that live in scoreboard slots.
    pub fn is_score_backed(self) -> bool {
        matches!(self, VarKind::Int | VarKind::Bool)
    }

    /// True for kinds readable in numeric expression position.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            VarKind::Int | VarKind::Bool | VarKind::Float | VarKind::Double
        )
    }
}

/// A declared variable type: scalar kind plus array flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarType {
    pub kind: VarKind,
    pub array: bool,
}

/// A pack-level variable declaration.
#[derive(Debug, Clone)]
pub struct GlobalVar {
    pub name: String,
    pub ty: VarType,
    pub init: Option<Expr>,
    pub span: Span,
}

/// A user function. The emitted name is the lowercased form.
#[derive(Debug, Clone)]
pub struct Function {
    /// Lowercased name used for the emitted file and call sites.
    pub name: String,
    /// Name as written in source.
    pub raw_name: String,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Scoreboard operation spelling (`+=`, `-=`, …).
    pub fn score_op(self) -> &'static str {
        match self {
            BinOp::Add => "+=",
            BinOp::Sub => "-=",
            BinOp::Mul => "*=",
            BinOp::Div => "/=",
            BinOp::Mod => "%=",
        }
    }
}

/// Expression node.
///
/// Macro strings are stored in [`Expr::Str`] with their leading `$`
/// marker so downstream code can detect macro semantics.
#[derive(Debug, Clone)]
pub enum Expr {
    /// String literal (unescaped content; macro strings keep the `$`).
    Str(String, Span),
    /// Number literal.
    Number(f64, Span),
    /// Variable reference.
    Var(String, Span),
    /// Binary arithmetic.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// Call with optional receiver (`Math.Min(a, b)`, `Foo()`).
    ///
    /// Postfix dotted calls (`e.GetData(f)`) have no target; the object
    /// appears as the first argument.
    Call {
        target: Option<String>,
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    /// Dotted access not followed by arguments (`Math.PI`).
    Member {
        object: Box<Expr>,
        name: String,
        span: Span,
    },
    /// Array literal.
    Array(Vec<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Str(_, span)
            | Expr::Number(_, span)
            | Expr::Var(_, span)
            | Expr::Binary { span, .. }
            | Expr::Call { span, .. }
            | Expr::Member { span, .. }
            | Expr::Array(_, span) => *span,
        }
    }
}

/// Comparison operator inside conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Short-circuit boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Condition node. `&&` binds tighter than `||`; both bind looser than
/// comparisons.
#[derive(Debug, Clone)]
pub enum Cond {
    /// Literal string used verbatim as an execute-guard fragment.
    Raw(String, Span),
    /// Two expressions related by a comparison operator.
    Compare {
        op: CmpOp,
        lhs: Expr,
        rhs: Expr,
        span: Span,
    },
    /// Boolean combination of two sub-conditions.
    Bool {
        op: BoolOp,
        lhs: Box<Cond>,
        rhs: Box<Cond>,
    },
}

/// Assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    /// The arithmetic op behind a compound assignment, if any.
    pub fn binop(self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
            AssignOp::Mod => Some(BinOp::Mod),
        }
    }
}

/// Statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    Say(Expr, Span),
    Run(Expr, Span),
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    Call(CallStmt),
    If(IfStmt),
    Execute(ExecuteStmt),
    For(Box<ForStmt>),
    While(WhileStmt),
}

/// Local variable declaration.
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub name: String,
    pub ty: VarType,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Assignment, including the compound forms and `++`/`--` (which parse
/// as `+= 1` / `-= 1`).
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub name: String,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

/// Function call statement, optionally qualified by a pack prefix.
#[derive(Debug, Clone)]
pub struct CallStmt {
    pub pack: Option<String>,
    pub name: String,
    pub span: Span,
}

/// `if`/`unless` with optional chained else.
#[derive(Debug, Clone)]
pub struct IfStmt {
    /// True for `unless`.
    pub negated: bool,
    /// None when recovery produced a null condition; treated as always
    /// true downstream.
    pub cond: Option<Cond>,
    pub body: Vec<Stmt>,
    pub else_branch: Option<Box<ElseBranch>>,
    pub span: Span,
}

/// Else clause: either another `if` or a terminal block.
#[derive(Debug, Clone)]
pub enum ElseBranch {
    If(IfStmt),
    Else(Vec<Stmt>),
}

/// One modifier inside an execute variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecMod {
    As(String),
    At(String),
    Positioned(String, String, String),
}

/// `execute(<variants>) { body }`: the body is emitted once per variant.
#[derive(Debug, Clone)]
pub struct ExecuteStmt {
    /// Always at least one variant; `execute()` normalizes to a single
    /// empty variant.
    pub variants: Vec<Vec<ExecMod>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// For-loop initializer: a typed local or a plain assignment.
#[derive(Debug, Clone)]
pub enum ForInit {
    Decl(VarDeclStmt),
    Assign(AssignStmt),
}

/// `for(init | cond | step) { body }`.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub cond: Option<Cond>,
    pub step: Option<AssignStmt>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `while(cond) { body }`.
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: Option<Cond>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A custom item definition.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub name: String,
    /// Base item identifier, e.g. `minecraft:wooden_sword`.
    pub base_id: String,
    /// Raw component tokens between the brackets, preserved verbatim so
    /// arbitrary property shapes survive.
    pub components: Option<Vec<Token>>,
    pub span: Span,
}

/// Recipe shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeKind {
    Shaped,
    Shapeless,
}

/// A recipe definition. Presence of a pattern implies shaped.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: String,
    pub kind: RecipeKind,
    /// Shapeless ingredient ids, in declaration order.
    pub ingredients: Vec<String>,
    /// Shaped pattern rows.
    pub pattern: Vec<String>,
    /// Shaped key mapping: single-letter key to ingredient id.
    pub keys: Vec<(String, String)>,
    pub result: String,
    pub count: u32,
    pub span: Span,
}

/// An advancement definition.
#[derive(Debug, Clone)]
pub struct Advancement {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub parent: Option<String>,
    /// Criterion name to trigger id.
    pub criteria: Vec<(String, String)>,
    pub span: Span,
}

/// Tag category, determined by the declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    Blocks,
    Items,
}

impl TagCategory {
    /// Directory name under `data/<ns>/tags/`.
    pub fn dir(self) -> &'static str {
        match self {
            TagCategory::Blocks => "blocks",
            TagCategory::Items => "items",
        }
    }
}

/// A tag file definition.
#[derive(Debug, Clone)]
pub struct TagDef {
    pub name: String,
    pub category: TagCategory,
    pub replace: bool,
    pub values: Vec<String>,
    pub span: Span,
}
