//! Syntax module for PICO-8 Lua
//!
//! This module provides the syntax tree types produced by [`parser::parse`] and
//! consumed by the renderer. Every node owns its children; the tree is built
//! once and never mutated.

use serde::{Deserialize, Serialize};

pub mod parser;

pub use parser::parse;

// ============================================================================
// BLOCKS & STATEMENTS
// ============================================================================

/// A whole code section. PICO-8 treats the cart's code as one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Chunk {
    pub block: Block,
}

/// A sequence of statements; a trailing `return` is stored as the last statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Block {
    pub stats: Vec<Stat>,
}

impl Block {
    pub fn new(stats: Vec<Stat>) -> Self {
        Self { stats }
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Statement forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stat {
    /// `a, b.c = 1, 2`
    Assign {
        targets: Vec<Expr>,
        values: Vec<Expr>,
    },
    /// `x += 1`
    CompoundAssign {
        target: Expr,
        op: CompoundOp,
        value: Expr,
    },
    /// `?a, b`
    Print(Vec<Expr>),
    /// A function or method call evaluated for its effects.
    Call(Expr),
    Do(Block),
    While {
        cond: Expr,
        body: Block,
    },
    Repeat {
        body: Block,
        cond: Expr,
    },
    If(IfChain),
    NumericFor {
        var: String,
        start: Expr,
        stop: Expr,
        step: Option<Expr>,
        body: Block,
    },
    GenericFor {
        names: Vec<String>,
        exprs: Vec<Expr>,
        body: Block,
    },
    Function {
        name: FuncName,
        body: FuncBody,
    },
    LocalFunction {
        name: String,
        body: FuncBody,
    },
    /// `local a, b`
    LocalDecl(Vec<String>),
    /// `local a, b = 1, 2`
    LocalAssign {
        names: Vec<String>,
        values: Vec<Expr>,
    },
    Return(Vec<Expr>),
    Break,
    Label(String),
    Goto(String),
}

/// An `if` statement with its `elseif` branches flattened into one ordered list.
///
/// `branches[0]` is the `if` branch; the rest are `elseif` branches in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfChain {
    pub branches: Vec<CondBlock>,
    pub default: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondBlock {
    pub cond: Expr,
    pub block: Block,
}

/// The name of a `function a.b.c:m()` definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncName {
    /// Dotted owner path; never empty.
    pub path: Vec<String>,
    pub method: Option<String>,
}

/// Parameters and body shared by function literals and definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncBody {
    pub params: Vec<String>,
    pub variadic: bool,
    pub body: Block,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// Expression forms. Literal numbers and strings keep their source spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Nil,
    True,
    False,
    Vararg,
    Number(String),
    String(String),
    Function(FuncBody),
    Table(Vec<Field>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Paren(Box<Expr>),
    Name(String),
    /// `object[key]`
    Index {
        object: Box<Expr>,
        key: Box<Expr>,
    },
    /// `object.name`
    Field {
        object: Box<Expr>,
        name: String,
    },
    Call {
        callee: Box<Expr>,
        args: Args,
    },
    MethodCall {
        object: Box<Expr>,
        method: String,
        args: Args,
    },
}

impl Expr {
    /// Whether this expression may appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Name(_) | Expr::Index { .. } | Expr::Field { .. })
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Expr::Call { .. } | Expr::MethodCall { .. })
    }

    /// Returns the variant name (for diagnostics).
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Nil => "Nil",
            Expr::True => "True",
            Expr::False => "False",
            Expr::Vararg => "Vararg",
            Expr::Number(_) => "Number",
            Expr::String(_) => "String",
            Expr::Function(_) => "Function",
            Expr::Table(_) => "Table",
            Expr::Binary { .. } => "Binary",
            Expr::Unary { .. } => "Unary",
            Expr::Paren(_) => "Paren",
            Expr::Name(_) => "Name",
            Expr::Index { .. } => "Index",
            Expr::Field { .. } => "Field",
            Expr::Call { .. } => "Call",
            Expr::MethodCall { .. } => "MethodCall",
        }
    }
}

/// Call arguments, kept in their syntactic form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Args {
    /// `f(a, b)`
    List(Vec<Expr>),
    /// `f{...}`
    Table(Vec<Field>),
    /// `f"..."`
    String(String),
}

/// Table constructor fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// `[key] = value`
    Indexed { key: Expr, value: Expr },
    /// `name = value`
    Named { name: String, value: Expr },
    Positional(Expr),
}

// ============================================================================
// OPERATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Or,
    And,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    /// `~=`
    Ne,
    /// `!=`, the PICO-8 spelling of `~=`
    BangNe,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    LShr,
    Rotl,
    Rotr,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "~=",
            BinOp::BangNe => "!=",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^^",
            BinOp::BitAnd => "&",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::LShr => ">>>",
            BinOp::Rotl => "<<>",
            BinOp::Rotr => ">><",
            BinOp::Concat => "..",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::IntDiv => "\\",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Neg,
    Not,
    Len,
    BitNot,
    /// `@addr`, peek
    Peek,
    /// `%addr`, peek2
    Peek2,
    /// `$addr`, peek4
    Peek4,
}

impl UnOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "not",
            UnOp::Len => "#",
            UnOp::BitNot => "~",
            UnOp::Peek => "@",
            UnOp::Peek2 => "%",
            UnOp::Peek4 => "$",
        }
    }
}

/// Operators accepted by compound assignment (`x op= y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompoundOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
    Concat,
    BitOr,
    BitAnd,
    BitXor,
    Shl,
    Shr,
    LShr,
    Rotl,
    Rotr,
}

impl CompoundOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompoundOp::Add => "+=",
            CompoundOp::Sub => "-=",
            CompoundOp::Mul => "*=",
            CompoundOp::Div => "/=",
            CompoundOp::IntDiv => "\\=",
            CompoundOp::Mod => "%=",
            CompoundOp::Pow => "^=",
            CompoundOp::Concat => "..=",
            CompoundOp::BitOr => "|=",
            CompoundOp::BitAnd => "&=",
            CompoundOp::BitXor => "^^=",
            CompoundOp::Shl => "<<=",
            CompoundOp::Shr => ">>=",
            CompoundOp::LShr => ">>>=",
            CompoundOp::Rotl => "<<>=",
            CompoundOp::Rotr => ">><=",
        }
    }
}
