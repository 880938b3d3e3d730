// ast.rs

#[derive(Debug, Clone, PartialEq)]
pub struct Program(pub Vec<Stmt>);

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Var(VarDecl),
    Return(Option<Expr>),
    If(Expr, Box<Stmt>, Option<Box<Stmt>>), // cond, then, else
    While(Expr, Box<Stmt>),
    For(Option<Box<Stmt>>, Option<Expr>, Option<Expr>, Box<Stmt>), // init, cond, post, body
    Block(Vec<Stmt>),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub type_name: String,
    pub name: String,
    pub init: Option<Expr>,
    pub is_ptr: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub ret_type: String,
    pub name: String,
    pub params: Vec<FuncParam>,
    pub body: Vec<Stmt>,
}

/// Parameter defaults are parsed but carry no codegen meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncParam {
    pub type_name: String,
    pub name: String,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    Ident(String),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Postfix(PostfixOp, Box<Expr>),
    Assign(AssignOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    Index(Box<Expr>, Box<Expr>),
    Member(Box<Expr>, String, bool), // object, field, is_arrow
    Cast(Box<Expr>, String),
    Sizeof(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow, // backtick
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    LogAnd,
    LogOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    BitNot,
    Not,
    PreInc,
    PreDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Shl,
    Shr,
}
