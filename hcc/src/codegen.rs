// codegen.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

use isa::{Inst, Opcode};

use crate::ast::{BinOp, Expr, Program, Stmt, UnaryOp};

struct Builtin {
    op: Opcode,
    arity: usize,
}

/// Intrinsic functions that lower directly to a single opcode. Arguments are
/// generated left to right, so they sit on the stack in call order.
static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    use Opcode::*;
    HashMap::from([
        ("Add", Builtin { op: ADD, arity: 2 }),
        ("Mul", Builtin { op: MUL, arity: 2 }),
        ("Sub", Builtin { op: SUB, arity: 2 }),
        ("Div", Builtin { op: DIV, arity: 2 }),
        ("SDiv", Builtin { op: SDIV, arity: 2 }),
        ("Mod", Builtin { op: MOD, arity: 2 }),
        ("SMod", Builtin { op: SMOD, arity: 2 }),
        ("AddMod", Builtin { op: ADDMOD, arity: 3 }),
        ("MulMod", Builtin { op: MULMOD, arity: 3 }),
        ("Exp", Builtin { op: EXP, arity: 2 }),
        ("SignExtend", Builtin { op: SIGNEXTEND, arity: 2 }),
        ("MulHi", Builtin { op: MULHI, arity: 2 }),
        ("ModExp", Builtin { op: MODEXP, arity: 3 }),
        ("AddCarry", Builtin { op: ADDCARRY, arity: 3 }),
        ("FixMul18", Builtin { op: FIXMUL18, arity: 2 }),
        ("Clz", Builtin { op: CLZ, arity: 1 }),
        ("FixDiv18", Builtin { op: FIXDIV18, arity: 2 }),
        ("Hash", Builtin { op: HASH, arity: 2 }),
        ("Rol", Builtin { op: ROL, arity: 2 }),
        ("Ror", Builtin { op: ROR, arity: 2 }),
        ("Popcnt", Builtin { op: POPCNT, arity: 1 }),
        ("Bswap", Builtin { op: BSWAP, arity: 1 }),
    ])
});

/// Stack-machine emitter. Walks the AST and appends instructions; problems
/// are recorded as diagnostics rather than aborting, so one bad expression
/// does not lose the rest of the program.
pub struct CodeGen {
    code: Vec<Inst>,
    errors: Vec<String>,
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGen {
    pub fn new() -> Self {
        CodeGen {
            code: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn generate(mut self, program: &Program) -> (Vec<Inst>, Vec<String>) {
        for stmt in &program.0 {
            self.gen_stmt(stmt);
        }
        self.emit(Opcode::STOP);
        (self.code, self.errors)
    }

    fn emit(&mut self, op: Opcode) {
        self.code.push(Inst::op(op));
    }

    fn push(&mut self, val: i64) {
        self.code.push(Inst::push(val));
    }

    fn error(&mut self, msg: String) {
        self.errors.push(format!("codegen: {}", msg));
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.gen_expr(expr),
            Stmt::Var(decl) => {
                if let Some(init) = &decl.init {
                    self.gen_expr(init);
                }
            }
            // Return writes the value to memory word 0 and returns those
            // 8 bytes; an empty return yields zero-length data.
            Stmt::Return(value) => match value {
                Some(expr) => {
                    self.gen_expr(expr);
                    self.push(0);
                    self.emit(Opcode::MSTORE);
                    self.push(8);
                    self.push(0);
                    self.emit(Opcode::RETURN);
                }
                None => {
                    self.push(0);
                    self.push(0);
                    self.emit(Opcode::RETURN);
                }
            },
            // No branch opcodes are emitted yet: condition and bodies are
            // generated straight-line.
            Stmt::If(cond, then, els) => {
                self.gen_expr(cond);
                self.gen_stmt(then);
                if let Some(els) = els {
                    self.gen_stmt(els);
                }
            }
            Stmt::While(cond, body) => {
                self.gen_expr(cond);
                self.gen_stmt(body);
            }
            Stmt::For(init, cond, post, body) => {
                if let Some(init) = init {
                    self.gen_stmt(init);
                }
                if let Some(cond) = cond {
                    self.gen_expr(cond);
                }
                self.gen_stmt(body);
                if let Some(post) = post {
                    self.gen_expr(post);
                }
            }
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.gen_stmt(s);
                }
            }
            Stmt::Func(decl) => {
                for s in &decl.body {
                    self.gen_stmt(s);
                }
            }
        }
    }

    fn gen_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::IntLit(v) => self.push(*v),
            Expr::FloatLit(v) => self.push(*v as i64),
            // no data section yet, so strings and identifiers load zero
            Expr::StringLit(_) => self.push(0),
            Expr::Ident(_) => self.push(0),
            Expr::Binary(op, lhs, rhs) => self.gen_binary(*op, lhs, rhs),
            Expr::Unary(op, operand) => self.gen_unary(*op, operand),
            // postfix value is the operand before modification
            Expr::Postfix(_, operand) => self.gen_expr(operand),
            // no variable storage yet: the assigned value is the result
            Expr::Assign(_, _, rhs) => self.gen_expr(rhs),
            Expr::Call(name, args) => self.gen_call(name, args),
            Expr::Index(array, index) => {
                self.gen_expr(array);
                self.gen_expr(index);
            }
            Expr::Member(object, _, _) => self.gen_expr(object),
            Expr::Cast(inner, _) => self.gen_expr(inner),
            Expr::Sizeof(type_name) => {
                let size = type_size(type_name);
                self.push(size);
            }
        }
    }

    fn gen_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) {
        self.gen_expr(lhs);
        self.gen_expr(rhs);
        match op {
            BinOp::Add => self.emit(Opcode::ADD),
            BinOp::Sub => self.emit(Opcode::SUB),
            BinOp::Mul => self.emit(Opcode::MUL),
            BinOp::Div => self.emit(Opcode::SDIV),
            BinOp::Mod => self.emit(Opcode::SMOD),
            BinOp::Pow => self.emit(Opcode::EXP),
            BinOp::And => self.emit(Opcode::AND),
            BinOp::Or => self.emit(Opcode::OR),
            BinOp::Xor => self.emit(Opcode::XOR),
            BinOp::Shl => self.emit(Opcode::SHL),
            // '>>' is the unsigned shift; SAR stays reserved for a
            // future signed form
            BinOp::Shr => self.emit(Opcode::SHR),
            BinOp::Lt => self.emit(Opcode::SLT),
            BinOp::Gt => self.emit(Opcode::SGT),
            BinOp::Eq => self.emit(Opcode::EQ),
            BinOp::Ne => {
                self.emit(Opcode::EQ);
                self.emit(Opcode::ISZERO);
            }
            BinOp::Le => {
                self.emit(Opcode::SGT);
                self.emit(Opcode::ISZERO);
            }
            BinOp::Ge => {
                self.emit(Opcode::SLT);
                self.emit(Opcode::ISZERO);
            }
            // normalize both operands to 0/1, then AND
            BinOp::LogAnd => {
                self.emit(Opcode::ISZERO);
                self.emit(Opcode::ISZERO);
                self.emit(Opcode::SWAP1);
                self.emit(Opcode::ISZERO);
                self.emit(Opcode::ISZERO);
                self.emit(Opcode::AND);
            }
            // OR then normalize to 0/1
            BinOp::LogOr => {
                self.emit(Opcode::OR);
                self.emit(Opcode::ISZERO);
                self.emit(Opcode::ISZERO);
            }
        }
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr) {
        match op {
            // 0 - x
            UnaryOp::Neg => {
                self.gen_expr(operand);
                self.push(0);
                self.emit(Opcode::SWAP1);
                self.emit(Opcode::SUB);
            }
            UnaryOp::BitNot => {
                self.gen_expr(operand);
                self.emit(Opcode::NOT);
            }
            UnaryOp::Not => {
                self.gen_expr(operand);
                self.emit(Opcode::ISZERO);
            }
            UnaryOp::PreInc => {
                self.gen_expr(operand);
                self.push(1);
                self.emit(Opcode::ADD);
            }
            UnaryOp::PreDec => {
                self.gen_expr(operand);
                self.push(1);
                self.emit(Opcode::SUB);
            }
        }
    }

    fn gen_call(&mut self, name: &str, args: &[Expr]) {
        match BUILTINS.get(name) {
            Some(builtin) => {
                if args.len() != builtin.arity {
                    self.error(format!(
                        "builtin '{}' expects {} argument(s), got {}",
                        name,
                        builtin.arity,
                        args.len()
                    ));
                    return;
                }
                for arg in args {
                    self.gen_expr(arg);
                }
                self.emit(builtin.op);
            }
            None => {
                self.error(format!(
                    "function '{}' is not a builtin (no CALL opcode in current set)",
                    name
                ));
                for arg in args {
                    self.gen_expr(arg);
                }
            }
        }
    }
}

/// Size in bytes of a named type; pointer suffixes are stripped first, so
/// "U8 *" sizes as U8. Unknown names default to the word size.
fn type_size(name: &str) -> i64 {
    let base = name.trim_end_matches(|c| c == ' ' || c == '*');
    match base {
        "U0" | "I0" => 0,
        "U8" | "I8" | "Bool" => 1,
        "U16" | "I16" => 2,
        "U32" | "I32" => 4,
        "U64" | "I64" | "F64" => 8,
        _ => 8,
    }
}
