// parser.rs

use std::mem;

use crate::ast::{
    AssignOp, BinOp, Expr, FuncDecl, FuncParam, PostfixOp, Program, Stmt, UnaryOp, VarDecl,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Recursive-descent parser with a two-token (cur/peek) window.
///
/// `expect` records a diagnostic and advances even on mismatch, so a parse
/// always terminates; a failed primary yields `IntLit(0)` as a placeholder.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let cur = lexer.next_token();
        let peek = lexer.next_token();
        Parser {
            lexer,
            cur,
            peek,
            errors: Vec::new(),
        }
    }

    fn advance(&mut self) {
        self.cur = mem::replace(&mut self.peek, self.lexer.next_token());
    }

    fn error(&mut self, msg: String) {
        self.errors.push(format!(
            "{}:{}:{}: {}",
            self.lexer.file(),
            self.cur.line,
            self.cur.col,
            msg
        ));
    }

    /// Record a diagnostic on mismatch, but advance unconditionally.
    fn expect(&mut self, kind: TokenKind) {
        if self.cur.kind != kind {
            self.error(format!(
                "expected '{}', found '{}'",
                kind.text(),
                self.cur.kind.text()
            ));
        }
        self.advance();
    }

    fn expect_ident(&mut self) -> String {
        let name = match &self.cur.kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                let found = other.text();
                self.error(format!("expected identifier, found '{}'", found));
                String::new()
            }
        };
        self.advance();
        name
    }

    pub fn parse(mut self) -> (Program, Vec<String>) {
        let mut stmts = Vec::new();
        while self.cur.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_top_level() {
                stmts.push(stmt);
            }
        }
        let mut errors = mem::take(&mut self.lexer.errors);
        errors.append(&mut self.errors);
        (Program(stmts), errors)
    }

    fn parse_top_level(&mut self) -> Option<Stmt> {
        match &self.cur.kind {
            TokenKind::Include(_) | TokenKind::Define(_) => {
                self.advance();
                None
            }
            _ => self.parse_statement(),
        }
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match &self.cur.kind {
            TokenKind::LBrace => Some(self.parse_block()),
            TokenKind::KwReturn => Some(self.parse_return()),
            TokenKind::KwIf => Some(self.parse_if()),
            TokenKind::KwWhile => Some(self.parse_while()),
            TokenKind::KwFor => Some(self.parse_for()),
            TokenKind::Semicolon => {
                self.advance();
                None
            }
            kind if kind.is_type() => Some(self.parse_declaration()),
            _ => {
                let expr = self.parse_expression();
                if self.cur.kind == TokenKind::Semicolon {
                    self.advance();
                }
                Some(Stmt::Expr(expr))
            }
        }
    }

    fn parse_block(&mut self) -> Stmt {
        self.expect(TokenKind::LBrace);
        let mut stmts = Vec::new();
        while self.cur.kind != TokenKind::RBrace && self.cur.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
        }
        self.expect(TokenKind::RBrace);
        Stmt::Block(stmts)
    }

    fn parse_return(&mut self) -> Stmt {
        self.advance(); // 'return'
        if self.cur.kind == TokenKind::Semicolon {
            self.advance();
            return Stmt::Return(None);
        }
        let value = self.parse_expression();
        if self.cur.kind == TokenKind::Semicolon {
            self.advance();
        }
        Stmt::Return(Some(value))
    }

    fn parse_if(&mut self) -> Stmt {
        self.advance(); // 'if'
        self.expect(TokenKind::LParen);
        let cond = self.parse_expression();
        self.expect(TokenKind::RParen);
        let then = self
            .parse_statement()
            .unwrap_or(Stmt::Block(Vec::new()));
        let els = if self.cur.kind == TokenKind::KwElse {
            self.advance();
            Some(Box::new(
                self.parse_statement().unwrap_or(Stmt::Block(Vec::new())),
            ))
        } else {
            None
        };
        Stmt::If(cond, Box::new(then), els)
    }

    fn parse_while(&mut self) -> Stmt {
        self.advance(); // 'while'
        self.expect(TokenKind::LParen);
        let cond = self.parse_expression();
        self.expect(TokenKind::RParen);
        let body = self
            .parse_statement()
            .unwrap_or(Stmt::Block(Vec::new()));
        Stmt::While(cond, Box::new(body))
    }

    fn parse_for(&mut self) -> Stmt {
        self.advance(); // 'for'
        self.expect(TokenKind::LParen);

        // init: a declaration consumes its own ';'
        let init = if self.cur.kind == TokenKind::Semicolon {
            self.advance();
            None
        } else if self.cur.kind.is_type() {
            Some(Box::new(self.parse_declaration()))
        } else {
            let expr = self.parse_expression();
            self.expect(TokenKind::Semicolon);
            Some(Box::new(Stmt::Expr(expr)))
        };

        let cond = if self.cur.kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(TokenKind::Semicolon);

        let post = if self.cur.kind == TokenKind::RParen {
            None
        } else {
            Some(self.parse_expression())
        };
        self.expect(TokenKind::RParen);

        let body = self
            .parse_statement()
            .unwrap_or(Stmt::Block(Vec::new()));
        Stmt::For(init, cond, post, Box::new(body))
    }

    /// Type keyword already at cur. A following '(' after the name makes this
    /// a function definition, anything else a variable declaration.
    fn parse_declaration(&mut self) -> Stmt {
        let mut type_name = self.cur.kind.text();
        self.advance();
        let mut is_ptr = false;
        while self.cur.kind == TokenKind::Star {
            type_name.push_str(" *");
            is_ptr = true;
            self.advance();
        }
        let name = self.expect_ident();

        if self.cur.kind == TokenKind::LParen {
            return self.parse_func_decl(type_name, name);
        }

        let init = if self.cur.kind == TokenKind::Assign {
            self.advance();
            Some(self.parse_expression())
        } else {
            None
        };
        if self.cur.kind == TokenKind::Semicolon {
            self.advance();
        }
        Stmt::Var(VarDecl {
            type_name,
            name,
            init,
            is_ptr,
        })
    }

    fn parse_func_decl(&mut self, ret_type: String, name: String) -> Stmt {
        self.expect(TokenKind::LParen);
        let mut params = Vec::new();
        while self.cur.kind != TokenKind::RParen && self.cur.kind != TokenKind::Eof {
            params.push(self.parse_func_param());
            if self.cur.kind == TokenKind::Comma {
                self.advance();
            }
        }
        self.expect(TokenKind::RParen);

        let mut body = Vec::new();
        if self.cur.kind == TokenKind::LBrace {
            if let Stmt::Block(stmts) = self.parse_block() {
                body = stmts;
            }
        } else {
            // forward declaration
            if self.cur.kind == TokenKind::Semicolon {
                self.advance();
            }
        }
        Stmt::Func(FuncDecl {
            ret_type,
            name,
            params,
            body,
        })
    }

    fn parse_func_param(&mut self) -> FuncParam {
        let mut type_name = if self.cur.kind.is_type() {
            let t = self.cur.kind.text();
            self.advance();
            t
        } else {
            self.error(format!(
                "expected parameter type, found '{}'",
                self.cur.kind.text()
            ));
            self.advance();
            String::new()
        };
        while self.cur.kind == TokenKind::Star {
            type_name.push_str(" *");
            self.advance();
        }
        let name = self.expect_ident();
        let default = if self.cur.kind == TokenKind::Assign {
            self.advance();
            Some(self.parse_expression())
        } else {
            None
        };
        FuncParam {
            type_name,
            name,
            default,
        }
    }

    // -- expression precedence ladder, loosest first --

    fn parse_expression(&mut self) -> Expr {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Expr {
        let lhs = self.parse_logical_or();
        let op = match self.cur.kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::AmpEq => AssignOp::And,
            TokenKind::PipeEq => AssignOp::Or,
            TokenKind::CaretEq => AssignOp::Xor,
            TokenKind::ShlEq => AssignOp::Shl,
            TokenKind::ShrEq => AssignOp::Shr,
            _ => return lhs,
        };
        self.advance();
        let rhs = self.parse_assignment(); // right-associative
        Expr::Assign(op, Box::new(lhs), Box::new(rhs))
    }

    fn parse_logical_or(&mut self) -> Expr {
        let mut lhs = self.parse_logical_and();
        while self.cur.kind == TokenKind::OrOr {
            self.advance();
            let rhs = self.parse_logical_and();
            lhs = Expr::Binary(BinOp::LogOr, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_logical_and(&mut self) -> Expr {
        let mut lhs = self.parse_bit_or();
        while self.cur.kind == TokenKind::AndAnd {
            self.advance();
            let rhs = self.parse_bit_or();
            lhs = Expr::Binary(BinOp::LogAnd, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_bit_or(&mut self) -> Expr {
        let mut lhs = self.parse_bit_xor();
        while self.cur.kind == TokenKind::Pipe {
            self.advance();
            let rhs = self.parse_bit_xor();
            lhs = Expr::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_bit_xor(&mut self) -> Expr {
        let mut lhs = self.parse_bit_and();
        while self.cur.kind == TokenKind::Caret {
            self.advance();
            let rhs = self.parse_bit_and();
            lhs = Expr::Binary(BinOp::Xor, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_bit_and(&mut self) -> Expr {
        let mut lhs = self.parse_equality();
        while self.cur.kind == TokenKind::Amp {
            self.advance();
            let rhs = self.parse_equality();
            lhs = Expr::Binary(BinOp::And, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_equality(&mut self) -> Expr {
        let mut lhs = self.parse_relational();
        loop {
            let op = match self.cur.kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::Neq => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_relational();
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_relational(&mut self) -> Expr {
        let mut lhs = self.parse_shift();
        loop {
            let op = match self.cur.kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_shift();
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_shift(&mut self) -> Expr {
        let mut lhs = self.parse_additive();
        loop {
            let op = match self.cur.kind {
                TokenKind::Shl => BinOp::Shl,
                TokenKind::Shr => BinOp::Shr,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive();
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_additive(&mut self) -> Expr {
        let mut lhs = self.parse_multiplicative();
        loop {
            let op = match self.cur.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative();
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut lhs = self.parse_power();
        loop {
            let op = match self.cur.kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_power();
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_power(&mut self) -> Expr {
        let mut lhs = self.parse_unary();
        while self.cur.kind == TokenKind::Backtick {
            self.advance();
            let rhs = self.parse_unary();
            lhs = Expr::Binary(BinOp::Pow, Box::new(lhs), Box::new(rhs));
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        let op = match self.cur.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::PlusPlus => UnaryOp::PreInc,
            TokenKind::MinusMinus => UnaryOp::PreDec,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary();
        Expr::Unary(op, Box::new(operand))
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match &self.cur.kind {
                TokenKind::LParen => {
                    // only a bare identifier can be called
                    let callee = match &expr {
                        Expr::Ident(name) => name.clone(),
                        _ => break,
                    };
                    self.advance();
                    let mut args = Vec::new();
                    while self.cur.kind != TokenKind::RParen && self.cur.kind != TokenKind::Eof {
                        args.push(self.parse_expression());
                        if self.cur.kind == TokenKind::Comma {
                            self.advance();
                        }
                    }
                    self.expect(TokenKind::RParen);
                    expr = Expr::Call(callee, args);
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression();
                    self.expect(TokenKind::RBracket);
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_ident();
                    expr = Expr::Member(Box::new(expr), field, false);
                }
                TokenKind::Arrow => {
                    self.advance();
                    let field = self.expect_ident();
                    expr = Expr::Member(Box::new(expr), field, true);
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    expr = Expr::Postfix(PostfixOp::Inc, Box::new(expr));
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    expr = Expr::Postfix(PostfixOp::Dec, Box::new(expr));
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let expr = match &self.cur.kind {
            TokenKind::Int(v) => Expr::IntLit(*v),
            TokenKind::Char(v) => Expr::IntLit(*v),
            TokenKind::Float(v) => Expr::FloatLit(*v),
            TokenKind::Str(s) => Expr::StringLit(s.clone()),
            TokenKind::Ident(name) => Expr::Ident(name.clone()),
            TokenKind::KwSizeof => {
                self.advance();
                self.expect(TokenKind::LParen);
                let type_name = self.cur.kind.text();
                self.advance();
                self.expect(TokenKind::RParen);
                return Expr::Sizeof(type_name);
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression();
                self.expect(TokenKind::RParen);
                return inner;
            }
            other => {
                let found = other.text();
                self.error(format!("unexpected token in expression: '{}'", found));
                self.advance();
                return Expr::IntLit(0);
            }
        };
        self.advance();
        expr
    }
}
