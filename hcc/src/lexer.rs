// lexer.rs

use crate::token::{lookup_ident, Token, TokenKind};

/// Byte cursor over the source with 1-based line / 0-based column tracking.
/// Malformed input never aborts the scan: an error is recorded and the
/// offending byte is skipped.
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    ch: u8,
    file: &'a str,
    pub errors: Vec<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, file: &'a str) -> Self {
        let mut lexer = Lexer {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
            col: 0,
            ch: 0,
            file,
            errors: Vec::new(),
        };
        lexer.advance();
        lexer
    }

    pub fn file(&self) -> &'a str {
        self.file
    }

    fn advance(&mut self) {
        if self.pos < self.src.len() {
            self.ch = self.src[self.pos];
            self.pos += 1;
            self.col += 1;
            if self.ch == b'\n' {
                self.line += 1;
                self.col = 0;
            }
        } else {
            self.ch = 0;
        }
    }

    fn peek(&self) -> u8 {
        if self.pos < self.src.len() {
            self.src[self.pos]
        } else {
            0
        }
    }

    fn error(&mut self, line: usize, col: usize, msg: String) {
        self.errors
            .push(format!("{}:{}:{}: {}", self.file, line, col, msg));
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let line = self.line;
            let col = self.col;

            if self.ch == 0 {
                return Token::new(TokenKind::Eof, line, col);
            }

            // comments
            if self.ch == b'/' && self.peek() == b'/' {
                while self.ch != b'\n' && self.ch != 0 {
                    self.advance();
                }
                continue;
            }
            if self.ch == b'/' && self.peek() == b'*' {
                self.skip_block_comment();
                continue;
            }

            if self.ch == b'#' {
                match self.read_directive() {
                    Some(kind) => return Token::new(kind, line, col),
                    None => continue,
                }
            }

            if self.ch.is_ascii_digit() {
                let kind = self.read_number();
                return Token::new(kind, line, col);
            }
            if self.ch.is_ascii_alphabetic() || self.ch == b'_' {
                let kind = self.read_ident();
                return Token::new(kind, line, col);
            }
            if self.ch == b'"' {
                let kind = self.read_string();
                return Token::new(kind, line, col);
            }
            if self.ch == b'\'' {
                let kind = self.read_char();
                return Token::new(kind, line, col);
            }

            if let Some(kind) = self.operator() {
                return Token::new(kind, line, col);
            }

            let c = self.ch;
            self.error(
                line,
                col,
                format!("unexpected character: '{}' (0x{:02X})", c as char, c),
            );
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.ch == b' ' || self.ch == b'\t' || self.ch == b'\r' || self.ch == b'\n' {
            self.advance();
        }
    }

    /// Block comments nest: each `/*` bumps the depth, each `*/` drops it.
    fn skip_block_comment(&mut self) {
        let line = self.line;
        let col = self.col;
        self.advance(); // '/'
        self.advance(); // '*'
        let mut depth = 1;
        while depth > 0 {
            if self.ch == 0 {
                self.error(line, col, "unterminated block comment".to_string());
                return;
            }
            if self.ch == b'/' && self.peek() == b'*' {
                depth += 1;
                self.advance();
                self.advance();
            } else if self.ch == b'*' && self.peek() == b'/' {
                depth -= 1;
                self.advance();
                self.advance();
            } else {
                self.advance();
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        if self.ch == b'0' && (self.peek() == b'x' || self.peek() == b'X') {
            self.advance();
            self.advance();
            let mut val: i64 = 0;
            while self.ch.is_ascii_hexdigit() {
                let d = (self.ch as char).to_digit(16).unwrap_or(0) as i64;
                val = (val << 4) | d;
                self.advance();
            }
            return TokenKind::Int(val);
        }
        if self.ch == b'0' && (self.peek() == b'b' || self.peek() == b'B') {
            self.advance();
            self.advance();
            let mut val: i64 = 0;
            while self.ch == b'0' || self.ch == b'1' {
                val = (val << 1) | i64::from(self.ch - b'0');
                self.advance();
            }
            return TokenKind::Int(val);
        }

        let mut lit = String::new();
        let mut is_float = false;
        while self.ch.is_ascii_digit() {
            lit.push(self.ch as char);
            self.advance();
        }
        if self.ch == b'.' && self.peek().is_ascii_digit() {
            is_float = true;
            lit.push('.');
            self.advance();
            while self.ch.is_ascii_digit() {
                lit.push(self.ch as char);
                self.advance();
            }
        }
        if self.ch == b'e' || self.ch == b'E' {
            let next = self.peek();
            if next.is_ascii_digit() || next == b'+' || next == b'-' {
                is_float = true;
                lit.push('e');
                self.advance();
                if self.ch == b'+' || self.ch == b'-' {
                    lit.push(self.ch as char);
                    self.advance();
                }
                while self.ch.is_ascii_digit() {
                    lit.push(self.ch as char);
                    self.advance();
                }
            }
        }

        if is_float {
            TokenKind::Float(lit.parse::<f64>().unwrap_or(0.0))
        } else {
            let mut val: i64 = 0;
            for c in lit.bytes() {
                val = val.wrapping_mul(10).wrapping_add(i64::from(c - b'0'));
            }
            TokenKind::Int(val)
        }
    }

    fn read_ident(&mut self) -> TokenKind {
        let mut name = String::new();
        while self.ch.is_ascii_alphanumeric() || self.ch == b'_' {
            name.push(self.ch as char);
            self.advance();
        }
        lookup_ident(&name)
    }

    fn read_string(&mut self) -> TokenKind {
        let line = self.line;
        let col = self.col;
        self.advance(); // opening '"'
        let mut s = String::new();
        while self.ch != b'"' {
            if self.ch == 0 {
                self.error(line, col, "unterminated string literal".to_string());
                return TokenKind::Str(s);
            }
            if self.ch == b'\\' {
                self.advance();
                match self.ch {
                    b'n' => s.push('\n'),
                    b't' => s.push('\t'),
                    b'r' => s.push('\r'),
                    b'\\' => s.push('\\'),
                    b'"' => s.push('"'),
                    b'0' => s.push('\0'),
                    0 => {
                        self.error(line, col, "unterminated string literal".to_string());
                        return TokenKind::Str(s);
                    }
                    // unknown escape: keep the backslash and the character
                    c => {
                        s.push('\\');
                        s.push(c as char);
                    }
                }
                self.advance();
            } else {
                s.push(self.ch as char);
                self.advance();
            }
        }
        self.advance(); // closing '"'
        TokenKind::Str(s)
    }

    /// Character constants pack up to 8 bytes little-endian into an i64,
    /// so 'AB' is 0x4241.
    fn read_char(&mut self) -> TokenKind {
        let line = self.line;
        let col = self.col;
        self.advance(); // opening '\''
        let mut val: i64 = 0;
        let mut shift = 0u32;
        while self.ch != b'\'' {
            if self.ch == 0 {
                self.error(line, col, "unterminated character literal".to_string());
                return TokenKind::Char(val);
            }
            let b = if self.ch == b'\\' {
                self.advance();
                match self.ch {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'\\' => b'\\',
                    b'\'' => b'\'',
                    b'0' => 0,
                    c => c,
                }
            } else {
                self.ch
            };
            if shift < 64 {
                val |= i64::from(b) << shift;
                shift += 8;
            }
            self.advance();
        }
        self.advance(); // closing '\''
        TokenKind::Char(val)
    }

    /// `#include "path"` and `#define NAME value` are recognized so the
    /// parser can skip them; any other directive is discarded to end of line.
    fn read_directive(&mut self) -> Option<TokenKind> {
        self.advance(); // '#'
        let mut name = String::new();
        while self.ch.is_ascii_alphabetic() {
            name.push(self.ch as char);
            self.advance();
        }
        match name.as_str() {
            "include" => {
                self.skip_spaces_in_line();
                let mut path = String::new();
                if self.ch == b'"' || self.ch == b'<' {
                    let close = if self.ch == b'"' { b'"' } else { b'>' };
                    self.advance();
                    while self.ch != close && self.ch != b'\n' && self.ch != 0 {
                        path.push(self.ch as char);
                        self.advance();
                    }
                    if self.ch == close {
                        self.advance();
                    }
                }
                Some(TokenKind::Include(path))
            }
            "define" => {
                self.skip_spaces_in_line();
                let mut macro_name = String::new();
                while self.ch.is_ascii_alphanumeric() || self.ch == b'_' {
                    macro_name.push(self.ch as char);
                    self.advance();
                }
                // replacement text is discarded
                while self.ch != b'\n' && self.ch != 0 {
                    self.advance();
                }
                Some(TokenKind::Define(macro_name))
            }
            _ => {
                while self.ch != b'\n' && self.ch != 0 {
                    self.advance();
                }
                None
            }
        }
    }

    fn skip_spaces_in_line(&mut self) {
        while self.ch == b' ' || self.ch == b'\t' {
            self.advance();
        }
    }

    /// Maximal-munch operator and delimiter scan.
    fn operator(&mut self) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match self.ch {
            b'+' => match self.peek() {
                b'+' => {
                    self.advance();
                    PlusPlus
                }
                b'=' => {
                    self.advance();
                    PlusEq
                }
                _ => Plus,
            },
            b'-' => match self.peek() {
                b'-' => {
                    self.advance();
                    MinusMinus
                }
                b'=' => {
                    self.advance();
                    MinusEq
                }
                b'>' => {
                    self.advance();
                    Arrow
                }
                _ => Minus,
            },
            b'*' => {
                if self.peek() == b'=' {
                    self.advance();
                    StarEq
                } else {
                    Star
                }
            }
            b'/' => {
                if self.peek() == b'=' {
                    self.advance();
                    SlashEq
                } else {
                    Slash
                }
            }
            b'%' => {
                if self.peek() == b'=' {
                    self.advance();
                    PercentEq
                } else {
                    Percent
                }
            }
            b'&' => match self.peek() {
                b'&' => {
                    self.advance();
                    AndAnd
                }
                b'=' => {
                    self.advance();
                    AmpEq
                }
                _ => Amp,
            },
            b'|' => match self.peek() {
                b'|' => {
                    self.advance();
                    OrOr
                }
                b'=' => {
                    self.advance();
                    PipeEq
                }
                _ => Pipe,
            },
            b'^' => {
                if self.peek() == b'=' {
                    self.advance();
                    CaretEq
                } else {
                    Caret
                }
            }
            b'~' => Tilde,
            b'!' => {
                if self.peek() == b'=' {
                    self.advance();
                    Neq
                } else {
                    Bang
                }
            }
            b'<' => match self.peek() {
                b'<' => {
                    self.advance();
                    if self.peek() == b'=' {
                        self.advance();
                        ShlEq
                    } else {
                        Shl
                    }
                }
                b'=' => {
                    self.advance();
                    Le
                }
                _ => Lt,
            },
            b'>' => match self.peek() {
                b'>' => {
                    self.advance();
                    if self.peek() == b'=' {
                        self.advance();
                        ShrEq
                    } else {
                        Shr
                    }
                }
                b'=' => {
                    self.advance();
                    Ge
                }
                _ => Gt,
            },
            b'=' => {
                if self.peek() == b'=' {
                    self.advance();
                    EqEq
                } else {
                    Assign
                }
            }
            b'.' => {
                if self.peek() == b'.' {
                    self.advance();
                    if self.peek() == b'.' {
                        self.advance();
                        Ellipsis
                    } else {
                        // '..' is not a token; collapse to a single dot
                        Dot
                    }
                } else {
                    Dot
                }
            }
            b'`' => Backtick,
            b'(' => LParen,
            b')' => RParen,
            b'[' => LBracket,
            b']' => RBracket,
            b'{' => LBrace,
            b'}' => RBrace,
            b';' => Semicolon,
            b',' => Comma,
            b':' => Colon,
            _ => return None,
        };
        self.advance();
        Some(kind)
    }
}
