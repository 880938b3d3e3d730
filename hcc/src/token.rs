// token.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, col: usize) -> Self {
        Token { kind, line, col }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Eof,

    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    Char(i64), // up to 8 bytes packed little-endian
    Ident(String),

    // Preprocessor directives (recognized, value discarded)
    Include(String),
    Define(String),

    // Type keywords
    KwU0,
    KwU8,
    KwU16,
    KwU32,
    KwU64,
    KwI8,
    KwI16,
    KwI32,
    KwI64,
    KwF64,
    KwBool,

    // Keywords
    KwIf,
    KwElse,
    KwWhile,
    KwDo,
    KwFor,
    KwSwitch,
    KwCase,
    KwDefault,
    KwBreak,
    KwReturn,
    KwClass,
    KwUnion,
    KwPublic,
    KwExtern,
    KwStatic,
    KwSizeof,
    KwTry,
    KwCatch,
    KwGoto,

    // Operators
    Plus,       // '+'
    Minus,      // '-'
    Star,       // '*'
    Slash,      // '/'
    Percent,    // '%'
    Amp,        // '&'
    Pipe,       // '|'
    Caret,      // '^'
    Tilde,      // '~'
    Bang,       // '!'
    Lt,         // '<'
    Gt,         // '>'
    Assign,     // '='
    Dot,        // '.'
    Arrow,      // '->'
    PlusPlus,   // '++'
    MinusMinus, // '--'
    Shl,        // '<<'
    Shr,        // '>>'
    EqEq,       // '=='
    Neq,        // '!='
    Le,         // '<='
    Ge,         // '>='
    AndAnd,     // '&&'
    OrOr,       // '||'
    PlusEq,     // '+='
    MinusEq,    // '-='
    StarEq,     // '*='
    SlashEq,    // '/='
    PercentEq,  // '%='
    AmpEq,      // '&='
    PipeEq,     // '|='
    CaretEq,    // '^='
    ShlEq,      // '<<='
    ShrEq,      // '>>='
    Backtick,   // '`' (power)
    Ellipsis,   // '...'

    // Delimiters
    LParen,    // '('
    RParen,    // ')'
    LBracket,  // '['
    RBracket,  // ']'
    LBrace,    // '{'
    RBrace,    // '}'
    Semicolon, // ';'
    Comma,     // ','
    Colon,     // ':'
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    HashMap::from([
        ("U0", KwU0),
        ("U8", KwU8),
        ("U16", KwU16),
        ("U32", KwU32),
        ("U64", KwU64),
        ("I8", KwI8),
        ("I16", KwI16),
        ("I32", KwI32),
        ("I64", KwI64),
        ("F64", KwF64),
        ("Bool", KwBool),
        ("if", KwIf),
        ("else", KwElse),
        ("while", KwWhile),
        ("do", KwDo),
        ("for", KwFor),
        ("switch", KwSwitch),
        ("case", KwCase),
        ("default", KwDefault),
        ("break", KwBreak),
        ("return", KwReturn),
        ("class", KwClass),
        ("union", KwUnion),
        ("public", KwPublic),
        ("extern", KwExtern),
        ("static", KwStatic),
        ("sizeof", KwSizeof),
        ("try", KwTry),
        ("catch", KwCatch),
        ("goto", KwGoto),
    ])
});

/// Keyword table lookup; anything unlisted is a plain identifier.
pub fn lookup_ident(ident: &str) -> TokenKind {
    match KEYWORDS.get(ident) {
        Some(kind) => kind.clone(),
        None => TokenKind::Ident(ident.to_string()),
    }
}

impl TokenKind {
    pub fn is_type(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwU0 | KwU8 | KwU16 | KwU32 | KwU64 | KwI8 | KwI16 | KwI32 | KwI64 | KwF64 | KwBool
        )
    }

    /// Source spelling, used for diagnostics and for type names.
    pub fn text(&self) -> String {
        use TokenKind::*;
        let s = match self {
            Eof => "<eof>",
            Int(v) => return v.to_string(),
            Float(v) => return v.to_string(),
            Str(s) => return s.clone(),
            Char(v) => return v.to_string(),
            Ident(name) => return name.clone(),
            Include(path) => return path.clone(),
            Define(name) => return name.clone(),
            KwU0 => "U0",
            KwU8 => "U8",
            KwU16 => "U16",
            KwU32 => "U32",
            KwU64 => "U64",
            KwI8 => "I8",
            KwI16 => "I16",
            KwI32 => "I32",
            KwI64 => "I64",
            KwF64 => "F64",
            KwBool => "Bool",
            KwIf => "if",
            KwElse => "else",
            KwWhile => "while",
            KwDo => "do",
            KwFor => "for",
            KwSwitch => "switch",
            KwCase => "case",
            KwDefault => "default",
            KwBreak => "break",
            KwReturn => "return",
            KwClass => "class",
            KwUnion => "union",
            KwPublic => "public",
            KwExtern => "extern",
            KwStatic => "static",
            KwSizeof => "sizeof",
            KwTry => "try",
            KwCatch => "catch",
            KwGoto => "goto",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Tilde => "~",
            Bang => "!",
            Lt => "<",
            Gt => ">",
            Assign => "=",
            Dot => ".",
            Arrow => "->",
            PlusPlus => "++",
            MinusMinus => "--",
            Shl => "<<",
            Shr => ">>",
            EqEq => "==",
            Neq => "!=",
            Le => "<=",
            Ge => ">=",
            AndAnd => "&&",
            OrOr => "||",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            ShlEq => "<<=",
            ShrEq => ">>=",
            Backtick => "`",
            Ellipsis => "...",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            LBrace => "{",
            RBrace => "}",
            Semicolon => ";",
            Comma => ",",
            Colon => ":",
        };
        s.to_string()
    }
}
