use hcc::lexer::Lexer;
use hcc::token::TokenKind;

fn scan(code: &str) -> (Vec<TokenKind>, Vec<String>) {
    let mut lexer = Lexer::new(code, "test.HC");
    let mut kinds = Vec::new();
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }
        kinds.push(token.kind);
    }
    (kinds, lexer.errors)
}

fn case(code: &str, expects: Vec<TokenKind>) {
    let (kinds, errors) = scan(code);
    println!(" {code}");
    for (idx, kind) in kinds.iter().enumerate() {
        println!("{:>2}: {:?}", idx, kind);
    }
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    assert_eq!(kinds, expects);
}

#[test]
fn literals() {
    use TokenKind::*;
    case("42 0x2A 0b101010", vec![Int(42), Int(42), Int(42)]);
    case("3.14 1e3 2.5e-1", vec![Float(3.14), Float(1000.0), Float(0.25)]);
    case("0", vec![Int(0)]);
}

#[test]
fn char_constants_pack_little_endian() {
    use TokenKind::*;
    case("'A'", vec![Char(0x41)]);
    case("'AB'", vec![Char(0x4241)]);
    case("'\\n'", vec![Char(10)]);
}

#[test]
fn strings_and_escapes() {
    use TokenKind::*;
    case(r#""hello""#, vec![Str("hello".to_string())]);
    case(r#""a\nb\t\"c\"""#, vec![Str("a\nb\t\"c\"".to_string())]);
    // unknown escape keeps the backslash
    case(r#""\q""#, vec![Str("\\q".to_string())]);
}

#[test]
fn unterminated_string_still_terminates() {
    let (kinds, errors) = scan("\"never closed");
    assert_eq!(kinds, vec![TokenKind::Str("never closed".to_string())]);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("unterminated string"));
}

#[test]
fn keywords_vs_identifiers() {
    use TokenKind::*;
    case(
        "U64 x if foo return Bool",
        vec![
            KwU64,
            Ident("x".to_string()),
            KwIf,
            Ident("foo".to_string()),
            KwReturn,
            KwBool,
        ],
    );
}

#[test]
fn operators_maximal_munch() {
    use TokenKind::*;
    case("<<= >>= << >> <= >= == != && || ...", vec![
        ShlEq, ShrEq, Shl, Shr, Le, Ge, EqEq, Neq, AndAnd, OrOr, Ellipsis,
    ]);
    case("++ -- += -= -> - .", vec![
        PlusPlus, MinusMinus, PlusEq, MinusEq, Arrow, Minus, Dot,
    ]);
    case("a`b", vec![Ident("a".to_string()), Backtick, Ident("b".to_string())]);
}

#[test]
fn comments_nest() {
    use TokenKind::*;
    case("1 /* outer /* inner */ still comment */ 2", vec![Int(1), Int(2)]);
    case("1 // to end of line\n2", vec![Int(1), Int(2)]);
}

#[test]
fn unterminated_block_comment_reports_once() {
    let (kinds, errors) = scan("1 /* no close");
    assert_eq!(kinds, vec![TokenKind::Int(1)]);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("unterminated block comment"));
}

#[test]
fn directives() {
    use TokenKind::*;
    case(
        "#include \"Lib.HC\"\n#define MAX 100\n1",
        vec![
            Include("Lib.HC".to_string()),
            Define("MAX".to_string()),
            Int(1),
        ],
    );
}

#[test]
fn unknown_character_is_skipped_with_error() {
    let (kinds, errors) = scan("1 @ 2");
    assert_eq!(kinds, vec![TokenKind::Int(1), TokenKind::Int(2)]);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("unexpected character: '@'"));
}

#[test]
fn positions_are_one_based_lines() {
    let mut lexer = Lexer::new("a\n  b", "pos.HC");
    let a = lexer.next_token();
    assert_eq!(a.line, 1);
    let b = lexer.next_token();
    assert_eq!(b.line, 2);
    assert_eq!(b.col, 3);
}

#[test]
fn lexing_is_deterministic() {
    let src = "U64 x = 0x10; /* c */ x += 'A';";
    let first = scan(src);
    let second = scan(src);
    assert_eq!(first, second);
}
