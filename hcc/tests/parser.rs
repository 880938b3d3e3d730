use hcc::ast::{AssignOp, BinOp, Expr, PostfixOp, Program, Stmt, UnaryOp};
use hcc::lexer::Lexer;
use hcc::parser::Parser;

fn parse(code: &str) -> (Program, Vec<String>) {
    let lexer = Lexer::new(code, "test.HC");
    Parser::new(lexer).parse()
}

fn parse_ok(code: &str) -> Program {
    let (program, errors) = parse(code);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    program
}

fn first_expr(program: &Program) -> &Expr {
    match &program.0[0] {
        Stmt::Expr(expr) => expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn precedence_mul_over_add() {
    let program = parse_ok("1 + 2 * 3;");
    assert_eq!(
        *first_expr(&program),
        Expr::Binary(
            BinOp::Add,
            Box::new(Expr::IntLit(1)),
            Box::new(Expr::Binary(
                BinOp::Mul,
                Box::new(Expr::IntLit(2)),
                Box::new(Expr::IntLit(3)),
            )),
        )
    );
}

#[test]
fn parens_override_precedence() {
    let program = parse_ok("(1 + 2) * 3;");
    assert_eq!(
        *first_expr(&program),
        Expr::Binary(
            BinOp::Mul,
            Box::new(Expr::Binary(
                BinOp::Add,
                Box::new(Expr::IntLit(1)),
                Box::new(Expr::IntLit(2)),
            )),
            Box::new(Expr::IntLit(3)),
        )
    );
}

#[test]
fn power_binds_tighter_than_mul_and_chains_left() {
    let program = parse_ok("2 * 3 ` 4;");
    assert_eq!(
        *first_expr(&program),
        Expr::Binary(
            BinOp::Mul,
            Box::new(Expr::IntLit(2)),
            Box::new(Expr::Binary(
                BinOp::Pow,
                Box::new(Expr::IntLit(3)),
                Box::new(Expr::IntLit(4)),
            )),
        )
    );

    let program = parse_ok("2 ` 3 ` 4;");
    assert_eq!(
        *first_expr(&program),
        Expr::Binary(
            BinOp::Pow,
            Box::new(Expr::Binary(
                BinOp::Pow,
                Box::new(Expr::IntLit(2)),
                Box::new(Expr::IntLit(3)),
            )),
            Box::new(Expr::IntLit(4)),
        )
    );
}

#[test]
fn assignment_is_right_associative() {
    let program = parse_ok("a = b = 1;");
    assert_eq!(
        *first_expr(&program),
        Expr::Assign(
            AssignOp::Assign,
            Box::new(Expr::Ident("a".to_string())),
            Box::new(Expr::Assign(
                AssignOp::Assign,
                Box::new(Expr::Ident("b".to_string())),
                Box::new(Expr::IntLit(1)),
            )),
        )
    );
}

#[test]
fn compound_assignment() {
    let program = parse_ok("x <<= 2;");
    assert_eq!(
        *first_expr(&program),
        Expr::Assign(
            AssignOp::Shl,
            Box::new(Expr::Ident("x".to_string())),
            Box::new(Expr::IntLit(2)),
        )
    );
}

#[test]
fn unary_and_postfix() {
    let program = parse_ok("-x;");
    assert_eq!(
        *first_expr(&program),
        Expr::Unary(UnaryOp::Neg, Box::new(Expr::Ident("x".to_string())))
    );

    let program = parse_ok("x++;");
    assert_eq!(
        *first_expr(&program),
        Expr::Postfix(PostfixOp::Inc, Box::new(Expr::Ident("x".to_string())))
    );

    let program = parse_ok("++x;");
    assert_eq!(
        *first_expr(&program),
        Expr::Unary(UnaryOp::PreInc, Box::new(Expr::Ident("x".to_string())))
    );
}

#[test]
fn call_index_member() {
    let program = parse_ok("MulMod(2, 3, 5);");
    assert_eq!(
        *first_expr(&program),
        Expr::Call(
            "MulMod".to_string(),
            vec![Expr::IntLit(2), Expr::IntLit(3), Expr::IntLit(5)],
        )
    );

    let program = parse_ok("a[1].f->g;");
    assert_eq!(
        *first_expr(&program),
        Expr::Member(
            Box::new(Expr::Member(
                Box::new(Expr::Index(
                    Box::new(Expr::Ident("a".to_string())),
                    Box::new(Expr::IntLit(1)),
                )),
                "f".to_string(),
                false,
            )),
            "g".to_string(),
            true,
        )
    );
}

#[test]
fn sizeof_takes_a_type_name() {
    let program = parse_ok("sizeof(U32);");
    assert_eq!(*first_expr(&program), Expr::Sizeof("U32".to_string()));
}

#[test]
fn var_decl_with_pointer_and_init() {
    let program = parse_ok("U8 *p = 0;");
    match &program.0[0] {
        Stmt::Var(decl) => {
            assert_eq!(decl.type_name, "U8 *");
            assert_eq!(decl.name, "p");
            assert!(decl.is_ptr);
            assert_eq!(decl.init, Some(Expr::IntLit(0)));
        }
        other => panic!("expected var decl, got {:?}", other),
    }
}

#[test]
fn func_decl_with_params_and_default() {
    let program = parse_ok("U64 F(U64 a, U64 b=7) { return a; }");
    match &program.0[0] {
        Stmt::Func(func) => {
            assert_eq!(func.ret_type, "U64");
            assert_eq!(func.name, "F");
            assert_eq!(func.params.len(), 2);
            assert_eq!(func.params[0].name, "a");
            assert_eq!(func.params[1].default, Some(Expr::IntLit(7)));
            assert_eq!(func.body.len(), 1);
            assert_eq!(
                func.body[0],
                Stmt::Return(Some(Expr::Ident("a".to_string())))
            );
        }
        other => panic!("expected func decl, got {:?}", other),
    }
}

#[test]
fn control_flow_statements() {
    let program = parse_ok("if (1) { 2; } else { 3; }");
    match &program.0[0] {
        Stmt::If(cond, then, els) => {
            assert_eq!(*cond, Expr::IntLit(1));
            assert_eq!(**then, Stmt::Block(vec![Stmt::Expr(Expr::IntLit(2))]));
            assert_eq!(
                els.as_deref(),
                Some(&Stmt::Block(vec![Stmt::Expr(Expr::IntLit(3))]))
            );
        }
        other => panic!("expected if, got {:?}", other),
    }

    let program = parse_ok("while (x < 10) x++;");
    assert!(matches!(&program.0[0], Stmt::While(..)));

    let program = parse_ok("for (U64 i = 0; i < 3; i++) { i; }");
    match &program.0[0] {
        Stmt::For(init, cond, post, _) => {
            assert!(matches!(init.as_deref(), Some(Stmt::Var(_))));
            assert!(cond.is_some());
            assert!(post.is_some());
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn directives_are_skipped() {
    let program = parse_ok("#include \"Lib.HC\"\n#define MAX 100\n1;");
    assert_eq!(program.0.len(), 1);
    assert_eq!(*first_expr(&program), Expr::IntLit(1));
}

#[test]
fn bad_primary_becomes_zero_placeholder() {
    let (program, errors) = parse("1 + ;");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("unexpected token in expression"));
    assert_eq!(
        *first_expr(&program),
        Expr::Binary(
            BinOp::Add,
            Box::new(Expr::IntLit(1)),
            Box::new(Expr::IntLit(0)),
        )
    );
}

#[test]
fn errors_carry_file_line_col() {
    let (_, errors) = parse("U64 = 1;");
    assert!(!errors.is_empty());
    assert!(errors[0].starts_with("test.HC:1:"));
}

#[test]
fn parse_always_terminates_on_garbage() {
    let (_, errors) = parse("U64 F(U64 { ) } ;;; @@@");
    assert!(!errors.is_empty());
}

#[test]
fn lexer_errors_come_first() {
    let (_, errors) = parse("@\n1 + ;");
    assert!(errors.len() >= 2);
    assert!(errors[0].contains("unexpected character"));
}
