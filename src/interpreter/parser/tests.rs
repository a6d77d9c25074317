use pretty_assertions::assert_eq;
use proptest::prelude::*;
use super::*;

fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    (program, parser.errors().to_vec())
}

fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "parser errors for {:?}: {:?}", source, errors);
    program
}

fn single_expression(source: &str) -> Expression {
    let mut program = parse_ok(source);
    assert_eq!(program.statements.len(), 1, "expected one statement in {:?}", source);

    match program.statements.remove(0) {
        Statement::Expression(expression) => expression,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

mod statements {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn test_let_statements() {
        let program = parse_ok("let x = 5; let y = true; let foobar = y;");

        let expected = [("x", "5"), ("y", "true"), ("foobar", "y")];
        assert_eq!(program.statements.len(), expected.len());

        for (statement, (name, value)) in program.statements.iter().zip(expected) {
            match statement {
                Statement::Let { name: actual_name, value: actual_value } => {
                    assert_eq!(actual_name.name(), name);
                    assert_eq!(actual_value.to_string(), value);
                },
                other => panic!("expected let statement, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_return_statements() {
        let program = parse_ok("return 5; return 10; return add(15);");

        let rendered: Vec<String> = program.statements.iter().map(|statement| statement.to_string()).collect();
        assert_eq!(rendered, vec!["return 5;", "return 10;", "return add(15);"]);
    }

    #[test]
    fn test_optional_semicolon() {
        let program = parse_ok("1 + 2\n3");
        assert_eq!(program.to_string(), "(1 + 2)3");
    }

    #[test]
    fn test_malformed_let_skips_to_semicolon() {
        let (program, errors) = parse("let = 5; let x 10; let y = 7;");

        assert_eq!(errors, vec![
            String::from("expected next token to be IDENT, got = instead"),
            String::from("expected next token to be =, got INT instead"),
        ]);
        assert_eq!(program.to_string(), "let y = 7;");
    }

    #[test]
    fn test_malformed_return_skips_to_semicolon() {
        let (program, errors) = parse("return ) 5; return 6;");

        assert_eq!(errors, vec![String::from("no prefix parse function for ) found")]);
        assert_eq!(program.to_string(), "return 6;");
    }

    #[test]
    fn test_malformed_let_value_skips_to_semicolon() {
        let (program, errors) = parse("let a = ) 1; let b = 2;");

        assert_eq!(errors, vec![String::from("no prefix parse function for ) found")]);
        assert_eq!(program.to_string(), "let b = 2;");
    }

    #[test]
    fn test_missing_prefix_function() {
        let (program, errors) = parse("let x = ;");

        assert_eq!(errors, vec![String::from("no prefix parse function for ; found")]);
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_unclosed_block() {
        let (_, errors) = parse("if (x) { y");
        assert_eq!(errors, vec![String::from("expected next token to be }, got EOF instead")]);
    }

    #[test]
    fn test_integer_overflow() {
        let (_, errors) = parse("99999999999999999999");
        assert_eq!(errors, vec![String::from("could not parse 99999999999999999999 as integer")]);
    }

    #[test]
    fn test_lexer_errors_are_collected() {
        let (program, errors) = parse("1 @ 2");

        assert_eq!(errors, vec![String::from("[line 1 column 3] Unexpected character '@'")]);
        assert_eq!(program.to_string(), "12");
    }
}

mod expressions {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(single_expression("foobar;"), Expression::Identifier(Identifier::new(Token::new(
            TokenType::Identifier, String::from("foobar"),
            crate::interpreter::lexer::TokenPos::new(1, 1), crate::interpreter::lexer::TokenPos::new(1, 7),
        ))));
        assert_eq!(single_expression("5;"), Expression::IntegerLiteral(5));
        assert_eq!(single_expression("\"hello world\";"), Expression::StringLiteral(String::from("hello world")));
        assert_eq!(single_expression("true"), Expression::Boolean(true));
        assert_eq!(single_expression("false;"), Expression::Boolean(false));
    }

    #[test]
    fn test_prefix_expressions() {
        for (source, operator, right) in [("!5;", "!", "5"), ("-15;", "-", "15"), ("!true;", "!", "true")] {
            match single_expression(source) {
                Expression::Prefix { operator: actual_operator, right: actual_right } => {
                    assert_eq!(actual_operator.source(), operator);
                    assert_eq!(actual_right.to_string(), right);
                },
                other => panic!("expected prefix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_infix_expressions() {
        for operator in ["+", "-", "*", "/", ">", "<", "==", "!="] {
            let source = format!("5 {} 5;", operator);

            match single_expression(&source) {
                Expression::Infix { left, operator: actual_operator, right } => {
                    assert_eq!(*left, Expression::IntegerLiteral(5));
                    assert_eq!(actual_operator.source(), operator);
                    assert_eq!(*right, Expression::IntegerLiteral(5));
                },
                other => panic!("expected infix expression, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = [
            ("-a * b", "((-a) * b)"),
            ("-a * -b", "((-a) * (-b))"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            ("add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))", "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))"),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))"),
        ];

        for (source, expected) in tests {
            assert_eq!(parse_ok(source).to_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_if_expression() {
        match single_expression("if (x < y) { x }") {
            Expression::If { condition, consequence, alternative } => {
                assert_eq!(condition.to_string(), "(x < y)");
                assert_eq!(consequence.to_string(), "x");
                assert!(alternative.is_none());
            },
            other => panic!("expected if expression, got {:?}", other),
        }

        assert_eq!(single_expression("if (x < y) { x } else { y }").to_string(), "if(x < y) xelse y");
    }

    #[test]
    fn test_if_requires_parentheses() {
        let (_, errors) = parse("if x { y }");
        assert_eq!(errors.first(), Some(&String::from("expected next token to be (, got IDENT instead")));
    }

    #[test]
    fn test_function_literal() {
        match single_expression("fn(x, y) { x + y; }") {
            Expression::FunctionLiteral { parameters, body } => {
                let names: Vec<&str> = parameters.iter().map(Identifier::name).collect();
                assert_eq!(names, vec!["x", "y"]);
                assert_eq!(body.to_string(), "(x + y)");
            },
            other => panic!("expected function literal, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameters() {
        for (source, expected) in [("fn() {};", vec![]), ("fn(x) {};", vec!["x"]), ("fn(x, y, z) {};", vec!["x", "y", "z"])] {
            match single_expression(source) {
                Expression::FunctionLiteral { parameters, .. } => {
                    let names: Vec<&str> = parameters.iter().map(Identifier::name).collect();
                    assert_eq!(names, expected);
                },
                other => panic!("expected function literal, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        match single_expression("add(1, 2 * 3, 4 + 5);") {
            Expression::Call { function, arguments } => {
                assert_eq!(function.to_string(), "add");
                let rendered: Vec<String> = arguments.iter().map(|argument| argument.to_string()).collect();
                assert_eq!(rendered, vec!["1", "(2 * 3)", "(4 + 5)"]);
            },
            other => panic!("expected call expression, got {:?}", other),
        }

        assert_eq!(single_expression("fn(x) { x }(5)").to_string(), "fn(x) x(5)");
        assert_eq!(single_expression("f()").to_string(), "f()");
    }

    #[test]
    fn test_array_and_index() {
        assert_eq!(single_expression("[1, 2 * 2, 3 + 3]").to_string(), "[1, (2 * 2), (3 + 3)]");
        assert_eq!(single_expression("[]"), Expression::ArrayLiteral(vec![]));
        assert_eq!(single_expression("myArray[1 + 1]").to_string(), "(myArray[(1 + 1)])");
    }

    #[test]
    fn test_hash_literals() {
        assert_eq!(single_expression("{}"), Expression::HashLiteral(vec![]));
        assert_eq!(single_expression(r#"{"one": 1, "two": 2, "three": 3}"#).to_string(), "{one: 1, two: 2, three: 3}");
        assert_eq!(single_expression("{true: 1, 2: 0 + 1}").to_string(), "{true: 1, 2: (0 + 1)}");
    }

    #[test]
    fn test_unclosed_array() {
        let (_, errors) = parse("[1, 2");
        assert_eq!(errors, vec![String::from("expected next token to be ], got EOF instead")]);
    }
}

mod rendering {
    use pretty_assertions::assert_eq;
    use super::*;

    fn operator_token(operator: &'static str) -> Token {
        let token_type = match operator {
            "+" => TokenType::Plus,
            "-" => TokenType::Minus,
            "*" => TokenType::Multiply,
            "/" => TokenType::Divide,
            "<" => TokenType::Less,
            ">" => TokenType::Greater,
            "==" => TokenType::Equal,
            "!=" => TokenType::NotEqual,
            _ => TokenType::Not,
        };

        Token::synthetic(token_type, operator)
    }

    fn expression_strategy() -> impl Strategy<Value = Expression> {
        let leaf = prop_oneof![
            (0i64..1000).prop_map(Expression::IntegerLiteral),
            any::<bool>().prop_map(Expression::Boolean),
            prop::sample::select(vec!["a", "b", "foo", "bar"])
                .prop_map(|name| Expression::Identifier(Identifier::new(Token::synthetic(TokenType::Identifier, name)))),
        ];

        leaf.prop_recursive(4, 32, 2, |inner| prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/", "<", ">", "==", "!="]), inner.clone())
                .prop_map(|(left, operator, right)| Expression::Infix {
                    left: Box::new(left), operator: operator_token(operator), right: Box::new(right),
                }),
            (prop::sample::select(vec!["!", "-"]), inner)
                .prop_map(|(operator, right)| Expression::Prefix { operator: operator_token(operator), right: Box::new(right) }),
        ])
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Operators render fully parenthesized around their rendered operands.
        #[test]
        fn prop_operator_format(expression in expression_strategy()) {
            let rendered = expression.to_string();

            match &expression {
                Expression::Infix { left, operator, right } =>
                    prop_assert_eq!(rendered, format!("({} {} {})", left, operator.source(), right)),
                Expression::Prefix { operator, right } =>
                    prop_assert_eq!(rendered, format!("({}{})", operator.source(), right)),
                _ => prop_assert!(!rendered.starts_with('(')),
            }
        }

        /// The rendering of a tree parses back to a tree with the same rendering.
        #[test]
        fn prop_render_parse_fixpoint(expression in expression_strategy()) {
            let rendered = expression.to_string();
            let (program, errors) = parse(&rendered);

            prop_assert!(errors.is_empty(), "errors for {}: {:?}", rendered, errors);
            prop_assert_eq!(program.to_string(), rendered);
        }
    }
}
