use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::Token;


/// Joins rendered nodes with `separator`.
fn join<T: Display>(items: &[T], separator: &str) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<String>>().join(separator)
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|statement| write!(f, "{}", statement))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub token: Token,
}

impl Identifier {
    pub fn new(token: Token) -> Identifier {
        Identifier { token }
    }

    pub fn name(&self) -> &str {
        self.token.source()
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let {
        name: Identifier,
        value: Expression,
    },
    Return(Expression),
    Expression(Expression),
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return(value) => write!(f, "return {};", value),
            Statement::Expression(expression) => write!(f, "{}", expression),
        }
    }
}

/// Body of `if` branches and function literals.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|statement| write!(f, "{}", statement))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    StringLiteral(String),
    Boolean(bool),

    Prefix {
        operator: Token,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: Token,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    /// Parameters and body are shared with every function object created from this literal.
    FunctionLiteral {
        parameters: Rc<Vec<Identifier>>,
        body: Rc<BlockStatement>,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    ArrayLiteral(Vec<Expression>),
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    HashLiteral(Vec<(Expression, Expression)>),
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            Expression::IntegerLiteral(value) => write!(f, "{}", value),
            Expression::StringLiteral(value) => f.write_str(value),
            Expression::Boolean(value) => write!(f, "{}", value),

            Expression::Prefix { operator, right } => write!(f, "({}{})", operator.source(), right),
            Expression::Infix { left, operator, right } => write!(f, "({} {} {})", left, operator.source(), right),
            Expression::If { condition, consequence, alternative } => {
                write!(f, "if{} {}", condition, consequence)?;

                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }

                Ok(())
            },
            Expression::FunctionLiteral { parameters, body } =>
                write!(f, "fn({}) {}", join(parameters, ", "), body),
            Expression::Call { function, arguments } => write!(f, "{}({})", function, join(arguments, ", ")),
            Expression::ArrayLiteral(elements) => write!(f, "[{}]", join(elements, ", ")),
            Expression::Index { left, index } => write!(f, "({}[{}])", left, index),
            Expression::HashLiteral(pairs) => write!(f, "{{{}}}", pairs.iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect::<Vec<String>>().join(", ")),
        }
    }
}
