use std::collections::HashMap;
use std::rc::Rc;
use lazy_static::lazy_static;
use crate::interpreter::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::interpreter::lexer::{Lexer, Token, TokenType};

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

lazy_static! {
    static ref PRECEDENCES: HashMap<TokenType, Precedence> = HashMap::from([
        (TokenType::Equal, Precedence::Equals),
        (TokenType::NotEqual, Precedence::Equals),
        (TokenType::Less, Precedence::LessGreater),
        (TokenType::Greater, Precedence::LessGreater),
        (TokenType::Plus, Precedence::Sum),
        (TokenType::Minus, Precedence::Sum),
        (TokenType::Multiply, Precedence::Product),
        (TokenType::Divide, Precedence::Product),
        (TokenType::ParenthesisLeft, Precedence::Call),
        (TokenType::SquareBracketLeft, Precedence::Call),
    ]);
}

fn precedence_of(token_type: TokenType) -> Precedence {
    PRECEDENCES.get(&token_type).copied().unwrap_or(Precedence::Lowest)
}

type PrefixParseFn<'source> = fn(&mut Parser<'source>) -> Option<Expression>;
type InfixParseFn<'source> = fn(&mut Parser<'source>, Expression) -> Option<Expression>;

pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current: Token, peek: Token,

    errors: Vec<String>,

    prefix_parse_fns: HashMap<TokenType, PrefixParseFn<'source>>,
    infix_parse_fns: HashMap<TokenType, InfixParseFn<'source>>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        let mut parser = Parser {
            lexer,
            current: Token::empty(), peek: Token::empty(),
            errors: Vec::new(),
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
        };

        parser.register_prefix(TokenType::Identifier, Self::parse_identifier);
        parser.register_prefix(TokenType::Int, Self::parse_integer_literal);
        parser.register_prefix(TokenType::String, Self::parse_string_literal);
        parser.register_prefix(TokenType::True, Self::parse_boolean);
        parser.register_prefix(TokenType::False, Self::parse_boolean);
        parser.register_prefix(TokenType::Not, Self::parse_prefix_expression);
        parser.register_prefix(TokenType::Minus, Self::parse_prefix_expression);
        parser.register_prefix(TokenType::ParenthesisLeft, Self::parse_grouped_expression);
        parser.register_prefix(TokenType::If, Self::parse_if_expression);
        parser.register_prefix(TokenType::Function, Self::parse_function_literal);
        parser.register_prefix(TokenType::SquareBracketLeft, Self::parse_array_literal);
        parser.register_prefix(TokenType::BracketLeft, Self::parse_hash_literal);

        for operator in [
            TokenType::Equal, TokenType::NotEqual,
            TokenType::Less, TokenType::Greater,
            TokenType::Plus, TokenType::Minus,
            TokenType::Multiply, TokenType::Divide,
        ] {
            parser.register_infix(operator, Self::parse_infix_expression);
        }

        parser.register_infix(TokenType::ParenthesisLeft, Self::parse_call_expression);
        parser.register_infix(TokenType::SquareBracketLeft, Self::parse_index_expression);

        // Fill both `current` and `peek`
        parser.next_token();
        parser.next_token();

        parser
    }

    fn register_prefix(&mut self, token_type: TokenType, function: PrefixParseFn<'source>) {
        self.prefix_parse_fns.insert(token_type, function);
    }

    fn register_infix(&mut self, token_type: TokenType, function: InfixParseFn<'source>) {
        self.infix_parse_fns.insert(token_type, function);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    // Statement parsing

    /// Parses until end of input. Statements that fail to parse are left out of the
    /// program; the reasons are collected in [`Parser::errors`].
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            self.next_token();
        }

        tracing::debug!(statements = statements.len(), errors = self.errors.len(), "parsed program");
        Program { statements }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.token_type() {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenType::Identifier) {
            self.synchronize();
            return None;
        }

        let name = Identifier::new(self.current.clone());

        if !self.expect_peek(TokenType::Assign) {
            self.synchronize();
            return None;
        }

        self.next_token();
        let value = self.parse_statement_value()?;

        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();
        let value = self.parse_statement_value()?;

        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Return(value))
    }

    /// The value of a `let` or `return`. On failure the rest of the statement is skipped.
    fn parse_statement_value(&mut self) -> Option<Expression> {
        let value = self.parse_expression(Precedence::Lowest);

        if value.is_none() {
            self.synchronize();
        }

        value
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenType::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression(expression))
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = Vec::new();
        self.next_token();

        while !self.current_is(TokenType::BracketRight) && !self.current_is(TokenType::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            self.next_token();
        }

        if self.current_is(TokenType::Eof) {
            self.errors.push(format!("expected next token to be {}, got {} instead", TokenType::BracketRight, TokenType::Eof));
        }

        BlockStatement { statements }
    }

    // Expression parsing

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = match self.prefix_parse_fns.get(&self.current.token_type()) {
            Some(prefix) => *prefix,
            None => {
                self.errors.push(format!("no prefix parse function for {} found", self.current.token_type()));
                return None;
            },
        };

        let mut left = prefix(self)?;

        while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_parse_fns.get(&self.peek.token_type()) {
                Some(infix) => *infix,
                None => return Some(left),
            };

            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier::new(self.current.clone())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.source().parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(value)),
            Err(_) => {
                self.errors.push(format!("could not parse {} as integer", self.current.source()));
                None
            },
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::StringLiteral(self.current.source().to_owned()))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(self.current_is(TokenType::True)))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = self.current.clone();
        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix { operator, right: Box::new(right) })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = self.current.clone();
        let precedence = self.current_precedence();
        self.next_token();

        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix { left: Box::new(left), operator, right: Box::new(right) })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::ParenthesisRight) || !self.expect_peek(TokenType::BracketLeft) {
            return None;
        }

        let consequence = self.parse_block_statement();
        let mut alternative = None;

        if self.peek_is(TokenType::Else) {
            self.next_token();

            if !self.expect_peek(TokenType::BracketLeft) {
                return None;
            }

            alternative = Some(self.parse_block_statement());
        }

        Some(Expression::If { condition: Box::new(condition), consequence, alternative })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::ParenthesisLeft) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::BracketLeft) {
            return None;
        }

        let body = self.parse_block_statement();
        Some(Expression::FunctionLiteral { parameters: Rc::new(parameters), body: Rc::new(body) })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenType::ParenthesisRight) {
            self.next_token();
            return Some(parameters);
        }

        if !self.expect_peek(TokenType::Identifier) {
            return None;
        }

        parameters.push(Identifier::new(self.current.clone()));

        while self.peek_is(TokenType::Comma) {
            self.next_token();

            if !self.expect_peek(TokenType::Identifier) {
                return None;
            }

            parameters.push(Identifier::new(self.current.clone()));
        }

        if !self.expect_peek(TokenType::ParenthesisRight) {
            return None;
        }

        Some(parameters)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let elements = self.parse_expression_list(TokenType::SquareBracketRight)?;
        Some(Expression::ArrayLiteral(elements))
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let mut pairs = Vec::new();

        while !self.peek_is(TokenType::BracketRight) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(TokenType::Colon) {
                return None;
            }

            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenType::BracketRight) && !self.expect_peek(TokenType::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenType::BracketRight) {
            return None;
        }

        Some(Expression::HashLiteral(pairs))
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenType::ParenthesisRight)?;
        Some(Expression::Call { function: Box::new(function), arguments })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::SquareBracketRight) {
            return None;
        }

        Some(Expression::Index { left: Box::new(left), index: Box::new(index) })
    }

    /// Comma-separated expressions up to `end`; `current` is the opening delimiter.
    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    // Token handling

    fn next_token(&mut self) {
        let next = loop {
            match self.lexer.scan_token() {
                Ok(token) => break token,
                Err(err) => {
                    tracing::trace!(%err, "lexer error");
                    self.errors.push(err.to_string());
                },
            }
        };

        self.current = std::mem::replace(&mut self.peek, next);
    }

    #[inline]
    fn current_is(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    #[inline]
    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek.token_type() == token_type
    }

    fn expect_peek(&mut self, token_type: TokenType) -> bool {
        if self.peek_is(token_type) {
            self.next_token();
            return true;
        }

        self.peek_error(token_type);
        false
    }

    fn current_precedence(&self) -> Precedence {
        precedence_of(self.current.token_type())
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.token_type())
    }

    // Error handling

    fn peek_error(&mut self, token_type: TokenType) {
        self.errors.push(format!("expected next token to be {}, got {} instead", token_type, self.peek.token_type()));
    }

    /// Skips the rest of a malformed statement, stopping on its `;` or at end of input.
    fn synchronize(&mut self) {
        while !self.current_is(TokenType::Semicolon) && !self.current_is(TokenType::Eof) {
            self.next_token();
        }
    }
}
