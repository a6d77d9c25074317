use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use crate::interpreter::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::interpreter::builtins;
use crate::interpreter::environment::Environment;
use crate::interpreter::lexer::{Token, TokenType};
use crate::interpreter::object::{Function, HashPair, Object};


/// Any node the evaluator can start from.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Expression(&'a Expression),
}

/// Tree-walking evaluator. `puts` output goes to `output`.
pub struct Evaluator<W: Write> {
    output: W,
}

impl<W: Write> Evaluator<W> {
    pub fn new(output: W) -> Evaluator<W> {
        Evaluator { output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn eval(&mut self, node: Node<'_>, env: &Rc<RefCell<Environment>>) -> Rc<Object> {
        match node {
            Node::Program(program) => self.eval_program(program, env),
            Node::Statement(statement) => self.eval_statement(statement, env),
            Node::Expression(expression) => self.eval_expression(expression, env),
        }
    }

    /// Evaluates every statement in order. A `return` ends the program with its unwrapped value;
    /// an error ends it with the error.
    pub fn eval_program(&mut self, program: &Program, env: &Rc<RefCell<Environment>>) -> Rc<Object> {
        let mut result = Object::null();

        for statement in &program.statements {
            result = self.eval_statement(statement, env);

            if let Object::ReturnValue(value) = &*result {
                return Rc::clone(value);
            }

            if result.is_error() {
                return result;
            }
        }

        result
    }

    fn eval_block_statement(&mut self, block: &BlockStatement, env: &Rc<RefCell<Environment>>) -> Rc<Object> {
        let mut result = Object::null();

        for statement in &block.statements {
            result = self.eval_statement(statement, env);

            // Still wrapped, so enclosing blocks stop too
            if result.is_signal() {
                return result;
            }
        }

        result
    }

    fn eval_statement(&mut self, statement: &Statement, env: &Rc<RefCell<Environment>>) -> Rc<Object> {
        match statement {
            Statement::Expression(expression) => self.eval_expression(expression, env),
            Statement::Let { name, value } => {
                let value = self.eval_expression(value, env);

                if value.is_signal() {
                    return value;
                }

                env.borrow_mut().set(name.name(), value)
            },
            Statement::Return(value) => {
                let value = self.eval_expression(value, env);

                if value.is_signal() {
                    return value;
                }

                Rc::new(Object::ReturnValue(value))
            },
        }
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Rc<RefCell<Environment>>) -> Rc<Object> {
        match expression {
            Expression::Identifier(identifier) => self.eval_identifier(identifier, env),
            Expression::IntegerLiteral(value) => Rc::new(Object::Integer(*value)),
            Expression::StringLiteral(value) => Rc::new(Object::String(value.clone())),
            Expression::Boolean(value) => Object::native_bool(*value),

            Expression::Prefix { operator, right } => {
                let right = self.eval_expression(right, env);

                if right.is_signal() {
                    return right;
                }

                self.eval_prefix_expression(operator, &right)
            },
            Expression::Infix { left, operator, right } => {
                let left = self.eval_expression(left, env);

                if left.is_signal() {
                    return left;
                }

                let right = self.eval_expression(right, env);

                if right.is_signal() {
                    return right;
                }

                self.eval_infix_expression(operator, left, right)
            },
            Expression::If { condition, consequence, alternative } => {
                let condition = self.eval_expression(condition, env);

                if condition.is_signal() {
                    return condition;
                }

                if condition.is_truthy() {
                    self.eval_block_statement(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block_statement(alternative, env)
                } else {
                    Object::null()
                }
            },
            Expression::FunctionLiteral { parameters, body } => Rc::new(Object::Function(Function {
                parameters: Rc::clone(parameters),
                body: Rc::clone(body),
                env: Rc::clone(env),
            })),
            Expression::Call { function, arguments } => {
                let function = self.eval_expression(function, env);

                if function.is_signal() {
                    return function;
                }

                match self.eval_expressions(arguments, env) {
                    Ok(arguments) => self.apply_function(&function, arguments),
                    Err(signal) => signal,
                }
            },
            Expression::ArrayLiteral(elements) => match self.eval_expressions(elements, env) {
                Ok(elements) => Rc::new(Object::Array(elements)),
                Err(signal) => signal,
            },
            Expression::Index { left, index } => {
                let left = self.eval_expression(left, env);

                if left.is_signal() {
                    return left;
                }

                let index = self.eval_expression(index, env);

                if index.is_signal() {
                    return index;
                }

                self.eval_index_expression(&left, &index)
            },
            Expression::HashLiteral(pairs) => self.eval_hash_literal(pairs, env),
        }
    }

    fn eval_identifier(&mut self, identifier: &Identifier, env: &Rc<RefCell<Environment>>) -> Rc<Object> {
        if let Some(value) = env.borrow().get(identifier.name()) {
            return value;
        }

        match builtins::lookup(identifier.name()) {
            Some(builtin) => builtin,
            None => Object::error(format!("identifier not found: {}", identifier.name())),
        }
    }

    /// Evaluates left to right, stopping at the first error or return signal.
    fn eval_expressions(&mut self, expressions: &[Expression], env: &Rc<RefCell<Environment>>) -> Result<Vec<Rc<Object>>, Rc<Object>> {
        let mut values = Vec::with_capacity(expressions.len());

        for expression in expressions {
            let value = self.eval_expression(expression, env);

            if value.is_signal() {
                return Err(value);
            }

            values.push(value);
        }

        Ok(values)
    }

    fn eval_prefix_expression(&mut self, operator: &Token, right: &Rc<Object>) -> Rc<Object> {
        match operator.token_type() {
            TokenType::Not => Object::native_bool(!right.is_truthy()),
            TokenType::Minus => match &**right {
                Object::Integer(value) => Rc::new(Object::Integer(value.wrapping_neg())),
                other => Object::error(format!("unknown operator: -{}", other.object_type())),
            },
            _ => Object::error(format!("unknown operator: {}{}", operator.source(), right.object_type())),
        }
    }

    fn eval_infix_expression(&mut self, operator: &Token, left: Rc<Object>, right: Rc<Object>) -> Rc<Object> {
        match (&*left, &*right) {
            (Object::Integer(left), Object::Integer(right)) => self.eval_integer_infix_expression(operator, *left, *right),
            (Object::String(left), Object::String(right)) if operator.token_type() == TokenType::Plus =>
                Rc::new(Object::String(format!("{}{}", left, right))),
            (Object::String(_), Object::String(_)) =>
                Object::error(format!("unknown operator: STRING {} STRING", operator.source())),

            // Booleans and null are shared instances, so identity is value equality for them
            _ if operator.token_type() == TokenType::Equal => Object::native_bool(Rc::ptr_eq(&left, &right)),
            _ if operator.token_type() == TokenType::NotEqual => Object::native_bool(!Rc::ptr_eq(&left, &right)),

            (left, right) if left.object_type() != right.object_type() => Object::error(format!(
                "type mismatch: {} {} {}", left.object_type(), operator.source(), right.object_type())),
            (left, right) => Object::error(format!(
                "unknown operator: {} {} {}", left.object_type(), operator.source(), right.object_type())),
        }
    }

    fn eval_integer_infix_expression(&mut self, operator: &Token, left: i64, right: i64) -> Rc<Object> {
        let value = match operator.token_type() {
            TokenType::Plus => left.wrapping_add(right),
            TokenType::Minus => left.wrapping_sub(right),
            TokenType::Multiply => left.wrapping_mul(right),
            TokenType::Divide => {
                if right == 0 {
                    return Object::error("division by zero");
                }

                left.wrapping_div(right)
            },
            TokenType::Less => return Object::native_bool(left < right),
            TokenType::Greater => return Object::native_bool(left > right),
            TokenType::Equal => return Object::native_bool(left == right),
            TokenType::NotEqual => return Object::native_bool(left != right),
            _ => return Object::error(format!("unknown operator: INTEGER {} INTEGER", operator.source())),
        };

        Rc::new(Object::Integer(value))
    }

    fn eval_index_expression(&mut self, left: &Rc<Object>, index: &Rc<Object>) -> Rc<Object> {
        match (&**left, &**index) {
            (Object::Array(elements), Object::Integer(index)) => usize::try_from(*index).ok()
                .and_then(|index| elements.get(index))
                .map(Rc::clone)
                .unwrap_or_else(Object::null),
            (Object::Hash(pairs), index) => match index.hash_key() {
                Some(key) => pairs.get(&key).map(|pair| Rc::clone(&pair.value)).unwrap_or_else(Object::null),
                None => Object::error(format!("unusable as hash key: {}", index.object_type())),
            },
            (left, _) => Object::error(format!("index operator not supported: {}", left.object_type())),
        }
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expression, Expression)], env: &Rc<RefCell<Environment>>) -> Rc<Object> {
        let mut evaluated = HashMap::with_capacity(pairs.len());

        for (key, value) in pairs {
            let key = self.eval_expression(key, env);

            if key.is_signal() {
                return key;
            }

            let hash_key = match key.hash_key() {
                Some(hash_key) => hash_key,
                None => return Object::error(format!("unusable as hash key: {}", key.object_type())),
            };

            let value = self.eval_expression(value, env);

            if value.is_signal() {
                return value;
            }

            evaluated.insert(hash_key, HashPair { key, value });
        }

        Rc::new(Object::Hash(evaluated))
    }

    fn apply_function(&mut self, function: &Rc<Object>, arguments: Vec<Rc<Object>>) -> Rc<Object> {
        match &**function {
            Object::Function(function) => {
                if function.parameters.len() != arguments.len() {
                    return Object::error(format!("wrong number of arguments. got={}, want={}",
                        arguments.len(), function.parameters.len()));
                }

                tracing::trace!(parameters = function.parameters.len(), "calling function");

                let extended = Environment::new_with_parent(Rc::clone(&function.env));

                for (parameter, argument) in function.parameters.iter().zip(arguments) {
                    extended.borrow_mut().set(parameter.name(), argument);
                }

                let evaluated = self.eval_block_statement(&function.body, &extended);

                // `return` only leaves this function
                if let Object::ReturnValue(value) = &*evaluated {
                    return Rc::clone(value);
                }

                evaluated
            },
            Object::Builtin(builtin) => {
                tracing::trace!(name = builtin.name, "calling builtin");
                builtin.call(&arguments, &mut self.output)
            },
            other => Object::error(format!("not a function: {}", other.object_type())),
        }
    }
}
