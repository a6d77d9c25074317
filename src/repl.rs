use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use crate::interpreter::environment::Environment;
use crate::interpreter::evaluator::Evaluator;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::object::Object;
use crate::interpreter::parser::Parser;


pub const PROMPT: &str = ">> ";

/// Reads one line at a time from `input` and evaluates it. Bindings persist between lines.
///
/// Returns the output sink once `input` is exhausted.
pub fn start<R: BufRead, W: Write>(mut input: R, output: W, prompt: &str) -> std::io::Result<W> {
    let env = Environment::new_global();
    let mut evaluator = Evaluator::new(output);
    let mut line = String::new();

    loop {
        write!(evaluator.output_mut(), "{}", prompt)?;
        evaluator.output_mut().flush()?;

        line.clear();

        if input.read_line(&mut line)? == 0 {
            tracing::debug!("end of input");
            return Ok(evaluator.into_output());
        }

        eval_line(&line, &env, &mut evaluator)?;
    }
}

fn eval_line<W: Write>(line: &str, env: &Rc<RefCell<Environment>>, evaluator: &mut Evaluator<W>) -> std::io::Result<()> {
    let mut parser = Parser::new(Lexer::new(line));
    let program = parser.parse_program();

    if parser.had_error() {
        print_parse_errors(evaluator.output_mut(), parser.errors())?;
    }

    if program.statements.is_empty() {
        return Ok(());
    }

    let evaluated = evaluator.eval_program(&program, env);
    writeln!(evaluator.output_mut(), "{}", evaluated)
}

pub fn print_parse_errors(output: &mut impl Write, errors: &[String]) -> std::io::Result<()> {
    for error in errors {
        writeln!(output, "\t{}", error)?;
    }

    Ok(())
}

/// Parses and evaluates a whole script in a fresh global scope.
///
/// A script with parse errors is not evaluated; the errors are returned instead.
pub fn run_source<W: Write>(source: &str, output: W) -> Result<Rc<Object>, Vec<String>> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    if parser.had_error() {
        return Err(parser.errors().to_vec());
    }

    let mut evaluator = Evaluator::new(output);
    Ok(evaluator.eval_program(&program, &Environment::new_global()))
}
