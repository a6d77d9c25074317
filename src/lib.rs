pub mod util;
pub mod interpreter;
pub mod repl;

use std::path::PathBuf;
use clap::Parser as ClapParser;
use thiserror::Error;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run. Starts the interactive shell when omitted")]
    pub input: Option<PathBuf>,
    #[clap(long, default_value = repl::PROMPT, help = "Prompt of the interactive shell")]
    pub prompt: String,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("parser errors:\n\t{}", .0.join("\n\t"))]
    Parse(Vec<String>),
    #[error("Error: {0}")]
    Runtime(String),
}

pub fn run() -> Result<(), RunError> {
    let config: Config = Config::parse();
    util::init_tracing(config.verbose);

    match config.input {
        Some(input) => run_file(input),
        None => {
            let user = std::env::var("USER").unwrap_or_else(|_| String::from("there"));
            println!("Hello {}! This is the Monkey programming language!", user);
            println!("Feel free to type in commands");

            let stdin = std::io::stdin();
            repl::start(stdin.lock(), std::io::stdout(), &config.prompt)?;
            Ok(())
        },
    }
}

fn run_file(input: PathBuf) -> Result<(), RunError> {
    tracing::debug!(path = %input.display(), "running script");
    let source = std::fs::read_to_string(input)?;

    let result = repl::run_source(&source, std::io::stdout()).map_err(RunError::Parse)?;

    match &*result {
        interpreter::object::Object::Error(message) => Err(RunError::Runtime(message.clone())),
        _ => Ok(()),
    }
}
