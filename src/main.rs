use std::process::ExitCode;

fn main() -> ExitCode {
    match monkey_lang::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        },
    }
}
