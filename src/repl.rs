use std::io;
use std::io::BufRead;
use std::io::Write;

use crate::compiler::Compiler;

const PROMPT: &str = ">> ";
const QUIT: &str = "exit";

/// Reads lines from stdin until `exit` or end of input. Every line is compiled against the
/// definitions made by the lines before it; errors are reported and the loop carries on.
pub fn run(dump_context: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut compiler = Compiler::new();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        let line = line.trim();
        if line == QUIT {
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }

        if let Err(err) = compiler.compile_line(line) {
            eprintln!("{}", err);
        }

        if dump_context {
            eprint!("{}", compiler.environment());
        }
    }
}
