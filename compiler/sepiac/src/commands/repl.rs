//! The `repl` command: read, evaluate, print, loop.

use std::io::{BufRead, Write};

use sepia_eval::InterpreterBuilder;
use sepia_ir::SharedInterner;

use crate::{exit_code, Repl};

use super::{report, stderr_emitter, Options};

const PROMPT: &str = "> ";

/// Run an interactive session on stdin until end of input or `:quit`.
pub fn run_repl(options: Options) -> i32 {
    let builder =
        InterpreterBuilder::new(SharedInterner::new()).max_call_depth(options.max_depth);
    let mut repl = Repl::from_builder(builder);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{PROMPT}");
        let _ = std::io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("error: cannot read input: {e}");
                return exit_code::USAGE;
            }
            None => {
                println!();
                return exit_code::SUCCESS;
            }
        };
        match line.trim() {
            "" => continue,
            ":quit" | ":q" => return exit_code::SUCCESS,
            _ => {}
        }

        let submission = repl.submit(&line);
        match &submission.outcome {
            Ok(_) => {
                if let Some(echo) = submission.echo() {
                    println!("{echo}");
                }
            }
            Err(err) => {
                let mut emitter = stderr_emitter(options.color, "<repl>", &submission.source);
                report(&mut emitter, err.diagnostics());
            }
        }
    }
}
