//! The `run` command: evaluate a source file.

use sepia_eval::InterpreterBuilder;
use sepia_ir::SharedInterner;
use tracing::info;

use crate::{exit_code, Session};

use super::{read_file, report, stderr_emitter, Options};

pub fn run_file(path: &str, options: Options) -> i32 {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let builder =
        InterpreterBuilder::new(SharedInterner::new()).max_call_depth(options.max_depth);
    let mut session = Session::from_builder(builder);

    match session.run(&source) {
        Ok(value) => {
            info!(path, result = %value, "finished");
            exit_code::SUCCESS
        }
        Err(err) => {
            let mut emitter = stderr_emitter(options.color, path, &source);
            report(&mut emitter, err.diagnostics());
            err.exit_code()
        }
    }
}
