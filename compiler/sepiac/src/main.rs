//! Sepia CLI
//!
//! Tree-walking interpreter for the Sepia scripting language.

use sepiac::commands::{
    check_file, explain_error, format_file, lex_file, parse_file, run_file, run_repl,
    split_options, FormatMode, Options,
};
use sepiac::exit_code;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, args) = match split_options(&args) {
        Ok(split) => split,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(exit_code::USAGE);
        }
    };
    std::process::exit(dispatch(&args, options));
}

/// Logging is off unless `RUST_LOG` is set. `SEPIA_LOG_TREE` switches to
/// indented span trees.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_err() {
        return;
    }
    let filter = EnvFilter::from_default_env();
    if std::env::var_os("SEPIA_LOG_TREE").is_some() {
        tracing_subscriber::registry()
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true)
                    .with_bracketed_fields(true),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    }
}

fn dispatch(args: &[String], options: Options) -> i32 {
    let Some(command) = args.first() else {
        print_usage();
        return exit_code::SUCCESS;
    };

    match command.as_str() {
        "run" => match args.get(1) {
            Some(path) => run_file(path, options),
            None => usage_error("sepia run <file.sp>"),
        },
        "check" => match args.get(1) {
            Some(path) => check_file(path, options),
            None => usage_error("sepia check <file.sp>"),
        },
        "lex" => match args.get(1) {
            Some(path) => lex_file(path, options),
            None => usage_error("sepia lex <file.sp>"),
        },
        "parse" => match args.get(1) {
            Some(path) => parse_file(path, options),
            None => usage_error("sepia parse <file.sp>"),
        },
        "fmt" => {
            let mut mode = FormatMode::Print;
            let mut path = None;
            for arg in &args[1..] {
                match arg.as_str() {
                    "--check" => mode = FormatMode::Check,
                    "--write" | "-w" => mode = FormatMode::Write,
                    other if !other.starts_with('-') && path.is_none() => path = Some(other),
                    other => {
                        eprintln!("error: unexpected argument '{other}'");
                        return usage_error("sepia fmt <file.sp> [--check | --write]");
                    }
                }
            }
            match path {
                Some(path) => format_file(path, mode, options),
                None => usage_error("sepia fmt <file.sp> [--check | --write]"),
            }
        }
        "repl" => run_repl(options),
        "explain" | "--explain" => match args.get(1) {
            Some(code) => explain_error(code),
            None => usage_error("sepia explain <ERROR_CODE>"),
        },
        "help" | "--help" | "-h" => {
            print_usage();
            exit_code::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("Sepia {}", env!("CARGO_PKG_VERSION"));
            exit_code::SUCCESS
        }
        _ => {
            // A bare source file runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("sp"))
            {
                run_file(command, options)
            } else {
                eprintln!("Unknown command: {command}");
                eprintln!();
                print_usage();
                exit_code::USAGE
            }
        }
    }
}

fn usage_error(usage: &str) -> i32 {
    eprintln!("Usage: {usage}");
    exit_code::USAGE
}

fn print_usage() {
    println!("Sepia - a statically typed scripting language");
    println!();
    println!("Usage: sepia <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file.sp>        Evaluate a program");
    println!("  check <file.sp>      Lex, parse and resolve without running");
    println!("  fmt <file.sp>        Pretty-print a program (--check, --write)");
    println!("  repl                 Start an interactive session");
    println!("  parse <file.sp>      Parse and display an outline");
    println!("  lex <file.sp>        Tokenize and display tokens");
    println!("  explain <code>       Explain an error code (e.g., E2003)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --color=<mode>       auto, always or never (default: auto)");
    println!("  --max-depth=<n>      Call-depth limit for run and repl (default: 10000,");
    println!("                       or `unlimited`)");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Enable logging with the given filter");
    println!("  SEPIA_LOG_TREE       Print logs as an indented span tree");
}
