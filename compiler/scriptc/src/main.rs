//! libscript front-end CLI.

mod commands;
mod tracing_setup;

use commands::{check_file, explain_code, lex_file, parse_file};

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let exit = match args[1].as_str() {
        "lex" => with_path(&args, lex_file),
        "parse" => with_path(&args, parse_file),
        "check" => with_path(&args, check_file),
        "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: scriptc explain <code>");
                1
            } else {
                explain_code(&args[2])
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        other => {
            eprintln!("Unknown command '{other}'");
            print_usage();
            1
        }
    };

    std::process::exit(exit);
}

fn with_path(args: &[String], run: fn(&str) -> i32) -> i32 {
    if args.len() < 3 {
        eprintln!("Usage: scriptc {} <file>", args[1]);
        return 1;
    }
    run(&args[2])
}

fn print_usage() {
    eprintln!("libscript compiler front end");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  scriptc lex <file>      Print the token stream");
    eprintln!("  scriptc parse <file>    Parse and report syntax errors");
    eprintln!("  scriptc check <file>    Full semantic check");
    eprintln!("  scriptc explain <code>  Describe an error code (e.g. E2032)");
}
