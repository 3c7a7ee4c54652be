use std::{env, io, process};

use hackasm::assemble;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Diagnostics go to stderr so stdout carries only the assembled words
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match args.len() {
        2 => {
            let input_filename = &args[1];
            if let Err(e) = assemble::run(input_filename, io::stdout().lock()) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }

        _ => {
            eprintln!("Usage: assemble [source]");
            process::exit(1);
        }
    }
}
