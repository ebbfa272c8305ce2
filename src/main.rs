use std::{env, process};

use expense_split_lib::{process_expenses, EngineConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args_os().skip(1);
    match args.next() {
        None => {
            eprintln!("Missing csv file argument");
            process::exit(1);
        }
        Some(csv_path) => {
            let members: Vec<String> = args.map(|m| m.to_string_lossy().into_owned()).collect();
            let result = EngineConfig::load()
                .and_then(|config| process_expenses(&csv_path, &members, &config));
            match result {
                Ok(report) => {
                    print!("{}", report);
                    process::exit(0);
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to settle expenses");
                    eprintln!("an error occurred: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
