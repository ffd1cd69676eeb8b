mod cli;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use surf_engine::{utils, CancelToken, Engine};

fn size_arg_mb(s: &str) -> Result<u64, String> {
    utils::parse_size(s).map(|bytes| bytes / 1_048_576)
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => output::print_error(&format!("cannot serialize report: {e}")),
    }
}

fn run(cli: Cli, engine: &Engine, cancel: &CancelToken) -> Result<(), String> {
    match cli.command {
        Command::Scan {
            path,
            limit,
            min_size,
        } => {
            let min_mb = size_arg_mb(&min_size)?;
            let report = engine
                .scan_directory(Path::new(&path), Some(limit), Some(min_mb), cancel)
                .map_err(|e| e.to_string())?;
            if cli.json {
                print_json(&report);
            } else {
                output::print_directory_report(&report);
            }
        }

        Command::Junk => {
            let report = engine.scan_junk(cancel).map_err(|e| e.to_string())?;
            if cli.json {
                print_json(&report);
            } else {
                let selected: Vec<String> = report
                    .categories
                    .iter()
                    .filter(|c| c.selected_by_default)
                    .map(|c| c.id.clone())
                    .collect();
                output::print_junk_report(&report, &selected);
            }
        }

        Command::Clean {
            categories,
            confirm,
        } => {
            let report = engine.scan_junk(cancel).map_err(|e| e.to_string())?;
            // Trash stays out of the default selection; deleting it is an
            // explicit choice.
            let selected: Vec<String> = if categories.is_empty() {
                report
                    .categories
                    .iter()
                    .filter(|c| c.selected_by_default)
                    .map(|c| c.id.clone())
                    .collect()
            } else {
                categories
            };

            if !confirm {
                if cli.json {
                    print_json(&report);
                } else {
                    output::print_junk_report(&report, &selected);
                    output::print_dry_run_footer();
                }
                return Ok(());
            }

            let result = engine.clean_junk(&selected).map_err(|e| e.to_string())?;
            if cli.json {
                print_json(&result);
            } else {
                output::print_clean_result(&result);
            }
        }

        Command::Duplicates { path, min_size } => {
            let min_mb = size_arg_mb(&min_size)?;
            let report = engine
                .find_duplicates(Path::new(&path), Some(min_mb), cancel)
                .map_err(|e| e.to_string())?;
            if cli.json {
                print_json(&report);
            } else {
                output::print_duplicate_report(&report);
            }
        }

        Command::Disk { path } => {
            let usage = surf_engine::disk::disk_usage(Path::new(&path))
                .map_err(|e| e.to_string())?;
            if cli.json {
                print_json(&usage);
            } else {
                output::print_disk_usage(&usage);
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let engine = Engine::default();
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    // First Ctrl-C cancels cooperatively; partial results still print.
    let _ = ctrlc::set_handler(move || handler_token.cancel());

    if let Err(msg) = run(cli, &engine, &cancel) {
        output::print_error(&msg);
        std::process::exit(1);
    }
}
