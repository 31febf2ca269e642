// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod audit;
mod cli;
mod config;
mod console_format;
mod error;
mod extract;
mod fetch;
mod modes;
mod observer;
mod report;
mod ui;

use chrono::Local;
use cli::{CliArgs, OutputFormat};
use config::AppConfig;
use fetch::CachedSession;
use log::{info, warn};
use observer::{ConsoleObserver, RunLog};
use report::ResultTable;
use std::io::IsTerminal;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Parser started");

    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }
    info!("Command line arguments: {:?}", args);

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    let config = match config::build_app_config(&args) {
        Ok(c) => c,
        Err(e) => {
            ui::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let session = if config.use_cache { CachedSession::new(&config.cache_dir) } else { CachedSession::uncached() };

    if args.clear_cache {
        match session.clear_cache() {
            Ok(()) => info!("Cleared page cache"),
            Err(e) => warn!("Failed to clear page cache: {}", e),
        }
    }

    let mut observer = ConsoleObserver::new(Some(RunLog::new(&config.logs_dir())));
    if !std::io::stderr().is_terminal() {
        observer = observer.without_progress();
    }

    let table = match modes::run_mode(args.mode, &session, &config, &mut observer) {
        Ok(table) => table,
        Err(e) => {
            let mut message = e.to_string();
            if e.is_structural() {
                message.push_str("\nThe page layout or the expected status table may be out of date.");
            }
            ui::print_error(&message);
            std::process::exit(1);
        }
    };

    if let Some(ref table) = table {
        if let Err(e) = control_output(table, &args, &config) {
            ui::print_error(&format!("Failed to write results: {}", e));
            std::process::exit(1);
        }
    }

    info!("Parser finished");
}

/// Print or save the result table according to `--output`
fn control_output(table: &ResultTable, args: &CliArgs, config: &AppConfig) -> std::io::Result<()> {
    let extension = match args.output {
        None => {
            report::print_plain(table);
            return Ok(());
        }
        Some(OutputFormat::Pretty) => return report::print_pretty(table),
        Some(OutputFormat::File) => "csv",
        Some(OutputFormat::Json) => "json",
    };

    let path = report::results_file_path(&config.results_dir, args.mode.as_str(), extension, &Local::now());
    match args.output {
        Some(OutputFormat::Json) => report::export_json(table, &path)?,
        _ => report::export_csv(table, &path)?,
    }
    info!("Results saved to file: {}", path.display());
    Ok(())
}
