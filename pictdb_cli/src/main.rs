//! `pictdbm`: command-line and HTTP front ends over `pictdb_core`.

mod cli;
mod commands;
mod http_error;
mod server;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::List(args) => commands::list(&args),
        Command::Create(args) => commands::create(&args),
        Command::Read(args) => commands::read(&args),
        Command::Insert(args) => commands::insert(&args),
        Command::Delete(args) => commands::delete(&args),
        Command::Gc(args) => commands::gc(&args),
        Command::Serve(args) => {
            let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("pictdbm: failed to start async runtime: {e}");
                    return ExitCode::from(5);
                }
            };
            match rt.block_on(server::run(args.db, args.port)) {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("pictdbm: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pictdbm: {e}");
            ExitCode::from(e.code() as u8)
        }
    }
}
