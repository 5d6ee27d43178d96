mod cli;
mod converter;
mod detailer;
mod error;
mod extractor;
mod fmt;
mod merger;
mod models;
mod pipeline;
mod resolver;
mod settings;

use clap::Parser;

use cli::{AccountsCommands, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => cli::init::run(),
        Commands::Process {
            dry_run,
            auto_accept,
        } => cli::process::run(dry_run, auto_accept),
        Commands::Detail { file, rules } => cli::detail::run(&file, rules.as_deref()),
        Commands::Convert {
            file,
            account,
            output,
            expense,
        } => cli::convert::run(&file, account.as_deref(), output.as_deref(), &expense),
        Commands::Merge {
            files,
            output,
            dry_run,
        } => cli::merge::run(&files, output.as_deref(), dry_run),
        Commands::Accounts { command } => match command {
            AccountsCommands::List => cli::accounts::list(),
            AccountsCommands::Search { query } => cli::accounts::search(query.as_deref()),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
