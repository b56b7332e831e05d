//! Pinned Tabs CLI - inspect bookmark exports and the saved target folder.

use clap::Parser;
use pinned_tabs::cli::{Cli, Commands, TargetCommands};
use pinned_tabs::commands::{self, Output};
use pinned_tabs::logging;
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    logging::init_logger();

    if let Err(e) = run_command(cli.command, human) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run_command(command: Commands, human: bool) -> pinned_tabs::Result<()> {
    // Commands share the single-threaded model of the extension itself.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    match command {
        Commands::Folders { tree } => {
            let result = commands::folders(&tree)?;
            output(&result, human);
        }
        Commands::Pinned { tree, folder } => {
            let result = runtime.block_on(commands::pinned(&tree, &folder))?;
            output(&result, human);
        }
        Commands::Config { file, popup } => {
            let result = commands::config_show(file.as_deref(), popup)?;
            output(&result, human);
        }
        Commands::Target { command } => match command {
            TargetCommands::Get { store } => {
                let result = runtime.block_on(commands::target_get(&store))?;
                output(&result, human);
            }
            TargetCommands::Set { folder_id, store } => {
                let result = runtime.block_on(commands::target_set(&store, &folder_id))?;
                output(&result, human);
            }
        },
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
