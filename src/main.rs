//! Triptych CLI - Web Playground Engine
//!
//! Command-line interface for the Triptych playground engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use triptych::cli::{Cli, Commands};
use triptych::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = match cli.verbose {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Triptych v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Triptych v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compose {
            markup,
            style,
            script,
            out,
        } => triptych::cli::commands::compose_document(
            markup.as_deref(),
            style.as_deref(),
            script.as_deref(),
            out.as_deref(),
        ),
        Commands::Preview {
            markup,
            style,
            script,
            out,
        } => triptych::cli::commands::preview(
            markup.as_deref(),
            style.as_deref(),
            script.as_deref(),
            &out,
        ),
        Commands::Generate {
            target,
            prompt,
            current,
            apply,
        } => triptych::cli::commands::generate(
            &target,
            &prompt,
            current.as_deref(),
            apply.as_deref(),
        ),
        Commands::Image { prompt, project } => {
            triptych::cli::commands::generate_image(&prompt, project.as_deref())
        }
        Commands::Projects => triptych::cli::commands::list_projects(),
        Commands::Project { id } => triptych::cli::commands::show_project(&id),
        Commands::SaveProject {
            markup,
            style,
            script,
            title,
            description,
            id,
            public,
        } => triptych::cli::commands::save_project(
            markup.as_deref(),
            style.as_deref(),
            script.as_deref(),
            title.as_deref(),
            description.as_deref(),
            id.as_deref(),
            public,
        ),
        Commands::DeleteProject { id } => triptych::cli::commands::delete_project(&id),
        Commands::Export {
            markup,
            style,
            script,
            dir,
        } => triptych::cli::commands::export(
            markup.as_deref(),
            style.as_deref(),
            script.as_deref(),
            &dir,
        ),
        Commands::Snapshot {
            markup,
            style,
            script,
            dir,
        } => triptych::cli::commands::snapshot(
            markup.as_deref(),
            style.as_deref(),
            script.as_deref(),
            dir.as_deref(),
        ),
        Commands::Recover { dir, out } => {
            triptych::cli::commands::recover(dir.as_deref(), out.as_deref())
        }
        Commands::Suggest { target } => triptych::cli::commands::suggest(&target),
        Commands::SetKey { key } => triptych::cli::commands::set_key(&key),
        Commands::ShowConfig => triptych::cli::commands::show_config(),
    }
}
