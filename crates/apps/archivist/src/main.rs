//! Archivist - command-line front end for the EduLink message archive
//!
//! This is the main entry point for the archivist tool.

use anyhow::{Context, Result};
use archive::fixtures::sample_archive;
use archive::settings::ArchiveSettings;
use archive::{ArchiveError, ArchivedMessage, MessageId};
use clap::Parser;
use log::{error, info};

mod app;
mod cli;
mod views;

use app::OpenOptions;
use cli::{Cli, Command};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = ArchiveSettings::load(cli.config.as_deref())?;

    match cli.command {
        Command::List(args) => {
            let mut controller = app::open(&settings, OpenOptions::default())?;
            controller.set_query(args.to_query(settings.default_sort))?;
            let view = controller.view();
            print!("{}", views::message_table(&view.messages));
            println!(
                "\nShowing {} of {} archived message(s)",
                view.visible_stats.total, view.stats.total
            );
        }
        Command::Stats => {
            let controller = app::open(&settings, OpenOptions::default())?;
            print!("{}", views::stats_summary(&controller.view().stats));
        }
        Command::Show { id } => {
            let controller = app::open(&settings, OpenOptions::default())?;
            let id = MessageId::new(id);
            let message = controller
                .store()
                .get(&id)?
                .ok_or(ArchiveError::NotFound(id))?;
            print!("{}", views::message_detail(&message));
        }
        Command::Star { id } => {
            let mut controller = app::open(&settings, OpenOptions::default())?;
            let id = MessageId::new(id);
            let starred = controller.toggle_star(&id)?;
            println!("{} {}", if starred { "Starred" } else { "Unstarred" }, id);
        }
        Command::Restore { ids } => {
            let mut controller = app::open(&settings, OpenOptions::default())?;
            let ids: Vec<MessageId> = ids.into_iter().map(MessageId::new).collect();
            let outcome = controller.restore(&ids)?;
            print!("{}", views::restore_report(&outcome));
            outcome.into_result()?;
        }
        Command::Delete { ids, yes } => {
            let options = OpenOptions {
                assume_yes: yes,
                ..Default::default()
            };
            let mut controller = app::open(&settings, options)?;
            let ids: Vec<MessageId> = ids.into_iter().map(MessageId::new).collect();
            match controller.delete_permanently(&ids)? {
                Some(count) => println!("Deleted {} message(s)", count),
                None => println!("Cancelled"),
            }
        }
        Command::Clear { yes } => {
            let options = OpenOptions {
                assume_yes: yes,
                ..Default::default()
            };
            let mut controller = app::open(&settings, options)?;
            match controller.clear_all()? {
                Some(count) => println!("Cleared {} message(s)", count),
                None => println!("Cancelled"),
            }
        }
        Command::Export { dir } => {
            let options = OpenOptions {
                export_dir: dir,
                ..Default::default()
            };
            let export_dir = match &options.export_dir {
                Some(dir) => dir.clone(),
                None => settings.export_dir()?,
            };
            let controller = app::open(&settings, options)?;
            let summary = controller.export_snapshot()?;
            println!(
                "Exported {} message(s) ({} bytes) to {}",
                summary.count,
                summary.bytes,
                export_dir.join(&summary.filename).display()
            );
        }
        Command::Import { file } => {
            let messages: Vec<ArchivedMessage> = config::load_json_file(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let total = messages.len();
            let mut controller = app::open(&settings, OpenOptions::default())?;
            let added = app::archive_all(&mut controller, messages)?;
            println!("Imported {} of {} message(s)", added, total);
        }
        Command::Seed => {
            let mut controller = app::open(&settings, OpenOptions::default())?;
            let added = app::archive_all(&mut controller, sample_archive())?;
            info!("Seeded demo archive");
            println!("Added {} demo message(s)", added);
        }
    }

    Ok(())
}
