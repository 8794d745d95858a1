// main.rs
mod ai_provider;
mod assistant;
mod cli;
mod commands;
mod config;
mod contact;
mod relationship;
mod store;
mod transfer;
mod utils;

use clap::Parser;
use cli::{Args, Commands, LinkCommands, NoteCommands};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let data_dir = args.data_dir;

    let result = match args.command {
        Commands::Add {
            name,
            phone,
            country,
            institute,
            url,
            memo,
            role,
        } => {
            commands::handle_add(name, phone, country, institute, url, memo, role, data_dir)
                .await
        }
        Commands::List { search, sort } => commands::handle_list(search, sort, data_dir).await,
        Commands::Show { person } => commands::handle_show(person, data_dir).await,
        Commands::Edit {
            person,
            name,
            phone,
            country,
            institute,
            url,
            memo,
            role,
            avatar,
        } => {
            commands::handle_edit(
                person, name, phone, country, institute, url, memo, role, avatar, data_dir,
            )
            .await
        }
        Commands::Delete { person, yes } => commands::handle_delete(person, yes, data_dir).await,
        Commands::Note { command } => match command {
            NoteCommands::Add {
                person,
                content,
                date,
                polish,
            } => commands::handle_note_add(person, content, date, polish, data_dir).await,
            NoteCommands::List { person } => commands::handle_note_list(person, data_dir).await,
            NoteCommands::Delete {
                person,
                note_id,
                yes,
            } => commands::handle_note_delete(person, note_id, yes, data_dir).await,
        },
        Commands::Link { command } => match command {
            LinkCommands::Add {
                person,
                targets,
                kind,
                memo,
            } => commands::handle_link_add(person, targets, kind, memo, data_dir).await,
            LinkCommands::List { person } => commands::handle_link_list(person, data_dir).await,
            LinkCommands::Remove {
                person,
                counterpart,
                yes,
            } => commands::handle_link_remove(person, counterpart, yes, data_dir).await,
        },
        Commands::Suggest {
            person,
            provider,
            model,
        } => commands::handle_suggest(person, provider, model, data_dir).await,
        Commands::Polish {
            text,
            provider,
            model,
        } => commands::handle_polish(text, provider, model, data_dir).await,
        Commands::Export { file } => transfer::handle_export(file, data_dir).await,
        Commands::Import { file, yes } => transfer::handle_import(file, yes, data_dir).await,
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
