use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rolo")]
#[command(about = "Personal contact and relationship manager")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: OS config dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new contact
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        institute: Option<String>,
        /// Profile URL
        #[arg(long)]
        url: Option<String>,
        /// Free-text memo on the contact
        #[arg(long)]
        memo: Option<String>,
        /// Primary role (e.g. mentor, labmate)
        #[arg(long)]
        role: Option<String>,
    },
    /// List contacts
    List {
        /// Filter by name, country, institute or memo
        #[arg(long)]
        search: Option<String>,
        /// Sort order (name, created, country)
        #[arg(long, default_value = "name")]
        sort: String,
    },
    /// Show a contact's profile, notes and relationships
    Show {
        /// Contact id or name
        person: String,
    },
    /// Edit a contact's profile fields
    Edit {
        /// Contact id or name
        person: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        institute: Option<String>,
        /// Profile URL
        #[arg(long)]
        url: Option<String>,
        /// Free-text memo on the contact
        #[arg(long)]
        memo: Option<String>,
        /// Primary role (e.g. mentor, labmate)
        #[arg(long)]
        role: Option<String>,
        /// Image file stored as the contact's avatar
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Delete a contact and every relationship pointing at them
    Delete {
        /// Contact id or name
        person: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Manage dated notes on a contact
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Manage relationships between contacts
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Suggest conversation starters for a contact
    Suggest {
        /// Contact id or name
        person: String,
        /// AI provider (default: configured)
        #[arg(long)]
        provider: Option<String>,
        /// AI model (default: provider default)
        #[arg(long)]
        model: Option<String>,
    },
    /// Polish a piece of text with the configured AI provider
    Polish {
        text: String,
        /// AI provider (default: configured)
        #[arg(long)]
        provider: Option<String>,
        /// AI model (default: provider default)
        #[arg(long)]
        model: Option<String>,
    },
    /// Export all contacts to a JSON file
    Export { file: PathBuf },
    /// Replace all contacts with the contents of a JSON file
    Import {
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Add a note
    Add {
        /// Contact id or name
        person: String,
        content: String,
        /// Note date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Polish the note text before saving
        #[arg(long)]
        polish: bool,
    },
    /// List notes, newest first
    List {
        /// Contact id or name
        person: String,
    },
    /// Delete a note by id
    Delete {
        /// Contact id or name
        person: String,
        note_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LinkCommands {
    /// Add or update relationships from one contact to others
    Add {
        /// Contact id or name
        person: String,
        /// Counterpart contacts (id or name)
        #[arg(required = true)]
        targets: Vec<String>,
        /// Relationship kind (friend, family, colleague, collaborator,
        /// advisor, student, or free text)
        #[arg(long)]
        kind: String,
        /// Note on the relationship itself
        #[arg(long)]
        memo: Option<String>,
    },
    /// List relationships, including ones recorded by other contacts
    List {
        /// Contact id or name
        person: String,
    },
    /// Remove the relationship with a counterpart
    Remove {
        /// Contact id or name
        person: String,
        /// Counterpart id or name
        counterpart: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
