use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use colored::*;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::contact::{ContactBook, Person, RelationKind};
use crate::relationship::{self, RelationView};
use crate::store::ContactStore;
use crate::utils;

fn open_store(data_dir: Option<PathBuf>) -> Result<(Config, ContactStore, ContactBook)> {
    let config = Config::new(data_dir)?;
    let store = ContactStore::new(&config);
    let book = store.load();
    Ok((config, store, book))
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_add(
    name: String,
    phone: Option<String>,
    country: Option<String>,
    institute: Option<String>,
    url: Option<String>,
    memo: Option<String>,
    role: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (_config, store, mut book) = open_store(data_dir)?;

    let mut person = Person::new(&name);
    person.phone = phone.unwrap_or_default();
    person.country = country.unwrap_or_default();
    person.institute = institute.unwrap_or_default();
    person.profile_url = url;
    person.memo = memo;
    person.role = role;

    println!(
        "✅ Added {} ({})",
        person.name.green(),
        utils::short_id(&person.id).dimmed()
    );

    book.add(person);
    store.save(&book)?;

    Ok(())
}

pub async fn handle_list(
    search: Option<String>,
    sort: String,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (_config, _store, book) = open_store(data_dir)?;

    let mut people: Vec<&Person> = match &search {
        Some(query) => book.search(query),
        None => book.people().iter().collect(),
    };

    if people.is_empty() {
        match search {
            Some(query) => println!("{}", format!("No contacts match '{}'", query).yellow()),
            None => println!("{}", "No contacts yet".yellow()),
        }
        return Ok(());
    }

    match sort.as_str() {
        "created" => people.sort_by_key(|p| p.created_at),
        "country" => people.sort_by(|a, b| {
            a.country
                .to_lowercase()
                .cmp(&b.country.to_lowercase())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }),
        _ => people.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
    }

    println!("📒 Contacts ({}):", people.len());
    for person in people {
        println!(
            "  {} {:<22} {:<18} {:<12} {:>2} notes {:>2} links",
            utils::short_id(&person.id).dimmed(),
            person.name.cyan(),
            person.institute,
            person.country,
            person.notes.len(),
            person.links.len()
        );
    }

    Ok(())
}

fn print_relation(view: &RelationView) {
    let direction = if view.direct {
        "→".to_string()
    } else {
        "← recorded by them".dimmed().to_string()
    };
    let memo = view
        .memo
        .as_deref()
        .map(|m| format!("\"{}\"", m))
        .unwrap_or_default();

    println!(
        "  {} {:<22} {:<14} {} {}",
        utils::short_id(&view.person_id).dimmed(),
        view.name.cyan(),
        view.kind.to_string().yellow(),
        direction,
        memo.dimmed()
    );
}

pub async fn handle_show(person: String, data_dir: Option<PathBuf>) -> Result<()> {
    let (_config, _store, book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;
    let person = match book.get(&id) {
        Some(person) => person,
        None => return Ok(()),
    };

    println!(
        "👤 {} ({})",
        person.name.cyan().bold(),
        utils::short_id(&person.id).dimmed()
    );
    if let Some(role) = &person.role {
        println!("Role: {}", role.yellow());
    }
    if !person.phone.is_empty() {
        println!("Phone: {}", person.phone);
    }
    if !person.country.is_empty() {
        println!("Country: {}", person.country);
    }
    if !person.institute.is_empty() {
        println!("Institute: {}", person.institute);
    }
    if let Some(url) = &person.profile_url {
        println!("URL: {}", url);
    }
    if let Some(memo) = &person.memo {
        println!("Memo: {}", memo);
    }
    if let Some(avatar) = &person.avatar {
        println!("Avatar: {} bytes", avatar.len());
    }
    println!("Added: {}", person.created_at.format("%Y-%m-%d"));

    if !person.notes.is_empty() {
        println!("\n📝 Notes ({}):", person.notes.len());
        for note in &person.notes {
            println!(
                "  {} {} ({})",
                note.date.format("%Y-%m-%d").to_string().dimmed(),
                note.content,
                utils::short_id(&note.id).dimmed()
            );
        }
    }

    let views = relationship::relation_views(person, &book);
    if !views.is_empty() {
        println!("\n👥 Relationships ({}):", views.len());
        for view in &views {
            print_relation(view);
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_edit(
    person: String,
    name: Option<String>,
    phone: Option<String>,
    country: Option<String>,
    institute: Option<String>,
    url: Option<String>,
    memo: Option<String>,
    role: Option<String>,
    avatar: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (_config, store, mut book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;

    let avatar_payload = match avatar {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Some(BASE64.encode(bytes))
        }
        None => None,
    };

    let person = match book.get_mut(&id) {
        Some(person) => person,
        None => return Ok(()),
    };

    if let Some(name) = name {
        person.name = name;
    }
    if let Some(phone) = phone {
        person.phone = phone;
    }
    if let Some(country) = country {
        person.country = country;
    }
    if let Some(institute) = institute {
        person.institute = institute;
    }
    if let Some(url) = url {
        person.profile_url = Some(url);
    }
    if let Some(memo) = memo {
        person.memo = Some(memo);
    }
    if let Some(role) = role {
        person.role = Some(role);
    }
    if let Some(payload) = avatar_payload {
        person.avatar = Some(payload);
    }

    println!("✅ Updated {}", person.name.green());
    store.save(&book)?;

    Ok(())
}

pub async fn handle_delete(person: String, yes: bool, data_dir: Option<PathBuf>) -> Result<()> {
    let (_config, store, mut book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;
    let (name, notes, links) = match book.get(&id) {
        Some(person) => (person.name.clone(), person.notes.len(), person.links.len()),
        None => return Ok(()),
    };

    let prompt = format!(
        "Delete {} ({} notes, {} relationships) and every relationship pointing at them?",
        name, notes, links
    );
    if !yes && !utils::confirm(&prompt) {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    book.remove(&id);
    store.save(&book)?;

    println!("🗑 Deleted {}", name.red());

    Ok(())
}

pub async fn handle_note_add(
    person: String,
    content: String,
    date: Option<String>,
    polish: bool,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (config, store, mut book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;

    let date = match date {
        Some(s) => {
            let day = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?;
            Some(day.and_time(chrono::NaiveTime::MIN).and_utc())
        }
        None => None,
    };

    let content = if polish {
        let assistant = Assistant::from_config(&config, None, None);
        let polished = assistant.polish(&content).await;
        if polished != content {
            println!("✨ {}", polished.italic());
        }
        polished
    } else {
        content
    };

    let person = match book.get_mut(&id) {
        Some(person) => person,
        None => return Ok(()),
    };

    let note_id = person.add_note(&content, date);
    println!(
        "📝 Added note to {} ({})",
        person.name.green(),
        utils::short_id(&note_id).dimmed()
    );

    store.save(&book)?;

    Ok(())
}

pub async fn handle_note_list(person: String, data_dir: Option<PathBuf>) -> Result<()> {
    let (_config, _store, book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;
    let person = match book.get(&id) {
        Some(person) => person,
        None => return Ok(()),
    };

    if person.notes.is_empty() {
        println!("{}", format!("No notes for {}", person.name).yellow());
        return Ok(());
    }

    println!("📝 Notes for {} ({}):", person.name.cyan(), person.notes.len());
    for note in &person.notes {
        println!(
            "  {} {} ({})",
            note.date.format("%Y-%m-%d").to_string().dimmed(),
            note.content,
            utils::short_id(&note.id).dimmed()
        );
    }

    Ok(())
}

pub async fn handle_note_delete(
    person: String,
    note_id: String,
    yes: bool,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (_config, store, mut book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;
    let person = match book.get_mut(&id) {
        Some(person) => person,
        None => return Ok(()),
    };

    // Allow the short display prefix as well as the full id
    let full_id = person
        .notes
        .iter()
        .find(|n| n.id == note_id || n.id.starts_with(&note_id))
        .map(|n| n.id.clone())
        .ok_or_else(|| anyhow::anyhow!("Note not found: {}", note_id))?;

    if !yes && !utils::confirm("Delete this note?") {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    person.delete_note(&full_id)?;
    let name = person.name.clone();
    store.save(&book)?;

    println!("🗑 Deleted note from {}", name);

    Ok(())
}

pub async fn handle_link_add(
    person: String,
    targets: Vec<String>,
    kind: String,
    memo: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (_config, store, mut book) = open_store(data_dir)?;

    let focal_id = book.resolve_id(&person)?;

    let mut target_ids = Vec::new();
    for target in &targets {
        let target_id = book.resolve_id(target)?;
        if target_id == focal_id {
            println!(
                "{}",
                format!("Skipping '{}': cannot link a contact to themselves", target).yellow()
            );
            continue;
        }
        target_ids.push(target_id);
    }

    if target_ids.is_empty() {
        println!("{}", "Nothing to link.".yellow());
        return Ok(());
    }

    let kind = RelationKind::parse(&kind);
    relationship::add_links(&mut book, &focal_id, &target_ids, &kind, memo.as_deref())?;
    store.save(&book)?;

    let focal_name = book
        .get(&focal_id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    println!(
        "🔗 Linked {} to {} contact(s) as {}",
        focal_name.green(),
        target_ids.len(),
        kind.to_string().yellow()
    );

    Ok(())
}

pub async fn handle_link_list(person: String, data_dir: Option<PathBuf>) -> Result<()> {
    let (_config, _store, book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;
    let person = match book.get(&id) {
        Some(person) => person,
        None => return Ok(()),
    };

    let views = relationship::relation_views(person, &book);
    if views.is_empty() {
        println!("{}", format!("No relationships for {}", person.name).yellow());
        return Ok(());
    }

    println!("👥 Relationships for {} ({}):", person.name.cyan(), views.len());
    for view in &views {
        print_relation(view);
    }

    Ok(())
}

pub async fn handle_link_remove(
    person: String,
    counterpart: String,
    yes: bool,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (_config, store, mut book) = open_store(data_dir)?;

    let focal_id = book.resolve_id(&person)?;
    let counterpart_id = book.resolve_id(&counterpart)?;

    let focal = match book.get(&focal_id) {
        Some(person) => person,
        None => return Ok(()),
    };
    let focal_name = focal.name.clone();

    let views = relationship::relation_views(focal, &book);
    let view = views
        .into_iter()
        .find(|v| v.person_id == counterpart_id)
        .ok_or_else(|| {
            anyhow::anyhow!("No relationship between {} and {}", person, counterpart)
        })?;

    let stored_on = if view.direct {
        format!("recorded on {}", focal_name)
    } else {
        format!("recorded on {}", view.name)
    };
    let prompt = format!(
        "Remove the {} relationship between {} and {} ({})?",
        view.kind, focal_name, view.name, stored_on
    );
    if !yes && !utils::confirm(&prompt) {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    relationship::remove_relation(&mut book, &focal_id, &view)?;
    store.save(&book)?;

    println!("🗑 Removed relationship with {}", view.name);

    Ok(())
}

pub async fn handle_suggest(
    person: String,
    provider: Option<String>,
    model: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let (config, _store, book) = open_store(data_dir)?;

    let id = book.resolve_id(&person)?;
    let person = match book.get(&id) {
        Some(person) => person,
        None => return Ok(()),
    };

    // Notes are newest-first, so this is the most recent context
    let recent: Vec<String> = person
        .notes
        .iter()
        .take(5)
        .map(|n| n.content.clone())
        .collect();

    let assistant = Assistant::from_config(&config, provider, model);
    let suggestions = assistant.suggest(&person.name, &recent).await;

    if suggestions.is_empty() {
        println!("{}", "No suggestions available.".yellow());
        return Ok(());
    }

    println!("💡 Conversation starters for {}:", person.name.cyan());
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  {}. {}", (i + 1).to_string().cyan(), suggestion);
    }

    Ok(())
}

pub async fn handle_polish(
    text: String,
    provider: Option<String>,
    model: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let config = Config::new(data_dir)?;

    let assistant = Assistant::from_config(&config, provider, model);
    let polished = assistant.polish(&text).await;

    println!("{}", polished);

    Ok(())
}
