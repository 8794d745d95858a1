use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use colored::*;

use crate::config::Config;
use crate::contact::{ContactBook, Person};
use crate::store::ContactStore;
use crate::utils;

/// Serialize the full collection to a JSON document
pub fn export_contacts(book: &ContactBook, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(book.people())
        .context("Failed to serialize contacts")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Parse an import document. Only a top-level JSON list is accepted;
/// anything else is an error and the current collection stays as-is.
pub fn parse_import(content: &str) -> Result<ContactBook> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("Import file is not valid JSON")?;

    if !value.is_array() {
        return Err(anyhow!(
            "Import document must be a top-level list of contacts"
        ));
    }

    let people: Vec<Person> = serde_json::from_value(value)
        .context("Import entries could not be read as contacts")?;

    Ok(ContactBook::from_people(people))
}

fn count_edges(book: &ContactBook) -> (usize, usize) {
    let notes = book.people().iter().map(|p| p.notes.len()).sum();
    let links = book.people().iter().map(|p| p.links.len()).sum();
    (notes, links)
}

pub async fn handle_export(file: PathBuf, data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;
    let store = ContactStore::new(&config);
    let book = store.load();

    export_contacts(&book, &file)?;

    let (notes, links) = count_edges(&book);
    println!(
        "📤 Exported {} contacts ({} notes, {} relationships) to {}",
        book.len().to_string().cyan(),
        notes,
        links,
        file.display().to_string().yellow()
    );

    Ok(())
}

pub async fn handle_import(file: PathBuf, yes: bool, data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;
    let store = ContactStore::new(&config);
    let current = store.load();

    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let imported = parse_import(&content)?;

    // Wholesale replacement, no merge
    let prompt = format!(
        "Replace your {} contacts with {} imported contacts?",
        current.len(),
        imported.len()
    );
    if !yes && !utils::confirm(&prompt) {
        println!("{}", "Import cancelled.".yellow());
        return Ok(());
    }

    store.save(&imported)?;

    let (notes, links) = count_edges(&imported);
    println!("{}", "✅ Import complete".green().bold());
    println!("Contacts: {}", imported.len().to_string().cyan());
    println!("Notes: {}", notes.to_string().cyan());
    println!("Relationships: {}", links.to_string().cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{Link, RelationKind};

    #[test]
    fn test_export_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let mut book = ContactBook::new();
        let mut alice = Person::new("Alice");
        alice.country = "Japan".to_string();
        alice.add_note("met at a conference", None);
        let bob = Person::new("Bob");
        alice.links.push(Link {
            target_id: bob.id.clone(),
            kind: RelationKind::Other("climbing partner".to_string()),
            memo: Some("Tuesdays".to_string()),
        });
        book.add(alice);
        book.add(bob);

        export_contacts(&book, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let imported = parse_import(&content).unwrap();

        assert_eq!(imported, book);
    }

    #[test]
    fn test_import_rejects_non_sequence() {
        assert!(parse_import(r#"{"contacts": []}"#).is_err());
        assert!(parse_import(r#""just a string""#).is_err());
        assert!(parse_import("not json at all").is_err());
    }

    #[test]
    fn test_import_empty_sequence() {
        let book = parse_import("[]").unwrap();
        assert!(book.is_empty());
    }
}
