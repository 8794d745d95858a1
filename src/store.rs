use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::contact::{ContactBook, Person};

/// File-backed persistence for the whole contact collection.
///
/// The collection is saved in full after every accepted mutation and
/// loaded once at startup.
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    pub fn new(config: &Config) -> Self {
        ContactStore {
            path: config.contacts_file(),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        ContactStore { path }
    }

    /// Load the previously saved collection. A missing file or
    /// unparsable content yields an empty collection, not an error.
    pub fn load(&self) -> ContactBook {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return ContactBook::new(),
        };

        match serde_json::from_str::<Vec<Person>>(&content) {
            Ok(people) => ContactBook::from_people(people),
            Err(_) => ContactBook::new(),
        }
    }

    pub fn save(&self, book: &ContactBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create data directory")?;
        }

        let content = serde_json::to_string_pretty(book.people())
            .context("Failed to serialize contacts")?;

        std::fs::write(&self.path, content)
            .context("Failed to write contacts file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, ContactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::with_path(dir.path().join("contacts.json"));
        (dir, store)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, store) = temp_store();

        let mut book = ContactBook::new();
        let mut alice = Person::new("Alice");
        alice.add_note("first note", None);
        book.add(alice);
        book.add(Person::new("Bob"));

        store.save(&book).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, book);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path.clone(), "{not json").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path.clone(), r#"{"people": []}"#).unwrap();

        assert!(store.load().is_empty());
    }
}
