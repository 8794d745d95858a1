use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person in the contact book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub institute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Image payload (base64), stored as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Primary role of this person themselves, not an edge to anyone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A dated free-text note owned by exactly one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub date: DateTime<Utc>,
    pub content: String,
}

/// A directed edge to another person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub target_id: String,
    pub kind: RelationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Relationship kind: a fixed set of standard labels, or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationKind {
    Friend,
    Family,
    Colleague,
    Collaborator,
    Advisor,
    Student,
    Other(String),
}

impl RelationKind {
    /// Standard labels match case-insensitively; anything else is a
    /// free-text kind.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "friend" => RelationKind::Friend,
            "family" => RelationKind::Family,
            "colleague" => RelationKind::Colleague,
            "collaborator" => RelationKind::Collaborator,
            "advisor" => RelationKind::Advisor,
            "student" => RelationKind::Student,
            _ => RelationKind::Other(s.trim().to_string()),
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::Friend => write!(f, "friend"),
            RelationKind::Family => write!(f, "family"),
            RelationKind::Colleague => write!(f, "colleague"),
            RelationKind::Collaborator => write!(f, "collaborator"),
            RelationKind::Advisor => write!(f, "advisor"),
            RelationKind::Student => write!(f, "student"),
            RelationKind::Other(label) => write!(f, "{}", label),
        }
    }
}

impl Person {
    pub fn new(name: &str) -> Self {
        Person {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: String::new(),
            country: String::new(),
            institute: String::new(),
            profile_url: None,
            memo: None,
            avatar: None,
            role: None,
            notes: Vec::new(),
            links: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a note, keeping the list ordered newest-first by date
    pub fn add_note(&mut self, content: &str, date: Option<DateTime<Utc>>) -> String {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            date: date.unwrap_or_else(Utc::now),
            content: content.to_string(),
        };
        let id = note.id.clone();

        let pos = self
            .notes
            .iter()
            .position(|n| n.date <= note.date)
            .unwrap_or(self.notes.len());
        self.notes.insert(pos, note);

        id
    }

    pub fn delete_note(&mut self, note_id: &str) -> Result<()> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != note_id);
        if self.notes.len() == before {
            return Err(anyhow!("Note not found: {}", note_id));
        }
        Ok(())
    }
}

/// The whole collection, in stable storage order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactBook {
    people: Vec<Person>,
}

impl ContactBook {
    pub fn new() -> Self {
        ContactBook { people: Vec::new() }
    }

    pub fn from_people(people: Vec<Person>) -> Self {
        ContactBook { people }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn add(&mut self, person: Person) {
        self.people.push(person);
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| p.id == id)
    }

    /// Remove a person and every link elsewhere that targets them.
    /// No dangling target ids survive a deletion.
    pub fn remove(&mut self, id: &str) -> Option<Person> {
        let pos = self.people.iter().position(|p| p.id == id)?;
        let removed = self.people.remove(pos);

        for person in &mut self.people {
            person.links.retain(|l| l.target_id != id);
        }

        Some(removed)
    }

    /// Resolve a user-supplied query (full id, id prefix, or name) to
    /// exactly one person id. Ambiguity is an error listing candidates.
    pub fn resolve_id(&self, query: &str) -> Result<String> {
        if let Some(person) = self.people.iter().find(|p| p.id == query) {
            return Ok(person.id.clone());
        }

        let q = query.to_lowercase();
        let mut matches: Vec<&Person> = self
            .people
            .iter()
            .filter(|p| p.id.starts_with(query) || p.name.to_lowercase() == q)
            .collect();

        if matches.is_empty() {
            matches = self
                .people
                .iter()
                .filter(|p| p.name.to_lowercase().starts_with(&q))
                .collect();
        }

        match matches.len() {
            0 => Err(anyhow!("No contact matches '{}'", query)),
            1 => Ok(matches[0].id.clone()),
            _ => {
                let candidates: Vec<String> = matches
                    .iter()
                    .map(|p| format!("{} ({})", p.name, crate::utils::short_id(&p.id)))
                    .collect();
                Err(anyhow!(
                    "'{}' is ambiguous: {}",
                    query,
                    candidates.join(", ")
                ))
            }
        }
    }

    /// Case-insensitive substring search over name, country, institute
    /// and memo
    pub fn search(&self, query: &str) -> Vec<&Person> {
        let q = query.to_lowercase();
        self.people
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&q)
                    || p.country.to_lowercase().contains(&q)
                    || p.institute.to_lowercase().contains(&q)
                    || p.memo.as_ref().map_or(false, |m| m.to_lowercase().contains(&q))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn person(name: &str) -> Person {
        Person::new(name)
    }

    #[test]
    fn test_notes_stay_newest_first() {
        let mut p = person("Alice");
        let old = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let mid = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();

        p.add_note("mid", Some(mid));
        p.add_note("old", Some(old));
        p.add_note("new", Some(new));

        let contents: Vec<&str> = p.notes.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_delete_note() {
        let mut p = person("Alice");
        let id = p.add_note("to remove", None);

        p.delete_note(&id).unwrap();
        assert!(p.notes.is_empty());
        assert!(p.delete_note(&id).is_err());
    }

    #[test]
    fn test_remove_purges_inbound_links() {
        let mut book = ContactBook::new();
        let mut alice = person("Alice");
        let bob = person("Bob");
        let mut carol = person("Carol");
        let bob_id = bob.id.clone();

        alice.links.push(Link {
            target_id: bob_id.clone(),
            kind: RelationKind::Friend,
            memo: None,
        });
        alice.links.push(Link {
            target_id: carol.id.clone(),
            kind: RelationKind::Colleague,
            memo: None,
        });
        carol.links.push(Link {
            target_id: bob_id.clone(),
            kind: RelationKind::Advisor,
            memo: None,
        });

        book.add(alice);
        book.add(bob);
        book.add(carol);

        let removed = book.remove(&bob_id).unwrap();
        assert_eq!(removed.name, "Bob");
        assert_eq!(book.len(), 2);

        // Bob owned 0 edges; 2 edges elsewhere targeted him
        let total_links: usize = book.people().iter().map(|p| p.links.len()).sum();
        assert_eq!(total_links, 1);
        assert!(book
            .people()
            .iter()
            .all(|p| p.links.iter().all(|l| l.target_id != bob_id)));
    }

    #[test]
    fn test_resolve_by_name_and_prefix() {
        let mut book = ContactBook::new();
        let alice = person("Alice");
        let alice_id = alice.id.clone();
        book.add(alice);
        book.add(person("Bob"));

        assert_eq!(book.resolve_id("alice").unwrap(), alice_id);
        assert_eq!(book.resolve_id("Ali").unwrap(), alice_id);
        assert_eq!(book.resolve_id(&alice_id[..8]).unwrap(), alice_id);
        assert!(book.resolve_id("nobody").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let mut book = ContactBook::new();
        book.add(person("Anna"));
        book.add(person("Andrew"));

        assert!(book.resolve_id("An").is_err());
    }

    #[test]
    fn test_search_matches_profile_fields() {
        let mut book = ContactBook::new();
        let mut alice = person("Alice");
        alice.institute = "MIT".to_string();
        let mut bob = person("Bob");
        bob.country = "Japan".to_string();
        bob.memo = Some("met at RustConf".to_string());
        book.add(alice);
        book.add(bob);

        assert_eq!(book.search("mit").len(), 1);
        assert_eq!(book.search("japan").len(), 1);
        assert_eq!(book.search("rustconf").len(), 1);
        assert_eq!(book.search("zzz").len(), 0);
    }

    #[test]
    fn test_relation_kind_parse_and_display() {
        assert_eq!(RelationKind::parse("Friend"), RelationKind::Friend);
        assert_eq!(RelationKind::parse("COLLEAGUE"), RelationKind::Colleague);
        assert_eq!(
            RelationKind::parse("climbing partner"),
            RelationKind::Other("climbing partner".to_string())
        );
        assert_eq!(RelationKind::Advisor.to_string(), "advisor");
        assert_eq!(
            RelationKind::Other("climbing partner".to_string()).to_string(),
            "climbing partner"
        );
    }
}
