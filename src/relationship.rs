use std::collections::HashSet;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::contact::{ContactBook, Link, Person, RelationKind};

/// One row of a person's relationship view.
///
/// `direct` is true when the edge is stored on the focal person; false
/// when it was inferred from the counterpart's own links.
#[derive(Debug, Clone, Serialize)]
pub struct RelationView {
    pub person_id: String,
    pub name: String,
    pub country: String,
    pub institute: String,
    pub kind: RelationKind,
    pub memo: Option<String>,
    pub direct: bool,
}

impl RelationView {
    fn from_link(counterpart: &Person, link: &Link, direct: bool) -> Self {
        RelationView {
            person_id: counterpart.id.clone(),
            name: counterpart.name.clone(),
            country: counterpart.country.clone(),
            institute: counterpart.institute.clone(),
            kind: link.kind.clone(),
            memo: link.memo.clone(),
            direct,
        }
    }
}

/// Build the deduplicated relationship view for one person.
///
/// Direct edges come first, in the focal person's own storage order;
/// then edges other people recorded towards the focal person, in
/// collection order. The merge is keyed by counterpart id and the
/// first insertion wins, so a direct edge always beats an implied one.
pub fn relation_views(focal: &Person, book: &ContactBook) -> Vec<RelationView> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut views = Vec::new();

    for link in &focal.links {
        if link.target_id == focal.id {
            continue;
        }
        let target = match book.get(&link.target_id) {
            Some(target) => target,
            // Stale reference, dropped silently
            None => continue,
        };
        if seen.insert(target.id.as_str()) {
            views.push(RelationView::from_link(target, link, true));
        }
    }

    for other in book.people() {
        if other.id == focal.id || seen.contains(other.id.as_str()) {
            continue;
        }
        if let Some(back) = other.links.iter().find(|l| l.target_id == focal.id) {
            seen.insert(other.id.as_str());
            views.push(RelationView::from_link(other, back, false));
        }
    }

    views
}

/// Batch upsert: one link per counterpart, all with the same kind and
/// memo. An existing edge to a counterpart is overwritten in place so
/// its position in the edge list is preserved; otherwise a new edge is
/// appended.
pub fn add_links(
    book: &mut ContactBook,
    focal_id: &str,
    target_ids: &[String],
    kind: &RelationKind,
    memo: Option<&str>,
) -> Result<()> {
    let focal = book
        .get_mut(focal_id)
        .ok_or_else(|| anyhow!("Contact not found: {}", focal_id))?;

    for target_id in target_ids {
        match focal.links.iter_mut().find(|l| &l.target_id == target_id) {
            Some(existing) => {
                existing.kind = kind.clone();
                existing.memo = memo.map(|s| s.to_string());
            }
            None => focal.links.push(Link {
                target_id: target_id.clone(),
                kind: kind.clone(),
                memo: memo.map(|s| s.to_string()),
            }),
        }
    }

    Ok(())
}

/// Remove the relationship a view row stands for. The edge is deleted
/// wherever it is physically stored: on the focal person for a direct
/// row, on the counterpart for an implied one.
pub fn remove_relation(book: &mut ContactBook, focal_id: &str, view: &RelationView) -> Result<()> {
    let (owner_id, target_id) = if view.direct {
        (focal_id, view.person_id.as_str())
    } else {
        (view.person_id.as_str(), focal_id)
    };

    let owner = book
        .get_mut(owner_id)
        .ok_or_else(|| anyhow!("Contact not found: {}", owner_id))?;

    let before = owner.links.len();
    owner.links.retain(|l| l.target_id != target_id);
    if owner.links.len() == before {
        return Err(anyhow!(
            "No relationship between {} and {}",
            focal_id,
            view.person_id
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with(people: Vec<Person>) -> ContactBook {
        ContactBook::from_people(people)
    }

    fn link(target: &Person, kind: RelationKind) -> Link {
        Link {
            target_id: target.id.clone(),
            kind,
            memo: None,
        }
    }

    #[test]
    fn test_implied_relationship_surfaces() {
        let alice = Person::new("Alice");
        let mut bob = Person::new("Bob");
        bob.links.push(link(&alice, RelationKind::Advisor));

        let book = book_with(vec![alice.clone(), bob]);
        let focal = book.get(&alice.id).unwrap();
        let views = relation_views(focal, &book);

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "Bob");
        assert_eq!(views[0].kind, RelationKind::Advisor);
        assert!(!views[0].direct);
    }

    #[test]
    fn test_direct_wins_over_implied() {
        let mut alice = Person::new("Alice");
        let mut bob = Person::new("Bob");
        alice.links.push(link(&bob, RelationKind::Friend));
        bob.links.push(link(&alice, RelationKind::Colleague));

        let book = book_with(vec![alice.clone(), bob]);
        let focal = book.get(&alice.id).unwrap();
        let views = relation_views(focal, &book);

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].kind, RelationKind::Friend);
        assert!(views[0].direct);
    }

    #[test]
    fn test_direct_edges_keep_storage_order_before_implied() {
        let mut alice = Person::new("Alice");
        let bob = Person::new("Bob");
        let carol = Person::new("Carol");
        let mut dave = Person::new("Dave");
        alice.links.push(link(&carol, RelationKind::Colleague));
        alice.links.push(link(&bob, RelationKind::Friend));
        dave.links.push(link(&alice, RelationKind::Student));

        let book = book_with(vec![alice.clone(), bob, carol, dave]);
        let focal = book.get(&alice.id).unwrap();
        let views = relation_views(focal, &book);

        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Bob", "Dave"]);
        assert!(views[0].direct && views[1].direct && !views[2].direct);
    }

    #[test]
    fn test_stale_target_dropped_silently() {
        let mut alice = Person::new("Alice");
        alice.links.push(Link {
            target_id: "gone".to_string(),
            kind: RelationKind::Friend,
            memo: None,
        });

        let book = book_with(vec![alice.clone()]);
        let focal = book.get(&alice.id).unwrap();

        assert!(relation_views(focal, &book).is_empty());
    }

    #[test]
    fn test_add_links_batch_upsert() {
        let mut alice = Person::new("Alice");
        let bob = Person::new("Bob");
        let carol = Person::new("Carol");
        // Pre-existing edge to Bob, first in the list
        alice.links.push(Link {
            target_id: bob.id.clone(),
            kind: RelationKind::Friend,
            memo: Some("old memo".to_string()),
        });
        alice.links.push(link(&carol, RelationKind::Student));

        let alice_id = alice.id.clone();
        let bob_id = bob.id.clone();
        let carol_id = carol.id.clone();
        let mut book = book_with(vec![alice, bob, carol]);

        add_links(
            &mut book,
            &alice_id,
            &[bob_id.clone(), carol_id.clone()],
            &RelationKind::Colleague,
            Some("note"),
        )
        .unwrap();

        let alice = book.get(&alice_id).unwrap();
        assert_eq!(alice.links.len(), 2);
        // Bob's edge kept its position, kind and memo fully replaced
        assert_eq!(alice.links[0].target_id, bob_id);
        assert_eq!(alice.links[0].kind, RelationKind::Colleague);
        assert_eq!(alice.links[0].memo.as_deref(), Some("note"));
        assert_eq!(alice.links[1].target_id, carol_id);
        assert_eq!(alice.links[1].kind, RelationKind::Colleague);
        assert_eq!(alice.links[1].memo.as_deref(), Some("note"));
    }

    #[test]
    fn test_remove_direct_relation() {
        let mut alice = Person::new("Alice");
        let bob = Person::new("Bob");
        alice.links.push(link(&bob, RelationKind::Friend));

        let alice_id = alice.id.clone();
        let mut book = book_with(vec![alice, bob]);

        let views = relation_views(book.get(&alice_id).unwrap(), &book);
        remove_relation(&mut book, &alice_id, &views[0]).unwrap();

        assert!(book.get(&alice_id).unwrap().links.is_empty());
    }

    #[test]
    fn test_remove_implied_relation_targets_counterpart() {
        let mut alice = Person::new("Alice");
        let carol = Person::new("Carol");
        let mut bob = Person::new("Bob");
        // Alice's own unrelated edge must survive
        alice.links.push(link(&carol, RelationKind::Colleague));
        bob.links.push(link(&alice, RelationKind::Friend));

        let alice_id = alice.id.clone();
        let bob_id = bob.id.clone();
        let mut book = book_with(vec![alice, bob, carol]);

        let views = relation_views(book.get(&alice_id).unwrap(), &book);
        let implied = views.iter().find(|v| !v.direct).unwrap().clone();
        remove_relation(&mut book, &alice_id, &implied).unwrap();

        assert!(book.get(&bob_id).unwrap().links.is_empty());
        assert_eq!(book.get(&alice_id).unwrap().links.len(), 1);
    }
}
