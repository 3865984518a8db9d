//! Session-level flows against a real blob store: persistence, reload,
//! and recovery from corrupt state.

use std::sync::Arc;

use kindred_core::catalog::Catalog;
use kindred_core::filter::FilterQuery;
use kindred_core::notes::ContextId;
use kindred_core::{CoreError, Session, users};
use kindred_db::{BlobStore, Database, MemoryStore, keys, load_json};
use kindred_types::models::{BookmarkMark, FavorStatus, Partner, User};

const CATALOG: &str = r#"{
    "version": "test-1",
    "entries": [
        {"id": 1, "name": "Oxytocin Ritual", "category": "rituals", "tags": ["touch"], "description": "Hold on for twenty seconds."},
        {"id": 5, "name": "Love Map", "category": "communication", "tags": ["gottman"], "description": "Knowing your partner's world."},
        {"id": 9, "name": "Flooding", "category": "conflict", "tags": ["gottman"], "description": "Physiological overwhelm."}
    ]
}"#;

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json(CATALOG).unwrap())
}

#[test]
fn state_survives_reload() {
    let store: Arc<dyn BlobStore> = Arc::new(Database::open_in_memory().unwrap());

    let favor_id = {
        let mut session = Session::hydrate(catalog(), store.clone());
        session.sign_in(users::new_user("Alice", None).unwrap());
        session.pair_partner("BOB-1234", "Bob").unwrap();
        session.toggle_bookmark(5, BookmarkMark::Loved).unwrap();
        session.add_note(ContextId::Term(5), "hello").unwrap();
        session.add_journal_entry(None, "Good week.").unwrap();
        session.create_favor(1, "Give a long hug", "tonight").unwrap().id
    };

    let mut session = Session::hydrate(catalog(), store.clone());
    assert_eq!(session.current_user().unwrap().name, "Alice");
    assert_eq!(session.partner().unwrap().name, "Bob");
    assert_eq!(session.mark(5), Some(BookmarkMark::Loved));
    assert_eq!(session.notes().list(ContextId::Term(5))[0].text, "hello");
    assert_eq!(session.journal_entries().unwrap().len(), 1);
    assert_eq!(session.favors().get(favor_id).unwrap().status, FavorStatus::Available);

    // New ids continue past the reloaded ones
    let next = session.create_favor(9, "Take a walk", "").unwrap().id;
    assert!(next > favor_id);
}

#[test]
fn corrupt_blobs_fall_back_to_defaults() {
    let store = Arc::new(MemoryStore::new());
    store.set(&keys::storage_key(keys::FAVORS), "[{\"id\": ").unwrap();
    store.set(&keys::storage_key(keys::CURRENT_USER), "42").unwrap();
    store.set(&keys::storage_key(keys::NOTES), "{\"term-1\": [{\"id\": 1, \"author\": \"A\", \"text\": \"kept\", \"created_at\": 1}]}").unwrap();

    let session = Session::hydrate(catalog(), store);
    assert!(session.favors().is_empty());
    assert!(session.current_user().is_none());
    // Keys are independent; a bad favors blob does not discard notes
    assert_eq!(session.notes().count(ContextId::Term(1)), 1);
}

#[test]
fn favor_lifecycle_between_partners() {
    let mut session = Session::hydrate(catalog(), Arc::new(MemoryStore::new()));
    session.sign_in(users::new_user("Alice", None).unwrap());
    let id = session.create_favor(5, "Ask three open questions", "Friday").unwrap().id;

    assert_eq!(session.claim_favor(id).unwrap_err(), CoreError::SelfClaim);

    session.sign_in(users::new_user("Bob", None).unwrap());
    let claimed = session.claim_favor(id).unwrap();
    assert_eq!(claimed.claimed_by.as_deref(), Some("Bob"));

    session.sign_in(users::new_user("Carol", None).unwrap());
    assert!(session.claim_favor(id).unwrap_err().is_silent());
    assert_eq!(session.favors().get(id).unwrap().claimed_by.as_deref(), Some("Bob"));

    session.sign_in(users::new_user("Bob", None).unwrap());
    assert_eq!(session.toggle_favor_done(id).unwrap().status, FavorStatus::Done);
    let reopened = session.toggle_favor_done(id).unwrap();
    assert_eq!(reopened.status, FavorStatus::Claimed);
    assert_eq!(reopened.claimed_by.as_deref(), Some("Bob"));

    session.add_note(ContextId::Favor(id), "Loved this").unwrap();
    assert_eq!(session.notes().count(ContextId::Favor(id)), 1);
}

#[test]
fn directory_buckets_follow_bookmarks() {
    let mut session = Session::hydrate(catalog(), Arc::new(MemoryStore::new()));
    session.sign_in(users::demo_user());
    session.toggle_bookmark(9, BookmarkMark::Liked).unwrap();
    session.toggle_bookmark(1, BookmarkMark::Loved).unwrap();

    let query = FilterQuery { search: "o".into(), ..Default::default() };
    let buckets = session.directory(&query);
    assert_eq!(buckets.loved.len(), 1);
    assert_eq!(buckets.liked.len(), 1);
    assert_eq!(buckets.other.len(), 1);
    assert_eq!(buckets.len(), 3);
}

#[test]
fn sign_out_reloads_as_signed_out() {
    let store: Arc<dyn BlobStore> = Arc::new(Database::open_in_memory().unwrap());

    {
        let mut session = Session::hydrate(catalog(), store.clone());
        session.sign_in(users::new_user("Alice", None).unwrap());
        session.pair_partner("BOB-1234", "Bob").unwrap();
        session.sign_out().unwrap();
    }

    // Stored as a readable "nobody", not as a blob the loader must discard
    let user_key = keys::storage_key(keys::CURRENT_USER);
    let partner_key = keys::storage_key(keys::PARTNER);
    assert_eq!(load_json::<Option<User>>(store.as_ref(), &user_key), Some(None));
    assert_eq!(load_json::<Option<Partner>>(store.as_ref(), &partner_key), Some(None));

    let session = Session::hydrate(catalog(), store);
    assert!(session.current_user().is_none());
    assert!(session.partner().is_none());
}

#[test]
fn partner_belongs_to_the_user_who_paired() {
    let mut session = Session::hydrate(catalog(), Arc::new(MemoryStore::new()));
    session.sign_in(users::new_user("Alice", None).unwrap());
    session.pair_partner("BOB-1234", "Bob").unwrap();

    // Signing in again as the same user keeps the pairing
    session.sign_in(users::new_user("Alice", None).unwrap());
    assert_eq!(session.partner().unwrap().name, "Bob");

    session.sign_out().unwrap();
    session.sign_in(users::new_user("Carol", None).unwrap());
    assert!(session.partner().is_none());

    session.pair_partner("DAVE-5678", "Dave").unwrap();
    session.sign_in(users::new_user("Erin", None).unwrap());
    assert!(session.partner().is_none());
}
