//! Explicit session context: who is signed in, their partner, and every
//! ledger, persisted through an injected [`BlobStore`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use kindred_db::{BlobStore, keys, load_json, save_json};
use kindred_types::models::{BookmarkMark, Favor, FavorStatus, JournalEntry, Note, Partner, User};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bookmarks::BookmarkLedger;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::favors::FavorLedger;
use crate::filter::{Buckets, FilterQuery, filter_entries};
use crate::journal::Journal;
use crate::notes::{AnnotationLog, ContextId};
use crate::users;

pub struct Session {
    catalog: Arc<Catalog>,
    store: Arc<dyn BlobStore>,
    current_user: Option<User>,
    partner: Option<Partner>,
    bookmarks: BookmarkLedger,
    favors: FavorLedger,
    notes: AnnotationLog,
    journal: Journal,
}

impl Session {
    /// Build a session from whatever the store holds. Anything missing or
    /// unreadable starts out empty.
    pub fn hydrate(catalog: Arc<Catalog>, store: Arc<dyn BlobStore>) -> Self {
        let load = |name: &str| keys::storage_key(name);
        let s = store.as_ref();

        let session = Self {
            // Signed-out state is stored as `null`
            current_user: load_json::<Option<User>>(s, &load(keys::CURRENT_USER)).flatten(),
            partner: load_json::<Option<Partner>>(s, &load(keys::PARTNER)).flatten(),
            bookmarks: load_json(s, &load(keys::BOOKMARKS)).unwrap_or_default(),
            favors: load_json(s, &load(keys::FAVORS)).unwrap_or_default(),
            notes: load_json(s, &load(keys::NOTES)).unwrap_or_default(),
            journal: load_json(s, &load(keys::JOURNAL)).unwrap_or_default(),
            catalog,
            store,
        };

        info!(
            "Session hydrated: user={:?}, {} favors ({} open), {} journal entries",
            session.current_user.as_ref().map(|u| u.name.as_str()),
            session.favors.len(),
            session.favors.with_status(FavorStatus::Available).count(),
            session.journal.len()
        );
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn partner(&self) -> Option<&Partner> {
        self.partner.as_ref()
    }

    pub fn favors(&self) -> &FavorLedger {
        &self.favors
    }

    pub fn notes(&self) -> &AnnotationLog {
        &self.notes
    }

    // -- Account --

    /// Switching to a different user drops the previous user's partner.
    pub fn sign_in(&mut self, user: User) -> &User {
        if self.current_user.as_ref().map(|u| u.name.as_str()) != Some(user.name.as_str()) {
            self.unpair();
        }

        info!("{} signed in", user.name);
        self.persist(keys::CURRENT_USER, &Some(&user));
        self.current_user.insert(user)
    }

    pub fn sign_out(&mut self) -> CoreResult<User> {
        let user = self.current_user.take().ok_or(CoreError::NotAuthenticated)?;
        self.persist(keys::CURRENT_USER, &None::<User>);
        self.unpair();
        info!("{} signed out", user.name);
        Ok(user)
    }

    pub fn pair_partner(&mut self, connect_id: &str, name: &str) -> CoreResult<&Partner> {
        let user = self.require_user()?;
        let partner = users::pair(user, connect_id, name, Utc::now())?;
        info!("{} paired with {}", user.name, partner.name);

        self.persist(keys::PARTNER, &Some(&partner));
        Ok(&*self.partner.insert(partner))
    }

    fn unpair(&mut self) {
        if self.partner.take().is_some() {
            self.persist(keys::PARTNER, &None::<Partner>);
        }
    }

    // -- Directory --

    pub fn mark(&self, entry_id: u32) -> Option<BookmarkMark> {
        self.current_user
            .as_ref()
            .and_then(|u| self.bookmarks.get(&u.name, entry_id))
    }

    /// The current user's marks; empty when nobody is signed in.
    pub fn current_marks(&self) -> HashMap<u32, BookmarkMark> {
        self.current_user
            .as_ref()
            .map(|u| self.bookmarks.marks_for(&u.name))
            .unwrap_or_default()
    }

    /// Filter the catalog for the current user. With nobody signed in,
    /// everything lands in the `other` bucket.
    pub fn directory(&self, query: &FilterQuery) -> Buckets<'_> {
        filter_entries(self.catalog.entries(), query, &self.current_marks())
    }

    pub fn toggle_bookmark(&mut self, entry_id: u32, mark: BookmarkMark) -> CoreResult<Option<BookmarkMark>> {
        let user = self.require_user()?.name.clone();
        if self.catalog.get(entry_id).is_none() {
            return Err(CoreError::UnknownEntry(entry_id));
        }

        let result = self.bookmarks.toggle(Some(user.as_str()), entry_id, mark)?;
        debug!("Bookmark on {} is now {:?}", entry_id, result);

        self.persist(keys::BOOKMARKS, &self.bookmarks);
        Ok(result)
    }

    // -- Favors --

    pub fn create_favor(&mut self, entry_id: u32, task: &str, deadline: &str) -> CoreResult<Favor> {
        let creator = self.require_user()?.name.clone();
        let entry = self
            .catalog
            .get(entry_id)
            .cloned()
            .ok_or(CoreError::UnknownEntry(entry_id))?;

        let favor = self
            .favors
            .create(&creator, entry, task, deadline, Utc::now())?
            .clone();
        info!("{} offered favor {} for '{}'", creator, favor.id, favor.entry.name);

        self.persist(keys::FAVORS, &self.favors);
        Ok(favor)
    }

    pub fn claim_favor(&mut self, favor_id: u64) -> CoreResult<Favor> {
        let claimant = self.require_user()?.name.clone();
        let favor = self.favors.claim(favor_id, &claimant)?.clone();
        info!("{} claimed favor {}", claimant, favor_id);

        self.persist(keys::FAVORS, &self.favors);
        Ok(favor)
    }

    /// Complete or reopen a claimed favor. Only the claimant may do this.
    pub fn toggle_favor_done(&mut self, favor_id: u64) -> CoreResult<Favor> {
        let actor = self.require_user()?.name.clone();
        let favor = self.favors.get(favor_id).ok_or(CoreError::FavorNotFound(favor_id))?;
        if favor.claimed_by.is_some() && favor.claimed_by.as_deref() != Some(actor.as_str()) {
            return Err(CoreError::NotClaimant);
        }

        let favor = self.favors.toggle_done(favor_id)?.clone();
        info!("{} set favor {} to {:?}", actor, favor_id, favor.status);

        self.persist(keys::FAVORS, &self.favors);
        Ok(favor)
    }

    // -- Notes & journal --

    pub fn add_note(&mut self, context: ContextId, text: &str) -> CoreResult<Note> {
        let author = self.require_user()?.name.clone();
        match context {
            ContextId::Term(id) if self.catalog.get(id).is_none() => {
                return Err(CoreError::UnknownEntry(id));
            }
            ContextId::Favor(id) if self.favors.get(id).is_none() => {
                return Err(CoreError::FavorNotFound(id));
            }
            _ => {}
        }

        let note = self
            .notes
            .append(context, &author, text, Utc::now().timestamp_millis())?
            .clone();
        debug!("{} added note {} to {}", author, note.id, context);

        self.persist(keys::NOTES, &self.notes);
        Ok(note)
    }

    pub fn add_journal_entry(&mut self, prompt: Option<&str>, body: &str) -> CoreResult<JournalEntry> {
        let author = self.require_user()?.name.clone();
        let entry = self
            .journal
            .add(&author, prompt, body, Utc::now().timestamp_millis())?
            .clone();

        self.persist(keys::JOURNAL, &self.journal);
        Ok(entry)
    }

    /// The current user's journal, newest first.
    pub fn journal_entries(&self) -> CoreResult<Vec<JournalEntry>> {
        let user = self.require_user()?;
        Ok(self.journal.entries_by(&user.name).cloned().collect())
    }

    fn require_user(&self) -> CoreResult<&User> {
        self.current_user.as_ref().ok_or(CoreError::NotAuthenticated)
    }

    // Best effort: a failed write is logged and the in-memory state stands.
    fn persist<T: Serialize + ?Sized>(&self, name: &str, value: &T) {
        let key = keys::storage_key(name);
        if let Err(e) = save_json(self.store.as_ref(), &key, value) {
            warn!("Failed to persist '{}': {}", key, e);
        }
    }
}
