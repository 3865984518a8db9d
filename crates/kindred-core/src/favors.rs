//! Favor lifecycle: available -> claimed -> done, with done <-> claimed
//! toggling. Favors are never deleted.

use chrono::{DateTime, Utc};
use kindred_types::models::{Entry, Favor, FavorStatus};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavorLedger {
    favors: Vec<Favor>,
}

impl FavorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        creator: &str,
        entry: Entry,
        task: &str,
        deadline: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<&Favor> {
        let task = task.trim();
        if task.is_empty() {
            return Err(CoreError::EmptyTask);
        }

        let favor = Favor {
            id: self.next_id(),
            entry,
            task: task.to_string(),
            deadline: deadline.to_string(),
            status: FavorStatus::Available,
            created_by: creator.to_string(),
            claimed_by: None,
            created_at: now,
        };
        self.favors.push(favor);
        Ok(&self.favors[self.favors.len() - 1])
    }

    /// Claim an available favor. The creator cannot claim their own.
    pub fn claim(&mut self, id: u64, claimant: &str) -> CoreResult<&Favor> {
        let favor = self.find_mut(id)?;

        if favor.status != FavorStatus::Available {
            return Err(CoreError::IllegalTransition {
                id,
                status: favor.status,
                action: "claim",
            });
        }
        if favor.created_by == claimant {
            return Err(CoreError::SelfClaim);
        }

        favor.status = FavorStatus::Claimed;
        favor.claimed_by = Some(claimant.to_string());
        Ok(&*favor)
    }

    /// Flip between claimed and done. The claimant is kept either way.
    pub fn toggle_done(&mut self, id: u64) -> CoreResult<&Favor> {
        let favor = self.find_mut(id)?;

        favor.status = match favor.status {
            FavorStatus::Claimed => FavorStatus::Done,
            FavorStatus::Done => FavorStatus::Claimed,
            FavorStatus::Available => {
                return Err(CoreError::IllegalTransition {
                    id,
                    status: favor.status,
                    action: "toggle completion",
                });
            }
        };
        Ok(&*favor)
    }

    pub fn get(&self, id: u64) -> Option<&Favor> {
        self.favors.iter().find(|f| f.id == id)
    }

    /// Creation order.
    pub fn all(&self) -> &[Favor] {
        &self.favors
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &Favor> {
        self.favors.iter().rev()
    }

    pub fn with_status(&self, status: FavorStatus) -> impl Iterator<Item = &Favor> {
        self.favors.iter().filter(move |f| f.status == status)
    }

    pub fn created_by<'a>(&'a self, user: &'a str) -> impl Iterator<Item = &'a Favor> {
        self.favors.iter().filter(move |f| f.created_by == user)
    }

    pub fn claimed_by<'a>(&'a self, user: &'a str) -> impl Iterator<Item = &'a Favor> {
        self.favors
            .iter()
            .filter(move |f| f.claimed_by.as_deref() == Some(user))
    }

    pub fn len(&self) -> usize {
        self.favors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favors.is_empty()
    }

    // Derived from the stored favors so ids stay unique after a reload.
    fn next_id(&self) -> u64 {
        self.favors.iter().map(|f| f.id).max().map_or(1, |max| max + 1)
    }

    fn find_mut(&mut self, id: u64) -> CoreResult<&mut Favor> {
        self.favors
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(CoreError::FavorNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_types::models::Category;

    fn entry() -> Entry {
        Entry {
            id: 12,
            name: "Love Letter".into(),
            category: Category::Rituals,
            tags: Default::default(),
            description: "Write it by hand.".into(),
            subcategory: None,
        }
    }

    fn ledger_with_favor() -> (FavorLedger, u64) {
        let mut ledger = FavorLedger::new();
        let id = ledger
            .create("Alice", entry(), "Cook dinner", "Friday", Utc::now())
            .unwrap()
            .id;
        (ledger, id)
    }

    #[test]
    fn create_starts_available() {
        let (ledger, id) = ledger_with_favor();
        let favor = ledger.get(id).unwrap();
        assert_eq!(favor.status, FavorStatus::Available);
        assert_eq!(favor.claimed_by, None);
        assert_eq!(favor.created_by, "Alice");
        assert_eq!(favor.entry, entry());
        assert_eq!(favor.deadline, "Friday");
    }

    #[test]
    fn deadline_is_stored_verbatim() {
        let mut ledger = FavorLedger::new();
        let favor = ledger.create("Alice", entry(), "Walk", "  before 9pm ", Utc::now()).unwrap();
        assert_eq!(favor.deadline, "  before 9pm ");
    }

    #[test]
    fn ids_are_monotonic() {
        let mut ledger = FavorLedger::new();
        let a = ledger.create("Alice", entry(), "a", "", Utc::now()).unwrap().id;
        let b = ledger.create("Alice", entry(), "b", "", Utc::now()).unwrap().id;
        let c = ledger.create("Bob", entry(), "c", "", Utc::now()).unwrap().id;
        assert!(a < b && b < c);
    }

    #[test]
    fn empty_task_is_rejected() {
        let mut ledger = FavorLedger::new();
        assert_eq!(
            ledger.create("Alice", entry(), "   ", "", Utc::now()).unwrap_err(),
            CoreError::EmptyTask
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn second_claim_is_ignored() {
        let (mut ledger, id) = ledger_with_favor();

        let favor = ledger.claim(id, "Bob").unwrap();
        assert_eq!(favor.status, FavorStatus::Claimed);
        assert_eq!(favor.claimed_by.as_deref(), Some("Bob"));

        let err = ledger.claim(id, "Alice").unwrap_err();
        assert!(err.is_silent());
        let favor = ledger.get(id).unwrap();
        assert_eq!(favor.status, FavorStatus::Claimed);
        assert_eq!(favor.claimed_by.as_deref(), Some("Bob"));
    }

    #[test]
    fn creator_cannot_claim() {
        let (mut ledger, id) = ledger_with_favor();
        assert_eq!(ledger.claim(id, "Alice").unwrap_err(), CoreError::SelfClaim);
        assert_eq!(ledger.get(id).unwrap().status, FavorStatus::Available);
    }

    #[test]
    fn toggle_done_round_trip_keeps_claimant() {
        let (mut ledger, id) = ledger_with_favor();
        ledger.claim(id, "Bob").unwrap();
        let after_claim = ledger.get(id).unwrap().clone();

        assert_eq!(ledger.toggle_done(id).unwrap().status, FavorStatus::Done);
        let reopened = ledger.toggle_done(id).unwrap();
        assert_eq!(reopened.status, FavorStatus::Claimed);
        assert_eq!(reopened, &after_claim);
    }

    #[test]
    fn toggle_on_available_is_ignored() {
        let (mut ledger, id) = ledger_with_favor();
        let before = ledger.clone();
        assert!(ledger.toggle_done(id).unwrap_err().is_silent());
        assert_eq!(ledger, before);
    }

    #[test]
    fn unknown_favor() {
        let mut ledger = FavorLedger::new();
        assert_eq!(ledger.claim(3, "Bob").unwrap_err(), CoreError::FavorNotFound(3));
        assert_eq!(ledger.toggle_done(3).unwrap_err(), CoreError::FavorNotFound(3));
    }

    #[test]
    fn recent_is_newest_first() {
        let mut ledger = FavorLedger::new();
        let first = ledger.create("Alice", entry(), "one", "", Utc::now()).unwrap().id;
        let second = ledger.create("Bob", entry(), "two", "", Utc::now()).unwrap().id;

        assert_eq!(ledger.recent().map(|f| f.id).collect::<Vec<_>>(), vec![second, first]);
        assert_eq!(ledger.all().iter().map(|f| f.id).collect::<Vec<_>>(), vec![first, second]);
    }

    #[test]
    fn views_filter_by_party_and_status() {
        let mut ledger = FavorLedger::new();
        let first = ledger.create("Alice", entry(), "one", "", Utc::now()).unwrap().id;
        ledger.create("Bob", entry(), "two", "", Utc::now()).unwrap();
        ledger.claim(first, "Bob").unwrap();

        assert_eq!(ledger.created_by("Alice").count(), 1);
        assert_eq!(ledger.claimed_by("Bob").map(|f| f.id).collect::<Vec<_>>(), vec![first]);
        assert_eq!(ledger.with_status(FavorStatus::Available).count(), 1);
    }
}
