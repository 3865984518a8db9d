use kindred_types::models::FavorStatus;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Every variant leaves ledger state untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("no active user")]
    NotAuthenticated,

    #[error("unknown entry {0}")]
    UnknownEntry(u32),

    #[error("favor {0} not found")]
    FavorNotFound(u64),

    #[error("favor {id} cannot {action} while {status:?}")]
    IllegalTransition {
        id: u64,
        status: FavorStatus,
        action: &'static str,
    },

    #[error("cannot claim your own favor")]
    SelfClaim,

    #[error("only the claimant can change completion")]
    NotClaimant,

    #[error("favor task is empty")]
    EmptyTask,

    #[error("note text is empty")]
    EmptyNote,

    #[error("journal entry is empty")]
    EmptyJournalEntry,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Transitions the favor workflow ignores without telling the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::IllegalTransition { .. })
    }
}
