use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use kindred_assistant::{ChatProvider, Conversation};
use kindred_core::Session;
use kindred_core::directory::DirectoryView;
use kindred_gateway::dispatcher::Dispatcher;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

/// One local session shared by every handler. Locks are never held across
/// an `.await`.
pub struct AppStateInner {
    pub session: Mutex<Session>,
    pub directory: Mutex<DirectoryView>,
    pub dispatcher: Dispatcher,
    pub assistant: Arc<dyn ChatProvider>,
    pub chats: Mutex<HashMap<String, Conversation>>,
}

impl AppStateInner {
    pub fn new(
        session: Session,
        directory: DirectoryView,
        dispatcher: Dispatcher,
        assistant: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            directory: Mutex::new(directory),
            dispatcher,
            assistant,
            chats: Mutex::new(HashMap::new()),
        }
    }

    pub fn session(&self) -> Result<MutexGuard<'_, Session>, ApiError> {
        self.session
            .lock()
            .map_err(|e| ApiError::Internal(format!("session lock poisoned: {}", e)))
    }

    pub fn directory(&self) -> Result<MutexGuard<'_, DirectoryView>, ApiError> {
        self.directory
            .lock()
            .map_err(|e| ApiError::Internal(format!("directory lock poisoned: {}", e)))
    }

    pub fn chats(&self) -> Result<MutexGuard<'_, HashMap<String, Conversation>>, ApiError> {
        self.chats
            .lock()
            .map_err(|e| ApiError::Internal(format!("chat lock poisoned: {}", e)))
    }
}
