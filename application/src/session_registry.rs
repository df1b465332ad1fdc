use domain::session::ChatSession;
use std::collections::HashMap;
use tracing::debug;

/// Owns every live session; a session lives from `create` until `destroy`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, ChatSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> String {
        let session = ChatSession::new();
        let id = session.id.clone();
        debug!(session = %id, "Session created");
        self.sessions.insert(id.clone(), session);
        id
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.get_mut(id)
    }

    /// Drops the session with its history, upload and cached text.
    pub fn destroy(&mut self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            debug!(session = %id, "Session destroyed");
        }
        removed
    }
}
