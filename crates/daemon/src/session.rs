use engine::EditSession;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory registry of editing sessions. Each session owns its own
/// `EditSession` value and a scratch directory; nothing outlives the
/// process.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, EditSession>>,
    workdir: PathBuf,
}

impl SessionStore {
    pub fn new(workdir: PathBuf) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            workdir,
        }
    }

    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(id.clone(), EditSession::new());
        id
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.lock().unwrap().remove(id).is_some()
    }

    /// Run a closure against one session under the lock. `None` when the
    /// session id is unknown. All engine operations are synchronous and
    /// non-blocking, so holding the lock across them is fine.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut EditSession) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.get_mut(id).map(f)
    }

    /// Per-session scratch directory for the copied video and generated
    /// audio clips.
    pub fn session_dir(&self, id: &str) -> PathBuf {
        self.workdir.join(id)
    }

    /// Directory the render step writes into; fully cleared before each
    /// render, so it holds at most the latest output.
    pub fn output_dir(&self, id: &str) -> PathBuf {
        self.session_dir(id).join("output_videos")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new(PathBuf::from("/tmp/autofoley-test"));
        let a = store.create();
        let b = store.create();
        assert_ne!(a, b);

        store.with_session(&a, |session| {
            session.add_source();
        });
        let a_count = store.with_session(&a, |s| s.sources.len()).unwrap();
        let b_count = store.with_session(&b, |s| s.sources.len()).unwrap();
        assert_eq!(a_count, 1);
        assert_eq!(b_count, 0);
    }

    #[test]
    fn test_remove_unknown_session() {
        let store = SessionStore::new(PathBuf::from("/tmp/autofoley-test"));
        assert!(!store.remove("missing"));
        assert!(store.with_session("missing", |_| ()).is_none());
    }
}
