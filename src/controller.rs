//! Application State Controller.
//!
//! Owns the live view model (input, current result, per-card interaction
//! state, history, auth) and mediates between UI events and the two
//! remote collaborators. All mutation happens here, from event handlers;
//! the frontend only ever sees serialized snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::auth::{AuthContext, CredentialError, CredentialStore};
use crate::backend::{BackendClient, BackendError};
use crate::study::{
    derive_title, parse_generator_response, CardInteraction, CardKey, InteractionMap, ParseError,
    Session, StudyContent,
};

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("Not logged in")]
    NotAuthenticated,
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

#[derive(Debug, Default)]
struct ViewState {
    input: String,
    result: Option<StudyContent>,
    interaction: InteractionMap,
    history: Vec<Session>,
    auth: Option<AuthContext>,
    /// Sequence number of the generation whose result is currently
    /// shown. Only ever increases; stale completions are dropped.
    applied_generation: u64,
}

/// One interaction-state entry in a snapshot. The map itself is keyed by
/// `CardKey`, which does not serialize as a JSON object key.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionEntry {
    pub key: CardKey,
    pub state: CardInteraction,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub created_at: i64,
    pub created_at_display: String,
}

impl SessionSummary {
    fn from_session(session: &Session) -> Self {
        let created_at_display = chrono::DateTime::from_timestamp(session.created_at, 0)
            .filter(|_| session.created_at > 0)
            .map(|dt| {
                dt.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| "No time".to_string());
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            created_at: session.created_at,
            created_at_display,
        }
    }
}

/// Serializable copy of the view model handed to the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub input: String,
    pub result: Option<StudyContent>,
    pub interaction: Vec<InteractionEntry>,
    pub history: Vec<SessionSummary>,
    pub username: Option<String>,
}

/// Case-insensitive substring filter over session titles. A blank query
/// returns the history unchanged; order is always preserved.
pub fn filter_history(history: &[Session], query: &str) -> Vec<Session> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return history.to_vec();
    }
    history
        .iter()
        .filter(|s| s.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub struct AppController {
    client: BackendClient,
    credentials: CredentialStore,
    state: Mutex<ViewState>,
    /// Monotonic counter tagging in-flight generations so that only the
    /// most recently issued one may update the view.
    generation_seq: AtomicU64,
}

impl AppController {
    pub fn new(client: BackendClient, credentials: CredentialStore) -> Self {
        Self {
            client,
            credentials,
            state: Mutex::new(ViewState::default()),
            generation_seq: AtomicU64::new(0),
        }
    }

    // ===== Startup =====

    /// Restore persisted auth and reload the last session plus history.
    /// Failures are logged and non-fatal; the credential stays set.
    pub async fn startup(&self) {
        let auth = match self.credentials.load() {
            Some(auth) => auth,
            None => return,
        };

        self.apply_auth(&auth);
        self.refresh_from_store(&auth).await;
    }

    /// Mark the user as signed in. Interaction state never survives an
    /// account change.
    fn apply_auth(&self, auth: &AuthContext) {
        let mut state = self.state.lock().unwrap();
        state.auth = Some(auth.clone());
        state.interaction.clear();
    }

    /// Pull the account's last session and history. Fetch failures are
    /// logged and non-fatal: the user stays signed in and whatever is
    /// already on screen is kept.
    async fn refresh_from_store(&self, auth: &AuthContext) {
        match self.client.last_session(auth).await {
            Ok(Some(content)) => {
                let mut state = self.state.lock().unwrap();
                state.input = content.input_text.clone();
                state.result = Some(content);
            }
            Ok(None) => {
                let mut state = self.state.lock().unwrap();
                state.input.clear();
                state.result = None;
            }
            Err(e) => log::error!("Load session error: {}", e),
        }

        match self.client.all_sessions(auth).await {
            Ok(sessions) => {
                let mut state = self.state.lock().unwrap();
                state.history = sessions;
            }
            Err(e) => log::error!("History load error: {}", e),
        }
    }

    // ===== Generation =====

    /// Generate study content from the raw input text. Only the most
    /// recently issued generation may update the view; results of calls
    /// that were superseded while in flight are discarded silently.
    pub async fn generate(&self, input: String) -> Result<ViewSnapshot, ControllerError> {
        let seq = self.generation_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let raw = self.client.generate(&input).await?;
        let content = parse_generator_response(&raw, &input)?;

        let applied = self.apply_generation(seq, &input, content.clone());
        if !applied {
            log::debug!("Discarding stale generation result (seq {})", seq);
            return Ok(self.snapshot());
        }

        // Persist if logged in. Save failure must not hide the freshly
        // generated content.
        let auth = self.state.lock().unwrap().auth.clone();
        if let Some(auth) = auth {
            let title = derive_title(&input);
            match self.client.save_session(&auth, &content, &title).await {
                Ok(()) => {
                    log::info!("Session saved");
                    match self.client.all_sessions(&auth).await {
                        Ok(sessions) => {
                            self.state.lock().unwrap().history = sessions;
                        }
                        Err(e) => log::error!("History refresh error: {}", e),
                    }
                }
                Err(e) => log::error!("Save session error: {}", e),
            }
        }

        Ok(self.snapshot())
    }

    /// Apply a finished generation if it is still the latest issued.
    fn apply_generation(&self, seq: u64, input: &str, content: StudyContent) -> bool {
        let latest = self.generation_seq.load(Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if seq != latest || seq <= state.applied_generation {
            return false;
        }
        state.applied_generation = seq;
        state.input = input.to_string();
        state.result = Some(content);
        state.interaction.clear();
        true
    }

    // ===== Auth =====

    /// Log in or register, persist the credential pair, then run the same
    /// last-session + history load as startup. Only the credential
    /// exchange itself can fail this call; a failed load afterwards
    /// leaves the user signed in.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        register: bool,
    ) -> Result<ViewSnapshot, ControllerError> {
        let response = if register {
            self.client.register(username, password).await?
        } else {
            self.client.login(username, password).await?
        };

        let auth = AuthContext {
            token: response.token,
            username: response.username,
        };

        if let Err(e) = self.credentials.store(&auth) {
            log::warn!("Failed to persist credentials: {}", e);
        }

        self.apply_auth(&auth);
        self.refresh_from_store(&auth).await;

        Ok(self.snapshot())
    }

    /// Clear the credential and all in-memory state. No server call.
    pub fn logout(&self) -> Result<ViewSnapshot, ControllerError> {
        self.credentials.clear()?;
        {
            let mut state = self.state.lock().unwrap();
            *state = ViewState::default();
        }
        Ok(self.snapshot())
    }

    // ===== Sessions =====

    /// Delete a session on the Session Store and refresh the history.
    /// On failure the in-memory history is left untouched.
    pub async fn delete_session(&self, id: &str) -> Result<ViewSnapshot, ControllerError> {
        let auth = self
            .state
            .lock()
            .unwrap()
            .auth
            .clone()
            .ok_or(ControllerError::NotAuthenticated)?;

        self.client.delete_session(&auth, id).await?;

        let history = self.client.all_sessions(&auth).await?;
        self.state.lock().unwrap().history = history;
        Ok(self.snapshot())
    }

    /// Show a session from the fetched history list.
    pub fn open_session(&self, id: &str) -> Result<ViewSnapshot, ControllerError> {
        let mut state = self.state.lock().unwrap();
        let session = state
            .history
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| ControllerError::SessionNotFound(id.to_string()))?;

        state.input = if session.input_text.is_empty() {
            session.content.input_text.clone()
        } else {
            session.input_text.clone()
        };
        state.result = Some(session.content);
        state.interaction.clear();
        drop(state);
        Ok(self.snapshot())
    }

    pub fn filter_history(&self, query: &str) -> Vec<SessionSummary> {
        let state = self.state.lock().unwrap();
        filter_history(&state.history, query)
            .iter()
            .map(SessionSummary::from_session)
            .collect()
    }

    // ===== Interaction state =====

    pub fn select_option(&self, key: CardKey, option: String) -> ViewSnapshot {
        {
            let mut state = self.state.lock().unwrap();
            state.interaction.entry(key).or_default().selected = Some(option);
        }
        self.snapshot()
    }

    pub fn toggle_show_answer(&self, key: CardKey) -> ViewSnapshot {
        {
            let mut state = self.state.lock().unwrap();
            let entry = state.interaction.entry(key).or_default();
            entry.show_answer = !entry.show_answer;
        }
        self.snapshot()
    }

    pub fn toggle_flip(&self, key: CardKey) -> ViewSnapshot {
        {
            let mut state = self.state.lock().unwrap();
            let entry = state.interaction.entry(key).or_default();
            entry.flipped = !entry.flipped;
        }
        self.snapshot()
    }

    // ===== Read access =====

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.lock().unwrap();
        let mut interaction: Vec<InteractionEntry> = state
            .interaction
            .iter()
            .map(|(key, value)| InteractionEntry {
                key: *key,
                state: value.clone(),
            })
            .collect();
        interaction.sort_by_key(|e| (e.key.kind as u8, e.key.index));

        ViewSnapshot {
            input: state.input.clone(),
            result: state.result.clone(),
            interaction,
            history: state.history.iter().map(SessionSummary::from_session).collect(),
            username: state.auth.as_ref().map(|a| a.username.clone()),
        }
    }

    /// Read-only copy of the current result for export calls.
    pub fn current_result(&self) -> Option<StudyContent> {
        self.state.lock().unwrap().result.clone()
    }

    /// Read-only copy of the full history, in fetch order.
    pub fn history(&self) -> Vec<Session> {
        self.state.lock().unwrap().history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_controller() -> (AppController, TempDir) {
        let dir = TempDir::new().unwrap();
        let client = BackendClient::new("http://localhost:8000".to_string()).unwrap();
        let credentials = CredentialStore::new(dir.path().to_path_buf());
        (AppController::new(client, credentials), dir)
    }

    fn session(id: &str, title: &str) -> Session {
        Session {
            id: id.to_string(),
            title: title.to_string(),
            input_text: format!("{} notes", title),
            content: StudyContent::default(),
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_filter_blank_query_returns_all_in_order() {
        let history = vec![session("1", "Cell Biology"), session("2", "Chemistry")];
        let filtered = filter_history(&history, "   ");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, "1");
        assert_eq!(filtered[1].id, "2");
    }

    #[test]
    fn test_filter_is_case_insensitive_and_preserves_order() {
        let history = vec![
            session("1", "Cell Biology"),
            session("2", "Physics"),
            session("3", "Cellular Respiration"),
        ];
        let filtered = filter_history(&history, "cell");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].title, "Cell Biology");
        assert_eq!(filtered[1].title, "Cellular Respiration");
    }

    #[test]
    fn test_filter_missing_title_matches_nothing() {
        let history = vec![session("1", "")];
        assert!(filter_history(&history, "x").is_empty());
        assert_eq!(filter_history(&history, "").len(), 1);
    }

    #[test]
    fn test_apply_generation_accepts_latest() {
        let (controller, _dir) = test_controller();
        let seq = controller.generation_seq.fetch_add(1, Ordering::SeqCst) + 1;
        assert!(controller.apply_generation(seq, "notes", StudyContent::default()));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.input, "notes");
        assert!(snapshot.result.is_some());
    }

    #[test]
    fn test_apply_generation_discards_stale() {
        let (controller, _dir) = test_controller();
        // Two generations issued; the older one completes second.
        let first = controller.generation_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let second = controller.generation_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let mut newer = StudyContent::default();
        newer.input_text = "newer".to_string();
        assert!(controller.apply_generation(second, "newer", newer));

        let mut older = StudyContent::default();
        older.input_text = "older".to_string();
        assert!(!controller.apply_generation(first, "older", older));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.input, "newer");
    }

    #[test]
    fn test_apply_generation_resets_interaction() {
        let (controller, _dir) = test_controller();
        controller.select_option(CardKey::quiz(0), "ATP".to_string());
        assert_eq!(controller.snapshot().interaction.len(), 1);

        let seq = controller.generation_seq.fetch_add(1, Ordering::SeqCst) + 1;
        controller.apply_generation(seq, "x", StudyContent::default());
        assert!(controller.snapshot().interaction.is_empty());
    }

    #[test]
    fn test_interaction_keyed_by_stable_card_key() {
        let (controller, _dir) = test_controller();
        controller.select_option(CardKey::quiz(1), "B".to_string());
        controller.toggle_flip(CardKey::flashcard(1));
        controller.toggle_show_answer(CardKey::quiz(1));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.interaction.len(), 2);
        let quiz_entry = snapshot
            .interaction
            .iter()
            .find(|e| e.key == CardKey::quiz(1))
            .unwrap();
        assert_eq!(quiz_entry.state.selected.as_deref(), Some("B"));
        assert!(quiz_entry.state.show_answer);
        let card_entry = snapshot
            .interaction
            .iter()
            .find(|e| e.key == CardKey::flashcard(1))
            .unwrap();
        assert!(card_entry.state.flipped);
    }

    #[test]
    fn test_toggle_show_answer_flips_back() {
        let (controller, _dir) = test_controller();
        controller.toggle_show_answer(CardKey::quiz(0));
        controller.toggle_show_answer(CardKey::quiz(0));
        let snapshot = controller.snapshot();
        let entry = snapshot
            .interaction
            .iter()
            .find(|e| e.key == CardKey::quiz(0))
            .unwrap();
        assert!(!entry.state.show_answer);
    }

    #[test]
    fn test_open_session_replaces_result_and_resets_interaction() {
        let (controller, _dir) = test_controller();
        {
            let mut state = controller.state.lock().unwrap();
            state.history = vec![session("abc", "Krebs Cycle")];
        }
        controller.toggle_flip(CardKey::flashcard(0));

        let snapshot = controller.open_session("abc").unwrap();
        assert_eq!(snapshot.input, "Krebs Cycle notes");
        assert!(snapshot.result.is_some());
        assert!(snapshot.interaction.is_empty());
    }

    #[test]
    fn test_open_unknown_session_fails() {
        let (controller, _dir) = test_controller();
        assert!(matches!(
            controller.open_session("nope"),
            Err(ControllerError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_auth_survives_failed_store_refresh() {
        let dir = TempDir::new().unwrap();
        // Nothing listens on this port; both fetches fail fast.
        let client = BackendClient::new("http://127.0.0.1:1".to_string()).unwrap();
        let credentials = CredentialStore::new(dir.path().to_path_buf());
        let controller = AppController::new(client, credentials);
        {
            let mut state = controller.state.lock().unwrap();
            state.result = Some(StudyContent::default());
        }

        let auth = AuthContext {
            token: "tok".to_string(),
            username: "ada".to_string(),
        };
        controller.apply_auth(&auth);
        controller.refresh_from_store(&auth).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.username.as_deref(), Some("ada"));
        // Whatever was on screen before the failed refresh is kept.
        assert!(snapshot.result.is_some());
    }

    #[test]
    fn test_logout_clears_everything() {
        let (controller, _dir) = test_controller();
        {
            let mut state = controller.state.lock().unwrap();
            state.input = "notes".to_string();
            state.result = Some(StudyContent::default());
            state.history = vec![session("1", "T")];
            state.auth = Some(AuthContext {
                token: "t".to_string(),
                username: "u".to_string(),
            });
        }
        let snapshot = controller.logout().unwrap();
        assert!(snapshot.input.is_empty());
        assert!(snapshot.result.is_none());
        assert!(snapshot.history.is_empty());
        assert!(snapshot.username.is_none());
    }
}
