use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::application::{ChatGateway, GatewayError, SessionKey, SessionStore};
use crate::domain::{
    reconcile_settings, ChatRequest, Credential, DomainError, QuickActionField, Settings, ToolTag,
    Turn, GENERIC_FAILURE,
};

/// One-sentence request used to check a freshly entered key.
pub const PROBE_MESSAGE: &str = "Say hello in one sentence.";

const ENTER_KEY: &str = "Please enter your Anthropic API key";
const KEY_FORMAT: &str = "Invalid API key format. It should start with sk-ant-";
const CONNECT_FAILED: &str = "Failed to connect. Check your API key and try again.";
const CONNECT_OFFLINE: &str =
    "Connection failed. Make sure you are online and the API key is valid.";
const KEY_EXPIRED: &str = "API key is invalid or expired. Please update it in Settings.";
const KEY_EXPIRED_TURN: &str =
    "Your API key appears to be invalid or expired. Please go to Settings > API to update it.";
const CONNECTION_ERROR_TURN: &str =
    "Connection error. Please check your internet connection and try again.";

/// What a call to [`ChatController::send_message`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty text, a send already in flight, or no credential: nothing happened.
    Skipped,
    Replied,
    CredentialRejected,
    Failed,
}

struct ControllerState {
    turns: Vec<Turn>,
    draft: String,
    credential: Option<Credential>,
    credential_rejected: bool,
    settings: Settings,
    error: Option<String>,
}

/// Client-side conversation driver.
///
/// Owns the turn list, the input draft, the accepted credential and the
/// settings; persists the latter two through a [`SessionStore`] and talks to
/// the proxy through a [`ChatGateway`]. At most one network call runs at a
/// time: a send started while another is in flight is dropped, not queued.
///
/// Network failures never escape: they become a form error (credential flow)
/// or an assistant turn (message flow).
pub struct ChatController {
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn ChatGateway>,
    busy: AtomicBool,
    state: Mutex<ControllerState>,
}

impl ChatController {
    pub fn new(store: Arc<dyn SessionStore>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            store,
            gateway,
            busy: AtomicBool::new(false),
            state: Mutex::new(ControllerState {
                turns: Vec::new(),
                draft: String::new(),
                credential: None,
                credential_rejected: false,
                settings: Settings::default(),
                error: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restore the cached credential and settings.
    ///
    /// A stored key without the expected prefix is ignored, leaving the
    /// credential gate closed. Unparseable settings keep the defaults.
    pub async fn load(&self) -> Result<(), DomainError> {
        let saved_key = self.store.load(SessionKey::Credential).await?;
        let saved_settings = self.store.load(SessionKey::Settings).await?;

        let mut state = self.state();
        if let Some(raw) = saved_key {
            match Credential::new(raw) {
                Ok(credential) => {
                    debug!("Restored cached credential {credential}");
                    state.credential = Some(credential);
                }
                Err(_) => warn!("Ignoring cached credential with unexpected format"),
            }
        }

        if let Some(raw) = saved_settings {
            match reconcile_settings(&raw) {
                Ok(settings) => state.settings = settings,
                Err(e) => warn!("Failed to parse saved settings: {e}"),
            }
        }

        Ok(())
    }

    /// Check a key with a one-message probe and cache it on success.
    ///
    /// Empty or wrongly prefixed input fails locally without a network call.
    /// Any failure is also recorded as the form error.
    pub async fn submit_credential(&self, raw: &str) -> Result<(), DomainError> {
        let credential = match Credential::parse(raw) {
            Ok(credential) => credential,
            Err(e) => {
                let message = match e {
                    DomainError::MissingCredential => ENTER_KEY,
                    _ => KEY_FORMAT,
                };
                self.state().error = Some(message.to_string());
                return Err(e);
            }
        };

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            return Err(DomainError::invalid_input("a request is already in flight"));
        };
        self.state().error = None;

        let probe = ChatRequest::new(vec![Turn::user(PROBE_MESSAGE)], credential.expose());
        match self.gateway.send(&probe).await {
            Ok(reply) if !reply.content.is_empty() => {
                if let Err(e) = self
                    .store
                    .save(SessionKey::Credential, credential.expose())
                    .await
                {
                    warn!("Failed to cache credential: {e}");
                }
                info!("Credential {credential} accepted");

                let mut state = self.state();
                state.credential = Some(credential);
                state.credential_rejected = false;
                state.error = None;
                Ok(())
            }
            Ok(_) => {
                self.state().error = Some(CONNECT_FAILED.to_string());
                Err(DomainError::unknown(CONNECT_FAILED))
            }
            Err(GatewayError::Transport(message)) => {
                warn!("Credential probe failed: {message}");
                self.state().error = Some(CONNECT_OFFLINE.to_string());
                Err(DomainError::network(message))
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(CONNECT_FAILED).to_string();
                self.state().error = Some(message.clone());
                if e.is_credential_rejection() {
                    Err(DomainError::InvalidCredential)
                } else {
                    Err(DomainError::unknown(message))
                }
            }
        }
    }

    /// Send one user turn with the whole conversation so far.
    ///
    /// The optional tool tag travels as a separate request field; the
    /// displayed user turn keeps the text exactly as typed (trimmed).
    pub async fn send_message(&self, text: &str, tool: Option<ToolTag>) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Skipped;
        }

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!("Send dropped: another request is in flight");
            return SendOutcome::Skipped;
        };

        let request = {
            let mut state = self.state();
            let Some(credential) = state.credential.clone() else {
                debug!("Send dropped: no credential");
                return SendOutcome::Skipped;
            };
            state.turns.push(Turn::user(text));
            state.draft.clear();
            ChatRequest::new(state.turns.clone(), credential.expose())
                .with_tool(tool.map(|t| t.as_str().to_string()))
        };

        let result = self.gateway.send(&request).await;

        let mut state = self.state();
        match result {
            Ok(reply) if !reply.content.is_empty() => {
                state.turns.push(Turn::assistant(reply.content));
                SendOutcome::Replied
            }
            Err(e) if e.is_credential_rejection() => {
                warn!("Proxy rejected the cached credential");
                state.error = Some(KEY_EXPIRED.to_string());
                state.credential_rejected = true;
                state.turns.push(Turn::assistant(KEY_EXPIRED_TURN));
                SendOutcome::CredentialRejected
            }
            Ok(_) => {
                state
                    .turns
                    .push(Turn::assistant(format!("Error: {GENERIC_FAILURE}")));
                SendOutcome::Failed
            }
            Err(GatewayError::Transport(message)) => {
                warn!("Send failed: {message}");
                state.turns.push(Turn::assistant(CONNECTION_ERROR_TURN));
                SendOutcome::Failed
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(GENERIC_FAILURE);
                state.turns.push(Turn::assistant(format!("Error: {message}")));
                SendOutcome::Failed
            }
        }
    }

    /// Send the current draft.
    pub async fn submit_draft(&self, tool: Option<ToolTag>) -> SendOutcome {
        let draft = self.draft();
        self.send_message(&draft, tool).await
    }

    /// Send the prompt of the quick action at `index`; out of range is skipped.
    pub async fn send_quick_action(&self, index: usize) -> SendOutcome {
        let prompt = self
            .state()
            .settings
            .quick_action(index)
            .map(|action| action.prompt().to_string());

        match prompt {
            Some(prompt) => self.send_message(&prompt, None).await,
            None => SendOutcome::Skipped,
        }
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state().draft = text.into();
    }

    pub fn clear_conversation(&self) {
        self.state().turns.clear();
    }

    /// Edit the in-memory settings; call [`Self::save_settings`] to persist.
    pub fn update_settings(&self, edit: impl FnOnce(&mut Settings)) {
        edit(&mut self.state().settings);
    }

    pub fn add_quick_action(&self) -> bool {
        self.state().settings.add_quick_action()
    }

    pub fn remove_quick_action(&self, index: usize) -> bool {
        self.state().settings.remove_quick_action(index)
    }

    pub fn update_quick_action(
        &self,
        index: usize,
        field: QuickActionField,
        value: impl Into<String>,
    ) -> bool {
        self.state()
            .settings
            .update_quick_action(index, field, value)
    }

    pub async fn save_settings(&self) -> Result<(), DomainError> {
        let blob = serde_json::to_string(&self.state().settings)?;
        self.store.save(SessionKey::Settings, &blob).await?;
        debug!("Settings saved");
        Ok(())
    }

    /// Forget the credential and the conversation; the credential gate closes.
    pub async fn reset_credential(&self) -> Result<(), DomainError> {
        self.store.clear(SessionKey::Credential).await?;

        let mut state = self.state();
        state.credential = None;
        state.credential_rejected = false;
        state.turns.clear();
        info!("Credential cleared");
        Ok(())
    }

    /// Drop every persisted and in-memory piece of state.
    pub async fn reset_everything(&self) -> Result<(), DomainError> {
        for key in SessionKey::ALL {
            self.store.clear(key).await?;
        }

        let mut state = self.state();
        state.credential = None;
        state.credential_rejected = false;
        state.turns.clear();
        state.draft.clear();
        state.settings = Settings::default();
        state.error = None;
        info!("All session state cleared");
        Ok(())
    }

    pub fn turns(&self) -> Vec<Turn> {
        self.state().turns.clone()
    }

    pub fn draft(&self) -> String {
        self.state().draft.clone()
    }

    pub fn settings(&self) -> Settings {
        self.state().settings.clone()
    }

    pub fn welcome_message(&self) -> String {
        self.state().settings.welcome_message().to_string()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn has_credential(&self) -> bool {
        self.state().credential.is_some()
    }

    /// The credential gate: no key yet, or the proxy rejected the cached one.
    ///
    /// A rejected key stays cached and usable until the user replaces or
    /// clears it.
    pub fn needs_credential(&self) -> bool {
        let state = self.state();
        state.credential.is_none() || state.credential_rejected
    }

    pub fn credential_masked(&self) -> Option<String> {
        self.state().credential.as_ref().map(Credential::masked)
    }
}

/// Holds the in-flight flag; releasing happens on drop so every exit path clears it.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
