//! Scriptable in-memory element for unit testing synchronization code.
//!
//! Clones share state, so a test can keep one handle to flip visibility
//! while the synchronizer polls another.
//!
//! ```ignore
//! let save = MockElement::new("button#save");
//! let alert = MockElement::hidden("div.success");
//! save.on_click({
//!     let alert = alert.clone();
//!     move |_| alert.set_visible(true)
//! });
//! ```

use crate::element::{ElementHandle, ElementState};
use crate::result::{VerdantError, VerdantResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Interval at which [`MockElement::wait_for`] re-checks its state
pub const MOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Hook run after each successful click; receives the 1-based click number
pub type ClickHook = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Debug, Default)]
struct MockState {
    visible: bool,
    enabled: bool,
    attached: bool,
    clicks: usize,
    failing_queries: usize,
    enable_after_polls: Option<usize>,
    hang_queries: bool,
    hung_wait: Option<ElementState>,
    click_error: Option<String>,
    value: String,
    attributes: HashMap<String, String>,
    history: Vec<String>,
}

impl MockState {
    fn reaches(&self, state: ElementState) -> bool {
        match state {
            ElementState::Visible => self.attached && self.visible,
            ElementState::Hidden => !self.attached || !self.visible,
            ElementState::Attached => self.attached,
            ElementState::Detached => !self.attached,
        }
    }
}

/// Mock element for unit testing
#[derive(Clone)]
pub struct MockElement {
    name: String,
    state: Arc<Mutex<MockState>>,
    hooks: Arc<Mutex<Vec<ClickHook>>>,
}

impl std::fmt::Debug for MockElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MockElement")
            .field("name", &self.name)
            .field("visible", &state.visible)
            .field("enabled", &state.enabled)
            .field("attached", &state.attached)
            .field("clicks", &state.clicks)
            .finish_non_exhaustive()
    }
}

impl MockElement {
    /// Create an attached, visible and enabled element
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_state(name, true, true, true)
    }

    /// Create an attached but hidden element
    #[must_use]
    pub fn hidden(name: impl Into<String>) -> Self {
        Self::with_state(name, true, false, true)
    }

    /// Create an element that is not in the tree yet
    #[must_use]
    pub fn detached(name: impl Into<String>) -> Self {
        Self::with_state(name, false, false, true)
    }

    /// Create a visible but disabled element
    #[must_use]
    pub fn disabled(name: impl Into<String>) -> Self {
        Self::with_state(name, true, true, false)
    }

    fn with_state(name: impl Into<String>, attached: bool, visible: bool, enabled: bool) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState {
                visible,
                enabled,
                attached,
                ..MockState::default()
            })),
            hooks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show or hide the element (showing also attaches it)
    pub fn set_visible(&self, visible: bool) {
        let mut state = self.lock();
        state.visible = visible;
        if visible {
            state.attached = true;
        }
    }

    /// Enable or disable the element
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    /// Attach or detach the element
    pub fn set_attached(&self, attached: bool) {
        self.lock().attached = attached;
    }

    /// Make the next `count` visibility/enabled queries fail as detached
    pub fn fail_next_queries(&self, count: usize) {
        self.lock().failing_queries = count;
    }

    /// Become enabled once `polls` enabled-queries have been answered
    pub fn enable_after_polls(&self, polls: usize) {
        let mut state = self.lock();
        state.enabled = false;
        state.enable_after_polls = Some(polls);
    }

    /// Make visibility/enabled queries never return
    pub fn hang_queries(&self, hang: bool) {
        self.lock().hang_queries = hang;
    }

    /// Make `wait_for(state)` never return, whatever its timeout
    pub fn hang_wait_for(&self, state: ElementState) {
        self.lock().hung_wait = Some(state);
    }

    /// Set an attribute reported by [`ElementHandle::attribute`]
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.lock().attributes.insert(name.into(), value.into());
    }

    /// Current input value
    #[must_use]
    pub fn value(&self) -> String {
        self.lock().value.clone()
    }

    /// Make every click fail with a driver error
    pub fn fail_clicks(&self, message: impl Into<String>) {
        self.lock().click_error = Some(message.into());
    }

    /// Register a hook run after each successful click
    pub fn on_click<F>(&self, hook: F)
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(hook));
    }

    /// Number of successful clicks
    #[must_use]
    pub fn click_count(&self) -> usize {
        self.lock().clicks
    }

    /// Current visibility
    #[must_use]
    pub fn visible(&self) -> bool {
        let state = self.lock();
        state.attached && state.visible
    }

    /// Call history for verification
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Check if a method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.lock().history.iter().any(|c| c.starts_with(method))
    }

    /// Shared prologue for visibility/enabled queries
    fn begin_query(&self, method: &str) -> Result<bool, VerdantError> {
        let mut state = self.lock();
        state.history.push(method.to_string());
        if state.failing_queries > 0 {
            state.failing_queries -= 1;
            return Err(VerdantError::Detached {
                element: self.name.clone(),
            });
        }
        Ok(state.hang_queries)
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn is_visible(&self, _timeout: Duration) -> VerdantResult<bool> {
        if self.begin_query("is_visible")? {
            std::future::pending::<()>().await;
        }
        Ok(self.visible())
    }

    async fn is_enabled(&self, _timeout: Duration) -> VerdantResult<bool> {
        if self.begin_query("is_enabled")? {
            std::future::pending::<()>().await;
        }
        let mut state = self.lock();
        if !state.attached {
            return Err(VerdantError::Detached {
                element: self.name.clone(),
            });
        }
        if let Some(remaining) = state.enable_after_polls {
            if remaining == 0 {
                state.enabled = true;
                state.enable_after_polls = None;
            } else {
                state.enable_after_polls = Some(remaining - 1);
            }
        }
        Ok(state.enabled)
    }

    async fn click(&self) -> VerdantResult<()> {
        let click_number = {
            let mut state = self.lock();
            state.history.push("click".to_string());
            if let Some(message) = state.click_error.clone() {
                return Err(VerdantError::driver(message));
            }
            if !(state.attached && state.visible) {
                return Err(VerdantError::driver(format!(
                    "{} is not visible and cannot be clicked",
                    self.name
                )));
            }
            state.clicks += 1;
            state.clicks
        };

        let hooks: Vec<ClickHook> = self
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            hook(click_number);
        }
        Ok(())
    }

    async fn fill(&self, text: &str) -> VerdantResult<()> {
        let mut state = self.lock();
        state.history.push("fill".to_string());
        if !state.attached {
            return Err(VerdantError::Detached {
                element: self.name.clone(),
            });
        }
        state.value = text.to_string();
        Ok(())
    }

    async fn attribute(&self, name: &str) -> VerdantResult<Option<String>> {
        if self.begin_query("attribute")? {
            std::future::pending::<()>().await;
        }
        Ok(self.lock().attributes.get(name).cloned())
    }

    async fn wait_for(&self, state: ElementState, timeout: Duration) -> VerdantResult<()> {
        let hung = {
            let mut guard = self.lock();
            guard.history.push(format!("wait_for:{state}"));
            guard.hung_wait == Some(state)
        };
        if hung {
            std::future::pending::<()>().await;
        }
        let deadline = Instant::now() + timeout;
        loop {
            let reached = self.lock().reaches(state);
            if reached {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(VerdantError::timeout(
                    format!("{} to be {state}", self.name),
                    timeout.as_millis() as u64,
                ));
            }
            tokio::time::sleep(MOCK_POLL_INTERVAL).await;
        }
    }
}
