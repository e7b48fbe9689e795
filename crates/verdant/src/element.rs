//! ElementHandle - Abstract UI Control Capability
//!
//! The synchronizer never talks to a browser directly. It consumes this
//! small capability surface, which a Playwright/CDP binding (or
//! [`MockElement`](crate::mock::MockElement) in tests) implements.
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────────┐
//! │ page object / steps  │─────►│ InteractionSynchronizer  │
//! └──────────────────────┘      └────────────┬─────────────┘
//!                                            │ dyn ElementHandle
//!                               ┌────────────┴─────────────┐
//!                               │ browser binding │ mock   │
//!                               └──────────────────────────┘
//! ```

use crate::result::VerdantResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// States an element can be waited into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementState {
    /// Attached and rendered
    Visible,
    /// Not rendered or not attached
    Hidden,
    /// Present in the tree
    Attached,
    /// Removed from the tree
    Detached,
}

impl ElementState {
    /// Name used in logs and errors
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Attached => "attached",
            Self::Detached => "detached",
        }
    }
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Readiness observed by a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Readiness {
    /// Element is visible
    pub visible: bool,
    /// Element is enabled
    pub enabled: bool,
}

impl Readiness {
    /// Create a readiness observation
    #[must_use]
    pub const fn new(visible: bool, enabled: bool) -> Self {
        Self { visible, enabled }
    }

    /// Visible and enabled
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.visible && self.enabled
    }
}

/// A reference to one UI control, owned by the calling step.
///
/// Observations are not atomic with respect to the UI, so one handle must
/// not be driven from two call sites at once.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Identity used in logs and error messages (usually the locator)
    fn name(&self) -> String;

    /// Query visibility, bounded by `timeout`
    async fn is_visible(&self, timeout: Duration) -> VerdantResult<bool>;

    /// Query enabled state, bounded by `timeout`
    async fn is_enabled(&self, timeout: Duration) -> VerdantResult<bool>;

    /// Click the control
    async fn click(&self) -> VerdantResult<()>;

    /// Replace the control's value with `text`
    async fn fill(&self, text: &str) -> VerdantResult<()>;

    /// Read an attribute; `Ok(None)` when it is not set
    async fn attribute(&self, name: &str) -> VerdantResult<Option<String>>;

    /// Wait until the element reaches `state`.
    ///
    /// Fails with [`VerdantError::Timeout`](crate::VerdantError::Timeout)
    /// when the state is not reached in time.
    async fn wait_for(&self, state: ElementState, timeout: Duration) -> VerdantResult<()>;
}

/// An interstitial confirmation dialog and the controls that close it
#[derive(Clone, Copy)]
pub struct Interstitial<'a> {
    /// The dialog itself
    pub dialog: &'a dyn ElementHandle,
    /// Negative-path control ("Cancel"), keeps pending changes
    pub cancel: &'a dyn ElementHandle,
    /// Destructive control ("Discard"), if the dialog offers one
    pub discard: Option<&'a dyn ElementHandle>,
}

impl<'a> Interstitial<'a> {
    /// Create an interstitial with a cancel control only
    #[must_use]
    pub fn new(dialog: &'a dyn ElementHandle, cancel: &'a dyn ElementHandle) -> Self {
        Self {
            dialog,
            cancel,
            discard: None,
        }
    }

    /// Attach a discard control
    #[must_use]
    pub fn with_discard(mut self, discard: &'a dyn ElementHandle) -> Self {
        self.discard = Some(discard);
        self
    }
}

impl std::fmt::Debug for Interstitial<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interstitial")
            .field("dialog", &self.dialog.name())
            .field("cancel", &self.cancel.name())
            .field("discard", &self.discard.map(|d| d.name()))
            .finish()
    }
}

/// How to close an interstitial dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialogChoice {
    /// Keep changes and close the dialog
    #[default]
    Cancel,
    /// Throw changes away
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockElement;

    #[test]
    fn test_readiness() {
        assert!(Readiness::new(true, true).is_ready());
        assert!(!Readiness::new(true, false).is_ready());
        assert!(!Readiness::new(false, true).is_ready());
        assert!(!Readiness::default().is_ready());
    }

    #[test]
    fn test_element_state_display() {
        assert_eq!(ElementState::Visible.to_string(), "visible");
        assert_eq!(ElementState::Detached.to_string(), "detached");
    }

    #[test]
    fn test_interstitial_debug_names_controls() {
        let dialog = MockElement::new("dialog");
        let cancel = MockElement::new("cancel");
        let discard = MockElement::new("discard");
        let interstitial = Interstitial::new(&dialog, &cancel).with_discard(&discard);
        let debug = format!("{interstitial:?}");
        assert!(debug.contains("dialog"));
        assert!(debug.contains("cancel"));
        assert!(debug.contains("discard"));
    }

    #[test]
    fn test_dialog_choice_default() {
        assert_eq!(DialogChoice::default(), DialogChoice::Cancel);
    }
}
