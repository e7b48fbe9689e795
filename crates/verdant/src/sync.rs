//! Interaction Synchronization
//!
//! Turns an eventually-consistent UI into deterministic test steps:
//!
//! - [`InteractionSynchronizer::wait_until_interactable`] polls a control
//!   until it is visible and enabled.
//! - [`InteractionSynchronizer::commit_with_recovery`] clicks a commit
//!   control and tolerates an unsolicited confirmation dialog that may show
//!   up instead of the success signal.
//!
//! ```text
//!            ┌────────┐ click ┌─────────────────┐ confirmation ┌───────────┐
//!   ┌──────► │ Ready  │──────►│ AwaitingOutcome │─────────────►│ Committed │
//!   │        └────────┘       └───────┬─────────┘              └───────────┘
//!   │                       interstitial │   │ error, last attempt
//!   │        ┌────────────┐◄────────────┘   └──────────────────►┌────────┐
//!   └────────│ Recovering │                                      │ Failed │
//!   backoff  └────────────┘                                      └────────┘
//! ```

use crate::config::{SyncConfig, Timeouts};
use crate::element::{DialogChoice, ElementHandle, ElementState, Interstitial, Readiness};
use crate::result::{VerdantError, VerdantResult};
use crate::verify::{display_value, is_sensitive, InputAttributes};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// States of one commit-with-recovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitState {
    /// Waiting for the trigger, then clicking it
    Ready,
    /// Racing the interstitial dialog against the confirmation signal
    AwaitingOutcome,
    /// Dismissing an interstitial dialog
    Recovering,
    /// Confirmation observed
    Committed,
    /// Attempts exhausted
    Failed,
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ready => "ready",
            Self::AwaitingOutcome => "awaiting-outcome",
            Self::Recovering => "recovering",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Result of a successful readiness wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Element that became interactable
    pub element: String,
    /// Time spent, including the initial appearance wait
    pub elapsed: Duration,
    /// Readiness polls performed
    pub polls: usize,
}

/// Outcome of [`InteractionSynchronizer::commit_with_recovery`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryOutcome {
    /// Confirmation was observed
    pub succeeded: bool,
    /// Commit actions performed
    pub attempts_used: usize,
    /// Interstitial dialogs dismissed
    pub recovery_events_handled: usize,
}

/// Slack granted to a collaborator wait past its own timeout before it is
/// cut off
pub const WAIT_GRACE: Duration = Duration::from_millis(250);

/// What a single commit attempt observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptOutcome {
    Committed,
    Interstitial,
}

/// Polling synchronizer for UI controls.
///
/// Holds configuration only, so one instance can serve any number of
/// elements. A single element must not be driven from two call sites at
/// the same time.
#[derive(Debug, Clone, Default)]
pub struct InteractionSynchronizer {
    config: SyncConfig,
}

impl InteractionSynchronizer {
    /// Create a synchronizer
    #[must_use]
    pub const fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run one readiness query under the probe timeout.
    ///
    /// Errors and hung queries both count as "no observation".
    async fn probe<F>(&self, element: &str, query: &str, fut: F) -> Option<bool>
    where
        F: Future<Output = VerdantResult<bool>>,
    {
        match tokio::time::timeout(self.config.probe_timeout(), fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                debug!(element, query, error = %e, "clickability check failed");
                None
            }
            Err(_) => {
                debug!(
                    element,
                    query,
                    timeout_ms = self.config.probe_timeout_ms,
                    "clickability check timed out"
                );
                None
            }
        }
    }

    /// Run a collaborator wait, cut off shortly after its own timeout
    async fn wait_state(
        &self,
        element: &dyn ElementHandle,
        state: ElementState,
        timeout: Duration,
    ) -> VerdantResult<()> {
        let bound = timeout.saturating_add(WAIT_GRACE);
        match tokio::time::timeout(bound, element.wait_for(state, timeout)).await {
            Ok(result) => result,
            Err(_) => {
                let name = element.name();
                warn!(element = %name, %state, timeout_ms = timeout.as_millis() as u64, "wait overran its timeout");
                Err(VerdantError::timeout(
                    format!("{name} to be {state}"),
                    timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Wait until `element` is visible and enabled.
    ///
    /// `timeout` defaults to the configured interactable timeout (long tier).
    ///
    /// # Errors
    ///
    /// - [`VerdantError::NotFound`] if the element never became visible
    /// - [`VerdantError::NotInteractable`] if it appeared but never became
    ///   visible and enabled at the same poll
    pub async fn wait_until_interactable(
        &self,
        element: &dyn ElementHandle,
        timeout: Option<Duration>,
    ) -> VerdantResult<WaitResult> {
        let timeout = timeout.unwrap_or_else(|| self.config.interactable_timeout());
        let timeout_ms = timeout.as_millis() as u64;
        let name = element.name();
        let started = Instant::now();

        if let Err(e) = self.wait_state(element, ElementState::Visible, timeout).await {
            if e.is_timeout() {
                return Err(VerdantError::NotFound {
                    element: name,
                    timeout_ms,
                });
            }
            error!(element = %name, error = %e, "error waiting for element to be clickable");
            return Err(e);
        }

        let probe_timeout = self.config.probe_timeout();
        let poll_started = Instant::now();
        let mut last = Readiness::default();
        let mut polls = 0;

        loop {
            polls += 1;
            let enabled = self
                .probe(&name, "enabled", element.is_enabled(probe_timeout))
                .await;
            let visible = self
                .probe(&name, "visible", element.is_visible(probe_timeout))
                .await;

            if let Some(enabled) = enabled {
                last.enabled = enabled;
            }
            if let Some(visible) = visible {
                last.visible = visible;
            }

            if enabled == Some(true) && visible == Some(true) {
                debug!(element = %name, polls, "element is clickable");
                return Ok(WaitResult {
                    element: name,
                    elapsed: started.elapsed(),
                    polls,
                });
            }

            let remaining = timeout.saturating_sub(poll_started.elapsed());
            if remaining.is_zero() {
                break;
            }
            tokio::time::sleep(self.config.poll_interval().min(remaining)).await;
        }

        // Final look so the error carries what the element shows now.
        if let Some(visible) = self
            .probe(&name, "visible", element.is_visible(probe_timeout))
            .await
        {
            last.visible = visible;
        }
        if let Some(enabled) = self
            .probe(&name, "enabled", element.is_enabled(probe_timeout))
            .await
        {
            last.enabled = enabled;
        }

        Err(VerdantError::NotInteractable {
            element: name,
            timeout_ms,
            visible: last.visible,
            enabled: last.enabled,
        })
    }

    /// Wait until `element` is interactable, then click it.
    ///
    /// `timeout` defaults to the configured interactable timeout.
    pub async fn click(
        &self,
        element: &dyn ElementHandle,
        timeout: Option<Duration>,
    ) -> VerdantResult<()> {
        self.wait_until_interactable(element, timeout).await?;
        element.click().await?;
        info!(element = %element.name(), "element clicked");
        Ok(())
    }

    /// Strictly wait for `element` to become visible (or hidden).
    ///
    /// `timeout` defaults to the long tier.
    pub async fn expect_visibility(
        &self,
        element: &dyn ElementHandle,
        visible: bool,
        timeout: Option<Duration>,
    ) -> VerdantResult<()> {
        let timeout = timeout.unwrap_or(Timeouts::LONG);
        let state = if visible {
            ElementState::Visible
        } else {
            ElementState::Hidden
        };
        self.wait_state(element, state, timeout).await?;
        info!(element = %element.name(), %state, "verified element visibility");
        Ok(())
    }

    /// Strictly wait for `element` to disappear (medium tier by default).
    pub async fn wait_for_disappear(
        &self,
        element: &dyn ElementHandle,
        timeout: Option<Duration>,
    ) -> VerdantResult<()> {
        let timeout = timeout.unwrap_or(Timeouts::MEDIUM);
        self.wait_state(element, ElementState::Hidden, timeout).await?;
        debug!(element = %element.name(), "element has disappeared");
        Ok(())
    }

    /// Leniently wait for `element` to be hidden (default tier).
    ///
    /// Returns `Ok(false)` and logs a warning when the element is still
    /// shown after the timeout; other errors propagate.
    pub async fn wait_for_hidden(
        &self,
        element: &dyn ElementHandle,
        timeout: Option<Duration>,
    ) -> VerdantResult<bool> {
        self.lenient_wait(element, ElementState::Hidden, timeout)
            .await
    }

    /// Leniently wait for `element` to leave the tree (default tier).
    ///
    /// Same contract as [`Self::wait_for_hidden`].
    pub async fn wait_for_detached(
        &self,
        element: &dyn ElementHandle,
        timeout: Option<Duration>,
    ) -> VerdantResult<bool> {
        self.lenient_wait(element, ElementState::Detached, timeout)
            .await
    }

    async fn lenient_wait(
        &self,
        element: &dyn ElementHandle,
        state: ElementState,
        timeout: Option<Duration>,
    ) -> VerdantResult<bool> {
        let timeout = timeout.unwrap_or(Timeouts::DEFAULT);
        let name = element.name();
        debug!(element = %name, %state, "waiting for element");
        match self.wait_state(element, state, timeout).await {
            Ok(()) => {
                debug!(element = %name, %state, "element reached state");
                Ok(true)
            }
            Err(e) if e.is_timeout() => {
                warn!(
                    element = %name,
                    %state,
                    timeout_ms = timeout.as_millis() as u64,
                    "element did not reach state, proceeding anyway"
                );
                Ok(false)
            }
            Err(e) => {
                error!(element = %name, %state, error = %e, "error waiting for element");
                Err(e)
            }
        }
    }

    /// Fill `element` with `text` and log what was entered.
    ///
    /// The value is logged as [`MASKED`](crate::verify::MASKED) when
    /// `force_sensitive` is set, when the attributes mark the input as
    /// sensitive, or when they cannot be read. Returns whether it was masked.
    pub async fn fill_input(
        &self,
        element: &dyn ElementHandle,
        text: &str,
        force_sensitive: bool,
    ) -> VerdantResult<bool> {
        let name = element.name();
        match tokio::time::timeout(Timeouts::MEDIUM, element.fill(text)).await {
            Ok(filled) => filled?,
            Err(_) => {
                return Err(VerdantError::timeout(
                    format!("{name} to accept input"),
                    Timeouts::MEDIUM.as_millis() as u64,
                ))
            }
        }

        let sensitive = force_sensitive
            || self
                .input_attributes(element)
                .await
                .map_or(true, |attrs| is_sensitive(&attrs));
        info!(
            element = %name,
            value = display_value(text, sensitive),
            "text entered into input element"
        );
        Ok(sensitive)
    }

    /// Read the attributes that decide masking; `None` if any read fails
    async fn input_attributes(&self, element: &dyn ElementHandle) -> Option<InputAttributes> {
        let mut values = Vec::with_capacity(InputAttributes::NAMES.len());
        for attr in InputAttributes::NAMES {
            match tokio::time::timeout(self.config.probe_timeout(), element.attribute(attr)).await {
                Ok(Ok(value)) => values.push(value),
                Ok(Err(e)) => {
                    debug!(element = %element.name(), attr, error = %e, "attribute read failed");
                    return None;
                }
                Err(_) => {
                    debug!(element = %element.name(), attr, "attribute read timed out");
                    return None;
                }
            }
        }
        let mut values = values.into_iter();
        Some(InputAttributes {
            input_type: values.next().flatten(),
            name: values.next().flatten(),
            id: values.next().flatten(),
            placeholder: values.next().flatten(),
            aria_label: values.next().flatten(),
        })
    }

    /// Assert that `element` is enabled (or disabled).
    ///
    /// # Errors
    ///
    /// [`VerdantError::UnexpectedState`] on a mismatch; query failures
    /// propagate.
    pub async fn verify_element_state(
        &self,
        element: &dyn ElementHandle,
        enabled: bool,
    ) -> VerdantResult<()> {
        let name = element.name();
        let probe_timeout = self.config.probe_timeout();
        let actual = match tokio::time::timeout(probe_timeout, element.is_enabled(probe_timeout)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(VerdantError::timeout(
                    format!("{name} enabled state"),
                    self.config.probe_timeout_ms,
                ))
            }
        };
        let label = |on: bool| if on { "enabled" } else { "disabled" };
        if actual != enabled {
            return Err(VerdantError::UnexpectedState {
                element: name,
                expected: label(enabled),
                actual: label(actual),
            });
        }
        info!(element = %name, state = label(enabled), "verified element state");
        Ok(())
    }

    /// Wait for a slow server-side calculation by waiting for its results
    /// control to become interactable on the extra-long tier.
    pub async fn wait_for_calculation_complete(
        &self,
        results: &dyn ElementHandle,
    ) -> VerdantResult<WaitResult> {
        match self
            .wait_until_interactable(results, Some(Timeouts::EXTRA_LONG))
            .await
        {
            Ok(waited) => {
                info!(element = %waited.element, "calculation completed, results available");
                Ok(waited)
            }
            Err(e) => {
                error!(element = %results.name(), error = %e, "error waiting for calculation");
                Err(e)
            }
        }
    }

    /// Close an interstitial dialog if one shows up within the configured
    /// window.
    ///
    /// Returns `true` when a dialog was found and handled. Failures while
    /// handling it are logged and reported as `false`.
    pub async fn handle_interstitial(
        &self,
        interstitial: Interstitial<'_>,
        choice: DialogChoice,
    ) -> bool {
        let window = self.config.interstitial_window();
        if self
            .wait_state(interstitial.dialog, ElementState::Visible, window)
            .await
            .is_err()
        {
            return false;
        }
        match self.dismiss(interstitial, choice).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    dialog = %interstitial.dialog.name(),
                    error = %e,
                    "error handling interstitial dialog"
                );
                false
            }
        }
    }

    async fn dismiss(&self, interstitial: Interstitial<'_>, choice: DialogChoice) -> VerdantResult<()> {
        let trigger_timeout = Some(self.config.trigger_timeout());
        match choice {
            DialogChoice::Cancel => {
                self.click(interstitial.cancel, trigger_timeout).await?;
                self.wait_for_disappear(interstitial.dialog, Some(self.config.dismiss_timeout()))
                    .await?;
                info!(dialog = %interstitial.dialog.name(), "clicked cancel, dialog dismissed");
            }
            DialogChoice::Discard => {
                let discard = interstitial.discard.ok_or_else(|| {
                    VerdantError::driver(format!(
                        "{} has no discard control",
                        interstitial.dialog.name()
                    ))
                })?;
                self.click(discard, trigger_timeout).await?;
                info!(dialog = %interstitial.dialog.name(), "clicked discard");
            }
        }
        Ok(())
    }

    /// Click `trigger` until `confirmation` shows up, dismissing the
    /// interstitial dialog whenever it appears instead.
    ///
    /// Uses the configured `max_attempts`.
    ///
    /// # Errors
    ///
    /// [`VerdantError::RetryExhausted`] wrapping the final attempt's error
    /// when no attempt observed the confirmation.
    pub async fn commit_with_recovery(
        &self,
        trigger: &dyn ElementHandle,
        confirmation: &dyn ElementHandle,
        interstitial: Interstitial<'_>,
    ) -> VerdantResult<RetryOutcome> {
        self.commit_with_recovery_attempts(
            trigger,
            confirmation,
            interstitial,
            self.config.max_attempts,
        )
        .await
    }

    /// [`Self::commit_with_recovery`] with an explicit attempt budget.
    ///
    /// A recovered interstitial consumes the attempt it appeared in. A budget
    /// of zero is treated as one attempt.
    pub async fn commit_with_recovery_attempts(
        &self,
        trigger: &dyn ElementHandle,
        confirmation: &dyn ElementHandle,
        interstitial: Interstitial<'_>,
        max_attempts: usize,
    ) -> VerdantResult<RetryOutcome> {
        let max_attempts = if max_attempts == 0 {
            warn!("max_attempts of 0 requested, using 1");
            1
        } else {
            max_attempts
        };
        let name = trigger.name();
        let mut recoveries = 0;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                element = %name,
                attempt,
                max_attempts,
                state = %CommitState::Ready,
                "commit attempt"
            );

            let failure = match self.attempt(trigger, confirmation, interstitial).await {
                Ok(AttemptOutcome::Committed) => {
                    if recoveries > 0 {
                        info!(
                            element = %name,
                            attempt,
                            recoveries,
                            state = %CommitState::Committed,
                            "commit successful after {attempt} attempt(s) ({recoveries} interstitial(s) handled)"
                        );
                    } else {
                        info!(element = %name, state = %CommitState::Committed, "commit successful");
                    }
                    return Ok(RetryOutcome {
                        succeeded: true,
                        attempts_used: attempt,
                        recovery_events_handled: recoveries,
                    });
                }
                Ok(AttemptOutcome::Interstitial) => {
                    debug!(element = %name, attempt, state = %CommitState::Recovering, "dismissing interstitial");
                    if let Err(e) = self.dismiss(interstitial, DialogChoice::Cancel).await {
                        warn!(
                            dialog = %interstitial.dialog.name(),
                            error = %e,
                            "error dismissing interstitial dialog"
                        );
                    }
                    recoveries += 1;
                    warn!(
                        element = %name,
                        attempt,
                        recoveries,
                        "interstitial dialog appeared, retrying commit"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.recovery_backoff()).await;
                        continue;
                    }
                    VerdantError::driver(format!(
                        "interstitial dialog {} appeared on final attempt",
                        interstitial.dialog.name()
                    ))
                }
                Err(e) => {
                    if attempt < max_attempts {
                        warn!(element = %name, attempt, error = %e, "commit attempt failed");
                        continue;
                    }
                    e
                }
            };

            error!(
                element = %name,
                attempts = attempt,
                recoveries,
                state = %CommitState::Failed,
                error = %failure,
                "commit failed after {attempt} attempts ({recoveries} interstitial(s) appeared)"
            );
            return Err(VerdantError::RetryExhausted {
                attempts: attempt,
                recoveries,
                source: Box::new(failure),
            });
        }
    }

    /// One Ready -> AwaitingOutcome pass
    async fn attempt(
        &self,
        trigger: &dyn ElementHandle,
        confirmation: &dyn ElementHandle,
        interstitial: Interstitial<'_>,
    ) -> VerdantResult<AttemptOutcome> {
        self.click(trigger, Some(self.config.trigger_timeout()))
            .await?;

        let dialog = interstitial.dialog;
        let window = self.config.interstitial_window();
        let interstitial_seen = async {
            if let Err(e) = self.wait_state(dialog, ElementState::Visible, window).await {
                debug!(dialog = %dialog.name(), error = %e, "no interstitial within window");
                std::future::pending::<()>().await;
            }
        };

        let outcome = tokio::select! {
            biased;
            () = interstitial_seen => AttemptOutcome::Interstitial,
            confirmed = self.wait_state(confirmation, ElementState::Visible, self.config.confirmation_timeout()) => {
                confirmed?;
                AttemptOutcome::Committed
            }
        };

        if outcome == AttemptOutcome::Committed {
            let dialog_open = self
                .probe(&dialog.name(), "visible", dialog.is_visible(self.config.probe_timeout()))
                .await;
            if dialog_open == Some(true) {
                return Ok(AttemptOutcome::Interstitial);
            }
        }
        Ok(outcome)
    }
}
