//! Navigation gating on session state.

use parley_config::RoutesConfig;
use parley_core::{Phase, SessionState};
use serde::Serialize;
use tokio::sync::watch;

use crate::routes::Route;

/// What the view layer should do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
    Render,
    /// The identity provider has not reported yet; show a placeholder.
    Loading,
    Redirect { to: String },
}

#[derive(Debug, Clone)]
pub struct RouteGate {
    sign_in_path: String,
    fallback_path: String,
}

impl RouteGate {
    pub fn new(sign_in_path: impl Into<String>, fallback_path: impl Into<String>) -> Self {
        Self {
            sign_in_path: sign_in_path.into(),
            fallback_path: fallback_path.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &RoutesConfig) -> Self {
        Self::new(&config.sign_in_path, &config.fallback_path)
    }

    /// Decision for protected content.
    #[must_use]
    pub fn evaluate(&self, state: &SessionState) -> RouteDecision {
        match (state.phase, state.identity.is_some()) {
            (Phase::Initializing, _) => RouteDecision::Loading,
            (Phase::Ready, true) => RouteDecision::Render,
            (Phase::Ready, false) => RouteDecision::Redirect {
                to: self.sign_in_path.clone(),
            },
        }
    }

    /// Decision for navigating to `path`: public routes always render,
    /// protected routes go through [`Self::evaluate`], and everything else
    /// redirects to the fallback.
    #[must_use]
    pub fn navigate(&self, path: &str, state: &SessionState) -> RouteDecision {
        let route = Route::parse(path);
        if route.is_protected() {
            self.evaluate(state)
        } else if route.is_public() {
            RouteDecision::Render
        } else {
            RouteDecision::Redirect {
                to: self.fallback_path.clone(),
            }
        }
    }

    /// Re-evaluate on every state change.
    #[must_use]
    pub fn watch(&self, receiver: watch::Receiver<SessionState>) -> GateWatcher {
        GateWatcher {
            gate: self.clone(),
            receiver,
        }
    }
}

impl Default for RouteGate {
    fn default() -> Self {
        Self::from_config(&RoutesConfig::default())
    }
}

pub struct GateWatcher {
    gate: RouteGate,
    receiver: watch::Receiver<SessionState>,
}

impl GateWatcher {
    /// Decision for the latest state, marking it seen.
    pub fn current(&mut self) -> RouteDecision {
        self.gate.evaluate(&self.receiver.borrow_and_update())
    }

    /// Wait for the next state change and return its decision. `None` once
    /// the controller is gone.
    pub async fn next(&mut self) -> Option<RouteDecision> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }
}
