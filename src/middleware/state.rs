use axum::extract::FromRef;

use super::guard::GuardState;
use crate::client::ApiClient;

/// Shared state for session route handlers.
#[derive(Clone)]
pub(super) struct SessionState {
    pub(super) client: ApiClient,
    pub(super) guard: GuardState,
}

// SessionUser reads cookie names from the guard state
impl FromRef<SessionState> for GuardState {
    fn from_ref(state: &SessionState) -> Self {
        state.guard.clone()
    }
}
