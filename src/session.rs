//! Per-client credential state.
//!
//! A session starts `Unauthenticated`, carrying only the client identity. The
//! challenge call moves it to `Authenticated`. Depending on the
//! [`TokenPolicy`], creating a task moves it to `Expired`, after which the
//! token header is sent empty until the next `authenticate`.
use std::str::FromStr;

use crate::error::FashError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenPolicy {
    /// Drop the challenge token once a task is created (upstream-compatible).
    #[default]
    ExpireAfterTask,
    /// Keep using the challenge token for polling and later calls.
    Retain,
}

impl FromStr for TokenPolicy {
    type Err = FashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expire" | "expire_after_task" => Ok(TokenPolicy::ExpireAfterTask),
            "retain" => Ok(TokenPolicy::Retain),
            other => Err(FashError::Config(format!(
                "unknown token policy '{}', expected 'expire' or 'retain'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { token: String },
    Expired,
}

#[derive(Debug, Clone)]
pub struct Session {
    identity: String,
    state: SessionState,
    policy: TokenPolicy,
}

impl Session {
    pub fn new(identity: impl Into<String>, policy: TokenPolicy) -> Self {
        Self {
            identity: identity.into(),
            state: SessionState::Unauthenticated,
            policy,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: TokenPolicy) {
        self.policy = policy;
    }

    /// Value for the `x-auth-challenge` header in the current state.
    pub fn token(&self) -> &str {
        match &self.state {
            SessionState::Unauthenticated => &self.identity,
            SessionState::Authenticated { token } => token,
            SessionState::Expired => "",
        }
    }

    /// Back to the pre-auth state, ahead of a fresh challenge.
    pub fn reset(&mut self) {
        self.state = SessionState::Unauthenticated;
    }

    pub fn authenticated(&mut self, token: impl Into<String>) {
        self.state = SessionState::Authenticated {
            token: token.into(),
        };
    }

    pub fn task_created(&mut self) {
        if self.policy == TokenPolicy::ExpireAfterTask {
            self.state = SessionState::Expired;
        }
    }
}
