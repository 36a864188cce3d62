use std::sync::RwLock;

use serde::Serialize;
use thiserror::Error;

use reelist_core::config::SessionConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("user id must not be empty")]
    EmptyUid,
}

/// The signed-in identity that scopes every read and write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub uid: String,
    pub display_name: String,
}

/// Tracks whether the configured user is signed in.
///
/// Authentication itself happens elsewhere; this only toggles between the
/// configured identity and no identity.
#[derive(Debug)]
pub struct Session {
    user: User,
    signed_in: RwLock<bool>,
}

impl Session {
    /// A signed-out session for `user`.
    pub fn new(user: User) -> Result<Self, SessionError> {
        if user.uid.trim().is_empty() {
            return Err(SessionError::EmptyUid);
        }
        Ok(Self {
            user,
            signed_in: RwLock::new(false),
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        Self::new(User {
            uid: config.uid.clone(),
            display_name: config.display_name.clone(),
        })
    }

    /// The signed-in user, or `None` when signed out.
    pub fn current_user(&self) -> Option<User> {
        let signed_in = *self.signed_in.read().unwrap_or_else(|e| e.into_inner());
        signed_in.then(|| self.user.clone())
    }

    /// Toggle between signed in and signed out, returning the new current user.
    pub fn log_in_log_out(&self) -> Option<User> {
        let mut signed_in = self.signed_in.write().unwrap_or_else(|e| e.into_inner());
        *signed_in = !*signed_in;
        if *signed_in {
            tracing::info!(uid = %self.user.uid, "signed in");
            Some(self.user.clone())
        } else {
            tracing::info!(uid = %self.user.uid, "signed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            uid: "u1".into(),
            display_name: "Ripley".into(),
        }
    }

    #[test]
    fn test_starts_signed_out() {
        let session = Session::new(user()).unwrap();
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn test_toggle() {
        let session = Session::new(user()).unwrap();
        assert_eq!(session.log_in_log_out(), Some(user()));
        assert_eq!(session.current_user().unwrap().uid, "u1");
        assert_eq!(session.log_in_log_out(), None);
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn test_empty_uid_rejected() {
        let err = Session::new(User {
            uid: "  ".into(),
            display_name: String::new(),
        })
        .unwrap_err();
        assert_eq!(err, SessionError::EmptyUid);
    }
}
