//! Shared bearer-credential holder.

use std::fmt;
use std::sync::{Arc, RwLock};

/// A mutable bearer credential, safe for concurrent read and write.
///
/// Cloning the handle shares the same underlying credential, so a
/// token-refresh collaborator can hold a clone and update the value the
/// client dials with. Reads are shared and writes exclusive; a read always
/// observes either the initial value or some fully written later value.
/// The lock itself is never exposed.
#[derive(Clone, Default)]
pub struct AuthInfo {
    token: Arc<RwLock<String>>,
}

impl AuthInfo {
    /// Creates a holder with an initial (possibly empty) token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token.into())),
        }
    }

    /// Returns the current token value.
    pub fn token(&self) -> String {
        self.token.read().expect("token lock poisoned").clone()
    }

    /// Replaces the token returned by [`token`](Self::token).
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("token lock poisoned") = token.into();
    }
}

// Never print the credential itself
impl fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInfo").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let auth = AuthInfo::new("initial");
        assert_eq!(auth.token(), "initial");

        auth.set_token("replaced");
        assert_eq!(auth.token(), "replaced");
    }

    #[test]
    fn test_clone_shares_credential() {
        let auth = AuthInfo::new("one");
        let refresher = auth.clone();

        refresher.set_token("two");
        assert_eq!(auth.token(), "two");
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(AuthInfo::default().token(), "");
    }

    #[test]
    fn test_concurrent_reads_and_writes_observe_whole_values() {
        let auth = AuthInfo::new("token-0");
        let allowed: Vec<String> = (0..8).map(|i| format!("token-{i}")).collect();

        let writers: Vec<_> = (1..8)
            .map(|i| {
                let auth = auth.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        auth.set_token(format!("token-{i}"));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let auth = auth.clone();
                let allowed = allowed.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let value = auth.token();
                        assert!(allowed.contains(&value), "torn read: {value}");
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().expect("worker thread panicked");
        }

        assert!(allowed.contains(&auth.token()));
    }
}
