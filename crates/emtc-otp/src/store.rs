//! In-process challenge map.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Unique key of a challenge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChallengeKey {
    /// Who the code was sent to, typically a phone number.
    pub identifier: String,
    /// What the code authorizes, e.g. `"dpr_submit"`.
    pub purpose: String,
}

impl ChallengeKey {
    pub fn new(identifier: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            purpose: purpose.into(),
        }
    }
}

/// A live challenge. Consumed challenges are removed, never flagged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub code: String,
    /// Time since the Unix epoch at issuance.
    pub issued_at: Duration,
}

/// What to do with an entry after inspecting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Keep,
    Evict,
}

/// Process-wide map from `(identifier, purpose)` to its live challenge.
///
/// One mutex guards the whole map. Contention is low (a handful of OTP
/// requests per second at most) and every critical section is a single
/// hash lookup.
#[derive(Debug, Default)]
pub struct ChallengeStore {
    entries: Mutex<HashMap<ChallengeKey, Challenge>>,
}

impl ChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are independent, so a panic mid-update cannot leave the map
    // in a state worth refusing to read.
    fn entries(&self) -> MutexGuard<'_, HashMap<ChallengeKey, Challenge>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `challenge` under `key`, returning the challenge it replaced.
    pub fn issue(&self, key: ChallengeKey, challenge: Challenge) -> Option<Challenge> {
        self.entries().insert(key, challenge)
    }

    /// Snapshot of the live challenge for `key`.
    pub fn lookup(&self, key: &ChallengeKey) -> Option<Challenge> {
        self.entries().get(key).cloned()
    }

    /// Remove and return the live challenge for `key`.
    pub fn consume(&self, key: &ChallengeKey) -> Option<Challenge> {
        self.entries().remove(key)
    }

    /// Inspect the entry for `key` and keep or evict it, atomically.
    ///
    /// Returns `None` when no entry exists; `decide` is not called then.
    pub fn resolve<R>(
        &self,
        key: &ChallengeKey,
        decide: impl FnOnce(&Challenge) -> (R, Disposition),
    ) -> Option<R> {
        let mut entries = self.entries();
        let (result, disposition) = decide(entries.get(key)?);
        if disposition == Disposition::Evict {
            entries.remove(key);
        }
        Some(result)
    }

    /// Number of live (possibly expired but unchecked) challenges.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(code: &str) -> Challenge {
        Challenge {
            code: code.to_string(),
            issued_at: Duration::from_secs(100),
        }
    }

    #[test]
    fn test_issue_replaces() {
        let store = ChallengeStore::new();
        let key = ChallengeKey::new("+911234567890", "dpr_submit");

        assert!(store.issue(key.clone(), challenge("111111")).is_none());
        let replaced = store.issue(key.clone(), challenge("222222"));

        assert_eq!(replaced, Some(challenge("111111")));
        assert_eq!(store.lookup(&key), Some(challenge("222222")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_purposes_are_independent() {
        let store = ChallengeStore::new();
        store.issue(ChallengeKey::new("+91", "dpr_submit"), challenge("111111"));
        store.issue(ChallengeKey::new("+91", "mpr_submit"), challenge("222222"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_consume_removes() {
        let store = ChallengeStore::new();
        let key = ChallengeKey::new("a", "b");
        store.issue(key.clone(), challenge("123456"));

        assert_eq!(store.consume(&key), Some(challenge("123456")));
        assert!(store.consume(&key).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_resolve_keep_and_evict() {
        let store = ChallengeStore::new();
        let key = ChallengeKey::new("a", "b");
        store.issue(key.clone(), challenge("123456"));

        let seen = store.resolve(&key, |c| (c.code.clone(), Disposition::Keep));
        assert_eq!(seen.as_deref(), Some("123456"));
        assert!(store.lookup(&key).is_some());

        store.resolve(&key, |_| ((), Disposition::Evict));
        assert!(store.lookup(&key).is_none());
        assert!(store.resolve(&key, |_| ((), Disposition::Keep)).is_none());
    }
}
