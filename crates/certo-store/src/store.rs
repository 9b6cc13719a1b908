//! # Credential Store
//!
//! Thread-safe, cloneable in-memory credential store. All operations are
//! synchronous (the RwLock is `parking_lot`, not `tokio::sync`) because
//! no lock is ever held across an `.await` point, and
//! `parking_lot::RwLock` is non-poisonable — a panicking writer does not
//! permanently corrupt the store.
//!
//! The single write lock in [`CredentialStore::create_if_absent`] is the
//! entire concurrency story for issuance: natural-key lookup, code
//! generation with collision re-roll, and all three index inserts happen
//! under one guard, so racing callers for the same (user, course) pair
//! can never both create a record.
//!
//! When Postgres persistence is configured, the API layer writes through
//! after a successful create and hydrates this store at startup; the
//! unique indexes there mirror the invariants owned here.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;

use certo_core::{CourseId, CredentialId, UserId, VerificationCode};

use crate::record::{CompletionSnapshot, CredentialRecord};

/// Attempts at generating a non-colliding verification code before
/// giving up. With 128-bit codes a single retry is already astronomically
/// unlikely; the bound exists so a broken RNG fails loudly instead of
/// spinning.
const MAX_CODE_ATTEMPTS: u32 = 8;

/// Errors from the credential store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Code generation kept colliding with stored codes.
    #[error("could not generate a unique verification code after {MAX_CODE_ATTEMPTS} attempts")]
    CodeSpaceExhausted,

    /// A hydrated record duplicates an existing (user, course) pair.
    #[error("duplicate credential for user {user_id} and course {course_id}")]
    DuplicateKey {
        /// The learner on both records.
        user_id: UserId,
        /// The course on both records.
        course_id: CourseId,
    },

    /// A hydrated record duplicates an existing verification code.
    #[error("duplicate verification code {0}")]
    DuplicateCode(VerificationCode),
}

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<CredentialId, CredentialRecord>,
    by_pair: HashMap<(UserId, CourseId), CredentialId>,
    by_code: HashMap<VerificationCode, CredentialId>,
}

/// Thread-safe credential store. Cloning shares the underlying data.
#[derive(Debug, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Inner>>,
}

impl Clone for CredentialStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a credential for `(user_id, course_id)` if none exists.
    ///
    /// Returns the record and whether it was created by this call. When a
    /// record already exists, the existing record is returned unchanged
    /// with `false` — this is the idempotent re-issuance path, not an
    /// error. The whole operation runs under a single write lock, so
    /// concurrent callers racing on the same pair produce exactly one
    /// record.
    pub fn create_if_absent(
        &self,
        user_id: UserId,
        course_id: CourseId,
        snapshot: CompletionSnapshot,
    ) -> Result<(CredentialRecord, bool), StoreError> {
        let mut inner = self.inner.write();

        if let Some(existing_id) = inner.by_pair.get(&(user_id, course_id)) {
            let record = inner
                .by_id
                .get(existing_id)
                .cloned()
                .unwrap_or_else(|| unreachable!("by_pair points at a missing record"));
            return Ok((record, false));
        }

        let mut code = VerificationCode::generate();
        let mut attempts = 1;
        while inner.by_code.contains_key(&code) {
            if attempts >= MAX_CODE_ATTEMPTS {
                return Err(StoreError::CodeSpaceExhausted);
            }
            code = VerificationCode::generate();
            attempts += 1;
        }

        let record = CredentialRecord {
            id: CredentialId::new(),
            user_id,
            course_id,
            verification_code: code.clone(),
            issued_at: Utc::now(),
            snapshot,
        };

        inner.by_pair.insert((user_id, course_id), record.id);
        inner.by_code.insert(code, record.id);
        inner.by_id.insert(record.id, record.clone());

        Ok((record, true))
    }

    /// Look up a credential by its verification code.
    pub fn find_by_code(&self, code: &VerificationCode) -> Option<CredentialRecord> {
        let inner = self.inner.read();
        inner
            .by_code
            .get(code)
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    /// Look up a credential by its surrogate id.
    pub fn find_by_id(&self, id: CredentialId) -> Option<CredentialRecord> {
        self.inner.read().by_id.get(&id).cloned()
    }

    /// Look up a credential by its natural key.
    pub fn find_by_pair(&self, user_id: UserId, course_id: CourseId) -> Option<CredentialRecord> {
        let inner = self.inner.read();
        inner
            .by_pair
            .get(&(user_id, course_id))
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    /// List a learner's credentials, newest first.
    ///
    /// Ordered by `issued_at` descending with the credential id as a
    /// deterministic tiebreak for records issued in the same instant.
    pub fn list_by_user(&self, user_id: UserId) -> Vec<CredentialRecord> {
        let inner = self.inner.read();
        let mut records: Vec<CredentialRecord> = inner
            .by_id
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then(a.id.cmp(&b.id)));
        records
    }

    /// Insert records loaded from durable storage at startup.
    ///
    /// Rejects the whole batch on the first record that would violate
    /// either uniqueness invariant — a corrupted table should fail the
    /// boot, not half-load.
    pub fn hydrate(
        &self,
        records: impl IntoIterator<Item = CredentialRecord>,
    ) -> Result<usize, StoreError> {
        let mut inner = self.inner.write();
        let mut loaded = 0;

        for record in records {
            let pair = (record.user_id, record.course_id);
            if inner.by_pair.contains_key(&pair) {
                return Err(StoreError::DuplicateKey {
                    user_id: record.user_id,
                    course_id: record.course_id,
                });
            }
            if inner.by_code.contains_key(&record.verification_code) {
                return Err(StoreError::DuplicateCode(record.verification_code));
            }

            inner.by_pair.insert(pair, record.id);
            inner
                .by_code
                .insert(record.verification_code.clone(), record.id);
            inner.by_id.insert(record.id, record);
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CompletionSnapshot {
        CompletionSnapshot {
            completed_lessons: 15,
            total_lessons: 15,
            percentage: 100,
        }
    }

    #[test]
    fn create_then_find_by_code() {
        let store = CredentialStore::new();
        let user = UserId::new();
        let course = CourseId::new();

        let (record, created) = store.create_if_absent(user, course, snapshot()).unwrap();
        assert!(created);
        assert_eq!(record.user_id, user);
        assert_eq!(record.course_id, course);
        assert_eq!(record.snapshot.percentage, 100);

        let found = store.find_by_code(&record.verification_code).unwrap();
        assert_eq!(found, record);
    }

    #[test]
    fn second_create_returns_existing_record() {
        let store = CredentialStore::new();
        let user = UserId::new();
        let course = CourseId::new();

        let (first, created) = store.create_if_absent(user, course, snapshot()).unwrap();
        assert!(created);

        let (second, created) = store.create_if_absent(user, course, snapshot()).unwrap();
        assert!(!created);
        assert_eq!(second, first);
        assert_eq!(second.verification_code, first.verification_code);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn repeated_creates_never_change_the_snapshot() {
        let store = CredentialStore::new();
        let user = UserId::new();
        let course = CourseId::new();

        let (first, _) = store.create_if_absent(user, course, snapshot()).unwrap();

        // A later call with different metrics (course content changed
        // after issuance) must not alter the stored snapshot.
        let mutated = CompletionSnapshot {
            completed_lessons: 20,
            total_lessons: 20,
            percentage: 100,
        };
        let (second, created) = store.create_if_absent(user, course, mutated).unwrap();
        assert!(!created);
        assert_eq!(second.snapshot, first.snapshot);
        assert_eq!(second.snapshot.total_lessons, 15);
    }

    #[test]
    fn same_user_different_courses_get_distinct_credentials() {
        let store = CredentialStore::new();
        let user = UserId::new();

        let (a, _) = store
            .create_if_absent(user, CourseId::new(), snapshot())
            .unwrap();
        let (b, _) = store
            .create_if_absent(user, CourseId::new(), snapshot())
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.verification_code, b.verification_code);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn find_by_code_misses_on_unknown_code() {
        let store = CredentialStore::new();
        assert!(store.find_by_code(&VerificationCode::generate()).is_none());
    }

    #[test]
    fn find_by_pair_and_by_id() {
        let store = CredentialStore::new();
        let user = UserId::new();
        let course = CourseId::new();
        let (record, _) = store.create_if_absent(user, course, snapshot()).unwrap();

        assert_eq!(store.find_by_pair(user, course).unwrap(), record);
        assert_eq!(store.find_by_id(record.id).unwrap(), record);
        assert!(store.find_by_pair(UserId::new(), course).is_none());
        assert!(store.find_by_id(CredentialId::new()).is_none());
    }

    #[test]
    fn list_by_user_is_newest_first() {
        let store = CredentialStore::new();
        let user = UserId::new();

        let mut issued = Vec::new();
        for _ in 0..5 {
            let (record, _) = store
                .create_if_absent(user, CourseId::new(), snapshot())
                .unwrap();
            issued.push(record);
        }
        // Another learner's credential must not appear.
        store
            .create_if_absent(UserId::new(), CourseId::new(), snapshot())
            .unwrap();

        let listed = store.list_by_user(user);
        assert_eq!(listed.len(), 5);
        for window in listed.windows(2) {
            assert!(window[0].issued_at >= window[1].issued_at);
        }
        for record in &issued {
            assert!(listed.contains(record));
        }
    }

    #[test]
    fn hydrate_restores_all_indexes() {
        let store = CredentialStore::new();
        let user = UserId::new();
        let course = CourseId::new();
        let (record, _) = store.create_if_absent(user, course, snapshot()).unwrap();

        let restored = CredentialStore::new();
        let loaded = restored.hydrate(vec![record.clone()]).unwrap();
        assert_eq!(loaded, 1);

        assert_eq!(restored.find_by_id(record.id).unwrap(), record);
        assert_eq!(restored.find_by_pair(user, course).unwrap(), record);
        assert_eq!(
            restored.find_by_code(&record.verification_code).unwrap(),
            record
        );
    }

    #[test]
    fn hydrate_rejects_duplicate_pair() {
        let source = CredentialStore::new();
        let user = UserId::new();
        let course = CourseId::new();
        let (record, _) = source.create_if_absent(user, course, snapshot()).unwrap();

        let mut duplicate = record.clone();
        duplicate.id = CredentialId::new();
        duplicate.verification_code = VerificationCode::generate();

        let restored = CredentialStore::new();
        let err = restored.hydrate(vec![record, duplicate]).unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateKey {
                user_id: user,
                course_id: course
            }
        );
    }

    #[test]
    fn hydrate_rejects_duplicate_code() {
        let source = CredentialStore::new();
        let (record, _) = source
            .create_if_absent(UserId::new(), CourseId::new(), snapshot())
            .unwrap();

        let mut duplicate = record.clone();
        duplicate.id = CredentialId::new();
        duplicate.user_id = UserId::new();

        let restored = CredentialStore::new();
        let err = restored.hydrate(vec![record.clone(), duplicate]).unwrap_err();
        assert_eq!(err, StoreError::DuplicateCode(record.verification_code));
    }

    #[test]
    fn clone_shares_underlying_data() {
        let store = CredentialStore::new();
        let clone = store.clone();

        clone
            .create_if_absent(UserId::new(), CourseId::new(), snapshot())
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn racing_creates_produce_exactly_one_record() {
        let store = CredentialStore::new();
        let user = UserId::new();
        let course = CourseId::new();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.create_if_absent(user, course, snapshot()))
            })
            .collect();

        let results: Vec<(CredentialRecord, bool)> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        let created_count = results.iter().filter(|(_, created)| *created).count();
        assert_eq!(created_count, 1, "exactly one caller wins the race");
        assert_eq!(store.len(), 1);

        // Every caller observes the same record and the same code.
        let winner = &results[0].0;
        for (record, _) in &results {
            assert_eq!(record, winner);
        }
    }
}
