//! Credential persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `credentials`
//! table. The table's unique constraints on `(user_id, course_id)` and
//! `verification_code` mirror the invariants the in-memory store
//! enforces; `insert_if_absent` leans on the former so concurrent
//! writers and retries are both safe.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use certo_core::{CourseId, CredentialId, UserId, VerificationCode};
use certo_store::{CompletionSnapshot, CredentialRecord};

/// Insert a credential if its (user, course) pair is absent.
///
/// `ON CONFLICT DO NOTHING` makes this idempotent: replays after a
/// failed response or a lost race simply affect zero rows. Returns
/// whether a row was written.
pub async fn insert_if_absent(pool: &PgPool, record: &CredentialRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO credentials (id, user_id, course_id, verification_code, issued_at,
         completed_lessons, total_lessons, percentage)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (user_id, course_id) DO NOTHING",
    )
    .bind(record.id.as_uuid())
    .bind(record.user_id.as_uuid())
    .bind(record.course_id.as_uuid())
    .bind(record.verification_code.as_str())
    .bind(record.issued_at)
    .bind(record.snapshot.completed_lessons as i32)
    .bind(record.snapshot.total_lessons as i32)
    .bind(i16::from(record.snapshot.percentage))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all credentials, for hydrating the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<CredentialRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CredentialRow>(
        "SELECT id, user_id, course_id, verification_code, issued_at,
         completed_lessons, total_lessons, percentage
         FROM credentials ORDER BY issued_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(CredentialRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    verification_code: String,
    issued_at: DateTime<Utc>,
    completed_lessons: i32,
    total_lessons: i32,
    percentage: i16,
}

impl CredentialRow {
    /// Convert to a record, skipping (with a warning) rows whose stored
    /// code no longer parses — hydration should not refuse to boot over
    /// one corrupt row, and the store's own invariant checks still run.
    fn into_record(self) -> Option<CredentialRecord> {
        let verification_code = match VerificationCode::parse(&self.verification_code) {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(credential_id = %self.id, error = %e,
                    "skipping credential row with malformed verification code");
                return None;
            }
        };

        Some(CredentialRecord {
            id: CredentialId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            course_id: CourseId::from_uuid(self.course_id),
            verification_code,
            issued_at: self.issued_at,
            snapshot: CompletionSnapshot {
                completed_lessons: self.completed_lessons.max(0) as u32,
                total_lessons: self.total_lessons.max(0) as u32,
                percentage: self.percentage.clamp(0, 100) as u8,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str) -> CredentialRow {
        CredentialRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            verification_code: code.to_string(),
            issued_at: Utc::now(),
            completed_lessons: 15,
            total_lessons: 15,
            percentage: 100,
        }
    }

    #[test]
    fn well_formed_row_converts() {
        let code = VerificationCode::generate();
        let record = row(code.as_str()).into_record().unwrap();
        assert_eq!(record.verification_code, code);
        assert_eq!(record.snapshot.total_lessons, 15);
    }

    #[test]
    fn malformed_code_row_is_skipped() {
        assert!(row("not-a-code").into_record().is_none());
    }

    #[test]
    fn out_of_range_metrics_are_clamped() {
        let code = VerificationCode::generate();
        let mut r = row(code.as_str());
        r.completed_lessons = -3;
        r.percentage = 120;
        let record = r.into_record().unwrap();
        assert_eq!(record.snapshot.completed_lessons, 0);
        assert_eq!(record.snapshot.percentage, 100);
    }
}
