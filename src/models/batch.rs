// Course batches and their auto-generated sessions

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{batch_sessions, course_batches};

pub const SESSION_STATUS_SHOW: &str = "show";
pub const SESSION_STATUS_HIDE: &str = "hide";

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_batches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseBatch {
    pub id: Uuid,
    pub course_id: Uuid,
    pub instructor_id: Uuid,
    pub batch_number: i32,
    pub batch_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub meeting_link: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = course_batches)]
pub struct NewCourseBatch {
    pub course_id: Uuid,
    pub instructor_id: Uuid,
    pub batch_number: i32,
    pub batch_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub meeting_link: Option<String>,
    pub status: String,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = course_batches)]
pub struct CourseBatchUpdate {
    pub batch_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: Option<String>,
}

/// Reference counts that block batch deletion
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchReferenceCounts {
    pub enrollments: i64,
    pub payments: i64,
    pub emis: i64,
}

impl BatchReferenceCounts {
    pub fn any(&self) -> bool {
        self.enrollments > 0 || self.payments > 0 || self.emis > 0
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = batch_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BatchSession {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub session_number: i32,
    pub status: String,
    pub video_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = batch_sessions)]
pub struct NewBatchSession {
    pub batch_id: Uuid,
    pub session_number: i32,
    pub status: String,
}

impl CourseBatch {
    /// Next batch number for a course (max + 1, starting at 1)
    pub async fn next_batch_number(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<i32, diesel::result::Error> {
        let max: Option<i32> = course_batches::table
            .filter(course_batches::course_id.eq(course_id))
            .select(diesel::dsl::max(course_batches::batch_number))
            .first(conn)
            .await?;
        Ok(max.unwrap_or(0) + 1)
    }

    /// Insert the batch and auto-generate one visible session per lesson
    pub async fn create_with_sessions(
        conn: &mut AsyncPgConnection,
        new_batch: NewCourseBatch,
        lesson_count: i32,
    ) -> Result<Self, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let batch: CourseBatch = diesel::insert_into(course_batches::table)
                    .values(&new_batch)
                    .returning(CourseBatch::as_returning())
                    .get_result(conn)
                    .await?;

                let sessions: Vec<NewBatchSession> = (1..=lesson_count)
                    .map(|n| NewBatchSession {
                        batch_id: batch.id,
                        session_number: n,
                        status: SESSION_STATUS_SHOW.to_string(),
                    })
                    .collect();
                diesel::insert_into(batch_sessions::table)
                    .values(&sessions)
                    .execute(conn)
                    .await?;

                Ok(batch)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        course_batches::table
            .find(id)
            .select(CourseBatch::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn list_for_course(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        course_batches::table
            .filter(course_batches::course_id.eq(course_id))
            .order(course_batches::batch_number.asc())
            .select(CourseBatch::as_select())
            .load(conn)
            .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &CourseBatchUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(course_batches::table.find(id))
            .set((changes, course_batches::updated_at.eq(Utc::now())))
            .returning(CourseBatch::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn set_meeting_link(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        meeting_link: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(course_batches::table.find(id))
            .set((
                course_batches::meeting_link.eq(meeting_link),
                course_batches::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .await
    }

    /// Count enrollment, payment and installment rows that reference the
    /// batch. Unpaid rows count too: a `created` order already carries
    /// the batch id, and the foreign keys have no ON DELETE.
    pub async fn reference_counts(
        conn: &mut AsyncPgConnection,
        batch_id: Uuid,
    ) -> Result<BatchReferenceCounts, diesel::result::Error> {
        use crate::schema::{course_emis, course_enrollments, course_payments};

        let enrollments = course_enrollments::table
            .filter(course_enrollments::batch_id.eq(batch_id))
            .count()
            .get_result(conn)
            .await?;
        let payments = course_payments::table
            .filter(course_payments::batch_id.eq(batch_id))
            .count()
            .get_result(conn)
            .await?;
        let emis = course_emis::table
            .filter(course_emis::batch_id.eq(batch_id))
            .count()
            .get_result(conn)
            .await?;

        Ok(BatchReferenceCounts {
            enrollments,
            payments,
            emis,
        })
    }

    /// Check references and delete sessions plus the batch row in one
    /// transaction. Returns the blocking counts and deletes nothing when
    /// any enrollment, payment or installment still points at the batch.
    pub async fn delete_if_unreferenced(
        conn: &mut AsyncPgConnection,
        batch_id: Uuid,
    ) -> Result<Option<BatchReferenceCounts>, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let counts = Self::reference_counts(conn, batch_id).await?;
                if counts.any() {
                    return Ok(Some(counts));
                }

                diesel::delete(
                    batch_sessions::table.filter(batch_sessions::batch_id.eq(batch_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(course_batches::table.find(batch_id))
                    .execute(conn)
                    .await?;
                Ok(None)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn count_active(conn: &mut AsyncPgConnection) -> Result<i64, diesel::result::Error> {
        course_batches::table
            .filter(course_batches::status.eq("active"))
            .count()
            .get_result(conn)
            .await
    }
}

impl BatchSession {
    pub async fn for_batch(
        conn: &mut AsyncPgConnection,
        batch_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        batch_sessions::table
            .filter(batch_sessions::batch_id.eq(batch_id))
            .order(batch_sessions::session_number.asc())
            .select(BatchSession::as_select())
            .load(conn)
            .await
    }

    pub async fn count_for_batch(
        conn: &mut AsyncPgConnection,
        batch_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        batch_sessions::table
            .filter(batch_sessions::batch_id.eq(batch_id))
            .count()
            .get_result(conn)
            .await
    }

    pub async fn set_video_link(
        conn: &mut AsyncPgConnection,
        session_id: Uuid,
        video_link: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(batch_sessions::table.find(session_id))
            .set(batch_sessions::video_link.eq(video_link))
            .execute(conn)
            .await
    }

    /// Flip a session between `show` and `hide`
    pub async fn set_status(
        conn: &mut AsyncPgConnection,
        session_id: Uuid,
        status: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(batch_sessions::table.find(session_id))
            .set(batch_sessions::status.eq(status))
            .execute(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_reference_counts_any() {
        let clear = BatchReferenceCounts {
            enrollments: 0,
            payments: 0,
            emis: 0,
        };
        assert!(!clear.any());

        // An order still in `created` status blocks deletion on its own
        let unpaid_order = BatchReferenceCounts {
            enrollments: 0,
            payments: 1,
            emis: 0,
        };
        assert!(unpaid_order.any());

        let emi_only = BatchReferenceCounts {
            enrollments: 0,
            payments: 0,
            emis: 2,
        };
        assert!(emi_only.any());
    }
}
