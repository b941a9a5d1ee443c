// Course reviews and curated student feedback

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{course_reviews, student_feedback, users};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseReview {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = course_reviews)]
pub struct NewCourseReview {
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub review: String,
}

/// Aggregate rating for a course
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewStats {
    pub count: i64,
    pub average_rating: f64,
}

impl CourseReview {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_review: NewCourseReview,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(course_reviews::table)
            .values(&new_review)
            .returning(CourseReview::as_returning())
            .get_result(conn)
            .await
    }

    /// Reviews for a course, newest first, with the reviewer's name
    pub async fn for_course(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<Vec<(Self, String)>, diesel::result::Error> {
        course_reviews::table
            .inner_join(users::table)
            .filter(course_reviews::course_id.eq(course_id))
            .order(course_reviews::created_at.desc())
            .select((CourseReview::as_select(), users::name))
            .load(conn)
            .await
    }

    pub async fn stats_for_course(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<ReviewStats, diesel::result::Error> {
        let (count, total): (i64, Option<i64>) = course_reviews::table
            .filter(course_reviews::course_id.eq(course_id))
            .select((
                diesel::dsl::count_star(),
                diesel::dsl::sum(course_reviews::rating),
            ))
            .first(conn)
            .await?;

        let average_rating = match (count, total) {
            (0, _) | (_, None) => 0.0,
            (n, Some(sum)) => (sum as f64 / n as f64 * 10.0).round() / 10.0,
        };

        Ok(ReviewStats {
            count,
            average_rating,
        })
    }

    /// Recent high ratings for the landing page
    pub async fn top_recent(
        conn: &mut AsyncPgConnection,
        limit: i64,
    ) -> Result<Vec<(Self, String)>, diesel::result::Error> {
        course_reviews::table
            .inner_join(users::table)
            .order((
                course_reviews::rating.desc(),
                course_reviews::created_at.desc(),
            ))
            .limit(limit)
            .select((CourseReview::as_select(), users::name))
            .load(conn)
            .await
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = student_feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentFeedback {
    pub id: Uuid,
    pub student_name: String,
    pub heading: String,
    pub paragraph: String,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = student_feedback)]
pub struct NewStudentFeedback {
    pub student_name: String,
    pub heading: String,
    pub paragraph: String,
    pub video_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = student_feedback)]
pub struct StudentFeedbackUpdate {
    pub student_name: Option<String>,
    pub heading: Option<String>,
    pub paragraph: Option<String>,
    pub video_url: Option<String>,
}

impl StudentFeedback {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_feedback: NewStudentFeedback,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(student_feedback::table)
            .values(&new_feedback)
            .returning(StudentFeedback::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        student_feedback::table
            .order(student_feedback::created_at.desc())
            .select(StudentFeedback::as_select())
            .load(conn)
            .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &StudentFeedbackUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(student_feedback::table.find(id))
            .set((changes, student_feedback::updated_at.eq(Utc::now())))
            .returning(StudentFeedback::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn delete(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(student_feedback::table.find(id))
            .execute(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rounding() {
        // 7 / 2 = 3.5 exactly, 11 / 3 rounds to 3.7
        let avg = |sum: i64, n: i64| (sum as f64 / n as f64 * 10.0).round() / 10.0;
        assert_eq!(avg(7, 2), 3.5);
        assert_eq!(avg(11, 3), 3.7);
    }
}
