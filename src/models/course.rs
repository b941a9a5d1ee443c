// Course catalog: courses, overview details, curriculum rows, categories

use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::schema::{course_categories, course_curriculums, course_overview_details, courses};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub overview: String,
    pub level: String,
    pub category: String,
    pub sub_categories: JsonValue,
    pub instructor_id: Uuid,
    pub instructor_name: String,
    pub instructor_badge: Option<String>,
    pub price_paise: i64,
    pub is_installments: bool,
    pub is_upcoming: bool,
    pub start_date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub enrolled: i32,
    pub total_slots: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourse {
    pub name: String,
    pub slug: String,
    pub overview: String,
    pub level: String,
    pub category: String,
    pub sub_categories: JsonValue,
    pub instructor_id: Uuid,
    pub instructor_name: String,
    pub instructor_badge: Option<String>,
    pub price_paise: i64,
    pub is_installments: bool,
    pub is_upcoming: bool,
    pub start_date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub total_slots: Option<i32>,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = courses)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub overview: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
    pub sub_categories: Option<JsonValue>,
    pub instructor_badge: Option<String>,
    pub price_paise: Option<i64>,
    pub is_installments: Option<bool>,
    pub is_upcoming: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub total_slots: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_overview_details)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseOverviewDetail {
    pub id: Uuid,
    pub course_id: Uuid,
    pub long_overview: String,
    pub learning_outcomes: JsonValue,
    pub requirements: JsonValue,
    pub faqs: JsonValue,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = course_overview_details)]
pub struct NewCourseOverviewDetail {
    pub course_id: Uuid,
    pub long_overview: String,
    pub learning_outcomes: JsonValue,
    pub requirements: JsonValue,
    pub faqs: JsonValue,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_curriculums)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseCurriculum {
    pub id: Uuid,
    pub course_id: Uuid,
    pub sequence: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = course_curriculums)]
pub struct NewCourseCurriculum {
    pub course_id: Uuid,
    pub sequence: i32,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseCategory {
    pub id: Uuid,
    pub category: String,
    pub sub_categories: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Catalog filters, all optional and AND-combined. Sub-category filters
/// take precedence over plain category filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilters {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub sub_categories: Vec<String>,
    #[serde(default)]
    pub instructor_names: Vec<String>,
    #[serde(default)]
    pub levels: Vec<String>,
}

impl CourseFilters {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.sub_categories.is_empty()
            && self.instructor_names.is_empty()
            && self.levels.is_empty()
    }
}

type BoxedCourseQuery<'a> = courses::BoxedQuery<'a, Pg>;

/// Apply catalog filters onto a boxed query. Used twice per request, once
/// for the page rows and once for the count.
fn apply_filters<'a>(mut query: BoxedCourseQuery<'a>, filters: &'a CourseFilters) -> BoxedCourseQuery<'a> {
    // The public catalog never shows upcoming courses
    query = query.filter(courses::is_upcoming.eq(false));

    // When sub-categories are filtered, the broader category filter is
    // ignored so the narrower selection wins
    if !filters.sub_categories.is_empty() {
        let mut pred: Option<Box<dyn BoxableExpression<courses::table, Pg, SqlType = Bool>>> = None;
        for sub in &filters.sub_categories {
            let expr = courses::sub_categories.contains(serde_json::json!([sub]));
            pred = Some(match pred {
                Some(p) => Box::new(p.or(expr)),
                None => Box::new(expr),
            });
        }
        if let Some(p) = pred {
            query = query.filter(p);
        }
    } else if !filters.categories.is_empty() {
        query = query.filter(courses::category.eq_any(&filters.categories));
    }

    if !filters.instructor_names.is_empty() {
        query = query.filter(courses::instructor_name.eq_any(&filters.instructor_names));
    }

    if !filters.levels.is_empty() {
        query = query.filter(courses::level.eq_any(&filters.levels));
    }

    query
}

/// Reference counts that block course deletion
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseReferenceCounts {
    pub payments: i64,
    pub enrollments: i64,
    pub batches: i64,
    pub emis: i64,
}

impl CourseReferenceCounts {
    pub fn any(&self) -> bool {
        self.payments > 0 || self.enrollments > 0 || self.batches > 0 || self.emis > 0
    }
}

impl Course {
    /// Filtered catalog page plus the total count for the same filters
    pub async fn list_filtered(
        conn: &mut AsyncPgConnection,
        filters: &CourseFilters,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), diesel::result::Error> {
        let total = apply_filters(courses::table.into_boxed(), filters)
            .count()
            .get_result(conn)
            .await?;

        let rows = apply_filters(courses::table.into_boxed(), filters)
            .order(courses::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(Course::as_select())
            .load(conn)
            .await?;

        Ok((rows, total))
    }

    pub async fn find_by_slug(
        conn: &mut AsyncPgConnection,
        slug: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        courses::table
            .filter(courses::slug.eq(slug))
            .select(Course::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        courses::table
            .find(id)
            .select(Course::as_select())
            .first(conn)
            .await
            .optional()
    }

    /// Live courses ranked by enrollment
    pub async fn top_by_enrollment(
        conn: &mut AsyncPgConnection,
        limit: i64,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        courses::table
            .filter(courses::is_upcoming.eq(false))
            .order(courses::enrolled.desc())
            .limit(limit)
            .select(Course::as_select())
            .load(conn)
            .await
    }

    /// Announced courses that have not started yet
    pub async fn upcoming(
        conn: &mut AsyncPgConnection,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        courses::table
            .filter(courses::is_upcoming.eq(true))
            .filter(courses::start_date.gt(today))
            .order(courses::start_date.asc())
            .limit(limit)
            .select(Course::as_select())
            .load(conn)
            .await
    }

    pub async fn list_by_instructor(
        conn: &mut AsyncPgConnection,
        instructor_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        courses::table
            .filter(courses::instructor_id.eq(instructor_id))
            .order(courses::created_at.desc())
            .select(Course::as_select())
            .load(conn)
            .await
    }

    pub async fn list_paginated(
        conn: &mut AsyncPgConnection,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), diesel::result::Error> {
        let mut query = courses::table.into_boxed();
        let mut count_query = courses::table.into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            query = query.filter(courses::name.ilike(pattern.clone()));
            count_query = count_query.filter(courses::name.ilike(pattern));
        }

        let total = count_query.count().get_result(conn).await?;
        let rows = query
            .order(courses::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(Course::as_select())
            .load(conn)
            .await?;

        Ok((rows, total))
    }

    /// Insert the course, its overview detail and curriculum rows in one
    /// transaction
    pub async fn create_with_details(
        conn: &mut AsyncPgConnection,
        new_course: NewCourse,
        long_overview: String,
        learning_outcomes: JsonValue,
        requirements: JsonValue,
        faqs: JsonValue,
        lessons: Vec<(String, Option<String>, Option<String>)>,
    ) -> Result<Self, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let course: Course = diesel::insert_into(courses::table)
                    .values(&new_course)
                    .returning(Course::as_returning())
                    .get_result(conn)
                    .await?;

                let detail = NewCourseOverviewDetail {
                    course_id: course.id,
                    long_overview,
                    learning_outcomes,
                    requirements,
                    faqs,
                };
                diesel::insert_into(course_overview_details::table)
                    .values(&detail)
                    .execute(conn)
                    .await?;

                let curriculum: Vec<NewCourseCurriculum> = lessons
                    .into_iter()
                    .enumerate()
                    .map(|(i, (title, description, duration))| NewCourseCurriculum {
                        course_id: course.id,
                        sequence: (i + 1) as i32,
                        title,
                        description,
                        duration,
                    })
                    .collect();
                diesel::insert_into(course_curriculums::table)
                    .values(&curriculum)
                    .execute(conn)
                    .await?;

                Ok(course)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &CourseUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(courses::table.find(id))
            .set((changes, courses::updated_at.eq(Utc::now())))
            .returning(Course::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn increment_enrolled(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(courses::table.find(id))
            .set(courses::enrolled.eq(courses::enrolled + 1))
            .execute(conn)
            .await
    }

    /// Count payment/enrollment/batch/EMI rows that reference the course
    pub async fn reference_counts(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<CourseReferenceCounts, diesel::result::Error> {
        use crate::schema::{course_batches, course_emis, course_enrollments, course_payments};

        let payments = course_payments::table
            .filter(course_payments::course_id.eq(course_id))
            .count()
            .get_result(conn)
            .await?;
        let enrollments = course_enrollments::table
            .filter(course_enrollments::course_id.eq(course_id))
            .count()
            .get_result(conn)
            .await?;
        let batches = course_batches::table
            .filter(course_batches::course_id.eq(course_id))
            .count()
            .get_result(conn)
            .await?;
        let emis = course_emis::table
            .filter(course_emis::course_id.eq(course_id))
            .count()
            .get_result(conn)
            .await?;

        Ok(CourseReferenceCounts {
            payments,
            enrollments,
            batches,
            emis,
        })
    }

    /// Check references and delete curriculum, overview detail and the
    /// course row in one transaction. Returns the blocking counts and
    /// deletes nothing when anything still points at the course, so a
    /// payment or enrollment landing between check and delete cannot
    /// slip past the guard.
    pub async fn delete_if_unreferenced(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<Option<CourseReferenceCounts>, diesel::result::Error> {
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let counts = Self::reference_counts(conn, course_id).await?;
                if counts.any() {
                    return Ok(Some(counts));
                }

                diesel::delete(
                    course_curriculums::table.filter(course_curriculums::course_id.eq(course_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    course_overview_details::table
                        .filter(course_overview_details::course_id.eq(course_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(courses::table.find(course_id))
                    .execute(conn)
                    .await?;
                Ok(None)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn count(conn: &mut AsyncPgConnection) -> Result<i64, diesel::result::Error> {
        courses::table.count().get_result(conn).await
    }
}

impl CourseOverviewDetail {
    pub async fn find_by_course(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        course_overview_details::table
            .filter(course_overview_details::course_id.eq(course_id))
            .select(CourseOverviewDetail::as_select())
            .first(conn)
            .await
            .optional()
    }
}

impl CourseCurriculum {
    pub async fn for_course(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        course_curriculums::table
            .filter(course_curriculums::course_id.eq(course_id))
            .order(course_curriculums::sequence.asc())
            .select(CourseCurriculum::as_select())
            .load(conn)
            .await
    }

    pub async fn count_for_course(
        conn: &mut AsyncPgConnection,
        course_id: Uuid,
    ) -> Result<i64, diesel::result::Error> {
        course_curriculums::table
            .filter(course_curriculums::course_id.eq(course_id))
            .count()
            .get_result(conn)
            .await
    }
}

impl CourseCategory {
    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        course_categories::table
            .order(course_categories::category.asc())
            .select(CourseCategory::as_select())
            .load(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters() {
        let filters = CourseFilters::default();
        assert!(filters.is_empty());

        let filters = CourseFilters {
            levels: vec!["Beginner".to_string()],
            ..Default::default()
        };
        assert!(!filters.is_empty());
    }

    #[test]
    fn test_reference_counts_any() {
        let clean = CourseReferenceCounts {
            payments: 0,
            enrollments: 0,
            batches: 0,
            emis: 0,
        };
        assert!(!clean.any());

        let blocked = CourseReferenceCounts {
            emis: 3,
            ..clean.clone()
        };
        assert!(blocked.any());
    }
}
