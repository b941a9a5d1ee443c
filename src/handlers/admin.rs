// Admin dashboard and account moderation

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    app::AppState,
    models::payment::{CourseEmi, CourseEnrollment, CoursePayment},
    models::{Course, CourseBatch, Instructor, InstructorStatus, User},
    utils::{
        time::{ist_offset, ist_now},
        ApiError, ApiResponse, PageQuery, PageSettings,
    },
};

const ADMIN_PAGE_SIZE: i64 = 10;

// ==== DASHBOARD ====

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_students: i64,
    pub total_instructors: i64,
    pub total_courses: i64,
    pub active_batches: i64,
    pub revenue_this_month_paise: i64,
    pub revenue_last_month_paise: i64,
    /// Month-over-month change in percent; None when last month was zero
    pub revenue_change_percent: Option<f64>,
    pub enrollments_this_month: i64,
    pub enrollments_last_month: i64,
}

/// First instants of last month, this month and next month, as UTC
fn month_bounds(now: DateTime<FixedOffset>) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .unwrap_or(today);
    let (py, pm) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    let (ny, nm) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    let last_month = NaiveDate::from_ymd_opt(py, pm, 1).unwrap_or(this_month);
    let next_month = NaiveDate::from_ymd_opt(ny, nm, 1).unwrap_or(this_month);

    let to_utc = |d: NaiveDate| {
        ist_offset()
            .from_local_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default())
            .single()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now)
    };

    (to_utc(last_month), to_utc(this_month), to_utc(next_month))
}

fn percent_change(current: i64, previous: i64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let change = (current - previous) as f64 / previous as f64 * 100.0;
    Some((change * 10.0).round() / 10.0)
}

pub async fn dashboard_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let (last_start, this_start, next_start) = month_bounds(ist_now());

    let revenue_this_month = CoursePayment::revenue_between(&mut conn, this_start, next_start)
        .await?
        + CourseEmi::revenue_between(&mut conn, this_start, next_start).await?;
    let revenue_last_month = CoursePayment::revenue_between(&mut conn, last_start, this_start)
        .await?
        + CourseEmi::revenue_between(&mut conn, last_start, this_start).await?;

    let summary = DashboardSummary {
        total_students: User::count(&mut conn).await?,
        total_instructors: Instructor::count(&mut conn).await?,
        total_courses: Course::count(&mut conn).await?,
        active_batches: CourseBatch::count_active(&mut conn).await?,
        revenue_this_month_paise: revenue_this_month,
        revenue_last_month_paise: revenue_last_month,
        revenue_change_percent: percent_change(revenue_this_month, revenue_last_month),
        enrollments_this_month: CourseEnrollment::count_between(&mut conn, this_start, next_start)
            .await?,
        enrollments_last_month: CourseEnrollment::count_between(&mut conn, last_start, this_start)
            .await?,
    };

    Ok(ApiResponse::ok("Dashboard summary", summary))
}

// ==== ACCOUNT LISTINGS ====

#[derive(Debug, Serialize)]
pub struct StudentPage {
    pub students: Vec<User>,
    pub settings: PageSettings,
}

pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<StudentPage>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let (students, total) = User::list_paginated(
        &mut conn,
        query.search_term(),
        ADMIN_PAGE_SIZE,
        query.offset(ADMIN_PAGE_SIZE),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Students fetched",
        StudentPage {
            students,
            settings: PageSettings::new(total, query.page(), ADMIN_PAGE_SIZE),
        },
    ))
}

#[derive(Debug, Serialize)]
pub struct InstructorPage {
    pub instructors: Vec<Instructor>,
    pub settings: PageSettings,
}

pub async fn list_instructors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<InstructorPage>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let (instructors, total) = Instructor::list_paginated(
        &mut conn,
        query.search_term(),
        ADMIN_PAGE_SIZE,
        query.offset(ADMIN_PAGE_SIZE),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Instructors fetched",
        InstructorPage {
            instructors,
            settings: PageSettings::new(total, query.page(), ADMIN_PAGE_SIZE),
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct InstructorStatusRequest {
    pub status: InstructorStatus,
}

/// Approve, deactivate or reactivate an instructor account
pub async fn set_instructor_status(
    State(state): State<AppState>,
    Path(instructor_id): Path<Uuid>,
    Json(body): Json<InstructorStatusRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    Instructor::find_by_id(&mut conn, instructor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Instructor not found".to_string()))?;

    Instructor::update_status(&mut conn, instructor_id, body.status).await?;
    tracing::info!(instructor_id = %instructor_id, status = body.status.as_str(), "instructor status updated");
    Ok(ApiResponse::message_only("Instructor status updated"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(150, 100), Some(50.0));
        assert_eq!(percent_change(75, 100), Some(-25.0));
        assert_eq!(percent_change(100, 0), None);
        // 1/3 growth rounds to one decimal
        assert_eq!(percent_change(4, 3), Some(33.3));
    }

    #[test]
    fn test_month_bounds_january_wraps() {
        let now = ist_offset().with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let (last, this, next) = month_bounds(now);
        assert!(last < this && this < next);
        assert_eq!(last.with_timezone(&ist_offset()).date_naive().month(), 12);
        assert_eq!(next.with_timezone(&ist_offset()).date_naive().month(), 2);
    }

    #[test]
    fn test_month_bounds_december_wraps() {
        let now = ist_offset().with_ymd_and_hms(2026, 12, 3, 9, 0, 0).unwrap();
        let (_, this, next) = month_bounds(now);
        assert_eq!(this.with_timezone(&ist_offset()).date_naive().month(), 12);
        assert_eq!(next.with_timezone(&ist_offset()).date_naive().year(), 2027);
        assert_eq!(next.with_timezone(&ist_offset()).date_naive().month(), 1);
    }
}
