// Checkout and installment flows.
//
// An order is created server-side, the browser completes checkout, and
// the gateway callback is verified by HMAC before anything is marked
// paid. Installment plans charge the first installment at checkout and
// collect the rest through pay-next / verify cycles.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::payment::{
        CourseEmi, CourseEnrollment, CoursePayment, NewCourseEmi, NewCourseEnrollment,
        NewCoursePayment, PaymentMethod, PaymentStatus,
    },
    models::{Course, CourseBatch, CourseCurriculum},
    services::emi,
    utils::{ApiError, ApiResponse},
};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub course_id: Uuid,
    pub batch_id: Uuid,
    pub payment_method: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub amount_paise: i64,
    pub currency: String,
    pub key_id: String,
}

pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ApiError> {
    let method = PaymentMethod::from_str(&body.payment_method).ok_or_else(|| {
        ApiError::BadRequest("Payment method must be 'full', '2emis' or '3emis'".to_string())
    })?;

    let mut conn = state.db_pool.get().await?;

    let course = Course::find_by_id(&mut conn, body.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let batch = CourseBatch::find_by_id(&mut conn, body.batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;
    if batch.course_id != course.id {
        return Err(ApiError::BadRequest(
            "Batch does not belong to this course".to_string(),
        ));
    }

    if method.is_emi() && !course.is_installments {
        return Err(ApiError::BadRequest(
            "This course does not offer installment payments".to_string(),
        ));
    }

    if CourseEnrollment::exists_paid(&mut conn, auth.id, course.id).await? {
        return Err(ApiError::Conflict(
            "You are already enrolled in this course".to_string(),
        ));
    }

    // Full plans pay the whole price up front; installment plans pay the
    // first installment now
    let amount_paise = match method {
        PaymentMethod::Full => course.price_paise,
        _ => emi::installment_amount_paise(course.price_paise, method.installments()),
    };

    let receipt = Uuid::new_v4().to_string();
    let order = state.gateway.create_order(amount_paise, &receipt).await?;

    CoursePayment::create(
        &mut conn,
        NewCoursePayment {
            user_id: auth.id,
            course_id: course.id,
            batch_id: batch.id,
            payment_method: method.as_str().to_string(),
            gateway_order_id: order.id.clone(),
            amount_paise,
            status: PaymentStatus::Created.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = %auth.id, course_id = %course.id, method = method.as_str(), "order created");
    Ok(ApiResponse::ok(
        "Order created",
        OrderResponse {
            order_id: order.id,
            amount_paise,
            currency: "INR".to_string(),
            key_id: state.gateway.key_id().to_string(),
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Gateway callback for the checkout payment. Verifies the signature,
/// marks the payment paid, enrolls the student and, for installment
/// plans, writes the remaining EMI schedule.
pub async fn verify_payment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let payment = CoursePayment::find_by_order_id(&mut conn, &body.order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    if payment.user_id != auth.id {
        return Err(ApiError::Forbidden(
            "This order belongs to another account".to_string(),
        ));
    }

    // Gateway callbacks can be replayed; a second verify is a no-op conflict
    if payment.status == PaymentStatus::Paid.as_str() {
        return Err(ApiError::Conflict(
            "This payment has already been verified".to_string(),
        ));
    }

    if !state
        .gateway
        .verify_signature(&body.order_id, &body.payment_id, &body.signature)
    {
        tracing::warn!(order_id = %body.order_id, "payment signature verification failed");
        return Err(ApiError::BadRequest(
            "Invalid payment signature".to_string(),
        ));
    }

    let payment =
        CoursePayment::mark_paid(&mut conn, payment.id, &body.payment_id, &body.signature).await?;

    let method = PaymentMethod::from_str(&payment.payment_method)
        .ok_or_else(|| ApiError::Internal("unknown payment method on record".to_string()))?;

    CourseEnrollment::create(
        &mut conn,
        NewCourseEnrollment {
            user_id: payment.user_id,
            course_id: payment.course_id,
            batch_id: payment.batch_id,
            payment_method: method.as_str().to_string(),
            is_paid: true,
        },
    )
    .await?;
    Course::increment_enrolled(&mut conn, payment.course_id).await?;

    if method.is_emi() {
        let batch = CourseBatch::find_by_id(&mut conn, payment.batch_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;
        let course = Course::find_by_id(&mut conn, payment.course_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
        let session_count = CourseCurriculum::count_for_course(&mut conn, course.id).await?;

        let plan = emi::build_schedule(
            course.price_paise,
            method.installments(),
            batch.start_date,
            session_count,
        );
        let rows: Vec<NewCourseEmi> = plan
            .into_iter()
            .map(|p| NewCourseEmi {
                user_id: payment.user_id,
                course_id: payment.course_id,
                batch_id: payment.batch_id,
                payment_id: payment.id,
                installment_number: p.installment_number,
                amount_paise: p.amount_paise,
                due_date: p.due_date,
                paid: p.paid,
                paid_at: p.paid.then(Utc::now),
            })
            .collect();
        CourseEmi::insert_schedule(&mut conn, &rows).await?;
    }

    // Confirmation email failures must not fail the checkout
    if let Ok(Some(user)) = crate::models::User::find_by_id(&mut conn, payment.user_id).await {
        if let Ok(Some(course)) = Course::find_by_id(&mut conn, payment.course_id).await {
            if let Err(e) = state
                .email
                .send_payment_confirmation(
                    &user.email,
                    &user.name,
                    &course.name,
                    payment.amount_paise,
                    method.is_emi(),
                )
                .await
            {
                tracing::warn!(error = %e, "payment confirmation email failed");
            }
        }
    }

    tracing::info!(payment_id = %payment.id, method = method.as_str(), "payment verified, student enrolled");
    Ok(ApiResponse::ok(
        "Payment verified",
        json!({ "payment_id": payment.id, "enrolled": true }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct EmiPreviewQuery {
    pub batch_id: Uuid,
    pub payment_method: String,
}

/// Planned installment schedule for a course and batch, before checkout
pub async fn emi_preview(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Query(query): Query<EmiPreviewQuery>,
) -> Result<Json<ApiResponse<Vec<emi::PlannedInstallment>>>, ApiError> {
    let method = PaymentMethod::from_str(&query.payment_method)
        .filter(PaymentMethod::is_emi)
        .ok_or_else(|| {
            ApiError::BadRequest("Payment method must be '2emis' or '3emis'".to_string())
        })?;

    let mut conn = state.db_pool.get().await?;

    let course = Course::find_by_id(&mut conn, course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
    if !course.is_installments {
        return Err(ApiError::BadRequest(
            "This course does not offer installment payments".to_string(),
        ));
    }

    let batch = CourseBatch::find_by_id(&mut conn, query.batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;
    let session_count = CourseCurriculum::count_for_course(&mut conn, course.id).await?;

    let plan = emi::build_schedule(
        course.price_paise,
        method.installments(),
        batch.start_date,
        session_count,
    );
    Ok(ApiResponse::ok("Installment preview", plan))
}

#[derive(Debug, Deserialize)]
pub struct PayNextEmiRequest {
    pub course_id: Uuid,
}

pub async fn pay_next_emi(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<PayNextEmiRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let next = CourseEmi::next_unpaid(&mut conn, auth.id, body.course_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No unpaid installments for this course".to_string())
        })?;

    let receipt = Uuid::new_v4().to_string();
    let order = state.gateway.create_order(next.amount_paise, &receipt).await?;
    CourseEmi::set_gateway_order(&mut conn, next.id, &order.id).await?;

    tracing::info!(emi_id = %next.id, installment = next.installment_number, "installment order created");
    Ok(ApiResponse::ok(
        "Order created",
        json!({
            "order_id": order.id,
            "amount_paise": next.amount_paise,
            "installment_number": next.installment_number,
            "due_date": next.due_date,
            "currency": "INR",
            "key_id": state.gateway.key_id(),
        }),
    ))
}

pub async fn verify_emi(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let installment = CourseEmi::find_by_order_id(&mut conn, &body.order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    if installment.user_id != auth.id {
        return Err(ApiError::Forbidden(
            "This order belongs to another account".to_string(),
        ));
    }

    if installment.paid {
        return Err(ApiError::Conflict(
            "This installment has already been paid".to_string(),
        ));
    }

    if !state
        .gateway
        .verify_signature(&body.order_id, &body.payment_id, &body.signature)
    {
        tracing::warn!(order_id = %body.order_id, "installment signature verification failed");
        return Err(ApiError::BadRequest(
            "Invalid payment signature".to_string(),
        ));
    }

    let installment =
        CourseEmi::mark_paid(&mut conn, installment.id, &body.payment_id, &body.signature).await?;
    let (paid, total) =
        CourseEmi::count_paid_for_plan(&mut conn, auth.id, installment.course_id).await?;

    tracing::info!(emi_id = %installment.id, paid, total, "installment paid");
    Ok(ApiResponse::ok(
        "Installment paid",
        json!({
            "installment_number": installment.installment_number,
            "paid_installments": paid,
            "total_installments": total,
            "fully_paid": paid == total,
        }),
    ))
}

// ==== BILLING & ENROLLMENTS ====

#[derive(Debug, Serialize)]
pub struct BillingEntry {
    pub kind: &'static str,
    pub course_name: String,
    pub amount_paise: i64,
    pub payment_method: Option<String>,
    pub installment_number: Option<i32>,
    pub paid_at: chrono::DateTime<Utc>,
}

/// Full payments and paid installments merged into one list, newest first
pub async fn billing_history(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<BillingEntry>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let payments = CoursePayment::paid_for_user(&mut conn, auth.id).await?;
    let installments = CourseEmi::paid_for_user(&mut conn, auth.id).await?;

    let mut entries: Vec<BillingEntry> = Vec::with_capacity(payments.len() + installments.len());

    for (payment, course_name) in payments {
        // Installment checkouts surface through their EMI rows instead
        if payment.payment_method != PaymentMethod::Full.as_str() {
            continue;
        }
        entries.push(BillingEntry {
            kind: "payment",
            course_name,
            amount_paise: payment.amount_paise,
            payment_method: Some(payment.payment_method),
            installment_number: None,
            paid_at: payment.updated_at,
        });
    }

    for (emi_row, course_name) in installments {
        entries.push(BillingEntry {
            kind: "installment",
            course_name,
            amount_paise: emi_row.amount_paise,
            payment_method: None,
            installment_number: Some(emi_row.installment_number),
            paid_at: emi_row.paid_at.unwrap_or(emi_row.updated_at),
        });
    }

    entries.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
    Ok(ApiResponse::ok("Billing history fetched", entries))
}

#[derive(Debug, Serialize)]
pub struct EnrollmentEntry {
    pub enrollment: CourseEnrollment,
    pub course: Course,
}

/// Courses the student holds a paid enrollment in, one entry per course
pub async fn my_enrollments(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<EnrollmentEntry>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let rows = CourseEnrollment::paid_for_user(&mut conn, auth.id).await?;

    // Rows are newest-first, so the first enrollment seen per course wins
    let mut seen = std::collections::HashSet::new();
    let entries = rows
        .into_iter()
        .filter(|(e, _)| seen.insert(e.course_id))
        .map(|(enrollment, course)| EnrollmentEntry { enrollment, course })
        .collect();

    Ok(ApiResponse::ok("Enrollments fetched", entries))
}

/// Installment plan state for one of the student's courses
pub async fn my_emis(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let plan = CourseEmi::for_user_course(&mut conn, auth.id, course_id).await?;
    if plan.is_empty() {
        return Err(ApiError::NotFound(
            "No installment plan for this course".to_string(),
        ));
    }

    let paid = plan.iter().filter(|e| e.paid).count();
    let total = plan.len();
    Ok(ApiResponse::ok(
        "Installments fetched",
        json!({
            "installments": plan,
            "paid_installments": paid,
            "total_installments": total,
            "fully_paid": paid == total,
        }),
    ))
}
