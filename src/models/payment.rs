// Payments, EMI installments and enrollments

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{course_emis, course_enrollments, course_payments, courses, users};

/// How a student pays for a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Full,
    TwoEmis,
    ThreeEmis,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Full => "full",
            PaymentMethod::TwoEmis => "2emis",
            PaymentMethod::ThreeEmis => "3emis",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "full" => Some(PaymentMethod::Full),
            "2emis" => Some(PaymentMethod::TwoEmis),
            "3emis" => Some(PaymentMethod::ThreeEmis),
            _ => None,
        }
    }

    /// Number of installments; 1 for a full payment
    pub fn installments(&self) -> u32 {
        match self {
            PaymentMethod::Full => 1,
            PaymentMethod::TwoEmis => 2,
            PaymentMethod::ThreeEmis => 3,
        }
    }

    pub fn is_emi(&self) -> bool {
        !matches!(self, PaymentMethod::Full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Created,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(PaymentStatus::Created),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CoursePayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub batch_id: Uuid,
    pub payment_method: String,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub amount_paise: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = course_payments)]
pub struct NewCoursePayment {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub batch_id: Uuid,
    pub payment_method: String,
    pub gateway_order_id: String,
    pub amount_paise: i64,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_emis)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseEmi {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub batch_id: Uuid,
    pub payment_id: Uuid,
    pub installment_number: i32,
    pub amount_paise: i64,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = course_emis)]
pub struct NewCourseEmi {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub batch_id: Uuid,
    pub payment_id: Uuid,
    pub installment_number: i32,
    pub amount_paise: i64,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = course_enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseEnrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub batch_id: Uuid,
    pub payment_method: String,
    pub is_paid: bool,
    pub enrollment_date: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = course_enrollments)]
pub struct NewCourseEnrollment {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub batch_id: Uuid,
    pub payment_method: String,
    pub is_paid: bool,
}

/// Row used by the EMI reminder task
#[derive(Debug, Clone, Queryable)]
pub struct EmiReminderRow {
    pub emi_id: Uuid,
    pub installment_number: i32,
    pub amount_paise: i64,
    pub due_date: NaiveDate,
    pub user_name: String,
    pub user_email: String,
    pub course_name: String,
}

impl CoursePayment {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_payment: NewCoursePayment,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(course_payments::table)
            .values(&new_payment)
            .returning(CoursePayment::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn find_by_order_id(
        conn: &mut AsyncPgConnection,
        order_id: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        course_payments::table
            .filter(course_payments::gateway_order_id.eq(order_id))
            .select(CoursePayment::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn mark_paid(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        gateway_payment_id: &str,
        gateway_signature: &str,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(course_payments::table.find(id))
            .set((
                course_payments::status.eq(PaymentStatus::Paid.as_str()),
                course_payments::gateway_payment_id.eq(gateway_payment_id),
                course_payments::gateway_signature.eq(gateway_signature),
                course_payments::updated_at.eq(Utc::now()),
            ))
            .returning(CoursePayment::as_returning())
            .get_result(conn)
            .await
    }

    /// Paid payments for a user with the course name, for billing history
    pub async fn paid_for_user(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Vec<(Self, String)>, diesel::result::Error> {
        course_payments::table
            .inner_join(courses::table)
            .filter(course_payments::user_id.eq(user_id))
            .filter(course_payments::status.eq(PaymentStatus::Paid.as_str()))
            .order(course_payments::updated_at.desc())
            .select((CoursePayment::as_select(), courses::name))
            .load(conn)
            .await
    }

    /// Revenue from full payments completed inside [start, end).
    /// SUM(bigint) widens to numeric in Postgres, so the amounts are
    /// summed client-side to stay on integer paise.
    pub async fn revenue_between(
        conn: &mut AsyncPgConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, diesel::result::Error> {
        let amounts: Vec<i64> = course_payments::table
            .filter(course_payments::status.eq(PaymentStatus::Paid.as_str()))
            .filter(course_payments::updated_at.ge(start))
            .filter(course_payments::updated_at.lt(end))
            .select(course_payments::amount_paise)
            .load(conn)
            .await?;
        Ok(amounts.iter().sum())
    }
}

impl CourseEmi {
    pub async fn insert_schedule(
        conn: &mut AsyncPgConnection,
        emis: &[NewCourseEmi],
    ) -> Result<usize, diesel::result::Error> {
        diesel::insert_into(course_emis::table)
            .values(emis)
            .execute(conn)
            .await
    }

    pub async fn for_user_course(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        course_emis::table
            .filter(course_emis::user_id.eq(user_id))
            .filter(course_emis::course_id.eq(course_id))
            .order(course_emis::installment_number.asc())
            .select(CourseEmi::as_select())
            .load(conn)
            .await
    }

    /// Earliest unpaid installment for the plan
    pub async fn next_unpaid(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        course_emis::table
            .filter(course_emis::user_id.eq(user_id))
            .filter(course_emis::course_id.eq(course_id))
            .filter(course_emis::paid.eq(false))
            .order(course_emis::installment_number.asc())
            .select(CourseEmi::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        course_emis::table
            .find(id)
            .select(CourseEmi::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn find_by_order_id(
        conn: &mut AsyncPgConnection,
        order_id: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        course_emis::table
            .filter(course_emis::gateway_order_id.eq(order_id))
            .select(CourseEmi::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn set_gateway_order(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        order_id: &str,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(course_emis::table.find(id))
            .set((
                course_emis::gateway_order_id.eq(order_id),
                course_emis::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .await
    }

    pub async fn mark_paid(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        gateway_payment_id: &str,
        gateway_signature: &str,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(course_emis::table.find(id))
            .set((
                course_emis::paid.eq(true),
                course_emis::paid_at.eq(Utc::now()),
                course_emis::gateway_payment_id.eq(gateway_payment_id),
                course_emis::gateway_signature.eq(gateway_signature),
                course_emis::updated_at.eq(Utc::now()),
            ))
            .returning(CourseEmi::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn count_paid_for_plan(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<(i64, i64), diesel::result::Error> {
        let total: i64 = course_emis::table
            .filter(course_emis::user_id.eq(user_id))
            .filter(course_emis::course_id.eq(course_id))
            .count()
            .get_result(conn)
            .await?;
        let paid: i64 = course_emis::table
            .filter(course_emis::user_id.eq(user_id))
            .filter(course_emis::course_id.eq(course_id))
            .filter(course_emis::paid.eq(true))
            .count()
            .get_result(conn)
            .await?;
        Ok((paid, total))
    }

    /// Paid installments for a user with the course name, for billing history
    pub async fn paid_for_user(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Vec<(Self, String)>, diesel::result::Error> {
        course_emis::table
            .inner_join(courses::table)
            .filter(course_emis::user_id.eq(user_id))
            .filter(course_emis::paid.eq(true))
            .order(course_emis::paid_at.desc())
            .select((CourseEmi::as_select(), courses::name))
            .load(conn)
            .await
    }

    /// Unpaid installments due inside the window, joined with user and
    /// course details for reminder emails
    pub async fn due_between(
        conn: &mut AsyncPgConnection,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<EmiReminderRow>, diesel::result::Error> {
        course_emis::table
            .inner_join(users::table)
            .inner_join(courses::table)
            .filter(course_emis::paid.eq(false))
            .filter(course_emis::due_date.ge(from))
            .filter(course_emis::due_date.le(to))
            .order(course_emis::due_date.asc())
            .select((
                course_emis::id,
                course_emis::installment_number,
                course_emis::amount_paise,
                course_emis::due_date,
                users::name,
                users::email,
                courses::name,
            ))
            .load(conn)
            .await
    }

    /// Revenue from EMI installments paid inside [start, end)
    pub async fn revenue_between(
        conn: &mut AsyncPgConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, diesel::result::Error> {
        let amounts: Vec<i64> = course_emis::table
            .filter(course_emis::paid.eq(true))
            .filter(course_emis::paid_at.ge(start))
            .filter(course_emis::paid_at.lt(end))
            .select(course_emis::amount_paise)
            .load(conn)
            .await?;
        Ok(amounts.iter().sum())
    }
}

impl CourseEnrollment {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_enrollment: NewCourseEnrollment,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(course_enrollments::table)
            .values(&new_enrollment)
            .returning(CourseEnrollment::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn exists_paid(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::{exists, select};
        select(exists(
            course_enrollments::table
                .filter(course_enrollments::user_id.eq(user_id))
                .filter(course_enrollments::course_id.eq(course_id))
                .filter(course_enrollments::is_paid.eq(true)),
        ))
        .get_result(conn)
        .await
    }

    /// Paid enrollments for a user, newest first, with course rows
    pub async fn paid_for_user(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> Result<Vec<(Self, crate::models::Course)>, diesel::result::Error> {
        course_enrollments::table
            .inner_join(courses::table)
            .filter(course_enrollments::user_id.eq(user_id))
            .filter(course_enrollments::is_paid.eq(true))
            .order(course_enrollments::enrollment_date.desc())
            .select((
                CourseEnrollment::as_select(),
                crate::models::Course::as_select(),
            ))
            .load(conn)
            .await
    }

    /// Latest paid enrollment a user holds for a course
    pub async fn latest_for_user_course(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        course_enrollments::table
            .filter(course_enrollments::user_id.eq(user_id))
            .filter(course_enrollments::course_id.eq(course_id))
            .filter(course_enrollments::is_paid.eq(true))
            .order(course_enrollments::enrollment_date.desc())
            .select(CourseEnrollment::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn count_between(
        conn: &mut AsyncPgConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, diesel::result::Error> {
        course_enrollments::table
            .filter(course_enrollments::enrollment_date.ge(start))
            .filter(course_enrollments::enrollment_date.lt(end))
            .count()
            .get_result(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_wire_format() {
        assert_eq!(PaymentMethod::from_str("2emis"), Some(PaymentMethod::TwoEmis));
        assert_eq!(PaymentMethod::from_str("emi"), None);
        assert_eq!(PaymentMethod::ThreeEmis.as_str(), "3emis");
    }

    #[test]
    fn test_installment_counts() {
        assert_eq!(PaymentMethod::Full.installments(), 1);
        assert_eq!(PaymentMethod::TwoEmis.installments(), 2);
        assert_eq!(PaymentMethod::ThreeEmis.installments(), 3);
        assert!(!PaymentMethod::Full.is_emi());
        assert!(PaymentMethod::TwoEmis.is_emi());
    }

    #[test]
    fn test_payment_status_round_trip() {
        assert_eq!(PaymentStatus::from_str("paid"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::from_str("refunded"), None);
    }
}
