// Admin accounts. Created out of band, no self-registration endpoint
// beyond the seeded bootstrap admin.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use uuid::Uuid;

use crate::schema::admins;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = admins)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

impl Admin {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_admin: NewAdmin,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(admins::table)
            .values(&new_admin)
            .returning(Admin::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        admins::table
            .filter(admins::email.eq(email))
            .select(Admin::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        admins::table
            .find(id)
            .select(Admin::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn email_exists(
        conn: &mut AsyncPgConnection,
        email: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::{exists, select};
        select(exists(admins::table.filter(admins::email.eq(email))))
            .get_result(conn)
            .await
    }
}

crate::models::impl_account_recovery!(Admin, admins);
