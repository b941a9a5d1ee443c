// Instructor accounts. New registrations start as `pending` and cannot
// log in until an admin activates them.

use chrono::{DateTime, Utc};
use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::io::Write;
use uuid::Uuid;

use crate::schema::instructors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, diesel::AsExpression, diesel::FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum InstructorStatus {
    Pending,
    Active,
    Inactive,
}

impl InstructorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructorStatus::Pending => "pending",
            InstructorStatus::Active => "active",
            InstructorStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InstructorStatus::Pending),
            "active" => Some(InstructorStatus::Active),
            "inactive" => Some(InstructorStatus::Inactive),
            _ => None,
        }
    }
}

impl ToSql<Text, Pg> for InstructorStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for InstructorStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let s = std::str::from_utf8(bytes.as_bytes())?;
        InstructorStatus::from_str(s).ok_or_else(|| format!("Unknown instructor status: {}", s).into())
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = instructors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Instructor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: InstructorStatus,
    pub specialties: Option<JsonValue>,
    pub company: Option<String>,
    pub experience_years: Option<i32>,
    pub institute_name: Option<String>,
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
#[diesel(table_name = instructors)]
pub struct NewInstructor {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub status: InstructorStatus,
    pub specialties: Option<JsonValue>,
    pub company: Option<String>,
    pub experience_years: Option<i32>,
    pub institute_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = instructors)]
pub struct InstructorProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub specialties: Option<JsonValue>,
    pub company: Option<String>,
    pub experience_years: Option<i32>,
    pub institute_name: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

impl Instructor {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_instructor: NewInstructor,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(instructors::table)
            .values(&new_instructor)
            .returning(Instructor::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        instructors::table
            .filter(instructors::email.eq(email))
            .select(Instructor::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        instructors::table
            .find(id)
            .select(Instructor::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn email_exists(
        conn: &mut AsyncPgConnection,
        email: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::{exists, select};
        select(exists(
            instructors::table.filter(instructors::email.eq(email)),
        ))
        .get_result(conn)
        .await
    }

    pub async fn update_profile(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &InstructorProfileUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(instructors::table.find(id))
            .set((changes, instructors::updated_at.eq(Utc::now())))
            .returning(Instructor::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn update_status(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        status: InstructorStatus,
    ) -> Result<usize, diesel::result::Error> {
        diesel::update(instructors::table.find(id))
            .set((
                instructors::status.eq(status),
                instructors::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .await
    }

    pub async fn list_paginated(
        conn: &mut AsyncPgConnection,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), diesel::result::Error> {
        let mut query = instructors::table.into_boxed();
        let mut count_query = instructors::table.into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            query = query.filter(
                instructors::name
                    .ilike(pattern.clone())
                    .or(instructors::email.ilike(pattern.clone())),
            );
            count_query = count_query.filter(
                instructors::name
                    .ilike(pattern.clone())
                    .or(instructors::email.ilike(pattern)),
            );
        }

        let total = count_query.count().get_result(conn).await?;
        let rows = query
            .order(instructors::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(Instructor::as_select())
            .load(conn)
            .await?;

        Ok((rows, total))
    }

    pub async fn count(conn: &mut AsyncPgConnection) -> Result<i64, diesel::result::Error> {
        instructors::table.count().get_result(conn).await
    }
}

crate::models::impl_account_recovery!(Instructor, instructors);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InstructorStatus::Pending,
            InstructorStatus::Active,
            InstructorStatus::Inactive,
        ] {
            assert_eq!(InstructorStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(InstructorStatus::from_str("banned"), None);
    }
}
