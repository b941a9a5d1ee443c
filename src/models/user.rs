// Student accounts

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::users;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub qualification: Option<String>,
    pub affiliation: Option<String>,
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
#[diesel(table_name = users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub affiliation: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

impl User {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_user: NewUser,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn find_by_email(
        conn: &mut AsyncPgConnection,
        email: &str,
    ) -> Result<Option<Self>, diesel::result::Error> {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        users::table
            .find(id)
            .select(User::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn email_exists(
        conn: &mut AsyncPgConnection,
        email: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::{exists, select};
        select(exists(users::table.filter(users::email.eq(email))))
            .get_result(conn)
            .await
    }

    pub async fn update_profile(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &UserProfileUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(users::table.find(id))
            .set((changes, users::updated_at.eq(Utc::now())))
            .returning(User::as_returning())
            .get_result(conn)
            .await
    }

    /// Paginated admin listing with optional name/email search
    pub async fn list_paginated(
        conn: &mut AsyncPgConnection,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), diesel::result::Error> {
        let mut query = users::table.into_boxed();
        let mut count_query = users::table.into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{}%", term);
            query = query.filter(
                users::name
                    .ilike(pattern.clone())
                    .or(users::email.ilike(pattern.clone())),
            );
            count_query = count_query.filter(
                users::name
                    .ilike(pattern.clone())
                    .or(users::email.ilike(pattern)),
            );
        }

        let total = count_query.count().get_result(conn).await?;
        let rows = query
            .order(users::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(User::as_select())
            .load(conn)
            .await?;

        Ok((rows, total))
    }

    pub async fn count(conn: &mut AsyncPgConnection) -> Result<i64, diesel::result::Error> {
        users::table.count().get_result(conn).await
    }

}

crate::models::impl_account_recovery!(User, users);
