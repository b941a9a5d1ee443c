// Marketing surfaces: homepage carousels, contact messages, site services

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{contact_messages, homepage_carousels, services};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = homepage_carousels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HomepageCarousel {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = homepage_carousels)]
pub struct NewHomepageCarousel {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = homepage_carousels)]
pub struct HomepageCarouselUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
}

impl HomepageCarousel {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_carousel: NewHomepageCarousel,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(homepage_carousels::table)
            .values(&new_carousel)
            .returning(HomepageCarousel::as_returning())
            .get_result(conn)
            .await
    }

    /// Active slides in insertion order
    pub async fn active(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        homepage_carousels::table
            .filter(homepage_carousels::is_active.eq(true))
            .order(homepage_carousels::created_at.asc())
            .select(HomepageCarousel::as_select())
            .load(conn)
            .await
    }

    pub async fn list_paginated(
        conn: &mut AsyncPgConnection,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), diesel::result::Error> {
        let total = homepage_carousels::table.count().get_result(conn).await?;
        let rows = homepage_carousels::table
            .order(homepage_carousels::created_at.asc())
            .limit(limit)
            .offset(offset)
            .select(HomepageCarousel::as_select())
            .load(conn)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &HomepageCarouselUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(homepage_carousels::table.find(id))
            .set((changes, homepage_carousels::updated_at.eq(Utc::now())))
            .returning(HomepageCarousel::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn delete(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(homepage_carousels::table.find(id))
            .execute(conn)
            .await
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = contact_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ContactMessage {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = contact_messages)]
pub struct NewContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_message: NewContactMessage,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(contact_messages::table)
            .values(&new_message)
            .returning(ContactMessage::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn list_paginated(
        conn: &mut AsyncPgConnection,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), diesel::result::Error> {
        let total = contact_messages::table.count().get_result(conn).await?;
        let rows = contact_messages::table
            .order(contact_messages::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(ContactMessage::as_select())
            .load(conn)
            .await?;
        Ok((rows, total))
    }
}

// "Service" collides with tower's trait all over an axum codebase, so the
// model is named SiteService while the table stays `services`.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SiteService {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, Deserialize)]
#[diesel(table_name = services)]
pub struct NewSiteService {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = services)]
pub struct SiteServiceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl SiteService {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_service: NewSiteService,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(services::table)
            .values(&new_service)
            .returning(SiteService::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn list_all(
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        services::table
            .order(services::created_at.asc())
            .select(SiteService::as_select())
            .load(conn)
            .await
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &SiteServiceUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(services::table.find(id))
            .set((changes, services::updated_at.eq(Utc::now())))
            .returning(SiteService::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn delete(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(services::table.find(id)).execute(conn).await
    }
}
