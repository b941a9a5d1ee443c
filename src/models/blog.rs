// Blog posts and comments

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::schema::{blog_comments, blogs, users};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = blogs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub author_name: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub key_benefits: Option<JsonValue>,
    pub read_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = blogs)]
pub struct NewBlog {
    pub title: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub author_name: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub key_benefits: Option<JsonValue>,
    pub read_time: Option<String>,
}

/// Partial update restricted to the writable fields; anything else in
/// the request body is dropped by deserialization
#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = blogs)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub author_name: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub key_benefits: Option<JsonValue>,
    pub read_time: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = blog_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BlogComment {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = blog_comments)]
pub struct NewBlogComment {
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
}

impl Blog {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_blog: NewBlog,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(blogs::table)
            .values(&new_blog)
            .returning(Blog::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<Option<Self>, diesel::result::Error> {
        blogs::table
            .find(id)
            .select(Blog::as_select())
            .first(conn)
            .await
            .optional()
    }

    /// Latest posts for the homepage strip
    pub async fn latest(
        conn: &mut AsyncPgConnection,
        limit: i64,
    ) -> Result<Vec<Self>, diesel::result::Error> {
        blogs::table
            .order(blogs::created_at.desc())
            .limit(limit)
            .select(Blog::as_select())
            .load(conn)
            .await
    }

    pub async fn list_paginated(
        conn: &mut AsyncPgConnection,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), diesel::result::Error> {
        let total = blogs::table.count().get_result(conn).await?;
        let rows = blogs::table
            .order(blogs::created_at.desc())
            .limit(limit)
            .offset(offset)
            .select(Blog::as_select())
            .load(conn)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        id: Uuid,
        changes: &BlogUpdate,
    ) -> Result<Self, diesel::result::Error> {
        diesel::update(blogs::table.find(id))
            .set((changes, blogs::updated_at.eq(Utc::now())))
            .returning(Blog::as_returning())
            .get_result(conn)
            .await
    }

    pub async fn delete(
        conn: &mut AsyncPgConnection,
        id: Uuid,
    ) -> Result<usize, diesel::result::Error> {
        diesel::delete(blogs::table.find(id)).execute(conn).await
    }
}

impl BlogComment {
    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_comment: NewBlogComment,
    ) -> Result<Self, diesel::result::Error> {
        diesel::insert_into(blog_comments::table)
            .values(&new_comment)
            .returning(BlogComment::as_returning())
            .get_result(conn)
            .await
    }

    /// Comments for a post, newest first, with the commenter's name
    pub async fn for_blog(
        conn: &mut AsyncPgConnection,
        blog_id: Uuid,
    ) -> Result<Vec<(Self, String)>, diesel::result::Error> {
        blog_comments::table
            .inner_join(users::table)
            .filter(blog_comments::blog_id.eq(blog_id))
            .order(blog_comments::created_at.desc())
            .select((BlogComment::as_select(), users::name))
            .load(conn)
            .await
    }
}
