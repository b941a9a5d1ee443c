// Blog posts: public reading and comments, admin CRUD

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::blog::{Blog, BlogComment, BlogUpdate, NewBlog, NewBlogComment},
    utils::{ApiError, ApiResponse, PageQuery, PageSettings},
};

const BLOG_PAGE_SIZE: i64 = 10;
const LATEST_BLOGS_LIMIT: i64 = 3;

#[derive(Debug, Serialize)]
pub struct BlogPage {
    pub blogs: Vec<Blog>,
    pub settings: PageSettings,
}

pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<BlogPage>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let (blogs, total) =
        Blog::list_paginated(&mut conn, BLOG_PAGE_SIZE, query.offset(BLOG_PAGE_SIZE)).await?;

    Ok(ApiResponse::ok(
        "Blogs fetched",
        BlogPage {
            blogs,
            settings: PageSettings::new(total, query.page(), BLOG_PAGE_SIZE),
        },
    ))
}

pub async fn latest_blogs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Blog>>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let blogs = Blog::latest(&mut conn, LATEST_BLOGS_LIMIT).await?;
    Ok(ApiResponse::ok("Latest blogs fetched", blogs))
}

#[derive(Debug, Serialize)]
pub struct CommentEntry {
    #[serde(flatten)]
    pub comment: BlogComment,
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    pub comments: Vec<CommentEntry>,
}

pub async fn blog_detail(
    State(state): State<AppState>,
    Path(blog_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<BlogDetail>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    let blog = Blog::find_by_id(&mut conn, blog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    let comments = BlogComment::for_blog(&mut conn, blog_id)
        .await?
        .into_iter()
        .map(|(comment, user_name)| CommentEntry { comment, user_name })
        .collect();

    Ok(ApiResponse::ok("Blog fetched", BlogDetail { blog, comments }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment text is required"))]
    pub comment: String,
}

pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(blog_id): Path<uuid::Uuid>,
    Json(body): Json<AddCommentRequest>,
) -> Result<Json<ApiResponse<BlogComment>>, ApiError> {
    body.validate()?;

    let mut conn = state.db_pool.get().await?;
    Blog::find_by_id(&mut conn, blog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    let comment = BlogComment::create(
        &mut conn,
        NewBlogComment {
            blog_id,
            user_id: auth.id,
            comment: body.comment.trim().to_string(),
        },
    )
    .await?;

    Ok(ApiResponse::ok("Comment added", comment))
}

// ==== ADMIN ====

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    pub image_url: Option<String>,
    pub category: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Author name is required"))]
    pub author_name: String,

    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub key_benefits: Option<serde_json::Value>,
    pub read_time: Option<String>,
}

pub async fn create_blog(
    State(state): State<AppState>,
    Json(body): Json<CreateBlogRequest>,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    body.validate()?;

    let mut conn = state.db_pool.get().await?;
    let blog = Blog::create(
        &mut conn,
        NewBlog {
            title: body.title.trim().to_string(),
            image_url: body.image_url,
            category: body.category,
            author_name: body.author_name.trim().to_string(),
            excerpt: body.excerpt,
            content: body.content,
            key_benefits: body.key_benefits,
            read_time: body.read_time,
        },
    )
    .await?;

    tracing::info!(blog_id = %blog.id, "blog created");
    Ok(ApiResponse::ok("Blog created", blog))
}

pub async fn update_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<uuid::Uuid>,
    Json(changes): Json<BlogUpdate>,
) -> Result<Json<ApiResponse<Blog>>, ApiError> {
    let mut conn = state.db_pool.get().await?;

    Blog::find_by_id(&mut conn, blog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Blog not found".to_string()))?;

    let blog = Blog::update(&mut conn, blog_id, &changes).await?;
    Ok(ApiResponse::ok("Blog updated", blog))
}

pub async fn delete_blog(
    State(state): State<AppState>,
    Path(blog_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let deleted = Blog::delete(&mut conn, blog_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Blog not found".to_string()));
    }
    tracing::info!(blog_id = %blog_id, "blog deleted");
    Ok(ApiResponse::message_only("Blog deleted"))
}
