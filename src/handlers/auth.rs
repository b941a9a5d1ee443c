// Registration, login, password recovery and profiles for the three
// principal roles. Each role has its own table and its own JWT secret;
// the shared pieces live in RecoveryService and JwtService.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::{
    app::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        Admin, Instructor, InstructorStatus, NewAdmin, NewInstructor, NewUser, User,
    },
    services::jwt::Role,
    utils::{
        password::{hash_password, verify_password},
        validation::{non_empty, normalize_email},
        ApiError, ApiResponse,
    },
};

// ==== REQUEST/RESPONSE TYPES ====

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub phone: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InstructorRegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub phone: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub specialties: Option<serde_json::Value>,
    pub company: Option<String>,
    pub experience_years: Option<i32>,
    pub institute_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Reset token is required"))]
    pub reset_token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

fn login_response(token: String, id: uuid::Uuid, name: String, email: String, role: Role) -> LoginResponse {
    LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: crate::app_config::config().jwt.expiry_seconds,
        id,
        name,
        email,
        role,
    }
}

// ==== STUDENT ====

pub async fn register_student(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    body.validate()?;
    let email = normalize_email(&body.email);

    let mut conn = state.db_pool.get().await?;
    if User::email_exists(&mut conn, &email).await? {
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let user = User::create(
        &mut conn,
        NewUser {
            name: body.name.trim().to_string(),
            email,
            phone: non_empty(body.phone.as_deref()),
            password_hash: hash_password(&body.password)?,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "student registered");
    Ok(ApiResponse::ok("Registration successful", user))
}

pub async fn login_student(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let email = normalize_email(&body.email);

    let mut conn = state.db_pool.get().await?;
    let user = User::find_by_email(&mut conn, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt.generate_token(Role::Student, user.id, &user.email)?;
    Ok(ApiResponse::ok(
        "Login successful",
        login_response(token, user.id, user.name, user.email, Role::Student),
    ))
}

pub async fn student_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let user = User::find_by_id(&mut conn, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;
    Ok(ApiResponse::ok("Profile fetched", user))
}

pub async fn update_student_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(changes): Json<crate::models::user::UserProfileUpdate>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let user = User::update_profile(&mut conn, auth.id, &changes).await?;
    Ok(ApiResponse::ok("Profile updated", user))
}

// ==== INSTRUCTOR ====

pub async fn register_instructor(
    State(state): State<AppState>,
    Json(body): Json<InstructorRegisterRequest>,
) -> Result<Json<ApiResponse<Instructor>>, ApiError> {
    body.validate()?;
    let email = normalize_email(&body.email);

    let mut conn = state.db_pool.get().await?;
    if Instructor::email_exists(&mut conn, &email).await? {
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let instructor = Instructor::create(
        &mut conn,
        NewInstructor {
            name: body.name.trim().to_string(),
            email,
            phone: non_empty(body.phone.as_deref()),
            password_hash: hash_password(&body.password)?,
            // New instructors wait for admin approval before they can log in
            status: InstructorStatus::Pending,
            specialties: body.specialties,
            company: non_empty(body.company.as_deref()),
            experience_years: body.experience_years,
            institute_name: non_empty(body.institute_name.as_deref()),
            bio: non_empty(body.bio.as_deref()),
        },
    )
    .await?;

    tracing::info!(instructor_id = %instructor.id, "instructor registered, pending approval");
    Ok(ApiResponse::ok(
        "Registration successful, your account is pending approval",
        instructor,
    ))
}

pub async fn login_instructor(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let email = normalize_email(&body.email);

    let mut conn = state.db_pool.get().await?;
    let instructor = Instructor::find_by_email(&mut conn, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&body.password, &instructor.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    match instructor.status {
        InstructorStatus::Active => {},
        InstructorStatus::Pending => {
            return Err(ApiError::Forbidden(
                "Your account is pending approval".to_string(),
            ))
        },
        InstructorStatus::Inactive => {
            return Err(ApiError::Forbidden(
                "Your account has been deactivated".to_string(),
            ))
        },
    }

    let token = state
        .jwt
        .generate_token(Role::Instructor, instructor.id, &instructor.email)?;
    Ok(ApiResponse::ok(
        "Login successful",
        login_response(
            token,
            instructor.id,
            instructor.name,
            instructor.email,
            Role::Instructor,
        ),
    ))
}

pub async fn instructor_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<Instructor>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let instructor = Instructor::find_by_id(&mut conn, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;
    Ok(ApiResponse::ok("Profile fetched", instructor))
}

pub async fn update_instructor_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(changes): Json<crate::models::instructor::InstructorProfileUpdate>,
) -> Result<Json<ApiResponse<Instructor>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let instructor = Instructor::update_profile(&mut conn, auth.id, &changes).await?;
    Ok(ApiResponse::ok("Profile updated", instructor))
}

// ==== ADMIN ====

pub async fn register_admin(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<Admin>>, ApiError> {
    body.validate()?;
    let email = normalize_email(&body.email);

    let mut conn = state.db_pool.get().await?;
    if Admin::email_exists(&mut conn, &email).await? {
        return Err(ApiError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let admin = Admin::create(
        &mut conn,
        NewAdmin {
            name: body.name.trim().to_string(),
            email,
            phone: non_empty(body.phone.as_deref()),
            password_hash: hash_password(&body.password)?,
        },
    )
    .await?;

    tracing::info!(admin_id = %admin.id, "admin account created");
    Ok(ApiResponse::ok("Admin account created", admin))
}

pub async fn login_admin(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let email = normalize_email(&body.email);

    let mut conn = state.db_pool.get().await?;
    let admin = Admin::find_by_email(&mut conn, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&body.password, &admin.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt.generate_token(Role::Admin, admin.id, &admin.email)?;
    Ok(ApiResponse::ok(
        "Login successful",
        login_response(token, admin.id, admin.name, admin.email, Role::Admin),
    ))
}

pub async fn admin_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<ApiResponse<Admin>>, ApiError> {
    let mut conn = state.db_pool.get().await?;
    let admin = Admin::find_by_id(&mut conn, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;
    Ok(ApiResponse::ok("Profile fetched", admin))
}

// ==== PASSWORD RECOVERY ====
// One set of handlers per role; the heavy lifting is in RecoveryService.

async fn forgot_password(
    state: AppState,
    role: Role,
    body: ForgotPasswordRequest,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    body.validate()?;
    state
        .recovery
        .forgot_password(role, &normalize_email(&body.email))
        .await?;
    Ok(ApiResponse::message_only("OTP sent to your email"))
}

async fn verify_otp(
    state: AppState,
    role: Role,
    body: VerifyOtpRequest,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    body.validate()?;
    let token = state
        .recovery
        .verify_otp(role, &normalize_email(&body.email), &body.otp)
        .await?;
    Ok(ApiResponse::ok(
        "OTP verified",
        json!({ "reset_token": token }),
    ))
}

async fn reset_password(
    state: AppState,
    role: Role,
    body: ResetPasswordRequest,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    body.validate()?;
    state
        .recovery
        .reset_password(
            role,
            &normalize_email(&body.email),
            &body.reset_token,
            &body.new_password,
        )
        .await?;
    Ok(ApiResponse::message_only("Password has been reset"))
}

macro_rules! recovery_handlers {
    ($role:expr, $forgot:ident, $verify:ident, $reset:ident) => {
        pub async fn $forgot(
            State(state): State<AppState>,
            Json(body): Json<ForgotPasswordRequest>,
        ) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
            forgot_password(state, $role, body).await
        }

        pub async fn $verify(
            State(state): State<AppState>,
            Json(body): Json<VerifyOtpRequest>,
        ) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
            verify_otp(state, $role, body).await
        }

        pub async fn $reset(
            State(state): State<AppState>,
            Json(body): Json<ResetPasswordRequest>,
        ) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
            reset_password(state, $role, body).await
        }
    };
}

recovery_handlers!(
    Role::Student,
    forgot_password_student,
    verify_otp_student,
    reset_password_student
);
recovery_handlers!(
    Role::Instructor,
    forgot_password_instructor,
    verify_otp_instructor,
    reset_password_instructor
);
recovery_handlers!(
    Role::Admin,
    forgot_password_admin,
    verify_otp_admin,
    reset_password_admin
);
