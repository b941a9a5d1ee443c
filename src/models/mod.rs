pub mod admin;
pub mod batch;
pub mod blog;
pub mod content;
pub mod course;
pub mod instructor;
pub mod payment;
pub mod review;
pub mod user;

pub use admin::{Admin, NewAdmin};
pub use batch::{BatchSession, CourseBatch, NewCourseBatch};
pub use blog::{Blog, BlogComment};
pub use content::{ContactMessage, HomepageCarousel, SiteService};
pub use course::{Course, CourseCategory, CourseCurriculum, CourseOverviewDetail};
pub use instructor::{Instructor, InstructorStatus, NewInstructor};
pub use payment::{
    CourseEmi, CourseEnrollment, CoursePayment, PaymentMethod, PaymentStatus,
};
pub use review::{CourseReview, NewCourseReview, StudentFeedback};
pub use user::{NewUser, User};

/// Shared shape for the OTP / reset-token columns that all three
/// principal tables carry
#[derive(Debug, Clone)]
pub struct RecoveryRecord {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub otp: Option<String>,
    pub otp_created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub reset_token_hash: Option<String>,
    pub reset_token_created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The users, instructors and admins tables carry identical OTP and
/// reset-token columns; this expands the recovery queries against each.
macro_rules! impl_account_recovery {
    ($model:ident, $table:ident) => {
        impl $model {
            pub async fn set_otp(
                conn: &mut diesel_async::AsyncPgConnection,
                email: &str,
                otp: &str,
            ) -> Result<usize, diesel::result::Error> {
                use diesel_async::RunQueryDsl;
                diesel::update(
                    crate::schema::$table::table
                        .filter(crate::schema::$table::email.eq(email)),
                )
                .set((
                    crate::schema::$table::otp.eq(otp),
                    crate::schema::$table::otp_created_at.eq(chrono::Utc::now()),
                    crate::schema::$table::updated_at.eq(chrono::Utc::now()),
                ))
                .execute(conn)
                .await
            }

            pub async fn fetch_recovery(
                conn: &mut diesel_async::AsyncPgConnection,
                email: &str,
            ) -> Result<Option<crate::models::RecoveryRecord>, diesel::result::Error> {
                use diesel_async::RunQueryDsl;
                crate::schema::$table::table
                    .filter(crate::schema::$table::email.eq(email))
                    .select((
                        crate::schema::$table::id,
                        crate::schema::$table::name,
                        crate::schema::$table::email,
                        crate::schema::$table::otp,
                        crate::schema::$table::otp_created_at,
                        crate::schema::$table::reset_token_hash,
                        crate::schema::$table::reset_token_created_at,
                    ))
                    .first::<(
                        uuid::Uuid,
                        String,
                        String,
                        Option<String>,
                        Option<chrono::DateTime<chrono::Utc>>,
                        Option<String>,
                        Option<chrono::DateTime<chrono::Utc>>,
                    )>(conn)
                    .await
                    .optional()
                    .map(|row| {
                        row.map(
                            |(
                                id,
                                name,
                                email,
                                otp,
                                otp_created_at,
                                reset_token_hash,
                                reset_token_created_at,
                            )| {
                                crate::models::RecoveryRecord {
                                    id,
                                    name,
                                    email,
                                    otp,
                                    otp_created_at,
                                    reset_token_hash,
                                    reset_token_created_at,
                                }
                            },
                        )
                    })
            }

            /// Consume the OTP and arm the reset token in one statement
            pub async fn swap_otp_for_reset_token(
                conn: &mut diesel_async::AsyncPgConnection,
                email: &str,
                token_hash: &str,
            ) -> Result<usize, diesel::result::Error> {
                use diesel_async::RunQueryDsl;
                diesel::update(
                    crate::schema::$table::table
                        .filter(crate::schema::$table::email.eq(email)),
                )
                .set((
                    crate::schema::$table::otp.eq(None::<String>),
                    crate::schema::$table::otp_created_at
                        .eq(None::<chrono::DateTime<chrono::Utc>>),
                    crate::schema::$table::reset_token_hash.eq(token_hash),
                    crate::schema::$table::reset_token_created_at.eq(chrono::Utc::now()),
                    crate::schema::$table::updated_at.eq(chrono::Utc::now()),
                ))
                .execute(conn)
                .await
            }

            /// Set the new password hash and clear the reset token
            pub async fn complete_password_reset(
                conn: &mut diesel_async::AsyncPgConnection,
                email: &str,
                password_hash: &str,
            ) -> Result<usize, diesel::result::Error> {
                use diesel_async::RunQueryDsl;
                diesel::update(
                    crate::schema::$table::table
                        .filter(crate::schema::$table::email.eq(email)),
                )
                .set((
                    crate::schema::$table::password_hash.eq(password_hash),
                    crate::schema::$table::reset_token_hash.eq(None::<String>),
                    crate::schema::$table::reset_token_created_at
                        .eq(None::<chrono::DateTime<chrono::Utc>>),
                    crate::schema::$table::updated_at.eq(chrono::Utc::now()),
                ))
                .execute(conn)
                .await
            }
        }
    };
}

pub(crate) use impl_account_recovery;
