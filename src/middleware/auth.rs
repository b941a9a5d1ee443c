// Identity attached to a request after JWT validation

use crate::services::jwt::Role;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}
