use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload asserting an authenticated identity. Carries no authorization
/// scope beyond "this identity is authenticated".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub name: String,  // display name
    pub email: String, // unique email
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
}
