// Authentication module
// Stateless session tokens carried in an httpOnly cookie

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{issue_token_handler, logout_handler};
pub use middleware::{require_auth, AuthenticatedUser, TOKEN_COOKIE};
pub use models::{Identity, IdentityPayload, SessionResponse};
pub use token::TokenService;
