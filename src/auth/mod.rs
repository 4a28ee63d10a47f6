// Identity and role resolution
// Callers are authenticated by the hosted identity provider's access token
// (HS256 JWT carried in a cookie); roles live in the local user_roles table

pub mod error;
pub mod middleware;
pub mod models;
pub mod provider;
pub mod repository;
pub mod token;

pub use error::AuthError;
pub use middleware::AuthUser;
pub use models::{Role, UserView};
pub use provider::IdentityClient;
pub use repository::RolesRepository;
pub use token::{Claims, TokenService};
