//! Database repositories
//!
//! Data access layer. Repositories are stateless; every method takes the
//! pool and returns plain record structs for the service layer to assemble.

pub mod post;
pub mod session;
pub mod user;

pub use post::{CommentRecord, LikeRecord, PostRecord, PostRepository};
pub use session::{SessionRepository, SessionWithUser};
pub use user::{UserRecord, UserRepository};
