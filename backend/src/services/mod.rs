//! Business logic services
//!
//! Services encapsulate business logic and coordinate between repositories,
//! the auth components and external systems.

pub mod account;
pub mod chat;
pub mod post;

pub use account::{AccountService, VerifiedAccount};
pub use chat::ChatService;
pub use post::PostService;
