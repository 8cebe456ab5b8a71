//! Postline Shared Types
//!
//! Wire-level types shared between the backend and API clients:
//! the response envelope, request/response DTOs, and field validation rules.

pub mod types;
pub mod validation;
