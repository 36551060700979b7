//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Plugin lifecycle and scope batch operations, command dispatch
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing

pub mod errors;
pub mod services;
pub mod messaging;
