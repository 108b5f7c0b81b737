//! Precondition guards for the application and rating workflows.
//!
//! Each guard is a pure function over already-loaded entities so the
//! business rules can be tested without a database. Handlers do the loading,
//! call the guard, then perform the write.

pub mod application;
pub mod rating;
