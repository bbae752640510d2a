//! Contract document building blocks: stored templates and reusable special
//! terms.

pub mod handlers;
pub mod models;
