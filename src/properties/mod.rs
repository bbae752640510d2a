//! Property master data: owners, buildings and rooms.

pub mod handlers;
pub mod models;
