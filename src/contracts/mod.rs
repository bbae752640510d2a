//! Lease contracts and the agents who broker them, plus the HTTP surface of
//! the document-generation pipeline.

pub mod handlers;
pub mod models;
