//! HTTP surface for the chat frontend

pub mod chat_routes;

pub use chat_routes::{chat_router, ChatRequest};
