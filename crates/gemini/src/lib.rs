//! Gemini REST client library.
//!
//! Provides typed `generateContent` request/response messages, the HTTP
//! client, the text and image service boundaries consumed by the
//! generation pipeline, and the credential gate the client resolves its
//! API key from.

pub mod api;
pub mod credentials;
pub mod messages;
pub mod service;
