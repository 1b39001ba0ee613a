//! HTTP surface for the docsift text extraction service.
//!
//! Routes, handlers, and response shapes live here; everything that
//! actually decodes documents is behind [`docsift_core::ExtractionPipeline`].
//! The binary in `main.rs` only wires configuration into [`router::create_router`].

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod upload;
