//! Webud API service
//!
//! HTTP backend for account management, a streamed LLM chat endpoint and
//! framework template selection. The binary in `main.rs` wires these modules
//! to PostgreSQL and the Gemini API; tests drive [`routes::create_router`]
//! with in-memory collaborators.

pub mod config;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod streaming;
pub mod templates;
pub mod validation;
