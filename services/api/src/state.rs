//! Application state shared across handlers

use std::sync::Arc;
use std::time::Duration;

use crate::{
    jwt::JwtService, llm::TextGenerator, password::Passwords, repositories::UserStore,
    templates::TemplateLibrary,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore>,
    pub jwt_service: JwtService,
    pub passwords: Passwords,
    pub text_generator: Arc<dyn TextGenerator>,
    pub templates: TemplateLibrary,
    /// Pause between streamed chat chunks
    pub chat_chunk_delay: Duration,
}
