//! API models for persisted records and request/response payloads

pub mod auth;
pub mod chat;
pub mod user;

pub use auth::{
    ChangePasswordRequest, LoginForm, MessageResponse, PasswordResetConfirm,
    PasswordResetRequest, RegisterRequest, RegisterResponse, TokenResponse,
};
pub use chat::{ChatMessage, ChatRequest, StreamChunk, TemplatePrompt};
pub use user::{NewUser, Pagination, UpdateUser, User, UserResponse, UserUpdateRequest};
