pub mod chat;
pub mod role;

pub use chat::{ChatRequest, ChatResponse, QuestionList};
pub use role::{Audience, Role};
