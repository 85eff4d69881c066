pub mod chat;
pub mod models;

pub use chat::{chat_handler, ChatOptions, ChatRequestBody, StopSequences};
pub use models::{delete_handler, health_handler, tags_handler, version_handler, GATEWAY_VERSION};
