pub mod types;
pub mod chat;

pub use types::{Message, Role, ProviderKind, UnknownProvider};

pub use chat::{
    ChatRequest,
    ChatResponse,
    StreamChunk,
    Usage,
    RequestError,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
