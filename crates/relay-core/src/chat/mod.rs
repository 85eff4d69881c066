pub mod request;
pub mod response;
pub mod chunk;

pub use request::{ChatRequest, RequestError};
pub use response::{ChatResponse, Usage};
pub use chunk::StreamChunk;
