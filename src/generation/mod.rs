pub mod client;
pub mod error;
pub mod types;

pub use client::{AnthropicClient, MessageSender};
pub use error::GenerationError;
pub use types::MessagesRequest;
