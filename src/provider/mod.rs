pub mod adapter;
pub mod anthropic;
pub mod gemini;
pub mod mistral;
pub mod openai;

pub use adapter::{AdapterError, ProviderAdapter, ProviderReply, ProviderSettings};
pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use mistral::MistralAdapter;
pub use openai::OpenAiAdapter;
