pub mod quiz_llm;
pub mod slides;
pub mod store;
