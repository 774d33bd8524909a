pub mod llm;

pub use llm::LLMServiceImpl;
