pub mod llm_interface;
pub mod openai_llm;
pub mod ollama_llm;

pub use llm_interface::*;
pub use openai_llm::*;
pub use ollama_llm::*;
