pub mod evaluator;
pub mod llm_service;
pub mod mcq_parser;
pub mod prompts;
pub mod question_generator;

pub use evaluator::Evaluator;
pub use llm_service::LlmService;
pub use prompts::PromptTemplate;
pub use question_generator::QuestionGenerator;
