pub mod logging;
pub mod text_cleaner;

pub use text_cleaner::{clean_text, preprocess_documents};
