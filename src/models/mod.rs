pub mod document;
pub mod experiment;
pub mod loaders;
pub mod mcq;

pub use document::SourceDocument;
pub use experiment::{EvaluationResult, ExperimentRecord};
pub use loaders::{load_pdf_documents, PdfCorpus};
pub use mcq::{QuestionLabel, VariantKind, VariantPayload, VariantSet};
