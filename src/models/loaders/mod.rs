pub mod pdf_loader;

pub use pdf_loader::{load_pdf_documents, PageTextExtractor, PdfCorpus, PdfExtractor};
