pub mod extractor;
pub mod summarizer;
