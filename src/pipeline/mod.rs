//! Document processing pipeline: text extraction and the AI analysis chain.

pub mod analysis;
pub mod extraction;
