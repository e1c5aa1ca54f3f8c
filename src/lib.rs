//! LegisDiff — AI-assisted comparison of two versions of a legislative
//! document.
//!
//! The service accepts two bills (PDF or plain text) over HTTP and runs a
//! fixed chain of prompt-templated calls against an OpenAI-compatible
//! chat-completions API: outline extraction, section alignment, change
//! synthesis, stakeholder analysis, bias detection, impact forecasting, and
//! a final self-critique. The assembled report is returned as a single JSON
//! document.

pub mod api;
pub mod config;
pub mod demo;
pub mod pipeline;
