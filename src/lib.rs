//! # Kindred Library
//!
//! Semantic related-content ranking for Markdown corpora. Cleans post
//! bodies to plain text, embeds them with an ONNX sentence encoder,
//! and ranks every document's nearest neighbors by cosine similarity.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod models;
pub mod runtime;
pub mod storage;
pub mod ui;
