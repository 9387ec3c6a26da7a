//! Data models for documents, extraction records and configuration.

pub mod config;
pub mod document;
pub mod record;
