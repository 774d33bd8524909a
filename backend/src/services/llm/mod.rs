//! LLM Service Module
//!
//! Provides LLM-backed language detection.
//!
//! # Architecture
//! ```text
//! ┌─────────────────┐
//! │  LLMServiceImpl │  ← runs a scenario, folds failures into fallbacks
//! └────────┬────────┘
//!          │ LLMClient (trait)
//!    ┌─────┴─────┐
//!    ▼           ▼
//! ┌──────┐  ┌──────────┐
//! │Gemini│  │ Scripted │
//! │Client│  │ (tests)  │
//! └──────┘  └──────────┘
//! ```
//!
//! # Supported Scenarios
//! - Language Detection (english / sinhala / singlish / tamil / mixed / other)

mod client;
mod models;
mod scenarios;
mod service;

// Re-exports for external use
pub use client::{GeminiClient, LLMClient};
pub use models::*;
pub use scenarios::language_detection::*;
pub use service::{LLMAnalysisRequestTrait, LLMAnalysisResponseTrait, LLMServiceImpl};
