//! LLM Analysis Scenarios
//!
//! Each scenario implements LLMAnalysisRequestTrait and LLMAnalysisResponseTrait.

pub mod language_detection;
