//! Incident Dialog - Slot-filling dialog engine for safety incident reports
//!
//! A conversation walks a fixed sequence of questions, skipping any field
//! already known, and hands date questions to a nested dialog that keeps
//! asking until the answer is a definite calendar date. An optional
//! natural-language recognizer pre-fills fields from free text.
//!
//! - `domain` - Report, date classification, dialog steps and the runner
//! - `ports` - State storage and recognizer interfaces
//! - `adapters` - In-memory and YAML file storage, LUIS and scripted recognizers
//! - `application` - Start, turn, cancel and query handlers
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
