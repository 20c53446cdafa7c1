//! Value types for text-completion responses returned by LLM HTTP APIs.
//!
//! A [`CompletionResponse`] owns an ordered list of [`Choice`]s and an
//! optional [`Usage`]. All three are immutable once built and compare by
//! value. They are built either directly or by decoding a JSON object that
//! the HTTP client has already parsed:
//!
//! ```rust,ignore
//! use llm_completion::CompletionResponse;
//!
//! let response = CompletionResponse::from_json(body)?;
//! if let Some(text) = response.text() {
//!     println!("{text}");
//! }
//! ```
//!
//! Decoding never substitutes defaults for required fields. A missing or
//! wrongly typed field yields a [`DecodeError`] naming its path.

pub mod choice;
pub mod error;
pub mod response;
pub mod usage;

mod json_utils;

pub use choice::Choice;
pub use error::{DecodeError, Result};
pub use response::CompletionResponse;
pub use usage::Usage;
