//! Core analysis flows for Sift.
//!
//! The pieces compose in two data paths. The analyze path builds a fixed
//! prompt for the submitted content, issues one grounded generation call,
//! parses the free-text reply into a structured verdict, and dedupes the
//! web citations. The chat path seeds a session from that verdict and
//! streams follow-up replies into an append-only transcript. A single
//! [`state::Workbench`] owns both and enforces the lifecycle: phases move
//! `Idle -> Analyzing -> {Ready, Failed}`, and the session/transcript pair
//! is replaced wholesale whenever a new analysis lands.

pub mod orchestrate;
pub mod parse;
pub mod prompt;
pub mod session;
pub mod sources;
pub mod state;
pub mod transcript;
pub mod types;

pub use orchestrate::analyze;
pub use parse::{parse_analysis, ParsedAnalysis, FALLBACK_SUMMARY, UNPARSED_SUMMARY};
pub use session::ChatSession;
pub use sift_llm::traits::{ChatTurn, TurnRole};
pub use sources::{dedupe_sources, UNKNOWN_SOURCE_TITLE};
pub use state::{AnalysisPhase, TurnOutcome, Workbench};
pub use transcript::{Transcript, CHAT_APOLOGY};
pub use types::{AnalysisResult, ContentKind, GroundingSource, RiskLevel};
