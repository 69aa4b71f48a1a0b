//! Shared error types and observability helpers for the Sift workspace.
//!
//! Every crate in the workspace reports failures through [`SiftError`] and
//! the [`Result`] alias, and binaries initialise logging through the
//! [`observability`] module. The crate is deliberately small so that all
//! members can depend on it without pulling in heavy transitive costs.

pub mod observability;

/// Error types used across the Sift system.
///
/// The variants mirror the failure boundaries of the application:
/// configuration problems are fatal at startup, provider problems are
/// wrapped at the analysis or chat boundary before they reach a user.
#[derive(thiserror::Error, Debug)]
pub enum SiftError {
    /// Configuration was incomplete or invalid. Raised before any request
    /// is issued; there is no runtime recovery.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model provider rejected or failed a request (network, auth,
    /// quota, malformed body).
    #[error("Provider error: {0}")]
    Provider(String),

    /// An analysis run could not produce a result. Carries a user-safe
    /// message; the provider cause is logged where it is wrapped.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// A chat turn could not be delivered or streamed.
    #[error("Chat turn failed: {0}")]
    Chat(String),
}

/// Convenient alias for results that use [`SiftError`].
pub type Result<T> = std::result::Result<T, SiftError>;
