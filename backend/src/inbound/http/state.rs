//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureOwnedEntityCommand, FixtureOwnedEntityQuery, FixtureProfileCommand,
    FixtureProfileQuery, FixturePromptCommand, FixturePromptQuery, OwnedEntityCommand,
    OwnedEntityQuery, ProfileCommand, ProfileQuery, PromptCommand, PromptQuery,
};
use crate::domain::{Company, Competitor};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Company mutations (exclusive-flag enforcement lives behind this port).
    pub companies: Arc<dyn OwnedEntityCommand<Company>>,
    /// Company reads.
    pub companies_query: Arc<dyn OwnedEntityQuery<Company>>,
    /// Competitor mutations.
    pub competitors: Arc<dyn OwnedEntityCommand<Competitor>>,
    /// Competitor reads.
    pub competitors_query: Arc<dyn OwnedEntityQuery<Competitor>>,
    /// Prompt catalogue mutations.
    pub prompts: Arc<dyn PromptCommand>,
    /// Prompt catalogue reads.
    pub prompts_query: Arc<dyn PromptQuery>,
    /// Profile updates.
    pub profile: Arc<dyn ProfileCommand>,
    /// Profile reads.
    pub profile_query: Arc<dyn ProfileQuery>,
}

impl HttpState {
    /// State wired entirely to fixture ports.
    ///
    /// Useful for handler tests and for running the server without storage.
    ///
    /// # Examples
    /// ```
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixtures();
    /// let _prompts = state.prompts_query.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            companies: Arc::new(FixtureOwnedEntityCommand),
            companies_query: Arc::new(FixtureOwnedEntityQuery),
            competitors: Arc::new(FixtureOwnedEntityCommand),
            competitors_query: Arc::new(FixtureOwnedEntityQuery),
            prompts: Arc::new(FixturePromptCommand),
            prompts_query: Arc::new(FixturePromptQuery),
            profile: Arc::new(FixtureProfileCommand),
            profile_query: Arc::new(FixtureProfileQuery),
        }
    }
}
