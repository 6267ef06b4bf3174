//! Builders assembling HTTP handler state from configuration.
//!
//! With a database pool configured every port gets its Diesel adapter;
//! without one the fixture ports keep the server bootable for smoke tests.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use backend::domain::{
    Company, Competitor, ExclusiveFlagService, ProfileService, PromptService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DbPool, DieselCompanyRepository, DieselCompetitorRepository, DieselProfileRepository,
    DieselPromptRepository,
};

use super::config::ServerConfig;

fn build_db_state(pool: &DbPool) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let companies: Arc<ExclusiveFlagService<Company, DieselCompanyRepository>> =
        Arc::new(ExclusiveFlagService::new(
            Arc::new(DieselCompanyRepository::new(pool.clone())),
            clock.clone(),
        ));
    let competitors: Arc<ExclusiveFlagService<Competitor, DieselCompetitorRepository>> =
        Arc::new(ExclusiveFlagService::new(
            Arc::new(DieselCompetitorRepository::new(pool.clone())),
            clock.clone(),
        ));
    let prompts = Arc::new(PromptService::new(
        Arc::new(DieselPromptRepository::new(pool.clone())),
        clock.clone(),
    ));
    let profile = Arc::new(ProfileService::new(
        Arc::new(DieselProfileRepository::new(pool.clone())),
        clock,
    ));

    HttpState {
        companies: companies.clone(),
        companies_query: companies,
        competitors: competitors.clone(),
        competitors_query: competitors,
        prompts: prompts.clone(),
        prompts_query: prompts,
        profile: profile.clone(),
        profile_query: profile,
    }
}

/// Build the HTTP state from configuration.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    config
        .db_pool
        .as_ref()
        .map_or_else(HttpState::fixtures, build_db_state)
}
