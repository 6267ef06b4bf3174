//! PostgreSQL persistence adapters for the domain's driven ports.

mod diesel_company_repository;
mod diesel_competitor_repository;
mod diesel_helpers;
mod diesel_profile_repository;
mod diesel_prompt_repository;
mod models;
mod pool;
mod schema;

pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_competitor_repository::DieselCompetitorRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_prompt_repository::DieselPromptRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
