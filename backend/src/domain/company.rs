//! Company records describing the owner's own business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EntityId, OwnedEntity, UserId};

/// A business owned and described by a user.
///
/// The descriptive attributes are free-form text; only the identifier,
/// ownership, and primary-flag fields carry invariants, all enforced by
/// [`crate::domain::ExclusiveFlagService`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Store-assigned identifier.
    pub id: EntityId,
    /// Owning user.
    pub owner_id: UserId,
    /// Company name.
    pub name: String,
    /// Industry or sector.
    pub industry: Option<String>,
    /// Short description of the business.
    pub description: Option<String>,
    /// Products and services offered.
    pub products_services: Option<String>,
    /// Value proposition summary.
    pub value_proposition: Option<String>,
    /// Target market description.
    pub target_market: Option<String>,
    /// Public website URL.
    pub website: Option<String>,
    /// Headcount bracket, free-form.
    pub company_size: Option<String>,
    /// Whether this is the owner's primary company.
    pub is_primary: bool,
    /// Optimistic-concurrency counter.
    pub revision: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Free-form company attributes carried by create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    /// Company name.
    pub name: String,
    /// Industry or sector.
    pub industry: Option<String>,
    /// Short description of the business.
    pub description: Option<String>,
    /// Products and services offered.
    pub products_services: Option<String>,
    /// Value proposition summary.
    pub value_proposition: Option<String>,
    /// Target market description.
    pub target_market: Option<String>,
    /// Public website URL.
    pub website: Option<String>,
    /// Headcount bracket, free-form.
    pub company_size: Option<String>,
}

impl OwnedEntity for Company {
    type Draft = CompanyDraft;

    const KIND: &'static str = "company";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn revision(&self) -> u32 {
        self.revision
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn create(
        id: EntityId,
        owner_id: UserId,
        draft: Self::Draft,
        is_primary: bool,
        at: DateTime<Utc>,
    ) -> Self {
        let CompanyDraft {
            name,
            industry,
            description,
            products_services,
            value_proposition,
            target_market,
            website,
            company_size,
        } = draft;
        Self {
            id,
            owner_id,
            name,
            industry,
            description,
            products_services,
            value_proposition,
            target_market,
            website,
            company_size,
            is_primary,
            revision: 1,
            created_at: at,
            updated_at: at,
        }
    }

    fn apply_draft(&mut self, draft: Self::Draft, is_primary: bool, at: DateTime<Utc>) {
        let CompanyDraft {
            name,
            industry,
            description,
            products_services,
            value_proposition,
            target_market,
            website,
            company_size,
        } = draft;
        self.name = name;
        self.industry = industry;
        self.description = description;
        self.products_services = products_services;
        self.value_proposition = value_proposition;
        self.target_market = target_market;
        self.website = website;
        self.company_size = company_size;
        self.is_primary = is_primary;
        self.revision += 1;
        self.updated_at = at;
    }

    fn clear_primary(&mut self, at: DateTime<Utc>) {
        self.is_primary = false;
        self.revision += 1;
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft(name: &str) -> CompanyDraft {
        CompanyDraft {
            name: name.to_owned(),
            industry: None,
            description: None,
            products_services: None,
            value_proposition: None,
            target_market: None,
            website: None,
            company_size: None,
        }
    }

    #[test]
    fn create_starts_at_revision_one() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("timestamp");
        let company = Company::create(EntityId::random(), UserId::random(), draft("Acme"), true, at);
        assert_eq!(company.revision, 1);
        assert!(company.is_primary);
        assert_eq!(company.created_at, at);
        assert_eq!(company.updated_at, at);
    }

    #[test]
    fn apply_draft_bumps_revision_and_timestamp() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("timestamp");
        let edited = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).single().expect("timestamp");
        let mut company =
            Company::create(EntityId::random(), UserId::random(), draft("Acme"), false, created);

        company.apply_draft(draft("Acme Ltd"), true, edited);

        assert_eq!(company.name, "Acme Ltd");
        assert!(company.is_primary);
        assert_eq!(company.revision, 2);
        assert_eq!(company.created_at, created);
        assert_eq!(company.updated_at, edited);
    }

    #[test]
    fn clear_primary_only_touches_the_flag_fields() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("timestamp");
        let cleared = Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).single().expect("timestamp");
        let mut company =
            Company::create(EntityId::random(), UserId::random(), draft("Acme"), true, created);

        company.clear_primary(cleared);

        assert!(!company.is_primary);
        assert_eq!(company.name, "Acme");
        assert_eq!(company.revision, 2);
        assert_eq!(company.updated_at, cleared);
    }
}
