//! Competitor records tracked against the owner's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EntityId, OwnedEntity, UserId};

/// A competitor profiled by a user.
///
/// Shares the owner-partitioned, primary-flagged shape with
/// [`crate::domain::Company`]; the attribute set differs but carries no
/// invariants of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    /// Store-assigned identifier.
    pub id: EntityId,
    /// Owning user.
    pub owner_id: UserId,
    /// Competitor name.
    pub name: String,
    /// Public website URL.
    pub website: Option<String>,
    /// Observed strengths.
    pub strengths: Option<String>,
    /// Observed weaknesses.
    pub weaknesses: Option<String>,
    /// Pricing strategy notes.
    pub pricing_strategy: Option<String>,
    /// Market position summary.
    pub market_position: Option<String>,
    /// Whether this is the owner's primary competitor.
    pub is_primary: bool,
    /// Optimistic-concurrency counter.
    pub revision: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Free-form competitor attributes carried by create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorDraft {
    /// Competitor name.
    pub name: String,
    /// Public website URL.
    pub website: Option<String>,
    /// Observed strengths.
    pub strengths: Option<String>,
    /// Observed weaknesses.
    pub weaknesses: Option<String>,
    /// Pricing strategy notes.
    pub pricing_strategy: Option<String>,
    /// Market position summary.
    pub market_position: Option<String>,
}

impl OwnedEntity for Competitor {
    type Draft = CompetitorDraft;

    const KIND: &'static str = "competitor";

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
        let CompetitorDraft {
            name,
            website,
            strengths,
            weaknesses,
            pricing_strategy,
            market_position,
        } = draft;
        Self {
            id,
            owner_id,
            name,
            website,
            strengths,
            weaknesses,
            pricing_strategy,
            market_position,
            is_primary,
            revision: 1,
            created_at: at,
            updated_at: at,
        }
    }

    fn apply_draft(&mut self, draft: Self::Draft, is_primary: bool, at: DateTime<Utc>) {
        let CompetitorDraft {
            name,
            website,
            strengths,
            weaknesses,
            pricing_strategy,
            market_position,
        } = draft;
        self.name = name;
        self.website = website;
        self.strengths = strengths;
        self.weaknesses = weaknesses;
        self.pricing_strategy = pricing_strategy;
        self.market_position = market_position;
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

    #[test]
    fn create_and_demote_follow_the_entity_contract() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("timestamp");
        let demoted = Utc.with_ymd_and_hms(2025, 6, 4, 9, 0, 0).single().expect("timestamp");
        let draft = CompetitorDraft {
            name: "Rival Co".to_owned(),
            website: Some("https://rival.example".to_owned()),
            strengths: None,
            weaknesses: None,
            pricing_strategy: None,
            market_position: None,
        };

        let mut competitor =
            Competitor::create(EntityId::random(), UserId::random(), draft, true, created);
        assert_eq!(competitor.revision, 1);
        assert!(competitor.is_primary);

        competitor.clear_primary(demoted);
        assert!(!competitor.is_primary);
        assert_eq!(competitor.revision, 2);
        assert_eq!(competitor.updated_at, demoted);
    }
}
