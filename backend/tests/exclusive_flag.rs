//! Integration coverage for the exclusive primary-flag guarantee.
//!
//! Runs the real domain service against the in-memory store, which honours
//! the same read-set verification contract as the Diesel adapters, so the
//! promotion, repair, deletion, and concurrency behaviour observed here is
//! the behaviour a database deployment exhibits.

mod support;

use std::sync::Arc;

use backend::domain::ports::{OwnedEntityCommand, OwnedEntityQuery, UpsertEntityRequest};
use backend::domain::{
    Company, CompanyDraft, Competitor, CompetitorDraft, EntityId, ErrorCode, ExclusiveFlagService,
    OwnedEntity, UserId,
};
use mockable::DefaultClock;
use support::memory::InMemoryEntityRepository;

type CompanyService = ExclusiveFlagService<Company, InMemoryEntityRepository<Company>>;

fn company_service() -> (CompanyService, InMemoryEntityRepository<Company>) {
    let repo = InMemoryEntityRepository::default();
    let service = ExclusiveFlagService::new(Arc::new(repo.clone()), Arc::new(DefaultClock));
    (service, repo)
}

fn company_draft(name: &str) -> CompanyDraft {
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

fn upsert(
    owner: &UserId,
    target: Option<EntityId>,
    wants_primary: bool,
    name: &str,
) -> UpsertEntityRequest<Company> {
    UpsertEntityRequest {
        owner_id: owner.clone(),
        target_id: target,
        wants_primary,
        draft: company_draft(name),
    }
}

fn primary_count(repo: &InMemoryEntityRepository<Company>, owner: &UserId) -> usize {
    repo.snapshot_for_owner(owner)
        .iter()
        .filter(|company| company.is_primary)
        .count()
}

#[tokio::test]
async fn every_promotion_sequence_leaves_at_most_one_primary() {
    let (service, repo) = company_service();
    let owner = UserId::random();

    for name in ["First", "Second", "Third"] {
        service
            .upsert(upsert(&owner, None, true, name))
            .await
            .expect("create succeeds");
        assert_eq!(primary_count(&repo, &owner), 1, "after creating {name}");
    }

    let companies = repo.snapshot_for_owner(&owner);
    assert_eq!(companies.len(), 3);
    let primary = companies
        .iter()
        .find(|company| company.is_primary)
        .expect("one primary");
    assert_eq!(primary.name, "Third");
}

#[tokio::test]
async fn promoting_a_sibling_demotes_the_previous_primary_and_stamps_both() {
    let (service, repo) = company_service();
    let owner = UserId::random();

    let a = service
        .upsert(upsert(&owner, None, true, "Alpha"))
        .await
        .expect("create Alpha");
    let b = service
        .upsert(upsert(&owner, None, false, "Beta"))
        .await
        .expect("create Beta");
    let c = service
        .upsert(upsert(&owner, None, false, "Gamma"))
        .await
        .expect("create Gamma");
    let a_before = a.updated_at;
    let c_before = c.updated_at;

    let promoted = service
        .upsert(upsert(&owner, Some(b.id), true, "Beta"))
        .await
        .expect("promote Beta");
    assert!(promoted.is_primary);

    let companies = repo.snapshot_for_owner(&owner);
    let alpha = companies.iter().find(|x| x.id == a.id).expect("Alpha");
    let beta = companies.iter().find(|x| x.id == b.id).expect("Beta");
    let gamma = companies.iter().find(|x| x.id == c.id).expect("Gamma");

    assert!(!alpha.is_primary, "previous primary is cleared");
    assert!(beta.is_primary, "target carries the flag");
    assert!(alpha.updated_at >= a_before, "demoted row is stamped");
    assert_eq!(alpha.revision, 2, "demoted row is rewritten");
    assert_eq!(beta.revision, 2, "target is rewritten");
    assert_eq!(gamma.updated_at, c_before, "untouched row keeps its stamp");
    assert_eq!(gamma.revision, 1, "untouched row keeps its revision");
}

#[tokio::test]
async fn clearing_the_flag_never_touches_siblings() {
    let (service, repo) = company_service();
    let owner = UserId::random();

    let a = service
        .upsert(upsert(&owner, None, true, "Alpha"))
        .await
        .expect("create Alpha");
    let b = service
        .upsert(upsert(&owner, None, false, "Beta"))
        .await
        .expect("create Beta");

    service
        .upsert(upsert(&owner, Some(b.id), false, "Beta renamed"))
        .await
        .expect("update Beta");

    let companies = repo.snapshot_for_owner(&owner);
    let alpha = companies.iter().find(|x| x.id == a.id).expect("Alpha");
    assert!(alpha.is_primary, "primary untouched by a non-primary update");
    assert_eq!(alpha.revision, 1);
}

#[tokio::test]
async fn deleting_the_primary_elects_no_replacement() {
    let (service, repo) = company_service();
    let owner = UserId::random();

    let a = service
        .upsert(upsert(&owner, None, true, "Alpha"))
        .await
        .expect("create Alpha");
    service
        .upsert(upsert(&owner, None, false, "Beta"))
        .await
        .expect("create Beta");

    service.delete(&owner, a.id).await.expect("delete Alpha");

    assert_eq!(primary_count(&repo, &owner), 0, "no automatic re-election");
    assert_eq!(repo.snapshot_for_owner(&owner).len(), 1);
}

#[tokio::test]
async fn foreign_targets_are_rejected_without_writes() {
    let (service, repo) = company_service();
    let owner = UserId::random();
    let intruder = UserId::random();

    let a = service
        .upsert(upsert(&owner, None, true, "Alpha"))
        .await
        .expect("create Alpha");

    let error = service
        .upsert(upsert(&intruder, Some(a.id), true, "Hijack"))
        .await
        .expect_err("foreign upsert");
    assert_eq!(error.code(), ErrorCode::Forbidden);

    let delete_error = service
        .delete(&intruder, a.id)
        .await
        .expect_err("foreign delete");
    assert_eq!(delete_error.code(), ErrorCode::Forbidden);

    let companies = repo.snapshot_for_owner(&owner);
    assert_eq!(companies.len(), 1);
    assert_eq!(companies.first().expect("Alpha").name, "Alpha");
    assert!(companies.first().expect("Alpha").is_primary);
}

#[tokio::test]
async fn unknown_targets_are_not_found() {
    let (service, _repo) = company_service();
    let owner = UserId::random();

    let error = service
        .upsert(upsert(&owner, Some(EntityId::random()), true, "Ghost"))
        .await
        .expect_err("missing target");
    assert_eq!(error.code(), ErrorCode::NotFound);

    let get_error = service
        .get(&owner, EntityId::random())
        .await
        .expect_err("missing get");
    assert_eq!(get_error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn concurrent_promotions_for_one_owner_converge_to_a_single_primary() {
    let (service, repo) = company_service();
    let owner = UserId::random();

    let a = service
        .upsert(upsert(&owner, None, false, "Alpha"))
        .await
        .expect("create Alpha");
    let b = service
        .upsert(upsert(&owner, None, false, "Beta"))
        .await
        .expect("create Beta");

    // Both tasks promote their own target, retrying on conflict as the API
    // contract tells callers to. Whatever the interleaving, the store must
    // never end up with two primaries.
    async fn promote_with_retry(
        service: CompanyService,
        owner: UserId,
        target: EntityId,
        name: &str,
    ) {
        loop {
            match service
                .upsert(UpsertEntityRequest {
                    owner_id: owner.clone(),
                    target_id: Some(target),
                    wants_primary: true,
                    draft: CompanyDraft {
                        name: name.to_owned(),
                        industry: None,
                        description: None,
                        products_services: None,
                        value_proposition: None,
                        target_market: None,
                        website: None,
                        company_size: None,
                    },
                })
                .await
            {
                Ok(_) => return,
                Err(error) if error.code() == ErrorCode::Conflict => {}
                Err(error) => panic!("unexpected promotion failure: {error}"),
            }
        }
    }

    for _ in 0..25 {
        let first = tokio::spawn(promote_with_retry(
            service.clone(),
            owner.clone(),
            a.id,
            "Alpha",
        ));
        let second = tokio::spawn(promote_with_retry(
            service.clone(),
            owner.clone(),
            b.id,
            "Beta",
        ));
        first.await.expect("first promoter");
        second.await.expect("second promoter");

        assert_eq!(
            primary_count(&repo, &owner),
            1,
            "exactly one of the two targets holds the flag"
        );
    }
}

#[tokio::test]
async fn promotion_repairs_a_set_with_several_flagged_rows() {
    use backend::domain::ports::{EntityRepository, ExclusiveBatch, VersionedWrite};

    let (service, repo) = company_service();
    let owner = UserId::random();

    // Seed a corrupted set directly: two rows already flagged.
    let first = Company::create(
        EntityId::random(),
        owner.clone(),
        company_draft("Stray A"),
        true,
        chrono::Utc::now(),
    );
    let second = Company::create(
        EntityId::random(),
        owner.clone(),
        company_draft("Stray B"),
        true,
        chrono::Utc::now(),
    );
    for seeded in [first, second] {
        let read_set = repo
            .snapshot_for_owner(&owner)
            .iter()
            .map(|company| (company.id, company.revision))
            .collect();
        repo.apply(
            &owner,
            ExclusiveBatch {
                writes: vec![VersionedWrite {
                    entity: seeded,
                    expected_revision: None,
                }],
                read_set,
            },
        )
        .await
        .expect("seed row");
    }
    assert_eq!(primary_count(&repo, &owner), 2, "corrupted seed");

    let repaired = service
        .upsert(upsert(&owner, None, true, "Chosen"))
        .await
        .expect("repairing promotion");

    assert!(repaired.is_primary);
    assert_eq!(primary_count(&repo, &owner), 1, "invariant restored");
}

#[tokio::test]
async fn competitors_share_the_same_guarantee() {
    let repo: InMemoryEntityRepository<Competitor> = InMemoryEntityRepository::default();
    let service: ExclusiveFlagService<Competitor, _> =
        ExclusiveFlagService::new(Arc::new(repo.clone()), Arc::new(DefaultClock));
    let owner = UserId::random();

    let draft = |name: &str| CompetitorDraft {
        name: name.to_owned(),
        website: None,
        strengths: None,
        weaknesses: None,
        pricing_strategy: None,
        market_position: None,
    };

    service
        .upsert(UpsertEntityRequest {
            owner_id: owner.clone(),
            target_id: None,
            wants_primary: true,
            draft: draft("Rival A"),
        })
        .await
        .expect("create Rival A");
    service
        .upsert(UpsertEntityRequest {
            owner_id: owner.clone(),
            target_id: None,
            wants_primary: true,
            draft: draft("Rival B"),
        })
        .await
        .expect("create Rival B");

    let primaries = repo
        .snapshot_for_owner(&owner)
        .iter()
        .filter(|competitor| competitor.is_primary())
        .count();
    assert_eq!(primaries, 1);
}
