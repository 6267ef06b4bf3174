//! In-memory repository implementations behind the domain ports.
//!
//! These back the integration tests with the same contract the Diesel
//! adapters honour: the exclusive write verifies the read-set snapshot
//! against current storage and applies the batch all-or-nothing, so the
//! conflict paths the services rely on are observable without a database.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use backend::domain::ports::{
    EntityRepository, EntityRepositoryError, ExclusiveBatch, ProfileRepository,
    ProfileRepositoryError, PromptRepository, PromptRepositoryError,
};
use backend::domain::{
    EntityId, LikeState, OwnedEntity, PromptComment, PromptDetail, PromptSearchFilter,
    PromptSummary, PromptTemplate, UserId, UserProfile,
};
use pagination::{Page, PageRequest};
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("test repository lock")
}

/// In-memory owner-scoped entity store.
#[derive(Debug)]
pub struct InMemoryEntityRepository<E> {
    rows: Arc<Mutex<HashMap<Uuid, E>>>,
}

impl<E> Clone for InMemoryEntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<E> Default for InMemoryEntityRepository<E> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<E: OwnedEntity> InMemoryEntityRepository<E> {
    /// Snapshot every stored entity for an owner, sorted by id for
    /// deterministic assertions.
    pub fn snapshot_for_owner(&self, owner_id: &UserId) -> Vec<E> {
        let rows = lock(&self.rows);
        let mut owned: Vec<E> = rows
            .values()
            .filter(|entity| entity.owner_id() == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|entity| *entity.id().as_uuid());
        owned
    }

    fn verify_read_set(
        rows: &HashMap<Uuid, E>,
        owner_id: &UserId,
        read_set: &[(EntityId, u32)],
    ) -> bool {
        let current: HashMap<Uuid, u32> = rows
            .values()
            .filter(|entity| entity.owner_id() == owner_id)
            .map(|entity| (*entity.id().as_uuid(), entity.revision()))
            .collect();
        if current.len() != read_set.len() {
            return false;
        }
        read_set
            .iter()
            .all(|(id, revision)| current.get(id.as_uuid()) == Some(revision))
    }
}

#[async_trait]
impl<E: OwnedEntity> EntityRepository<E> for InMemoryEntityRepository<E> {
    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<E>, EntityRepositoryError> {
        Ok(self.snapshot_for_owner(owner_id))
    }

    async fn find(&self, id: EntityId) -> Result<Option<E>, EntityRepositoryError> {
        Ok(lock(&self.rows).get(id.as_uuid()).cloned())
    }

    async fn apply(
        &self,
        owner_id: &UserId,
        batch: ExclusiveBatch<E>,
    ) -> Result<(), EntityRepositoryError> {
        let mut rows = lock(&self.rows);

        if !Self::verify_read_set(&rows, owner_id, &batch.read_set) {
            return Err(EntityRepositoryError::stale_set(owner_id.to_string()));
        }

        // Validate the whole batch before mutating so a failure leaves the
        // store untouched, mirroring transaction rollback.
        for write in &batch.writes {
            let stored = rows.get(write.entity.id().as_uuid());
            match (write.expected_revision, stored) {
                (None, None) => {}
                (None, Some(_)) => {
                    return Err(EntityRepositoryError::duplicate_id(
                        write.entity.id().to_string(),
                    ));
                }
                (Some(expected), Some(existing)) if existing.revision() == expected => {}
                (Some(_), _) => {
                    return Err(EntityRepositoryError::stale_set(owner_id.to_string()));
                }
            }
        }

        for write in batch.writes {
            rows.insert(*write.entity.id().as_uuid(), write.entity);
        }
        Ok(())
    }

    async fn delete(
        &self,
        owner_id: &UserId,
        id: EntityId,
    ) -> Result<bool, EntityRepositoryError> {
        let mut rows = lock(&self.rows);
        let owned = rows
            .get(id.as_uuid())
            .is_some_and(|entity| entity.owner_id() == owner_id);
        if !owned {
            return Ok(false);
        }
        Ok(rows.remove(id.as_uuid()).is_some())
    }
}

/// In-memory prompt catalogue store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPromptRepository {
    templates: Arc<Mutex<HashMap<Uuid, PromptTemplate>>>,
    likes: Arc<Mutex<HashSet<(Uuid, Uuid)>>>,
    comments: Arc<Mutex<Vec<PromptComment>>>,
}

impl InMemoryPromptRepository {
    fn like_count(&self, prompt_id: Uuid) -> u64 {
        lock(&self.likes)
            .iter()
            .filter(|(liked, _)| *liked == prompt_id)
            .count() as u64
    }

    fn comment_count(&self, prompt_id: Uuid) -> u64 {
        lock(&self.comments)
            .iter()
            .filter(|comment| comment.prompt_id == prompt_id)
            .count() as u64
    }

    fn matches(filter: &PromptSearchFilter, template: &PromptTemplate) -> bool {
        let keyword_ok = filter.query.as_ref().is_none_or(|keyword| {
            let needle = keyword.to_lowercase();
            template.title.to_lowercase().contains(&needle)
                || template
                    .description
                    .as_ref()
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
        });
        let category_ok = filter
            .category
            .as_ref()
            .is_none_or(|category| template.category.as_ref() == Some(category));
        let language_ok = filter
            .language
            .as_ref()
            .is_none_or(|language| &template.language == language);
        keyword_ok && category_ok && language_ok
    }
}

#[async_trait]
impl PromptRepository for InMemoryPromptRepository {
    async fn search(
        &self,
        filter: &PromptSearchFilter,
        page: &PageRequest,
    ) -> Result<Page<PromptSummary>, PromptRepositoryError> {
        let mut matching: Vec<PromptTemplate> = lock(&self.templates)
            .values()
            .filter(|template| Self::matches(filter, template))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let fetch = usize::try_from(page.limit()).unwrap_or(usize::MAX).saturating_add(1);
        let window: Vec<PromptSummary> = matching
            .into_iter()
            .skip(offset)
            .take(fetch)
            .map(|template| PromptSummary {
                like_count: self.like_count(template.id),
                comment_count: self.comment_count(template.id),
                id: template.id,
                title: template.title,
                description: template.description,
                category: template.category,
                language: template.language,
                created_at: template.created_at,
            })
            .collect();

        Ok(Page::from_items(window, page))
    }

    async fn find_detail<'a>(
        &self,
        id: Uuid,
        viewer: Option<&'a UserId>,
    ) -> Result<Option<PromptDetail>, PromptRepositoryError> {
        let template = match lock(&self.templates).get(&id) {
            Some(template) => template.clone(),
            None => return Ok(None),
        };

        let mut comments: Vec<PromptComment> = lock(&self.comments)
            .iter()
            .filter(|comment| comment.prompt_id == id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| comment.created_at);

        let viewer_has_liked = viewer
            .is_some_and(|user| lock(&self.likes).contains(&(id, *user.as_uuid())));

        Ok(Some(PromptDetail {
            like_count: self.like_count(id),
            template,
            comments,
            viewer_has_liked,
        }))
    }

    async fn insert(&self, template: &PromptTemplate) -> Result<(), PromptRepositoryError> {
        lock(&self.templates).insert(template.id, template.clone());
        Ok(())
    }

    async fn toggle_like(
        &self,
        id: Uuid,
        user_id: &UserId,
    ) -> Result<Option<LikeState>, PromptRepositoryError> {
        if !lock(&self.templates).contains_key(&id) {
            return Ok(None);
        }

        let key = (id, *user_id.as_uuid());
        let liked = {
            let mut likes = lock(&self.likes);
            if likes.remove(&key) {
                false
            } else {
                likes.insert(key);
                true
            }
        };

        Ok(Some(LikeState {
            liked,
            like_count: self.like_count(id),
        }))
    }

    async fn add_comment(&self, comment: &PromptComment) -> Result<bool, PromptRepositoryError> {
        if !lock(&self.templates).contains_key(&comment.prompt_id) {
            return Ok(false);
        }
        lock(&self.comments).push(comment.clone());
        Ok(true)
    }
}

/// In-memory profile store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<Uuid, UserProfile>>>,
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(lock(&self.profiles).get(user_id.as_uuid()).cloned())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), ProfileRepositoryError> {
        lock(&self.profiles).insert(*profile.user_id.as_uuid(), profile.clone());
        Ok(())
    }
}
