use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::user::models::UserId;

/// Domain service for chirp operations.
pub struct ChirpService<CR>
where
    CR: ChirpRepository,
{
    repository: Arc<CR>,
}

impl<CR> ChirpService<CR>
where
    CR: ChirpRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<CR> ChirpServicePort for ChirpService<CR>
where
    CR: ChirpRepository,
{
    async fn create_chirp(&self, command: CreateChirpCommand) -> Result<Chirp, ChirpError> {
        let chirp = self
            .repository
            .create(&command.body, &command.author_id)
            .await?;
        tracing::info!(chirp_id = %chirp.id, author_id = %chirp.author_id, "Chirp created");

        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, ChirpError> {
        let mut chirps = self.repository.list_all().await?;
        chirps.sort_by_key(|chirp| chirp.id);
        Ok(chirps)
    }

    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ChirpError::NotFound(id.to_string()))
    }

    async fn delete_chirp(&self, id: &ChirpId, caller: &UserId) -> Result<(), ChirpError> {
        let chirp = self.get_chirp(id).await?;

        if chirp.author_id != *caller {
            tracing::warn!(chirp_id = %id, caller = %caller, "Delete refused for non-author");
            return Err(ChirpError::Forbidden(id.to_string()));
        }

        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::chirp::models::ChirpBody;

    mock! {
        pub TestChirpRepository {}

        #[async_trait]
        impl ChirpRepository for TestChirpRepository {
            async fn create(&self, body: &ChirpBody, author_id: &UserId) -> Result<Chirp, ChirpError>;
            async fn list_all(&self) -> Result<Vec<Chirp>, ChirpError>;
            async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError>;
            async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError>;
        }
    }

    fn chirp(id: u64, author: u64) -> Chirp {
        Chirp {
            id: ChirpId(id),
            body: ChirpBody::new(format!("chirp number {}", id)).unwrap(),
            author_id: UserId(author),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_chirp_stores_cleaned_body() {
        let mut repository = MockTestChirpRepository::new();

        repository
            .expect_create()
            .withf(|body, author_id| body.as_str() == "what a ****" && *author_id == UserId(4))
            .times(1)
            .returning(|body, author_id| {
                Ok(Chirp {
                    id: ChirpId(1),
                    body: body.clone(),
                    author_id: *author_id,
                    created_at: Utc::now(),
                })
            });

        let service = ChirpService::new(Arc::new(repository));

        let command = CreateChirpCommand {
            body: ChirpBody::new("what a kerfuffle".to_string()).unwrap(),
            author_id: UserId(4),
        };

        let created = service.create_chirp(command).await.unwrap();
        assert_eq!(created.body.as_str(), "what a ****");
        assert_eq!(created.author_id, UserId(4));
    }

    #[tokio::test]
    async fn test_list_chirps_sorted_by_id() {
        let mut repository = MockTestChirpRepository::new();

        repository
            .expect_list_all()
            .times(1)
            .returning(|| Ok(vec![chirp(3, 1), chirp(1, 1), chirp(2, 2)]));

        let service = ChirpService::new(Arc::new(repository));

        let ids: Vec<u64> = service
            .list_chirps()
            .await
            .unwrap()
            .iter()
            .map(|chirp| chirp.id.0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_chirp_not_found() {
        let mut repository = MockTestChirpRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = ChirpService::new(Arc::new(repository));

        let result = service.get_chirp(&ChirpId(5)).await;
        assert!(matches!(result, Err(ChirpError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_chirp_by_author() {
        let mut repository = MockTestChirpRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(chirp(id.0, 8))));
        repository
            .expect_delete()
            .withf(|id| *id == ChirpId(2))
            .times(1)
            .returning(|_| Ok(()));

        let service = ChirpService::new(Arc::new(repository));

        assert!(service.delete_chirp(&ChirpId(2), &UserId(8)).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_chirp_by_other_user() {
        let mut repository = MockTestChirpRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(chirp(id.0, 8))));
        repository.expect_delete().times(0);

        let service = ChirpService::new(Arc::new(repository));

        let result = service.delete_chirp(&ChirpId(2), &UserId(9)).await;
        assert!(matches!(result, Err(ChirpError::Forbidden(_))));
    }
}
