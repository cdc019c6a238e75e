use async_trait::async_trait;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpBody;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::user::models::UserId;

/// Port for chirp domain service operations.
#[async_trait]
pub trait ChirpServicePort: Send + Sync + 'static {
    /// Publish a cleaned chirp for its author.
    ///
    /// # Errors
    /// * `StorageError` - Storage operation failed
    async fn create_chirp(&self, command: CreateChirpCommand) -> Result<Chirp, ChirpError>;

    /// List every chirp in ascending id order.
    async fn list_chirps(&self) -> Result<Vec<Chirp>, ChirpError>;

    /// Retrieve chirp by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError>;

    /// Delete a chirp owned by `caller`.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    /// * `Forbidden` - `caller` is not the author
    async fn delete_chirp(&self, id: &ChirpId, caller: &UserId) -> Result<(), ChirpError>;
}

/// Persistence operations for chirps.
#[async_trait]
pub trait ChirpRepository: Send + Sync + 'static {
    /// Persist a new chirp, assigning the next id.
    async fn create(&self, body: &ChirpBody, author_id: &UserId) -> Result<Chirp, ChirpError>;

    /// Retrieve all chirps sorted by ascending id.
    async fn list_all(&self) -> Result<Vec<Chirp>, ChirpError>;

    /// Retrieve chirp by identifier.
    ///
    /// # Returns
    /// Optional chirp (None if not found)
    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError>;

    /// Remove chirp from storage.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError>;
}
