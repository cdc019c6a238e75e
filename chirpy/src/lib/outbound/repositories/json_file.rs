use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpBody;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Storage failures of the JSON document.
#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("Failed to access database file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),
}

impl From<JsonFileError> for UserError {
    fn from(err: JsonFileError) -> Self {
        UserError::StorageError(err.to_string())
    }
}

impl From<JsonFileError> for ChirpError {
    fn from(err: JsonFileError) -> Self {
        ChirpError::StorageError(err.to_string())
    }
}

/// On-disk document: `{"chirps": {"1": {...}}, "users": {"1": {...}}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    chirps: BTreeMap<u64, ChirpRecord>,
    #[serde(default)]
    users: BTreeMap<u64, UserRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    id: u64,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChirpRecord {
    id: u64,
    body: String,
    author_id: u64,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn into_user(self) -> Result<User, JsonFileError> {
        let email = EmailAddress::new(self.email)
            .map_err(|e| JsonFileError::InvalidRecord(format!("user {}: {}", self.id, e)))?;

        Ok(User {
            id: UserId(self.id),
            email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<ChirpRecord> for Chirp {
    fn from(record: ChirpRecord) -> Self {
        Chirp {
            id: ChirpId(record.id),
            body: ChirpBody::from_stored(record.body),
            author_id: UserId(record.author_id),
            created_at: record.created_at,
        }
    }
}

fn next_id<V>(records: &BTreeMap<u64, V>) -> u64 {
    records.keys().next_back().map_or(1, |last| last + 1)
}

/// JSON-file datastore backing both users and chirps.
///
/// Every operation reads the whole document and writes it back while holding
/// `lock`, so there is at most one writer per process.
pub struct JsonFileDatabase {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDatabase {
    /// Open the database at `path`, creating an empty document if missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, JsonFileError> {
        let database = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };

        match tokio::fs::metadata(&database.path).await {
            Ok(_) => {
                database.load().await?;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                database.store(&Document::default()).await?;
                tracing::info!(path = %database.path.display(), "Created database file");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(database)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, JsonFileError> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::default());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write through a sibling temp file so a crash never leaves half a document.
    async fn store(&self, document: &Document) -> Result<(), JsonFileError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");

        tokio::fs::write(&temp_path, bytes).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for JsonFileDatabase {
    async fn create(&self, email: &EmailAddress, password_hash: &str) -> Result<User, UserError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        if document
            .users
            .values()
            .any(|record| record.email == email.as_str())
        {
            return Err(UserError::EmailAlreadyExists(email.to_string()));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: next_id(&document.users),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        document.users.insert(record.id, record.clone());
        self.store(&document).await?;

        Ok(record.into_user()?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        Ok(document
            .users
            .remove(&id.0)
            .map(UserRecord::into_user)
            .transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;

        Ok(document
            .users
            .into_values()
            .find(|record| record.email == email)
            .map(UserRecord::into_user)
            .transpose()?)
    }

    async fn update(
        &self,
        id: &UserId,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, UserError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        if document
            .users
            .values()
            .any(|record| record.id != id.0 && record.email == email.as_str())
        {
            return Err(UserError::EmailAlreadyExists(email.to_string()));
        }

        let record = document
            .users
            .get_mut(&id.0)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        record.email = email.to_string();
        record.password_hash = password_hash.to_string();
        record.updated_at = Utc::now();
        let record = record.clone();

        self.store(&document).await?;

        Ok(record.into_user()?)
    }
}

#[async_trait]
impl ChirpRepository for JsonFileDatabase {
    async fn create(&self, body: &ChirpBody, author_id: &UserId) -> Result<Chirp, ChirpError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        let record = ChirpRecord {
            id: next_id(&document.chirps),
            body: body.as_str().to_string(),
            author_id: author_id.0,
            created_at: Utc::now(),
        };
        document.chirps.insert(record.id, record.clone());
        self.store(&document).await?;

        Ok(record.into())
    }

    async fn list_all(&self) -> Result<Vec<Chirp>, ChirpError> {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;

        Ok(document.chirps.into_values().map(Chirp::from).collect())
    }

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        Ok(document.chirps.remove(&id.0).map(Chirp::from))
    }

    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError> {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;

        if document.chirps.remove(&id.0).is_none() {
            return Err(ChirpError::NotFound(id.to_string()));
        }
        self.store(&document).await?;

        Ok(())
    }
}
