use std::path::PathBuf;
use std::sync::Arc;

use auth::Authenticator;
use auth::TokenService;
use chirpy::domain::chirp::service::ChirpService;
use chirpy::domain::user::service::UserService;
use chirpy::inbound::http::router::create_router;
use chirpy::outbound::repositories::JsonFileDatabase;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub dir: TestDir,
    pub api_client: reqwest::Client,
    pub token_service: TokenService,
}

/// Throwaway directory holding the database file and static assets
pub struct TestDir {
    pub path: PathBuf,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let dir = TestDir::new();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let database = Arc::new(
            JsonFileDatabase::open(dir.database_path())
                .await
                .expect("Failed to open test database"),
        );

        let user_service = Arc::new(UserService::new(Arc::clone(&database)));
        let chirp_service = Arc::new(ChirpService::new(database));
        let authenticator = Arc::new(Authenticator::new(
            TEST_SECRET,
            chrono::Duration::hours(1),
        ));

        let router = create_router(user_service, chirp_service, authenticator, &dir.path);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            dir,
            api_client: reqwest::Client::new(),
            token_service: TokenService::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response body's `data`
    pub async fn register(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/users")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Log in and return the issued token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Create a chirp and return the response body's `data`
    pub async fn create_chirp(&self, token: &str, text: &str) -> Value {
        let response = self
            .post_authenticated("/api/chirps", token)
            .json(&json!({ "body": text }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

impl TestDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("chirpy_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("Failed to create test directory");
        std::fs::write(path.join("index.html"), "<html>Welcome to Chirpy</html>")
            .expect("Failed to write static file");
        Self { path }
    }

    pub fn database_path(&self) -> PathBuf {
        self.path.join("database.json")
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
