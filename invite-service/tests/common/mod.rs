#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::SignedTokenIssuer;
use auth::TokenConfig;
use invite_service::domain::account::models::EmailAddress;
use invite_service::domain::account::models::NewAccount;
use invite_service::domain::account::models::Role;
use invite_service::domain::account::ports::AccountDirectory;
use invite_service::domain::session::service::AuthService;
use invite_service::inbound::http::rate_limit::RateLimitConfig;
use invite_service::inbound::http::rate_limit::RateLimiter;
use invite_service::inbound::http::router::create_router;
use invite_service::outbound::repositories::InMemoryAccountDirectory;
use invite_service::outbound::stores::InMemoryInvitationTokenStore;
use serde_json::json;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin_pass!";

/// Test application that spawns a real server on in-memory adapters
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub directory: Arc<InMemoryAccountDirectory>,
    pub invitations: Arc<InMemoryInvitationTokenStore>,
    pub issuer: Arc<SignedTokenIssuer>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_rate_limit(RateLimitConfig {
            max_requests: 1000,
            window: Duration::from_secs(60),
        })
        .await
    }

    pub async fn spawn_with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let directory = Arc::new(InMemoryAccountDirectory::new());
        let invitations = Arc::new(InMemoryInvitationTokenStore::new(chrono::Duration::hours(24)));
        let issuer = Arc::new(SignedTokenIssuer::new(TokenConfig::new(
            JWT_SECRET, 900, 604800,
        )));

        seed_admin(&directory).await;

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&directory),
            Arc::clone(&invitations),
            Arc::clone(&issuer),
            Duration::from_secs(5),
        ));

        let router = create_router(auth_service, RateLimiter::new(rate_limit));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            directory,
            invitations,
            issuer,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Log in and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body: serde_json::Value = self
            .post("/api/v1/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["access_token"]["token"]
            .as_str()
            .expect("Login returned no access token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Generate an invitation token as admin and return its string
    pub async fn generate_invitation(&self) -> String {
        let admin = self.admin_token().await;
        let body: serde_json::Value = self
            .post("/api/v1/tokens/generate")
            .bearer_auth(&admin)
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["token"]
            .as_str()
            .expect("Generate returned no token")
            .to_string()
    }
}

async fn seed_admin(directory: &InMemoryAccountDirectory) {
    let hasher = PasswordHasher::new();
    let salt = hasher.generate_salt();
    let password_hash = hasher
        .hash(ADMIN_PASSWORD, &salt)
        .expect("Failed to hash admin password");

    directory
        .create_account(NewAccount {
            email: EmailAddress::new(ADMIN_EMAIL.to_string()).unwrap(),
            password_hash,
            salt,
            role: Role::Admin,
        })
        .await
        .expect("Failed to seed admin account");
}
