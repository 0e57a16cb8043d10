//! Auth service client and the session it produces

use log::info;

use super::client::ApiClient;
use super::models::{Credentials, TokenResponse};
use super::operations::Operation;
use crate::credentials::CredentialStore;
use crate::error::{Result, SyncError};

/// Bearer token plus the account that obtained it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    email: Option<String>,
}

impl Session {
    /// Returns `None` for a blank token; a session is either present or absent
    pub fn new(token: impl Into<String>, email: Option<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return None;
        }
        Some(Self { token, email })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

pub struct AuthClient<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthClient<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create an account; 200 and 201 both count as success
    pub async fn register(&self, credentials: &Credentials) -> Result<()> {
        let operation = Operation::Register {
            credentials: credentials.clone(),
        };
        let result = self.client.execute(&operation, None).await?;
        if result.is_error() {
            return Err(SyncError::AuthFailure(result.body));
        }
        info!("Registered {}", credentials.email);
        Ok(())
    }

    /// Exchange credentials for a session; only 200 counts as success
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let operation = Operation::Login {
            credentials: credentials.clone(),
        };
        let result = self.client.execute(&operation, None).await?;
        if result.is_error() {
            return Err(SyncError::AuthFailure(result.body));
        }

        let token: TokenResponse = serde_json::from_str(&result.body)
            .map_err(|e| SyncError::InvalidResponse(format!("login: {}", e)))?;
        Session::new(token.access_token, Some(credentials.email.clone())).ok_or_else(|| {
            SyncError::InvalidResponse("login: access_token is empty".to_string())
        })
    }

    /// Log in and persist the token, replacing any previous one. Nothing is
    /// written when login fails.
    pub async fn login_and_store(
        &self,
        credentials: &Credentials,
        store: &mut CredentialStore<'_>,
    ) -> Result<Session> {
        let session = self.login(credentials).await?;
        store.store_session(&session);
        info!("Logged in as {}", credentials.email);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::HttpResponse;
    use crate::testing::ScriptedTransport;
    use crate::workbook::{Table, schema};

    fn auth_table(token: &str) -> Table {
        let mut table = Table::with_schema(&schema::AUTH);
        table.push_row(vec!["me@example.com".into(), "secret".into(), token.into()]);
        table
    }

    #[test]
    fn test_blank_token_is_no_session() {
        assert!(Session::new("  ", None).is_none());
        assert_eq!(Session::new(" abc ", None).unwrap().token(), "abc");
    }

    #[tokio::test]
    async fn test_register_accepts_200_and_201() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(201, r#"{"id":"1"}"#));
        transport.push(HttpResponse::new(200, "{}"));
        transport.push(HttpResponse::new(409, r#"{"error":"email already exists"}"#));
        let client = transport.client();
        let auth = AuthClient::new(&client);
        let creds = Credentials::new("me@example.com", "secret");

        assert!(auth.register(&creds).await.is_ok());
        assert!(auth.register(&creds).await.is_ok());
        let err = auth.register(&creds).await.unwrap_err();
        assert!(matches!(err, SyncError::AuthFailure(body) if body.contains("already exists")));

        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://auth.test/auth/register");
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({"email": "me@example.com", "password": "secret"}))
        );
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(200, r#"{"access_token":"jwt-1"}"#));
        let client = transport.client();

        let mut table = auth_table("old-token");
        let mut store = CredentialStore::new(&mut table);
        let creds = store.credentials();
        let session = AuthClient::new(&client)
            .login_and_store(&creds, &mut store)
            .await
            .unwrap();

        assert_eq!(session.token(), "jwt-1");
        assert_eq!(session.email(), Some("me@example.com"));
        assert_eq!(CredentialStore::read_session(&table).unwrap().token(), "jwt-1");
    }

    #[tokio::test]
    async fn test_failed_login_leaves_token_untouched() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(401, r#"{"error":"invalid credentials"}"#));
        let client = transport.client();

        let mut table = auth_table("");
        let mut store = CredentialStore::new(&mut table);
        let creds = store.credentials();
        let err = AuthClient::new(&client)
            .login_and_store(&creds, &mut store)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::AuthFailure(body) if body.contains("invalid credentials")));
        assert!(matches!(
            CredentialStore::read_session(&table),
            Err(SyncError::MissingSession)
        ));
    }

    #[tokio::test]
    async fn test_login_200_without_token_is_invalid() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(200, r#"{"message":"ok"}"#));
        let client = transport.client();

        let err = AuthClient::new(&client)
            .login(&Credentials::new("a@b.c", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidResponse(_)));
    }
}
