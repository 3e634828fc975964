//! Identity directory client for a hosted CMS collection API.
//!
//! Identities live as items of a single collection. The API is reachable
//! only through "list items" and "create item":
//!
//! ```text
//! GET  {api_url}/collections/{collection_id}/items   -> { "items": [ ... ] }
//! POST {api_url}/collections/{collection_id}/items   <- { "fields": { ... } }
//! ```
//!
//! Item field names are fixed by the collection schema: `name` holds the
//! username, and the given/family names are `first-name` / `last-name`.

use crate::error::{AuthError, Result};
use crate::identity::Identity;
use crate::providers::DirectoryClient;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API version header expected by the collection API.
const ACCEPT_VERSION: &str = "1.0.0";

/// Directory endpoint and credentials.
///
/// `Debug` never prints the API token.
#[derive(Clone)]
pub struct HttpDirectoryConfig {
    /// API base URL (e.g., "https://api.webflow.com").
    pub api_url: String,

    /// Bearer token for the API.
    pub api_token: String,

    /// Collection holding identity records.
    pub collection_id: String,
}

impl fmt::Debug for HttpDirectoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDirectoryConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("collection_id", &self.collection_id)
            .finish()
    }
}

/// Collection item as returned by the list endpoint.
///
/// Fields may be absent or `null` on hand-edited items.
#[derive(Debug, Deserialize)]
struct DirectoryItem {
    name: Option<String>,
    email: Option<String>,
    #[serde(rename = "first-name")]
    first_name: Option<String>,
    #[serde(rename = "last-name")]
    last_name: Option<String>,
}

impl From<DirectoryItem> for Identity {
    fn from(item: DirectoryItem) -> Self {
        Self {
            email: item.email.unwrap_or_default(),
            username: item.name.unwrap_or_default(),
            first_name: item.first_name.unwrap_or_default(),
            last_name: item.last_name.unwrap_or_default(),
        }
    }
}

/// List endpoint response.
#[derive(Debug, Deserialize)]
struct ListItemsResponse {
    #[serde(default)]
    items: Vec<DirectoryItem>,
}

/// Create endpoint request body.
#[derive(Debug, Serialize)]
struct CreateItemRequest<'a> {
    fields: CreateItemFields<'a>,
}

/// Fields of a new item. New identities are published immediately.
#[derive(Debug, Serialize)]
struct CreateItemFields<'a> {
    #[serde(rename = "_archived")]
    archived: bool,
    #[serde(rename = "_draft")]
    draft: bool,
    name: &'a str,
    email: &'a str,
    #[serde(rename = "first-name")]
    first_name: &'a str,
    #[serde(rename = "last-name")]
    last_name: &'a str,
}

impl<'a> From<&'a Identity> for CreateItemRequest<'a> {
    fn from(identity: &'a Identity) -> Self {
        Self {
            fields: CreateItemFields {
                archived: false,
                draft: false,
                name: &identity.username,
                email: &identity.email,
                first_name: &identity.first_name,
                last_name: &identity.last_name,
            },
        }
    }
}

/// Directory client over HTTP.
///
/// # Example
///
/// ```no_run
/// use magic_link_auth::providers::{HttpDirectoryClient, HttpDirectoryConfig};
///
/// let directory = HttpDirectoryClient::new(&HttpDirectoryConfig {
///     api_url: "https://api.webflow.com".to_string(),
///     api_token: "token".to_string(),
///     collection_id: "users".to_string(),
/// });
/// ```
#[derive(Clone, Debug)]
pub struct HttpDirectoryClient {
    /// HTTP client for making requests.
    http_client: Client,

    /// Items endpoint of the identity collection.
    items_url: String,

    /// Bearer token (keep confidential).
    api_token: String,
}

impl HttpDirectoryClient {
    /// Create a new directory client.
    #[must_use]
    pub fn new(config: &HttpDirectoryConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a directory client around an existing `reqwest` client.
    #[must_use]
    pub fn with_client(http_client: Client, config: &HttpDirectoryConfig) -> Self {
        Self {
            http_client,
            items_url: format!(
                "{}/collections/{}/items",
                config.api_url.trim_end_matches('/'),
                config.collection_id
            ),
            api_token: config.api_token.clone(),
        }
    }

    /// Items endpoint this client talks to.
    #[must_use]
    pub fn items_url(&self) -> &str {
        &self.items_url
    }
}

impl DirectoryClient for HttpDirectoryClient {
    async fn list_identities(&self) -> Result<Vec<Identity>> {
        let response = self
            .http_client
            .get(&self.items_url)
            .bearer_auth(&self.api_token)
            .header("accept-version", ACCEPT_VERSION)
            .send()
            .await
            .map_err(|e| AuthError::DirectoryUnavailable(format!("List request failed: {e}")))?
            .error_for_status()
            .map_err(|e| AuthError::DirectoryUnavailable(format!("List request rejected: {e}")))?;

        let body: ListItemsResponse = response
            .json()
            .await
            .map_err(|e| AuthError::DirectoryUnavailable(format!("Invalid list response: {e}")))?;

        tracing::debug!(count = body.items.len(), "Fetched directory snapshot");
        Ok(body.items.into_iter().map(Identity::from).collect())
    }

    async fn create_identity(&self, identity: &Identity) -> Result<()> {
        let response = self
            .http_client
            .post(&self.items_url)
            .bearer_auth(&self.api_token)
            .header("accept-version", ACCEPT_VERSION)
            .json(&CreateItemRequest::from(identity))
            .send()
            .await
            .map_err(|e| AuthError::DirectoryUnavailable(format!("Create request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Directory rejected new identity");
            return Err(AuthError::DirectoryWriteError);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> HttpDirectoryConfig {
        HttpDirectoryConfig {
            api_url: "https://api.example.com/".to_string(),
            api_token: "secret-token".to_string(),
            collection_id: "users123".to_string(),
        }
    }

    #[test]
    fn test_items_url() {
        let client = HttpDirectoryClient::new(&config());
        assert_eq!(
            client.items_url(),
            "https://api.example.com/collections/users123/items"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        assert!(!format!("{:?}", config()).contains("secret-token"));
    }

    #[test]
    fn test_list_response_maps_collection_fields() {
        let body = r#"{
            "items": [
                {"name": "jane", "email": "jane@x.com", "first-name": "Jane", "last-name": "Doe", "_id": "1"},
                {"name": "bob", "email": null, "_draft": true}
            ],
            "count": 2
        }"#;

        let parsed: ListItemsResponse = serde_json::from_str(body).unwrap();
        let identities: Vec<Identity> = parsed.items.into_iter().map(Identity::from).collect();

        assert_eq!(identities[0], Identity::new("jane@x.com", "jane", "Jane", "Doe"));
        assert_eq!(identities[1].username, "bob");
        assert_eq!(identities[1].email, "");
    }

    #[test]
    fn test_create_body_shape() {
        let identity = Identity::new("jane@x.com", "jane", "Jane", "Doe");
        let body = serde_json::to_value(CreateItemRequest::from(&identity)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "fields": {
                    "_archived": false,
                    "_draft": false,
                    "name": "jane",
                    "email": "jane@x.com",
                    "first-name": "Jane",
                    "last-name": "Doe"
                }
            })
        );
    }
}
