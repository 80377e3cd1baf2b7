//! Node endpoints (`/users/{user_id}/nodes`)

use crate::http_client::HttpClient;
use crate::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

/// Unreserved characters stay as-is in path segments
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Optional filters for listing nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeQuery {
    /// Page number
    pub page: Option<u32>,
    /// Results per page
    pub per_page: Option<u32>,
    /// Node type (e.g. `ACH-US`)
    pub node_type: Option<String>,
}

impl NodeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Filter by node type
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Encoded query string without the leading `?`. Empty when no filter is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        if let Some(per_page) = self.per_page {
            serializer.append_pair("per_page", &per_page.to_string());
        }
        if let Some(node_type) = &self.node_type {
            serializer.append_pair("type", node_type);
        }
        serializer.finish()
    }
}

/// Node resource bound to one user
#[derive(Debug, Clone)]
pub struct Nodes {
    client: HttpClient,
    user_id: String,
}

impl Nodes {
    /// Create the resource for a user
    pub fn new(client: HttpClient, user_id: impl Into<String>) -> Self {
        Self {
            client,
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Create a node
    pub async fn add<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Value> {
        self.client.post(&self.path(None), payload, None).await
    }

    /// Create a node, letting the API deduplicate retries with `idempotency_key`
    pub async fn add_idempotent<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        idempotency_key: &str,
    ) -> Result<Value> {
        self.client
            .post(&self.path(None), payload, Some(idempotency_key))
            .await
    }

    /// Fetch one node, or list all nodes when `node_id` is `None`
    pub async fn get(&self, node_id: Option<&str>, query: &NodeQuery) -> Result<Value> {
        let mut path = self.path(node_id);
        let query_string = query.to_query_string();
        if !query_string.is_empty() {
            path.push('?');
            path.push_str(&query_string);
        }
        self.client.get(&path).await
    }

    /// Verify a node.
    ///
    /// With a node id this answers micro-deposits (PATCH on the node); without
    /// one it answers MFA questions (POST on the collection).
    pub async fn verify<T: Serialize + ?Sized>(
        &self,
        node_id: Option<&str>,
        payload: &T,
    ) -> Result<Value> {
        match node_id {
            Some(node_id) => self.client.patch(&self.path(Some(node_id)), payload).await,
            None => self.client.post(&self.path(None), payload, None).await,
        }
    }

    /// Delete a node
    pub async fn delete(&self, node_id: &str) -> Result<Value> {
        self.client.delete(&self.path(Some(node_id))).await
    }

    fn path(&self, node_id: Option<&str>) -> String {
        let mut path = format!(
            "/users/{}/nodes",
            utf8_percent_encode(&self.user_id, PATH_SEGMENT)
        );
        if let Some(node_id) = node_id {
            path.push('/');
            path.extend(utf8_percent_encode(node_id, PATH_SEGMENT));
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientConfig, Credentials};
    use crate::SynapseError;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn nodes(base_url: String, user_id: &str) -> Nodes {
        let credentials = Credentials::new("client_id", "client_secret", "fingerprint", "127.0.0.1");
        let client = HttpClient::new(ClientConfig::new(base_url, credentials)).unwrap();
        Nodes::new(client, user_id)
    }

    #[test]
    fn test_query_string() {
        assert_eq!(NodeQuery::new().to_query_string(), "");
        assert_eq!(
            NodeQuery::new()
                .with_page(2)
                .with_per_page(20)
                .with_type("ACH-US")
                .to_query_string(),
            "page=2&per_page=20&type=ACH-US"
        );
        assert_eq!(NodeQuery::new().with_per_page(5).to_query_string(), "per_page=5");
    }

    #[test]
    fn test_query_values_are_encoded() {
        let query = NodeQuery::new().with_type("A&B=C D");
        assert_eq!(query.to_query_string(), "type=A%26B%3DC+D");
    }

    #[tokio::test]
    async fn test_paths() {
        let nodes = nodes("https://example.com".to_string(), "user 1/x");
        assert_eq!(nodes.path(None), "/users/user%201%2Fx/nodes");
        assert_eq!(nodes.path(Some("n-1_a.b~")), "/users/user%201%2Fx/nodes/n-1_a.b~");
        assert_eq!(nodes.user_id(), "user 1/x");
    }

    #[tokio::test]
    async fn test_add() {
        let mut server = Server::new_async().await;
        let payload = json!({ "type": "SYNAPSE-US", "info": { "nickname": "Wallet" } });
        let mock = server
            .mock("POST", "/users/u1/nodes")
            .match_body(Matcher::Json(payload.clone()))
            .match_header("x-sp-idempotency-key", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"nodes":[{"_id":"n1"}]}"#)
            .create_async()
            .await;

        let response = nodes(server.url(), "u1").add(&payload).await.unwrap();
        assert_eq!(response["nodes"][0]["_id"], "n1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_idempotent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/users/u1/nodes")
            .match_header("X-SP-IDEMPOTENCY-KEY", "key-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        nodes(server.url(), "u1")
            .add_idempotent(&json!({ "type": "ACH-US" }), "key-1")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_with_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/u1/nodes")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("per_page".into(), "10".into()),
                Matcher::UrlEncoded("type".into(), "ACH-US".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"node_count":1,"nodes":[{"_id":"n1"}]}"#)
            .create_async()
            .await;

        let query = NodeQuery::new().with_page(2).with_per_page(10).with_type("ACH-US");
        let response = nodes(server.url(), "u1").get(None, &query).await.unwrap();
        assert_eq!(response["node_count"], 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_single_node() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/u1/nodes/n1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"_id":"n1"}"#)
            .create_async()
            .await;

        let response = nodes(server.url(), "u1")
            .get(Some("n1"), &NodeQuery::default())
            .await
            .unwrap();
        assert_eq!(response["_id"], "n1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_verify_micro_deposits_patches_node() {
        let mut server = Server::new_async().await;
        let payload = json!({ "micro": [0.1, 0.1] });
        let mock = server
            .mock("PATCH", "/users/u1/nodes/n1")
            .match_body(Matcher::Json(payload.clone()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"_id":"n1"}"#)
            .create_async()
            .await;

        nodes(server.url(), "u1")
            .verify(Some("n1"), &payload)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_verify_mfa_posts_collection() {
        let mut server = Server::new_async().await;
        let payload = json!({ "access_token": "token", "mfa_answer": "answer" });
        let mock = server
            .mock("POST", "/users/u1/nodes")
            .match_body(Matcher::Json(payload.clone()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        nodes(server.url(), "u1").verify(None, &payload).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/users/u1/nodes/n9")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"en":"Node not found"},"http_code":"404"}"#)
            .create_async()
            .await;

        let err = nodes(server.url(), "u1").delete("n9").await.unwrap_err();
        assert!(matches!(err, SynapseError::Api(_)));
        assert_eq!(err.message_en(), Some("Node not found"));
    }
}
