//! HTTP Record Service
//!
//! REST client for the remote record service.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{CardPatch, ColumnPatch, RecordService};
use crate::error::{BoardError, Result};
use crate::models::{Card, CardId, Column, ColumnId};

/// Record service reached over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpRecordService {
    client: Client,
    base_url: String,
}

impl HttpRecordService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    async fn send(&self, method: Method, url: String, body: Option<String>) -> Result<String> {
        debug!(%method, %url, "record service request");
        let mut request = self.request(method.clone(), &url);
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BoardError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<T> {
        let text = self.send(method, url, body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn json_body<T: Serialize>(value: &T) -> Result<Option<String>> {
    Ok(Some(serde_json::to_string(value)?))
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn list_columns(&self) -> Result<Vec<Column>> {
        self.send_json(Method::GET, self.url("columns"), None).await
    }

    async fn create_column(&self, column: &Column) -> Result<Column> {
        self.send_json(Method::POST, self.url("columns"), json_body(column)?)
            .await
    }

    async fn patch_column(&self, id: &ColumnId, patch: &ColumnPatch) -> Result<Column> {
        self.send_json(
            Method::PATCH,
            self.url(&format!("columns/{}", id)),
            json_body(patch)?,
        )
        .await
    }

    async fn delete_column(&self, id: &ColumnId) -> Result<()> {
        self.send(Method::DELETE, self.url(&format!("columns/{}", id)), None)
            .await?;
        Ok(())
    }

    async fn list_cards(&self) -> Result<Vec<Card>> {
        self.send_json(Method::GET, self.url("cards"), None).await
    }

    async fn create_card(&self, card: &Card) -> Result<Card> {
        self.send_json(Method::POST, self.url("cards"), json_body(card)?)
            .await
    }

    async fn patch_card(&self, id: &CardId, patch: &CardPatch) -> Result<Card> {
        self.send_json(
            Method::PATCH,
            self.url(&format!("cards/{}", id)),
            json_body(patch)?,
        )
        .await
    }

    async fn delete_card(&self, id: &CardId) -> Result<()> {
        self.send(Method::DELETE, self.url(&format!("cards/{}", id)), None)
            .await?;
        Ok(())
    }
}
