//! Remote user directory: record models, the `UserApi` port, and the
//! reqwest-backed adapter.
//!
//! The adapter owns transport details only: URL building, status checks,
//! and JSON decoding. The fixture endpoint it targets by default
//! (jsonplaceholder) echoes writes without persisting them, which is why
//! the store layer rewrites created ids locally.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Record identifier. Remote-assigned for fetched records, derived from
/// creation time for locally created ones.
pub type UserId = u64;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

/// Postal fields of a user record. Free text, empty when absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
}

/// Employer field of a user record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
}

/// One person record as held in the collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

/// Candidate record sent on create; the remote side assigns the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: Address,
    pub company: Company,
}

/// Port to the remote user collection.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /users`: the full collection.
    async fn list_users(&self) -> Result<Vec<User>>;
    /// `POST /users`: send a candidate, receive the echoed/created record.
    async fn create_user(&self, candidate: &NewUser) -> Result<User>;
    /// `PUT /users/{id}`: send the full record; the response body is ignored.
    async fn update_user(&self, record: &User) -> Result<()>;
    /// `DELETE /users/{id}`.
    async fn delete_user(&self, id: UserId) -> Result<()>;
}

/// Reqwest-backed [`UserApi`] adapter for a REST-style `/users` collection.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base: Url,
}

impl RestClient {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn collection_url(&self) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users");
        }
        url
    }

    fn record_url(&self, id: UserId) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(&id.to_string());
        }
        url
    }
}

fn check_status(endpoint: &Url, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status,
        })
    }
}

fn transport(endpoint: &Url, source: reqwest::Error) -> ApiError {
    ApiError::Transport {
        endpoint: endpoint.to_string(),
        source,
    }
}

fn decode(endpoint: &Url, source: reqwest::Error) -> ApiError {
    ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    }
}

#[async_trait]
impl UserApi for RestClient {
    async fn list_users(&self) -> Result<Vec<User>> {
        let url = self.collection_url();
        tracing::debug!(%url, "fetching user collection");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        let response = check_status(&url, response)?;
        response.json::<Vec<User>>().await.map_err(|e| decode(&url, e))
    }

    async fn create_user(&self, candidate: &NewUser) -> Result<User> {
        let url = self.collection_url();
        tracing::debug!(%url, name = %candidate.name, "creating user");
        let response = self
            .client
            .post(url.clone())
            .json(candidate)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        let response = check_status(&url, response)?;
        response.json::<User>().await.map_err(|e| decode(&url, e))
    }

    async fn update_user(&self, record: &User) -> Result<()> {
        let url = self.record_url(record.id);
        tracing::debug!(%url, "updating user");
        let response = self
            .client
            .put(url.clone())
            .json(record)
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        check_status(&url, response)?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let url = self.record_url(id);
        tracing::debug!(%url, "deleting user");
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        check_status(&url, response)?;
        Ok(())
    }
}
