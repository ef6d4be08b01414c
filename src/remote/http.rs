use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::header::{ ACCEPT, CONTENT_TYPE };
use reqwest::{ Client as HttpClient, StatusCode };
use serde::Serialize;
use url::Url;

use super::{ RemoteError, RemoteService };
use crate::models::wire::{ PushRequest, RegisterRequest, RegisterResponse };

#[derive(Debug, Clone)]
pub struct HttpRemoteService {
    http: HttpClient,
    base_url: Url,
}

impl HttpRemoteService {
    pub fn new(endpoint: &str) -> Result<Self, RemoteError> {
        let mut base_url = Url::parse(endpoint)?;
        // `join` replaces the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: HttpClient::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &T
    ) -> Result<reqwest::Response, RemoteError> {
        let url = self.base_url.join(route)?;
        debug!("POST {}", url);
        self.http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send().await
            .map_err(|e| RemoteError::Transport(e.to_string()))
    }
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, RemoteError> {
        let resp = self.post_json("token", request).await?;
        if resp.status() != StatusCode::OK {
            return Err(RemoteError::Rejected(resp.status().as_u16()));
        }
        let body = resp.text().await.map_err(|e| RemoteError::Transport(e.to_string()))?;
        serde_json::from_str::<RegisterResponse>(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn push(&self, request: &PushRequest) -> Result<(), RemoteError> {
        let resp = self.post_json("push", request).await?;
        if !resp.status().is_success() {
            warn!("Push answered with status {}", resp.status());
        }
        Ok(())
    }
}
