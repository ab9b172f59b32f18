//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.
#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Raw endpoints
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn get_songs(&self) -> Response {
        self.client
            .get(format!("{}/songs", self.base_url))
            .send()
            .await
            .expect("Songs request failed")
    }

    /// POSTs an arbitrary body, with no content type, to `path`
    pub async fn post_raw(&self, path: &str, body: &str) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .body(body.to_owned())
            .send()
            .await
            .expect("Raw request failed")
    }

    pub async fn recommend(&self, song: &str) -> Response {
        self.client
            .post(format!("{}/recommend", self.base_url))
            .json(&json!({ "song": song }))
            .send()
            .await
            .expect("Recommend request failed")
    }

    pub async fn recommend_by_mood(&self, mood: &str) -> Response {
        self.client
            .post(format!("{}/recommend_by_mood", self.base_url))
            .json(&json!({ "mood": mood }))
            .send()
            .await
            .expect("Recommend by mood request failed")
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// The "recommendations" array of a successful response
    pub async fn recommendations(response: Response) -> Vec<Value> {
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Invalid JSON response");
        body["recommendations"]
            .as_array()
            .expect("Missing recommendations array")
            .clone()
    }

    pub async fn recommend_ids(&self, song: &str) -> Vec<String> {
        Self::ids(Self::recommendations(self.recommend(song).await).await)
    }

    pub async fn recommend_by_mood_ids(&self, mood: &str) -> Vec<String> {
        Self::ids(Self::recommendations(self.recommend_by_mood(mood).await).await)
    }

    fn ids(recommendations: Vec<Value>) -> Vec<String> {
        recommendations
            .iter()
            .map(|r| match &r["track_id"] {
                Value::String(id) => id.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}
