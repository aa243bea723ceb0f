use anyhow::{Result, anyhow, Context};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin client over the Supabase REST gateway.
///
/// Every call forwards the caller's access token so row-level policies in
/// the store decide what the caller may read or write.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn build_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key).context("anon key is not a valid header value")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("access token is not a valid header value")?,
            );
        }

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.build_headers(auth_token)?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Supabase error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Header asking PostgREST to echo written rows back in the response.
pub fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> AppConfig {
        AppConfig {
            supabase_url: url.to_string(),
            supabase_anon_key: "anon".to_string(),
            supabase_jwt_secret: "secret".to_string(),
            question_bank_path: None,
            port: 3000,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SupabaseClient::new(&config("http://localhost:54321/"));
        assert_eq!(client.base_url(), "http://localhost:54321");
    }

    #[test]
    fn test_headers_include_bearer_token() {
        let client = SupabaseClient::new(&config("http://localhost:54321"));
        let headers = client.build_headers(Some("abc")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(headers.get("apikey").unwrap(), "anon");
    }

    #[test]
    fn test_headers_reject_invalid_token() {
        let client = SupabaseClient::new(&config("http://localhost:54321"));
        assert!(client.build_headers(Some("bad\ntoken")).is_err());
    }
}
