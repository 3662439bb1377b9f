use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::ApiError;

/// Typed access to the hotel management API.
///
/// The bearer token is attached to every request once set; the client itself never decides
/// whether a token is still valid.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|value| !value.trim().is_empty());
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch(self.request(Method::GET, path)).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.dispatch(self.request(Method::GET, path).query(query))
            .await
    }

    pub(crate) async fn send<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(self.request(method, path).json(body)).await
    }

    pub(crate) async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        self.dispatch(self.request(method, path)).await
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ApiError::from_response(status, &body));
        }
        Ok(response.bytes().await?.to_vec())
    }

    pub(crate) async fn dispatch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;
        debug!(%status, path = %url, "api response");

        if !status.is_success() {
            return Err(ApiError::from_response(status, &body));
        }

        decode_body(&body)
    }
}

/// Empty bodies decode as JSON `null`, so unit and `Option` targets accept them.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = ApiClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url("/rooms/"), "http://127.0.0.1:8000/rooms/");
    }

    #[test]
    fn blank_tokens_are_not_attached() {
        let mut client = ApiClient::new("http://localhost");
        client.set_token(Some("   ".to_string()));
        assert_eq!(client.token(), None);
        client.set_token(Some("abc".to_string()));
        assert_eq!(client.token(), Some("abc"));
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let value: Option<u32> = decode_body("").expect("decodes");
        assert_eq!(value, None);
        let _: () = decode_body("  ").expect("unit decodes");
    }
}
