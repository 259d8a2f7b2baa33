//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of [`HttpClient`] from `crate::traits`.

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{
    FormPart, Headers, HttpClient, HttpError, HttpRequest, Method, RequestBody, Response,
};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use sigmalite::adapters::ReqwestHttpClient;
/// use sigmalite::traits::{HttpClient, HttpRequest};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.execute(&HttpRequest::get("http://localhost:8000/")).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Self::convert_error)?;
        Ok(Self { client })
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidRequest(err.to_string())
        } else if err.is_body() || err.is_decode() {
            HttpError::Io(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn multipart_form(parts: &[FormPart]) -> Result<reqwest::multipart::Form, HttpError> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File {
                    name,
                    file_name,
                    content_type,
                    data,
                } => {
                    let mut file = reqwest::multipart::Part::bytes(data.to_vec())
                        .file_name(file_name.clone());
                    if let Some(mime) = content_type {
                        file = file
                            .mime_str(mime)
                            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
                    }
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }

    fn build(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, HttpError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };

        let mut builder = Self::apply_headers(builder, &request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => {
                let builder = if request.header("content-type").is_none() {
                    builder.header(reqwest::header::CONTENT_TYPE, "application/json")
                } else {
                    builder
                };
                builder.body(json.clone())
            }
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart(parts) => builder.multipart(Self::multipart_form(parts)?),
        };

        Ok(builder)
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        let builder = self.build(request)?;
        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_timeout() {
        assert!(ReqwestHttpClient::with_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        header_map.insert(reqwest::header::CONTENT_LENGTH, "100".parse().unwrap());

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("content-length"), Some(&"100".to_string()));
    }

    #[test]
    fn test_bad_mime_is_invalid_request() {
        let parts = vec![FormPart::file("file", "a.csv", Some("not a mime"), "x")];
        let result = ReqwestHttpClient::multipart_form(&parts);
        assert!(matches!(result, Err(HttpError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = ReqwestHttpClient::new();
        let result = client.execute(&HttpRequest::get("not-a-valid-url")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .execute(&HttpRequest::get("http://127.0.0.1:59999/test"))
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }
}
