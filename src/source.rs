use async_trait::async_trait;

use crate::error::{BoardError, Result};
use crate::models::RemoteUser;
use crate::repository::StudentSource;

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Reads user records from a JSON endpoint with a single GET.
#[derive(Debug, Clone)]
pub struct HttpStudentSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStudentSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpStudentSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl StudentSource for HttpStudentSource {
    async fn fetch_users(&self) -> Result<Vec<RemoteUser>> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(BoardError::Unavailable(format!(
                "{} returned {}",
                self.endpoint, status
            )));
        }

        Ok(response.json::<Vec<RemoteUser>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_mock_api() {
        assert_eq!(HttpStudentSource::default().endpoint(), DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let source = HttpStudentSource::new("http://127.0.0.1:9/users");
        let err = source.fetch_users().await.unwrap_err();
        assert!(matches!(
            err,
            BoardError::Fetch(_) | BoardError::Unavailable(_)
        ));
    }
}
