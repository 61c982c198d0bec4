//! Repository Service
//!
//! Forwards repository-browsing requests to the backend.

use triage_client::{BackendClient, ClientError};
use triage_core::dto::repo::{RepoAnalysis, RepoLogs, RepoQuery, RepoSnippets};

/// Service error type
#[derive(Debug)]
pub enum RepoError {
    MissingRepo,
    Upstream(ClientError),
}

impl From<ClientError> for RepoError {
    fn from(err: ClientError) -> Self {
        RepoError::Upstream(err)
    }
}

pub type Result<T> = std::result::Result<T, RepoError>;

/// Get the analysis stored for a repository
pub async fn fetch_analysis(client: &BackendClient, query: &RepoQuery) -> Result<RepoAnalysis> {
    let repo = query.repo().ok_or(RepoError::MissingRepo)?;
    Ok(client.repo_analysis(repo).await?)
}

/// Get the code snippets stored for a repository
pub async fn fetch_snippets(client: &BackendClient, query: &RepoQuery) -> Result<RepoSnippets> {
    let repo = query.repo().ok_or(RepoError::MissingRepo)?;
    Ok(client.repo_code(repo).await?)
}

/// Get the logs stored for a repository
pub async fn fetch_logs(client: &BackendClient, query: &RepoQuery) -> Result<RepoLogs> {
    let repo = query.repo().ok_or(RepoError::MissingRepo)?;
    Ok(client.repo_logs(repo).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_repo_is_rejected_before_forwarding() {
        let client = BackendClient::new("http://127.0.0.1:9");

        let result = fetch_analysis(&client, &RepoQuery { repo: None }).await;
        assert!(matches!(result, Err(RepoError::MissingRepo)));

        let result = fetch_logs(
            &client,
            &RepoQuery {
                repo: Some("  ".to_string()),
            },
        )
        .await;
        assert!(matches!(result, Err(RepoError::MissingRepo)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_upstream_error() {
        let client = BackendClient::new("http://127.0.0.1:9");
        let query = RepoQuery {
            repo: Some("aro-service".to_string()),
        };

        let result = fetch_snippets(&client, &query).await;
        assert!(matches!(result, Err(RepoError::Upstream(_))));
    }
}
