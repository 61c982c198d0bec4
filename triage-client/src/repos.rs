//! Repository-browsing endpoints

use crate::BackendClient;
use crate::error::{ClientError, Result};
use triage_core::dto::repo::{RepoAnalysis, RepoLogs, RepoSnippets};

impl BackendClient {
    /// Get the stored analysis for a repository
    pub async fn repo_analysis(&self, repo: &str) -> Result<RepoAnalysis> {
        self.get_repo("analysis", repo).await
    }

    /// Get code snippets for a repository
    pub async fn repo_code(&self, repo: &str) -> Result<RepoSnippets> {
        self.get_repo("code", repo).await
    }

    /// Get logs for a repository
    pub async fn repo_logs(&self, repo: &str) -> Result<RepoLogs> {
        self.get_repo("logs", repo).await
    }

    async fn get_repo<T: serde::de::DeserializeOwned>(&self, route: &str, repo: &str) -> Result<T> {
        if repo.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "Repository is required".to_string(),
            ));
        }

        let url = format!("{}/{}", self.base_url, route);
        let response = self.client.get(&url).query(&[("repo", repo)]).send().await?;

        self.handle_response(response).await
    }
}
