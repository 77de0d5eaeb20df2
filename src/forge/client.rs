//! GitHub REST API implementation

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::forge::error::ForgeError;
use crate::forge::types::{CommitAuthor, PullRequest, RepoFile};

/// Default base URL for the GitHub API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Contents {
    path: String,
    sha: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct Branch {
    commit: Commit,
}

#[derive(Debug, Deserialize)]
struct Commit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct BranchName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Client for the GitHub REST API.
pub struct ForgeClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ForgeClient {
    /// Creates a new ForgeClient with a custom base URL.
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("relbot")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            token: token.to_string(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
    }

    /// Map a response's status: 404 becomes `NotFound`, any other non-success
    /// status becomes `Status`. Everything else passes through.
    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, ForgeError> {
        let status = response.status();
        let url = response.url().to_string();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ForgeError::NotFound(url));
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(ForgeError::Status { status, url });
        }

        Ok(response)
    }

    async fn json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ForgeError> {
        let response = Self::checked(response).await?;
        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub API response: {}", e);
            ForgeError::InvalidResponse(e.to_string())
        })
    }

    /// The login of the user the token authenticates as.
    pub async fn authenticated_user(&self) -> Result<String, ForgeError> {
        let response = self
            .request(reqwest::Method::GET, "/user")
            .send()
            .await?;
        let user: User = Self::json(response).await?;
        Ok(user.login)
    }

    /// Read a file at the given ref, base64-decoded.
    pub async fn get_file(
        &self,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<RepoFile, ForgeError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/repos/{repo}/contents/{path}"),
            )
            .query(&[("ref", reference)])
            .send()
            .await?;
        let contents: Contents = Self::json(response).await?;

        // The contents API wraps base64 at 60 columns; strip the newlines
        // before decoding.
        let packed: String = contents.content.split_whitespace().collect();
        let decoded = BASE64
            .decode(packed)
            .map_err(|e| ForgeError::InvalidResponse(format!("invalid base64 content: {e}")))?;
        let content = String::from_utf8(decoded)
            .map_err(|e| ForgeError::InvalidResponse(format!("file is not UTF-8: {e}")))?;

        Ok(RepoFile {
            path: contents.path,
            sha: contents.sha,
            content,
        })
    }

    /// Write a file on the given branch. The prior blob sha rides along so a
    /// conflicting concurrent edit fails the write instead of being
    /// overwritten.
    pub async fn update_file(
        &self,
        repo: &str,
        file: &RepoFile,
        new_content: &str,
        message: &str,
        branch: &str,
        author: &CommitAuthor,
    ) -> Result<(), ForgeError> {
        let body = json!({
            "message": message,
            "content": BASE64.encode(new_content),
            "sha": file.sha,
            "branch": branch,
            "author": {
                "name": author.name,
                "email": author.email,
            },
        });
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/repos/{repo}/contents/{}", file.path),
            )
            .json(&body)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// Whether a branch exists. A well-defined not-found signal is `false`;
    /// any other failure propagates.
    pub async fn branch_exists(&self, repo: &str, name: &str) -> Result<bool, ForgeError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/repos/{repo}/branches/{name}"),
            )
            .send()
            .await?;
        match Self::checked(response).await {
            Ok(_) => Ok(true),
            Err(ForgeError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The tip commit sha of a branch.
    pub async fn branch_head(&self, repo: &str, name: &str) -> Result<String, ForgeError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/repos/{repo}/branches/{name}"),
            )
            .send()
            .await?;
        let branch: Branch = Self::json(response).await?;
        Ok(branch.commit.sha)
    }

    /// Create a branch pointing at the given commit.
    pub async fn create_branch(
        &self,
        repo: &str,
        name: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        let body = json!({
            "ref": format!("refs/heads/{name}"),
            "sha": sha,
        });
        let response = self
            .request(reqwest::Method::POST, &format!("/repos/{repo}/git/refs"))
            .json(&body)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// Open a pull request.
    pub async fn create_pull(
        &self,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<PullRequest, ForgeError> {
        let payload = json!({
            "title": title,
            "body": body,
            "head": head,
            "base": base,
        });
        let response = self
            .request(reqwest::Method::POST, &format!("/repos/{repo}/pulls"))
            .json(&payload)
            .send()
            .await?;
        Self::json(response).await
    }

    /// Comment on an issue or pull request.
    pub async fn create_issue_comment(
        &self,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ForgeError> {
        let payload = json!({ "body": body });
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/repos/{repo}/issues/{number}/comments"),
            )
            .json(&payload)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// All branch names of a repository.
    pub async fn list_branches(&self, repo: &str) -> Result<Vec<String>, ForgeError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/repos/{repo}/branches"))
            .query(&[("per_page", "100")])
            .send()
            .await?;
        let branches: Vec<BranchName> = Self::json(response).await?;
        Ok(branches.into_iter().map(|branch| branch.name).collect())
    }

    /// Tags of the most recent releases, newest first.
    pub async fn list_release_tags(&self, repo: &str) -> Result<Vec<String>, ForgeError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/repos/{repo}/releases"))
            .query(&[("per_page", "50")])
            .send()
            .await?;
        let releases: Vec<Release> = Self::json(response).await?;
        Ok(releases.into_iter().map(|release| release.tag_name).collect())
    }

    /// Create a tag and release at the given commit.
    pub async fn create_release(
        &self,
        repo: &str,
        tag: &str,
        name: &str,
        body: &str,
        target_sha: &str,
    ) -> Result<(), ForgeError> {
        let payload = json!({
            "tag_name": tag,
            "target_commitish": target_sha,
            "name": name,
            "body": body,
        });
        let response = self
            .request(reqwest::Method::POST, &format!("/repos/{repo}/releases"))
            .json(&payload)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(server: &Server) -> ForgeClient {
        ForgeClient::new(&server.url(), "test-token")
    }

    #[tokio::test]
    async fn authenticated_user_returns_the_login() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(r#"{"login": "MickeyMoz"}"#)
            .create_async()
            .await;

        let user = client(&server).authenticated_user().await.unwrap();

        mock.assert_async().await;
        assert_eq!(user, "MickeyMoz");
    }

    #[tokio::test]
    async fn get_file_decodes_wrapped_base64_content() {
        let mut server = Server::new_async().await;
        // "73.0.12\n" encoded and wrapped the way the contents API wraps it
        let mock = server
            .mock("GET", "/repos/org/repo/contents/version.txt")
            .match_query(Matcher::UrlEncoded("ref".into(), "releases_v73".into()))
            .with_status(200)
            .with_body(r#"{"path": "version.txt", "sha": "abc123", "content": "NzMuMC4x\nMgo=\n"}"#)
            .create_async()
            .await;

        let file = client(&server)
            .get_file("org/repo", "version.txt", "releases_v73")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(file.content, "73.0.12\n");
        assert_eq!(file.sha, "abc123");
        assert_eq!(file.path, "version.txt");
    }

    #[tokio::test]
    async fn get_file_maps_missing_files_to_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/org/repo/contents/version.txt")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let result = client(&server)
            .get_file("org/repo", "version.txt", "main")
            .await;

        assert!(matches!(result, Err(ForgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_file_sends_the_prior_blob_sha_and_author() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/repos/org/repo/contents/version.txt")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({"sha": "abc123"})),
                Matcher::PartialJson(
                    serde_json::json!({"author": {"name": "MickeyMoz", "email": "bot@example.com"}}),
                ),
                Matcher::PartialJson(serde_json::json!({"branch": "relbot/work"})),
            ]))
            .with_status(200)
            .with_body(r#"{"content": {}}"#)
            .create_async()
            .await;

        let file = RepoFile {
            path: "version.txt".to_string(),
            sha: "abc123".to_string(),
            content: "73.0.12\n".to_string(),
        };
        let author = CommitAuthor {
            name: "MickeyMoz".to_string(),
            email: "bot@example.com".to_string(),
        };

        client(&server)
            .update_file(
                "org/repo",
                &file,
                "73.0.13\n",
                "Set version.txt to 73.0.13.",
                "relbot/work",
                &author,
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn branch_exists_distinguishes_the_three_cases() {
        let mut server = Server::new_async().await;
        let _present = server
            .mock("GET", "/repos/org/repo/branches/main")
            .with_status(200)
            .with_body(r#"{"name": "main", "commit": {"sha": "abc"}}"#)
            .create_async()
            .await;
        let _absent = server
            .mock("GET", "/repos/org/repo/branches/gone")
            .with_status(404)
            .with_body(r#"{"message": "Branch not found"}"#)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/repos/org/repo/branches/boom")
            .with_status(500)
            .create_async()
            .await;

        let forge = client(&server);
        assert!(forge.branch_exists("org/repo", "main").await.unwrap());
        assert!(!forge.branch_exists("org/repo", "gone").await.unwrap());
        assert!(matches!(
            forge.branch_exists("org/repo", "boom").await,
            Err(ForgeError::Status { .. })
        ));
    }

    #[tokio::test]
    async fn branch_head_returns_the_tip_commit() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/org/repo/branches/releases_v110")
            .with_status(200)
            .with_body(r#"{"name": "releases_v110", "commit": {"sha": "deadbeef"}}"#)
            .create_async()
            .await;

        let sha = client(&server)
            .branch_head("org/repo", "releases_v110")
            .await
            .unwrap();

        assert_eq!(sha, "deadbeef");
    }

    #[tokio::test]
    async fn create_branch_posts_a_fully_qualified_ref() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/repos/org/repo/git/refs")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "ref": "refs/heads/relbot/work",
                "sha": "deadbeef",
            })))
            .with_status(201)
            .with_body(r#"{"ref": "refs/heads/relbot/work"}"#)
            .create_async()
            .await;

        client(&server)
            .create_branch("org/repo", "relbot/work", "deadbeef")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_pull_returns_number_and_url() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/repos/org/repo/pulls")
            .with_status(201)
            .with_body(r#"{"number": 42, "html_url": "https://github.com/org/repo/pull/42"}"#)
            .create_async()
            .await;

        let pr = client(&server)
            .create_pull("org/repo", "title", "body", "head", "base")
            .await
            .unwrap();

        assert_eq!(pr.number, 42);
        assert_eq!(pr.html_url, "https://github.com/org/repo/pull/42");
    }

    #[tokio::test]
    async fn list_release_tags_extracts_tag_names() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/org/repo/releases")
            .match_query(Matcher::UrlEncoded("per_page".into(), "50".into()))
            .with_status(200)
            .with_body(r#"[{"tag_name": "v73.0.12"}, {"tag_name": "v73.0.11"}]"#)
            .create_async()
            .await;

        let tags = client(&server).list_release_tags("org/repo").await.unwrap();

        assert_eq!(tags, vec!["v73.0.12", "v73.0.11"]);
    }
}
