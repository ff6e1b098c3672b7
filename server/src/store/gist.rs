//! GitHub gist backed document store.
//!
//! The document is one file inside a gist. Reading takes two requests: the
//! gist metadata (for the file's `raw_url` and revision), then the raw file.
//! Writing patches the gist with the new file content and the revision it
//! was computed from.

use super::{DocumentStore, StoreError, StoreResult};
use crate::config::GistConfig;
use answerbook_engine::{decode_records, encode_records, Record, Revision, Snapshot};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// User agent sent to GitHub, which rejects requests without one.
const USER_AGENT: &str = concat!("answerbook-server/", env!("CARGO_PKG_VERSION"));

/// Gist metadata, reduced to what the store needs.
#[derive(Debug, Deserialize)]
struct GistResponse {
    #[serde(default)]
    files: HashMap<String, Option<GistFile>>,
    #[serde(default)]
    history: Vec<GistHistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    raw_url: Option<String>,
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GistHistoryEntry {
    version: Option<String>,
}

/// Where the document lives and which revision it is at.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileLocation {
    raw_url: String,
    revision: Revision,
}

/// Body of the gist update request.
#[derive(Debug, Serialize)]
struct GistPatch<'a> {
    description: String,
    files: HashMap<&'a str, FilePatch<'a>>,
}

#[derive(Debug, Serialize)]
struct FilePatch<'a> {
    content: String,
    sha: &'a str,
}

/// Document store backed by a file in a GitHub gist.
#[derive(Debug, Clone)]
pub struct GistStore {
    http: reqwest::Client,
    config: GistConfig,
}

impl GistStore {
    /// Create a store for `config`; every request is bounded by `timeout`.
    pub fn new(config: GistConfig, timeout: Duration) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn gist_url(&self) -> String {
        format!(
            "{}/gists/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.gist_id
        )
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.config.token)
    }

    async fn fetch_location(&self) -> StoreResult<FileLocation> {
        tracing::debug!(gist_id = %self.config.gist_id, "fetching gist metadata");

        let resp = self
            .http
            .get(self.gist_url())
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| transport_error("Failed to fetch gist", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "Failed to fetch gist: {}",
                status.as_u16()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| transport_error("Failed to fetch gist", e))?;
        let gist: GistResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::Malformed(format!("Failed to decode gist: {}", e)))?;

        locate_file(gist, &self.config.file_name)
    }

    async fn fetch_content(&self, raw_url: &str) -> StoreResult<String> {
        tracing::debug!(%raw_url, "fetching gist file content");

        let resp = self
            .http
            .get(raw_url)
            .send()
            .await
            .map_err(|e| transport_error("Failed to fetch raw", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "Failed to fetch raw: {}",
                status.as_u16()
            )));
        }

        resp.text()
            .await
            .map_err(|e| transport_error("Failed to fetch raw", e))
    }
}

#[async_trait]
impl DocumentStore for GistStore {
    fn name(&self) -> &'static str {
        "gist"
    }

    async fn read(&self) -> StoreResult<Snapshot> {
        let location = self.fetch_location().await?;
        let content = self.fetch_content(&location.raw_url).await?;

        let records = decode_records(&content).map_err(|e| {
            StoreError::Malformed(format!("{}: {}", self.config.file_name, e))
        })?;

        Ok(Snapshot::new(records, location.revision))
    }

    async fn write_if_revision_matches(
        &self,
        records: &[Record],
        revision: &Revision,
    ) -> StoreResult<()> {
        let content = encode_records(records)
            .map_err(|e| StoreError::Malformed(format!("{}: {}", self.config.file_name, e)))?;

        let mut files = HashMap::new();
        files.insert(
            self.config.file_name.as_str(),
            FilePatch {
                content,
                sha: revision.as_str(),
            },
        );
        let payload = GistPatch {
            description: format!("Update {}", self.config.file_name),
            files,
        };

        tracing::debug!(
            gist_id = %self.config.gist_id,
            %revision,
            records = records.len(),
            "updating gist"
        );

        let resp = self
            .http
            .patch(self.gist_url())
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/vnd.github+json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error("Failed to update gist", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "Failed to update gist: {}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}

/// Pick the document out of the gist listing.
///
/// The revision is the file's `sha` when GitHub reports one, otherwise the
/// gist's latest history version.
fn locate_file(gist: GistResponse, file_name: &str) -> StoreResult<FileLocation> {
    let not_found = || StoreError::Malformed(format!("{} not found", file_name));

    let GistResponse { mut files, history } = gist;
    let file = files.remove(file_name).flatten().ok_or_else(not_found)?;
    let raw_url = file.raw_url.ok_or_else(not_found)?;

    let revision = file
        .sha
        .or_else(|| history.into_iter().next().and_then(|h| h.version))
        .ok_or_else(|| StoreError::Malformed(format!("{} has no revision", file_name)))?;

    Ok(FileLocation {
        raw_url,
        revision: Revision::new(revision),
    })
}

fn transport_error(context: &str, e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Unavailable(format!("{}: request timed out", context))
    } else {
        StoreError::Unavailable(format!("{}: {}", context, e))
    }
}
