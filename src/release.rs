use anyhow::Context;
use serde::Deserialize;
use smol_str::SmolStr;

use crate::version::{GoVersion, ParseGoVersionError};
use crate::HttpClient;

/// One entry of the `?mode=json` release listing.
#[derive(Debug, Deserialize)]
pub struct ReleaseRecord {
    pub version: SmolStr,
    pub stable: bool,
    #[serde(default)]
    pub files: Vec<ReleaseFile>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseFile {
    pub filename: String,
    #[serde(default)]
    pub os: SmolStr,
    #[serde(default)]
    pub arch: SmolStr,
    #[serde(default)]
    pub version: SmolStr,
    #[serde(default)]
    pub sha256: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub kind: SmolStr,
}

const MAX_ERROR_BODY_LEN: usize = 1 << 17;

fn truncate_at_char_boundary(s: &mut String, max_len: usize) {
    if s.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

pub async fn fetch_releases(
    client: &HttpClient,
    dl_url: &str,
    include_all: bool,
) -> anyhow::Result<Vec<ReleaseRecord>> {
    let mut query = vec![("mode", "json")];
    if include_all {
        query.push(("include", "all"));
    }
    log::debug!("Fetching Go releases from {} (include_all: {})", dl_url, include_all);

    let response = client
        .get(dl_url)
        .query(&query)
        .send()
        .await
        .with_context(|| format!("Failed to get {}", dl_url))?;

    let status = response.error_for_status_ref().map(|_| ());
    if let Err(e) = status {
        let mut body = response.text().await.unwrap_or_default();
        truncate_at_char_boundary(&mut body, MAX_ERROR_BODY_LEN);
        return Err(anyhow::Error::new(e).context(format!("Server responded with:\n{}", body)));
    }

    let releases: Vec<ReleaseRecord> = response
        .json()
        .await
        .context("Failed to parse releases")?;

    log::trace!("Fetched {} releases", releases.len());
    Ok(releases)
}

/// Whether a raw version string carries a `beta` or `rc` marker.
pub fn is_pre_release(version: &str) -> bool {
    version.contains("beta") || version.contains("rc")
}

/// Finds the greatest pre-release among `versions`, skipping stable ones.
///
/// Returns `GoVersion::default()` when there is no pre-release. The first pre-release string
/// that fails to parse aborts the scan.
pub fn newest_pre_release<'a, I>(versions: I) -> Result<GoVersion, ParseGoVersionError>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .filter(|v| is_pre_release(v))
        .try_fold(GoVersion::default(), |max, v| {
            let parsed = v.parse::<GoVersion>()?;
            Ok(if max < parsed { parsed } else { max })
        })
}

pub async fn list_versions(
    client: &HttpClient,
    dl_url: &str,
    include_all: bool,
) -> anyhow::Result<Vec<SmolStr>> {
    let releases = fetch_releases(client, dl_url, include_all).await?;
    Ok(releases.into_iter().map(|r| r.version).collect())
}

pub async fn next_pre_release(client: &HttpClient, dl_url: &str) -> anyhow::Result<GoVersion> {
    let releases = fetch_releases(client, dl_url, true).await?;
    let newest = newest_pre_release(releases.iter().map(|r| r.version.as_str()))?;
    Ok(newest)
}
