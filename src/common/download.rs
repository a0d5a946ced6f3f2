use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{blocking::Client, redirect::Policy, StatusCode};
use serde::de::DeserializeOwned;

use super::io::PendingWrite;

const USER_AGENT: &str = concat!("admlink/", env!("CARGO_PKG_VERSION"));

/// Download a large file from `file_url` to `out_path`.
/// Safe big-file write (tempfile -> atomic rename), no accidental overwrite unless `force`.
pub fn download_big_file(file_url: &str, out_path: &Path, force: bool) -> Result<()> {
    let mut sink = PendingWrite::open(out_path, force)?;

    let mut resp = reqwest::blocking::get(file_url)
        .with_context(|| format!("GET {file_url}"))?
        .error_for_status()
        .with_context(|| format!("GET {file_url} returned error status"))?;

    std::io::copy(&mut resp, &mut sink)
        .with_context(|| format!("write {}", out_path.display()))?;

    sink.finalize()?;
    Ok(())
}

/// Fetch and deserialize a small JSON document from `url`.
pub fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    let body = reqwest::blocking::get(url)
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url} returned error status"))?
        .text()
        .with_context(|| format!("read body of {url}"))?;

    serde_json::from_str(&body).with_context(|| format!("parse JSON from {url}"))
}

/// Lightweight existence check for a remote file.
/// Returns Ok(true) if it exists, Ok(false) if it's 404/410, Err(_) otherwise.
pub fn remote_file_exists(url: &str) -> Result<bool> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(5))
        .timeout(Duration::from_secs(30))
        .build()
        .context("build http client")?;

    let resp = client.head(url).send().with_context(|| format!("HEAD {url}"))?;
    match resp.status() {
        StatusCode::NOT_FOUND | StatusCode::GONE => Ok(false),
        status if status.is_success() => Ok(true),
        status => anyhow::bail!("HEAD {url} returned unexpected status {status}"),
    }
}
