use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

pub mod release;
pub mod version;

pub use version::{GoVersion, ParseGoVersionError};

pub const DEFAULT_DL_URL: &str = "https://golang.org/dl/";

#[derive(Debug, Deserialize)]
pub struct UrlMirrorEntry {
    from: String,
    to: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlMirror {
    mirror: Vec<UrlMirrorEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub mirror: Option<UrlMirror>,
    pub dl_url: Option<String>,
}

pub struct HttpClient {
    mirror: UrlMirror,
    client_inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(mirror: UrlMirror) -> HttpClient {
        HttpClient {
            mirror,
            client_inner: reqwest::Client::new(),
        }
    }

    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        for entry in &self.mirror.mirror {
            if let Some(rest) = url.strip_prefix(&entry.from) {
                let mut result = String::with_capacity(entry.to.len() + rest.len());
                result.push_str(&entry.to);
                result.push_str(rest);
                log::debug!("Applying mirror {} => {}", url, result);
                return self.client_inner.get(result);
            }
        }

        self.client_inner.get(url)
    }
}

static CANCELLED: AtomicBool = AtomicBool::new(false);

pub fn set_cancelled() {
    CANCELLED.store(true, Ordering::Relaxed);
}

pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::Relaxed)
}

/// Resolves to `None` instead of the inner output once Ctrl-C has been received.
pub struct CancellableFuture<Fut> {
    inner: Pin<Box<Fut>>,
}

impl<Fut: Future> CancellableFuture<Fut> {
    pub fn new(inner: Fut) -> Self {
        CancellableFuture {
            inner: Box::pin(inner),
        }
    }
}

impl<Fut: Future> Future for CancellableFuture<Fut> {
    type Output = Option<Fut::Output>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if is_cancelled() {
            return Poll::Ready(None);
        }
        self.inner.as_mut().poll(cx).map(Some)
    }
}
