// src/fetch/mod.rs

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use crate::error::{RatesError, Result};

pub mod index;
pub mod tables;

pub use index::TableLocator;
pub use tables::TableFetcher;

/// Somewhere named resources (index files, table documents) can be read from.
pub trait RemoteSource {
    /// Read the whole resource `name`. The body is fully consumed before returning.
    fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

impl<S: RemoteSource + ?Sized> RemoteSource for &S {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        (**self).fetch(name)
    }
}

/// Blocking HTTP access to the publisher's folder.
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// `base` must end in `/` so names resolve inside the folder.
    ///
    /// `read_timeout` is not a per-read socket limit: the blocking client
    /// only supports one deadline for the whole request, set to
    /// `connect_timeout + read_timeout`. A slow but steady download that
    /// outlasts it fails.
    pub fn new(base: Url, connect_timeout: Duration, read_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(connect_timeout + read_timeout)
            .build()
            .map_err(|e| RatesError::Init(format!("building HTTP client: {e}")))?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, name: &str) -> Result<Url> {
        self.base
            .join(name)
            .map_err(|e| RatesError::io(format!("{}{}", self.base, name), e))
    }
}

impl RemoteSource for HttpSource {
    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.url_for(name)?;
        debug!(%url, "GET");
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|e| RatesError::io(url.as_str(), e))?;
        trace!(%url, len = bytes.len(), "received body");
        Ok(bytes.to_vec())
    }
}
