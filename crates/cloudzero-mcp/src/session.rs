//! Session lifecycle: acquire the API client, probe it, release it once.

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::api::{ApiRequest, BillingApi, CloudZeroApi, DIMENSIONS_PATH};
use crate::config::Config;
use crate::error::CloudZeroError;

/// A started session holding the API client.
///
/// The connection is released exactly once: by [`Session::end`], or by
/// `Drop` on any other exit path, including a failed startup probe.
pub struct Session<A: BillingApi + ?Sized = dyn BillingApi> {
    api: Arc<A>,
    released: bool,
}

impl Session<CloudZeroApi> {
    /// Build the client from configuration and start a session with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or the liveness probe
    /// fails.
    pub async fn open(config: &Config) -> Result<Self, CloudZeroError> {
        let api = CloudZeroApi::from_config(config)?;
        Self::start(Arc::new(api)).await
    }
}

impl<A: BillingApi + ?Sized> Session<A> {
    /// Start a session: probe `billing/dimensions` once.
    ///
    /// The probe is not retried. On failure the client is closed before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns the probe's error unchanged.
    pub async fn start(api: Arc<A>) -> Result<Self, CloudZeroError> {
        let mut session = Self {
            api,
            released: false,
        };

        if let Err(e) = session.api.request(ApiRequest::get(DIMENSIONS_PATH)).await {
            error!(error = %e, "CloudZero liveness probe failed");
            session.release();
            return Err(e);
        }

        info!("CloudZero session started");
        Ok(session)
    }

    /// Run `body` inside a session, ending it whatever the body returns.
    ///
    /// # Errors
    ///
    /// Returns the startup error, or whatever `body` returns.
    pub async fn scope<F, Fut, T, E>(api: Arc<A>, body: F) -> Result<T, E>
    where
        F: FnOnce(Arc<A>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CloudZeroError>,
    {
        let session = Self::start(api).await?;
        let result = body(session.api()).await;
        session.end();
        result
    }

    /// Shared handle to the client for the duration of the session.
    #[must_use]
    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    /// End the session and release the connection.
    pub fn end(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.api.close();
            info!("CloudZero session ended");
        }
    }
}

impl<A: BillingApi + ?Sized> Drop for Session<A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<A: BillingApi + ?Sized> std::fmt::Debug for Session<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
