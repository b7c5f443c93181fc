/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aws_smithy_types::error::display::DisplayErrorContext;
use futures_util::FutureExt;

use crate::client::Client;
use crate::error::Error;
use crate::naming;
use crate::types::{HeaderOverrides, TeardownSummary};
use crate::Config;

/// Fixture shared by the statements of a single test.
///
/// A context owns a configured [`Client`] and a bucket name prefix that is unique to it.
/// Every bucket handed out by [`bucket_name`](TestContext::bucket_name) starts with that
/// prefix, which is how [`tear_down`](TestContext::tear_down) finds the buckets to remove.
/// Contexts are independent of each other, so tests using separate contexts can run in
/// parallel against the same account.
#[derive(Debug, Clone)]
pub struct TestContext {
    client: Client,
    prefix: Arc<str>,
    next_seq: Arc<AtomicUsize>,
}

impl TestContext {
    /// Create a context with a freshly generated prefix rendered from the config's template
    pub fn new(config: Config) -> Result<Self, Error> {
        let prefix = naming::generate_prefix(config.bucket_prefix())?;
        Ok(Self::from_parts(Client::new(config), prefix))
    }

    /// Create a context for an explicit prefix, e.g. to clean up after an aborted run
    pub fn with_prefix(config: Config, prefix: impl Into<String>) -> Result<Self, Error> {
        let prefix = prefix.into();
        naming::validate_prefix(&prefix)?;
        Ok(Self::from_parts(Client::new(config), prefix))
    }

    /// Create a context from configuration loaded from the environment
    pub async fn from_env() -> Result<Self, Error> {
        Self::new(crate::from_env().load().await)
    }

    fn from_parts(client: Client, prefix: String) -> Self {
        tracing::debug!("test context using bucket prefix {prefix}");
        Self {
            client,
            prefix: prefix.into(),
            next_seq: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// The client to run test statements with
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The bucket name prefix unique to this context
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A bucket name that has not been handed out by this context before
    pub fn bucket_name(&self) -> String {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        naming::bucket_name(&self.prefix, seq)
    }

    /// Create a bucket with a fresh name and return the name
    pub async fn create_bucket(&self) -> Result<String, Error> {
        let bucket = self.bucket_name();
        self.client
            .create_bucket(&bucket, &HeaderOverrides::default())
            .await?;
        Ok(bucket)
    }

    /// Empty and delete every bucket whose name starts with this context's prefix.
    ///
    /// Failures are logged and recorded in the returned summary, never propagated, so that a
    /// failing cleanup does not hide the outcome of the test itself. Listing the buckets and
    /// removing each bucket are each bounded by the configured cleanup timeout.
    pub async fn tear_down(&self) -> TeardownSummary {
        let mut summary = TeardownSummary::default();
        let timeout = self.client.config().cleanup_timeout();

        let listed = tokio::time::timeout(timeout, self.client.list_buckets())
            .await
            .map_err(Error::from)
            .and_then(|listed| listed);
        let buckets: Vec<String> = match listed {
            Ok(names) => names
                .into_iter()
                .filter(|name| name.starts_with(self.prefix()))
                .collect(),
            Err(err) => {
                tracing::warn!(
                    "unable to list buckets for prefix {}: {}",
                    self.prefix,
                    DisplayErrorContext(&err)
                );
                summary
                    .failed
                    .push((self.prefix.to_string(), err.to_string()));
                return summary;
            }
        };

        for bucket in buckets {
            let outcome = tokio::time::timeout(timeout, self.remove_bucket(&bucket))
                .await
                .map_err(Error::from)
                .and_then(|removed| removed);

            match outcome {
                Ok(()) => summary.removed.push(bucket),
                Err(err) => {
                    tracing::warn!(
                        "failed to remove bucket {bucket}: {}",
                        DisplayErrorContext(&err)
                    );
                    summary.failed.push((bucket, err.to_string()));
                }
            }
        }

        tracing::info!(
            "teardown of prefix {}: removed {} bucket(s), {} failure(s)",
            self.prefix,
            summary.removed.len(),
            summary.failed.len()
        );
        summary
    }

    async fn remove_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.client.empty_bucket(bucket).await?;
        match self.client.delete_bucket(bucket).await {
            Err(err) if err.is_code("NoSuchBucket") => Ok(()),
            other => other,
        }
    }

    /// Run a test body against this context and tear down afterwards.
    ///
    /// Teardown runs whether the body returns or panics; a panic is resumed once teardown
    /// is done so the test still fails.
    pub async fn run<F, Fut>(self, scenario: F)
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = ()>,
    {
        let outcome = AssertUnwindSafe(scenario(self.clone()))
            .catch_unwind()
            .await;

        self.tear_down().await;

        if let Err(panic) = outcome {
            std::panic::resume_unwind(panic);
        }
    }
}
