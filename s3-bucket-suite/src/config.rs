/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::Duration;

pub(crate) mod loader;

/// Default template used to generate the per-run bucket name prefix
pub const DEFAULT_BUCKET_PREFIX: &str = "s3-bucket-suite-{random}-";

/// Default upper bound on the time spent removing a single bucket during teardown
pub const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a [`Client`](crate::client::Client) and the
/// [`TestContext`](crate::context::TestContext) built on top of it
#[derive(Debug, Clone)]
pub struct Config {
    bucket_prefix: String,
    cleanup_timeout: Duration,
    client: aws_sdk_s3::client::Client,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the template used to generate bucket name prefixes.
    ///
    /// Occurrences of `{random}` are replaced with a random token for every test context.
    pub fn bucket_prefix(&self) -> &str {
        &self.bucket_prefix
    }

    /// Returns the upper bound on the time spent removing a single bucket during teardown
    pub fn cleanup_timeout(&self) -> Duration {
        self.cleanup_timeout
    }

    /// The Amazon S3 client instance that will be used to send requests to the service.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    bucket_prefix: Option<String>,
    cleanup_timeout: Option<Duration>,
    client: Option<aws_sdk_s3::Client>,
}

impl Builder {
    /// Template used to generate the per-run bucket name prefix.
    ///
    /// `{random}` is replaced with a random lowercase token; a template without it gets the
    /// token appended. Default is [`DEFAULT_BUCKET_PREFIX`].
    pub fn bucket_prefix(mut self, template: impl Into<String>) -> Self {
        self.bucket_prefix = Some(template.into());
        self
    }

    /// Upper bound on the time spent emptying and deleting a single bucket during teardown.
    ///
    /// Default is [`DEFAULT_CLEANUP_TIMEOUT`].
    pub fn cleanup_timeout(mut self, timeout: Duration) -> Self {
        self.cleanup_timeout = Some(timeout);
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Consumes the builder and constructs a [`Config`]
    pub fn build(self) -> Config {
        Config {
            bucket_prefix: self
                .bucket_prefix
                .unwrap_or_else(|| DEFAULT_BUCKET_PREFIX.to_owned()),
            cleanup_timeout: self.cleanup_timeout.unwrap_or(DEFAULT_CLEANUP_TIMEOUT),
            client: self.client.expect("client set"),
        }
    }
}
