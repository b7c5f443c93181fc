/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::config::{
    Credentials, RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_types::region::Region;

use crate::config::Builder;
use crate::Config;

/// Environment variable holding the bucket prefix template
pub(crate) const BUCKET_PREFIX_ENV: &str = "S3_SUITE_BUCKET_PREFIX";

/// Environment variable selecting path-style (`true`) or virtual-hosted (`false`) addressing
pub(crate) const FORCE_PATH_STYLE_ENV: &str = "S3_SUITE_FORCE_PATH_STYLE";

/// Environment variable holding the per-bucket teardown bound in seconds
pub(crate) const CLEANUP_TIMEOUT_ENV: &str = "S3_SUITE_CLEANUP_TIMEOUT_SECS";

/// Region used when neither the loader nor the environment provide one
const FALLBACK_REGION: &str = "us-east-1";

/// Load suite [`Config`] from the environment.
///
/// The S3 client is configured through `aws-config`, so the standard `AWS_*` variables
/// (`AWS_ENDPOINT_URL`, `AWS_REGION`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, profiles,
/// ...) apply. Values set on the loader take precedence over the environment.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    builder: Builder,
    bucket_prefix: Option<String>,
    cleanup_timeout: Option<Duration>,
    endpoint_url: Option<String>,
    region: Option<String>,
    credentials: Option<Credentials>,
    force_path_style: Option<bool>,
}

impl ConfigLoader {
    /// Template used to generate the per-run bucket name prefix.
    pub fn bucket_prefix(mut self, template: impl Into<String>) -> Self {
        self.bucket_prefix = Some(template.into());
        self
    }

    /// Upper bound on the time spent removing a single bucket during teardown.
    pub fn cleanup_timeout(mut self, timeout: Duration) -> Self {
        self.cleanup_timeout = Some(timeout);
        self
    }

    /// Endpoint of the S3-compatible service under test (e.g. `http://localhost:9000`)
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Region to sign requests for
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Static credentials to authenticate with
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "s3-bucket-suite",
        ));
        self
    }

    /// Use path-style addressing (`endpoint/bucket/key`) instead of virtual-hosted style.
    ///
    /// Default is `true` since most self-hosted S3-compatible services require it.
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// Load the configuration
    ///
    /// If fields have been overridden during loader construction, the override values will be
    /// used. Otherwise, values from the environment or the defaults are provided.
    pub async fn load(self) -> Config {
        let region = RegionProviderChain::first_try(self.region.map(Region::new))
            .or_default_provider()
            .or_else(Region::from_static(FALLBACK_REGION));

        let mut shared = aws_config::from_env().region(region);
        if let Some(endpoint_url) = self.endpoint_url {
            shared = shared.endpoint_url(endpoint_url);
        }
        if let Some(credentials) = self.credentials {
            shared = shared.credentials_provider(credentials);
        }
        let shared_config = shared.load().await;

        let force_path_style = self
            .force_path_style
            .or_else(|| parse_flag(FORCE_PATH_STYLE_ENV, env_var(FORCE_PATH_STYLE_ENV)))
            .unwrap_or(true);

        // flexible checksums only where the API requires them
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(force_path_style)
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
            .build();
        tracing::debug!(
            "loaded S3 client config: region={:?}, endpoint={:?}, force_path_style={force_path_style}",
            shared_config.region(),
            shared_config.endpoint_url(),
        );

        let mut builder = self
            .builder
            .client(aws_sdk_s3::Client::from_conf(s3_config));

        if let Some(template) = self.bucket_prefix.or_else(|| env_var(BUCKET_PREFIX_ENV)) {
            builder = builder.bucket_prefix(template);
        }

        let cleanup_timeout = self
            .cleanup_timeout
            .or_else(|| parse_secs(CLEANUP_TIMEOUT_ENV, env_var(CLEANUP_TIMEOUT_ENV)));
        if let Some(timeout) = cleanup_timeout {
            builder = builder.cleanup_timeout(timeout);
        }

        builder.build()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_flag(name: &str, value: Option<String>) -> Option<bool> {
    let value = value?;
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        other => {
            tracing::warn!("ignoring {name}={other:?}: expected true or false");
            None
        }
    }
}

fn parse_secs(name: &str, value: Option<String>) -> Option<Duration> {
    let value = value?;
    match value.trim().parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(err) => {
            tracing::warn!("ignoring {name}={value:?}: {err}");
            None
        }
    }
}
