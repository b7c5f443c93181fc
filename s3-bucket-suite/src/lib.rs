/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Integration test fixtures for the bucket API of S3-compatible storage services.
//!
//! The crate provides the pieces a bucket test suite is made of: a [`Client`] wrapping the
//! bucket and object operations the scenarios exercise, including the ability to put
//! arbitrary (even malformed) header values on the wire, and a [`TestContext`] that hands out
//! unique bucket names and removes every bucket it created once the test is over.
//!
//! # Examples
//!
//! Create a bucket and let the context clean it up:
//!
//! ```no_run
//! # async fn example() -> Result<(), s3_bucket_suite::error::Error> {
//! let context = s3_bucket_suite::TestContext::from_env().await?;
//!
//! context
//!     .clone()
//!     .run(|ctx| async move {
//!         let bucket = ctx.create_bucket().await.unwrap();
//!         assert!(ctx.client().bucket_exists(&bucket).await.unwrap());
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```
//!
//! Send a request with a header the SDK would never produce:
//!
//! ```no_run
//! # async fn example(ctx: s3_bucket_suite::TestContext) -> Result<(), s3_bucket_suite::error::Error> {
//! use s3_bucket_suite::types::HeaderOverrides;
//!
//! let headers = HeaderOverrides::single("Authorization", "")?;
//! let err = ctx
//!     .client()
//!     .create_bucket(&ctx.bucket_name(), &headers)
//!     .await
//!     .unwrap_err();
//! println!("rejected with {:?}", err.code());
//! # Ok(())
//! # }
//! ```
//!
//! Endpoint, region and credentials are read by `aws-config` (`AWS_ENDPOINT_URL`,
//! `AWS_REGION`, `AWS_ACCESS_KEY_ID`, ...). See [`from_env`] for the suite specific settings.

/// Error types emitted by `s3-bucket-suite`
pub mod error;

/// Common types used by `s3-bucket-suite`
pub mod types;

/// Bucket and object client
pub mod client;

/// Suite configuration
pub mod config;

/// Per-test fixture
pub mod context;

/// Bucket name generation
pub mod naming;

/// HTTP related components and utils
pub(crate) mod http;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;
pub use self::context::TestContext;

/// Create a config loader
///
/// Besides the standard AWS environment, the loader honors `S3_SUITE_BUCKET_PREFIX`,
/// `S3_SUITE_FORCE_PATH_STYLE` and `S3_SUITE_CLEANUP_TIMEOUT_SECS`.
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
