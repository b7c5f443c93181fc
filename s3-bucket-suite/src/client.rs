/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use bytes::Bytes;

use crate::error::{service_error, Error, ErrorKind};
use crate::http::header::HeaderOverrideInterceptor;
use crate::types::{BucketAcl, HeaderOverrides, ObjectSummary};
use crate::Config;

/// Region in which buckets are created without an explicit location constraint
const DEFAULT_LOCATION: &str = "us-east-1";

/// Maximum number of keys accepted by a single `DeleteObjects` request
const MAX_DELETE_BATCH: usize = 1000;

/// Bucket and object operations against the storage service under test.
///
/// This is a thin layer over [`aws_sdk_s3::Client`]: every call is a single SDK request
/// (or a paginated series of them) whose failure is surfaced as an [`Error`] carrying the
/// service error code. Operations that accept [`HeaderOverrides`] put those values on the
/// wire in place of whatever the SDK computed.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Client {
    /// Creates a new client from a suite config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// The underlying S3 client, for requests this type does not wrap
    pub fn s3(&self) -> &aws_sdk_s3::Client {
        self.handle.config.client()
    }

    /// Create a bucket, replacing request headers with `headers`.
    ///
    /// Outside of `us-east-1` the client's region is sent as the location constraint.
    pub async fn create_bucket(&self, bucket: &str, headers: &HeaderOverrides) -> Result<(), Error> {
        let mut request = self.s3().create_bucket().bucket(bucket);
        if let Some(region) = self.s3().config().region() {
            if region.as_ref() != DEFAULT_LOCATION {
                let location = CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region.as_ref()))
                    .build();
                request = request.create_bucket_configuration(location);
            }
        }

        let mut operation = request.customize();
        if !headers.is_empty() {
            operation = operation.interceptor(HeaderOverrideInterceptor::new(headers.clone()));
        }
        operation.send().await?;
        tracing::debug!("created bucket {bucket}");
        Ok(())
    }

    /// Delete a bucket. The bucket must be empty.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.s3().delete_bucket().bucket(bucket).send().await?;
        tracing::debug!("deleted bucket {bucket}");
        Ok(())
    }

    /// Returns whether the bucket exists.
    ///
    /// A missing bucket is reported as `Ok(false)`; any other failure is returned as is.
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool, Error> {
        match self.s3().head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let modeled_not_found = err
                    .as_service_error()
                    .map(HeadBucketError::is_not_found)
                    .unwrap_or(false);
                let err = Error::from(err);
                if modeled_not_found || err.kind() == &ErrorKind::NotFound {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// List every object in the bucket, following pagination to the end
    pub async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, Error> {
        let mut pages = self
            .s3()
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page?;
            objects.extend(page.contents().iter().map(ObjectSummary::from));
        }
        Ok(objects)
    }

    /// Put an object, replacing request headers with `headers`.
    ///
    /// `Content-Length` is derived from `content` unless overridden.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: impl Into<Bytes>,
        headers: &HeaderOverrides,
    ) -> Result<(), Error> {
        let content: Bytes = content.into();
        let content_length = content.len();
        let mut operation = self
            .s3()
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(content_length as i64)
            .body(ByteStream::from(content))
            .customize();
        if !headers.is_empty() {
            operation = operation.interceptor(HeaderOverrideInterceptor::new(headers.clone()));
        }
        operation.send().await?;
        tracing::debug!("put object {bucket}/{key} ({content_length} bytes)");
        Ok(())
    }

    /// Delete a single object
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.s3()
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        tracing::debug!("deleted object {bucket}/{key}");
        Ok(())
    }

    /// Fetch the access control list of a bucket
    pub async fn get_bucket_acl(&self, bucket: &str) -> Result<BucketAcl, Error> {
        let output = self.s3().get_bucket_acl().bucket(bucket).send().await?;
        Ok(BucketAcl {
            owner_id: output.owner().and_then(|owner| owner.id()).map(str::to_owned),
            grants: output.grants().len(),
        })
    }

    /// Names of all buckets visible to the configured credentials
    pub async fn list_buckets(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let mut continuation_token: Option<String> = None;
        loop {
            let output = self
                .s3()
                .list_buckets()
                .set_continuation_token(continuation_token.take())
                .send()
                .await?;
            names.extend(
                output
                    .buckets()
                    .iter()
                    .filter_map(|bucket| bucket.name())
                    .map(str::to_owned),
            );
            match output.continuation_token() {
                Some(token) if !token.is_empty() => continuation_token = Some(token.to_owned()),
                _ => break,
            }
        }
        Ok(names)
    }

    /// Delete every object in the bucket, returning how many were removed
    pub async fn empty_bucket(&self, bucket: &str) -> Result<usize, Error> {
        let keys: Vec<String> = self
            .list_objects(bucket)
            .await?
            .into_iter()
            .map(|object| object.key)
            .collect();

        for batch in keys.chunks(MAX_DELETE_BATCH) {
            let objects = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()?;
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()?;

            let output = self
                .s3()
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await?;

            if let Some(failure) = output.errors().first() {
                tracing::debug!(
                    "failed to delete {} of {} objects from {bucket}",
                    output.errors().len(),
                    batch.len()
                );
                return Err(service_error(
                    failure.code().unwrap_or("InternalError"),
                    failure.message(),
                ));
            }
        }

        tracing::debug!("removed {} objects from {bucket}", keys.len());
        Ok(keys.len())
    }
}
