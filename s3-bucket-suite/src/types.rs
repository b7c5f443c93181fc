/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use http::{HeaderName, HeaderValue};

use crate::error::Error;

/// Request headers that replace whatever the SDK would otherwise send.
///
/// Overrides are applied to the outgoing request after it has been signed, so they take
/// precedence over automatically computed headers such as `Content-Length`, `Content-MD5`
/// and `Authorization`. Header names are case-insensitive; inserting the same name twice
/// keeps only the latest value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOverrides {
    entries: Vec<(HeaderName, String)>,
}

impl HeaderOverrides {
    /// Create an empty set of overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set of overrides containing a single header
    pub fn single(name: &str, value: impl Into<String>) -> Result<Self, Error> {
        Self::new().with(name, value)
    }

    /// Add (or replace) a header override, consuming and returning `self`
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Result<Self, Error> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Add (or replace) a header override.
    ///
    /// Fails with [`ErrorKind::InputInvalid`](crate::error::ErrorKind::InputInvalid) when the
    /// name or value can not be put on the wire as an HTTP header.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Result<(), Error> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = value.into();
        HeaderValue::from_str(&value)?;

        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        Ok(())
    }

    /// Returns the override for the given header name, if any
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over the overrides in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The number of overridden headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no header is overridden
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single entry returned when listing the objects of a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// The object key
    pub key: String,

    /// Size of the object content in bytes
    pub size: i64,

    /// Entity tag of the object, if reported
    pub e_tag: Option<String>,
}

impl ObjectSummary {
    /// The object key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl From<&aws_sdk_s3::types::Object> for ObjectSummary {
    fn from(value: &aws_sdk_s3::types::Object) -> Self {
        Self {
            key: value.key().unwrap_or_default().to_owned(),
            size: value.size().unwrap_or_default(),
            e_tag: value.e_tag().map(str::to_owned),
        }
    }
}

/// The parts of a bucket access control list inspected by the suite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketAcl {
    /// Canonical ID of the bucket owner
    pub owner_id: Option<String>,

    /// Number of grants in the access control list
    pub grants: usize,
}

/// Outcome of removing every bucket created under a test prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownSummary {
    /// Buckets that were emptied and deleted
    pub removed: Vec<String>,

    /// Buckets that could not be removed, with the rendered reason
    pub failed: Vec<(String, String)>,
}

impl TeardownSummary {
    /// Returns true if every bucket was removed
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
