/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::iter;

use crate::error::{invalid_input, Error};

/// Placeholder replaced by a random token when rendering a prefix template
pub const RANDOM_PLACEHOLDER: &str = "{random}";

/// Length of the random token substituted for [`RANDOM_PLACEHOLDER`]
const RANDOM_TOKEN_LEN: usize = 12;

/// Longest prefix accepted, leaving room for the per-context counter within the 63 byte
/// bucket name limit
pub const MAX_PREFIX_LEN: usize = 50;

/// Render a bucket name prefix from `template`.
///
/// Every `{random}` in the template is replaced with the same random lowercase alphanumeric
/// token. A template without the placeholder gets the token appended, so two calls never
/// return the same prefix.
pub fn generate_prefix(template: &str) -> Result<String, Error> {
    let token = random_token(RANDOM_TOKEN_LEN);
    let prefix = if template.contains(RANDOM_PLACEHOLDER) {
        template.replace(RANDOM_PLACEHOLDER, &token)
    } else {
        format!("{template}{token}-")
    };
    validate_prefix(&prefix)?;
    Ok(prefix)
}

/// Bucket name for the `seq`-th bucket requested under `prefix`
pub fn bucket_name(prefix: &str, seq: usize) -> String {
    format!("{prefix}{seq}")
}

fn random_token(len: usize) -> String {
    iter::repeat_with(fastrand::alphanumeric)
        .take(len)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub(crate) fn validate_prefix(prefix: &str) -> Result<(), Error> {
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(invalid_input(format!(
            "bucket prefix {prefix:?} is longer than {MAX_PREFIX_LEN} bytes"
        )));
    }
    match prefix.chars().next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => {
            return Err(invalid_input(format!(
                "bucket prefix {prefix:?} must start with a lowercase letter or digit"
            )))
        }
    }
    if let Some(c) = prefix
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
    {
        return Err(invalid_input(format!(
            "bucket prefix {prefix:?} contains illegal character {c:?}"
        )));
    }
    Ok(())
}
