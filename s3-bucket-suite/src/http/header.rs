/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_runtime_api::box_error::BoxError;
use aws_smithy_runtime_api::client::interceptors::context::BeforeTransmitInterceptorContextMut;
use aws_smithy_runtime_api::client::interceptors::Intercept;
use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
use aws_smithy_types::config_bag::ConfigBag;

use crate::types::HeaderOverrides;

/// Replaces request headers right before the request is handed to the HTTP client.
///
/// Running in the transmit phase means signing has already happened, which is the only
/// point where `Authorization` (and headers covered by the signature) can still be changed.
#[derive(Debug, Clone)]
pub(crate) struct HeaderOverrideInterceptor {
    overrides: HeaderOverrides,
}

impl HeaderOverrideInterceptor {
    pub(crate) fn new(overrides: HeaderOverrides) -> Self {
        Self { overrides }
    }
}

impl Intercept for HeaderOverrideInterceptor {
    fn name(&self) -> &'static str {
        "HeaderOverrideInterceptor"
    }

    fn modify_before_transmit(
        &self,
        context: &mut BeforeTransmitInterceptorContextMut<'_>,
        _runtime_components: &RuntimeComponents,
        _cfg: &mut ConfigBag,
    ) -> Result<(), BoxError> {
        let headers = context.request_mut().headers_mut();
        for (name, value) in self.overrides.iter() {
            let previous = headers.try_insert(name.to_owned(), value.to_owned())?;
            tracing::trace!(
                "overriding request header {name}: {previous:?} -> {value:?}"
            );
        }
        Ok(())
    }
}
