/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// Service failures keep the machine readable error code reported by the service (e.g.
/// `NoSuchBucket`), which is what scenarios assert against.
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    code: Option<String>,
    message: Option<String>,
    source: BoxError,
}

/// General categories of storage service errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Request construction failed or an input (header override, bucket prefix) is not legal
    InputInvalid,

    /// Resource not found (e.g. bucket or key)
    NotFound,

    /// The resource is in a state that conflicts with the request (e.g. deleting a non-empty bucket)
    Conflict,

    /// Authentication or request signature was rejected
    AuthFailure,

    /// The service rejected the request as malformed (e.g. an invalid `Content-MD5`)
    BadRequest,

    /// Any other error reported by the service
    ServiceError,

    /// The request could not be sent or the response could not be read
    Transport,

    /// A deadline enforced by this library elapsed
    Timeout,
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            code: None,
            message: None,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The error code reported by the service, if any (e.g. `BucketNotEmpty`)
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The error message reported by the service, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns true if the service reported exactly the given error code
    pub fn is_code(&self, code: &str) -> bool {
        self.code() == Some(code)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input")?,
            ErrorKind::NotFound => write!(f, "resource not found")?,
            ErrorKind::Conflict => write!(f, "conflicting resource state")?,
            ErrorKind::AuthFailure => write!(f, "authentication failed")?,
            ErrorKind::BadRequest => write!(f, "bad request")?,
            ErrorKind::ServiceError => write!(f, "service error")?,
            ErrorKind::Transport => write!(f, "transport error")?,
            ErrorKind::Timeout => write!(f, "operation timed out")?,
        }
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<aws_smithy_types::error::operation::BuildError> for Error {
    fn from(value: aws_smithy_types::error::operation::BuildError) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(value: http::header::InvalidHeaderName) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(value: http::header::InvalidHeaderValue) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(value: tokio::time::error::Elapsed) -> Self {
        Self::new(ErrorKind::Timeout, value)
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

/// Error reported by the service outside of the operation's own status (e.g. a per-key
/// failure in a `DeleteObjects` response)
pub(crate) fn service_error(code: &str, message: Option<&str>) -> Error {
    let mut err = Error::new(
        kind_for_code(code, None),
        format!("{code}: {}", message.unwrap_or("no message")),
    );
    err.code = Some(code.to_owned());
    err.message = message.map(str::to_owned);
    err
}

/// Map a service error code (and the HTTP status it arrived with) to an [`ErrorKind`]
pub(crate) fn kind_for_code(code: &str, status: Option<u16>) -> ErrorKind {
    match code {
        "NoSuchBucket" | "NoSuchKey" | "NotFound" => ErrorKind::NotFound,
        "BucketNotEmpty"
        | "BucketAlreadyExists"
        | "BucketAlreadyOwnedByYou"
        | "OperationAborted" => ErrorKind::Conflict,
        "SignatureDoesNotMatch"
        | "AccessDenied"
        | "Forbidden"
        | "InvalidAccessKeyId"
        | "AuthorizationHeaderMalformed" => ErrorKind::AuthFailure,
        "InvalidDigest"
        | "BadDigest"
        | "InvalidArgument"
        | "InvalidRequest"
        | "MissingContentLength"
        | "BadRequest" => ErrorKind::BadRequest,
        _ => match status {
            Some(400) => ErrorKind::BadRequest,
            Some(401 | 403) => ErrorKind::AuthFailure,
            Some(404) => ErrorKind::NotFound,
            _ => ErrorKind::ServiceError,
        },
    }
}

impl<E> From<aws_sdk_s3::error::SdkError<E, HttpResponse>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, HttpResponse>) -> Self {
        use aws_sdk_s3::error::SdkError;

        let status = value.raw_response().map(|resp| resp.status().as_u16());
        let code = value.code().map(str::to_owned);
        let message = value.message().map(str::to_owned);

        let kind = match (&value, code.as_deref()) {
            (SdkError::ConstructionFailure(_), _) => ErrorKind::InputInvalid,
            (SdkError::TimeoutError(_), _) => ErrorKind::Timeout,
            (SdkError::DispatchFailure(_) | SdkError::ResponseError(_), _) => ErrorKind::Transport,
            (_, code) => kind_for_code(code.unwrap_or_default(), status),
        };

        Error {
            kind,
            code,
            message,
            source: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{kind_for_code, Error, ErrorKind};

    #[test]
    fn test_kind_for_code() {
        assert_eq!(ErrorKind::NotFound, kind_for_code("NoSuchBucket", Some(404)));
        assert_eq!(ErrorKind::Conflict, kind_for_code("BucketNotEmpty", Some(409)));
        assert_eq!(
            ErrorKind::AuthFailure,
            kind_for_code("SignatureDoesNotMatch", Some(403))
        );
        assert_eq!(ErrorKind::BadRequest, kind_for_code("InvalidDigest", Some(400)));
        assert_eq!(ErrorKind::BadRequest, kind_for_code("SomethingNew", Some(400)));
        assert_eq!(ErrorKind::ServiceError, kind_for_code("SlowDown", Some(503)));
        assert_eq!(ErrorKind::AuthFailure, kind_for_code("Forbidden", Some(403)));
        assert_eq!(ErrorKind::NotFound, kind_for_code("SomethingNew", Some(404)));
    }

    #[test]
    fn test_display_includes_code() {
        let mut err = Error::new(ErrorKind::Conflict, "bucket has objects");
        assert_eq!("conflicting resource state", err.to_string());
        err.code = Some("BucketNotEmpty".to_owned());
        assert_eq!("conflicting resource state (BucketNotEmpty)", err.to_string());
        assert!(err.is_code("BucketNotEmpty"));
    }
}
