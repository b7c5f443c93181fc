/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use aws_sdk_s3::config::{Credentials, Region, RequestChecksumCalculation};
use aws_smithy_http_client::test_util::ReplayEvent;
use aws_smithy_runtime_api::client::http::{
    HttpClient, HttpConnector, HttpConnectorFuture, HttpConnectorSettings, SharedHttpConnector,
};
use aws_smithy_runtime_api::client::orchestrator::{HttpRequest, HttpResponse};
use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
use aws_smithy_runtime_api::http::StatusCode;
use aws_smithy_types::body::SdkBody;

const S3_XMLNS: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Install a tracing subscriber writing to the test output, filtered by `RUST_LOG`
pub fn setup_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn error_body(code: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Error><Code>{code}</Code><Message>simulated {code}</Message>\
         <RequestId>test-request-id</RequestId></Error>"
    )
}

/// create a dummy placeholder request for StaticReplayClient. Assertions are made against
/// the captured requests instead.
pub fn dummy_expected_request() -> http::Request<SdkBody> {
    http::Request::builder()
        .uri("https://not-used")
        .body(SdkBody::from(&b""[..]))
        .unwrap()
}

/// A replay event answering with `status` and an XML `body`
pub fn xml_event(status: u16, body: impl Into<String>) -> ReplayEvent {
    ReplayEvent::new(
        dummy_expected_request(),
        http::Response::builder()
            .status(status)
            .header("Content-Type", "application/xml")
            .body(SdkBody::from(body.into()))
            .unwrap(),
    )
}

/// A replay event answering with `status` and no body
pub fn empty_event(status: u16) -> ReplayEvent {
    ReplayEvent::new(
        dummy_expected_request(),
        http::Response::builder()
            .status(status)
            .body(SdkBody::empty())
            .unwrap(),
    )
}

/// A replay event answering with an empty `200 OK`
pub fn ok_event() -> ReplayEvent {
    empty_event(200)
}

/// A replay event answering with an S3 style XML error
pub fn error_event(status: u16, code: &str) -> ReplayEvent {
    xml_event(status, error_body(code))
}

/// `ListBuckets` response body naming `buckets`, with an optional continuation token
pub fn list_buckets_body(buckets: &[&str], continuation_token: Option<&str>) -> String {
    let buckets: String = buckets
        .iter()
        .map(|name| {
            format!(
                "<Bucket><Name>{name}</Name>\
                 <CreationDate>2024-01-01T00:00:00.000Z</CreationDate></Bucket>"
            )
        })
        .collect();
    let token = continuation_token
        .map(|token| format!("<ContinuationToken>{token}</ContinuationToken>"))
        .unwrap_or_default();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <ListAllMyBucketsResult xmlns=\"{S3_XMLNS}\">\
         <Owner><ID>test-owner</ID></Owner><Buckets>{buckets}</Buckets>{token}\
         </ListAllMyBucketsResult>"
    )
}

/// Single page `ListObjectsV2` response body for `bucket` holding `keys`
pub fn list_objects_body(bucket: &str, keys: &[&str]) -> String {
    let contents: String = keys
        .iter()
        .map(|key| format!("<Contents><Key>{key}</Key><Size>4</Size></Contents>"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <ListBucketResult xmlns=\"{S3_XMLNS}\"><Name>{bucket}</Name><Prefix></Prefix>\
         <KeyCount>{}</KeyCount><MaxKeys>1000</MaxKeys><IsTruncated>false</IsTruncated>\
         {contents}</ListBucketResult>",
        keys.len()
    )
}

/// `DeleteObjects` response body reporting no per-key errors
pub fn delete_objects_body() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <DeleteResult xmlns=\"{S3_XMLNS}\"></DeleteResult>"
    )
}

/// HTTP client answering with a fixed list of responses in order and never answering once
/// they are used up
#[derive(Debug, Clone, Default)]
pub struct StallingClient {
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
}

impl StallingClient {
    /// Create a client answering with `responses` (status and body) before stalling
    pub fn new(responses: Vec<(u16, String)>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }
}

impl HttpConnector for StallingClient {
    fn call(&self, _request: HttpRequest) -> HttpConnectorFuture {
        match self.responses.lock().unwrap().pop_front() {
            Some((status, body)) => HttpConnectorFuture::ready(Ok(HttpResponse::new(
                StatusCode::try_from(status).unwrap(),
                SdkBody::from(body),
            ))),
            None => HttpConnectorFuture::new(std::future::pending()),
        }
    }
}

impl HttpClient for StallingClient {
    fn http_connector(
        &self,
        _settings: &HttpConnectorSettings,
        _components: &RuntimeComponents,
    ) -> SharedHttpConnector {
        SharedHttpConnector::new(self.clone())
    }
}

/// An S3 client sending its requests to `http_client` with static credentials
pub fn replay_s3_client(
    http_client: impl HttpClient + 'static,
    region: &'static str,
) -> aws_sdk_s3::Client {
    aws_sdk_s3::Client::from_conf(
        aws_sdk_s3::config::Config::builder()
            .http_client(http_client)
            .region(Region::from_static(region))
            .credentials_provider(Credentials::new(
                "test-access-key",
                "test-secret-key",
                None,
                None,
                "test",
            ))
            .force_path_style(true)
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .with_test_defaults()
            .build(),
    )
}
