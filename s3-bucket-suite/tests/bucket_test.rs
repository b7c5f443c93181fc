/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

#![cfg(e2e_test)]

// Runs against the service configured through the environment, e.g.
//
//   AWS_ENDPOINT_URL=http://localhost:9000 AWS_ACCESS_KEY_ID=.. AWS_SECRET_ACCESS_KEY=.. \
//   RUSTFLAGS="--cfg e2e_test" cargo test -p s3-bucket-suite --test bucket_test

use s3_bucket_suite::error::ErrorKind;
use s3_bucket_suite::types::HeaderOverrides;
use s3_bucket_suite::TestContext;
use test_common::setup_tracing;

/// A header value made of the escape text for BEL, which is what clients that can not send
/// control characters put on the wire instead
const UNREADABLE: &str = r"\x07";

async fn test_context() -> TestContext {
    setup_tracing();
    TestContext::from_env()
        .await
        .expect("valid suite configuration")
}

fn headers(name: &str, value: &str) -> HeaderOverrides {
    HeaderOverrides::single(name, value).unwrap()
}

async fn assert_create_succeeds(name: &str, value: &str) {
    let (name, value) = (name.to_owned(), value.to_owned());
    test_context()
        .await
        .run(|ctx| async move {
            let bucket = ctx.bucket_name();
            ctx.client()
                .create_bucket(&bucket, &headers(&name, &value))
                .await
                .unwrap();
            assert!(ctx.client().bucket_exists(&bucket).await.unwrap());
        })
        .await;
}

async fn assert_create_rejected(name: &str, value: &str, code: &str) {
    let (name, value, code) = (name.to_owned(), value.to_owned(), code.to_owned());
    test_context()
        .await
        .run(|ctx| async move {
            let bucket = ctx.bucket_name();
            let err = ctx
                .client()
                .create_bucket(&bucket, &headers(&name, &value))
                .await
                .expect_err("bucket creation with a malformed header must fail");
            assert_eq!(Some(code.as_str()), err.code(), "{name}: {value:?}");
        })
        .await;
}

#[tokio::test]
async fn test_list_empty_bucket() {
    test_context()
        .await
        .run(|ctx| async move {
            let bucket = ctx.create_bucket().await.unwrap();
            let objects = ctx.client().list_objects(&bucket).await.unwrap();
            assert!(objects.is_empty());
        })
        .await;
}

#[tokio::test]
async fn test_delete_nonexistent_bucket() {
    test_context()
        .await
        .run(|ctx| async move {
            let err = ctx
                .client()
                .delete_bucket(&ctx.bucket_name())
                .await
                .unwrap_err();
            assert_eq!(Some("NoSuchBucket"), err.code());
            assert_eq!(&ErrorKind::NotFound, err.kind());
        })
        .await;
}

#[tokio::test]
async fn test_delete_nonempty_bucket() {
    test_context()
        .await
        .run(|ctx| async move {
            let bucket = ctx.create_bucket().await.unwrap();
            ctx.client()
                .put_object(&bucket, "key1", "echo", &HeaderOverrides::default())
                .await
                .unwrap();

            let err = ctx.client().delete_bucket(&bucket).await.unwrap_err();
            assert_eq!(Some("BucketNotEmpty"), err.code());
            assert_eq!(&ErrorKind::Conflict, err.kind());
        })
        .await;
}

#[tokio::test]
async fn test_create_exists_delete() {
    test_context()
        .await
        .run(|ctx| async move {
            let bucket = ctx.create_bucket().await.unwrap();
            assert!(ctx.client().bucket_exists(&bucket).await.unwrap());

            ctx.client().delete_bucket(&bucket).await.unwrap();
            assert!(!ctx.client().bucket_exists(&bucket).await.unwrap());
        })
        .await;
}

#[tokio::test]
async fn test_list_is_isolated_per_bucket() {
    test_context()
        .await
        .run(|ctx| async move {
            let bucket_a = ctx.create_bucket().await.unwrap();
            let bucket_b = ctx.create_bucket().await.unwrap();
            ctx.client()
                .put_object(&bucket_a, "key1", "echo", &HeaderOverrides::default())
                .await
                .unwrap();

            let objects = ctx.client().list_objects(&bucket_b).await.unwrap();
            assert!(objects.is_empty(), "unexpected objects: {objects:?}");
        })
        .await;
}

#[tokio::test]
async fn test_acl_of_nonexistent_bucket() {
    test_context()
        .await
        .run(|ctx| async move {
            let err = ctx
                .client()
                .get_bucket_acl(&ctx.bucket_name())
                .await
                .unwrap_err();
            assert_eq!(Some("NoSuchBucket"), err.code());
        })
        .await;
}

#[tokio::test]
async fn test_nonexistent_bucket_does_not_exist() {
    test_context()
        .await
        .run(|ctx| async move {
            assert!(!ctx.client().bucket_exists(&ctx.bucket_name()).await.unwrap());
        })
        .await;
}

#[tokio::test]
async fn test_create_with_expect_200() {
    assert_create_succeeds("Expect", "200").await;
}

#[tokio::test]
async fn test_create_with_empty_expect() {
    assert_create_succeeds("Expect", "").await;
}

#[tokio::test]
async fn test_create_with_unreadable_expect() {
    assert_create_succeeds("Expect", UNREADABLE).await;
}

#[tokio::test]
async fn test_put_object_with_invalid_md5() {
    test_context()
        .await
        .run(|ctx| async move {
            let bucket = ctx.create_bucket().await.unwrap();
            let err = ctx
                .client()
                .put_object(
                    &bucket,
                    "key1",
                    "echo lima golf",
                    &headers("Content-MD5", " "),
                )
                .await
                .unwrap_err();
            assert_eq!(&ErrorKind::BadRequest, err.kind(), "code: {:?}", err.code());
            assert!(err.code().is_some());
        })
        .await;
}

#[tokio::test]
async fn test_create_with_unreadable_content_length() {
    assert_create_rejected("Content-Length", UNREADABLE, "SignatureDoesNotMatch").await;
}

#[tokio::test]
async fn test_create_with_empty_content_length() {
    assert_create_rejected("Content-Length", "", "SignatureDoesNotMatch").await;
}

#[tokio::test]
async fn test_create_with_whitespace_content_length() {
    assert_create_rejected("Content-Length", " ", "SignatureDoesNotMatch").await;
}

#[tokio::test]
async fn test_create_with_unreadable_authorization() {
    assert_create_rejected("Authorization", UNREADABLE, "SignatureDoesNotMatch").await;
}

#[tokio::test]
async fn test_create_with_empty_authorization() {
    assert_create_rejected("Authorization", "", "SignatureDoesNotMatch").await;
}

#[tokio::test]
async fn test_create_with_whitespace_authorization() {
    assert_create_rejected("Authorization", " ", "SignatureDoesNotMatch").await;
}

#[tokio::test]
async fn test_bucket_lifecycle() {
    test_context()
        .await
        .run(|ctx| async move {
            let client = ctx.client();
            let bucket = ctx.create_bucket().await.unwrap();
            assert!(client.list_objects(&bucket).await.unwrap().is_empty());

            client
                .put_object(&bucket, "key1", "echo", &HeaderOverrides::default())
                .await
                .unwrap();
            let objects = client.list_objects(&bucket).await.unwrap();
            assert_eq!(1, objects.len());
            assert_eq!("key1", objects[0].key());
            assert_eq!(4, objects[0].size);

            let err = client.delete_bucket(&bucket).await.unwrap_err();
            assert!(err.is_code("BucketNotEmpty"));

            client.delete_object(&bucket, "key1").await.unwrap();
            client.delete_bucket(&bucket).await.unwrap();
            assert!(!client.bucket_exists(&bucket).await.unwrap());
        })
        .await;
}

#[tokio::test]
async fn test_teardown_removes_everything() {
    let ctx = test_context().await;
    let bucket = ctx.create_bucket().await.unwrap();
    for key in ["a", "b/c", "d"] {
        ctx.client()
            .put_object(&bucket, key, "data", &HeaderOverrides::default())
            .await
            .unwrap();
    }

    let summary = ctx.tear_down().await;
    assert!(summary.is_clean(), "{summary:?}");
    assert_eq!(vec![bucket.clone()], summary.removed);
    assert!(!ctx.client().bucket_exists(&bucket).await.unwrap());
}
