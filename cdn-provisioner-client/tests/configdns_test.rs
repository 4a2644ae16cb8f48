//! Config-DNS live tests
//!
//! Run with:
//! ```bash
//! CDN_API_BASE_URL=https://... CDN_API_TOKEN=xxx TEST_ZONE=example.com \
//!     cargo test -p cdn-provisioner-client --test configdns_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::TestContext;

#[tokio::test]
#[ignore]
async fn test_configdns_fetch_zone() {
    skip_if_no_credentials!("CDN_API_BASE_URL", "CDN_API_TOKEN", "TEST_ZONE");

    let ctx = TestContext::from_env().expect("failed to build test context");
    let result = ctx.zones.fetch(&ctx.zone).await;
    assert!(result.is_ok(), "fetch failed: {result:?}");

    let zone = result.unwrap();
    assert_eq!(zone.zone, ctx.zone);
    println!("✓ fetch: {} ({}, {})", zone.zone, zone.zone_type, zone.activation_state);
}

#[tokio::test]
#[ignore]
async fn test_configdns_fetch_status() {
    skip_if_no_credentials!("CDN_API_BASE_URL", "CDN_API_TOKEN", "TEST_ZONE");

    let ctx = TestContext::from_env().expect("failed to build test context");
    let result = ctx.zones.fetch_status(&ctx.zone).await;
    assert!(result.is_ok(), "fetch_status failed: {result:?}");
    println!("✓ fetch_status: {}", result.unwrap().status);
}

#[tokio::test]
#[ignore]
async fn test_configdns_missing_zone_is_not_found() {
    skip_if_no_credentials!("CDN_API_BASE_URL", "CDN_API_TOKEN", "TEST_ZONE");

    let ctx = TestContext::from_env().expect("failed to build test context");
    let missing = format!("missing-{}.invalid", &uuid::Uuid::new_v4().to_string()[..8]);
    let result = ctx.zones.fetch(&missing).await;
    assert!(
        matches!(&result, Err(e) if e.is_not_found()),
        "expected NotFound, got {result:?}"
    );
    println!("✓ missing zone classified as NotFound");
}
