//! Test: opt-in parallel publishing

use crate::helpers::*;
use regpush::publish::PublishStrategy;
use std::collections::HashSet;

/// Limited parallelism publishes every service and keeps the report in
/// configured order, even though execution order may interleave
#[tokio::test]
async fn test_limited_parallel_publishes_everything() {
    let services = ["frontend", "cart-service", "order-service", "product-service"];
    let workdir = workspace_with_dirs(&services);
    let config = config_for(&services);

    let mock = MockDocker::new();
    let invocations = mock.invocations();

    let (report, events) = run_publisher(
        mock,
        &config,
        PublishStrategy::LimitedParallel(2),
        workdir.path(),
    )
    .await;

    // Every service saw exactly one build and one push
    let calls = invocations.lock().unwrap().clone();
    assert_eq!(calls.len(), 8);
    let built: HashSet<String> = calls
        .iter()
        .filter_map(|call| match call {
            Invocation::Build { tag, .. } => Some(tag.clone()),
            _ => None,
        })
        .collect();
    let expected: HashSet<String> = services.iter().map(|s| demo_tag(s)).collect();
    assert_eq!(built, expected);

    assert!(completed_last(&events));

    assert_eq!(report.published(), 4);
    let reported: Vec<&str> = report.services.iter().map(|r| r.service.as_str()).collect();
    assert_eq!(reported, services.to_vec());
}

/// Skips behave the same under parallel execution
#[tokio::test]
async fn test_limited_parallel_still_skips_missing() {
    let workdir = workspace_with_dirs(&["frontend", "product-service"]);
    let config = config_for(&["frontend", "cart-service", "order-service", "product-service"]);

    let mock = MockDocker::new();
    let invocations = mock.invocations();

    let (report, _events) = run_publisher(
        mock,
        &config,
        PublishStrategy::LimitedParallel(4),
        workdir.path(),
    )
    .await;

    assert_eq!(invocations.lock().unwrap().len(), 4);
    assert_eq!(report.published(), 2);
    assert_eq!(report.skipped(), 2);
    assert!(!report.halted);
}
