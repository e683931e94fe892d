//! Test: missing service directories are skipped, never built

use crate::helpers::*;
use regpush::publish::PublishStrategy;

/// One existing directory, one missing: exactly one build+push, one skip
#[tokio::test]
async fn test_partial_workspace_skips_missing() {
    let workdir = workspace_with_dirs(&["frontend"]);
    let config = config_for(&["frontend", "cart-service"]);

    let mock = MockDocker::new();
    let invocations = mock.invocations();

    let (report, events) =
        run_publisher(mock, &config, PublishStrategy::Sequential, workdir.path()).await;

    let calls = invocations.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            Invocation::Build {
                tag: demo_tag("frontend"),
                context: workdir.path().join("frontend"),
            },
            Invocation::Push {
                tag: demo_tag("frontend"),
            },
        ]
    );

    assert_eq!(published_services(&events), vec!["frontend"]);
    assert_eq!(skipped_services(&events), vec!["cart-service"]);
    assert!(completed_last(&events));

    assert_eq!(report.published(), 1);
    assert_eq!(report.skipped(), 1);
    assert!(!report.halted);
}

/// No directories at all: zero invocations, four skips, run still completes
#[tokio::test]
async fn test_empty_workspace_skips_everything() {
    let workdir = workspace_with_dirs(&[]);
    let config = config_for(&["frontend", "cart-service", "order-service", "product-service"]);

    let mock = MockDocker::new();
    let invocations = mock.invocations();

    let (report, events) =
        run_publisher(mock, &config, PublishStrategy::Sequential, workdir.path()).await;

    assert!(invocations.lock().unwrap().is_empty());
    assert_eq!(
        skipped_services(&events),
        vec!["frontend", "cart-service", "order-service", "product-service"]
    );
    assert!(published_services(&events).is_empty());
    assert!(completed_last(&events));

    assert_eq!(report.skipped(), 4);
    assert_eq!(report.published(), 0);
    assert_eq!(report.failed(), 0);
    assert!(!report.halted);
}

/// A same-named file is not a directory; the service is skipped
#[tokio::test]
async fn test_plain_file_is_not_a_build_context() {
    let workdir = workspace_with_dirs(&[]);
    std::fs::write(workdir.path().join("frontend"), "not a directory").unwrap();

    let config = config_for(&["frontend"]);
    let mock = MockDocker::new();
    let invocations = mock.invocations();

    let (report, events) =
        run_publisher(mock, &config, PublishStrategy::Sequential, workdir.path()).await;

    assert!(invocations.lock().unwrap().is_empty());
    assert_eq!(skipped_services(&events), vec!["frontend"]);
    assert_eq!(report.skipped(), 1);
}
