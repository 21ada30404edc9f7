//! Integration tests for canary builds.

use std::sync::Arc;

use shipit::{CanaryOptions, CanaryStatus, CiContext, ErrorKind, ShipOptions};

use super::helpers::{Journal, RegistryPlugin, TestApp, entries};

#[tokio::test]
async fn test_feature_branch_publishes_canary_and_comments() {
    let app = TestApp::new();
    app.merge_request(11, "Add widgets", &["minor"], "Fixes #30");
    let journal = Journal::default();

    let ci = CiContext::local()
        .with_branch("feature/widgets")
        .with_request(42)
        .with_build("7");
    let shipit = app
        .shipit(
            app.config(),
            ci,
            vec![Arc::new(RegistryPlugin::new(journal.clone()))],
        )
        .await;
    let report = shipit.shipit(&ShipOptions::default()).await.unwrap();

    assert_eq!(report.version.as_deref(), Some("v1.3.0-canary.42.7"));
    let canary = report.canary.unwrap();
    assert_eq!(canary.status, CanaryStatus::Published);

    let comments = app.host.comments(42);
    assert_eq!(comments.len(), 1);
    assert!(comments[0].body.contains("v1.3.0-canary.42.7"));

    assert!(app.host.labels_of(42).is_empty());
    assert!(app.host.labels_of(11).is_empty());
    assert!(app.host.comments(30).is_empty());
    assert!(app.host.releases().is_empty());
    assert!(!app.path.join("CHANGELOG.md").exists());

    assert_eq!(
        entries(&journal),
        vec![
            "canary v1.3.0-canary.42.7".to_string(),
            "after_ship Some(\"v1.3.0-canary.42.7\")".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_repeated_canary_edits_one_comment() {
    let app = TestApp::new();
    app.merge_request(12, "Add widgets", &["patch"], "");
    let journal = Journal::default();
    let shipit = app
        .shipit(
            app.config(),
            CiContext::local().with_request(42),
            vec![Arc::new(RegistryPlugin::new(journal))],
        )
        .await;

    shipit
        .canary(&CanaryOptions {
            build_id: Some("1".to_string()),
            ..CanaryOptions::default()
        })
        .await
        .unwrap();
    shipit
        .canary(&CanaryOptions {
            build_id: Some("2".to_string()),
            ..CanaryOptions::default()
        })
        .await
        .unwrap();

    let comments = app.host.comments(42);
    assert_eq!(comments.len(), 1);
    assert!(comments[0].body.contains("v1.2.4-canary.42.2"));
}

#[tokio::test]
async fn test_canary_without_publisher_has_no_side_effects() {
    let app = TestApp::new();
    app.merge_request(13, "Add widgets", &["minor"], "");

    let shipit = app
        .shipit(app.config(), CiContext::local().with_request(42), Vec::new())
        .await;
    let err = shipit.canary(&CanaryOptions::default()).await.unwrap_err();

    assert!(err.is(ErrorKind::Precondition));
    assert_eq!(app.host.mutations(), 0);
}
