//! Integration tests for release announcements and request commands.

use std::sync::Arc;

use shipit::{CiContext, CommentOptions, ErrorKind, Plugin, ReleaseHooks, ShipOptions};
use shipit_core::config::ShipitConfig;
use shipit_core::result::AppResult;
use shipit_core::types::StatusState;

use super::helpers::{Journal, RegistryPlugin, TestApp};

#[tokio::test]
async fn test_release_announces_on_closed_issues() {
    let app = TestApp::new();
    app.merge_request(7, "Handle timeouts", &["patch"], "Fixes #10, #11");

    let shipit = app
        .shipit(
            app.config(),
            CiContext::local(),
            vec![Arc::new(RegistryPlugin::new(Journal::default()))],
        )
        .await;
    shipit.shipit(&ShipOptions::default()).await.unwrap();

    assert_eq!(
        app.host.labels_of(7),
        vec!["patch".to_string(), "released".to_string()]
    );
    for number in [7, 10, 11] {
        assert!(app.host.labels_of(number).contains(&"released".to_string()));
        let comments = app.host.comments(number);
        assert_eq!(comments.len(), 1);
        assert!(comments[0].body.contains("v1.2.4"));
    }
    assert!(app.host.locked().is_empty());
}

#[tokio::test]
async fn test_lock_issues_when_configured() {
    let app = TestApp::new();
    app.merge_request(7, "Handle timeouts", &["patch"], "Closes #10");
    let mut config = app.config();
    config.lock_issues = true;

    let shipit = app.shipit(config, CiContext::local(), Vec::new()).await;
    shipit.shipit(&ShipOptions::default()).await.unwrap();

    assert_eq!(app.host.locked(), vec![10]);
}

/// Plugin that renames the released label and turns on issue locking
#[derive(Debug)]
struct ShippedLabelPlugin;

impl Plugin for ShippedLabelPlugin {
    fn name(&self) -> &str {
        "shipped-label"
    }

    fn apply(&self, hooks: &mut ReleaseHooks) -> AppResult<()> {
        hooks.modify_config.tap("shipped-label", |config: &ShipitConfig| {
            let mut config = config.clone();
            config.released_label = "shipped".to_string();
            config.lock_issues = true;
            Ok(config)
        })
    }
}

#[tokio::test]
async fn test_announcements_follow_plugin_config() {
    let app = TestApp::new();
    app.merge_request(3, "Handle timeouts", &["patch"], "Fixes #10");

    let shipit = app
        .shipit(
            app.config(),
            CiContext::local(),
            vec![Arc::new(ShippedLabelPlugin)],
        )
        .await;
    assert_eq!(shipit.config().released_label, "shipped");

    shipit.shipit(&ShipOptions::default()).await.unwrap();

    assert_eq!(
        app.host.labels_of(3),
        vec!["patch".to_string(), "shipped".to_string()]
    );
    assert_eq!(app.host.labels_of(10), vec!["shipped".to_string()]);
    assert_eq!(app.host.locked(), vec![10]);
}

#[tokio::test]
async fn test_dry_run_does_not_announce() {
    let app = TestApp::new();
    app.merge_request(3, "Handle timeouts", &["patch"], "Fixes #10");

    let shipit = app
        .shipit(app.config(), CiContext::local(), Vec::new())
        .await;
    let report = shipit
        .shipit(&ShipOptions {
            dry_run: true,
            ..ShipOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(report.version.as_deref(), Some("v1.2.4"));
    assert_eq!(app.host.mutations(), 0);
    assert!(app.host.comments(3).is_empty());
}

#[tokio::test]
async fn test_comment_command_is_idempotent() {
    let app = TestApp::new();
    let shipit = app
        .shipit(app.config(), CiContext::local().with_request(5), Vec::new())
        .await;

    let opts = CommentOptions {
        context: "coverage".to_string(),
        message: Some("Coverage: 91%".to_string()),
        ..CommentOptions::default()
    };
    shipit.comment(&opts).await.unwrap();
    let after_first = app.host.mutations();
    shipit.comment(&opts).await.unwrap();

    assert_eq!(app.host.comments(5).len(), 1);
    assert_eq!(app.host.mutations(), after_first);

    shipit
        .comment(&CommentOptions {
            delete: true,
            ..opts
        })
        .await
        .unwrap();
    assert!(app.host.comments(5).is_empty());
}

#[tokio::test]
async fn test_label_command_without_request_fails() {
    let app = TestApp::new();
    let shipit = app
        .shipit(app.config(), CiContext::local(), Vec::new())
        .await;

    let err = shipit.label(None, "minor", false).await.unwrap_err();
    assert!(err.is(ErrorKind::Precondition));

    assert!(shipit.label(Some(3), "minor", false).await.unwrap());
    assert!(!shipit.label(Some(3), "minor", false).await.unwrap());
    assert_eq!(shipit.labels(Some(3)).await.unwrap(), vec!["minor".to_string()]);
}

#[tokio::test]
async fn test_pr_check_passes_with_release_label() {
    let app = TestApp::new();
    app.merge_request(14, "Add widgets", &["minor"], "");
    let shipit = app
        .shipit(app.config(), CiContext::local().with_request(14), Vec::new())
        .await;

    let status = shipit.pr_check(None, false).await.unwrap();

    assert_eq!(status.state, StatusState::Success);
    assert_eq!(app.host.statuses().len(), 1);
}
