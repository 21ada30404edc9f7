//! Integration tests for trunk releases.

use std::sync::Arc;

use shipit::{CiContext, ErrorKind, ShipOptions};

use super::helpers::{Journal, RegistryPlugin, TestApp, entries};

#[tokio::test]
async fn test_minor_release_end_to_end() {
    let app = TestApp::new();
    app.merge_request(3, "Fix crash on empty input", &["patch"], "");
    app.merge_request(4, "Add widget export", &["minor"], "");
    let journal = Journal::default();

    let shipit = app
        .shipit(
            app.config(),
            CiContext::local().with_branch("main"),
            vec![Arc::new(RegistryPlugin::new(journal.clone()))],
        )
        .await;
    let report = shipit.shipit(&ShipOptions::default()).await.unwrap();

    assert_eq!(report.version.as_deref(), Some("v1.3.0"));
    assert_eq!(report.last_release.as_deref(), Some("v1.2.3"));
    assert_eq!(report.commits.len(), 2);

    let releases = app.host.releases();
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].tag, "v1.3.0");
    assert!(releases[0].notes.contains("Add widget export (#4)"));

    let changelog = std::fs::read_to_string(app.path.join("CHANGELOG.md")).unwrap();
    assert!(changelog.contains("## v1.3.0"));
    assert_eq!(app.recent_subjects(1), vec!["Update CHANGELOG.md [skip ci]"]);

    for number in [3, 4] {
        assert!(app.host.labels_of(number).contains(&"released".to_string()));
        assert!(app.host.comments(number)[0].body.contains("v1.3.0"));
    }

    assert_eq!(
        entries(&journal),
        vec![
            "version v1.3.0".to_string(),
            "after_version v1.3.0".to_string(),
            "publish v1.3.0".to_string(),
            "after_publish v1.3.0".to_string(),
            "after_release v1.3.0".to_string(),
            "after_ship Some(\"v1.3.0\")".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_major_wins_over_skip_on_other_commit() {
    let app = TestApp::new();
    app.merge_request(5, "Internal cleanup", &["skip-release"], "");
    app.merge_request(6, "Drop legacy API", &["major"], "");

    let shipit = app
        .shipit(app.config(), CiContext::local(), Vec::new())
        .await;

    assert_eq!(
        shipit.next_version().await.unwrap().as_deref(),
        Some("v2.0.0")
    );
}

#[tokio::test]
async fn test_unlabelled_history_does_not_release() {
    let app = TestApp::new();
    app.merge_request(7, "Update docs", &["documentation"], "");
    app.commit("Tidy whitespace");
    let journal = Journal::default();

    let shipit = app
        .shipit(
            app.config(),
            CiContext::local(),
            vec![Arc::new(RegistryPlugin::new(journal.clone()))],
        )
        .await;
    let report = shipit.shipit(&ShipOptions::default()).await.unwrap();

    assert_eq!(report.version, None);
    assert!(entries(&journal).is_empty());
    assert_eq!(app.host.mutations(), 0);
    assert!(!app.path.join("CHANGELOG.md").exists());
}

#[tokio::test]
async fn test_dry_run_has_no_side_effects() {
    let app = TestApp::new();
    app.merge_request(8, "Add importer", &["minor"], "Fixes #20");
    let journal = Journal::default();

    let shipit = app
        .shipit(
            app.config(),
            CiContext::local(),
            vec![Arc::new(RegistryPlugin::new(journal.clone()))],
        )
        .await;
    let report = shipit
        .shipit(&ShipOptions {
            dry_run: true,
            ..ShipOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(report.version.as_deref(), Some("v1.3.0"));
    assert!(entries(&journal).is_empty());
    assert_eq!(app.host.mutations(), 0);
    assert!(!app.path.join("CHANGELOG.md").exists());
    assert_eq!(app.recent_subjects(1), vec!["Add importer (#8)"]);
}

#[tokio::test]
async fn test_publish_failure_stops_before_release() {
    let app = TestApp::new();
    app.merge_request(9, "Add exporter", &["minor"], "");
    let journal = Journal::default();
    let registry = RegistryPlugin {
        fail_publish: Some("registry rejected the upload".to_string()),
        ..RegistryPlugin::new(journal.clone())
    };

    let shipit = app
        .shipit(app.config(), CiContext::local(), vec![Arc::new(registry)])
        .await;
    let err = shipit.shipit(&ShipOptions::default()).await.unwrap_err();

    assert!(err.message.contains("registry rejected the upload"));
    assert!(err.message.contains("'publish'"));
    assert!(app.host.releases().is_empty());
    assert_eq!(app.host.labels_of(9), vec!["minor".to_string()]);
    assert_eq!(
        entries(&journal),
        vec![
            "version v1.3.0".to_string(),
            "after_version v1.3.0".to_string(),
            "publish v1.3.0".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_missing_credential_is_rejected_before_side_effects() {
    let app = TestApp::new();
    app.merge_request(10, "Add widgets", &["minor"], "");

    let mut config = app.config();
    config.token = None;

    let err = shipit::bootstrap(
        config,
        app.host.clone(),
        shipit::BootstrapOptions {
            repo_path: Some(app.path.clone()),
            ci: Some(CiContext::local()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(err.is(ErrorKind::Configuration));
    assert_eq!(app.host.mutations(), 0);
}
