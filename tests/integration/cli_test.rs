//! Integration tests for the command-line surface.

use clap::Parser;

use shipit::CiContext;
use shipit::cli::Cli;

use super::helpers::TestApp;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("shipit").chain(args.iter().copied()))
        .expect("Failed to parse arguments")
}

#[tokio::test]
async fn test_next_version_prints_version() {
    let app = TestApp::new();
    app.merge_request(3, "Fix crash on empty input", &["patch"], "");
    app.merge_request(4, "Add widget export", &["minor"], "");
    let shipit = app.shipit(app.config(), CiContext::local(), Vec::new()).await;

    let output = parse(&["next-version"]).execute(&shipit).await.unwrap();
    assert_eq!(output, "v1.3.0");

    let output = parse(&["version"]).execute(&shipit).await.unwrap();
    assert_eq!(output, "minor");
}

#[tokio::test]
async fn test_nothing_to_release_prints_nothing() {
    let app = TestApp::new();
    app.commit("Tidy whitespace");
    let shipit = app.shipit(app.config(), CiContext::local(), Vec::new()).await;

    assert_eq!(parse(&["next-version"]).execute(&shipit).await.unwrap(), "");
    assert_eq!(parse(&["version"]).execute(&shipit).await.unwrap(), "");
}

#[tokio::test]
async fn test_dry_run_shipit_as_json() {
    let app = TestApp::new();
    app.merge_request(8, "Add importer", &["minor"], "");
    let shipit = app.shipit(app.config(), CiContext::local(), Vec::new()).await;

    let output = parse(&["--format", "json", "shipit", "--dry-run"])
        .execute(&shipit)
        .await
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["version"], "v1.3.0");
    assert_eq!(report["dry_run"], true);
    assert_eq!(app.host.mutations(), 0);
}

#[tokio::test]
async fn test_label_and_labels_commands() {
    let app = TestApp::new();
    let shipit = app.shipit(app.config(), CiContext::local(), Vec::new()).await;

    let output = parse(&["label", "--pr", "5", "minor", "--dry-run"])
        .execute(&shipit)
        .await
        .unwrap();
    assert_eq!(output, "Would add 'minor'");
    assert!(app.host.labels_of(5).is_empty());

    parse(&["label", "--pr", "5", "minor"])
        .execute(&shipit)
        .await
        .unwrap();
    let output = parse(&["labels", "--pr", "5"]).execute(&shipit).await.unwrap();
    assert_eq!(output, "minor");
}
