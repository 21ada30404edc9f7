//! CI environment detection.

use shipit_core::types::CiContext;

/// Detects the CI context from the process environment.
pub fn detect() -> CiContext {
    detect_with(|key| std::env::var(key).ok())
}

/// Detects the CI context through `lookup`.
///
/// GitHub Actions and GitLab CI are recognised by their own variables;
/// other services by `CI` together with `BRANCH_NAME` and `BUILD_NUMBER`.
pub fn detect_with<F>(lookup: F) -> CiContext
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if get("GITHUB_ACTIONS").is_some() {
        return CiContext {
            is_ci: true,
            branch: get("GITHUB_HEAD_REF").or_else(|| get("GITHUB_REF_NAME")),
            request_number: get("GITHUB_REF").and_then(|r| pull_number(&r)),
            build_id: get("GITHUB_RUN_NUMBER"),
        };
    }

    if get("GITLAB_CI").is_some() {
        return CiContext {
            is_ci: true,
            branch: get("CI_MERGE_REQUEST_SOURCE_BRANCH_NAME")
                .or_else(|| get("CI_COMMIT_REF_NAME")),
            request_number: get("CI_MERGE_REQUEST_IID").and_then(|n| n.parse().ok()),
            build_id: get("CI_PIPELINE_IID"),
        };
    }

    CiContext {
        is_ci: get("CI").is_some_and(|v| v != "false" && v != "0"),
        branch: get("BRANCH_NAME"),
        request_number: get("PULL_REQUEST_NUMBER").and_then(|n| n.parse().ok()),
        build_id: get("BUILD_NUMBER"),
    }
}

/// Request number of a `refs/pull/<n>/merge` ref.
fn pull_number(git_ref: &str) -> Option<u64> {
    git_ref
        .strip_prefix("refs/pull/")?
        .split('/')
        .next()?
        .parse()
        .ok()
}
