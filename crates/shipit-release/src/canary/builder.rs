//! Canary suffix construction.

/// Builds the suffix that makes a canary unique.
///
/// - request and build known: `.{request}.{build}`
/// - only one known: `.{that}.{short_sha}`
/// - neither known: `.{short_sha}`
pub fn build_canary_suffix(
    request_number: Option<u64>,
    build_id: Option<&str>,
    short_sha: &str,
) -> String {
    match (request_number, build_id) {
        (Some(request), Some(build)) => format!(".{request}.{build}"),
        (Some(request), None) => format!(".{request}.{short_sha}"),
        (None, Some(build)) => format!(".{build}.{short_sha}"),
        (None, None) => format!(".{short_sha}"),
    }
}

/// Full canary version: `{next_version}-canary{suffix}`.
pub fn canary_version(next_version: &str, suffix: &str) -> String {
    format!("{next_version}-canary{suffix}")
}
