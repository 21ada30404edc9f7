//! Hook dispatch: one calling method per composition kind.
//!
//! - Broadcast: handlers run in registration order, results discarded.
//! - Waterfall: each handler receives the previous handler's result.
//! - Series: handlers awaited in order; the first failure aborts the rest.
//! - SeriesBail: handlers awaited in order until one answers `Some`.
//! - ParallelBroadcast: handlers run concurrently; the first failure is
//!   reported and side effects of sibling handlers are not rolled back.
//!
//! Every handler failure propagates; nothing is swallowed.

use futures::future::try_join_all;
use tracing::{debug, error};

use shipit_core::result::AppResult;

use super::definitions::HookKind;
use super::point::{Handler, HookPoint};

impl<A> HookPoint<A, ()> {
    /// Calls a broadcast point.
    pub fn call(&self, args: &A) -> AppResult<()> {
        self.ensure_callable(HookKind::Broadcast)?;
        debug!(hook = %self.name(), handler_count = self.len(), "Calling broadcast hook");

        for tap in &self.taps {
            let Handler::Sync(handler) = &tap.handler else {
                return Err(self.mismatched(&tap.owner));
            };
            (**handler)(args).map_err(|e| self.report(&tap.owner, e))?;
        }
        Ok(())
    }

    /// Calls a series point.
    pub async fn series(&self, args: &mut A) -> AppResult<()> {
        self.ensure_callable(HookKind::Series)?;
        debug!(hook = %self.name(), handler_count = self.len(), "Calling series hook");

        for tap in &self.taps {
            let Handler::Series(handler) = &tap.handler else {
                return Err(self.mismatched(&tap.owner));
            };
            handler
                .handle(args)
                .await
                .map_err(|e| self.report(&tap.owner, e))?;
        }
        Ok(())
    }

    /// Calls a parallel-broadcast point and waits for every handler.
    pub async fn parallel(&self, args: &A) -> AppResult<()> {
        self.ensure_callable(HookKind::ParallelBroadcast)?;
        debug!(hook = %self.name(), handler_count = self.len(), "Calling parallel hook");

        let calls = self.taps.iter().map(|tap| async move {
            let Handler::Async(handler) = &tap.handler else {
                return Err(self.mismatched(&tap.owner));
            };
            handler
                .handle(args)
                .await
                .map_err(|e| self.report(&tap.owner, e))
        });

        try_join_all(calls).await?;
        Ok(())
    }
}

impl<A> HookPoint<A, A> {
    /// Threads `initial` through a waterfall point and returns the final value.
    pub fn waterfall(&self, initial: A) -> AppResult<A> {
        self.ensure_callable(HookKind::Waterfall)?;
        debug!(hook = %self.name(), handler_count = self.len(), "Calling waterfall hook");

        let mut current = initial;
        for tap in &self.taps {
            let Handler::Sync(handler) = &tap.handler else {
                return Err(self.mismatched(&tap.owner));
            };
            current = (**handler)(&current).map_err(|e| self.report(&tap.owner, e))?;
        }
        Ok(current)
    }
}

impl<A, T> HookPoint<A, Option<T>> {
    /// Calls a series-bail point; the first `Some` answer wins and the
    /// remaining handlers are skipped. `Ok(None)` means nobody answered.
    pub async fn bail(&self, args: &A) -> AppResult<Option<T>> {
        self.ensure_callable(HookKind::SeriesBail)?;
        debug!(hook = %self.name(), handler_count = self.len(), "Calling series-bail hook");

        for tap in &self.taps {
            let Handler::Async(handler) = &tap.handler else {
                return Err(self.mismatched(&tap.owner));
            };
            if let Some(answer) = handler
                .handle(args)
                .await
                .map_err(|e| self.report(&tap.owner, e))?
            {
                debug!(hook = %self.name(), owner = %tap.owner, "Hook answered");
                return Ok(Some(answer));
            }
        }
        Ok(None)
    }
}

impl<A, R> HookPoint<A, R> {
    fn report(&self, owner: &str, err: shipit_core::AppError) -> shipit_core::AppError {
        error!(hook = %self.name(), owner = %owner, error = %err, "Hook handler failed");
        self.attribute(owner, err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use shipit_core::{AppError, ErrorKind};

    use super::*;

    #[test]
    fn test_broadcast_runs_all_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut point: HookPoint<String> = HookPoint::new("before_run", HookKind::Broadcast);
        for name in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            point
                .tap(name, move |arg: &String| {
                    seen.lock().unwrap().push(format!("{name}:{arg}"));
                    Ok(())
                })
                .unwrap();
        }

        point.call(&"x".to_string()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["a:x", "b:x", "c:x"]);
    }

    #[test]
    fn test_waterfall_threads_results() {
        let mut point: HookPoint<Vec<String>, Vec<String>> =
            HookPoint::new("modify_config", HookKind::Waterfall);
        point
            .tap("npm", |v: &Vec<String>| {
                let mut next = v.clone();
                next.push("npm".into());
                Ok(next)
            })
            .unwrap();
        point
            .tap("slack", |v: &Vec<String>| {
                let mut next = v.clone();
                next.push(format!("slack-after-{}", v.len()));
                Ok(next)
            })
            .unwrap();

        let result = point.waterfall(vec!["base".into()]).unwrap();
        assert_eq!(result, vec!["base", "npm", "slack-after-2"]);
    }

    #[test]
    fn test_waterfall_without_taps_returns_initial() {
        let point: HookPoint<u8, u8> = HookPoint::new("modify_config", HookKind::Waterfall);
        assert_eq!(point.waterfall(7).unwrap(), 7);
    }

    #[test]
    fn test_wrong_call_kind_is_rejected() {
        let point: HookPoint<u8, u8> = HookPoint::new("modify_config", HookKind::Waterfall);
        let broadcast: HookPoint<u8> = HookPoint::new("publish", HookKind::ParallelBroadcast);
        assert!(broadcast.call(&1).is_err());
        assert!(point.waterfall(1).is_ok());
    }

    #[tokio::test]
    async fn test_series_failure_stops_remaining() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut point: HookPoint<u32> = HookPoint::new("after_add_to_changelog", HookKind::Series);

        let c = Arc::clone(&calls);
        point
            .tap_series_fn("first", move |n: u32| {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n) }
            })
            .unwrap();
        point
            .tap_series_fn("broken", |_n: u32| async {
                Err(AppError::internal("disk full"))
            })
            .unwrap();
        let c = Arc::clone(&calls);
        point
            .tap_series_fn("last", move |n: u32| {
                c.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n) }
            })
            .unwrap();

        let err = point.series(&mut 1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(err.message.contains("broken"));
        assert!(err.message.contains("disk full"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_series_handlers_amend_arguments() {
        let mut point: HookPoint<String> =
            HookPoint::new("before_commit_changelog", HookKind::Series);
        point
            .tap_series_fn("a", |s: String| async move { Ok(format!("{s}+a")) })
            .unwrap();
        point
            .tap_series_fn("b", |s: String| async move { Ok(format!("{s}+b")) })
            .unwrap();

        let mut notes = "notes".to_string();
        point.series(&mut notes).await.unwrap();
        assert_eq!(notes, "notes+a+b");
    }

    #[tokio::test]
    async fn test_bail_first_answer_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut point: HookPoint<u32, Option<String>> =
            HookPoint::new("canary", HookKind::SeriesBail);

        point
            .tap_fn("no-opinion", |_n: u32| async { Ok(None) })
            .unwrap();
        point
            .tap_fn("npm", |n: u32| async move { Ok(Some(format!("npm-{n}"))) })
            .unwrap();
        let c = Arc::clone(&calls);
        point
            .tap_fn("never", move |_n: u32| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Ok(Some("never".to_string())) }
            })
            .unwrap();

        assert_eq!(point.bail(&3).await.unwrap(), Some("npm-3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bail_error_is_not_no_opinion() {
        let mut point: HookPoint<u32, Option<String>> =
            HookPoint::new("canary", HookKind::SeriesBail);
        point
            .tap_fn("broken", |_n: u32| async { Err(AppError::internal("boom")) })
            .unwrap();
        point
            .tap_fn("fallback", |_n: u32| async { Ok(Some("x".to_string())) })
            .unwrap();

        assert!(point.bail(&1).await.is_err());
    }

    #[tokio::test]
    async fn test_bail_without_taps_is_none() {
        let point: HookPoint<u32, Option<String>> = HookPoint::new("canary", HookKind::SeriesBail);
        assert!(!point.is_used());
        assert_eq!(point.bail(&1).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_handlers_run_concurrently() {
        let mut point: HookPoint<u32> = HookPoint::new("publish", HookKind::ParallelBroadcast);
        for name in ["npm", "crates", "docker"] {
            point
                .tap_fn(name, |_n: u32| async {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    Ok(())
                })
                .unwrap();
        }

        let started = tokio::time::Instant::now();
        point.parallel(&1).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_parallel_failure_fails_the_point() {
        let ok_calls = Arc::new(AtomicUsize::new(0));
        let mut point: HookPoint<u32> = HookPoint::new("publish", HookKind::ParallelBroadcast);

        let c = Arc::clone(&ok_calls);
        point
            .tap_fn("a", move |_n: u32| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .unwrap();
        point
            .tap_fn("b", |_n: u32| async {
                Err(AppError::platform(500, "registry unavailable"))
            })
            .unwrap();

        let err = point.parallel(&1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Platform);
        assert_eq!(err.status, Some(500));
        assert!(err.message.contains("'b'"));
        assert_eq!(ok_calls.load(Ordering::SeqCst), 1);
    }
}
