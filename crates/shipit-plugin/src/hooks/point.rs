//! Hook point storage: handlers tapped in registration order.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use shipit_core::error::AppError;
use shipit_core::result::AppResult;

use super::definitions::HookKind;
use super::handler::{AsyncHookHandler, FnHandler, FnSeriesHandler, SeriesHookHandler};

/// Sync handler used by broadcast and waterfall points.
pub type SyncHandler<A, R> = Arc<dyn Fn(&A) -> AppResult<R> + Send + Sync>;

/// Handler flavours; which one a point accepts depends on its [`HookKind`].
pub(crate) enum Handler<A, R> {
    Sync(SyncHandler<A, R>),
    Async(Arc<dyn AsyncHookHandler<A, R>>),
    Series(Arc<dyn SeriesHookHandler<A>>),
}

/// A handler together with the plugin that registered it.
pub(crate) struct Tap<A, R> {
    /// Registering plugin; diagnostics only.
    pub(crate) owner: String,
    pub(crate) handler: Handler<A, R>,
}

/// A named extension point with a fixed composition contract.
///
/// `A` is the argument type handlers receive and `R` what each handler
/// returns: `()` for broadcast, series and parallel points, `A` for
/// waterfalls and `Option<T>` for series-bail points.
pub struct HookPoint<A, R = ()> {
    name: &'static str,
    kind: HookKind,
    pub(crate) taps: Vec<Tap<A, R>>,
}

impl<A, R> HookPoint<A, R> {
    /// Creates an empty hook point.
    pub fn new(name: &'static str, kind: HookKind) -> Self {
        Self {
            name,
            kind,
            taps: Vec::new(),
        }
    }

    /// Returns the point name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the composition kind.
    pub fn kind(&self) -> HookKind {
        self.kind
    }

    /// Returns whether any handler is tapped.
    pub fn is_used(&self) -> bool {
        !self.taps.is_empty()
    }

    /// Returns the number of tapped handlers.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Returns `true` if no handler is tapped.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Plugin names in registration order.
    pub fn owners(&self) -> Vec<&str> {
        self.taps.iter().map(|tap| tap.owner.as_str()).collect()
    }

    /// Taps a sync handler on a broadcast or waterfall point.
    pub fn tap<F>(&mut self, owner: &str, handler: F) -> AppResult<()>
    where
        F: Fn(&A) -> AppResult<R> + Send + Sync + 'static,
    {
        self.expect_kind(&[HookKind::Broadcast, HookKind::Waterfall], owner)?;
        self.push(owner, Handler::Sync(Arc::new(handler)));
        Ok(())
    }

    /// Taps an async handler on a series-bail or parallel-broadcast point.
    pub fn tap_async(
        &mut self,
        owner: &str,
        handler: Arc<dyn AsyncHookHandler<A, R>>,
    ) -> AppResult<()> {
        self.expect_kind(&[HookKind::SeriesBail, HookKind::ParallelBroadcast], owner)?;
        self.push(owner, Handler::Async(handler));
        Ok(())
    }

    /// Taps a handler on a series point.
    pub fn tap_series(
        &mut self,
        owner: &str,
        handler: Arc<dyn SeriesHookHandler<A>>,
    ) -> AppResult<()> {
        self.expect_kind(&[HookKind::Series], owner)?;
        self.push(owner, Handler::Series(handler));
        Ok(())
    }

    /// Drops handlers tapped after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        if self.taps.len() > len {
            debug!(hook = %self.name, removed = self.taps.len() - len, "Hook handlers removed");
            self.taps.truncate(len);
        }
    }

    fn push(&mut self, owner: &str, handler: Handler<A, R>) {
        self.taps.push(Tap {
            owner: owner.to_string(),
            handler,
        });

        debug!(
            hook = %self.name,
            kind = %self.kind,
            owner = %owner,
            position = self.taps.len(),
            "Hook handler tapped"
        );
    }

    fn expect_kind(&self, accepted: &[HookKind], owner: &str) -> AppResult<()> {
        if accepted.contains(&self.kind) {
            Ok(())
        } else {
            Err(AppError::hook(format!(
                "Plugin '{}' tapped '{}' with a handler that does not fit its {} contract",
                owner, self.name, self.kind
            )))
        }
    }

    pub(crate) fn ensure_callable(&self, expected: HookKind) -> AppResult<()> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(AppError::hook(format!(
                "Hook '{}' is a {} point and cannot be called as {}",
                self.name, self.kind, expected
            )))
        }
    }

    /// Prefixes a handler failure with the point and plugin that produced it.
    pub(crate) fn attribute(&self, owner: &str, err: AppError) -> AppError {
        AppError {
            message: format!(
                "'{}' hook failed in plugin '{}': {}",
                self.name, owner, err.message
            ),
            ..err
        }
    }

    pub(crate) fn mismatched(&self, owner: &str) -> AppError {
        AppError::hook(format!(
            "Handler of plugin '{}' does not match the {} contract of '{}'",
            owner, self.kind, self.name
        ))
    }
}

impl<A, R> HookPoint<A, R>
where
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
{
    /// Taps an async closure on a series-bail or parallel-broadcast point.
    pub fn tap_fn<F, Fut>(&mut self, owner: &str, handler: F) -> AppResult<()>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<R>> + Send + 'static,
    {
        self.tap_async(owner, Arc::new(FnHandler(handler)))
    }

    /// Taps an async closure on a series point; its result replaces the arguments.
    pub fn tap_series_fn<F, Fut>(&mut self, owner: &str, handler: F) -> AppResult<()>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<A>> + Send + 'static,
    {
        self.tap_series(owner, Arc::new(FnSeriesHandler(handler)))
    }
}

impl<A, R> std::fmt::Debug for HookPoint<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookPoint")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("owners", &self.owners())
            .finish()
    }
}
