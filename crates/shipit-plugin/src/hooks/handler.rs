//! Async handler contracts and closure adapters.

use std::future::Future;

use async_trait::async_trait;

use shipit_core::result::AppResult;

/// Handler for series-bail and parallel-broadcast points.
///
/// Series-bail points use `R = Option<T>`, where `None` means "no opinion".
#[async_trait]
pub trait AsyncHookHandler<A, R>: Send + Sync {
    /// Handles one invocation.
    async fn handle(&self, args: &A) -> AppResult<R>;
}

/// Handler for series points. Handlers run strictly one after another,
/// so each one may amend the arguments seen by the next.
#[async_trait]
pub trait SeriesHookHandler<A>: Send + Sync {
    /// Handles one invocation.
    async fn handle(&self, args: &mut A) -> AppResult<()>;
}

/// Adapts `Fn(A) -> Future<Output = AppResult<R>>` closures.
///
/// The closure receives its own clone of the arguments.
pub struct FnHandler<F>(pub F);

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FnHandler").field(&"<closure>").finish()
    }
}

#[async_trait]
impl<A, R, F, Fut> AsyncHookHandler<A, R> for FnHandler<F>
where
    A: Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = AppResult<R>> + Send + 'static,
{
    async fn handle(&self, args: &A) -> AppResult<R> {
        (self.0)(args.clone()).await
    }
}

/// Adapts `Fn(A) -> Future<Output = AppResult<A>>` closures to series points;
/// the returned value replaces the arguments.
pub struct FnSeriesHandler<F>(pub F);

impl<F> std::fmt::Debug for FnSeriesHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FnSeriesHandler").field(&"<closure>").finish()
    }
}

#[async_trait]
impl<A, F, Fut> SeriesHookHandler<A> for FnSeriesHandler<F>
where
    A: Clone + Send + Sync + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = AppResult<A>> + Send + 'static,
{
    async fn handle(&self, args: &mut A) -> AppResult<()> {
        *args = (self.0)(args.clone()).await?;
        Ok(())
    }
}
