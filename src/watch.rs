use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, eyre};

/// Rejects loop settings that would spin or never refresh.
pub fn validate(interval: Duration, iterations: Option<usize>) -> Result<()> {
    if interval.is_zero() {
        return Err(eyre!("--interval-ms must be greater than 0"));
    }
    if iterations == Some(0) {
        return Err(eyre!("--iterations must be greater than 0"));
    }
    Ok(())
}

/// Runs `refresh` on a blocking thread every `interval` until `iterations`
/// refreshes have completed or `shutdown` resolves. A shutdown that fires
/// while a refresh is in flight stops the loop once that refresh returns.
///
/// Returns the number of refreshes that ran.
pub async fn run_until<S, F>(
    interval: Duration,
    iterations: Option<usize>,
    shutdown: S,
    refresh: F,
) -> usize
where
    S: Future,
    F: Fn() -> Result<()> + Send + Sync + 'static,
{
    let refresh = Arc::new(refresh);
    let mut ticker = tokio::time::interval(interval);
    let mut completed = 0usize;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                tracing::info!("interrupted, stopping watch");
                break;
            }
            _ = ticker.tick() => {
                let tick_refresh = Arc::clone(&refresh);
                let outcome = tokio::task::spawn_blocking(move || (*tick_refresh)()).await;

                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => tracing::warn!(error = %err, "snapshot refresh failed"),
                    Err(err) => tracing::warn!(error = %err, "snapshot task aborted"),
                }

                completed += 1;
                if iterations.is_some_and(|max| completed >= max) {
                    break;
                }
            }
        }
    }

    completed
}
