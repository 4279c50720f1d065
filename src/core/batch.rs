use crate::core::tracker::CourseTracker;
use crate::core::PageSource;
use crate::domain::model::{CourseQuery, StatusReport};
use crate::utils::error::{Result, TrackerError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs one independent lookup task per query, at most `limit` in flight.
/// Reports come back in input order; a failed lookup never cancels the rest.
pub async fn check_all<S>(
    tracker: Arc<CourseTracker<S>>,
    queries: Vec<CourseQuery>,
    limit: usize,
) -> Vec<StatusReport>
where
    S: PageSource + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!("Checking {} courses ({} at a time)", queries.len(), limit.max(1));

    for (index, query) in queries.iter().cloned().enumerate() {
        let tracker = Arc::clone(&tracker);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => tracker.check_status(query.crn, &query.subject).await,
                Err(e) => Err(TrackerError::TaskError {
                    message: e.to_string(),
                }),
            };
            (index, result)
        });
    }

    let mut results: Vec<Option<Result<_>>> = queries.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => {
                if let Err(e) = &result {
                    tracing::warn!("Lookup for {} failed: {}", queries[index].crn, e);
                }
                results[index] = Some(result);
            }
            Err(e) => tracing::error!("Lookup task aborted: {}", e),
        }
    }

    queries
        .into_iter()
        .zip(results)
        .map(|(query, result)| {
            let result = result.unwrap_or_else(|| {
                Err(TrackerError::TaskError {
                    message: "lookup task did not complete".to_string(),
                })
            });
            StatusReport::from_result(query, &result)
        })
        .collect()
}
