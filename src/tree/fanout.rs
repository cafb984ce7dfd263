//! Per-directory fan-out
//!
//! Every entry of a directory level gets its own task. Results come back in
//! the order the tasks were handed in, regardless of completion order.

use crate::error::Result;
use std::future::Future;
use tokio::task::JoinSet;

/// Run `tasks` concurrently and collect their values in input order.
///
/// The first task to finish with an error decides the result. Siblings still
/// running at that point are detached rather than aborted, so their side
/// effects may still land after this returns. A panicking task panics the
/// caller.
pub(crate) async fn join_ordered<T, Fut, I>(tasks: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let mut set = JoinSet::new();
    let mut count = 0;
    for (index, task) in tasks.into_iter().enumerate() {
        set.spawn(async move { (index, task.await) });
        count += 1;
    }

    let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, Ok(value))) => slots[index] = Some(value),
            Ok((_, Err(err))) => {
                set.detach_all();
                return Err(err);
            }
            Err(join_err) => {
                set.detach_all();
                if join_err.is_panic() {
                    std::panic::resume_unwind(join_err.into_panic());
                }
                return Err(join_err.into());
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let delays = [30u64, 0, 15, 5];
        let tasks = delays.iter().enumerate().map(|(i, delay)| {
            let delay = *delay;
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, TreeError>(i)
            }
        });

        let values = join_ordered(tasks).await.unwrap();
        assert_eq!(values, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let tasks: Vec<std::future::Ready<Result<u8>>> = Vec::new();
        assert!(join_ordered(tasks).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_error_wins_and_siblings_finish() {
        let finished = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for i in 0..4u64 {
            let finished = Arc::clone(&finished);
            tasks.push(async move {
                if i == 1 {
                    return Err(TreeError::NotFound {
                        path: PathBuf::from("boom"),
                    });
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            });
        }

        let err = join_ordered(tasks).await.unwrap_err();
        assert_eq!(err.path(), Some(std::path::Path::new("boom")));

        // Detached siblings keep running to completion
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    #[should_panic(expected = "sibling blew up")]
    async fn test_panics_propagate() {
        let tasks = (0..2).map(|i| async move {
            if i == 1 {
                panic!("sibling blew up");
            }
            Ok::<_, TreeError>(i)
        });
        let _ = join_ordered(tasks).await;
    }
}
