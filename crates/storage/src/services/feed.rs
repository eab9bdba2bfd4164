use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::Database;
use crate::dto::leaderboard::{LeaderboardEntry, LeaderboardQuery};
use crate::error::Result;
use crate::repository::LiftRepository;
use crate::services::ranking;

type SnapshotFuture = Pin<Box<dyn Future<Output = Result<Vec<LeaderboardEntry>>> + Send>>;
type SnapshotFn = Arc<dyn Fn(LeaderboardQuery) -> SnapshotFuture + Send + Sync>;

/// Push-based leaderboard views.
///
/// Every mutation of the lift set calls `notify_changed`; each subscription
/// then recomputes its full view from scratch and hands the fresh snapshot
/// to its callback. There is no diffing and no per-view cache — the backing
/// query is cheap at this volume and recompute-from-scratch cannot go
/// stale. A subscription also receives one snapshot immediately on
/// registration.
#[derive(Clone)]
pub struct LeaderboardFeed {
    snapshot: SnapshotFn,
    changed: broadcast::Sender<()>,
}

impl LeaderboardFeed {
    pub fn new(db: Database) -> Self {
        Self::with_snapshot_source(Arc::new(move |query| {
            let db = db.clone();
            Box::pin(async move {
                let best = LiftRepository::new(db.pool()).best_per_user().await?;
                Ok(ranking::rank(best, query.institution.as_deref(), query.unit))
            })
        }))
    }

    /// The snapshot source is injectable so the subscription lifecycle can
    /// be exercised without a database.
    fn with_snapshot_source(snapshot: SnapshotFn) -> Self {
        let (changed, _) = broadcast::channel(16);
        Self { snapshot, changed }
    }

    /// Signal that the underlying lift set changed. Fire-and-forget; having
    /// no subscribers is not an error.
    pub fn notify_changed(&self) {
        let _ = self.changed.send(());
    }

    /// Register a callback for a leaderboard view. The callback gets the
    /// current snapshot right away and a recomputed one after every change
    /// notification, until the returned handle is cancelled or dropped.
    pub fn subscribe<F>(&self, query: LeaderboardQuery, mut deliver: F) -> FeedSubscription
    where
        F: FnMut(Vec<LeaderboardEntry>) + Send + 'static,
    {
        let mut rx = self.changed.subscribe();
        let snapshot = self.snapshot.clone();

        let task = tokio::spawn(async move {
            recompute_and_deliver(&snapshot, &query, &mut deliver).await;

            loop {
                match rx.recv().await {
                    // A lagged receiver just missed intermediate
                    // notifications; the next recompute is full anyway.
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        recompute_and_deliver(&snapshot, &query, &mut deliver).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        FeedSubscription { task }
    }
}

async fn recompute_and_deliver<F>(snapshot: &SnapshotFn, query: &LeaderboardQuery, deliver: &mut F)
where
    F: FnMut(Vec<LeaderboardEntry>),
{
    match snapshot(query.clone()).await {
        Ok(entries) => deliver(entries),
        Err(e) => {
            // The subscription survives a failed recompute; the next change
            // notification tries again.
            tracing::warn!("Leaderboard recompute failed: {e}");
        }
    }
}

/// Handle for an active leaderboard subscription. Cancelling (or dropping)
/// unregisters the callback synchronously; no further snapshots are
/// delivered afterwards.
pub struct FeedSubscription {
    task: JoinHandle<()>,
}

impl FeedSubscription {
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use chrono::Utc;
    use tokio::sync::mpsc;
    use tokio::time::{Duration, timeout};

    use super::*;
    use crate::models::Gender;

    fn entry(rank: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            user_id: "u1".to_string(),
            display_name: "Alice".to_string(),
            squat: 300.0,
            bench: 200.0,
            deadlift: 350.0,
            body_weight: 180.0,
            total: 850.0,
            dots_score: 262.71,
            age: 25,
            gender: Gender::Male,
            institution: String::new(),
            created_at: Utc::now(),
        }
    }

    /// A feed whose snapshots come from a counter instead of the database,
    /// so each delivery is distinguishable.
    fn counting_feed() -> LeaderboardFeed {
        let recomputes = Arc::new(AtomicU32::new(0));
        LeaderboardFeed::with_snapshot_source(Arc::new(move |_query| {
            let n = recomputes.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move { Ok(vec![entry(n)]) })
        }))
    }

    async fn next_delivery(
        rx: &mut mpsc::UnboundedReceiver<Vec<LeaderboardEntry>>,
    ) -> Option<Vec<LeaderboardEntry>> {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting on the feed")
    }

    #[tokio::test]
    async fn delivers_a_snapshot_immediately_on_subscribe() {
        let feed = counting_feed();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _subscription = feed.subscribe(LeaderboardQuery::default(), move |entries| {
            let _ = tx.send(entries);
        });

        let first = next_delivery(&mut rx).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].rank, 1);
    }

    #[tokio::test]
    async fn redelivers_after_every_change_notification() {
        let feed = counting_feed();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _subscription = feed.subscribe(LeaderboardQuery::default(), move |entries| {
            let _ = tx.send(entries);
        });

        assert_eq!(next_delivery(&mut rx).await.unwrap()[0].rank, 1);

        feed.notify_changed();
        assert_eq!(next_delivery(&mut rx).await.unwrap()[0].rank, 2);

        feed.notify_changed();
        assert_eq!(next_delivery(&mut rx).await.unwrap()[0].rank, 3);
    }

    #[tokio::test]
    async fn cancel_stops_deliveries() {
        let feed = counting_feed();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let subscription = feed.subscribe(LeaderboardQuery::default(), move |entries| {
            let _ = tx.send(entries);
        });

        assert!(next_delivery(&mut rx).await.is_some());

        subscription.cancel();
        feed.notify_changed();

        // The aborted task owned the only sender, so the channel closes
        // without another delivery.
        assert!(next_delivery(&mut rx).await.is_none());
    }

    #[tokio::test]
    async fn dropping_the_handle_unregisters_the_callback() {
        let feed = counting_feed();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let subscription = feed.subscribe(LeaderboardQuery::default(), move |entries| {
            let _ = tx.send(entries);
        });

        assert!(next_delivery(&mut rx).await.is_some());

        drop(subscription);
        feed.notify_changed();

        assert!(next_delivery(&mut rx).await.is_none());
    }
}
