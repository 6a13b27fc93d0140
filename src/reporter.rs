use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::users::repo::UserRepository;

/// How often the total user count is sampled.
const REPORT_PERIOD: Duration = Duration::from_secs(10);

/// Periodically samples the total user count and logs it.
///
/// A failed sample is logged and skipped; the loop only exits on the
/// shutdown signal, never because of a repository error.
pub struct UsageReporter {
    repo: Arc<dyn UserRepository>,
    shutdown_rx: watch::Receiver<bool>,
}

impl UsageReporter {
    pub fn new(repo: Arc<dyn UserRepository>, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self { repo, shutdown_rx }
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(REPORT_PERIOD);
        info!(period_secs = REPORT_PERIOD.as_secs(), "usage reporter started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.repo.count().await {
                        Ok(total) => info!(total, "total registered users"),
                        Err(e) => error!(error = %e, "failed to fetch user count"),
                    }
                }
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("usage reporter shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ServiceError, ServiceResult};
    use crate::users::repo_types::{User, UserUpdate};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountRepo {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountRepo {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl UserRepository for CountRepo {
        async fn save(&self, _user: &User) -> ServiceResult<()> {
            Ok(())
        }
        async fn find_by_id(&self, _id: Uuid) -> ServiceResult<Option<User>> {
            Ok(None)
        }
        async fn find_by_email(&self, _email: &str) -> ServiceResult<Option<User>> {
            Ok(None)
        }
        async fn find_all(&self) -> ServiceResult<Vec<User>> {
            Ok(Vec::new())
        }
        async fn update_fields(&self, _id: Uuid, _fields: &UserUpdate) -> ServiceResult<()> {
            Ok(())
        }
        async fn delete(&self, _id: Uuid) -> ServiceResult<()> {
            Ok(())
        }
        async fn count(&self) -> ServiceResult<i64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ServiceError::Repository(anyhow::anyhow!("count failed")))
            } else {
                Ok(42)
            }
        }
    }

    #[tokio::test]
    async fn shutdown_signal_stops_the_loop() {
        let repo = Arc::new(CountRepo::new(false));
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(UsageReporter::new(repo.clone(), rx).run());

        // First tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(repo.calls.load(Ordering::SeqCst) >= 1);

        tx.send(true).expect("send shutdown");
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reporter should stop on shutdown")
            .expect("reporter task should not panic");
    }

    #[tokio::test]
    async fn count_failure_does_not_kill_the_loop() {
        let repo = Arc::new(CountRepo::new(true));
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(UsageReporter::new(repo.clone(), rx).run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(repo.calls.load(Ordering::SeqCst) >= 1);

        // Still running after the failed sample, and still responsive to
        // shutdown.
        assert!(!handle.is_finished());
        tx.send(true).expect("send shutdown");
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reporter should stop on shutdown")
            .expect("reporter task should not panic");
    }
}
