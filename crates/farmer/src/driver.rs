use {
    crate::traits::{AccountRunner, CredentialSource},
    chrono::{DateTime, Local},
    std::{sync::Arc, time::Duration},
    tokio::{
        sync::watch,
        task::{JoinError, JoinHandle},
        time::MissedTickBehavior,
    },
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub accounts: usize,
    pub processed: usize,
    /// Successful swaps and stakes over all accounts.
    pub completed: usize,
}

/// Pushes every configured wallet through the account runner, one after the
/// other.
pub struct BatchDriver {
    credentials: Arc<dyn CredentialSource>,
    runner: Arc<dyn AccountRunner>,
    step_delay: Duration,
}

impl BatchDriver {
    pub fn new(
        credentials: Arc<dyn CredentialSource>,
        runner: Arc<dyn AccountRunner>,
        step_delay: Duration,
    ) -> Self {
        Self {
            credentials,
            runner,
            step_delay,
        }
    }

    /// Runs all wallets once. A raised `shutdown` flag is checked before
    /// each wallet, a wallet that already started is always finished.
    pub async fn run_pass(&self, shutdown: &watch::Receiver<bool>) -> PassSummary {
        tracing::info!("starting multi-account pass");
        let signers = self.credentials.load();
        if signers.is_empty() {
            tracing::error!("no private keys found, skipping pass");
            return PassSummary::default();
        }

        let mut summary = PassSummary {
            accounts: signers.len(),
            ..Default::default()
        };
        for (i, signer) in signers.into_iter().enumerate() {
            if *shutdown.borrow() {
                tracing::info!("shutdown requested, not starting remaining accounts");
                break;
            }
            tracing::info!("processing account {}/{}", i + 1, summary.accounts);
            let report = self.runner.run(signer).await;
            summary.processed += 1;
            summary.completed += report.completed();
            tokio::time::sleep(self.step_delay).await;
        }
        tracing::info!(?summary, "pass finished");
        summary
    }
}

/// Runs [`BatchDriver::run_pass`] right away and then once per interval
/// until stopped. Passes never overlap: a pass that takes longer than the
/// interval delays the next one.
pub struct PeriodicTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    pub fn start(driver: BatchDriver, interval: Duration) -> Self {
        let (shutdown, mut receiver) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = receiver.changed() => break,
                    _ = ticker.tick() => (),
                }
                driver.run_pass(&receiver).await;
                if *receiver.borrow() {
                    break;
                }
                if let Some(next) = next_pass_at(interval) {
                    tracing::info!("next pass at {}", next.format("%Y-%m-%d %H:%M:%S %Z"));
                }
            }
            tracing::info!("periodic task stopped");
        });
        Self { shutdown, handle }
    }

    /// Signals the task to stop and waits until it did. An in-flight wallet
    /// run is completed first.
    pub async fn stop(self) -> Result<(), JoinError> {
        // The task may already be gone if it panicked.
        let _ = self.shutdown.send(true);
        self.handle.await
    }
}

fn next_pass_at(interval: Duration) -> Option<DateTime<Local>> {
    Local::now().checked_add_signed(chrono::Duration::from_std(interval).ok()?)
}
