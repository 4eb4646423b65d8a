use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::presenter::TrackerPresenter;

/// Drives the reconcile and refresh loops on their own timers
pub struct TrackerService {
    presenter: Arc<dyn TrackerPresenter>,
    reconcile_interval: Duration,
    refresh_interval: Duration,
    stop_tx: Option<watch::Sender<bool>>,
    tasks: Vec<JoinHandle<()>>,
}

impl TrackerService {
    pub fn new(
        presenter: Arc<dyn TrackerPresenter>,
        reconcile_interval: Duration,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            presenter,
            reconcile_interval,
            refresh_interval,
            stop_tx: None,
            tasks: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    // Start both background loops; the first reconcile tick fires immediately
    pub async fn start(&mut self) -> Result<()> {
        if self.stop_tx.is_some() {
            warn!("Tracker service is already running");
            return Ok(());
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        self.stop_tx = Some(stop_tx);

        let reconcile_presenter = self.presenter.clone();
        self.tasks.push(spawn_loop(
            "reconcile",
            self.reconcile_interval,
            stop_rx.clone(),
            move || {
                let presenter = reconcile_presenter.clone();
                async move {
                    match presenter.reconcile_tick().await {
                        Ok(outcome) => debug!("Reconcile tick finished: {:?}", outcome),
                        Err(e) => error!("Error in reconcile tick: {}", e),
                    }
                }
            },
        ));

        let refresh_presenter = self.presenter.clone();
        self.tasks.push(spawn_loop(
            "refresh",
            self.refresh_interval,
            stop_rx,
            move || {
                let presenter = refresh_presenter.clone();
                async move {
                    match presenter.refresh_tick().await {
                        Ok(outcome) => debug!("Refresh tick finished: {:?}", outcome),
                        Err(e) => error!("Error in refresh tick: {}", e),
                    }
                }
            },
        ));

        info!(
            "Tracker service started (reconcile every {:?}, refresh every {:?})",
            self.reconcile_interval, self.refresh_interval
        );
        Ok(())
    }

    // Stop both loops and wait for the in-flight ticks to finish
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(true);
            info!("Tracker service stop signal sent");
        }

        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                error!("Tracker loop ended abnormally: {}", e);
            }
        }
    }
}

fn spawn_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = interval(period);
        // A slow tick delays the next one instead of queueing a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_run = Instant::now();

        loop {
            select! {
                _ = interval.tick() => {
                    debug!("Running {} tick (last run: {:.2?} ago)", name, last_run.elapsed());
                    tick().await;
                    last_run = Instant::now();
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        info!("Stopping {} loop", name);
                        break;
                    }
                }
            }
        }
    })
}
