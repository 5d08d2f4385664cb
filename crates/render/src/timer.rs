use crate::frame::{capture, Feed};
use crate::sink::RenderSink;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

/// Fixed-period task that snapshots every feed and hands the frame to a sink.
///
/// Ticks that fall behind are skipped rather than replayed in a burst.
/// `period` must be non-zero; [`GlobalConfig::redraw_interval`] guarantees it.
///
/// [`GlobalConfig::redraw_interval`]: scope_config::GlobalConfig::redraw_interval
#[derive(Debug)]
pub struct RedrawTimer {
    task: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

impl RedrawTimer {
    pub fn spawn<S>(runtime: &Handle, period: Duration, feeds: Vec<Feed>, mut sink: S) -> Self
    where
        S: RenderSink + Send + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);

        let task = runtime.spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(?period, feeds = feeds.len(), "Redraw timer started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => sink.render(capture(&feeds)),
                    _ = stopped.changed() => break,
                }
            }
        });

        Self { task, stop }
    }

    /// Signal the task to exit and wait for it.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}
