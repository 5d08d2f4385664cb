//! Window-less mode: connect every configured source and log frames.

use scope_config::ScopeConfig;
use scope_core::Result;
use scope_render::{Feed, LogSink, RedrawTimer};
use scope_stream::SessionManager;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, warn};

/// How often to check whether any worker is still alive.
const LIVENESS_INTERVAL: Duration = Duration::from_millis(500);

/// Run until Ctrl-C or until every source has disconnected.
pub async fn run_headless(config: ScopeConfig) -> Result<()> {
    let runtime = Handle::current();
    let feeds = Feed::from_config(&config);
    let mut sessions = SessionManager::new(runtime.clone(), feeds.len());

    for (feed, source) in feeds.iter().zip(&config.sources) {
        sessions.start(feed.source, &source.uri, feed.buffer.clone())?;
    }

    let timer = RedrawTimer::spawn(&runtime, config.global.redraw_interval(), feeds, LogSink::new());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut liveness = tokio::time::interval(LIVENESS_INTERVAL);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res?;
                info!("Interrupted; shutting down");
                break;
            }
            _ = liveness.tick() => {
                if !sessions.any_active() {
                    warn!("All sources disconnected");
                    break;
                }
            }
        }
    }

    sessions.stop_all();
    timer.stop().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope_config::SourceConfig;

    #[tokio::test]
    async fn exits_once_every_source_is_gone() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = ScopeConfig::default();
        config.sources = vec![SourceConfig::new("dead", format!("ws://{addr}/wsi"), "#000000")];

        tokio::time::timeout(Duration::from_secs(10), run_headless(config))
            .await
            .expect("headless run did not finish")
            .unwrap();
    }
}
