//! Desktop window for `livescope`.
//!
//! Owns the Iced application loop and wires together:
//! - one WebSocket ingestion worker per source (via [`SessionManager`])
//! - the fixed-period redraw tick that feeds the plot
//! - config file watcher (live reload on change)

pub mod headless;

use scope_config::{default_path, load as load_config, ConfigWatcher, ScopeConfig};
use scope_core::{
    event::Message, AppState, BoundField, ConnectionStatus, Result, SourceId, SourceState,
};
use scope_render::{capture, Feed, RenderSink};
use scope_stream::{parse_all, Bounds, SessionManager};
use scope_theme::Theme;
use scope_widgets::{BoundsForm, ConnectionPanel, HistoryList, LatestReadout, PlotWidget};
use iced::futures::channel::mpsc::Sender;
use iced::{
    widget::{container, Column, Row},
    Element, Length, Subscription, Task,
};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, warn};

pub use headless::run_headless;

/// Shown when a bounds field is not a whole number.
const INVALID_BOUNDS_NOTICE: &str = "Please enter valid integers for Value min and Value max.";

// ── Entry point ───────────────────────────────────────────────────────────────

/// Open the window. Ingestion workers are spawned on `runtime`.
pub fn run(config: ScopeConfig, runtime: Handle) -> iced::Result {
    let size = iced::Size::new(config.global.window_width, config.global.window_height);

    iced::application(
        move || (App::new(config.clone(), runtime.clone()), Task::none()),
        App::update,
        App::view,
    )
    .title(App::title)
    .subscription(App::subscription)
    .style(App::style)
    .window_size(size)
    .run()
}

// ── State ─────────────────────────────────────────────────────────────────────

struct App {
    state:      AppState,
    config:     ScopeConfig,
    theme:      Theme,
    feeds:      Vec<Feed>,
    sessions:   SessionManager,
    // Top
    connection: ConnectionPanel,
    bounds:     BoundsForm,
    latest:     LatestReadout,
    // Body
    plot:       PlotWidget,
    history:    HistoryList,
}

impl App {
    fn new(config: ScopeConfig, runtime: Handle) -> Self {
        let theme = Theme::from_config(&config);
        let feeds = Feed::from_config(&config);
        let sessions = SessionManager::new(runtime, feeds.len());

        let state = AppState {
            sources: config
                .sources
                .iter()
                .map(|s| SourceState::new(&s.label, &s.uri))
                .collect(),
            ..Default::default()
        };

        Self {
            state,
            theme: theme.clone(),
            feeds,
            sessions,
            connection: ConnectionPanel::new(config.global.history_points),
            bounds: BoundsForm::new(),
            latest: LatestReadout::new(),
            plot: PlotWidget::new(theme, "Received values"),
            history: HistoryList::new(),
            config,
        }
    }

    fn title(&self) -> String {
        self.config.global.title.clone()
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UriEdited(id, uri) => {
                if let Some(source) = self.state.source_mut(id) {
                    source.uri = uri;
                }
            }
            Message::BoundEdited(id, field, value) => {
                if let Some(source) = self.state.source_mut(id) {
                    match field {
                        BoundField::Min => source.min_input = value,
                        BoundField::Max => source.max_input = value,
                    }
                }
            }
            Message::ToggleRequested => self.toggle(),
            Message::SendBoundsRequested => self.send_bounds(),
            Message::HistoryRequested => {
                let n = self.config.global.history_points;
                self.state.history = Some(
                    self.feeds
                        .iter()
                        .map(|f| (f.source, f.buffer.most_recent(n)))
                        .collect(),
                );
            }
            Message::HistoryClosed => self.state.history = None,
            Message::LatestRequested => {
                for feed in &self.feeds {
                    if let Some(source) = self.state.source_mut(feed.source) {
                        source.latest = feed.buffer.latest();
                    }
                }
            }
            Message::NoticeDismissed => self.state.notice = None,
            Message::Redraw => {
                self.sync_status();
                self.plot.render(capture(&self.feeds));
            }
            Message::ConfigReloaded => self.reload_config(),
        }
        Task::none()
    }

    fn toggle(&mut self) {
        let targets: Vec<(SourceId, String, _)> = self
            .feeds
            .iter()
            .filter_map(|f| {
                let uri = self.state.source(f.source)?.uri.clone();
                Some((f.source, uri, f.buffer.clone()))
            })
            .collect();

        match self.sessions.toggle(targets) {
            Ok(true) => info!("Connecting {} sources", self.feeds.len()),
            Ok(false) => info!("All sources stopped"),
            Err(e) => {
                warn!("Start failed: {e}");
                self.state.notice = Some(e.to_string());
            }
        }
        self.sync_status();
    }

    fn send_bounds(&mut self) {
        if !self.state.any_connected() {
            info!("No source connected; bounds not sent");
            return;
        }

        let bounds = match collect_bounds(&self.state) {
            Ok(b) => b,
            Err(e) => {
                warn!("{e}");
                self.state.notice = Some(INVALID_BOUNDS_NOTICE.to_string());
                return;
            }
        };

        let delivery = self.sessions.send_bounds_all(&bounds);
        for id in &delivery.sent {
            let b = bounds[id.index()];
            info!(source = %id, value_min = b.value_min, value_max = b.value_max, "Bounds queued");
        }
        if !delivery.failed.is_empty() {
            let reasons: Vec<String> = delivery.failed.iter().map(|(_, e)| e.to_string()).collect();
            warn!("Sending bounds failed: {}", reasons.join("; "));
            self.state.notice = Some(reasons.join("\n"));
        }
        self.sync_status();
    }

    /// Copy worker status into the UI state.
    fn sync_status(&mut self) {
        for (source, status) in self.state.sources.iter_mut().zip(self.sessions.statuses()) {
            source.status = status;
        }
    }

    fn reload_config(&mut self) {
        let cfg = match load_config(default_path()) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };
        info!("Config reloaded");

        if cfg.sources.len() != self.feeds.len() {
            warn!("Source count changed; restart to apply");
        }
        for ((feed, source), new) in self
            .feeds
            .iter_mut()
            .zip(self.state.sources.iter_mut())
            .zip(&cfg.sources)
        {
            feed.label = new.label.clone();
            source.label = new.label.clone();
            if source.status == ConnectionStatus::Disconnected {
                source.uri = new.uri.clone();
            }
        }

        self.theme = Theme::from_config(&cfg);
        self.plot.set_theme(self.theme.clone());
        self.connection = ConnectionPanel::new(cfg.global.history_points);
        self.config = cfg;
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let gap = self.theme.gap as f32;

        let controls = Column::with_children([
            self.connection.view(&self.state, &self.theme),
            self.bounds.view(&self.state, &self.theme),
            self.latest.view(&self.state, &self.theme),
        ])
        .spacing(gap)
        .align_x(iced::Alignment::Center)
        .width(Length::Fill);

        let body: Element<'_, Message> = match self.history.view(&self.state, &self.theme) {
            Some(list) => Row::with_children([
                container(self.plot.view()).width(Length::FillPortion(3)).into(),
                container(list).width(Length::FillPortion(2)).into(),
            ])
            .spacing(gap)
            .into(),
            None => self.plot.view(),
        };

        container(
            Column::with_children([controls.into(), body])
                .spacing(gap)
                .height(Length::Fill),
        )
        .padding(self.theme.padding)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![Subscription::run(config_stream)];

        // The tick keeps running while any worker is alive so the status
        // indicators and the final frame catch up after a disconnect.
        if self.sessions.any_active() || self.state.any_active() {
            subs.push(iced::time::every(self.config.global.redraw_interval()).map(|_| Message::Redraw));
        }

        Subscription::batch(subs)
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: self.theme.background.to_iced(),
            text_color: self.theme.foreground.to_iced(),
        }
    }
}

/// Validate every source's bounds form; nothing is sent unless all pass.
fn collect_bounds(state: &AppState) -> Result<Vec<Bounds>> {
    parse_all(
        state
            .sources
            .iter()
            .map(|s| (s.min_input.as_str(), s.max_input.as_str())),
    )
}

// ── Subscription streams ──────────────────────────────────────────────────────

/// Watches the config file for writes and sends `ConfigReloaded`.
fn config_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = ConfigWatcher::spawn(default_path());

        while rx.recv().await.is_some() {
            let _ = sender.try_send(Message::ConfigReloaded);
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(rt: &tokio::runtime::Runtime) -> App {
        App::new(ScopeConfig::default(), rt.handle().clone())
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn form_edits_land_in_state() {
        let rt = runtime();
        let mut app = app(&rt);

        let _ = app.update(Message::UriEdited(SourceId(1), "ws://example:1/wsi".into()));
        let _ = app.update(Message::BoundEdited(SourceId(0), BoundField::Min, "2".into()));
        let _ = app.update(Message::BoundEdited(SourceId(0), BoundField::Max, "8".into()));

        assert_eq!(app.state.sources[1].uri, "ws://example:1/wsi");
        assert_eq!(app.state.sources[0].min_input, "2");
        assert_eq!(app.state.sources[0].max_input, "8");
    }

    #[test]
    fn history_and_latest_read_the_buffers() {
        let rt = runtime();
        let mut app = app(&rt);
        for i in 0..150 {
            app.feeds[0].buffer.insert(i as f64, i as f64);
        }

        let _ = app.update(Message::HistoryRequested);
        let history = app.state.history.as_ref().unwrap();
        assert_eq!(history[0].1.len(), 100);
        assert_eq!(history[0].1.first().unwrap().value, 50.0);
        assert!(history[1].1.is_empty());

        let _ = app.update(Message::LatestRequested);
        assert_eq!(app.state.sources[0].latest.map(|s| s.value), Some(149.0));
        assert!(app.state.sources[1].latest.is_none());

        let _ = app.update(Message::HistoryClosed);
        assert!(app.state.history.is_none());
    }

    #[test]
    fn bounds_are_not_sent_without_a_connection() {
        let rt = runtime();
        let mut app = app(&rt);
        let _ = app.update(Message::BoundEdited(SourceId(0), BoundField::Min, "abc".into()));
        let _ = app.update(Message::SendBoundsRequested);
        assert!(app.state.notice.is_none());
    }

    #[test]
    fn invalid_field_blocks_every_send_while_connected() {
        use futures::StreamExt;
        use tokio_tungstenite::tungstenite::Message as WsMessage;

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let listener = rt.block_on(tokio::net::TcpListener::bind("127.0.0.1:0")).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, mut received) = tokio::sync::mpsc::unbounded_channel();
        rt.spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            while let Some(Ok(msg)) = ws.next().await {
                if let WsMessage::Text(text) = msg {
                    let _ = tx.send(text.as_str().to_owned());
                }
            }
        });

        let mut config = ScopeConfig::default();
        config.sources.truncate(1);
        config.sources[0].uri = format!("ws://{addr}/wsi");
        let mut app = App::new(config, rt.handle().clone());

        let _ = app.update(Message::ToggleRequested);
        for _ in 0..500 {
            let _ = app.update(Message::Redraw);
            if app.state.any_connected() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(app.state.any_connected());

        let _ = app.update(Message::BoundEdited(SourceId(0), BoundField::Min, "1".into()));
        let _ = app.update(Message::BoundEdited(SourceId(0), BoundField::Max, "nine".into()));
        let _ = app.update(Message::SendBoundsRequested);
        assert_eq!(app.state.notice.as_deref(), Some(INVALID_BOUNDS_NOTICE));

        let nothing = rt.block_on(async { tokio::time::timeout(Duration::from_millis(200), received.recv()).await });
        assert!(nothing.is_err());

        let _ = app.update(Message::NoticeDismissed);
        let _ = app.update(Message::BoundEdited(SourceId(0), BoundField::Max, "9".into()));
        let _ = app.update(Message::SendBoundsRequested);
        assert!(app.state.notice.is_none());

        let sent = rt
            .block_on(async { tokio::time::timeout(Duration::from_secs(5), received.recv()).await })
            .unwrap()
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(json["Value_min"], 1);
        assert_eq!(json["Value_max"], 9);
    }

    #[test]
    fn bounds_validation_covers_every_source() {
        let mut state = AppState {
            sources: vec![SourceState::new("a", "ws://a"), SourceState::new("b", "ws://b")],
            ..Default::default()
        };
        for s in &mut state.sources {
            s.min_input = "0".into();
            s.max_input = "3".into();
        }
        assert_eq!(collect_bounds(&state).unwrap().len(), 2);

        state.sources[1].max_input = "3.5".into();
        assert!(collect_bounds(&state).is_err());
    }

    #[test]
    fn redraw_pushes_a_frame_to_the_plot() {
        let rt = runtime();
        let mut app = app(&rt);
        app.feeds[1].buffer.insert(4.0, 1.0);

        let _ = app.update(Message::Redraw);
        assert_eq!(app.plot.frame().series[1].points.len(), 1);
        assert!(app.state.sources.iter().all(|s| s.status == ConnectionStatus::Disconnected));
    }
}
