//! App — component-based event loop for the dashboard.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (read-only for components).
//! - A `tokio::mpsc` channel carries `AppMessage`s in: terminal events from a
//!   blocking reader thread, provider responses from spawned fetch tasks.
//! - The event loop draws a frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use advisor_proto::config::Config;
use advisor_proto::model::{AnalysisCategory, AnalyticsBundle, CallDocuments, PriceSeries, Timeframe};
use advisor_proto::playback::PlaybackEngine;
use advisor_proto::provider::CallFeed;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    components::{
        analysis_panel::AnalysisPanel, call_list::CallList, document_overlay::DocumentOverlay,
        header::Header, help_overlay::HelpOverlay, price_chart::PriceChart,
        transport_panel::TransportPanel,
    },
    feed::{FeedSlots, FeedTicket, SlotHint},
    overlay::{OverlayKind, OverlayState},
    selection::{CatalogError, SelectionRegistry},
    switches::{CategorySwitch, TimeframeSwitch},
    theme::C_BG,
    transport::TransportController,
    widgets::{
        pane_chrome::contains,
        status_bar::{self, InputMode, KeysContext},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    Analytics(FeedTicket, Result<AnalyticsBundle, String>),
    Prices(FeedTicket, Result<PriceSeries, String>),
    Documents(FeedTicket, Result<CallDocuments, String>),
}

const SIDEBAR_WIDTH: u16 = 34;
const MAX_DRAIN: usize = 256;

/// Screen areas recorded at draw time, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct PaneAreas {
    call_list: Rect,
    transport: Rect,
    chart: Rect,
    analysis: Rect,
}

pub struct App {
    state: AppState,

    // ── Components ──────────────────────────────────────────────────────────
    call_list: CallList,
    header: Header,
    price_chart: PriceChart,
    analysis_panel: AnalysisPanel,
    transport_panel: TransportPanel,
    transcript: DocumentOverlay,
    summary: DocumentOverlay,
    help_overlay: HelpOverlay,

    toast: ToastManager,
    feed: Arc<dyn CallFeed>,
    msg_tx: mpsc::Sender<AppMessage>,
    msg_rx: Option<mpsc::Receiver<AppMessage>>,
    pane_areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        feed: Arc<dyn CallFeed>,
        engine: Option<Box<dyn PlaybackEngine>>,
    ) -> Result<Self, CatalogError> {
        let selection = SelectionRegistry::new(
            config.catalog.entries.clone(),
            &config.catalog.initial_company,
        )?;
        let mut transport = TransportController::new(&config.transport).with_engine(engine);
        transport.bind_resource(feed.audio_resource(selection.selected()));

        let state = AppState {
            selection,
            category: CategorySwitch::default(),
            timeframe: TimeframeSwitch::default(),
            transport,
            overlays: OverlayState::default(),
            feeds: FeedSlots::default(),
            input_mode: InputMode::Normal,
            show_help: false,
            show_keys_bar: config.ui.show_keys_bar,
            volume_step: config.transport.volume_step,
            seek_step_secs: config.transport.seek_step_secs,
        };
        let (msg_tx, msg_rx) = mpsc::channel::<AppMessage>(256);

        Ok(Self {
            call_list: CallList::new(&state),
            header: Header::new(),
            price_chart: PriceChart::new(),
            analysis_panel: AnalysisPanel::new(),
            transport_panel: TransportPanel::new(),
            transcript: DocumentOverlay::new(OverlayKind::Transcript),
            summary: DocumentOverlay::new(OverlayKind::Summary),
            help_overlay: HelpOverlay::new(),
            state,
            toast: ToastManager::new(),
            feed,
            msg_tx,
            msg_rx: Some(msg_rx),
            pane_areas: PaneAreas::default(),
            should_quit: false,
        })
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(mut rx) = self.msg_rx.take() else {
            anyhow::bail!("event loop already started");
        };

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.msg_tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        info!("dashboard started, selected {:?}", self.state.company());
        self.request_all();

        // Toast expiry + feed timeouts
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    let mut redraw = self.handle_message(msg);
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let Ok(next) = rx.try_recv() else { break };
                        drained += 1;
                        redraw |= self.handle_message(next);
                    }
                    needs_redraw = redraw;
                }

                _ = ui_tick.tick() => {
                    needs_redraw = self.tick();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("dashboard stopped");

        Ok(())
    }

    fn tick(&mut self) -> bool {
        let toasts_changed = self.toast.tick();
        let timed_out = self.state.feeds.tick();
        if timed_out {
            warn!("[feed] request for {:?} timed out", self.state.company());
            self.toast.warning("data feed is slow, still waiting…");
        }
        toasts_changed || timed_out
    }

    // ── Messages ──────────────────────────────────────────────────────────────

    /// Returns true if the frame needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                let actions = self.handle_mouse(mouse);
                let redraw = !actions.is_empty()
                    || matches!(mouse.kind, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown);
                for action in actions {
                    self.dispatch(action);
                }
                redraw
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,

            AppMessage::Analytics(ticket, result) => {
                let error = result.as_ref().err().cloned();
                let late = self.state.feeds.analytics.hint() == SlotHint::TimedOut;
                let company = self.state.company().to_string();
                if !self.state.feeds.analytics.accept(&ticket, &company, result) {
                    return false;
                }
                if error.is_none() {
                    if let Some(bundle) = self.state.feeds.analytics.value().cloned() {
                        self.state.feeds.cache_analytics(&ticket.company, bundle);
                    }
                }
                self.report_response("analytics", &ticket, error, late);
                true
            }
            AppMessage::Prices(ticket, result) => {
                let error = result.as_ref().err().cloned();
                let late = self.state.feeds.prices.hint() == SlotHint::TimedOut;
                let company = self.state.company().to_string();
                if !self.state.feeds.prices.accept(&ticket, &company, result) {
                    return false;
                }
                self.report_response("price history", &ticket, error, late);
                true
            }
            AppMessage::Documents(ticket, result) => {
                let error = result.as_ref().err().cloned();
                let late = self.state.feeds.documents.hint() == SlotHint::TimedOut;
                let company = self.state.company().to_string();
                if !self.state.feeds.documents.accept(&ticket, &company, result) {
                    return false;
                }
                self.report_response("call documents", &ticket, error, late);
                true
            }
        }
    }

    /// Toast and log an applied response that is worth telling the user about.
    fn report_response(&mut self, what: &str, ticket: &FeedTicket, error: Option<String>, late: bool) {
        match error {
            Some(e) => {
                warn!("[feed] {} for {:?}: {}", what, ticket.company, e);
                self.toast.warning(format!("{} unavailable: {}", what, e));
            }
            None if late => {
                info!("[feed] {} for {:?} arrived after timeout", what, ticket.company);
                self.toast.info(format!("{} loaded", what));
            }
            None => debug!("[feed] {} for {:?} applied (#{})", what, ticket.company, ticket.seq),
        }
    }

    // ── Key routing ───────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Open documents are modal: the topmost one gets every key
        if let Some(top) = self.state.overlays.topmost() {
            let s = &self.state;
            return match top {
                OverlayKind::Transcript => self.transcript.handle_key(key, s),
                OverlayKind::Summary => self.summary.handle_key(key, s),
            };
        }

        if self.state.show_help {
            return self.help_overlay.handle_key(key, &self.state);
        }

        if self.state.input_mode == InputMode::Filter {
            return self.call_list.handle_key(key, &self.state);
        }

        let market_impact = self.state.category.active() == AnalysisCategory::MarketImpact;
        let transport = self.state.transport.visible();
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],

            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as u8 - b'1') as usize;
                return vec![Action::SetCategory(AnalysisCategory::ALL[idx])];
            }
            KeyCode::Tab => return vec![Action::NextCategory],
            KeyCode::BackTab => return vec![Action::PrevCategory],

            KeyCode::Char('[') if market_impact => return vec![Action::PrevTimeframe],
            KeyCode::Char(']') if market_impact => return vec![Action::NextTimeframe],
            KeyCode::Char('s') if market_impact => {
                return vec![Action::SetTimeframe(Timeframe::Short)]
            }
            KeyCode::Char('m') if market_impact => {
                return vec![Action::SetTimeframe(Timeframe::Medium)]
            }
            KeyCode::Char('l') if market_impact => {
                return vec![Action::SetTimeframe(Timeframe::Long)]
            }

            KeyCode::Char('a') => return vec![Action::ToggleTransport],
            KeyCode::Char(' ') if transport => return vec![Action::TogglePlay],
            KeyCode::Char('+') | KeyCode::Char('=') if transport => {
                let v = self.state.transport.volume() + self.state.volume_step;
                return vec![Action::Volume(v)];
            }
            KeyCode::Char('-') if transport => {
                let v = self.state.transport.volume() - self.state.volume_step;
                return vec![Action::Volume(v)];
            }
            KeyCode::Char(',') if transport => {
                return vec![Action::SeekRelative(-i64::from(self.state.seek_step_secs))]
            }
            KeyCode::Char('.') if transport => {
                return vec![Action::SeekRelative(i64::from(self.state.seek_step_secs))]
            }

            KeyCode::Char('t') => return vec![Action::OpenOverlay(OverlayKind::Transcript)],
            KeyCode::Char('u') => return vec![Action::OpenOverlay(OverlayKind::Summary)],
            _ => {}
        }

        self.call_list.handle_key(key, &self.state)
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_wheel = matches!(
            event.kind,
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_wheel && !matches!(event.kind, MouseEventKind::Down(_)) {
            return vec![];
        }

        // Clicks never reach the panels under a document; the wheel scrolls it.
        if let Some(top) = self.state.overlays.topmost() {
            if !is_wheel {
                return vec![];
            }
            let s = &self.state;
            return match top {
                OverlayKind::Transcript => self.transcript.handle_mouse(event, Rect::default(), s),
                OverlayKind::Summary => self.summary.handle_mouse(event, Rect::default(), s),
            };
        }
        if self.state.show_help {
            return vec![];
        }

        let (col, row) = (event.column, event.row);
        let areas = self.pane_areas;
        let (target, area): (&mut dyn Component, Rect) = if contains(areas.call_list, col, row) {
            (&mut self.call_list as &mut dyn Component, areas.call_list)
        } else if contains(areas.transport, col, row) {
            (&mut self.transport_panel as &mut dyn Component, areas.transport)
        } else if contains(areas.analysis, col, row) {
            (&mut self.analysis_panel as &mut dyn Component, areas.analysis)
        } else if contains(areas.chart, col, row) {
            (&mut self.price_chart as &mut dyn Component, areas.chart)
        } else {
            return vec![];
        };
        if !is_wheel {
            debug!("click ({}, {}) -> {:?}", col, row, target.id());
        }
        target.handle_mouse(event, area, &self.state)
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Components see the action first (cursor sync, scroll resets)
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.call_list.on_action(&action, s));
            out.extend(self.header.on_action(&action, s));
            out.extend(self.price_chart.on_action(&action, s));
            out.extend(self.analysis_panel.on_action(&action, s));
            out.extend(self.transport_panel.on_action(&action, s));
            out.extend(self.transcript.on_action(&action, s));
            out.extend(self.summary.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions are applied once, not re-broadcast
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Selection ────────────────────────────────────────────────────
            Action::SelectCompany(company) => {
                if self.state.selection.select(&company) {
                    info!("selected {:?}", company);
                    let resource = self.feed.audio_resource(&company);
                    self.state.transport.bind_resource(resource);
                    self.request_all();
                }
            }

            // ── Filter ───────────────────────────────────────────────────────
            Action::OpenFilter => self.state.input_mode = InputMode::Filter,
            Action::CloseFilter => self.state.input_mode = InputMode::Normal,

            // ── Analysis ─────────────────────────────────────────────────────
            Action::SetCategory(category) => {
                let before = self.state.category.active();
                self.state.category.set_category(category);
                self.on_category_applied(before);
            }
            Action::NextCategory => {
                let before = self.state.category.active();
                self.state.category.next();
                self.on_category_applied(before);
            }
            Action::PrevCategory => {
                let before = self.state.category.active();
                self.state.category.prev();
                self.on_category_applied(before);
            }
            Action::SetTimeframe(tf) => self.state.timeframe.set_timeframe(tf),
            Action::NextTimeframe => self.state.timeframe.next(),
            Action::PrevTimeframe => self.state.timeframe.prev(),

            // ── Transport ────────────────────────────────────────────────────
            Action::ToggleTransport => self.state.transport.toggle_visible(),
            Action::TogglePlay => {
                self.state.transport.toggle_play();
            }
            Action::Volume(v) => self.state.transport.set_volume(v),
            Action::SeekRelative(delta) => self.state.transport.seek_relative(delta),
            Action::SeekTo(pos) => self.state.transport.seek(pos),

            // ── Overlays ─────────────────────────────────────────────────────
            Action::OpenOverlay(kind) => {
                match kind {
                    OverlayKind::Transcript => self.state.overlays.open_transcript(),
                    OverlayKind::Summary => self.state.overlays.open_summary(),
                }
                if self.state.feeds.documents.hint() == SlotHint::Failed {
                    self.request_documents();
                }
            }
            Action::CloseOverlay(kind) => match kind {
                OverlayKind::Transcript => self.state.overlays.close_transcript(),
                OverlayKind::Summary => self.state.overlays.close_summary(),
            },

            // ── UI toggles ───────────────────────────────────────────────────
            Action::ToggleHelp => self.state.show_help = !self.state.show_help,
            Action::ToggleKeys => self.state.show_keys_bar = !self.state.show_keys_bar,

            // ── System ───────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,
        }
    }

    /// Refetch when the category changed, or retry when the same tab is
    /// re-chosen after a failure.
    fn on_category_applied(&mut self, before: AnalysisCategory) {
        let changed = self.state.category.active() != before;
        let retry = matches!(
            self.state.feeds.analytics.hint(),
            SlotHint::Failed | SlotHint::TimedOut
        );
        if changed || retry {
            self.request_analytics();
        }
    }

    // ── Provider requests ─────────────────────────────────────────────────────

    fn request_all(&mut self) {
        self.request_prices();
        self.request_documents();
        self.request_analytics();
    }

    fn request_analytics(&mut self) {
        let company = self.state.company().to_string();
        let category = self.state.category.active();
        if let Some(bundle) = self.state.feeds.cached_analytics(&company, category).cloned() {
            debug!("[feed] analytics {}/{} from cache", company, category.key());
            self.state.feeds.analytics.fill(bundle);
            return;
        }

        let ticket = self.state.feeds.issue(&company, Some(category));
        self.state.feeds.analytics.request(ticket.clone());
        let feed = Arc::clone(&self.feed);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = feed
                .fetch_analytics(&ticket.company, category)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::Analytics(ticket, result)).await;
        });
    }

    fn request_prices(&mut self) {
        let company = self.state.company().to_string();
        let ticket = self.state.feeds.issue(&company, None);
        self.state.feeds.prices.request(ticket.clone());
        let feed = Arc::clone(&self.feed);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = feed
                .fetch_price_history(&ticket.company)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::Prices(ticket, result)).await;
        });
    }

    fn request_documents(&mut self) {
        let company = self.state.company().to_string();
        let ticket = self.state.feeds.issue(&company, None);
        self.state.feeds.documents.request(ticket.clone());
        let feed = Arc::clone(&self.feed);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = feed
                .fetch_documents(&ticket.company)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMessage::Documents(ticket, result)).await;
        });
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn keys_context(&self) -> KeysContext {
        if self.state.overlays.any_open() || self.state.show_help {
            KeysContext::Overlay
        } else if self.state.input_mode == InputMode::Filter {
            KeysContext::Filter
        } else {
            KeysContext::Normal {
                market_impact: self.state.category.active() == AnalysisCategory::MarketImpact,
                transport: self.state.transport.visible(),
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        // ── Outer layout: body | (statusbar) ─────────────────────────────────
        let status_h = u16::from(self.state.show_keys_bar);
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(status_h)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(outer[0]);

        // ── Main column: header | (transport) | chart | analysis ─────────────
        let transport_h = if self.state.transport.visible() {
            TransportPanel::height(&self.state)
        } else {
            0
        };
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(transport_h),
                Constraint::Percentage(40),
                Constraint::Min(6),
            ])
            .split(columns[1]);

        let s = &self.state;
        let modal = s.overlays.any_open() || s.show_help;
        self.call_list.draw(frame, columns[0], !modal, s);
        self.header.draw(frame, main[0], false, s);
        if s.transport.visible() {
            self.transport_panel.draw(frame, main[1], false, s);
        }
        self.price_chart.draw(frame, main[2], false, s);
        self.analysis_panel.draw(frame, main[3], false, s);

        self.pane_areas = PaneAreas {
            call_list: columns[0],
            transport: if s.transport.visible() { main[1] } else { Rect::default() },
            chart: main[2],
            analysis: main[3],
        };

        if s.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[1], self.keys_context());
        }

        // ── Documents, bottom first ──────────────────────────────────────────
        for kind in s.overlays.open_stack() {
            match kind {
                OverlayKind::Transcript => self.transcript.draw(frame, area, true, s),
                OverlayKind::Summary => self.summary.draw(frame, area, true, s),
            }
        }

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, false, s);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}
