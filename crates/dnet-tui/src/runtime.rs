//! TUI runtime: owns the terminal and the session, runs the event loop,
//! and executes effects.
//!
//! Events reach the reducer from four places each frame:
//! - the display-state watch (`MessagesChanged`)
//! - the session observer channel (`Sync`)
//! - the inbox, where spawned effects report back
//! - crossterm terminal input

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use dnet_core::backend::HttpBackend;
use dnet_core::config::Config;
use dnet_core::sync::{ChannelObserver, MessageList, Session, SyncEvent};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::{mpsc, watch};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while sending or typing.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick cadence when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    session: Session<HttpBackend>,
    messages_rx: watch::Receiver<MessageList>,
    sync_rx: mpsc::UnboundedReceiver<SyncEvent>,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Creates the session and takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the backend address is invalid or the terminal
    /// cannot be set up.
    pub fn new(config: &Config) -> Result<Self> {
        let backend = HttpBackend::from_config(config)?;
        let address = config.base_url()?.to_string();

        let (observer, sync_rx) = ChannelObserver::new();
        let session = Session::with_observer(backend, config.poll_interval(), Arc::new(observer));
        let messages_rx = session.display().subscribe();
        let state = AppState::new(session.draft().clone(), address);

        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            session,
            messages_rx,
            sync_rx,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Starts polling and runs the event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if the session cannot start or terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        self.session.start()?;

        let result = self.event_loop();

        self.session.stop();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;
        let mut pending = false;

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                match &event {
                    UiEvent::Tick => dirty |= pending || self.state.status.sending,
                    UiEvent::Frame { .. } => {}
                    UiEvent::Terminal(_) => {
                        self.last_terminal_event = Instant::now();
                        pending = true;
                    }
                    _ => pending = true,
                }

                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
                pending = false;
            }
        }

        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_input = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if recent_input || self.state.status.sending {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Only the latest committed list matters; intermediate ones are skipped.
        if self.messages_rx.has_changed().unwrap_or(false) {
            let messages = self.messages_rx.borrow_and_update().clone();
            events.push(UiEvent::MessagesChanged(messages));
        }
        while let Ok(ev) = self.sync_rx.try_recv() {
            events.push(UiEvent::Sync(ev));
        }
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };
        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns `f` and delivers its result event through the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Submit => {
                let transmitter = self.session.transmitter();
                self.spawn_effect(move || async move {
                    UiEvent::SubmitFinished(transmitter.submit().await)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
