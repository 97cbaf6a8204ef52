use tokio::sync::mpsc;
use tokio::time::{interval, Duration}; // Only for the loop driver
use tracing::{debug, info};

use super::cancel::{CancellationRegistry, ToolKind};
use super::dispatcher::{DispatchContext, Dispatcher};
use super::event::{EffectSink, Event, InputContent, InputEvent, SideEffect, ToolReply};
use super::hint::hint_for;
use super::scheduler::{BadgeOutput, BadgeScheduler, Debounce, SPELL_DEBOUNCE_MS};
use super::state::{AppState, StateDelta};
use super::time::{Tick, TICK_MS};

use crate::config::{BrowserFamily, ConfigSnapshot, Settings};
use crate::intent::{IntentRouter, RouteAction};
use crate::resolver::{self, bookmarks};
use crate::services::{Endpoints, ToolRequest, ToolRunner, ToolServices};

#[derive(Debug, Clone)]
pub struct ReactorConfig {
    pub browser: BrowserFamily,
    pub tick_ms: u64,
    pub endpoints: Endpoints,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            browser: BrowserFamily::Unknown,
            tick_ms: TICK_MS,
            endpoints: Endpoints::default(),
        }
    }
}

pub struct Reactor {
    pub receiver: mpsc::Receiver<Event>,
    pub state: AppState,
    pub settings: Settings,
    pub badge: BadgeScheduler,
    pub cancel_registry: CancellationRegistry,
    pub tick: Tick,
    router: IntentRouter,
    dispatcher: Dispatcher,
    spell: Debounce<String>,
    runner: ToolRunner,
    config: ReactorConfig,
}

impl Reactor {
    pub fn new(receiver: mpsc::Receiver<Event>, tx: mpsc::Sender<Event>, settings: Settings, config: ReactorConfig) -> Self {
        Self {
            receiver,
            state: AppState::new(),
            badge: BadgeScheduler::new(settings.badge_mode()),
            settings,
            cancel_registry: CancellationRegistry::new(),
            tick: Tick::new(),
            router: IntentRouter::new(config.browser),
            dispatcher: Dispatcher::new(),
            spell: Debounce::new(),
            runner: ToolRunner::new(ToolServices::new(config.endpoints.clone()), tx),
            config,
        }
    }

    /// Logical time of the current tick.
    pub fn now_ms(&self) -> u64 {
        self.tick.as_millis(self.config.tick_ms)
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        self.settings.snapshot(self.config.browser)
    }

    /// Effects for page load: stored theme and the header weather reading.
    pub fn boot(&mut self) -> Vec<SideEffect> {
        let theme = self.settings.theme();
        self.state.reduce(StateDelta::ThemeApplied(theme));
        let request = ToolRequest::Weather {
            location: self.settings.weather_location(),
            unit: self.settings.weather_unit(),
        };
        let ticket = self.cancel_registry.begin(ToolKind::Weather);
        vec![SideEffect::ApplyTheme(theme), SideEffect::StartRequest { ticket, request }]
    }

    /// Pure Tick Step: advances state and returns side effects for the driver.
    /// MUST NOT await I/O or timers.
    ///
    /// The tick advances first; every reduction and timer poll in this step
    /// sees the new tick.
    pub fn tick_step(&mut self, events: Vec<Event>) -> Vec<SideEffect> {
        self.tick = self.tick.next();
        self.state.reduce(StateDelta::Tick(self.tick));
        let mut effects = Vec::new();
        // Badge mode can change from the config panel between ticks.
        effects.extend(self.sync_badge_mode());

        // Inputs before tool results, so a result for a superseded request
        // is already stale when it is examined.
        let mut inputs = Vec::new();
        let mut replies = Vec::new();
        for event in events {
            match event {
                Event::Input(inp) => inputs.push(inp),
                Event::ToolResult(reply) => replies.push(reply),
                Event::Shutdown => {}
            }
        }

        for inp in inputs {
            effects.extend(self.handle_input(inp));
        }

        for reply in replies {
            effects.extend(self.accept_reply(reply));
        }

        let now = self.now_ms();
        if let Some(text) = self.spell.poll(now) {
            let ticket = self.cancel_registry.begin(ToolKind::Spell);
            effects.push(SideEffect::StartRequest {
                ticket,
                request: ToolRequest::Spell { text },
            });
        }

        let fired = self.badge.poll(now);
        if !fired.is_empty() {
            effects.extend(self.badge_effects(fired));
        }

        for effect in &effects {
            match effect {
                SideEffect::ClearInput => self.state.reduce(StateDelta::InputCleared),
                SideEffect::ApplyTheme(theme) => self.state.reduce(StateDelta::ThemeApplied(*theme)),
                _ => {}
            }
        }

        effects
    }

    fn sync_badge_mode(&mut self) -> Option<SideEffect> {
        let mode = self.settings.badge_mode();
        if mode == self.badge.mode() {
            return None;
        }
        debug!(mode = mode.as_str(), "Badge mode changed");
        self.badge.set_mode(mode).map(|_| SideEffect::HideBadge)
    }

    fn handle_input(&mut self, inp: InputEvent) -> Vec<SideEffect> {
        debug!(source = %inp.source, content = ?inp.content, "Input");
        match inp.content {
            InputContent::Typed(text) => self.on_typed(text),
            InputContent::Submit(text) => self.on_submit(&text),
            InputContent::SubmitNewTab { text, focus } => self.on_submit_new_tab(&text, focus),
            InputContent::HistoryPrev => {
                let target = self.state.history_prev();
                self.move_history(target)
            }
            InputContent::HistoryNext => {
                let target = self.state.history_next();
                self.move_history(target)
            }
            InputContent::AcceptSuggestion => match self.state.suggestion.clone() {
                Some(full) => {
                    let mut effects = vec![SideEffect::SetInput(full.clone())];
                    effects.extend(self.on_typed(full));
                    effects
                }
                None => Vec::new(),
            },
            InputContent::Cancel => self.badge.hide().map(|_| SideEffect::HideBadge).into_iter().collect(),
            InputContent::SpellEdit(text) => {
                self.cancel_registry.cancel(ToolKind::Spell);
                if text.trim().is_empty() {
                    self.spell.cancel();
                } else {
                    let now = self.now_ms();
                    self.spell.schedule(text.trim().to_string(), now, SPELL_DEBOUNCE_MS);
                }
                Vec::new()
            }
            InputContent::PanelClosed(panel) => {
                if let Some(kind) = panel.tool() {
                    if self.cancel_registry.cancel(kind) {
                        debug!(panel = panel.name(), "Panel closed, request cancelled");
                    }
                }
                if panel.tool() == Some(ToolKind::Spell) {
                    self.spell.cancel();
                }
                Vec::new()
            }
        }
    }

    fn on_typed(&mut self, text: String) -> Vec<SideEffect> {
        let hint = hint_for(&text, &self.settings.syntax_colors());
        self.state.reduce(StateDelta::InputChanged(text.clone()));
        self.state.reduce(StateDelta::SuggestionChanged(hint.suggestion.clone()));

        let marks = self.settings.bookmarks();
        let mut effects = vec![SideEffect::SetHint(hint)];
        match bookmarks::highlight(&marks, &text) {
            Some(h) => effects.push(SideEffect::Highlight(h)),
            None => effects.push(SideEffect::ResetHighlight),
        }

        let snapshot = self.snapshot();
        let trimmed = text.trim();
        let outputs = if let Some(query) = resolver::semantic_query(trimmed) {
            self.preview_route(query)
        } else if let Some(bm) = bookmarks::find_first_match(&marks, trimmed) {
            if snapshot.ai.enabled {
                self.badge.preview(&bm.title, trimmed)
            } else {
                self.badge.hide().into_iter().collect()
            }
        } else if snapshot.ai.enabled && !trimmed.is_empty() && !resolver::has_explicit_syntax(trimmed, &snapshot) {
            self.preview_route(trimmed)
        } else {
            self.badge.hide().into_iter().collect()
        };
        effects.extend(self.badge_effects(outputs));
        effects
    }

    fn preview_route(&mut self, query: &str) -> Vec<BadgeOutput> {
        match self.router.route(query, self.settings.search_engine()) {
            Some(plan) => self.badge.preview(&plan.label, &plan.query),
            None => self.badge.hide().into_iter().collect(),
        }
    }

    /// Enter: explicit syntax, bookmark, domain, semantic router (AI mode),
    /// then default search.
    fn on_submit(&mut self, raw: &str) -> Vec<SideEffect> {
        let text = raw.trim().to_string();
        let snapshot = self.snapshot();
        let marks = self.settings.bookmarks();
        let now = self.now_ms();
        let dispatcher = self.dispatcher;

        // Last input wins: an earlier route still counting down is dropped.
        let mut effects: Vec<SideEffect> = self.badge.hide().map(|_| SideEffect::HideBadge).into_iter().collect();

        let explicit = resolver::has_explicit_syntax(&text, &snapshot);
        let bookmark = if explicit { None } else { bookmarks::find_first_match(&marks, &text) };

        let routed = if explicit || (bookmark.is_none() && resolver::looks_like_domain(&text)) {
            let dest = resolver::resolve(&text, &snapshot);
            info!(input = %text, dest = ?dest, "Resolved");
            dispatcher.dispatch(dest, &mut self.context(now))
        } else if let Some(bm) = bookmark {
            info!(title = %bm.title, "Bookmark match");
            let action = RouteAction::Navigate(bm.href.clone());
            if snapshot.ai.enabled {
                let outputs = self.badge.route(&bm.title, &text, action, now);
                self.badge_effects(outputs)
            } else {
                dispatcher.execute(action, &mut self.context(now))
            }
        } else if snapshot.ai.enabled && !text.is_empty() {
            dispatcher.route_semantic(&text, &mut self.context(now))
        } else {
            dispatcher.dispatch(resolver::resolve(&text, &snapshot), &mut self.context(now))
        };
        effects.extend(routed);

        self.state.reduce(StateDelta::Submitted(text));
        effects
    }

    fn on_submit_new_tab(&mut self, raw: &str, focus: bool) -> Vec<SideEffect> {
        let text = raw.trim().to_string();
        let url = resolver::resolve_url(&text, &self.settings.bookmarks(), &self.snapshot());
        self.state.reduce(StateDelta::Submitted(text));
        let mut effects: Vec<SideEffect> = self.badge.hide().map(|_| SideEffect::HideBadge).into_iter().collect();
        effects.extend(url.map(|url| SideEffect::OpenInNewTab { url, focus }));
        effects
    }

    fn move_history(&mut self, target: Option<usize>) -> Vec<SideEffect> {
        let Some(index) = target else {
            return Vec::new();
        };
        self.state.reduce(StateDelta::HistoryMoved(index));
        vec![SideEffect::SetInput(self.state.input.clone())]
    }

    fn accept_reply(&mut self, reply: ToolReply) -> Vec<SideEffect> {
        match self.cancel_registry.finish(reply.request) {
            Some(kind) => {
                debug!(?kind, "Tool result accepted");
                vec![SideEffect::Render(reply.output)]
            }
            None => {
                // STALE REJECTION: the panel closed or a newer request replaced this one.
                info!(kind = ?reply.output.kind(), id = ?reply.request, "Discarded stale tool result");
                Vec::new()
            }
        }
    }

    fn badge_effects(&mut self, outputs: Vec<BadgeOutput>) -> Vec<SideEffect> {
        let now = self.now_ms();
        let dispatcher = self.dispatcher;
        dispatcher.badge_effects(outputs, &mut self.context(now))
    }

    fn context(&mut self, now_ms: u64) -> DispatchContext<'_> {
        DispatchContext {
            settings: &mut self.settings,
            badge: &mut self.badge,
            router: &self.router,
            cancel: &mut self.cancel_registry,
            spell: &mut self.spell,
            now_ms,
        }
    }

    /// Async Driver Loop. Tool requests are spawned here; every other effect
    /// goes to the sink. Returns after `Event::Shutdown` or when every sender
    /// is gone.
    pub async fn run<S: EffectSink>(&mut self, sink: &mut S) {
        info!("Reactor started. Tick: {}ms", self.config.tick_ms);

        let boot = self.boot();
        self.perform(boot, sink);

        let mut cadence = interval(Duration::from_millis(self.config.tick_ms));
        cadence.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            // Driver: Wait for physical time boundary
            cadence.tick().await;

            let mut events: Vec<Event> = Vec::new();
            let mut shutdown = false;
            loop {
                match self.receiver.try_recv() {
                    Ok(Event::Shutdown) => shutdown = true,
                    Ok(event) => events.push(event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        shutdown = true;
                        break;
                    }
                }
            }

            let effects = self.tick_step(events);
            self.perform(effects, sink);

            if shutdown {
                self.cancel_registry.cancel_all();
                info!("Reactor stopped after {} ticks", self.tick.frame);
                break;
            }
        }
    }

    fn perform<S: EffectSink>(&self, effects: Vec<SideEffect>, sink: &mut S) {
        for effect in effects {
            match effect {
                SideEffect::StartRequest { ticket, request } => {
                    self.runner.spawn(ticket, request);
                }
                other => sink.apply(other),
            }
        }
    }
}
