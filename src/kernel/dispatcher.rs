//! Turns a resolved [`Destination`] into side effects.
//!
//! The dispatcher never touches the front end directly. It mutates settings,
//! arms the badge and spell timers, and issues tool tickets; everything the
//! user sees leaves as a [`SideEffect`].

use super::cancel::{CancellationRegistry, ToolKind};
use super::event::{Panel, SideEffect};
use super::scheduler::{BadgeOutput, BadgeScheduler, Debounce, SPELL_DEBOUNCE_MS};
use crate::config::Settings;
use crate::intent::{IntentRouter, RouteAction};
use crate::resolver::{Command, Destination};
use crate::services::gemini::PromptRequest;
use crate::services::ToolRequest;
use tracing::{debug, warn};

pub const AI_ROUTER_HELP: &str = "ai: is a semantic intent router.\n\n\
How it works:\n\
1) You type a natural-language intent.\n\
2) It detects likely destination (maps, YouTube, Reddit, settings, etc.).\n\
3) It navigates there directly.\n\
4) If no clear match exists, it falls back to your search engine.\n\n\
Use gem: or gemini: for direct Gemini prompting.";

pub fn ai_mode_notice(enabled: bool) -> &'static str {
    if enabled {
        "AI mode enabled. Plain text can route without ai: after bookmark check."
    } else {
        "AI mode disabled. Use ai: prefix for routing."
    }
}

pub fn version_notice() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

/// Mutable pieces of the reactor a dispatch may touch.
pub struct DispatchContext<'a> {
    pub settings: &'a mut Settings,
    pub badge: &'a mut BadgeScheduler,
    pub router: &'a IntentRouter,
    pub cancel: &'a mut CancellationRegistry,
    pub spell: &'a mut Debounce<String>,
    pub now_ms: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch(&self, dest: Destination, ctx: &mut DispatchContext<'_>) -> Vec<SideEffect> {
        match dest {
            Destination::Url { target } => navigate(target),
            Destination::Command { command } => self.run_command(command, ctx, true),
            Destination::Unhandled => Vec::new(),
        }
    }

    /// Performs a committed route. The badge stays up and auto-hides on its own.
    pub fn execute(&self, action: RouteAction, ctx: &mut DispatchContext<'_>) -> Vec<SideEffect> {
        match action {
            RouteAction::Navigate(url) => navigate(url),
            RouteAction::Run(command) => self.run_command(command, ctx, false),
        }
    }

    /// Resolves free text through the intent router and arms the commit.
    pub fn route_semantic(&self, text: &str, ctx: &mut DispatchContext<'_>) -> Vec<SideEffect> {
        let Some(plan) = ctx.router.route(text, ctx.settings.search_engine()) else {
            return Vec::new();
        };
        debug!(rule = plan.rule, label = %plan.label, "Semantic route armed");
        let outputs = ctx.badge.route(&plan.label, &plan.query, plan.action, ctx.now_ms);
        self.badge_effects(outputs, ctx)
    }

    /// Maps scheduler outputs onto effects, performing any commit that fired.
    pub fn badge_effects(&self, outputs: Vec<BadgeOutput>, ctx: &mut DispatchContext<'_>) -> Vec<SideEffect> {
        let mut effects = Vec::new();
        for output in outputs {
            match output {
                BadgeOutput::Show { text, preview } => effects.push(SideEffect::ShowBadge { text, preview }),
                BadgeOutput::Hide => effects.push(SideEffect::HideBadge),
                BadgeOutput::Commit(action) => effects.extend(self.execute(action, ctx)),
            }
        }
        effects
    }

    fn run_command(&self, command: Command, ctx: &mut DispatchContext<'_>, hide_badge: bool) -> Vec<SideEffect> {
        debug!(command = command.name(), "Dispatching command");
        let mut effects = Vec::new();

        match command {
            Command::Help => effects.push(SideEffect::OpenPanel(Panel::Help)),
            Command::BookmarksEditor => effects.push(SideEffect::OpenPanel(Panel::BookmarksEditor)),
            Command::Customize => effects.push(SideEffect::OpenPanel(Panel::Customize)),
            Command::TagsEditor => effects.push(SideEffect::OpenPanel(Panel::Tags)),
            Command::Settings | Command::WeatherSettings | Command::TimeSettings => {
                effects.push(SideEffect::OpenPanel(Panel::Config))
            }
            Command::AiRouterHelp => effects.push(SideEffect::Notice(AI_ROUTER_HELP.to_string())),
            Command::Version => effects.push(SideEffect::Notice(version_notice())),
            Command::IpInfo => {
                effects.push(SideEffect::OpenPanel(Panel::IpInfo));
                effects.push(start(ctx, ToolRequest::IpInfo));
            }
            Command::SpeedTest => {
                effects.push(SideEffect::OpenPanel(Panel::SpeedTest));
                effects.push(start(ctx, ToolRequest::SpeedTest));
            }
            Command::AiMode(action) => {
                let enabled = action.apply(ctx.settings.ai_mode_enabled());
                if let Err(e) = ctx.settings.save_ai_mode_enabled(enabled) {
                    warn!("Failed to persist AI mode: {}", e);
                }
                if !enabled {
                    effects.extend(ctx.badge.hide().map(|_| SideEffect::HideBadge));
                }
                effects.push(SideEffect::Notice(ai_mode_notice(enabled).to_string()));
            }
            Command::Theme(theme) => {
                if let Err(e) = ctx.settings.save_theme(theme) {
                    warn!("Failed to persist theme: {}", e);
                }
                effects.push(SideEffect::ApplyTheme(theme));
            }
            Command::Spell(text) => {
                effects.push(SideEffect::OpenPanel(Panel::SpellCheck));
                ctx.cancel.cancel(ToolKind::Spell);
                ctx.spell.schedule(text, ctx.now_ms, SPELL_DEBOUNCE_MS);
            }
            Command::Prompt(prompt) => {
                let request = PromptRequest {
                    prompt,
                    api_key: ctx.settings.gemini_api_key(),
                    model: ctx.settings.gemini_model(),
                    system_prompt: ctx.settings.gemini_system_prompt(),
                };
                effects.push(SideEffect::OpenPanel(Panel::Prompt));
                effects.push(start(ctx, ToolRequest::Prompt(request)));
            }
            Command::SemanticRoute(text) => {
                effects.extend(self.route_semantic(&text, ctx));
                effects.extend(clear(ctx, false));
                return effects;
            }
        }

        effects.extend(clear(ctx, hide_badge));
        effects
    }
}

fn navigate(url: String) -> Vec<SideEffect> {
    vec![SideEffect::ShowLoading, SideEffect::Navigate(url)]
}

fn start(ctx: &mut DispatchContext<'_>, request: ToolRequest) -> SideEffect {
    let ticket = ctx.cancel.begin(request.kind());
    SideEffect::StartRequest { ticket, request }
}

/// Clears the terminal and bookmark highlighting; optionally drops the badge.
fn clear(ctx: &mut DispatchContext<'_>, hide_badge: bool) -> Vec<SideEffect> {
    let mut effects = vec![SideEffect::ClearInput, SideEffect::ResetHighlight];
    if hide_badge {
        effects.extend(ctx.badge.hide().map(|_| SideEffect::HideBadge));
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BadgeMode;
    use crate::config::BrowserFamily;
    use crate::resolver::AiModeAction;

    #[test]
    fn aimode_toggle_flips_stored_flag() {
        let mut settings = Settings::in_memory();
        let mut badge = BadgeScheduler::new(BadgeMode::Live);
        let router = IntentRouter::new(BrowserFamily::Unknown);
        let mut cancel = CancellationRegistry::new();
        let mut spell = Debounce::new();
        let mut ctx = DispatchContext {
            settings: &mut settings,
            badge: &mut badge,
            router: &router,
            cancel: &mut cancel,
            spell: &mut spell,
            now_ms: 0,
        };

        let dest = Destination::command(Command::AiMode(AiModeAction::Toggle));
        let effects = Dispatcher::new().dispatch(dest, &mut ctx);
        assert!(ctx.settings.ai_mode_enabled());
        assert!(matches!(&effects[0], SideEffect::Notice(n) if n.starts_with("AI mode enabled")));
        assert!(effects.iter().any(|e| matches!(e, SideEffect::ClearInput)));
    }
}
