use startpage::config::{BadgeMode, Settings, Theme};
use startpage::kernel::cancel::RequestTicket;
use startpage::kernel::event::{Event, InputContent, InputEvent, Panel, SideEffect, ToolReply};
use startpage::kernel::reactor::{Reactor, ReactorConfig};
use startpage::services::ipinfo::IpReport;
use startpage::services::spell::SpellReport;
use startpage::services::{ToolOutput, ToolRequest};
use tokio::sync::mpsc;

fn reactor_with(settings: Settings) -> Reactor {
    let (tx, rx) = mpsc::channel(100);
    Reactor::new(rx, tx, settings, ReactorConfig::default())
}

fn ai_settings() -> Settings {
    let mut settings = Settings::in_memory();
    settings.save_ai_mode_enabled(true).unwrap();
    settings
}

fn input(content: InputContent) -> Event {
    Event::Input(InputEvent::new("test", content))
}

fn submit(text: &str) -> Event {
    Event::Input(InputEvent::submit("test", text))
}

fn typed(text: &str) -> Event {
    Event::Input(InputEvent::typed("test", text))
}

/// Runs `ticks` empty steps and collects everything they emit.
fn idle(reactor: &mut Reactor, ticks: usize) -> Vec<SideEffect> {
    (0..ticks).flat_map(|_| reactor.tick_step(vec![])).collect()
}

fn navigations(effects: &[SideEffect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::Navigate(url) => Some(url.clone()),
            _ => None,
        })
        .collect()
}

fn badges(effects: &[SideEffect]) -> Vec<(String, bool)> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::ShowBadge { text, preview } => Some((text.clone(), *preview)),
            _ => None,
        })
        .collect()
}

fn started(effects: &[SideEffect]) -> Vec<(RequestTicket, ToolRequest)> {
    effects
        .iter()
        .filter_map(|e| match e {
            SideEffect::StartRequest { ticket, request } => Some((ticket.clone(), request.clone())),
            _ => None,
        })
        .collect()
}

fn has(effects: &[SideEffect], pred: impl Fn(&SideEffect) -> bool) -> bool {
    effects.iter().any(pred)
}

#[tokio::test]
async fn test_plain_text_without_ai_mode_goes_to_default_search() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit("weather in paris")]);

    assert!(matches!(effects[0], SideEffect::ShowLoading));
    assert_eq!(navigations(&effects), vec!["https://google.com/search?q=weather%20in%20paris"]);
    assert_eq!(reactor.state.history(), ["weather in paris"]);
}

#[tokio::test]
async fn test_explicit_ai_route_opens_weather_after_delay() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit("ai:what's the weather")]);

    assert_eq!(
        badges(&effects),
        vec![("Routing to: Weather Settings\nwhat's the weather".to_string(), false)]
    );
    assert!(has(&effects, |e| matches!(e, SideEffect::ClearInput)));
    // The ai: path keeps the badge up.
    assert!(!has(&effects, |e| matches!(e, SideEffect::HideBadge)));
    assert!(!has(&effects, |e| matches!(e, SideEffect::OpenPanel(_))));

    let later = idle(&mut reactor, 15);
    assert!(has(&later, |e| matches!(e, SideEffect::OpenPanel(Panel::Config))));
}

#[tokio::test]
async fn test_explicit_ai_route_to_reddit() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit("ai:show me reddit posts about rust")]);
    assert!(navigations(&effects).is_empty());

    let later = idle(&mut reactor, 15);
    let urls = navigations(&later);
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("reddit.com"), "{}", urls[0]);

    // Badge auto-hides after its display time.
    let rest = idle(&mut reactor, 60);
    assert!(has(&rest, |e| matches!(e, SideEffect::HideBadge)));
}

#[tokio::test]
async fn test_bookmark_navigates_at_once_without_ai_mode() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit("git")]);
    assert_eq!(navigations(&effects), vec!["https://github.com/"]);
    assert!(badges(&effects).is_empty());
}

#[tokio::test]
async fn test_bookmark_under_ai_mode_shows_badge_first() {
    let mut reactor = reactor_with(ai_settings());
    let effects = reactor.tick_step(vec![submit("git")]);
    assert_eq!(badges(&effects), vec![("Routing to: Github\ngit".to_string(), false)]);
    assert!(navigations(&effects).is_empty());

    let later = idle(&mut reactor, 15);
    assert_eq!(navigations(&later), vec!["https://github.com/"]);
}

#[tokio::test]
async fn test_bookmark_beats_semantic_router() {
    let mut reactor = reactor_with(ai_settings());
    reactor.tick_step(vec![submit("reddit")]);
    let later = idle(&mut reactor, 15);
    assert_eq!(navigations(&later), vec!["https://www.reddit.com/"]);
}

#[tokio::test]
async fn test_explicit_syntax_beats_bookmark() {
    let mut reactor = reactor_with(ai_settings());
    let effects = reactor.tick_step(vec![submit("yt:github")]);
    assert_eq!(
        navigations(&effects),
        vec!["https://www.youtube.com/results?search_query=github"]
    );
}

#[tokio::test]
async fn test_ai_mode_plain_text_routes_semantically() {
    let mut reactor = reactor_with(ai_settings());
    let effects = reactor.tick_step(vec![submit("directions to the airport")]);
    assert_eq!(badges(&effects)[0].0, "Routing to: Google Maps\ndirections to the airport");

    let later = idle(&mut reactor, 15);
    assert_eq!(
        navigations(&later),
        vec!["https://www.google.com/maps/search/directions%20to%20the%20airport"]
    );
}

#[tokio::test]
async fn test_badge_off_still_routes() {
    let mut settings = ai_settings();
    settings.save_badge_mode(BadgeMode::Off).unwrap();
    let mut reactor = reactor_with(settings);

    let effects = reactor.tick_step(vec![submit("directions to the airport")]);
    assert!(badges(&effects).is_empty());
    assert_eq!(navigations(&effects).len(), 1);
}

#[tokio::test]
async fn test_typing_cancels_pending_route() {
    let mut reactor = reactor_with(Settings::in_memory());
    reactor.tick_step(vec![submit("ai:reddit rust")]);
    let effects = reactor.tick_step(vec![typed("x")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::HideBadge)));

    let later = idle(&mut reactor, 20);
    assert!(navigations(&later).is_empty());
}

#[tokio::test]
async fn test_new_submission_replaces_pending_route() {
    let mut reactor = reactor_with(Settings::in_memory());
    reactor.tick_step(vec![submit("ai:reddit rust")]);
    let effects = reactor.tick_step(vec![submit("chess.com")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::HideBadge)));
    assert_eq!(navigations(&effects), vec!["https://chess.com"]);

    let later = idle(&mut reactor, 20);
    assert!(navigations(&later).is_empty(), "old route fired: {:?}", navigations(&later));
    assert!(!reactor.badge.has_pending_commit());
}

#[tokio::test]
async fn test_new_tab_submission_drops_pending_route() {
    let mut reactor = reactor_with(Settings::in_memory());
    reactor.tick_step(vec![submit("ai:reddit rust")]);
    reactor.tick_step(vec![input(InputContent::SubmitNewTab {
        text: "yt:lofi".into(),
        focus: false,
    })]);

    let later = idle(&mut reactor, 20);
    assert!(navigations(&later).is_empty());
}

#[tokio::test]
async fn test_bare_theme_word_switches_theme() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit("nord")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::ApplyTheme(Theme::Nord))));
    assert!(navigations(&effects).is_empty());
    assert_eq!(reactor.settings.theme(), Theme::Nord);

    reactor.tick_step(vec![submit("amoled")]);
    assert_eq!(reactor.settings.theme(), Theme::Black);
}

#[tokio::test]
async fn test_typing_shows_preview_under_ai_mode() {
    let mut reactor = reactor_with(ai_settings());
    let effects = reactor.tick_step(vec![typed("weather today")]);
    assert_eq!(
        badges(&effects),
        vec![("Routing to: Weather Settings\nweather today".to_string(), true)]
    );

    // Explicit search syntax is not previewed.
    let effects = reactor.tick_step(vec![typed("yt:cats")]);
    assert!(badges(&effects).is_empty());
    assert!(has(&effects, |e| matches!(e, SideEffect::HideBadge)));
    assert!(has(&effects, |e| matches!(e, SideEffect::ResetHighlight)));
}

#[tokio::test]
async fn test_explicit_ai_prefix_previews_without_ai_mode() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![typed("ai:watch trailer")]);
    assert_eq!(badges(&effects), vec![("Routing to: YouTube\nwatch trailer".to_string(), true)]);

    // Plain text without AI mode never previews.
    let effects = reactor.tick_step(vec![typed("watch trailer")]);
    assert!(badges(&effects).is_empty());
}

#[tokio::test]
async fn test_ghost_suggestion_accept() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![typed(":ne")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::SetHint(h) if h.suggestion.as_deref() == Some(":netspeed"))));

    let effects = reactor.tick_step(vec![input(InputContent::AcceptSuggestion)]);
    assert!(matches!(&effects[0], SideEffect::SetInput(s) if s == ":netspeed"));
    assert_eq!(reactor.state.input, ":netspeed");
}

#[tokio::test]
async fn test_history_walk() {
    let mut reactor = reactor_with(Settings::in_memory());
    reactor.tick_step(vec![submit("one"), submit("two")]);

    let up = |r: &mut Reactor| r.tick_step(vec![input(InputContent::HistoryPrev)]);
    assert!(matches!(&up(&mut reactor)[0], SideEffect::SetInput(s) if s == "two"));
    assert!(matches!(&up(&mut reactor)[0], SideEffect::SetInput(s) if s == "one"));
    // Already at the oldest entry.
    assert!(up(&mut reactor).is_empty());

    let effects = reactor.tick_step(vec![input(InputContent::HistoryNext)]);
    assert!(matches!(&effects[0], SideEffect::SetInput(s) if s == "two"));
}

#[tokio::test]
async fn test_theme_command_persists_and_applies() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit(":amoled")]);

    assert!(has(&effects, |e| matches!(e, SideEffect::ApplyTheme(Theme::Black))));
    assert!(has(&effects, |e| matches!(e, SideEffect::ClearInput)));
    assert_eq!(reactor.settings.theme(), Theme::Black);
    assert_eq!(reactor.state.theme, Theme::Black);
}

#[tokio::test]
async fn test_aimode_command_reports_and_persists() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit(":aimode on")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::Notice(n) if n.starts_with("AI mode enabled"))));
    assert!(reactor.settings.ai_mode_enabled());

    let effects = reactor.tick_step(vec![submit(":aimode")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::Notice(n) if n.starts_with("AI mode disabled"))));
    assert!(!reactor.settings.ai_mode_enabled());
}

#[tokio::test]
async fn test_version_notice() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit(":ver")]);
    let expected = format!("v{}", env!("CARGO_PKG_VERSION"));
    assert!(has(&effects, |e| matches!(e, SideEffect::Notice(n) if *n == expected)));
}

#[tokio::test]
async fn test_stale_spell_result_is_dropped() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit("spell:recieve")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::OpenPanel(Panel::SpellCheck))));
    // Debounced: nothing starts yet.
    assert!(started(&effects).is_empty());

    let first = started(&idle(&mut reactor, 7));
    assert_eq!(first.len(), 1);
    let (old_ticket, request) = first[0].clone();
    assert_eq!(request, ToolRequest::Spell { text: "recieve".into() });

    reactor.tick_step(vec![input(InputContent::SpellEdit("receive".into()))]);
    assert!(old_ticket.token.is_cancelled());

    let second = started(&idle(&mut reactor, 7));
    assert_eq!(second.len(), 1);
    let new_ticket = second[0].0.clone();

    let reply = |ticket: &RequestTicket| {
        Event::ToolResult(ToolReply {
            request: ticket.id,
            output: ToolOutput::Spell(SpellReport::Correct { word: "receive".into() }),
        })
    };
    assert!(reactor.tick_step(vec![reply(&old_ticket)]).is_empty());

    let effects = reactor.tick_step(vec![reply(&new_ticket)]);
    assert!(has(&effects, |e| matches!(e, SideEffect::Render(ToolOutput::Spell(r)) if r.is_correct())));
}

#[tokio::test]
async fn test_closing_panel_cancels_its_request() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![submit(":ip")]);
    assert!(has(&effects, |e| matches!(e, SideEffect::OpenPanel(Panel::IpInfo))));
    let (ticket, request) = started(&effects)[0].clone();
    assert_eq!(request, ToolRequest::IpInfo);

    reactor.tick_step(vec![input(InputContent::PanelClosed(Panel::IpInfo))]);
    assert!(ticket.token.is_cancelled());

    let late = Event::ToolResult(ToolReply {
        request: ticket.id,
        output: ToolOutput::IpInfo(IpReport::failed("timeout")),
    });
    assert!(reactor.tick_step(vec![late]).is_empty());
}

#[tokio::test]
async fn test_prompt_request_carries_stored_settings() {
    let mut settings = Settings::in_memory();
    settings.save_gemini_api_key(" key-123 ").unwrap();
    let mut reactor = reactor_with(settings);

    let effects = reactor.tick_step(vec![submit("gem:hello")]);
    let (_, request) = started(&effects)[0].clone();
    match request {
        ToolRequest::Prompt(req) => {
            assert_eq!(req.prompt, "hello");
            assert_eq!(req.api_key, "key-123");
        }
        other => panic!("unexpected request {:?}", other),
    }
}

#[tokio::test]
async fn test_new_tab_submission() {
    let mut reactor = reactor_with(Settings::in_memory());
    let effects = reactor.tick_step(vec![input(InputContent::SubmitNewTab {
        text: "git".into(),
        focus: true,
    })]);
    assert!(matches!(
        &effects[0],
        SideEffect::OpenInNewTab { url, focus: true } if url == "https://github.com/"
    ));

    let effects = reactor.tick_step(vec![input(InputContent::SubmitNewTab {
        text: ":config".into(),
        focus: false,
    })]);
    assert!(effects.is_empty());
}

#[tokio::test]
async fn test_boot_applies_theme_and_fetches_weather() {
    let mut settings = Settings::in_memory();
    settings.save_theme(Theme::Nord).unwrap();
    let mut reactor = reactor_with(settings);

    let effects = reactor.boot();
    assert!(matches!(effects[0], SideEffect::ApplyTheme(Theme::Nord)));
    let (_, request) = started(&effects)[0].clone();
    assert_eq!(
        request,
        ToolRequest::Weather { location: "Gurgaon".into(), unit: "celsius".into() }
    );
}
