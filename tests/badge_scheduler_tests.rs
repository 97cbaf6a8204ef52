use startpage::config::BadgeMode;
use startpage::intent::RouteAction;
use startpage::kernel::scheduler::{
    BadgeOutput, BadgePhase, BadgeScheduler, Debounce, BADGE_HIDE_MS, NAV_DELAY_MS,
};

fn nav(url: &str) -> RouteAction {
    RouteAction::Navigate(url.to_string())
}

fn commits(outputs: &[BadgeOutput]) -> usize {
    outputs.iter().filter(|o| matches!(o, BadgeOutput::Commit(_))).count()
}

#[test]
fn test_commit_fires_after_nav_delay_then_auto_hides() {
    let mut badge = BadgeScheduler::new(BadgeMode::Live);
    let out = badge.route("Reddit", "rust", nav("https://reddit.test"), 0);
    assert_eq!(
        out,
        vec![BadgeOutput::Show { text: "Routing to: Reddit\nrust".into(), preview: false }]
    );
    assert_eq!(badge.phase(), BadgePhase::Routing);

    assert!(badge.poll(NAV_DELAY_MS - 1).is_empty());
    assert_eq!(badge.poll(NAV_DELAY_MS), vec![BadgeOutput::Commit(nav("https://reddit.test"))]);
    assert_eq!(badge.phase(), BadgePhase::Confirmed);

    assert!(badge.poll(BADGE_HIDE_MS - 1).is_empty());
    assert_eq!(badge.poll(BADGE_HIDE_MS), vec![BadgeOutput::Hide]);
    assert_eq!(badge.phase(), BadgePhase::Hidden);
}

#[test]
fn test_rapid_routes_keep_one_hide_timer() {
    let mut badge = BadgeScheduler::new(BadgeMode::Live);
    badge.route("A", "a", nav("https://a.test"), 0);
    badge.route("B", "b", nav("https://b.test"), 100);
    assert_eq!(badge.hide_timer_count(), 1);

    let mut all = Vec::new();
    for now in (0..=5000).step_by(50) {
        all.extend(badge.poll(now));
    }

    // Only the second route commits, and the badge hides exactly once.
    assert_eq!(all.iter().filter(|o| **o == BadgeOutput::Hide).count(), 1);
    assert_eq!(commits(&all), 1);
    assert!(all.contains(&BadgeOutput::Commit(nav("https://b.test"))));
    println!("Rapid routes collapsed to one timer");
}

#[test]
fn test_preview_is_live_only_and_cancels_commit() {
    let mut badge = BadgeScheduler::new(BadgeMode::Live);
    badge.route("A", "a", nav("https://a.test"), 0);
    let out = badge.preview("YouTube", "lofi");
    assert_eq!(out, vec![BadgeOutput::Show { text: "Routing to: YouTube\nlofi".into(), preview: true }]);
    assert!(!badge.has_pending_commit());
    assert_eq!(badge.hide_timer_count(), 0);
    assert!(badge.poll(10_000).is_empty());

    let mut route_only = BadgeScheduler::new(BadgeMode::Route);
    assert!(route_only.preview("YouTube", "lofi").is_empty());
    assert_eq!(route_only.phase(), BadgePhase::Hidden);
}

#[test]
fn test_off_mode_still_executes() {
    let mut badge = BadgeScheduler::new(BadgeMode::Off);
    let out = badge.route("Reddit", "rust", nav("https://reddit.test"), 0);
    assert_eq!(out, vec![BadgeOutput::Commit(nav("https://reddit.test"))]);
    assert_eq!(badge.phase(), BadgePhase::Hidden);
    assert!(badge.poll(10_000).is_empty());
}

#[test]
fn test_hide_drops_pending_commit() {
    let mut badge = BadgeScheduler::new(BadgeMode::Live);
    badge.route("A", "a", nav("https://a.test"), 0);
    assert_eq!(badge.hide(), Some(BadgeOutput::Hide));
    assert_eq!(badge.hide(), None);
    assert!(badge.poll(10_000).is_empty());
}

#[test]
fn test_switching_to_off_hides_but_keeps_commit() {
    let mut badge = BadgeScheduler::new(BadgeMode::Live);
    badge.route("A", "a", nav("https://a.test"), 0);
    assert_eq!(badge.set_mode(BadgeMode::Off), Some(BadgeOutput::Hide));
    assert_eq!(badge.poll(NAV_DELAY_MS), vec![BadgeOutput::Commit(nav("https://a.test"))]);
}

#[test]
fn test_debounce_keeps_last_payload() {
    let mut debounce = Debounce::new();
    debounce.schedule("recieve".to_string(), 0, 300);
    debounce.schedule("receive".to_string(), 100, 300);

    assert_eq!(debounce.poll(300), None);
    assert_eq!(debounce.poll(400).as_deref(), Some("receive"));
    assert!(!debounce.is_pending());

    debounce.schedule("x".to_string(), 0, 300);
    assert!(debounce.cancel());
    assert_eq!(debounce.poll(1000), None);
}
