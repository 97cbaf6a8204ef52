use anyhow::Result;
use startpage::config::{FileStore, MemoryStore, RuntimeConfig, Settings};
use startpage::kernel::event::{EffectSink, Event, InputContent, InputEvent, SideEffect};
use startpage::kernel::reactor::{Reactor, ReactorConfig};
use startpage::kernel::scheduler::BADGE_HIDE_MS;
use startpage::services::ToolOutput;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Prints effects for a terminal session instead of a browser page.
struct ConsoleSink;

impl EffectSink for ConsoleSink {
    fn apply(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::Navigate(url) => println!("-> {}", url),
            SideEffect::OpenInNewTab { url, focus } => {
                println!("-> {} (new tab{})", url, if focus { ", focused" } else { "" })
            }
            SideEffect::OpenPanel(panel) => println!("[panel] {}", panel.name()),
            SideEffect::ApplyTheme(theme) => println!("[theme] {}", theme.as_str()),
            SideEffect::Notice(text) => println!("{}", text),
            SideEffect::SetInput(text) => println!("> {}", text),
            SideEffect::SetHint(hint) => {
                if let Some(s) = hint.suggestion {
                    println!("[hint] {} ({:?})", s, hint.class);
                }
            }
            SideEffect::ShowBadge { text, preview } => {
                let tag = if preview { "preview" } else { "route" };
                println!("[{}] {}", tag, text.replace('\n', " | "));
            }
            SideEffect::Render(output) => render(&output),
            SideEffect::ShowLoading
            | SideEffect::ClearInput
            | SideEffect::ResetHighlight
            | SideEffect::Highlight(_)
            | SideEffect::HideBadge
            | SideEffect::StartRequest { .. } => {}
        }
    }
}

fn render(output: &ToolOutput) {
    match output {
        ToolOutput::Spell(report) => println!("[spell] {}", report),
        ToolOutput::Prompt(reply) => println!("[{}] {}\n{}", reply.model, reply.status.label(), reply.text),
        ToolOutput::IpInfo(report) => {
            for (label, value) in report.rows() {
                println!("{:>9}: {}", label, value);
            }
        }
        ToolOutput::SpeedTest(report) => println!(
            "ping {} ms ({}) | down {:.2} Mbps | up {:.2} Mbps | {}",
            report.ping_ms,
            report.signal,
            report.download_mbps,
            report.upload_mbps,
            report.elapsed_clock()
        ),
        ToolOutput::Weather(reading) => println!("[weather] {}", reading),
    }
}

/// `?text` previews typing, `+text` opens in a new tab, `\up` `\down` `\tab`
/// `\esc` are keys; anything else is submitted.
fn parse_line(line: &str) -> InputEvent {
    let content = match line {
        "\\up" => InputContent::HistoryPrev,
        "\\down" => InputContent::HistoryNext,
        "\\tab" => InputContent::AcceptSuggestion,
        "\\esc" => InputContent::Cancel,
        _ => {
            if let Some(text) = line.strip_prefix('?') {
                InputContent::Typed(text.to_string())
            } else if let Some(text) = line.strip_prefix('+') {
                InputContent::SubmitNewTab {
                    text: text.to_string(),
                    focus: false,
                }
            } else {
                InputContent::Submit(line.to_string())
            }
        }
    };
    InputEvent::new("console", content)
}

fn open_settings(config: &RuntimeConfig) -> Settings {
    let Some(path) = &config.store_path else {
        return Settings::new(MemoryStore::new());
    };
    match FileStore::open(path) {
        Ok(store) => Settings::new(store),
        Err(e) => {
            tracing::warn!("Could not load {}: {}. Using an in-memory store.", path.display(), e);
            Settings::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let runtime = RuntimeConfig::from_env();
    tracing::info!(browser = runtime.browser.as_str(), "Starting startpage terminal");

    let settings = open_settings(&runtime);
    let (tx, rx) = mpsc::channel(100);
    let config = ReactorConfig {
        browser: runtime.browser,
        tick_ms: runtime.tick_ms,
        ..ReactorConfig::default()
    };
    let mut reactor = Reactor::new(rx, tx.clone(), settings, config);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if let Err(e) = tx.send(Event::Input(parse_line(line))).await {
                tracing::error!("Failed to send input: {}", e);
                return;
            }
        }
        // Let a pending route commit and its badge run out before stopping.
        tokio::time::sleep(Duration::from_millis(BADGE_HIDE_MS)).await;
        let _ = tx.send(Event::Shutdown).await;
    });

    reactor.run(&mut ConsoleSink).await;
    Ok(())
}
