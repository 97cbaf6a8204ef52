//! Network-backed panels. Every call degrades to a placeholder on failure;
//! nothing here returns an error to the routing core.

pub mod gemini;
pub mod ipinfo;
pub mod speedtest;
pub mod spell;
pub mod weather;

use crate::kernel::cancel::{RequestTicket, ToolKind};
use crate::kernel::event::{Event, ToolReply};
use gemini::{PromptReply, PromptRequest};
use ipinfo::IpReport;
use reqwest::Client;
use speedtest::SpeedReport;
use spell::SpellReport;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Base URLs of the remote APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub datamuse: String,
    pub gemini: String,
    pub ipapi: String,
    pub ipify6: String,
    pub trace: String,
    pub speed: String,
    pub geocoding: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            datamuse: "https://api.datamuse.com".to_string(),
            gemini: "https://generativelanguage.googleapis.com".to_string(),
            ipapi: "https://ipapi.co/json/".to_string(),
            ipify6: "https://api6.ipify.org?format=json".to_string(),
            trace: "https://www.cloudflare.com/cdn-cgi/trace".to_string(),
            speed: "https://speed.cloudflare.com".to_string(),
            geocoding: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Spell { text: String },
    Prompt(PromptRequest),
    IpInfo,
    SpeedTest,
    Weather { location: String, unit: String },
}

impl ToolRequest {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::Spell { .. } => ToolKind::Spell,
            ToolRequest::Prompt(_) => ToolKind::Prompt,
            ToolRequest::IpInfo => ToolKind::IpInfo,
            ToolRequest::SpeedTest => ToolKind::SpeedTest,
            ToolRequest::Weather { .. } => ToolKind::Weather,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Spell(SpellReport),
    Prompt(PromptReply),
    IpInfo(IpReport),
    SpeedTest(SpeedReport),
    Weather(String),
}

impl ToolOutput {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolOutput::Spell(_) => ToolKind::Spell,
            ToolOutput::Prompt(_) => ToolKind::Prompt,
            ToolOutput::IpInfo(_) => ToolKind::IpInfo,
            ToolOutput::SpeedTest(_) => ToolKind::SpeedTest,
            ToolOutput::Weather(_) => ToolKind::Weather,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolServices {
    client: Client,
    endpoints: Endpoints,
}

impl ToolServices {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("startpage/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn run(&self, request: ToolRequest) -> ToolOutput {
        let c = &self.client;
        let e = &self.endpoints;
        match request {
            ToolRequest::Spell { text } => ToolOutput::Spell(spell::check(c, &e.datamuse, &text).await),
            ToolRequest::Prompt(req) => ToolOutput::Prompt(gemini::ask(c, &e.gemini, &req).await),
            ToolRequest::IpInfo => ToolOutput::IpInfo(ipinfo::lookup(c, e).await),
            ToolRequest::SpeedTest => ToolOutput::SpeedTest(speedtest::run(c, e).await),
            ToolRequest::Weather { location, unit } => {
                ToolOutput::Weather(weather::current(c, e, &location, &unit).await)
            }
        }
    }
}

impl Default for ToolServices {
    fn default() -> Self {
        Self::new(Endpoints::default())
    }
}

/// Spawns tool requests and feeds their results back into the reactor queue.
#[derive(Clone)]
pub struct ToolRunner {
    services: Arc<ToolServices>,
    tx: mpsc::Sender<Event>,
}

impl ToolRunner {
    pub fn new(services: ToolServices, tx: mpsc::Sender<Event>) -> Self {
        Self {
            services: Arc::new(services),
            tx,
        }
    }

    pub fn spawn(&self, ticket: RequestTicket, request: ToolRequest) -> tokio::task::JoinHandle<()> {
        let services = Arc::clone(&self.services);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            info!(kind = ?ticket.kind, id = ?ticket.id, "Tool request started");
            let output = tokio::select! {
                biased;
                _ = ticket.token.cancelled() => {
                    debug!(kind = ?ticket.kind, "Tool request cancelled");
                    return;
                }
                output = services.run(request) => output,
            };

            let reply = ToolReply {
                request: ticket.id,
                output,
            };
            if let Err(e) = tx.send(Event::ToolResult(reply)).await {
                warn!("Reactor gone, dropping tool result: {}", e);
            }
        })
    }
}
