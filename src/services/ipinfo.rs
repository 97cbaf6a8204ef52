use super::Endpoints;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::warn;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    ip: Option<String>,
    org: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    timezone: Option<String>,
    asn: Option<String>,
    #[serde(default)]
    proxy: bool,
    #[serde(default)]
    hosting: bool,
    #[serde(default)]
    mobile: bool,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

#[derive(Deserialize)]
struct IpifyResponse {
    ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpReport {
    pub address: String,
    pub ipv6: String,
    pub isp: String,
    pub location: String,
    pub timezone: String,
    pub asn: String,
    pub network: String,
    pub dns: String,
    pub latency: String,
    pub vpn: String,
}

impl IpReport {
    /// Every field but the address shows `?`; the address carries the error.
    pub fn failed(message: &str) -> Self {
        let q = || "?".to_string();
        Self {
            address: message.to_string(),
            ipv6: q(),
            isp: q(),
            location: q(),
            timezone: q(),
            asn: q(),
            network: q(),
            dns: q(),
            latency: q(),
            vpn: q(),
        }
    }

    pub fn rows(&self) -> [(&'static str, &str); 10] {
        [
            ("IP", self.address.as_str()),
            ("IPv6", self.ipv6.as_str()),
            ("ISP", self.isp.as_str()),
            ("Location", self.location.as_str()),
            ("Timezone", self.timezone.as_str()),
            ("ASN", self.asn.as_str()),
            ("Network", self.network.as_str()),
            ("DNS", self.dns.as_str()),
            ("Latency", self.latency.as_str()),
            ("VPN", self.vpn.as_str()),
        ]
    }
}

/// Proxy and hosting are real flags; mobile only names the connection type.
pub fn vpn_status(proxy: bool, hosting: bool, mobile: bool) -> String {
    let mut flags = Vec::new();
    if proxy {
        flags.push("Proxy detected");
    }
    if hosting {
        flags.push("VPN/Hosting");
    }
    let conn = if mobile { "Mobile" } else { "Broadband" };
    if flags.is_empty() {
        format!("Direct · {}", conn)
    } else {
        format!("{} · {}", flags.join(", "), conn)
    }
}

pub fn join_location(parts: &[Option<&str>]) -> String {
    let joined = parts
        .iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() { "Unknown".to_string() } else { joined }
}

fn or_unknown(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "Unknown".to_string())
}

async fn fetch_ipv6(client: &Client, url: &str) -> Option<String> {
    let resp = client.get(url).timeout(TIMEOUT).send().await.ok()?;
    resp.json::<IpifyResponse>().await.ok().map(|r| r.ip)
}

async fn probe_latency(client: &Client, url: &str) -> Result<Duration> {
    let started = Instant::now();
    client.get(url).timeout(TIMEOUT).send().await?;
    Ok(started.elapsed())
}

async fn fetch(client: &Client, endpoints: &Endpoints) -> Result<IpReport> {
    let (main, ipv6) = tokio::join!(
        client.get(&endpoints.ipapi).timeout(TIMEOUT).send(),
        fetch_ipv6(client, &endpoints.ipify6)
    );
    let d: IpApiResponse = main?.json().await?;
    if d.error {
        return Err(anyhow!(d.reason.unwrap_or_else(|| "API error".to_string())));
    }

    let latency = match probe_latency(client, &endpoints.trace).await {
        Ok(elapsed) => format!("{}ms", elapsed.as_millis()),
        Err(_) => "?".to_string(),
    };

    Ok(IpReport {
        location: join_location(&[d.city.as_deref(), d.region.as_deref(), d.country_name.as_deref()]),
        vpn: vpn_status(d.proxy, d.hosting, d.mobile),
        address: or_unknown(d.ip),
        ipv6: ipv6.unwrap_or_else(|| "Not available".to_string()),
        isp: or_unknown(d.org.clone()),
        network: or_unknown(d.org),
        timezone: or_unknown(d.timezone),
        asn: or_unknown(d.asn),
        dns: "Auto-detected".to_string(),
        latency,
    })
}

pub async fn lookup(client: &Client, endpoints: &Endpoints) -> IpReport {
    match fetch(client, endpoints).await {
        Ok(report) => report,
        Err(e) => {
            warn!("IP info lookup failed: {}", e);
            IpReport::failed(&e.to_string())
        }
    }
}
