//! Public tunnel to the local HTTP port through the ngrok agent.
//!
//! The supervisor runs on its own task. Whatever happens to it is logged
//! and never reaches the request-serving side.

use crate::{Error, Result, config::TunnelConfig};
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct TunnelList {
    #[serde(default)]
    tunnels: Vec<TunnelInfo>,
}

#[derive(Debug, Deserialize)]
struct TunnelInfo {
    public_url: String,
    #[serde(default)]
    proto: String,
    config: Option<TunnelTarget>,
}

#[derive(Debug, Deserialize)]
struct TunnelTarget {
    #[serde(default)]
    addr: String,
}

impl TunnelInfo {
    /// Agents list every tunnel they own; only ours forwards to `port`.
    fn forwards_to(&self, port: u16) -> bool {
        self.config
            .as_ref()
            .is_some_and(|c| c.addr.ends_with(&format!(":{}", port)))
    }
}

pub struct TunnelSupervisor {
    config: TunnelConfig,
    port: u16,
    http: reqwest::Client,
}

impl TunnelSupervisor {
    pub fn new(config: TunnelConfig, port: u16) -> Self {
        Self {
            config,
            port,
            http: reqwest::Client::new(),
        }
    }

    /// Starts the agent, announces the public address, then waits for the
    /// agent to exit.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            match self.establish().await {
                Ok((mut child, public_url)) => {
                    println!("NGROK URL: {}", public_url);
                    info!(public_url = %public_url, port = self.port, "Public tunnel established");

                    match child.wait().await {
                        Ok(status) => warn!("Tunnel agent exited: {}", status),
                        Err(e) => warn!("Failed to wait on tunnel agent: {}", e),
                    }
                }
                Err(e) => warn!("Public tunnel unavailable, serving locally only: {}", e),
            }
        })
    }

    async fn establish(&self) -> Result<(Child, String)> {
        let mut child = self.start_agent()?;

        let deadline = Duration::from_secs(self.config.startup_timeout_secs);
        let discovered = tokio::select! {
            url = discover_public_url(&self.http, &self.config.api_url, self.port, deadline) => url,
            status = child.wait() => Err(match status {
                Ok(status) => Error::tunnel(format!(
                    "Tunnel agent exited before publishing a URL: {}",
                    status
                )),
                Err(e) => Error::tunnel(format!("Failed to wait on tunnel agent: {}", e)),
            }),
        };

        match discovered {
            Ok(url) => Ok((child, url)),
            Err(e) => {
                let _ = child.start_kill();
                Err(e)
            }
        }
    }

    fn start_agent(&self) -> Result<Child> {
        debug!(
            command = %self.config.command,
            port = self.port,
            "Starting tunnel agent"
        );

        self.agent_command().spawn().map_err(|e| {
            Error::tunnel(format!(
                "Failed to spawn tunnel agent {}: {}",
                self.config.command, e
            ))
        })
    }

    fn agent_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(agent_args(self.port));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);

        if !self.config.authtoken.is_empty() {
            cmd.env("NGROK_AUTHTOKEN", &self.config.authtoken);
        }

        cmd
    }
}

fn agent_args(port: u16) -> Vec<String> {
    vec![
        "http".to_string(),
        port.to_string(),
        "--log".to_string(),
        "stdout".to_string(),
    ]
}

/// Polls the agent's inspection API until a tunnel forwarding to `port`
/// reports a public URL.
pub async fn discover_public_url(
    http: &reqwest::Client,
    api_url: &str,
    port: u16,
    timeout: Duration,
) -> Result<String> {
    let deadline = Instant::now() + timeout;

    loop {
        match fetch_public_url(http, api_url, port).await {
            Ok(Some(url)) => return Ok(url),
            Ok(None) => debug!("Tunnel agent has no tunnels yet"),
            Err(e) => debug!("Tunnel agent API not ready: {}", e),
        }

        if Instant::now() + POLL_INTERVAL > deadline {
            return Err(Error::tunnel(format!(
                "No public URL from {} within {:?}",
                api_url, timeout
            )));
        }
        sleep(POLL_INTERVAL).await;
    }
}

async fn fetch_public_url(
    http: &reqwest::Client,
    api_url: &str,
    port: u16,
) -> Result<Option<String>> {
    let list: TunnelList = http
        .get(api_url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(select_public_url(list.tunnels, port))
}

fn select_public_url(tunnels: Vec<TunnelInfo>, port: u16) -> Option<String> {
    let (https, other): (Vec<_>, Vec<_>) = tunnels
        .into_iter()
        .filter(|t| !t.public_url.is_empty() && t.forwards_to(port))
        .partition(|t| t.proto == "https" || t.public_url.starts_with("https://"));

    https
        .into_iter()
        .chain(other)
        .next()
        .map(|t| t.public_url)
}
