//! Synchronous client for the dashboard wire protocol.

use anyhow::{Context, Result};
use larder_protocol::{DashboardRequest, DashboardResponse, MutationOutcome, Snapshot};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Default timeout for dashboard requests (5 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DashboardClient {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl DashboardClient {
    /// Connect to the dashboard at the given address.
    pub fn connect(addr: &str) -> Result<Self> {
        Self::connect_with_timeout(addr, DEFAULT_TIMEOUT)
    }

    /// Connect with a custom timeout.
    pub fn connect_with_timeout(addr: &str, timeout: Duration) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .with_context(|| format!("Failed to connect to dashboard at {}", addr))?;
        stream
            .set_read_timeout(Some(timeout))
            .context("Failed to set read timeout")?;
        stream
            .set_write_timeout(Some(timeout))
            .context("Failed to set write timeout")?;
        let writer = stream.try_clone().context("Failed to clone stream")?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Send a request and receive a response.
    pub fn request(&mut self, req: DashboardRequest) -> Result<DashboardResponse> {
        let mut payload = serde_json::to_vec(&req).context("Failed to serialize request")?;
        payload.push(b'\n');
        self.writer
            .write_all(&payload)
            .context("Failed to send request")?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to receive response (timeout or connection error)")?;
        if read == 0 {
            anyhow::bail!("Dashboard closed the connection");
        }

        serde_json::from_str(&line).context("Failed to parse response")
    }

    /// Ping the dashboard to check if it's alive.
    pub fn ping(&mut self) -> Result<bool> {
        match self.request(DashboardRequest::Ping)? {
            DashboardResponse::Pong => Ok(true),
            DashboardResponse::Error { message, .. } => {
                anyhow::bail!("Ping failed: {}", message)
            }
            _ => anyhow::bail!("Unexpected response to Ping"),
        }
    }

    /// Full snapshot of a target file.
    pub fn snapshot(&mut self, target: &str) -> Result<Snapshot> {
        match self.request(DashboardRequest::Snapshot {
            target: target.to_string(),
        })? {
            DashboardResponse::Snapshot(snapshot) => Ok(snapshot),
            DashboardResponse::Error { code, message } => {
                anyhow::bail!("Snapshot failed [{}]: {}", code, message)
            }
            _ => anyhow::bail!("Unexpected response to Snapshot"),
        }
    }

    /// Increment the quantity of `code` in `target`.
    pub fn increment(&mut self, target: &str, code: &str) -> Result<MutationOutcome> {
        match self.request(DashboardRequest::Increment {
            target: target.to_string(),
            code: code.to_string(),
        })? {
            DashboardResponse::Mutation(outcome) => Ok(outcome),
            DashboardResponse::Error { code, message } => {
                anyhow::bail!("Increment failed [{}]: {}", code, message)
            }
            _ => anyhow::bail!("Unexpected response to Increment"),
        }
    }

    /// Decrement the quantity of `code` in `target`, clamping at zero.
    pub fn decrement(&mut self, target: &str, code: &str) -> Result<MutationOutcome> {
        match self.request(DashboardRequest::Decrement {
            target: target.to_string(),
            code: code.to_string(),
        })? {
            DashboardResponse::Mutation(outcome) => Ok(outcome),
            DashboardResponse::Error { code, message } => {
                anyhow::bail!("Decrement failed [{}]: {}", code, message)
            }
            _ => anyhow::bail!("Unexpected response to Decrement"),
        }
    }

    /// Enumerate candidate snapshot files.
    pub fn list_snapshots(&mut self) -> Result<Vec<String>> {
        match self.request(DashboardRequest::ListSnapshots)? {
            DashboardResponse::Snapshots { files } => Ok(files),
            DashboardResponse::Error { code, message } => {
                anyhow::bail!("ListSnapshots failed [{}]: {}", code, message)
            }
            _ => anyhow::bail!("Unexpected response to ListSnapshots"),
        }
    }
}
