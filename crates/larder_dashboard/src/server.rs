//! TCP server for the dashboard wire protocol.
//!
//! One line in, one line out: each request line is a `DashboardRequest`,
//! each response line a `DashboardResponse`. Connections are handled on
//! separate tasks; the per-file locks inside [`DashboardService`] do the
//! actual serialization of mutations.

use anyhow::{Context, Result};
use larder_protocol::{DashboardRequest, DashboardResponse};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::service::DashboardService;

/// Error type surfaced on the dashboard wire.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DashboardError {
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::BadRequest(_) => "bad_request",
            DashboardError::Storage(_) => "storage",
        }
    }

    fn into_response(self) -> DashboardResponse {
        DashboardResponse::Error {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Storage(format!("{:#}", err))
    }
}

pub struct DashboardServer {
    service: Arc<DashboardService>,
    listener: TcpListener,
}

impl DashboardServer {
    /// Bind the server socket. Use port 0 to pick an ephemeral port.
    pub async fn bind(addr: &str, service: DashboardService) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind dashboard server at {}", addr))?;
        Ok(Self {
            service: Arc::new(service),
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read dashboard server address")
    }

    /// Accept loop; runs until the task is dropped.
    pub async fn run(self) -> Result<()> {
        info!("Dashboard listening on {}", self.local_addr()?);
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .context("Failed to accept dashboard connection")?;
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                if let Err(err) = handle_connection(stream, service).await {
                    warn!("Dashboard connection from {} failed: {:#}", peer, err);
                }
            });
        }
    }
}

async fn handle_connection(stream: TcpStream, service: Arc<DashboardService>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<DashboardRequest>(&line) {
            Ok(request) => dispatch(&service, request).await,
            Err(err) => DashboardError::BadRequest(err.to_string()).into_response(),
        };
        let mut payload = serde_json::to_vec(&response).context("Failed to encode response")?;
        payload.push(b'\n');
        writer.write_all(&payload).await?;
    }
    Ok(())
}

async fn dispatch(service: &DashboardService, request: DashboardRequest) -> DashboardResponse {
    match request {
        DashboardRequest::Snapshot { target } => match service.snapshot(&target).await {
            Ok(snapshot) => DashboardResponse::Snapshot(snapshot),
            Err(err) => DashboardError::from(err).into_response(),
        },
        DashboardRequest::Increment { target, code } => {
            match service.increment(&target, &code).await {
                Ok(outcome) => DashboardResponse::Mutation(outcome),
                Err(err) => DashboardError::from(err).into_response(),
            }
        }
        DashboardRequest::Decrement { target, code } => {
            match service.decrement(&target, &code).await {
                Ok(outcome) => DashboardResponse::Mutation(outcome),
                Err(err) => DashboardError::from(err).into_response(),
            }
        }
        DashboardRequest::ListSnapshots => match service.list_snapshots() {
            Ok(files) => DashboardResponse::Snapshots { files },
            Err(err) => DashboardError::from(err).into_response(),
        },
        DashboardRequest::Ping => DashboardResponse::Pong,
    }
}
