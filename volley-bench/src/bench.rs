//! Run coordinator
//!
//! Fans the configured number of workers out as tokio tasks, waits for
//! every one of them to come back, and turns the wall-clock time into
//! [`RunMetrics`]. Worker failures are logged and absorbed: a run always
//! produces a summary.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::task::JoinSet;
use volley_wire::transport::{SocketFactory, TransportFactory};
use volley_wire::{BufferedTransportFactory, TcpSocketFactory, TlsSocketFactory};

use crate::config::RunConfig;
use crate::metrics::RunMetrics;
use crate::worker;

/// Executes one full run and returns its metrics.
pub async fn run(config: &RunConfig) -> Result<RunMetrics> {
    let sockets: Arc<dyn SocketFactory> = if config.secure {
        Arc::new(TlsSocketFactory::insecure()?)
    } else {
        Arc::new(TcpSocketFactory::new())
    };
    let transports: Arc<dyn TransportFactory> =
        Arc::new(BufferedTransportFactory::new(config.buffer_size));
    let codecs = config.protocol.factory();

    tracing::info!(
        "Starting {} workers x {} calls against {} ({} codec{})",
        config.workers,
        config.calls_per_worker,
        config.addr,
        config.protocol,
        if config.secure { ", TLS" } else { "" }
    );

    let started = Instant::now();

    let mut workers = JoinSet::new();
    for id in 0..config.workers {
        let addr = config.addr.clone();
        let calls = config.calls_per_worker;
        let sockets = Arc::clone(&sockets);
        let transports = Arc::clone(&transports);
        let codecs = Arc::clone(&codecs);

        workers.spawn(async move {
            let result = worker::run(
                &addr,
                calls,
                sockets.as_ref(),
                transports.as_ref(),
                codecs.as_ref(),
            )
            .await;
            (id, result)
        });
    }

    // Every worker is joined before the clock stops; errors are absorbed
    // so the barrier always completes
    let mut failed = 0usize;
    while let Some(result) = workers.join_next().await {
        match result {
            Ok((_, Ok(()))) => {}
            Ok((id, Err(e))) => {
                failed += 1;
                tracing::error!("Worker {} failed: {}", id, e);
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Worker task panicked: {}", e);
            }
        }
    }

    let elapsed = started.elapsed();

    if failed > 0 {
        tracing::warn!("{} of {} workers reported errors", failed, config.workers);
    }

    Ok(RunMetrics::new(
        config.workers,
        config.calls_per_worker,
        elapsed,
    ))
}
