//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Arma las piezas: cola acotada, pool de workers, acceptor sobre un
//! `TcpListener` y, opcionalmente, un thread que registra las métricas
//! cada cierto tiempo.

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::files::StaticFiles;
use crate::metrics::MetricsCollector;
use crate::net::{ConnectionHandle, TcpAcceptor};
use crate::queue::BoundedQueue;
use crate::server::acceptor::Acceptor;
use crate::server::worker::WorkerPool;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Servidor de archivos estáticos con pool fijo de workers
pub struct Server {
    config: Config,
    metrics: MetricsCollector,
    queue: Arc<BoundedQueue<ConnectionHandle<TcpStream>>>,
    dispatcher: Arc<StaticFiles>,
    acceptor: Option<TcpAcceptor>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let queue = Arc::new(BoundedQueue::new(config.queue_capacity, config.admission));
        let dispatcher = Arc::new(StaticFiles::new(
            config.root_dir.clone(),
            config.max_path_segments,
        ));

        Self {
            config,
            metrics: MetricsCollector::new(),
            queue,
            dispatcher,
            acceptor: None,
        }
    }

    /// Hace bind a la dirección configurada y retorna la dirección real
    /// (útil con puerto 0)
    pub fn bind(&mut self) -> Result<SocketAddr> {
        let address = self.config.address();
        let acceptor = TcpAcceptor::bind(&address, self.config.read_timeout())
            .map_err(|source| ServerError::Bind { address, source })?;
        let local = acceptor.local_addr()?;

        tracing::info!(address = %local, "listening");
        self.acceptor = Some(acceptor);
        Ok(local)
    }

    /// Arranca workers y acceptor. Solo retorna si falla el arranque.
    pub fn run(&mut self) -> Result<()> {
        if self.acceptor.is_none() {
            self.bind()?;
        }
        let listener = self
            .acceptor
            .take()
            .ok_or_else(|| ServerError::InvalidConfig("listener not bound".to_string()))?;

        let pool = WorkerPool::spawn(
            self.config.workers,
            Arc::clone(&self.queue),
            Arc::clone(&self.dispatcher),
            self.metrics.clone(),
            self.config.max_request_bytes,
        )?;
        tracing::info!(
            workers = pool.size(),
            root = %self.dispatcher.root().display(),
            "worker pool started"
        );

        if let Some(interval) = self.config.stats_interval() {
            self.spawn_stats_reporter(interval)?;
        }

        let mut acceptor = Acceptor::new(listener, Arc::clone(&self.queue), self.metrics.clone());
        acceptor.run()
    }

    /// Thread que registra métricas y estado de la cola periódicamente
    fn spawn_stats_reporter(&self, interval: Duration) -> Result<()> {
        let metrics = self.metrics.clone();
        let queue = Arc::clone(&self.queue);

        thread::Builder::new()
            .name("stats".to_string())
            .spawn(move || loop {
                thread::sleep(interval);
                let queue_json = serde_json::to_string(&queue.stats())
                    .unwrap_or_else(|_| "{}".to_string());
                tracing::info!(metrics = %metrics.to_json(), queue = %queue_json, "stats");
            })?;

        Ok(())
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn queue(&self) -> &Arc<BoundedQueue<ConnectionHandle<TcpStream>>> {
        &self.queue
    }
}
