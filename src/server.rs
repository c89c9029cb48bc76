//! # TCP listener
//!
//! Accepts connections and hands each one to its own task running
//! [`handle_connection`]. Tasks share nothing but the read-only [`QueryResolver`]; a
//! failure on one connection is logged and never reaches the accept loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::artemis_errors::ArtemisError;
use crate::ephemeris::Ephemeris;
use crate::protocol::{handle_connection, ConnectionLimits};
use crate::query::QueryResolver;

pub struct Server<E> {
    listener: TcpListener,
    resolver: Arc<QueryResolver<E>>,
    limits: ConnectionLimits,
}

impl<E: Ephemeris + 'static> Server<E> {
    /// Bind the listening socket.
    ///
    /// Arguments
    /// -----------------
    /// * `addr`: `host:port` to listen on; port 0 picks a free port.
    /// * `resolver`: shared by every connection.
    /// * `limits`: applied to each connection.
    ///
    /// Return
    /// ----------
    /// * The bound server, or [`ArtemisError::Bind`].
    pub async fn bind(
        addr: &str,
        resolver: Arc<QueryResolver<E>>,
        limits: ConnectionLimits,
    ) -> Result<Self, ArtemisError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ArtemisError::Bind(addr.to_string(), err))?;
        Ok(Server {
            listener,
            resolver,
            limits,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ArtemisError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    pub async fn run(self) -> Result<(), ArtemisError> {
        self.run_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` completes. Connections already accepted keep
    /// running to completion on their own tasks.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<(), ArtemisError> {
        info!(addr = %self.local_addr()?, "listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutting down listener");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let span = info_span!("connection", %peer);
                        tokio::spawn(
                            serve_connection(stream, Arc::clone(&self.resolver), self.limits)
                                .instrument(span),
                        );
                    }
                    Err(err) => warn!(error = %err, "failed to accept connection"),
                },
            }
        }
    }
}

async fn serve_connection<E: Ephemeris + 'static>(
    stream: TcpStream,
    resolver: Arc<QueryResolver<E>>,
    limits: ConnectionLimits,
) {
    match handle_connection(stream, resolver, limits).await {
        Ok(Some(_)) => {}
        Ok(None) => debug!("connection closed without a request"),
        Err(err) => warn!(error = %err, "connection abandoned"),
    }
}
