#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use artemis::constants::Degree;
use artemis::ephemeris::{Body, EclipseKind, Ephemeris, Horizon, SearchWindow};
use artemis::event::Event;
use artemis::observers::Observer;
use artemis::protocol::ConnectionLimits;
use artemis::server::Server;
use artemis::{ArtemisError, QueryResolver};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Ephemeris whose events sit on fixed grids anchored at [`GridEphemeris::epoch`]:
/// rises every day at 06:00 and sets at 18:00 (UTC of the epoch's clock), lunar eclipses
/// every `eclipse_period`, cycling through the three kinds, and a phase growing linearly
/// over a 29.5-day month.
pub struct GridEphemeris {
    pub epoch: DateTime<Utc>,
    pub eclipse_period: TimeDelta,
}

impl Default for GridEphemeris {
    fn default() -> Self {
        GridEphemeris {
            epoch: DateTime::from_timestamp(0, 0).unwrap(),
            eclipse_period: TimeDelta::days(173),
        }
    }
}

impl GridEphemeris {
    /// Grid points `epoch + offset + k * period` inside `window`.
    fn grid(&self, window: &SearchWindow, offset: TimeDelta, period: TimeDelta) -> Vec<(i64, DateTime<Utc>)> {
        let period_s = period.num_seconds();
        let first = (window.start - self.epoch - offset).num_seconds().div_euclid(period_s);
        (first..)
            .map(|k| (k, self.epoch + offset + TimeDelta::seconds(k * period_s)))
            .skip_while(|(_, t)| !window.contains(t))
            .take_while(|(_, t)| window.contains(t))
            .collect()
    }
}

impl Ephemeris for GridEphemeris {
    fn risings_and_settings(
        &self,
        _body: Body,
        _site: &Observer,
        window: &SearchWindow,
    ) -> Result<Vec<Event<Horizon>>, ArtemisError> {
        let mut events: Vec<Event<Horizon>> = self
            .grid(window, TimeDelta::hours(6), TimeDelta::days(1))
            .into_iter()
            .map(|(_, t)| Event::new(t, Horizon::Rise))
            .chain(
                self.grid(window, TimeDelta::hours(18), TimeDelta::days(1))
                    .into_iter()
                    .map(|(_, t)| Event::new(t, Horizon::Set)),
            )
            .collect();
        events.sort_by_key(|event| event.instant);
        Ok(events)
    }

    fn moon_phase(&self, instant: DateTime<Utc>) -> Result<Degree, ArtemisError> {
        let month = 29.5 * 86_400.0;
        let elapsed = (instant - self.epoch).num_milliseconds() as f64 / 1000.0;
        Ok((elapsed / month * 360.0).rem_euclid(360.0))
    }

    fn lunar_eclipses(
        &self,
        window: &SearchWindow,
    ) -> Result<Vec<Event<EclipseKind>>, ArtemisError> {
        let kinds = [EclipseKind::Penumbral, EclipseKind::Partial, EclipseKind::Total];
        Ok(self
            .grid(window, TimeDelta::zero(), self.eclipse_period)
            .into_iter()
            .map(|(k, t)| Event::new(t, kinds[k.rem_euclid(3) as usize]))
            .collect())
    }
}

/// Ephemeris that never finds anything.
pub struct EmptyEphemeris;

impl Ephemeris for EmptyEphemeris {
    fn risings_and_settings(
        &self,
        _body: Body,
        _site: &Observer,
        _window: &SearchWindow,
    ) -> Result<Vec<Event<Horizon>>, ArtemisError> {
        Ok(Vec::new())
    }

    fn moon_phase(&self, _instant: DateTime<Utc>) -> Result<Degree, ArtemisError> {
        Ok(0.0)
    }

    fn lunar_eclipses(
        &self,
        _window: &SearchWindow,
    ) -> Result<Vec<Event<EclipseKind>>, ArtemisError> {
        Ok(Vec::new())
    }
}

pub fn resolver<E: Ephemeris>(ephemeris: E) -> Arc<QueryResolver<E>> {
    Arc::new(QueryResolver::new(Arc::new(ephemeris), Observer::san_francisco()))
}

/// A server on an ephemeral loopback port, stopped when the handle is dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), ArtemisError>>,
}

impl TestServer {
    pub async fn start<E: Ephemeris + 'static>(ephemeris: E) -> TestServer {
        Self::start_with_limits(ephemeris, ConnectionLimits::default()).await
    }

    pub async fn start_with_limits<E: Ephemeris + 'static>(
        ephemeris: E,
        limits: ConnectionLimits,
    ) -> TestServer {
        let server = Server::bind("127.0.0.1:0", resolver(ephemeris), limits)
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(server.run_until(async {
            let _ = stopped.await;
        }));
        TestServer {
            addr,
            stop: Some(stop),
            task,
        }
    }

    /// Stop accepting and wait for the accept loop to finish.
    pub async fn shutdown(mut self) -> Result<(), ArtemisError> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        (&mut self.task).await.unwrap()
    }

    /// Send raw bytes, half-close, and read the whole reply.
    pub async fn request(&self, payload: &[u8]) -> String {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(payload).await.unwrap();
        stream.shutdown().await.unwrap();

        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();
        reply
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
