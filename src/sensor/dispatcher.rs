use std::{io, sync::Arc, time::Duration};

use mio::{Events, Poll, Token, Waker};

use crate::{sensor::ThreeAxisSensor, watcher::Watcher};

/// Token reserved for waking up the dispatcher from another thread
const WAKE_TOKEN: Token = Token(usize::MAX);

/// Single-threaded readiness loop that routes readable event streams to the
/// sensor owning them.
pub struct Dispatcher {
    poll: Poll,
    events: Events,
    waker: Arc<Waker>,
    next_token: usize,
    sensors: Vec<ThreeAxisSensor>,
}

impl Dispatcher {
    pub fn new() -> io::Result<Self> {
        let poll = Poll::new()?;
        let waker = Arc::new(Waker::new(poll.registry(), WAKE_TOKEN)?);
        Ok(Self {
            poll,
            events: Events::with_capacity(64),
            waker,
            next_token: 0,
            sensors: Vec::new(),
        })
    }

    /// Create a [Watcher] with a unique token for a new sensor
    pub fn watcher(&mut self) -> io::Result<Watcher> {
        let registry = self.poll.registry().try_clone()?;
        let token = Token(self.next_token);
        self.next_token += 1;
        Ok(Watcher::new(registry, token))
    }

    /// Returns a waker that stops [Dispatcher::run] when woken
    pub fn waker(&self) -> Arc<Waker> {
        self.waker.clone()
    }

    /// Take ownership of the given sensor so its readiness events get dispatched
    pub fn add(&mut self, sensor: ThreeAxisSensor) {
        self.sensors.push(sensor);
    }

    pub fn sensors(&self) -> &[ThreeAxisSensor] {
        &self.sensors
    }

    pub fn sensors_mut(&mut self) -> &mut [ThreeAxisSensor] {
        &mut self.sensors
    }

    /// Wait for readiness events once and invoke the read callback of every
    /// sensor that has data. Returns false if the dispatcher was woken up to stop.
    pub fn dispatch(&mut self, timeout: Option<Duration>) -> io::Result<bool> {
        if let Err(e) = self.poll.poll(&mut self.events, timeout) {
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(true);
            }
            return Err(e);
        }

        for event in self.events.iter() {
            let token = event.token();
            if token == WAKE_TOKEN {
                log::debug!("Dispatcher woken up to stop");
                return Ok(false);
            }
            let Some(sensor) = self.sensors.iter_mut().find(|s| s.token() == token) else {
                log::trace!("No sensor registered for token {token:?}");
                continue;
            };
            sensor.on_readable();
        }

        Ok(true)
    }

    /// Dispatch readiness events until woken up through [Dispatcher::waker]
    pub fn run(&mut self) -> io::Result<()> {
        log::debug!("Dispatching events for {} sensor(s)", self.sensors.len());
        while self.dispatch(None)? {}
        Ok(())
    }
}
