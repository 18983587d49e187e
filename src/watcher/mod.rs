use std::{io, os::fd::RawFd};

use mio::{unix::SourceFd, Interest, Registry, Token};

/// Registers a sensor's event stream for read-readiness with the
/// [Dispatcher](crate::sensor::dispatcher::Dispatcher) that created it.
#[derive(Debug)]
pub struct Watcher {
    registry: Registry,
    token: Token,
}

impl Watcher {
    pub fn new(registry: Registry, token: Token) -> Self {
        Self { registry, token }
    }

    /// Token identifying readiness events for this watcher
    pub fn token(&self) -> Token {
        self.token
    }

    /// Watch the given file descriptor for readability
    pub fn watch(&self, fd: RawFd) -> io::Result<()> {
        log::trace!("Watching fd {fd} with token {:?}", self.token);
        self.registry
            .register(&mut SourceFd(&fd), self.token, Interest::READABLE)
    }

    /// Stop watching the given file descriptor
    pub fn unwatch(&self, fd: RawFd) -> io::Result<()> {
        log::trace!("Unwatching fd {fd} with token {:?}", self.token);
        self.registry.deregister(&mut SourceFd(&fd))
    }
}
