//! Single consumer of the result channel.

use std::future::Future;

use tokio::sync::mpsc;

use filesift_core::WalkWarning;

/// Message from a walk unit to the aggregator.
#[derive(Debug)]
pub(crate) enum Discovery {
    /// A file that passed the include predicate.
    File(String),
    /// A directory that could not be listed.
    Failed(WalkWarning),
}

#[derive(Debug, Default)]
pub(crate) struct Collected {
    pub files: Vec<String>,
    pub warnings: Vec<WalkWarning>,
}

/// Drains discoveries into the final collection.
pub(crate) struct Aggregator {
    rx: mpsc::Receiver<Discovery>,
    collected: Collected,
}

impl Aggregator {
    pub fn new(rx: mpsc::Receiver<Discovery>) -> Self {
        Self {
            rx,
            collected: Collected::default(),
        }
    }

    /// Read until `done` resolves, then sweep whatever is still buffered.
    ///
    /// `done` resolving says nothing about the channel: the last unit may
    /// have written its final path after this loop last looked, so the
    /// non-blocking sweep is what guarantees nothing is left behind.
    pub async fn collect(mut self, done: impl Future<Output = ()>) -> Collected {
        tokio::pin!(done);
        loop {
            tokio::select! {
                biased;
                message = self.rx.recv() => match message {
                    Some(message) => self.accept(message),
                    None => break,
                },
                () = &mut done => break,
            }
        }
        while let Ok(message) = self.rx.try_recv() {
            self.accept(message);
        }
        self.collected
    }

    fn accept(&mut self, message: Discovery) {
        match message {
            Discovery::File(path) => self.collected.files.push(path),
            Discovery::Failed(warning) => self.collected.warnings.push(warning),
        }
    }
}
