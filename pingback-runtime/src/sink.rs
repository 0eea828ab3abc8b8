use crossbeam::crossbeam_channel::{Receiver, Sender};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write frame: {0}")]
    Io(#[from] io::Error),
    #[error("frame receiver has been dropped")]
    Disconnected,
    #[error("sink lock poisoned by a panicking writer")]
    Poisoned,
    #[error("failed to transmit frame: {0}")]
    Transmit(String),
}

/// Destination for complete, ready to transmit Ethernet frames.
///
/// `transmit` is called synchronously from inside frame handling, once per outbound frame.
/// Implementations that share an underlying handle must serialize access themselves.
pub trait FrameSink {
    fn transmit(&self, frame: &[u8]) -> Result<(), SinkError>;
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn transmit(&self, frame: &[u8]) -> Result<(), SinkError> {
        (**self).transmit(frame)
    }
}

/// Sends a copy of every frame into a crossbeam channel.
#[derive(Clone)]
pub struct ChannelSink {
    frames: Sender<Vec<u8>>,
}

impl ChannelSink {
    pub fn new(frames: Sender<Vec<u8>>) -> Self {
        ChannelSink { frames }
    }

    /// Creates a sink on a fresh unbounded channel, returning the receiving half alongside it.
    pub fn unbounded() -> (Self, Receiver<Vec<u8>>) {
        let (s, r) = crossbeam::crossbeam_channel::unbounded();
        (ChannelSink::new(s), r)
    }
}

impl FrameSink for ChannelSink {
    fn transmit(&self, frame: &[u8]) -> Result<(), SinkError> {
        self.frames
            .send(frame.to_vec())
            .map_err(|_| SinkError::Disconnected)
    }
}
