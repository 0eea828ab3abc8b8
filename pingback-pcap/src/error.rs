use pingback_runtime::SinkError;
use thiserror::Error;

/// Failure to open, read or write a capture.
#[derive(Debug, Error)]
pub enum Error {
    /// libpcap reported an error.
    #[error("pcap: {0}")]
    Pcap(#[from] pcap::Error),
    /// A writer panicked while holding the capture handle.
    #[error("capture handle lock poisoned")]
    Poisoned,
}

impl From<Error> for SinkError {
    fn from(err: Error) -> SinkError {
        match err {
            Error::Poisoned => SinkError::Poisoned,
            Error::Pcap(err) => SinkError::Transmit(err.to_string()),
        }
    }
}
