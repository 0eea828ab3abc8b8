use crate::event::{Event, EventLog};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

/// Record layout used by `Log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Aligned, bracketed lines meant for a terminal.
    Human,
    /// One `;` separated record per event, meant for other programs.
    Csv,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Human
    }
}

impl LogFormat {
    /// Renders one event as a newline terminated record.
    pub fn render(self, event: &Event) -> String {
        match (self, *event) {
            (LogFormat::Human, Event::EthernetFrame { src, dst }) => {
                format!("\n[ETHERNET] frame  {} -> {}\n", src, dst)
            }
            (LogFormat::Csv, Event::EthernetFrame { src, dst }) => {
                format!("ETHERNET;{};{}\n", src, dst)
            }
            (LogFormat::Human, Event::Ipv4Packet { src, dst }) => {
                format!("[IPv4    ] packet {} -> {}\n", src, dst)
            }
            (LogFormat::Csv, Event::Ipv4Packet { src, dst }) => format!("IPv4;{};{}\n", src, dst),
            (
                LogFormat::Human,
                Event::ArpRequest {
                    sender_mac,
                    sender_ip,
                    target_ip,
                    ..
                },
            ) => format!(
                "[ARP     ] request: who has {} tell {} ({})\n",
                target_ip, sender_ip, sender_mac
            ),
            (
                LogFormat::Csv,
                Event::ArpRequest {
                    sender_mac,
                    sender_ip,
                    target_ip,
                    ..
                },
            ) => format!("ARP;request;{};{};{}\n", target_ip, sender_ip, sender_mac),
            (
                LogFormat::Human,
                Event::ArpReply {
                    sender_mac,
                    sender_ip,
                    ..
                },
            ) => format!("[ARP     ] reply: {} is at {}\n", sender_ip, sender_mac),
            (
                LogFormat::Csv,
                Event::ArpReply {
                    sender_mac,
                    sender_ip,
                    ..
                },
            ) => format!("ARP;reply;{};{}\n", sender_ip, sender_mac),
            (LogFormat::Human, Event::IcmpPing) => "[ICMP    ] PING\n".to_string(),
            (LogFormat::Csv, Event::IcmpPing) => "ICMP;PING\n".to_string(),
            (LogFormat::Human, Event::IcmpPong) => "[ICMP    ] PONG\n".to_string(),
            (LogFormat::Csv, Event::IcmpPong) => "ICMP;PONG\n".to_string(),
        }
    }
}

/// Event log that renders every event in the chosen `LogFormat` to a writer.
///
/// Each record is written whole and flushed before `log` returns, so a live capture shows events
/// as they happen. Writes are serialized through a mutex. A failing writer is reported once per
/// event through `tracing` and never interrupts packet processing.
pub struct Log<W: Write> {
    format: LogFormat,
    log_writer: Mutex<BufWriter<W>>,
}

impl<W: Write> Log<W> {
    pub fn new(writer: W, format: LogFormat) -> Log<W> {
        Log {
            format,
            log_writer: Mutex::new(BufWriter::new(writer)),
        }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn flush(&self) -> io::Result<()> {
        match self.log_writer.lock() {
            Ok(mut writer) => writer.flush(),
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "log writer poisoned")),
        }
    }
}

impl Log<File> {
    /// Creates (or truncates) the file at `path` and logs into it.
    pub fn create<P: AsRef<Path>>(path: P, format: LogFormat) -> io::Result<Log<File>> {
        Ok(Log::new(File::create(path)?, format))
    }
}

impl Log<io::Stdout> {
    pub fn stdout(format: LogFormat) -> Log<io::Stdout> {
        Log::new(io::stdout(), format)
    }
}

impl<W: Write> EventLog for Log<W> {
    fn log(&self, event: &Event) {
        let record = self.format.render(event);
        let result = match self.log_writer.lock() {
            Ok(mut writer) => writer
                .write_all(record.as_bytes())
                .and_then(|_| writer.flush()),
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "log writer poisoned")),
        };
        if let Err(err) = result {
            warn!(%err, "failed to write event log record");
        }
    }
}

/// "It is critical to call flush before BufWriter<W> is dropped.
/// Though dropping will attempt to flush the the contents of the buffer, any errors that happen in
/// the process of dropping will be ignored. Calling flush ensures that the buffer is empty and thus
/// dropping will not even attempt file operations."
/// https://doc.rust-lang.org/std/io/struct.BufWriter.html
impl<W: Write> Drop for Log<W> {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            warn!(%err, "failed to flush event log");
        }
    }
}
