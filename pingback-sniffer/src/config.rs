use clap::{App, Arg, ArgGroup, ArgMatches, Error, ErrorKind};
use pingback_packets::MacAddr;
use pingback_runtime::{Identity, LogFormat};
use std::ffi::OsString;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;

/// Where frames are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    Device(String),
}

/// Where replies go once `--respond` is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyTarget {
    Savefile(PathBuf),
    Device(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: Input,
    pub identity: Identity,
    /// Savefile named by `-o`. It is created even when monitoring, and then holds no frames.
    pub output: Option<PathBuf>,
    /// `None` when replies are computed and logged but never emitted.
    pub replies: Option<ReplyTarget>,
    pub format: LogFormat,
}

fn mac_or_ipv4(value: String) -> Result<(), String> {
    if MacAddr::from_str(&value).is_ok() || Ipv4Addr::from_str(&value).is_ok() {
        Ok(())
    } else {
        Err(format!(
            "{} is neither a MAC address nor an IPv4 address",
            value
        ))
    }
}

fn app() -> App<'static, 'static> {
    App::new("pingback")
        .version("0.1.0")
        .about("Logs Ethernet, ARP and IPv4 traffic and answers ARP and ping requests for one address")
        .arg(
            Arg::with_name("device")
                .short("d")
                .long("device")
                .value_name("DEVICE")
                .takes_value(true)
                .help("Capture on a live device; replies are injected here unless -o is given"),
        )
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("INPUT_FILE")
                .takes_value(true)
                .help("Read frames from a capture file; takes precedence over -d"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("OUTPUT_FILE")
                .takes_value(true)
                .help("Write replies to a capture file instead of injecting them; created even when not responding"),
        )
        .arg(
            Arg::with_name("respond")
                .long("respond")
                .value_names(&["MAC", "IP"])
                .number_of_values(2)
                .validator(mac_or_ipv4)
                .help("Answer ARP and echo requests addressed to this MAC and IPv4 address"),
        )
        .arg(
            Arg::with_name("csv")
                .long("csv")
                .help("Log events as CSV records"),
        )
        .group(
            ArgGroup::with_name("source")
                .args(&["device", "input"])
                .multiple(true)
                .required(true),
        )
}

fn invalid_value(description: String) -> Error {
    Error::with_description(&description, ErrorKind::InvalidValue)
}

impl Config {
    /// Parses a full command line, program name first.
    pub fn from_args<I, T>(args: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(args)?;
        Config::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Config, Error> {
        let input = match (matches.value_of_os("input"), matches.value_of("device")) {
            (Some(path), _) => Input::File(PathBuf::from(path)),
            (None, Some(device)) => Input::Device(device.to_string()),
            (None, None) => {
                return Err(Error::with_description(
                    "one of --input or --device is required",
                    ErrorKind::MissingRequiredArgument,
                ))
            }
        };

        let (identity, replies) = match matches.values_of("respond") {
            Some(values) => {
                let values: Vec<&str> = values.collect();
                let (mac, ip) = match values.as_slice() {
                    [mac, ip] => (*mac, *ip),
                    _ => return Err(invalid_value("--respond takes a MAC and an IPv4 address".to_string())),
                };
                let mac = MacAddr::from_str(mac)
                    .map_err(|err| invalid_value(format!("invalid MAC address {}: {}", mac, err)))?;
                let ip = Ipv4Addr::from_str(ip)
                    .map_err(|err| invalid_value(format!("invalid IPv4 address {}: {}", ip, err)))?;

                let replies = match (matches.value_of_os("output"), matches.value_of("device")) {
                    (Some(path), _) => Some(ReplyTarget::Savefile(PathBuf::from(path))),
                    (None, Some(device)) => Some(ReplyTarget::Device(device.to_string())),
                    (None, None) => None,
                };
                (Identity::new(mac, ip), replies)
            }
            None => (Identity::default(), None),
        };

        let output = matches.value_of_os("output").map(PathBuf::from);

        let format = if matches.is_present("csv") {
            LogFormat::Csv
        } else {
            LogFormat::Human
        };

        Ok(Config {
            input,
            identity,
            output,
            replies,
            format,
        })
    }
}
