mod arp;
pub use self::arp::*;

mod ethernet;
pub use self::ethernet::*;

mod icmp;
pub use self::icmp::*;

mod ipv4;
pub use self::ipv4::*;
