use pingback_packets::{
    ArpOp, ArpPacket, EthernetFrame, IcmpPacket, Ipv4Packet, MacAddr, ARP_ETHER_TYPE,
    ICMP_ECHO_REPLY, IPV4_ETHER_TYPE,
};
use pingback_pcap::{PcapDumpSink, PcapInjectSink, PcapSource};
use pingback_runtime::utils::test::packet_generators::{
    arp_request_frame, echo_request_frame, random_payload,
};
use pingback_runtime::{FrameSink, Identity, Stack};
use rand::{self, Rng};
use std::net::Ipv4Addr;
use std::path::Path;

const OWN_MAC: MacAddr = MacAddr {
    bytes: [0xe0, 0xcb, 0xbc, 0x23, 0x5e, 0xad],
};
const OWN_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 128, 1);
const PEER_MAC: MacAddr = MacAddr {
    bytes: [0x00, 0x24, 0x9b, 0x21, 0x88, 0x10],
};
const PEER_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 128, 8);

fn write_savefile(path: &Path, frames: &[Vec<u8>]) {
    let sink = PcapDumpSink::create(path).unwrap();
    for frame in frames {
        sink.transmit(frame).unwrap();
    }
}

fn read_savefile(path: &Path) -> Vec<Vec<u8>> {
    PcapSource::open_file(path)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn savefile_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.pcap");

    let mut rng = rand::thread_rng();
    let frames: Vec<Vec<u8>> = (0..20)
        .map(|_| random_payload(rng.gen_range(14, 1514)))
        .collect();
    write_savefile(&path, &frames);

    assert_eq!(read_savefile(&path), frames);
}

#[test]
fn empty_savefile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.pcap");
    write_savefile(&path, &[]);

    let mut source = PcapSource::open_file(&path).unwrap();
    assert_eq!(source.next_frame().unwrap(), None);
}

#[test]
fn replay_answers_requests_into_savefile() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pcap");
    let output = dir.path().join("output.pcap");

    let data = (16u8..72).collect::<Vec<u8>>();
    write_savefile(
        &input,
        &[
            arp_request_frame(PEER_MAC, PEER_IP, OWN_IP),
            echo_request_frame(PEER_MAC, OWN_MAC, PEER_IP, OWN_IP, 0x083c, 24, &data).unwrap(),
            // neither of these is for us
            arp_request_frame(PEER_MAC, PEER_IP, Ipv4Addr::new(192, 168, 128, 2)),
            echo_request_frame(
                PEER_MAC,
                OWN_MAC,
                PEER_IP,
                Ipv4Addr::new(8, 8, 8, 8),
                0x083c,
                25,
                &data,
            )
            .unwrap(),
        ],
    );

    {
        let stack = Stack::builder()
            .identity(Identity::new(OWN_MAC, OWN_IP))
            .sink(Box::new(PcapDumpSink::create(&output).unwrap()))
            .build();
        let mut source = PcapSource::open_file(&input).unwrap();
        let mut count = 0;
        while let Some(frame) = source.next_frame().unwrap() {
            stack.handle_frame(&frame).unwrap();
            count += 1;
        }
        assert_eq!(count, 4);
    }

    let replies = read_savefile(&output);
    assert_eq!(replies.len(), 2);

    let arp_frame = EthernetFrame::new_checked(&replies[0][..]).unwrap();
    assert_eq!(arp_frame.dest_mac(), PEER_MAC);
    assert_eq!(arp_frame.src_mac(), OWN_MAC);
    assert_eq!(arp_frame.ether_type(), ARP_ETHER_TYPE);
    let arp = ArpPacket::new_checked(arp_frame.payload()).unwrap();
    assert_eq!(arp.opcode(), ArpOp::Reply as u16);
    assert_eq!(arp.sender_ipv4_addr(), OWN_IP);
    assert_eq!(arp.target_ipv4_addr(), PEER_IP);

    let icmp_frame = EthernetFrame::new_checked(&replies[1][..]).unwrap();
    assert_eq!(icmp_frame.dest_mac(), PEER_MAC);
    assert_eq!(icmp_frame.ether_type(), IPV4_ETHER_TYPE);
    let packet = Ipv4Packet::new_checked(icmp_frame.payload()).unwrap();
    assert!(packet.verify_checksum());
    assert_eq!(packet.src_addr(), OWN_IP);
    assert_eq!(packet.dest_addr(), PEER_IP);
    let echo = IcmpPacket::new_checked(packet.payload().unwrap()).unwrap();
    assert_eq!(echo.msg_type(), ICMP_ECHO_REPLY);
    assert_eq!(echo.identifier(), 0x083c);
    assert_eq!(echo.sequence(), 24);
    assert_eq!(echo.data(), &data[..]);
    assert!(echo.verify_checksum());
}

// This test is marked as #[ignore] because injecting frames needs CAP_NET_RAW.
// To run this test on a Linux machine, run the test binary like so:
// > sudo target/<path to test executable> --ignored --test-threads=1
#[test]
#[ignore]
fn inject_on_loopback() {
    let sink = PcapInjectSink::open("lo").unwrap();
    let frame = arp_request_frame(PEER_MAC, PEER_IP, OWN_IP);
    sink.transmit(&frame).unwrap();
}
