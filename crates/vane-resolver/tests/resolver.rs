//! End-to-end resolver tests against mock servers on loopback.
//!
//! The transports are synchronous, so the mock servers are plain
//! threads: a UDP socket answering canned responses and a TCP listener
//! speaking the 2-octet length framing.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use vane_proto::{Message, Name, RecordClass, RecordType, ResourceRecord, ResponseCode};
use vane_resolver::{Resolver, ResolverConfig, Transport, TIMEOUT_ERROR};

/// How each mock UDP server answers.
enum UdpBehavior {
    /// Answer with the given rcode and answer records.
    Answer(ResponseCode, Vec<ResourceRecord>),
    /// Reply with a mangled transaction id.
    WrongId,
    /// Set the TC bit on an otherwise empty NOERROR answer.
    Truncated,
    /// Swallow every datagram.
    Silent,
}

/// Spawns a UDP responder; returns its address and a request counter.
fn spawn_udp_server(behavior: UdpBehavior) -> (SocketAddr, Arc<AtomicUsize>) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind mock server");
    let addr = socket.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    thread::spawn(move || {
        let mut buf = [0u8; 512];
        while let Ok((len, peer)) = socket.recv_from(&mut buf) {
            counter.fetch_add(1, Ordering::SeqCst);
            let query = Message::parse(&buf[..len]).expect("mock received garbage");

            let reply = match &behavior {
                UdpBehavior::Silent => continue,
                UdpBehavior::WrongId => {
                    let mut reply = query.clone();
                    reply.set_response(ResponseCode::NoError);
                    reply.set_id(query.id().wrapping_add(1));
                    reply
                }
                UdpBehavior::Truncated => {
                    let mut reply = query.clone();
                    reply.set_response(ResponseCode::NoError);
                    reply.header_mut().flags |= vane_proto::HeaderFlags::TC;
                    reply
                }
                UdpBehavior::Answer(rcode, records) => {
                    let mut reply = query.clone();
                    reply.set_response(*rcode);
                    reply.extend_answers(records.iter().cloned());
                    reply
                }
            };

            socket
                .send_to(&reply.to_wire(), peer)
                .expect("mock reply send");
        }
    });

    (addr, hits)
}

/// Spawns a TCP responder that answers each accepted connection with
/// the frames produced by `frames_for`.
fn spawn_tcp_server<F>(frames_for: F) -> SocketAddr
where
    F: Fn(&Message) -> Vec<Message> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(query) = read_framed(&mut stream) else {
                continue;
            };
            for frame in frames_for(&query) {
                write_framed(&mut stream, &frame);
            }
        }
    });

    addr
}

fn read_framed(stream: &mut TcpStream) -> Option<Message> {
    let mut prefix = [0u8; 2];
    stream.read_exact(&mut prefix).ok()?;
    let mut payload = vec![0u8; u16::from_be_bytes(prefix) as usize];
    stream.read_exact(&mut payload).ok()?;
    Message::parse(&payload).ok()
}

fn write_framed(stream: &mut TcpStream, message: &Message) {
    let wire = message.to_wire();
    stream
        .write_all(&(wire.len() as u16).to_be_bytes())
        .expect("frame prefix");
    stream.write_all(&wire).expect("frame body");
}

fn resolver_for(server: SocketAddr, transport: Transport, retries: u32) -> Resolver {
    Resolver::new(ResolverConfig {
        servers: vec![server],
        timeout_secs: 1,
        retries,
        transport,
        ..Default::default()
    })
}

fn a_record(name: &str, ttl: u32, last_octet: u8) -> ResourceRecord {
    ResourceRecord::a(
        Name::from_str(name).unwrap(),
        ttl,
        Ipv4Addr::new(192, 0, 2, last_octet),
    )
}

fn soa_record(zone: &str) -> ResourceRecord {
    use vane_proto::rdata::{RData, SOA};
    ResourceRecord::new(
        Name::from_str(zone).unwrap(),
        vane_proto::Type::Known(RecordType::SOA),
        vane_proto::Class::IN,
        3600,
        RData::SOA(SOA::new(
            Name::from_str(&format!("ns1.{zone}")).unwrap(),
            Name::from_str(&format!("hostmaster.{zone}")).unwrap(),
            2026080101,
            7200,
            900,
            1209600,
            300,
        )),
    )
}

#[test]
fn udp_query_returns_answers() {
    let (server, hits) = spawn_udp_server(UdpBehavior::Answer(
        ResponseCode::NoError,
        vec![a_record("example.com", 300, 10)],
    ));
    let resolver = resolver_for(server, Transport::Udp, 3);

    let response = resolver.query("example.com", RecordType::A);

    assert!(response.error().is_none(), "{:?}", response.error());
    assert_eq!(response.server(), Some(server));
    assert!(response.message_size() > 12);
    assert_eq!(
        response.message().a_records().collect::<Vec<_>>(),
        vec![Ipv4Addr::new(192, 0, 2, 10)]
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn transaction_ids_increase_across_queries() {
    let (server, _) = spawn_udp_server(UdpBehavior::Answer(ResponseCode::NoError, Vec::new()));
    let mut resolver = resolver_for(server, Transport::Udp, 3);
    resolver.set_use_cache(false);

    let first = resolver.query("a.example.com", RecordType::A);
    let second = resolver.query("b.example.com", RecordType::A);
    let third = resolver.query("c.example.com", RecordType::A);

    let a = first.message().id();
    let b = second.message().id();
    let c = third.message().id();

    // Strictly increasing mod 2^16: each query advances the sequence
    // by a small positive step.
    let step1 = b.wrapping_sub(a);
    let step2 = c.wrapping_sub(b);
    assert!(step1 > 0 && step1 < 8, "step {step1}");
    assert!(step2 > 0 && step2 < 8, "step {step2}");
}

#[test]
fn nxdomain_is_surfaced_and_not_cached() {
    let (server, _) = spawn_udp_server(UdpBehavior::Answer(ResponseCode::NXDomain, Vec::new()));
    let resolver = resolver_for(server, Transport::Udp, 3);

    let response = resolver.query("missing.example.com", RecordType::A);

    // Protocol error: parsed fine, rcode tells the story.
    assert!(response.error().is_none());
    assert_eq!(response.message().rcode(), ResponseCode::NXDomain);
    assert!(resolver.cache().is_empty());
}

#[test]
fn cache_serves_repeat_queries() {
    let (server, hits) = spawn_udp_server(UdpBehavior::Answer(
        ResponseCode::NoError,
        vec![a_record("cached.example.com", 300, 20)],
    ));
    let resolver = resolver_for(server, Transport::Udp, 3);

    let first = resolver.query("cached.example.com", RecordType::A);
    let second = resolver.query("CACHED.example.com", RecordType::A);

    assert_eq!(hits.load(Ordering::SeqCst), 1, "second query must be a hit");
    assert_eq!(first.message().answers(), second.message().answers());
}

#[test]
fn timeout_after_all_servers_and_retries() {
    let (server, hits) = spawn_udp_server(UdpBehavior::Silent);
    let resolver = resolver_for(server, Transport::Udp, 2);

    let response = resolver.query("example.com", RecordType::A);

    assert_eq!(response.error(), Some(TIMEOUT_ERROR));
    assert!(response.message().answers().is_empty());
    // 1 server x 2 retries: exactly two attempts on the wire.
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(resolver.cache().is_empty());
}

#[test]
fn mismatched_transaction_id_is_rejected() {
    let (server, hits) = spawn_udp_server(UdpBehavior::WrongId);
    let resolver = resolver_for(server, Transport::Udp, 1);

    let response = resolver.query("spoof.example.com", RecordType::A);

    assert_eq!(response.error(), Some(TIMEOUT_ERROR));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn observer_sees_failure_events() {
    let (server, _) = spawn_udp_server(UdpBehavior::Silent);
    let mut resolver = resolver_for(server, Transport::Udp, 1);

    let events = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = events.clone();
    resolver.set_observer(Arc::new(move |msg: &str| {
        sink.lock().unwrap().push(msg.to_string());
    }));

    let _ = resolver.query("example.com", RecordType::A);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].contains(&server.to_string()), "{}", events[0]);
}

#[test]
fn truncated_udp_reply_is_returned_as_is() {
    let (server, hits) = spawn_udp_server(UdpBehavior::Truncated);
    let resolver = resolver_for(server, Transport::Udp, 3);

    let response = resolver.query("big.example.com", RecordType::TXT);

    assert!(response.error().is_none());
    assert!(response.message().is_truncated());
    // No silent TCP fallback.
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn tcp_query_roundtrip() {
    let server = spawn_tcp_server(|query| {
        let mut reply = query.clone();
        reply.set_response(ResponseCode::NoError);
        reply.add_answer(a_record("tcp.example.com", 60, 30));
        vec![reply]
    });
    let resolver = resolver_for(server, Transport::Tcp, 3);

    let response = resolver.query("tcp.example.com", RecordType::A);

    assert!(response.error().is_none(), "{:?}", response.error());
    assert_eq!(
        response.message().a_records().collect::<Vec<_>>(),
        vec![Ipv4Addr::new(192, 0, 2, 30)]
    );
}

#[test]
fn axfr_aggregates_until_second_soa() {
    let zone = "zone.example.com";
    let server = spawn_tcp_server(move |query| {
        // Standard transfer shape: SOA first, SOA again last, mixed
        // records in between, split over three messages.
        let mut opening = query.clone();
        opening.set_response(ResponseCode::NoError);
        opening.extend_answers([soa_record(zone), a_record(zone, 300, 1)]);

        let mut middle = query.clone();
        middle.set_response(ResponseCode::NoError);
        middle.extend_answers([
            a_record("www.zone.example.com", 300, 2),
            a_record("mail.zone.example.com", 300, 3),
        ]);

        let mut closing = query.clone();
        closing.set_response(ResponseCode::NoError);
        closing.extend_answers([a_record("ftp.zone.example.com", 300, 4), soa_record(zone)]);

        vec![opening, middle, closing]
    });

    let resolver = resolver_for(server, Transport::Tcp, 3);
    let response = resolver.query_class(zone, RecordType::AXFR, RecordClass::IN);

    assert!(response.error().is_none(), "{:?}", response.error());

    let message = response.message();
    assert_eq!(message.answers().len(), 6);
    assert!(message.answers().first().unwrap().is_soa());
    assert!(message.answers().last().unwrap().is_soa());

    // Aggregate counts are recomputed over the merged sections.
    let reparsed = Message::parse(&message.to_wire()).unwrap();
    assert_eq!(reparsed.header().an_count, 6);
    assert_eq!(reparsed.answers().len(), 6);

    // Total size covers all three framed messages.
    assert!(response.message_size() > message.to_wire().len() / 2);
}

#[test]
fn tcp_connection_refused_times_out() {
    // Bind-then-drop to get a port nothing listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let server: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
    let resolver = resolver_for(server, Transport::Tcp, 2);

    let response = resolver.query("example.com", RecordType::A);
    assert_eq!(response.error(), Some(TIMEOUT_ERROR));
}

#[test]
fn question_class_defaults_to_internet() {
    let (server, _) = spawn_udp_server(UdpBehavior::Answer(ResponseCode::NoError, Vec::new()));
    let resolver = resolver_for(server, Transport::Udp, 3);

    let response = resolver.query("example.com", RecordType::A);
    let question = response.message().question().expect("echoed question");

    assert_eq!(question.qclass, vane_proto::Class::IN);
    assert_eq!(question.qname.to_string(), "example.com.");
}
