//! UDP and TCP exchanges with retry and failover.
//!
//! One query makes up to `retries` passes over the server list; every
//! (attempt, server) pair gets a fresh socket, a fresh transaction id
//! and the configured timeout. A per-server failure is logged, handed
//! to the verbose observer and skipped; only exhausting every pair
//! synthesizes the timeout response. Sockets never outlive their
//! attempt.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, UdpSocket};
use std::time::Instant;

use tracing::{debug, trace};

use vane_proto::{Message, RecordType, Type, MAX_UDP_MESSAGE_SIZE};

use crate::config::{ResolverConfig, Transport};
use crate::response::Response;
use crate::{IdSequence, ResolverError, Result, VerboseObserver};

/// Executes exchanges for one query.
pub(crate) struct Exchanger<'a> {
    pub config: &'a ResolverConfig,
    pub ids: &'a IdSequence,
    pub observer: Option<&'a VerboseObserver>,
}

impl<'a> Exchanger<'a> {
    /// Runs the retry/failover loop over the configured transport.
    ///
    /// Always returns a response; failure of every attempt against
    /// every server yields the synthesized timeout response.
    pub fn exchange(&self, request: &mut Message) -> Response {
        if self.config.servers.is_empty() {
            return Response::failed(None, "no name servers configured");
        }

        let started = Instant::now();
        for attempt in 0..self.config.effective_retries() {
            for &server in &self.config.servers {
                let outcome = match self.config.transport {
                    Transport::Udp => self.udp_exchange(server, request),
                    Transport::Tcp => self.tcp_exchange(server, request),
                };

                match outcome {
                    Ok(response) => {
                        trace!(
                            %server,
                            attempt,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            size = response.message_size(),
                            "exchange complete"
                        );
                        return response;
                    }
                    Err(err) => {
                        debug!(%server, attempt, error = %err, "server attempt failed");
                        self.emit(&format!("connection to {server} failed: {err}"));
                    }
                }
            }
        }

        Response::timed_out(self.config.servers.last().copied())
    }

    /// One UDP attempt: fresh socket, receive timeout, single
    /// 512-octet datagram (RFC 1035 §4.2.1, no EDNS negotiation).
    fn udp_exchange(&self, server: SocketAddr, request: &mut Message) -> Result<Response> {
        request.set_id(self.ids.next());
        let wire = request.to_wire();

        let socket = UdpSocket::bind(unspecified_local(server))?;
        socket.set_read_timeout(Some(self.config.timeout()))?;
        socket.send_to(&wire, server)?;

        let mut buf = [0u8; MAX_UDP_MESSAGE_SIZE];
        let (len, _) = socket.recv_from(&mut buf)?;

        let response = Response::from_wire(server, &buf[..len]);
        self.check_id(request, &response)?;
        Ok(response)
    }

    /// One TCP attempt: bounded connect, length-prefixed framing both
    /// ways. AXFR queries keep reading frames until the zone's second
    /// SOA closes the transfer.
    fn tcp_exchange(&self, server: SocketAddr, request: &mut Message) -> Result<Response> {
        request.set_id(self.ids.next());
        let wire = request.to_wire();

        let mut stream = TcpStream::connect_timeout(&server, self.config.timeout())?;
        stream.set_read_timeout(Some(self.config.timeout()))?;
        stream.set_write_timeout(Some(self.config.timeout()))?;

        write_frame(&mut stream, &wire)?;

        let frame = read_frame(&mut stream)?;
        let response = Response::from_wire(server, &frame);
        self.check_id(request, &response)?;

        if is_axfr(request) && response.is_ok() {
            return self.drain_axfr(server, &mut stream, response, frame.len());
        }

        Ok(response)
    }

    /// Accumulates the remaining AXFR frames into one response.
    ///
    /// A transfer is bracketed by the zone's SOA: it opens the first
    /// message's answers and shows up once more as the final record,
    /// so reading stops when two SOAs have been seen in the answer
    /// sections. Section counts on the aggregate are recomputed as
    /// records are appended.
    fn drain_axfr(
        &self,
        server: SocketAddr,
        stream: &mut TcpStream,
        first: Response,
        first_size: usize,
    ) -> Result<Response> {
        let mut aggregate = first.message().clone();
        let mut total_size = first_size;
        let mut soa_seen = count_soas(&aggregate);

        while soa_seen < 2 {
            let frame = read_frame(stream)?;
            total_size += frame.len();

            let chunk = match Message::parse(&frame) {
                Ok(chunk) => chunk,
                Err(err) => return Ok(Response::failed(Some(server), err.to_string())),
            };

            soa_seen += chunk
                .answers()
                .iter()
                .filter(|r| r.is_soa())
                .count();

            aggregate.extend_answers(chunk.answers().iter().cloned());
            aggregate.extend_authorities(chunk.authorities().iter().cloned());
            aggregate.extend_additionals(chunk.additionals().iter().cloned());
        }

        trace!(
            %server,
            records = aggregate.answers().len(),
            bytes = total_size,
            "zone transfer complete"
        );
        Ok(Response::from_message(server, aggregate, total_size))
    }

    /// Rejects replies whose transaction id is not the one in flight.
    fn check_id(&self, request: &Message, response: &Response) -> Result<()> {
        if response.is_ok() && response.message().id() != request.id() {
            return Err(ResolverError::IdMismatch {
                sent: request.id(),
                got: response.message().id(),
            });
        }
        Ok(())
    }

    fn emit(&self, message: &str) {
        if let Some(observer) = self.observer {
            (**observer)(message);
        }
    }
}

/// Returns true if the request's first question asks for a zone transfer.
fn is_axfr(request: &Message) -> bool {
    request
        .question()
        .map(|q| q.qtype == Type::Known(RecordType::AXFR))
        .unwrap_or(false)
}

/// Counts SOA records in a message's answer section.
fn count_soas(message: &Message) -> usize {
    message.answers().iter().filter(|r| r.is_soa()).count()
}

/// Returns the unspecified local address of the server's family.
fn unspecified_local(server: SocketAddr) -> SocketAddr {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    if server.is_ipv4() {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
    } else {
        SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
    }
}

/// Writes one length-prefixed DNS message.
fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    writer.write_all(&(payload.len() as u16).to_be_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

/// Reads one length-prefixed DNS message. A zero-length frame means
/// the peer gave up on the connection.
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut prefix = [0u8; 2];
    reader.read_exact(&mut prefix)?;

    let len = u16::from_be_bytes(prefix) as usize;
    if len == 0 {
        return Err(ResolverError::EmptyFrame);
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn frame_roundtrip() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &[0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(buf, [0x00, 0x03, 0xAA, 0xBB, 0xCC]);

        let payload = read_frame(&mut Cursor::new(buf)).unwrap();
        assert_eq!(payload, [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn zero_length_frame_is_an_error() {
        let result = read_frame(&mut Cursor::new(vec![0x00, 0x00]));
        assert!(matches!(result, Err(ResolverError::EmptyFrame)));
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let result = read_frame(&mut Cursor::new(vec![0x00, 0x05, 0x01]));
        assert!(matches!(result, Err(ResolverError::Io(_))));
    }

    #[test]
    fn axfr_detection() {
        use std::str::FromStr;
        use vane_proto::{Name, Question, RecordClass};

        let axfr = Message::query(
            1,
            false,
            Question::new(
                Name::from_str("example.com").unwrap(),
                RecordType::AXFR,
                RecordClass::IN,
            ),
        );
        assert!(is_axfr(&axfr));

        let plain = Message::query(
            1,
            false,
            Question::new(
                Name::from_str("example.com").unwrap(),
                RecordType::A,
                RecordClass::IN,
            ),
        );
        assert!(!is_axfr(&plain));
    }
}
