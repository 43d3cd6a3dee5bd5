//! # opc_client
//!
//! Minimal Open Pixel Control client.
//!
//! An OPC message is a 4-byte header (channel, command, big-endian
//! payload length) followed by the payload.  For "set pixel colors"
//! (command 0) the payload is one `r, g, b` byte triple per pixel.
//!
//! The client keeps one long-lived TCP connection.  When a send fails the
//! socket is dropped and a later send reconnects, so a server that comes up
//! late (or restarts) is picked up without intervention.  After a failed
//! connect, sends fail fast until the retry interval has passed.

use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use log::{debug, info};
use palette::Srgb;
use thiserror::Error;

/// OPC command: set pixel colors.
pub const CMD_SET_PIXELS: u8 = 0;

/// Largest payload the 16-bit length field can describe.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not resolve {0}")]
    Resolve(String),

    #[error("could not connect to {addr}: {source}")]
    Connect { addr: String, #[source] source: io::Error },

    #[error("write to {addr} failed: {source}")]
    Write { addr: String, #[source] source: io::Error },

    #[error("frame of {pixels} pixels exceeds the OPC payload limit")]
    FrameTooLarge { pixels: usize },

    #[error("not connected to {addr}; next attempt in {wait:?}")]
    Backoff { addr: String, wait: Duration },
}

// ════════════════════════════════════════════════════════════════════════════
// Transport trait — what the main loop needs from a pixel sink
// ════════════════════════════════════════════════════════════════════════════

/// A best-effort pixel sink.
pub trait Transport {
    /// Try to (re)connect.  Returns false on failure; callers are free to
    /// keep sending anyway.
    fn connect(&mut self) -> bool;

    /// Send one frame on `channel`.
    fn send(&mut self, frame: &[Srgb<u8>], channel: u8) -> Result<(), TransportError>;

    fn is_connected(&self) -> bool;
}

/// Encode a "set pixel colors" message.
pub fn encode_frame(frame: &[Srgb<u8>], channel: u8) -> Result<Vec<u8>, TransportError> {
    let len = frame.len() * 3;
    if len > MAX_PAYLOAD {
        return Err(TransportError::FrameTooLarge { pixels: frame.len() });
    }
    let mut msg = Vec::with_capacity(4 + len);
    msg.push(channel);
    msg.push(CMD_SET_PIXELS);
    msg.extend_from_slice(&(len as u16).to_be_bytes());
    for c in frame {
        msg.extend_from_slice(&[c.red, c.green, c.blue]);
    }
    Ok(msg)
}

// ════════════════════════════════════════════════════════════════════════════
// OpcClient — TCP
// ════════════════════════════════════════════════════════════════════════════

pub struct OpcClient {
    addr:            String,
    stream:          Option<TcpStream>,
    connect_timeout: Duration,
    retry_interval:  Duration,
    /// When the last connect attempt failed.
    last_failure:    Option<Instant>,
}

impl OpcClient {
    /// A client for `addr` (`host:port`).  Does not connect yet.
    pub fn new(addr: impl Into<String>) -> Self {
        OpcClient {
            addr:            addr.into(),
            stream:          None,
            connect_timeout: Duration::from_millis(500),
            retry_interval:  Duration::from_secs(1),
            last_failure:    None,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Minimum time between two connect attempts.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn addr(&self) -> &str { &self.addr }

    fn open(&self) -> Result<TcpStream, TransportError> {
        let addrs = self
            .addr
            .to_socket_addrs()
            .map_err(|_| TransportError::Resolve(self.addr.clone()))?;

        let mut last_err = None;
        for sa in addrs {
            match TcpStream::connect_timeout(&sa, self.connect_timeout) {
                Ok(s) => {
                    s.set_nodelay(true).ok();
                    return Ok(s);
                }
                Err(e) => last_err = Some(e),
            }
        }
        match last_err {
            Some(source) => Err(TransportError::Connect { addr: self.addr.clone(), source }),
            None         => Err(TransportError::Resolve(self.addr.clone())),
        }
    }

    fn ensure_connected(&mut self) -> Result<&mut TcpStream, TransportError> {
        let stream = match self.stream.take() {
            Some(s) => s,
            None    => {
                if let Some(failed) = self.last_failure {
                    let since = failed.elapsed();
                    if since < self.retry_interval {
                        return Err(TransportError::Backoff {
                            addr: self.addr.clone(),
                            wait: self.retry_interval - since,
                        });
                    }
                }
                let s = self.open().map_err(|e| {
                    self.last_failure = Some(Instant::now());
                    e
                })?;
                self.last_failure = None;
                info!("connected to {}", self.addr);
                s
            }
        };
        Ok(self.stream.insert(stream))
    }
}

impl Transport for OpcClient {
    fn connect(&mut self) -> bool {
        match self.ensure_connected() {
            Ok(_)  => true,
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }

    fn send(&mut self, frame: &[Srgb<u8>], channel: u8) -> Result<(), TransportError> {
        let msg = encode_frame(frame, channel)?;
        let addr = self.addr.clone();
        let stream = self.ensure_connected()?;
        if let Err(source) = stream.write_all(&msg) {
            self.stream = None;
            return Err(TransportError::Write { addr, source });
        }
        Ok(())
    }

    fn is_connected(&self) -> bool { self.stream.is_some() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn header_and_payload() {
        let frame = [Srgb::new(1, 2, 3), Srgb::new(4, 5, 6)];
        let msg = encode_frame(&frame, 7).unwrap();
        assert_eq!(msg, vec![7, 0, 0, 6, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn empty_frame_is_header_only() {
        assert_eq!(encode_frame(&[], 0).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn oversized_frame_rejected() {
        let frame = vec![Srgb::new(0, 0, 0); MAX_PAYLOAD / 3 + 1];
        assert!(matches!(
            encode_frame(&frame, 0),
            Err(TransportError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn sends_to_a_live_server() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut buf = [0u8; 7];
            sock.read_exact(&mut buf).unwrap();
            buf
        });

        let mut client = OpcClient::new(addr);
        assert!(client.connect());
        client.send(&[Srgb::new(9, 8, 7)], 1).unwrap();
        assert_eq!(server.join().unwrap(), [1, 0, 0, 3, 9, 8, 7]);
    }

    #[test]
    fn refused_connection_is_not_fatal() {
        // grab a free port, then close it
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let mut client = OpcClient::new(format!("127.0.0.1:{}", port));
        assert!(!client.connect());
        assert!(!client.is_connected());
        assert!(client.send(&[Srgb::new(0, 0, 0)], 0).is_err());
    }

    #[test]
    fn failed_connect_backs_off_until_retry_interval() {
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let mut client = OpcClient::new(format!("127.0.0.1:{}", port))
            .with_retry_interval(Duration::from_secs(3600));
        assert!(matches!(
            client.send(&[Srgb::new(0, 0, 0)], 0),
            Err(TransportError::Connect { .. })
        ));
        // no new attempt inside the interval, so no blocking connect either
        let t0 = Instant::now();
        for _ in 0..100 {
            assert!(matches!(
                client.send(&[Srgb::new(0, 0, 0)], 0),
                Err(TransportError::Backoff { .. })
            ));
        }
        assert!(t0.elapsed() < Duration::from_millis(100));
        assert!(!client.connect());
    }

    #[test]
    fn reconnects_once_retry_interval_has_passed() {
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let addr = format!("127.0.0.1:{}", port);
        let mut client = OpcClient::new(addr.clone()).with_retry_interval(Duration::from_millis(20));
        assert!(!client.connect());

        let listener = TcpListener::bind(&addr).unwrap();
        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut buf = [0u8; 7];
            sock.read_exact(&mut buf).unwrap();
            buf
        });

        thread::sleep(Duration::from_millis(40));
        client.send(&[Srgb::new(1, 2, 3)], 4).unwrap();
        assert!(client.is_connected());
        assert_eq!(server.join().unwrap(), [4, 0, 0, 3, 1, 2, 3]);
    }

    #[test]
    fn unresolvable_address() {
        let mut client = OpcClient::new("not an address");
        assert!(matches!(
            client.send(&[], 0),
            Err(TransportError::Resolve(_))
        ));
    }
}
