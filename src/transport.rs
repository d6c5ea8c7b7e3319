//! Serial link to the badge.
//!
//! The receiver on the badge reads newline-terminated lines from USB serial.
//! An image is one line: `IMG:` followed by the packed bitmap in standard
//! padded base64. It answers `Image displayed` once the panel is updated or
//! `Error: <reason>` when the line could not be decoded.
use std::io::{self, ErrorKind, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose, Engine};
use tracing::{debug, info, trace};

use crate::render::Bitmap;

pub const PREFIX: &[u8] = b"IMG:";
pub const ACK: &str = "Image displayed";
const ERROR_PREFIX: &str = "Error";

/// The badge resets when the port opens; give it time to boot.
const SETTLE_DELAY: Duration = Duration::from_secs(2);
const READ_POLL: Duration = Duration::from_millis(100);
const MAX_LINE: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("serial I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("badge did not acknowledge within {0:?}")]
    AckTimeout(Duration),

    #[error("badge rejected the frame: {0}")]
    Rejected(String),

    #[error("serial port closed")]
    Closed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line does not start with IMG:")]
    MissingPrefix,

    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },
}

/// A rendered bitmap ready to go over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bitmap: Bitmap,
}

impl Frame {
    pub fn from_bitmap(bitmap: Bitmap) -> Frame {
        Frame { bitmap }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// The complete line, newline included.
    pub fn encode(&self) -> Vec<u8> {
        let payload = general_purpose::STANDARD.encode(self.bitmap.as_bytes());
        let mut line = Vec::with_capacity(PREFIX.len() + payload.len() + 1);
        line.extend_from_slice(PREFIX);
        line.extend_from_slice(payload.as_bytes());
        line.push(b'\n');
        line
    }

    /// Reference decoder matching the badge receiver.
    pub fn decode(line: &[u8], width: u32, height: u32) -> Result<Bitmap, DecodeError> {
        let line = line.trim_ascii();
        let payload = line.strip_prefix(PREFIX).ok_or(DecodeError::MissingPrefix)?;
        let data = general_purpose::STANDARD.decode(payload)?;
        let expected = Bitmap::stride_for(width) * height as usize;
        let actual = data.len();
        Bitmap::from_bytes(width, height, data).ok_or(DecodeError::Length { expected, actual })
    }
}

/// Where finished frames go.
pub trait FrameSink {
    fn send(&mut self, frame: &Frame) -> Result<(), TransportError>;
}

/// A byte stream to the badge that can drop input nobody has read yet.
pub trait Port: Read + Write {
    fn discard_input(&mut self) -> io::Result<()>;
}

impl Port for Box<dyn serialport::SerialPort> {
    fn discard_input(&mut self) -> io::Result<()> {
        (**self).clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }
}

/// The badge on the other end of a serial port (or anything byte-shaped).
pub struct Badge<P> {
    port: P,
    ack_timeout: Option<Duration>,
}

impl Badge<Box<dyn serialport::SerialPort>> {
    pub fn open(
        path: &str,
        baud_rate: u32,
        ack_timeout: Option<Duration>,
    ) -> Result<Self, serialport::Error> {
        let port = serialport::new(path, baud_rate).timeout(READ_POLL).open()?;
        info!(path, baud_rate, "opened badge serial port");
        thread::sleep(SETTLE_DELAY);
        Ok(Badge::new(port, ack_timeout))
    }
}

impl<P: Port> Badge<P> {
    pub fn new(port: P, ack_timeout: Option<Duration>) -> Badge<P> {
        Badge { port, ack_timeout }
    }

    pub fn get_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    fn await_ack(&mut self, timeout: Duration) -> Result<(), TransportError> {
        // A timeout too large to represent as an instant never expires.
        let deadline = Instant::now().checked_add(timeout);
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(TransportError::AckTimeout(timeout));
            }
            match self.port.read(&mut byte) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(_) if byte[0] == b'\n' => {
                    let text = String::from_utf8_lossy(&line).trim().to_string();
                    line.clear();
                    if text == ACK {
                        return Ok(());
                    }
                    if let Some(reason) = text.strip_prefix(ERROR_PREFIX) {
                        let reason = reason.trim_start_matches(':').trim();
                        return Err(TransportError::Rejected(reason.to_string()));
                    }
                    if !text.is_empty() {
                        trace!(line = %text, "ignoring badge output");
                    }
                }
                Ok(_) => {
                    if line.len() < MAX_LINE {
                        line.push(byte[0]);
                    }
                }
                Err(err) if is_idle(&err) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn is_idle(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted)
}

impl<P: Port> FrameSink for Badge<P> {
    fn send(&mut self, frame: &Frame) -> Result<(), TransportError> {
        // Replies that arrived after an earlier frame timed out belong to that frame.
        self.port.discard_input()?;

        let line = frame.encode();
        self.port.write_all(&line)?;
        self.port.flush()?;
        debug!(bytes = line.len(), "frame written");

        match self.ack_timeout {
            Some(timeout) => self.await_ack(timeout),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::{HEIGHT, WIDTH};
    use assert_matches::assert_matches;

    fn checkerboard() -> Bitmap {
        let mut bitmap = Bitmap::new(WIDTH, HEIGHT);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                bitmap.set_ink(x, y, (x / 3 + y) % 2 == 0);
            }
        }
        bitmap
    }

    #[test]
    fn line_shape() {
        let line = Frame::from_bitmap(Bitmap::new(WIDTH, HEIGHT)).encode();
        assert!(line.starts_with(b"IMG:"));
        assert_eq!(line.last(), Some(&b'\n'));
        assert_eq!(line.iter().filter(|&&b| b == b'\n').count(), 1);
        // 4736 bytes -> 6316 base64 chars with padding
        assert_eq!(line.len(), 4 + 6316 + 1);
    }

    #[test]
    fn decoder_reproduces_pixels() {
        let bitmap = checkerboard();
        let line = Frame::from_bitmap(bitmap.clone()).encode();
        let decoded = Frame::decode(&line, WIDTH, HEIGHT).unwrap();
        assert_eq!(decoded, bitmap);
        for (x, y) in [(0, 0), (3, 0), (295, 127), (150, 64)] {
            assert_eq!(decoded.is_ink(x, y), bitmap.is_ink(x, y));
        }
    }

    #[test]
    fn decoder_rejects_bad_lines() {
        assert_eq!(Frame::decode(b"CO2:812\n", WIDTH, HEIGHT), Err(DecodeError::MissingPrefix));
        assert_matches!(Frame::decode(b"IMG:!!!!\n", WIDTH, HEIGHT), Err(DecodeError::Base64(_)));
        assert_eq!(
            Frame::decode(b"IMG:AAAA\n", WIDTH, HEIGHT),
            Err(DecodeError::Length {
                expected: 4736,
                actual: 3
            })
        );
    }
}
