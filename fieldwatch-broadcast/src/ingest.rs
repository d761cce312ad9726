//! Frame ingestion from a byte stream
//!
//! Pulls EFM-100 frames off any `io::Read`, normally the serial device
//! node, already configured for 9600 8N1 by the platform. The reader
//! hunts for the `$` start-of-frame marker one byte at a time, assembles
//! the fixed-length frame behind it, and stamps each good frame with the
//! arrival time. Corrupt frames are dropped and the hunt restarts, which
//! is also how the stream recovers after the mill loses power mid-frame.
//!
//! Wrap the device in a `BufReader`; the alignment scan reads single
//! bytes.

use std::io::{self, Read};

use fieldwatch_core::frame::FRAME_LEN;
use fieldwatch_core::{FieldFrame, TimeSource, Timestamp};

/// Reader yielding timestamped frames from a byte stream
pub struct FrameReader<R: Read, T: TimeSource> {
    inner: R,
    clock: T,
}

impl<R: Read, T: TimeSource> FrameReader<R, T> {
    /// Wrap a byte stream, stamping frames with `clock`
    pub fn new(inner: R, clock: T) -> Self {
        Self { inner, clock }
    }

    /// Read the next checksum-valid frame
    ///
    /// Returns `Ok(None)` once the stream is exhausted. Transport errors
    /// propagate; corrupt frames are logged and skipped.
    pub fn next_frame(&mut self) -> io::Result<Option<(Timestamp, FieldFrame)>> {
        loop {
            if !self.align()? {
                return Ok(None);
            }

            let mut frame = [0u8; FRAME_LEN];
            frame[0] = b'$';
            if !self.fill(&mut frame[1..])? {
                return Ok(None);
            }

            match FieldFrame::parse(&frame) {
                Ok(parsed) => return Ok(Some((self.clock.now(), parsed))),
                Err(err) => {
                    log::warn!("discarding corrupt frame: {err}");
                    continue;
                }
            }
        }
    }

    /// Consume bytes up to and including the next `$`
    ///
    /// Returns false on end of stream.
    fn align(&mut self) -> io::Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            if self.inner.read(&mut byte)? == 0 {
                return Ok(false);
            }
            if byte[0] == b'$' {
                return Ok(true);
            }
        }
    }

    /// Fill `buf` completely; false on clean end of stream
    fn fill(&mut self, mut buf: &mut [u8]) -> io::Result<bool> {
        while !buf.is_empty() {
            match self.inner.read(buf) {
                Ok(0) => return Ok(false),
                Ok(n) => buf = &mut buf[n..],
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwatch_core::time::FixedTime;
    use fieldwatch_core::RotorStatus;
    use std::io::Cursor;

    #[test]
    fn reads_back_to_back_frames() {
        let stream = Cursor::new(b"$+05.23,0*CD\r\n$-07.50,0*D1\r\n".to_vec());
        let mut reader = FrameReader::new(stream, FixedTime::new(42));

        let (t, first) = reader.next_frame().unwrap().unwrap();
        assert_eq!(t, 42);
        assert_eq!(first.field, 5.23);
        assert_eq!(first.status, RotorStatus::Normal);

        let (_, second) = reader.next_frame().unwrap().unwrap();
        assert_eq!(second.field, -7.5);

        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn aligns_past_mid_frame_garbage() {
        // Stream starts mid-frame, as it does on power-up
        let stream = Cursor::new(b"3,0*AB\r\n$+01.00,0*C4\r\n".to_vec());
        let mut reader = FrameReader::new(stream, FixedTime::new(0));

        let (_, frame) = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.field, 1.0);
    }

    #[test]
    fn skips_corrupt_frames() {
        // First frame has a flipped checksum; the second is intact
        let stream = Cursor::new(b"$+05.23,0*00\r\n$+05.23,0*CD\r\n".to_vec());
        let mut reader = FrameReader::new(stream, FixedTime::new(0));

        let (_, frame) = reader.next_frame().unwrap().unwrap();
        assert_eq!(frame.field, 5.23);
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn truncated_tail_ends_the_stream() {
        let stream = Cursor::new(b"$+05.23,0*CD\r\n$+01.0".to_vec());
        let mut reader = FrameReader::new(stream, FixedTime::new(0));

        assert!(reader.next_frame().unwrap().is_some());
        assert!(reader.next_frame().unwrap().is_none());
    }
}
