//! The opaque output sink `render_to_sink` writes quantized frames to.

use crate::error::Result;

/// A write-all-or-fail destination for rendered sample bytes. Implementors
/// own the underlying resource (file descriptor, socket, in-memory buffer);
/// the renderer only ever calls `write_all` at frame-flush boundaries and
/// `flush` once at the end of the tone list.
pub trait Sink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Adapts any [`std::io::Write`] (a file, a socket, stdout) into a [`Sink`].
pub struct WriteSink<W: std::io::Write> {
    inner: W,
}

impl<W: std::io::Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        WriteSink { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: std::io::Write> Sink for WriteSink<W> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// An in-memory sink that simply appends every flushed frame, for tests and
/// for callers who want buffer semantics but need the `Sink` interface
/// (e.g. to share code paths with `render_to_sink`).
#[derive(Debug, Default)]
pub struct BufferSink {
    pub bytes: Vec<u8>,
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink::default()
    }
}

impl Sink for BufferSink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_accumulates_writes() {
        let mut sink = BufferSink::new();
        sink.write_all(&[1, 2, 3]).unwrap();
        sink.write_all(&[4, 5]).unwrap();
        assert_eq!(sink.bytes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn write_sink_forwards_to_std_io_write() {
        let mut buf = Vec::new();
        {
            let mut sink = WriteSink::new(&mut buf);
            sink.write_all(&[9, 8, 7]).unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(buf, vec![9, 8, 7]);
    }
}
