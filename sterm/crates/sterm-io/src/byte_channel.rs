//! Byte-level channel over memory, file and stream backends.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::error::{ChannelError, ChannelResult};

/// Initial capacity of a fresh memory buffer
const DEFAULT_MEMORY_CAPACITY: usize = 64;

/// Which backend a [`ByteChannel`] multiplexes onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Growable in-memory buffer
    Memory,
    /// Buffered file handle
    File,
    /// Arbitrary `Read` or `Write` implementation
    Stream,
}

enum Backend {
    /// Writes append to `buf`; reads consume from `pos`
    Memory { buf: Vec<u8>, pos: usize },
    FileReader(BufReader<File>),
    FileWriter(BufWriter<File>),
    StreamReader(Box<dyn Read>),
    StreamWriter(Box<dyn Write>),
}

/// A byte sink or source
///
/// Memory channels support both directions (writes append, reads consume
/// from the front). File and stream channels are opened for one direction.
pub struct ByteChannel {
    backend: Backend,
    bytes_read: u64,
    bytes_written: u64,
}

impl ByteChannel {
    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    /// Create an empty memory channel
    pub fn memory() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// Create an empty memory channel with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_backend(Backend::Memory {
            buf: Vec::with_capacity(capacity),
            pos: 0,
        })
    }

    /// Create a memory channel reading from `bytes`
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::with_backend(Backend::Memory { buf: bytes, pos: 0 })
    }

    /// Open a file for reading
    pub fn open(path: impl AsRef<Path>) -> ChannelResult<Self> {
        let file = File::open(path)?;
        Ok(Self::with_backend(Backend::FileReader(BufReader::new(file))))
    }

    /// Create (or truncate) a file for writing
    pub fn create(path: impl AsRef<Path>) -> ChannelResult<Self> {
        let file = File::create(path)?;
        Ok(Self::with_backend(Backend::FileWriter(BufWriter::new(file))))
    }

    /// Wrap a reader
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self::with_backend(Backend::StreamReader(Box::new(reader)))
    }

    /// Wrap a writer
    pub fn from_writer(writer: impl Write + 'static) -> Self {
        Self::with_backend(Backend::StreamWriter(Box::new(writer)))
    }

    /// The backend kind
    pub fn kind(&self) -> ChannelKind {
        match self.backend {
            Backend::Memory { .. } => ChannelKind::Memory,
            Backend::FileReader(_) | Backend::FileWriter(_) => ChannelKind::File,
            Backend::StreamReader(_) | Backend::StreamWriter(_) => ChannelKind::Stream,
        }
    }

    /// Returns true if reads can succeed on this channel
    pub fn is_readable(&self) -> bool {
        matches!(
            self.backend,
            Backend::Memory { .. } | Backend::FileReader(_) | Backend::StreamReader(_)
        )
    }

    /// Returns true if writes can succeed on this channel
    pub fn is_writable(&self) -> bool {
        matches!(
            self.backend,
            Backend::Memory { .. } | Backend::FileWriter(_) | Backend::StreamWriter(_)
        )
    }

    /// Total bytes delivered by reads
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Total bytes accepted by writes
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ------------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------------

    /// Write a single byte
    pub fn write_byte(&mut self, byte: u8) -> ChannelResult<()> {
        self.write_bytes(&[byte]).map(|_| ())
    }

    /// Write all of `bytes`, returning the number written
    pub fn write_bytes(&mut self, bytes: &[u8]) -> ChannelResult<usize> {
        match &mut self.backend {
            Backend::Memory { buf, .. } => {
                reserve_geometric(buf, bytes.len())?;
                buf.extend_from_slice(bytes);
            }
            Backend::FileWriter(writer) => writer.write_all(bytes)?,
            Backend::StreamWriter(writer) => writer.write_all(bytes)?,
            Backend::FileReader(_) | Backend::StreamReader(_) => {
                return Err(ChannelError::NotWritable)
            }
        }
        self.bytes_written += bytes.len() as u64;
        Ok(bytes.len())
    }

    /// Flush buffered writes to the backend
    pub fn flush(&mut self) -> ChannelResult<()> {
        match &mut self.backend {
            Backend::FileWriter(writer) => writer.flush()?,
            Backend::StreamWriter(writer) => writer.flush()?,
            _ => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------------

    /// Read a single byte, `None` on exhaustion
    pub fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        (self.read_bytes(&mut byte) == 1).then_some(byte[0])
    }

    /// Fill as much of `out` as the input allows, returning the count
    ///
    /// A short count means the input is exhausted. I/O failures are logged
    /// and reported the same way.
    pub fn read_bytes(&mut self, out: &mut [u8]) -> usize {
        let count = match &mut self.backend {
            Backend::Memory { buf, pos } => {
                let available = buf.len().saturating_sub(*pos);
                let count = available.min(out.len());
                out[..count].copy_from_slice(&buf[*pos..*pos + count]);
                *pos += count;
                count
            }
            Backend::FileReader(reader) => fill_from(reader, out),
            Backend::StreamReader(reader) => fill_from(reader.as_mut(), out),
            Backend::FileWriter(_) | Backend::StreamWriter(_) => {
                log::warn!("read attempted on a write-only channel");
                0
            }
        };
        self.bytes_read += count as u64;
        count
    }

    // ------------------------------------------------------------------------
    // Memory backend access
    // ------------------------------------------------------------------------

    /// Contents of a memory channel
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.backend {
            Backend::Memory { buf, .. } => Some(buf),
            _ => None,
        }
    }

    /// Consume a memory channel, returning its contents
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self.backend {
            Backend::Memory { buf, .. } => Some(buf),
            _ => None,
        }
    }

    /// Restart reading a memory channel from the beginning
    ///
    /// Returns false for other backends.
    pub fn rewind(&mut self) -> bool {
        match &mut self.backend {
            Backend::Memory { pos, .. } => {
                *pos = 0;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for ByteChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteChannel")
            .field("kind", &self.kind())
            .field("bytes_read", &self.bytes_read)
            .field("bytes_written", &self.bytes_written)
            .finish()
    }
}

/// Grow `buf` so `additional` more bytes fit: double the capacity, or the
/// exact requirement when doubling is not enough
fn reserve_geometric(buf: &mut Vec<u8>, additional: usize) -> ChannelResult<()> {
    let needed = buf
        .len()
        .checked_add(additional)
        .ok_or(ChannelError::OutOfMemory {
            requested: usize::MAX,
        })?;
    if needed <= buf.capacity() {
        return Ok(());
    }

    let target = needed.max(buf.capacity().saturating_mul(2));
    buf.try_reserve_exact(target - buf.len())
        .map_err(|_| ChannelError::OutOfMemory { requested: target })
}

fn fill_from<R: Read + ?Sized>(reader: &mut R, out: &mut [u8]) -> usize {
    let mut filled = 0;
    while filled < out.len() {
        match reader.read(&mut out[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("channel read failed after {} bytes: {}", filled, e);
                break;
            }
        }
    }
    filled
}
