//! Term-exchange sessions: a small header followed by a stream of items.
//!
//! The header records the compression window, so a reader always
//! decompresses against a window configured like the writer's.

use sterm_io::{ByteChannel, ChannelError};
use sterm_lz::{LzConfig, SearchBuffer, TokenCounts};
use sterm_sym::SymbolTable;

use crate::codec;
use crate::error::{CodecError, CodecResult};
use crate::term::{parse_term, Term};

/// Session magic number
pub const MAGIC: u32 = 0x57e1;
/// Format version written by this build, major in the high byte
pub const VERSION: u32 = 0x0100;

/// Session header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format version, see [`VERSION`]
    pub version: u32,
    /// Window size the payloads were compressed with
    pub window_size: usize,
}

impl Header {
    /// Major version; readers refuse any other than their own
    pub fn major(&self) -> u32 {
        self.version >> 8
    }

    /// Minor version
    pub fn minor(&self) -> u32 {
        self.version & 0xff
    }

    fn write_to(&self, out: &mut ByteChannel) -> CodecResult<()> {
        out.write_varint(MAGIC)?;
        out.write_varint(self.version)?;
        out.write_varint(self.window_size as u32)?;
        Ok(())
    }

    fn read_from(input: &mut ByteChannel) -> CodecResult<Self> {
        const EOF: ChannelError = ChannelError::UnexpectedEof("header");

        let magic = input.read_varint().ok_or(EOF)?;
        if magic != MAGIC {
            return Err(CodecError::BadMagic {
                found: magic,
                expected: MAGIC,
            });
        }

        let version = input.read_varint().ok_or(EOF)?;
        let window_size = input.read_varint().ok_or(EOF)? as usize;
        let header = Header {
            version,
            window_size,
        };
        if header.major() != VERSION >> 8 {
            return Err(CodecError::UnsupportedVersion {
                major: header.major(),
                minor: header.minor(),
            });
        }
        Ok(header)
    }
}

/// Writes terms to a session
#[derive(Debug)]
pub struct TermWriter {
    channel: ByteChannel,
    window: SearchBuffer,
    terms_written: usize,
    counts: TokenCounts,
}

impl TermWriter {
    /// Start a session on `channel`, writing the header
    pub fn new(mut channel: ByteChannel, config: LzConfig) -> CodecResult<Self> {
        let window = SearchBuffer::new(config)?;
        Header {
            version: VERSION,
            window_size: config.window_size,
        }
        .write_to(&mut channel)?;

        log::debug!("opened term writer with {:?}", config);
        Ok(Self {
            channel,
            window,
            terms_written: 0,
            counts: TokenCounts::default(),
        })
    }

    /// Write a term in its canonical textual form
    pub fn write_term(&mut self, term: &Term) -> CodecResult<()> {
        self.write_text(&term.to_string())
    }

    /// Write raw term text
    pub fn write_text(&mut self, text: &str) -> CodecResult<()> {
        let counts = codec::write_term(&mut self.channel, &mut self.window, text)?;
        self.counts += counts;
        self.terms_written += 1;
        Ok(())
    }

    /// Write an integer, or the "no value" sentinel
    pub fn write_int(&mut self, value: Option<i32>) -> CodecResult<()> {
        codec::write_int(&mut self.channel, value)
    }

    /// Number of payloads written so far
    pub fn terms_written(&self) -> usize {
        self.terms_written
    }

    /// Token totals over all payloads written so far
    pub fn token_counts(&self) -> TokenCounts {
        self.counts
    }

    /// Compression settings recorded in the header
    pub fn config(&self) -> LzConfig {
        self.window.config()
    }

    /// Flush and return the channel
    pub fn finish(mut self) -> CodecResult<ByteChannel> {
        self.channel.flush()?;
        log::debug!(
            "closed term writer after {} terms ({} bytes)",
            self.terms_written,
            self.channel.bytes_written()
        );
        Ok(self.channel)
    }
}

/// Reads terms from a session
#[derive(Debug)]
pub struct TermReader {
    channel: ByteChannel,
    window: SearchBuffer,
    symbols: SymbolTable,
    header: Header,
    terms_read: usize,
    counts: TokenCounts,
}

impl TermReader {
    /// Read the header of a session, interning symbols in `symbols`
    pub fn open(mut channel: ByteChannel, symbols: SymbolTable) -> CodecResult<Self> {
        let header = Header::read_from(&mut channel)?;
        let window = SearchBuffer::with_size(header.window_size)?;

        log::debug!(
            "opened term reader: version {}.{}, window {}",
            header.major(),
            header.minor(),
            header.window_size
        );
        Ok(Self {
            channel,
            window,
            symbols,
            header,
            terms_read: 0,
            counts: TokenCounts::default(),
        })
    }

    /// Like [`open`](Self::open), but require a particular window size
    pub fn open_with_window(
        channel: ByteChannel,
        symbols: SymbolTable,
        window_size: usize,
    ) -> CodecResult<Self> {
        let reader = Self::open(channel, symbols)?;
        if reader.header.window_size != window_size {
            return Err(CodecError::WindowMismatch {
                found: reader.header.window_size,
                expected: window_size,
            });
        }
        Ok(reader)
    }

    /// Header read when the session was opened
    pub fn header(&self) -> Header {
        self.header
    }

    /// Table the reader interns symbols in
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Number of payloads read so far
    pub fn terms_read(&self) -> usize {
        self.terms_read
    }

    /// Token totals over all payloads read so far
    pub fn token_counts(&self) -> TokenCounts {
        self.counts
    }

    /// Read the next payload as text
    ///
    /// `Ok(None)` means the stream ended cleanly between payloads; input
    /// that stops or goes bad inside a payload is an error.
    pub fn read_text(&mut self) -> CodecResult<Option<String>> {
        let offset = self.channel.bytes_read();
        match codec::read_term_text_counted(&mut self.channel, &mut self.window) {
            Some((text, counts)) => {
                self.counts += counts;
                self.terms_read += 1;
                Ok(Some(text))
            }
            None if self.channel.bytes_read() == offset => Ok(None),
            None => Err(CodecError::MalformedPayload { offset }),
        }
    }

    /// Read and parse the next term
    pub fn read_term(&mut self) -> CodecResult<Option<Term>> {
        match self.read_text()? {
            Some(text) => Ok(Some(parse_term(&self.symbols, &text)?)),
            None => Ok(None),
        }
    }

    /// Read an integer
    pub fn read_int(&mut self) -> CodecResult<Option<i32>> {
        codec::read_int(&mut self.channel)
    }
}

impl Iterator for TermReader {
    type Item = CodecResult<Term>;

    fn next(&mut self) -> Option<CodecResult<Term>> {
        self.read_term().transpose()
    }
}
