//! Unpack command implementation.
//!
//! Reads a term session and prints one canonical term per line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use sterm_codec::TermReader;
use sterm_io::ByteChannel;
use sterm_sym::SymbolTable;
use sterm_util::HashTableConfig;

use crate::commands::common::{check_output_writable, validate_input_file};
use crate::error::Result;

/// Arguments for the unpack command.
#[derive(Debug, Clone)]
pub struct UnpackArgs {
    /// Session file to read.
    pub input: PathBuf,
    /// Text file to write; standard output when absent.
    pub output: Option<PathBuf>,
    /// Symbol table settings.
    pub table: HashTableConfig,
    /// Overwrite an existing output file.
    pub force: bool,
}

/// Unpack command handler.
pub struct UnpackCommand {
    args: UnpackArgs,
}

impl UnpackCommand {
    pub fn new(args: UnpackArgs) -> Self {
        Self { args }
    }

    /// Write every term of the session to `out`, returning the term count.
    pub fn unpack_to(&self, out: &mut dyn Write) -> Result<usize> {
        validate_input_file(&self.args.input)?;

        let symbols = SymbolTable::with_config(self.args.table)?;
        let reader = TermReader::open(ByteChannel::open(&self.args.input)?, symbols)?;

        let mut count = 0;
        for term in reader {
            writeln!(out, "{}", term?)?;
            count += 1;
        }
        out.flush()?;

        tracing::info!("unpacked {} terms from {}", count, self.args.input.display());
        Ok(count)
    }

    /// Execute the command.
    pub fn run(&self) -> Result<usize> {
        match &self.args.output {
            Some(path) => {
                check_output_writable(path, self.args.force)?;
                let mut out = BufWriter::new(File::create(path)?);
                self.unpack_to(&mut out)
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                self.unpack_to(&mut out)
            }
        }
    }
}

/// Run the unpack command.
pub fn run_unpack(args: UnpackArgs) -> Result<()> {
    UnpackCommand::new(args).run().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TermpackError;
    use sterm_codec::{parse_term, CodecError, TermWriter};
    use sterm_lz::LzConfig;
    use tempfile::TempDir;

    fn write_session(dir: &TempDir, lines: &[&str]) -> PathBuf {
        let path = dir.path().join("terms.stp");
        let symbols = SymbolTable::new();
        let mut writer = TermWriter::new(ByteChannel::create(&path).unwrap(), LzConfig::default()).unwrap();
        for line in lines {
            writer.write_term(&parse_term(&symbols, line).unwrap()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_unpack_prints_canonical_terms() {
        let dir = TempDir::new().unwrap();
        let input = write_session(&dir, &["f( a , [1,2] )", "\"x y\""]);

        let command = UnpackCommand::new(UnpackArgs {
            input,
            output: None,
            table: HashTableConfig::default(),
            force: false,
        });
        let mut out = Vec::new();
        assert_eq!(command.unpack_to(&mut out).unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "f(a,[1,2])\n\"x y\"\n");
    }

    #[test]
    fn test_unpack_to_file() {
        let dir = TempDir::new().unwrap();
        let input = write_session(&dir, &["g(b)"]);
        let output = dir.path().join("out.txt");

        let count = UnpackCommand::new(UnpackArgs {
            input,
            output: Some(output.clone()),
            table: HashTableConfig::default(),
            force: false,
        })
        .run()
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(std::fs::read_to_string(output).unwrap(), "g(b)\n");
    }

    #[test]
    fn test_unpack_fails_on_truncated_session() {
        let dir = TempDir::new().unwrap();
        let input = write_session(&dir, &["f(a,b)", "g(hello,world)"]);
        let bytes = std::fs::read(&input).unwrap();
        std::fs::write(&input, &bytes[..bytes.len() - 3]).unwrap();

        let mut out = Vec::new();
        let result = UnpackCommand::new(UnpackArgs {
            input,
            output: None,
            table: HashTableConfig::default(),
            force: false,
        })
        .unpack_to(&mut out);

        assert!(matches!(
            result,
            Err(TermpackError::Codec(CodecError::MalformedPayload { .. }))
        ));
        assert_eq!(String::from_utf8(out).unwrap(), "f(a,b)\n");
    }

    #[test]
    fn test_unpack_rejects_foreign_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("plain.txt");
        std::fs::write(&input, "f(a)\n").unwrap();

        let result = UnpackCommand::new(UnpackArgs {
            input,
            output: None,
            table: HashTableConfig::default(),
            force: false,
        })
        .unpack_to(&mut Vec::new());
        assert!(result.is_err());
    }
}
