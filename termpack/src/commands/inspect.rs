//! Inspect command implementation.
//!
//! Reports the header and compression statistics of a term session.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use sterm_codec::{TermReader, MAGIC};
use sterm_io::ByteChannel;
use sterm_sym::SymbolTable;

use crate::commands::common::{ratio_percent, validate_input_file};
use crate::error::Result;

/// Arguments for the inspect command.
#[derive(Debug, Clone)]
pub struct InspectArgs {
    /// Session file to inspect.
    pub input: PathBuf,
    /// Print the report as JSON.
    pub json: bool,
}

/// Session statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub magic: u32,
    pub version: String,
    pub window_size: usize,
    pub terms: usize,
    pub literals: usize,
    pub back_references: usize,
    pub compressed_bytes: usize,
    pub uncompressed_bytes: usize,
    pub file_bytes: u64,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "magic:              0x{:04x}", self.magic)?;
        writeln!(f, "version:            {}", self.version)?;
        writeln!(f, "window size:        {}", self.window_size)?;
        writeln!(f, "terms:              {}", self.terms)?;
        writeln!(f, "literal tokens:     {}", self.literals)?;
        writeln!(f, "back-references:    {}", self.back_references)?;
        writeln!(f, "uncompressed bytes: {}", self.uncompressed_bytes)?;
        writeln!(
            f,
            "compressed bytes:   {} ({:.1}%)",
            self.compressed_bytes,
            ratio_percent(self.compressed_bytes, self.uncompressed_bytes)
        )?;
        write!(f, "file bytes:         {}", self.file_bytes)
    }
}

/// Inspect command handler.
pub struct InspectCommand {
    args: InspectArgs,
}

impl InspectCommand {
    pub fn new(args: InspectArgs) -> Self {
        Self { args }
    }

    /// Build the report.
    pub fn run(&self) -> Result<InspectReport> {
        validate_input_file(&self.args.input)?;

        let file_bytes = std::fs::metadata(&self.args.input)?.len();
        let mut reader = TermReader::open(ByteChannel::open(&self.args.input)?, SymbolTable::new())?;
        let header = reader.header();

        while reader.read_text()?.is_some() {}
        let counts = reader.token_counts();

        Ok(InspectReport {
            magic: MAGIC,
            version: format!("{}.{}", header.major(), header.minor()),
            window_size: header.window_size,
            terms: reader.terms_read(),
            literals: counts.literals,
            back_references: counts.back_references,
            compressed_bytes: counts.compressed_bytes(),
            uncompressed_bytes: counts.uncompressed_bytes,
            file_bytes,
        })
    }
}

/// Run the inspect command and print the report.
pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let json = args.json;
    let report = InspectCommand::new(args).run()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sterm_codec::TermWriter;
    use sterm_lz::LzConfig;
    use tempfile::TempDir;

    #[test]
    fn test_report_counts_tokens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.stp");
        let mut writer = TermWriter::new(ByteChannel::create(&path).unwrap(), LzConfig::with_window(256)).unwrap();
        writer.write_text("aaaaaaaaaa").unwrap();
        writer.write_text("aaaaaaaaaa").unwrap();
        writer.finish().unwrap();

        let report = InspectCommand::new(InspectArgs {
            input: path,
            json: false,
        })
        .run()
        .unwrap();

        assert_eq!(report.window_size, 256);
        assert_eq!(report.version, "1.0");
        assert_eq!(report.terms, 2);
        assert_eq!(report.uncompressed_bytes, 22);
        // lit, ref, lit(0) then a single ref covering the repeat
        assert_eq!(report.literals, 2);
        assert_eq!(report.back_references, 2);
        assert_eq!(report.compressed_bytes, 8);
    }

    #[test]
    fn test_truncated_session_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.stp");
        let mut writer = TermWriter::new(ByteChannel::create(&path).unwrap(), LzConfig::default()).unwrap();
        writer.write_text("pair(left,right)").unwrap();
        writer.finish().unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

        let result = InspectCommand::new(InspectArgs {
            input: path,
            json: false,
        })
        .run();
        assert!(result.is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = InspectReport {
            magic: MAGIC,
            version: "1.0".to_string(),
            window_size: 1024,
            terms: 0,
            literals: 0,
            back_references: 0,
            compressed_bytes: 0,
            uncompressed_bytes: 0,
            file_bytes: 7,
        };
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["window_size"], 1024);
        assert_eq!(json["file_bytes"], 7);
    }
}
