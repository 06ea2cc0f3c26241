//! Pack command implementation.
//!
//! Reads one term per line from a text file and writes them to a
//! compressed term session.

use std::path::PathBuf;
use std::time::Instant;

use sterm_codec::{parse_term, TermWriter};
use sterm_io::ByteChannel;
use sterm_lz::LzConfig;
use sterm_sym::SymbolTable;
use sterm_util::HashTableConfig;

use crate::commands::common::{check_output_writable, ratio_percent, validate_input_file};
use crate::error::{Result, TermpackError};

/// Arguments for the pack command.
#[derive(Debug, Clone)]
pub struct PackArgs {
    /// Text file with one term per line.
    pub input: PathBuf,
    /// Session file to create.
    pub output: PathBuf,
    /// Compression settings.
    pub lz: LzConfig,
    /// Symbol table settings.
    pub table: HashTableConfig,
    /// Overwrite an existing output file.
    pub force: bool,
}

/// Summary of a pack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSummary {
    pub terms: usize,
    pub text_bytes: usize,
    pub packed_bytes: u64,
}

/// Pack command handler.
pub struct PackCommand {
    args: PackArgs,
}

impl PackCommand {
    pub fn new(args: PackArgs) -> Self {
        Self { args }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<PackSummary> {
        let start_time = Instant::now();
        validate_input_file(&self.args.input)?;
        check_output_writable(&self.args.output, self.args.force)?;

        let text = std::fs::read_to_string(&self.args.input)?;
        let symbols = SymbolTable::with_config(self.args.table)?;
        let channel = ByteChannel::create(&self.args.output)?;
        let mut writer = TermWriter::new(channel, self.args.lz)?;

        let mut text_bytes = 0;
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let term = parse_term(&symbols, line).map_err(|source| TermpackError::Parse {
                path: self.args.input.display().to_string(),
                line: index + 1,
                source,
            })?;
            writer.write_term(&term)?;
            text_bytes += term.to_string().len() + 1;
        }

        let terms = writer.terms_written();
        let counts = writer.token_counts();
        let channel = writer.finish()?;

        tracing::debug!(
            "{} literals, {} back-references, {} symbols interned",
            counts.literals,
            counts.back_references,
            symbols.stats().misses
        );
        tracing::info!(
            "packed {} terms in {:.2}s",
            terms,
            start_time.elapsed().as_secs_f64()
        );

        Ok(PackSummary {
            terms,
            text_bytes,
            packed_bytes: channel.bytes_written(),
        })
    }
}

/// Run the pack command and print its summary.
pub fn run_pack(args: PackArgs) -> Result<()> {
    let output = args.output.clone();
    let summary = PackCommand::new(args).run()?;
    println!(
        "Packed {} terms into {}: {} -> {} bytes ({:.1}%)",
        summary.terms,
        output.display(),
        summary.text_bytes,
        summary.packed_bytes,
        ratio_percent(summary.packed_bytes as usize, summary.text_bytes)
    );
    Ok(())
}
