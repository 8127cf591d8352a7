use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use mablibs::engine::error::EngineError;
use mablibs::engine::mutagenesis::LibraryMember;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const CSV_HEADER: [&str; 4] = ["index", "mutations", "nucleotides", "amino_acids"];

#[derive(Serialize)]
struct MemberRecord<'a> {
    index: u64,
    mutations: String,
    nucleotides: &'a str,
    amino_acids: String,
}

enum Sink<W: Write> {
    Csv(csv::Writer<W>),
    Fasta(W),
}

/// Streams library members to CSV or FASTA as they are generated.
///
/// Members are numbered from 1 in the order they are written.
pub struct LibraryWriter<W: Write> {
    sink: Sink<W>,
    written: u64,
}

impl LibraryWriter<BufWriter<File>> {
    pub fn create(path: &Path, format: OutputFormat) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), format)
    }
}

impl<W: Write> LibraryWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Result<Self> {
        let sink = match format {
            OutputFormat::Csv => {
                let mut csv_writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(writer);
                csv_writer.write_record(CSV_HEADER)?;
                Sink::Csv(csv_writer)
            }
            OutputFormat::Fasta => Sink::Fasta(writer),
        };
        Ok(Self { sink, written: 0 })
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write_member(&mut self, member: &LibraryMember) -> Result<()> {
        let index = self.written + 1;
        match &mut self.sink {
            Sink::Csv(writer) => {
                let amino_acids = member
                    .template
                    .amino_acids()
                    .map_err(EngineError::from)?;
                writer.serialize(MemberRecord {
                    index,
                    mutations: member.mutations.to_string(),
                    nucleotides: member.template.nucleotides(),
                    amino_acids,
                })?;
            }
            Sink::Fasta(writer) => {
                writeln!(writer, ">member_{} {}", index, member.mutations)?;
                writeln!(writer, "{}", member.template.nucleotides())?;
            }
        }
        self.written = index;
        Ok(())
    }

    /// Flushes buffered output and hands back the underlying writer.
    pub fn finish(self) -> Result<W> {
        match self.sink {
            Sink::Csv(writer) => writer
                .into_inner()
                .map_err(|e| CliError::Io(e.into_error())),
            Sink::Fasta(mut writer) => {
                writer.flush()?;
                Ok(writer)
            }
        }
    }
}
