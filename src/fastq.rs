//! FASTQ input and output
//!
//! Input is read through `niffler`, so gzip, bzip2, xz and zstd compressed files are accepted
//! transparently, and parsed with `seq_io`. Output is plain four-line FASTQ.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use seq_io::fastq::{Reader, Record};

use crate::{
    record::{ReadRecord, SequenceRecord},
    Result,
};

/// Parses every record of a FASTQ stream
///
/// The header of each record is its full description line without the leading `@`.
pub fn parse_records<R: Read>(handle: R) -> Result<Vec<ReadRecord>> {
    let mut reader = Reader::new(handle);
    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let record = record?;
        let header = std::str::from_utf8(record.head())?;
        records.push(ReadRecord::new(header, record.seq(), record.qual()));
    }
    Ok(records)
}

/// Opens a (possibly compressed) FASTQ file and parses every record
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<ReadRecord>> {
    let (handle, _format) = niffler::from_path(path)?;
    parse_records(handle)
}

/// Writes records as four-line FASTQ blocks: `@header`, bases, `+`, qualities
pub struct FastqWriter<W: Write> {
    inner: W,
    records_written: usize,
}
impl FastqWriter<BufWriter<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let handle = File::create(path).map(BufWriter::new)?;
        Ok(Self::new(handle))
    }
}
impl<W: Write> FastqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    pub fn write_record<R: SequenceRecord>(&mut self, record: &R) -> Result<()> {
        self.inner.write_all(b"@")?;
        self.inner.write_all(record.header().as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.inner.write_all(record.seq())?;
        self.inner.write_all(b"\n+\n")?;
        self.inner.write_all(record.qual())?;
        self.inner.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod testing {
    use std::io::Cursor;

    use super::*;
    use crate::record::RefRecord;

    const FASTQ: &[u8] = b"@r0 lane=1\nACGT\n+\nIIII\n@r1\nttnn\n+\n!!##\n";

    #[test]
    fn test_parse_records() -> Result<()> {
        let records = parse_records(Cursor::new(FASTQ))?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header(), "r0 lane=1");
        assert_eq!(records[0].seq(), b"ACGT");
        assert_eq!(records[1].seq(), b"ttnn");
        assert_eq!(records[1].scores().collect::<Vec<_>>(), vec![0, 0, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_parse_empty() -> Result<()> {
        assert!(parse_records(Cursor::new(b""))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_write_records() -> Result<()> {
        let mut writer = FastqWriter::new(Vec::new());
        writer.write_record(&RefRecord::new("r0", b"AC", b"II"))?;
        writer.write_record(&ReadRecord::new("r1", "G", "#"))?;
        assert_eq!(writer.records_written(), 2);
        assert_eq!(writer.into_inner(), b"@r0\nAC\n+\nII\n@r1\nG\n+\n#\n");
        Ok(())
    }

    #[test]
    fn test_write_then_parse() -> Result<()> {
        let records = parse_records(Cursor::new(FASTQ))?;
        let mut writer = FastqWriter::new(Vec::new());
        for record in &records {
            writer.write_record(record)?;
        }
        let reparsed = parse_records(Cursor::new(writer.into_inner()))?;
        assert_eq!(reparsed, records);
        Ok(())
    }
}
