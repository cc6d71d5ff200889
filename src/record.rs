use crate::color::phred_score;

/// Shared read-only view of a sequencing read
///
/// Implemented by both owned ([`ReadRecord`]) and borrowed ([`RefRecord`]) records so that
/// writers can accept either.
pub trait SequenceRecord {
    /// Header line without the leading `@`
    fn header(&self) -> &str;

    /// ASCII nucleotides
    fn seq(&self) -> &[u8];

    /// Phred+33 ASCII quality characters, one per base
    fn qual(&self) -> &[u8];

    fn len(&self) -> usize {
        self.seq().len()
    }

    fn is_empty(&self) -> bool {
        self.seq().is_empty()
    }
}

/// An owned sequencing read: header, bases and phred+33 qualities
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadRecord {
    header: String,
    seq: Vec<u8>,
    qual: Vec<u8>,
}
impl ReadRecord {
    pub fn new(
        header: impl Into<String>,
        seq: impl Into<Vec<u8>>,
        qual: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            header: header.into(),
            seq: seq.into(),
            qual: qual.into(),
        }
    }

    /// Iterates over the numeric phred scores of the record
    pub fn scores(&self) -> impl Iterator<Item = u8> + '_ {
        self.qual.iter().map(|&q| phred_score(q))
    }
}
impl SequenceRecord for ReadRecord {
    fn header(&self) -> &str {
        &self.header
    }
    fn seq(&self) -> &[u8] {
        &self.seq
    }
    fn qual(&self) -> &[u8] {
        &self.qual
    }
}

/// A read borrowed from a decoded stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefRecord<'a> {
    header: &'a str,
    seq: &'a [u8],
    qual: &'a [u8],
}
impl<'a> RefRecord<'a> {
    /// # Panics
    ///
    /// Panics if `seq` and `qual` differ in length.
    #[must_use]
    pub fn new(header: &'a str, seq: &'a [u8], qual: &'a [u8]) -> Self {
        assert_eq!(seq.len(), qual.len());
        Self { header, seq, qual }
    }

    #[must_use]
    pub fn to_owned_record(&self) -> ReadRecord {
        ReadRecord::new(self.header, self.seq, self.qual)
    }
}
impl SequenceRecord for RefRecord<'_> {
    fn header(&self) -> &str {
        self.header
    }
    fn seq(&self) -> &[u8] {
        self.seq
    }
    fn qual(&self) -> &[u8] {
        self.qual
    }
}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_scores() {
        let record = ReadRecord::new("r0", "ACGT", "!+5I");
        assert_eq!(record.scores().collect::<Vec<_>>(), vec![0, 10, 20, 40]);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_ref_record_roundtrip() {
        let record = RefRecord::new("r1", b"GG", b"??");
        let owned = record.to_owned_record();
        assert_eq!(owned.header(), "r1");
        assert_eq!(owned.seq(), b"GG");
        assert_eq!(owned.qual(), b"??");
    }
}
