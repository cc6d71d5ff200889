//! # pixseq
//!
//! A lossy codec that paints sequencing reads into a lossless raster image, one pixel per base,
//! and reads them back.
//!
//! * The nucleotide picks the pixel's hue and the phred quality (clipped to 40) its saturation,
//!   see [`color`].
//! * Bases are laid out in snake order on a `ceil(sqrt(n))`-wide canvas, see [`layout`].
//! * Both directions process the stream in chunks and report progress, see [`pipeline`].
//! * Record headers can be kept in a `.hdr` sidecar, from which restore re-derives record
//!   boundaries assuming equal read lengths, see [`sidecar`].
//!
//! Decoding never reproduces the input byte for byte: qualities come back within one step of
//! the original, and `N` (or any non-ACGT symbol) comes back as `A`.
//!
//! ```no_run
//! let encoded = pixseq::encode("reads.fastq", true, |p: f64| eprintln!("{p:.0}%")).unwrap();
//! let restored = pixseq::restore(&encoded.output_path, |_: f64| {}).unwrap();
//! println!("{} bases -> {}", restored.total_bases, restored.output_path.display());
//! ```

pub mod codec;
pub mod color;
mod error;
pub mod fastq;
pub mod layout;
pub mod pipeline;
pub mod record;
pub mod sidecar;
mod utils;

pub use codec::{
    encode, restore, EncodeSummary, PixelDecoder, PixelDecoderBuilder, PixelEncoder,
    PixelEncoderBuilder, RasterFormat, RestoreSummary,
};
pub use color::{Nucleotide, Pixel};
pub use error::{CodecError, Error, Result};
pub use pipeline::{Progress, DEFAULT_ENCODE_CHUNK, DEFAULT_RESTORE_CHUNK};
pub use record::{ReadRecord, RefRecord, SequenceRecord};
pub use sidecar::HeaderSidecar;

#[cfg(test)]
mod testing {

    use std::{fs, io::Cursor, path::Path};

    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;
    use crate::color::phred_score;

    fn quiet(_: f64) {}

    fn write_fastq(path: &Path, records: &[ReadRecord]) -> Result<()> {
        let mut writer = fastq::FastqWriter::from_path(path)?;
        for record in records {
            writer.write_record(record)?;
        }
        writer.flush()
    }

    fn random_records(num_records: usize, len: usize, seed: u64) -> Vec<ReadRecord> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..num_records)
            .map(|i| {
                let seq: Vec<u8> = (0..len).map(|_| b"ACGT"[rng.random_range(0..4)]).collect();
                let qual: Vec<u8> = (0..len).map(|_| rng.random_range(b'!'..=b'I')).collect();
                ReadRecord::new(format!("read_{i} sample=7"), seq, qual)
            })
            .collect()
    }

    fn assert_quality_close(restored: &[u8], original: &[u8]) {
        assert_eq!(restored.len(), original.len());
        for (&r, &o) in restored.iter().zip(original) {
            assert!(phred_score(r).abs_diff(phred_score(o).min(40)) <= 1);
        }
    }

    #[test]
    fn test_three_record_example() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("sample.fastq");
        let records = vec![
            ReadRecord::new("r0", "ACGT", "????"),
            ReadRecord::new("r1", "TTTT", "????"),
            ReadRecord::new("r2", "GGCC", "????"),
        ];
        write_fastq(&input, &records)?;

        let encoded = encode(&input, true, quiet)?;
        assert_eq!(encoded.output_path, dir.path().join("sample.fastq.png"));
        assert_eq!(encoded.total_bases, 12);
        assert!(dir.path().join("sample.fastq.hdr").exists());

        let restored = restore(&encoded.output_path, quiet)?;
        assert_eq!(
            restored.output_path,
            dir.path().join("sample.fastq.png.restored.fastq")
        );
        assert_eq!(restored.total_bases, 12);
        assert!(restored.used_sidecar);

        let output = fastq::read_records(&restored.output_path)?;
        assert_eq!(output.len(), 3);
        for (restored, original) in output.iter().zip(&records) {
            assert_eq!(restored.header(), original.header());
            assert_eq!(restored.seq(), original.seq());
            assert_quality_close(restored.qual(), original.qual());
        }
        Ok(())
    }

    #[test]
    fn test_equal_length_records() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("uniform.fastq");
        let records = random_records(37, 150, 42);
        write_fastq(&input, &records)?;

        let encoded = PixelEncoderBuilder::default()
            .preserve_headers(true)
            .chunk_size(1_000)
            .build()
            .encode_path(&input, &mut quiet)?;
        assert_eq!(encoded.total_bases, 37 * 150);
        let restored = restore(&encoded.output_path, quiet)?;
        assert_eq!(restored.num_records, 37);

        let output = fastq::read_records(&restored.output_path)?;
        assert_eq!(output.len(), records.len());
        for (restored, original) in output.iter().zip(&records) {
            assert_eq!(restored.header(), original.header());
            assert_eq!(restored.len(), 150);
            assert_eq!(restored.seq(), original.seq());
            assert_quality_close(restored.qual(), original.qual());
        }
        Ok(())
    }

    #[test]
    fn test_variable_length_records_are_approximated() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let stem = dir.path().join("ragged.fastq");
        let records = vec![
            ReadRecord::new("a", "AAAAA", "IIIII"),
            ReadRecord::new("b", "CC", "II"),
            ReadRecord::new("c", "GGGG", "IIII"),
        ];
        let encoded = PixelEncoderBuilder::default()
            .preserve_headers(true)
            .build()
            .encode_records(&records, &stem, &mut quiet)?;
        restore(&encoded.output_path, quiet)?;

        let output = fastq::read_records(dir.path().join("ragged.fastq.png.restored.fastq"))?;
        // 11 bases over 3 headers: 3, 3, then the remaining 5
        let lengths: Vec<_> = output.iter().map(SequenceRecord::len).collect();
        assert_eq!(lengths, vec![3, 3, 5]);
        let joined: Vec<u8> = output.iter().flat_map(|r| r.seq().to_vec()).collect();
        assert_eq!(joined, b"AAAAACCGGGG");
        Ok(())
    }

    #[test]
    fn test_restore_without_sidecar() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("plain.fastq");
        let records = random_records(5, 20, 1);
        write_fastq(&input, &records)?;

        let encoded = encode(&input, false, quiet)?;
        assert!(encoded.sidecar_path.is_none());
        assert!(!dir.path().join("plain.fastq.hdr").exists());

        let restored = restore(&encoded.output_path, quiet)?;
        assert!(!restored.used_sidecar);
        let output = fastq::read_records(&restored.output_path)?;
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].header(), sidecar::PLACEHOLDER_HEADER);
        let joined: Vec<u8> = records.iter().flat_map(|r| r.seq().to_vec()).collect();
        assert_eq!(output[0].seq(), joined.as_slice());
        Ok(())
    }

    #[test]
    fn test_decode_chunk_invariance() -> Result<()> {
        let records = random_records(10, 101, 9);
        let (image, _dims) = PixelEncoderBuilder::default()
            .build()
            .paint_records(&records, &mut quiet)?;

        let streams: Vec<_> = [1, 1_000, 200_000]
            .into_iter()
            .map(|chunk_size| {
                PixelDecoderBuilder::default()
                    .chunk_size(chunk_size)
                    .build()
                    .decode_image(&image, &mut quiet)
            })
            .collect();
        assert_eq!(streams[0], streams[1]);
        assert_eq!(streams[1], streams[2]);
        assert_eq!(streams[0].len(), 1_010);
        Ok(())
    }

    #[test]
    fn test_encode_chunk_invariance() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let records = random_records(8, 77, 5);
        let mut images = Vec::new();
        for chunk_size in [1, 100, DEFAULT_ENCODE_CHUNK] {
            let encoded = PixelEncoderBuilder::default()
                .chunk_size(chunk_size)
                .build()
                .encode_records(&records, dir.path().join(format!("c{chunk_size}")), &mut quiet)?;
            images.push(fs::read(&encoded.output_path)?);
        }
        assert_eq!(images[0], images[1]);
        assert_eq!(images[1], images[2]);
        Ok(())
    }

    #[test]
    fn test_other_containers() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let records = random_records(3, 33, 3);
        for format in [RasterFormat::Bmp, RasterFormat::Tiff] {
            let stem = dir.path().join(format!("reads_{format}.fastq"));
            let encoded = PixelEncoderBuilder::default()
                .preserve_headers(true)
                .format(format)
                .build()
                .encode_records(&records, &stem, &mut quiet)?;
            let restored = restore(&encoded.output_path, quiet)?;
            assert!(restored.used_sidecar);

            let output = fastq::read_records(&restored.output_path)?;
            assert_eq!(output.len(), 3);
            for (restored, original) in output.iter().zip(&records) {
                assert_eq!(restored.seq(), original.seq());
            }
        }
        Ok(())
    }

    #[test]
    fn test_lowercase_input_is_normalized() -> Result<()> {
        let fastq = b"@x\nacgt\n+\nIIII\n";
        let records = fastq::parse_records(Cursor::new(fastq))?;
        let (image, _) = PixelEncoderBuilder::default()
            .build()
            .paint_records(&records, &mut quiet)?;
        let stream = PixelDecoderBuilder::default()
            .build()
            .decode_image(&image, &mut quiet);
        assert_eq!(stream.bases, b"ACGT");
        Ok(())
    }

    #[test]
    fn test_encode_missing_input() {
        let err = encode("does/not/exist.fastq", false, quiet).unwrap_err();
        assert!(matches!(err, Error::NifflerError(_) | Error::IoError(_)));
    }
}
