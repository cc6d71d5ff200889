use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Appends `.suffix` to a path without replacing any existing extension
///
/// `reads.fastq` becomes `reads.fastq.png`, where [`Path::with_extension`] would give
/// `reads.png`.
pub fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
