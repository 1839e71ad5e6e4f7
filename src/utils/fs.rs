//! File system utilities.

use filetime::FileTime;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Split a file name into stem and extension.
///
/// A trailing dot is part of the stem: `foo.` has no extension.
fn split_name(path: &Path) -> (Option<&OsStr>, Option<&OsStr>) {
    match path.extension() {
        Some(ext) if ext.is_empty() => (path.file_name(), None),
        ext => (path.file_stem(), ext),
    }
}

/// File name without its last extension, lossily decoded.
pub fn stem_str(path: &Path) -> String {
    split_name(path)
        .0
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Insert `tag` between the file stem and the extension.
///
/// `dir/foo.txt` becomes `dir/foo<tag>.txt`; a file without an extension
/// simply gets the tag appended.
pub fn tagged_path(path: &Path, tag: &str) -> PathBuf {
    let (stem, ext) = split_name(path);
    let mut name = OsString::new();
    if let Some(stem) = stem {
        name.push(stem);
    }
    name.push(tag);
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Copy a file's contents and permissions, then its access and modification times.
pub fn copy_with_metadata(from: &Path, to: &Path) -> io::Result<u64> {
    let bytes = fs::copy(from, to)?;
    let metadata = fs::metadata(from)?;
    filetime::set_file_times(
        to,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )?;
    Ok(bytes)
}
