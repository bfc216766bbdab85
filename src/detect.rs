//! Input discovery and PDF header validation.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const HEADER_LEN: usize = 8; // "%PDF-1.7"

/// Read the version from a PDF header ("%PDF-1.7" -> "1.7").
pub fn pdf_version(header: &[u8]) -> Result<String> {
    if header.len() < HEADER_LEN || !header.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &header[PDF_MAGIC.len()..HEADER_LEN];
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(String::from_utf8_lossy(version).into_owned())
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Validate that a file starts with a PDF header and return its version.
pub fn check_pdf_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = [0u8; HEADER_LEN];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    pdf_version(&header[..read])
}

/// Check whether a path names a file with a `.pdf` extension (any case).
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// List the PDF files directly inside `dir`, sorted by file name.
///
/// Sorting keeps the document order (and therefore tie-breaks in ranking)
/// independent of the filesystem's directory iteration order.
pub fn collect_pdfs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Document identifier used in reports: the file name without directories.
pub fn document_id<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
