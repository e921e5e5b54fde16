use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd (or bgzip'd) or plain text file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    // 256KB buffer, SV call sets carry long INFO columns
    Ok(BufReader::with_capacity(256 * 1024, file))
}

/// True when the path ends in `.gz` or `.bgz`.
pub fn is_gzipped(path: &Path) -> bool {
    matches!(
        path.extension().and_then(OsStr::to_str),
        Some("gz") | Some("bgz")
    )
}

///
/// File name of a VCF with its `.vcf.gz`/`.vcf` suffix removed.
///
/// `sample.vcf.gz` -> `sample`, `calls.vcf` -> `calls`, `other.txt` -> `other.txt`
///
pub fn vcf_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default();

    name.strip_suffix(".vcf.gz")
        .or_else(|| name.strip_suffix(".vcf"))
        .unwrap_or(name)
        .to_string()
}
