//! VCF variant store.
//!
//! Reads a VCF file (plain text or gzipped/bgzf) without ever holding a reader
//! across calls. Records for a chromosome come from a tabix/CSI query when the
//! file is bgzipped and indexed, and from a linear scan otherwise; both paths
//! yield identical [`VariantRecord`]s in file order.

use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::debug;
use noodles::core::Region;
use noodles::vcf;
use noodles::vcf::variant::record::info::field::Value;
use noodles::vcf::variant::record::Ids as _;

use svphaser_core::consts::{MISSING_ID, MISSING_SVTYPE};
use svphaser_core::utils::{get_dynamic_reader, is_gzipped};

use crate::error::{Result, StoreError};

const INFO_COLUMN: usize = 7;
const MIN_COLUMNS: usize = 8;

/// The fields of a VCF record the phasing engine works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub chrom: String,
    /// 1-based POS
    pub pos: u64,
    /// Raw ID column, `.` when unnamed
    pub id: String,
    pub ref_len: u64,
    pub svtype: String,
    /// 1-based inclusive end, from INFO/END or the REF span
    pub end: u64,
}

impl VariantRecord {
    ///
    /// Assemble a record, resolving its end coordinate.
    ///
    /// INFO/END wins when it does not precede POS; otherwise the end is the last
    /// reference base covered by REF.
    ///
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        id: impl Into<String>,
        ref_len: u64,
        svtype: Option<String>,
        info_end: Option<u64>,
    ) -> Self {
        let ref_end = pos + ref_len.max(1) - 1;
        let end = match info_end {
            Some(end) if end >= pos => end,
            _ => ref_end,
        };

        let id = id.into();
        VariantRecord {
            chrom: chrom.into(),
            pos,
            id: if id.is_empty() { MISSING_ID.to_string() } else { id },
            ref_len,
            svtype: svtype.unwrap_or_else(|| MISSING_SVTYPE.to_string()),
            end,
        }
    }

    ///
    /// Parse one tab-delimited VCF data line (no trailing newline).
    ///
    /// # Arguments
    /// - line: the record text
    /// - line_no: 1-based line number, for error reporting
    ///
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.splitn(MIN_COLUMNS + 1, '\t').collect();
        if fields.len() < MIN_COLUMNS {
            return Err(StoreError::MalformedRecord {
                line: line_no,
                reason: format!("expected at least {} columns, found {}", MIN_COLUMNS, fields.len()),
            });
        }

        let pos = fields[1]
            .parse::<u64>()
            .map_err(|_| StoreError::MalformedRecord {
                line: line_no,
                reason: format!("invalid POS '{}'", fields[1]),
            })?;

        let info = fields[INFO_COLUMN];
        let svtype = info_value(info, "SVTYPE").map(str::to_string);
        let info_end = info_value(info, "END").and_then(|v| v.parse::<u64>().ok());

        Ok(VariantRecord::new(
            fields[0],
            pos,
            fields[2],
            fields[3].len() as u64,
            svtype,
            info_end,
        ))
    }
}

///
/// Value of `key` in a raw INFO column, if present with a value.
///
pub fn info_value<'a>(info: &'a str, key: &str) -> Option<&'a str> {
    info.split(';').find_map(|field| match field.split_once('=') {
        Some((k, v)) if k == key => Some(v),
        _ => None,
    })
}

/// Meta-information and column header lines of a VCF.
#[derive(Debug, Clone, Default)]
pub struct VcfHeader {
    pub meta_lines: Vec<String>,
    pub column_line: Option<String>,
}

impl VcfHeader {
    ///
    /// IDs declared by `##INFO=<ID=...>` lines.
    ///
    pub fn info_ids(&self) -> HashSet<&str> {
        self.meta_lines
            .iter()
            .filter_map(|line| line.strip_prefix("##INFO=<ID="))
            .filter_map(|rest| rest.split([',', '>']).next())
            .collect()
    }

    pub fn declares_info(&self, id: &str) -> bool {
        self.info_ids().contains(id)
    }

    /// Sample names from the `#CHROM` line.
    pub fn samples(&self) -> Vec<&str> {
        self.column_line
            .as_deref()
            .map(|line| line.split('\t').skip(9).collect())
            .unwrap_or_default()
    }
}

///
/// Handle on an SV call set on disk.
///
/// Holds only the path. Every operation opens its own reader, so a worker
/// never shares a file position with another.
///
#[derive(Debug, Clone)]
pub struct VariantStore {
    path: PathBuf,
}

impl VariantStore {
    ///
    /// Check the file is readable and return a handle on it.
    ///
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = VariantStore {
            path: path.as_ref().to_path_buf(),
        };
        store.reader()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    ///
    /// A fresh buffered reader positioned at the first byte of the file.
    ///
    pub fn reader(&self) -> Result<BufReader<Box<dyn Read>>> {
        get_dynamic_reader(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })
    }

    ///
    /// Path of a `.tbi` or `.csi` next to a bgzipped VCF, if any.
    ///
    pub fn index_path(&self) -> Option<PathBuf> {
        if !is_gzipped(&self.path) {
            return None;
        }
        ["tbi", "csi"].iter().find_map(|ext| {
            let mut candidate = self.path.clone().into_os_string();
            candidate.push(".");
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            candidate.exists().then_some(candidate)
        })
    }

    pub fn is_indexed(&self) -> bool {
        self.index_path().is_some()
    }

    ///
    /// Read the `##` meta lines and the `#CHROM` line.
    ///
    pub fn read_header(&self) -> Result<VcfHeader> {
        let reader = self.reader()?;
        let mut header = VcfHeader::default();

        for line in reader.lines() {
            let line = line?;
            if line.starts_with("##") {
                header.meta_lines.push(line);
            } else {
                if line.starts_with('#') {
                    header.column_line = Some(line);
                }
                break;
            }
        }

        Ok(header)
    }

    ///
    /// Distinct chromosome names in first-seen order.
    ///
    /// Only the CHROM column is looked at, so this is much cheaper than parsing
    /// records, and it cannot miss a chromosome absent from `##contig` lines.
    ///
    pub fn chromosomes(&self) -> Result<Vec<String>> {
        let mut reader = self.reader()?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut chroms = Vec::new();
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            if line.starts_with('#') {
                continue;
            }
            let chrom = line.split(['\t', '\n', '\r']).next().unwrap_or_default();
            if chrom.is_empty() {
                continue;
            }
            if !seen.contains(chrom) {
                seen.insert(chrom.to_string());
                chroms.push(chrom.to_string());
            }
        }

        Ok(chroms)
    }

    ///
    /// Records on `chrom` in file order, through the index when one exists.
    ///
    pub fn records_for_chrom(&self, chrom: &str) -> Result<Vec<VariantRecord>> {
        if self.is_indexed() {
            debug!("{}: indexed query on {}", chrom, self.path.display());
            self.indexed_records(chrom)
        } else {
            debug!("{}: linear scan of {}", chrom, self.path.display());
            self.linear_records(chrom)
        }
    }

    ///
    /// Full pass over the file keeping records whose CHROM is `chrom`.
    ///
    pub fn linear_records(&self, chrom: &str) -> Result<Vec<VariantRecord>> {
        let mut reader = self.reader()?;
        let mut records = Vec::new();
        let mut line_buf = String::new();
        let mut line_no = 0;

        loop {
            line_buf.clear();
            if reader.read_line(&mut line_buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = line_buf.trim_end_matches('\n').trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // cheap reject before splitting the whole line
            match line.split_once('\t') {
                Some((c, _)) if c == chrom => {}
                _ => continue,
            }

            records.push(VariantRecord::from_line(line, line_no)?);
        }

        Ok(records)
    }

    ///
    /// Tabix/CSI region query for every record on `chrom`.
    ///
    pub fn indexed_records(&self, chrom: &str) -> Result<Vec<VariantRecord>> {
        let index_error = |reason: String| StoreError::Index {
            path: self.path.clone(),
            reason,
        };

        let mut reader = vcf::io::indexed_reader::Builder::default()
            .build_from_path(&self.path)
            .map_err(|source| StoreError::Open {
                path: self.path.clone(),
                source,
            })?;
        let header = reader.read_header()?;

        let region: Region = chrom
            .parse()
            .map_err(|e| index_error(format!("invalid region {}: {:?}", chrom, e)))?;
        let query = reader
            .query(&header, &region)
            .map_err(|e| index_error(e.to_string()))?;

        let mut records = Vec::new();
        for (i, result) in query.enumerate() {
            let record = result?;
            let malformed = |reason: String| StoreError::MalformedRecord {
                line: i + 1,
                reason: format!("{} (record {} of {} index query)", reason, i + 1, chrom),
            };

            let pos = match record.variant_start() {
                Some(Ok(position)) => usize::from(position) as u64,
                Some(Err(e)) => return Err(malformed(format!("invalid POS: {}", e))),
                None => return Err(malformed("missing POS".to_string())),
            };

            let record_ids = record.ids();
            let ids: Vec<&str> = record_ids.iter().collect();
            let id = if ids.is_empty() {
                MISSING_ID.to_string()
            } else {
                ids.join(";")
            };

            let mut svtype = None;
            let mut info_end = None;
            for field in record.info().iter(&header) {
                let (key, value) = field?;
                match (key, value) {
                    ("SVTYPE", Some(Value::String(s))) => svtype = Some(s.to_string()),
                    ("END", Some(Value::Integer(n))) => info_end = u64::try_from(n).ok(),
                    ("END", Some(Value::String(s))) => info_end = s.parse::<u64>().ok(),
                    _ => {}
                }
            }

            records.push(VariantRecord::new(
                record.reference_sequence_name(),
                pos,
                id,
                record.reference_bases().len() as u64,
                svtype,
                info_end,
            ));
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const HEADER: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chr1>\n\
##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of SV\">\n\
##INFO=<ID=END,Number=1,Type=Integer,Description=\"End position\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tHG002\n";

    const BODY: &str = "chr1\t1000\tsv1\tN\t<DEL>\t60\tPASS\tSVTYPE=DEL;END=1500\tGT\t0/1\n\
chr2\t500\t.\tACGT\tA\t.\tPASS\t.\tGT\t1/1\n\
chr1\t2000\tsv3\tN\t<INS>\t.\tPASS\tSVTYPE=INS;SVLEN=300\tGT\t0/1\n\
chrX\t10\tsv4\tN\t<DUP>\t.\tLowQual\tSVTYPE=DUP;END=5\tGT\t0/1\n";

    #[fixture]
    fn vcf_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("calls.vcf")).unwrap();
        write!(f, "{}{}", HEADER, BODY).unwrap();

        let gz = File::create(dir.path().join("calls.vcf.gz")).unwrap();
        let mut encoder = GzEncoder::new(gz, Compression::default());
        write!(encoder, "{}{}", HEADER, BODY).unwrap();
        encoder.finish().unwrap();

        dir
    }

    #[rstest]
    fn test_from_line_uses_info_end() {
        let rec = VariantRecord::from_line("chr1\t1000\tsv1\tN\t<DEL>\t60\tPASS\tSVTYPE=DEL;END=1500", 1)
            .unwrap();
        assert_eq!(rec, VariantRecord::new("chr1", 1000, "sv1", 1, Some("DEL".to_string()), Some(1500)));
        assert_eq!(rec.end, 1500);
    }

    #[rstest]
    fn test_from_line_falls_back_to_ref_span() {
        let rec = VariantRecord::from_line("chr2\t500\t.\tACGT\tA\t.\tPASS\t.", 3).unwrap();
        assert_eq!(rec.end, 503);
        assert_eq!(rec.svtype, "NA");
        assert_eq!(rec.id, ".");
    }

    #[rstest]
    fn test_from_line_ignores_end_before_pos() {
        let rec = VariantRecord::from_line("chrX\t10\tsv4\tN\t<DUP>\t.\tLowQual\tSVTYPE=DUP;END=5", 1).unwrap();
        assert_eq!(rec.end, 10);
    }

    #[rstest]
    #[case("chr1\t1000\tsv1\tN\t<DEL>\t60\tPASS")]
    #[case("chr1\tabc\tsv1\tN\t<DEL>\t60\tPASS\t.")]
    fn test_from_line_malformed(#[case] line: &str) {
        let err = VariantRecord::from_line(line, 7).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { line: 7, .. }));
    }

    #[rstest]
    fn test_info_value() {
        assert_eq!(info_value("SVTYPE=DEL;END=10;IMPRECISE", "END"), Some("10"));
        assert_eq!(info_value("SVTYPE=DEL;IMPRECISE", "IMPRECISE"), None);
        assert_eq!(info_value(".", "SVTYPE"), None);
    }

    #[rstest]
    #[case("calls.vcf")]
    #[case("calls.vcf.gz")]
    fn test_chromosomes_first_seen_order(vcf_dir: tempfile::TempDir, #[case] name: &str) {
        let store = VariantStore::open(vcf_dir.path().join(name)).unwrap();
        assert_eq!(store.chromosomes().unwrap(), vec!["chr1", "chr2", "chrX"]);
    }

    #[rstest]
    fn test_linear_records_keep_file_order(vcf_dir: tempfile::TempDir) {
        let store = VariantStore::open(vcf_dir.path().join("calls.vcf")).unwrap();
        assert!(!store.is_indexed());

        let records = store.records_for_chrom("chr1").unwrap();
        let positions: Vec<u64> = records.iter().map(|r| r.pos).collect();
        assert_eq!(positions, vec![1000, 2000]);
        assert_eq!(records[1].svtype, "INS");

        assert!(store.records_for_chrom("chr7").unwrap().is_empty());
    }

    #[rstest]
    fn test_gz_without_index_scans_linearly(vcf_dir: tempfile::TempDir) {
        let plain = VariantStore::open(vcf_dir.path().join("calls.vcf")).unwrap();
        let gz = VariantStore::open(vcf_dir.path().join("calls.vcf.gz")).unwrap();
        assert!(gz.index_path().is_none());
        assert_eq!(
            gz.records_for_chrom("chr1").unwrap(),
            plain.records_for_chrom("chr1").unwrap()
        );
    }

    // coordinate-sorted, as tabix requires
    const SORTED_BODY: &str = "chr1\t1000\tsv1;alt1\tN\t<DEL>\t60\tPASS\tSVTYPE=DEL;END=1500\tGT\t0/1\n\
chr1\t2000\tsv3\tN\t<INS>\t.\tPASS\tSVTYPE=INS\tGT\t0/1\n\
chr2\t500\t.\tACGT\tA\t.\tPASS\t.\tGT\t1/1\n\
chrX\t10\tsv4\tN\t<DUP>\t.\tLowQual\tSVTYPE=DUP;END=40\tGT\t0/1\n";

    fn write_indexed_vcf(dir: &Path) -> PathBuf {
        let path = dir.join("sorted.vcf.gz");
        let mut writer = noodles::bgzf::Writer::new(File::create(&path).unwrap());
        write!(writer, "{}{}", HEADER, SORTED_BODY).unwrap();
        writer.finish().unwrap();

        let index = noodles::vcf::index(&path).unwrap();
        let mut tbi = path.clone().into_os_string();
        tbi.push(".tbi");
        noodles::tabix::write(PathBuf::from(tbi), &index).unwrap();
        path
    }

    #[rstest]
    fn test_indexed_records_match_linear_scan() {
        let dir = tempfile::tempdir().unwrap();
        let store = VariantStore::open(write_indexed_vcf(dir.path())).unwrap();
        assert!(store.is_indexed());

        let chroms = store.chromosomes().unwrap();
        assert_eq!(chroms, vec!["chr1", "chr2", "chrX"]);
        for chrom in &chroms {
            assert_eq!(
                store.indexed_records(chrom).unwrap(),
                store.linear_records(chrom).unwrap(),
                "{}",
                chrom
            );
        }

        let chr1 = store.records_for_chrom("chr1").unwrap();
        assert_eq!(chr1.len(), 2);
        assert_eq!(chr1[0].id, "sv1;alt1");
        assert_eq!((chr1[0].svtype.as_str(), chr1[0].end), ("DEL", 1500));

        let chr2 = store.indexed_records("chr2").unwrap();
        assert_eq!(
            chr2,
            vec![VariantRecord::new("chr2", 500, ".", 4, None, None)]
        );
        assert_eq!((chr2[0].end, chr2[0].svtype.as_str()), (503, "NA"));

        let chr_x = store.indexed_records("chrX").unwrap();
        assert_eq!(chr_x[0].end, 40);
    }

    #[rstest]
    fn test_read_header(vcf_dir: tempfile::TempDir) {
        let store = VariantStore::open(vcf_dir.path().join("calls.vcf")).unwrap();
        let header = store.read_header().unwrap();

        assert_eq!(header.meta_lines.len(), 4);
        assert!(header.declares_info("SVTYPE"));
        assert!(header.declares_info("END"));
        assert!(!header.declares_info("HP_GT"));
        assert_eq!(header.samples(), vec!["HG002"]);
    }

    #[rstest]
    fn test_open_missing_file() {
        let err = VariantStore::open("/no/such/calls.vcf").unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }));
    }
}
