//! Output writers: the CSV call tables and the annotated VCF.
//!
//! The annotated VCF is produced from the raw input bytes, not from re-serialised
//! records, so every field we do not touch comes out exactly as it went in.

use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, Write};

use log::{debug, warn};

use svphaser_core::consts::{INFO_GQ_KEY, INFO_GQBIN_KEY, INFO_GT_KEY};
use svphaser_core::{CallRecord, SvKey};
use svphaser_io::{StoreError, VariantRecord, VariantStore, VcfHeader};

use crate::errors::Result;

pub const TABLE_COLUMNS: [&str; 8] = ["chrom", "pos", "id", "svtype", "n1", "n2", "gt", "gq"];
pub const TABLE_LABEL_COLUMN: &str = "gq_label";

/// INFO declarations added to the output header, one per injected key.
pub fn info_header_lines() -> [String; 3] {
    [
        format!(
            "##INFO=<ID={},Number=1,Type=String,Description=\"Haplotype genotype from HP-tagged reads\">",
            INFO_GT_KEY
        ),
        format!(
            "##INFO=<ID={},Number=1,Type=Integer,Description=\"Phred-scaled confidence of {}\">",
            INFO_GQ_KEY, INFO_GT_KEY
        ),
        format!(
            "##INFO=<ID={},Number=1,Type=String,Description=\"Confidence bin of {}\">",
            INFO_GQBIN_KEY, INFO_GQ_KEY
        ),
    ]
}

///
/// Fail if the input header already declares one of the keys we inject.
///
pub fn check_annotation_keys(header: &VcfHeader) -> svphaser_io::Result<()> {
    let declared = header.info_ids();
    for key in [INFO_GT_KEY, INFO_GQ_KEY, INFO_GQBIN_KEY] {
        if declared.contains(key) {
            return Err(StoreError::AnnotationCollision(key.to_string()));
        }
    }
    Ok(())
}

///
/// Write `calls` as CSV, one row per call in the order given.
///
/// With `with_label` an extra `gq_label` column is written, left empty for calls
/// that fell below every bin.
///
pub fn write_call_table<W: Write>(out: W, calls: &[CallRecord], with_label: bool) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header: Vec<&str> = TABLE_COLUMNS.to_vec();
    if with_label {
        header.push(TABLE_LABEL_COLUMN);
    }
    wtr.write_record(&header)?;

    for call in calls {
        let mut row = vec![
            call.chrom.clone(),
            call.pos.to_string(),
            call.id.clone(),
            call.svtype.clone(),
            call.n1.to_string(),
            call.n2.to_string(),
            call.genotype.to_string(),
            call.gq.to_string(),
        ];
        if with_label {
            row.push(call.gq_label.clone().unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Counts from one pass of [`annotate_vcf`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    /// records that received annotations, fallbacks included
    pub annotated: usize,
    /// matches found only at `pos - 1`
    pub fallback_matches: usize,
    /// records whose call the depth filter dropped, written without annotations
    pub filtered: usize,
    /// records with no call at all, written without annotations
    pub unmatched_variants: usize,
    /// calls no record consumed
    pub unused_calls: usize,
    /// keys shared by more than one call
    pub duplicate_keys: usize,
}

/// A call waiting for its record, and whether it passed the depth filter.
#[derive(Clone, Copy)]
struct Pending<'a> {
    call: &'a CallRecord,
    kept: bool,
}

/// Calls waiting to be matched. Each key's queue is in file order and consumed
/// front first.
struct CallIndex<'a> {
    pending: HashMap<SvKey, VecDeque<Pending<'a>>>,
}

impl<'a> CallIndex<'a> {
    fn new(kept: &'a [CallRecord], dropped: &'a [CallRecord]) -> Self {
        let mut grouped: HashMap<SvKey, Vec<Pending<'a>>> = HashMap::new();
        let tagged = kept
            .iter()
            .map(|call| Pending { call, kept: true })
            .chain(dropped.iter().map(|call| Pending { call, kept: false }));
        for entry in tagged {
            grouped.entry(entry.call.key()).or_default().push(entry);
        }

        let pending = grouped
            .into_iter()
            .map(|(key, mut queue)| {
                queue.sort_by_key(|p| p.call.ordinal);
                (key, VecDeque::from(queue))
            })
            .collect();
        CallIndex { pending }
    }

    /// Keys held by more than one call, sorted.
    fn shared_keys(&self) -> Vec<(&SvKey, usize)> {
        let mut shared: Vec<(&SvKey, usize)> = self
            .pending
            .iter()
            .filter(|(_, queue)| queue.len() > 1)
            .map(|(key, queue)| (key, queue.len()))
            .collect();
        shared.sort();
        shared
    }

    fn take(&mut self, key: &SvKey) -> Option<Pending<'a>> {
        let queue = self.pending.get_mut(key)?;
        let entry = queue.pop_front();
        if queue.is_empty() {
            self.pending.remove(key);
        }
        entry
    }

    fn remaining(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }
}

fn annotation_fields(call: &CallRecord) -> String {
    let mut fields = format!(
        "{}={};{}={}",
        INFO_GT_KEY, call.genotype, INFO_GQ_KEY, call.gq
    );
    if let Some(label) = &call.gq_label {
        fields.push_str(&format!(";{}={}", INFO_GQBIN_KEY, label));
    }
    fields
}

/// Split a raw line into its content and its terminator (`\n`, `\r\n` or none).
fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    if line.ends_with(b"\r\n") {
        line.split_at(line.len() - 2)
    } else if line.ends_with(b"\n") {
        line.split_at(line.len() - 1)
    } else {
        (line, &[])
    }
}

/// Rewrite the INFO column of a data line, leaving every other byte alone.
fn inject_info(content: &str, call: &CallRecord) -> String {
    let extra = annotation_fields(call);
    content
        .split('\t')
        .enumerate()
        .map(|(i, field)| match i {
            7 if field.is_empty() || field == "." => extra.clone(),
            7 => format!("{};{}", field, extra),
            _ => field.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

///
/// Copy the store's VCF to `out`, injecting `HP_GT`, `HP_GQ` and, when labelled,
/// `HP_GQBIN` into every record that has a call.
///
/// A record looks up its call by `(chrom, pos, id)`, then by `(chrom, pos - 1, id)`.
/// Kept and dropped calls are matched together, so each record consumes the call
/// made from it even when several records share a key. Only kept calls are
/// written. Records whose call was dropped, or that have none, are passed
/// through unannotated. The three INFO declarations go in before `#CHROM`, or
/// before the first record when the file has no column header line.
///
pub fn annotate_vcf<W: Write>(
    store: &VariantStore,
    kept: &[CallRecord],
    dropped: &[CallRecord],
    out: &mut W,
) -> Result<AnnotationReport> {
    let mut reader = store.reader()?;
    let mut index = CallIndex::new(kept, dropped);
    let mut report = AnnotationReport::default();

    let shared = index.shared_keys();
    for (key, count) in &shared {
        warn!("{}: {} records share this key, matched in file order", key, count);
    }
    report.duplicate_keys = shared.len();
    let mut declared = false;

    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        if buf.starts_with(b"##") {
            out.write_all(&buf)?;
            continue;
        }

        if !declared {
            for line in info_header_lines() {
                writeln!(out, "{}", line)?;
            }
            declared = true;
        }

        let (content, terminator) = split_terminator(&buf);
        if content.is_empty() || content.starts_with(b"#") {
            out.write_all(&buf)?;
            continue;
        }

        let content = std::str::from_utf8(content).map_err(|e| StoreError::MalformedRecord {
            line: line_no,
            reason: format!("not valid UTF-8: {}", e),
        })?;
        let record = VariantRecord::from_line(content, line_no)?;
        let key = SvKey::new(record.chrom, record.pos, record.id);

        let mut call = index.take(&key);
        if call.is_none() {
            call = key.shifted_upstream().and_then(|shifted| index.take(&shifted));
            if call.is_some() {
                report.fallback_matches += 1;
                debug!("{}: matched a call at pos - 1", key);
            }
        }

        match call {
            Some(Pending { call, kept: true }) => {
                out.write_all(inject_info(content, call).as_bytes())?;
                out.write_all(terminator)?;
                report.annotated += 1;
            }
            Some(Pending { kept: false, .. }) => {
                debug!("{}: call below depth, written unannotated", key);
                out.write_all(&buf)?;
                report.filtered += 1;
            }
            None => {
                warn!("{}: no phased call, written unannotated", key);
                out.write_all(&buf)?;
                report.unmatched_variants += 1;
            }
        }
    }

    if !declared {
        for line in info_header_lines() {
            writeln!(out, "{}", line)?;
        }
    }

    report.unused_calls = index.remaining();
    if report.unused_calls > 0 {
        warn!(
            "{} phased calls did not match any VCF record",
            report.unused_calls
        );
    }

    out.flush()?;
    Ok(report)
}
