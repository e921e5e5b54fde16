use svphaser_io::{EvidenceSource, ReadEvidence, Result};

/// Bases of padding added on each side of a variant before fetching reads.
pub const FETCH_PADDING: u64 = 1;

fn counts_towards_phasing(read: &ReadEvidence) -> bool {
    !(read.is_unmapped || read.is_secondary || read.is_supplementary)
}

///
/// Count haplotype-1 and haplotype-2 reads around a variant.
///
/// The source is queried over `[start - 1, end + 1]`. Unmapped, secondary and
/// supplementary reads are skipped whatever their label, as are reads with no HP
/// tag or a label other than 1 or 2.
///
/// # Arguments
/// - source: where reads come from
/// - chrom: chromosome of the variant
/// - start: 1-based first base of the variant
/// - end: 1-based last base of the variant
///
pub fn count_hp_reads<S: EvidenceSource + ?Sized>(
    source: &mut S,
    chrom: &str,
    start: u64,
    end: u64,
) -> Result<(u32, u32)> {
    let fetch_start = start.saturating_sub(FETCH_PADDING).max(1);
    let fetch_end = end.max(start) + FETCH_PADDING;

    let mut hp1 = 0;
    let mut hp2 = 0;
    for read in source.fetch(chrom, fetch_start, fetch_end)? {
        if !counts_towards_phasing(&read) {
            continue;
        }
        match read.haplotype {
            Some(1) => hp1 += 1,
            Some(2) => hp2 += 1,
            _ => {}
        }
    }

    Ok((hp1, hp2))
}
