//! The per-chromosome unit of work.

use log::debug;

use svphaser_core::{CallRecord, WorkerOpts};
use svphaser_io::{EvidenceOpener, Result, VariantStore};

use crate::algorithms::classify;
use crate::counting::count_hp_reads;

///
/// Phase every variant on `chrom`, in file order.
///
/// Opens its own evidence source and reads the store through its own file
/// handle, so any number of these can run side by side. Either every variant on
/// the chromosome yields a call or the whole unit fails.
///
pub fn phase_chromosome<O: EvidenceOpener>(
    chrom: &str,
    store: &VariantStore,
    opener: &O,
    opts: &WorkerOpts,
) -> Result<Vec<CallRecord>> {
    let mut source = opener.open()?;
    let records = store.records_for_chrom(chrom)?;
    debug!("{}: {} records to phase", chrom, records.len());

    let mut calls = Vec::with_capacity(records.len());
    for (ordinal, rec) in records.into_iter().enumerate() {
        let (n1, n2) = count_hp_reads(&mut source, &rec.chrom, rec.pos, rec.end)?;
        let (genotype, gq) = classify(n1, n2, opts);
        let gq_label = opts.gq_bins().label_for(gq).map(str::to_string);

        calls.push(CallRecord {
            ordinal,
            chrom: rec.chrom,
            pos: rec.pos,
            id: rec.id,
            svtype: rec.svtype,
            n1,
            n2,
            genotype,
            gq,
            gq_label,
        });
    }

    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use svphaser_core::{ConfidenceBins, Genotype};
    use svphaser_io::evidence::PlacedRead;
    use svphaser_io::{InMemoryEvidence, ReadEvidence, StoreError};

    fn reads_at(chrom: &str, pos: u64, hp1: usize, hp2: usize) -> Vec<PlacedRead> {
        let mut reads = Vec::new();
        for (hp, n) in [(1, hp1), (2, hp2)] {
            for _ in 0..n {
                reads.push(PlacedRead {
                    chrom: chrom.to_string(),
                    start: pos - 50,
                    end: pos + 50,
                    evidence: ReadEvidence::primary(Some(hp)),
                });
            }
        }
        reads
    }

    #[fixture]
    fn store() -> (tempfile::TempDir, VariantStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.vcf");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "##fileformat=VCFv4.2").unwrap();
        writeln!(f, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO").unwrap();
        writeln!(f, "chr1\t1000\tsvA\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL;END=1040").unwrap();
        writeln!(f, "chr2\t1000\tsvB\tN\t<INS>\t.\tPASS\tSVTYPE=INS").unwrap();
        writeln!(f, "chr1\t5000\t.\tN\t<DUP>\t.\tPASS\tSVTYPE=DUP;END=5010").unwrap();
        let store = VariantStore::open(&path).unwrap();
        (dir, store)
    }

    #[rstest]
    fn test_phase_chromosome(store: (tempfile::TempDir, VariantStore)) {
        let (_dir, store) = store;
        let mut reads = reads_at("chr1", 1000, 8, 2);
        reads.extend(reads_at("chr1", 5000, 6, 6));
        reads.extend(reads_at("chr2", 1000, 0, 12));
        let evidence = InMemoryEvidence::new(reads);

        let bins: ConfidenceBins = "30:High,10:Moderate".parse().unwrap();
        let opts = WorkerOpts::new(5, 0.7, 0.2, bins).unwrap();

        let calls = phase_chromosome("chr1", &store, &evidence, &opts).unwrap();
        assert_eq!(calls.len(), 2);

        assert_eq!(calls[0].id, "svA");
        assert_eq!((calls[0].n1, calls[0].n2), (8, 2));
        assert_eq!(calls[0].genotype, Genotype::Hap1);
        assert_eq!(calls[0].gq, 13);
        assert_eq!(calls[0].gq_label.as_deref(), Some("Moderate"));

        assert_eq!(calls[1].id, ".");
        assert_eq!((calls[0].ordinal, calls[1].ordinal), (0, 1));
        assert_eq!(calls[1].svtype, "DUP");
        assert_eq!(calls[1].genotype, Genotype::Both);
        assert_eq!(calls[1].gq_label, None);

        let chr2 = phase_chromosome("chr2", &store, &evidence, &opts).unwrap();
        assert_eq!(chr2[0].genotype, Genotype::Hap2);
        assert_eq!(chr2[0].gq_label.as_deref(), Some("High"));
    }

    struct FailingOpener;

    impl EvidenceOpener for FailingOpener {
        type Source = InMemoryEvidence;

        fn open(&self) -> Result<InMemoryEvidence> {
            Err(StoreError::Evidence {
                chrom: "*".to_string(),
                reason: "index missing".to_string(),
            })
        }
    }

    #[rstest]
    fn test_unit_fails_when_source_cannot_open(store: (tempfile::TempDir, VariantStore)) {
        let (_dir, store) = store;
        let res = phase_chromosome("chr1", &store, &FailingOpener, &WorkerOpts::default());
        assert!(matches!(res, Err(StoreError::Evidence { .. })));
    }
}
