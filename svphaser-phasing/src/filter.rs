use svphaser_core::CallRecord;

///
/// Split calls into those with `min_support` reads on at least one haplotype and
/// those without. Order within each side is preserved.
///
pub fn depth_filter(calls: Vec<CallRecord>, min_support: u32) -> (Vec<CallRecord>, Vec<CallRecord>) {
    calls
        .into_iter()
        .partition(|call| call.has_haplotype_support(min_support))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use svphaser_core::Genotype;

    fn call(id: &str, n1: u32, n2: u32) -> CallRecord {
        CallRecord {
            ordinal: 0,
            chrom: "chr1".to_string(),
            pos: 100,
            id: id.to_string(),
            svtype: "DEL".to_string(),
            n1,
            n2,
            genotype: Genotype::Unphased,
            gq: 0,
            gq_label: None,
        }
    }

    #[rstest]
    fn test_depth_filter_partitions() {
        let calls = vec![call("a", 12, 0), call("b", 4, 7), call("c", 0, 10), call("d", 9, 9)];
        let (kept, dropped) = depth_filter(calls.clone(), 10);

        let ids = |v: &[CallRecord]| v.iter().map(|c| c.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&kept), vec!["a", "c"]);
        assert_eq!(ids(&dropped), vec!["b", "d"]);
        assert_eq!(kept.len() + dropped.len(), calls.len());
    }

    #[rstest]
    fn test_summed_support_is_not_enough() {
        // 11 reads in total but neither haplotype reaches 10
        let (kept, dropped) = depth_filter(vec![call("x", 4, 7)], 10);
        assert!(kept.is_empty());
        assert_eq!(dropped.len(), 1);
    }

    #[rstest]
    fn test_zero_support_keeps_everything() {
        let (kept, dropped) = depth_filter(vec![call("x", 0, 0)], 0);
        assert_eq!(kept.len(), 1);
        assert!(dropped.is_empty());
    }
}
