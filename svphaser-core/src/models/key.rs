use std::fmt::{self, Display};

///
/// Identity of a structural variant: chromosome, 1-based position, and the raw
/// ID column (`.` when unnamed).
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct SvKey {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
}

impl SvKey {
    pub fn new(chrom: impl Into<String>, pos: u64, id: impl Into<String>) -> Self {
        SvKey {
            chrom: chrom.into(),
            pos,
            id: id.into(),
        }
    }

    ///
    /// The same key shifted one base upstream, or `None` at position 1 and below.
    ///
    pub fn shifted_upstream(&self) -> Option<SvKey> {
        if self.pos <= 1 {
            return None;
        }
        Some(SvKey {
            chrom: self.chrom.clone(),
            pos: self.pos - 1,
            id: self.id.clone(),
        })
    }
}

impl Display for SvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.chrom, self.pos, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_shifted_upstream() {
        let key = SvKey::new("chr1", 1000, "sv1");
        assert_eq!(key.shifted_upstream(), Some(SvKey::new("chr1", 999, "sv1")));
        assert_eq!(SvKey::new("chr1", 1, ".").shifted_upstream(), None);
    }

    #[rstest]
    fn test_display() {
        assert_eq!(SvKey::new("chrX", 42, ".").to_string(), "chrX:42 .");
    }
}
