use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::OptionsError;

/// One `threshold:label` entry: a GQ at or above `threshold` earns `label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GqBin {
    pub threshold: u32,
    pub label: String,
}

///
/// Confidence labels for Phred scores, sorted by threshold descending so that the
/// first bin a score meets wins.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfidenceBins {
    bins: Vec<GqBin>,
}

impl ConfidenceBins {
    ///
    /// Build from arbitrary-order bins. Thresholds must be unique.
    ///
    pub fn new(mut bins: Vec<GqBin>) -> Result<Self, OptionsError> {
        bins.sort_by(|a, b| b.threshold.cmp(&a.threshold));

        if let Some(pair) = bins.windows(2).find(|w| w[0].threshold == w[1].threshold) {
            return Err(OptionsError::DuplicateBinThreshold(pair[0].threshold));
        }

        Ok(ConfidenceBins { bins })
    }

    ///
    /// Label of the highest bin whose threshold `gq` meets or exceeds.
    ///
    pub fn label_for(&self, gq: u8) -> Option<&str> {
        self.bins
            .iter()
            .find(|bin| u32::from(gq) >= bin.threshold)
            .map(|bin| bin.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GqBin> {
        self.bins.iter()
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | ';' | '=' | ':'))
}

impl FromStr for ConfidenceBins {
    type Err = OptionsError;

    ///
    /// Parse `"30:High,10:Moderate"`. A blank string yields no bins.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(ConfidenceBins::default());
        }

        let mut bins = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (threshold, label) = part
                .split_once(':')
                .ok_or_else(|| OptionsError::MalformedBin(part.to_string()))?;

            let threshold = threshold.trim();
            let threshold = threshold
                .parse::<u32>()
                .map_err(|_| OptionsError::InvalidBinThreshold(threshold.to_string()))?;

            let label = label.trim();
            if !is_valid_label(label) {
                return Err(OptionsError::InvalidBinLabel(label.to_string()));
            }

            bins.push(GqBin {
                threshold,
                label: label.to_string(),
            });
        }

        ConfidenceBins::new(bins)
    }
}

impl Display for ConfidenceBins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .bins
            .iter()
            .map(|bin| format!("{}:{}", bin.threshold, bin.label))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn default_bins() -> ConfidenceBins {
        "30:High,10:Moderate".parse().unwrap()
    }

    #[rstest]
    fn test_parse_sorts_descending() {
        let bins: ConfidenceBins = "10:Moderate, 30:High ,0:Low".parse().unwrap();
        let thresholds: Vec<u32> = bins.iter().map(|b| b.threshold).collect();
        assert_eq!(thresholds, vec![30, 10, 0]);
        assert_eq!(bins.to_string(), "30:High,10:Moderate,0:Low");
    }

    #[rstest]
    #[case(99, Some("High"))]
    #[case(30, Some("High"))]
    #[case(29, Some("Moderate"))]
    #[case(10, Some("Moderate"))]
    #[case(9, None)]
    #[case(0, None)]
    fn test_label_for(default_bins: ConfidenceBins, #[case] gq: u8, #[case] expected: Option<&str>) {
        assert_eq!(default_bins.label_for(gq), expected);
    }

    #[rstest]
    fn test_blank_is_empty() {
        let bins: ConfidenceBins = "  ".parse().unwrap();
        assert!(bins.is_empty());
        assert_eq!(bins.label_for(99), None);
    }

    #[rstest]
    #[case("30High", OptionsError::MalformedBin("30High".to_string()))]
    #[case("x:High", OptionsError::InvalidBinThreshold("x".to_string()))]
    #[case("-1:High", OptionsError::InvalidBinThreshold("-1".to_string()))]
    #[case("30:", OptionsError::InvalidBinLabel("".to_string()))]
    #[case("30:Very High", OptionsError::InvalidBinLabel("Very High".to_string()))]
    #[case("30:a=b", OptionsError::InvalidBinLabel("a=b".to_string()))]
    #[case("30:High,30:Top", OptionsError::DuplicateBinThreshold(30))]
    fn test_parse_errors(#[case] spec: &str, #[case] expected: OptionsError) {
        assert_eq!(spec.parse::<ConfidenceBins>().unwrap_err(), expected);
    }
}
