//! Majority-vote error detection.
//!
//! The vote over a triple is total: `000` and `111` carry no error, and each
//! of the six remaining triples has exactly one minority bit whose position
//! is the flipped qubit.

use serde::{Deserialize, Serialize};

use super::bits::{BitTriple, Counts};
use crate::error::CodeResult;
use crate::simulators::Outcome;

/// Result of voting over one measured triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityVote {
    /// The value held by at least two of the three bits.
    pub majority_bit: Outcome,
    /// Whether the bits disagree.
    pub error_detected: bool,
    /// Position of the minority bit, when there is one.
    pub error_position: Option<usize>,
}

/// Vote over a measured triple.
pub fn majority_vote(bits: BitTriple) -> MajorityVote {
    let majority_bit = if bits.count(Outcome::One) >= 2 {
        Outcome::One
    } else {
        Outcome::Zero
    };

    let error_position = bits.bits().iter().position(|&b| b != majority_bit);

    MajorityVote {
        majority_bit,
        error_detected: error_position.is_some(),
        error_position,
    }
}

/// Vote over a literal bit string such as `"010"`.
pub fn majority_vote_str(bits: &str) -> CodeResult<MajorityVote> {
    Ok(majority_vote(bits.parse()?))
}

/// The triple with its minority bit replaced by the majority bit.
pub fn correct(bits: BitTriple) -> BitTriple {
    BitTriple::uniform(majority_vote(bits).majority_bit)
}

/// Vote and share of shots for one observed outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeAnalysis {
    pub bits: BitTriple,
    pub count: usize,
    pub percentage: f64,
    pub corrected_to: BitTriple,
    pub vote: MajorityVote,
}

/// Majority-vote analysis of every outcome in a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementAnalysis {
    pub total_shots: usize,
    /// Most frequent outcome first.
    pub outcomes: Vec<OutcomeAnalysis>,
}

impl MeasurementAnalysis {
    /// Shots whose triple showed a disagreement.
    pub fn shots_with_error(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.vote.error_detected)
            .map(|o| o.count)
            .sum()
    }
}

/// Run the majority vote over each distinct outcome in `counts`.
pub fn analyze(counts: &Counts) -> MeasurementAnalysis {
    let total_shots = counts.total();

    let mut outcomes: Vec<OutcomeAnalysis> = counts
        .iter()
        .map(|(&bits, &count)| OutcomeAnalysis {
            bits,
            count,
            percentage: count as f64 * 100.0 / total_shots.max(1) as f64,
            corrected_to: correct(bits),
            vote: majority_vote(bits),
        })
        .collect();

    // Stable sort keeps bit-string order among equal counts
    outcomes.sort_by(|a, b| b.count.cmp(&a.count));

    MeasurementAnalysis {
        total_shots,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodeError;

    fn vote(s: &str) -> MajorityVote {
        majority_vote_str(s).unwrap()
    }

    #[test]
    fn test_unanimous_triples_carry_no_error() {
        let zero = vote("000");
        assert_eq!(zero.majority_bit, Outcome::Zero);
        assert!(!zero.error_detected);
        assert_eq!(zero.error_position, None);

        let one = vote("111");
        assert_eq!(one.majority_bit, Outcome::One);
        assert!(!one.error_detected);
        assert_eq!(one.error_position, None);
    }

    #[test]
    fn test_minority_position_is_reported() {
        assert_eq!(vote("100").error_position, Some(0));
        assert_eq!(vote("011").error_position, Some(0));
        assert_eq!(vote("101").error_position, Some(1));
        assert_eq!(vote("110").majority_bit, Outcome::One);
    }

    #[test]
    fn test_correct_restores_codeword() {
        assert_eq!(correct("010".parse().unwrap()).to_string(), "000");
        assert_eq!(correct("110".parse().unwrap()).to_string(), "111");
    }

    #[test]
    fn test_invalid_input_fails_fast() {
        assert!(matches!(majority_vote_str("0110"), Err(CodeError::InvalidBitString(_))));
    }

    #[test]
    fn test_analyze_orders_by_frequency() {
        let counts: Counts = [
            ("000".parse::<BitTriple>().unwrap(), 2),
            ("010".parse::<BitTriple>().unwrap(), 8),
        ]
        .into_iter()
        .collect();

        let analysis = analyze(&counts);
        assert_eq!(analysis.total_shots, 10);
        assert_eq!(analysis.outcomes[0].bits.to_string(), "010");
        assert_eq!(analysis.outcomes[0].vote.error_position, Some(1));
        assert!((analysis.outcomes[0].percentage - 80.0).abs() < 1e-9);
        assert_eq!(analysis.shots_with_error(), 8);
    }
}
