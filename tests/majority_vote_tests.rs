use bitflip::correction::{analyze, correct, majority_vote, majority_vote_str, BitTriple, Counts};
use bitflip::simulators::Outcome;
use bitflip::CodeError;

use Outcome::{One, Zero};

// bits, majority, error position
const TRUTH_TABLE: [(&str, Outcome, Option<usize>); 8] = [
    ("000", Zero, None),
    ("001", Zero, Some(2)),
    ("010", Zero, Some(1)),
    ("011", One, Some(0)),
    ("100", Zero, Some(0)),
    ("101", One, Some(1)),
    ("110", One, Some(2)),
    ("111", One, None),
];

#[test]
fn test_vote_matches_truth_table() {
    for (bits, majority, position) in TRUTH_TABLE {
        let vote = majority_vote_str(bits).unwrap();
        assert_eq!(vote.majority_bit, majority, "majority of {}", bits);
        assert_eq!(vote.error_position, position, "error position of {}", bits);
        assert_eq!(vote.error_detected, position.is_some(), "detection for {}", bits);
    }
}

#[test]
fn test_table_covers_every_triple() {
    let listed: Vec<BitTriple> = TRUTH_TABLE.iter().map(|(s, _, _)| s.parse().unwrap()).collect();
    assert_eq!(listed, BitTriple::all().collect::<Vec<_>>());
}

#[test]
fn test_correction_restores_codeword() {
    for bits in BitTriple::all() {
        let vote = majority_vote(bits);
        let corrected = correct(bits);
        assert_eq!(corrected, BitTriple::uniform(vote.majority_bit));

        if let Some(position) = vote.error_position {
            assert_eq!(bits.with_flipped(position).unwrap(), corrected);
        } else {
            assert_eq!(bits, corrected);
        }
    }
}

#[test]
fn test_single_flip_is_always_located() {
    for codeword in [BitTriple::uniform(Zero), BitTriple::uniform(One)] {
        for qubit in 0..3 {
            let noisy = codeword.with_flipped(qubit).unwrap();
            let vote = majority_vote(noisy);
            assert_eq!(vote.error_position, Some(qubit));
            assert_eq!(correct(noisy), codeword);
        }
    }
}

#[test]
fn test_double_flip_is_miscorrected() {
    // Flips on qubits 0 and 1 of |000⟩ read as a single flip on qubit 2 of |111⟩
    let noisy = BitTriple::uniform(Zero)
        .with_flipped(0)
        .unwrap()
        .with_flipped(1)
        .unwrap();
    let vote = majority_vote(noisy);
    assert_eq!(vote.error_position, Some(2));
    assert_eq!(correct(noisy), BitTriple::uniform(One));
}

#[test]
fn test_malformed_strings_are_rejected() {
    for input in ["", "00", "0000", "01x", "abc"] {
        assert!(
            matches!(majority_vote_str(input), Err(CodeError::InvalidBitString(_))),
            "{:?}",
            input
        );
    }
}

#[test]
fn test_analysis_orders_by_frequency() {
    let counts: Counts = [
        ("000".parse::<BitTriple>().unwrap(), 10),
        ("100".parse::<BitTriple>().unwrap(), 70),
        ("111".parse::<BitTriple>().unwrap(), 20),
    ]
    .into_iter()
    .collect();

    let analysis = analyze(&counts);
    assert_eq!(analysis.total_shots, 100);
    assert_eq!(analysis.outcomes[0].bits.to_string(), "100");
    assert_eq!(analysis.outcomes[0].vote.error_position, Some(0));
    assert_eq!(analysis.outcomes[0].corrected_to.to_string(), "000");
    assert!((analysis.outcomes[0].percentage - 70.0).abs() < 1e-10);
    assert_eq!(analysis.outcomes[1].bits.to_string(), "111");
    assert_eq!(analysis.shots_with_error(), 70);
}
