//! Three-bit measurement outcomes and their frequency mapping.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodeError, CodeResult};
use crate::simulators::Outcome;

/// Physical qubits per logical qubit.
pub const CODE_QUBITS: usize = 3;

/// One measurement of the three physical qubits.
///
/// Position `i` holds the outcome of qubit `i`, and the string form lists
/// qubit 0 first: `"100"` means qubit 0 read 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitTriple([Outcome; CODE_QUBITS]);

impl BitTriple {
    pub const fn new(bits: [Outcome; CODE_QUBITS]) -> Self {
        BitTriple(bits)
    }

    /// All three bits equal to `bit`: the codeword for a logical basis state.
    pub const fn uniform(bit: Outcome) -> Self {
        BitTriple([bit; CODE_QUBITS])
    }

    /// The eight possible triples, `000` through `111`.
    pub fn all() -> impl Iterator<Item = BitTriple> {
        (0..1usize << CODE_QUBITS).map(|index| {
            BitTriple([
                Outcome::from_bit((index >> 2) & 1),
                Outcome::from_bit((index >> 1) & 1),
                Outcome::from_bit(index & 1),
            ])
        })
    }

    pub fn bits(&self) -> [Outcome; CODE_QUBITS] {
        self.0
    }

    pub fn get(&self, position: usize) -> Option<Outcome> {
        self.0.get(position).copied()
    }

    /// Number of positions holding `bit`.
    pub fn count(&self, bit: Outcome) -> usize {
        self.0.iter().filter(|&&b| b == bit).count()
    }

    /// A copy with the bit at `position` inverted.
    pub fn with_flipped(&self, position: usize) -> CodeResult<Self> {
        if position >= CODE_QUBITS {
            return Err(CodeError::QubitOutOfRange {
                qubit: position,
                qubit_count: CODE_QUBITS,
            });
        }
        let mut bits = self.0;
        bits[position] = bits[position].flipped();
        Ok(BitTriple(bits))
    }
}

impl fmt::Display for BitTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

impl FromStr for BitTriple {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CodeError::InvalidBitString(s.to_string());

        let bits: Vec<Outcome> = s
            .chars()
            .map(|c| match c {
                '0' => Ok(Outcome::Zero),
                '1' => Ok(Outcome::One),
                _ => Err(invalid()),
            })
            .collect::<CodeResult<_>>()?;

        bits.as_slice().try_into().map_err(|_| invalid())
    }
}

impl TryFrom<&[Outcome]> for BitTriple {
    type Error = CodeError;

    fn try_from(outcomes: &[Outcome]) -> Result<Self, Self::Error> {
        let bits: [Outcome; CODE_QUBITS] = outcomes.try_into().map_err(|_| {
            CodeError::InvalidBitString(outcomes.iter().map(|o| o.to_string()).collect())
        })?;
        Ok(BitTriple(bits))
    }
}

impl Serialize for BitTriple {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitTriple {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Frequency mapping from measured triple to number of shots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(BTreeMap<BitTriple, usize>);

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `shots` observations of `bits`.
    pub fn record(&mut self, bits: BitTriple, shots: usize) {
        if shots > 0 {
            *self.0.entry(bits).or_insert(0) += shots;
        }
    }

    pub fn get(&self, bits: &BitTriple) -> usize {
        self.0.get(bits).copied().unwrap_or(0)
    }

    /// Total number of shots.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Fraction of shots that produced `bits`, in [0, 1].
    pub fn frequency(&self, bits: &BitTriple) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(bits) as f64 / total as f64,
        }
    }

    /// The most frequent outcome; ties go to the smallest bit string.
    pub fn most_common(&self) -> Option<(BitTriple, usize)> {
        self.0
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(bits, count)| (*bits, *count))
    }

    /// Observed outcomes in bit-string order.
    pub fn iter(&self) -> impl Iterator<Item = (&BitTriple, &usize)> {
        self.0.iter()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(BitTriple, usize)> for Counts {
    fn from_iter<I: IntoIterator<Item = (BitTriple, usize)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bits, shots) in iter {
            counts.record(bits, shots);
        }
        counts
    }
}

impl TryFrom<BTreeMap<Vec<Outcome>, usize>> for Counts {
    type Error = CodeError;

    fn try_from(raw: BTreeMap<Vec<Outcome>, usize>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(outcomes, shots)| Ok((BitTriple::try_from(outcomes.as_slice())?, shots)))
            .collect()
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        for (bits, count) in &self.0 {
            writeln!(
                f,
                "|{}⟩: {} ({:.1}%)",
                bits,
                count,
                *count as f64 * 100.0 / total.max(1) as f64
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_keep_qubit_order() {
        let bits: BitTriple = "100".parse().unwrap();
        assert_eq!(bits.get(0), Some(Outcome::One));
        assert_eq!(bits.get(2), Some(Outcome::Zero));
        assert_eq!(bits.to_string(), "100");
    }

    #[test]
    fn test_parse_rejects_malformed_strings() {
        for input in ["", "01", "0101", "0a1", "2 0"] {
            assert!(
                matches!(input.parse::<BitTriple>(), Err(CodeError::InvalidBitString(_))),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn test_all_enumerates_eight_triples_in_order() {
        let labels: Vec<String> = BitTriple::all().map(|b| b.to_string()).collect();
        assert_eq!(labels, ["000", "001", "010", "011", "100", "101", "110", "111"]);
    }

    #[test]
    fn test_most_common_breaks_ties_towards_smaller_string() {
        let counts: Counts = [
            ("111".parse::<BitTriple>().unwrap(), 5),
            ("000".parse::<BitTriple>().unwrap(), 5),
            ("010".parse::<BitTriple>().unwrap(), 1),
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.most_common(), Some(("000".parse::<BitTriple>().unwrap(), 5)));
        assert_eq!(counts.total(), 11);
    }

    #[test]
    fn test_counts_serialize_as_string_keyed_map() {
        let counts: Counts = [("010".parse::<BitTriple>().unwrap(), 7)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"010":7}"#);

        let back: Counts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
    }
}
