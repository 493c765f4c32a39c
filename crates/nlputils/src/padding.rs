//! Fixed-length normalization of id (or token) sequences.

use crate::errors::{invalid, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which end of a sequence receives padding or loses elements to truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(invalid(format!(
                "side must be either 'left' or 'right', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pad `sequence` with `value` up to `max_length`, or truncate it down to
/// `max_length`.
///
/// The input is materialized once, so single-pass iterators are fine.
/// Sequences at least `max_length` long are truncated: `Side::Right` keeps
/// the head, `Side::Left` keeps the tail. Shorter sequences are padded on
/// `padding`.
pub fn pad_sequence_to_fixed_length<T, I>(
    sequence: I,
    max_length: usize,
    value: T,
    padding: Side,
    truncation: Side,
) -> Vec<T>
where
    T: Clone,
    I: IntoIterator<Item = T>,
{
    let mut sequence: Vec<T> = sequence.into_iter().collect();

    if sequence.len() >= max_length {
        match truncation {
            Side::Right => sequence.truncate(max_length),
            Side::Left => {
                sequence.drain(..sequence.len() - max_length);
            }
        }
        return sequence;
    }

    let missing = max_length - sequence.len();
    match padding {
        Side::Right => {
            sequence.extend(std::iter::repeat(value).take(missing));
            sequence
        }
        Side::Left => {
            let mut padded = Vec::with_capacity(max_length);
            padded.extend(std::iter::repeat(value).take(missing));
            padded.append(&mut sequence);
            padded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_on_the_requested_side() {
        let right = pad_sequence_to_fixed_length(vec![1, 2, 3], 5, 0, Side::Right, Side::Right);
        assert_eq!(right, vec![1, 2, 3, 0, 0]);

        let left = pad_sequence_to_fixed_length(vec![1, 2, 3], 5, 0, Side::Left, Side::Right);
        assert_eq!(left, vec![0, 0, 1, 2, 3]);
    }

    #[test]
    fn truncates_on_the_requested_side() {
        let tail = pad_sequence_to_fixed_length(vec![1, 2, 3, 4, 5], 3, 0, Side::Right, Side::Left);
        assert_eq!(tail, vec![3, 4, 5]);

        let head = pad_sequence_to_fixed_length(vec![1, 2, 3, 4, 5], 3, 0, Side::Right, Side::Right);
        assert_eq!(head, vec![1, 2, 3]);
    }

    #[test]
    fn exact_length_is_unchanged() {
        let seq = vec!["a", "b", "c"];
        for padding in [Side::Left, Side::Right] {
            for truncation in [Side::Left, Side::Right] {
                let out = pad_sequence_to_fixed_length(seq.clone(), 3, "x", padding, truncation);
                assert_eq!(out, seq);
            }
        }
    }

    #[test]
    fn empty_input_and_zero_length() {
        let empty: Vec<u32> = Vec::new();
        assert_eq!(
            pad_sequence_to_fixed_length(empty.clone(), 0, 7, Side::Right, Side::Right),
            Vec::<u32>::new()
        );
        assert_eq!(
            pad_sequence_to_fixed_length(empty, 3, 7, Side::Left, Side::Right),
            vec![7, 7, 7]
        );
        assert_eq!(
            pad_sequence_to_fixed_length(vec![1, 2], 0, 7, Side::Right, Side::Left),
            Vec::<u32>::new()
        );
    }

    #[test]
    fn accepts_single_pass_iterators() {
        let iter = (1..=4).map(|x| x * 10);
        let out = pad_sequence_to_fixed_length(iter, 6, 0, Side::Right, Side::Right);
        assert_eq!(out, vec![10, 20, 30, 40, 0, 0]);
    }

    #[test]
    fn padded_output_keeps_original_contiguous() {
        let seq: Vec<u32> = (0..7).collect();
        for target in 7..12 {
            let right = pad_sequence_to_fixed_length(seq.clone(), target, 99, Side::Right, Side::Right);
            assert_eq!(right.len(), target);
            assert_eq!(&right[..seq.len()], seq.as_slice());

            let left = pad_sequence_to_fixed_length(seq.clone(), target, 99, Side::Left, Side::Right);
            assert_eq!(left.len(), target);
            assert_eq!(&left[target - seq.len()..], seq.as_slice());
        }
    }

    #[test]
    fn side_parsing_rejects_unknown_values() {
        assert_eq!("left".parse::<Side>().unwrap(), Side::Left);
        assert_eq!("right".parse::<Side>().unwrap(), Side::Right);
        let err = "middle".parse::<Side>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
