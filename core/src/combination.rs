//! Probability that every affix rolled onto a mod comes from a chosen set of affixes.
//!
//! `slot_count` affixes are drawn from the [`AFFIX_COUNT`] available ones without
//! replacement. The draw succeeds when all of them belong to the target range, so the
//! chance is `C(range, slots) / C(AFFIX_COUNT, slots)`.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::{
    combinatorics::{binomial, Combinations},
    Error, Result, AFFIX_COUNT, COMBINATION_DISPLAY_LIMIT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationQuery {
    pub slot_count: i64,
    /// May contain duplicates and ids outside of `1..=AFFIX_COUNT`, both are dropped
    pub target_ids: Vec<i64>,
    pub show_combinations: bool,
}

impl CombinationQuery {
    pub fn new(slot_count: i64, target_ids: &[i64]) -> Self {
        Self {
            slot_count,
            target_ids: target_ids.to_vec(),
            show_combinations: false,
        }
    }

    pub fn show_combinations(mut self, value: bool) -> Self {
        self.show_combinations = value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationResult {
    pub probability: f64,
    pub probability_percent: f64,
    pub total_combinations: u64,
    pub valid_combinations: u64,
    pub slot_count: u8,
    /// Deduplicated target ids in ascending order
    pub target_range: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combinations: Option<Vec<Vec<u8>>>,
}

pub fn compute(query: &CombinationQuery) -> Result<CombinationResult> {
    if query.slot_count < 1 || query.slot_count > AFFIX_COUNT as i64 {
        return Err(Error::SlotCountOutOfRange(query.slot_count));
    }
    let slot_count = query.slot_count as u8;

    let target_range: Vec<u8> = query
        .target_ids
        .iter()
        .filter(|&&id| (1..=AFFIX_COUNT as i64).contains(&id))
        .map(|&id| id as u8)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if target_range.is_empty() {
        return Err(Error::EmptyTargetRange);
    }

    let range_size = target_range.len() as i64;
    let total_combinations = binomial(AFFIX_COUNT as i64, slot_count as i64);

    if slot_count as i64 > range_size {
        log::debug!(
            "{slot_count} slots can never fit inside a range of {range_size}, skipping count"
        );
        return Ok(CombinationResult {
            probability: 0.0,
            probability_percent: 0.0,
            total_combinations,
            valid_combinations: 0,
            slot_count,
            target_range,
            combinations: None,
        });
    }

    let valid_combinations = binomial(range_size, slot_count as i64);
    let probability = crate::ratio(valid_combinations, total_combinations);

    let combinations = (query.show_combinations
        && valid_combinations > 0
        && valid_combinations <= COMBINATION_DISPLAY_LIMIT)
        .then(|| Combinations::new(&target_range, slot_count as usize).collect());

    log::debug!(
        "affix query: {slot_count} slots over {target_range:?}, {}/{}",
        valid_combinations,
        total_combinations
    );

    Ok(CombinationResult {
        probability,
        probability_percent: crate::percent(probability),
        total_combinations,
        valid_combinations,
        slot_count,
        target_range,
        combinations,
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn query(slot_count: i64, target_ids: &[i64]) -> CombinationQuery {
        CombinationQuery::new(slot_count, target_ids)
    }

    #[test]
    fn three_slots_from_four_targets() {
        let result = compute(&query(3, &[1, 4, 5, 6])).unwrap();

        pretty_assertions::assert_eq!(result.total_combinations, 120);
        pretty_assertions::assert_eq!(result.valid_combinations, 4);
        pretty_assertions::assert_eq!(result.slot_count, 3);
        pretty_assertions::assert_eq!(result.target_range, vec![1, 4, 5, 6]);
        assert!((result.probability - 4.0 / 120.0).abs() < 1e-12);
        assert!((result.probability_percent - 3.333_333).abs() < 1e-5);
        pretty_assertions::assert_eq!(result.combinations, None);
    }

    #[test]
    fn more_slots_than_targets_is_zero_not_an_error() {
        let result = compute(&query(5, &[1, 2, 3])).unwrap();

        pretty_assertions::assert_eq!(result.probability, 0.0);
        pretty_assertions::assert_eq!(result.valid_combinations, 0);
        pretty_assertions::assert_eq!(result.total_combinations, 252);
        pretty_assertions::assert_eq!(result.target_range, vec![1, 2, 3]);
    }

    #[test]
    fn full_universe_is_certain() {
        let all: Vec<i64> = (1..=AFFIX_COUNT as i64).collect();
        for slot_count in 1..=AFFIX_COUNT as i64 {
            let result = compute(&query(slot_count, &all)).unwrap();
            pretty_assertions::assert_eq!(result.probability, 1.0, "slot count {slot_count}");
            pretty_assertions::assert_eq!(result.valid_combinations, result.total_combinations);
        }
    }

    #[test]
    fn probability_never_increases_with_more_slots() {
        let targets = [2, 3, 5, 7, 9, 10];
        let mut previous = 1.0;
        for slot_count in 1..=AFFIX_COUNT as i64 {
            let result = compute(&query(slot_count, &targets)).unwrap();
            assert!(
                result.probability <= previous,
                "slot count {slot_count}: {} > {previous}",
                result.probability
            );
            assert!(result.valid_combinations <= result.total_combinations);
            previous = result.probability;
        }
    }

    #[test]
    fn targets_are_deduplicated_sorted_and_filtered() {
        let result = compute(&query(2, &[6, 1, 6, 0, 11, -3, 4, 1])).unwrap();

        pretty_assertions::assert_eq!(result.target_range, vec![1, 4, 6]);
        pretty_assertions::assert_eq!(result.valid_combinations, 3);
        pretty_assertions::assert_eq!(result.total_combinations, 45);
    }

    #[test_case(0 => Err(Error::SlotCountOutOfRange(0)))]
    #[test_case(11 => Err(Error::SlotCountOutOfRange(11)))]
    #[test_case(-1 => Err(Error::SlotCountOutOfRange(-1)))]
    fn slot_count_out_of_range(slot_count: i64) -> Result<u64> {
        compute(&query(slot_count, &[1, 2])).map(|r| r.valid_combinations)
    }

    #[test_case(&[] ; "no ids")]
    #[test_case(&[0, 11, 42] ; "only out of range ids")]
    fn empty_target_range(target_ids: &[i64]) {
        pretty_assertions::assert_eq!(compute(&query(1, target_ids)), Err(Error::EmptyTargetRange));
    }

    #[test]
    fn slot_count_is_validated_before_targets() {
        pretty_assertions::assert_eq!(
            compute(&query(0, &[])),
            Err(Error::SlotCountOutOfRange(0))
        );
    }

    #[test]
    fn combinations_listed_on_request() {
        let result = compute(&query(3, &[6, 4, 1, 5]).show_combinations(true)).unwrap();

        let expected = vec![
            vec![1, 4, 5],
            vec![1, 4, 6],
            vec![1, 5, 6],
            vec![4, 5, 6],
        ];
        pretty_assertions::assert_eq!(result.combinations, Some(expected));
    }

    #[test]
    fn combinations_skipped_when_impossible() {
        let result = compute(&query(4, &[1, 2]).show_combinations(true)).unwrap();
        pretty_assertions::assert_eq!(result.combinations, None);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let q = query(4, &[1, 3, 5, 7, 9]).show_combinations(true);
        pretty_assertions::assert_eq!(compute(&q), compute(&q));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let result = compute(&query(3, &[1, 4, 5, 6])).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        pretty_assertions::assert_eq!(json["totalCombinations"], 120);
        pretty_assertions::assert_eq!(json["validCombinations"], 4);
        pretty_assertions::assert_eq!(json["slotCount"], 3);
        pretty_assertions::assert_eq!(json["targetRange"], serde_json::json!([1, 4, 5, 6]));
        assert!(json.get("combinations").is_none());
        assert!(json["probabilityPercent"].is_f64());
    }
}
