use approx::assert_relative_eq;

use super::*;
use crate::core::model::fixtures::{counts, hats_collection, token};
use crate::core::model::{TokenAttribute, TokenMetadata};

#[test]
fn test_probabilities_for_present_values() {
    let collection = hats_collection();
    let scored = token("A", &[("Background", "Red"), ("Hat", "Cap")]);
    let scores = token_attribute_scores(&collection, &scored, false, None).unwrap();

    assert_eq!(scores.names, vec!["Background", "Hat"]);
    assert_eq!(scores.probabilities, vec![0.25, 0.5]);
    assert_eq!(scores.weights, vec![1.0, 1.0]);
}

#[test]
fn test_missing_attribute_uses_absent_count() {
    let collection = hats_collection();
    let scored = token("B", &[("Background", "Blue")]);
    let scores = token_attribute_scores(&collection, &scored, false, None).unwrap();

    assert_eq!(scores.probabilities, vec![0.75, 0.25]);
}

#[test]
fn test_normalized_weights_include_absence() {
    let collection = hats_collection();
    let scored = token("B", &[("Background", "Blue")]);
    let scores = token_attribute_scores(&collection, &scored, true, None).unwrap();

    assert_relative_eq!(scores.weights[0], 1.0 / 2.0);
    assert_relative_eq!(scores.weights[1], 1.0 / 3.0);
}

#[test]
fn test_memoized_null_attributes_give_same_result() {
    let collection = hats_collection();
    let nulls = extract_null_attributes(&collection).unwrap();

    for member in collection.tokens() {
        let derived = token_attribute_scores(&collection, member, true, None).unwrap();
        let memoized = token_attribute_scores(&collection, member, true, Some(&nulls)).unwrap();
        assert_eq!(derived, memoized);
    }
}

#[test]
fn test_single_valued_attribute_has_unit_weight() {
    let collection = Collection::new(
        "uniform",
        counts(&[("Body", &[("Robot", 3)]), ("Hat", &[("Cap", 1), ("Fez", 2)])]),
        3,
        Vec::new(),
    );
    let scored = token("1", &[("Body", "Robot"), ("Hat", "Cap")]);
    let scores = token_attribute_scores(&collection, &scored, true, None).unwrap();

    assert_eq!(scores.probabilities[0], 1.0);
    assert_eq!(scores.weights[0], 1.0);
    assert!(scores.weights[1] < 1.0);
}

#[test]
fn test_foreign_token_yields_empty_scores() {
    let collection = hats_collection();
    let scores =
        token_attribute_scores(&collection, &token("X", &[("Eyes", "Laser")]), true, None).unwrap();

    assert!(scores.is_empty());
    assert_eq!(scores.len(), 0);
}

#[test]
fn test_token_without_attributes_scores_all_absent() {
    let collection = Collection::new(
        "sparse",
        counts(&[("Hat", &[("Cap", 1)])]),
        2,
        Vec::new(),
    );
    let scores = token_attribute_scores(&collection, &token("2", &[]), false, None).unwrap();

    assert_eq!(scores.names, vec!["Hat"]);
    assert_eq!(scores.probabilities, vec![0.5]);
}

#[test]
fn test_unknown_value_is_integrity_error() {
    let collection = hats_collection();
    let err = token_attribute_scores(
        &collection,
        &token("A", &[("Background", "Green"), ("Hat", "Cap")]),
        true,
        None,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RarityError::DataIntegrity { ref attribute, .. } if attribute == "Background"
    ));
}

#[test]
fn test_missing_attribute_without_absent_count_is_integrity_error() {
    let collection = hats_collection();
    // every token declares a Background, so this token cannot lack it
    let err = token_attribute_scores(&collection, &token("Q", &[("Hat", "Cap")]), true, None)
        .unwrap_err();

    assert!(matches!(err, RarityError::DataIntegrity { .. }));
}

#[test]
fn test_unkeyable_value_is_excluded() {
    let collection = Collection::new(
        "levels",
        counts(&[("Level", &[("1", 2)]), ("Hat", &[("Cap", 2)])]),
        2,
        Vec::new(),
    );
    let member = Token::new(
        "1",
        TokenMetadata::new()
            .with_attribute(TokenAttribute::numeric("Level", f64::INFINITY))
            .with_attribute(TokenAttribute::string("Hat", "Cap")),
    );

    let scores = token_attribute_scores(&collection, &member, false, None).unwrap();
    assert_eq!(scores.names, vec!["Hat"]);
    assert_eq!(scores.probabilities, vec![1.0]);
}

#[test]
fn test_numeric_values_match_canonical_keys() {
    let collection = Collection::new(
        "levels",
        counts(&[("Level", &[("1", 1), ("2.5", 3)])]),
        4,
        Vec::new(),
    );
    let member = Token::new(
        "1",
        TokenMetadata::new().with_attribute(TokenAttribute::numeric("Level", 2.5)),
    );

    let scores = token_attribute_scores(&collection, &member, false, None).unwrap();
    assert_eq!(scores.probabilities, vec![0.75]);
}

#[test]
fn test_oversubscribed_collection_fails_before_scoring() {
    let collection = Collection::new(
        "broken",
        counts(&[("Background", &[("Red", 1), ("Blue", 4)])]),
        4,
        Vec::new(),
    );
    let err = token_attribute_scores(&collection, &token("A", &[("Background", "Red")]), true, None)
        .unwrap_err();

    assert!(matches!(err, RarityError::DataIntegrity { .. }));
}

#[test]
fn test_iter_yields_aligned_triples() {
    let collection = hats_collection();
    let scored = token("D", &[("Background", "Blue"), ("Hat", "Beanie")]);
    let scores = token_attribute_scores(&collection, &scored, true, None).unwrap();

    let triples: Vec<_> = scores.iter().collect();
    assert_eq!(triples.len(), 2);
    assert_eq!(triples[1].0, "Hat");
    assert_relative_eq!(triples[1].1, 0.25);
    assert_relative_eq!(triples[1].2, 1.0 / 3.0);
}
