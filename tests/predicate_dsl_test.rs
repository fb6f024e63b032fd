//! Integration tests for composing predicates through the fluent DSL.

use pilum::dsl::{MinimumShouldMatchParent, PredicateFinalStep, SearchPredicateFactory};
use pilum::error::{PilumError, Result};
use pilum::query::{PredicateKind, Range, SearchPredicate};
use pilum::schema::IndexSchema;
use pilum::spatial::{DistanceUnit, GeoPoint};
use pilum::value::FieldValue;

fn library_schema() -> IndexSchema {
    IndexSchema::builder()
        .text("title")
        .text("summary")
        .text("body")
        .keyword("code")
        .keyword("tags")
        .integer("year")
        .float("price")
        .geo_point("location")
        .vector("embedding", 3)
        .object("authors", true)
        .text("authors.name")
        .build()
        .unwrap()
}

#[test]
fn test_single_field_predicate_is_not_wrapped() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let predicate = f.match_().field("title")?.matching("rust").to_predicate()?;
    assert!(predicate.as_boolean().is_none());
    match predicate.kind() {
        PredicateKind::Match { field, value, .. } => {
            assert_eq!(field, "title");
            assert_eq!(value, &FieldValue::from("rust"));
        }
        other => panic!("Expected match predicate, got {other:?}"),
    }

    let range = f.range().field("year")?.at_least(2000).to_predicate()?;
    assert!(matches!(range.kind(), PredicateKind::Range { .. }));

    let phrase = f.phrase().field("body")?.matching("quick fox").to_predicate()?;
    assert!(matches!(phrase.kind(), PredicateKind::Phrase { .. }));

    Ok(())
}

#[test]
fn test_multi_field_disjunction_keeps_declaration_order() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let predicate = f
        .match_()
        .fields(["title", "body"])?
        .field("summary")?
        .matching("rust")
        .to_predicate()?;

    let boolean = predicate.as_boolean().expect("boolean predicate");
    assert!(boolean.must().is_empty());
    assert_eq!(boolean.should().len(), 3);

    let expected: Vec<SearchPredicate> = ["title", "body", "summary"]
        .iter()
        .map(|field| f.match_().field(field)?.matching("rust").to_predicate())
        .collect::<Result<_>>()?;
    assert_eq!(boolean.should(), expected.as_slice());
    assert_eq!(predicate.to_string(), "title:rust body:rust summary:rust");

    Ok(())
}

#[test]
fn test_boost_multiplication() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let predicate = f
        .match_()
        .field("title")?
        .boost(2.0)
        .matching("rust")?
        .boost(3.0)
        .to_predicate()?;
    assert_eq!(predicate.boost(), Some(2.0_f32 * 3.0_f32));

    let predicate = f
        .match_()
        .field("title")?
        .boost(1.5)
        .field("body")?
        .matching("rust")?
        .boost(0.5)
        .to_predicate()?;
    let should = predicate.as_boolean().expect("boolean predicate").should();
    assert_eq!(should[0].boost(), Some(1.5_f32 * 0.5_f32));
    assert_eq!(should[1].boost(), Some(0.5));

    Ok(())
}

#[test]
fn test_constant_score_keeps_predicate_boost() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let predicate = f
        .match_()
        .field("title")?
        .matching("rust")?
        .boost(3.0)
        .constant_score()
        .to_predicate()?;
    assert_eq!(predicate.boost(), Some(3.0));
    assert!(predicate.is_constant_score());

    Ok(())
}

fn assert_contradictory<T>(result: Result<T>) {
    match result {
        Err(PilumError::ContradictoryBoost { boost }) => assert_eq!(boost, 2.0),
        Err(other) => panic!("Expected contradictory boost error, got {other}"),
        Ok(_) => panic!("Expected contradictory boost error"),
    }
}

#[test]
fn test_field_boost_and_constant_score_are_exclusive() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);
    let center = GeoPoint::new(45.0, 4.0)?;

    assert_contradictory(
        f.match_()
            .field("title")?
            .boost(2.0)
            .matching("rust")?
            .constant_score(),
    );
    assert_contradictory(
        f.range()
            .field("year")?
            .boost(2.0)
            .at_least(2000)?
            .constant_score(),
    );
    assert_contradictory(
        f.phrase()
            .field("body")?
            .boost(2.0)
            .matching("quick fox")?
            .constant_score(),
    );
    assert_contradictory(
        f.wildcard()
            .field("code")?
            .boost(2.0)
            .matching("ab*")?
            .constant_score(),
    );
    assert_contradictory(
        f.regexp()
            .field("code")?
            .boost(2.0)
            .matching("ab[0-9]+")?
            .constant_score(),
    );
    assert_contradictory(
        f.terms()
            .field("tags")?
            .boost(2.0)
            .matching_any(["rust", "search"])?
            .constant_score(),
    );
    assert_contradictory(
        f.spatial()
            .within()
            .field("location")?
            .boost(2.0)
            .circle(center, 1.0, DistanceUnit::Kilometers)?
            .constant_score(),
    );
    assert_contradictory(
        f.prefix()
            .field("code")?
            .boost(2.0)
            .matching("ab")?
            .constant_score(),
    );

    Ok(())
}

#[test]
fn test_minimum_should_match_out_of_bounds() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let result = f
        .bool()
        .should(f.match_().field("title")?.matching("rust"))?
        .minimum_should_match_number(3)?
        .to_predicate();

    match result {
        Err(err) => {
            assert!(matches!(err, PilumError::MinimumShouldMatchOutOfBounds { .. }));
            assert!(
                err.to_string()
                    .contains("expected a number between 1 and 1, got 3")
            );
        }
        Ok(predicate) => panic!("Expected out of bounds error, got {predicate}"),
    }

    Ok(())
}

#[test]
fn test_negation_chains_collapse() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);
    let x = || f.match_().field("title").map(|step| step.matching("x"));

    let x_predicate = x().to_predicate()?;
    let once = f.not(x()).to_predicate()?;
    assert_eq!(once.to_string(), "-title:x #*:*");

    let twice = f.not(f.not(x())).to_predicate()?;
    assert_eq!(twice, x_predicate);

    let thrice = f.not(f.not(f.not(x()))).to_predicate()?;
    assert_eq!(thrice, once);

    let four = f.not(f.not(f.not(f.not(x())))).to_predicate()?;
    assert_eq!(four, x_predicate);

    let five = f.not(f.not(f.not(f.not(f.not(x()))))).to_predicate()?;
    assert_eq!(five.to_string(), once.to_string());

    Ok(())
}

#[test]
fn test_double_negation_in_clauses() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);
    let term = |value: &str| {
        f.match_()
            .field("title")
            .map(|step| step.matching(value.to_string()))
    };

    let collapsed = f
        .bool()
        .must(term("test1"))?
        .must(f.not(term("test2")))?
        .must_not(f.not(term("test3")))?
        .to_predicate()?;

    let direct = f
        .bool()
        .must(term("test1"))?
        .must(term("test3"))?
        .must_not(term("test2"))?
        .to_predicate()?;

    assert_eq!(collapsed, direct);
    assert_eq!(collapsed.to_string(), "+title:test1 +title:test3 -title:test2");

    Ok(())
}

#[test]
fn test_negation_keeps_should_clauses_optional() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);
    let term = |value: &str| {
        f.match_()
            .field("title")
            .map(|step| step.matching(value.to_string()))
    };

    let must_not_b = f
        .bool()
        .should(term("a"))?
        .must(f.not(term("b")))?
        .to_predicate()?;
    let boolean = must_not_b.as_boolean().expect("boolean predicate");
    assert_eq!(boolean.must().len(), 1);
    assert_eq!(boolean.should().len(), 1);
    assert!(boolean.must_not().is_empty());
    assert_eq!(must_not_b.to_string(), "+(-title:b #*:*) title:a");

    let filter_not_b = f
        .bool()
        .should(term("a"))?
        .filter(f.not(term("b")))?
        .to_predicate()?;
    let boolean = filter_not_b.as_boolean().expect("boolean predicate");
    assert_eq!(boolean.filter().len(), 1);
    assert!(boolean.must_not().is_empty());
    assert_eq!(filter_not_b.to_string(), "title:a #(-title:b #*:*)");

    let with_required = f
        .bool()
        .should(term("a"))?
        .must(term("c"))?
        .must(f.not(term("b")))?
        .to_predicate()?;
    assert_eq!(with_required.to_string(), "+title:c title:a -title:b");

    Ok(())
}

#[test]
fn test_extreme_minimum_should_match_percent() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    for percent in [i32::MAX, i32::MIN] {
        let result = f
            .bool()
            .should(f.match_().field("title")?.matching("a"))?
            .should(f.match_().field("title")?.matching("b"))?
            .minimum_should_match_percent(percent)?
            .to_predicate();
        assert!(
            matches!(
                result,
                Err(PilumError::MinimumShouldMatchOutOfBounds { total: 2, .. })
            ),
            "percent {percent} gave {result:?}"
        );
    }

    Ok(())
}

#[test]
fn test_fuzzy_bounds() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    for (distance, prefix) in [(3, 0), (-1, 0), (1, -1)] {
        let single = f
            .match_()
            .field("title")?
            .matching("rust")?
            .fuzzy_with(distance, prefix);
        assert!(matches!(single, Err(PilumError::InvalidFuzzy { .. })));

        let multi = f
            .match_()
            .fields(["title", "body", "summary"])?
            .matching("rust")?
            .fuzzy_with(distance, prefix);
        match multi {
            Err(PilumError::InvalidFuzzy {
                max_edit_distance,
                exact_prefix_length,
            }) => {
                assert_eq!(max_edit_distance, distance);
                assert_eq!(exact_prefix_length, prefix);
            }
            _ => panic!("Expected invalid fuzzy error for ({distance}, {prefix})"),
        }
    }

    let valid = f
        .match_()
        .fields(["title", "body"])?
        .matching("rust")?
        .fuzzy_with(1, 2)
        .to_predicate()?;
    assert_eq!(valid.to_string(), "title:rust~1 body:rust~1");

    Ok(())
}

#[test]
fn test_null_range_is_rejected() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let single = f
        .range()
        .field("year")?
        .within(Range::<FieldValue>::of(None, None));
    match single {
        Err(err @ PilumError::NullRange { .. }) => {
            assert!(err.to_string().contains("cannot match null value"));
            assert!(err.to_string().contains("[year]"));
        }
        _ => panic!("Expected null range error"),
    }

    let multi = f
        .range()
        .fields(["year", "price"])?
        .within(Range::<FieldValue>::of(None, None));
    match multi {
        Err(PilumError::NullRange { fields }) => assert_eq!(fields, vec!["year", "price"]),
        _ => panic!("Expected null range error"),
    }

    Ok(())
}

#[test]
fn test_resolution_timing_per_kind() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    // Eager kinds fail on field declaration.
    assert!(matches!(
        f.range().field("title"),
        Err(PilumError::UnsupportedPredicate { .. })
    ));
    assert!(matches!(
        f.range().field("missing"),
        Err(PilumError::UnknownField(_))
    ));
    assert!(matches!(
        f.spatial().within().field("year"),
        Err(PilumError::UnsupportedPredicate { .. })
    ));

    // Lazy kinds fail once the value is supplied.
    let step = f.match_().field("missing")?;
    assert!(matches!(step.matching("rust"), Err(PilumError::UnknownField(_))));

    let step = f.phrase().field("location")?;
    match step.matching("quick fox") {
        Err(PilumError::UnsupportedPredicate { field, predicate }) => {
            assert_eq!(field, "location");
            assert_eq!(predicate, "phrase");
        }
        _ => panic!("Expected unsupported predicate error"),
    }

    Ok(())
}

#[test]
fn test_minimum_should_match_brackets() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let build = |terms: &[&str]| -> Result<SearchPredicate> {
        let mut step = f.bool();
        for term in terms {
            step = step.should(f.match_().field("title")?.matching(term.to_string()))?;
        }
        step.minimum_should_match()
            .if_more_than(2)?
            .then_require_number(-1)?
            .if_more_than(4)?
            .then_require_percent(50)?
            .end()
            .to_predicate()
    };

    // Two clauses: no bracket applies.
    let two = build(&["a", "b"])?;
    assert_eq!(two.as_boolean().unwrap().minimum_should_match(), None);

    let four = build(&["a", "b", "c", "d"])?;
    assert_eq!(four.as_boolean().unwrap().minimum_should_match(), Some(3));

    let six = build(&["a", "b", "c", "d", "e", "f"])?;
    assert_eq!(six.as_boolean().unwrap().minimum_should_match(), Some(3));

    Ok(())
}

#[test]
fn test_wrapping_combinators() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let except = f
        .match_all()
        .except(f.terms().field("tags")?.matching_any(["draft"]))?
        .to_predicate()?;
    assert_eq!(except.to_string(), "+*:* -tags:(draft)");

    let nested = f
        .nested("authors")?
        .add_with(|f| f.match_().field("authors.name").map(|s| s.matching("ada")))?
        .to_predicate()?;
    assert_eq!(nested.to_string(), "Nested(authors: authors.name:ada)");

    let plain_knn = f
        .knn(5)?
        .field("embedding")?
        .matching(vec![1.0, 0.0, 0.0])?
        .to_predicate()?;
    match plain_knn.kind() {
        PredicateKind::Knn { filter, .. } => assert!(filter.is_none()),
        other => panic!("Expected knn predicate, got {other:?}"),
    }

    let filtered_knn = f
        .knn(5)?
        .field("embedding")?
        .matching(vec![1.0, 0.0, 0.0])?
        .filter(f.range().field("year")?.at_least(2020))?
        .filter(f.terms().field("tags")?.matching_any(["rust"]))?
        .to_predicate()?;
    assert_eq!(
        filtered_knn.to_string(),
        "Knn(embedding, k=5, vector=[1.0, 0.0, 0.0], filter=(+year:[2020 TO *} +tags:(rust)))"
    );

    let boosted_not = f.not(f.match_().field("title")?.matching("x"))?.boost(2.0).to_predicate()?;
    assert_eq!(boosted_not.to_string(), "(-title:x #*:*)^2.0");

    Ok(())
}

#[test]
fn test_empty_boolean_group() -> Result<()> {
    let schema = library_schema();
    let f = SearchPredicateFactory::new(&schema);

    let step = f.bool();
    assert!(!step.has_clause());
    assert_eq!(step.to_predicate()?, SearchPredicate::match_all());

    assert!(matches!(
        f.match_().fields(Vec::<&str>::new())?.matching("rust").to_predicate(),
        Err(PilumError::NoFieldSet)
    ));

    Ok(())
}
