//! End-to-end search scenarios over a small bond universe.

use std::sync::Arc;

use pickgrid_core::{Field, Formatted, Record, RecordRef, Value};
use pickgrid_search::{Keyword, KeywordIndex, SearchProfile, Searchable, Searcher, search};
use pickgrid_text::FormatCache;

#[derive(Debug, Clone)]
struct Row {
    record: RecordRef,
    keywords: Arc<[Keyword]>,
    disabled: bool,
}

impl Searchable for Row {
    fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    fn record(&self) -> Option<&Record> {
        Some(&self.record)
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

fn bond(id: &str, ticker: &str, name: &str, coupon: f64, maturity: &str) -> RecordRef {
    Arc::new(
        Record::new(id)
            .with("defaultSecurityId", ticker)
            .with("name", name)
            .with("issuerName", name)
            .with("coupon", coupon)
            .with("maturityDate", maturity),
    )
}

fn coupon_column() -> Vec<Field> {
    vec![
        Field::new("defaultSecurityId", "Id"),
        Field::new("coupon", "Cpn").with_formatter(|v: Option<&Value>, _: &Record| {
            Ok(Formatted::from(format!("{:.3}", v.and_then(Value::as_number).unwrap_or(0.0))))
        }),
    ]
}

fn rows(records: &[RecordRef]) -> Vec<Row> {
    let profile = SearchProfile::securities();
    let fields = coupon_column();
    let mut index = KeywordIndex::default();
    let mut formats = FormatCache::default();
    records
        .iter()
        .map(|r| Row {
            record: Arc::clone(r),
            keywords: index.keywords(r, &fields, &profile, &mut formats).unwrap(),
            disabled: false,
        })
        .collect()
}

fn ids(rows: &[Row]) -> Vec<&str> {
    rows.iter().map(|r| r.record.id().as_str()).collect()
}

fn universe() -> Vec<RecordRef> {
    vec![
        bond("1", "AAPLX", "Apple Extended", 3.25, "2031-02-15"),
        bond("2", "AAPL", "Apple Inc", 4.5, "2030-06-01"),
        bond("3", "MSFT", "Microsoft", 2.0, "2029-11-30"),
        bond("4", "KZJ", "Kozey - Jacobs", 5.125, "2035-01-05"),
        bond("5", "KZY", "Kozey Jakubowski", 4.5, "2033-12-31"),
    ]
}

#[test]
fn exact_identifier_ranks_first() {
    let hits = search("aapl", rows(&universe()), &SearchProfile::securities());
    assert_eq!(ids(&hits), ["2", "1"]);
}

#[test]
fn quoted_phrase_is_one_token() {
    let hits = search("\"Kozey - Ja\"", rows(&universe()), &SearchProfile::securities());
    assert_eq!(ids(&hits), ["4"]);

    let loose = search("Kozey Ja", rows(&universe()), &SearchProfile::securities());
    assert_eq!(ids(&loose), ["4", "5"]);
}

#[test]
fn every_token_must_match_some_keyword() {
    let hits = search("apple 2030", rows(&universe()), &SearchProfile::securities());
    assert_eq!(ids(&hits), ["2"]);
}

#[test]
fn float_term_matches_formatted_coupon() {
    // The keyword is the formatted "4.500"; the text fields do not compete
    // for a definite float.
    let hits = search("4.5", rows(&universe()), &SearchProfile::securities());
    assert_eq!(ids(&hits), ["2", "5"]);
}

#[test]
fn date_fragment_matches_maturity() {
    let hits = search("12/31", rows(&universe()), &SearchProfile::securities());
    assert_eq!(ids(&hits), ["5"]);
}

#[test]
fn blank_query_is_identity() {
    let mut input = rows(&universe());
    input[0].disabled = true;
    let hits = search("   ", input, &SearchProfile::securities());
    assert_eq!(ids(&hits), ["1", "2", "3", "4", "5"]);
}

#[test]
fn disabled_candidates_are_dropped() {
    let mut input = rows(&universe());
    input[1].disabled = true;
    let hits = search("aapl", input, &SearchProfile::securities());
    assert_eq!(ids(&hits), ["1"]);
}

#[test]
fn equal_scores_keep_input_order() {
    let hits = search("kozey", rows(&universe()), &SearchProfile::securities());
    assert_eq!(ids(&hits), ["4", "5"]);
    let mut reversed = rows(&universe());
    reversed.reverse();
    let hits = search("kozey", reversed, &SearchProfile::securities());
    assert_eq!(ids(&hits), ["5", "4"]);
}

#[test]
fn searcher_memo_is_reused_across_queries() {
    let mut searcher = Searcher::default();
    let profile = SearchProfile::securities();
    searcher.search("apple", rows(&universe()), &profile);
    let misses = searcher.stats().misses;
    searcher.search("apple", rows(&universe()), &profile);
    assert_eq!(searcher.stats().misses, misses);
    assert!(searcher.stats().hits > 0);
}

#[test]
fn scenario_alpha_beta() {
    let fields = vec![Field::new("name", "Name")];
    let profile = SearchProfile::for_fields(&fields);
    let mut index = KeywordIndex::default();
    let mut formats = FormatCache::default();
    let make = |id: &str, name: &str, index: &mut KeywordIndex, formats: &mut FormatCache| {
        let record: RecordRef = Arc::new(Record::new(id).with("name", name));
        let keywords = index.keywords(&record, &fields, &profile, formats).unwrap();
        Row {
            record,
            keywords,
            disabled: false,
        }
    };
    let rows = vec![
        make("A", "Alpha", &mut index, &mut formats),
        make("B", "Beta", &mut index, &mut formats),
    ];

    let both = search("a", rows.clone(), &profile);
    assert_eq!(ids(&both), ["A", "B"]);

    let alpha = search("alpha", rows, &profile);
    assert_eq!(ids(&alpha), ["A"]);
}
