//! End-to-end querier scenarios over a recording transport.

use std::sync::Arc;

use serde_json::{Value, json};
use solr_querier::catalog::SearchField;
use solr_querier::config::{NodeConfig, NodeRegistry, NodeSettings};
use solr_querier::prelude::*;
use solr_querier::query::FilterKind;
use solr_querier::response::NativeResponse;
use solr_querier::transport::RecordingTransport;

fn registry() -> Arc<NodeRegistry> {
    let mut registry = NodeRegistry::new();
    registry
        .add_node(NodeConfig {
            id: 1,
            name: "default".to_string(),
            settings: NodeSettings::default(),
            search_fields: vec![
                SearchField::new("title")
                    .with_text_fields(["title_txt", "alt_title_txt"])
                    .with_string_fields(["title_s"])
                    .with_sort_field("title_s"),
                SearchField::new("identifier").with_string_fields(["identifier_s"]),
                SearchField::new("subject")
                    .with_text_fields(["subject_txt"])
                    .with_facet_field("subject_ss"),
            ],
        })
        .unwrap();
    Arc::new(registry)
}

fn querier(transport: Arc<RecordingTransport>) -> Querier {
    let registry = registry();
    Querier::new(registry.clone(), registry, transport).with_node(1)
}

fn native(value: Value) -> NativeResponse {
    serde_json::from_value(value).unwrap()
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

#[test]
fn test_all_words_across_text_fields() -> Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(NativeResponse::default());

    let query = AbstractQuery::field("title", Operator::ContainsAllWords, "rare book");
    querier(transport.clone()).query(&query, &FilterSet::new(["items"]))?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].q,
        "(title_txt:(+rare +book) OR alt_title_txt:(+rare +book))"
    );
    Ok(())
}

#[test]
fn test_pattern_on_string_fields() -> Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(NativeResponse::default());

    let query = AbstractQuery::field("identifier", Operator::MatchesPattern, "New*York?");
    querier(transport.clone()).query(&query, &FilterSet::new(["items"]))?;

    assert_eq!(transport.requests()[0].q, "(identifier_s:(/New.*York./))");
    Ok(())
}

#[test]
fn test_date_range_bounds() -> Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport
        .push_response(native(json!({
            "grouped": {"resource_name_s": {"matches": 4, "groups": [
                {"groupValue": "items", "doclist": {"numFound": 4, "docs": [{"id": "items:7"}]}}
            ]}},
            "stats": {"stats_fields": {"date_is": {"min": 1992, "max": 1999}}}
        })))
        .push_response(native(json!({
            "stats": {"stats_fields": {"date_is": {"min": 1850, "max": 2020}}}
        })));

    let filters = FilterSet::new(["items"])
        .add_date_range("date_is", DateRange::between("1990", "2000"))
        .add_stat_field("date_is");
    let response = querier(transport.clone()).query(&AbstractQuery::default(), &filters)?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);

    let primary = &requests[0];
    assert!(primary.has_date_range_filter());
    assert!(
        primary
            .filter_clauses()
            .any(|clause| clause == "date_is:[1990 TO 2000]")
    );

    let bounds = &requests[1];
    assert!(!bounds.has_date_range_filter());
    assert!(bounds.group.is_none());
    assert_eq!(bounds.rows, Some(0));
    assert_eq!(bounds.stats_fields, vec!["date_is"]);
    assert_eq!(
        bounds.filters.iter().map(|f| f.kind).collect::<Vec<_>>(),
        vec![FilterKind::ResourceType]
    );

    let stat = &response.date_stats[0];
    assert_eq!(stat.field, "date_is");
    assert_eq!(stat.min, json!(1992));
    assert_eq!(stat.max, json!(1999));
    assert_eq!(stat.total_min, json!(1850));
    assert_eq!(stat.total_max, json!(2020));

    assert_eq!(response.total_results, 4);
    assert_eq!(response.ids("items"), &["7".to_string()]);
    Ok(())
}

#[test]
fn test_one_bounds_request_per_stat_field() -> Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport
        .push_response(native(json!({
            "stats": {"stats_fields": {
                "date_is": {"min": 1992, "max": 1999},
                "year_is": {"min": 1995, "max": 1998}
            }}
        })))
        .push_response(native(json!({
            "stats": {"stats_fields": {"date_is": {"min": 1850, "max": 2020}}}
        })))
        .push_response(native(json!({
            "stats": {"stats_fields": {"year_is": {"min": 1700, "max": 2010}}}
        })));

    let filters = FilterSet::new(["items"])
        .add_date_range("date_is", DateRange::between("1990", "2000"))
        .add_stat_field("date_is")
        .add_stat_field("year_is");
    let response = querier(transport.clone()).query(&AbstractQuery::default(), &filters)?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].stats_fields, vec!["date_is", "year_is"]);
    assert_eq!(requests[1].stats_fields, vec!["date_is"]);
    assert_eq!(requests[2].stats_fields, vec!["year_is"]);
    for bounds in &requests[1..] {
        assert!(!bounds.has_date_range_filter());
        assert!(bounds.group.is_none());
        assert_eq!(bounds.rows, Some(0));
    }

    assert_eq!(response.date_stats.len(), 2);
    let date = &response.date_stats[0];
    assert_eq!(date.field, "date_is");
    assert_eq!((&date.min, &date.max), (&json!(1992), &json!(1999)));
    assert_eq!((&date.total_min, &date.total_max), (&json!(1850), &json!(2020)));

    let year = &response.date_stats[1];
    assert_eq!(year.field, "year_is");
    assert_eq!((&year.min, &year.max), (&json!(1995), &json!(1998)));
    assert_eq!((&year.total_min, &year.total_max), (&json!(1700), &json!(2010)));
    Ok(())
}

#[test]
fn test_primary_failure_sends_nothing_else() {
    let transport = Arc::new(RecordingTransport::new());
    transport
        .push_error(500, "Server Error")
        .push_response(native(json!({
            "stats": {"stats_fields": {"date_is": {"min": 1850, "max": 2020}}}
        })));

    let filters = FilterSet::new(["items"])
        .add_date_range("date_is", DateRange::between("1990", "2000"))
        .add_stat_field("date_is");
    let err = querier(transport.clone())
        .query(&AbstractQuery::default(), &filters)
        .unwrap_err();

    assert_eq!(err.code(), 500);
    assert_eq!(err.to_string(), "Server Error");
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn test_no_bounds_request_without_date_range() -> Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(native(json!({
        "stats": {"stats_fields": {"date_is": {"min": 1850, "max": 2020}}}
    })));

    let filters = FilterSet::new(["items"]).add_stat_field("date_is");
    let response = querier(transport.clone()).query(&AbstractQuery::default(), &filters)?;

    assert_eq!(transport.request_count(), 1);
    assert_eq!(response.date_stats[0].total_min, json!(1850));
    Ok(())
}

#[test]
fn test_zero_count_facets_are_dropped() -> Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(native(json!({
        "facet_counts": {"facet_fields": {"subject_ss": ["Art", 4, "History", 0]}}
    })));

    let filters = FilterSet::new(["items"]).add_facet_field("subject");
    let response = querier(transport.clone()).query(&AbstractQuery::default(), &filters)?;

    assert_eq!(transport.requests()[0].facet_fields, vec!["subject_ss"]);
    assert_eq!(response.facet_count("subject", "Art"), Some(4));
    assert_eq!(response.facet_count("subject", "History"), None);
    assert_eq!(response.facets["subject"].len(), 1);
    Ok(())
}

#[test]
fn test_empty_query_matches_all() -> Result<()> {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(NativeResponse::default());

    let query = AbstractQuery::all(vec![AbstractQuery::field(
        "title",
        Operator::ContainsAnyWord,
        "",
    )]);
    querier(transport.clone()).query(&query, &FilterSet::new(["items", "item_sets"]))?;

    let request = &transport.requests()[0];
    let params = request.to_params();
    assert_eq!(param(&params, "q"), vec!["*:*"]);
    assert_eq!(param(&params, "group.field"), vec!["resource_name_s"]);
    assert_eq!(param(&params, "fq")[0], "resource_name_s:(items OR item_sets)");
    Ok(())
}

#[test]
fn test_field_errors_fail_before_transport() {
    let transport = Arc::new(RecordingTransport::new());
    let querier = querier(transport.clone());

    let unknown_field = AbstractQuery::field("creator", Operator::ContainsAnyWord, "x");
    let err = querier
        .query(&unknown_field, &FilterSet::new(["items"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Field creator does not exist");

    let not_facetable = FilterSet::new(["items"]).add_facet_filter("title", "x");
    let err = querier
        .query(&AbstractQuery::default(), &not_facetable)
        .unwrap_err();
    assert!(matches!(err, QuerierError::FieldNotFacetable(_)));

    let not_sortable = FilterSet::new(["items"])
        .with_sort(Sort::parse("subject asc").unwrap());
    let err = querier
        .query(&AbstractQuery::default(), &not_sortable)
        .unwrap_err();
    assert!(matches!(err, QuerierError::FieldNotSortable(_)));

    assert_eq!(transport.request_count(), 0);
}

#[test]
fn test_bounds_failure_aborts_query() {
    let transport = Arc::new(RecordingTransport::new());
    transport
        .push_response(native(json!({
            "stats": {"stats_fields": {"date_is": {"min": 1992, "max": 1999}}}
        })))
        .push_error(503, "Solr is unavailable");

    let filters = FilterSet::new(["items"])
        .add_date_range("date_is", DateRange::new(Some("1990"), None))
        .add_stat_field("date_is");
    let err = querier(transport.clone())
        .query(&AbstractQuery::default(), &filters)
        .unwrap_err();

    assert_eq!(err.code(), 503);
    assert_eq!(err.to_string(), "Solr is unavailable");
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn test_unconfigured_node() {
    let registry = registry();
    let transport = Arc::new(RecordingTransport::new());

    let no_node = Querier::new(registry.clone(), registry.clone(), transport.clone());
    assert!(matches!(
        no_node.query(&AbstractQuery::default(), &FilterSet::new(["items"])),
        Err(QuerierError::UnconfiguredNode(_))
    ));

    let missing = Querier::new(registry.clone(), registry, transport.clone()).with_node(42);
    assert!(matches!(
        missing.build(&AbstractQuery::default(), &FilterSet::new(["items"])),
        Err(QuerierError::UnconfiguredNode(_))
    ));
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn test_concurrent_queries_share_nothing() {
    let transport = Arc::new(RecordingTransport::new());
    for _ in 0..8 {
        transport.push_response(NativeResponse::default());
    }
    let querier = Arc::new(querier(transport.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let querier = querier.clone();
            std::thread::spawn(move || {
                let query = AbstractQuery::text(format!("term{i}"));
                querier.query(&query, &FilterSet::new(["items"]))
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }

    let mut queries: Vec<_> = transport.requests().into_iter().map(|r| r.q).collect();
    queries.sort();
    assert_eq!(queries.len(), 8);
    assert_eq!(queries[0], "term0");
}
