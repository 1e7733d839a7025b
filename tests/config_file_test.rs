//! Loading node registries from disk.

use std::io::Write;
use std::sync::Arc;

use solr_querier::config::NodeRegistry;
use solr_querier::prelude::*;
use solr_querier::transport::RecordingTransport;
use tempfile::NamedTempFile;

const REGISTRY: &str = r#"{
    "nodes": [
        {
            "id": 3,
            "name": "archive",
            "settings": {
                "client": {"hostname": "solr.internal", "port": 8080, "path": "solr/archive"},
                "resource_name_field": "type_s",
                "qf": "title_txt^3 body_txt",
                "highlight": {"highlighting": true, "fragsize": "200", "snippets": 2}
            },
            "search_fields": [
                {"name": "title", "text_fields": "title_txt alt_title_txt", "sort_field": "title_s"},
                {"name": "subject", "text_fields": ["subject_txt"], "facet_field": "subject_ss"}
            ]
        }
    ]
}"#;

fn registry_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(REGISTRY.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_registry() -> Result<()> {
    let file = registry_file();
    let registry = NodeRegistry::from_file(file.path())?;

    let node = registry.find("archive").unwrap();
    assert_eq!(node.id, 3);
    assert_eq!(registry.find("3").unwrap().name, "archive");
    assert_eq!(
        node.settings.client.select_url(),
        "http://solr.internal:8080/solr/archive/select"
    );
    assert_eq!(node.settings.highlight.fragsize, Some(200));
    assert_eq!(node.search_fields[0].text_fields, vec!["title_txt", "alt_title_txt"]);
    Ok(())
}

#[test]
fn test_registry_drives_querier() -> Result<()> {
    let file = registry_file();
    let registry = Arc::new(NodeRegistry::from_file(file.path())?);
    let querier = Querier::new(
        registry.clone(),
        registry,
        Arc::new(RecordingTransport::new()),
    )
    .with_node(3);

    let query = AbstractQuery::field("title", Operator::ContainsExpression, "rare book");
    let filters = FilterSet::new(["items"]).add_facet_filter("subject", vec!["Art", "Maps"]);
    let built = querier.build(&query, &filters)?;
    let request = built.request;

    assert_eq!(request.qf.as_deref(), Some("title_txt^3 body_txt"));
    assert_eq!(request.group.as_ref().unwrap().field, "type_s");
    assert!(request
        .filter_clauses()
        .any(|clause| clause == "subject_ss:(\"Art\" OR \"Maps\")"));
    let highlight = request.highlight.unwrap();
    assert_eq!(highlight.fragsize, Some(200));
    assert_eq!(highlight.snippets, Some(2));
    Ok(())
}

#[test]
fn test_missing_file() {
    let result = NodeRegistry::from_file("/nonexistent/nodes.json");
    assert!(matches!(result, Err(QuerierError::Io(_))));
}

#[test]
fn test_malformed_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{\"nodes\": [{\"name\": \"no id\"}]}").unwrap();
    assert!(matches!(
        NodeRegistry::from_file(file.path()),
        Err(QuerierError::Json(_))
    ));
}
