//! The querier: one abstract query in, one normalized response out.

use std::sync::Arc;

use log::debug;

use crate::catalog::{FieldCatalog, FieldCatalogService, NodeId};
use crate::config::{NodeSettings, NodeSettingsService};
use crate::error::{QuerierError, Result};
use crate::query::ast::AbstractQuery;
use crate::query::builder::{BuiltQuery, QueryBuilder};
use crate::query::filter::FilterSet;
use crate::response::NormalizedResponse;
use crate::search::bounds::BoundsResolver;
use crate::search::normalize::Normalizer;
use crate::transport::Transport;

/// Executes abstract queries against one search node.
///
/// The querier holds no per-call state. Node settings and the field catalog
/// are looked up on every call and dropped when it returns, so concurrent
/// calls never share anything mutable.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use solr_querier::catalog::SearchField;
/// use solr_querier::config::{NodeConfig, NodeRegistry, NodeSettings};
/// use solr_querier::query::{AbstractQuery, FilterSet};
/// use solr_querier::response::NativeResponse;
/// use solr_querier::search::Querier;
/// use solr_querier::transport::RecordingTransport;
///
/// let mut registry = NodeRegistry::new();
/// registry
///     .add_node(NodeConfig {
///         id: 1,
///         name: "default".to_string(),
///         settings: NodeSettings::default(),
///         search_fields: vec![SearchField::new("title").with_text_fields(["title_txt"])],
///     })
///     .unwrap();
/// let registry = Arc::new(registry);
///
/// let transport = Arc::new(RecordingTransport::new());
/// transport.push_response(NativeResponse::default());
///
/// let querier = Querier::new(registry.clone(), registry, transport.clone()).with_node(1);
/// let response = querier
///     .query(&AbstractQuery::text("cats"), &FilterSet::new(["items"]))
///     .unwrap();
///
/// assert_eq!(response.total_results, 0);
/// assert_eq!(transport.requests()[0].q, "cats");
/// ```
pub struct Querier {
    node_id: Option<NodeId>,
    settings: Arc<dyn NodeSettingsService>,
    catalog: Arc<dyn FieldCatalogService>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Querier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Querier")
            .field("node_id", &self.node_id)
            .finish()
    }
}

impl Querier {
    pub fn new(
        settings: Arc<dyn NodeSettingsService>,
        catalog: Arc<dyn FieldCatalogService>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Querier {
            node_id: None,
            settings,
            catalog,
            transport,
        }
    }

    /// Select the node to query.
    pub fn with_node(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    /// Build the native request without sending it.
    pub fn build(&self, query: &AbstractQuery, filters: &FilterSet) -> Result<BuiltQuery> {
        let (settings, catalog) = self.load_node()?;
        QueryBuilder::new(&catalog, &settings).build(query, filters)
    }

    /// Translate, execute and normalize a query.
    ///
    /// Field and operator errors are raised before anything is sent. A
    /// transport failure, on the primary request or on a bounds request,
    /// fails the whole call.
    pub fn query(&self, query: &AbstractQuery, filters: &FilterSet) -> Result<NormalizedResponse> {
        let (settings, catalog) = self.load_node()?;
        let built = QueryBuilder::new(&catalog, &settings).build(query, filters)?;

        debug!("Solr query params: {}", built.request.to_query_string());
        let response = self.transport.execute(&built.request)?;

        let bounds = BoundsResolver::new(self.transport.as_ref()).resolve(&built, &response)?;

        Ok(Normalizer::new(&catalog, &settings.resource_name_field).normalize(&response, &bounds))
    }

    fn load_node(&self) -> Result<(NodeSettings, FieldCatalog)> {
        let node_id = self
            .node_id
            .ok_or_else(|| QuerierError::unconfigured("no search node selected"))?;
        let settings = self
            .settings
            .settings(node_id)?
            .ok_or_else(|| QuerierError::unconfigured(format!("search node {node_id} does not exist")))?;

        let catalog = FieldCatalog::new(self.catalog.list(node_id)?);
        debug!("Loaded {} search fields for node {node_id}", catalog.len());

        Ok((settings, catalog))
    }
}
