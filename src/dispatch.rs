//! Mode dispatch: coerces the operator's text for the selected mode and runs
//! the store operation bound to it.

use crate::catalog::{InputKind, Lookup, ModeId, QueryCatalog, CATALOG};
use crate::config::QueryConfig;
use crate::db::{ProductStore, ResultSet, Row};
use crate::error::{Result, ShelfError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Input after coercion for a mode's input kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Integer(i64),
    Text(String),
}

/// Interprets `raw_input` according to `kind`.
///
/// Integers are parsed from the text as given, so empty or padded input is
/// rejected. Text passes through unchanged, including the empty string.
pub fn coerce(kind: InputKind, raw_input: &str) -> Result<Param> {
    match kind {
        InputKind::Integer => raw_input
            .parse::<i64>()
            .map(Param::Integer)
            .map_err(|_| ShelfError::invalid_input("not an integer")),
        InputKind::Text => Ok(Param::Text(raw_input.to_string())),
    }
}

/// Routes a (mode, input) pair to the store and tags the rows with the
/// mode's columns.
pub struct QueryDispatcher {
    catalog: &'static QueryCatalog,
    store: Arc<dyn ProductStore>,
    timeout: Duration,
}

impl QueryDispatcher {
    /// Creates a dispatcher over the built-in catalog.
    pub fn new(store: Arc<dyn ProductStore>, config: &QueryConfig) -> Self {
        Self {
            catalog: &CATALOG,
            store,
            timeout: config.timeout(),
        }
    }

    /// Overrides the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &'static QueryCatalog {
        self.catalog
    }

    /// Runs the lookup for `mode_id` with the operator's raw text.
    ///
    /// Registered modes with no bound store operation answer with an empty
    /// result instead of an error, so the selector can list them early.
    pub async fn dispatch(&self, mode_id: ModeId, raw_input: &str) -> Result<ResultSet> {
        let mode = self.catalog.mode(mode_id)?;

        let Some(lookup) = mode.lookup else {
            debug!("Mode {} ({}) has no lookup, returning empty", mode_id, mode.label);
            return Ok(ResultSet::empty(mode_id, mode.columns));
        };

        let param = coerce(mode.input_kind, raw_input)?;

        let start = Instant::now();
        let rows = self.run(lookup, param).await?;
        let elapsed = start.elapsed();

        info!(
            "Mode {} ({}) returned {} rows in {:?}",
            mode_id,
            mode.label,
            rows.len(),
            elapsed
        );

        Ok(ResultSet::new(mode_id, mode.columns, rows)?.with_execution_time(elapsed))
    }

    async fn run(&self, lookup: Lookup, param: Param) -> Result<Vec<Row>> {
        let call = async {
            match (lookup, param) {
                (Lookup::ProductById, Param::Integer(id)) => self.store.lookup_by_id(id).await,
                (Lookup::ProductsByCategory, Param::Text(category)) => {
                    self.store.lookup_by_category(&category).await
                }
                (lookup, param) => Err(ShelfError::internal(format!(
                    "{lookup:?} cannot take {param:?}"
                ))),
            }
        };

        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or_else(|_| {
                warn!("Lookup {:?} timed out after {:?}", lookup, self.timeout);
                Err(ShelfError::persistence(format!(
                    "Lookup timed out after {} seconds",
                    self.timeout.as_secs_f32()
                )))
            })
    }

    /// Closes the underlying store.
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FailingProductStore, MockProductStore, StoreCall, Value};

    fn dispatcher_with(store: Arc<dyn ProductStore>) -> QueryDispatcher {
        QueryDispatcher::new(store, &QueryConfig::default())
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce(InputKind::Integer, "7").unwrap(), Param::Integer(7));
        assert_eq!(coerce(InputKind::Integer, "-3").unwrap(), Param::Integer(-3));
        for bad in ["abc", "", " 7", "7.0", "99999999999999999999"] {
            assert_eq!(
                coerce(InputKind::Integer, bad),
                Err(ShelfError::invalid_input("not an integer")),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn test_coerce_text_is_verbatim() {
        assert_eq!(
            coerce(InputKind::Text, " dairy ").unwrap(),
            Param::Text(" dairy ".to_string())
        );
        assert_eq!(coerce(InputKind::Text, "").unwrap(), Param::Text(String::new()));
    }

    #[tokio::test]
    async fn test_dispatch_by_id() {
        let store = Arc::new(MockProductStore::grocery());
        let dispatcher = dispatcher_with(store.clone());

        let result = dispatcher.dispatch(0, "7").await.unwrap();

        assert_eq!(store.calls(), vec![StoreCall::ById(7)]);
        assert_eq!(result.mode_id, 0);
        assert_eq!(result.rows.len(), 1);
        for row in &result.rows {
            assert_eq!(row.len(), CATALOG.schema_for(0).unwrap().len());
        }
        assert_eq!(result.rows[0][1], Value::from("Gala Apples"));
    }

    #[tokio::test]
    async fn test_dispatch_by_id_rejects_text() {
        let store = Arc::new(MockProductStore::grocery());
        let dispatcher = dispatcher_with(store.clone());

        let err = dispatcher.dispatch(0, "abc").await.unwrap_err();

        assert_eq!(err, ShelfError::invalid_input("not an integer"));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_by_category() {
        let store = Arc::new(MockProductStore::grocery());
        let dispatcher = dispatcher_with(store.clone());

        let result = dispatcher.dispatch(1, "dairy").await.unwrap();

        assert_eq!(store.calls(), vec![StoreCall::ByCategory("dairy".to_string())]);
        assert_eq!(result.columns, CATALOG.schema_for(1).unwrap());
        assert_eq!(result.rows.len(), 3);

        let none = dispatcher.dispatch(1, "frozen").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_empty_category_is_forwarded() {
        let store = Arc::new(MockProductStore::grocery());
        let dispatcher = dispatcher_with(store.clone());

        let result = dispatcher.dispatch(1, "").await.unwrap();

        assert!(result.is_empty());
        assert_eq!(store.calls(), vec![StoreCall::ByCategory(String::new())]);
    }

    #[tokio::test]
    async fn test_dispatch_unbound_modes_are_empty() {
        let store = Arc::new(MockProductStore::grocery());
        let dispatcher = dispatcher_with(store.clone());

        for mode_id in 2..CATALOG.len() {
            let result = dispatcher.dispatch(mode_id, "not even a number").await.unwrap();
            assert!(result.is_empty());
            assert_eq!(result.columns, CATALOG.schema_for(mode_id).unwrap());
        }
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_mode() {
        let dispatcher = dispatcher_with(Arc::new(MockProductStore::grocery()));
        let err = dispatcher.dispatch(CATALOG.len(), "1").await.unwrap_err();
        assert_eq!(err, ShelfError::unknown_mode(CATALOG.len()));
    }

    #[tokio::test]
    async fn test_dispatch_propagates_persistence_error() {
        let dispatcher = dispatcher_with(Arc::new(FailingProductStore::new("connection reset")));
        let err = dispatcher.dispatch(1, "dairy").await.unwrap_err();
        assert_eq!(err, ShelfError::persistence("connection reset"));
    }

    #[tokio::test]
    async fn test_dispatch_times_out() {
        let store = MockProductStore::grocery().with_latency(Duration::from_millis(500));
        let dispatcher =
            dispatcher_with(Arc::new(store)).with_timeout(Duration::from_millis(20));

        let err = dispatcher.dispatch(0, "1").await.unwrap_err();
        assert!(matches!(err, ShelfError::Persistence(msg) if msg.contains("timed out")));
    }
}
