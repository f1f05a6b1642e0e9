//! Non-blocking column search

use std::collections::HashMap;

use tokio::task::JoinHandle;

use super::runner::search_by_columns;
use crate::dataset::QueryResults;
use crate::datasource::DatasourceRef;
use crate::observability::{log_event_with_fields, Event};

/// One [`search_by_columns`] call run off the async executor
///
/// Missing inputs resolve at once to an empty result. There is no
/// cancellation; an unwanted task is simply dropped.
#[derive(Debug, Clone)]
pub struct AsyncSearch {
    query: Option<HashMap<String, String>>,
    datasource: Option<DatasourceRef>,
}

impl AsyncSearch {
    pub fn new(query: Option<HashMap<String, String>>, datasource: Option<DatasourceRef>) -> Self {
        Self { query, datasource }
    }

    /// Runs the search on the blocking pool
    pub async fn run(self) -> QueryResults {
        let (Some(query), Some(datasource)) = (self.query, self.datasource) else {
            return QueryResults::empty();
        };

        let name = datasource.name().to_string();
        match tokio::task::spawn_blocking(move || search_by_columns(&query, datasource.as_ref()))
            .await
        {
            Ok(results) => results,
            Err(e) => {
                let error = e.to_string();
                log_event_with_fields(
                    Event::AsyncSearchFailed,
                    &[("datasource", name.as_str()), ("error", error.as_str())],
                );
                QueryResults::empty()
            }
        }
    }

    /// Starts the search as a task on the current runtime
    pub fn spawn(self) -> JoinHandle<QueryResults> {
        tokio::spawn(self.run())
    }
}
