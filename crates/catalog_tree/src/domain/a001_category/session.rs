use super::builder::build_with_report;
use super::data_source::{CategoryDataSource, FetchedCategories};
use super::error::{DataSourceError, IntegrityWarning};
use super::filter::filter;
use super::forest::Forest;
use super::selection::{SelectAllState, SelectionSession};
use contracts::domain::a001_category::aggregate::CategoryId;

/// Handed out by `begin_load`; only the latest ticket may apply a result
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded {
        nodes: usize,
        roots: usize,
        skipped: usize,
        warnings: Vec<IntegrityWarning>,
    },
    /// The fetch failed; the forest is now empty and `last_error` is set
    Failed(String),
    /// The session was closed, or the ticket is not the current one
    Discarded,
    /// A load is already in flight
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Idle,
    Loading,
}

/// One category picker / tree view instance.
///
/// Owns the full forest, the search query with the visible forest derived
/// from it, and the selection. Sessions never share state.
#[derive(Debug)]
pub struct CategoryTreeSession {
    forest: Forest,
    visible: Forest,
    query: String,
    selection: SelectionSession,
    load_state: LoadState,
    generation: u64,
    closed: bool,
    last_error: Option<String>,
}

impl CategoryTreeSession {
    pub fn open(initial_ids: Vec<CategoryId>) -> Self {
        Self {
            forest: Forest::empty(),
            visible: Forest::empty(),
            query: String::new(),
            selection: SelectionSession::open(initial_ids),
            load_state: LoadState::Idle,
            generation: 0,
            closed: false,
            last_error: None,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn visible(&self) -> &Forest {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &SelectionSession {
        &self.selection
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Start a load. `None` while another load is in flight or after close.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.closed || self.load_state == LoadState::Loading {
            return None;
        }
        self.generation += 1;
        self.load_state = LoadState::Loading;
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Apply a finished fetch. Late results (session closed meanwhile) are ignored.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<FetchedCategories, DataSourceError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!("Discarding load result of stale generation {}", ticket.generation);
            return LoadOutcome::Discarded;
        }
        self.load_state = LoadState::Idle;
        if self.closed {
            tracing::debug!("Discarding load result, session already closed");
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(fetched) => {
                let report = build_with_report(fetched.records);
                for warning in &report.warnings {
                    tracing::warn!("{}", warning);
                }
                self.forest = report.forest;
                self.last_error = None;
                self.refilter();
                LoadOutcome::Loaded {
                    nodes: self.forest.len(),
                    roots: self.forest.root_ids().len(),
                    skipped: fetched.skipped,
                    warnings: report.warnings,
                }
            }
            Err(e) => {
                tracing::error!("Failed to load categories: {}", e);
                let message = e.to_string();
                self.forest = Forest::empty();
                self.visible = Forest::empty();
                self.last_error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Give up on a load without applying anything, so the next one may start
    pub fn abort_load(&mut self, ticket: LoadTicket) {
        if ticket.generation == self.generation && self.load_state == LoadState::Loading {
            tracing::debug!("Load generation {} aborted", ticket.generation);
            self.load_state = LoadState::Idle;
        }
    }

    /// Fetch and apply in one go. Dropping the future mid-fetch aborts the load.
    pub async fn load(&mut self, source: &dyn CategoryDataSource) -> LoadOutcome {
        let Some(ticket) = self.begin_load() else {
            return if self.closed {
                LoadOutcome::Discarded
            } else {
                LoadOutcome::Busy
            };
        };
        let mut pending = PendingLoad {
            session: self,
            ticket: Some(ticket),
        };
        let result = source.fetch_all().await;
        match pending.ticket.take() {
            Some(ticket) => pending.session.complete_load(ticket, result),
            None => LoadOutcome::Discarded,
        }
    }

    // ------------------------------------------------------------------
    // Search & expansion
    // ------------------------------------------------------------------

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = filter(&self.forest, &self.query);
    }

    /// Flip a node as the user sees it and write the same flag to both
    /// forests, so collapsing an ancestor opened by the search stays collapsed
    /// once the query is cleared.
    pub fn toggle_expand(&mut self, id: CategoryId) -> bool {
        let current = if self.visible.contains(id) {
            self.visible.is_expanded(id)
        } else {
            self.forest.is_expanded(id)
        };
        let in_forest = self.forest.set_expanded(id, !current);
        let in_visible = self.visible.set_expanded(id, !current);
        in_forest || in_visible
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn toggle_selection(&mut self, id: CategoryId) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all_visible(&mut self) {
        self.selection.select_all_visible(&self.visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all_state(&self) -> SelectAllState {
        self.selection.visible_state(&self.visible)
    }

    /// Selected ids in tree order; closes the session
    pub fn confirm(&mut self) -> Vec<CategoryId> {
        let result = self.selection.confirm(&self.forest);
        self.close();
        result
    }

    /// Initial ids; closes the session
    pub fn cancel(&mut self) -> Vec<CategoryId> {
        let result = self.selection.cancel();
        self.close();
        result
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// Resets the session to idle if `load` is dropped before the fetch returns
struct PendingLoad<'a> {
    session: &'a mut CategoryTreeSession,
    ticket: Option<LoadTicket>,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.session.abort_load(ticket);
        }
    }
}
