//! Search session: the stateful controller behind a find/replace panel.
//!
//! A session moves through `Idle -> Querying -> HasResults` and back to
//! `Idle` on clear or after a replace-all. Debouncing is modeled with a
//! generation counter instead of timer cancellation: every new query bumps the
//! generation and hands out a [`QueryTicket`]; when the host's timer fires it
//! calls [`SearchSession::complete_query`] with that ticket, which is a no-op
//! unless the ticket is still the latest one.
//!
//! Sessions hold no shared state, so any number of them can run side by side.

use crate::find_replace::{
    EditError, EditOperation, Match, MatchSet, SearchOptions, find, plan_replace_all,
    plan_replace_one,
};
use crate::history::{DEFAULT_HISTORY_LIMIT, History, ReplaceRecord, ReplaceScope};
use crate::host::HostEditor;
use scenekit_core::content_hash;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default debounce window for typed queries.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Configuration for a search session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
    /// Number of entries kept in each history list
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl SessionConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce window
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Sets the history limit
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No active query.
    Idle,
    /// A query is waiting for its debounce window to elapse.
    Querying,
    /// The latest query has been evaluated (possibly with zero matches).
    HasResults,
}

/// Navigation direction through the match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Map a `+1` / `-1` step to a direction; any other value is `None`.
    pub fn from_step(step: i32) -> Option<Self> {
        match step {
            1 => Some(Self::Next),
            -1 => Some(Self::Previous),
            _ => None,
        }
    }
}

/// Handle for a pending debounced query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
    ready_at: Instant,
}

impl QueryTicket {
    /// The generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When the debounce window elapses.
    pub fn ready_at(&self) -> Instant {
        self.ready_at
    }

    /// Returns true once `now` is past the debounce window.
    pub fn is_ready(&self, now: Instant) -> bool {
        now >= self.ready_at
    }
}

#[derive(Debug, Clone)]
struct PendingQuery {
    query: String,
    options: SearchOptions,
}

/// Stateful find/replace controller for one open search surface.
#[derive(Debug, Clone)]
pub struct SearchSession {
    config: SessionConfig,
    state: SessionState,
    generation: u64,
    pending: Option<PendingQuery>,
    query: String,
    options: SearchOptions,
    matches: MatchSet,
    current: Option<usize>,
    query_history: History<String>,
    replace_history: History<ReplaceRecord>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SearchSession {
    /// Create an idle session.
    pub fn new(config: SessionConfig) -> Self {
        let history_limit = config.history_limit;
        Self {
            config,
            state: SessionState::Idle,
            generation: 0,
            pending: None,
            query: String::new(),
            options: SearchOptions::default(),
            matches: MatchSet::default(),
            current: None,
            query_history: History::new(history_limit),
            replace_history: History::new(history_limit),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The query of the latest evaluated search.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// The current match set (empty while idle).
    pub fn match_set(&self) -> &MatchSet {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Index of the match under the cursor.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The match under the cursor.
    pub fn current_match(&self) -> Option<&Match> {
        self.current.and_then(|index| self.matches.get(index))
    }

    /// Current value of the generation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Past queries, most recent first.
    pub fn query_history(&self) -> &History<String> {
        &self.query_history
    }

    /// Past replacements, most recent first.
    pub fn replace_history(&self) -> &History<ReplaceRecord> {
        &self.replace_history
    }

    /// Start a debounced query.
    ///
    /// Supersedes any pending query. An empty query clears the session and
    /// returns `None`.
    pub fn begin_query(
        &mut self,
        query: impl Into<String>,
        options: SearchOptions,
    ) -> Option<QueryTicket> {
        let query = query.into();
        if query.is_empty() {
            self.clear();
            return None;
        }

        self.generation += 1;
        self.pending = Some(PendingQuery { query, options });
        self.state = SessionState::Querying;

        Some(QueryTicket {
            generation: self.generation,
            ready_at: Instant::now() + self.config.debounce(),
        })
    }

    /// Evaluate the pending query once its debounce window has elapsed.
    ///
    /// Returns `None` without doing any work if `ticket` has been superseded.
    pub fn complete_query(&mut self, ticket: QueryTicket, source: &str) -> Option<&MatchSet> {
        if ticket.generation != self.generation {
            tracing::trace!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping superseded query"
            );
            return None;
        }
        let pending = self.pending.take()?;
        self.evaluate(pending.query, pending.options, source);
        Some(&self.matches)
    }

    /// Search immediately, bypassing the debounce window.
    pub fn search(
        &mut self,
        query: impl Into<String>,
        options: SearchOptions,
        source: &str,
    ) -> &MatchSet {
        if let Some(ticket) = self.begin_query(query, options) {
            self.complete_query(ticket, source);
        }
        &self.matches
    }

    /// Text to seed a new query with: the host's selection, if it is a
    /// non-empty span on a single line.
    pub fn seed_from_selection(&self, host: &dyn HostEditor) -> Option<String> {
        let selection = host.selection()?;
        let text = host.text();
        selection.single_line_text(&text).map(str::to_string)
    }

    /// Move the cursor one match forward or back, wrapping at both ends.
    ///
    /// A no-op returning `None` when there are no results.
    pub fn step(&mut self, direction: Direction) -> Option<&Match> {
        if self.state != SessionState::HasResults || self.matches.is_empty() {
            return None;
        }
        let count = self.matches.len();
        let next = match (self.current, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => count - 1,
            (Some(index), Direction::Next) => (index + 1) % count,
            (Some(index), Direction::Previous) => (index + count - 1) % count,
        };
        self.current = Some(next);
        self.matches.get(next)
    }

    /// [`step`](Self::step), then reveal and select the new current match in the host.
    pub fn navigate(&mut self, direction: Direction, host: &mut dyn HostEditor) -> Option<&Match> {
        let (line, column, end_column) = {
            let m = self.step(direction)?;
            (m.line, m.column, m.end_column)
        };
        host.reveal_and_select(line, column, end_column);
        self.current_match()
    }

    /// Replace the match under the cursor.
    pub fn replace_current(
        &mut self,
        replacement: &str,
        host: &mut dyn HostEditor,
    ) -> Result<Option<EditOperation>, EditError> {
        match self.current {
            Some(index) => self.replace_one(index, replacement, host),
            None => Ok(None),
        }
    }

    /// Replace the match at `index`, then re-run the query against the edited buffer.
    ///
    /// Out-of-range indices and sessions without results are no-ops
    /// (`Ok(None)`). Matches computed against a different buffer are rejected
    /// with [`EditError::StaleMatches`] and nothing is applied.
    pub fn replace_one(
        &mut self,
        index: usize,
        replacement: &str,
        host: &mut dyn HostEditor,
    ) -> Result<Option<EditOperation>, EditError> {
        if self.state != SessionState::HasResults {
            return Ok(None);
        }
        self.ensure_current(&host.text())?;
        let Some(operation) = plan_replace_one(&self.matches, index, replacement) else {
            return Ok(None);
        };

        host.apply_edits(std::slice::from_ref(&operation))?;
        self.replace_history.push(ReplaceRecord {
            query: self.query.clone(),
            replacement: replacement.to_string(),
            count: 1,
            scope: ReplaceScope::Current,
        });

        // The buffer changed, so go back through Querying.
        let (query, options) = (self.query.clone(), self.options);
        self.generation += 1;
        self.state = SessionState::Querying;
        self.evaluate(query, options, &host.text());
        if !self.matches.is_empty() {
            self.current = Some(index.min(self.matches.len() - 1));
        }

        Ok(Some(operation))
    }

    /// Replace every match in one batch and return the session to `Idle`.
    pub fn replace_all(
        &mut self,
        replacement: &str,
        host: &mut dyn HostEditor,
    ) -> Result<Vec<EditOperation>, EditError> {
        if self.state != SessionState::HasResults || self.matches.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_current(&host.text())?;

        let operations = plan_replace_all(&self.matches, replacement);
        host.apply_edits(&operations)?;
        self.replace_history.push(ReplaceRecord {
            query: self.query.clone(),
            replacement: replacement.to_string(),
            count: operations.len(),
            scope: ReplaceScope::All,
        });
        tracing::debug!(
            query = %self.query,
            count = operations.len(),
            "replaced all matches"
        );

        self.clear();
        Ok(operations)
    }

    /// Drop the query, matches, cursor and any pending query. Histories are kept.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.query.clear();
        self.options = SearchOptions::default();
        self.matches = MatchSet::default();
        self.current = None;
        self.state = SessionState::Idle;
    }

    /// Close the search surface: clear everything, histories included.
    pub fn close(&mut self) {
        self.clear();
        self.query_history.clear();
        self.replace_history.clear();
    }

    fn evaluate(&mut self, query: String, options: SearchOptions, source: &str) {
        let matches = find(source, &query, &options);
        if !matches.has_pattern_error() {
            self.query_history.push(query.clone());
        }
        self.current = if matches.is_empty() { None } else { Some(0) };
        self.matches = matches;
        self.query = query;
        self.options = options;
        self.state = SessionState::HasResults;

        tracing::debug!(
            query = %self.query,
            matches = self.matches.len(),
            generation = self.generation,
            "search evaluated"
        );
    }

    fn ensure_current(&self, source: &str) -> Result<(), EditError> {
        let actual = content_hash(source);
        if actual != self.matches.source_hash() {
            tracing::warn!(query = %self.query, "rejecting replace against stale matches");
            return Err(EditError::StaleMatches {
                expected: self.matches.source_hash(),
                actual,
            });
        }
        Ok(())
    }
}
