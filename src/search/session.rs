//! Interactive search session
//!
//! Holds the displayed result list and feeds it from two trigger paths:
//! `submit` (immediate) and `on_input` (debounced). Responses carry the
//! generation they were issued under and are dropped once a newer request
//! or a clear has happened.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::debounce::Debouncer;
use crate::client::NotesApi;
use crate::core::model::ResultSet;
use crate::resolver::{rank_and_group_for, SearchTrigger};

const SETTLE_POLL: Duration = Duration::from_millis(5);

pub struct SearchSession<A> {
    api: Arc<A>,
    results: Arc<watch::Sender<ResultSet>>,
    generation: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
    debouncer: Debouncer,
}

impl<A: NotesApi + 'static> SearchSession<A> {
    pub fn new(api: Arc<A>, debounce: Duration) -> Self {
        let (tx, _rx) = watch::channel(ResultSet::new());
        Self {
            api,
            results: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultSet> {
        self.results.subscribe()
    }

    /// Currently displayed results
    #[cfg(test)]
    pub fn results(&self) -> ResultSet {
        self.results.borrow().clone()
    }

    /// Explicit search with the query as typed. A blank query lists everything.
    pub async fn submit(&self, query: &str) {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        run_search(
            self.api.as_ref(),
            &self.results,
            &self.generation,
            id,
            SearchTrigger::Submit,
            query.to_string(),
        )
        .await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// Input changed. Restarts the quiet period, or clears on blank input.
    pub fn on_input(&mut self, query: &str) {
        self.debouncer.cancel();

        let trimmed = query.trim().to_string();
        if trimmed.is_empty() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            publish(&self.results, ResultSet::new());
            return;
        }

        let api = Arc::clone(&self.api);
        let results = Arc::clone(&self.results);
        let generation = Arc::clone(&self.generation);
        let in_flight = Arc::clone(&self.in_flight);
        self.debouncer.schedule(move || {
            let id = generation.fetch_add(1, Ordering::SeqCst) + 1;
            in_flight.fetch_add(1, Ordering::SeqCst);
            async move {
                run_search(
                    api.as_ref(),
                    &results,
                    &generation,
                    id,
                    SearchTrigger::Keystroke,
                    trimmed,
                )
                .await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        });
    }

    /// Whether a timer is pending or a request is in flight
    pub fn is_busy(&self) -> bool {
        self.debouncer.is_pending() || self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Wait until no timer is pending and no request is in flight
    pub async fn settle(&self) {
        while self.is_busy() {
            tokio::time::sleep(SETTLE_POLL).await;
        }
    }
}

async fn run_search<A: NotesApi>(
    api: &A,
    results: &watch::Sender<ResultSet>,
    generation: &AtomicU64,
    id: u64,
    trigger: SearchTrigger,
    query: String,
) {
    let set = match api.search(Some(&query)).await {
        Ok(raw) => rank_and_group_for(trigger, &raw, &query),
        Err(e) => {
            tracing::warn!(error = %e, query = %query, "search failed, clearing results");
            ResultSet::new()
        }
    };

    if generation.load(Ordering::SeqCst) != id {
        tracing::debug!(id, query = %query, "discarding stale response");
        return;
    }
    publish(results, set);
}

fn publish(results: &watch::Sender<ResultSet>, set: ResultSet) {
    results.send_if_modified(|current| {
        if *current == set {
            false
        } else {
            *current = set;
            true
        }
    });
}
