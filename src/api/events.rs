//! Server-sent event stream of timer countdowns and completions

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

fn json_event<T: Serialize>(name: &str, payload: &T) -> Event {
    match Event::default().event(name).json_data(payload) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to encode {} event: {}", name, e);
            Event::default().comment(format!("dropped {} event", name))
        }
    }
}

/// Handle GET /events - Stream `timer` snapshots and `completed` notices
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream subscriber connected");
    let completions = state.completion_tx.subscribe();
    let snapshots = state.timer_update_tx.subscribe();

    let events = stream::unfold((completions, snapshots), |(mut completions, mut snapshots)| async move {
        let event = loop {
            tokio::select! {
                notice = completions.recv() => match notice {
                    Ok(notice) => break json_event("completed", &notice),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Event stream lagged, skipped {} completion(s)", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                },
                changed = snapshots.changed() => match changed {
                    Ok(()) => {
                        let snapshot = (*snapshots.borrow_and_update()).clone();
                        break json_event("timer", &snapshot);
                    }
                    Err(_) => return None,
                },
            }
        };
        Some((Ok::<_, Infallible>(event), (completions, snapshots)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
