use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

use crate::utils::validation::validate_person_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    WaitingName,
    WaitingSurname { first_name: String },
}

/// Progress of one actor's personal-info input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    pub step: FlowStep,
    /// Message that gets edited as the flow progresses.
    pub anchor_message_id: i32,
}

/// Result of feeding one text message into a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    NoFlow,
    /// Input failed validation; the step is unchanged.
    Rejected { step: FlowStep, reason: String },
    NameCaptured { first_name: String },
    /// Both names collected. The state has already been removed.
    Completed {
        first_name: String,
        last_name: String,
        anchor_message_id: i32,
    },
}

/// In-memory interactive state, at most one entry per actor.
///
/// Entries live in a sharded map, so transitions for one actor lock only
/// that actor's shard. Nothing is persisted; a restart drops every flow.
#[derive(Clone, Default)]
pub struct FlowStore {
    states: Arc<DashMap<i64, FlowState>>,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the flow for `actor_id`.
    pub fn begin(&self, actor_id: i64, anchor_message_id: i32) {
        self.states.insert(
            actor_id,
            FlowState {
                step: FlowStep::WaitingName,
                anchor_message_id,
            },
        );
    }

    pub fn get(&self, actor_id: i64) -> Option<FlowState> {
        self.states.get(&actor_id).map(|state| state.value().clone())
    }

    pub fn is_active(&self, actor_id: i64) -> bool {
        self.states.contains_key(&actor_id)
    }

    pub fn cancel(&self, actor_id: i64) -> Option<FlowState> {
        self.states.remove(&actor_id).map(|(_, state)| state)
    }

    /// Applies `input` to the actor's current step in one locked transition.
    pub fn advance(&self, actor_id: i64, input: &str) -> FlowOutcome {
        let Entry::Occupied(mut entry) = self.states.entry(actor_id) else {
            return FlowOutcome::NoFlow;
        };

        let step = entry.get().step.clone();
        let name = match validate_person_name(input) {
            Ok(name) => name,
            Err(e) => {
                return FlowOutcome::Rejected {
                    step,
                    reason: e.to_string(),
                }
            }
        };

        match step {
            FlowStep::WaitingName => {
                entry.get_mut().step = FlowStep::WaitingSurname {
                    first_name: name.clone(),
                };
                FlowOutcome::NameCaptured { first_name: name }
            }
            FlowStep::WaitingSurname { first_name } => {
                let state = entry.remove();
                FlowOutcome::Completed {
                    first_name,
                    last_name: name,
                    anchor_message_id: state.anchor_message_id,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
