//! Time-limited revert and delete actions
//!
//! Each meal carries two gates: revert is open for 20 seconds after the
//! analysis completed, delete for 3 hours after creation. A gate closes at
//! the boundary (`elapsed < window`) or when the server rejects the action,
//! and never reopens. The server stays authoritative; these gates only
//! decide what to show.

use crate::api::{Meal, MealId};
use crate::timer::Ticker;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Revert window, counted from analysis completion
pub const REVERT_WINDOW: Duration = Duration::from_secs(20);

/// Delete window, counted from meal creation
pub const DELETE_WINDOW: Duration = Duration::from_secs(3 * 60 * 60);

/// How often an open countdown refreshes the UI
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UndoAction {
    Revert,
    Delete,
}

impl UndoAction {
    pub fn window(&self) -> Duration {
        match self {
            UndoAction::Revert => REVERT_WINDOW,
            UndoAction::Delete => DELETE_WINDOW,
        }
    }

    /// Timestamp the window of this action starts at
    pub fn reference(&self, meal: &Meal) -> DateTime<Utc> {
        match self {
            UndoAction::Revert => meal.revert_reference(),
            UndoAction::Delete => meal.delete_reference(),
        }
    }
}

/// One action's countdown
#[derive(Clone, Debug, PartialEq)]
pub struct CountdownGate {
    reference: DateTime<Utc>,
    window: Duration,
    closed: bool,
}

impl CountdownGate {
    pub fn new(reference: DateTime<Utc>, window: Duration) -> Self {
        Self {
            reference,
            window,
            closed: false,
        }
    }

    /// Time left, or `None` once the gate is closed
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.closed {
            return None;
        }
        // A reference in the future (clock skew) counts as zero elapsed.
        let elapsed = (now - self.reference).to_std().unwrap_or(Duration::ZERO);
        if elapsed < self.window {
            Some(self.window - elapsed)
        } else {
            None
        }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_some()
    }

    /// Close permanently, e.g. after the server rejected the action
    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// Countdown label: "15s" under a minute, "2m 05s" under an hour, else "2h 59m"
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Which undo controls a meal shows right now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UndoView {
    pub revert: Option<Duration>,
    pub delete: Option<Duration>,
}

impl UndoView {
    pub fn remaining(&self, action: UndoAction) -> Option<Duration> {
        match action {
            UndoAction::Revert => self.revert,
            UndoAction::Delete => self.delete,
        }
    }
}

/// Gates for every meal on screen, plus the repaint ticker
///
/// The ticker runs only while some gate is open and stops (joining its
/// thread) as soon as none is.
pub struct UndoTracker {
    gates: HashMap<(MealId, UndoAction), CountdownGate>,
    on_tick: Arc<dyn Fn() + Send + Sync>,
    ticker: Option<Ticker>,
}

impl UndoTracker {
    /// `on_tick` runs on the ticker thread once per second while a gate is open
    pub fn new(on_tick: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            gates: HashMap::new(),
            on_tick: Arc::new(on_tick),
            ticker: None,
        }
    }

    /// Track gates for `meals`, forgetting meals no longer present
    pub fn sync<'a>(&mut self, meals: impl IntoIterator<Item = &'a Meal>, now: DateTime<Utc>) {
        let mut present = Vec::new();
        for meal in meals {
            present.push(meal.id);
            for action in [UndoAction::Revert, UndoAction::Delete] {
                self.gates
                    .entry((meal.id, action))
                    .or_insert_with(|| CountdownGate::new(action.reference(meal), action.window()));
            }
        }
        self.gates.retain(|(id, _), _| present.contains(id));
        self.update_ticker(now);
    }

    /// Current view for one meal
    pub fn view(&self, meal_id: MealId, now: DateTime<Utc>) -> UndoView {
        let remaining = |action| {
            self.gates
                .get(&(meal_id, action))
                .and_then(|gate| gate.remaining(now))
        };
        UndoView {
            revert: remaining(UndoAction::Revert),
            delete: remaining(UndoAction::Delete),
        }
    }

    pub fn is_open(&self, meal_id: MealId, action: UndoAction, now: DateTime<Utc>) -> bool {
        self.view(meal_id, now).remaining(action).is_some()
    }

    /// Close a gate after the server refused the action
    pub fn reject(&mut self, meal_id: MealId, action: UndoAction, now: DateTime<Utc>) {
        if let Some(gate) = self.gates.get_mut(&(meal_id, action)) {
            debug!("Closing {:?} gate for meal {}", action, meal_id);
            gate.close();
        }
        self.update_ticker(now);
    }

    /// Forget a meal that is gone
    pub fn remove(&mut self, meal_id: MealId, now: DateTime<Utc>) {
        self.gates.retain(|(id, _), _| *id != meal_id);
        self.update_ticker(now);
    }

    pub fn has_open_gates(&self, now: DateTime<Utc>) -> bool {
        self.gates.values().any(|gate| gate.is_open(now))
    }

    /// Whether the repaint ticker is running
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start or stop the ticker to match the open gates
    pub fn update_ticker(&mut self, now: DateTime<Utc>) {
        let needed = self.has_open_gates(now);
        match (needed, self.ticker.is_some()) {
            (true, false) => {
                let on_tick = Arc::clone(&self.on_tick);
                self.ticker = Some(Ticker::start(TICK_INTERVAL, move || on_tick()));
            }
            (false, true) => {
                self.ticker = None;
            }
            _ => {}
        }
    }
}
