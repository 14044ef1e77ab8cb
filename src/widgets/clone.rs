//! Clone of Myself Widget
//!
//! A fixed catalog of eight life tasks. Activating a task runs it for a fixed
//! delay, shows it completed for the same cooldown, then clears it. Status is
//! session state and is never persisted.
//!
//! Each activation gets a run number. Deferred transitions only apply to the
//! run that scheduled them, so re-activating a completed task cannot be
//! cleared early by the previous run's timer.

use crate::scheduler::TaskScope;
use crate::widgets::{lock, Widget, WidgetError, WidgetResult};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CloneTask {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
}

pub const CLONE_TASKS: [CloneTask; 8] = [
    CloneTask {
        id: 1,
        title: "Trade Options and Stocks",
        description: "Analyze market trends, execute trades, and manage portfolio",
        icon: "📈",
        category: "Finance",
    },
    CloneTask {
        id: 2,
        title: "Clean the House",
        description: "Organize, dust, vacuum, and maintain household cleanliness",
        icon: "🏠",
        category: "Home",
    },
    CloneTask {
        id: 3,
        title: "Cook Food for the Day",
        description: "Plan meals, prepare ingredients, and cook nutritious dishes",
        icon: "🍳",
        category: "Food",
    },
    CloneTask {
        id: 4,
        title: "Do Orthodontics",
        description: "Handle dental procedures, consultations, and treatments",
        icon: "🦷",
        category: "Health",
    },
    CloneTask {
        id: 5,
        title: "Innovate and Create Startup Business",
        description: "Brainstorm ideas, develop business plans, and launch ventures",
        icon: "🚀",
        category: "Business",
    },
    CloneTask {
        id: 6,
        title: "Manage and Organize All Finances",
        description: "Track expenses, create budgets, and optimize financial health",
        icon: "💰",
        category: "Finance",
    },
    CloneTask {
        id: 7,
        title: "Meet New People",
        description: "Network, socialize, and build meaningful connections",
        icon: "🤝",
        category: "Social",
    },
    CloneTask {
        id: 8,
        title: "Drive and Fix Car or Run Errands",
        description: "Maintain vehicle, handle repairs, and complete daily tasks",
        icon: "🚗",
        category: "Transport",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloneTaskStatus {
    InProgress,
    Completed,
}

/// A catalog task with its current status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloneTaskView {
    #[serde(flatten)]
    pub task: CloneTask,
    pub status: Option<CloneTaskStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CloneStats {
    pub total_tasks: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub categories: usize,
}

#[derive(Default)]
struct Board {
    runs: HashMap<u32, (u64, CloneTaskStatus)>,
    active: Option<u32>,
    next_run: u64,
}

#[derive(Clone)]
pub struct CloneBoard {
    board: Arc<Mutex<Board>>,
    scope: TaskScope,
    delay: Duration,
}

impl Widget for CloneBoard {
    const NAMESPACE: &'static str = "clone";

    fn reset(&mut self) {
        self.clear();
    }
}

impl CloneBoard {
    /// `delay` is both the run time and how long completion stays visible
    pub fn new(scope: TaskScope, delay: Duration) -> Self {
        Self {
            board: Arc::new(Mutex::new(Board::default())),
            scope,
            delay,
        }
    }

    pub fn tasks(&self) -> Vec<CloneTaskView> {
        let board = lock(&self.board);
        CLONE_TASKS
            .iter()
            .map(|task| CloneTaskView {
                task: *task,
                status: board.runs.get(&task.id).map(|(_, s)| *s),
            })
            .collect()
    }

    /// Most recently activated task still on the board
    pub fn active_task(&self) -> Option<u32> {
        lock(&self.board).active
    }

    pub fn activate(&self, id: u32) -> WidgetResult<CloneTaskView> {
        let task = CLONE_TASKS
            .iter()
            .find(|t| t.id == id)
            .copied()
            .ok_or_else(|| WidgetError::NotFound(format!("clone task {}", id)))?;

        let board = Arc::clone(&self.board);
        let delay = self.delay;

        let activated = self.scope.with(|ctx| -> WidgetResult<CloneTaskView> {
            let mut guard = lock(&board);
            if let Some((_, CloneTaskStatus::InProgress)) = guard.runs.get(&id) {
                return Err(WidgetError::Busy(format!("{} is already in progress", task.title)));
            }

            guard.next_run += 1;
            let run = guard.next_run;
            guard.runs.insert(id, (run, CloneTaskStatus::InProgress));
            guard.active = Some(id);
            drop(guard);

            let board = Arc::clone(&board);
            ctx.schedule(delay, move |ctx| {
                let mut guard = lock(&board);
                if guard.runs.get(&id).map(|(r, _)| *r) != Some(run) {
                    return;
                }
                guard.runs.insert(id, (run, CloneTaskStatus::Completed));
                drop(guard);
                tracing::info!(task = id, "Clone task completed");

                let board = Arc::clone(&board);
                ctx.schedule(delay, move |_| {
                    let mut guard = lock(&board);
                    if guard.runs.get(&id).map(|(r, _)| *r) != Some(run) {
                        return;
                    }
                    guard.runs.remove(&id);
                    if guard.active == Some(id) {
                        guard.active = None;
                    }
                });
            });

            tracing::info!(task = id, title = task.title, "Clone task started");
            Ok(CloneTaskView {
                task,
                status: Some(CloneTaskStatus::InProgress),
            })
        });

        activated.unwrap_or_else(|| {
            Err(WidgetError::Busy(
                "The dashboard is shutting down".to_string(),
            ))
        })
    }

    pub fn stats(&self) -> CloneStats {
        let board = lock(&self.board);
        let count = |status: CloneTaskStatus| board.runs.values().filter(|(_, s)| *s == status).count();

        CloneStats {
            total_tasks: CLONE_TASKS.len(),
            completed: count(CloneTaskStatus::Completed),
            in_progress: count(CloneTaskStatus::InProgress),
            categories: CLONE_TASKS
                .iter()
                .map(|t| t.category)
                .collect::<BTreeSet<_>>()
                .len(),
        }
    }

    pub fn clear(&self) {
        let mut board = lock(&self.board);
        board.runs.clear();
        board.active = None;
    }
}
