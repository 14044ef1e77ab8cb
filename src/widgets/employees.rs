//! Employee Manager Widget
//!
//! A roster of simulated employees. Submitting a task makes the employee
//! busy; after a random delay the task completes, and after a short cooldown
//! the employee is available again.
//!
//! # Lifecycle
//!
//! ```text
//! Available --submit--> Busy --[min..=max delay]--> Completed --[cooldown]--> Available
//! ```
//!
//! Deferred transitions run on the dashboard's [`TaskScope`], so none of them
//! can land after teardown. Callbacks address tasks by id: a transition whose
//! task or status has since disappeared (after a clear, for example) does
//! nothing.

use crate::scheduler::{ScopeContext, TaskScope};
use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{lock, new_id, required, Widget, WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ROSTER_KEY: &str = "roster";

/// Delays driving the task simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationTiming {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub cooldown: Duration,
}

impl Default for SimulationTiming {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(3000),
            max_delay: Duration::from_millis(8000),
            cooldown: Duration::from_millis(2000),
        }
    }
}

impl SimulationTiming {
    /// Uniformly random completion delay in `[min_delay, max_delay]`
    pub fn completion_delay(&self) -> Duration {
        let (lo, hi) = if self.min_delay <= self.max_delay {
            (self.min_delay, self.max_delay)
        } else {
            (self.max_delay, self.min_delay)
        };
        let ms = rand::thread_rng().gen_range(lo.as_millis() as u64..=hi.as_millis() as u64);
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Available,
    Busy,
    Completed,
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EmployeeStatus::Available => "available",
            EmployeeStatus::Busy => "busy",
            EmployeeStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub icon: String,
    pub status: EmployeeStatus,
    /// Newest first
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmployeeStats {
    pub total_employees: usize,
    pub total_tasks: usize,
    pub pending_tasks: usize,
    pub completed_tasks: usize,
}

/// The six employees every dashboard starts with
pub fn default_roster() -> Vec<Employee> {
    let staff = [
        (1, "Maid", "Housekeeping & Cleaning", "🧹"),
        (2, "Chef", "Culinary & Meal Preparation", "👨‍🍳"),
        (3, "Personal Assistant", "Errands & Personal Tasks", "💼"),
        (4, "Orthodontic Assistant", "Dental & Medical Support", "🦷"),
        (5, "Office Manager", "Business & Administrative", "📊"),
        (6, "Model & Dog Caretaker", "Pet Care & Modeling Support", "🐕"),
    ];

    staff
        .iter()
        .map(|(id, name, role, icon)| Employee {
            id: *id,
            name: name.to_string(),
            role: role.to_string(),
            icon: icon.to_string(),
            status: EmployeeStatus::Available,
            tasks: Vec::new(),
        })
        .collect()
}

struct Roster {
    ns: Namespace,
    employees: Vec<Employee>,
}

impl Roster {
    fn position(&self, id: u32) -> WidgetResult<usize> {
        self.employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| WidgetError::NotFound(format!("employee {}", id)))
    }

    fn commit(&mut self, next: Vec<Employee>) -> WidgetResult<()> {
        self.ns.save(ROSTER_KEY, &next)?;
        self.employees = next;
        Ok(())
    }

    /// Apply a timer-driven transition even if the write fails; the next
    /// successful write carries it to the store
    fn commit_deferred(&mut self, next: Vec<Employee>) {
        if let Err(e) = self.ns.save(ROSTER_KEY, &next) {
            tracing::error!(error = %e, "Failed to persist employee roster");
        }
        self.employees = next;
    }
}

/// Employee roster with delayed task completion
#[derive(Clone)]
pub struct EmployeeManager {
    roster: Arc<Mutex<Roster>>,
    scope: TaskScope,
    timing: SimulationTiming,
}

impl Widget for EmployeeManager {
    const NAMESPACE: &'static str = "employees";

    fn reset(&mut self) {
        self.clear();
    }
}

impl EmployeeManager {
    /// Hydrate the roster and resume any work interrupted mid-task
    ///
    /// Must be called from within a tokio runtime when stored employees are
    /// busy.
    pub fn mount(store: Arc<dyn KeyValueStore>, scope: TaskScope, timing: SimulationTiming) -> Self {
        let ns = Self::namespace(store);
        let mut employees: Vec<Employee> = ns.load_or_else(ROSTER_KEY, default_roster);

        let mut resume = Vec::new();
        let mut changed = false;
        for employee in &mut employees {
            let pending_head = employee
                .tasks
                .first()
                .filter(|t| t.status == TaskStatus::Pending)
                .map(|t| t.id.clone());

            match (employee.status, pending_head) {
                (EmployeeStatus::Busy, Some(task_id)) => resume.push((employee.id, task_id)),
                (EmployeeStatus::Available, _) => {}
                _ => {
                    employee.status = EmployeeStatus::Available;
                    changed = true;
                }
            }
        }

        let mut roster = Roster { ns, employees };
        if changed {
            let next = roster.employees.clone();
            roster.commit_deferred(next);
        }

        let manager = Self {
            roster: Arc::new(Mutex::new(roster)),
            scope,
            timing,
        };

        if !resume.is_empty() {
            let roster = Arc::clone(&manager.roster);
            manager.scope.with(|ctx| {
                for (employee_id, task_id) in resume {
                    tracing::info!(employee = employee_id, task = %task_id, "Resuming interrupted task");
                    schedule_completion(
                        ctx,
                        Arc::clone(&roster),
                        employee_id,
                        task_id,
                        timing.completion_delay(),
                        timing.cooldown,
                    );
                }
            });
        }

        tracing::info!(
            employees = lock(&manager.roster).employees.len(),
            "Employee manager mounted"
        );
        manager
    }

    /// Snapshot of the roster
    pub fn employees(&self) -> Vec<Employee> {
        lock(&self.roster).employees.clone()
    }

    pub fn employee(&self, id: u32) -> WidgetResult<Employee> {
        let roster = lock(&self.roster);
        let index = roster.position(id)?;
        Ok(roster.employees[index].clone())
    }

    /// Assign a task to an available employee
    pub fn submit_task(&self, employee_id: u32, description: &str) -> WidgetResult<TaskRecord> {
        let description = required(description, "Task description")?;
        let delay = self.timing.completion_delay();
        let cooldown = self.timing.cooldown;
        let roster = Arc::clone(&self.roster);

        let submitted = self.scope.with(|ctx| -> WidgetResult<TaskRecord> {
            let mut guard = lock(&roster);
            let index = guard.position(employee_id)?;

            let employee = &guard.employees[index];
            if employee.status != EmployeeStatus::Available {
                tracing::warn!(
                    employee = employee_id,
                    status = %employee.status,
                    "Rejected task for unavailable employee"
                );
                return Err(WidgetError::Busy(format!(
                    "{} is {}",
                    employee.name, employee.status
                )));
            }

            let task = TaskRecord {
                id: new_id(),
                description,
                status: TaskStatus::Pending,
                assigned_at: Utc::now(),
                completed_at: None,
            };

            let mut next = guard.employees.clone();
            next[index].status = EmployeeStatus::Busy;
            next[index].tasks.insert(0, task.clone());
            guard.commit(next)?;
            drop(guard);

            schedule_completion(
                ctx,
                Arc::clone(&roster),
                employee_id,
                task.id.clone(),
                delay,
                cooldown,
            );

            tracing::info!(
                employee = employee_id,
                task = %task.id,
                delay_ms = delay.as_millis() as u64,
                "Task assigned"
            );
            Ok(task)
        });

        submitted.unwrap_or_else(|| {
            Err(WidgetError::Busy(
                "The dashboard is shutting down".to_string(),
            ))
        })
    }

    pub fn stats(&self) -> EmployeeStats {
        let roster = lock(&self.roster);
        let tasks = roster.employees.iter().flat_map(|e| e.tasks.iter());

        let mut stats = EmployeeStats {
            total_employees: roster.employees.len(),
            total_tasks: 0,
            pending_tasks: 0,
            completed_tasks: 0,
        };
        for task in tasks {
            stats.total_tasks += 1;
            match task.status {
                TaskStatus::Pending => stats.pending_tasks += 1,
                TaskStatus::Completed => stats.completed_tasks += 1,
            }
        }
        stats
    }

    /// Back to the default roster in memory; the store is cleared by the caller
    pub fn clear(&self) {
        lock(&self.roster).employees = default_roster();
    }
}

fn schedule_completion(
    ctx: &mut ScopeContext<'_>,
    roster: Arc<Mutex<Roster>>,
    employee_id: u32,
    task_id: String,
    delay: Duration,
    cooldown: Duration,
) {
    ctx.schedule(delay, move |ctx| {
        if complete_task(&roster, employee_id, &task_id) {
            ctx.schedule(cooldown, move |_| release(&roster, employee_id));
        }
    });
}

fn complete_task(roster: &Mutex<Roster>, employee_id: u32, task_id: &str) -> bool {
    let mut guard = lock(roster);
    let Ok(index) = guard.position(employee_id) else {
        return false;
    };

    let mut next = guard.employees.clone();
    let employee = &mut next[index];
    let Some(task) = employee
        .tasks
        .iter_mut()
        .find(|t| t.id == task_id && t.status == TaskStatus::Pending)
    else {
        return false;
    };

    task.status = TaskStatus::Completed;
    task.completed_at = Some(Utc::now());
    employee.status = EmployeeStatus::Completed;
    guard.commit_deferred(next);

    tracing::info!(employee = employee_id, task = %task_id, "Task completed");
    true
}

fn release(roster: &Mutex<Roster>, employee_id: u32) {
    let mut guard = lock(roster);
    let Ok(index) = guard.position(employee_id) else {
        return;
    };
    if guard.employees[index].status != EmployeeStatus::Completed {
        return;
    }

    let mut next = guard.employees.clone();
    next[index].status = EmployeeStatus::Available;
    guard.commit_deferred(next);

    tracing::debug!(employee = employee_id, "Employee available");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn timing() -> SimulationTiming {
        SimulationTiming {
            min_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(3),
            cooldown: Duration::from_secs(2),
        }
    }

    fn manager() -> (EmployeeManager, TaskScope, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let scope = TaskScope::new();
        let manager = EmployeeManager::mount(Arc::clone(&store), scope.clone(), timing());
        (manager, scope, store)
    }

    fn status(manager: &EmployeeManager, id: u32) -> EmployeeStatus {
        manager.employee(id).unwrap().status
    }

    #[test]
    fn test_completion_delay_within_bounds() {
        let timing = SimulationTiming::default();
        for _ in 0..100 {
            let delay = timing.completion_delay();
            assert!(delay >= Duration::from_secs(3));
            assert!(delay <= Duration::from_secs(8));
        }
    }

    #[tokio::test]
    async fn test_default_roster() {
        let (manager, _, _) = manager();
        let employees = manager.employees();

        assert_eq!(employees.len(), 6);
        assert_eq!(employees[1].name, "Chef");
        assert!(employees.iter().all(|e| e.status == EmployeeStatus::Available));
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_lifecycle() {
        let (manager, _, _) = manager();

        let task = manager.submit_task(2, "  dinner for six ").unwrap();
        assert_eq!(task.description, "dinner for six");
        assert_eq!(status(&manager, 2), EmployeeStatus::Busy);
        assert_eq!(manager.stats().pending_tasks, 1);

        let rejected = manager.submit_task(2, "dessert");
        assert!(matches!(rejected, Err(WidgetError::Busy(_))));

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(status(&manager, 2), EmployeeStatus::Completed);
        let chef = manager.employee(2).unwrap();
        assert_eq!(chef.tasks[0].status, TaskStatus::Completed);
        assert!(chef.tasks[0].completed_at.is_some());

        assert!(matches!(
            manager.submit_task(2, "dessert"),
            Err(WidgetError::Busy(_))
        ));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status(&manager, 2), EmployeeStatus::Available);

        manager.submit_task(2, "dessert").unwrap();
        let stats = manager.stats();
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(manager.employee(2).unwrap().tasks[0].description, "dessert");
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let (manager, _, _) = manager();

        assert!(matches!(
            manager.submit_task(1, "   "),
            Err(WidgetError::Validation(_))
        ));
        assert!(matches!(
            manager.submit_task(99, "sweep"),
            Err(WidgetError::NotFound(_))
        ));
        assert_eq!(manager.stats().total_tasks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_freezes_state() {
        let (manager, scope, _) = manager();
        manager.submit_task(1, "sweep").unwrap();

        scope.teardown();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(status(&manager, 1), EmployeeStatus::Busy);
        assert!(manager.submit_task(3, "errand").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupted_task_resumes_on_mount() {
        let (manager, scope, store) = manager();
        manager.submit_task(4, "retainer check").unwrap();
        scope.teardown();

        let remounted = EmployeeManager::mount(store, TaskScope::new(), timing());
        assert_eq!(status(&remounted, 4), EmployeeStatus::Busy);

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(status(&remounted, 4), EmployeeStatus::Completed);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status(&remounted, 4), EmployeeStatus::Available);
    }

    #[tokio::test]
    async fn test_completed_employee_released_on_mount() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut roster = default_roster();
        roster[0].status = EmployeeStatus::Completed;
        Namespace::new(Arc::clone(&store), "employees")
            .save(ROSTER_KEY, &roster)
            .unwrap();

        let manager = EmployeeManager::mount(store, TaskScope::new(), timing());
        assert_eq!(status(&manager, 1), EmployeeStatus::Available);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_drops_stale_callbacks() {
        let (manager, _, _) = manager();
        manager.submit_task(5, "payroll").unwrap();

        manager.clear();
        assert_eq!(status(&manager, 5), EmployeeStatus::Available);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(status(&manager, 5), EmployeeStatus::Available);
        assert!(manager.employee(5).unwrap().tasks.is_empty());
    }
}
