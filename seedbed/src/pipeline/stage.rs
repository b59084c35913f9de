//! Stage definition for table-driven pipeline execution.

/// Execution mode for a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// All tasks in flight at once.
    Parallel,
    /// At most `limit` tasks in flight; tasks start in declaration order.
    Bounded { limit: usize },
    /// One task after another.
    Sequential,
}

/// A group of tasks executed under one mode.
///
/// Stages run in order. A stage starts only after every task of the
/// previous stage finished successfully.
#[derive(Debug, Clone)]
pub struct Stage<T> {
    pub label: Option<String>,
    pub tasks: Vec<T>,
    pub execution: ExecutionMode,
}

impl<T> Stage<T> {
    pub fn parallel(tasks: Vec<T>) -> Self {
        Self {
            label: None,
            tasks,
            execution: ExecutionMode::Parallel,
        }
    }

    /// Parallel stage capped at `limit` concurrent tasks.
    ///
    /// A limit of zero is treated as one.
    pub fn parallel_bounded(tasks: Vec<T>, limit: usize) -> Self {
        Self {
            label: None,
            tasks,
            execution: ExecutionMode::Bounded {
                limit: limit.max(1),
            },
        }
    }

    pub fn sequential(tasks: Vec<T>) -> Self {
        Self {
            label: None,
            tasks,
            execution: ExecutionMode::Sequential,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
