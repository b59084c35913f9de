//! Table-driven staged execution.
//!
//! ```text
//! Pipeline → Stages → Tasks
//!
//! - Pipeline: runs stages strictly in order
//! - Stage: a labelled group of tasks with an execution mode
//! - Task: atomic unit of work sharing a cloned context
//! ```
//!
//! A task error aborts the remaining stages. Tasks that want failure
//! isolation record their outcome in the context and return `Ok`.
//!
//! ## Example
//!
//! ```ignore
//! use seedbed::pipeline::{ExecutionPlan, PipelineBuilder, PipelineExecutor, Stage};
//!
//! let plan = ExecutionPlan::new(vec![
//!     Stage::sequential(vec![Box::new(GrantTask)]).with_label("permissions"),
//!     Stage::parallel_bounded(entry_tasks, 8).with_label("articles"),
//! ]);
//!
//! let pipeline = PipelineBuilder::from_plan(plan);
//! let metrics = PipelineExecutor::execute(pipeline, ctx).await?;
//! ```

mod metrics;
#[allow(clippy::module_inception)]
mod pipeline;
mod stage;
mod task;

pub use metrics::{PipelineMetrics, StageMetrics, TaskMetrics};
pub use pipeline::{ExecutionPlan, Pipeline, PipelineBuilder, PipelineExecutor};
pub use stage::{ExecutionMode, Stage};
pub use task::{BoxedTask, PipelineTask};
