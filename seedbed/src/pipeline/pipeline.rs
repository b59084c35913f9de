//! Pipeline executor.
//!
//! Runs stages in order; each stage runs its tasks according to its
//! execution mode.

use super::metrics::{PipelineMetrics, StageMetrics, TaskMetrics};
use super::stage::{ExecutionMode, Stage};
use super::task::BoxedTask;
use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use seedbed_shared::SeedbedResult;
use std::time::Instant;

pub struct ExecutionPlan<Ctx> {
    stages: Vec<Stage<BoxedTask<Ctx>>>,
}

impl<Ctx> ExecutionPlan<Ctx> {
    pub fn new(stages: Vec<Stage<BoxedTask<Ctx>>>) -> Self {
        Self { stages }
    }

    pub fn stages(self) -> Vec<Stage<BoxedTask<Ctx>>> {
        self.stages
    }
}

pub struct Pipeline<Ctx> {
    stages: Vec<Stage<BoxedTask<Ctx>>>,
}

impl<Ctx> Pipeline<Ctx> {
    pub fn new(stages: Vec<Stage<BoxedTask<Ctx>>>) -> Self {
        Self { stages }
    }
}

pub struct PipelineBuilder;

impl PipelineBuilder {
    pub fn from_plan<Ctx>(plan: ExecutionPlan<Ctx>) -> Pipeline<Ctx> {
        Pipeline::new(plan.stages())
    }
}

/// Pipeline executor.
///
/// The first task error stops the pipeline: in-flight tasks of the same
/// stage are dropped and later stages never start.
pub struct PipelineExecutor;

impl PipelineExecutor {
    pub async fn execute<Ctx>(pipeline: Pipeline<Ctx>, ctx: Ctx) -> SeedbedResult<PipelineMetrics>
    where
        Ctx: Clone,
    {
        let total_start = Instant::now();
        let mut stage_metrics = Vec::new();

        for (index, stage) in pipeline.stages.into_iter().enumerate() {
            let Stage {
                label,
                tasks,
                execution,
            } = stage;
            let stage_start = Instant::now();

            tracing::debug!(
                stage = index,
                label = label.as_deref().unwrap_or("-"),
                tasks = tasks.len(),
                mode = ?execution,
                "Starting pipeline stage"
            );

            let task_metrics = match execution {
                ExecutionMode::Parallel => {
                    let futures = tasks.into_iter().map(|task| run_timed(task, ctx.clone()));
                    try_join_all(futures).await?
                }
                ExecutionMode::Bounded { limit } => {
                    let futures = tasks.into_iter().map(|task| run_timed(task, ctx.clone()));
                    stream::iter(futures)
                        .buffered(limit)
                        .try_collect::<Vec<_>>()
                        .await?
                }
                ExecutionMode::Sequential => {
                    let mut task_metrics = Vec::with_capacity(tasks.len());
                    for task in tasks {
                        task_metrics.push(run_timed(task, ctx.clone()).await?);
                    }
                    task_metrics
                }
            };

            stage_metrics.push(StageMetrics {
                index,
                label,
                execution,
                duration_ms: stage_start.elapsed().as_millis(),
                tasks: task_metrics,
            });
        }

        Ok(PipelineMetrics {
            total_duration_ms: total_start.elapsed().as_millis(),
            stages: stage_metrics,
        })
    }
}

async fn run_timed<Ctx>(task: BoxedTask<Ctx>, ctx: Ctx) -> SeedbedResult<TaskMetrics> {
    let name = task.name().to_string();
    let task_start = Instant::now();
    task.run(ctx).await?;
    Ok(TaskMetrics {
        name,
        duration_ms: task_start.elapsed().as_millis(),
    })
}
