use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use futures::{stream, StreamExt};
use tokio::{
    sync::{watch, RwLock},
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::{
    errors::AppResult,
    models::domain::Quiz,
    repositories::QuizRepository,
    services::webhook_service::QuizActivationNotifier,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStage {
    Persist,
    Notify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub quiz_id: String,
    pub stage: SweepStage,
    pub reason: String,
}

/// Outcome of one activation sweep. A quiz listed in `activated` but absent
/// from `notified` has a matching `Notify` failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub activated: Vec<String>,
    pub notified: Vec<String>,
    pub failures: Vec<SweepFailure>,
}

enum Outcome {
    Notified(String),
    NotifyFailed(String, String),
    PersistFailed(String, String),
}

/// Flips due quizzes to active and announces each one through the notifier.
pub struct ActivationService {
    quiz_repository: Arc<dyn QuizRepository>,
    notifier: Arc<dyn QuizActivationNotifier>,
    actor: String,
    concurrency: usize,
}

impl ActivationService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        notifier: Arc<dyn QuizActivationNotifier>,
        actor: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            quiz_repository,
            notifier,
            actor: actor.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Only a failing due-query aborts the sweep; per-quiz failures land in
    /// the report.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let due = self.quiz_repository.find_due_inactive(now).await?;

        let mut report = SweepReport {
            due: due.len(),
            ..Default::default()
        };
        if due.is_empty() {
            log::debug!("Activation sweep at {}: nothing due", now);
            return Ok(report);
        }

        let outcomes: Vec<Outcome> = stream::iter(due)
            .map(|quiz| self.activate_one(quiz, now))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                Outcome::Notified(id) => {
                    report.activated.push(id.clone());
                    report.notified.push(id);
                }
                Outcome::NotifyFailed(id, reason) => {
                    report.activated.push(id.clone());
                    report.failures.push(SweepFailure {
                        quiz_id: id,
                        stage: SweepStage::Notify,
                        reason,
                    });
                }
                Outcome::PersistFailed(id, reason) => report.failures.push(SweepFailure {
                    quiz_id: id,
                    stage: SweepStage::Persist,
                    reason,
                }),
            }
        }
        report.activated.sort();
        report.notified.sort();

        log::info!(
            "Activation sweep at {}: {} due, {} activated, {} notified, {} failed",
            now,
            report.due,
            report.activated.len(),
            report.notified.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn activate_one(&self, mut quiz: Quiz, now: DateTime<Utc>) -> Outcome {
        let id = quiz.id.clone();
        quiz.activate(&self.actor, now);

        if let Err(e) = self.quiz_repository.update(quiz).await {
            log::warn!("Failed to activate quiz '{}': {}", id, e);
            return Outcome::PersistFailed(id, e.to_string());
        }

        match self.notifier.notify_quiz_activated(&id).await {
            Ok(()) => Outcome::Notified(id),
            Err(e) => {
                log::warn!("Quiz '{}' activated but webhook failed: {}", id, e);
                Outcome::NotifyFailed(id, e.to_string())
            }
        }
    }
}

struct Worker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs [`ActivationService::run_sweep`] on a fixed interval in the background.
pub struct ActivationScheduler {
    service: Arc<ActivationService>,
    interval: Duration,
    worker: RwLock<Option<Worker>>,
}

impl ActivationScheduler {
    pub fn new(service: Arc<ActivationService>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            worker: RwLock::new(None),
        }
    }

    /// Returns `false` when the worker was already running.
    pub async fn start(&self) -> bool {
        let mut worker = self.worker.write().await;
        if worker.is_some() {
            return false;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let service = Arc::clone(&self.service);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if let Err(e) = service.run_sweep(Utc::now()).await {
                            log::error!("Activation sweep failed: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        log::info!("Activation scheduler shutting down");
                        return;
                    }
                }
            }
        });

        log::info!("Activation scheduler started (every {:?})", interval);
        *worker = Some(Worker { shutdown, handle });
        true
    }

    /// Signals the worker and waits for an in-flight sweep to finish.
    pub async fn stop(&self) {
        let Some(worker) = self.worker.write().await.take() else {
            return;
        };

        let _ = worker.shutdown.send(true);
        if let Err(e) = worker.handle.await {
            log::error!("Activation scheduler task ended abnormally: {}", e);
        }
    }

    pub async fn is_running(&self) -> bool {
        self.worker.read().await.is_some()
    }
}
