// src/pipeline/driver.rs
//! Single-threaded pipeline driver.
//!
//! All mutable pipeline state — sample buffer, in-flight flag, smoothing
//! history, session timers, link status — lives in one [`Pipeline`] object
//! and is mutated only inside [`Pipeline::handle`]. Sensor ticks, the
//! per-second timer, and network completions arrive as [`PipelineEvent`]s on
//! a single channel and are consumed sequentially, so no locking is needed;
//! ordering discipline is the whole concurrency model.

use crate::client::ClassifyTransport;
use crate::config::constants::timing::SESSION_TICK_MS;
use crate::config::PipelineConfig;
use crate::error::TransportError;
use crate::pipeline::extractor::WindowExtractor;
use crate::pipeline::session::{SessionAggregator, SessionSummary};
use crate::pipeline::smoothing::SmoothingFilter;
use crate::types::{MetClass, Prediction, Sample, Window};
use crate::utils::time::TimeProvider;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Discrete events delivered to the sequential handler.
#[derive(Debug)]
pub enum PipelineEvent {
    /// One sensor reading arrived.
    Sample(Sample),
    /// One second of session time elapsed.
    SecondTick,
    /// The outstanding classification request completed.
    Outcome(Result<Prediction, TransportError>),
    /// User-requested session reset.
    Reset,
}

/// Connection status shown alongside the stabilized class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Last request succeeded (or none sent yet).
    Ok,
    /// Transport-level failure, no response.
    Offline,
    /// The backend answered with an unusable status.
    Api(u16),
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Ok => f.write_str("ok"),
            LinkStatus::Offline => f.write_str("offline"),
            LinkStatus::Api(code) => write!(f, "API {}", code),
        }
    }
}

/// The client-side pipeline state machine.
pub struct Pipeline {
    extractor: WindowExtractor,
    smoother: SmoothingFilter,
    session: SessionAggregator,
    in_flight: bool,
    status: LinkStatus,
}

impl Pipeline {
    /// Build a pipeline from validated parameters and a time source.
    pub fn new(config: PipelineConfig, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            extractor: WindowExtractor::new(&config, clock),
            smoother: SmoothingFilter::new(config.smoothing_window),
            session: SessionAggregator::new(),
            in_flight: false,
            status: LinkStatus::Ok,
        }
    }

    /// Process one event. Returns a window when one should be dispatched to
    /// the classification transport; the caller must deliver the eventual
    /// [`PipelineEvent::Outcome`] back into the event stream.
    pub fn handle(&mut self, event: PipelineEvent) -> Option<Window> {
        match event {
            PipelineEvent::Sample(sample) => {
                let window = self.extractor.push(sample, self.in_flight);
                if window.is_some() {
                    self.in_flight = true;
                }
                window
            }
            PipelineEvent::SecondTick => {
                self.session.tick();
                None
            }
            PipelineEvent::Outcome(outcome) => {
                // Released before any outcome handling, on every path.
                self.in_flight = false;
                match outcome {
                    Ok(prediction) => {
                        let stabilized = self.smoother.push(prediction.label);
                        self.session.set_current(stabilized);
                        self.status = LinkStatus::Ok;
                        tracing::debug!(raw = %prediction.label, stabilized = %stabilized, "prediction");
                    }
                    Err(TransportError::Network(reason)) => {
                        self.status = LinkStatus::Offline;
                        tracing::warn!(%reason, "classification request failed, keeping last class");
                    }
                    Err(TransportError::Api { status }) => {
                        self.status = LinkStatus::Api(status);
                        tracing::warn!(status, "backend rejected request, keeping last class");
                    }
                }
                None
            }
            PipelineEvent::Reset => {
                self.session.reset();
                self.smoother.clear();
                self.extractor.reset();
                tracing::info!("session reset");
                None
            }
        }
    }

    /// Currently stabilized class.
    pub fn current_class(&self) -> MetClass {
        self.session.current()
    }

    /// Connection status for display.
    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// True while a classification request is outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Derived session metrics.
    pub fn summary(&self) -> SessionSummary {
        self.session.summary()
    }

    /// Elapsed seconds for one class.
    pub fn seconds(&self, class: MetClass) -> u64 {
        self.session.seconds(class)
    }

    /// Raw prediction history, oldest first.
    pub fn history(&self) -> Vec<MetClass> {
        self.smoother.history()
    }
}

/// Drive a pipeline from an event channel until it closes.
///
/// The classify call is the sole suspending operation; it runs in a spawned
/// task whose completion is fed back into `feedback` (normally a clone of the
/// sender behind `events`), preserving the single sequential consumer. There
/// is no cancellation: an outstanding request resolves or fails, and either
/// way the outcome event clears the in-flight flag.
pub async fn run(
    pipeline: &mut Pipeline,
    mut events: mpsc::Receiver<PipelineEvent>,
    transport: Arc<dyn ClassifyTransport>,
    feedback: mpsc::Sender<PipelineEvent>,
) {
    while let Some(event) = events.recv().await {
        if let Some(window) = pipeline.handle(event) {
            let transport = Arc::clone(&transport);
            let feedback = feedback.clone();
            tokio::spawn(async move {
                let outcome = transport.classify(&window).await;
                // The receiver closing means the pipeline is shutting down.
                let _ = feedback.send(PipelineEvent::Outcome(outcome)).await;
            });
        }
    }
}

/// Emit [`PipelineEvent::SecondTick`] once per second until the channel
/// closes.
pub fn spawn_second_ticker(events: mpsc::Sender<PipelineEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(SESSION_TICK_MS));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if events.send(PipelineEvent::SecondTick).await.is_err() {
                break;
            }
        }
    })
}
