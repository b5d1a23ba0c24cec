//! Common test utilities for the connector suites
//!
//! A scripted ambient source that replays canned samples and failures
//! without touching the network.

#![allow(dead_code)]

use async_trait::async_trait;
use humitwin_connectors::{weather::WeatherError, AmbientSource, ConnectionStats, ConnectorError};
use humitwin_core::AmbientSample;
use std::collections::VecDeque;
use std::time::Duration;

/// One scripted fetch outcome
pub enum Step {
    Sample(AmbientSample),
    Fail(&'static str),
}

/// Source that replays a fixed script, then reports exhaustion
#[derive(Default)]
pub struct ScriptedSource {
    script: VecDeque<Step>,
    repeat_last: Option<AmbientSample>,
    latency: Option<Duration>,
    stats: ConnectionStats,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Source that answers every fetch with `sample`
    pub fn constant(sample: AmbientSample) -> Self {
        Self {
            repeat_last: Some(sample),
            ..Self::default()
        }
    }

    /// Make every fetch take `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fetches served so far, successful or not
    pub fn served(&self) -> u64 {
        self.stats.fetches_ok + self.stats.fetches_failed
    }
}

#[async_trait]
impl AmbientSource for ScriptedSource {
    async fn fetch(&mut self) -> Result<AmbientSample, ConnectorError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.script.pop_front() {
            Some(Step::Sample(sample)) => {
                self.stats.fetches_ok += 1;
                Ok(sample)
            }
            Some(Step::Fail(message)) => {
                self.stats.fetches_failed += 1;
                self.stats.last_error = Some(message.to_string());
                Err(WeatherError::Request(message.to_string()).into())
            }
            None => match self.repeat_last {
                Some(sample) => {
                    self.stats.fetches_ok += 1;
                    Ok(sample)
                }
                None => {
                    self.stats.fetches_failed += 1;
                    Err(ConnectorError::Exhausted)
                }
            },
        }
    }

    fn stats(&self) -> ConnectionStats {
        self.stats.clone()
    }
}
