//! Test utilities for Agronus
//!
//! Temporary file helpers and [`ScriptedServices`], an in-process
//! [`FarmServices`] that records every call and fails on demand.

use crate::error::{AgronusError, Result};
use crate::services::{FarmServices, PredictionAck};
use crate::soil::SoilParameters;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Which service call was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Context,
    Query,
    Answer,
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<Step>,
    soil: Vec<SoilParameters>,
    texts: Vec<String>,
    prompts: Vec<String>,
}

/// Scripted stand-in for the prediction and chat services
#[derive(Debug)]
pub struct ScriptedServices {
    prompt: String,
    answer: Option<String>,
    fail_at: Option<Step>,
    recorded: Mutex<Recorded>,
}

impl ScriptedServices {
    /// Services that succeed with a canned prompt and answer
    pub fn new() -> Self {
        Self {
            prompt: "scripted prompt".to_string(),
            answer: Some("scripted answer".to_string()),
            fail_at: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Prompt returned by the query transformation
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    /// Answer returned by the chat service
    pub fn with_answer(mut self, answer: Option<&str>) -> Self {
        self.answer = answer.map(str::to_string);
        self
    }

    /// Make one step fail
    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<Step> {
        self.recorded.lock().unwrap().calls.clone()
    }

    /// Soil snapshots received by the context step
    pub fn received_soil(&self) -> Vec<SoilParameters> {
        self.recorded.lock().unwrap().soil.clone()
    }

    /// Texts received by the query step
    pub fn received_texts(&self) -> Vec<String> {
        self.recorded.lock().unwrap().texts.clone()
    }

    /// Prompts received by the answer step
    pub fn received_prompts(&self) -> Vec<String> {
        self.recorded.lock().unwrap().prompts.clone()
    }

    fn record(&self, step: Step) -> Result<()> {
        self.recorded.lock().unwrap().calls.push(step);
        if self.fail_at == Some(step) {
            return Err(AgronusError::Service(format!("scripted failure at {:?}", step)).into());
        }
        Ok(())
    }
}

impl Default for ScriptedServices {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FarmServices for ScriptedServices {
    async fn submit_context(&self, soil: &SoilParameters) -> Result<PredictionAck> {
        self.recorded.lock().unwrap().soil.push(*soil);
        self.record(Step::Context)?;
        Ok(PredictionAck::default())
    }

    async fn transform_query(&self, text: &str) -> Result<String> {
        self.recorded.lock().unwrap().texts.push(text.to_string());
        self.record(Step::Query)?;
        Ok(self.prompt.clone())
    }

    async fn generate_answer(&self, prompt: &str) -> Result<Option<String>> {
        self.recorded.lock().unwrap().prompts.push(prompt.to_string());
        self.record(Step::Answer)?;
        Ok(self.answer.clone())
    }
}
