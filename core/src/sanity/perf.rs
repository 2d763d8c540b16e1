use serde::Serialize;

use super::{extract_single, CapturedOutput, Pattern, Stream};
use crate::error::{DefinitionError, ExtractError};

/// One measured value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

/// A named extraction producing one metric with a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceFunction {
    pub name: String,
    pub unit: String,
    pub pattern: Pattern,
    pub group: usize,
    pub stream: Stream,
}

impl PerformanceFunction {
    pub fn new(name: &str, unit: &str, pattern: Pattern) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            pattern,
            group: 1,
            stream: Stream::Stdout,
        }
    }

    pub fn parse(name: &str, unit: &str, pattern: &str) -> Result<Self, DefinitionError> {
        Ok(Self::new(name, unit, Pattern::new(pattern)?))
    }

    pub fn group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    pub fn on(mut self, stream: Stream) -> Self {
        self.stream = stream;
        self
    }

    pub fn evaluate(&self, output: &CapturedOutput) -> Result<MetricResult, ExtractError> {
        let value: f64 = extract_single(&self.pattern, output.stream(self.stream), self.group)?;
        Ok(MetricResult {
            name: self.name.clone(),
            value,
            unit: self.unit.clone(),
        })
    }
}
