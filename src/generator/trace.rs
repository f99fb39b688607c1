//! Step tracer for the random generation pipeline.
//!
//! Every generation pass can record its decision steps (sampled values,
//! selected parameters, branch outcomes) into a single JSON document that
//! is emitted through `tracing` at debug level. The disabled variant costs
//! a branch per recorded value; enabling is a runtime configuration flag,
//! no recompilation involved.

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

/// One named step of a generation pass, with its traced inputs and
/// outputs.
#[derive(Debug)]
pub struct TraceStep {
    enabled: bool,
    action: &'static str,
    input: Map<String, Value>,
    output: Map<String, Value>,
}

impl TraceStep {
    fn disabled() -> Self {
        Self {
            enabled: false,
            action: "",
            input: Map::new(),
            output: Map::new(),
        }
    }

    /// Records an input value of this step.
    pub fn input(&mut self, name: &str, value: impl Serialize) {
        if self.enabled {
            self.input.insert(name.to_owned(), to_value(value));
        }
    }

    /// Records an output value of this step.
    pub fn output(&mut self, name: &str, value: impl Serialize) {
        if self.enabled {
            self.output.insert(name.to_owned(), to_value(value));
        }
    }

    /// Records an output value together with an explanatory comment.
    pub fn output_commented(&mut self, name: &str, value: impl Serialize, comment: &str) {
        if self.enabled {
            self.output.insert(
                name.to_owned(),
                json!({ "value": to_value(value), "comment": comment }),
            );
        }
    }
}

fn to_value(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Collector of [`TraceStep`]s for one generation pass.
#[derive(Debug)]
pub enum GenerationTrace {
    /// No-op variant; recording and emitting cost nothing.
    Null,
    /// JSON-collecting variant.
    Json {
        /// Completed steps in recording order.
        steps: Vec<Value>,
    },
}

impl GenerationTrace {
    /// Creates a tracer according to the runtime configuration flag.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            GenerationTrace::Json { steps: Vec::new() }
        } else {
            GenerationTrace::Null
        }
    }

    /// Opens a new step.
    pub fn step(&self, action: &'static str) -> TraceStep {
        match self {
            GenerationTrace::Null => TraceStep::disabled(),
            GenerationTrace::Json { .. } => TraceStep {
                enabled: true,
                action,
                input: Map::new(),
                output: Map::new(),
            },
        }
    }

    /// Closes a step and appends it to the trace.
    pub fn record(&mut self, step: TraceStep) {
        if let GenerationTrace::Json { steps } = self {
            steps.push(json!({
                "step": steps.len() + 1,
                "action": step.action,
                "input": Value::Object(step.input),
                "output": Value::Object(step.output),
            }));
        }
    }

    /// Emits the collected trace through `tracing` and consumes the
    /// collector.
    pub fn emit(self, instrument: &str) {
        if let GenerationTrace::Json { steps } = self {
            if steps.is_empty() {
                return;
            }
            let document = json!({ "instrument": instrument, "trace": steps });
            debug!(target: "orderflow_rs::generation_trace", "{document}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_trace_records_nothing() {
        let mut trace = GenerationTrace::new(false);
        let mut step = trace.step("sampling");
        step.input("value", 42);
        step.output("result", "Buy");
        trace.record(step);

        assert!(matches!(trace, GenerationTrace::Null));
    }

    #[test]
    fn json_trace_collects_steps_in_order() {
        let mut trace = GenerationTrace::new(true);

        let mut first = trace.step("first");
        first.input("randomValue", 7);
        trace.record(first);

        let mut second = trace.step("second");
        second.output_commented("price", 10.5, "seed price used");
        trace.record(second);

        match trace {
            GenerationTrace::Json { steps } => {
                assert_eq!(steps.len(), 2);
                assert_eq!(steps[0]["action"], "first");
                assert_eq!(steps[0]["input"]["randomValue"], 7);
                assert_eq!(steps[1]["output"]["price"]["comment"], "seed price used");
            }
            GenerationTrace::Null => panic!("expected a collecting trace"),
        }
    }
}
