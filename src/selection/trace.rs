//! Append-only record of the moves a search visited.

use std::fmt;

/// What a single search step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Initial model before any move.
    Start,
    /// The named feature entered the model.
    Added(String),
    /// The named feature left the model.
    Removed(String),
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Start => write!(f, "start"),
            StepAction::Added(name) => write!(f, "+{}", name),
            StepAction::Removed(name) => write!(f, "-{}", name),
        }
    }
}

/// One entry in a [`SelectionTrace`].
#[derive(Debug, Clone)]
pub struct SelectionStep {
    /// Zero-based step index.
    pub step: usize,
    /// The move made at this step.
    pub action: StepAction,
    /// Feature set after the move.
    pub features: Vec<String>,
    /// AIC of the model after the move.
    pub aic: f64,
    /// BIC of the model after the move.
    pub bic: f64,
    /// Adjusted R² of the model after the move.
    pub adj_r_squared: f64,
    /// Score under the active criterion (the largest offending p-value in
    /// p-value elimination mode).
    pub score: f64,
}

/// Ordered record of every step a search made. Steps are only ever appended,
/// so the trace replays the exact visited sequence.
#[derive(Debug, Clone, Default)]
pub struct SelectionTrace {
    steps: Vec<SelectionStep>,
}

impl SelectionTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, assigning it the next index.
    pub(crate) fn push(
        &mut self,
        action: StepAction,
        features: Vec<String>,
        aic: f64,
        bic: f64,
        adj_r_squared: f64,
        score: f64,
    ) {
        let step = self.steps.len();
        self.steps.push(SelectionStep {
            step,
            action,
            features,
            aic,
            bic,
            adj_r_squared,
            score,
        });
    }

    /// All recorded steps, in visit order.
    pub fn steps(&self) -> &[SelectionStep] {
        &self.steps
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trace is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The most recent step, if any.
    pub fn last(&self) -> Option<&SelectionStep> {
        self.steps.last()
    }

    /// Criterion scores per step, for plotting.
    pub fn scores(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.score).collect()
    }
}
