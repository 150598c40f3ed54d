//! Stepwise and exhaustive feature-subset search.
//!
//! The search loops fit one OLS model per candidate move and rank moves by an
//! information criterion. [`StepwiseSelector`] runs the greedy forward /
//! backward searches and p-value elimination; [`ExhaustiveSelector`] fits
//! every subset outright. Every visited step lands in a [`SelectionTrace`].

mod criterion;
mod exhaustive;
mod stepwise;
mod trace;

pub use criterion::Criterion;
pub use exhaustive::{ExhaustiveResult, ExhaustiveSelector, RankedSubset, MAX_EXHAUSTIVE_FEATURES};
pub use stepwise::{
    Direction, SelectionError, SelectionResult, StepwiseSelector, StepwiseSelectorBuilder,
};
pub use trace::{SelectionStep, SelectionTrace, StepAction};
