//! Lifecycle phases.
//!
//! Phases are a closed enumeration rather than free-form strings: every
//! operation has exactly a before, main, and after step, and typos are
//! unrepresentable. Display strings follow the `before.<op>` / `<op>` /
//! `after.<op>` convention for logs and error messages.

use std::fmt;

/// A pipeline operation the orchestrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Forward build: canonical model -> native artifacts.
    Build,
    /// Reverse build: native artifacts -> canonical model.
    ReverseBuild,
    /// Deploy previously built artifacts.
    Deploy,
}

impl Operation {
    /// The verb used in phase display names.
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Build => "build",
            Operation::ReverseBuild => "build.reverse",
            Operation::Deploy => "deploy",
        }
    }

    /// The standard phase sequence for this operation.
    pub fn phases(&self) -> [Phase; 3] {
        [Phase::before(*self), Phase::main(*self), Phase::after(*self)]
    }
}

/// Position of a phase within its operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Before,
    Main,
    After,
}

/// One named point in the lifecycle at which registered handlers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase {
    pub operation: Operation,
    pub step: Step,
}

impl Phase {
    pub fn before(operation: Operation) -> Self {
        Phase { operation, step: Step::Before }
    }

    pub fn main(operation: Operation) -> Self {
        Phase { operation, step: Step::Main }
    }

    pub fn after(operation: Operation) -> Self {
        Phase { operation, step: Step::After }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Step::Before => write!(f, "before.{}", self.operation.verb()),
            Step::Main => write!(f, "{}", self.operation.verb()),
            Step::After => write!(f, "after.{}", self.operation.verb()),
        }
    }
}
