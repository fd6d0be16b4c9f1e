//! # Self-Test Registry
//!
//! An explicit, constructed registry of named scenarios, owned by whoever
//! runs them. Nothing registers itself: the runner builds a
//! [`TestRegistry`], calls the registration functions it wants (for the
//! storage core, [`register_core_scenarios`]) and runs the lot.
//!
//! ```rust,ignore
//! let mut registry = TestRegistry::new();
//! register_core_scenarios(&mut registry)?;
//! let report = registry.run_all();
//! assert!(report.all_passed());
//! ```

mod scenarios;

pub use scenarios::register_core_scenarios;

use thiserror::Error;

use crate::error::EcsError;

/// Why a scenario failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioFailure {
    /// A [`check`] did not hold.
    #[error("{0}")]
    Assertion(String),

    /// A storage operation reported an error.
    #[error(transparent)]
    Ecs(#[from] EcsError),
}

/// Outcome of a single scenario.
pub type ScenarioResult = Result<(), ScenarioFailure>;

/// Errors raised while building a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// Two scenarios were registered under the same name.
    #[error("scenario '{0}' is already registered")]
    DuplicateScenario(String),
}

/// Fails the scenario with `message` unless `condition` holds.
///
/// # Errors
///
/// Returns [`ScenarioFailure::Assertion`] when `condition` is false.
#[inline]
pub fn check(condition: bool, message: impl Into<String>) -> ScenarioResult {
    if condition {
        Ok(())
    } else {
        Err(ScenarioFailure::Assertion(message.into()))
    }
}

type Scenario = Box<dyn Fn() -> ScenarioResult>;

/// Ordered mapping from scenario name to scenario.
#[derive(Default)]
pub struct TestRegistry {
    scenarios: Vec<(String, Scenario)>,
}

impl TestRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scenario. Scenarios run in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::DuplicateScenario`] if the name is taken.
    pub fn register<F>(&mut self, name: impl Into<String>, scenario: F) -> Result<(), HarnessError>
    where
        F: Fn() -> ScenarioResult + 'static,
    {
        let name = name.into();
        if self.scenarios.iter().any(|(existing, _)| *existing == name) {
            return Err(HarnessError::DuplicateScenario(name));
        }

        self.scenarios.push((name, Box::new(scenario)));
        Ok(())
    }

    /// Number of registered scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenario names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|(name, _)| name.as_str())
    }

    /// Runs one scenario by name, or returns `None` if it is unknown.
    #[must_use]
    pub fn run(&self, name: &str) -> Option<ScenarioResult> {
        self.scenarios
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, scenario)| scenario())
    }

    /// Runs every scenario, in order, without stopping at failures.
    #[must_use]
    pub fn run_all(&self) -> TestReport {
        if self.scenarios.is_empty() {
            return TestReport::default();
        }

        tracing::info!(count = self.scenarios.len(), "running scenarios");

        let outcomes = self
            .scenarios
            .iter()
            .map(|(name, scenario)| {
                let result = scenario();
                match &result {
                    Ok(()) => tracing::info!(scenario = %name, "scenario passed"),
                    Err(failure) => {
                        tracing::error!(scenario = %name, %failure, "scenario failed");
                    }
                }
                ScenarioOutcome {
                    name: name.clone(),
                    result,
                }
            })
            .collect();

        TestReport { outcomes }
    }
}

/// Name and result of one executed scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Registered name.
    pub name: String,
    /// What happened.
    pub result: ScenarioResult,
}

/// Results of [`TestRegistry::run_all`], in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestReport {
    outcomes: Vec<ScenarioOutcome>,
}

impl TestReport {
    /// Every executed scenario.
    #[must_use]
    pub fn outcomes(&self) -> &[ScenarioOutcome] {
        &self.outcomes
    }

    /// `true` when no scenario failed. An empty run passes.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// Names of the scenarios that passed.
    pub fn passed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .map(|outcome| outcome.name.as_str())
    }

    /// Names and failures of the scenarios that failed.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &ScenarioFailure)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(()) => None,
            Err(failure) => Some((outcome.name.as_str(), failure)),
        })
    }
}
