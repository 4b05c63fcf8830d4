//! The keyword a step is written with.
//!
//! The feature parser records the keyword of every step, registries tag
//! definitions with the keyword they were declared under, and the runner
//! reports which primary keyword an `And` or `But` step stands for.

use std::fmt;

/// Keyword introducing a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepKeyword {
    /// A precondition.
    Given,
    /// An action.
    When,
    /// An expected outcome.
    Then,
    /// Continues the previous step.
    And,
    /// Continues the previous step with a contrast.
    But,
}

impl StepKeyword {
    /// The keyword as written in a feature file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Whether the keyword is `And` or `But`.
    #[must_use]
    pub const fn is_conjunction(self) -> bool {
        matches!(self, Self::And | Self::But)
    }

    /// The primary keyword this step stands for, tracking the last one seen
    /// in `previous`.
    ///
    /// A conjunction before any primary keyword counts as `Given`.
    ///
    /// ```
    /// use stepwise_patterns::StepKeyword;
    ///
    /// let mut previous = None;
    /// let written = [StepKeyword::But, StepKeyword::When, StepKeyword::And];
    /// let resolved: Vec<_> = written.iter().map(|k| k.resolve(&mut previous)).collect();
    /// assert_eq!(resolved, [StepKeyword::Given, StepKeyword::When, StepKeyword::When]);
    /// ```
    #[must_use]
    pub fn resolve(self, previous: &mut Option<Self>) -> Self {
        if self.is_conjunction() {
            return previous.unwrap_or(Self::Given);
        }
        *previous = Some(self);
        self
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
