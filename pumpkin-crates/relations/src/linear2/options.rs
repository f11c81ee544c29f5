use std::fmt::Display;

/// Options related to the binary relation cache.
#[derive(Debug, Copy, Clone)]
pub struct Linear2Options {
    /// The maximum number of relation pairs which are combined when closing the unit relations at
    /// the root transitively.
    pub augmentation_work_limit: usize,
    /// Determines whether new root relations are derived by chaining known ones.
    pub transitive_closure: TransitiveClosure,
}

impl Default for Linear2Options {
    fn default() -> Self {
        Self {
            augmentation_work_limit: 100_000,
            transitive_closure: TransitiveClosure::default(),
        }
    }
}

/// How the unit relations at the root are closed transitively.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TransitiveClosure {
    /// No relations are derived; only the topological order is computed.
    Disabled,
    /// Relations are derived along the topological order until the work limit is reached.
    #[default]
    Bounded,
}

impl Display for TransitiveClosure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitiveClosure::Disabled => write!(f, "disabled"),
            TransitiveClosure::Bounded => write!(f, "bounded"),
        }
    }
}
