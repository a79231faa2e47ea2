/// An operation exposed by a capability
///
/// Operations are declared statically on the [`Capability`] descriptor, so
/// whether an operation is timed is decided by the capability's definition, not
/// by the value being wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    /// Name used to key timing data, e.g. `"parse"`
    pub signature: &'static str,

    /// Whether calls to this operation are timed
    pub timed: bool,
}

impl Operation {
    /// Declares an operation whose calls are timed
    pub const fn timed(signature: &'static str) -> Self {
        Self {
            signature,
            timed: true,
        }
    }

    /// Declares an operation that is passed through without timing
    pub const fn untimed(signature: &'static str) -> Self {
        Self {
            signature,
            timed: false,
        }
    }
}

/// Static description of a trait whose implementations can be profiled
///
/// A capability is usually an uninhabited marker type declared next to the
/// trait it describes:
///
/// ```
/// use ripple_count::profiler::{Capability, Operation};
///
/// pub trait Greeter {
///     fn greet(&self) -> String;
///     fn language(&self) -> &str;
/// }
///
/// pub enum GreeterCapability {}
///
/// impl Capability for GreeterCapability {
///     const NAME: &'static str = "Greeter";
///     const OPERATIONS: &'static [Operation] = &[
///         Operation::timed("greet"),
///         Operation::untimed("language"),
///     ];
/// }
///
/// assert!(GreeterCapability::is_timed("greet"));
/// assert!(!GreeterCapability::is_timed("language"));
/// ```
pub trait Capability {
    /// Name of the capability, used in error messages
    const NAME: &'static str;

    /// Every operation the capability exposes
    const OPERATIONS: &'static [Operation];

    /// Returns true if the operation is declared and timed
    fn is_timed(signature: &str) -> bool {
        Self::OPERATIONS
            .iter()
            .any(|op| op.timed && op.signature == signature)
    }

    /// Returns true if the operation is declared, timed or not
    fn declares(signature: &str) -> bool {
        Self::OPERATIONS.iter().any(|op| op.signature == signature)
    }

    /// Returns true if at least one operation is timed
    fn has_timed_operations() -> bool {
        Self::OPERATIONS.iter().any(|op| op.timed)
    }
}
