pub mod initial_state;
pub mod propagation;
pub mod resolution;

pub use initial_state::build_initial_state;
pub use propagation::{PropagationEngine, PropagationOutcome, PropagationStats};
pub use resolution::{infer_relation, Frame, OperandResolver};
