//! Application-Layer: Recurve-Sitzung, Operator und Events.

pub mod events;
pub mod intent_log;
pub mod operator;
/// Sitzungszustand und Zustandsmaschine
pub mod session;

pub use events::{SessionDisposition, SessionIntent};
pub use intent_log::{IntentLog, IntentRecord};
pub use operator::RecurveOperator;
pub use session::{RecurveSession, SessionPhase, UNDO_LABEL};
