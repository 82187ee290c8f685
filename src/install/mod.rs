//! Install orchestration: the per-build-dir session, the invocation gate,
//! and the Conan CLI invoker.

pub mod gate;
pub mod invoker;
pub mod session;

pub use gate::{GateState, InvocationGate};
pub use invoker::{InstallInvoker, InstallOutcome};
pub use session::Session;
