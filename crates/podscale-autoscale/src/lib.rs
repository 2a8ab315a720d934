//! podscale-autoscale — keeps exactly one right-sized GPU pod running.
//!
//! Each poll cycle reads the active session count, picks the tier that
//! serves it, and reconciles the running pod against that tier. A pod is
//! stopped once sessions have stayed at zero for the idle timeout.
//!
//! # Cycle
//!
//! ```text
//! sessions = source.fetch()                   // fails open to 0
//! required = required_tier(catalog, sessions) // None iff sessions == 0
//!
//! if idle.observe(sessions) == IdleExpired and pod running:
//!     terminate(pod); state = none
//! else if required != None and required != current:
//!     terminate(pod) if any
//!     provision(required)                     // failure => state = none
//! ```
//!
//! A resize is a full replace: capacity drops to zero between the stop
//! and the create. Idle shutdown and scale-up never happen in the same
//! cycle because one needs zero sessions and the other needs some.

pub mod idle;
pub mod policy;
pub mod scaler;
pub mod state;

pub use idle::{IdleSignal, IdleTracker};
pub use policy::required_tier;
pub use scaler::{Autoscaler, CycleOutcome, ScalerSettings};
pub use state::{RunningInstance, ScalerState};
