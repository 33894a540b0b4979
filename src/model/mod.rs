//! Carbon model module for RackCarbon
//!
//! Per-server models: grid intensity estimation, the linear fan power
//! fit, the operational/embodied carbon model, and the failure-rate
//! maintenance model.

mod fan;
mod intensity;
mod maintenance;
mod server;

pub use fan::*;
pub use intensity::*;
pub use maintenance::*;
pub use server::*;
