//! idseal node: the context object behind every registration and
//! verification request.
//!
//! The node owns:
//! - The ledger store (LMDB in production) and the verification orchestrator
//! - A mining lane that keeps proof-of-work off the async request path
//! - Request counters
//!
//! Binaries load a [`NodeConfig`], call [`init_logging`] once, and build a
//! single [`IdentityNode`].

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod mining_lane;
pub mod node;
pub mod tracing_spans;

pub use api::{
    RegisterRequest, RegisterResponse, RegisterStatus, VerifyRequest, VerifyResponse, VerifyStatus,
};
pub use config::{BiometricMode, NodeConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use mining_lane::MiningLane;
pub use node::IdentityNode;
