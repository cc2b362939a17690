//! Identity registration and verification.
//!
//! Registration seals a minimal identity payload into a mined ledger block and
//! indexes it by key. Verification recombines three signals into one verdict:
//!
//! 1. **Name**: similarity of the claimed name to the registered one.
//! 2. **Integrity**: the registration block still hashes to its recorded hash.
//! 3. **Biometrics**: distance between the registered and the live template.
//!
//! Business outcomes (not found, mismatch, tampering) are [`Verdict`]s; server
//! faults (extraction, persistence, timeouts) are [`VerificationError`]s.

pub mod biometrics;
pub mod error;
pub mod matcher;
pub mod orchestrator;
pub mod outcomes;

pub use biometrics::{BiometricCapabilities, ExtractionError, FeatureExtractor, JsonTemplateExtractor};
pub use error::{ErrorKind, VerificationError};
pub use matcher::{biometric_distance, name_similarity, BiometricComparison, IdentityMatcher};
pub use orchestrator::{Registration, RegistrationReceipt, VerificationOrchestrator};
pub use outcomes::{Evidence, RejectReason, Verdict, VerdictError};
