//! Verification orchestrator: connects mining, storage, integrity checks and
//! matching into the registration and verification workflows.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use zeroize::Zeroizing;

use idseal_crypto::hash_secondary_id;
use idseal_ledger::{ChainReport, IntegrityVerifier};
use idseal_store::{AuditEntry, IdentityRecord, LedgerStore, RegistrationMetadata};
use idseal_types::{
    BiometricStatus, BiometricTemplate, BlockHash, Clock, IdentityKey, IdentityPayload,
    LedgerParams, ValidationError,
};
use idseal_work::{BlockMiner, Difficulty, MiningBudget};

use crate::error::VerificationError;
use crate::matcher::IdentityMatcher;
use crate::outcomes::{Evidence, RejectReason, Verdict, VerdictError};
use crate::BiometricCapabilities;

/// Input to a registration.
///
/// The raw secondary identifier is wiped from memory on drop and only its
/// SHA-256 digest leaves this struct.
pub struct Registration {
    pub key: String,
    pub name: String,
    pub secondary_id: Zeroizing<String>,
    pub metadata: RegistrationMetadata,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("secondary_id", &"<redacted>")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Where a registration landed in the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub key: IdentityKey,
    pub block_hash: BlockHash,
    pub index: u64,
    pub nonce: u64,
}

/// The orchestrator ties together every subsystem a verification touches.
pub struct VerificationOrchestrator {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    miner: BlockMiner,
    integrity: IntegrityVerifier,
    matcher: IdentityMatcher,
    params: LedgerParams,
    mining_timeout: Option<Duration>,
}

impl VerificationOrchestrator {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        capabilities: BiometricCapabilities,
        params: LedgerParams,
    ) -> Result<Self, ValidationError> {
        let difficulty = Difficulty::new(params.difficulty)?;
        Ok(Self {
            store,
            clock,
            miner: BlockMiner::new(difficulty),
            integrity: IntegrityVerifier::new(difficulty),
            matcher: IdentityMatcher::new(params.name_match_threshold, capabilities),
            params,
            mining_timeout: None,
        })
    }

    /// Bound every [`Self::register`] call's mining time.
    pub fn with_mining_timeout(mut self, timeout: Duration) -> Self {
        self.mining_timeout = Some(timeout);
        self
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn capabilities(&self) -> &BiometricCapabilities {
        self.matcher.capabilities()
    }

    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Run the configured extractor on an image.
    pub fn extract_template(&self, image: &[u8]) -> Result<BiometricTemplate, VerificationError> {
        Ok(self.capabilities().extract(image, self.params.template_len)?)
    }

    // ── Registration ────────────────────────────────────────────────────

    /// Seal a new identity into the ledger under the configured mining timeout.
    pub fn register(
        &self,
        registration: Registration,
        template: BiometricTemplate,
    ) -> Result<RegistrationReceipt, VerificationError> {
        let budget = match self.mining_timeout {
            Some(timeout) => MiningBudget::unbounded().with_timeout(timeout),
            None => MiningBudget::unbounded(),
        };
        self.register_with_budget(registration, template, &budget)
    }

    /// [`Self::register`] with the template extracted from an ID photo.
    pub fn register_image(
        &self,
        registration: Registration,
        id_photo: &[u8],
    ) -> Result<RegistrationReceipt, VerificationError> {
        let template = self.extract_template(id_photo)?;
        self.register(registration, template)
    }

    /// Seal a new identity into the ledger.
    ///
    /// Mines a block over the minimal identity payload, then appends it and
    /// inserts the identity record in one atomic store transaction. Mining is
    /// CPU-bound with no latency bound of its own; `budget` is the only limit.
    pub fn register_with_budget(
        &self,
        registration: Registration,
        template: BiometricTemplate,
        budget: &MiningBudget,
    ) -> Result<RegistrationReceipt, VerificationError> {
        let key = IdentityKey::new(&registration.key)?;
        let name = registration.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        template.ensure_len(self.params.template_len)?;

        if self.store.identity_exists(&key)? {
            return Err(VerificationError::AlreadyRegistered(key.to_string()));
        }

        let secondary_id_hash = hash_secondary_id(&registration.secondary_id);
        let payload =
            IdentityPayload::new(name.clone(), key.clone(), secondary_id_hash.clone(), template.clone())
                .to_value()?;

        let tip = self.store.tip()?;
        let timestamp = self.clock.now();
        let block = self.miner.mine_with(payload, &tip, timestamp, budget)?;

        let record = IdentityRecord {
            key: key.clone(),
            name,
            secondary_id_hash,
            biometric_template: Some(template),
            latest_block_hash: block.hash,
            verified: true,
            metadata: registration.metadata,
            registered_at: timestamp,
        };
        self.store.commit_registration(&block, &record)?;

        tracing::info!(
            key = %key,
            block_hash = %block.hash,
            index = block.index,
            nonce = block.nonce,
            "identity registered"
        );

        Ok(RegistrationReceipt {
            key,
            block_hash: block.hash,
            index: block.index,
            nonce: block.nonce,
        })
    }

    // ── Verification ────────────────────────────────────────────────────

    /// Verify a claimant against the registered identity for `key`.
    ///
    /// Every completed verdict is appended to the audit trail.
    pub fn verify_identity(
        &self,
        key: &str,
        claimed_name: &str,
        live: &BiometricTemplate,
    ) -> Result<Verdict, VerificationError> {
        let key = IdentityKey::new(key)?;
        let verdict = self.decide(&key, claimed_name, live)?;
        self.record_audit(&key, &verdict)?;

        let evidence = verdict.evidence();
        tracing::info!(
            key = %key,
            outcome = %verdict.outcome(),
            reason = verdict.reason().unwrap_or(""),
            name_score = evidence.name_score,
            integrity = %evidence.integrity,
            biometric = %evidence.biometric,
            "identity verification finished"
        );
        Ok(verdict)
    }

    /// [`Self::verify_identity`] with the live template extracted from a selfie.
    pub fn verify_image(
        &self,
        key: &str,
        claimed_name: &str,
        live_selfie: &[u8],
    ) -> Result<Verdict, VerificationError> {
        let live = self.extract_template(live_selfie)?;
        self.verify_identity(key, claimed_name, &live)
    }

    fn decide(
        &self,
        key: &IdentityKey,
        claimed_name: &str,
        live: &BiometricTemplate,
    ) -> Result<Verdict, VerificationError> {
        let mut evidence = Evidence::default();

        let record = match self.store.get_identity(key) {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                return Ok(Verdict::Rejected {
                    reason: RejectReason::IdentityNotFound,
                    evidence,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let (score, name_ok) = self.matcher.match_name(&record.name, claimed_name);
        evidence.name_score = Some(score);
        if !name_ok {
            return Ok(Verdict::Rejected {
                reason: RejectReason::NameMismatch { score },
                evidence,
            });
        }

        let Some(stored_template) = record.biometric_template.as_ref() else {
            return Ok(Verdict::Error {
                reason: VerdictError::NoBiometricData,
                evidence,
            });
        };

        let block = match self.store.get_by_hash(&record.latest_block_hash) {
            Ok(block) => block,
            Err(e) if e.is_not_found() => {
                return Ok(Verdict::Rejected {
                    reason: RejectReason::LedgerRecordMissing,
                    evidence,
                })
            }
            Err(e) => return Err(e.into()),
        };
        evidence.block_hash = Some(block.hash);

        let integrity = self.integrity.verify(&block);
        evidence.integrity = integrity.status();
        if !integrity.passed() {
            return Ok(Verdict::Rejected {
                reason: RejectReason::IntegrityCheckFailed,
                evidence,
            });
        }

        let comparison = self.matcher.match_biometrics(stored_template, live)?;
        evidence.distance = Some(comparison.distance);
        if !comparison.matched {
            evidence.biometric = BiometricStatus::NoMatch;
            return Ok(Verdict::Rejected {
                reason: RejectReason::BiometricMismatch {
                    distance: comparison.distance,
                },
                evidence,
            });
        }

        evidence.biometric = BiometricStatus::Match;
        Ok(Verdict::Verified { evidence })
    }

    fn record_audit(&self, key: &IdentityKey, verdict: &Verdict) -> Result<u64, VerificationError> {
        let evidence = verdict.evidence();
        let mut entry = AuditEntry::for_key(key, verdict.outcome(), self.clock.now());
        entry.name_score = evidence.name_score;
        entry.biometric = evidence.biometric;
        entry.integrity = evidence.integrity;
        entry.reason = verdict.reason().map(str::to_string);
        Ok(self.store.append_audit(&entry)?)
    }

    // ── Ledger inspection ───────────────────────────────────────────────

    /// Recorded verification decisions, oldest first.
    pub fn audit_trail(&self) -> Result<Vec<AuditEntry>, VerificationError> {
        Ok(self.store.iter_audit()?)
    }

    /// Walk the whole ledger and check every block and link.
    pub fn verify_ledger(&self) -> Result<ChainReport, VerificationError> {
        Ok(self.integrity.verify_store(self.store.as_ref())?)
    }
}
