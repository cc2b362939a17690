//! The node context: one explicit object owning the store, orchestrator,
//! mining lane and counters, built once and handed to every request.

use std::sync::Arc;

use idseal_ledger::ChainReport;
use idseal_store::{AuditEntry, BlockStore, LedgerStore};
use idseal_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use idseal_types::{Block, BlockHash, Clock, Outcome, SystemClock};
use idseal_utils::{Stat, StatsCounter, StatsSnapshot};
use idseal_verification::{
    BiometricCapabilities, FeatureExtractor, RegistrationReceipt, Verdict,
    VerificationOrchestrator,
};

use crate::api::{RegisterRequest, RegisterResponse, VerifyRequest, VerifyResponse};
use crate::config::{BiometricMode, NodeConfig};
use crate::mining_lane::MiningLane;
use crate::tracing_spans::{ledger_check_span, register_span, verify_span};
use crate::NodeError;

pub struct IdentityNode {
    config: NodeConfig,
    orchestrator: Arc<VerificationOrchestrator>,
    lane: MiningLane,
    stats: Arc<StatsCounter>,
}

impl IdentityNode {
    /// Open the LMDB ledger under `config.data_dir` and build the node on it.
    ///
    /// The data directory and every database are checked before the node
    /// accepts any request.
    pub fn open(config: NodeConfig, extractor: Arc<dyn FeatureExtractor>) -> Result<Self, NodeError> {
        config.validate()?;
        check_data_dir(&config.data_dir).map_err(NodeError::DataDir)?;

        let env = LmdbEnvironment::open(&config.data_dir, config.lmdb_max_dbs, config.lmdb_map_size)?;
        let report = check_integrity(&env)?;
        if !report.is_healthy() {
            return Err(NodeError::Corrupt(report.errors.join("; ")));
        }
        tracing::info!(
            data_dir = %config.data_dir.display(),
            databases = report.databases_checked(),
            entries = report.total_entries(),
            "ledger opened"
        );

        Self::with_store(config, Arc::new(env), Arc::new(SystemClock), extractor)
    }

    /// Build the node over any store and clock.
    ///
    /// `extractor` is ignored when the config selects stub biometrics.
    pub fn with_store(
        config: NodeConfig,
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
        extractor: Arc<dyn FeatureExtractor>,
    ) -> Result<Self, NodeError> {
        config.validate()?;

        let capabilities = match config.biometric_mode {
            BiometricMode::Live => BiometricCapabilities::live(extractor, config.biometric_tolerance),
            BiometricMode::Stub => {
                tracing::warn!("biometric mode is stub: every face comparison matches");
                BiometricCapabilities::Stub
            }
        };
        let orchestrator =
            VerificationOrchestrator::new(store, clock, capabilities, config.ledger_params())?;
        let lane = MiningLane::new(config.mining_workers, config.mining_deadline());

        tracing::info!(
            difficulty = config.difficulty,
            biometric_mode = %config.biometric_mode,
            mining_workers = lane.workers(),
            mining_deadline_ms = config.mining_deadline_ms,
            "identity node ready"
        );

        Ok(Self {
            config,
            orchestrator: Arc::new(orchestrator),
            lane,
            stats: Arc::new(StatsCounter::default()),
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn orchestrator(&self) -> &Arc<VerificationOrchestrator> {
        &self.orchestrator
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // ── Requests ────────────────────────────────────────────────────────

    /// Extract the ID photo's template, then mine and commit on the lane.
    pub async fn register(&self, request: RegisterRequest) -> Result<RegistrationReceipt, NodeError> {
        let (registration, id_photo) = request.into_parts();
        let span = register_span(&registration.key);

        let extract_span = span.clone();
        let orchestrator = Arc::clone(&self.orchestrator);
        let extracted = tokio::task::spawn_blocking(move || {
            let _entered = extract_span.enter();
            orchestrator.extract_template(&id_photo)
        })
        .await
        .map_err(|e| NodeError::Task(e.to_string()));

        let result = match extracted {
            Ok(Ok(template)) => {
                let orchestrator = Arc::clone(&self.orchestrator);
                self.lane
                    .run(move |budget| {
                        let _entered = span.enter();
                        orchestrator.register_with_budget(registration, template, budget)
                    })
                    .await
                    .and_then(|r| r.map_err(NodeError::from))
            }
            Ok(Err(e)) => Err(e.into()),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => self.stats.increment(Stat::Registered),
            Err(e) if e.is_timeout() => {
                tracing::warn!(error = %e, "registration mining timed out");
                self.stats.increment(Stat::MiningTimeout);
            }
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                self.stats.increment(Stat::RegistrationFailed);
            }
        }
        result
    }

    /// Verify a claimant's name and live selfie against the ledger.
    pub async fn verify(&self, request: VerifyRequest) -> Result<Verdict, NodeError> {
        let span = verify_span(&request.pan_number);
        let orchestrator = Arc::clone(&self.orchestrator);
        let result = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            orchestrator.verify_image(&request.pan_number, &request.full_name, &request.live_selfie)
        })
        .await
        .map_err(|e| NodeError::Task(e.to_string()))
        .and_then(|r| r.map_err(NodeError::from));

        match &result {
            Ok(verdict) => self.stats.increment(match verdict.outcome() {
                Outcome::Verified => Stat::Verified,
                Outcome::Rejected => Stat::Rejected,
                Outcome::Error => Stat::VerdictError,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "verification failed");
                self.stats.increment(Stat::VerificationFailed);
            }
        }
        result
    }

    /// [`Self::register`] rendered as a response body.
    pub async fn handle_register(&self, request: RegisterRequest) -> RegisterResponse {
        RegisterResponse::from_result(&self.register(request).await)
    }

    /// [`Self::verify`] rendered as a response body.
    pub async fn handle_verify(&self, request: VerifyRequest) -> VerifyResponse {
        VerifyResponse::from_result(&self.verify(request).await)
    }

    // ── Inspection ──────────────────────────────────────────────────────

    pub fn audit_trail(&self) -> Result<Vec<AuditEntry>, NodeError> {
        Ok(self.orchestrator.audit_trail()?)
    }

    pub fn block_by_hash(&self, hash: &BlockHash) -> Result<Block, NodeError> {
        Ok(self.orchestrator.store().get_by_hash(hash)?)
    }

    pub fn block_by_index(&self, index: u64) -> Result<Block, NodeError> {
        Ok(self.orchestrator.store().get_by_index(index)?)
    }

    /// Recheck every block's seal and the links between them.
    pub fn verify_ledger(&self) -> Result<ChainReport, NodeError> {
        let _entered = ledger_check_span().entered();
        let report = self.orchestrator.verify_ledger()?;
        match &report {
            ChainReport::Passed { blocks } => tracing::info!(blocks, "ledger verified"),
            ChainReport::FailedAt { index, fault } => {
                tracing::warn!(index, %fault, "ledger verification failed")
            }
        }
        Ok(report)
    }

    /// Stop taking new registrations. In-flight jobs finish normally.
    pub fn shutdown(&self) {
        self.lane.close();
        tracing::info!(stats = ?self.stats.snapshot(), "identity node stopped accepting registrations");
    }
}
