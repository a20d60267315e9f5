//! Demonstration driver: wires the `BlockSource`/`SandwichSink`/
//! `Checkpoint` contracts (spec §6) against in-memory stand-ins and scans
//! one block. Not an orchestrator — no retry/backoff, no real RPC client,
//! per spec §1's exclusion of "the top-level orchestration loop that
//! chooses which block numbers to scan."
//!
//! Grounded on the teacher's `bin/detector.rs`: a slot argument from
//! `env::args()`, progress logged with structured fields instead of the
//! teacher's `println!`.

use std::collections::HashMap;

use async_trait::async_trait;
use sandwich_core::driver::{run_once, BlockSource, Checkpoint, SandwichSink};
use sandwich_core::errors::DriverError;
use sandwich_core::model::{Block, Sandwich, StoreOutcome};
use sandwich_core::registry::ExchangeRegistry;

/// A block source with nothing to fetch from; real deployments implement
/// `BlockSource` against an RPC client (excluded from the core, spec §1).
struct EmptyBlockSource;

#[async_trait]
impl BlockSource for EmptyBlockSource {
    async fn fetch_block(&self, slot: u64) -> Result<Block, DriverError> {
        Ok(Block {
            slot,
            block_time: 0,
            transactions: Vec::new(),
        })
    }
}

struct StdoutSink;

#[async_trait]
impl SandwichSink for StdoutSink {
    async fn store(&self, sandwich: &Sandwich) -> Result<StoreOutcome, DriverError> {
        match serde_json::to_string(sandwich) {
            Ok(json) => println!("{json}"),
            Err(err) => return Err(DriverError::Store(err.to_string())),
        }
        Ok(StoreOutcome::Stored)
    }
}

/// Always resumes from slot 0; a real deployment backs this with the same
/// store `SandwichSink` writes to (spec §6).
struct GenesisCheckpoint;

#[async_trait]
impl Checkpoint for GenesisCheckpoint {
    async fn latest_stored_block(&self) -> Result<u64, DriverError> {
        Ok(0)
    }
}

#[tokio::main]
async fn main() {
    sandwich_core::init_tracing();

    let checkpoint = GenesisCheckpoint;
    let slot: u64 = match std::env::args().nth(1).and_then(|s| s.parse().ok()) {
        Some(slot) => slot,
        None => match checkpoint.latest_stored_block().await {
            Ok(slot) => slot,
            Err(err) => {
                tracing::error!(error = %err, "checkpoint lookup failed");
                return;
            }
        },
    };

    let exchange_registry = ExchangeRegistry::with_known_dexes();
    let pool_registry: HashMap<solana_sdk::pubkey::Pubkey, sandwich_core::model::PoolInfo> = HashMap::new();
    let tip_accounts: std::collections::HashSet<solana_sdk::pubkey::Pubkey> = std::collections::HashSet::new();
    let source = EmptyBlockSource;
    let sink = StdoutSink;

    match run_once(slot, &source, &exchange_registry, &pool_registry, &tip_accounts, &sink).await {
        Ok(found) => tracing::info!(slot, found, "scan complete"),
        Err(err) => tracing::error!(slot, error = %err, "scan failed"),
    }
}
