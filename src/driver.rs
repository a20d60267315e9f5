//! Block-Level Driver (spec §4.6) and the external-interface contracts
//! (spec §6).
//!
//! `scan_block` is the pure, synchronous core: no I/O, no suspension
//! points (spec §5). The async traits below are the only place the crate
//! touches a runtime, mirroring the teacher's split between `events::`
//! (pure extraction) and its `bin/` binaries (the async wiring).

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use crate::errors::DriverError;
use crate::extract::extract_swaps;
use crate::fees::{jito_tip, priority_fee};
use crate::model::{AttackerTx, Block, Sandwich, StoreOutcome, SwapInTx};
use crate::registry::{ExchangeRegistry, PoolRegistry, TipAccountSet};
use crate::resolve::{resolve_direction, target_tx};
use crate::sandwich::match_sandwiches;

#[async_trait]
pub trait BlockSource {
    async fn fetch_block(&self, slot: u64) -> Result<Block, DriverError>;
}

#[async_trait]
pub trait SandwichSink {
    async fn store(&self, sandwich: &Sandwich) -> Result<StoreOutcome, DriverError>;
}

#[async_trait]
pub trait Checkpoint {
    async fn latest_stored_block(&self) -> Result<u64, DriverError>;
}

fn build_attacker_tx(
    swap_in_tx: &SwapInTx,
    profit_vault: Pubkey,
    targeted_vault: Pubkey,
    tip_accounts: &dyn TipAccountSet,
) -> Option<AttackerTx> {
    let (profit_token_amount, targeted_token_amount) =
        crate::resolve::split_amounts(&swap_in_tx.swap, profit_vault, targeted_vault).ok()?;
    Some(AttackerTx {
        signature: swap_in_tx.tx.signature().to_string(),
        profit_token_amount,
        targeted_token_amount,
        jito_tip: jito_tip(swap_in_tx.tx, tip_accounts),
        priority_fee: priority_fee(),
    })
}

/// Runs the full synchronous pipeline over one block: extraction, matching,
/// direction resolution, fee attribution, and the non-negative-profit
/// filter from spec §4.6. Performs no I/O.
pub fn scan_block(
    block: &Block,
    exchange_registry: &ExchangeRegistry,
    pool_registry: &dyn PoolRegistry,
    tip_accounts: &dyn TipAccountSet,
) -> Vec<Sandwich> {
    let mut swaps_in_block = Vec::new();
    for tx in &block.transactions {
        if !tx.is_successful() {
            continue;
        }
        let swaps = extract_swaps(tx);
        let count = swaps.len();
        for swap in swaps {
            swaps_in_block.push(SwapInTx {
                tx,
                swap,
                swap_count_in_tx: count,
            });
        }
    }

    let candidates = match_sandwiches(&swaps_in_block);
    let mut sandwiches = Vec::new();

    for candidate in candidates {
        let dex = candidate.entry.swap.exchange_instruction.program_id();
        let resolved = match resolve_direction(dex, &candidate.entry.swap, exchange_registry, pool_registry) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(
                    slot = block.slot,
                    entry_signature = %candidate.entry.tx.signature(),
                    error = %err,
                    "skipping sandwich: direction resolution failed"
                );
                continue;
            }
        };

        let entry_tx = build_attacker_tx(&candidate.entry, resolved.profit_vault, resolved.targeted_vault, tip_accounts);
        let exit_tx = build_attacker_tx(&candidate.exit, resolved.profit_vault, resolved.targeted_vault, tip_accounts);
        let (Some(entry_tx), Some(exit_tx)) = (entry_tx, exit_tx) else {
            tracing::warn!(
                slot = block.slot,
                entry_signature = %candidate.entry.tx.signature(),
                "skipping sandwich: entry/exit amounts unmatchable against resolved vaults"
            );
            continue;
        };

        let target_txs: Option<Vec<_>> = candidate
            .targets
            .iter()
            .map(|t| {
                target_tx(
                    t.tx.signature().to_string(),
                    t.tx.signer().to_string(),
                    &t.swap,
                    resolved.profit_vault,
                    resolved.targeted_vault,
                )
                .ok()
            })
            .collect();
        let Some(target_txs) = target_txs else {
            tracing::warn!(
                slot = block.slot,
                entry_signature = %candidate.entry.tx.signature(),
                "skipping sandwich: a victim leg is unmatchable against resolved vaults"
            );
            continue;
        };

        if exit_tx.profit_token_amount <= entry_tx.profit_token_amount {
            tracing::info!(
                slot = block.slot,
                entry_signature = %candidate.entry.tx.signature(),
                "skipping sandwich: non-positive profit"
            );
            continue;
        }

        let attacker_profit_native = exit_tx.profit_token_amount - entry_tx.profit_token_amount;
        sandwiches.push(Sandwich {
            id: Arc::from(entry_tx.signature.as_str()),
            block: block.slot,
            block_time: block.block_time,
            dex: dex.to_string(),
            pool: resolved.pool.pool_id.to_string(),
            bot: candidate.entry.swap.top_level_ix.program_id().to_string(),
            attacker: candidate.entry.tx.signer().to_string(),
            profit_token: resolved.profit_token.to_string(),
            targeted_token: resolved.targeted_token.to_string(),
            entry_tx,
            target_txs,
            exit_tx,
            attacker_profit_native,
        });
    }

    sandwiches
}

/// Scans one block end-to-end against the async external interfaces: fetch,
/// compute, store. Demonstrates the wiring described in spec §6; a real
/// orchestration loop (picking which slots to scan, retrying on
/// `DriverError`) lives outside the core.
pub async fn run_once(
    slot: u64,
    source: &dyn BlockSource,
    exchange_registry: &ExchangeRegistry,
    pool_registry: &dyn PoolRegistry,
    tip_accounts: &dyn TipAccountSet,
    sink: &dyn SandwichSink,
) -> Result<usize, DriverError> {
    let block = source.fetch_block(slot).await?;
    let sandwiches = scan_block(&block, exchange_registry, pool_registry, tip_accounts);
    for sandwich in &sandwiches {
        match sink.store(sandwich).await? {
            StoreOutcome::Stored => {}
            StoreOutcome::AlreadyPresent => {
                tracing::info!(slot, id = %sandwich.id, "sandwich already stored, skipping");
            }
        }
    }
    Ok(sandwiches.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountKey, InnerInstructionGroup, Instruction, PoolInfo, Transaction};
    use serde_json::json;
    use std::collections::HashMap;

    fn transfer_ix(source: Pubkey, destination: Pubkey, amount: u64) -> Instruction {
        Instruction::Parsed {
            program: Arc::from("spl-token"),
            program_id: Pubkey::new_unique(),
            parsed_kind: Arc::from("transfer"),
            parsed_info: json!({
                "amount": amount.to_string(),
                "source": source.to_string(),
                "destination": destination.to_string(),
            }),
            stack_height: 1,
        }
    }

    fn swap_tx(sig: &str, signer: Pubkey, dex: Pubkey, pool_id: Pubkey, t0: Instruction, t1: Instruction) -> Transaction {
        let exchange_ix = Instruction::Regular {
            program_id: dex,
            accounts: vec![pool_id],
            data: vec![],
            stack_height: 0,
        };
        Transaction {
            signatures: vec![Arc::from(sig)],
            account_keys: vec![AccountKey { pubkey: signer, signer: true, writable: true }],
            top_level_instructions: vec![exchange_ix],
            inner_instruction_groups: vec![InnerInstructionGroup { index: 0, instructions: vec![t0, t1] }],
            err: None,
        }
    }

    #[test]
    fn end_to_end_scan_finds_one_profitable_sandwich() {
        let dex = Pubkey::new_unique();
        let attacker = Pubkey::new_unique();
        let victim = Pubkey::new_unique();
        let attacker_a = Pubkey::new_unique();
        let attacker_b = Pubkey::new_unique();
        let victim_a = Pubkey::new_unique();
        let victim_b = Pubkey::new_unique();

        let pool = PoolInfo {
            pool_id: Pubkey::new_unique(),
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            token_a_vault: Pubkey::new_unique(),
            token_b_vault: Pubkey::new_unique(),
        };

        let entry = swap_tx(
            "entry",
            attacker,
            dex,
            pool.pool_id,
            transfer_ix(attacker_b, pool.token_a_vault, 100),
            transfer_ix(pool.token_b_vault, attacker_a, 90),
        );
        let middle = swap_tx(
            "victim",
            victim,
            dex,
            pool.pool_id,
            transfer_ix(victim_b, pool.token_a_vault, 50),
            transfer_ix(pool.token_b_vault, victim_a, 45),
        );
        let exit = swap_tx(
            "exit",
            attacker,
            dex,
            pool.pool_id,
            transfer_ix(pool.token_a_vault, attacker_b, 160),
            transfer_ix(attacker_a, pool.token_b_vault, 140),
        );

        let block = Block {
            slot: 1,
            block_time: 0,
            transactions: vec![entry, middle, exit],
        };

        let mut exchange_registry = ExchangeRegistry::new();
        exchange_registry.insert(dex, 0);
        let mut pool_registry: HashMap<Pubkey, PoolInfo> = HashMap::new();
        pool_registry.insert(pool.pool_id, pool);
        let tip_accounts: std::collections::HashSet<Pubkey> = std::collections::HashSet::new();

        let sandwiches = scan_block(&block, &exchange_registry, &pool_registry, &tip_accounts);

        assert_eq!(sandwiches.len(), 1);
        let found = &sandwiches[0];
        assert_eq!(found.target_txs.len(), 1);
        assert_eq!(found.profit_token, pool.token_a.to_string());
        assert_eq!(found.attacker_profit_native, 60);
        assert_eq!(found.entry_tx.profit_token_amount, 100);
        assert_eq!(found.exit_tx.profit_token_amount, 160);

        // Re-scanning the same block is idempotent: same sandwich, same amounts.
        let rescanned = scan_block(&block, &exchange_registry, &pool_registry, &tip_accounts);
        assert_eq!(rescanned.len(), 1);
        assert_eq!(rescanned[0].id, found.id);
    }

    #[test]
    fn non_positive_profit_is_filtered_out() {
        let dex = Pubkey::new_unique();
        let attacker = Pubkey::new_unique();
        let victim = Pubkey::new_unique();
        let attacker_a = Pubkey::new_unique();
        let attacker_b = Pubkey::new_unique();
        let victim_a = Pubkey::new_unique();
        let victim_b = Pubkey::new_unique();

        let pool = PoolInfo {
            pool_id: Pubkey::new_unique(),
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            token_a_vault: Pubkey::new_unique(),
            token_b_vault: Pubkey::new_unique(),
        };

        let entry = swap_tx(
            "entry",
            attacker,
            dex,
            pool.pool_id,
            transfer_ix(attacker_b, pool.token_a_vault, 100),
            transfer_ix(pool.token_b_vault, attacker_a, 90),
        );
        let middle = swap_tx(
            "victim",
            victim,
            dex,
            pool.pool_id,
            transfer_ix(victim_b, pool.token_a_vault, 50),
            transfer_ix(pool.token_b_vault, victim_a, 45),
        );
        // exit's profit leg (90) does not exceed entry's (100): filtered.
        let exit = swap_tx(
            "exit",
            attacker,
            dex,
            pool.pool_id,
            transfer_ix(pool.token_a_vault, attacker_b, 90),
            transfer_ix(attacker_a, pool.token_b_vault, 80),
        );

        let block = Block { slot: 1, block_time: 0, transactions: vec![entry, middle, exit] };

        let mut exchange_registry = ExchangeRegistry::new();
        exchange_registry.insert(dex, 0);
        let mut pool_registry: HashMap<Pubkey, PoolInfo> = HashMap::new();
        pool_registry.insert(pool.pool_id, pool);
        let tip_accounts: std::collections::HashSet<Pubkey> = std::collections::HashSet::new();

        assert!(scan_block(&block, &exchange_registry, &pool_registry, &tip_accounts).is_empty());
    }
}
