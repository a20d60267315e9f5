//! Direction Resolver (spec §4.4).
//!
//! Looks up the confirmed sandwich's DEX and pool, decides which side of
//! the pool is `profit_token` vs `targeted_token`, and derives per-
//! transaction amounts for entry, exit, and every victim.

use solana_sdk::pubkey::Pubkey;

use crate::errors::ResolveError;
use crate::model::{PoolInfo, PotentialSwap, TargetTx};
use crate::registry::{ExchangeRegistry, PoolRegistry};

#[derive(Debug)]
pub struct ResolvedDirection {
    pub pool: PoolInfo,
    pub profit_token: Pubkey,
    pub targeted_token: Pubkey,
    pub profit_vault: Pubkey,
    pub targeted_vault: Pubkey,
}

/// Resolves the pool and profit/targeted direction for the entry swap of a
/// confirmed sandwich.
pub fn resolve_direction(
    dex: Pubkey,
    entry_swap: &PotentialSwap,
    exchange_registry: &ExchangeRegistry,
    pool_registry: &dyn PoolRegistry,
) -> Result<ResolvedDirection, ResolveError> {
    let entry = exchange_registry.get(&dex).ok_or(ResolveError::UnknownDex)?;
    let pool_address = entry_swap
        .exchange_instruction
        .accounts()
        .get(entry.pool_account_index)
        .copied()
        .ok_or(ResolveError::InvalidPoolIndex)?;
    let pool = *pool_registry
        .get(&pool_address)
        .ok_or(ResolveError::UnknownPool)?;

    for transfer in &entry_swap.transfers {
        if transfer.destination == pool.token_a_vault || transfer.source == pool.token_b_vault {
            return Ok(ResolvedDirection {
                pool,
                profit_token: pool.token_a,
                targeted_token: pool.token_b,
                profit_vault: pool.token_a_vault,
                targeted_vault: pool.token_b_vault,
            });
        }
        if transfer.destination == pool.token_b_vault || transfer.source == pool.token_a_vault {
            return Ok(ResolvedDirection {
                pool,
                profit_token: pool.token_b,
                targeted_token: pool.token_a,
                profit_vault: pool.token_b_vault,
                targeted_vault: pool.token_a_vault,
            });
        }
    }

    Err(ResolveError::UnmatchableDirection)
}

/// Splits a swap's first two transfers into `(profit_amount,
/// targeted_amount)` against the resolved vaults, mirroring the upstream
/// `AttackerTx`/`TargetTx` constructors: the first transfer decides which
/// of the two legs is which.
pub fn split_amounts(swap: &PotentialSwap, profit_vault: Pubkey, targeted_vault: Pubkey) -> Result<(u64, u64), ResolveError> {
    if swap.transfers.len() < 2 {
        return Err(ResolveError::UnmatchableDirection);
    }
    let first = swap.transfers[0];
    let second = swap.transfers[1];
    if first.source == profit_vault || first.destination == profit_vault {
        Ok((first.amount, second.amount))
    } else if first.source == targeted_vault || first.destination == targeted_vault {
        Ok((second.amount, first.amount))
    } else {
        Err(ResolveError::UnmatchableDirection)
    }
}

pub fn target_tx(
    signature: String,
    signer: String,
    swap: &PotentialSwap,
    profit_vault: Pubkey,
    targeted_vault: Pubkey,
) -> Result<TargetTx, ResolveError> {
    let (profit_token_amount, targeted_token_amount) = split_amounts(swap, profit_vault, targeted_vault)?;
    Ok(TargetTx {
        signature,
        signer,
        profit_token_amount,
        targeted_token_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Instruction, Transfer};
    use std::collections::HashMap;

    fn make_pool() -> PoolInfo {
        PoolInfo {
            pool_id: Pubkey::new_unique(),
            token_a: Pubkey::new_unique(),
            token_b: Pubkey::new_unique(),
            token_a_vault: Pubkey::new_unique(),
            token_b_vault: Pubkey::new_unique(),
        }
    }

    #[test]
    fn resolves_profit_token_a_when_destination_is_vault_a() {
        let pool = make_pool();
        let dex = Pubkey::new_unique();
        let mut exchange_registry = ExchangeRegistry::new();
        exchange_registry.insert(dex, 0);
        let mut pool_registry = HashMap::new();
        pool_registry.insert(pool.pool_id, pool);

        let exchange_ix = Instruction::Regular {
            program_id: dex,
            accounts: vec![pool.pool_id],
            data: vec![],
            stack_height: 1,
        };
        let swap = PotentialSwap {
            exchange_instruction: &exchange_ix,
            transfer_instructions: vec![],
            transfers: vec![
                Transfer { mint: None, amount: 10, source: Pubkey::new_unique(), destination: pool.token_a_vault },
                Transfer { mint: None, amount: 9, source: pool.token_b_vault, destination: Pubkey::new_unique() },
            ],
            top_level_ix: &exchange_ix,
        };

        let resolved = resolve_direction(dex, &swap, &exchange_registry, &pool_registry).unwrap();
        assert_eq!(resolved.profit_token, pool.token_a);
        assert_eq!(resolved.targeted_token, pool.token_b);
    }

    #[test]
    fn unknown_dex_is_an_error() {
        let pool_registry: HashMap<Pubkey, PoolInfo> = HashMap::new();
        let exchange_registry = ExchangeRegistry::new();
        let ix = Instruction::Regular {
            program_id: Pubkey::new_unique(),
            accounts: vec![],
            data: vec![],
            stack_height: 1,
        };
        let swap = PotentialSwap {
            exchange_instruction: &ix,
            transfer_instructions: vec![],
            transfers: vec![],
            top_level_ix: &ix,
        };
        let err = resolve_direction(Pubkey::new_unique(), &swap, &exchange_registry, &pool_registry).unwrap_err();
        assert_eq!(err, ResolveError::UnknownDex);
    }
}
