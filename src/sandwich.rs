//! Sandwich Matcher (spec §4.3).
//!
//! Quadratic-with-pruning scan over the block's ordered `(tx, swap)` pairs.
//! Vault-set intersection uses a small fixed-capacity set (spec §9's
//! re-architecture note: these sets hold at most two elements and are a
//! hot path, so a hash set would be overkill).

use solana_sdk::pubkey::Pubkey;

use crate::model::{PotentialSandwich, PotentialSwap, SwapInTx};

/// At most two distinct `Pubkey`s — the source or destination set built
/// from a swap's first two transfers.
#[derive(Debug, Clone, Copy)]
struct VaultPair {
    items: [Option<Pubkey>; 2],
}

impl VaultPair {
    fn from_two(a: Pubkey, b: Pubkey) -> Self {
        if a == b {
            Self { items: [Some(a), None] }
        } else {
            Self { items: [Some(a), Some(b)] }
        }
    }

    fn intersects(&self, other: &VaultPair) -> bool {
        self.items
            .iter()
            .flatten()
            .any(|x| other.items.iter().flatten().any(|y| x == y))
    }
}

/// `(entry_src, entry_dst)` style candidate vault sets from a swap's first
/// two transfers, per spec §4.3: "using the first two — not all — excludes
/// fee-side transfers observed in some DEXes."
fn candidate_vaults(swap: &PotentialSwap) -> (VaultPair, VaultPair) {
    let first = swap.transfers[0];
    let second = swap.transfers[1];
    (
        VaultPair::from_two(first.source, second.source),
        VaultPair::from_two(first.destination, second.destination),
    )
}

/// Finds all sandwich triples in one block's ordered swap sequence.
pub fn match_sandwiches<'tx>(x: &[SwapInTx<'tx>]) -> Vec<PotentialSandwich<'tx>> {
    let mut used: std::collections::HashSet<&'tx str> = std::collections::HashSet::new();
    let mut sandwiches = Vec::new();

    for i in 0..x.len() {
        let entry = &x[i];
        if used.contains(entry.tx.signature().as_ref()) || entry.swap_count_in_tx != 1 {
            continue;
        }
        if entry.swap.transfers.len() < 2 {
            continue;
        }

        let entry_signer = entry.tx.signer();
        let entry_dex = entry.swap.exchange_instruction.program_id();
        let (entry_src, entry_dst) = candidate_vaults(&entry.swap);

        if i + 2 >= x.len() {
            continue;
        }

        for j in (i + 2)..x.len() {
            let exit = &x[j];
            if used.contains(exit.tx.signature().as_ref()) {
                continue;
            }
            if exit.tx.signer() != entry_signer {
                continue;
            }
            if exit.swap.exchange_instruction.program_id() != entry_dex {
                continue;
            }
            if exit.swap.transfers.len() < 2 {
                continue;
            }

            let (exit_src, exit_dst) = candidate_vaults(&exit.swap);
            if !(entry_src.intersects(&exit_dst) && entry_dst.intersects(&exit_src)) {
                continue;
            }

            let mut victims = Vec::new();
            let mut valid = true;
            for k in (i + 1)..j {
                let candidate = &x[k];
                if candidate.tx.signer() == entry_signer {
                    valid = false;
                    break;
                }
                if candidate.swap.exchange_instruction.program_id() != entry_dex {
                    continue;
                }
                if candidate.swap.transfers.len() < 2 {
                    continue;
                }
                let (cand_src, cand_dst) = candidate_vaults(&candidate.swap);
                if cand_src.intersects(&entry_src) && cand_dst.intersects(&entry_dst) {
                    victims.push(x[k].clone());
                }
            }

            if valid && !victims.is_empty() {
                used.insert(entry.tx.signature().as_ref());
                used.insert(exit.tx.signature().as_ref());
                sandwiches.push(PotentialSandwich {
                    entry: entry.clone(),
                    targets: victims,
                    exit: exit.clone(),
                });
                break;
            }
        }
    }

    sandwiches
}
