//! Fee Attribution (spec §4.5).
//!
//! Scans a transaction's top-level instructions, then its inner
//! instructions, in order, for a transfer to a known tip-recipient
//! account. `priority_fee` is a reserved field, always `0` in this
//! revision (see DESIGN.md's Open Question resolutions).

use crate::model::{Instruction, Transaction};
use crate::registry::TipAccountSet;

fn lamports_if_tip(ix: &Instruction, tip_accounts: &dyn TipAccountSet) -> Option<u64> {
    let Instruction::Parsed {
        program,
        parsed_kind,
        parsed_info,
        ..
    } = ix
    else {
        return None;
    };
    if program.as_ref() != "system" || parsed_kind.as_ref() != "transfer" {
        return None;
    }
    let destination: solana_sdk::pubkey::Pubkey =
        parsed_info.get("destination")?.as_str()?.parse().ok()?;
    if !tip_accounts.contains(&destination) {
        return None;
    }
    parsed_info.get("lamports")?.as_u64()
}

/// The first lamport transfer to a tip-recipient account, scanning
/// top-level instructions before inner instructions, in their natural
/// order. `0` if none found.
pub fn jito_tip(tx: &Transaction, tip_accounts: &dyn TipAccountSet) -> u64 {
    for ix in &tx.top_level_instructions {
        if let Some(lamports) = lamports_if_tip(ix, tip_accounts) {
            return lamports;
        }
    }
    for group in &tx.inner_instruction_groups {
        for ix in &group.instructions {
            if let Some(lamports) = lamports_if_tip(ix, tip_accounts) {
                return lamports;
            }
        }
    }
    0
}

/// Reserved; see spec §4.5.
pub const fn priority_fee() -> u64 {
    0
}
