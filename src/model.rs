use std::sync::Arc;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// One instruction from a transaction's top-level or inner-instruction tree.
///
/// `stack_height` is the call-stack depth at which the VM invoked the
/// instruction; the synthetic top-level instruction is always depth 0.
#[derive(Debug, Clone)]
pub enum Instruction {
    Regular {
        program_id: Pubkey,
        accounts: Vec<Pubkey>,
        data: Vec<u8>,
        stack_height: u32,
    },
    Parsed {
        program: Arc<str>,
        program_id: Pubkey,
        parsed_kind: Arc<str>,
        parsed_info: serde_json::Value,
        stack_height: u32,
    },
}

impl Instruction {
    pub fn program_id(&self) -> Pubkey {
        match self {
            Instruction::Regular { program_id, .. } => *program_id,
            Instruction::Parsed { program_id, .. } => *program_id,
        }
    }

    pub fn stack_height(&self) -> u32 {
        match self {
            Instruction::Regular { stack_height, .. } => *stack_height,
            Instruction::Parsed { stack_height, .. } => *stack_height,
        }
    }

    /// True for the two parsed transfer shapes the classifier recognizes
    /// (`transfer`, `transferChecked`). Used by the extractor to find
    /// transfer bursts without fully classifying them.
    pub fn is_transfer_shape(&self) -> bool {
        match self {
            Instruction::Parsed { parsed_kind, .. } => {
                parsed_kind.as_ref() == "transfer" || parsed_kind.as_ref() == "transferChecked"
            }
            Instruction::Regular { .. } => false,
        }
    }

    pub fn accounts(&self) -> &[Pubkey] {
        match self {
            Instruction::Regular { accounts, .. } => accounts,
            Instruction::Parsed { .. } => &[],
        }
    }
}

/// Normalized transfer, produced by the Transfer Classifier from one of the
/// three parsed shapes (`transferChecked`, spl-token `transfer`, system
/// `transfer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub mint: Option<Pubkey>,
    pub amount: u64,
    pub source: Pubkey,
    pub destination: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountKey {
    pub pubkey: Pubkey,
    pub signer: bool,
    pub writable: bool,
}

#[derive(Debug, Clone)]
pub struct InnerInstructionGroup {
    /// Index into the parent transaction's `top_level_instructions`.
    pub index: usize,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub signatures: Vec<Arc<str>>,
    pub account_keys: Vec<AccountKey>,
    pub top_level_instructions: Vec<Instruction>,
    pub inner_instruction_groups: Vec<InnerInstructionGroup>,
    pub err: Option<Arc<str>>,
}

impl Transaction {
    pub fn signature(&self) -> &Arc<str> {
        &self.signatures[0]
    }

    /// The first account key flagged as a signer.
    pub fn signer(&self) -> Pubkey {
        self.account_keys
            .iter()
            .find(|a| a.signer)
            .map(|a| a.pubkey)
            .expect("a transaction always has at least one signer")
    }

    pub fn is_successful(&self) -> bool {
        self.err.is_none()
    }
}

/// A candidate swap: a non-transfer "exchange instruction" together with
/// the 2-4 transfers dynamically nested under it. Borrows from the parent
/// transaction for the duration of one block scan.
#[derive(Debug, Clone)]
pub struct PotentialSwap<'tx> {
    pub exchange_instruction: &'tx Instruction,
    pub transfer_instructions: Vec<&'tx Instruction>,
    /// The classified form of `transfer_instructions`, same order.
    pub transfers: Vec<Transfer>,
    pub top_level_ix: &'tx Instruction,
}

/// One swap in the context of its transaction, plus how many swaps that
/// transaction produced in total.
#[derive(Debug, Clone)]
pub struct SwapInTx<'tx> {
    pub tx: &'tx Transaction,
    pub swap: PotentialSwap<'tx>,
    pub swap_count_in_tx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolInfo {
    pub pool_id: Pubkey,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub token_a_vault: Pubkey,
    pub token_b_vault: Pubkey,
}

/// A confirmed entry/victims/exit triple, still borrowing from the block.
#[derive(Debug, Clone)]
pub struct PotentialSandwich<'tx> {
    pub entry: SwapInTx<'tx>,
    pub targets: Vec<SwapInTx<'tx>>,
    pub exit: SwapInTx<'tx>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackerTx {
    pub signature: String,
    pub profit_token_amount: u64,
    pub targeted_token_amount: u64,
    pub jito_tip: u64,
    /// Reserved; always 0 in this revision. See spec §4.5.
    pub priority_fee: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetTx {
    pub signature: String,
    pub signer: String,
    pub profit_token_amount: u64,
    pub targeted_token_amount: u64,
}

/// Canonical, owned output record for one confirmed sandwich.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandwich {
    /// Equal to `entry_tx.signature`; the sink's uniqueness key.
    pub id: Arc<str>,
    pub block: u64,
    pub block_time: i64,
    pub dex: String,
    pub pool: String,
    pub bot: String,
    pub attacker: String,
    pub profit_token: String,
    pub targeted_token: String,
    pub entry_tx: AttackerTx,
    pub target_txs: Vec<TargetTx>,
    pub exit_tx: AttackerTx,
    /// `exit_tx.profit_token_amount - entry_tx.profit_token_amount`.
    pub attacker_profit_native: u64,
}

/// One block's worth of transactions, as handed to the core by the block
/// source.
#[derive(Debug, Clone)]
pub struct Block {
    pub slot: u64,
    pub block_time: i64,
    pub transactions: Vec<Transaction>,
}

/// What a `SandwichSink` observed when storing a `Sandwich`: whether the
/// record was new or the sink already had one under the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Stored,
    AlreadyPresent,
}
