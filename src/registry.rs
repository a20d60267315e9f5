//! Exchange registry, pool registry contract, tip-recipient contract, and
//! the well-known DEX program ids used to seed the exchange registry.
//!
//! The program-id table mirrors `original_source/tx_types.py::Exchanges` /
//! `EXCHANGES_INFO`; the `Pubkey::from_str_const` table style mirrors the
//! teacher's `events::addresses` module.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::model::PoolInfo;

pub const WSOL_MINT: Pubkey = Pubkey::from_str_const("So11111111111111111111111111111111111111112");

pub const ORCA_WHIRLPOOL: Pubkey = Pubkey::from_str_const("whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc");
pub const RAYDIUM_CLMM: Pubkey = Pubkey::from_str_const("CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK");
pub const RAYDIUM_LPV4: Pubkey = Pubkey::from_str_const("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");
pub const METEORA_PP: Pubkey = Pubkey::from_str_const("Eo7WjKq67rjJQSZxS6z3YkapzY3eMj6Xy8X5EQVn5UaB");
pub const METEORA_DLMM: Pubkey = Pubkey::from_str_const("LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo");
pub const LIFINITY_V2: Pubkey = Pubkey::from_str_const("2wT8Yq49kHgDzXuPxZSaeLaH1qbmGXtEyPy64bL7aD3c");
pub const SOLFI: Pubkey = Pubkey::from_str_const("SoLFiHG9TfgtdUXUjWAxi3LtvYuFyDLVhBWxdMZxyCe");
pub const CROPPER: Pubkey = Pubkey::from_str_const("H8W3ctz92svYg6mkn1UtGfu2aQr2fnUFHM1RhScEtQDt");
pub const OBRIC: Pubkey = Pubkey::from_str_const("obriQD1zbpyLz95G5n7nJe6a4DPjpFwa5XYPoNm113y");
pub const ZEROFI: Pubkey = Pubkey::from_str_const("ZERor4xhbUycZ6gb9ntrhqscUcZmAbQDjEAtCf4hbZY");
pub const OPENBOOK_V2: Pubkey = Pubkey::from_str_const("opnb2LAfJYbRMAHHvqjCwQxanZn7ReEHp1k81EohpZb");
pub const PUMP_SWAP: Pubkey = Pubkey::from_str_const("pAMMBay6oceH9fJKBRHGP5D4bD4sWpmSwMn52FMfXEA");

/// Listed as bare addresses (no pool index) in the upstream `Exchanges`
/// table; not seeded into `with_known_dexes` — see its doc comment.
pub const RAYDIUM_CPMM: Pubkey = Pubkey::from_str_const("CPMMoo8L3F4NbTegBCKVNunggL7H1ZpdTHKxQB5qKP1C");
pub const STABBLE: Pubkey = Pubkey::from_str_const("swapNyd8XiQwJ6ianp9snpu4brUqFxadzvHebnAXjJZ");

/// `(program_id -> pool_account_index, swap_data_validator)`. The
/// validator exists so future DEXes with identifier-prefixed instruction
/// data can be added without a type change; every entry seeded here
/// validates unconditionally, matching the upstream table.
#[derive(Clone)]
pub struct ExchangeEntry {
    pub pool_account_index: usize,
    pub validator: fn(&[u8]) -> bool,
}

#[derive(Clone, Default)]
pub struct ExchangeRegistry {
    entries: HashMap<Pubkey, ExchangeEntry>,
}

fn always_valid(_data: &[u8]) -> bool {
    true
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, program_id: Pubkey, pool_account_index: usize) {
        self.entries.insert(
            program_id,
            ExchangeEntry {
                pool_account_index,
                validator: always_valid,
            },
        );
    }

    pub fn get(&self, program_id: &Pubkey) -> Option<&ExchangeEntry> {
        self.entries.get(program_id)
    }

    /// Seeds the registry with the DEXes known to the upstream detector.
    /// `RAYDIUM_CPMM` and `STABBLE` are deliberately absent: the upstream
    /// `EXCHANGES_INFO` table has no pool-index entry for either, and a
    /// guessed index would misidentify the pool account during resolution.
    pub fn with_known_dexes() -> Self {
        let mut registry = Self::new();
        registry.insert(ORCA_WHIRLPOOL, 2);
        registry.insert(RAYDIUM_CLMM, 2);
        registry.insert(RAYDIUM_LPV4, 1);
        registry.insert(METEORA_PP, 0);
        registry.insert(METEORA_DLMM, 0);
        registry.insert(LIFINITY_V2, 1);
        registry.insert(SOLFI, 1);
        registry.insert(CROPPER, 2);
        registry.insert(OBRIC, 0);
        registry.insert(ZEROFI, 0);
        registry.insert(OPENBOOK_V2, 2);
        registry.insert(PUMP_SWAP, 0);
        registry
    }
}

/// Read-only pool lookup (spec §6). Static for the duration of a scan.
pub trait PoolRegistry {
    fn get(&self, pool_id: &Pubkey) -> Option<&PoolInfo>;
}

/// A process-wide immutable map implements the contract directly.
impl PoolRegistry for HashMap<Pubkey, PoolInfo> {
    fn get(&self, pool_id: &Pubkey) -> Option<&PoolInfo> {
        HashMap::get(self, pool_id)
    }
}

/// Read-only tip-recipient membership test (spec §6).
pub trait TipAccountSet {
    fn contains(&self, account: &Pubkey) -> bool;
}

impl TipAccountSet for std::collections::HashSet<Pubkey> {
    fn contains(&self, account: &Pubkey) -> bool {
        std::collections::HashSet::contains(self, account)
    }
}
