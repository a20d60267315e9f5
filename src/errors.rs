use thiserror::Error;

/// Failures from the Transfer Classifier (spec §4.1, §7).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unrecognized transfer shape: program={program:?} kind={parsed_kind:?}")]
    UnknownTransfer {
        program: String,
        parsed_kind: String,
    },
}

/// Failures from the Direction Resolver (spec §4.4, §7). Every variant is
/// recovered locally by the caller: the sandwich is skipped and logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("dex not in exchange registry")]
    UnknownDex,
    #[error("exchange instruction has fewer accounts than the registry's pool index")]
    InvalidPoolIndex,
    #[error("pool address not in pool registry")]
    UnknownPool,
    #[error("no transfer in the entry swap touches either pool vault")]
    UnmatchableDirection,
}

/// Failures from the block-level driver (spec §4.6, §7).
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("sandwich has non-positive profit, not stored")]
    NegativeProfit,
}

/// I/O failures from the external interfaces (spec §6). These are the only
/// errors the core propagates; everything else is recovered per-sandwich.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("block fetch failed: {0}")]
    BlockFetch(String),
    #[error("store failed: {0}")]
    Store(String),
}
