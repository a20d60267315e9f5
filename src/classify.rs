//! Transfer Classifier (spec §4.1).
//!
//! Recognizes a parsed instruction as one of three transfer shapes and
//! normalizes it to a `Transfer`. Anything else is `UnknownTransfer`.

use solana_sdk::pubkey::Pubkey;

use crate::errors::ClassifyError;
use crate::model::{Instruction, Transfer};
use crate::registry::WSOL_MINT;

fn parse_pubkey(value: &serde_json::Value, field: &str) -> Option<Pubkey> {
    value.get(field)?.as_str()?.parse().ok()
}

/// Classifies a `Parsed` instruction already known to be `transfer` or
/// `transferChecked` (see `Instruction::is_transfer_shape`).
pub fn classify_transfer(ix: &Instruction) -> Result<Transfer, ClassifyError> {
    let Instruction::Parsed {
        program,
        parsed_kind,
        parsed_info,
        ..
    } = ix
    else {
        return Err(ClassifyError::UnknownTransfer {
            program: "regular".to_string(),
            parsed_kind: "none".to_string(),
        });
    };

    let unknown = || ClassifyError::UnknownTransfer {
        program: program.to_string(),
        parsed_kind: parsed_kind.to_string(),
    };

    match (program.as_ref(), parsed_kind.as_ref()) {
        (_, "transferChecked") => {
            let mint = parse_pubkey(parsed_info, "mint").ok_or_else(unknown)?;
            let amount = parsed_info
                .get("tokenAmount")
                .and_then(|v| v.get("amount"))
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or_else(unknown)?;
            let source = parse_pubkey(parsed_info, "source").ok_or_else(unknown)?;
            let destination = parse_pubkey(parsed_info, "destination").ok_or_else(unknown)?;
            Ok(Transfer {
                mint: Some(mint),
                amount,
                source,
                destination,
            })
        }
        ("spl-token", "transfer") => {
            let amount = parsed_info
                .get("amount")
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse::<u64>().ok())
                .ok_or_else(unknown)?;
            let source = parse_pubkey(parsed_info, "source").ok_or_else(unknown)?;
            let destination = parse_pubkey(parsed_info, "destination").ok_or_else(unknown)?;
            Ok(Transfer {
                mint: None,
                amount,
                source,
                destination,
            })
        }
        ("system", "transfer") => {
            let amount = parsed_info
                .get("lamports")
                .and_then(|v| v.as_u64())
                .ok_or_else(unknown)?;
            let source = parse_pubkey(parsed_info, "source").ok_or_else(unknown)?;
            let destination = parse_pubkey(parsed_info, "destination").ok_or_else(unknown)?;
            Ok(Transfer {
                mint: Some(WSOL_MINT),
                amount,
                source,
                destination,
            })
        }
        _ => Err(unknown()),
    }
}
