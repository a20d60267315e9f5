//! Swap Extractor (spec §4.2).
//!
//! For each inner-instruction group, walks `[synthetic top-level @ depth 0,
//! inner[0], inner[1], ...]` with two cursors and a non-transfer stack,
//! emitting `PotentialSwap` bundles of 2-4 transfers under their dynamic
//! parent instruction.

use crate::classify::classify_transfer;
use crate::model::{Instruction, PotentialSwap, Transaction};

struct StackItem<'tx> {
    ix: &'tx Instruction,
    stack_height: u32,
}

/// Builds the synthetic instruction list `L` for one inner-instruction
/// group: the top-level instruction (forced to depth 0) followed by its
/// inner instructions at their recorded depths.
fn build_list<'tx>(tx: &'tx Transaction, group_index: usize, instructions: &'tx [Instruction]) -> Vec<StackItem<'tx>> {
    let mut list = Vec::with_capacity(instructions.len() + 1);
    list.push(StackItem {
        ix: &tx.top_level_instructions[group_index],
        stack_height: 0,
    });
    for ix in instructions {
        list.push(StackItem {
            ix,
            stack_height: ix.stack_height(),
        });
    }
    list
}

fn is_transfer(item: &StackItem) -> bool {
    item.ix.is_transfer_shape()
}

/// Pops `stack` until its top has a strictly smaller stack height than
/// `height`, restoring the stack to `height`'s dynamic caller.
fn unwind_to<'a, 'tx>(stack: &mut Vec<&'a StackItem<'tx>>, height: u32) {
    while let Some(top) = stack.last() {
        if height > top.stack_height {
            break;
        }
        stack.pop();
    }
}

fn walk_group<'tx>(list: &[StackItem<'tx>]) -> Result<Vec<PotentialSwap<'tx>>, crate::errors::ClassifyError> {
    let mut swaps = Vec::new();
    let n = list.len();
    let mut left = 0usize;

    while left < n {
        while left < n && is_transfer(&list[left]) {
            left += 1;
        }
        if left >= n {
            break;
        }

        let mut right = left + 1;
        let mut stack = vec![&list[left]];

        while right < n {
            unwind_to(&mut stack, list[right].stack_height);
            let non_transfer = *stack.last().expect("stack seeded with the group's anchor");

            let mut transfer_items = Vec::new();
            while right < n && is_transfer(&list[right]) {
                transfer_items.push(&list[right]);
                right += 1;
            }

            if (2..=4).contains(&transfer_items.len()) {
                let transfers = transfer_items
                    .iter()
                    .map(|item| classify_transfer(item.ix))
                    .collect::<Result<Vec<_>, _>>()?;
                swaps.push(PotentialSwap {
                    exchange_instruction: non_transfer.ix,
                    transfer_instructions: transfer_items.iter().map(|item| item.ix).collect(),
                    transfers,
                    top_level_ix: list[0].ix,
                });
            }

            while right < n && !is_transfer(&list[right]) {
                unwind_to(&mut stack, list[right].stack_height);
                stack.push(&list[right]);
                right += 1;
            }
        }
        left = right;
    }

    Ok(swaps)
}

/// Extracts all `PotentialSwap`s from one transaction. A classification
/// failure aborts extraction for the whole transaction (spec §4.2): the
/// caller sees no swaps, not a partial list.
pub fn extract_swaps<'tx>(tx: &'tx Transaction) -> Vec<PotentialSwap<'tx>> {
    let mut swaps = Vec::new();
    for group in &tx.inner_instruction_groups {
        if group.index >= tx.top_level_instructions.len() {
            continue;
        }
        let list = build_list(tx, group.index, &group.instructions);
        match walk_group(&list) {
            Ok(mut group_swaps) => swaps.append(&mut group_swaps),
            Err(err) => {
                tracing::warn!(
                    signature = %tx.signature(),
                    error = %err,
                    "transfer classification failed, aborting extraction for transaction"
                );
                return Vec::new();
            }
        }
    }
    swaps
}
