//! The block-window scan: blocks → transactions → receipts → logs, with
//! decode → map → submit per log.
//!
//! One pass is a single run-to-completion sweep over the trailing window of
//! the scanned chain. Blocks are visited in ascending order, transactions in
//! block order, and logs in receipt order, so relayed calls preserve the
//! causal order of the on-chain events. Every log's outcome is independent:
//! a malformed log, an unreachable block, or a rejected submission is
//! reported and skipped, never scan-fatal. Only resolution-time
//! configuration failures (handled before a scanner exists) and an
//! unreachable chain tip abort a pass.
//!
//! Submissions stay strictly serialized: the scan never fans out, so the
//! warden address has at most one transaction in flight and each nonce read
//! reflects all prior submissions.

use std::time::Duration;

use alloy::primitives::B256;
use alloy::rpc::types::Log;
use tracing::{error, info, warn};

use crate::decoder;
use crate::endpoint::ChainRpc;
use crate::error::TransportError;
use crate::mapper;
use crate::registry::ContractBinding;
use crate::submitter::TransactionSubmitter;
use crate::types::DecodedEvent;

/// Inclusive block window `[latest - depth, latest]`, clamped at genesis.
pub fn compute_window(latest: u64, depth: u64) -> (u64, u64) {
    (latest.saturating_sub(depth), latest)
}

/// Next inclusive range for a watch pass: the trailing window on the first
/// pass, then the blocks after the cursor. `None` when the tip has not moved.
fn next_range(cursor: Option<u64>, latest: u64, depth: u64) -> Option<(u64, u64)> {
    match cursor {
        None => Some(compute_window(latest, depth)),
        Some(last) if latest > last => Some((last + 1, latest)),
        Some(_) => None,
    }
}

/// Cursor after a watch pass: the last block of the contiguously scanned
/// prefix, so a faulted block is retried next pass instead of skipped for
/// the life of the process.
fn advance_cursor(cursor: Option<u64>, summary: &ScanSummary) -> Option<u64> {
    match summary.first_failed_block {
        None => Some(summary.to_block),
        Some(block) => block.checked_sub(1).or(cursor),
    }
}

/// Per-pass outcome counts, reported for manual reconciliation since the
/// relayer offers no exactly-once guarantee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub from_block: u64,
    pub to_block: u64,
    pub blocks_scanned: u64,
    pub blocks_failed: u64,
    pub receipts_failed: u64,
    pub logs_seen: u64,
    pub relayed: u64,
    pub submission_failures: u64,
    pub decode_failures: u64,
    pub unrecognized: u64,
    /// Lowest block whose fetch failed, if any.
    pub first_failed_block: Option<u64>,
}

impl ScanSummary {
    fn new(from_block: u64, to_block: u64) -> Self {
        ScanSummary {
            from_block,
            to_block,
            ..Default::default()
        }
    }
}

/// Scans one chain's recent blocks and relays decoded bridge events to the
/// counterpart chain.
pub struct BlockScanner<'a> {
    /// Binding for the scanned chain's contract; its ABI drives decoding.
    binding: &'a ContractBinding,
    /// Binding for the counterpart chain's contract.
    counterpart: &'a ContractBinding,
    /// Endpoint of the scanned chain.
    home: &'a dyn ChainRpc,
    /// Endpoint of the counterpart chain.
    remote: &'a dyn ChainRpc,
    submitter: &'a TransactionSubmitter,
    window_depth: u64,
}

impl<'a> BlockScanner<'a> {
    pub fn new(
        binding: &'a ContractBinding,
        counterpart: &'a ContractBinding,
        home: &'a dyn ChainRpc,
        remote: &'a dyn ChainRpc,
        submitter: &'a TransactionSubmitter,
        window_depth: u64,
    ) -> Self {
        Self {
            binding,
            counterpart,
            home,
            remote,
            submitter,
            window_depth,
        }
    }

    /// One pass over the trailing window of the scanned chain.
    ///
    /// Fails only when the chain tip cannot be read; everything after the
    /// window is computed degrades per block, transaction, or log.
    pub async fn scan(&self) -> Result<ScanSummary, TransportError> {
        let latest = self.home.latest_block_number().await?;
        let (from, to) = compute_window(latest, self.window_depth);
        Ok(self.scan_range(from, to).await)
    }

    /// Scan an explicit inclusive block range, ascending. A faulted block is
    /// skipped and the rest of the range still scanned.
    pub async fn scan_range(&self, from: u64, to: u64) -> ScanSummary {
        self.scan_blocks(from, to, false).await
    }

    /// Shared range loop. With `halt_on_block_fault` the pass stops at the
    /// first faulted block, so the cursor can resume there without
    /// re-relaying events from the blocks already processed after it.
    async fn scan_blocks(&self, from: u64, to: u64, halt_on_block_fault: bool) -> ScanSummary {
        let mut summary = ScanSummary::new(from, to);
        info!(
            role = %self.binding.role,
            from_block = from,
            to_block = to,
            "Scanning block window"
        );

        for number in from..=to {
            match self.home.block_transactions(number).await {
                Ok(transactions) => {
                    summary.blocks_scanned += 1;
                    for tx_hash in transactions {
                        self.process_transaction(number, tx_hash, &mut summary).await;
                    }
                }
                Err(e) => {
                    summary.blocks_failed += 1;
                    if summary.first_failed_block.is_none() {
                        summary.first_failed_block = Some(number);
                    }
                    warn!(
                        role = %self.binding.role,
                        block = number,
                        error = %e,
                        "Failed to fetch block, skipping"
                    );
                    if halt_on_block_fault {
                        break;
                    }
                }
            }
        }

        summary
    }

    async fn process_transaction(&self, block: u64, tx_hash: B256, summary: &mut ScanSummary) {
        let logs = match self.home.receipt_logs(tx_hash).await {
            Ok(logs) => logs,
            Err(e) => {
                summary.receipts_failed += 1;
                warn!(
                    role = %self.binding.role,
                    block,
                    tx_hash = %tx_hash,
                    error = %e,
                    "Failed to fetch receipt, skipping transaction"
                );
                return;
            }
        };

        for (log_index, log) in logs.iter().enumerate() {
            self.process_log(block, tx_hash, log_index, log, summary).await;
        }
    }

    async fn process_log(
        &self,
        block: u64,
        tx_hash: B256,
        log_index: usize,
        log: &Log,
        summary: &mut ScanSummary,
    ) {
        summary.logs_seen += 1;

        let event = match decoder::decode(log, self.binding) {
            Ok(event) => event,
            Err(e) => {
                summary.decode_failures += 1;
                warn!(
                    role = %self.binding.role,
                    block,
                    tx_hash = %tx_hash,
                    log_index,
                    error = %e,
                    "Failed to decode matching log"
                );
                return;
            }
        };

        let Some(descriptor) = mapper::map_event(&event) else {
            debug_assert!(matches!(event, DecodedEvent::Unrecognized));
            summary.unrecognized += 1;
            return;
        };

        // The descriptor names its target chain; submit there.
        let (endpoint, binding) = if descriptor.target == self.binding.role {
            (self.home, self.binding)
        } else {
            (self.remote, self.counterpart)
        };

        match self.submitter.submit(&descriptor, endpoint, binding).await {
            Ok(relay_tx) => {
                summary.relayed += 1;
                info!(
                    role = %self.binding.role,
                    event = event.kind(),
                    function = descriptor.function.name(),
                    target = %descriptor.target,
                    block,
                    log_index,
                    amount = %descriptor.amount,
                    relay_tx = %relay_tx,
                    "Relayed event"
                );
            }
            Err(e) => {
                summary.submission_failures += 1;
                error!(
                    role = %self.binding.role,
                    event = event.kind(),
                    function = descriptor.function.name(),
                    target = %descriptor.target,
                    block,
                    tx_hash = %tx_hash,
                    log_index,
                    error = %e,
                    "Failed to submit relay transaction"
                );
            }
        }
    }

    /// Watch mode: repeat scan passes until cancelled.
    ///
    /// The first pass covers the trailing window; later passes continue from
    /// the block after the last scanned one, so overlapping windows are not
    /// re-relayed within one process. A pass halts at the first faulted
    /// block and the cursor stops just before it, so the next pass retries
    /// that block instead of dropping its events. The cursor is owned by
    /// this task and has a single writer.
    pub async fn run(&self, poll_interval: Duration) {
        let mut cursor: Option<u64> = None;

        loop {
            match self.home.latest_block_number().await {
                Ok(latest) => {
                    if let Some((from, to)) = next_range(cursor, latest, self.window_depth) {
                        let summary = self.scan_blocks(from, to, true).await;
                        cursor = advance_cursor(cursor, &summary);
                        info!(
                            role = %self.binding.role,
                            from_block = summary.from_block,
                            to_block = summary.to_block,
                            relayed = summary.relayed,
                            failed = summary.submission_failures,
                            blocks_failed = summary.blocks_failed,
                            unrecognized = summary.unrecognized,
                            "Scan pass complete"
                        );
                    }
                }
                Err(e) => {
                    warn!(role = %self.binding.role, error = %e, "Failed to read chain tip, will retry");
                }
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}
