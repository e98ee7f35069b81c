// SPDX-License-Identifier: Apache-2.0

//! Stateful coordinator that owns the truth table and the lazily computed,
//! cached artifacts derived from it.
//!
//! Each artifact (expression, k-map layout, netlist, HDL) has its own state
//! machine: Absent -> Computing -> Ready | Failed. The Absent -> Computing
//! transition is an exclusive claim taken under the lock, so concurrent
//! requests compute each artifact at most once per table version; losers
//! wait on the condvar and observe the winner's outcome. A table edit bumps
//! the version and resets every slot to Absent; a computation that finishes
//! against a stale version is discarded rather than cached.

use std::sync::{Condvar, Mutex};

use crate::emit_hdl::{emit_hdl, HdlOutput};
use crate::expr::MinimizedExpression;
use crate::kmap::{layout_kmap, KMapLayout, LayoutError};
use crate::minimize::decode;
use crate::netlist::Netlist;
use crate::synth::{synthesize, SynthesisError};
use crate::truth_table::{InvalidInput, TruthTable};

/// Unified error for pipeline requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    InvalidInput(InvalidInput),
    Layout(LayoutError),
    Synthesis(SynthesisError),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidInput(e) => write!(f, "invalid input: {}", e),
            DecodeError::Layout(e) => write!(f, "layout failed: {}", e),
            DecodeError::Synthesis(e) => write!(f, "synthesis failed: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<InvalidInput> for DecodeError {
    fn from(e: InvalidInput) -> Self {
        DecodeError::InvalidInput(e)
    }
}

impl From<LayoutError> for DecodeError {
    fn from(e: LayoutError) -> Self {
        DecodeError::Layout(e)
    }
}

impl From<SynthesisError> for DecodeError {
    fn from(e: SynthesisError) -> Self {
        DecodeError::Synthesis(e)
    }
}

/// Externally observable state of one artifact slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    Absent,
    Computing,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
enum ArtifactState<T> {
    Absent,
    Computing,
    Ready(T),
    Failed(DecodeError),
}

impl<T> ArtifactState<T> {
    fn status(&self) -> ArtifactStatus {
        match self {
            ArtifactState::Absent => ArtifactStatus::Absent,
            ArtifactState::Computing => ArtifactStatus::Computing,
            ArtifactState::Ready(_) => ArtifactStatus::Ready,
            ArtifactState::Failed(_) => ArtifactStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub expression: ArtifactStatus,
    pub kmap: ArtifactStatus,
    pub netlist: ArtifactStatus,
    pub hdl: ArtifactStatus,
}

struct Slots {
    expression: ArtifactState<MinimizedExpression>,
    kmap: ArtifactState<KMapLayout>,
    netlist: ArtifactState<Netlist>,
    hdl: ArtifactState<HdlOutput>,
}

impl Slots {
    fn absent() -> Self {
        Self {
            expression: ArtifactState::Absent,
            kmap: ArtifactState::Absent,
            netlist: ArtifactState::Absent,
            hdl: ArtifactState::Absent,
        }
    }
}

struct Inner {
    table: TruthTable,
    version: u64,
    slots: Slots,
}

pub struct Pipeline {
    inner: Mutex<Inner>,
    cv: Condvar,
}

// Next action decided under the lock for one request loop iteration.
enum Step<T> {
    Done(Result<T, DecodeError>),
    Wait,
    Claim,
}

impl Pipeline {
    pub fn new(num_vars: usize) -> Result<Self, InvalidInput> {
        Ok(Self {
            inner: Mutex::new(Inner {
                table: TruthTable::new(num_vars)?,
                version: 0,
                slots: Slots::absent(),
            }),
            cv: Condvar::new(),
        })
    }

    /// Snapshot of the current table.
    pub fn table(&self) -> TruthTable {
        self.inner.lock().unwrap().table.clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.lock().unwrap().version
    }

    pub fn status(&self) -> StatusSnapshot {
        let inner = self.inner.lock().unwrap();
        StatusSnapshot {
            expression: inner.slots.expression.status(),
            kmap: inner.slots.kmap.status(),
            netlist: inner.slots.netlist.status(),
            hdl: inner.slots.hdl.status(),
        }
    }

    /// Flips one output bit; invalidates every derived artifact.
    pub fn toggle_output(&self, index: usize) -> Result<bool, InvalidInput> {
        let mut inner = self.inner.lock().unwrap();
        let flipped = inner.table.toggle_output(index)?;
        Self::invalidate(&mut inner);
        self.cv.notify_all();
        Ok(flipped)
    }

    /// Replaces the table with an all-zero table over `num_vars`;
    /// invalidates every derived artifact.
    pub fn set_variable_count(&self, num_vars: usize) -> Result<(), InvalidInput> {
        let table = TruthTable::new(num_vars)?;
        let mut inner = self.inner.lock().unwrap();
        inner.table = table;
        Self::invalidate(&mut inner);
        self.cv.notify_all();
        Ok(())
    }

    fn invalidate(inner: &mut Inner) {
        inner.version += 1;
        inner.slots = Slots::absent();
        log::debug!("pipeline: invalidated, now at version {}", inner.version);
    }

    /// The minimized expression for the current table.
    pub fn expression(&self) -> Result<MinimizedExpression, DecodeError> {
        let mut guard = self.inner.lock().unwrap();
        loop {
            let step = match &guard.slots.expression {
                ArtifactState::Ready(expr) => Step::Done(Ok(expr.clone())),
                ArtifactState::Failed(e) => Step::Done(Err(e.clone())),
                ArtifactState::Computing => Step::Wait,
                ArtifactState::Absent => Step::Claim,
            };
            match step {
                Step::Done(result) => return result,
                Step::Wait => guard = self.cv.wait(guard).unwrap(),
                Step::Claim => {
                    guard.slots.expression = ArtifactState::Computing;
                    let version = guard.version;
                    let table = guard.table.clone();
                    drop(guard);
                    let result = decode(&table).map_err(DecodeError::from);
                    guard = self.inner.lock().unwrap();
                    if guard.version == version {
                        guard.slots.expression = match &result {
                            Ok(expr) => ArtifactState::Ready(expr.clone()),
                            Err(e) => ArtifactState::Failed(e.clone()),
                        };
                        self.cv.notify_all();
                        return result;
                    }
                    log::debug!("pipeline: discarding stale expression result");
                }
            }
        }
    }

    /// Generic request path for the artifacts derived from the expression.
    fn request<T: Clone>(
        &self,
        select: fn(&mut Slots) -> &mut ArtifactState<T>,
        compute: impl Fn(&MinimizedExpression) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let mut guard = self.inner.lock().unwrap();
        loop {
            let step = match select(&mut guard.slots) {
                ArtifactState::Ready(value) => Step::Done(Ok(value.clone())),
                ArtifactState::Failed(e) => Step::Done(Err(e.clone())),
                ArtifactState::Computing => Step::Wait,
                ArtifactState::Absent => Step::Claim,
            };
            match step {
                Step::Done(result) => return result,
                Step::Wait => guard = self.cv.wait(guard).unwrap(),
                Step::Claim => {
                    // The expression for this same version must be ready
                    // before the claim is taken.
                    let expr = match &guard.slots.expression {
                        ArtifactState::Ready(expr) => expr.clone(),
                        _ => {
                            drop(guard);
                            self.expression()?;
                            guard = self.inner.lock().unwrap();
                            continue;
                        }
                    };
                    *select(&mut guard.slots) = ArtifactState::Computing;
                    let version = guard.version;
                    drop(guard);
                    let result = compute(&expr);
                    guard = self.inner.lock().unwrap();
                    if guard.version == version {
                        *select(&mut guard.slots) = match &result {
                            Ok(value) => ArtifactState::Ready(value.clone()),
                            Err(e) => ArtifactState::Failed(e.clone()),
                        };
                        self.cv.notify_all();
                        return result;
                    }
                    log::debug!("pipeline: discarding stale artifact result");
                }
            }
        }
    }

    /// The k-map grid and grouping data for the current table.
    pub fn kmap(&self) -> Result<KMapLayout, DecodeError> {
        self.request(
            |slots| &mut slots.kmap,
            |expr| layout_kmap(expr.num_vars, &expr.implicants).map_err(DecodeError::from),
        )
    }

    /// The gate-level netlist for the current table.
    pub fn netlist(&self) -> Result<Netlist, DecodeError> {
        self.request(
            |slots| &mut slots.netlist,
            |expr| synthesize(expr).map_err(DecodeError::from),
        )
    }

    /// The Verilog module and testbench for the current table.
    pub fn hdl(&self) -> Result<HdlOutput, DecodeError> {
        self.request(
            |slots| &mut slots.hdl,
            |expr| Ok(emit_hdl(expr, expr.num_vars)),
        )
    }

    /// Forces one slot into the Failed state. Test-only hook for
    /// exercising invalidation of failed artifacts.
    #[cfg(test)]
    fn fail_netlist_for_test(&self, error: DecodeError) {
        let mut inner = self.inner.lock().unwrap();
        inner.slots.netlist = ArtifactState::Failed(error);
    }
}
