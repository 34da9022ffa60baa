//! The CPU facade: owns all architectural state and drives execution.

use crate::bus::Bus;
use crate::cache::DecodedInstructionCache;
use crate::csr::TrapState;
use crate::decode;
use crate::exec;
use crate::registers::{FRegisters, XRegisters};
use crate::trap::{Exception, ExecResult, Trap};

/// A single RV32IMF hart, machine-mode only.
#[derive(Debug)]
pub struct Cpu {
    pub pc: u32,
    pub xreg: XRegisters,
    pub freg: FRegisters,
    pub trap: TrapState,
    cache: DecodedInstructionCache,
    /// Number of instructions successfully retired since the last reset.
    pub retired: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            pc: 0,
            xreg: XRegisters::default(),
            freg: FRegisters::default(),
            trap: TrapState::default(),
            cache: DecodedInstructionCache::new(),
            retired: 0,
        }
    }

    /// Reset architectural state to power-on values. Cache lines are
    /// invalidated but their owner tags are left alone, matching the
    /// reference implementation: the tag is meaningless while `valid`
    /// is false, so there is nothing to gain by clearing it.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.xreg = XRegisters::default();
        self.freg = FRegisters::default();
        self.trap = TrapState::default();
        self.cache.invalidate_all();
        self.retired = 0;
    }

    /// Snapshot a trap (mepc/mcause/mtval) before any state past the
    /// faulting instruction is committed. Every trap site in `exec`
    /// funnels through this so the snapshot is taken uniformly, rather
    /// than leaving any path (as the reference implementation's
    /// cache-miss fetch fault does) free to skip it.
    pub(crate) fn take_trap(&mut self, trap: Trap) -> ExecResult {
        self.trap.take(self.pc, trap.exception.mcause(), trap.mtval);
        ExecResult::Trap(trap)
    }

    /// Decode-and-execute a single instruction at the current `pc`,
    /// bypassing the cache entirely. Used for one-shot execution where
    /// reusing a cached decode isn't worth the bookkeeping (single-step
    /// debugging, the six end-to-end scenarios in the test suite).
    pub fn execute(&mut self, bus: &mut dyn Bus) -> ExecResult {
        let addr = self.pc;
        let raw = match bus.read32(addr) {
            Ok(word) => word,
            Err(_) => {
                return self.take_trap(Trap::new(Exception::InstructionAccessFault, addr));
            }
        };
        let decoded = decode::decode(raw);
        let result = exec::execute(self, bus, decoded);
        if !result.is_trap() {
            self.retired += 1;
        }
        result
    }

    /// Decode-and-execute a single instruction, going through the
    /// decoded-instruction cache. This is what `run` calls in a loop.
    pub fn step(&mut self, bus: &mut dyn Bus) -> ExecResult {
        let at = self.cache.locate(self.pc);
        let mut decoded = self.cache.get(at);
        if let crate::decoded::DecodedInstruction::FetchDecodeReplace { line, index } = decoded {
            let addr = self.cache.sentinel_address(line, index);
            let raw = match bus.read32(addr) {
                Ok(word) => word,
                Err(_) => {
                    return self.take_trap(Trap::new(Exception::InstructionAccessFault, addr));
                }
            };
            decoded = decode::decode(raw);
            self.cache.set(at, decoded);
        }
        let result = exec::execute(self, bus, decoded);
        if !result.is_trap() {
            self.retired += 1;
        }
        result
    }

    /// Run up to `count` instructions (through the cache), stopping
    /// early on the first trap. Returns the final result and the number
    /// of instructions actually retired during this call.
    pub fn run(&mut self, bus: &mut dyn Bus, count: u64) -> (ExecResult, u64) {
        let mut retired_here = 0;
        for _ in 0..count {
            let result = self.step(bus);
            if result.is_trap() {
                return (result, retired_here);
            }
            retired_here += 1;
        }
        (ExecResult::Ok, retired_here)
    }

    /// `mret`: return from a machine-mode trap handler. Per this core's
    /// chosen semantics, control resumes at `mepc + 4` (the instruction
    /// after the one that trapped), not at `mepc` itself. A handler that
    /// wants to re-execute the trapping instruction is responsible for
    /// decrementing `mepc` by 4 before invoking `mret`.
    pub fn mret(&mut self) {
        self.pc = self.trap.mepc.wrapping_add(4);
    }
}
