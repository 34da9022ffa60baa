#![forbid(unsafe_code)]

//! An in-process simulator for the RV32IMF instruction set, machine mode
//! only: a pure decoder, an execution engine with exact per-instruction
//! semantics, and a decoded-instruction cache that amortises decode cost
//! across repeated fetches of the same code.
//!
//! Multi-hart systems, supervisor/user privilege modes, virtual memory,
//! interrupts, the atomics (`A`), compressed (`C`) and double-precision
//! float (`D`) extensions, and cycle-accurate timing are out of scope —
//! see the per-module documentation for what each piece actually
//! guarantees. Guest memory, ELF loading and host I/O live outside this
//! crate, behind the [`bus::Bus`] trait.

pub mod bus;
pub mod cache;
pub mod cpu;
pub mod csr;
pub mod decode;
pub mod decoded;
pub mod exec;
pub mod fields;
pub mod opcodes;
pub mod registers;
pub mod trap;

mod utils;

pub use bus::{Bus, BusFault, BusResult};
pub use cpu::Cpu;
pub use trap::{Exception, ExecResult, Trap};
