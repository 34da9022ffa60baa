//! The contract a host must implement to supply guest memory and
//! memory-mapped I/O.
//!
//! The core never owns memory itself; every load and store goes through
//! a `&mut dyn Bus` supplied by the caller. This mirrors the teacher's
//! split between a `Hart`/`Platform` and its `Memory`, except here the
//! memory lives entirely outside the crate: the core only needs the
//! narrow capability, not a concrete backing store.

/// Why a bus access failed. Deliberately smaller than a full `Trap`:
/// the caller (execution engine) decides which `Exception` variant and
/// `mtval` a given fault becomes, since the same [`BusFault`] means
/// different things on a load versus a store versus an instruction
/// fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusFault {
    LoadAccessFault,
    StoreAccessFault,
}

pub type BusResult<T> = Result<T, BusFault>;

/// Guest-addressable memory and MMIO, as seen by the execution engine.
///
/// All multi-byte accesses are little-endian, matching the architecture.
/// Implementations are free to back this with flat RAM, a sparse map,
/// mapped peripherals, or any combination; the core makes no assumption
/// beyond the little-endian byte order and the fault contract.
pub trait Bus {
    fn read8(&mut self, addr: u32) -> BusResult<u8>;
    fn read16(&mut self, addr: u32) -> BusResult<u16>;
    fn read32(&mut self, addr: u32) -> BusResult<u32>;

    fn write8(&mut self, addr: u32, value: u8) -> BusResult<()>;
    fn write16(&mut self, addr: u32, value: u16) -> BusResult<()>;
    fn write32(&mut self, addr: u32, value: u32) -> BusResult<()>;
}
