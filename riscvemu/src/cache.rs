//! The decoded-instruction cache.
//!
//! Decoding is pure but not free, and guest code is executed far more
//! often than it changes, so the engine caches decoded instructions
//! instead of re-decoding on every fetch. The cache is direct-mapped at
//! the granularity of whole 32-instruction (128-byte) lines: `CACHE_LINES`
//! lines of `CACHE_LINE_LENGTH` decoded-instruction slots each, covering
//! `CACHE_LINES * CACHE_LINE_LENGTH * 4` bytes of guest code (8 KiB) at a
//! time.
//!
//! A line is identified by its *owner*: the index of the first guest
//! word it holds, `(addr / 4) / CACHE_LINE_LENGTH`. When a fetch maps to
//! a line whose owner doesn't match (or that has never been filled), the
//! whole line is reseated: every slot is overwritten with a
//! [`DecodedInstruction::FetchDecodeReplace`] sentinel rather than
//! eagerly decoding all 32 instructions. Each sentinel decodes its own
//! slot lazily, the first time it is actually executed, and overwrites
//! itself with the real decoded form — so a reseat costs O(1) regardless
//! of `CACHE_LINE_LENGTH`, and only code that actually runs pays for
//! decoding.

use crate::decoded::DecodedInstruction;
use tracing::trace;

pub const CACHE_LINES: usize = 64;
pub const CACHE_LINE_LENGTH: usize = 32;

#[derive(Debug, Clone)]
struct CacheLine {
    owner: u32,
    valid: bool,
    instructions: [DecodedInstruction; CACHE_LINE_LENGTH],
}

impl Default for CacheLine {
    fn default() -> Self {
        Self {
            owner: 0,
            valid: false,
            instructions: [DecodedInstruction::FetchDecodeReplace { line: 0, index: 0 }; CACHE_LINE_LENGTH],
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodedInstructionCache {
    lines: Vec<CacheLine>,
}

impl Default for DecodedInstructionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a fetch landed: which cache line and which slot within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLocation {
    pub line: u16,
    pub index: u16,
}

impl DecodedInstructionCache {
    pub fn new() -> Self {
        Self {
            lines: (0..CACHE_LINES).map(|_| CacheLine::default()).collect(),
        }
    }

    /// Invalidate every line without clearing their owner tags. Mirrors
    /// the reference implementation's reset behaviour: owners are left
    /// as-is since `valid` alone gates whether they're trusted.
    pub fn invalidate_all(&mut self) {
        for line in &mut self.lines {
            line.valid = false;
        }
    }

    /// Locate the cache slot for a word-aligned guest address,
    /// reseating the owning line first if it doesn't currently hold this
    /// address's word.
    pub fn locate(&mut self, addr: u32) -> CacheLocation {
        let word_index = addr / 4;
        let owner = word_index / CACHE_LINE_LENGTH as u32;
        let line_slot = (owner as usize) % CACHE_LINES;
        let index_in_line = (word_index as usize) % CACHE_LINE_LENGTH;

        let line = &mut self.lines[line_slot];
        if !line.valid || line.owner != owner {
            trace!(line_slot, owner, "reseating decoded-instruction cache line");
            line.owner = owner;
            line.valid = true;
            for (index, slot) in line.instructions.iter_mut().enumerate() {
                *slot = DecodedInstruction::FetchDecodeReplace {
                    line: line_slot as u16,
                    index: index as u16,
                };
            }
        }

        CacheLocation {
            line: line_slot as u16,
            index: index_in_line as u16,
        }
    }

    pub fn get(&self, at: CacheLocation) -> DecodedInstruction {
        self.lines[at.line as usize].instructions[at.index as usize]
    }

    pub fn set(&mut self, at: CacheLocation, decoded: DecodedInstruction) {
        self.lines[at.line as usize].instructions[at.index as usize] = decoded;
    }

    /// The guest address a `FetchDecodeReplace { line, index }` sentinel
    /// should re-fetch: reconstructed from the *line's current owner*,
    /// not whatever owner was in effect when the sentinel was written.
    /// The two always agree in practice (a line cannot change owner
    /// without going back through `locate`, which would also overwrite
    /// this slot), but reading it live keeps the invariant explicit
    /// rather than assumed.
    pub fn sentinel_address(&self, line: u16, index: u16) -> u32 {
        let owner = self.lines[line as usize].owner;
        (owner * CACHE_LINE_LENGTH as u32 + index as u32) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_reseats_with_fetch_decode_replace_sentinels() {
        let mut cache = DecodedInstructionCache::new();
        let at = cache.locate(0);
        match cache.get(at) {
            DecodedInstruction::FetchDecodeReplace { line, index } => {
                assert_eq!(line, 0);
                assert_eq!(index, 0);
            }
            other => panic!("expected sentinel, got {other:?}"),
        }
    }

    #[test]
    fn filled_slot_survives_until_owner_changes() {
        let mut cache = DecodedInstructionCache::new();
        let at = cache.locate(4);
        let decoded = DecodedInstruction::Ecall;
        cache.set(at, decoded);
        let at_again = cache.locate(4);
        assert_eq!(at, at_again);
        assert_eq!(cache.get(at_again), decoded);
    }

    #[test]
    fn owner_change_reseats_the_line() {
        let mut cache = DecodedInstructionCache::new();
        let at = cache.locate(0);
        cache.set(at, DecodedInstruction::Ecall);

        // Jump far enough to land on the same line slot (mod
        // CACHE_LINES) but a different owner, forcing a reseat.
        let far_addr = (CACHE_LINES as u32) * (CACHE_LINE_LENGTH as u32) * 4;
        let at_far = cache.locate(far_addr);
        assert_eq!(at_far.line, at.line);
        match cache.get(at_far) {
            DecodedInstruction::FetchDecodeReplace { .. } => {}
            other => panic!("expected reseated sentinel, got {other:?}"),
        }
    }

    #[test]
    fn sentinel_address_reconstructs_owning_word() {
        let mut cache = DecodedInstructionCache::new();
        let addr = 200u32; // word 50, line owner 1 (50 / 32), index 18
        let at = cache.locate(addr);
        let reconstructed = cache.sentinel_address(at.line, at.index);
        assert_eq!(reconstructed, addr);
    }

    #[test]
    fn invalidate_all_forces_reseat_without_clearing_owner() {
        let mut cache = DecodedInstructionCache::new();
        let at = cache.locate(0);
        cache.set(at, DecodedInstruction::Ecall);
        cache.invalidate_all();
        let at_again = cache.locate(0);
        match cache.get(at_again) {
            DecodedInstruction::FetchDecodeReplace { .. } => {}
            other => panic!("expected reseat after invalidate_all, got {other:?}"),
        }
    }
}
