//! A thin demonstration front-end for the `riscvemu` library: loads an
//! ELF image into a flat RAM-backed [`riscvemu::Bus`] and runs it to
//! completion or trap.
//!
//! This binary is deliberately minimal — it exists to exercise the
//! library end to end, not as a supported emulator CLI. Anything richer
//! (a TUI, an interactive debugger, a trace format) is host-side
//! tooling outside this crate's concern.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use elf::abi::SHF_ALLOC;
use elf::endian::AnyEndian;
use elf::ElfBytes;
use riscvemu::{Bus, BusFault, BusResult, Cpu, ExecResult};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(about = "Run an RV32IMF ELF image against the riscvemu core")]
struct Args {
    /// Path to a statically-linked ELF image to load and run.
    elf_path: PathBuf,

    /// Maximum number of instructions to retire before giving up.
    #[arg(long, default_value_t = 1_000_000)]
    max_steps: u64,

    /// Size in bytes of the flat RAM backing the demo bus.
    #[arg(long, default_value_t = 1 << 20)]
    ram_size: usize,
}

#[derive(Debug, Error)]
enum LoadError {
    #[error("could not read ELF file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse ELF file: {0}")]
    Parse(#[from] elf::ParseError),
    #[error("ELF file has no section headers")]
    NoSectionHeaders,
    #[error("section at 0x{addr:x} (len {len}) does not fit in {ram_size}-byte RAM")]
    SectionOutOfRange {
        addr: u64,
        len: usize,
        ram_size: usize,
    },
}

/// Flat RAM: every guest address maps directly to an index in a
/// `Vec<u8>`. Adequate for the small bare-metal images this core
/// targets; a larger system would reach for something closer to the
/// teacher's sparse `HashMap<u64, u8>`-backed memory instead.
struct FlatRam {
    bytes: Vec<u8>,
}

impl FlatRam {
    fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    fn slice(&self, addr: u32, len: usize) -> BusResult<&[u8]> {
        self.bytes
            .get(addr as usize..addr as usize + len)
            .ok_or(BusFault::LoadAccessFault)
    }

    fn slice_mut(&mut self, addr: u32, len: usize) -> BusResult<&mut [u8]> {
        self.bytes
            .get_mut(addr as usize..addr as usize + len)
            .ok_or(BusFault::StoreAccessFault)
    }
}

impl Bus for FlatRam {
    fn read8(&mut self, addr: u32) -> BusResult<u8> {
        Ok(self.slice(addr, 1)?[0])
    }

    fn read16(&mut self, addr: u32) -> BusResult<u16> {
        Ok(u16::from_le_bytes(self.slice(addr, 2)?.try_into().unwrap()))
    }

    fn read32(&mut self, addr: u32) -> BusResult<u32> {
        Ok(u32::from_le_bytes(self.slice(addr, 4)?.try_into().unwrap()))
    }

    fn write8(&mut self, addr: u32, value: u8) -> BusResult<()> {
        self.slice_mut(addr, 1)?[0] = value;
        Ok(())
    }

    fn write16(&mut self, addr: u32, value: u16) -> BusResult<()> {
        self.slice_mut(addr, 2)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn write32(&mut self, addr: u32, value: u32) -> BusResult<()> {
        self.slice_mut(addr, 4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}

/// Load every `SHF_ALLOC` section of `elf_path` into `ram` at its
/// recorded load address. Mirrors the teacher's `elf_utils::load_elf`,
/// adapted to write into a standalone `FlatRam` instead of a `Hart`.
fn load_elf(ram: &mut FlatRam, elf_path: &PathBuf) -> Result<u32, LoadError> {
    let file_data = std::fs::read(elf_path)?;
    let file = ElfBytes::<AnyEndian>::minimal_parse(&file_data)?;

    let section_headers = file.section_headers().ok_or(LoadError::NoSectionHeaders)?;

    for header in section_headers.iter() {
        if header.sh_flags & u64::from(SHF_ALLOC) == 0 {
            continue;
        }
        let (data, compressed) = file.section_data(&header)?;
        if compressed.is_some() {
            continue;
        }
        debug!(addr = header.sh_addr, len = data.len(), "loading section");
        let dest = ram.slice_mut(header.sh_addr as u32, data.len()).map_err(|_| {
            LoadError::SectionOutOfRange {
                addr: header.sh_addr,
                len: data.len(),
                ram_size: ram.bytes.len(),
            }
        })?;
        dest.copy_from_slice(data);
    }

    Ok(file.ehdr.e_entry as u32)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut ram = FlatRam::new(args.ram_size);
    let entry = match load_elf(&mut ram, &args.elf_path) {
        Ok(entry) => entry,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut cpu = Cpu::new();
    cpu.pc = entry;
    info!(entry, "starting execution");

    let (result, retired) = cpu.run(&mut ram, args.max_steps);
    info!(retired, "execution stopped");
    match result {
        ExecResult::Ok => {
            info!("instruction budget exhausted without a trap");
            ExitCode::SUCCESS
        }
        ExecResult::Trap(trap) => {
            info!(
                cause = ?trap.exception,
                mtval = format!("0x{:x}", trap.mtval),
                mepc = format!("0x{:x}", cpu.trap.mepc),
                "trapped"
            );
            ExitCode::SUCCESS
        }
    }
}
