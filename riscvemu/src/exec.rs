//! Per-instruction execution semantics.
//!
//! Each arm updates `cpu`'s registers and/or `cpu.pc` and returns
//! [`ExecResult::Ok`], or raises a [`Trap`] via [`Cpu::take_trap`]. `pc`
//! defaults to `pc + 4`; only control-flow instructions (branches,
//! jumps, `mret`) need to set it explicitly.

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::decoded::*;
use crate::trap::{Exception, ExecResult, Trap};

pub(crate) fn execute(cpu: &mut Cpu, bus: &mut dyn Bus, decoded: DecodedInstruction) -> ExecResult {
    let pc = cpu.pc;
    let mut next_pc = pc.wrapping_add(4);

    let result = match decoded {
        DecodedInstruction::Lui(o) => {
            cpu.xreg.write(o.rd, o.imm as u32);
            ExecResult::Ok
        }
        DecodedInstruction::Auipc(o) => {
            cpu.xreg.write(o.rd, pc.wrapping_add(o.imm as u32));
            ExecResult::Ok
        }
        DecodedInstruction::Jal(o) => {
            cpu.xreg.write(o.rd, pc.wrapping_add(4));
            next_pc = pc.wrapping_add(o.imm as u32);
            ExecResult::Ok
        }
        DecodedInstruction::Jalr(o) => {
            let base = cpu.xreg.read(o.rs1);
            cpu.xreg.write(o.rd, pc.wrapping_add(4));
            next_pc = base.wrapping_add(o.imm as u32) & !1u32;
            ExecResult::Ok
        }
        DecodedInstruction::Beq(o) => branch(cpu, o, &mut next_pc, |a, b| a == b),
        DecodedInstruction::Bne(o) => branch(cpu, o, &mut next_pc, |a, b| a != b),
        DecodedInstruction::Blt(o) => branch(cpu, o, &mut next_pc, |a, b| (a as i32) < (b as i32)),
        DecodedInstruction::Bge(o) => branch(cpu, o, &mut next_pc, |a, b| (a as i32) >= (b as i32)),
        DecodedInstruction::Bltu(o) => branch(cpu, o, &mut next_pc, |a, b| a < b),
        DecodedInstruction::Bgeu(o) => branch(cpu, o, &mut next_pc, |a, b| a >= b),

        DecodedInstruction::Lb(o) => load(cpu, bus, o, |bus, addr| {
            bus.read8(addr).map(|b| b as i8 as i32 as u32)
        }),
        DecodedInstruction::Lh(o) => load(cpu, bus, o, |bus, addr| {
            bus.read16(addr).map(|h| h as i16 as i32 as u32)
        }),
        DecodedInstruction::Lw(o) => load(cpu, bus, o, |bus, addr| bus.read32(addr)),
        DecodedInstruction::Lbu(o) => load(cpu, bus, o, |bus, addr| bus.read8(addr).map(|b| b as u32)),
        DecodedInstruction::Lhu(o) => load(cpu, bus, o, |bus, addr| bus.read16(addr).map(|h| h as u32)),

        DecodedInstruction::Sb(o) => store(cpu, bus, o, |bus, addr, v| bus.write8(addr, v as u8)),
        DecodedInstruction::Sh(o) => store(cpu, bus, o, |bus, addr, v| bus.write16(addr, v as u16)),
        DecodedInstruction::Sw(o) => store(cpu, bus, o, |bus, addr, v| bus.write32(addr, v)),

        DecodedInstruction::Addi(o) => {
            let v = cpu.xreg.read(o.rs1).wrapping_add(o.imm as u32);
            cpu.xreg.write(o.rd, v);
            ExecResult::Ok
        }
        DecodedInstruction::Slti(o) => {
            let v = (cpu.xreg.read(o.rs1) as i32) < o.imm;
            cpu.xreg.write(o.rd, v as u32);
            ExecResult::Ok
        }
        DecodedInstruction::Sltiu(o) => {
            // The immediate is sign-extended to 32 bits, then the
            // comparison itself is unsigned.
            let v = cpu.xreg.read(o.rs1) < (o.imm as u32);
            cpu.xreg.write(o.rd, v as u32);
            ExecResult::Ok
        }
        DecodedInstruction::Xori(o) => {
            cpu.xreg.write(o.rd, cpu.xreg.read(o.rs1) ^ (o.imm as u32));
            ExecResult::Ok
        }
        DecodedInstruction::Ori(o) => {
            cpu.xreg.write(o.rd, cpu.xreg.read(o.rs1) | (o.imm as u32));
            ExecResult::Ok
        }
        DecodedInstruction::Andi(o) => {
            cpu.xreg.write(o.rd, cpu.xreg.read(o.rs1) & (o.imm as u32));
            ExecResult::Ok
        }
        DecodedInstruction::Slli(o) => {
            let shamt = (o.imm as u32) & 0x1f;
            cpu.xreg.write(o.rd, cpu.xreg.read(o.rs1) << shamt);
            ExecResult::Ok
        }
        DecodedInstruction::Srli(o) => {
            let shamt = (o.imm as u32) & 0x1f;
            cpu.xreg.write(o.rd, cpu.xreg.read(o.rs1) >> shamt);
            ExecResult::Ok
        }
        DecodedInstruction::Srai(o) => {
            let shamt = (o.imm as u32) & 0x1f;
            let v = (cpu.xreg.read(o.rs1) as i32) >> shamt;
            cpu.xreg.write(o.rd, v as u32);
            ExecResult::Ok
        }

        DecodedInstruction::Add(o) => rtype(cpu, o, |a, b| a.wrapping_add(b)),
        DecodedInstruction::Sub(o) => rtype(cpu, o, |a, b| a.wrapping_sub(b)),
        DecodedInstruction::Sll(o) => rtype(cpu, o, |a, b| a << (b & 0x1f)),
        DecodedInstruction::Slt(o) => rtype(cpu, o, |a, b| ((a as i32) < (b as i32)) as u32),
        DecodedInstruction::Sltu(o) => rtype(cpu, o, |a, b| (a < b) as u32),
        DecodedInstruction::Xor(o) => rtype(cpu, o, |a, b| a ^ b),
        DecodedInstruction::Srl(o) => rtype(cpu, o, |a, b| a >> (b & 0x1f)),
        DecodedInstruction::Sra(o) => rtype(cpu, o, |a, b| ((a as i32) >> (b & 0x1f)) as u32),
        DecodedInstruction::Or(o) => rtype(cpu, o, |a, b| a | b),
        DecodedInstruction::And(o) => rtype(cpu, o, |a, b| a & b),

        DecodedInstruction::Fence | DecodedInstruction::FenceI => {
            return cpu.take_trap(Trap::new(Exception::NotImplementedYet, 0));
        }
        DecodedInstruction::Ecall => {
            return cpu.take_trap(Trap::new(Exception::EnvironmentCallFromMMode, 0));
        }
        DecodedInstruction::Ebreak => {
            return cpu.take_trap(Trap::new(Exception::Breakpoint, 0));
        }
        DecodedInstruction::Mret => {
            cpu.mret();
            return ExecResult::Ok;
        }
        DecodedInstruction::Uret | DecodedInstruction::Sret => {
            return cpu.take_trap(Trap::new(Exception::NotImplementedYet, 0));
        }

        DecodedInstruction::Mul(o) => rtype(cpu, o, |a, b| (a as i32).wrapping_mul(b as i32) as u32),
        DecodedInstruction::Mulh(o) => rtype(cpu, o, |a, b| {
            (((a as i32 as i64) * (b as i32 as i64)) >> 32) as u32
        }),
        DecodedInstruction::Mulhsu(o) => rtype(cpu, o, |a, b| {
            (((a as i32 as i64) * (b as i64)) >> 32) as u32
        }),
        DecodedInstruction::Mulhu(o) => rtype(cpu, o, |a, b| {
            (((a as u64) * (b as u64)) >> 32) as u32
        }),
        DecodedInstruction::Div(o) => rtype(cpu, o, |a, b| {
            let (a, b) = (a as i32, b as i32);
            if b == 0 {
                u32::MAX
            } else if a == i32::MIN && b == -1 {
                a as u32
            } else {
                (a / b) as u32
            }
        }),
        DecodedInstruction::Divu(o) => rtype(cpu, o, |a, b| if b == 0 { u32::MAX } else { a / b }),
        DecodedInstruction::Rem(o) => rtype(cpu, o, |a, b| {
            let (a, b) = (a as i32, b as i32);
            if b == 0 {
                a as u32
            } else if a == i32::MIN && b == -1 {
                0
            } else {
                (a % b) as u32
            }
        }),
        DecodedInstruction::Remu(o) => rtype(cpu, o, |a, b| if b == 0 { a } else { a % b }),

        DecodedInstruction::Flw(o) => {
            let addr = cpu.xreg.read(o.rs1).wrapping_add(o.imm as u32);
            match bus.read32(addr) {
                Ok(bits) => {
                    cpu.freg.write_bits(o.rd, bits);
                    ExecResult::Ok
                }
                Err(_) => return cpu.take_trap(Trap::new(Exception::LoadAccessFault, addr)),
            }
        }
        DecodedInstruction::Fsw(o) => {
            let addr = cpu.xreg.read(o.rs1).wrapping_add(o.imm as u32);
            let bits = cpu.freg.read_bits(o.rs2);
            match bus.write32(addr, bits) {
                Ok(()) => ExecResult::Ok,
                Err(_) => return cpu.take_trap(Trap::new(Exception::StoreAccessFault, addr)),
            }
        }
        DecodedInstruction::FmaddS(o) => fma(cpu, o, |a, b, c| a * b + c),
        DecodedInstruction::FmsubS(o) => fma(cpu, o, |a, b, c| a * b - c),
        DecodedInstruction::FnmsubS(o) => fma(cpu, o, |a, b, c| -(a * b) + c),
        DecodedInstruction::FnmaddS(o) => fma(cpu, o, |a, b, c| -(a * b) - c),
        DecodedInstruction::FaddS(o) => fop(cpu, o, |a, b| a + b),
        DecodedInstruction::FsubS(o) => fop(cpu, o, |a, b| a - b),
        DecodedInstruction::FmulS(o) => fop(cpu, o, |a, b| a * b),
        DecodedInstruction::FdivS(o) => fop(cpu, o, |a, b| a / b),
        DecodedInstruction::FsqrtS(o) => {
            let v = cpu.freg.read(o.rs1).sqrt();
            cpu.freg.write(o.rd, v);
            ExecResult::Ok
        }
        DecodedInstruction::FsgnjS(o) => fsgnj(cpu, o, |_rs1_neg, rs2_neg| rs2_neg),
        DecodedInstruction::FsgnjnS(o) => fsgnj(cpu, o, |_rs1_neg, rs2_neg| !rs2_neg),
        DecodedInstruction::FsgnjxS(o) => fsgnj(cpu, o, |rs1_neg, rs2_neg| rs1_neg ^ rs2_neg),
        DecodedInstruction::FminS(o) => fop(cpu, o, f32::min),
        DecodedInstruction::FmaxS(o) => fop(cpu, o, f32::max),
        DecodedInstruction::FcvtWS(o) => {
            let v = cpu.freg.read(o.rs1) as i32;
            cpu.xreg.write(o.rd, v as u32);
            ExecResult::Ok
        }
        DecodedInstruction::FcvtWuS(o) => {
            let v = cpu.freg.read(o.rs1) as u32;
            cpu.xreg.write(o.rd, v);
            ExecResult::Ok
        }
        DecodedInstruction::FmvXW(o) => {
            cpu.xreg.write(o.rd, cpu.freg.read_bits(o.rs1));
            ExecResult::Ok
        }
        DecodedInstruction::FclassS(o) => {
            cpu.xreg.write(o.rd, fclass(cpu.freg.read_bits(o.rs1)));
            ExecResult::Ok
        }
        DecodedInstruction::FeqS(o) => {
            let v = cpu.freg.read(o.rs1) == cpu.freg.read(o.rs2);
            cpu.xreg.write(o.rd, v as u32);
            ExecResult::Ok
        }
        DecodedInstruction::FltS(o) => {
            let v = cpu.freg.read(o.rs1) < cpu.freg.read(o.rs2);
            cpu.xreg.write(o.rd, v as u32);
            ExecResult::Ok
        }
        DecodedInstruction::FleS(o) => {
            let v = cpu.freg.read(o.rs1) <= cpu.freg.read(o.rs2);
            cpu.xreg.write(o.rd, v as u32);
            ExecResult::Ok
        }
        DecodedInstruction::FcvtSW(o) => {
            let v = cpu.xreg.read(o.rs1) as i32 as f32;
            cpu.freg.write(o.rd, v);
            ExecResult::Ok
        }
        DecodedInstruction::FcvtSWu(o) => {
            let v = cpu.xreg.read(o.rs1) as f32;
            cpu.freg.write(o.rd, v);
            ExecResult::Ok
        }
        DecodedInstruction::FmvWX(o) => {
            cpu.freg.write_bits(o.rd, cpu.xreg.read(o.rs1));
            ExecResult::Ok
        }

        DecodedInstruction::IllegalInstruction { ins } => {
            return cpu.take_trap(Trap::new(Exception::IllegalInstruction, ins));
        }
        // Resolved lazily by `Cpu::step`/`Cpu::execute` before this
        // function ever sees the instruction; reaching this arm would
        // mean a sentinel escaped the fetch path.
        DecodedInstruction::FetchDecodeReplace { .. } => {
            return cpu.take_trap(Trap::new(Exception::IllegalInstruction, 0));
        }
    };

    // Faults raised by the `load`/`store` helpers (bus errors on
    // Lb/Lh/.../Sw/Flw/Fsw) surface here rather than via an early
    // `return`, so `pc` must not be advanced when that happened: the
    // trap snapshot already recorded the correct `mepc`, but the
    // post-trap value of `pc` itself should stay put rather than skip
    // ahead to the instruction that never ran.
    if !result.is_trap() {
        cpu.pc = next_pc;
    }
    result
}

fn branch(cpu: &Cpu, o: Rs1Rs2Imm, next_pc: &mut u32, cond: impl Fn(u32, u32) -> bool) -> ExecResult {
    if cond(cpu.xreg.read(o.rs1), cpu.xreg.read(o.rs2)) {
        *next_pc = cpu.pc.wrapping_add(o.imm as u32);
    }
    ExecResult::Ok
}

fn load(
    cpu: &mut Cpu,
    bus: &mut dyn Bus,
    o: RdRs1Imm,
    read: impl Fn(&mut dyn Bus, u32) -> Result<u32, crate::bus::BusFault>,
) -> ExecResult {
    let addr = cpu.xreg.read(o.rs1).wrapping_add(o.imm as u32);
    match read(bus, addr) {
        Ok(v) => {
            cpu.xreg.write(o.rd, v);
            ExecResult::Ok
        }
        Err(_) => return_trap(cpu, Exception::LoadAccessFault, addr),
    }
}

fn store(
    cpu: &mut Cpu,
    bus: &mut dyn Bus,
    o: Rs1Rs2Imm,
    write: impl Fn(&mut dyn Bus, u32, u32) -> Result<(), crate::bus::BusFault>,
) -> ExecResult {
    let addr = cpu.xreg.read(o.rs1).wrapping_add(o.imm as u32);
    let value = cpu.xreg.read(o.rs2);
    match write(bus, addr, value) {
        Ok(()) => ExecResult::Ok,
        Err(_) => return_trap(cpu, Exception::StoreAccessFault, addr),
    }
}

fn return_trap(cpu: &mut Cpu, exception: Exception, mtval: u32) -> ExecResult {
    cpu.take_trap(Trap::new(exception, mtval))
}

fn rtype(cpu: &mut Cpu, o: RdRs1Rs2, op: impl Fn(u32, u32) -> u32) -> ExecResult {
    let v = op(cpu.xreg.read(o.rs1), cpu.xreg.read(o.rs2));
    cpu.xreg.write(o.rd, v);
    ExecResult::Ok
}

fn fop(cpu: &mut Cpu, o: RdRs1Rs2Rm, op: impl Fn(f32, f32) -> f32) -> ExecResult {
    let v = op(cpu.freg.read(o.rs1), cpu.freg.read(o.rs2));
    cpu.freg.write(o.rd, v);
    ExecResult::Ok
}

fn fma(cpu: &mut Cpu, o: RdRs1Rs2Rs3Rm, op: impl Fn(f32, f32, f32) -> f32) -> ExecResult {
    let v = op(cpu.freg.read(o.rs1), cpu.freg.read(o.rs2), cpu.freg.read(o.rs3));
    cpu.freg.write(o.rd, v);
    ExecResult::Ok
}

/// `fsgnj.s`/`fsgnjn.s`/`fsgnjx.s`: magnitude of `rs1`, sign decided by
/// `pick_negative(rs1_is_negative, rs2_is_negative)`. Implemented as
/// abs(rs1) with the chosen sign applied via multiplication, matching
/// the reference implementation's formulation rather than a bit-exact
/// reinterpretation (both are valid per the architecture for ordinary
/// operands; the two differ only in how they treat the sign bit of a
/// NaN payload, which this core does not promise to preserve).
fn fsgnj(cpu: &mut Cpu, o: RdRs1Rs2Rm, pick_negative: impl Fn(bool, bool) -> bool) -> ExecResult {
    let rs1 = cpu.freg.read(o.rs1);
    let rs2 = cpu.freg.read(o.rs2);
    let magnitude = rs1.abs();
    let v = if pick_negative(rs1.is_sign_negative(), rs2.is_sign_negative()) {
        -magnitude
    } else {
        magnitude
    };
    cpu.freg.write(o.rd, v);
    ExecResult::Ok
}

/// `fclass.s`: one-hot classification of `bits` into the ten classes
/// defined by the architecture.
fn fclass(bits: u32) -> u32 {
    let sign = (bits >> 31) & 1;
    let exponent = (bits >> 23) & 0xff;
    let mantissa = bits & 0x7f_ffff;

    if exponent == 0xff {
        if mantissa == 0 {
            if sign == 1 { 1 << 0 } else { 1 << 7 } // -inf / +inf
        } else {
            let quiet = (mantissa >> 22) & 1;
            if quiet == 1 { 1 << 9 } else { 1 << 8 } // quiet / signalling NaN
        }
    } else if exponent == 0 {
        if mantissa == 0 {
            if sign == 1 { 1 << 3 } else { 1 << 4 } // -0.0 / +0.0
        } else if sign == 1 {
            1 << 2 // negative subnormal
        } else {
            1 << 5 // positive subnormal
        }
    } else if sign == 1 {
        1 << 1 // negative normal
    } else {
        1 << 6 // positive normal
    }
}
