//! The Chip-8 CPU instruction catalog.
//!
//! Operand fields follow the usual Chip-8 notation:
//! ```text
//! nnn  12-bit address      x  register in bits 8..12
//! kk   8-bit constant      y  register in bits 4..8
//! ```
//! A call pushes the address of the call instruction itself; a return
//! resumes at the instruction after it.

use wordvm_common::math::{self, Width};
use wordvm_common::{OperandSpec, Operands};
use wordvm_vm::{Context, Op, RuntimeError};

use crate::{Chip8, FLAG, INDEX_MASK};

type Ctx<'a> = Context<'a, Chip8>;
type Result = std::result::Result<(), RuntimeError>;

const NNN: OperandSpec = OperandSpec::address(0x0fff);
const X: OperandSpec = OperandSpec::register(0x0f00);
const Y: OperandSpec = OperandSpec::register(0x00f0);
const KK: OperandSpec = OperandSpec::constant(0x00ff);

/// Every supported instruction, in opcode order.
pub fn catalog() -> Vec<Op<Chip8>> {
    vec![
        Op::new("SYS", 0x0000, vec![], sys),
        Op::new("RET", 0x00ee, vec![], ret),
        Op::new("JP", 0x1000, vec![NNN], jp),
        Op::new("CALL", 0x2000, vec![NNN], call),
        Op::new("SE", 0x3000, vec![X, KK], se_const),
        Op::new("SNE", 0x4000, vec![X, KK], sne_const),
        Op::new("SE", 0x5000, vec![X, Y], se_reg),
        Op::new("LD", 0x6000, vec![X, KK], ld_const),
        Op::new("ADD", 0x7000, vec![X, KK], add_const),
        Op::new("LD", 0x8000, vec![X, Y], ld_reg),
        Op::new("OR", 0x8001, vec![X, Y], or),
        Op::new("AND", 0x8002, vec![X, Y], and),
        Op::new("XOR", 0x8003, vec![X, Y], xor),
        Op::new("ADD", 0x8004, vec![X, Y], add_reg),
        Op::new("SUB", 0x8005, vec![X, Y], sub),
        Op::new("SHR", 0x8006, vec![X, Y], shr),
        Op::new("SUBN", 0x8007, vec![X, Y], subn),
        Op::new("SHL", 0x800e, vec![X, Y], shl),
        Op::new("SNE", 0x9000, vec![X, Y], sne_reg),
        Op::new("LDI", 0xa000, vec![NNN], ld_index),
        Op::new("JPV0", 0xb000, vec![NNN], jp_offset),
        Op::new("RND", 0xc000, vec![X, KK], rnd),
        Op::new("GETDT", 0xf007, vec![X], get_delay),
        Op::new("SETDT", 0xf015, vec![X], set_delay),
        Op::new("SETST", 0xf018, vec![X], set_sound),
        Op::new("ADDI", 0xf01e, vec![X], add_index),
        Op::new("BCD", 0xf033, vec![X], bcd),
        Op::new("STOR", 0xf055, vec![X], store),
        Op::new("LOAD", 0xf065, vec![X], load),
    ]
}

// --- Flow ---

/// 0000: no-op.
fn sys(_: &mut Ctx<'_>, _: Operands) -> Result {
    Ok(())
}

fn ret(ctx: &mut Ctx<'_>, _: Operands) -> Result {
    let call_site = ctx.pop_return()?;
    ctx.jump(call_site);
    ctx.hop_forwards(1);
    Ok(())
}

fn jp(ctx: &mut Ctx<'_>, [nnn, ..]: Operands) -> Result {
    ctx.jump(nnn);
    Ok(())
}

fn call(ctx: &mut Ctx<'_>, [nnn, ..]: Operands) -> Result {
    let call_site = ctx.at();
    ctx.push_return(call_site)?;
    ctx.jump(nnn);
    Ok(())
}

/// Bnnn: jump to nnn + V0.
fn jp_offset(ctx: &mut Ctx<'_>, [nnn, ..]: Operands) -> Result {
    let v0 = ctx.register(0)?;
    ctx.jump(math::cast(i64::from(nnn) + i64::from(v0), Width::U16));
    Ok(())
}

// --- Skips ---

fn skip_if(ctx: &mut Ctx<'_>, condition: bool) -> Result {
    if condition {
        ctx.hop_forwards(1);
    }
    Ok(())
}

fn se_const(ctx: &mut Ctx<'_>, [x, kk, _]: Operands) -> Result {
    let vx = ctx.register(x)?;
    skip_if(ctx, vx == kk)
}

fn sne_const(ctx: &mut Ctx<'_>, [x, kk, _]: Operands) -> Result {
    let vx = ctx.register(x)?;
    skip_if(ctx, vx != kk)
}

fn se_reg(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    skip_if(ctx, vx == vy)
}

fn sne_reg(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    skip_if(ctx, vx != vy)
}

// --- Registers ---

fn ld_const(ctx: &mut Ctx<'_>, [x, kk, _]: Operands) -> Result {
    ctx.set_register(x, kk)
}

/// 7xkk: wrapping add, VF untouched.
fn add_const(ctx: &mut Ctx<'_>, [x, kk, _]: Operands) -> Result {
    let vx = ctx.register(x)?;
    ctx.set_register(x, vx + kk)
}

fn ld_reg(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    ctx.check_registers(&[x])?;
    let vy = ctx.register(y)?;
    ctx.set_register(x, vy)
}

fn or(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    ctx.set_register(x, vx | vy)
}

fn and(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    ctx.set_register(x, vx & vy)
}

fn xor(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    ctx.set_register(x, vx ^ vy)
}

/// Write `value` to Vx, then `flag` to VF. VF wins when x is F.
fn set_with_flag(ctx: &mut Ctx<'_>, x: u16, value: u16, flag: u16) -> Result {
    ctx.set_register(x, value)?;
    ctx.set_register(FLAG, flag)
}

/// 8xy4: VF = carry.
fn add_reg(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    let (sum, carry) = math::add(i64::from(vx), i64::from(vy), Width::U8);
    set_with_flag(ctx, x, sum, carry.as_bit())
}

/// 8xy5: Vx = Vx - Vy, VF = NOT borrow.
fn sub(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    let (diff, borrow) = math::sub(i64::from(vx), i64::from(vy), Width::U8);
    set_with_flag(ctx, x, diff, u16::from(!borrow.is_overflow()))
}

/// 8xy7: Vx = Vy - Vx, VF = NOT borrow.
fn subn(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    let (vx, vy) = (ctx.register(x)?, ctx.register(y)?);
    let (diff, borrow) = math::sub(i64::from(vy), i64::from(vx), Width::U8);
    set_with_flag(ctx, x, diff, u16::from(!borrow.is_overflow()))
}

/// 8xy6: shifts Vx; y is ignored. VF = bit shifted out.
fn shr(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    ctx.check_registers(&[y])?;
    let vx = ctx.register(x)?;
    set_with_flag(ctx, x, vx >> 1, vx & 0x1)
}

/// 8xyE: shifts Vx; y is ignored. VF = bit shifted out.
fn shl(ctx: &mut Ctx<'_>, [x, y, _]: Operands) -> Result {
    ctx.check_registers(&[y])?;
    let vx = ctx.register(x)?;
    set_with_flag(ctx, x, vx << 1, (vx >> 7) & 0x1)
}

/// Cxkk: Vx = random & kk.
fn rnd(ctx: &mut Ctx<'_>, [x, kk, _]: Operands) -> Result {
    ctx.check_registers(&[x])?;
    let random = ctx.next_random();
    ctx.set_register(x, u16::from(random) & kk)
}

// --- Index and timers ---

fn ld_index(ctx: &mut Ctx<'_>, [nnn, ..]: Operands) -> Result {
    ctx.index = nnn;
    Ok(())
}

/// Fx1E: I += Vx, wrapping within 12 bits. VF untouched.
fn add_index(ctx: &mut Ctx<'_>, [x, ..]: Operands) -> Result {
    let vx = ctx.register(x)?;
    ctx.index = ctx.index.wrapping_add(vx) & INDEX_MASK;
    Ok(())
}

fn get_delay(ctx: &mut Ctx<'_>, [x, ..]: Operands) -> Result {
    let delay = ctx.delay_timer;
    ctx.set_register(x, u16::from(delay))
}

fn set_delay(ctx: &mut Ctx<'_>, [x, ..]: Operands) -> Result {
    ctx.delay_timer = ctx.register(x)? as u8;
    Ok(())
}

fn set_sound(ctx: &mut Ctx<'_>, [x, ..]: Operands) -> Result {
    ctx.sound_timer = ctx.register(x)? as u8;
    Ok(())
}

// --- Memory ---

/// Fx33: hundreds, tens and ones of Vx at I, I+1, I+2.
fn bcd(ctx: &mut Ctx<'_>, [x, ..]: Operands) -> Result {
    let vx = ctx.register(x)? as u8;
    let base = usize::from(ctx.index);
    ctx.check_memory(base, 3)?;
    for (offset, digit) in [vx / 100, vx / 10 % 10, vx % 10].into_iter().enumerate() {
        ctx.write(base + offset, digit)?;
    }
    Ok(())
}

/// Fx55: V0..=Vx to memory at I. I is left unchanged.
fn store(ctx: &mut Ctx<'_>, [x, ..]: Operands) -> Result {
    ctx.check_registers(&[x])?;
    let base = usize::from(ctx.index);
    ctx.check_memory(base, usize::from(x) + 1)?;
    for r in 0..=x {
        let value = ctx.register(r)? as u8;
        ctx.write(base + usize::from(r), value)?;
    }
    Ok(())
}

/// Fx65: memory at I into V0..=Vx. I is left unchanged.
fn load(ctx: &mut Ctx<'_>, [x, ..]: Operands) -> Result {
    ctx.check_registers(&[x])?;
    let base = usize::from(ctx.index);
    ctx.check_memory(base, usize::from(x) + 1)?;
    for r in 0..=x {
        let value = ctx.read(base + usize::from(r))?;
        ctx.set_register(r, u16::from(value))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordvm_vm::Isa;

    #[test]
    fn catalog_is_unambiguous() {
        let isa = Isa::new(catalog()).unwrap();
        assert_eq!(isa.len(), 29);
    }

    #[test]
    fn display_and_keypad_words_are_unknown() {
        let isa = Isa::new(catalog()).unwrap();
        for word in [0x00e0, 0xd125, 0xe19e, 0xe1a1, 0xf10a, 0xf129, 0x0123] {
            assert!(isa.dispatch(word).is_err(), "{word:#06x}");
        }
    }

    #[test]
    fn disassembly() {
        let isa = Isa::new(catalog()).unwrap();
        assert_eq!(isa.disassemble(0x0000), "SYS");
        assert_eq!(isa.disassemble(0x2204), "CALL 0x204");
        assert_eq!(isa.disassemble(0x5010), "SE V0, V1");
        assert_eq!(isa.disassemble(0x8abe), "SHL VA, VB");
        assert_eq!(isa.disassemble(0xc3f0), "RND V3, 0xf0");
        assert_eq!(isa.disassemble(0xf533), "BCD V5");
        assert_eq!(isa.disassemble(0x5011), "DW 0x5011");
    }
}
