//! A small architecture for exercising the engine in unit tests.

use wordvm_common::math::{self, Width};
use wordvm_common::{OperandSpec, Operands};

use crate::arch::{Architecture, Core};
use crate::context::Context;
use crate::error::{RuntimeError, SnapshotError};
use crate::op::Op;
use crate::snapshot::SnapshotState;

/// Four 8-bit registers, a two-deep stack and a tick counter peripheral.
/// The last register doubles as the carry flag.
#[derive(Debug, Clone)]
pub struct Toy {
    core: Core,
    pub ticks: u32,
}

impl Toy {
    pub fn new() -> Self {
        Self {
            core: Core::new::<Self>(),
            ticks: 0,
        }
    }

    pub fn catalog_ops() -> Vec<Op<Self>> {
        let x = OperandSpec::register(0x0f00);
        let y = OperandSpec::register(0x00f0);
        vec![
            Op::new("NOP", 0x0000, vec![], |_, _| Ok(())),
            Op::new("RET", 0x00ee, vec![], ret),
            Op::new("JP", 0x1000, vec![OperandSpec::address(0x0fff)], jp),
            Op::new("CALL", 0x2000, vec![OperandSpec::address(0x0fff)], call),
            Op::new("SE", 0x3000, vec![x, OperandSpec::constant(0x00ff)], se),
            Op::new("LD", 0x6000, vec![x, OperandSpec::constant(0x00ff)], ld),
            Op::new("ADD", 0x8004, vec![x, y], add),
            Op::new("ST", 0xa000, vec![x, OperandSpec::address(0x00ff)], st),
            Op::new("TICK", 0xf000, vec![], tick),
        ]
    }
}

const FLAG: u16 = 3;

fn ret(ctx: &mut Context<'_, Toy>, _: Operands) -> Result<(), RuntimeError> {
    let address = ctx.pop_return()?;
    ctx.jump(address);
    Ok(())
}

fn jp(ctx: &mut Context<'_, Toy>, [nnn, ..]: Operands) -> Result<(), RuntimeError> {
    ctx.jump(nnn);
    Ok(())
}

fn call(ctx: &mut Context<'_, Toy>, [nnn, ..]: Operands) -> Result<(), RuntimeError> {
    let pc = ctx.pc();
    ctx.push_return(pc)?;
    ctx.jump(nnn);
    Ok(())
}

fn se(ctx: &mut Context<'_, Toy>, [x, kk, _]: Operands) -> Result<(), RuntimeError> {
    if ctx.register(x)? == kk {
        ctx.hop_forwards(1);
    }
    Ok(())
}

fn ld(ctx: &mut Context<'_, Toy>, [x, kk, _]: Operands) -> Result<(), RuntimeError> {
    ctx.set_register(x, kk)
}

fn add(ctx: &mut Context<'_, Toy>, [x, y, _]: Operands) -> Result<(), RuntimeError> {
    let a = ctx.register(x)?;
    let b = ctx.register(y)?;
    let (sum, flag) = math::add(i64::from(a), i64::from(b), Width::U8);
    ctx.set_register(x, sum)?;
    ctx.set_register(FLAG, flag.as_bit())
}

fn st(ctx: &mut Context<'_, Toy>, [x, nn, _]: Operands) -> Result<(), RuntimeError> {
    let value = ctx.register(x)?;
    ctx.write(usize::from(nn), value as u8)
}

fn tick(ctx: &mut Context<'_, Toy>, _: Operands) -> Result<(), RuntimeError> {
    ctx.ticks += 1;
    Ok(())
}

impl Architecture for Toy {
    const ID: &'static str = "toy";
    const MEMORY_SIZE: usize = 0x300;
    const REGISTER_COUNT: usize = 4;
    const REGISTER_WIDTH: Width = Width::U8;
    const STACK_DEPTH: usize = 2;
    const ENTRY_POINT: u16 = 0x200;
    const LOAD_OFFSET: u16 = 0x200;

    fn catalog() -> Vec<Op<Self>> {
        Self::catalog_ops()
    }

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn reset_peripherals(&mut self) {
        self.ticks = 0;
    }

    fn save_state(&self, state: &mut SnapshotState) -> Result<(), SnapshotError> {
        state.put("ticks", &self.ticks)
    }

    fn load_state(&mut self, state: &SnapshotState) -> Result<(), SnapshotError> {
        self.ticks = state.get("ticks")?;
        Ok(())
    }
}
