//! wordvm engine: a table-driven fetch-decode-execute machine.
//!
//! An [`Architecture`] supplies capacities, an instruction catalog and any
//! peripheral state. The engine owns everything else:
//! - [`Isa`] validates the catalog and dispatches words to [`Op`]s
//! - [`Vm`] runs the fetch, dispatch, advance, execute cycle
//! - [`Context`] is what an instruction's behavior sees while it runs
//! - [`Snapshot`] records and restores the whole machine as JSON
//!
//! # Usage
//!
//! ```
//! use wordvm_common::math::Width;
//! use wordvm_common::{OperandSpec, Operands};
//! use wordvm_vm::{Architecture, Context, Core, Op, RuntimeError, Vm};
//!
//! #[derive(Clone)]
//! struct Counter {
//!     core: Core,
//! }
//!
//! fn inc(ctx: &mut Context<'_, Counter>, [x, ..]: Operands) -> Result<(), RuntimeError> {
//!     let value = ctx.register(x)?;
//!     ctx.set_register(x, value + 1)
//! }
//!
//! impl Architecture for Counter {
//!     const ID: &'static str = "counter";
//!     const MEMORY_SIZE: usize = 16;
//!     const REGISTER_COUNT: usize = 1;
//!     const REGISTER_WIDTH: Width = Width::U8;
//!     const STACK_DEPTH: usize = 0;
//!     const ENTRY_POINT: u16 = 0;
//!     const LOAD_OFFSET: u16 = 0;
//!
//!     fn catalog() -> Vec<Op<Self>> {
//!         vec![Op::new("INC", 0x1000, vec![OperandSpec::register(0x000f)], inc)]
//!     }
//!     fn core(&self) -> &Core {
//!         &self.core
//!     }
//!     fn core_mut(&mut self) -> &mut Core {
//!         &mut self.core
//!     }
//! }
//!
//! let mut vm = Vm::new(Counter { core: Core::new::<Counter>() }).unwrap();
//! vm.load_bytes(vec![0x10, 0x00, 0x10, 0x00]).unwrap();
//! vm.step().unwrap();
//! vm.step().unwrap();
//! assert_eq!(vm.core().registers.get(0), Some(2));
//! ```

pub mod arch;
pub mod context;
pub mod error;
pub mod isa;
pub mod machine;
pub mod op;
pub mod program;
pub mod registers;
pub mod snapshot;
pub mod stack;

#[cfg(test)]
mod testing;

pub use arch::{Architecture, Core};
pub use context::Context;
pub use error::{IsaError, LoaderError, RuntimeError, SnapshotError, StackError};
pub use isa::Isa;
pub use machine::{Disassembly, RunOutcome, Vm, VmState};
pub use op::{Behavior, Op};
pub use program::{BytesLoader, Program, ProgramLoader, ProgramSource};
pub use registers::Registers;
pub use snapshot::{Snapshot, SnapshotState, SNAPSHOT_VERSION};
pub use stack::CallStack;
