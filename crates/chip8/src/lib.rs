//! Chip-8 CPU for the wordvm engine.
//!
//! The machine has:
//! - 4096 bytes of memory; programs load at 0x200 and start there
//! - 16 8-bit data registers V0..VF, with VF doubling as the flag register
//! - a 12-bit index register `I`
//! - a 16-entry call stack
//! - delay and sound timers, counted down by the host at 60 Hz
//!
//! Display and keypad instructions are not part of this crate.
//!
//! # Usage
//!
//! ```
//! use wordvm_chip8::Chip8;
//! use wordvm_vm::Vm;
//!
//! let mut vm = Vm::new(Chip8::new()).unwrap();
//! vm.load_bytes(vec![0x6a, 0x2a, 0x7a, 0x01]).unwrap();
//! vm.step().unwrap();
//! vm.step().unwrap();
//! assert_eq!(vm.arch().v(0xa), 0x2b);
//! ```

pub mod ops;

use log::trace;
use wordvm_common::Width;
use wordvm_vm::{Architecture, Core, Op, SnapshotError, SnapshotState};

/// Index of the flag register VF.
pub const FLAG: u16 = 0xf;

/// Seed of the random generator after reset.
pub const DEFAULT_SEED: u8 = 0;

/// `I` holds a 12-bit address.
pub const INDEX_MASK: u16 = 0x0fff;

const KEY_INDEX: &str = "index";
const KEY_DELAY: &str = "delay_timer";
const KEY_SOUND: &str = "sound_timer";
const KEY_RNG: &str = "rng";

#[derive(Debug, Clone)]
pub struct Chip8 {
    core: Core,
    /// The `I` register.
    pub index: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    /// State of the 8-bit random generator.
    pub rng: u8,
    seed: u8,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// A machine whose random generator restarts from `seed` on reset.
    pub fn with_seed(seed: u8) -> Self {
        Self {
            core: Core::new::<Self>(),
            index: 0,
            delay_timer: 0,
            sound_timer: 0,
            rng: seed,
            seed,
        }
    }

    /// Value of register `Vx`; 0 for indices past VF.
    pub fn v(&self, x: u16) -> u16 {
        self.core.registers.get(usize::from(x)).unwrap_or(0)
    }

    /// The flag register VF.
    pub fn flag(&self) -> u16 {
        self.v(FLAG)
    }

    /// Count both timers down by one, stopping at zero.
    ///
    /// Hosts call this at 60 Hz, independently of the instruction rate.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Whether the buzzer should sound.
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// Advance the generator (`rng * 37 + 1`, mod 256) and return its state.
    ///
    /// The multiplier and increment give the full period of 256.
    pub fn next_random(&mut self) -> u8 {
        self.rng = self.rng.wrapping_mul(37).wrapping_add(1);
        self.rng
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Architecture for Chip8 {
    const ID: &'static str = "chip-8";
    const MEMORY_SIZE: usize = 4096;
    const REGISTER_COUNT: usize = 16;
    const REGISTER_WIDTH: Width = Width::U8;
    const STACK_DEPTH: usize = 16;
    const ENTRY_POINT: u16 = 0x200;
    const LOAD_OFFSET: u16 = 0x200;

    fn catalog() -> Vec<Op<Self>> {
        ops::catalog()
    }

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn reset_peripherals(&mut self) {
        self.index = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.rng = self.seed;
        trace!("chip-8 peripherals reset (seed {})", self.seed);
    }

    fn save_state(&self, state: &mut SnapshotState) -> Result<(), SnapshotError> {
        state.put(KEY_INDEX, &self.index)?;
        state.put(KEY_DELAY, &self.delay_timer)?;
        state.put(KEY_SOUND, &self.sound_timer)?;
        state.put(KEY_RNG, &self.rng)
    }

    fn load_state(&mut self, state: &SnapshotState) -> Result<(), SnapshotError> {
        let index: u16 = state.get(KEY_INDEX)?;
        if index > INDEX_MASK {
            return Err(SnapshotError::Malformed {
                key: KEY_INDEX.to_string(),
                reason: format!("{index:#06x} is wider than 12 bits"),
            });
        }
        self.index = index;
        self.delay_timer = state.get(KEY_DELAY)?;
        self.sound_timer = state.get(KEY_SOUND)?;
        self.rng = state.get(KEY_RNG)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_stop_at_zero() {
        let mut chip = Chip8::new();
        chip.delay_timer = 2;
        chip.sound_timer = 1;
        assert!(chip.sound_active());
        chip.tick_timers();
        assert_eq!((chip.delay_timer, chip.sound_timer), (1, 0));
        assert!(!chip.sound_active());
        chip.tick_timers();
        chip.tick_timers();
        assert_eq!((chip.delay_timer, chip.sound_timer), (0, 0));
    }

    #[test]
    fn generator_follows_lcg() {
        let mut chip = Chip8::with_seed(123);
        // 123 * 37 + 1 = 4552 = 0x11c8
        assert_eq!(chip.next_random(), 0xc8);
        let mut zero = Chip8::new();
        assert_eq!(zero.next_random(), 1);
        assert_eq!(zero.next_random(), 38);
    }

    #[test]
    fn generator_has_full_period() {
        let mut chip = Chip8::new();
        let mut seen = [false; 256];
        for _ in 0..256 {
            seen[usize::from(chip.next_random())] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn reset_restores_seed() {
        let mut chip = Chip8::with_seed(9);
        chip.next_random();
        chip.index = 0x300;
        chip.delay_timer = 4;
        chip.reset_peripherals();
        assert_eq!(chip.rng, 9);
        assert_eq!(chip.index, 0);
        assert_eq!(chip.delay_timer, 0);
    }

    #[test]
    fn flag_aliases_last_register() {
        let mut chip = Chip8::new();
        chip.core_mut().registers.set(0xf, 1);
        assert_eq!(chip.flag(), 1);
        assert_eq!(chip.v(0x10), 0);
    }
}
