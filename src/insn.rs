//! Bytecode instructions, before and after linking.

use bitvec::slice::IterOnes;
use bitvec::vec::BitVec;
use std::fmt;

/// Instructions emitted by the compiler.
///
/// Fork and Jump are ephemeral: they only route control and never consume
/// input. The linker folds them away.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BasicInstruction {
    /// Consume one code point equal to the operand.
    CodePointMatch(char),

    /// Continue at both the next instruction and the relative target.
    /// The lower target has priority.
    Fork(isize),

    /// Continue at the relative target.
    Jump(isize),

    /// The match was successful.
    Success,
}

impl BasicInstruction {
    /// \return whether this instruction only routes control.
    #[inline]
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, BasicInstruction::Fork(_) | BasicInstruction::Jump(_))
    }

    /// \return the immediate successors of this instruction, located at
    /// `index`. For CodePointMatch this is the transition taken after
    /// consuming.
    pub fn successors(&self, index: usize) -> impl Iterator<Item = usize> {
        let (first, second) = match *self {
            BasicInstruction::CodePointMatch(_) => (Some(index + 1), None),
            BasicInstruction::Fork(delta) => {
                (Some(index + 1), Some(index.wrapping_add_signed(delta)))
            }
            BasicInstruction::Jump(delta) => (Some(index.wrapping_add_signed(delta)), None),
            BasicInstruction::Success => (None, None),
        };
        first.into_iter().chain(second)
    }
}

impl fmt::Display for BasicInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BasicInstruction::CodePointMatch(c) => write!(f, "CODEPOINT {:?}", c),
            BasicInstruction::Fork(delta) => write!(f, "FORK {:+}", delta),
            BasicInstruction::Jump(delta) => write!(f, "JUMP {:+}", delta),
            BasicInstruction::Success => f.write_str("SUCCESS"),
        }
    }
}

/// The compiler's output: a flat list of basic instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicProgram {
    pub insns: Vec<BasicInstruction>,
}

impl BasicProgram {
    #[inline]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }
}

impl fmt::Display for BasicProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, insn) in self.insns.iter().enumerate() {
            writeln!(f, "{:3}  {}", idx, insn)?;
        }
        Ok(())
    }
}

/// Instructions of a linked program.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Insn {
    /// Entry point; only ever at index 0. Its successors are the initial
    /// threads.
    Start,

    /// Consume one code point equal to the operand, then continue at the
    /// successors.
    CodePoint(char),

    /// The match was successful.
    Success,
}

/// A linked program. Contains no ephemeral instructions.
///
/// Successor sets live in a single bit arena with one row per instruction;
/// row `pc` holds the successors of instruction `pc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    insns: Vec<Insn>,
    successors: BitVec,
}

impl Program {
    /// Construct from instructions and a row-major successor arena of
    /// `insns.len()` rows, each `insns.len()` bits wide.
    pub(crate) fn new(insns: Vec<Insn>, successors: BitVec) -> Self {
        debug_assert_eq!(successors.len(), insns.len() * insns.len());
        Self { insns, successors }
    }

    #[inline]
    pub fn insns(&self) -> &[Insn] {
        &self.insns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    #[inline]
    pub fn get(&self, pc: usize) -> Option<&Insn> {
        self.insns.get(pc)
    }

    /// \return the successors of `pc`, ascending. Priority follows this
    /// order.
    #[inline]
    pub fn successors(&self, pc: usize) -> IterOnes<'_, usize, bitvec::order::Lsb0> {
        let width = self.insns.len();
        self.successors[pc * width..(pc + 1) * width].iter_ones()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (pc, insn) in self.insns.iter().enumerate() {
            write!(f, "{:3}  ", pc)?;
            match insn {
                Insn::Start => f.write_str("START")?,
                Insn::CodePoint(c) => write!(f, "CODEPOINT {:?}", c)?,
                Insn::Success => {
                    writeln!(f, "SUCCESS")?;
                    continue;
                }
            }
            f.write_str(" -> (")?;
            for (idx, succ) in self.successors(pc).enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", succ)?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}
