//! Epsilon elimination: folds Fork and Jump away, producing a Program whose
//! instructions all either consume input or succeed.

use crate::insn::{BasicInstruction, BasicProgram, Insn, Program};
use bitvec::vec::BitVec;
use log::trace;

/// Union row `src` into row `dst`. The rows must differ.
fn union_row(rows: &mut [BitVec], dst: usize, src: usize) {
    debug_assert_ne!(dst, src);
    let (dst_row, src_row) = if dst < src {
        let (lo, hi) = rows.split_at_mut(src);
        (&mut lo[dst], &hi[0])
    } else {
        let (lo, hi) = rows.split_at_mut(dst);
        (&mut hi[0], &lo[src])
    };
    for idx in src_row.iter_ones() {
        dst_row.set(idx, true);
    }
}

/// Per-instruction successor sets, split by what the successor is.
struct Closure {
    matchers: Vec<BitVec>,
    ephemerals: Vec<BitVec>,
}

impl Closure {
    /// Classify every immediate successor as matcher or ephemeral.
    fn new(basic: &BasicProgram) -> Self {
        let n = basic.len();
        let mut matchers = vec![BitVec::repeat(false, n); n];
        let mut ephemerals = vec![BitVec::repeat(false, n); n];
        for (idx, insn) in basic.insns.iter().enumerate() {
            for succ in insn.successors(idx) {
                match basic.insns.get(succ) {
                    Some(target) if target.is_ephemeral() => ephemerals[idx].set(succ, true),
                    Some(_) => matchers[idx].set(succ, true),
                    None => debug_assert!(false, "successor {} out of range", succ),
                }
            }
        }
        Self {
            matchers,
            ephemerals,
        }
    }

    /// Fold ephemeral successors until none remain. Each `j` is folded into
    /// a given `i` at most once, so ephemeral cycles terminate.
    fn resolve(&mut self) {
        let n = self.matchers.len();
        let mut folded: Vec<BitVec> = vec![BitVec::repeat(false, n); n];
        let mut round = 0;
        while self.ephemerals.iter().any(|row| row.any()) {
            let mut folds = 0;
            for i in 0..n {
                while let Some(j) = self.ephemerals[i].first_one() {
                    self.ephemerals[i].set(j, false);
                    if j == i || folded[i][j] {
                        continue;
                    }
                    folded[i].set(j, true);
                    union_row(&mut self.matchers, i, j);
                    union_row(&mut self.ephemerals, i, j);
                    folds += 1;
                }
            }
            trace!("link round {}: {} folds", round, folds);
            round += 1;
        }
    }
}

/// Link a basic program.
///
/// Matcher instructions are kept, each carrying the set of matchers reachable
/// from it through ephemeral instructions. If instruction 0 is ephemeral a
/// Start instruction takes its place. Survivors are renumbered densely and
/// keep their relative order, so successor priority is preserved.
pub fn link(basic: &BasicProgram) -> Program {
    let mut closure = Closure::new(basic);
    closure.resolve();

    let synthesize_start = basic.insns.first().map_or(false, |insn| insn.is_ephemeral());
    let mut order = Vec::with_capacity(basic.len());
    if synthesize_start {
        order.push(0);
    }
    order.extend(
        basic
            .insns
            .iter()
            .enumerate()
            .filter(|(_, insn)| !insn.is_ephemeral())
            .map(|(idx, _)| idx),
    );

    let mut remap = vec![usize::MAX; basic.len()];
    for (new_idx, &old_idx) in order.iter().enumerate() {
        remap[old_idx] = new_idx;
    }

    let width = order.len();
    let mut successors = BitVec::repeat(false, width * width);
    let mut insns = Vec::with_capacity(width);
    for (new_idx, &old_idx) in order.iter().enumerate() {
        insns.push(match basic.insns[old_idx] {
            BasicInstruction::CodePointMatch(c) => Insn::CodePoint(c),
            BasicInstruction::Success => Insn::Success,
            BasicInstruction::Fork(_) | BasicInstruction::Jump(_) => Insn::Start,
        });
        for succ in closure.matchers[old_idx].iter_ones() {
            successors.set(new_idx * width + remap[succ], true);
        }
    }
    trace!(
        "linked {} basic instructions into {}",
        basic.len(),
        insns.len()
    );
    Program::new(insns, successors)
}
