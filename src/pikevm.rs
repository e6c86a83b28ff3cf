//! PikeVM execution engine.
//!
//! Simulates every live NFA thread in lockstep, one code point per tick.
//! Threads are kept in priority order; a PC may appear at most once per tick,
//! and the first thread to claim it wins.

use crate::api::{Match, Stats};
use crate::error::Result;
use crate::insn::{Insn, Program};
use crate::stream::CodePointStream;
use bitvec::vec::BitVec;
use log::{debug, trace};
use std::mem;

#[derive(Debug, Clone)]
struct Thread {
    /// Offset in the program.
    pc: usize,

    /// Text consumed by this thread so far.
    text: String,
}

/// Threads of one tick, in priority order, with at most one thread per PC.
#[derive(Debug)]
struct ThreadList {
    threads: Vec<Thread>,
    present: BitVec,
}

impl ThreadList {
    fn new(program_len: usize) -> Self {
        Self {
            threads: Vec::with_capacity(program_len),
            present: BitVec::repeat(false, program_len),
        }
    }

    /// Add a thread at `pc` unless one is already present.
    /// `text` is only computed if the thread is added.
    /// \return whether the thread was added.
    #[inline]
    fn insert_with(&mut self, pc: usize, text: impl FnOnce() -> String) -> bool {
        if self.present.replace(pc, true) {
            return false;
        }
        self.threads.push(Thread { pc, text: text() });
        true
    }

    #[inline]
    fn len(&self) -> usize {
        self.threads.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    fn clear(&mut self) {
        for thread in &self.threads {
            self.present.set(thread.pc, false);
        }
        self.threads.clear();
    }

    #[cfg(test)]
    fn pcs(&self) -> Vec<usize> {
        self.threads.iter().map(|t| t.pc).collect()
    }
}

#[derive(Debug)]
pub struct VirtualMachine<'r> {
    program: &'r Program,
    trace_ticks: bool,
}

impl<'r> VirtualMachine<'r> {
    pub fn new(program: &'r Program) -> Self {
        Self {
            program,
            trace_ticks: false,
        }
    }

    /// Log the thread count of every tick.
    pub fn trace_ticks(mut self, trace_ticks: bool) -> Self {
        self.trace_ticks = trace_ticks;
        self
    }

    /// Populate the initial thread list.
    fn prime(&self, threads: &mut ThreadList) {
        match self.program.get(0) {
            Some(Insn::Start) => {
                for pc in self.program.successors(0) {
                    threads.insert_with(pc, String::new);
                }
            }
            Some(_) => {
                threads.insert_with(0, String::new);
            }
            None => {}
        }
    }

    /// Advance every thread of `current` over `cp` into `next`.
    /// \return the text of a succeeding thread. Threads after it have lower
    /// priority and are dropped.
    fn step(
        &self,
        current: &ThreadList,
        next: &mut ThreadList,
        cp: Option<char>,
    ) -> Option<String> {
        let program = self.program;
        for thread in &current.threads {
            match program.insns()[thread.pc] {
                Insn::CodePoint(c) if Some(c) == cp => {
                    for succ in program.successors(thread.pc) {
                        next.insert_with(succ, || {
                            let mut text = String::with_capacity(thread.text.len() + 4);
                            text.push_str(&thread.text);
                            text.push(c);
                            text
                        });
                    }
                }
                Insn::CodePoint(_) | Insn::Start => {}
                Insn::Success => return Some(thread.text.clone()),
            }
        }
        None
    }

    /// Run the program anchored at the start of `input`.
    ///
    /// \return the match of the highest-priority thread to succeed. If no
    /// thread succeeds, the returned Match carries `input` unread.
    pub fn run<'a>(&self, input: CodePointStream<'a>) -> Result<Match<'a>> {
        let program = self.program;
        let mut current = ThreadList::new(program.len());
        let mut next = ThreadList::new(program.len());
        self.prime(&mut current);

        // The priming tick counts.
        let mut stats = Stats {
            ticks: 1,
            peak_threads: current.len(),
        };
        let mut found: Option<(String, CodePointStream<'a>)> = None;
        let mut stream = input.clone();
        while !current.is_empty() {
            stats.ticks += 1;
            stats.peak_threads = stats.peak_threads.max(current.len());
            if self.trace_ticks {
                trace!(
                    "tick {}: {} threads at code unit {}",
                    stats.ticks,
                    current.len(),
                    stream.code_unit_offset()
                );
            }

            let cp = stream.peek()?;
            if let Some(text) = self.step(&current, &mut next, cp) {
                found = Some((text, stream.clone()));
            }

            if next.is_empty() {
                break;
            }
            stream = stream.tail()?;
            mem::swap(&mut current, &mut next);
            next.clear();
        }

        debug!(
            "match {}: {} ticks, peak {} threads",
            if found.is_some() { "found" } else { "failed" },
            stats.ticks,
            stats.peak_threads
        );
        Ok(match found {
            Some((text, unread)) => Match::found(text, unread, stats),
            None => Match::not_found(input, stats),
        })
    }
}
