//! Per-thread stack chunk ( "Stack chunk (`-local-[]`)").
//!
//! A reference array with a fixed header at low indices (`next`, `owner`, `lastFP`, `lastIP`,
//! `guard`), followed by activation frames growing upward. `guard` must stay zero; any non-zero
//! observation is a detected stack overflow.

use squawk_core::Oop;

/// Fixed header slot offsets, in declaration order.
pub mod header {
    pub const NEXT: usize = 0;
    pub const OWNER: usize = 1;
    pub const LAST_FP: usize = 2;
    pub const LAST_IP: usize = 3;
    pub const GUARD: usize = 4;
    pub const FRAME_BASE: usize = 5;
}

/// One value slot of the stack chunk's backing reference array: either a raw word or a
/// reference, exactly like `squawk_core::Slot`, plus a "none" marker for header fields that are
/// not yet set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkSlot {
    Word(i64),
    Oop(Option<Oop>),
}

impl ChunkSlot {
    fn as_word(self) -> i64 {
        match self {
            ChunkSlot::Word(v) => v,
            ChunkSlot::Oop(_) => 0,
        }
    }
}

/// One activation frame: `MP, returnFP, returnIP, parms…`.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Index, within the chunk, where this frame's header begins.
    pub base: usize,
    pub mp: Oop,
    pub return_fp: Option<usize>,
    pub return_ip: u32,
    pub locals: Vec<ChunkSlot>,
}

/// Raised when the chunk's `guard` sentinel is observed non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackOverflow;

/// A thread's stack chunk: the backing reference array plus a view of its activation frames.
pub struct StackChunk {
    array: Vec<ChunkSlot>,
    frames: Vec<Frame>,
    capacity: usize,
}

impl StackChunk {
    pub fn new(owner_thread_id: u32, capacity: usize) -> Self {
        let mut array = vec![ChunkSlot::Word(0); header::FRAME_BASE];
        array[header::OWNER] = ChunkSlot::Word(owner_thread_id as i64);
        array[header::GUARD] = ChunkSlot::Word(0);
        StackChunk {
            array,
            frames: Vec::new(),
            capacity,
        }
    }

    pub fn owner(&self) -> u32 {
        self.array[header::OWNER].as_word() as u32
    }

    /// Checks the `guard` invariant: any non-zero guard is a detected overflow.
    pub fn check_guard(&self) -> Result<(), StackOverflow> {
        if self.array[header::GUARD].as_word() != 0 {
            Err(StackOverflow)
        } else {
            Ok(())
        }
    }

    /// Pushes a new activation frame, growing the backing array upward. Sets the guard sentinel
    /// (instead of growing past capacity) when the chunk is full, so the next guard check
    /// raises [`StackOverflow`].
    pub fn push_frame(&mut self, mp: Oop, local_count: usize) -> Result<usize, StackOverflow> {
        let needed = 3 + local_count;
        if self.array.len() + needed > self.capacity {
            self.array[header::GUARD] = ChunkSlot::Word(1);
            return Err(StackOverflow);
        }
        let base = self.array.len();
        let return_fp = self.current_frame_index();
        let return_ip = self.array[header::LAST_IP].as_word() as u32;
        self.array.push(ChunkSlot::Oop(Some(mp)));
        self.array
            .push(ChunkSlot::Word(return_fp.map(|f| f as i64).unwrap_or(-1)));
        self.array.push(ChunkSlot::Word(return_ip as i64));
        for _ in 0..local_count {
            self.array.push(ChunkSlot::Word(0));
        }
        self.array[header::LAST_FP] = ChunkSlot::Word(base as i64);

        self.frames.push(Frame {
            base,
            mp,
            return_fp,
            return_ip,
            locals: vec![ChunkSlot::Word(0); local_count],
        });
        Ok(base)
    }

    /// Pops the most recent activation frame, truncating the backing array back to its start
    /// and restoring `lastFP`/`lastIP`.
    pub fn pop_frame(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.array.truncate(frame.base);
            self.array[header::LAST_FP] =
                ChunkSlot::Word(frame.return_fp.map(|f| f as i64).unwrap_or(-1));
            self.array[header::LAST_IP] = ChunkSlot::Word(frame.return_ip as i64);
        }
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Every live activation frame, outermost first. Used by `squawk-executive` when
    /// serializing a hibernating isolate's stack chunks.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    fn current_frame_index(&self) -> Option<usize> {
        self.frames.last().map(|f| f.base)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squawk_core::Oop;

    fn dummy_oop() -> Oop {
        // `Oop` fields are crate-private; obtain a handle the only way
        // external crates can, through a Heap allocation.
        let mut heap = squawk_core::Heap::new(Box::new(squawk_core::NullBarrier));
        heap.allocate(squawk_core::HeapObject {
            class_id: squawk_core::ClassId::new(0, 0),
            component_type: None,
            slots: vec![],
        })
    }

    #[test]
    fn guard_starts_clear() {
        let chunk = StackChunk::new(1, 64);
        assert!(chunk.check_guard().is_ok());
    }

    #[test]
    fn push_and_pop_frame_round_trips_depth() {
        let mut chunk = StackChunk::new(1, 64);
        chunk.push_frame(dummy_oop(), 2).unwrap();
        assert_eq!(chunk.depth(), 1);
        chunk.pop_frame();
        assert_eq!(chunk.depth(), 0);
    }

    #[test]
    fn exceeding_capacity_sets_guard() {
        let mut chunk = StackChunk::new(1, 10);
        let result = chunk.push_frame(dummy_oop(), 100);
        assert!(result.is_err());
        assert!(chunk.check_guard().is_err());
    }
}
