//! Per-invocation byte accounting for playback and capture.

/// Bytes moved so far against a target length.
///
/// Created per playback or capture call and dropped on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamCursor {
    target: u64,
    done: u64,
}

impl StreamCursor {
    /// Cursor over `target` bytes.
    pub fn new(target: u64) -> Self {
        Self { target, done: 0 }
    }

    /// Bytes moved so far.
    pub fn done(&self) -> u64 {
        self.done
    }

    /// Target length.
    pub fn target(&self) -> u64 {
        self.target
    }

    /// Bytes left before the target is reached.
    pub fn remaining(&self) -> u64 {
        self.target.saturating_sub(self.done)
    }

    /// Whether the target has been reached.
    pub fn is_complete(&self) -> bool {
        self.done >= self.target
    }

    /// Length of the next transfer: `chunk`, clipped to what remains.
    pub fn next_len(&self, chunk: usize) -> usize {
        usize::try_from(self.remaining()).map_or(chunk, |r| r.min(chunk))
    }

    /// Record `n` bytes moved.
    pub fn advance(&mut self, n: usize) {
        self.done = self.done.saturating_add(n as u64);
    }
}
