// src/buffer.rs - Gap buffer storage for the document model

use log::trace;
use std::fmt;
use thiserror::Error;

/// A logical position: the number of characters before it, ignoring the gap.
pub type Cursor = usize;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("cursor {cursor} out of range (length {length})")]
    OutOfRange { cursor: Cursor, length: usize },
    #[error("failed to grow buffer storage to {requested} bytes")]
    Allocation { requested: usize },
}

/// A byte sequence split around a movable gap.
///
/// ```text
///  [ before gap | gap (unused) | after gap ]
///    0..gap_start  gap_start..gap_end  gap_end..end
/// ```
///
/// `point` is the buffer's own cursor. Edits issued at other cursors shift it
/// so it keeps denoting the same character.
pub struct GapBuffer {
    storage: Vec<u8>,
    gap_start: usize,
    gap_end: usize,
    point: Cursor,
    min_gap: usize,
}

impl GapBuffer {
    pub fn new(initial_gap: usize) -> Result<Self, BufferError> {
        Self::with_min_gap(initial_gap, 1)
    }

    /// Like `new`, but every insert guarantees at least `min_gap` free bytes
    /// before writing. A larger quantum means fewer, bigger reallocations.
    pub fn with_min_gap(initial_gap: usize, min_gap: usize) -> Result<Self, BufferError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(initial_gap)
            .map_err(|_| BufferError::Allocation {
                requested: initial_gap,
            })?;
        storage.resize(initial_gap, 0);
        Ok(Self {
            storage,
            gap_start: 0,
            gap_end: initial_gap,
            point: 0,
            min_gap: min_gap.max(1),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    #[inline]
    pub fn gap_end(&self) -> usize {
        self.gap_end
    }

    #[inline]
    pub fn gap_size(&self) -> usize {
        self.gap_end - self.gap_start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.capacity() - self.gap_size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn point(&self) -> Cursor {
        self.point
    }

    pub fn set_point(&mut self, cursor: Cursor) -> Result<(), BufferError> {
        self.check_cursor(cursor)?;
        self.point = cursor;
        Ok(())
    }

    fn check_cursor(&self, cursor: Cursor) -> Result<(), BufferError> {
        if cursor > self.len() {
            return Err(BufferError::OutOfRange {
                cursor,
                length: self.len(),
            });
        }
        Ok(())
    }

    /// Storage index of a cursor. Only valid until the next insert or delete.
    #[inline]
    fn storage_index(&self, cursor: Cursor) -> usize {
        if cursor < self.gap_start {
            cursor
        } else {
            cursor + self.gap_size()
        }
    }

    pub fn char_at(&self, cursor: Cursor) -> Result<u8, BufferError> {
        if cursor >= self.len() {
            return Err(BufferError::OutOfRange {
                cursor,
                length: self.len(),
            });
        }
        Ok(self.storage[self.storage_index(cursor)])
    }

    /// Overwrite the character at `cursor`. Returns `false` at `len()`, where
    /// there is no character to replace.
    pub fn replace(&mut self, cursor: Cursor, ch: u8) -> Result<bool, BufferError> {
        self.check_cursor(cursor)?;
        if cursor == self.len() {
            return Ok(false);
        }
        let idx = self.storage_index(cursor);
        self.storage[idx] = ch;
        Ok(true)
    }

    pub fn insert(&mut self, cursor: Cursor, ch: u8) -> Result<(), BufferError> {
        self.check_cursor(cursor)?;
        self.ensure_gap(self.min_gap)?;
        self.shift_gap_to(cursor);
        self.storage[self.gap_start] = ch;
        self.gap_start += 1;

        if self.point >= cursor {
            self.point += 1;
        }
        Ok(())
    }

    /// Insert `bytes` starting at `cursor`, one character at a time.
    pub fn insert_bytes(&mut self, cursor: Cursor, bytes: &[u8]) -> Result<(), BufferError> {
        self.check_cursor(cursor)?;
        for (offset, &ch) in bytes.iter().enumerate() {
            self.insert(cursor + offset, ch)?;
        }
        Ok(())
    }

    /// Backspace: remove the character before `cursor`.
    pub fn delete_backward(&mut self, cursor: Cursor) -> Result<bool, BufferError> {
        self.check_cursor(cursor)?;
        if cursor == 0 {
            return Ok(false);
        }
        self.shift_gap_to(cursor);
        self.gap_start -= 1;

        if self.point >= cursor {
            self.point -= 1;
        }
        Ok(true)
    }

    /// Delete key: remove the character at `cursor`.
    pub fn delete_forward(&mut self, cursor: Cursor) -> Result<bool, BufferError> {
        self.check_cursor(cursor)?;
        if cursor == self.len() {
            return Ok(false);
        }
        self.shift_gap_to(cursor);
        self.gap_end += 1;

        if self.point > cursor {
            self.point -= 1;
        }
        Ok(true)
    }

    /// Move the gap so that it starts at `cursor`, copying only the bytes
    /// between the old and new gap location.
    fn shift_gap_to(&mut self, cursor: Cursor) {
        let gap = self.gap_size();

        if cursor < self.gap_start {
            let delta = self.gap_start - cursor;
            self.storage
                .copy_within(cursor..self.gap_start, self.gap_end - delta);
            self.gap_start -= delta;
            self.gap_end -= delta;
            trace!("gap shifted back by {} to {}", delta, self.gap_start);
        } else if cursor > self.gap_start {
            let delta = cursor - self.gap_start;
            self.storage
                .copy_within(self.gap_end..self.gap_end + delta, self.gap_start);
            self.gap_start += delta;
            self.gap_end += delta;
            trace!("gap shifted forward by {} to {}", delta, self.gap_start);
        }

        debug_assert_eq!(self.gap_size(), gap);
        debug_assert!(self.gap_end <= self.capacity());
    }

    /// Grow storage so the gap holds at least `minimum` bytes. On failure the
    /// buffer is left untouched.
    fn ensure_gap(&mut self, minimum: usize) -> Result<(), BufferError> {
        if self.gap_size() >= minimum {
            return Ok(());
        }
        let end = self.capacity();
        let new_end = match (end.checked_mul(2), end.checked_add(minimum)) {
            (Some(doubled), Some(needed)) => doubled.max(needed),
            _ => return Err(BufferError::Allocation { requested: usize::MAX }),
        };
        self.storage
            .try_reserve_exact(new_end - end)
            .map_err(|_| BufferError::Allocation { requested: new_end })?;

        // Park the gap at the tail so the new bytes extend it.
        self.shift_gap_to(self.len());
        self.storage.resize(new_end, 0);
        self.gap_end = new_end;
        trace!("storage grown from {} to {} bytes", end, new_end);

        debug_assert!(self.gap_size() >= minimum);
        Ok(())
    }

    /// The logical contents, gap removed.
    pub fn contents(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.storage[..self.gap_start]);
        out.extend_from_slice(&self.storage[self.gap_end..]);
        out
    }

    /// Copy the line beginning at `start` (without its newline) and return the
    /// cursor where the following line begins, or `len()` on the last line.
    pub fn copy_line(&self, start: Cursor) -> (Vec<u8>, Cursor) {
        let len = self.len();
        let mut line = Vec::new();
        let mut cursor = start.min(len);
        while cursor < len {
            let ch = self.storage[self.storage_index(cursor)];
            cursor += 1;
            if ch == b'\n' {
                return (line, cursor);
            }
            line.push(ch);
        }
        (line, len)
    }

    pub fn lines(&self) -> Lines<'_> {
        Lines {
            buffer: self,
            next: Some(0),
        }
    }
}

/// Iterator over the lines of a buffer, newlines stripped.
pub struct Lines<'a> {
    buffer: &'a GapBuffer,
    next: Option<Cursor>,
}

impl Iterator for Lines<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next?;
        let (line, after) = self.buffer.copy_line(start);
        // A line ending in '\n' always has a successor, even an empty one.
        let ended_with_newline =
            after > start && self.buffer.char_at(after - 1) == Ok(b'\n');
        self.next = if ended_with_newline { Some(after) } else { None };
        Some(line)
    }
}

const DEFAULT_GAP: usize = 2;

impl Default for GapBuffer {
    fn default() -> Self {
        Self {
            storage: vec![0u8; DEFAULT_GAP],
            gap_start: 0,
            gap_end: DEFAULT_GAP,
            point: 0,
            min_gap: 1,
        }
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.contents()))
    }
}

impl fmt::Debug for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GapBuffer({:?}|{}|{:?}, point={})",
            String::from_utf8_lossy(&self.storage[..self.gap_start]),
            self.gap_size(),
            String::from_utf8_lossy(&self.storage[self.gap_end..]),
            self.point
        )
    }
}
