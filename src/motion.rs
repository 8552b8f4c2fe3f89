// src/motion.rs - Cursor and line motion over a gap buffer
//
// Every function here is total: a cursor past the end is treated as the end,
// and motions that would leave the buffer return their input.

use crate::buffer::{Cursor, GapBuffer};

#[inline]
fn clamp(buffer: &GapBuffer, cursor: Cursor) -> Cursor {
    cursor.min(buffer.len())
}

#[inline]
fn is_newline(buffer: &GapBuffer, cursor: Cursor) -> bool {
    buffer.char_at(cursor) == Ok(b'\n')
}

/// One character forward, saturating at the end of the buffer.
pub fn next_char(buffer: &GapBuffer, cursor: Cursor) -> Cursor {
    let cursor = clamp(buffer, cursor);
    if cursor < buffer.len() { cursor + 1 } else { cursor }
}

/// One character back, saturating at 0.
pub fn prev_char(buffer: &GapBuffer, cursor: Cursor) -> Cursor {
    clamp(buffer, cursor).saturating_sub(1)
}

/// Start of the line containing `cursor`: just after the closest preceding
/// newline, or 0.
///
/// Position 0 is inspected too, so a buffer opening with `'\n'` has its
/// second line start at 1 rather than collapsing onto line 0.
pub fn line_start(buffer: &GapBuffer, cursor: Cursor) -> Cursor {
    let mut pos = clamp(buffer, cursor);
    while pos > 0 {
        pos -= 1;
        if is_newline(buffer, pos) {
            return pos + 1;
        }
    }
    0
}

/// End of the line containing `cursor`: the position of its newline, or the
/// buffer length on the last line.
pub fn line_end(buffer: &GapBuffer, cursor: Cursor) -> Cursor {
    let mut pos = clamp(buffer, cursor);
    while pos < buffer.len() {
        if is_newline(buffer, pos) {
            return pos;
        }
        pos += 1;
    }
    buffer.len()
}

/// Same column on the previous line, clamped to that line's length.
/// Unchanged on the first line.
pub fn line_up(buffer: &GapBuffer, cursor: Cursor) -> Cursor {
    let cursor = clamp(buffer, cursor);
    let start = line_start(buffer, cursor);
    let prev_last = prev_char(buffer, start);
    if prev_last == start {
        return cursor;
    }
    let prev_start = line_start(buffer, prev_last);
    let col = (cursor - start).min(prev_last - prev_start);
    prev_start + col
}

/// Same column on the next line, clamped to that line's length.
/// Unchanged on the last line.
pub fn line_down(buffer: &GapBuffer, cursor: Cursor) -> Cursor {
    let cursor = clamp(buffer, cursor);
    let col = cursor - line_start(buffer, cursor);
    let end = line_end(buffer, cursor);
    let next_start = next_char(buffer, end);
    if next_start == end {
        return cursor;
    }
    let next_len = line_end(buffer, next_start) - next_start;
    next_start + col.min(next_len)
}

/// Zero-based (line, column) of `cursor`.
pub fn line_col(buffer: &GapBuffer, cursor: Cursor) -> (usize, usize) {
    let cursor = clamp(buffer, cursor);
    let start = line_start(buffer, cursor);
    let line = (0..start).filter(|&pos| is_newline(buffer, pos)).count();
    (line, cursor - start)
}
