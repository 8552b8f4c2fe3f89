// Common test utilities for gap buffer and session tests

use qed::buffer::GapBuffer;
use qed::editor::Editor;

/// Utilities for creating test buffers with specific characteristics
pub mod fixtures {
    use super::*;

    #[allow(dead_code)]
    pub const SAMPLE: &str = "Hello\nWorld\nfoo bar bazzle";

    /// Fill a buffer by inserting `text` at increasing cursors, starting from
    /// the smallest gap that still grows.
    #[allow(dead_code)]
    pub fn buffer_with(text: &str) -> GapBuffer {
        let mut buffer = GapBuffer::new(2).unwrap();
        for (i, ch) in text.bytes().enumerate() {
            buffer.insert(i, ch).unwrap();
        }
        buffer
    }

    /// Editor seeded with `text` and the point moved to `point`
    #[allow(dead_code)]
    pub fn editor_with(text: &str, point: usize) -> Editor {
        let mut editor = Editor::default();
        editor.load_text(text).unwrap();
        editor.set_point(point).unwrap();
        editor
    }
}

/// Validation utilities for checking invariants
pub mod validation {
    use super::*;

    /// Assert the storage layout invariants hold
    #[allow(dead_code)]
    pub fn assert_buffer_invariants(buffer: &GapBuffer) {
        assert!(
            buffer.gap_start() <= buffer.gap_end(),
            "gap_start {} past gap_end {}",
            buffer.gap_start(),
            buffer.gap_end()
        );
        assert!(
            buffer.gap_end() <= buffer.capacity(),
            "gap_end {} past capacity {}",
            buffer.gap_end(),
            buffer.capacity()
        );
        assert!(
            buffer.point() <= buffer.len(),
            "point {} past length {}",
            buffer.point(),
            buffer.len()
        );
        assert_eq!(buffer.len(), buffer.capacity() - buffer.gap_size());
    }

    /// Read every character back through `char_at`
    #[allow(dead_code)]
    pub fn read_back(buffer: &GapBuffer) -> Vec<u8> {
        (0..buffer.len())
            .map(|i| buffer.char_at(i).unwrap())
            .collect()
    }
}
