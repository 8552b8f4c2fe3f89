// Cursor and line navigation tests over the sample document

mod common;
use common::fixtures;

use qed::buffer::GapBuffer;
use qed::motion::{line_down, line_end, line_start, line_up, next_char, prev_char};

#[test]
fn test_sample_line_navigation() {
    let buffer = fixtures::buffer_with(fixtures::SAMPLE);
    assert_eq!(line_start(&buffer, 8), 6);
    assert_eq!(line_end(&buffer, 8), 11);
    assert_eq!(line_up(&buffer, 8), 2);
    assert_eq!(line_down(&buffer, 2), 8);
}

#[test]
fn test_saturation() {
    let buffer = fixtures::buffer_with(fixtures::SAMPLE);
    let len = buffer.len();
    assert_eq!(prev_char(&buffer, 0), 0);
    assert_eq!(next_char(&buffer, len), len);
}

/// Navigation gives the same answers wherever the gap happens to be
#[test]
fn test_navigation_independent_of_gap() {
    let mut buffer = fixtures::buffer_with(fixtures::SAMPLE);
    let reference: Vec<_> = (0..=buffer.len())
        .map(|c| (line_start(&buffer, c), line_end(&buffer, c), line_up(&buffer, c), line_down(&buffer, c)))
        .collect();

    // Park the gap at the front by inserting and removing there.
    buffer.insert(0, b'!').unwrap();
    buffer.delete_forward(0).unwrap();
    assert_eq!(buffer.gap_start(), 0);

    for (c, expected) in reference.into_iter().enumerate() {
        let actual = (line_start(&buffer, c), line_end(&buffer, c), line_up(&buffer, c), line_down(&buffer, c));
        assert_eq!(actual, expected, "cursor {}", c);
    }
}

/// Walking down then up from the top line returns to the starting column
#[test]
fn test_sticky_column_round_trip() {
    let buffer = fixtures::buffer_with("abcdef\nabcdef\nabcdef");
    for col in 0..=6 {
        let down = line_down(&buffer, col);
        assert_eq!(down, 7 + col);
        assert_eq!(line_up(&buffer, down), col);
    }
}

/// Empty lines clamp the column to zero
#[test]
fn test_empty_line_between() {
    let buffer = fixtures::buffer_with("abc\n\nxyz");
    assert_eq!(line_down(&buffer, 2), 4);
    assert_eq!(line_down(&buffer, 4), 5);
    assert_eq!(line_up(&buffer, 7), 4);
    assert_eq!(line_up(&buffer, 4), 0);
}

#[test]
fn test_empty_buffer() {
    let buffer = GapBuffer::new(2).unwrap();
    assert_eq!(next_char(&buffer, 0), 0);
    assert_eq!(prev_char(&buffer, 0), 0);
    assert_eq!(line_start(&buffer, 0), 0);
    assert_eq!(line_end(&buffer, 0), 0);
}
