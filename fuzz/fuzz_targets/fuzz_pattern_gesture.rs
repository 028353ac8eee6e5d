#![no_main]

use arbitrary::Arbitrary;
use latchkey_core::{GridLayout, GridPoint, PatternEncoder};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Gesture {
    rows: u8,
    columns: u8,
    width: u16,
    height: u16,
    touches: Vec<(f32, f32)>,
}

fuzz_target!(|gesture: Gesture| {
    let layout = GridLayout::new(
        u32::from(gesture.rows % 8),
        u32::from(gesture.columns % 8),
        u32::from(gesture.width),
        u32::from(gesture.height),
    );

    // Invalid geometry must be rejected, never panic
    let Ok(mut encoder) = PatternEncoder::new(layout) else {
        return;
    };

    let mut touches = gesture
        .touches
        .iter()
        .map(|&(x, y)| GridPoint::new(x, y));

    let Some(first) = touches.next() else {
        return;
    };
    encoder.start_path(first);
    assert!(encoder.selected_points().len() <= 1);

    for touch in touches {
        let before = encoder.selected_points().len();
        encoder.update_path(touch);
        let after = encoder.selected_points().len();
        assert!(after == before || after == before + 1);
    }

    let selected = encoder.selected_points().to_vec();
    for (i, a) in selected.iter().enumerate() {
        assert!(*a < layout.point_count());
        assert!(!selected[i + 1..].contains(a));
    }

    let encoded = encoder.encode();
    match encoder.finish_gesture() {
        Some(code) => assert_eq!(code, encoded),
        None => assert!(selected.is_empty()),
    }
    assert!(encoder.selected_points().is_empty());
});
