#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pageflip_core::{FlipConfig, FlipPage, Orientation, PageSet, Point, PointerEvent};
use web_time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
enum Op {
    Down(i16, i16),
    Move(i16, i16),
    Up,
    Leave,
    Next,
    Previous,
    Tick,
    Teardown,
}

#[derive(Debug, Arbitrary)]
struct Input {
    pages: u8,
    start: u8,
    horizontal: bool,
    wrap: bool,
    flip_on_leave: bool,
    hints: bool,
    threshold: u8,
    max_angle: u8,
    ops: Vec<(u8, Op)>,
}

fuzz_target!(|input: Input| {
    let len = usize::from(input.pages % 8);
    let config = FlipConfig::default()
        .with_orientation(if input.horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        })
        .with_threshold(f64::from(input.threshold % 50))
        .with_max_angle(f64::from(input.max_angle % 181))
        .with_start_page(usize::from(input.start))
        .with_loop_forever(input.wrap)
        .with_flip_on_leave(input.flip_on_leave)
        .with_hints(input.hints, input.hints);

    let mut fp = FlipPage::new(config, PageSet::new((0..len).collect::<Vec<_>>()))
        .expect("generated config is valid");
    let mut now = Instant::now();
    fp.mount(now);

    for (gap, op) in input.ops {
        now += Duration::from_millis(u64::from(gap));
        let point = |x: i16, y: i16| Point::new(f64::from(x), f64::from(y));
        match op {
            Op::Down(x, y) => drop(fp.process(&PointerEvent::Down(point(x, y)), now)),
            Op::Move(x, y) => drop(fp.process(&PointerEvent::Move(point(x, y)), now)),
            Op::Up => drop(fp.process(&PointerEvent::Up, now)),
            Op::Leave => drop(fp.process(&PointerEvent::Leave, now)),
            Op::Next => {
                let _ = fp.next(now);
            }
            Op::Previous => {
                let _ = fp.previous(now);
            }
            Op::Tick => drop(fp.tick(now)),
            Op::Teardown => fp.teardown(),
        }

        // Post-conditions that must always hold:
        assert!(len == 0 || fp.page() < len, "cursor OOB");
        let view = fp.view();
        assert!(view.rotate >= 0.0 && view.rotate <= 180.0, "rotation OOB");
        if fp.phase().is_committing() && !fp.is_destroyed() {
            assert!(fp.next_deadline().is_some(), "commit without timer");
        }
    }
});
