//! Sampling behaviour through the public API.

use std::time::Duration;

use dock_core::{Quirk, Rect};
use dock_layout::{FrameParams, LayoutSampler, icon_visible_progress, timing};
use dock_model::{Icon, IconCollection, IconKind};
use web_time::Instant;

const MS_1: Duration = Duration::from_millis(1);

#[test]
fn visible_progress_reaches_one_at_short() {
    let mut icons = IconCollection::new();
    let id = icons.push(Icon::new(IconKind::Application));
    let t0 = Instant::now();
    icons.set_quirk(id, Quirk::Visible, true, None, t0);

    let icon = icons.get(id).unwrap();
    let mid = icon_visible_progress(icon, 0, t0 + timing::SHORT / 2);
    assert!(mid > 0.0 && mid < 1.0);
    assert_eq!(icon_visible_progress(icon, 0, t0 + timing::SHORT), 1.0);
}

#[test]
fn fading_in_icon_grows_its_slot() {
    let mut icons = IconCollection::new();
    let first = icons.push(Icon::new(IconKind::Application).with_priority(0));
    let second = icons.push(Icon::new(IconKind::Application).with_priority(1).visible());
    let t0 = Instant::now();
    icons.set_quirk(first, Quirk::Visible, true, None, t0);

    let frame = FrameParams::new(0, Rect::new(0.0, 0.0, 64.0, 800.0));
    let mut sampler = LayoutSampler::default();

    let y = |out: &dock_layout::SampledFrame| {
        out.args
            .iter()
            .find(|a| a.icon == second)
            .unwrap()
            .logical_center
            .y
    };
    let start = sampler.sample(&mut icons, &frame, t0 + MS_1);
    let mid = sampler.sample(&mut icons, &frame, t0 + timing::SHORT / 2);
    let end = sampler.sample(&mut icons, &frame, t0 + timing::SHORT);
    assert!(y(&start) < y(&mid));
    assert!(y(&mid) < y(&end));
    assert_eq!(y(&end), 84.0);
    assert!(sampler.animation_in_progress(&icons, &frame, t0 + timing::SHORT / 2));
}

#[test]
fn sampling_is_repeatable() {
    let mut icons = IconCollection::new();
    for i in 0..20 {
        icons.push(Icon::new(IconKind::Application).with_priority(i).visible());
    }
    let frame = FrameParams::new(0, Rect::new(0.0, 0.0, 64.0, 500.0));
    let mut sampler = LayoutSampler::default();
    let now = Instant::now();
    let a = sampler.sample(&mut icons, &frame, now);
    let b = sampler.sample(&mut icons, &frame, now);
    assert_eq!(a, b);
}
