//! Title crossfade math.
//!
//! The outgoing title holds still until `exit_trigger` of the transition has
//! elapsed, then slides out in the scroll direction.  The incoming title
//! slides in from `enter_offset_vw` and switches from a gray layer to its
//! gradient colours inside the `color_switch` window.  Subtitles fade on
//! their own narrow windows at either end of the transition.

use super::easing::{clamp01, windowed_progress, Easing};
use super::progress::ProgressDescriptor;

#[derive(Debug, Clone)]
pub struct TitleParams {
    pub enter_offset_vw: f64,
    pub exit_distance_vw: f64,
    pub exit_trigger: f64,
    /// `(start, end)` of the gray → colour switch on the incoming title.
    pub color_switch: (f64, f64),
    /// Fraction of the transition used by each subtitle fade.
    pub subtitle_window: f64,
    pub subtitle_shift_px: f64,
    pub curve: Easing,
}

impl Default for TitleParams {
    fn default() -> Self {
        Self {
            enter_offset_vw: 60.0,
            exit_distance_vw: 60.0,
            exit_trigger: 0.6,
            color_switch: (0.1, 0.95),
            subtitle_window: 0.2,
            subtitle_shift_px: 20.0,
            curve: Easing::EaseOutCubic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubtitleLayer {
    /// Vertical offset; negative is up.
    pub translate_px: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentTitle {
    pub translate_vw: f64,
    pub opacity: f64,
    pub subtitle: SubtitleLayer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextTitle {
    pub translate_vw: f64,
    pub opacity: f64,
    /// 0 = fully gray layer, 1 = fully coloured layer.
    pub color_mix: f64,
    pub subtitle: SubtitleLayer,
}

/// Visual parameters of both title blocks for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleLayers {
    pub current: CurrentTitle,
    /// `None` while settled.  Even when present, the renderer must check
    /// that the next section exists.
    pub next: Option<NextTitle>,
}

impl TitleLayers {
    pub fn compute(d: &ProgressDescriptor, params: &TitleParams) -> Self {
        let curve = params.curve;
        let dir = d.direction.factor();
        let eased = curve.apply(d.abs_p);

        let exit = curve.apply(windowed_progress(d.abs_p, params.exit_trigger, 1.0));
        let leaving_sub = curve.apply(clamp01(1.0 - d.abs_p / params.subtitle_window));

        let current = CurrentTitle {
            translate_vw: -params.exit_distance_vw * exit * dir,
            opacity: clamp01(1.0 - exit),
            subtitle: SubtitleLayer {
                translate_px: -params.subtitle_shift_px * (1.0 - leaving_sub),
                opacity: leaving_sub,
            },
        };

        let next = (d.abs_p > 0.0).then(|| {
            let (start, end) = params.color_switch;
            let entering_sub = curve.apply(windowed_progress(
                d.abs_p,
                1.0 - params.subtitle_window,
                1.0,
            ));
            NextTitle {
                translate_vw: params.enter_offset_vw * (1.0 - eased) * dir,
                opacity: eased,
                color_mix: curve.apply(windowed_progress(d.abs_p, start, end)),
                subtitle: SubtitleLayer {
                    translate_px: -params.subtitle_shift_px * (1.0 - entering_sub),
                    opacity: entering_sub,
                },
            }
        });

        Self { current, next }
    }
}
