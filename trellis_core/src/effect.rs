// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timed visual effects.
//!
//! Flash, fade, and pulsate are explicit per-component state records advanced
//! by delta time each update tick — there is no coroutine runtime. Each
//! effect kind occupies an `Option` slot in [`Effects`], so at most one
//! instance of a kind can be live on a component at a time: starting a flash
//! or fade while one runs *replaces* it, starting a pulsate while one runs is
//! a no-op.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

use crate::color::Rgba;

/// A fading highlight drawn over the component.
///
/// Intensity follows a sine ease over each cycle, with one cycle per full
/// second of total duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flash {
    /// Highlight color.
    pub color: Rgba,
    /// How far the flash rectangle extends past the component rectangle, per
    /// axis.
    pub inflate: Vec2,
    remaining: f32,
    duration: f32,
}

impl Flash {
    /// Starts a flash of `duration` seconds.
    #[must_use]
    pub fn new(color: Rgba, duration: f32, inflate: Vec2) -> Self {
        Self {
            color,
            inflate,
            remaining: duration,
            duration,
        }
    }

    /// Seconds left until the flash ends.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Current highlight strength in 0.0–1.0.
    ///
    /// The curve runs from 144° down to 0° of a sine arc per cycle: it bumps
    /// up from near-full brightness and fades out.
    #[must_use]
    pub fn intensity(&self) -> f32 {
        if self.remaining <= 0.0 || self.duration <= 0.0 {
            return 0.0;
        }
        // One flash cycle per full second of duration.
        let cycle_count = self.duration.max(1.0).floor();
        let cycle = self.duration / cycle_count;
        let frac = (self.remaining % cycle) / cycle;
        (frac * core::f32::consts::PI * 0.8).sin().max(0.0)
    }

    /// Advances the timer; returns `true` when the flash has ended.
    fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// A linear alpha interpolation, with an optional start delay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    start_alpha: f32,
    target_alpha: f32,
    delay: f32,
    duration: f32,
    elapsed: f32,
    detach_on_complete: bool,
}

impl Fade {
    /// Starts a fade from `start_alpha` to `target_alpha` over `duration`
    /// seconds, after `delay` seconds of holding still.
    ///
    /// With `detach_on_complete`, the component's node is detached from its
    /// parent when the fade finishes (the fade-out-and-remove idiom).
    #[must_use]
    pub fn new(
        start_alpha: f32,
        target_alpha: f32,
        duration: f32,
        delay: f32,
        detach_on_complete: bool,
    ) -> Self {
        Self {
            start_alpha,
            target_alpha,
            delay,
            duration,
            elapsed: 0.0,
            detach_on_complete,
        }
    }

    /// Advances the timer; returns the current alpha (if past the delay) and
    /// whether the fade has finished.
    fn advance(&mut self, dt: f32) -> (Option<f32>, bool) {
        self.elapsed += dt;
        if self.elapsed < self.delay {
            return (None, false);
        }
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
        };
        let alpha = self.start_alpha + (self.target_alpha - self.start_alpha) * t;
        (Some(alpha), t >= 1.0)
    }
}

/// A local-scale oscillation between two values over a sine arc.
///
/// The scale returns to `start` when the pulsate completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulsate {
    start: Vec2,
    end: Vec2,
    duration: f32,
    elapsed: f32,
}

impl Pulsate {
    /// Starts a pulsate from `start` to `end` scale over `duration` seconds.
    #[must_use]
    pub fn new(start: Vec2, end: Vec2, duration: f32) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advances the timer; returns the scale to apply and whether the
    /// pulsate has finished.
    fn advance(&mut self, dt: f32) -> (Vec2, bool) {
        self.elapsed += dt;
        if self.duration <= 0.0 || self.elapsed >= self.duration {
            return (self.start, true);
        }
        let t = self.elapsed / self.duration;
        let arc = (t * core::f32::consts::PI).sin();
        (self.start.lerp(self.end, f64::from(arc)), false)
    }
}

/// What an [`Effects::advance`] tick asks the caller to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectOutput {
    /// New alpha for the component, if a fade is past its delay.
    pub alpha: Option<f32>,
    /// New local scale for the component's node, if a pulsate is running.
    pub scale: Option<Vec2>,
    /// The component's node should be detached from its parent (a fade with
    /// detach-on-complete finished).
    pub detach: bool,
}

/// The effect slots of one component.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Effects {
    /// Running flash, if any.
    pub flash: Option<Flash>,
    /// Running fade, if any.
    pub fade: Option<Fade>,
    /// Running pulsate, if any.
    pub pulsate: Option<Pulsate>,
}

impl Effects {
    /// Starts a flash, replacing any running one.
    pub fn start_flash(&mut self, color: Rgba, duration: f32, inflate: Vec2) {
        self.flash = Some(Flash::new(color, duration, inflate));
    }

    /// Starts a fade, replacing any running one.
    pub fn start_fade(
        &mut self,
        start_alpha: f32,
        target_alpha: f32,
        duration: f32,
        delay: f32,
        detach_on_complete: bool,
    ) {
        self.fade = Some(Fade::new(
            start_alpha,
            target_alpha,
            duration,
            delay,
            detach_on_complete,
        ));
    }

    /// Starts a pulsate. No-op while one is already running.
    pub fn start_pulsate(&mut self, start: Vec2, end: Vec2, duration: f32) {
        if self.pulsate.is_none() {
            self.pulsate = Some(Pulsate::new(start, end, duration));
        }
    }

    /// Advances all running effects by `dt` seconds and reports what to
    /// apply. Finished effects clear their slot.
    pub fn advance(&mut self, dt: f32) -> EffectOutput {
        let mut output = EffectOutput::default();

        if let Some(mut flash) = self.flash.take() {
            if !flash.advance(dt) {
                self.flash = Some(flash);
            }
        }

        if let Some(mut fade) = self.fade.take() {
            let (alpha, finished) = fade.advance(dt);
            output.alpha = alpha;
            if finished {
                output.detach = fade.detach_on_complete;
            } else {
                self.fade = Some(fade);
            }
        }

        if let Some(mut pulsate) = self.pulsate.take() {
            let (scale, finished) = pulsate.advance(dt);
            output.scale = Some(scale);
            if !finished {
                self.pulsate = Some(pulsate);
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_fades_out_and_clears_its_slot() {
        let mut effects = Effects::default();
        effects.start_flash(Rgba::WHITE, 1.0, Vec2::ZERO);

        let _ = effects.advance(0.5);
        let flash = effects.flash.expect("still running at half time");
        assert!(flash.intensity() > 0.0);

        let _ = effects.advance(0.6);
        assert!(effects.flash.is_none(), "expired flash must clear its slot");
    }

    #[test]
    fn restarting_a_flash_replaces_the_running_one() {
        let mut effects = Effects::default();
        effects.start_flash(Rgba::WHITE, 1.0, Vec2::ZERO);
        let _ = effects.advance(0.9);

        effects.start_flash(Rgba::BLACK, 2.0, Vec2::ZERO);
        let flash = effects.flash.expect("replaced flash");
        assert_eq!(flash.remaining(), 2.0);
        assert_eq!(flash.color, Rgba::BLACK);
    }

    #[test]
    fn fade_interpolates_linearly_and_requests_detach() {
        let mut effects = Effects::default();
        effects.start_fade(1.0, 0.0, 1.0, 0.0, true);

        let output = effects.advance(0.5);
        let alpha = output.alpha.expect("past delay");
        assert!((alpha - 0.5).abs() < 1e-5);
        assert!(!output.detach);

        let output = effects.advance(0.5);
        assert_eq!(output.alpha, Some(0.0));
        assert!(output.detach, "finished detaching fade must report it");
        assert!(effects.fade.is_none());
    }

    #[test]
    fn fade_holds_during_its_delay() {
        let mut effects = Effects::default();
        effects.start_fade(0.0, 1.0, 1.0, 0.5, false);
        let output = effects.advance(0.25);
        assert_eq!(output.alpha, None);

        let output = effects.advance(0.75);
        let alpha = output.alpha.expect("past delay");
        assert!((alpha - 0.5).abs() < 1e-5);
    }

    #[test]
    fn zero_duration_fade_completes_immediately() {
        let mut effects = Effects::default();
        effects.start_fade(1.0, 0.25, 0.0, 0.0, false);
        let output = effects.advance(0.01);
        assert_eq!(output.alpha, Some(0.25));
        assert!(effects.fade.is_none());
    }

    #[test]
    fn pulsate_peaks_midway_and_reverts_to_start() {
        let start = Vec2::new(1.0, 1.0);
        let end = Vec2::new(2.0, 2.0);
        let mut effects = Effects::default();
        effects.start_pulsate(start, end, 1.0);

        let output = effects.advance(0.5);
        let scale = output.scale.expect("running");
        assert!((scale.x - 2.0).abs() < 1e-6, "sine peak at half time");

        let output = effects.advance(0.6);
        assert_eq!(output.scale, Some(start), "reverts to start on completion");
        assert!(effects.pulsate.is_none());
    }

    #[test]
    fn pulsate_start_while_running_is_a_no_op() {
        let mut effects = Effects::default();
        effects.start_pulsate(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), 1.0);
        effects.start_pulsate(Vec2::new(5.0, 5.0), Vec2::new(9.0, 9.0), 9.0);

        let output = effects.advance(0.5);
        let scale = output.scale.expect("original pulsate still running");
        assert!(scale.x <= 2.0 + 1e-6, "second start must not replace");
    }
}
