//! Per-actor animation blending.
//!
//! The blender owns the actor's locomotion channel weights and at most one
//! exclusive full-body overlay action. Combat logic polls clip progress from
//! here (`overlay_elapsed_fraction`) instead of subscribing to completion
//! callbacks; every one-shot effect keeps its own fired flag.

use std::collections::HashMap;

use crate::clips::{ClipLibrary, LoopMode};
use crate::constants::*;

/// Locomotion blend channels. Weights sum toward 1 in steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Idle,
    Walk,
    Run,
    Fly,
    Sit,
}

const ALL_CHANNELS: [Channel; 5] = [
    Channel::Idle,
    Channel::Walk,
    Channel::Run,
    Channel::Fly,
    Channel::Sit,
];

/// The exclusive full-body action currently playing, if any.
#[derive(Debug, Clone)]
struct Overlay {
    name: String,
    elapsed: f32,
    duration: f32,
    loop_mode: LoopMode,
    weight: f32,
}

/// Per-actor animation state and blending.
#[derive(Debug, Clone)]
pub struct AnimationBlender {
    clips: ClipLibrary,
    weights: HashMap<Channel, f32>,
    targets: HashMap<Channel, f32>,
    overlay: Option<Overlay>,
    responsiveness: f32,
}

impl AnimationBlender {
    pub fn new(clips: ClipLibrary) -> Self {
        let mut weights = HashMap::new();
        let mut targets = HashMap::new();
        for ch in ALL_CHANNELS {
            weights.insert(ch, 0.0);
            targets.insert(ch, 0.0);
        }
        weights.insert(Channel::Idle, 1.0);
        targets.insert(Channel::Idle, 1.0);
        Self {
            clips,
            weights,
            targets,
            overlay: None,
            responsiveness: ANIM_RESPONSIVENESS,
        }
    }

    /// Recompute target locomotion weights from movement state.
    ///
    /// Plateau bands pin the dominant clip to full weight inside stable
    /// speed ranges so steady movement shows a clean, unblended clip.
    pub fn set_locomotion(
        &mut self,
        speed: f32,
        is_flying: bool,
        is_sprinting: bool,
        is_sitting: bool,
        is_backing: bool,
        blocking: bool,
    ) {
        let mut t: HashMap<Channel, f32> =
            ALL_CHANNELS.iter().map(|&c| (c, 0.0)).collect();

        if is_sitting {
            t.insert(Channel::Sit, 1.0);
        } else if is_flying {
            t.insert(Channel::Fly, 1.0);
        } else if speed <= IDLE_SPEED_MAX {
            t.insert(Channel::Idle, 1.0);
        } else if speed < WALK_PLATEAU_MIN {
            // idle -> walk ramp
            let f = (speed - IDLE_SPEED_MAX) / (WALK_PLATEAU_MIN - IDLE_SPEED_MAX);
            t.insert(Channel::Idle, 1.0 - f);
            t.insert(Channel::Walk, f);
        } else if speed <= WALK_PLATEAU_MAX || is_backing || blocking {
            // walk plateau; backing and blocking never show the run clip
            t.insert(Channel::Walk, 1.0);
        } else if speed < RUN_SPEED_MIN && !is_sprinting {
            // walk -> run ramp
            let f = (speed - WALK_PLATEAU_MAX) / (RUN_SPEED_MIN - WALK_PLATEAU_MAX);
            t.insert(Channel::Walk, 1.0 - f);
            t.insert(Channel::Run, f);
        } else {
            t.insert(Channel::Run, 1.0);
        }

        self.targets = t;
    }

    /// Start an exclusive overlay action. Returns false when the clip is
    /// unknown even after fallback search; the caller then fires its effect
    /// immediately without a synchronized visual.
    pub fn play_overlay(&mut self, name: &str, loop_mode: LoopMode) -> bool {
        let Some((resolved, info)) = self.clips.resolve(name) else {
            log::debug!("overlay clip not found: {name}");
            return false;
        };
        // replacing any previous overlay keeps the at-most-one invariant
        self.overlay = Some(Overlay {
            name: resolved.to_string(),
            elapsed: 0.0,
            duration: info.duration.max(1e-3),
            loop_mode,
            weight: 0.0,
        });
        true
    }

    /// Abort the overlay action immediately.
    pub fn stop_overlay(&mut self) {
        self.overlay = None;
    }

    /// Advance overlay time and chase blend targets.
    pub fn update(&mut self, dt: f32) {
        let k = (self.responsiveness * dt).min(1.0);

        // advance the overlay clock and decide suppression
        let mut overlay_target = 0.0;
        let mut suppress_locomotion = false;
        let mut finished = false;
        if let Some(overlay) = &mut self.overlay {
            overlay.elapsed += dt;
            match overlay.loop_mode {
                LoopMode::Loop => {
                    if overlay.elapsed >= overlay.duration {
                        overlay.elapsed %= overlay.duration;
                    }
                    overlay_target = 1.0;
                    suppress_locomotion = true;
                }
                LoopMode::Once => {
                    if overlay.elapsed >= overlay.duration {
                        finished = true;
                    } else if overlay.duration - overlay.elapsed <= OVERLAY_BACK_WINDOW {
                        // back window: fade out early so the next action
                        // starts from live locomotion instead of a pop
                        overlay_target = 0.0;
                        suppress_locomotion = false;
                    } else {
                        overlay_target = 1.0;
                        suppress_locomotion = true;
                    }
                }
            }
        }
        if finished {
            self.overlay = None;
        }

        for ch in ALL_CHANNELS {
            let target = if suppress_locomotion {
                0.0
            } else {
                self.targets[&ch]
            };
            let w = self.weights.get_mut(&ch).unwrap();
            *w += (target - *w) * k;
            *w = w.max(0.0);
        }
        if let Some(overlay) = &mut self.overlay {
            overlay.weight += (overlay_target - overlay.weight) * k;
        }

        self.enforce_weight_floor();
    }

    /// Keep total blended weight above the floor by boosting whichever
    /// channel's *target* is currently dominant.
    fn enforce_weight_floor(&mut self) {
        let overlay_w = self.overlay.as_ref().map_or(0.0, |o| o.weight);
        let total: f32 = self.weights.values().sum::<f32>() + overlay_w;
        if total >= WEIGHT_FLOOR {
            return;
        }
        let dominant = ALL_CHANNELS
            .iter()
            .copied()
            .max_by(|a, b| {
                self.targets[a]
                    .partial_cmp(&self.targets[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(Channel::Idle);
        let deficit = WEIGHT_FLOOR - total;
        *self.weights.get_mut(&dominant).unwrap() += deficit;
    }

    /// Current blend weight of one locomotion channel.
    pub fn channel_weight(&self, ch: Channel) -> f32 {
        self.weights[&ch]
    }

    /// Sum of locomotion weights plus the overlay weight.
    pub fn total_weight(&self) -> f32 {
        self.weights.values().sum::<f32>()
            + self.overlay.as_ref().map_or(0.0, |o| o.weight)
    }

    /// Duration of a named clip, if it resolves.
    pub fn clip_duration(&self, name: &str) -> Option<f32> {
        self.clips.duration(name)
    }

    /// Whether the named overlay is the one currently active.
    pub fn is_overlay_active(&self, name: &str) -> bool {
        self.overlay
            .as_ref()
            .map_or(false, |o| o.name.eq_ignore_ascii_case(name) || {
                let ol = o.name.to_lowercase();
                let nl = name.to_lowercase();
                ol.contains(&nl) || nl.contains(&ol)
            })
    }

    /// Overlay progress as elapsed/duration, clamped to [0, 1].
    /// Returns 0.0 when no overlay is playing.
    pub fn overlay_elapsed_fraction(&self) -> f32 {
        match &self.overlay {
            Some(o) => (o.elapsed / o.duration).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    /// Whether any overlay action is currently playing.
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn clips(&self) -> &ClipLibrary {
        &self.clips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn blender() -> AnimationBlender {
        let mut clips = ClipLibrary::new();
        clips.insert("Slash", 1.0, LoopMode::Once);
        clips.insert("Fly", 2.0, LoopMode::Loop);
        AnimationBlender::new(clips)
    }

    fn settle(b: &mut AnimationBlender, ticks: usize) {
        for _ in 0..ticks {
            b.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_walk_plateau_pins_full_weight() {
        let mut b = blender();
        b.set_locomotion(2.0, false, false, false, false, false);
        settle(&mut b, 120);
        assert_relative_eq!(b.channel_weight(Channel::Walk), 1.0, epsilon = 1e-3);
        assert_relative_eq!(b.channel_weight(Channel::Idle), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_run_pinned_above_threshold() {
        let mut b = blender();
        b.set_locomotion(RUN_SPEED_MIN + 1.0, false, false, false, false, false);
        settle(&mut b, 120);
        assert_relative_eq!(b.channel_weight(Channel::Run), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_blocking_never_shows_run() {
        let mut b = blender();
        b.set_locomotion(RUN_SPEED_MIN + 1.0, false, false, false, false, true);
        settle(&mut b, 120);
        assert_relative_eq!(b.channel_weight(Channel::Walk), 1.0, epsilon = 1e-3);
        assert_relative_eq!(b.channel_weight(Channel::Run), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_overlay_unknown_clip_fails() {
        let mut b = blender();
        assert!(!b.play_overlay("Cartwheel", LoopMode::Once));
        assert!(b.play_overlay("Slash", LoopMode::Once));
    }

    #[test]
    fn test_overlay_is_exclusive() {
        let mut b = blender();
        assert!(b.play_overlay("Slash", LoopMode::Once));
        assert!(b.play_overlay("Fly", LoopMode::Loop));
        assert!(b.is_overlay_active("Fly"));
        assert!(!b.is_overlay_active("Slash"));
    }

    #[test]
    fn test_overlay_suppresses_locomotion() {
        let mut b = blender();
        b.set_locomotion(2.0, false, false, false, false, false);
        settle(&mut b, 60);
        b.play_overlay("Fly", LoopMode::Loop);
        settle(&mut b, 120);
        assert!(b.channel_weight(Channel::Walk) < 0.01);
        assert!(b.total_weight() > 0.9);
    }

    #[test]
    fn test_overlay_completion_polled() {
        let mut b = blender();
        b.play_overlay("Slash", LoopMode::Once);
        assert!(b.overlay_elapsed_fraction() < 0.01);
        for _ in 0..30 {
            b.update(1.0 / 60.0);
        }
        assert_relative_eq!(b.overlay_elapsed_fraction(), 0.5, epsilon = 0.02);
        for _ in 0..40 {
            b.update(1.0 / 60.0);
        }
        assert!(!b.has_overlay());
        assert_relative_eq!(b.overlay_elapsed_fraction(), 0.0);
    }

    #[test]
    fn test_back_window_restores_locomotion_before_end() {
        let mut b = blender();
        b.set_locomotion(2.0, false, false, false, false, false);
        b.play_overlay("Slash", LoopMode::Once);
        // advance into the back window but not past the end
        let frames = ((1.0 - OVERLAY_BACK_WINDOW * 0.5) * 60.0) as usize;
        for _ in 0..frames {
            b.update(1.0 / 60.0);
        }
        assert!(b.has_overlay());
        // locomotion is already fading back in
        assert!(b.channel_weight(Channel::Walk) > 0.0);
    }

    #[test]
    fn test_total_weight_never_below_floor() {
        let mut b = blender();
        b.set_locomotion(2.0, false, false, false, false, false);
        for _ in 0..600 {
            b.update(1.0 / 60.0);
            assert!(b.total_weight() >= WEIGHT_FLOOR - 1e-4);
        }
        // overlay start forces weights through a trough
        b.play_overlay("Slash", LoopMode::Once);
        for _ in 0..120 {
            b.update(1.0 / 60.0);
            assert!(b.total_weight() >= WEIGHT_FLOOR - 1e-4);
        }
    }

    #[test]
    fn test_blend_rate_clamped_to_one() {
        let mut b = blender();
        b.set_locomotion(2.0, false, false, false, false, false);
        // a huge dt must land exactly on target, never overshoot
        b.update(10.0);
        assert!(b.channel_weight(Channel::Walk) <= 1.0 + 1e-6);
    }
}
