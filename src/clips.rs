//! Named animation clip lookup.
//!
//! The animation-data collaborator is reduced to the queries combat logic
//! needs: does this clip exist, how long is it, does it loop. A miss runs a
//! heuristic fallback search (case-insensitive, then substring) before the
//! caller degrades to an unsynchronized instant effect.

use std::collections::HashMap;

/// How an overlay clip behaves when its time runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
}

/// Metadata for a single named clip.
#[derive(Debug, Clone, Copy)]
pub struct ClipInfo {
    pub duration: f32,
    pub loop_mode: LoopMode,
}

/// Clip table for one actor's rig.
#[derive(Debug, Default, Clone)]
pub struct ClipLibrary {
    clips: HashMap<String, ClipInfo>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, duration: f32, loop_mode: LoopMode) {
        self.clips.insert(
            name.to_string(),
            ClipInfo {
                duration,
                loop_mode,
            },
        );
    }

    /// Resolve a clip by name, trying exact match, then case-insensitive,
    /// then substring containment in either direction.
    pub fn resolve(&self, name: &str) -> Option<(&str, ClipInfo)> {
        if let Some((k, v)) = self.clips.get_key_value(name) {
            return Some((k.as_str(), *v));
        }
        let lower = name.to_lowercase();
        if let Some((k, v)) = self
            .clips
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
        {
            return Some((k.as_str(), *v));
        }
        self.clips
            .iter()
            .find(|(k, _)| {
                let kl = k.to_lowercase();
                kl.contains(&lower) || lower.contains(&kl)
            })
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Clip duration in seconds, if the clip resolves.
    pub fn duration(&self, name: &str) -> Option<f32> {
        self.resolve(name).map(|(_, info)| info.duration)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}
