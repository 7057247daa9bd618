//! # Insight Derivation
//!
//! Pure, stateless transforms over the mood history. No I/O, cheap enough
//! to call on every render. The thresholds are heuristics tuned for a demo
//! journal, not statistics; treat them as configuration.

use chrono::{DateTime, Timelike};
use shared::{is_negative_mood, MoodEntry};
use std::collections::HashMap;

/// Below this many entries the derivation only emits the placeholder
pub const MIN_ENTRIES_FOR_INSIGHTS: usize = 3;
/// A bucket's dominant negative mood must beat this count to be reported
pub const BUCKET_MOOD_THRESHOLD: usize = 2;
/// A tag's dominant mood must beat this count to be reported
pub const TAG_MOOD_THRESHOLD: usize = 1;
/// At most this many sentences are emitted
pub const MAX_INSIGHTS: usize = 3;

/// Shown until enough entries exist to derive anything
pub const PLACEHOLDER_INSIGHT: &str =
    "Log a few more moments to unlock your personal patterns.";
/// Shown when nothing crosses a threshold
pub const BALANCED_INSIGHT: &str =
    "Your moods have felt balanced lately. Keep checking in with yourself.";

/// Part of day an entry falls into, by its local clock hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
    Unknown,
}

impl TimeOfDay {
    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
            TimeOfDay::Unknown => "Unknown",
        }
    }

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    /// Classify an RFC 3339 timestamp; anything unparseable is Unknown
    pub fn from_timestamp(date: &str) -> Self {
        match DateTime::parse_from_rfc3339(date) {
            Ok(dt) => Self::from_hour(dt.hour()),
            Err(_) => TimeOfDay::Unknown,
        }
    }
}

/// Mean lifestyle metrics over the entries that carry them
#[derive(Debug, Clone, PartialEq)]
pub struct LifestyleAverages {
    pub sleep_hours: f64,
    pub water_ounces: f64,
    /// Total logged entries, with or without lifestyle data
    pub entries_logged: usize,
}

/// Average sleep and hydration across entries with lifestyle data
///
/// Entries without lifestyle data stay out of the denominator; with none at
/// all, the averages are zero.
pub fn lifestyle_averages(moods: &[MoodEntry]) -> LifestyleAverages {
    let tracked: Vec<_> = moods.iter().filter_map(|m| m.lifestyle.as_ref()).collect();

    let (sleep_hours, water_ounces) = if tracked.is_empty() {
        (0.0, 0.0)
    } else {
        let n = tracked.len() as f64;
        (
            tracked.iter().map(|l| l.sleep_hours).sum::<f64>() / n,
            tracked.iter().map(|l| l.water_ounces).sum::<f64>() / n,
        )
    };

    LifestyleAverages {
        sleep_hours,
        water_ounces,
        entries_logged: moods.len(),
    }
}

/// Derive up to [`MAX_INSIGHTS`] observation sentences from the history
pub fn derive_insights(moods: &[MoodEntry]) -> Vec<String> {
    if moods.len() < MIN_ENTRIES_FOR_INSIGHTS {
        return vec![PLACEHOLDER_INSIGHT.to_string()];
    }

    let mut sentences = Vec::new();

    // Mood counts per part of day
    let mut bucket_counts: HashMap<(TimeOfDay, &str), usize> = HashMap::new();
    for entry in moods {
        let bucket = TimeOfDay::from_timestamp(&entry.date);
        if bucket != TimeOfDay::Unknown {
            *bucket_counts.entry((bucket, entry.mood.as_str())).or_default() += 1;
        }
    }

    for bucket in [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ] {
        let dominant = bucket_counts
            .iter()
            .filter(|((b, _), _)| *b == bucket)
            .max_by_key(|&(&(_, mood), &count)| (count, mood));

        if let Some((&(_, mood), &count)) = dominant {
            if is_negative_mood(mood) && count > BUCKET_MOOD_THRESHOLD {
                sentences.push(format!(
                    "{} moments show up most in the {} for you.",
                    mood,
                    bucket.label()
                ));
            }
        }
    }

    // Mood counts per tag, tags kept in first-appearance order
    let mut seen_tags: Vec<&str> = Vec::new();
    let mut tag_counts: HashMap<(&str, &str), usize> = HashMap::new();
    for entry in moods {
        for tag in &entry.tags {
            if !seen_tags.contains(&tag.as_str()) {
                seen_tags.push(tag.as_str());
            }
            *tag_counts.entry((tag.as_str(), entry.mood.as_str())).or_default() += 1;
        }
    }

    for tag in seen_tags {
        let dominant = tag_counts
            .iter()
            .filter(|((t, _), _)| *t == tag)
            .max_by_key(|&(&(_, mood), &count)| (count, mood));

        if let Some((&(_, mood), &count)) = dominant {
            if count > TAG_MOOD_THRESHOLD {
                sentences.push(format!("{} days often come with {} check-ins.", tag, mood));
            }
        }
    }

    sentences.truncate(MAX_INSIGHTS);
    if sentences.is_empty() {
        sentences.push(BALANCED_INSIGHT.to_string());
    }
    sentences
}
