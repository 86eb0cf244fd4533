// src/services/stats.rs
use crate::models::{DerivedStats, GeneratedAdRecord};
use std::collections::HashMap;

const RECENT_ACTIVITY_LIMIT: usize = 5;
const LOW_CREDIT_THRESHOLD: usize = 5;

impl DerivedStats {
    /// Pure projection over a snapshot of the ad history. Nothing is cached.
    pub fn project(records: &[GeneratedAdRecord], ceiling: usize) -> Self {
        let total_ads = records.len();
        let credits_remaining = ceiling.saturating_sub(total_ads);

        let mut recent_activity = records.to_vec();
        recent_activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

        DerivedStats {
            total_ads,
            credits_used: total_ads,
            credits_remaining,
            credit_ceiling: ceiling,
            favorite_style: favorite_style(records),
            total_downloads: total_ads,
            recent_activity,
            low_credits: credits_remaining > 0 && credits_remaining <= LOW_CREDIT_THRESHOLD,
            credits_exhausted: credits_remaining == 0,
        }
    }
}

/// Most frequent non-empty style. On a tie the style first seen latest wins.
fn favorite_style(records: &[GeneratedAdRecord]) -> Option<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for style in records.iter().map(|r| r.style.as_str()).filter(|s| !s.is_empty()) {
        let count = counts.entry(style).or_insert(0);
        if *count == 0 {
            order.push(style);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for style in order {
        let count = counts[style];
        match best {
            Some((_, best_count)) if best_count > count => {}
            _ => best = Some((style, count)),
        }
    }

    best.map(|(style, _)| style.to_string())
}
