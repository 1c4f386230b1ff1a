//! Player progress persistence: best score and daily play credits.
//!
//! Persisted to LocalStorage on wasm; native builds start from defaults and
//! keep everything in memory. All the rules (record detection, the daily
//! credit refresh, credit consumption) live on [`Progress`] with the current
//! date passed in, so they are testable without a browser.

use serde::{Deserialize, Serialize};

/// Credits granted at the start of each day
pub const DAILY_CREDITS: u32 = 3;

/// Persistent player progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub high_score: u64,
    pub credits: u32,
    /// Date string of the last credit refresh; credits reset when it
    /// no longer matches today
    pub last_credit_date: String,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            high_score: 0,
            credits: DAILY_CREDITS,
            last_credit_date: String::new(),
        }
    }
}

impl Progress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "spacesnake_progress";

    /// Record a finished run's score. Returns true when it set a new record.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            log::info!("new high score: {score}");
            return true;
        }
        false
    }

    /// Reset credits if `today` differs from the last refresh date, then
    /// return how many are left.
    pub fn refresh_credits(&mut self, today: &str) -> u32 {
        if self.last_credit_date != today {
            self.credits = DAILY_CREDITS;
            self.last_credit_date = today.to_string();
            log::info!("credits reset to {DAILY_CREDITS} for {today}");
        }
        self.credits
    }

    /// Spend one credit. Returns false when none are left.
    pub fn use_credit(&mut self, today: &str) -> bool {
        self.refresh_credits(today);
        if self.credits == 0 {
            return false;
        }
        self.credits -= 1;
        log::info!("credit used, {} remaining", self.credits);
        true
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(progress) = serde_json::from_str::<Progress>(&json) {
                    log::info!("loaded progress (high score {})", progress.high_score);
                    return progress;
                }
            }
        }

        log::info!("no saved progress, starting fresh");
        Self::default()
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("progress saved (high score {})", self.high_score);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Today's date string for the credit refresh (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    js_sys::Date::new_0().to_date_string().into()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    // Native builds have no daily cycle; a fixed key means credits only
    // reset when the process restarts
    "native".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_score_only_on_improvement() {
        let mut progress = Progress::default();
        assert!(progress.record_score(100));
        assert!(!progress.record_score(100));
        assert!(!progress.record_score(50));
        assert!(progress.record_score(101));
        assert_eq!(progress.high_score, 101);
    }

    #[test]
    fn test_new_record_routes_high_score_cue() {
        use crate::SoundCue;

        let mut progress = Progress::default();
        progress.record_score(500);

        // The embedder decides the cue at the game-over boundary, off the
        // record flag
        let cue_for = |progress: &mut Progress, score| {
            if progress.record_score(score) {
                Some(SoundCue::NewHighScore)
            } else {
                None
            }
        };
        assert_eq!(cue_for(&mut progress, 800), Some(SoundCue::NewHighScore));
        assert_eq!(cue_for(&mut progress, 300), None);
    }

    #[test]
    fn test_credits_reset_on_new_day() {
        let mut progress = Progress::default();
        assert!(progress.use_credit("Mon Jan 01 2026"));
        assert!(progress.use_credit("Mon Jan 01 2026"));
        assert!(progress.use_credit("Mon Jan 01 2026"));
        assert!(!progress.use_credit("Mon Jan 01 2026"));

        // New day refills the pool
        assert_eq!(progress.refresh_credits("Tue Jan 02 2026"), DAILY_CREDITS);
        assert!(progress.use_credit("Tue Jan 02 2026"));
    }

    #[test]
    fn test_same_day_refresh_keeps_spent_credits() {
        let mut progress = Progress::default();
        assert!(progress.use_credit("Mon Jan 01 2026"));
        assert_eq!(progress.refresh_credits("Mon Jan 01 2026"), DAILY_CREDITS - 1);
    }

    #[test]
    fn test_progress_round_trips_through_json() {
        let mut progress = Progress::default();
        progress.record_score(4200);
        progress.use_credit("Mon Jan 01 2026");

        let json = serde_json::to_string(&progress).unwrap();
        let back: Progress = serde_json::from_str(&json).unwrap();
        assert_eq!(back.high_score, 4200);
        assert_eq!(back.credits, DAILY_CREDITS - 1);
    }
}
