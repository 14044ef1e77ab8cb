//! Mood Tracker Widget
//!
//! A fixed catalog of twelve moods with suggestions, and a short history of
//! recorded moods (newest first, at most [`HISTORY_LIMIT`] entries).

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{new_id, Widget, WidgetResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const HISTORY_KEY: &str = "history";

/// Maximum number of history entries kept
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodKind {
    Happy,
    Tired,
    Sleepy,
    Angry,
    Frustrated,
    Hopeless,
    Bored,
    Content,
    Thankful,
    Bitter,
    Confused,
    Sad,
}

impl MoodKind {
    /// Catalog order
    pub const ALL: [MoodKind; 12] = [
        MoodKind::Happy,
        MoodKind::Tired,
        MoodKind::Sleepy,
        MoodKind::Angry,
        MoodKind::Frustrated,
        MoodKind::Hopeless,
        MoodKind::Bored,
        MoodKind::Content,
        MoodKind::Thankful,
        MoodKind::Bitter,
        MoodKind::Confused,
        MoodKind::Sad,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MoodKind::Happy => "Happy",
            MoodKind::Tired => "Tired",
            MoodKind::Sleepy => "Sleepy",
            MoodKind::Angry => "Angry",
            MoodKind::Frustrated => "Frustrated",
            MoodKind::Hopeless => "Hopeless",
            MoodKind::Bored => "Bored",
            MoodKind::Content => "Content",
            MoodKind::Thankful => "Thankful",
            MoodKind::Bitter => "Bitter",
            MoodKind::Confused => "Confused",
            MoodKind::Sad => "Sad",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoodKind::Happy => "😊",
            MoodKind::Tired => "😴",
            MoodKind::Sleepy => "😪",
            MoodKind::Angry => "😠",
            MoodKind::Frustrated => "😤",
            MoodKind::Hopeless => "😔",
            MoodKind::Bored => "😑",
            MoodKind::Content => "😌",
            MoodKind::Thankful => "🙏",
            MoodKind::Bitter => "😒",
            MoodKind::Confused => "😕",
            MoodKind::Sad => "😢",
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str; 5] {
        match self {
            MoodKind::Happy => &[
                "Share your joy with someone special! 💕",
                "Take a walk and enjoy the sunshine ☀️",
                "Listen to your favorite upbeat music 🎵",
                "Do something creative like drawing or writing ✨",
                "Call a friend and spread the happiness 📞",
            ],
            MoodKind::Tired => &[
                "Take a 20-minute power nap 😴",
                "Drink some water and have a healthy snack 💧",
                "Do some gentle stretching or yoga 🧘‍♀️",
                "Step outside for fresh air 🌿",
                "Listen to calming music and rest your eyes 🎶",
            ],
            MoodKind::Sleepy => &[
                "Go to bed early tonight 🌙",
                "Avoid caffeine and screens before bed 📱",
                "Create a relaxing bedtime routine 🛁",
                "Try meditation or deep breathing exercises 🧘",
                "Make sure your room is cool and dark 🌃",
            ],
            MoodKind::Angry => &[
                "Write in your journal to express your feelings 📝",
                "Take 10 deep breaths and count to 10 🫁",
                "Go for a brisk walk or run 🏃‍♀️",
                "Listen to heavy music and let it out 🎸",
                "Talk to someone you trust about what's bothering you 💬",
            ],
            MoodKind::Frustrated => &[
                "Take a break and do something completely different ⏸️",
                "Break the problem into smaller, manageable pieces 🧩",
                "Ask for help from someone who might understand 🤝",
                "Do some physical activity to release tension 💪",
                "Practice patience and remind yourself this too shall pass ⏰",
            ],
            MoodKind::Hopeless => &[
                "Reach out to a trusted friend or family member 🤗",
                "Write down 3 things you're grateful for today 📋",
                "Consider talking to a professional counselor 💼",
                "Do one small thing that makes you feel accomplished ✅",
                "Remember that feelings are temporary and you're stronger than you think 💪",
            ],
            MoodKind::Bored => &[
                "Try a new hobby or learn something new 🎨",
                "Read a book or watch an educational video 📚",
                "Call a friend and plan something fun together 📞",
                "Go explore a new place in your city 🗺️",
                "Start a creative project you've been putting off 🎭",
            ],
            MoodKind::Content => &[
                "Savor this peaceful moment and be present 🧘‍♀️",
                "Share your contentment with someone you care about 💕",
                "Do something kind for someone else 🤝",
                "Take a moment to appreciate the little things 🌸",
                "Continue doing what's working for you ✨",
            ],
            MoodKind::Thankful => &[
                "Write a thank you note to someone special 💌",
                "Share your gratitude on social media 📱",
                "Do something nice for someone without expecting anything back 🤲",
                "Keep a gratitude journal and write daily 📖",
                "Express your thanks directly to the people you appreciate 🙏",
            ],
            MoodKind::Bitter => &[
                "Practice forgiveness, even if it's just for yourself 💚",
                "Write down your feelings and then let them go 📝",
                "Focus on what you can control and let go of the rest 🎯",
                "Do something kind for yourself today 🛍️",
                "Consider talking to someone about what's making you bitter 💬",
            ],
            MoodKind::Confused => &[
                "Take time to think through your options without pressure 🤔",
                "Write down your thoughts to organize them better 📝",
                "Ask questions and seek clarification from reliable sources ❓",
                "Talk to someone you trust about your confusion 💬",
                "Give yourself permission to not have all the answers right now ⏳",
            ],
            MoodKind::Sad => &[
                "Take a warm shower or bath to comfort yourself 🛁",
                "Eat your favorite comfort food 🍕",
                "Watch a funny movie or TV show 😄",
                "Call someone who makes you laugh 📞",
                "Do something gentle and nurturing for yourself 🤗",
            ],
        }
    }

    pub fn info(&self) -> MoodInfo {
        MoodInfo {
            id: *self,
            label: self.label(),
            emoji: self.emoji(),
            suggestions: self.suggestions().to_vec(),
        }
    }
}

/// Catalog entry as presented to clients
#[derive(Debug, Clone, Serialize)]
pub struct MoodInfo {
    pub id: MoodKind,
    pub label: &'static str,
    pub emoji: &'static str,
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    pub mood: MoodKind,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodCount {
    pub mood: MoodKind,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodStats {
    pub total_entries: usize,
    pub most_common: MoodKind,
    /// Share of `Happy` entries, rounded to a whole percent
    pub happy_percentage: u32,
    /// Counts in order of first appearance in the history
    pub counts: Vec<MoodCount>,
}

pub struct MoodTracker {
    ns: Namespace,
    history: Vec<MoodEntry>,
}

impl Widget for MoodTracker {
    const NAMESPACE: &'static str = "mood";

    fn reset(&mut self) {
        self.history.clear();
    }
}

impl MoodTracker {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let mut history: Vec<MoodEntry> = ns.load_or_default(HISTORY_KEY);
        history.truncate(HISTORY_LIMIT);

        tracing::info!(entries = history.len(), "Mood tracker mounted");
        Self { ns, history }
    }

    pub fn catalog() -> Vec<MoodInfo> {
        MoodKind::ALL.iter().map(MoodKind::info).collect()
    }

    /// History, newest first
    pub fn history(&self) -> &[MoodEntry] {
        &self.history
    }

    /// Record a mood, returning the new entry
    pub fn record(&mut self, mood: MoodKind) -> WidgetResult<MoodEntry> {
        let now = Utc::now();
        let entry = MoodEntry {
            id: new_id(),
            mood,
            timestamp: now,
            date: now.date_naive(),
        };

        let mut next = Vec::with_capacity(HISTORY_LIMIT);
        next.push(entry.clone());
        next.extend(self.history.iter().take(HISTORY_LIMIT - 1).cloned());

        self.ns.save(HISTORY_KEY, &next)?;
        self.history = next;

        tracing::info!(mood = mood.label(), "Mood recorded");
        Ok(entry)
    }

    /// `None` while the history is empty
    pub fn stats(&self) -> Option<MoodStats> {
        if self.history.is_empty() {
            return None;
        }

        let mut counts: Vec<MoodCount> = Vec::new();
        for entry in &self.history {
            match counts.iter_mut().find(|c| c.mood == entry.mood) {
                Some(c) => c.count += 1,
                None => counts.push(MoodCount {
                    mood: entry.mood,
                    count: 1,
                }),
            }
        }

        // Ties go to the mood seen later
        let most_common = counts
            .iter()
            .skip(1)
            .fold(&counts[0], |best, c| if best.count > c.count { best } else { c })
            .mood;

        let total = self.history.len();
        let happy = counts
            .iter()
            .find(|c| c.mood == MoodKind::Happy)
            .map(|c| c.count)
            .unwrap_or(0);
        let happy_percentage = (happy as f64 / total as f64 * 100.0).round() as u32;

        Some(MoodStats {
            total_entries: total,
            most_common,
            happy_percentage,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn tracker() -> (MoodTracker, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (MoodTracker::mount(Arc::clone(&store)), store)
    }

    #[test]
    fn test_catalog() {
        let catalog = MoodTracker::catalog();
        assert_eq!(catalog.len(), 12);
        assert!(catalog.iter().all(|m| m.suggestions.len() == 5));
        assert_eq!(catalog[0].label, "Happy");
        assert_eq!(catalog[11].emoji, "😢");
    }

    #[test]
    fn test_history_is_capped_newest_first() {
        let (mut tracker, store) = tracker();
        for _ in 0..12 {
            tracker.record(MoodKind::Tired).unwrap();
        }
        let latest = tracker.record(MoodKind::Sad).unwrap();

        assert_eq!(tracker.history().len(), HISTORY_LIMIT);
        assert_eq!(tracker.history()[0], latest);

        let remounted = MoodTracker::mount(store);
        assert_eq!(remounted.history().len(), HISTORY_LIMIT);
        assert_eq!(remounted.history()[0].mood, MoodKind::Sad);
    }

    #[test]
    fn test_random_records_stay_capped() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let (mut tracker, store) = tracker();
        let mut recorded: Vec<MoodKind> = Vec::new();

        for _ in 0..60 {
            let mood = MoodKind::ALL[rng.gen_range(0..MoodKind::ALL.len())];
            let entry = tracker.record(mood).unwrap();
            recorded.insert(0, mood);

            let history = tracker.history();
            assert!(history.len() <= HISTORY_LIMIT);
            assert_eq!(history.len(), recorded.len().min(HISTORY_LIMIT));
            assert_eq!(history[0], entry);

            let moods: Vec<MoodKind> = history.iter().map(|e| e.mood).collect();
            assert_eq!(moods, recorded[..moods.len()]);
            assert_eq!(tracker.stats().map(|s| s.total_entries), Some(history.len()));
        }

        let remounted = MoodTracker::mount(store);
        assert_eq!(remounted.history(), tracker.history());
    }

    #[test]
    fn test_stats_empty() {
        let (tracker, _) = tracker();
        assert!(tracker.stats().is_none());
    }

    #[test]
    fn test_stats() {
        let (mut tracker, _) = tracker();
        tracker.record(MoodKind::Happy).unwrap();
        tracker.record(MoodKind::Sad).unwrap();
        tracker.record(MoodKind::Happy).unwrap();

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.most_common, MoodKind::Happy);
        assert_eq!(stats.happy_percentage, 67);
    }

    #[test]
    fn test_most_common_tie_goes_to_later_mood() {
        let (mut tracker, _) = tracker();
        tracker.record(MoodKind::Sad).unwrap();
        tracker.record(MoodKind::Happy).unwrap();

        // Newest first: [Happy, Sad]; Sad is seen later and wins the tie
        let stats = tracker.stats().unwrap();
        assert_eq!(stats.counts[0].mood, MoodKind::Happy);
        assert_eq!(stats.most_common, MoodKind::Sad);
        assert_eq!(stats.happy_percentage, 50);
    }

    #[test]
    fn test_mood_serializes_lowercase() {
        let json = serde_json::to_string(&MoodKind::Thankful).unwrap();
        assert_eq!(json, "\"thankful\"");
    }
}
