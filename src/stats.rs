//! Hard-coded summary statistics shown on the stats slides.

/// Fixed numbers, nothing here is computed from real chat data
#[derive(Debug, Clone, PartialEq)]
pub struct DummyStats {
    pub top_user: &'static str,
    /// in display order
    pub user_counts: Vec<(&'static str, u32)>,
    pub top_words: Vec<(&'static str, u32)>,
}

impl Default for DummyStats {
    fn default() -> Self {
        DummyStats {
            top_user: "Rage Baiter Siziwe",
            user_counts: vec![
                ("Rage Baiter Siziwe", 1245),
                ("Angy", 987),
                ("Psycho", 654),
                ("Olwethu", 543),
                (" Trusted adult Simz", 432),
            ],
            top_words: vec![
                ("anegke", 287),
                ("gag", 256),
                ("define", 234),
                ("chommie", 156),
                ("rude", 142),
            ],
        }
    }
}

impl DummyStats {
    pub const TOP_WORD_LIMIT: usize = 5;

    pub fn top_user_line(&self) -> String {
        format!("👏 {} 👏", self.top_user)
    }

    pub fn user_breakdown(&self) -> String {
        self.user_counts
            .iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Highest counts first, ties keep their declared order
    pub fn top_words_line(&self) -> String {
        let mut words = self.top_words.clone();
        words.sort_by(|a, b| b.1.cmp(&a.1));
        words
            .iter()
            .take(Self::TOP_WORD_LIMIT)
            .map(|(word, count)| format!("{}: {}", word, count))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
