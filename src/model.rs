use crate::config::Settings;
use crate::scoring::ResultSummary;
use crate::timer::Countdown;
use serde::Deserialize;

pub(crate) const QUESTION_SECONDS: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    Menu,
    Difficulty,
    Instructions,
    Settings,
    Game,
    Result,
}

impl Screen {
    pub(crate) const ALL: [Screen; 6] = [
        Screen::Menu,
        Screen::Difficulty,
        Screen::Instructions,
        Screen::Settings,
        Screen::Game,
        Screen::Result,
    ];

    pub(crate) fn id(self) -> &'static str {
        match self {
            Screen::Menu => "menu-screen",
            Screen::Difficulty => "difficulty-screen",
            Screen::Instructions => "instructions-screen",
            Screen::Settings => "settings-screen",
            Screen::Game => "game-screen",
            Screen::Result => "result-screen",
        }
    }

    pub(crate) fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub(crate) const ALL: [Difficulty; 3] =
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub(crate) fn total_questions(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 6, // 5 GB + 1 RF
            Difficulty::Hard => 8,   // 4 GB + 4 RF
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Dễ",
            Difficulty::Medium => "Trung bình",
            Difficulty::Hard => "Khó",
        }
    }
}

/// Question family. GB pairs are food-safety photos, RF pairs are
/// product-label authenticity photos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Category {
    Gb,
    Rf,
}

impl Category {
    pub(crate) fn code(self) -> &'static str {
        match self {
            Category::Gb => "GB",
            Category::Rf => "RF",
        }
    }

    pub(crate) fn data_file(self) -> &'static str {
        match self {
            Category::Gb => "question_gb.json",
            Category::Rf => "question_rf.json",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Question {
    pub(crate) ordinal: u8,
    pub(crate) category: Category,
    pub(crate) category_index: &'static str,
    pub(crate) true_image: &'static str,
    pub(crate) false_image: &'static str,
}

/// One entry of a category data file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct QuestionMetadata {
    #[serde(default)]
    pub(crate) question: String,
    #[serde(default)]
    pub(crate) correct_answer: Option<String>,
}

/// Which of the two images. The true image is always drawn on the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn from_choice(chose_true: bool) -> Self {
        if chose_true {
            Side::Left
        } else {
            Side::Right
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct QuestionView {
    pub(crate) number: usize,
    pub(crate) total: usize,
    pub(crate) category: Category,
    pub(crate) true_image: &'static str,
    pub(crate) false_image: &'static str,
    pub(crate) prompt: String,
    pub(crate) progress_percent: u8,
    pub(crate) score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AnswerFeedback {
    /// `None` when the countdown ran out before a pick.
    pub(crate) selected: Option<Side>,
    pub(crate) selected_correct: bool,
    pub(crate) correct_side: Option<Side>,
    pub(crate) points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ResultView {
    pub(crate) score: u32,
    pub(crate) correct_count: u32,
    pub(crate) total: usize,
    pub(crate) summary: ResultSummary,
}

#[derive(Clone, Debug)]
pub(crate) struct GameState {
    pub(crate) screen: Screen,
    pub(crate) difficulty: Difficulty,
    pub(crate) question_index: usize,
    pub(crate) score: u32,
    pub(crate) correct_count: u32,
    pub(crate) total_questions: usize,
    pub(crate) questions: Vec<Question>,
    pub(crate) timer: Countdown,
    pub(crate) answered: bool,
    pub(crate) settings: Settings,
    pub(crate) settings_cursor: usize,
    pub(crate) loading: bool,
    pub(crate) current: Option<QuestionView>,
    pub(crate) feedback: Option<AnswerFeedback>,
    pub(crate) explanation: Option<&'static str>,
    pub(crate) result: Option<ResultView>,
}

impl GameState {
    pub(crate) fn new(settings: Settings) -> Self {
        let difficulty = Difficulty::Easy;
        Self {
            screen: Screen::Menu,
            difficulty,
            question_index: 0,
            score: 0,
            correct_count: 0,
            total_questions: difficulty.total_questions(),
            questions: Vec::new(),
            timer: Countdown::new(QUESTION_SECONDS),
            answered: false,
            settings,
            settings_cursor: 0,
            loading: false,
            current: None,
            feedback: None,
            explanation: None,
            result: None,
        }
    }

    pub(crate) fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.total_questions = difficulty.total_questions();
    }

    /// Zeroes the per-game counters. Settings and difficulty survive.
    pub(crate) fn reset(&mut self) {
        self.timer.cancel();
        self.timer = Countdown::new(QUESTION_SECONDS);
        self.question_index = 0;
        self.score = 0;
        self.correct_count = 0;
        self.questions.clear();
        self.answered = false;
        self.current = None;
        self.feedback = None;
        self.explanation = None;
        self.result = None;
    }

    pub(crate) fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.question_index)
    }

    pub(crate) fn timer_remaining(&self) -> u8 {
        self.timer.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_ids_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(Screen::from_id(screen.id()), Some(screen));
        }
        assert_eq!(Screen::from_id("leaderboard-screen"), None);
        assert_eq!(Screen::from_id(""), None);
    }

    #[test]
    fn set_difficulty_recomputes_total() {
        let mut st = GameState::new(Settings::default());
        assert_eq!(st.total_questions, 4);
        st.set_difficulty(Difficulty::Hard);
        assert_eq!(st.difficulty, Difficulty::Hard);
        assert_eq!(st.total_questions, 8);
        st.set_difficulty(Difficulty::Medium);
        assert_eq!(st.total_questions, 6);
    }

    #[test]
    fn reset_keeps_settings_and_difficulty() {
        let mut settings = Settings::default();
        settings.sound = false;
        let mut st = GameState::new(settings.clone());
        st.set_difficulty(Difficulty::Medium);
        st.score = 42;
        st.correct_count = 3;
        st.question_index = 5;
        st.answered = true;

        st.reset();

        assert_eq!(st.score, 0);
        assert_eq!(st.correct_count, 0);
        assert_eq!(st.question_index, 0);
        assert!(!st.answered);
        assert_eq!(st.timer_remaining(), QUESTION_SECONDS);
        assert_eq!(st.difficulty, Difficulty::Medium);
        assert_eq!(st.settings, settings);
    }

    #[test]
    fn metadata_tolerates_missing_fields() {
        let m: QuestionMetadata = serde_json::from_str(r#"{"question": "Q?"}"#).unwrap();
        assert_eq!(m.question, "Q?");
        assert_eq!(m.correct_answer, None);

        let m: QuestionMetadata = serde_json::from_str("{}").unwrap();
        assert!(m.question.is_empty());
    }
}
