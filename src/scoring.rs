use crate::model::{Question, QuestionMetadata, Side};

pub(crate) const BASE_POINTS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Evaluation {
    pub(crate) is_correct: bool,
    pub(crate) points: u32,
}

impl Evaluation {
    /// A wrong pick, or any pick without a known answer.
    pub(crate) const MISSED: Evaluation = Evaluation {
        is_correct: false,
        points: 0,
    };
}

/// Scores one pick. Metadata without a correct answer never matches.
pub(crate) fn evaluate(
    question: &Question,
    metadata: Option<&QuestionMetadata>,
    chose_true: bool,
    remaining: u8,
) -> Evaluation {
    let picked = if chose_true {
        question.true_image
    } else {
        question.false_image
    };
    if correct_answer(metadata) != Some(picked) {
        return Evaluation::MISSED;
    }
    Evaluation {
        is_correct: true,
        points: BASE_POINTS + u32::from(remaining),
    }
}

pub(crate) fn correct_side(
    question: &Question,
    metadata: Option<&QuestionMetadata>,
) -> Option<Side> {
    match correct_answer(metadata) {
        Some(path) if path == question.true_image => Some(Side::Left),
        Some(path) if path == question.false_image => Some(Side::Right),
        _ => None,
    }
}

fn correct_answer(metadata: Option<&QuestionMetadata>) -> Option<&str> {
    metadata.and_then(|m| m.correct_answer.as_deref())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SoundCue {
    Success,
    Error,
}

impl SoundCue {
    /// Offsets in ms of each beep. Success walks C5-E5-G5.
    pub(crate) fn beeps_ms(self) -> &'static [u64] {
        match self {
            SoundCue::Success => &[0, 100, 200],
            SoundCue::Error => &[0],
        }
    }
}

/// Sound plus vibration pattern (alternating on/off ms).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FeedbackCue {
    pub(crate) sound: SoundCue,
    pub(crate) vibration: &'static [u64],
}

pub(crate) const CORRECT_CUE: FeedbackCue = FeedbackCue {
    sound: SoundCue::Success,
    vibration: &[100],
};

pub(crate) const INCORRECT_CUE: FeedbackCue = FeedbackCue {
    sound: SoundCue::Error,
    vibration: &[100, 50, 100],
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tier {
    Excellent,
    Good,
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ResultSummary {
    pub(crate) tier: Tier,
    pub(crate) percentage: u32,
    pub(crate) icon: &'static str,
    pub(crate) title: &'static str,
    pub(crate) message: &'static str,
    pub(crate) cue: FeedbackCue,
}

/// Whole-number percentage, rounded half up. Zero questions reads as 0%.
pub(crate) fn percentage(correct: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let total = total as u64;
    ((u64::from(correct) * 200 + total) / (total * 2)) as u32
}

/// Compares `correct / total >= pct / 100` without going through floats.
fn at_least(correct: u32, total: usize, pct: u64) -> bool {
    total > 0 && u64::from(correct) * 100 >= pct * total as u64
}

pub(crate) fn summarize(correct: u32, total: usize) -> ResultSummary {
    let (tier, icon, title, message, cue) = if at_least(correct, total, 80) {
        (
            Tier::Excellent,
            "🎉",
            "Xuất sắc!",
            "Bạn đã hiểu rất rõ về an toàn thực phẩm!",
            FeedbackCue {
                sound: SoundCue::Success,
                vibration: &[100, 50, 100, 50, 100],
            },
        )
    } else if at_least(correct, total, 60) {
        (
            Tier::Good,
            "👏",
            "Tốt lắm!",
            "Bạn đã có kiến thức tốt về an toàn thực phẩm!",
            FeedbackCue {
                sound: SoundCue::Success,
                vibration: &[100, 50, 100],
            },
        )
    } else {
        (
            Tier::Retry,
            "💪",
            "Cố gắng thêm!",
            "Hãy chơi lại để cải thiện kiến thức!",
            FeedbackCue {
                sound: SoundCue::Error,
                vibration: &[100, 50, 100],
            },
        )
    };
    ResultSummary {
        tier,
        percentage: percentage(correct, total),
        icon,
        title,
        message,
        cue,
    }
}
