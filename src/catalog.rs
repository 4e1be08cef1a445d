use crate::model::{Category, Difficulty, Question, QuestionMetadata};
use std::collections::HashMap;

pub(crate) const DEFAULT_PROMPT: &str = "Thực phẩm này có an toàn không?";

const fn gb(
    ordinal: u8,
    index: &'static str,
    true_image: &'static str,
    false_image: &'static str,
) -> Question {
    Question {
        ordinal,
        category: Category::Gb,
        category_index: index,
        true_image,
        false_image,
    }
}

const fn rf(
    ordinal: u8,
    index: &'static str,
    true_image: &'static str,
    false_image: &'static str,
) -> Question {
    Question {
        ordinal,
        category: Category::Rf,
        category_index: index,
        true_image,
        false_image,
    }
}

// Image pairs are positional: never shuffle these.
static EASY: [Question; 4] = [
    gb(1, "1", "assets/GB/GB_0_0.png", "assets/GB/GB_0_1.png"),
    gb(2, "2", "assets/GB/GB_1_0.png", "assets/GB/GB_1_1.png"),
    gb(3, "3", "assets/GB/GB_2_0.png", "assets/GB/GB_2_1.png"),
    gb(4, "4", "assets/GB/GB_3_0.png", "assets/GB/GB_3_1.png"),
];

static MEDIUM: [Question; 6] = [
    gb(1, "1", "assets/GB/GB_0_0.png", "assets/GB/GB_0_1.png"),
    gb(2, "2", "assets/GB/GB_1_0.png", "assets/GB/GB_1_1.png"),
    gb(3, "3", "assets/GB/GB_2_0.png", "assets/GB/GB_2_1.png"),
    gb(4, "4", "assets/GB/GB_3_0.png", "assets/GB/GB_3_1.png"),
    gb(5, "5", "assets/GB/GB_4_0.png", "assets/GB/GB_4_1.png"),
    rf(6, "1", "assets/RF/RF_0_0.png", "assets/RF/RF_0_1.png"),
];

static HARD: [Question; 8] = [
    gb(1, "1", "assets/GB/GB_0_0.png", "assets/GB/GB_0_1.png"),
    gb(2, "2", "assets/GB/GB_1_0.png", "assets/GB/GB_1_1.png"),
    gb(3, "3", "assets/GB/GB_2_0.png", "assets/GB/GB_2_1.png"),
    gb(4, "4", "assets/GB/GB_3_0.png", "assets/GB/GB_3_1.png"),
    rf(5, "1", "assets/RF/RF_0_0.png", "assets/RF/RF_0_1.png"),
    rf(6, "2", "assets/RF/RF_1_0.png", "assets/RF/RF_1_1.png"),
    rf(7, "3", "assets/RF/RF_2_0.png", "assets/RF/RF_2_1.png"),
    rf(8, "4", "assets/RF/RF_3_0.png", "assets/RF/RF_3_1.png"),
];

pub(crate) fn questions_for(difficulty: Difficulty) -> &'static [Question] {
    match difficulty {
        Difficulty::Easy => &EASY,
        Difficulty::Medium => &MEDIUM,
        Difficulty::Hard => &HARD,
    }
}

pub(crate) fn explanation_for(category: Category) -> &'static str {
    match category {
        Category::Gb => {
            "Hình ảnh bên trái có màu sắc tự nhiên, không có dấu hiệu hư hỏng và được chế biến \
             hợp vệ sinh. Hình ảnh bên phải có màu sắc bất thường, \
             có thể đã bị hỏng hoặc không an toàn."
        }
        Category::Rf => {
            "Hình ảnh bên trái có nhãn mác rõ ràng, còn hạn sử dụng và là hàng chính hãng. \
             Hình ảnh bên phải có dấu hiệu bất thường, có thể là hàng giả hoặc đã hết hạn."
        }
    }
}

pub(crate) type MetadataMap = HashMap<String, QuestionMetadata>;

/// Prompt text and answer keys for both categories, joined to catalog
/// entries by `(category, category_index)`.
#[derive(Clone, Debug, Default)]
pub(crate) struct QuestionBank {
    gb: MetadataMap,
    rf: MetadataMap,
}

impl QuestionBank {
    pub(crate) fn new(gb: MetadataMap, rf: MetadataMap) -> Self {
        Self { gb, rf }
    }

    pub(crate) fn lookup(&self, question: &Question) -> Option<&QuestionMetadata> {
        let map = match question.category {
            Category::Gb => &self.gb,
            Category::Rf => &self.rf,
        };
        map.get(question.category_index)
    }

    pub(crate) fn prompt_for(&self, question: &Question) -> &str {
        match self.lookup(question) {
            Some(m) if !m.question.is_empty() => &m.question,
            _ => DEFAULT_PROMPT,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.gb.len() + self.rf.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_sizes_match_difficulty() {
        for d in Difficulty::ALL {
            let qs = questions_for(d);
            assert_eq!(qs.len(), d.total_questions());
            assert!([4, 6, 8].contains(&qs.len()));
        }
    }

    #[test]
    fn ordinals_are_sequential() {
        for d in Difficulty::ALL {
            for (i, q) in questions_for(d).iter().enumerate() {
                assert_eq!(q.ordinal as usize, i + 1);
            }
        }
    }

    #[test]
    fn image_paths_follow_category_and_index() {
        for d in Difficulty::ALL {
            for q in questions_for(d) {
                let n: usize = q.category_index.parse().unwrap();
                let stem = format!("assets/{0}/{0}_{1}", q.category.code(), n - 1);
                assert_eq!(q.true_image, format!("{stem}_0.png"));
                assert_eq!(q.false_image, format!("{stem}_1.png"));
            }
        }
    }

    #[test]
    fn hard_tier_mixes_categories() {
        let hard = questions_for(Difficulty::Hard);
        let rf = hard.iter().filter(|q| q.category == Category::Rf).count();
        assert_eq!(rf, 4);
        let medium = questions_for(Difficulty::Medium);
        assert_eq!(medium.last().map(|q| q.category), Some(Category::Rf));
    }

    #[test]
    fn lookup_is_keyed_by_category() {
        let mut gb = MetadataMap::new();
        gb.insert(
            "1".to_string(),
            QuestionMetadata {
                question: "GB one".to_string(),
                correct_answer: Some("assets/GB/GB_0_0.png".to_string()),
            },
        );
        let bank = QuestionBank::new(gb, MetadataMap::new());
        let hard = questions_for(Difficulty::Hard);

        // GB 1 and RF 1 share an index but not a source
        assert_eq!(bank.prompt_for(&hard[0]), "GB one");
        assert!(bank.lookup(&hard[4]).is_none());
        assert_eq!(bank.prompt_for(&hard[4]), DEFAULT_PROMPT);
    }

    #[test]
    fn empty_prompt_falls_back_to_default() {
        let mut rf = MetadataMap::new();
        rf.insert("1".to_string(), QuestionMetadata::default());
        let bank = QuestionBank::new(MetadataMap::new(), rf);
        let q = &questions_for(Difficulty::Medium)[5];
        assert!(bank.lookup(q).is_some());
        assert_eq!(bank.prompt_for(q), DEFAULT_PROMPT);
    }
}
