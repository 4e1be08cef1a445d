use crate::catalog::{MetadataMap, QuestionBank};
use crate::model::Category;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed question data in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn read_metadata(path: &Path) -> Result<MetadataMap, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads both category files from `assets`. A file that cannot be used is
/// logged and contributes nothing; the game then runs on default prompts.
pub(crate) fn load_question_bank(assets: &Path) -> QuestionBank {
    let gb = load_category(assets, Category::Gb);
    let rf = load_category(assets, Category::Rf);
    QuestionBank::new(gb, rf)
}

fn load_category(assets: &Path, category: Category) -> MetadataMap {
    let path = assets.join(category.data_file());
    match read_metadata(&path) {
        Ok(map) => {
            info!(category = category.code(), entries = map.len(), "question data loaded");
            map
        }
        Err(e) => {
            warn!(category = category.code(), error = %e, "question data unavailable");
            MetadataMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::questions_for;
    use crate::model::Difficulty;

    const GB_JSON: &str = r#"{
        "1": {"question": "Miếng thịt nào an toàn?", "correct_answer": "assets/GB/GB_0_0.png"},
        "2": {"question": "Rau nào tươi?", "correct_answer": "assets/GB/GB_1_1.png"}
    }"#;

    #[test]
    fn reads_a_category_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("question_gb.json");
        fs::write(&path, GB_JSON).unwrap();

        let map = read_metadata(&path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["2"].correct_answer.as_deref(), Some("assets/GB/GB_1_1.png"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_metadata(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("question_rf.json");
        fs::write(&path, r#"["not", "a", "map"]"#).unwrap();
        assert!(matches!(read_metadata(&path), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn bank_survives_one_missing_category() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("question_gb.json"), GB_JSON).unwrap();

        let bank = load_question_bank(dir.path());
        assert_eq!(bank.len(), 2);

        let hard = questions_for(Difficulty::Hard);
        assert_eq!(bank.prompt_for(&hard[0]), "Miếng thịt nào an toàn?");
        assert!(bank.lookup(&hard[4]).is_none());
    }

    #[test]
    fn empty_assets_dir_yields_empty_bank() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_question_bank(dir.path()).len(), 0);
    }

    #[test]
    fn shipped_data_covers_the_catalog() {
        let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        let bank = load_question_bank(&assets);
        for d in Difficulty::ALL {
            for q in questions_for(d) {
                let m = bank.lookup(q).expect("every catalog entry has data");
                let correct = m.correct_answer.as_deref();
                assert!(correct == Some(q.true_image) || correct == Some(q.false_image));
            }
        }
    }
}
