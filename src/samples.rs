use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;

use crate::acquire::{Acquired, Source};
use crate::extract::normalize_file_text;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// A practice text shipped inside the binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub name: String,
    pub text: String,
}

impl From<Passage> for Acquired {
    fn from(passage: Passage) -> Self {
        Acquired {
            source: Source::Sample(passage.name),
            text: passage.text,
        }
    }
}

/// All bundled passages, normalized, sorted by name.
pub fn passages() -> Vec<Passage> {
    PASSAGE_DIR
        .files()
        .filter(|file| file.path().extension().is_some_and(|ext| ext == "txt"))
        .filter_map(|file| {
            let name = file.path().file_stem()?.to_string_lossy().into_owned();
            let text = normalize_file_text(file.contents_utf8()?).ok()?;
            Some(Passage { name, text })
        })
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect()
}

pub fn random_passage() -> Option<Passage> {
    passages().choose(&mut rand::thread_rng()).cloned()
}

/// A random passage whose text differs from `current`, if there is one.
pub fn random_passage_except(current: &str) -> Option<Passage> {
    let others: Vec<Passage> = passages()
        .into_iter()
        .filter(|p| p.text != current)
        .collect();
    match others.choose(&mut rand::thread_rng()) {
        Some(passage) => Some(passage.clone()),
        None => random_passage(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passages_are_bundled_and_normalized() {
        let all = passages();
        assert!(all.len() >= 2);
        for passage in &all {
            assert!(!passage.text.is_empty());
            assert!(!passage.text.contains('\n'));
            assert!(!passage.text.contains("  "));
        }
        let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"harbor"));
    }

    #[test]
    fn test_random_passage_except_picks_another() {
        let all = passages();
        let current = &all[0].text;
        for _ in 0..10 {
            let next = random_passage_except(current).unwrap();
            assert_ne!(&next.text, current);
        }
    }

    #[test]
    fn test_passage_into_acquired() {
        let acquired: Acquired = Passage {
            name: "tide".into(),
            text: "water".into(),
        }
        .into();
        assert_eq!(acquired.source, Source::Sample("tide".into()));
        assert_eq!(acquired.text, "water");
    }
}
