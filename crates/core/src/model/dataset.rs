use serde::Deserialize;
use std::collections::BTreeSet;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

//
// ─── PAYLOAD ───────────────────────────────────────────────────────────────────
//

/// Wire shape of a question file.
///
/// `questions` and `genres` are required; a file missing either fails to
/// deserialize and the loader substitutes the fallback dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetPayload {
    pub questions: Vec<Question>,
    pub genres: Vec<String>,
    #[serde(default)]
    pub metadata: Option<DatasetMetadata>,
}

/// Informational block carried by question files. Display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetMetadata {
    pub version: Option<String>,
    pub last_updated: Option<String>,
    pub total_questions: Option<u64>,
}

impl DatasetPayload {
    #[must_use]
    pub fn into_dataset(self) -> Dataset {
        Dataset {
            questions: self
                .questions
                .into_iter()
                .map(Question::normalized)
                .collect(),
            genres: self.genres,
            metadata: self.metadata,
        }
    }
}

//
// ─── DATASET ───────────────────────────────────────────────────────────────────
//

/// Per-genre mastery tally for the statistics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreStat {
    pub genre: String,
    pub total: usize,
    pub mastered: usize,
}

/// The loaded question set plus its genre list, in file order.
///
/// Genres are carried separately so the settings panel can offer empty genres
/// and keep the author's display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    questions: Vec<Question>,
    genres: Vec<String>,
    metadata: Option<DatasetMetadata>,
}

impl Dataset {
    #[must_use]
    pub fn new(questions: Vec<Question>, genres: Vec<String>) -> Self {
        Self {
            questions: questions.into_iter().map(Question::normalized).collect(),
            genres,
            metadata: None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&DatasetMetadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.questions.iter().any(|q| q.id == id)
    }

    #[must_use]
    pub fn genre_question_count(&self, genre: &str) -> usize {
        self.questions.iter().filter(|q| q.genre == genre).count()
    }

    #[must_use]
    pub fn subgenre_question_count(&self, genre: &str, subgenre: &str) -> usize {
        self.questions
            .iter()
            .filter(|q| q.genre == genre && q.subgenre.as_deref() == Some(subgenre))
            .count()
    }

    /// Unique subgenres of a genre, in first-appearance order.
    #[must_use]
    pub fn subgenres_of(&self, genre: &str) -> Vec<String> {
        let mut subgenres: Vec<String> = Vec::new();
        for question in &self.questions {
            if question.genre != genre {
                continue;
            }
            if let Some(subgenre) = question.subgenre.as_deref() {
                if !subgenres.iter().any(|s| s == subgenre) {
                    subgenres.push(subgenre.to_owned());
                }
            }
        }
        subgenres
    }

    /// Ids of every question belonging to one of the given genres.
    #[must_use]
    pub fn ids_in_genres(&self, genres: &[String]) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|q| genres.iter().any(|g| g == &q.genre))
            .map(|q| q.id)
            .collect()
    }

    /// Mastered/total tallies per genre, in genre list order.
    #[must_use]
    pub fn genre_stats(&self, mastered: &BTreeSet<QuestionId>) -> Vec<GenreStat> {
        self.genres
            .iter()
            .map(|genre| {
                let mut total = 0;
                let mut done = 0;
                for question in &self.questions {
                    if &question.genre == genre {
                        total += 1;
                        if mastered.contains(&question.id) {
                            done += 1;
                        }
                    }
                }
                GenreStat {
                    genre: genre.clone(),
                    total,
                    mastered: done,
                }
            })
            .collect()
    }

    /// Built-in dataset used when no question file can be loaded.
    #[must_use]
    pub fn fallback() -> Self {
        let questions = vec![
            Question::new(
                QuestionId::new(1),
                "英単語",
                Some("基礎"),
                "\"apple\" の意味は？",
                "りんご",
                "果物の名前。赤や青のものがある。",
            ),
            Question::new(
                QuestionId::new(2),
                "英単語",
                Some("基礎"),
                "\"beautiful\" の意味は？",
                "美しい",
                "人や物の見た目が魅力的なことを表す形容詞。",
            ),
            Question::new(
                QuestionId::new(3),
                "英単語",
                Some("基礎"),
                "\"coffee\" の意味は？",
                "コーヒー",
                "コーヒー豆から作られる飲み物。",
            ),
            Question::new(
                QuestionId::new(4),
                "日本史",
                Some("江戸時代"),
                "江戸幕府を開いた人物は？",
                "徳川家康",
                "1603年に征夷大将軍となり、江戸に幕府を開いた。",
            ),
            Question::new(
                QuestionId::new(5),
                "日本史",
                Some("江戸時代"),
                "江戸時代の身分制度を何というか？",
                "士農工商",
                "武士・農民・職人・商人の4つの身分に分けられた制度。",
            ),
            Question::new(
                QuestionId::new(6),
                "数学",
                Some("幾何"),
                "円周率πの近似値は？",
                "3.14159...",
                "円の直径に対する円周の比率を表す無理数。",
            ),
            Question::new(
                QuestionId::new(7),
                "数学",
                Some("基礎"),
                "2の10乗は？",
                "1024",
                "2を10回掛け合わせた数。コンピュータでよく使われる。",
            ),
        ];
        let genres = vec![
            "英単語".to_owned(),
            "日本史".to_owned(),
            "数学".to_owned(),
        ];
        Self::new(questions, genres)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_dataset() -> Dataset {
        Dataset::new(
            vec![
                Question::new(QuestionId::new(1), "語学", Some("動詞"), "q1", "a1", ""),
                Question::new(QuestionId::new(2), "語学", Some("名詞"), "q2", "a2", ""),
                Question::new(QuestionId::new(3), "語学", Some("動詞"), "q3", "a3", ""),
                Question::new(QuestionId::new(4), "歴史", None, "q4", "a4", ""),
            ],
            vec!["語学".to_owned(), "歴史".to_owned()],
        )
    }

    #[test]
    fn subgenres_keep_first_appearance_order() {
        let dataset = build_dataset();
        assert_eq!(dataset.subgenres_of("語学"), vec!["動詞", "名詞"]);
    }

    #[test]
    fn subgenres_empty_for_untagged_genre() {
        let dataset = build_dataset();
        assert!(dataset.subgenres_of("歴史").is_empty());
    }

    #[test]
    fn question_counts() {
        let dataset = build_dataset();
        assert_eq!(dataset.genre_question_count("語学"), 3);
        assert_eq!(dataset.genre_question_count("歴史"), 1);
        assert_eq!(dataset.subgenre_question_count("語学", "動詞"), 2);
        assert_eq!(dataset.subgenre_question_count("歴史", "動詞"), 0);
    }

    #[test]
    fn ids_in_genres_filters_by_genre() {
        let dataset = build_dataset();
        let ids = dataset.ids_in_genres(&["歴史".to_owned()]);
        assert_eq!(ids, vec![QuestionId::new(4)]);
    }

    #[test]
    fn genre_stats_follow_genre_order() {
        let dataset = build_dataset();
        let mastered: BTreeSet<QuestionId> =
            [QuestionId::new(1), QuestionId::new(3)].into_iter().collect();
        let stats = dataset.genre_stats(&mastered);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].genre, "語学");
        assert_eq!(stats[0].total, 3);
        assert_eq!(stats[0].mastered, 2);
        assert_eq!(stats[1].genre, "歴史");
        assert_eq!(stats[1].mastered, 0);
    }

    #[test]
    fn contains_known_ids() {
        let dataset = build_dataset();
        assert!(dataset.contains(QuestionId::new(2)));
        assert!(!dataset.contains(QuestionId::new(99)));
    }

    #[test]
    fn fallback_has_seven_questions_in_three_genres() {
        let dataset = Dataset::fallback();
        assert_eq!(dataset.total_questions(), 7);
        assert_eq!(dataset.genres(), ["英単語", "日本史", "数学"]);
        for (index, question) in dataset.questions().iter().enumerate() {
            assert_eq!(question.id, QuestionId::new(index as u64 + 1));
        }
    }

    #[test]
    fn payload_normalizes_blank_subgenres() {
        let payload = DatasetPayload {
            questions: vec![Question {
                id: QuestionId::new(1),
                genre: "語学".to_owned(),
                subgenre: Some("  ".to_owned()),
                prompt: "q".to_owned(),
                answer: "a".to_owned(),
                explanation: String::new(),
            }],
            genres: vec!["語学".to_owned()],
            metadata: None,
        };
        let dataset = payload.into_dataset();
        assert_eq!(dataset.questions()[0].subgenre, None);
    }
}
