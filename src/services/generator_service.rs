use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::difficulty::DifficultyLevel;
use crate::models::question::Question;
use crate::models::test::{GeneratedBy, Test};
use crate::services::catalog_service::CatalogService;
use crate::utils::time::Clock;

pub const QUESTIONS_PER_TEST: usize = 10;
pub const TEST_DURATION_SECONDS: u32 = 300;

/// How many questions each tier contributes to a test of the given difficulty.
pub fn tier_mix(difficulty: DifficultyLevel) -> &'static [(DifficultyLevel, usize)] {
    use DifficultyLevel::*;
    match difficulty {
        Easy => &[(Easy, 7), (Medium, 3)],
        Medium => &[(Easy, 3), (Medium, 5), (Intermediate, 2)],
        Intermediate => &[(Medium, 3), (Intermediate, 5), (Hard, 2)],
        Hard => &[(Intermediate, 2), (Hard, 8)],
    }
}

#[derive(Clone)]
pub struct GeneratorService {
    catalog: Arc<CatalogService>,
    clock: Arc<dyn Clock>,
}

impl GeneratorService {
    pub fn new(catalog: Arc<CatalogService>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock }
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn generate_test(
        &self,
        subject_id: &str,
        difficulty: DifficultyLevel,
        chapter_id: Option<&str>,
    ) -> Test {
        self.generate_test_with_rng(subject_id, difficulty, chapter_id, &mut rand::thread_rng())
    }

    pub fn generate_test_with_rng<R: Rng + ?Sized>(
        &self,
        subject_id: &str,
        difficulty: DifficultyLevel,
        chapter_id: Option<&str>,
        rng: &mut R,
    ) -> Test {
        let timestamp = self.clock.now().timestamp_millis();
        let subject = self.catalog.resolve(subject_id);

        let shuffled: Vec<Vec<&Question>> = DifficultyLevel::ALL
            .iter()
            .map(|tier| {
                let mut pool: Vec<&Question> = subject.questions.tier(*tier).iter().collect();
                pool.shuffle(rng);
                pool
            })
            .collect();

        let mut used: HashSet<&str> = HashSet::new();
        let mut questions: Vec<Question> = Vec::with_capacity(QUESTIONS_PER_TEST);

        for (tier, count) in tier_mix(difficulty) {
            for (i, q) in shuffled[*tier as usize].iter().take(*count).enumerate() {
                used.insert(q.id.as_str());
                questions.push(q.with_id(format!("{}-{}-{}", timestamp, tier, i)));
            }
        }

        if questions.len() < QUESTIONS_PER_TEST {
            let missing = QUESTIONS_PER_TEST - questions.len();
            let padding: Vec<Question> = shuffled[DifficultyLevel::Medium as usize]
                .iter()
                .filter(|q| !used.contains(q.id.as_str()))
                .take(missing)
                .enumerate()
                .map(|(i, q)| q.with_id(format!("{}-additional-{}", timestamp, i)))
                .collect();
            questions.extend(padding);
        }
        questions.truncate(QUESTIONS_PER_TEST);

        if questions.len() < QUESTIONS_PER_TEST {
            tracing::warn!(
                subject_id,
                %difficulty,
                collected = questions.len(),
                "question bank too small for a full test"
            );
        }

        questions.shuffle(rng);

        let chapter = select_chapter(&subject.entry.chapters, chapter_id, rng);

        tracing::info!(
            subject_id,
            %difficulty,
            chapter = %chapter,
            questions = questions.len(),
            "generated test"
        );

        Test {
            id: format!("{}-test-{}", subject_id, timestamp),
            subject_id: subject_id.to_string(),
            title: format!("{} {} Test", subject.entry.name, difficulty.label()),
            chapter,
            icon: subject.entry.test_icon.clone(),
            duration: TEST_DURATION_SECONDS,
            difficulty,
            questions,
            generated_by: GeneratedBy::Ai,
        }
    }
}

/// A 1-based numeric `chapter_id` within range picks that chapter; a numeric id
/// out of range picks the first chapter; anything else picks one at random.
/// Only the leading integer counts, so `"3abc"` is chapter 3 and `"2.5"` is 2.
pub fn select_chapter<R: Rng + ?Sized>(
    chapters: &[String],
    chapter_id: Option<&str>,
    rng: &mut R,
) -> String {
    let requested = chapter_id.and_then(leading_integer);
    let picked = match requested {
        Some(n) if n >= 1 && (n as usize) <= chapters.len() => chapters.get(n as usize - 1),
        Some(_) => chapters.first(),
        None => chapters.choose(rng),
    };
    picked.cloned().unwrap_or_default()
}

fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    // Too many digits for i64 is still a number, just out of range.
    let value = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Catalog, SubjectEntry, TieredQuestions};
    use crate::utils::time::MockClock;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicI64, Ordering};

    const TS: i64 = 1_700_000_000_000;

    fn fixed_clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Utc.timestamp_millis_opt(TS).unwrap());
        Arc::new(clock)
    }

    fn embedded_generator() -> GeneratorService {
        let catalog = Arc::new(CatalogService::embedded().unwrap());
        GeneratorService::new(catalog, fixed_clock())
    }

    fn questions(tier: DifficultyLevel, n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: format!("{}-q{}", tier, i),
                text: format!("{} question {}", tier, i),
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_answer: i % 3,
                difficulty: tier,
                explanation: None,
            })
            .collect()
    }

    fn generator_with_bank(easy: usize, medium: usize, intermediate: usize, hard: usize) -> GeneratorService {
        let catalog = Catalog {
            default_subject: "science".into(),
            subjects: vec![SubjectEntry {
                id: "science".into(),
                name: "Science".into(),
                description: String::new(),
                icon: "fa-atom".into(),
                color: String::new(),
                background_color: String::new(),
                icon_background_color: String::new(),
                chapters: vec!["Chapter 1: Food".into(), "Chapter 2: Fibre".into()],
                test_icon: "fa-atom".into(),
                questions: Some(TieredQuestions {
                    easy: questions(DifficultyLevel::Easy, easy),
                    medium: questions(DifficultyLevel::Medium, medium),
                    intermediate: questions(DifficultyLevel::Intermediate, intermediate),
                    hard: questions(DifficultyLevel::Hard, hard),
                }),
            }],
            trophies: vec![],
        };
        GeneratorService::new(Arc::new(CatalogService::new(catalog).unwrap()), fixed_clock())
    }

    fn count_tier(test: &Test, tier: DifficultyLevel) -> usize {
        test.questions.iter().filter(|q| q.difficulty == tier).count()
    }

    #[test]
    fn every_subject_and_difficulty_yields_ten_valid_questions() {
        let generator = embedded_generator();
        let mut rng = StdRng::seed_from_u64(7);
        for subject in ["math", "science", "english", "hindi", "social", "sanskrit"] {
            for difficulty in DifficultyLevel::ALL {
                let test = generator.generate_test_with_rng(subject, difficulty, None, &mut rng);
                assert_eq!(test.questions.len(), QUESTIONS_PER_TEST, "{} {}", subject, difficulty);
                assert!(test.questions.iter().all(Question::is_well_formed));
                let ids: HashSet<&str> = test.questions.iter().map(|q| q.id.as_str()).collect();
                assert_eq!(ids.len(), QUESTIONS_PER_TEST);
            }
        }
    }

    #[test]
    fn test_metadata_follows_subject() {
        let generator = embedded_generator();
        let test = generator.generate_test("math", DifficultyLevel::Intermediate, Some("3"));
        assert_eq!(test.id, format!("math-test-{}", TS));
        assert_eq!(test.title, "Mathematics Intermediate Test");
        assert_eq!(test.chapter, "Chapter 3: Playing with Numbers");
        assert_eq!(test.icon, "fa-calculator");
        assert_eq!(test.duration, 300);
        assert_eq!(test.generated_by, GeneratedBy::Ai);
        assert_eq!(test.difficulty, DifficultyLevel::Intermediate);
    }

    #[test]
    fn question_ids_are_timestamp_tier_and_position() {
        let generator = generator_with_bank(10, 10, 10, 10);
        let mut rng = StdRng::seed_from_u64(1);
        let test = generator.generate_test_with_rng("science", DifficultyLevel::Medium, None, &mut rng);
        let mut ids: Vec<String> = test.questions.iter().map(|q| q.id.clone()).collect();
        ids.sort();
        let mut expected: Vec<String> = [("easy", 3), ("medium", 5), ("intermediate", 2)]
            .iter()
            .flat_map(|(tier, n)| (0..*n).map(move |i| format!("{}-{}-{}", TS, tier, i)))
            .collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn mixes_match_requested_difficulty() {
        let generator = generator_with_bank(10, 10, 10, 10);
        let mut rng = StdRng::seed_from_u64(3);
        for difficulty in DifficultyLevel::ALL {
            let test = generator.generate_test_with_rng("science", difficulty, None, &mut rng);
            for (tier, count) in tier_mix(difficulty) {
                assert_eq!(count_tier(&test, *tier), *count, "{} from {}", difficulty, tier);
            }
        }
    }

    #[test]
    fn easy_test_draws_seven_from_easy_tier() {
        let generator = generator_with_bank(7, 5, 5, 5);
        let test = generator.generate_test("science", DifficultyLevel::Easy, None);
        assert_eq!(count_tier(&test, DifficultyLevel::Easy), 7);
        assert_eq!(test.questions.len(), 10);
    }

    #[test]
    fn starved_tier_is_padded_from_medium_without_duplicates() {
        let generator = generator_with_bank(5, 5, 5, 5);
        let mut rng = StdRng::seed_from_u64(11);
        let test = generator.generate_test_with_rng("science", DifficultyLevel::Easy, None, &mut rng);
        assert_eq!(test.questions.len(), 10);
        assert_eq!(count_tier(&test, DifficultyLevel::Easy), 5);
        assert_eq!(count_tier(&test, DifficultyLevel::Medium), 5);
        let additional = test
            .questions
            .iter()
            .filter(|q| q.id.starts_with(&format!("{}-additional-", TS)))
            .count();
        assert_eq!(additional, 2);
        let texts: HashSet<&str> = test.questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts.len(), 10);
    }

    #[test]
    fn exhausted_bank_yields_short_test() {
        let generator = generator_with_bank(2, 1, 0, 0);
        let test = generator.generate_test("science", DifficultyLevel::Easy, None);
        assert_eq!(test.questions.len(), 3);
    }

    #[test]
    fn empty_bank_yields_empty_test() {
        let generator = generator_with_bank(0, 0, 0, 0);
        let test = generator.generate_test("science", DifficultyLevel::Hard, Some("1"));
        assert!(test.questions.is_empty());
        assert_eq!(test.chapter, "Chapter 1: Food");
    }

    #[test]
    fn out_of_range_chapter_falls_back_to_first() {
        let generator = embedded_generator();
        let test = generator.generate_test("math", DifficultyLevel::Easy, Some("999"));
        assert_eq!(test.chapter, "Chapter 1: Knowing Our Numbers");
        let test = generator.generate_test("math", DifficultyLevel::Easy, Some("0"));
        assert_eq!(test.chapter, "Chapter 1: Knowing Our Numbers");
    }

    #[test]
    fn missing_or_non_numeric_chapter_is_random_from_list() {
        let generator = embedded_generator();
        let chapters = generator.catalog().chapters_for("english").to_vec();
        for chapter_id in [None, Some("poetry"), Some(".5"), Some("-")] {
            let test = generator.generate_test("english", DifficultyLevel::Medium, chapter_id);
            assert!(chapters.contains(&test.chapter));
        }
    }

    #[test]
    fn repeated_generation_reorders_questions() {
        let generator = generator_with_bank(10, 10, 10, 10);
        let mut rng = StdRng::seed_from_u64(99);
        let first = generator.generate_test_with_rng("science", DifficultyLevel::Medium, None, &mut rng);
        let second = generator.generate_test_with_rng("science", DifficultyLevel::Medium, None, &mut rng);
        let order = |t: &Test| t.questions.iter().map(|q| q.text.clone()).collect::<Vec<_>>();
        assert_ne!(order(&first), order(&second));
    }

    #[test]
    fn unknown_subject_keeps_requested_id_but_uses_default_bank() {
        let generator = embedded_generator();
        let test = generator.generate_test("astronomy", DifficultyLevel::Easy, None);
        assert_eq!(test.subject_id, "astronomy");
        assert_eq!(test.title, "Science Easy Test");
        assert_eq!(test.questions.len(), 10);
    }

    #[test]
    fn chapter_id_is_read_from_its_leading_digits() {
        let generator = embedded_generator();
        for chapter_id in ["3abc", " 3", "+3", "3.9"] {
            let test = generator.generate_test("math", DifficultyLevel::Easy, Some(chapter_id));
            assert_eq!(test.chapter, "Chapter 3: Playing with Numbers", "{:?}", chapter_id);
        }
        let test = generator.generate_test("math", DifficultyLevel::Easy, Some("2.5"));
        assert_eq!(test.chapter, "Chapter 2: Whole Numbers");
        for chapter_id in ["-2", "99999999999999999999999"] {
            let test = generator.generate_test("math", DifficultyLevel::Easy, Some(chapter_id));
            assert_eq!(test.chapter, "Chapter 1: Knowing Our Numbers", "{:?}", chapter_id);
        }
    }

    #[test]
    fn repeated_generation_with_advancing_clock_gets_fresh_ids() {
        let ticks = Arc::new(AtomicI64::new(0));
        let mut clock = MockClock::new();
        clock.expect_now().returning(move || {
            let n = ticks.fetch_add(1, Ordering::SeqCst);
            Utc.timestamp_millis_opt(TS + n * 1_000).unwrap()
        });
        let catalog = Arc::new(CatalogService::embedded().unwrap());
        let generator = GeneratorService::new(catalog, Arc::new(clock));

        let first = generator.generate_test("science", DifficultyLevel::Medium, None);
        let second = generator.generate_test("science", DifficultyLevel::Medium, None);

        assert_eq!(first.id, format!("science-test-{}", TS));
        assert_eq!(second.id, format!("science-test-{}", TS + 1_000));
        let first_ids: HashSet<&str> = first.questions.iter().map(|q| q.id.as_str()).collect();
        assert!(second
            .questions
            .iter()
            .all(|q| !first_ids.contains(q.id.as_str())));
        assert!(second
            .questions
            .iter()
            .all(|q| q.id.starts_with(&format!("{}-", TS + 1_000))));
    }
}
