use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use shared_config::AppConfig;

use crate::models::{BankError, DoshaOption, DoshaOptions, Question, QuestionBank, QuestionCategory};

fn question(
    id: &str,
    category: QuestionCategory,
    prompt: &str,
    vata: (&str, u32),
    pitta: (&str, u32),
    kapha: (&str, u32),
) -> Question {
    Question {
        id: id.to_string(),
        category,
        prompt: prompt.to_string(),
        options: DoshaOptions {
            vata: DoshaOption::new(vata.0, vata.1),
            pitta: DoshaOption::new(pitta.0, pitta.1),
            kapha: DoshaOption::new(kapha.0, kapha.1),
        },
    }
}

fn standard_questions() -> Vec<Question> {
    use QuestionCategory::*;

    vec![
        // Physical characteristics
        question(
            "q1",
            Physical,
            "What best describes your body build?",
            ("Thin, light frame, difficulty gaining weight", 3),
            ("Medium build, muscular, moderate weight gain/loss", 3),
            ("Large frame, heavy build, gains weight easily", 3),
        ),
        question(
            "q2",
            Physical,
            "How would you describe your skin?",
            ("Dry, rough, cool to touch, prone to wrinkles", 3),
            ("Warm, oily, prone to rashes and irritation", 3),
            ("Moist, smooth, cool, thick, prone to congestion", 3),
        ),
        question(
            "q3",
            Physical,
            "What is your hair type?",
            ("Dry, brittle, frizzy, thin", 2),
            ("Fine, oily, early graying or balding, reddish tint", 2),
            ("Thick, lustrous, oily, wavy, strong", 2),
        ),
        // Physiological patterns
        question(
            "q4",
            Physiological,
            "How is your appetite?",
            ("Irregular, sometimes forget to eat, variable portions", 3),
            ("Strong, regular, get irritable when hungry", 3),
            ("Steady but mild, can skip meals easily", 3),
        ),
        question(
            "q5",
            Physiological,
            "How is your digestion?",
            ("Irregular, prone to gas, bloating, constipation", 3),
            ("Strong, prone to acidity, loose stools when upset", 3),
            ("Slow, heavy feeling after meals, mucus formation", 3),
        ),
        question(
            "q6",
            Physiological,
            "What are your sleep patterns?",
            ("Light sleeper, restless, hard to fall asleep", 3),
            ("Moderate sleep, wake up refreshed, vivid dreams", 3),
            ("Deep, long sleep, hard to wake up, feel groggy", 3),
        ),
        // Mental and emotional traits
        question(
            "q7",
            Mental,
            "How do you handle stress?",
            ("Anxious, worried, scattered thoughts", 3),
            ("Irritable, impatient, angry outbursts", 3),
            ("Withdrawn, stubborn, difficulty with change", 3),
        ),
        question(
            "q8",
            Mental,
            "How is your memory?",
            ("Quick to learn, quick to forget, scattered", 2),
            ("Sharp, precise, good at details", 2),
            ("Slow to learn but excellent long-term retention", 2),
        ),
        question(
            "q9",
            Mental,
            "How do you make decisions?",
            ("Quickly but change mind often, indecisive", 2),
            ("Decisively, logically, goal-oriented", 2),
            ("Slowly after careful consideration, stick to decisions", 2),
        ),
        // Lifestyle preferences
        question(
            "q10",
            Lifestyle,
            "What climate do you prefer?",
            ("Warm, humid, dislike cold and wind", 2),
            ("Cool, dry, dislike heat and humidity", 2),
            ("Warm, dry, dislike cold and damp", 2),
        ),
        question(
            "q11",
            Lifestyle,
            "What type of exercise do you prefer?",
            ("Gentle, varied, yoga, walking, dancing", 2),
            ("Moderate intensity, competitive sports, swimming", 2),
            ("Vigorous, regular routine, weight training, running", 2),
        ),
        // Current health status
        question(
            "q12",
            Health,
            "What health issues do you commonly experience?",
            ("Anxiety, insomnia, joint pain, digestive irregularity", 3),
            ("Acidity, skin problems, anger issues, inflammation", 3),
            ("Weight gain, congestion, lethargy, depression", 3),
        ),
    ]
}

impl QuestionBank {
    /// The twelve-question prakriti assessment shipped with the platform.
    pub fn standard() -> Result<Self, BankError> {
        Self::new(standard_questions())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading question bank {}", path.display()))?;
        let bank = serde_json::from_str(&raw)
            .with_context(|| format!("parsing question bank {}", path.display()))?;
        Ok(bank)
    }
}

/// Resolves the bank for this process: the configured file if one is set,
/// otherwise the standard bank.
pub fn load_question_bank(config: &AppConfig) -> Result<QuestionBank> {
    let bank = match &config.question_bank_path {
        Some(path) => {
            info!("Loading prakriti question bank from {}", path.display());
            QuestionBank::from_json_file(path)?
        }
        None => QuestionBank::standard()?,
    };

    info!("Question bank ready with {} questions", bank.len());
    Ok(bank)
}
