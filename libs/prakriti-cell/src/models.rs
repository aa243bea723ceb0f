use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One of the three constitutional categories.
///
/// Declaration order is significant: when two doshas score equally the
/// earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

impl Dosha {
    /// All doshas in tie-break priority order.
    pub const ALL: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    pub fn name(self) -> &'static str {
        match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
        }
    }

    /// Fixed guidance for a person whose dominant dosha is `self`.
    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            Dosha::Vata => &[
                "Maintain regular daily routines and meal times",
                "Choose warm, cooked, and nourishing foods",
                "Practice gentle yoga and meditation to calm the nervous system",
                "Get adequate rest and avoid overstimulation",
                "Use warm oil massages (Abhyanga) regularly",
            ],
            Dosha::Pitta => &[
                "Keep cool and avoid excessive heat and sun exposure",
                "Eat cooling foods and avoid spicy, fried foods",
                "Practice moderate exercise, preferably in cool environments",
                "Manage stress and avoid perfectionist tendencies",
                "Include cooling herbs like coriander and fennel in your diet",
            ],
            Dosha::Kapha => &[
                "Engage in regular vigorous exercise to boost metabolism",
                "Choose light, warm, and spicy foods; avoid heavy, oily foods",
                "Wake up early and avoid excessive sleep",
                "Keep warm and dry; avoid cold, damp environments",
                "Practice energizing breathing exercises (Pranayama)",
            ],
        }
    }

    pub fn description(self) -> DoshaDescription {
        match self {
            Dosha::Vata => DoshaDescription {
                dosha: self,
                name: "Vata",
                element: "Air + Space",
                characteristics: "Movement, creativity, communication",
                physical_traits: "Light build, dry skin, cold hands/feet",
                mental_traits: "Quick thinking, creative, enthusiastic",
                balance_state: "Energetic, creative, flexible",
                imbalance_state: "Anxious, restless, scattered",
            },
            Dosha::Pitta => DoshaDescription {
                dosha: self,
                name: "Pitta",
                element: "Fire + Water",
                characteristics: "Transformation, intelligence, leadership",
                physical_traits: "Medium build, warm body, sharp features",
                mental_traits: "Focused, ambitious, organized",
                balance_state: "Confident, intelligent, goal-oriented",
                imbalance_state: "Irritable, impatient, critical",
            },
            Dosha::Kapha => DoshaDescription {
                dosha: self,
                name: "Kapha",
                element: "Earth + Water",
                characteristics: "Stability, strength, endurance",
                physical_traits: "Solid build, smooth skin, thick hair",
                mental_traits: "Calm, patient, loyal",
                balance_state: "Stable, compassionate, grounded",
                imbalance_state: "Lethargic, stubborn, possessive",
            },
        }
    }
}

impl fmt::Display for Dosha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dosha: {0}")]
pub struct UnknownDosha(pub String);

impl FromStr for Dosha {
    type Err = UnknownDosha;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vata" => Ok(Dosha::Vata),
            "pitta" => Ok(Dosha::Pitta),
            "kapha" => Ok(Dosha::Kapha),
            _ => Err(UnknownDosha(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoshaDescription {
    pub dosha: Dosha,
    pub name: &'static str,
    pub element: &'static str,
    pub characteristics: &'static str,
    pub physical_traits: &'static str,
    pub mental_traits: &'static str,
    pub balance_state: &'static str,
    pub imbalance_state: &'static str,
}

/// Display grouping for questions; has no effect on scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Physical,
    Physiological,
    Mental,
    Lifestyle,
    Health,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoshaOption {
    pub text: String,
    pub weight: u32,
}

impl DoshaOption {
    pub fn new(text: impl Into<String>, weight: u32) -> Self {
        Self { text: text.into(), weight }
    }
}

/// Exactly one answer option per dosha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoshaOptions {
    pub vata: DoshaOption,
    pub pitta: DoshaOption,
    pub kapha: DoshaOption,
}

impl DoshaOptions {
    pub fn option(&self, dosha: Dosha) -> &DoshaOption {
        match dosha {
            Dosha::Vata => &self.vata,
            Dosha::Pitta => &self.pitta,
            Dosha::Kapha => &self.kapha,
        }
    }

    pub fn weight(&self, dosha: Dosha) -> u32 {
        self.option(dosha).weight
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category: QuestionCategory,
    pub prompt: String,
    pub options: DoshaOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("question bank must contain at least one question")]
    Empty,

    #[error("question at position {0} has an empty id")]
    EmptyId(usize),

    #[error("duplicate question id: {0}")]
    DuplicateId(String),

    #[error("question {question_id} gives {dosha} a weight of 0; weights must be at least 1")]
    ZeroWeight { question_id: String, dosha: Dosha },
}

/// Validated, ordered, read-only set of assessment questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question.id.trim().is_empty() {
                return Err(BankError::EmptyId(position));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(BankError::DuplicateId(question.id.clone()));
            }
            for dosha in Dosha::ALL {
                if question.options.weight(dosha) == 0 {
                    return Err(BankError::ZeroWeight {
                        question_id: question.id.clone(),
                        dosha,
                    });
                }
            }
        }

        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl TryFrom<Vec<Question>> for QuestionBank {
    type Error = BankError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<QuestionBank> for Vec<Question> {
    fn from(bank: QuestionBank) -> Self {
        bank.questions
    }
}

/// Question id → chosen dosha for one assessment attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<String, Dosha>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, replacing any earlier answer to the same question.
    pub fn record(&mut self, question_id: impl Into<String>, dosha: Dosha) -> Option<Dosha> {
        self.0.insert(question_id.into(), dosha)
    }

    pub fn get(&self, question_id: &str) -> Option<Dosha> {
        self.0.get(question_id).copied()
    }

    pub fn remove(&mut self, question_id: &str) -> Option<Dosha> {
        self.0.remove(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Dosha)> {
        self.0.iter().map(|(id, dosha)| (id.as_str(), *dosha))
    }
}

impl<K: Into<String>> FromIterator<(K, Dosha)> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = (K, Dosha)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, d)| (k.into(), d)).collect())
    }
}

/// Outcome of one classification. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoshaResult {
    pub vata_percentage: u32,
    pub pitta_percentage: u32,
    pub kapha_percentage: u32,
    pub dominant_dosha: Dosha,
    pub constitution: String,
    pub recommendations: Vec<String>,
}

impl DoshaResult {
    pub fn percentage(&self, dosha: Dosha) -> u32 {
        match dosha {
            Dosha::Vata => self.vata_percentage,
            Dosha::Pitta => self.pitta_percentage,
            Dosha::Kapha => self.kapha_percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub responses: ResponseSet,
}

/// Row stored in `prakriti_profiles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrakritiProfile {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub vata_percentage: u32,
    pub pitta_percentage: u32,
    pub kapha_percentage: u32,
    pub dominant_dosha: Dosha,
    pub constitution: String,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub responses: ResponseSet,
    pub assessment_date: DateTime<Utc>,
}
