use std::sync::Arc;

use tracing::debug;

use crate::models::{Dosha, DoshaResult, QuestionBank, ResponseSet};

/// Top-two percentage gap at or below which a profile is dual-dosha.
pub const DUAL_DOSHA_THRESHOLD: u32 = 10;

/// Raw weighted score per dosha for one response set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoshaScores {
    pub vata: u32,
    pub pitta: u32,
    pub kapha: u32,
}

impl DoshaScores {
    /// Sums the weight of each chosen option. Responses to ids that are not
    /// in the bank are skipped.
    pub fn tally(bank: &QuestionBank, responses: &ResponseSet) -> Self {
        let mut scores = Self::default();

        for question in bank.questions() {
            if let Some(dosha) = responses.get(&question.id) {
                scores.add(dosha, question.options.weight(dosha));
            }
        }

        scores
    }

    fn add(&mut self, dosha: Dosha, weight: u32) {
        match dosha {
            Dosha::Vata => self.vata = self.vata.saturating_add(weight),
            Dosha::Pitta => self.pitta = self.pitta.saturating_add(weight),
            Dosha::Kapha => self.kapha = self.kapha.saturating_add(weight),
        }
    }

    pub fn get(&self, dosha: Dosha) -> u32 {
        match dosha {
            Dosha::Vata => self.vata,
            Dosha::Pitta => self.pitta,
            Dosha::Kapha => self.kapha,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.vata) + u64::from(self.pitta) + u64::from(self.kapha)
    }

    /// `round(100 * score / total)`, half rounding up. Zero when nothing
    /// was scored.
    pub fn percentage(&self, dosha: Dosha) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let score = u64::from(self.get(dosha));
        // score <= total, so the quotient is at most 100
        u32::try_from((200 * score + total) / (2 * total)).unwrap_or(100)
    }

    /// Doshas ordered by descending score; equal scores keep declaration order.
    pub fn ranked(&self) -> [Dosha; 3] {
        let mut ranked = Dosha::ALL;
        // stable sort preserves Vata > Pitta > Kapha among ties
        ranked.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        ranked
    }

    pub fn dominant(&self) -> Dosha {
        self.ranked()[0]
    }
}

/// Maps a response set onto a [`DoshaResult`] using an injected bank.
#[derive(Debug, Clone)]
pub struct DoshaClassifier {
    bank: Arc<QuestionBank>,
}

impl DoshaClassifier {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn classify(&self, responses: &ResponseSet) -> DoshaResult {
        let unknown = responses
            .iter()
            .filter(|(id, _)| self.bank.find(id).is_none())
            .count();
        if unknown > 0 {
            debug!("Ignoring {} responses for questions not in the bank", unknown);
        }

        let scores = DoshaScores::tally(&self.bank, responses);
        debug!(
            "Tallied dosha scores vata={} pitta={} kapha={}",
            scores.vata, scores.pitta, scores.kapha
        );

        let [dominant, secondary, _] = scores.ranked();

        DoshaResult {
            vata_percentage: scores.percentage(Dosha::Vata),
            pitta_percentage: scores.percentage(Dosha::Pitta),
            kapha_percentage: scores.percentage(Dosha::Kapha),
            dominant_dosha: dominant,
            constitution: constitution_label(&scores, dominant, secondary),
            recommendations: dominant
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}

/// "X Constitution", or "X-Y Constitution" when the runner-up is within
/// [`DUAL_DOSHA_THRESHOLD`] percentage points of the dominant dosha.
fn constitution_label(scores: &DoshaScores, dominant: Dosha, secondary: Dosha) -> String {
    let gap = scores
        .percentage(dominant)
        .saturating_sub(scores.percentage(secondary));

    if gap <= DUAL_DOSHA_THRESHOLD {
        format!("{}-{} Constitution", dominant.name(), secondary.name())
    } else {
        format!("{} Constitution", dominant.name())
    }
}
