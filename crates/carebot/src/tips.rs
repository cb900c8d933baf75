/// Wellness-tip selection.
///
/// A match result and the raw user text are mapped to a [`TipCategory`] by fixed keyword
/// tables, then a few distinct tips are sampled from that category. Keyword tables are
/// scanned in declaration order and the first hit wins, so the order below is part of the
/// behavior.
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::model::{MatchResult, TipCategory};

pub const DEFAULT_MAX_TIPS: usize = 3;

/// Keywords looked for in the matched disease name and cure.
const DISEASE_KEYWORDS: &[(&str, TipCategory)] = &[
    ("fever", TipCategory::General),
    ("cold", TipCategory::General),
    ("flu", TipCategory::General),
    ("headache", TipCategory::General),
    ("diabetes", TipCategory::Diet),
    ("hypertension", TipCategory::Diet),
    ("obesity", TipCategory::Diet),
    ("anxiety", TipCategory::Mental),
    ("depression", TipCategory::Mental),
    ("insomnia", TipCategory::Sleep),
    ("fatigue", TipCategory::Energy),
    ("dehydration", TipCategory::Hydration),
    ("stress", TipCategory::Stress),
];

/// Keywords looked for in the user's own words.
const SYMPTOM_KEYWORDS: &[(&str, TipCategory)] = &[
    ("tired", TipCategory::Energy),
    ("fatigue", TipCategory::Energy),
    ("low energy", TipCategory::Energy),
    ("sleep", TipCategory::Sleep),
    ("insomnia", TipCategory::Sleep),
    ("rest", TipCategory::Sleep),
    ("stress", TipCategory::Stress),
    ("anxious", TipCategory::Stress),
    ("anxiety", TipCategory::Stress),
    ("water", TipCategory::Hydration),
    ("thirsty", TipCategory::Hydration),
    ("hydration", TipCategory::Hydration),
    ("diet", TipCategory::Diet),
    ("food", TipCategory::Diet),
    ("eating", TipCategory::Diet),
    ("nutrition", TipCategory::Diet),
    ("depressed", TipCategory::Mental),
    ("sad", TipCategory::Mental),
    ("mental", TipCategory::Mental),
    ("general", TipCategory::General),
];

const SLEEP_TIPS: &[&str] = &[
    "Try to get at least 7-8 hours of sleep each night.",
    "Establish a regular sleep routine to improve sleep quality.",
    "Avoid screens at least 1 hour before bed to help your mind relax.",
    "Keep your bedroom cool and dark to promote better sleep.",
    "Avoid caffeine late in the day if you're having trouble sleeping.",
];

const ENERGY_TIPS: &[&str] = &[
    "Make sure you're eating a balanced diet to maintain energy.",
    "Exercise regularly to boost your energy levels.",
    "Stay hydrated throughout the day to avoid fatigue.",
    "Take short walks or stretch breaks during work to stay energized.",
    "Avoid heavy meals during the day to prevent feeling sluggish.",
];

const STRESS_TIPS: &[&str] = &[
    "Take short breaks throughout the day to reduce stress.",
    "Practice mindfulness or meditation to help manage stress.",
    "Engage in physical activity to reduce anxiety and stress.",
    "Try journaling your thoughts to help process emotions.",
    "Listen to calming music or practice deep breathing exercises.",
];

const HYDRATION_TIPS: &[&str] = &[
    "Drink at least 8 glasses of water daily.",
    "Carry a water bottle to remind yourself to drink throughout the day.",
    "Start your day with a glass of water to activate your metabolism.",
    "Eat fruits like watermelon and oranges to help stay hydrated.",
];

const DIET_TIPS: &[&str] = &[
    "Eat a balanced diet rich in fruits and vegetables.",
    "Limit processed foods and added sugars.",
    "Incorporate more fiber through whole grains and legumes.",
    "Avoid skipping meals to maintain stable energy levels.",
];

const MENTAL_TIPS: &[&str] = &[
    "Practice gratitude by listing three things you're thankful for.",
    "Talk to a trusted friend or counselor if you're feeling down.",
    "Take time to do something you enjoy every day.",
    "Spend time in nature to improve mental well-being.",
];

const GENERAL_TIPS: &[&str] = &[
    "Wash your hands regularly to prevent infections.",
    "Get regular health checkups and screenings.",
    "Avoid smoking and limit alcohol consumption.",
    "Protect your skin with sunscreen when going outside.",
];

pub fn tips_for(category: TipCategory) -> &'static [&'static str] {
    match category {
        TipCategory::Sleep => SLEEP_TIPS,
        TipCategory::Energy => ENERGY_TIPS,
        TipCategory::Stress => STRESS_TIPS,
        TipCategory::Hydration => HYDRATION_TIPS,
        TipCategory::Diet => DIET_TIPS,
        TipCategory::Mental => MENTAL_TIPS,
        TipCategory::General => GENERAL_TIPS,
    }
}

/// Pick the tip category for a query.
///
/// A matched record's disease name and cure take precedence over the user's wording;
/// when neither mentions a known keyword the category is `General`.
pub fn resolve_category(user_text: &str, match_result: &MatchResult) -> TipCategory {
    if let Some(record) = &match_result.record {
        let disease = record.disease_name.to_lowercase();
        let cure = record.cure.to_lowercase();
        if let Some(category) = first_keyword(DISEASE_KEYWORDS, |k| {
            disease.contains(k) || cure.contains(k)
        }) {
            return category;
        }
    }

    let text = user_text.to_lowercase();
    first_keyword(SYMPTOM_KEYWORDS, |k| text.contains(k)).unwrap_or(TipCategory::General)
}

/// Up to `max_tips` distinct tips from the resolved category, in random order.
pub fn select_tips<R: Rng + ?Sized>(
    user_text: &str,
    match_result: &MatchResult,
    max_tips: usize,
    rng: &mut R,
) -> Vec<String> {
    let category = resolve_category(user_text, match_result);
    tips_for(category)
        .choose_multiple(rng, max_tips)
        .map(|tip| tip.to_string())
        .collect()
}

fn first_keyword(
    table: &[(&str, TipCategory)],
    mut hit: impl FnMut(&str) -> bool,
) -> Option<TipCategory> {
    table
        .iter()
        .find(|(keyword, _)| hit(keyword))
        .map(|&(_, category)| category)
}
