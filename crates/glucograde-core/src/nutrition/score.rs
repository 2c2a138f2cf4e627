//! Nutrition adequacy scoring
//!
//! Scores a food against the current glucose reading. The reading picks one of
//! three formulas:
//!
//! - below 70: fast nutrients are welcome, so the score grows with the ratio of
//!   carbohydrate and sugars to fat, fiber and protein
//! - 70 up to 100: 90 adjusted by the balance of slow against fast nutrients
//! - 100 and above: the same balance, with the baseline dropping as the reading rises
//!
//! Scores are capped at 100 but have no floor. The score is then presented either as a
//! letter grade or, for insulin-dependent users, as a direct piece of advice.

use super::nutrients::NutrientVector;
use serde::{Deserialize, Serialize};

/// Readings below this use the low-glucose formula
pub const LOW_GLUCOSE_THRESHOLD: f64 = 70.0;

/// Readings at or above this use the high-glucose formula
pub const HIGH_GLUCOSE_THRESHOLD: f64 = 100.0;

/// Upper bound of every score
pub const MAX_SCORE: f64 = 100.0;

/// Weight of the slow/fast nutrient balance in the normal and high formulas
const BALANCE_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("Score undeterminable at glucose {reference}: fat, fiber and protein sum to zero")]
    Undeterminable { reference: f64 },

    #[error("Glucose reading must be a finite number, got {reference}")]
    InvalidReference { reference: f64 },
}

/// Which diabetes type the user manages. Type one selects advice instead of grades
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DiabetesType {
    /// Insulin-dependent
    TypeOne,
    #[default]
    TypeTwo,
}

impl DiabetesType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TypeOne => "Type 1",
            Self::TypeTwo => "Type 2",
        }
    }
}

/// Glucose band that selects the scoring formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlucoseBand {
    Low,
    Normal,
    High,
}

impl GlucoseBand {
    pub fn for_reference(reference: f64) -> Self {
        if reference < LOW_GLUCOSE_THRESHOLD {
            Self::Low
        } else if reference < HIGH_GLUCOSE_THRESHOLD {
            Self::Normal
        } else {
            Self::High
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Score `nutrients` against a glucose `reference`.
///
/// The result is at most [`MAX_SCORE`]. A low reading with no fat, fiber or
/// protein has no defined score.
pub fn score(nutrients: &NutrientVector, reference: f64) -> Result<f64, ScoreError> {
    if !reference.is_finite() {
        return Err(ScoreError::InvalidReference { reference });
    }

    let slow = nutrients.slow_nutrients();
    let fast = nutrients.fast_nutrients();

    let raw = match GlucoseBand::for_reference(reference) {
        GlucoseBand::Low => {
            if slow == 0.0 {
                return Err(ScoreError::Undeterminable { reference });
            }
            13.0 + 10.0 * fast / slow
        }
        GlucoseBand::Normal => 90.0 + BALANCE_WEIGHT * (slow - fast),
        GlucoseBand::High => -reference / 2.0 + 140.0 + BALANCE_WEIGHT * (slow - fast),
    };

    // an overflowing ratio is still capped; only NaN has no order
    if raw.is_nan() {
        return Err(ScoreError::Undeterminable { reference });
    }

    Ok(raw.min(MAX_SCORE))
}

//=============================================================================
// Grades
//=============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
    /// Score outside [0, 100]
    Invalid,
}

/// (lower bound inclusive, upper bound exclusive, grade); the first band also includes its upper bound
const GRADE_BANDS: &[(f64, f64, Grade)] = &[
    (97.0, 100.0, Grade::APlus),
    (93.0, 97.0, Grade::A),
    (90.0, 93.0, Grade::AMinus),
    (87.0, 90.0, Grade::BPlus),
    (83.0, 87.0, Grade::B),
    (80.0, 83.0, Grade::BMinus),
    (77.0, 80.0, Grade::CPlus),
    (73.0, 77.0, Grade::C),
    (70.0, 73.0, Grade::CMinus),
    (67.0, 70.0, Grade::DPlus),
    (63.0, 67.0, Grade::D),
    (60.0, 63.0, Grade::DMinus),
    (0.0, 60.0, Grade::F),
];

impl Grade {
    pub fn from_score(score: f64) -> Self {
        GRADE_BANDS
            .iter()
            .enumerate()
            .find(|(i, (lower, upper, _))| {
                score >= *lower && (score < *upper || (*i == 0 && score == *upper))
            })
            .map(|(_, (_, _, grade))| *grade)
            .unwrap_or(Grade::Invalid)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::F => "F",
            Self::Invalid => "Invalid",
        }
    }

    /// Tier named by the first character of the label
    pub fn tier(&self) -> Option<Tier> {
        self.label().chars().next().and_then(Tier::from_char)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

//=============================================================================
// Presentation
//=============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Olive,
    Amber,
    Orange,
    Red,
    Neutral,
}

impl Color {
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Green => "#2E7D32",
            Self::Olive => "#808000",
            Self::Amber => "#FFBF00",
            Self::Orange => "#FF8C00",
            Self::Red => "#D32F2F",
            Self::Neutral => "#FFFFFF",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Olive => "olive",
            Self::Amber => "amber",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Neutral => "neutral",
        }
    }
}

/// Color and icon the renderer should show. `icon: None` keeps the current icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub color: Color,
    pub icon: Option<u8>,
}

impl Presentation {
    pub const NEUTRAL: Self = Self {
        color: Color::Neutral,
        icon: None,
    };

    const fn new(color: Color, icon: u8) -> Self {
        Self {
            color,
            icon: Some(icon),
        }
    }
}

/// Coarse grade bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    A,
    B,
    C,
    D,
    F,
}

impl Tier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'F' => Some(Self::F),
            _ => None,
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self {
            Self::A => Presentation::new(Color::Green, 0),
            Self::B => Presentation::new(Color::Olive, 1),
            Self::C => Presentation::new(Color::Amber, 2),
            Self::D => Presentation::new(Color::Orange, 2),
            Self::F => Presentation::new(Color::Red, 3),
        }
    }
}

/// Direct advice shown to insulin-dependent users instead of a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    GreatLowSnack,
    LowSnackFirst,
    MaySpike,
    NiceChoice,
}

impl Advice {
    pub fn select(score: f64, reference: f64) -> Self {
        if reference < LOW_GLUCOSE_THRESHOLD {
            if score > 90.0 {
                Self::GreatLowSnack
            } else {
                Self::LowSnackFirst
            }
        } else if score < 60.0 {
            Self::MaySpike
        } else {
            Self::NiceChoice
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::GreatLowSnack => "Great low snack",
            Self::LowSnackFirst => "Consume a low snack first",
            Self::MaySpike => "Warning, may cause a spike",
            Self::NiceChoice => "Nice choice",
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self {
            Self::GreatLowSnack => Presentation::new(Color::Green, 0),
            Self::LowSnackFirst => Presentation::new(Color::Red, 3),
            Self::MaySpike => Presentation::new(Color::Amber, 4),
            Self::NiceChoice => Presentation::new(Color::Olive, 1),
        }
    }
}

//=============================================================================
// Assessment
//=============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Graded {
        grade: Grade,
        tier: Option<Tier>,
        presentation: Presentation,
    },
    Advice {
        advice: Advice,
        presentation: Presentation,
    },
}

impl Verdict {
    /// Text for the renderer: the grade label or the advice message
    pub fn label(&self) -> &'static str {
        match self {
            Self::Graded { grade, .. } => grade.label(),
            Self::Advice { advice, .. } => advice.message(),
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self {
            Self::Graded { presentation, .. } | Self::Advice { presentation, .. } => *presentation,
        }
    }
}

/// Score plus what to show for it
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub score: f64,
    pub reference: f64,
    pub verdict: Verdict,
}

/// Score a food and choose its presentation for the given diabetes type
pub fn assess(
    nutrients: &NutrientVector,
    reference: f64,
    diabetes_type: DiabetesType,
) -> Result<Assessment, ScoreError> {
    let score = score(nutrients, reference)?;

    let verdict = match diabetes_type {
        DiabetesType::TypeOne => {
            let advice = Advice::select(score, reference);
            Verdict::Advice {
                advice,
                presentation: advice.presentation(),
            }
        }
        DiabetesType::TypeTwo => {
            let grade = Grade::from_score(score);
            let tier = grade.tier();
            Verdict::Graded {
                grade,
                tier,
                presentation: tier.map_or(Presentation::NEUTRAL, |t| t.presentation()),
            }
        }
    };

    tracing::debug!(
        "Scored food {} at glucose {} ({} band): {:.2} → {}",
        nutrients.id,
        reference,
        GlucoseBand::for_reference(reference).display_name(),
        score,
        verdict.label()
    );

    Ok(Assessment {
        score,
        reference,
        verdict,
    })
}
