use serde::{Deserialize, Serialize};

/// The fixed vocabulary of facial expressions the detector can report.
///
/// The serialized form is the lowercase label used as the catalog key, e.g.
/// `"happy"` or `"surprised"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Disgusted,
    Fearful,
}

impl Expression {
    /// Every expression the detector can report.
    pub const ALL: [Expression; 7] = [
        Expression::Neutral,
        Expression::Happy,
        Expression::Sad,
        Expression::Angry,
        Expression::Surprised,
        Expression::Disgusted,
        Expression::Fearful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Neutral => "neutral",
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Angry => "angry",
            Expression::Surprised => "surprised",
            Expression::Disgusted => "disgusted",
            Expression::Fearful => "fearful",
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence scores for one detected face, in detector emission order.
///
/// The order matters: [`classify`] resolves ties in favor of the earliest
/// entry, so this wrapper keeps the sequence the detector produced instead
/// of collapsing it into an unordered map. Each value lives for a single
/// tick and is dropped afterwards.
///
/// # Examples
///
/// ```
/// use facegif::{ConfidenceMap, Expression, classify};
///
/// let scores: ConfidenceMap = [
///     (Expression::Happy, 0.9),
///     (Expression::Neutral, 0.1),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(classify(&scores), Expression::Happy);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfidenceMap {
    scores: Vec<(Expression, f32)>,
}

impl ConfidenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a score, keeping emission order.
    pub fn push(&mut self, expression: Expression, confidence: f32) {
        self.scores.push((expression, confidence));
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Expression, f32)> + '_ {
        self.scores.iter().copied()
    }
}

impl FromIterator<(Expression, f32)> for ConfidenceMap {
    fn from_iter<I: IntoIterator<Item = (Expression, f32)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Pick the dominant expression from a confidence map.
///
/// Scans every entry; a later entry displaces the current winner only when
/// its score is strictly greater, so on a tie the earliest entry stands.
/// An empty map falls back to [`Expression::Neutral`], though callers are
/// expected to skip the tick before classifying an empty reading.
pub fn classify(confidences: &ConfidenceMap) -> Expression {
    let mut best: Option<(Expression, f32)> = None;
    for (expression, confidence) in confidences.iter() {
        match best {
            Some((_, top)) if confidence <= top => {}
            _ => best = Some((expression, confidence)),
        }
    }
    best.map(|(expression, _)| expression)
        .unwrap_or(Expression::Neutral)
}
