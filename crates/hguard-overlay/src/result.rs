#![forbid(unsafe_code)]

//! Scan result data and the collaborator that supplies it.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Qualitative verdict color-class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Tone {
    Good,
    Warn,
    Bad,
}

impl Tone {
    /// Every tone class, for replacing one tone with another.
    pub const CLASSES: [&'static str; 3] = ["good", "warn", "bad"];

    /// CSS class name for this tone.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warn => "warn",
            Self::Bad => "bad",
        }
    }
}

/// A labelled verdict with a tone.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Verdict {
    pub label: String,
    pub tone: Tone,
}

impl Verdict {
    #[must_use]
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

/// AI-likelihood verdict.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct AiVerdict {
    pub status: Verdict,
    /// Likelihood score in `[0, 1]`.
    pub score: f64,
    pub explainer: String,
}

/// One corroborating (or contradicting) source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Source {
    pub name: String,
    /// Short tag such as "Supported" or "Mixed".
    pub tag: String,
    pub tone: Tone,
}

impl Source {
    #[must_use]
    pub fn new(name: impl Into<String>, tag: impl Into<String>, tone: Tone) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            tone,
        }
    }
}

/// Everything the result card and bubble display for one scan.
///
/// Replaced wholesale on every successful scan. `sources` is in display
/// order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ScanResult {
    pub claim: String,
    pub status: Verdict,
    /// Confidence in the status verdict, in `[0, 1]`.
    pub confidence: f64,
    pub ai: AiVerdict,
    pub explainer: String,
    /// Subtitle shown inside the callout bubble.
    pub bubble_note: String,
    pub sources: Vec<Source>,
}

impl ScanResult {
    /// Clamp both scores into `[0, 1]`; non-finite scores become `0`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.confidence = unit(self.confidence);
        self.ai.score = unit(self.ai.score);
        self
    }

    /// Confidence formatted for display ("0.92").
    #[must_use]
    pub fn confidence_label(&self) -> String {
        format!("{:.2}", self.confidence)
    }

    /// AI score formatted for display ("0.63").
    #[must_use]
    pub fn ai_score_label(&self) -> String {
        format!("{:.2}", self.ai.score)
    }
}

fn unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Supplies scan results on demand.
///
/// The model treats the source as opaque: it is called once per completed
/// scan and its answer replaces the previous result.
pub trait ResultSource {
    fn fetch_result(&mut self) -> ScanResult;
}

impl<F> ResultSource for F
where
    F: FnMut() -> ScanResult,
{
    fn fetch_result(&mut self) -> ScanResult {
        self()
    }
}

/// Fixed result used by the demo deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureSource {
    result: ScanResult,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self {
            result: sample_result(),
        }
    }
}

impl FixtureSource {
    /// Serve `result` on every fetch.
    #[must_use]
    pub fn new(result: ScanResult) -> Self {
        Self { result }
    }

    /// Load a fixture from JSON.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, crate::config::ConfigError> {
        let result = serde_json::from_str(s).map_err(crate::config::ConfigError::Json)?;
        Ok(Self { result })
    }

    #[must_use]
    pub fn result(&self) -> &ScanResult {
        &self.result
    }
}

impl ResultSource for FixtureSource {
    fn fetch_result(&mut self) -> ScanResult {
        self.result.clone()
    }
}

/// The heart-attack "sense of doom" claim shipped with the demo page.
#[must_use]
pub fn sample_result() -> ScanResult {
    ScanResult {
        claim: "A sudden \u{201c}sense of doom\u{201d} can be a warning sign of a heart attack."
            .to_owned(),
        status: Verdict::new("Likely supported", Tone::Good),
        confidence: 0.92,
        ai: AiVerdict {
            status: Verdict::new("AI-generated: Possible", Tone::Warn),
            score: 0.63,
            explainer: "This detector looks for patterns common in AI-generated or heavily \
                templated writing. A higher score suggests possible AI assistance, but results \
                are probabilistic and not definitive \u{2014} formatting, quotes, and editing can \
                affect the score."
                .to_owned(),
        },
        explainer: "Multiple reputable medical sources describe anxiety, nausea, sweating, or a \
            feeling that something is \u{201c}very wrong\u{201d} as possible heart\u{2011}attack \
            symptoms. This checker flags the claim as plausible \u{2014} but symptoms vary by \
            person, so always rely on professional guidance."
            .to_owned(),
        bubble_note: "Matched to multiple reputable sources (AHA / NIH / Mayo Clinic).".to_owned(),
        sources: vec![
            Source::new("American Heart Association", "Supported", Tone::Good),
            Source::new("NHLBI (NIH)", "Consistent", Tone::Good),
            Source::new("Mayo Clinic", "Consistent", Tone::Good),
            Source::new("Research summaries", "Mixed", Tone::Warn),
        ],
    }
}
