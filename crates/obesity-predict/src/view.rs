//! Plain-text rendering of whatever the orchestrator currently holds.

use std::fmt::{self, Write as _};

use crate::orchestrator::{ErrorInfo, PredictionResult, SubmissionState};
use crate::risk::{Color, RiskLevel};

/// Terminal view over a [`SubmissionState`].
#[derive(Debug, Clone, Copy)]
pub struct ResultView<'a> {
    state: &'a SubmissionState,
    ansi: bool,
}

impl<'a> ResultView<'a> {
    pub fn new(state: &'a SubmissionState) -> Self {
        Self { state, ansi: false }
    }

    /// Paint the risk badge and probability bars with 24-bit ANSI colors.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if self.ansi {
            let (r, g, b) = color.rgb();
            format!("\x1b[1;38;2;{r};{g};{b}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn render_result(&self, out: &mut String, result: &PredictionResult) -> fmt::Result {
        let color = result.color();
        writeln!(out, "Prediction: {}", result.class_label.replace('_', " "))?;
        writeln!(out, "Confidence: {:.1}%", result.confidence * 100.0)?;
        writeln!(out, "BMI:        {:.2}", result.bmi)?;
        let badge = format!("{} ({})", result.risk_level.label(), color.hex());
        writeln!(out, "Risk level: {}", self.paint(color, &badge))?;
        if let Some(rank) = result.risk_level.severity() {
            let filled = usize::from(rank);
            let empty = usize::from(RiskLevel::MAX_SEVERITY) - filled;
            let meter = format!("{}{}", "#".repeat(filled), ".".repeat(empty));
            writeln!(
                out,
                "Severity:   {} ({rank}/{})",
                self.paint(color, &meter),
                RiskLevel::MAX_SEVERITY
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Recommendation")?;
        writeln!(out, "  {}", result.recommendation)?;

        let ranked = result.ranked_probabilities();
        if !ranked.is_empty() {
            writeln!(out)?;
            writeln!(out, "Class probabilities")?;
            let width = ranked.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            for (label, probability) in ranked {
                let bar = "#".repeat((probability.clamp(0.0, 1.0) * 20.0).round() as usize);
                let bar = if label == result.class_label {
                    self.paint(color, &bar)
                } else {
                    bar
                };
                writeln!(
                    out,
                    "  {label:<width$}  {:>5.1}%  {bar}",
                    probability * 100.0
                )?;
            }
        }
        Ok(())
    }

    fn render_error(&self, out: &mut String, error: &ErrorInfo) -> fmt::Result {
        let heading = match error {
            ErrorInfo::Validation { .. } => "Incomplete form",
            ErrorInfo::Network => "Connection problem",
            ErrorInfo::Application(_) => "Prediction rejected",
        };
        writeln!(out, "{}", self.paint(Color::Red700, heading))?;
        writeln!(out, "  {}", error.prompt())
    }
}

impl fmt::Display for ResultView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        match self.state {
            SubmissionState::Idle => writeln!(out, "No prediction yet.")?,
            SubmissionState::Validating | SubmissionState::Submitting => {
                writeln!(out, "Analysing...")?
            }
            SubmissionState::Succeeded(result) => self.render_result(&mut out, result)?,
            SubmissionState::Failed(error) => self.render_error(&mut out, error)?,
        }
        f.write_str(&out)
    }
}
