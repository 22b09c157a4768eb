//! Prediction result view.

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{DiabetesLabel, PatientReading, PredictionResult, RiskBand};
use crate::tui::styles::MedicalTheme;

/// Result screen state
#[derive(Debug, Clone)]
pub enum ResultState {
    /// Completed with result
    Complete {
        result: PredictionResult,
        summary: Vec<(&'static str, String)>,
        /// Model decision threshold as a percentage
        reference_percent: f64,
        generated_at: DateTime<Local>,
    },
    /// Request refused
    Error { message: String },
}

impl ResultState {
    /// Build the completed state for a reading and its prediction.
    ///
    /// `threshold` is the model's decision threshold in [0, 1]. Only the
    /// formatted summary is kept, not the reading itself.
    #[must_use]
    pub fn complete(reading: &PatientReading, result: PredictionResult, threshold: f64) -> Self {
        Self::Complete {
            result,
            summary: reading.summary(),
            reference_percent: threshold * 100.0,
            generated_at: Local::now(),
        }
    }
}

/// Render the result screen
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);
    match state {
        ResultState::Complete {
            result,
            summary,
            reference_percent,
            generated_at,
        } => render_complete(
            f,
            chunks[1],
            result,
            summary,
            *reference_percent,
            generated_at,
        ),
        ResultState::Error { message } => render_error(f, chunks[1], message),
    }
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction Results", MedicalTheme::title()),
        Span::styled(" │ Logistic Risk Model", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_complete(
    f: &mut Frame,
    area: Rect,
    result: &PredictionResult,
    summary: &[(&'static str, String)],
    reference_percent: f64,
    generated_at: &DateTime<Local>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_outcome(f, columns[0], result);
    render_gauge_panel(f, columns[1], result, summary, reference_percent);

    let stamp = Paragraph::new(Line::from(Span::styled(
        format!(
            "Prediction generated on {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(stamp, rows[1]);
}

fn render_outcome(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let outcome = Paragraph::new(vec![
        Line::from(Span::styled(
            result.label.headline(),
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            result.label.to_string(),
            MedicalTheme::label(result.label),
        )),
        Line::from(vec![
            Span::styled("Risk Probability: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:.1}%", result.risk_probability),
                MedicalTheme::title(),
            ),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::card_border(result.label)),
    );
    f.render_widget(outcome, chunks[0]);

    let title = match result.label {
        DiabetesLabel::Diabetic => " Recommended Actions ",
        DiabetesLabel::NonDiabetic => " Preventive Measures ",
    };
    let guidance: Vec<Line> = result
        .label
        .guidance()
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled(" • ", MedicalTheme::focused()),
                Span::styled(*item, MedicalTheme::text()),
            ])
        })
        .collect();
    let guidance = Paragraph::new(guidance)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(title, MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(guidance, chunks[1]);
}

fn render_gauge_panel(
    f: &mut Frame,
    area: Rect,
    result: &PredictionResult,
    summary: &[(&'static str, String)],
    reference_percent: f64,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Band legend + reference
            Constraint::Min(0),    // Input summary
        ])
        .split(area);

    let band = result.risk_band();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Diabetes Risk % ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::risk_band(band))
        .ratio(result.probability_fraction().clamp(0.0, 1.0))
        .label(format!("{:.1}% {}", result.risk_probability, band));
    f.render_widget(gauge, chunks[0]);

    let legend: Vec<Span> = RiskBand::ALL
        .iter()
        .flat_map(|b| {
            let (lo, hi) = b.range();
            let marker = if *b == band { "■" } else { "□" };
            [
                Span::styled(format!("{marker} {lo:.0}-{hi:.0} "), MedicalTheme::risk_band(*b)),
                Span::raw(" "),
            ]
        })
        .collect();
    let delta = result.risk_probability - reference_percent;
    let reference = Line::from(vec![
        Span::styled(
            format!("Threshold {reference_percent:.0}%: "),
            MedicalTheme::text_muted(),
        ),
        Span::styled(
            format!("{delta:+.1}"),
            if delta >= 0.0 {
                MedicalTheme::danger()
            } else {
                MedicalTheme::success()
            },
        ),
    ]);
    f.render_widget(Paragraph::new(vec![Line::from(legend), reference]), chunks[1]);

    let lines: Vec<Line> = summary
        .iter()
        .map(|(name, value)| {
            Line::from(vec![
                Span::styled(format!(" {name}: "), MedicalTheme::text_secondary()),
                Span::styled(value.as_str(), MedicalTheme::text()),
            ])
        })
        .collect();
    let summary = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Input Summary ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(summary, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Model Not Available", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
        Line::from(""),
        Line::from(Span::styled(
            "The prediction model could not be loaded. Check the model path and restart.",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Complete { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard ", MedicalTheme::key_desc()),
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Assessment", MedicalTheme::key_desc()),
        ]),
        _ => Line::from(vec![
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text(state: &ResultState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("Should create terminal");
        terminal
            .draw(|f| render_result(f, f.area(), state))
            .expect("Should draw");

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn reading() -> PatientReading {
        PatientReading::from_vector(&[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0])
            .expect("Should parse")
    }

    #[test]
    fn test_renders_diabetic_result() {
        let state = ResultState::complete(
            &reading(),
            PredictionResult::new(DiabetesLabel::Diabetic, 0.7229),
            0.5,
        );
        let text = rendered_text(&state);

        assert!(text.contains("High Risk Detected"));
        assert!(text.contains("DIABETIC"));
        assert!(text.contains("72.3%"));
        assert!(text.contains("Recommended Actions"));
        assert!(text.contains("DPF: 0.627"));
        assert!(text.contains("Prediction generated on"));
        assert!(text.contains("Threshold 50%: +22.3"));
    }

    #[test]
    fn test_renders_non_diabetic_result() {
        let state = ResultState::complete(
            &reading(),
            PredictionResult::new(DiabetesLabel::NonDiabetic, 0.6),
            0.7,
        );
        let text = rendered_text(&state);

        assert!(text.contains("NON-DIABETIC"));
        assert!(text.contains("Preventive Measures"));
        // The reference follows the model threshold, not a fixed 50%.
        assert!(text.contains("Threshold 70%: -10.0"));
    }

    #[test]
    fn test_renders_unavailable_notice() {
        let state = ResultState::Error {
            message: "Model artifact not found".to_string(),
        };
        let text = rendered_text(&state);
        assert!(text.contains("Model Not Available"));
    }
}
