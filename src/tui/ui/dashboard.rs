//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

/// Reference ranges shown in the health indicators panel.
const HEALTH_INDICATORS: [(&str, &str); 4] = [
    ("Glucose", "70-100 mg/dL (fasting)"),
    ("Blood Pressure", "< 90 mm Hg (diastolic)"),
    ("BMI", "18.5-24.9 kg/m²"),
    ("Insulin", "2.6-24.9 μU/mL"),
];

const RISK_FACTORS: [&str; 5] = [
    "High blood glucose levels",
    "Family history of diabetes (high pedigree function)",
    "Obesity (BMI > 30)",
    "Age over 45 years",
    "High blood pressure",
];

/// Dashboard state for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub model_loaded: bool,
    pub model_source: String,
    /// Hex SHA-256 of the loaded artifact
    pub model_digest: Option<String>,
    pub unavailable_reason: Option<String>,
    /// One-shot message, e.g. a refused action
    pub notice: Option<String>,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);

    if state.model_loaded {
        render_main_content(f, chunks[1], state);
    } else {
        render_unavailable(f, chunks[1], state);
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Glucosense", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled("Diabetes Risk Assessment", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Status + actions
            Constraint::Percentage(60), // Health information
        ])
        .split(area);

    render_status_panels(f, chunks[0], state);
    render_health_info(f, chunks[1]);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Model status
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let digest = state
        .model_digest
        .as_deref()
        .map_or_else(|| "-".to_string(), |d| d.chars().take(12).collect());

    let status_items = vec![
        format_status_item("Model Loaded", state.model_loaded),
        Line::from(vec![
            Span::styled("  Source: ", MedicalTheme::text_secondary()),
            Span::styled(state.model_source.clone(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  SHA-256: ", MedicalTheme::text_secondary()),
            Span::styled(digest, MedicalTheme::text_muted()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" Model Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let mut actions = vec![
        Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Assessment", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];
    if let Some(notice) = &state.notice {
        actions.push(Line::from(""));
        actions.push(Line::from(Span::styled(
            notice.as_str(),
            MedicalTheme::warning(),
        )));
    }

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(
        Paragraph::new(actions)
            .wrap(Wrap { trim: true })
            .block(actions_block),
        chunks[1],
    );
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", MedicalTheme::success())
    } else {
        ("FAIL", MedicalTheme::danger())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), MedicalTheme::text()),
    ])
}

fn render_health_info(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Health indicators
            Constraint::Length(7), // Risk factors
            Constraint::Min(0),    // About
        ])
        .margin(1)
        .split(area);

    let indicators: Vec<Line> = HEALTH_INDICATORS
        .iter()
        .map(|(name, range)| {
            Line::from(vec![
                Span::styled(format!("  {name}: "), MedicalTheme::text_secondary()),
                Span::styled(*range, MedicalTheme::text()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(indicators).block(
            Block::default()
                .title(Span::styled(" Health Indicators ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        ),
        chunks[0],
    );

    let factors: Vec<Line> = RISK_FACTORS
        .iter()
        .map(|factor| {
            Line::from(vec![
                Span::styled("  • ", MedicalTheme::focused()),
                Span::styled(*factor, MedicalTheme::text()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(factors).block(
            Block::default()
                .title(Span::styled(" Risk Factors ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        ),
        chunks[1],
    );

    let about = Paragraph::new(vec![Line::from(Span::styled(
        "Estimates diabetes risk from eight clinical measurements using a \
         pre-trained logistic regression model. Results are a screening aid, \
         not a diagnosis.",
        MedicalTheme::text_secondary(),
    ))])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" About ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(about, chunks[2]);
}

fn render_unavailable(f: &mut Frame, area: Rect, state: &DashboardState) {
    let reason = state
        .unavailable_reason
        .as_deref()
        .unwrap_or("The model artifact could not be loaded");

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("! Model Not Available", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(reason, MedicalTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Source: ", MedicalTheme::text_secondary()),
            Span::styled(state.model_source.as_str(), MedicalTheme::text_muted()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Set GLUCOSENSE_MODEL_PATH to a valid artifact and restart.",
            MedicalTheme::text_muted(),
        )),
    ];
    if let Some(notice) = &state.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            MedicalTheme::warning(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]));

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::danger()),
        );

    f.render_widget(content, area);
}
