//! Patient reading input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{FieldSpec, PatientReading, FIELD_SPECS};
use crate::tui::styles::MedicalTheme;

/// Sample reading loaded with `S`: 6, 148, 72, 35, 0, 33.6, 0.627, 50.
const SAMPLE_VALUES: [&str; 8] = ["6", "148", "72", "35", "0", "33.6", "0.627", "50"];

/// Form field: its bounds plus the text typed so far
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    pub value: String,
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
    pub enforce_upper_bounds: bool,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PatientFormState {
    /// Create an empty form, one field per reading feature in vector order.
    #[must_use]
    pub fn new(enforce_upper_bounds: bool) -> Self {
        Self {
            fields: FIELD_SPECS
                .iter()
                .map(|spec| FormField {
                    spec,
                    value: String::new(),
                })
                .collect(),
            selected_field: 0,
            error_message: None,
            enforce_upper_bounds,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field.
    ///
    /// Only digits are accepted, plus one `.` in fractional fields. There is
    /// no sign key: every lower bound is zero.
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let accept = c.is_ascii_digit()
            || (c == '.' && !field.spec.integer && !field.value.contains('.'));
        if accept {
            field.value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Wipe all field buffers.
    ///
    /// Called once a reading has been submitted so the typed values do not
    /// linger in UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Parse the fields into a reading and apply the widget bounds.
    ///
    /// # Errors
    /// Returns the joined list of problems to show inline.
    pub fn to_reading(&self) -> Result<PatientReading, String> {
        let reading = PatientReading::parse_fields(
            self.fields
                .iter()
                .map(|field| (field.spec.name, field.value.as_str())),
        )
        .map_err(|errors| errors.join(", "))?;

        let out_of_bounds: Vec<String> = reading
            .to_vector()
            .iter()
            .zip(self.fields.iter())
            .filter_map(|(value, field)| field.spec.check(*value, self.enforce_upper_bounds).err())
            .collect();

        if out_of_bounds.is_empty() {
            Ok(reading)
        } else {
            Err(out_of_bounds.join(", "))
        }
    }

    /// Load the sample reading
    pub fn load_sample_data(&mut self) {
        for (field, value) in self.fields.iter_mut().zip(SAMPLE_VALUES.iter()) {
            field.value = (*value).to_string();
        }
        self.error_message = None;
    }
}

/// Render the patient reading form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let bounds = if state.enforce_upper_bounds {
        " │ Bounded inputs"
    } else {
        " │ Lower bounds only"
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Patient Information", MedicalTheme::title()),
        Span::styled(bounds, MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.spec.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.spec.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), MedicalTheme::text())
        };

        let cursor = if is_selected {
            Span::styled("▌", Style::default().fg(MedicalTheme::PRIMARY_LIGHT))
        } else {
            Span::raw("")
        };

        let content = Paragraph::new(Line::from(vec![Span::raw(" "), value_display, cursor]))
            .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.as_str(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Analyze Risk ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Del] ", MedicalTheme::key_hint()),
            Span::styled("Clear ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ])
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

    fn type_into(state: &mut PatientFormState, text: &str) {
        for c in text.chars() {
            state.input_char(c);
        }
    }

    #[test]
    fn test_sample_data_parses() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        let reading = state.to_reading().expect("Sample should parse");
        assert_eq!(reading.pregnancies, 6);
        assert_eq!(reading.age, 50);
        assert!((reading.diabetes_pedigree_function - 0.627).abs() < f64::EPSILON);
    }

    #[test]
    fn test_input_filtering() {
        let mut state = PatientFormState::default();
        // Pregnancies is an integer field: no decimal point, no sign.
        type_into(&mut state, "-3.5");
        assert_eq!(state.fields[0].value, "35");

        state.next_field();
        type_into(&mut state, "1.2.3");
        assert_eq!(state.fields[1].value, "1.23");
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = PatientFormState::default();
        state.prev_field();
        assert_eq!(state.selected_field, FIELD_SPECS.len() - 1);
        state.next_field();
        assert_eq!(state.selected_field, 0);
    }

    #[test]
    fn test_upper_bounds_enforced_when_configured() {
        let mut state = PatientFormState::new(true);
        state.load_sample_data();
        state.fields[1].value = "350".to_string();
        let err = state.to_reading().expect_err("Glucose above 300 should fail");
        assert!(err.contains("Glucose"));

        let mut relaxed = PatientFormState::new(false);
        relaxed.load_sample_data();
        relaxed.fields[1].value = "350".to_string();
        assert!(relaxed.to_reading().is_ok());
    }

    #[test]
    fn test_missing_field_reported() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        state.selected_field = 7;
        state.clear_field();
        let err = state.to_reading().expect_err("Missing age should fail");
        assert!(err.contains("Age"));
    }

    #[test]
    fn test_clear_sensitive_wipes_values() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        state.selected_field = 3;
        state.error_message = Some("stale".into());
        state.clear_sensitive();
        assert!(state.fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(state.selected_field, 0);
        assert!(state.error_message.is_none());
    }
}
