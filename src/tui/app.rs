//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Inference requests against the loaded model

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::logistic::{JsonModelStore, LogisticModel};
use crate::application::InferenceAdapter;
use crate::config::AppConfig;
use crate::ports::{Classifier, ModelStore};
use crate::InferenceError;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    PatientForm,
    Result,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Inference adapter; may hold no model
    adapter: InferenceAdapter<LogisticModel>,

    /// Applied to every new patient form
    enforce_upper_bounds: bool,

    /// Dashboard state
    dashboard_state: DashboardState,

    /// Patient form state
    patient_form_state: PatientFormState,

    /// Last submission outcome; set before the result screen is shown
    result_state: Option<ResultState>,
}

impl App {
    /// Create a new application, loading the model named by the configuration.
    ///
    /// A model that fails to load does not stop the app: the dashboard shows
    /// the reason and assessments are refused.
    ///
    /// # Errors
    /// Currently infallible; kept fallible for the entry point's `?`.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = match &config.model_sha256 {
            Some(digest) => JsonModelStore::new().with_expected_sha256(digest.as_str()),
            None => JsonModelStore::new(),
        };

        let adapter = InferenceAdapter::from_load(store.load(&config.model_path));

        Ok(Self::with_dependencies(
            adapter,
            config.model_path.display().to_string(),
            config.enforce_upper_bounds,
        ))
    }

    /// Create application with an injected adapter (Composition Root pattern).
    ///
    /// # Arguments
    /// * `adapter` - Inference adapter, with or without a model
    /// * `model_source` - Where the model was loaded from, for display
    /// * `enforce_upper_bounds` - Whether form fields reject values above their range
    #[must_use]
    pub fn with_dependencies(
        adapter: InferenceAdapter<LogisticModel>,
        model_source: String,
        enforce_upper_bounds: bool,
    ) -> Self {
        let mut app = Self {
            screen: Screen::Dashboard,
            should_quit: false,
            adapter,
            enforce_upper_bounds,
            dashboard_state: DashboardState {
                model_source,
                ..DashboardState::default()
            },
            patient_form_state: PatientFormState::new(enforce_upper_bounds),
            result_state: None,
        };
        app.update_dashboard_state();
        app
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Dashboard => render_dashboard(f, content_area, &self.dashboard_state),
                    Screen::PatientForm => {
                        render_patient_form(f, content_area, &self.patient_form_state)
                    }
                    Screen::Result => {
                        if let Some(state) = &self.result_state {
                            render_result(f, content_area, state);
                        }
                    }
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.start_assessment(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.patient_form_state.clear_sensitive();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up => {
                self.patient_form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.patient_form_state.next_field();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.patient_form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.patient_form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.patient_form_state.delete_char();
            }
            KeyCode::Delete => {
                self.patient_form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_patient_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                self.update_dashboard_state();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Char('n') | KeyCode::Char('N')
                if matches!(self.result_state, Some(ResultState::Complete { .. })) =>
            {
                self.start_assessment();
            }
            _ => {}
        }
    }

    fn start_assessment(&mut self) {
        if !self.adapter.is_model_available() {
            tracing::warn!("Assessment refused: model not available");
            self.dashboard_state.notice =
                Some("Model not available. Assessments are disabled.".to_string());
            self.screen = Screen::Dashboard;
            return;
        }

        self.dashboard_state.notice = None;
        self.patient_form_state = PatientFormState::new(self.enforce_upper_bounds);
        self.screen = Screen::PatientForm;
    }

    fn submit_patient_form(&mut self) {
        let reading = match self.patient_form_state.to_reading() {
            Ok(reading) => reading,
            Err(e) => {
                self.patient_form_state.error_message = Some(e);
                return;
            }
        };

        match self.adapter.infer(&reading) {
            Ok(result) => {
                tracing::info!("Assessment complete: {}", result);
                let threshold = self
                    .adapter
                    .model()
                    .map_or(0.5, |model| model.decision_threshold());
                self.result_state = Some(ResultState::complete(&reading, result, threshold));
                self.screen = Screen::Result;

                // Clear plaintext buffers from the UI immediately.
                self.patient_form_state.clear_sensitive();
            }
            Err(InferenceError::InvalidInput(message)) => {
                self.patient_form_state.error_message = Some(message);
            }
            Err(e @ InferenceError::ModelUnavailable(_)) => {
                tracing::error!("Inference failed: {}", e);
                self.result_state = Some(ResultState::Error {
                    message: e.to_string(),
                });
                self.patient_form_state.clear_sensitive();
                self.screen = Screen::Result;
            }
        }
    }

    fn update_dashboard_state(&mut self) {
        self.dashboard_state.model_loaded = self.adapter.is_model_available();
        self.dashboard_state.model_digest = self
            .adapter
            .model()
            .map(|model| model.digest().to_string());
        self.dashboard_state.unavailable_reason =
            self.adapter.unavailable_reason().map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiabetesLabel;
    use std::path::Path;
    use std::sync::Arc;

    fn loaded_app() -> App {
        let model = JsonModelStore::new()
            .load(Path::new("models/diabetes_model.json"))
            .expect("Fixture model should load");
        App::with_dependencies(
            InferenceAdapter::new(Arc::new(model)),
            "models/diabetes_model.json".to_string(),
            true,
        )
    }

    fn unavailable_app() -> App {
        App::with_dependencies(
            InferenceAdapter::unavailable("Model artifact not found"),
            "missing.json".to_string(),
            true,
        )
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_dashboard_reflects_model() {
        let app = loaded_app();
        assert!(app.dashboard_state.model_loaded);
        assert_eq!(
            app.dashboard_state.model_digest.as_deref().map(str::len),
            Some(64)
        );

        let app = unavailable_app();
        assert!(!app.dashboard_state.model_loaded);
        assert_eq!(
            app.dashboard_state.unavailable_reason.as_deref(),
            Some("Model artifact not found")
        );
    }

    #[test]
    fn test_new_assessment_refused_without_model() {
        let mut app = unavailable_app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.dashboard_state.notice.is_some());
    }

    #[test]
    fn test_sample_assessment_flow() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::PatientForm);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Result);

        match &app.result_state {
            Some(ResultState::Complete {
                result,
                reference_percent,
                ..
            }) => {
                assert_eq!(result.label, DiabetesLabel::Diabetic);
                assert!((result.risk_probability - 72.29336421169434).abs() < 1e-6);
                assert!((reference_percent - 50.0).abs() < 1e-9);
            }
            other => panic!("Expected complete result, got {other:?}"),
        }

        // Submitted values are wiped from the form.
        assert!(app
            .patient_form_state
            .fields
            .iter()
            .all(|field| field.value.is_empty()));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_incomplete_form_stays_inline() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::PatientForm);
        let error = app
            .patient_form_state
            .error_message
            .as_deref()
            .expect("Missing fields should be reported");
        assert!(error.contains("Glucose"));
        assert_eq!(app.patient_form_state.fields[0].value, "6");
    }

    #[test]
    fn test_unavailable_model_reaches_error_screen() {
        let mut app = unavailable_app();
        app.screen = Screen::PatientForm;
        app.patient_form_state.load_sample_data();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Result);
        assert!(matches!(app.result_state, Some(ResultState::Error { .. })));
        assert!(app
            .patient_form_state
            .fields
            .iter()
            .all(|field| field.value.is_empty()));
    }

    #[test]
    fn test_ctrl_q_quits_from_any_screen() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('n'));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_plain_q_is_text_on_form() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.screen, Screen::PatientForm);
    }
}
