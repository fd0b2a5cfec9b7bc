use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::{Phase, Session};
use crate::timer::TICK_RATE_MS;

/// What the event loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Continue,
    Quit,
}

/// Terminal-side session host: owns the running session, mirrors its draft
/// into an editable buffer, and translates key events into session calls.
///
/// The editor buffer and the session draft are kept in lockstep: every edit
/// pushes the full buffer through `update_draft`, and every advance (manual
/// or expiry) re-seeds the buffer from the next question's starter code.
pub struct App {
    pub session: Session,
    pub interview_id: String,
    pub candidate: Option<String>,
    pub editor: String,
}

impl App {
    pub fn new(session: Session, interview_id: String, candidate: Option<String>) -> Self {
        let editor = session.draft().to_string();
        Self {
            session,
            interview_id,
            candidate,
            editor,
        }
    }

    /// Charge one tick interval against the session clock.
    pub fn on_tick(&mut self) {
        if self.session.on_tick(TICK_RATE_MS).is_some() {
            self.sync_editor();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HostAction {
        match key.code {
            KeyCode::Esc => return HostAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return HostAction::Quit;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit();
            }
            KeyCode::Enter => {
                self.editor.push('\n');
                self.push_draft();
            }
            KeyCode::Tab => {
                self.editor.push_str("    ");
                self.push_draft();
            }
            KeyCode::Backspace => {
                self.editor.pop();
                self.push_draft();
            }
            KeyCode::Char(c) => {
                self.editor.push(c);
                self.push_draft();
            }
            _ => {}
        }
        HostAction::Continue
    }

    fn submit(&mut self) {
        let content = self.editor.clone();
        // Rejected outside InProgress; a finished session stays untouched.
        if self.session.submit_current(&content).is_ok() {
            self.sync_editor();
        }
    }

    fn push_draft(&mut self) {
        let _ = self.session.update_draft(self.editor.clone());
    }

    fn sync_editor(&mut self) {
        self.editor = self.session.draft().to_string();
    }

    pub fn is_done(&self) -> bool {
        matches!(self.session.phase(), Phase::Completed | Phase::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Difficulty, Question, DEFAULT_STARTER_CODE};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: "p".to_string(),
            kind: Default::default(),
            difficulty: Difficulty::Easy,
            starter_code: None,
            examples: vec![],
            constraints: vec![],
        }
    }

    fn app(ids: &[&str]) -> App {
        let mut session = Session::new();
        session
            .begin(ids.iter().map(|id| question(id)).collect())
            .unwrap();
        App::new(session, "int-test".to_string(), None)
    }

    #[test]
    fn test_typing_updates_editor_and_draft() {
        let mut app = app(&["q1"]);
        app.editor.clear();
        app.push_draft();

        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.editor, "hi\n");
        assert_eq!(app.session.draft(), "hi\n");
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let mut app = app(&["q1"]);
        app.editor.clear();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Backspace));

        assert_eq!(app.editor, "");
        assert_eq!(app.session.draft(), "");
    }

    #[test]
    fn test_ctrl_s_submits_and_reseeds_editor() {
        let mut app = app(&["q1", "q2"]);
        app.handle_key(key(KeyCode::Char('x')));

        app.handle_key(ctrl('s'));

        assert_eq!(app.session.current_index(), 1);
        assert_eq!(app.session.completed_answers().len(), 1);
        assert!(app.session.completed_answers()[0].content.ends_with('x'));
        // Editor re-seeded with the next question's starter placeholder.
        assert_eq!(app.editor, DEFAULT_STARTER_CODE);
    }

    #[test]
    fn test_esc_and_ctrl_c_quit() {
        let mut app = app(&["q1"]);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), HostAction::Quit);
        assert_eq!(app.handle_key(ctrl('c')), HostAction::Quit);
    }

    #[test]
    fn test_submit_after_completion_leaves_session_alone() {
        let mut app = app(&["q1"]);
        app.handle_key(ctrl('s'));
        assert!(app.is_done());

        app.handle_key(ctrl('s'));
        app.handle_key(key(KeyCode::Char('z')));
        assert_eq!(app.session.completed_answers().len(), 1);
    }

    #[test]
    fn test_ticks_expire_through_host() {
        let mut app = app(&["q1"]);
        // Easy budget is 30 ticks at one second each.
        for _ in 0..30 {
            app.on_tick();
        }
        assert!(app.is_done());
        assert_eq!(app.session.completed_answers().len(), 1);
        assert_eq!(app.session.completed_answers()[0].time_remaining_ms, 0);
    }
}
