use std::mem;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{error, info};

use crate::error::{InventoryError, InventoryResult};
use crate::models::Equipment;
use crate::service::{Answers, InventoryService, Outcome};

use super::forms::{ConfirmPrompt, EquipmentField, EquipmentForm, HolderPrompt, Pending};
use super::helpers::{centered_rect, surface_error};
use super::report_view::ReportView;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 1;
const APP_TITLE: &str = "School Playground Management System";

/// High-level navigation states.
enum Screen {
    Inventory,
    Report(ReportView),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    Adding(EquipmentForm),
    Editing {
        original: Equipment,
        form: EquipmentForm,
    },
    HolderPrompt(HolderPrompt),
    Confirm(ConfirmPrompt),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. All reads and writes go
/// through the inventory service; `records` is only a cached listing that is
/// re-read after every change.
pub struct App {
    service: InventoryService,
    records: Vec<Equipment>,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    report_dir: PathBuf,
    last_export: Option<PathBuf>,
}

impl App {
    pub fn new(service: InventoryService, report_dir: PathBuf) -> Result<Self> {
        let records = service
            .records()
            .context("failed to load equipment records")?;
        Ok(Self {
            service,
            records,
            selected: 0,
            screen: Screen::Inventory,
            mode: Mode::Normal,
            status: None,
            report_dir,
            last_export: None,
        })
    }

    /// Route a key press to the active mode. Returns `true` when the user
    /// asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) => self.handle_form_key(code, None, form),
            Mode::Editing { original, form } => self.handle_form_key(code, Some(original), form),
            Mode::HolderPrompt(prompt) => self.handle_holder_key(code, prompt),
            Mode::Confirm(confirm) => self.handle_confirm_key(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        if let Screen::Report(_) = self.screen {
            match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Char('r') | KeyCode::Char('R') => {
                    self.screen = Screen::Inventory;
                    self.clear_status();
                }
                KeyCode::Char('x') | KeyCode::Char('X') => self.export_report(),
                KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_export(),
                _ => {}
            }
            return Mode::Normal;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.records.len().saturating_sub(1),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Mode::Adding(EquipmentForm::default());
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let selection = self.current_record().cloned();
                match self.service.view(selection.as_ref()) {
                    Ok(original) => {
                        self.clear_status();
                        let form = EquipmentForm::from_equipment(&original);
                        return Mode::Editing { original, form };
                    }
                    Err(err) => self.report_error(&err),
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let selection = self.current_record().cloned();
                let result = self.service.remove(selection.as_ref());
                self.apply(result);
            }
            KeyCode::Char('D') => return self.begin(Pending::Clear),
            KeyCode::Char('s') | KeyCode::Char('S') => match self.current_record().cloned() {
                Some(equipment) => return self.begin(Pending::Toggle(equipment)),
                None => {
                    let result = self.service.toggle_status(None, &mut Answers::declined());
                    self.apply(result);
                }
            },
            KeyCode::Char('r') | KeyCode::Char('R') => self.open_report(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_report(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_export(),
            KeyCode::Char('l') | KeyCode::Char('L') => match self.reload_records(None) {
                Ok(()) => self.set_status("Inventory reloaded.", StatusKind::Info),
                Err(err) => {
                    error!(error = %err, "failed to reload inventory");
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            },
            _ => {}
        }
        Mode::Normal
    }

    fn handle_form_key(
        &mut self,
        code: KeyCode,
        original: Option<Equipment>,
        mut form: EquipmentForm,
    ) -> Mode {
        match code {
            KeyCode::Esc => {
                let message = if original.is_some() {
                    "Edit cancelled."
                } else {
                    "Add cancelled."
                };
                self.set_status(message, StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.cycle_field(true),
            KeyCode::BackTab | KeyCode::Up => form.cycle_field(false),
            KeyCode::Left | KeyCode::Right => form.toggle_status(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                form.error = None;
                let pending = match original {
                    Some(original) => Pending::Update { original, form },
                    None => Pending::Add(form),
                };
                return self.begin(pending);
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        match original {
            Some(original) => Mode::Editing { original, form },
            None => Mode::Adding(form),
        }
    }

    fn handle_holder_key(&mut self, code: KeyCode, mut prompt: HolderPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Backspace => {
                prompt.input.pop();
                Mode::HolderPrompt(prompt)
            }
            KeyCode::Enter => {
                let holder = prompt.input.trim().to_string();
                if holder.is_empty() {
                    // Let the service reject it so the message matches every
                    // other entry point.
                    self.execute(prompt.pending, Answers::declined())
                } else {
                    self.after_holder(prompt.pending, Some(holder))
                }
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    prompt.input.push(ch);
                }
                Mode::HolderPrompt(prompt)
            }
            _ => Mode::HolderPrompt(prompt),
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode, confirm: ConfirmPrompt) -> Mode {
        let confirmed = match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => false,
            _ => return Mode::Confirm(confirm),
        };

        let answers = Answers {
            confirm: confirmed,
            holder: confirm.holder,
        };
        self.execute(confirm.pending, answers)
    }

    /// First step of an action: ask for a holder when one is needed.
    fn begin(&mut self, pending: Pending) -> Mode {
        if pending.needs_holder() {
            Mode::HolderPrompt(HolderPrompt {
                pending,
                input: String::new(),
            })
        } else {
            self.after_holder(pending, None)
        }
    }

    /// Second step: ask the yes/no question if the action has one, otherwise
    /// run it straight away.
    fn after_holder(&mut self, pending: Pending, holder: Option<String>) -> Mode {
        match pending.confirmation() {
            Some(question) => Mode::Confirm(ConfirmPrompt {
                question,
                pending,
                holder,
            }),
            None => self.execute(
                pending,
                Answers {
                    confirm: true,
                    holder,
                },
            ),
        }
    }

    /// Hand the collected answers to the service. Forms reopen with the error
    /// when the input itself was rejected.
    fn execute(&mut self, pending: Pending, mut answers: Answers) -> Mode {
        let (result, form_mode) = match pending {
            Pending::Add(form) => (
                self.service.add(form.draft(), &mut answers),
                Some(Mode::Adding(form)),
            ),
            Pending::Update { original, form } => (
                self.service
                    .update(Some(&original), form.changes(), &mut answers),
                Some(Mode::Editing { original, form }),
            ),
            Pending::Toggle(equipment) => (
                self.service.toggle_status(Some(&equipment), &mut answers),
                None,
            ),
            Pending::Clear => (self.service.clear(&mut answers), None),
        };

        let reopen = matches!(
            result,
            Err(InventoryError::DuplicateKey(_)) | Err(InventoryError::Validation(_))
        );
        let message = result.as_ref().err().map(ToString::to_string);
        self.apply(result);

        match (form_mode, message) {
            (Some(Mode::Adding(mut form)), Some(message)) if reopen => {
                form.error = Some(message);
                Mode::Adding(form)
            }
            (Some(Mode::Editing { original, mut form }), Some(message)) if reopen => {
                form.error = Some(message);
                Mode::Editing { original, form }
            }
            _ => Mode::Normal,
        }
    }

    /// Show the outcome and refresh the listing when the table changed.
    fn apply(&mut self, result: InventoryResult<Outcome>) {
        match result {
            Ok(outcome) => {
                if outcome.needs_refresh() {
                    let focus = outcome.focus_id().map(str::to_string);
                    if let Err(err) = self.reload_records(focus.as_deref()) {
                        error!(error = %err, "failed to refresh inventory");
                        self.set_status(surface_error(&err), StatusKind::Error);
                        return;
                    }
                }
                self.set_status(outcome.describe(), StatusKind::Info);
            }
            Err(err) => self.report_error(&err),
        }
    }

    fn report_error(&mut self, err: &InventoryError) {
        if matches!(err, InventoryError::Storage(_) | InventoryError::Io(_)) {
            error!(error = %err, "inventory action failed");
        } else {
            info!(error = %err, "inventory action rejected");
        }
        self.set_status(err.to_string(), StatusKind::Error);
    }

    fn open_report(&mut self) {
        let mut view = ReportView::default();
        match self.service.render_report(&mut view) {
            Ok(()) => {
                self.screen = Screen::Report(view);
                self.clear_status();
            }
            Err(err) => self.report_error(&err),
        }
    }

    fn export_report(&mut self) {
        match self.service.export_report(&self.report_dir, Local::now()) {
            Ok(path) => {
                self.set_status(
                    format!("Report saved as {}", path.display()),
                    StatusKind::Info,
                );
                self.last_export = Some(path);
            }
            Err(err) => self.report_error(&err),
        }
    }

    fn open_last_export(&mut self) {
        let Some(path) = self.last_export.clone() else {
            self.set_status("No report exported yet.", StatusKind::Error);
            return;
        };
        match open_path(&path) {
            Ok(()) => self.set_status(format!("Opened {}.", path.display()), StatusKind::Info),
            Err(err) => self.set_status(format!("Failed to open report: {err}"), StatusKind::Error),
        }
    }

    fn reload_records(&mut self, focus_id: Option<&str>) -> Result<()> {
        self.records = self
            .service
            .records()
            .context("failed to reload equipment records")?;
        if self.records.is_empty() {
            self.selected = 0;
            return Ok(());
        }

        if let Some(id) = focus_id {
            if let Some(idx) = self.records.iter().position(|record| record.id == id) {
                self.selected = idx;
                return Ok(());
            }
        }

        if self.selected >= self.records.len() {
            self.selected = self.records.len() - 1;
        }
        Ok(())
    }

    fn current_record(&self) -> Option<&Equipment> {
        self.records.get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        if self.records.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.records.len() - 1;
        self.selected = self.selected.saturating_add_signed(offset).min(last);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        let header = Paragraph::new(APP_TITLE)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(header, chunks[0]);

        match &self.screen {
            Screen::Inventory => self.draw_inventory(frame, chunks[1]),
            Screen::Report(view) => view.draw(frame, chunks[1]),
        }

        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Adding(form) => self.draw_form(frame, area, "Add Record", form),
            Mode::Editing { form, .. } => self.draw_form(frame, area, "Update Record", form),
            Mode::HolderPrompt(prompt) => self.draw_holder_prompt(frame, area, prompt),
            Mode::Confirm(confirm) => self.draw_confirm(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_inventory(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("PLAYGROUND INVENTORY")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL);

        if self.records.is_empty() {
            let message = Paragraph::new("No equipment yet. Press '+' to add a record.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(
            [
                "Equipment Name",
                "Equipment ID",
                "Category",
                "Status",
                "Student ID",
            ]
            .map(Cell::from),
        )
        .style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(255, 140, 0))
                .add_modifier(Modifier::BOLD),
        );

        let rows = self.records.iter().map(|record| {
            let status_style = if record.is_in_use() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            Row::new(vec![
                Cell::from(record.name.clone()),
                Cell::from(record.id.clone()),
                Cell::from(record.category.clone()),
                Cell::from(record.status.as_str()).style(status_style),
                Cell::from(record.holder.clone()),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(30),
                Constraint::Percentage(18),
                Constraint::Percentage(18),
                Constraint::Percentage(16),
                Constraint::Percentage(18),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Adding(_)) | (_, Mode::Editing { .. }) => &[
                ("[Tab]", " Next field   "),
                ("[←→/Space]", " Status   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (_, Mode::HolderPrompt(_)) => &[("[Enter]", " Confirm   "), ("[Esc]", " Cancel")],
            (_, Mode::Confirm(_)) => &[("[Y]", " Yes   "), ("[N/Esc]", " No")],
            (Screen::Report(_), Mode::Normal) => &[
                ("[x]", " Export PDF   "),
                ("[o]", " Open export   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
            (Screen::Inventory, Mode::Normal) => &[
                ("[+]", " Add   "),
                ("[e]", " Update   "),
                ("[d]", " Delete   "),
                ("[D]", " Delete all   "),
                ("[s]", " Change status   "),
                ("[r]", " Report   "),
                ("[x]", " Export PDF   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, text)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(text.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &EquipmentForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = [
            EquipmentField::Name,
            EquipmentField::Id,
            EquipmentField::Category,
            EquipmentField::Status,
        ];
        let mut lines: Vec<Line> = fields.iter().map(|field| form.build_line(*field)).collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if form.active != EquipmentField::Status {
            let row = fields
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or(0) as u16;
            let prefix = format!("{}: ", form.active.label()).len() as u16;
            frame.set_cursor_position((
                inner.x + prefix + form.value_len(form.active) as u16,
                inner.y + row,
            ));
        }
    }

    fn draw_holder_prompt(&self, frame: &mut Frame, area: Rect, prompt: &HolderPrompt) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Student ID").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Enter Student's ID using this equipment:"),
            Line::from(Span::styled(
                prompt.input.clone(),
                Style::default().fg(Color::Yellow),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        frame.set_cursor_position((inner.x + prompt.input.chars().count() as u16, inner.y + 1));
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmPrompt) {
        let popup_area = centered_rect(60, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(confirm.question.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(confirm.question.question()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::EquipmentStore;
    use crate::models::{Status, HOLDER_NONE};

    fn app() -> App {
        let service = InventoryService::new(EquipmentStore::open_in_memory().unwrap());
        App::new(service, std::env::temp_dir()).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    /// Add a record through the form: name, tab, id, tab, category.
    fn add_through_form(app: &mut App, name: &str, id: &str, in_use_by: Option<&str>) {
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(app, name);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, id);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, "Ball");
        if let Some(holder) = in_use_by {
            app.handle_key(KeyCode::Tab).unwrap();
            app.handle_key(KeyCode::Right).unwrap();
            app.handle_key(KeyCode::Enter).unwrap();
            type_text(app, holder);
        }
        app.handle_key(KeyCode::Enter).unwrap();
    }

    #[test]
    fn add_flow_asks_confirmation_then_refreshes() {
        let mut app = app();
        add_through_form(&mut app, "Football", "F1", None);
        assert!(matches!(app.mode, Mode::Confirm(_)));
        assert!(app.records.is_empty());

        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.records.len(), 1);
        assert_eq!(app.records[0].holder, HOLDER_NONE);
    }

    #[test]
    fn in_use_add_collects_holder_before_confirmation() {
        let mut app = app();
        add_through_form(&mut app, "Cricket bat", "B1", Some("S77"));
        assert!(matches!(app.mode, Mode::Confirm(_)));

        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.records[0].status, Status::InUse);
        assert_eq!(app.records[0].holder, "S77");
    }

    #[test]
    fn duplicate_id_reopens_the_form_with_the_error() {
        let mut app = app();
        add_through_form(&mut app, "Football", "F1", None);
        app.handle_key(KeyCode::Char('y')).unwrap();

        add_through_form(&mut app, "Other", "F1", None);
        app.handle_key(KeyCode::Char('y')).unwrap();

        match &app.mode {
            Mode::Adding(form) => assert!(form.error.as_deref().unwrap().contains("F1")),
            _ => panic!("expected the add form to reopen"),
        }
        assert_eq!(app.records.len(), 1);
    }

    #[test]
    fn declining_the_add_leaves_the_table_empty() {
        let mut app = app();
        add_through_form(&mut app, "Football", "F1", None);
        app.handle_key(KeyCode::Char('n')).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.records.is_empty());
    }

    #[test]
    fn toggle_issues_then_returns_the_selected_record() {
        let mut app = app();
        add_through_form(&mut app, "Football", "F1", None);
        app.handle_key(KeyCode::Char('y')).unwrap();

        app.handle_key(KeyCode::Char('s')).unwrap();
        assert!(matches!(app.mode, Mode::HolderPrompt(_)));
        type_text(&mut app, "S123");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.records[0].holder, "S123");

        app.handle_key(KeyCode::Char('s')).unwrap();
        assert!(matches!(app.mode, Mode::Confirm(_)));
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert_eq!(app.records[0].status, Status::Available);
        assert_eq!(app.records[0].holder, HOLDER_NONE);
    }

    #[test]
    fn blank_holder_is_rejected_without_writing() {
        let mut app = app();
        add_through_form(&mut app, "Football", "F1", None);
        app.handle_key(KeyCode::Char('y')).unwrap();

        app.handle_key(KeyCode::Char('s')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
        assert_eq!(app.records[0].status, Status::Available);
    }

    #[test]
    fn report_on_empty_inventory_stays_on_table() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r')).unwrap();

        assert!(matches!(app.screen, Screen::Inventory));
        assert_eq!(
            app.status.as_ref().map(|status| status.text.as_str()),
            Some("No records available for report.")
        );
    }

    #[test]
    fn failed_reload_is_reported_and_the_app_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playground.db");
        let service = InventoryService::new(EquipmentStore::open(&path).unwrap());
        let mut app = App::new(service, dir.path().join("reports")).unwrap();
        add_through_form(&mut app, "Football", "F1", None);
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert_eq!(app.records.len(), 1);

        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("DROP TABLE equipment")
            .unwrap();

        assert!(!app.handle_key(KeyCode::Char('l')).unwrap());
        assert!(matches!(app.mode, Mode::Normal));
        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
        assert_eq!(app.records.len(), 1);
    }

    #[test]
    fn delete_without_selection_reports_not_found() {
        let mut app = app();
        app.handle_key(KeyCode::Char('d')).unwrap();

        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
    }
}
