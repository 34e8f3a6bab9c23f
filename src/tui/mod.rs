// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Processos-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Processos and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Interactive shell (ratatui + crossterm) over the table controller in
//! `ui`. All state transitions live in `RecordTable`; this module only maps
//! key events onto them and draws the result, so the `App` logic stays
//! testable without a terminal.

use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row as TableRow, Table, TableState, Wrap},
};
use tokio::sync::Mutex;

use crate::model::{RecordFields, RecordId};
use crate::service::{RecordService, ServiceError};
use crate::ui::{ApiError, FilterKind, RecordTable, RecordsApi};

const FOCUS_COLOR: Color = Color::LightGreen;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const EMPTY_FILTER_TEXT: &str = "Nenhum resultado encontrado";
const TOAST_TTL: Duration = Duration::from_secs(2);

/// Backend adapter for the in-process service shared with the HTTP server.
/// Lock acquisition blocks; the TUI thread never runs inside the runtime.
pub struct LocalApi {
    service: Arc<Mutex<RecordService>>,
}

impl LocalApi {
    pub fn new(service: Arc<Mutex<RecordService>>) -> Self {
        Self { service }
    }
}

fn api_error(err: ServiceError) -> ApiError {
    match err {
        ServiceError::MissingPc | ServiceError::NotFound { .. } => ApiError::Rejected {
            message: err.to_string(),
        },
        ServiceError::IdSpaceExhausted { .. } | ServiceError::Store(_) => ApiError::Transport {
            message: err.to_string(),
        },
    }
}

impl RecordsApi for LocalApi {
    fn list(&mut self) -> Result<Vec<crate::model::Record>, ApiError> {
        self.service.blocking_lock().list().map_err(api_error)
    }

    fn create(&mut self, fields: RecordFields) -> Result<crate::model::Record, ApiError> {
        self.service.blocking_lock().create(fields).map_err(api_error)
    }

    fn update(
        &mut self,
        id: &RecordId,
        fields: RecordFields,
    ) -> Result<crate::model::Record, ApiError> {
        self.service.blocking_lock().update(id, fields).map_err(api_error)
    }

    fn delete(&mut self, id: &RecordId) -> Result<(), ApiError> {
        self.service.blocking_lock().delete(id).map_err(api_error)
    }
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(service: Arc<Mutex<RecordService>>) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(LocalApi::new(service));
    app.initial_load();

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterMode {
    Inactive,
    Editing,
    Applied,
}

/// Which column of a draft currently takes keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditField {
    Pc,
    Fornecedor,
    Modalidade,
    NumMod,
    Info,
}

impl EditField {
    const ORDER: [EditField; 5] = [
        EditField::Pc,
        EditField::Fornecedor,
        EditField::Modalidade,
        EditField::NumMod,
        EditField::Info,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|field| *field == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|field| *field == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Fornecedor => "Fornecedor",
            Self::Modalidade => "Modalidade",
            Self::NumMod => "Nº Mod.",
            Self::Info => "Informações",
        }
    }

    fn of<'a>(self, fields: &'a mut RecordFields) -> &'a mut String {
        match self {
            Self::Pc => &mut fields.pc,
            Self::Fornecedor => &mut fields.fornecedor,
            Self::Modalidade => &mut fields.modalidade,
            Self::NumMod => &mut fields.num_mod,
            Self::Info => &mut fields.info,
        }
    }

    fn get(self, fields: &RecordFields) -> &str {
        match self {
            Self::Pc => &fields.pc,
            Self::Fornecedor => &fields.fornecedor,
            Self::Modalidade => &fields.modalidade,
            Self::NumMod => &fields.num_mod,
            Self::Info => &fields.info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Table,
    /// Editing the row at the given table index in place.
    EditRow { index: usize, field: EditField },
    /// The add form overlay; the draft survives failed submissions.
    AddForm { draft: RecordFields, field: EditField },
}

struct App<A: RecordsApi> {
    table: RecordTable<A>,
    mode: Mode,
    cursor: usize,
    table_state: TableState,
    filter_mode: FilterMode,
    filter_input: String,
    filter_kind: FilterKind,
    toast: Option<Toast>,
    should_quit: bool,
}

impl<A: RecordsApi> App<A> {
    fn new(api: A) -> Self {
        Self {
            table: RecordTable::new(api),
            mode: Mode::Table,
            cursor: 0,
            table_state: TableState::default(),
            filter_mode: FilterMode::Inactive,
            filter_input: String::new(),
            filter_kind: FilterKind::Substring,
            toast: None,
            should_quit: false,
        }
    }

    fn initial_load(&mut self) {
        if let Err(err) = self.table.refresh() {
            self.set_toast(format!("Load failed: {err}"));
        }
        self.clamp_cursor();
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn visible(&self) -> Vec<usize> {
        self.table.visible_rows()
    }

    fn clamp_cursor(&mut self) {
        let visible = self.visible();
        if visible.is_empty() {
            self.cursor = 0;
            self.table_state.select(None);
        } else {
            self.cursor = self.cursor.min(visible.len() - 1);
            self.table_state.select(Some(self.cursor));
        }
    }

    /// Table index under the cursor, honoring the active filter.
    fn cursor_row(&self) -> Option<usize> {
        self.visible().get(self.cursor).copied()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.filter_mode == FilterMode::Editing {
            self.handle_filter_edit_key(code);
            return false;
        }

        if self.table.pending_delete().is_some() {
            self.handle_confirm_delete_key(code);
            return false;
        }

        match self.mode.clone() {
            Mode::EditRow { index, field } => {
                self.handle_edit_row_key(code, index, field);
                false
            }
            Mode::AddForm { .. } => {
                self.handle_add_form_key(code);
                false
            }
            Mode::Table => self.handle_table_key(code),
        }
    }

    fn handle_table_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char('/') => self.enter_filter_mode(FilterKind::Substring),
            KeyCode::Char('\\') => self.enter_filter_mode(FilterKind::Fuzzy),
            KeyCode::Esc => {
                if self.filter_mode == FilterMode::Applied {
                    self.clear_filter();
                }
            }
            KeyCode::Char('a') => {
                self.mode = Mode::AddForm {
                    draft: RecordFields::default(),
                    field: EditField::Pc,
                };
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(index) = self.cursor_row() {
                    self.table.begin_edit(index);
                    self.mode = Mode::EditRow {
                        index,
                        field: EditField::Pc,
                    };
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(index) = self.cursor_row() {
                    self.table.request_delete(index);
                }
            }
            KeyCode::Char('r') => {
                match self.table.refresh() {
                    Ok(()) => self.set_toast("Reloaded"),
                    Err(err) => self.set_toast(format!("Reload failed: {err}")),
                }
                self.clamp_cursor();
            }
            _ => {}
        }
        false
    }

    fn move_cursor(&mut self, delta: i32) {
        let visible = self.visible();
        if visible.is_empty() {
            return;
        }
        let len = visible.len() as i32;
        let next = (self.cursor as i32 + delta).clamp(0, len - 1);
        self.cursor = next as usize;
        self.table_state.select(Some(self.cursor));
    }

    fn enter_filter_mode(&mut self, kind: FilterKind) {
        self.filter_mode = FilterMode::Editing;
        self.filter_kind = kind;
        self.filter_input.clear();
        self.table.set_filter(String::new(), kind);
        self.cursor = 0;
    }

    fn handle_filter_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.clear_filter(),
            KeyCode::Enter => {
                self.filter_mode = if self.filter_input.is_empty() {
                    FilterMode::Inactive
                } else {
                    FilterMode::Applied
                };
            }
            KeyCode::Backspace => {
                self.filter_input.pop();
                self.apply_filter_input();
            }
            KeyCode::Char(ch) => {
                self.filter_input.push(ch);
                self.apply_filter_input();
            }
            _ => {}
        }
    }

    fn apply_filter_input(&mut self) {
        self.table.set_filter(self.filter_input.clone(), self.filter_kind);
        self.cursor = 0;
        self.clamp_cursor();
    }

    fn clear_filter(&mut self) {
        self.filter_mode = FilterMode::Inactive;
        self.filter_input.clear();
        self.table.clear_filter();
        self.clamp_cursor();
    }

    fn handle_confirm_delete_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                match self.table.confirm_delete() {
                    Ok(()) => self.set_toast("Record deleted"),
                    Err(err) => self.set_toast(format!("Delete failed: {err}")),
                }
                self.clamp_cursor();
            }
            KeyCode::Char('n') | KeyCode::Esc => self.table.dismiss_delete(),
            _ => {}
        }
    }

    fn handle_edit_row_key(&mut self, code: KeyCode, index: usize, field: EditField) {
        match code {
            KeyCode::Esc => {
                self.table.cancel_edit(index);
                self.mode = Mode::Table;
            }
            KeyCode::Enter => {
                match self.table.save_edit(index) {
                    Ok(()) => self.set_toast("Saved"),
                    Err(err) => self.set_toast(format!("Save failed: {err}")),
                }
                self.mode = Mode::Table;
                self.clamp_cursor();
            }
            KeyCode::Tab => {
                self.mode = Mode::EditRow {
                    index,
                    field: field.next(),
                };
            }
            KeyCode::BackTab => {
                self.mode = Mode::EditRow {
                    index,
                    field: field.prev(),
                };
            }
            KeyCode::Backspace => {
                if let Some(draft) = self.table.draft_mut(index) {
                    field.of(draft).pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(draft) = self.table.draft_mut(index) {
                    field.of(draft).push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_add_form_key(&mut self, code: KeyCode) {
        let Mode::AddForm { mut draft, field } = self.mode.clone() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Table;
            }
            KeyCode::Enter => match self.table.create(draft.clone()) {
                Ok(()) => {
                    self.mode = Mode::Table;
                    self.set_toast("Record created");
                    self.clamp_cursor();
                }
                Err(err) => {
                    // The form stays open and keeps its contents.
                    self.set_toast(format!("Create failed: {err}"));
                }
            },
            KeyCode::Tab => {
                self.mode = Mode::AddForm {
                    draft,
                    field: field.next(),
                };
            }
            KeyCode::BackTab => {
                self.mode = Mode::AddForm {
                    draft,
                    field: field.prev(),
                };
            }
            KeyCode::Backspace => {
                field.of(&mut draft).pop();
                self.mode = Mode::AddForm { draft, field };
            }
            KeyCode::Char(ch) => {
                field.of(&mut draft).push(ch);
                self.mode = Mode::AddForm { draft, field };
            }
            _ => {}
        }
    }
}

fn draw<A: RecordsApi>(frame: &mut Frame<'_>, app: &mut App<A>) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    draw_table(frame, app, main_area);

    if let Mode::AddForm { draft, field } = &app.mode {
        draw_form_popup(frame, main_area, "Novo Processo", draft, *field);
    }
    if let Some(id) = app.table.pending_delete() {
        draw_confirm_popup(frame, main_area, id);
    }

    let toast_snapshot = app.toast.as_ref().map(|toast| (toast.message.clone(), toast.expires_at));
    let toast_suffix = match toast_snapshot {
        Some((message, expires_at)) if expires_at > Instant::now() => format!(" | {message}"),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };

    if app.filter_mode == FilterMode::Editing {
        let prefix = match app.filter_kind {
            FilterKind::Substring => '/',
            FilterKind::Fuzzy => '\\',
        };
        let status = Paragraph::new(format!("{prefix}{}{toast_suffix}", app.filter_input));
        frame.render_widget(status, status_area);
        let cursor_x = status_area
            .x
            .saturating_add(1)
            .saturating_add(app.filter_input.chars().count() as u16)
            .min(status_area.x.saturating_add(status_area.width.saturating_sub(1)));
        frame.set_cursor(cursor_x, status_area.y);
        return;
    }

    let status = Paragraph::new(footer_help_line(app, &toast_suffix));
    frame.render_widget(status, status_area);
}

fn draw_table<A: RecordsApi>(frame: &mut Frame<'_>, app: &mut App<A>, area: Rect) {
    let visible = app.visible();
    let editing_index = match &app.mode {
        Mode::EditRow { index, .. } => Some(*index),
        _ => None,
    };
    let edit_field = match &app.mode {
        Mode::EditRow { field, .. } => Some(*field),
        _ => None,
    };

    let header = TableRow::new(
        ["PC", "Fornecedor", "Modalidade", "Nº Mod.", "Informações"]
            .into_iter()
            .map(|label| Cell::from(label).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let rows: Vec<TableRow<'static>> = visible
        .iter()
        .map(|&index| {
            let row = &app.table.rows()[index];
            let fields = &row.record.fields;
            let mut cells = EditField::ORDER
                .iter()
                .map(|field| {
                    let mut text = field.get(fields).to_owned();
                    if editing_index == Some(index) && edit_field == Some(*field) {
                        text.push('▏');
                    }
                    Cell::from(text)
                })
                .collect::<Vec<_>>();
            if row.is_editing() {
                cells = cells
                    .into_iter()
                    .map(|cell| cell.style(Style::default().fg(Color::Yellow)))
                    .collect();
            }
            TableRow::new(cells)
        })
        .collect();

    let title = match app.filter_mode {
        FilterMode::Inactive => format!("Processos ({})", app.table.rows().len()),
        _ => format!("Processos ({}/{})", visible.len(), app.table.rows().len()),
    };
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .highlight_style(Style::default().bg(Color::DarkGray))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(FOCUS_COLOR)),
    );
    frame.render_stateful_widget(table, area, &mut app.table_state);

    if app.table.shows_empty_filter_state() {
        let inner = Rect {
            x: area.x.saturating_add(2),
            y: area.y.saturating_add(2),
            width: area.width.saturating_sub(4),
            height: 1,
        };
        let empty = Paragraph::new(EMPTY_FILTER_TEXT).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn draw_form_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    draft: &RecordFields,
    focused: EditField,
) {
    let popup = centered_rect(area, 50, 9);
    frame.render_widget(Clear, popup);

    let lines = EditField::ORDER
        .iter()
        .map(|field| {
            let marker = if *field == focused { "▸ " } else { "  " };
            let style = if *field == focused {
                Style::default().fg(FOCUS_COLOR)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<12}", field.label()), style),
                Span::raw(field.get(draft).to_owned()),
            ])
        })
        .collect::<Vec<_>>();

    let form = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_owned())
            .border_style(Style::default().fg(FOCUS_COLOR)),
    );
    frame.render_widget(form, popup);
}

fn draw_confirm_popup(frame: &mut Frame<'_>, area: Rect, id: &RecordId) {
    let popup = centered_rect(area, 46, 5);
    frame.render_widget(Clear, popup);

    let text = Text::from(vec![
        Line::raw(format!("Excluir o processo {id}?")),
        Line::raw(""),
        Line::raw("[y] confirmar   [n] cancelar"),
    ]);
    let confirm = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirmação")
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(confirm, popup);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn footer_help_line<A: RecordsApi>(app: &App<A>, toast_suffix: &str) -> Line<'static> {
    let keys: &[(&str, &str)] = match app.mode {
        Mode::EditRow { .. } => &[
            ("Tab", "campo"),
            ("Enter", "salvar"),
            ("Esc", "cancelar"),
        ],
        Mode::AddForm { .. } => &[
            ("Tab", "campo"),
            ("Enter", "criar"),
            ("Esc", "fechar"),
        ],
        Mode::Table => &[
            ("a", "novo"),
            ("e", "editar"),
            ("d", "excluir"),
            ("/", "filtrar"),
            ("\\", "filtro fuzzy"),
            ("r", "recarregar"),
            ("q", "sair"),
        ],
    };

    let mut spans = Vec::new();
    for (idx, (key, label)) in keys.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        spans.push(Span::styled((*key).to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(format!(" {label}"), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    if !toast_suffix.is_empty() {
        spans.push(Span::raw(toast_suffix.to_owned()));
    }
    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
