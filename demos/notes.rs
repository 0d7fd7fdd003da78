//! Notes demo - drives a NotesPage from the terminal.
//!
//! Every changed frame is also written as HTML to `notes.html`.
//!
//! Keys:
//! - Up/Down: pick a note (when no field is editing)
//! - Ctrl+T / Ctrl+E: edit title / content
//! - Enter commits the title, Ctrl+S commits either field, Escape cancels
//! - Ctrl+N: new note, Ctrl+D: toggle theme, Ctrl+Q: quit
//!
//! Run with: cargo run --example notes [config.toml] 2>notes.log

use std::cell::Cell;
use std::fs;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, execute, queue, terminal};

use notabili::host::format::list_date_time;
use notabili::host::{CONTENT_KEY, TITLE_KEY};
use notabili::{
    has_focus, logging, on_keyboard, AppConfig, AppContext, DiffRenderer, KeyboardEvent,
    MemoryNoteStore, Modifiers, NotesPage, Session, StaticSession,
};

const SNAPSHOT: &str = "notes.html";

/// Page-level actions, picked by a global key handler once the focused
/// field has passed on the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shortcut {
    Quit,
    NewNote,
    ToggleTheme,
    EditTitle,
    EditContent,
    Commit,
    Previous,
    Next,
}

impl Shortcut {
    fn from_event(event: &KeyboardEvent) -> Option<Self> {
        if event.modifiers.ctrl {
            return match event.key.as_str() {
                "q" => Some(Self::Quit),
                "n" => Some(Self::NewNote),
                "d" => Some(Self::ToggleTheme),
                "t" => Some(Self::EditTitle),
                "e" => Some(Self::EditContent),
                "s" => Some(Self::Commit),
                _ => None,
            };
        }
        match event.key.as_str() {
            "ArrowUp" => Some(Self::Previous),
            "ArrowDown" => Some(Self::Next),
            _ => None,
        }
    }
}

fn main() -> notabili::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    logging::init(&config.log);

    let session = StaticSession::signed_in(Session {
        user_id: "1".into(),
        name: "Test User".into(),
        email: "test@example.com".into(),
    });
    let ctx = Rc::new(AppContext::from_config(config, Rc::new(session)));
    let mut page = NotesPage::new(ctx, Box::new(MemoryNoteStore::seeded()))?;
    page.wait_idle(Duration::from_secs(2));

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut page, &mut stdout);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(page: &mut NotesPage, out: &mut impl Write) -> notabili::Result<()> {
    let mut html = DiffRenderer::new();
    let mut picked = 0usize;
    let mut dirty = true;

    let pending = Rc::new(Cell::new(None));
    let pending_in_handler = Rc::clone(&pending);
    let _shortcuts = on_keyboard(move |event| match Shortcut::from_event(event) {
        Some(shortcut) => {
            pending_in_handler.set(Some(shortcut));
            true
        }
        None => false,
    });

    loop {
        dirty |= page.poll(Instant::now());
        if dirty {
            let frame = page.render();
            let mut snapshot = Vec::new();
            if html.render(&frame, &mut snapshot)? {
                fs::write(SNAPSHOT, &snapshot)?;
            }
            draw(page, picked, out)?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        dirty = true;

        page.handle_key(KeyboardEvent::from(key));
        let Some(shortcut) = pending.take() else {
            continue;
        };
        match shortcut {
            Shortcut::Quit => return Ok(()),
            Shortcut::NewNote => page.new_note(),
            Shortcut::ToggleTheme => page.toggle_theme(),
            Shortcut::EditTitle => {
                page.edit_title();
            }
            Shortcut::EditContent => {
                page.edit_content();
            }
            // Terminals rarely report Ctrl+Enter
            Shortcut::Commit => {
                page.handle_key(KeyboardEvent::with_modifiers("Enter", Modifiers::ctrl()));
            }
            Shortcut::Previous | Shortcut::Next if !has_focus() => {
                let notes = page.notes();
                if notes.is_empty() {
                    continue;
                }
                picked = match shortcut {
                    Shortcut::Previous => picked.saturating_sub(1),
                    _ => (picked + 1).min(notes.len() - 1),
                };
                page.select_note(notes[picked].id);
            }
            Shortcut::Previous | Shortcut::Next => {}
        }
    }
}

fn draw(page: &NotesPage, picked: usize, out: &mut impl Write) -> io::Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;

    let notes = page.notes();
    let selected = page.selected().map(|n| n.id);
    let mut lines = vec![
        format!("Notes ({} notes) - {} mode", notes.len(), page.context().theme.theme()),
        String::new(),
    ];
    for (i, note) in notes.iter().enumerate() {
        let marker = if Some(note.id) == selected {
            '*'
        } else if i == picked {
            '>'
        } else {
            ' '
        };
        let stamp = list_date_time(&note.updated_at.with_timezone(&Local));
        lines.push(format!(" {marker} {}  ({stamp})", note.title));
    }
    lines.push(String::new());

    if selected.is_some() || page.is_new_note() {
        for (label, key, value) in [
            ("Title", TITLE_KEY, page.title()),
            ("Content", CONTENT_KEY, page.content()),
        ] {
            let shown = match page.form().inline_field(key) {
                Some(field) if field.is_editing() => format!("[{}]", field.buffer()),
                _ if value.is_empty() => "(empty)".to_string(),
                _ => value,
            };
            lines.push(format!("{label}:"));
            lines.extend(shown.lines().map(|line| format!("  {line}")));
        }
    } else {
        lines.push("Select a note to view (Up/Down), or Ctrl+N for a new one".to_string());
    }

    lines.push(String::new());
    if page.is_saving() {
        lines.push("Saving...".to_string());
    }
    if let Some(error) = page.error() {
        lines.push(format!("error: {error}"));
    }
    if let Some(success) = page.success() {
        lines.push(success);
    }

    for line in lines {
        write!(out, "{line}\r\n")?;
    }
    out.flush()
}
