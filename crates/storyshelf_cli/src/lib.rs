//! Line-oriented terminal shell over the story shelf.
//!
//! # Responsibility
//! - Parse typed commands into `ShelfApp` actions.
//! - Print view instructions as plain text.
//! - Own the platform concerns the core leaves out: prompts, delete
//!   confirmation and the export file write.
//!
//! # Invariants
//! - Card numbers refer to the last printed browse screen (1-based).
//! - Unknown or out-of-range input prints a hint and changes nothing.

use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use storyshelf_core::view::render::{sort_label, view_toggle_label};
use storyshelf_core::{
    BrowseBody, BrowseView, ContentSegment, DetailPane, Filter, Screen, ShelfApp, StoryCard,
    StoryDraft, StoryForm, TagChip, Visibility,
};

const TAG_FIELD_COUNT: usize = 3;
/// Form answer that empties a field instead of keeping its shown value.
const CLEAR_FIELD: &str = "-";

pub const HELP_TEXT: &str = "\
commands:
  list                 re-render the current view
  view                 toggle list/timeline mode
  sort                 toggle newest/oldest first
  secret               toggle secret stories
  filter all|fav|TAG   select a tag chip
  open N               open card N
  next | prev          step through the visible stories
  close                back to the list
  fav                  toggle favorite on the open story
  delete               delete the open story (asks first)
  new | edit           create a story / edit the open story
  export [PATH]        write a JSON snapshot
  help | quit
";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Render,
    ToggleView,
    ToggleSort,
    ToggleSecret,
    Filter(Filter),
    Open(usize),
    Next,
    Prev,
    Close,
    Favorite,
    Delete,
    New,
    Edit,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" | "list" | "ls" => Command::Render,
        "view" | "timeline" => Command::ToggleView,
        "sort" => Command::ToggleSort,
        "secret" => Command::ToggleSecret,
        "filter" | "f" => match rest {
            "" | "all" => Command::Filter(Filter::None),
            "fav" | "favorites" => Command::Filter(Filter::FavoritesOnly),
            tag => Command::Filter(Filter::Tag(tag.trim_start_matches('#').to_string())),
        },
        "open" | "o" => {
            let number = rest
                .parse::<usize>()
                .ok()
                .filter(|number| *number > 0)
                .ok_or_else(|| format!("open expects a card number, got `{rest}`"))?;
            Command::Open(number)
        }
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "close" | "back" => Command::Close,
        "fav" => Command::Favorite,
        "delete" | "rm" => Command::Delete,
        "new" => Command::New,
        "edit" => Command::Edit,
        "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(command)
}

/// Interactive session bound to an input and an output stream.
pub struct Shell<I: BufRead, O: Write> {
    app: ShelfApp,
    input: I,
    output: O,
    export_path: PathBuf,
}

impl<I: BufRead, O: Write> Shell<I, O> {
    pub fn new(app: ShelfApp, input: I, output: O, export_path: PathBuf) -> Self {
        Self {
            app,
            input,
            output,
            export_path,
        }
    }

    pub fn app(&self) -> &ShelfApp {
        &self.app
    }

    pub fn into_app(self) -> ShelfApp {
        self.app
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let screen = self.app.render();
        self.print_screen(&screen)?;

        while let Some(line) = self.prompt("> ")? {
            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(hint) => writeln!(self.output, "{hint}")?,
            }
        }
        self.output.flush()
    }

    /// Applies one command and prints the resulting screen.
    pub fn execute(&mut self, command: Command) -> io::Result<()> {
        let screen = match command {
            Command::Render => Some(self.app.render()),
            Command::ToggleView => Some(Screen::Browse(self.app.toggle_view_mode())),
            Command::ToggleSort => Some(Screen::Browse(self.app.toggle_sort())),
            Command::ToggleSecret => Some(Screen::Browse(self.app.toggle_secret())),
            Command::Filter(filter) => Some(Screen::Browse(self.app.select_filter(filter))),
            Command::Open(number) => {
                let id = self.app.visible_story_ids().get(number - 1).cloned();
                id.and_then(|id| self.app.open_story(&id, number - 1))
                    .map(Screen::Detail)
            }
            Command::Next => self.app.show_next().map(Screen::Detail),
            Command::Prev => self.app.show_prev().map(Screen::Detail),
            Command::Close => Some(Screen::Browse(self.app.close_detail())),
            Command::Favorite => self
                .focused_id()
                .and_then(|id| self.app.toggle_favorite(&id))
                .map(Screen::Detail),
            Command::Delete => self.delete_focused()?,
            Command::New => {
                self.app.begin_new_story();
                self.fill_form()?
            }
            Command::Edit => match self.focused_id() {
                Some(id) if self.app.begin_edit_story(&id).is_some() => self.fill_form()?,
                _ => None,
            },
            Command::Export(path) => {
                self.export(path)?;
                None
            }
            Command::Help => {
                write!(self.output, "{HELP_TEXT}")?;
                None
            }
            Command::Quit => None,
        };

        match screen {
            Some(screen) => self.print_screen(&screen),
            None => Ok(()),
        }
    }

    fn focused_id(&self) -> Option<String> {
        self.app.open_story_id().map(str::to_string)
    }

    fn delete_focused(&mut self) -> io::Result<Option<Screen>> {
        let Some(id) = self.focused_id() else {
            return Ok(None);
        };
        let Some(title) = self.app.find_story(&id).map(|story| story.title.clone()) else {
            return Ok(None);
        };

        let answer = self.prompt(&format!("delete \"{title}\"? [y/N] "))?;
        let confirmed = matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes"));
        Ok(self
            .app
            .delete_story(&id, |_| confirmed)
            .map(Screen::Browse))
    }

    fn fill_form(&mut self) -> io::Result<Option<Screen>> {
        loop {
            let Some(form) = self.app.form().cloned() else {
                return Ok(None);
            };
            self.print_screen(&Screen::Form(form.clone()))?;

            let Some(title) = self.prompt_field("title", &form.title)? else {
                return Ok(Some(Screen::Browse(self.app.cancel_form())));
            };
            let Some(content) = self.prompt_field("content", &form.content)? else {
                return Ok(Some(Screen::Browse(self.app.cancel_form())));
            };
            let mut draft = StoryDraft::new(title, unescape_newlines(&content));
            for field_no in 1..=TAG_FIELD_COUNT {
                let prefill = if field_no == 1 { form.tags.as_str() } else { "" };
                let value = self
                    .prompt_field(&format!("tags {field_no}"), prefill)?
                    .unwrap_or_default();
                draft = draft.with_tag_field(value);
            }

            match self.app.submit_form(draft) {
                Ok(view) => return Ok(Some(Screen::Browse(view))),
                Err(err) => {
                    writeln!(self.output, "! {err}")?;
                    let retry = self.prompt("retry? [Y/n] ")?;
                    if matches!(retry.as_deref().map(str::trim), None | Some("n" | "N" | "no")) {
                        return Ok(Some(Screen::Browse(self.app.cancel_form())));
                    }
                }
            }
        }
    }

    fn export(&mut self, path: Option<PathBuf>) -> io::Result<()> {
        let target = path.unwrap_or_else(|| self.export_path.clone());
        match self.app.export_to(&target) {
            Ok(written) => {
                info!(
                    "event=export_request module=cli status=ok path={}",
                    written.display()
                );
                writeln!(
                    self.output,
                    "exported {} stories to {}",
                    self.app.stories().len(),
                    written.display()
                )
            }
            Err(err) => writeln!(self.output, "export failed: {err}"),
        }
    }

    /// Reads one line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Prompts for a form field; an empty answer keeps `current`, `-` clears it.
    fn prompt_field(&mut self, name: &str, current: &str) -> io::Result<Option<String>> {
        let label = if current.is_empty() {
            format!("{name}: ")
        } else {
            format!("{name} [{}]: ", escape_newlines(current))
        };
        Ok(self.prompt(&label)?.map(|answer| {
            let trimmed = answer.trim();
            if trimmed.is_empty() {
                current.to_string()
            } else if trimmed == CLEAR_FIELD {
                String::new()
            } else {
                answer
            }
        }))
    }

    fn print_screen(&mut self, screen: &Screen) -> io::Result<()> {
        write!(self.output, "{}", render_screen(screen))
    }
}

/// Text rendering of one screen.
pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Browse(view) => render_browse(view),
        Screen::Detail(pane) => render_detail(pane),
        Screen::Form(form) => render_form(form),
    }
}

fn render_browse(view: &BrowseView) -> String {
    let mut out = String::new();
    let visibility = match view.visibility {
        Visibility::NonSecret => "stories",
        Visibility::SecretOnly => "secret stories",
    };
    out.push_str(&format!(
        "== {visibility} | {} | [view: {}]\n",
        sort_label(view.sort_order),
        view_toggle_label(view.mode)
    ));
    out.push_str(&format!("chips: {}\n", render_chips(&view.chips.fixed)));
    if !view.chips.cp.is_empty() {
        out.push_str(&format!("  CP: {}\n", render_chips(&view.chips.cp)));
    }
    if !view.chips.general.is_empty() {
        out.push_str(&format!("  tags: {}\n", render_chips(&view.chips.general)));
    }

    let mut number = 0;
    match &view.body {
        BrowseBody::List(cards) => {
            for card in cards {
                number += 1;
                out.push_str(&render_card(number, card));
            }
        }
        BrowseBody::Timeline(sections) => {
            for section in sections {
                out.push_str(&format!("-- {} --\n", section.date_key));
                for card in &section.cards {
                    number += 1;
                    out.push_str(&render_card(number, card));
                }
            }
        }
    }
    if number == 0 {
        out.push_str("(no stories)\n");
    }
    if view.scroll_offset > 0 {
        out.push_str(&format!("(back at card {})\n", view.scroll_offset + 1));
    }
    out
}

fn render_chips(chips: &[TagChip]) -> String {
    chips
        .iter()
        .map(|chip| {
            let label = if chip.emphasized {
                format!("**{}**", chip.label)
            } else {
                chip.label.clone()
            };
            if chip.active {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_card(number: usize, card: &StoryCard) -> String {
    let star = if card.favorite { "*" } else { " " };
    let tags = if card.tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", card.tags.join(", "))
    };
    format!("{number:>3}. {star} {}{tags}\n", card.title)
}

fn render_detail(pane: &DetailPane) -> String {
    let mut out = format!(
        "## {}{}\n",
        pane.title,
        if pane.favorite { " *" } else { "" }
    );
    for segment in &pane.content {
        match segment {
            ContentSegment::Text(text) => out.push_str(text),
            ContentSegment::Emphasis(text) => out.push_str(&format!("**{text}**")),
            ContentSegment::LineBreak => out.push('\n'),
        }
    }
    out.push('\n');
    if !pane.tags.is_empty() {
        out.push_str(&format!("tags: {}\n", pane.tags.join(", ")));
    }
    out.push_str(&format!("created: {}\n", pane.created_at));

    let mut controls = Vec::new();
    if pane.has_prev {
        controls.push("prev");
    }
    controls.push("close");
    controls.push("fav");
    controls.push("edit");
    controls.push("delete");
    if pane.has_next {
        controls.push("next");
    }
    out.push_str(&format!("[{}]\n", controls.join(" | ")));
    out
}

fn render_form(form: &StoryForm) -> String {
    let mut out = match form.editing {
        Some(_) => "## edit story\n".to_string(),
        None => "## new story\n".to_string(),
    };
    if let Some(error) = &form.error {
        out.push_str(&format!("! {error}\n"));
    }
    out.push_str(&format!(
        "(empty answer keeps the shown value, `{CLEAR_FIELD}` clears it; `\\n` in content starts a new line)\n"
    ));
    out
}

fn escape_newlines(value: &str) -> String {
    value.replace('\n', "\\n")
}

fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}
