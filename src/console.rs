//! Line-oriented terminal front-end for the catalog page

use async_trait::async_trait;
use std::fmt::Write as _;
use std::io::Write as _;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::Mutex;

use crate::{
    controllers::{
        Confirm, ConfirmPrompt, DeleteOutcome, FormOutcome, ListView, Modal, Notification,
        NotificationKind, Notifier, Row,
    },
    error::AppResult,
    models::{BookDraft, Field, Genre, SortBy},
    validation::FieldErrors,
};

/// Input lines shared by the command loop and the confirmation prompt
pub type SharedLines<R> = Arc<Mutex<Lines<R>>>;

pub const HELP: &str = "\
Perintah:
  list                      muat ulang dan tampilkan daftar buku
  search <teks>             saring berdasarkan judul atau pengarang
  sort none|judul|tahun     urutkan daftar
  add                       buka formulir tambah buku
  edit <id>                 buka formulir ubah buku
  set <field> <nilai>       isi kolom formulir (id, judul, pengarang, tahun, genre)
  save                      simpan formulir
  cancel                    tutup formulir
  delete <id>               hapus buku
  genres                    tampilkan daftar genre
  help                      tampilkan bantuan ini
  quit                      keluar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Search(String),
    Sort(SortBy),
    Add,
    Edit(String),
    Set(Field, String),
    Save,
    Cancel,
    Delete(String),
    Genres,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| {
            if rest.is_empty() {
                Err(format!("{} membutuhkan {}", word, what))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "search" => Ok(Command::Search(rest.to_string())),
            "sort" => rest.parse().map(Command::Sort),
            "add" => Ok(Command::Add),
            "edit" => required("id").map(Command::Edit),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field = field.parse::<Field>()?;
                Ok(Command::Set(field, value.trim().to_string()))
            }
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "delete" | "rm" => required("id").map(Command::Delete),
            "genres" => Ok(Command::Genres),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("Perintah kosong".to_string()),
            other => Err(format!("Perintah tidak dikenal: {}", other)),
        }
    }
}

/// Prints notifications as one line each
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let tag = match notification.kind {
            NotificationKind::Success => "OK",
            NotificationKind::Error => "ERROR",
        };
        println!("[{}] {}: {}", tag, notification.title, notification.text);
    }
}

/// Yes/cancel prompt answered on the shared input
pub struct PromptConfirm<R> {
    input: SharedLines<R>,
}

impl<R> PromptConfirm<R> {
    pub fn new(input: SharedLines<R>) -> Self {
        Self { input }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "ya" | "yes")
}

#[async_trait]
impl<R> Confirm for PromptConfirm<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        print!(
            "{} {} [{}/{}] ",
            prompt.title, prompt.text, prompt.confirm_label, prompt.cancel_label
        );
        let _ = std::io::stdout().flush();
        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

pub fn render_rows(rows: &[Row<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<8} {:<28} {:<22} {:<12} {}",
        "No.", "ID", "Judul", "Pengarang", "Tahun Terbit", "Genre"
    );
    for row in rows {
        let book = row.book;
        let _ = writeln!(
            out,
            "{:<4} {:<8} {:<28} {:<22} {:<12} {}",
            row.number, book.id, book.judul, book.pengarang, book.tahun, book.genre
        );
    }
    if rows.is_empty() {
        out.push_str("(tidak ada buku)\n");
    }
    out
}

pub fn render_form(title: &str, draft: &BookDraft, errors: &FieldErrors) -> String {
    let mut out = format!("== {} ==\n", title);
    for field in Field::ALL {
        let _ = write!(out, "  {:<10} {}", field, draft.get(field));
        if let Some(message) = errors.get(field) {
            let _ = write!(out, "   <- {}", message);
        }
        out.push('\n');
    }
    out
}

/// Command loop over a [`ListView`]
pub struct Console<R> {
    view: ListView,
    input: SharedLines<R>,
}

impl<R> Console<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(view: ListView, input: SharedLines<R>) -> Self {
        Self { view, input }
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    /// Run until `quit` or end of input
    pub async fn run(&mut self) -> AppResult<()> {
        self.view.refresh().await;
        self.print_rows();
        println!("Ketik 'help' untuk daftar perintah.");

        loop {
            print!("> ");
            let _ = std::io::stdout().flush();
            let line = self.input.lock().await.next_line().await?;
            let Some(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(message) => println!("{}", message),
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) {
        match command {
            Command::List => {
                self.view.refresh().await;
                self.print_rows();
            }
            Command::Search(text) => {
                self.view.set_search(text);
                self.print_rows();
            }
            Command::Sort(sort_by) => {
                self.view.set_sort(sort_by).await;
                self.print_rows();
            }
            Command::Add => {
                self.view.open_create();
                self.print_form();
            }
            Command::Edit(id) => match self.view.open_edit(&id) {
                Ok(()) => self.print_form(),
                Err(e) => println!("{}", e),
            },
            Command::Set(field, value) => match self.view.set_form_field(field, value) {
                Ok(()) => self.print_form(),
                Err(e) => println!("{}", e),
            },
            Command::Save => match self.view.submit_form().await {
                Ok(FormOutcome::Saved(_)) => self.print_rows(),
                Ok(_) => self.print_form(),
                Err(e) => println!("{}", e),
            },
            Command::Cancel => self.view.close_form(),
            Command::Delete(id) => {
                if let DeleteOutcome::Deleted = self.view.delete_book(&id).await {
                    self.print_rows();
                }
            }
            Command::Genres => {
                let labels: Vec<String> = Genre::ALL.iter().map(|g| g.to_string()).collect();
                println!("{}", labels.join(", "));
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    fn print_rows(&self) {
        print!("{}", render_rows(&self.view.visible_books()));
    }

    fn print_form(&self) {
        match self.view.modal() {
            Modal::Create(form) => print!("{}", render_form("Tambah Buku", form.draft(), form.errors())),
            Modal::Edit(form) => print!("{}", render_form("Edit Buku", form.draft(), form.errors())),
            Modal::Closed => {}
        }
    }
}
