use std::io::{BufRead, Write};

use anyhow::{bail, Context};
use bookshelf::{Book, BookField, BookId, BookTransport, Catalog, CatalogError, FormController};
use bookshelf_events::{drain, EventBus, NoticeLevel, ShellEvent};
use bookshelf_kernel::settings::Settings;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Manage a REST book catalog")]
struct Cli {
    /// Base URL of the book resource, overriding configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List books, optionally filtered by title, author or genre
    List {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show one book
    Show { id: String },
    /// Add a new book
    Add(BookArgs),
    /// Edit an existing book; only the given fields change
    Edit {
        id: String,
        #[command(flatten)]
        fields: BookArgs,
    },
    /// Delete a book after confirmation
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct BookArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    /// Publication year, up to four digits
    #[arg(long)]
    year: Option<String>,
    /// Available or Issued
    #[arg(long)]
    status: Option<String>,
    /// Cover image URL
    #[arg(long)]
    image: Option<String>,
}

impl BookArgs {
    fn edits(&self) -> impl Iterator<Item = (BookField, &str)> {
        [
            (BookField::Title, &self.title),
            (BookField::Author, &self.author),
            (BookField::Genre, &self.genre),
            (BookField::PublishedYear, &self.year),
            (BookField::Status, &self.status),
            (BookField::Image, &self.image),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    if let Some(api_url) = &cli.api_url {
        settings.api.base_url = api_url.clone();
    }
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, api = %settings.api.base_url, "bookshelf starting");

    let events = EventBus::new();
    let mut rx = events.subscribe();
    let catalog = Catalog::from_settings(&settings.api, events)
        .with_context(|| format!("invalid API URL '{}'", settings.api.base_url))?;

    let result = run(cli.command, &catalog).await;

    for event in drain(&mut rx) {
        match event {
            ShellEvent::Notice(notice) => match notice.level {
                NoticeLevel::Success => eprintln!("{}", notice.message),
                NoticeLevel::Error => eprintln!("error: {}", notice.message),
            },
            ShellEvent::Navigate(route) => tracing::debug!(route = %route, "navigation requested"),
        }
    }

    result
}

async fn run(command: Command, catalog: &Catalog) -> anyhow::Result<()> {
    match command {
        Command::List { query } => {
            // Soft failure: the refresh logs and the (empty) collection is still shown.
            let _ = catalog.list().refresh().await;
            let books = catalog.list().filtered(&query).await;
            if books.is_empty() {
                println!("No Book Found");
            }
            for book in &books {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    book.id, book.title, book.author, book.genre, book.published_year, book.status
                );
            }
            Ok(())
        }
        Command::Show { id } => {
            let book = catalog
                .transport()
                .get(&BookId::from(id.as_str()))
                .await
                .with_context(|| format!("failed to fetch book '{id}'"))?;
            print_book(&book);
            Ok(())
        }
        Command::Add(fields) => {
            let mut form = catalog.add_book_form();
            apply(&mut form, &fields)?;
            let book = submit(&mut form).await?;
            println!("{}", book.id);
            Ok(())
        }
        Command::Edit { id, fields } => {
            let mut form = catalog.edit_book_form(BookId::from(id.as_str()));
            form.load()
                .await
                .with_context(|| format!("cannot edit book '{id}'"))?;
            apply(&mut form, &fields)?;
            let book = submit(&mut form).await?;
            print_book(&book);
            Ok(())
        }
        Command::Delete { id, yes } => {
            let mut deletion = catalog.deletion_flow();
            deletion.request_delete(BookId::from(id.as_str()));

            if !yes && !confirm_prompt()? {
                deletion.cancel();
                println!("Cancelled");
                return Ok(());
            }

            deletion
                .confirm()
                .await
                .with_context(|| format!("failed to delete book '{id}'"))?;
            Ok(())
        }
    }
}

fn apply(form: &mut FormController, fields: &BookArgs) -> anyhow::Result<()> {
    for (field, value) in fields.edits() {
        if !form.set_field(field, value) {
            bail!("rejected value '{value}' for {field}");
        }
    }
    Ok(())
}

async fn submit(form: &mut FormController) -> anyhow::Result<Book> {
    match form.submit().await {
        Ok(book) => Ok(book),
        Err(CatalogError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            bail!("book not saved: {} invalid field(s)", errors.len())
        }
        Err(err) => Err(err).context("book not saved"),
    }
}

fn confirm_prompt() -> anyhow::Result<bool> {
    print!("Are you sure you want to delete this book? [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_book(book: &Book) {
    println!("id:        {}", book.id);
    println!("title:     {}", book.title);
    println!("author:    {}", book.author);
    println!("genre:     {}", book.genre);
    println!("published: {}", book.published_year);
    println!("status:    {}", book.status);
    println!("image:     {}", book.image);
}
