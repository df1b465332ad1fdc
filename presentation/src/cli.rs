use anyhow::Context;
use application::chat_service::{ChatService, TurnReport};
use application::session_registry::SessionRegistry;
use clap::{ArgAction, Parser};
use colored::Colorize;
use dialoguer::Input;
use domain::conversation::Role;
use domain::document::UploadedDocument;
use domain::ports::{CompletionBackend, DocumentExtractor};
use domain::session::ChatSession;
use infrastructure::config::Config;
use shared::confirmation::ask_confirmation;
use shared::types::Result;
use shared::utils::{display_name, is_pdf_file};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

const HELP: &str = "\
Commands:
  /upload <path>  attach a PDF (replaces the current one)
  /drop           detach the current PDF
  /history        show the conversation so far
  /reset          clear the conversation and the PDF
  /help           show this help
  /quit           leave
Anything else is sent as a question.";

/// Ask questions about a PDF using a remote chat-completions model.
#[derive(Parser, Debug)]
#[command(name = "tldr_bot", version)]
#[command(about = "Chat with a language model about an uploaded PDF", long_about = None)]
pub struct Cli {
    /// PDF to attach before the first question
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Chat-completions endpoint (overrides TLDR_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Model identifier (overrides TLDR_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Ask one question and exit (if empty, starts an interactive chat)
    #[arg(value_parser, trailing_var_arg = true)]
    pub question: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    Drop,
    History,
    Reset,
    Help,
    Quit,
    Ask(String),
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if !trimmed.starts_with('/') {
            return Command::Ask(line.to_string());
        }
        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };
        match name {
            "/upload" if !arg.is_empty() => Command::Upload(PathBuf::from(arg)),
            "/drop" => Command::Drop,
            "/history" => Command::History,
            "/reset" => Command::Reset,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

/// Reads a PDF from disk, enforcing the upload boundary.
pub fn load_document(path: &Path) -> Result<UploadedDocument> {
    if !is_pdf_file(path) {
        anyhow::bail!("only PDF files can be uploaded: {}", path.display());
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    UploadedDocument::from_reader(display_name(path), file)
        .with_context(|| format!("failed to read {}", path.display()))
}

pub struct CliApp {
    registry: SessionRegistry,
    session_id: String,
}

impl CliApp {
    pub fn new() -> Self {
        let mut registry = SessionRegistry::new();
        let session_id = registry.create();
        Self {
            registry,
            session_id,
        }
    }

    fn session_mut(&mut self) -> Result<&mut ChatSession> {
        self.registry
            .get_mut(&self.session_id)
            .context("active session is gone")
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        let config = Config::load().with_overrides(cli.api_url.clone(), cli.model.clone());
        let chat = ChatService::from_config(config)?;

        if let Some(path) = &cli.file {
            self.upload(path)?;
        }

        if !cli.question.is_empty() {
            let question = cli.question.join(" ");
            let session = self.session_mut()?;
            if let Some(report) = chat.handle_input(session, &question).await {
                print_report(&report);
            }
            return Ok(());
        }

        self.chat_loop(&chat).await
    }

    async fn chat_loop<E, C>(&mut self, chat: &ChatService<E, C>) -> Result<()>
    where
        E: DocumentExtractor,
        C: CompletionBackend,
    {
        println!("{}", "What would you like to ask your document? (/help for commands)".cyan());
        loop {
            let line: String = match Input::new()
                .with_prompt("You".blue().bold().to_string())
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                Err(_) => break,
            };

            match Command::parse(&line) {
                Command::Empty => continue,
                Command::Quit => break,
                Command::Help => println!("{HELP}"),
                Command::Upload(path) => {
                    if let Err(e) = self.upload(&path) {
                        println!("{} {e:#}", "Upload failed:".red());
                    }
                }
                Command::Drop => match self.session_mut()?.detach_document() {
                    Some(doc) => println!("{} {}", "Detached".yellow(), doc.filename()),
                    None => println!("{}", "No document attached.".yellow()),
                },
                Command::History => self.print_history()?,
                Command::Reset => {
                    if ask_confirmation("Clear the conversation and the document?", false)? {
                        self.registry.destroy(&self.session_id);
                        self.session_id = self.registry.create();
                        println!("{}", "Started a new session.".green());
                    }
                }
                Command::Unknown(cmd) => {
                    println!("{} {cmd} (try /help)", "Unknown command:".red())
                }
                Command::Ask(question) => {
                    let session = self.session_mut()?;
                    if let Some(report) = chat.handle_input(session, &question).await {
                        print_report(&report);
                    }
                }
            }
        }
        Ok(())
    }

    fn upload(&mut self, path: &Path) -> Result<()> {
        let document = load_document(path)?;
        let name = document.filename().to_string();
        let bytes = document.bytes().len();
        self.session_mut()?.attach_document(document);
        info!(file = %name, bytes, "Document attached");
        println!("{} {}", "Attached".green(), name);
        Ok(())
    }

    fn print_history(&self) -> Result<()> {
        let session = self
            .registry
            .get(&self.session_id)
            .context("active session is gone")?;
        if session.conversation.is_empty() {
            println!("{}", "No messages yet.".yellow());
        }
        for turn in session.conversation.turns() {
            let label = match turn.role() {
                Role::User => "You".blue().bold(),
                Role::Assistant => "Assistant".green().bold(),
                Role::System => "System".dimmed(),
            };
            println!("{label}: {}", turn.content());
        }
        Ok(())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

fn print_report(report: &TurnReport) {
    if let Some(notice) = report.document_notice() {
        println!("{}", notice.yellow());
    }
    match (report.reply(), report.error_message()) {
        (Some(reply), _) => println!("{} {}", "Assistant:".green().bold(), reply),
        (None, Some(error)) => println!("{}", error.red()),
        (None, None) => {}
    }
}
