//! Interactive login and question loop.

use crate::app::App;
use crate::chat::InputState;
use crate::terminal::TerminalSink;
use anyhow::Result;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub struct Repl {
    app: App<TerminalSink>,
    editor: DefaultEditor,
}

enum Flow {
    Continue,
    Quit,
}

impl Repl {
    pub fn new(app: App<TerminalSink>) -> Result<Self> {
        Ok(Self {
            app,
            editor: DefaultEditor::new()?,
        })
    }

    /// Logs in (with `employee_id` first, when given) and then answers
    /// questions until the quota is used up or input ends.
    pub async fn run(&mut self, employee_id: Option<String>) -> Result<()> {
        println!("Payroll chat (Ctrl+D to exit, Ctrl+C to clear the line)");
        println!("---");

        if let Some(id) = employee_id {
            if self.app.login(&id).await.is_err() {
                self.show_banner();
            }
        }
        while !self.app.session().is_active() {
            match self.read_line("Employee ID: ")? {
                Some(line) => {
                    if self.app.login(&line).await.is_err() {
                        self.show_banner();
                    }
                }
                None => return Ok(()),
            }
        }

        loop {
            if self.app.input_state() == InputState::Exhausted {
                println!(
                    "{}",
                    style(format!(
                        "Question limit reached ({}). Restart to begin a new session.",
                        self.app.counter_label()
                    ))
                    .yellow()
                );
                return Ok(());
            }
            let prompt = format!("[{}] > ", self.app.counter_label());
            let Some(line) = self.read_line(&prompt)? else {
                return Ok(());
            };
            if let Flow::Quit = self.handle(&line).await {
                return Ok(());
            }
        }
    }

    async fn handle(&mut self, line: &str) -> Flow {
        match line.trim() {
            "/quit" | "/exit" => Flow::Quit,
            _ => {
                if let Err(e) = self.editor.add_history_entry(line) {
                    tracing::warn!(error = %e, "failed to record line history");
                }
                if self.app.submit(line).await.is_err() {
                    self.show_banner();
                }
                Flow::Continue
            }
        }
    }

    /// `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn show_banner(&self) {
        if let Some(message) = self.app.banner().visible() {
            eprintln!("{}", style(message).red().bold());
        }
    }
}
