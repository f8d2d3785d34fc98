//! Interactive terminal loop over a [`ChatSession`].
//!
//! Lines are questions; `:`-prefixed lines are commands. A blank line submits
//! whatever is selected, so an image can be sent on its own.

use std::io::{BufRead, Write};
use std::path::Path;

use medai_client::{render_reply, render_status, ImageUpload, RenderOptions};

use crate::session::ChatSession;

pub const HELP: &str = "\
Commands:
  :image <path>   attach an image to the next question
  :clear-image    detach the selected image
  :help           show this help
  :quit           exit
Any other line is sent as a question; an empty line sends the attached image alone.";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Question(&'a str),
    Image(&'a str),
    ClearImage,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Question(trimmed);
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "image" if !arg.is_empty() => Input::Image(arg),
        "clear-image" => Input::ClearImage,
        "help" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(trimmed),
    }
}

/// Run the loop until `:quit` or end of input.
pub async fn run<R: BufRead, W: Write>(
    session: &mut ChatSession,
    input: R,
    out: &mut W,
    opts: &RenderOptions,
) -> std::io::Result<()> {
    writeln!(out, "{}", render_status(session.view.status(), opts))?;
    prompt(session, out)?;

    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Input::Quit => break,
            Input::Help => writeln!(out, "{}", HELP)?,
            Input::Unknown(cmd) => writeln!(out, "Unknown command: {} (try :help)", cmd)?,
            Input::ClearImage => {
                session.view.select_file(None);
                writeln!(out, "Image detached.")?;
            }
            Input::Image(path) => match ImageUpload::from_path(Path::new(path)) {
                Ok(upload) => {
                    session.view.select_file(Some(upload));
                    writeln!(out, "{}", render_status(session.view.status(), opts))?;
                }
                Err(e) => {
                    session.view.set_status(format!("Error selecting file: {}", e));
                    writeln!(out, "{}", render_status(session.view.status(), opts))?;
                }
            },
            Input::Question(text) => {
                session.view.set_text(text);
                let mut shown = Ok(());
                // A rejected submit has already put the reason in the status line.
                let submitted = session
                    .ask_with(|view| {
                        shown = writeln!(out, "{}", view.submit_label()).and_then(|_| out.flush());
                    })
                    .await
                    .is_ok();
                shown?;
                writeln!(out, "{}", render_status(session.view.status(), opts))?;
                if let (true, Some(reply)) = (submitted, session.view.results()) {
                    writeln!(out)?;
                    write!(out, "{}", render_reply(reply, opts))?;
                }
            }
        }
        prompt(session, out)?;
    }
    Ok(())
}

fn prompt<W: Write>(session: &ChatSession, out: &mut W) -> std::io::Result<()> {
    match session.view.selected_file() {
        Some(f) => write!(out, "[{}] > ", f.file_name)?,
        None => write!(out, "> ")?,
    }
    out.flush()
}
