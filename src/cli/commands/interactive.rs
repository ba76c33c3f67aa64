//! Interactive prompts for running without a subcommand.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use super::sync::SyncRequest;
use crate::config::{Config, Credentials};

/// Ask for folder, playlist name and recursion on stdin/stdout.
///
/// Credentials come from the global flags and environment as usual.
pub fn prompt_sync_request(
    config: &Config,
    credentials: Credentials,
) -> anyhow::Result<SyncRequest> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    print_path_tips(&mut output)?;
    let path = ask_folder(&mut input, &mut output)?;
    let playlist = ask_non_empty(&mut input, &mut output, "Enter playlist name: ")?;
    let recursive = ask_yes_no(&mut input, &mut output, "Walk through subfolders? (yes/no): ")?;

    Ok(SyncRequest {
        path,
        playlist,
        recursive: recursive || config.matching.recursive,
        dry_run: false,
        enrich: None,
        credentials,
    })
}

fn print_path_tips<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "Tip: how to find your folder path")?;
    writeln!(output, "  - macOS: drag the folder into Terminal to paste its path")?;
    writeln!(output, "  - Windows: Shift + right-click the folder > 'Copy as path'")?;
    writeln!(output, "  - Linux: right-click > Properties, or drag it into the terminal")?;
    writeln!(output)
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

/// Ask until an existing folder is given.
///
/// Surrounding quotes (from "Copy as path" or drag and drop) are removed.
fn ask_folder<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<PathBuf> {
    loop {
        let answer = read_answer(input, output, "Enter full folder path: ")?;
        let path = PathBuf::from(answer.trim_matches(|c| c == '"' || c == '\''));
        if path.is_dir() {
            return Ok(path);
        }
        writeln!(output, "Path does not exist: {}", path.display())?;
        writeln!(output, "Please try again.")?;
        writeln!(output)?;
    }
}

fn ask_non_empty<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    loop {
        let answer = read_answer(input, output, prompt)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
    }
}

fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool> {
    let answer = read_answer(input, output, prompt)?.to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes"))
}
