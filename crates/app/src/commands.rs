use std::io::Write;

use drill_core::model::{SessionKey, WordPairDraft, WordlistId};
use drill_core::practice::{AnswerOutcome, PassEvent, PracticePrompt, SessionPhase};
use services::{AppServices, ParsedRows, parse_word_rows};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::{CliError, Command};

const SEED_PAIRS: [(&str, &str); 5] = [
    ("hello", "ola"),
    ("cat", "gato"),
    ("dog", "perro"),
    ("water", "agua"),
    ("thank you", "gracias"),
];

pub(crate) async fn execute(
    app: &AppServices,
    key: &SessionKey,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Lists { limit } => list(app, limit, out).await,
        Command::Create { name, pairs } => {
            let drafts = pairs
                .iter()
                .map(|raw| parse_pair(raw))
                .collect::<Result<Vec<_>, _>>()?;
            let id = app.wordlists().create_wordlist(&name, &drafts).await?;
            writeln!(out, "created wordlist {id} with {} words", drafts.len())?;
            Ok(())
        }
        Command::Show { wordlist } => show(app, wordlist, out).await,
        Command::Edit {
            wordlist,
            name,
            ids,
            side_a,
            side_b,
        } => {
            let name = match name {
                Some(name) => name,
                None => app
                    .wordlists()
                    .get_wordlist(wordlist)
                    .await?
                    .wordlist
                    .name()
                    .to_string(),
            };
            let parsed = parse_word_rows(&ids, &side_a, &side_b);
            report_skipped(&parsed);
            let summary = app
                .wordlists()
                .edit_wordlist(wordlist, &name, parsed.rows)
                .await?;
            writeln!(
                out,
                "updated {}, added {}, removed {} words",
                summary.updated, summary.inserted, summary.deleted
            )?;
            Ok(())
        }
        Command::Delete { wordlist } => {
            app.wordlists().delete_wordlist(wordlist).await?;
            writeln!(out, "deleted wordlist {wordlist}")?;
            Ok(())
        }
        Command::Practice {
            wordlist, restart, ..
        } => {
            let input = BufReader::new(tokio::io::stdin());
            practice(app, key, wordlist, restart, input, out).await
        }
        Command::Status => status(app, key, out).await,
        Command::Abandon => {
            if app.practice().abandon(key).await? {
                writeln!(out, "session abandoned")?;
            } else {
                writeln!(out, "no session to abandon")?;
            }
            Ok(())
        }
        Command::Seed => {
            let drafts = SEED_PAIRS
                .iter()
                .map(|(a, b)| WordPairDraft::new(a, b))
                .collect::<Result<Vec<_>, _>>()
                .map_err(drill_core::Error::from)?;
            let id = app
                .wordlists()
                .create_wordlist("Spanish basics", &drafts)
                .await?;
            writeln!(out, "seeded wordlist {id}")?;
            Ok(())
        }
    }
}

/// Parse `prompt=answer`. A missing `=` leaves the answer blank.
fn parse_pair(raw: &str) -> Result<WordPairDraft, drill_core::Error> {
    let (side_a, side_b) = raw.split_once('=').unwrap_or((raw, ""));
    Ok(WordPairDraft::new(side_a, side_b)?)
}

fn report_skipped(parsed: &ParsedRows) {
    if parsed.blank > 0 {
        tracing::warn!(rows = parsed.blank, "skipped rows with a blank side");
    }
    if !parsed.malformed.is_empty() {
        tracing::warn!(rows = ?parsed.malformed, "skipped rows with malformed word ids");
    }
}

async fn list(app: &AppServices, limit: u32, out: &mut impl Write) -> Result<(), CliError> {
    let lists = app.wordlists().list_wordlists(limit).await?;
    if lists.is_empty() {
        writeln!(out, "no wordlists yet")?;
    }
    for list in lists {
        writeln!(
            out,
            "{:>4}  {}  ({} words, created {})",
            list.id(),
            list.name(),
            list.word_count(),
            list.created_at().format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

async fn show(app: &AppServices, wordlist: WordlistId, out: &mut impl Write) -> Result<(), CliError> {
    let details = app.wordlists().get_wordlist(wordlist).await?;
    writeln!(out, "{} (#{})", details.wordlist.name(), details.wordlist.id())?;
    for word in &details.words {
        writeln!(out, "{:>4}  {} = {}", word.id(), word.side_a(), word.side_b())?;
    }
    Ok(())
}

async fn status(app: &AppServices, key: &SessionKey, out: &mut impl Write) -> Result<(), CliError> {
    let practice = app.practice();
    match practice.phase(key).await? {
        SessionPhase::NotStarted => writeln!(out, "no active session")?,
        phase => {
            let progress = practice.progress(key).await?;
            writeln!(
                out,
                "{phase:?}: word {}/{}, {} missed",
                progress.current_position, progress.total_in_pass, progress.missed_count
            )?;
        }
    }
    Ok(())
}

fn ask(prompt: &PracticePrompt, out: &mut impl Write) -> std::io::Result<()> {
    let p = prompt.progress;
    let retry = if prompt.is_retry { " (try again)" } else { "" };
    write!(
        out,
        "[{}/{}] {}{retry}: ",
        p.current_position,
        p.total_in_pass,
        prompt.word.side_a()
    )?;
    out.flush()
}

/// Drive a session from `input`, one answer per line.
///
/// Reaching end of input leaves the session stored so it can be resumed.
async fn practice<R, W>(
    app: &AppServices,
    key: &SessionKey,
    wordlist: WordlistId,
    restart: bool,
    mut input: R,
    out: &mut W,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let practice = app.practice();
    let mut prompt = if restart {
        practice.start_session(key, wordlist).await?
    } else {
        practice.start_or_resume(key, wordlist).await?
    };

    let mut line = Vec::new();
    loop {
        ask(&prompt, out)?;
        line.clear();
        if input.read_until(b'\n', &mut line).await? == 0 {
            writeln!(out)?;
            writeln!(out, "session saved")?;
            return Ok(());
        }

        let feedback = practice.submit_answer_bytes(key, &line).await?;
        match &feedback.result.outcome {
            AnswerOutcome::Correct => writeln!(out, "correct")?,
            AnswerOutcome::IncorrectRetry { hint } => writeln!(out, "not quite, starts with {hint:?}")?,
            AnswerOutcome::IncorrectFinal { answer } => writeln!(out, "the answer is {answer:?}")?,
        }
        match feedback.result.pass {
            PassEvent::RequeueStarted { words } => {
                writeln!(out, "going over {words} missed words again")?;
            }
            PassEvent::SessionComplete => {
                writeln!(out, "all words done")?;
                return Ok(());
            }
            PassEvent::Continue => {}
        }

        match feedback.next_prompt {
            Some(next) => prompt = next,
            None => {
                writeln!(out, "the next word was deleted; run practice again to restart")?;
                return Ok(());
            }
        }
    }
}
