//! Line-oriented event loop driving a [`ClipperSession`]
//!
//! Every command is handled to completion before the next line is read.
//! Requests run as spawned tasks and report back over a channel, so the user
//! can keep typing while a metadata fetch or clip request is outstanding.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;

use crate::app::{AppContainer, ClipRequester, MetadataResolver};
use crate::domain::errors::ClientError;
use crate::domain::model::*;
use crate::error::AppResult;
use crate::presenter::render::OutputFormat;
use crate::presenter::{Applied, Ticket, CLIP_FALLBACK_MESSAGE};
use crate::session::ClipperSession;

const HELP: &str = "\
Commandes :
  url <URL>        définir l'URL de la vidéo
  check            récupérer titre, durée et qualités
  quality <VALEUR> choisir une qualité
  start <TEMPS>    début de la séquence (ex. 0, 01:30, 00:01:30)
  end <TEMPS>      fin de la séquence
  submit           extraire la séquence
  play             lire la séquence extraite
  save <CHEMIN>    télécharger la séquence extraite
  show             afficher le formulaire et les deux panneaux
  quit             quitter une fois les requêtes en cours terminées
";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Url(String),
    Check,
    Quality(String),
    Start(String),
    End(String),
    Submit,
    Play,
    Save(PathBuf),
    Show,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse a line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let argument = |usage: &str| {
            if rest.is_empty() {
                Err(format!("usage : {}", usage))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match verb.to_lowercase().as_str() {
            // an empty url is accepted so the next check reports it
            "url" => SessionCommand::Url(rest.to_string()),
            "check" => SessionCommand::Check,
            "quality" => SessionCommand::Quality(argument("quality <VALEUR>")?),
            "start" => SessionCommand::Start(rest.to_string()),
            "end" => SessionCommand::End(rest.to_string()),
            "submit" => SessionCommand::Submit,
            "play" => SessionCommand::Play,
            "save" => SessionCommand::Save(PathBuf::from(argument("save <CHEMIN>")?)),
            "show" => SessionCommand::Show,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(format!("commande inconnue : {} (tapez 'help')", other)),
        };
        Ok(Some(command))
    }
}

/// Result of a spawned request, delivered back to the loop
#[derive(Debug)]
enum Completion {
    Check(Ticket, Result<ResolvedVideo, ClientError>),
    Submit(Ticket, Result<ClipResult, ClientError>),
    Save(PathBuf, Result<u64, ClientError>),
}

/// Event loop state: interactors, session and outstanding request count
pub struct InteractiveSession {
    resolver: Arc<MetadataResolver>,
    requester: Arc<ClipRequester>,
    format: OutputFormat,
    session: ClipperSession,
    in_flight: usize,
}

impl InteractiveSession {
    pub fn new(
        container: &dyn AppContainer,
        session: ClipperSession,
        format: OutputFormat,
    ) -> Self {
        Self {
            resolver: container.metadata_resolver(),
            requester: container.clip_requester(),
            format,
            session,
            in_flight: 0,
        }
    }

    pub fn session(&self) -> &ClipperSession {
        &self.session
    }

    /// Read commands until end of input or `quit`, then wait for outstanding requests
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut lines = input.lines();
        let mut reading = true;

        while reading || self.in_flight > 0 {
            tokio::select! {
                line = lines.next_line(), if reading => {
                    match line? {
                        Some(line) => reading = self.handle_line(&line, &tx, output).await?,
                        None => reading = false,
                    }
                }
                Some(completion) = rx.recv(), if self.in_flight > 0 => {
                    self.in_flight -= 1;
                    self.complete(completion, output).await?;
                }
            }
        }

        Ok(())
    }

    /// Handle one input line; returns whether to keep reading
    async fn handle_line<W>(
        &mut self,
        line: &str,
        tx: &UnboundedSender<Completion>,
        output: &mut W,
    ) -> AppResult<bool>
    where
        W: AsyncWrite + Unpin,
    {
        let command = match SessionCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(message) => {
                say(output, &message).await?;
                return Ok(true);
            }
        };
        debug!(?command, "Session command");

        match command {
            SessionCommand::Url(url) => self.session.form.url = url,
            SessionCommand::Start(start) => self.session.form.start_time = start,
            SessionCommand::End(end) => self.session.form.end_time = end,
            SessionCommand::Quality(value) => {
                self.session.select_quality(&value);
                let offered = self.session.quality_is_offered();
                if !self.session.metadata.qualities.is_empty() && !offered {
                    let message = format!("'{}' ne fait pas partie des qualités proposées", value);
                    say(output, &message).await?;
                }
            }
            SessionCommand::Check => {
                if let Some(pending) = self.session.start_check() {
                    let resolver = Arc::clone(&self.resolver);
                    let tx = tx.clone();
                    self.in_flight += 1;
                    tokio::spawn(async move {
                        let outcome = resolver.resolve(pending.url.as_str()).await;
                        let _ = tx.send(Completion::Check(pending.ticket, outcome));
                    });
                }
                self.emit(output, &self.session.metadata).await?;
            }
            SessionCommand::Submit => {
                if let Some(pending) = self.session.start_submit() {
                    let requester = Arc::clone(&self.requester);
                    let tx = tx.clone();
                    self.in_flight += 1;
                    tokio::spawn(async move {
                        let outcome = requester.request(pending.request).await;
                        let _ = tx.send(Completion::Submit(pending.ticket, outcome));
                    });
                }
                self.emit(output, &self.session.clip).await?;
            }
            SessionCommand::Save(path) => match self.session.clip.visible_result().cloned() {
                Some(result) => {
                    let requester = Arc::clone(&self.requester);
                    let tx = tx.clone();
                    self.in_flight += 1;
                    tokio::spawn(async move {
                        let outcome = requester.save(&result, &path).await;
                        let _ = tx.send(Completion::Save(path, outcome));
                    });
                }
                None => say(output, "Aucune séquence à enregistrer").await?,
            },
            SessionCommand::Play => {
                if self.session.clip.player.play() {
                    let src = self.session.clip.player.src.clone().unwrap_or_default();
                    say(output, &format!("▶ {}", src)).await?;
                } else {
                    say(output, "Rien à lire").await?;
                }
            }
            SessionCommand::Show => self.emit(output, &self.session).await?,
            SessionCommand::Help => say(output, HELP.trim_end()).await?,
            SessionCommand::Quit => return Ok(false),
        }

        Ok(true)
    }

    /// Apply a finished request and render the panel it touched
    async fn complete<W>(&mut self, completion: Completion, output: &mut W) -> AppResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        match completion {
            Completion::Check(ticket, outcome) => {
                if self.session.finish_check(ticket, outcome) == Applied::Discarded {
                    debug!("Discarded superseded metadata response");
                    return Ok(());
                }
                self.emit(output, &self.session.metadata).await
            }
            Completion::Submit(ticket, outcome) => {
                if self.session.finish_submit(ticket, outcome) == Applied::Discarded {
                    debug!("Discarded superseded clip response");
                    return Ok(());
                }
                self.emit(output, &self.session.clip).await
            }
            Completion::Save(path, Ok(bytes)) => {
                say(output, &format!("Enregistré: {} ({} octets)", path.display(), bytes)).await
            }
            Completion::Save(_, Err(err)) => {
                say(output, &format!("✖ {}", err.user_message(CLIP_FALLBACK_MESSAGE))).await
            }
        }
    }

    async fn emit<W, T>(&self, output: &mut W, value: &T) -> AppResult<()>
    where
        W: AsyncWrite + Unpin,
        T: Serialize + fmt::Display,
    {
        let text = self.format.render(value)?;
        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}

async fn say<W>(output: &mut W, message: &str) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(message.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            SessionCommand::parse("url https://x/video").unwrap(),
            Some(SessionCommand::Url("https://x/video".to_string()))
        );
        assert_eq!(SessionCommand::parse("  CHECK ").unwrap(), Some(SessionCommand::Check));
        assert_eq!(
            SessionCommand::parse("start 00:01:30").unwrap(),
            Some(SessionCommand::Start("00:01:30".to_string()))
        );
        assert_eq!(
            SessionCommand::parse("save /tmp/clip.mp4").unwrap(),
            Some(SessionCommand::Save(PathBuf::from("/tmp/clip.mp4")))
        );
        assert_eq!(SessionCommand::parse("exit").unwrap(), Some(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_blank_and_bare_url() {
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
        assert_eq!(
            SessionCommand::parse("url").unwrap(),
            Some(SessionCommand::Url(String::new()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            SessionCommand::parse("quality").unwrap_err(),
            "usage : quality <VALEUR>"
        );
        assert_eq!(SessionCommand::parse("save").unwrap_err(), "usage : save <CHEMIN>");
        assert_eq!(
            SessionCommand::parse("dance now").unwrap_err(),
            "commande inconnue : dance (tapez 'help')"
        );
    }
}
