use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use minijinja::{context, Environment};
use tracing::info;

use crate::config::Templates;
use crate::engine::Draw;
use crate::error::NotifyError;
use crate::model::entity::Year;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Renders one message per giver unit, in giver order.
pub fn compose(year: Year, draw: &Draw<'_>, templates: &Templates) -> Result<Vec<Message>, NotifyError> {
    let mut env = Environment::new();
    env.add_template("subject", &templates.subject)?;
    env.add_template("body", &templates.body)?;
    let subject = env.get_template("subject")?;
    let body = env.get_template("body")?;

    draw.pairs().map(|(giver, receiver)| -> Result<Message, NotifyError> {
        let vars = context! {
            year => year,
            giver_names => giver.names(),
            receiver_names => receiver.names(),
        };
        Ok(Message {
            to: giver.email.clone(),
            subject: subject.render(&vars)?,
            body: body.render(&vars)?,
        })
    }).collect()
}

pub trait Notifier {
    fn deliver(&mut self, message: &Message) -> Result<(), NotifyError>;
}

/// Prints messages instead of sending them.
pub struct ConsoleNotifier<W> {
    out: W,
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        ConsoleNotifier { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn deliver(&mut self, message: &Message) -> Result<(), NotifyError> {
        writeln!(
            self.out,
            "[DRY RUN] Email to {}:\nSubject: {}\nBody:\n{}\n",
            message.to, message.subject, message.body
        ).map_err(|source| NotifyError::Delivery { to: message.to.clone(), source })
    }
}

/// Writes every message to its own file under `<outbox>/<year>/` for an
/// external mailer to pick up.
#[derive(Debug)]
pub struct OutboxNotifier {
    dir: PathBuf,
    sent: usize,
}

impl OutboxNotifier {
    /// Prepares the year's directory. A directory left over from an earlier
    /// run with the same year is refused rather than mixed into.
    pub fn for_year(outbox: impl Into<PathBuf>, year: Year) -> Result<Self, NotifyError> {
        let dir = outbox.into().join(year.to_string());
        let outbox_err = |source| NotifyError::Outbox { path: dir.clone(), source };
        if dir.exists() && fs::read_dir(&dir).map_err(outbox_err)?.next().is_some() {
            return Err(NotifyError::OutboxNotEmpty { path: dir.clone() });
        }
        fs::create_dir_all(&dir).map_err(outbox_err)?;
        Ok(OutboxNotifier { dir, sent: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Notifier for OutboxNotifier {
    fn deliver(&mut self, message: &Message) -> Result<(), NotifyError> {
        let path = self.dir.join(format!("{:03}.eml", self.sent + 1));
        let text = format!("To: {}\nSubject: {}\n\n{}\n", message.to, message.subject, message.body);
        fs::write(&path, text)
            .map_err(|source| NotifyError::Delivery { to: message.to.clone(), source })?;
        self.sent += 1;
        info!(to = %message.to, path = %path.display(), "queued message");
        Ok(())
    }
}
