//! Terminal session driving a [`Wizard`]: builds it from configuration,
//! maps commands onto it and runs the input/autosave loop.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quote_core::models::{PROJECT_TYPE, PersonalField, RateTable};
use quote_core::store::{DraftStoreRegistry, MemoryDraftStoreFactory};
use quote_core::wizard::StepRequirement;
use quote_core::{DraftLoad, Estimator, SubmissionTransport, SubmitError, Wizard};
use quote_data::RateTableLoader;
use quote_store_sqlite::SqliteDraftStoreFactory;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval};
use tracing::{debug, info, warn};

use crate::commands::{Command, CommandError, HELP};
use crate::config::{AppConfig, TimelineLabels};
use crate::logging;
use crate::transport::build_transport;

/// Every draft store backend the binary knows about.
pub fn build_registry() -> DraftStoreRegistry {
    let mut registry = DraftStoreRegistry::new();
    registry.register(Box::new(MemoryDraftStoreFactory));
    registry.register(Box::new(SqliteDraftStoreFactory));
    registry
}

/// Loads the rate table from `path`, or the built-in one, and applies the
/// configured timeline labels.
pub fn load_rates(
    path: Option<&Path>,
    labels: &TimelineLabels,
) -> Result<RateTable> {
    let rates = match path {
        Some(path) => RateTableLoader::load_file(path)
            .with_context(|| format!("Failed to load rate table: {}", path.display()))?,
        None => RateTable::default(),
    };
    Ok(rates.with_labels(labels.express.as_str(), labels.flexible.as_str()))
}

/// Wires rates, validation, draft store and transport into a session.
pub async fn build_session(config: &AppConfig) -> Result<Session> {
    let rates = load_rates(config.rates_file.as_deref(), &config.timeline_labels)?;
    let validator = config
        .validation
        .compile()
        .context("Invalid validation rules")?;

    debug!(backend = %config.storage.backend, "opening draft store");
    let store = build_registry()
        .create(&config.storage)
        .await
        .context("Failed to open draft store")?;
    let transport = build_transport(&config.submission).context("Failed to set up submission")?;

    let wizard = Wizard::new(config.wizard.clone(), validator, Arc::new(rates), store);
    Ok(Session::new(wizard, transport))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    wizard: Wizard,
    transport: Box<dyn SubmissionTransport>,
}

impl Session {
    pub fn new(
        wizard: Wizard,
        transport: Box<dyn SubmissionTransport>,
    ) -> Self {
        Self { wizard, transport }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Restores the saved draft, if any, and shows the current step.
    pub async fn start(
        &mut self,
        out: &mut impl Write,
    ) -> io::Result<()> {
        match self.wizard.load_draft().await {
            Ok(DraftLoad::Empty) => {}
            Ok(DraftLoad::Restored { step }) => {
                writeln!(out, "Draft restored, resuming at step {step}.")?
            }
            Ok(DraftLoad::Discarded) => writeln!(
                out,
                "The saved draft was unreadable and has been discarded."
            )?,
            Err(error) => {
                warn!(%error, "could not load draft");
                writeln!(out, "Could not load the saved draft: {error}")?
            }
        }
        self.print_step(out)
    }

    /// Parses and runs one input line. Parse errors are reported to `out`.
    pub async fn handle_line(
        &mut self,
        line: &str,
        out: &mut impl Write,
    ) -> io::Result<Flow> {
        match line.parse::<Command>() {
            Ok(command) => self.handle(command, out).await,
            Err(CommandError::Empty) => Ok(Flow::Continue),
            Err(error) => {
                writeln!(out, "{error}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn handle(
        &mut self,
        command: Command,
        out: &mut impl Write,
    ) -> io::Result<Flow> {
        match command {
            Command::Choose { field, value } => {
                let unknown_service = field == PROJECT_TYPE
                    && !value.is_empty()
                    && !self.wizard.rates().contains(&value);
                if unknown_service {
                    writeln!(out, "Note: '{value}' is not a listed service, no estimate available.")?;
                }
                if !self.wizard.record_answer(field.as_str(), value.as_str()) {
                    writeln!(out, "'{field}' is a reserved name, pick another field.")?;
                    return Ok(Flow::Continue);
                }
                match self.wizard.answers().get(&field) {
                    Some(value) => writeln!(out, "{field} = {value}")?,
                    None => writeln!(out, "{field} cleared")?,
                }
                if let Some(estimate) = self.wizard.estimate() {
                    writeln!(out, "Estimate: {estimate}")?;
                }
            }
            Command::Set { field, value } => {
                self.wizard.set_personal(field, value);
                match self.wizard.validate_field(field) {
                    Ok(()) => writeln!(out, "{} saved", field.label())?,
                    Err(error) => writeln!(out, "{error}")?,
                }
            }
            Command::Opt { preference, enabled } => {
                self.wizard.set_preference(preference, enabled);
                let prefs = self.wizard.preferences();
                writeln!(
                    out,
                    "newsletter: {}, urgent contact: {}",
                    on_off(prefs.newsletter),
                    on_off(prefs.urgent_contact)
                )?;
            }
            Command::Next => match self.wizard.advance() {
                Ok(_) => self.print_step(out)?,
                Err(error) => writeln!(out, "{error}")?,
            },
            Command::Back => {
                self.wizard.retreat();
                self.print_step(out)?;
            }
            Command::Estimate => match self.wizard.estimate() {
                Some(estimate) => writeln!(out, "Estimate: {estimate}")?,
                None => writeln!(
                    out,
                    "No estimate yet: answer the service, budget and timeline questions."
                )?,
            },
            Command::Status => self.print_status(out)?,
            Command::Services => self.print_services(out)?,
            Command::Save => match self.wizard.save_draft().await {
                Ok(()) => writeln!(out, "Draft saved.")?,
                Err(error) => writeln!(out, "Could not save the draft: {error}")?,
            },
            Command::Reset => {
                if let Err(error) = self.wizard.reset().await {
                    warn!(%error, "draft not deleted on reset");
                }
                writeln!(out, "Form cleared.")?;
                self.print_step(out)?;
            }
            Command::Submit => self.submit(out).await?,
            Command::LogLevel(level) => match logging::set_log_level(&level) {
                Ok(()) => writeln!(out, "log level set to '{level}'")?,
                Err(error) => writeln!(out, "{error:#}")?,
            },
            Command::LogConsole(enabled) => match logging::set_console_enabled(enabled) {
                Ok(()) => writeln!(out, "console logging {}", on_off(enabled))?,
                Err(error) => writeln!(out, "{error:#}")?,
            },
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Periodic autosave. Failures are logged, never fatal.
    pub async fn autosave_tick(&self) {
        match self.wizard.autosave().await {
            Ok(true) => debug!("autosaved"),
            Ok(false) => {}
            Err(error) => warn!(%error, "autosave failed"),
        }
    }

    async fn submit(
        &mut self,
        out: &mut impl Write,
    ) -> io::Result<()> {
        if !self.wizard.state().is_last_step() {
            return writeln!(
                out,
                "Submitting is only possible on step {}.",
                self.wizard.step_count()
            );
        }

        writeln!(out, "Sending...")?;
        match self.wizard.submit(self.transport.as_ref()).await {
            Ok(()) => {
                writeln!(out, "Thank you! Your quote request has been sent.")?;
                self.print_step(out)
            }
            Err(SubmitError::Invalid(error)) => writeln!(out, "{error}"),
            Err(SubmitError::InFlight) => writeln!(out, "A submission is already in progress."),
            Err(SubmitError::Transport(error)) => writeln!(
                out,
                "Sending failed ({error}). Your answers are kept, try `submit` again."
            ),
        }
    }

    fn print_step(
        &self,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let step = self.wizard.current_step();
        let count = self.wizard.step_count();

        match self.wizard.current_requirement() {
            Some(StepRequirement::Answer { field }) => {
                write!(out, "Step {step}/{count}: choose {field} <value>")?;
                match self.wizard.answers().get(field) {
                    Some(current) => writeln!(out, " (current: {current})")?,
                    None => writeln!(out)?,
                }
                if field == PROJECT_TYPE {
                    let services: Vec<&str> = self.wizard.rates().service_ids().collect();
                    writeln!(out, "  services: {}", services.join(", "))?;
                }
            }
            Some(StepRequirement::PersonalInfo) => {
                writeln!(out, "Step {step}/{count}: your contact details, then `submit`")?;
                let required: Vec<&str> = self
                    .wizard
                    .required_fields()
                    .iter()
                    .map(|field| field.as_str())
                    .collect();
                writeln!(out, "  required: {}", required.join(", "))?;
            }
            None => writeln!(out, "Step {step}/{count}")?,
        }
        Ok(())
    }

    fn print_status(
        &self,
        out: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(
            out,
            "Step {}/{}",
            self.wizard.current_step(),
            self.wizard.step_count()
        )?;
        for (field, value) in self.wizard.answers() {
            writeln!(out, "  {field}: {value}")?;
        }
        let personal = self.wizard.personal();
        for field in PersonalField::ALL {
            let value = personal.get(field);
            if !value.is_empty() {
                writeln!(out, "  {}: {value}", field.as_str())?;
            }
        }
        if let Some(estimate) = self.wizard.estimate() {
            writeln!(out, "  estimate: {estimate}")?;
        }
        Ok(())
    }

    fn print_services(
        &self,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let rates = self.wizard.rates();
        let estimator = Estimator::new(rates);
        for service_id in rates.service_ids() {
            if let Some(estimate) = estimator.estimate(service_id, "standard") {
                writeln!(out, "  {service_id:<16} {estimate}")?;
            }
        }
        Ok(())
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Resolves on the next autosave tick, or never when autosave is off.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Runs the interactive session on stdin/stdout until `quit` or end of
/// input, autosaving on the configured interval and once more on exit.
pub async fn run(config: AppConfig) -> Result<()> {
    let mut session = build_session(&config).await?;
    let mut out = io::stdout();
    session.start(&mut out).await?;

    let mut ticker = match config.autosave.interval_secs {
        0 => None,
        secs => {
            let period = Duration::from_secs(secs);
            Some(tokio::time::interval_at(Instant::now() + period, period))
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    write!(out, "> ")?;
    out.flush()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if session.handle_line(&line, &mut out).await? == Flow::Quit {
                    break;
                }
                write!(out, "> ")?;
                out.flush()?;
            }
            _ = next_tick(&mut ticker) => session.autosave_tick().await,
        }
    }

    session.autosave_tick().await;
    info!("session ended");
    Ok(())
}
