use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{PiggyBankService, SessionSummary};
use crate::domain::{Cents, Movement, TotalCents, format_cents, parse_cents};

/// Presentation settings for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Symbol printed in front of amounts (e.g. "R$")
    pub currency: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            currency: "R$".to_string(),
        }
    }
}

/// How input lines are presented back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Print a prompt before reading each line
    Interactive,
    /// Echo each command before its output
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One line typed in a session.
#[derive(Parser, Debug)]
#[command(name = "piggybank", no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Put money into the piggy bank
    Deposit {
        /// Amount (e.g., "50.00", "50" or "50,00")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Take money out (withdrawals above 200.00 pay a 2.50 fee)
    Withdraw {
        /// Amount (e.g., "50.00", "50" or "50,00")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show the current balance
    Balance,

    /// List the movements of this session
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show session totals
    Summary {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// A line-oriented session in front of a [`PiggyBankService`].
/// Rejected operations and bad input are reported and the session goes on.
pub struct Session<'a, W: Write> {
    service: &'a PiggyBankService,
    config: SessionConfig,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(service: &'a PiggyBankService, config: SessionConfig, out: W) -> Self {
        Self {
            service,
            config,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Read and execute commands until end of input or `quit`.
    pub fn run<R: BufRead>(&mut self, input: R, mode: SessionMode) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if mode == SessionMode::Interactive {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read session input")?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if mode == SessionMode::Script {
                writeln!(self.out, "> {}", trimmed)?;
            }

            if self.execute_line(trimmed)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute a single command line.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let parsed = match SessionLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Also covers `help`, which clap reports as an "error"
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        match parsed.command {
            SessionCommand::Deposit { amount } => {
                if let Some(amount_cents) = self.parse_amount(&amount)? {
                    match self.service.deposit(amount_cents) {
                        Ok(movement) => {
                            writeln!(self.out, "Deposit successful.")?;
                            self.print_balance(movement.balance_after)?;
                        }
                        Err(e) => writeln!(self.out, "Error: {}", e)?,
                    }
                }
            }

            SessionCommand::Withdraw { amount } => {
                if let Some(amount_cents) = self.parse_amount(&amount)? {
                    match self.service.withdraw(amount_cents) {
                        Ok(result) => {
                            let message = match result.withdrawal.fee {
                                Some(fee) => format!(
                                    "Withdrawal successful. A fee of {} was applied.",
                                    self.money(fee)
                                ),
                                None => "Withdrawal successful.".to_string(),
                            };
                            writeln!(self.out, "{}", message)?;
                            self.print_balance(result.withdrawal.balance_after)?;
                        }
                        Err(e) => writeln!(self.out, "Error: {}", e)?,
                    }
                }
            }

            SessionCommand::Balance => self.print_balance(self.service.balance())?,

            SessionCommand::History { json } => {
                let movements = self.service.movements();
                if json {
                    writeln!(self.out, "{}", serde_json::to_string_pretty(&movements)?)?;
                } else {
                    self.print_history(&movements)?;
                }
            }

            SessionCommand::Summary { json } => {
                let summary = self.service.summary();
                if json {
                    writeln!(self.out, "{}", serde_json::to_string_pretty(&summary)?)?;
                } else {
                    self.print_summary(&summary)?;
                }
            }

            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Parse an amount, reporting bad input instead of failing the session.
    fn parse_amount(&mut self, amount: &str) -> Result<Option<Cents>> {
        match parse_cents(amount) {
            Ok(cents) => Ok(Some(cents)),
            Err(e) => {
                writeln!(self.out, "Error: invalid amount '{}': {}", amount, e)?;
                Ok(None)
            }
        }
    }

    fn money(&self, cents: impl Into<TotalCents>) -> String {
        format!("{} {}", self.config.currency, format_cents(cents))
    }

    fn print_balance(&mut self, balance: Cents) -> Result<()> {
        let line = format!("Current balance: {}", self.money(balance));
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn print_history(&mut self, movements: &[Movement]) -> Result<()> {
        if movements.is_empty() {
            writeln!(self.out, "No movements yet.")?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{:>4} {:<12} {:>12} {:>8} {:>12}  {}",
            "#", "KIND", "AMOUNT", "FEE", "BALANCE", "RECORDED"
        )?;
        writeln!(self.out, "{}", "-".repeat(72))?;
        for m in movements {
            writeln!(
                self.out,
                "{:>4} {:<12} {:>12} {:>8} {:>12}  {}",
                m.sequence,
                m.kind,
                format_cents(m.amount_cents),
                format_cents(m.fee_cents),
                format_cents(m.balance_after),
                m.recorded_at.format("%Y-%m-%d %H:%M:%S")
            )?;
        }
        Ok(())
    }

    fn print_summary(&mut self, summary: &SessionSummary) -> Result<()> {
        let lines = [
            format!("Balance:     {}", self.money(summary.balance)),
            format!(
                "Deposits:    {} ({})",
                self.money(summary.total_deposited),
                summary.deposit_count
            ),
            format!(
                "Withdrawals: {} ({})",
                self.money(summary.total_withdrawn),
                summary.withdrawal_count
            ),
            format!("Fees paid:   {}", self.money(summary.total_fees)),
        ];
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }
}
