use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{BufRead, Write};

use crate::application::{amount_from_input, LedgerService, UserRegistry};
use crate::domain::validation::parse_amount;
use crate::domain::{format_amount, format_money, Amount, TransactionKind, TransactionRecord};
use crate::io::{ExportKind, Exporter};

const MENU_WIDTH: usize = 42;

/// Interactive numbered-menu session over any line-based input and output.
///
/// The session creates a fresh, empty ledger and keeps it until the user exits
/// (option 0) or the input ends.
pub struct MenuSession<'c, R, W> {
    input: R,
    output: W,
    currency: &'c str,
}

impl<'c, R: BufRead, W: Write> MenuSession<'c, R, W> {
    pub fn new(input: R, output: W, currency: &'c str) -> Self {
        Self {
            input,
            output,
            currency,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let mut users = UserRegistry::new();
        let mut ledger = LedgerService::new(&mut users);

        writeln!(self.output, "{}", "=".repeat(50))?;
        writeln!(self.output, "   BANKING LEDGER - WELCOME")?;
        writeln!(self.output, "{}", "=".repeat(50))?;

        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                break;
            };

            match line.trim().parse::<u32>() {
                Ok(0) => break,
                Ok(1) => self.register_user(&mut ledger)?,
                Ok(2) => self.list_users(&ledger)?,
                Ok(3) => self.deposit(&mut ledger)?,
                Ok(4) => self.withdraw(&mut ledger)?,
                Ok(5) => self.transfer(&mut ledger)?,
                Ok(6) => self.balance(&ledger)?,
                Ok(7) => self.history(&ledger)?,
                Ok(8) => self.history_for_user(&ledger)?,
                Ok(9) => self.export(&ledger)?,
                Ok(10) => self.check(&ledger)?,
                _ => self.error("Invalid option. Please try again.")?,
            }
        }

        writeln!(self.output, "\nThank you for using the ledger. Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        let out = &mut self.output;
        writeln!(out, "\n{:=^width$}", " MAIN MENU ", width = MENU_WIDTH)?;
        writeln!(out, "1. Register user")?;
        writeln!(out, "2. List users")?;
        writeln!(out, "3. Deposit")?;
        writeln!(out, "4. Withdraw")?;
        writeln!(out, "5. Transfer")?;
        writeln!(out, "6. Check balance")?;
        writeln!(out, "7. Transaction history")?;
        writeln!(out, "8. History by user")?;
        writeln!(out, "9. Export data")?;
        writeln!(out, "10. Verify ledger")?;
        writeln!(out, "0. Exit")?;
        writeln!(out, "{}", "=".repeat(MENU_WIDTH))?;
        write!(out, "Select an option: ")?;
        out.flush()?;
        Ok(())
    }

    /// Read one line; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        self.read_line()
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.output, "\n--- {} ---", title)?;
        Ok(())
    }

    fn error(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "\n[ERROR] {}", message)?;
        Ok(())
    }

    fn success(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "\n[OK] {}", message)?;
        Ok(())
    }

    fn info(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "\n[INFO] {}", message)?;
        Ok(())
    }

    fn money(&self, amount: Amount) -> String {
        format_money(self.currency, amount)
    }

    // ========================
    // Menu actions
    // ========================

    fn register_user(&mut self, ledger: &mut LedgerService<'_>) -> Result<()> {
        self.heading("REGISTER USER")?;
        let Some(id) = self.prompt("Identifier (8 digits)")? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Full name")? else {
            return Ok(());
        };
        let label = format!("Opening balance ({})", self.currency);
        let Some(balance_text) = self.prompt(&label)? else {
            return Ok(());
        };

        match ledger.register_user(id.trim(), &name, parse_amount(&balance_text)) {
            Ok(user) => self.success(format!("User registered: {}", user.name())),
            Err(err) => self.error(err),
        }
    }

    fn list_users(&mut self, ledger: &LedgerService<'_>) -> Result<()> {
        let users = ledger.users().list_all();
        if users.is_empty() {
            return self.info("No users registered.");
        }

        let out = &mut self.output;
        writeln!(out, "\n{:=^60}", " USERS ")?;
        writeln!(out, "{:<12} {:<30} {:>16}", "IDENTIFIER", "NAME", "BALANCE")?;
        writeln!(out, "{}", "-".repeat(60))?;
        for user in users {
            writeln!(
                out,
                "{:<12} {:<30} {:>16}",
                user.id(),
                truncate(user.name(), 30),
                format_money(self.currency, user.balance())
            )?;
        }
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Total users: {}", users.len())?;
        Ok(())
    }

    /// Prompt for an identifier and an amount.
    fn read_movement(&mut self, verb: &str) -> Result<Option<(String, String)>> {
        let Some(id) = self.prompt("User identifier")? else {
            return Ok(None);
        };
        let label = format!("Amount to {} ({})", verb, self.currency);
        let Some(amount_text) = self.prompt(&label)? else {
            return Ok(None);
        };
        Ok(Some((id.trim().to_string(), amount_text)))
    }

    fn deposit(&mut self, ledger: &mut LedgerService<'_>) -> Result<()> {
        self.heading("DEPOSIT")?;
        let Some((id, amount_text)) = self.read_movement("deposit")? else {
            return Ok(());
        };

        match amount_from_input(&amount_text).and_then(|amount| ledger.deposit(&id, amount)) {
            Ok(balance) => {
                self.success("Deposit completed.")?;
                let line = format!("New balance: {}", self.money(balance));
                writeln!(self.output, "{}", line)?;
                Ok(())
            }
            Err(err) => self.error(err),
        }
    }

    fn withdraw(&mut self, ledger: &mut LedgerService<'_>) -> Result<()> {
        self.heading("WITHDRAWAL")?;
        let Some((id, amount_text)) = self.read_movement("withdraw")? else {
            return Ok(());
        };

        match amount_from_input(&amount_text).and_then(|amount| ledger.withdraw(&id, amount)) {
            Ok(balance) => {
                self.success("Withdrawal completed.")?;
                let line = format!("New balance: {}", self.money(balance));
                writeln!(self.output, "{}", line)?;
                Ok(())
            }
            Err(err) => self.error(err),
        }
    }

    fn transfer(&mut self, ledger: &mut LedgerService<'_>) -> Result<()> {
        self.heading("TRANSFER")?;
        let Some(source) = self.prompt("Source identifier")? else {
            return Ok(());
        };
        let Some(destination) = self.prompt("Destination identifier")? else {
            return Ok(());
        };
        let label = format!("Amount to transfer ({})", self.currency);
        let Some(amount_text) = self.prompt(&label)? else {
            return Ok(());
        };

        let result = amount_from_input(&amount_text)
            .and_then(|amount| ledger.transfer(source.trim(), destination.trim(), amount));

        match result {
            Ok(result) => {
                self.success("Transfer completed.")?;
                let amount = self.money(result.record.amount());
                let balance = self.money(result.source_balance);
                let out = &mut self.output;
                writeln!(
                    out,
                    "From: {} -> To: {}",
                    result.source_name, result.destination_name
                )?;
                writeln!(out, "Amount transferred: {}", amount)?;
                writeln!(out, "New balance of {}: {}", result.source_name, balance)?;
                Ok(())
            }
            Err(err) => self.error(err),
        }
    }

    fn balance(&mut self, ledger: &LedgerService<'_>) -> Result<()> {
        self.heading("BALANCE INQUIRY")?;
        let Some(id) = self.prompt("User identifier")? else {
            return Ok(());
        };

        match ledger.balance_of(id.trim()) {
            Ok(entry) => {
                let balance = self.money(entry.balance);
                let out = &mut self.output;
                writeln!(out, "\n{:=^40}", " BALANCE ")?;
                writeln!(out, "User:       {}", entry.name)?;
                writeln!(out, "Identifier: {}", entry.id)?;
                writeln!(out, "Available:  {}", balance)?;
                writeln!(out, "{}", "=".repeat(40))?;
                Ok(())
            }
            Err(err) => self.error(err),
        }
    }

    fn history(&mut self, ledger: &LedgerService<'_>) -> Result<()> {
        let history = ledger.history();
        if history.is_empty() {
            return self.info("No transactions recorded.");
        }

        writeln!(self.output, "\n{:=^50}", " TRANSACTION HISTORY ")?;
        for record in history {
            let line = self.render_record(record);
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "{}", "=".repeat(50))?;
        writeln!(self.output, "Total transactions: {}", history.len())?;
        Ok(())
    }

    fn history_for_user(&mut self, ledger: &LedgerService<'_>) -> Result<()> {
        self.heading("HISTORY BY USER")?;
        let Some(id) = self.prompt("User identifier")? else {
            return Ok(());
        };
        let id = id.trim();

        let records = match ledger.history_for(id) {
            Ok(records) => records,
            Err(err) => return self.error(err),
        };

        writeln!(self.output, "\n{:=^50}", format!(" HISTORY OF {} ", id))?;
        if records.is_empty() {
            return self.info("This user has no transactions.");
        }
        for record in &records {
            let line = self.render_record(record);
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "Total transactions: {}", records.len())?;
        Ok(())
    }

    fn export(&mut self, ledger: &LedgerService<'_>) -> Result<()> {
        self.heading("EXPORT")?;
        let Some(kind_text) = self.prompt("What to export (users, history, full)")? else {
            return Ok(());
        };
        let Some(kind) = ExportKind::from_str(&kind_text) else {
            return self.error(format!(
                "Invalid export type '{}'. Valid types: users, history, full",
                kind_text.trim()
            ));
        };
        let Some(path) = self.prompt("Output file")? else {
            return Ok(());
        };
        let path = path.trim();

        let written = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path))
            .and_then(|file| Exporter::new(ledger).export(kind, file));

        match written {
            Ok(count) => self.success(format!(
                "Exported {} ({} rows) to {}",
                kind.as_str(),
                count,
                path
            )),
            Err(err) => self.error(format!("{:#}", err)),
        }
    }

    fn check(&mut self, ledger: &LedgerService<'_>) -> Result<()> {
        let report = ledger.check_integrity();
        let total = report
            .total_holdings
            .map(|total| self.money(total))
            .unwrap_or_else(|| "out of range".to_string());

        let out = &mut self.output;
        writeln!(out, "\nChecking ledger integrity...\n")?;
        writeln!(out, "Users:        {}", report.user_count)?;
        writeln!(out, "Transactions: {}", report.transaction_count)?;
        writeln!(
            out,
            "Holdings:     {}  {}",
            total,
            if report.is_balanced() { "OK" } else { "UNBALANCED!" }
        )?;

        if report.is_healthy() {
            writeln!(out, "Ledger is consistent.")?;
        } else {
            writeln!(out, "Issues found:")?;
            for issue in &report.issues {
                writeln!(out, "  - {}", issue)?;
            }
        }
        Ok(())
    }

    fn render_record(&self, record: &TransactionRecord) -> String {
        render_record(self.currency, record)
    }
}

/// Render one history line:
/// `[dd/mm/YYYY HH:MM:SS] KIND - Amount: S/ 10.00 - User: 12345678 -> 87654321`
pub fn render_record(currency: &str, record: &TransactionRecord) -> String {
    let kind = match record.kind() {
        TransactionKind::Deposit => "DEPOSIT",
        TransactionKind::Withdrawal => "WITHDRAWAL",
        TransactionKind::Transfer => "TRANSFER",
    };
    let mut line = format!(
        "[{}] {} - Amount: {} {} - User: {}",
        record
            .timestamp()
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M:%S"),
        kind,
        currency,
        format_amount(record.amount()),
        record.source()
    );
    if let Some(destination) = record.destination() {
        line.push_str(" -> ");
        line.push_str(destination);
    }
    line
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
