use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{TransactionRecord, User};

/// Ledger snapshot for full export
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot<'a> {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub users: &'a [User],
    pub transactions: &'a [TransactionRecord],
}

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Users,
    History,
    Full,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Users => "users",
            ExportKind::History => "history",
            ExportKind::Full => "full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "users" => Some(ExportKind::Users),
            "history" => Some(ExportKind::History),
            "full" => Some(ExportKind::Full),
            _ => None,
        }
    }
}

/// Exporter for converting ledger data to various formats.
/// Amounts are written at full precision.
pub struct Exporter<'a, 'r> {
    service: &'a LedgerService<'r>,
}

impl<'a, 'r> Exporter<'a, 'r> {
    pub fn new(service: &'a LedgerService<'r>) -> Self {
        Self { service }
    }

    /// Export in the given format, returning the number of rows written
    /// (users + transactions for a full snapshot).
    pub fn export<W: Write>(&self, kind: ExportKind, writer: W) -> Result<usize> {
        match kind {
            ExportKind::Users => self.export_users_csv(writer),
            ExportKind::History => self.export_history_csv(writer),
            ExportKind::Full => {
                let snapshot = self.export_full_json(writer)?;
                Ok(snapshot.users.len() + snapshot.transactions.len())
            }
        }
    }

    /// Export users to CSV format
    pub fn export_users_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let users = self.service.users().list_all();
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["identifier", "name", "balance"])?;

        for user in users {
            csv_writer.write_record([
                user.id(),
                user.name(),
                user.balance().to_string().as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(users.len())
    }

    /// Export the transaction history to CSV format
    pub fn export_history_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let history = self.service.history();
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "sequence",
            "timestamp",
            "kind",
            "amount",
            "source",
            "destination",
        ])?;

        for record in history {
            csv_writer.write_record([
                record.id().to_string(),
                record.sequence().to_string(),
                record.timestamp().to_rfc3339(),
                record.kind().as_str().to_string(),
                record.amount().to_string(),
                record.source().to_string(),
                record.destination().unwrap_or_default().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(history.len())
    }

    /// Export users and history as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot<'a>> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            users: self.service.users().list_all(),
            transactions: self.service.history(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::application::UserRegistry;

    #[test]
    fn test_export_kind_parsing() {
        assert_eq!(ExportKind::from_str("users"), Some(ExportKind::Users));
        assert_eq!(ExportKind::from_str(" History "), Some(ExportKind::History));
        assert_eq!(ExportKind::from_str("full"), Some(ExportKind::Full));
        assert_eq!(ExportKind::from_str("xml"), None);
    }

    #[test]
    fn test_export_users_csv() -> Result<()> {
        let mut users = UserRegistry::new();
        let mut ledger = LedgerService::new(&mut users);
        ledger.register_user("12345678", "Ana Torres", Some(dec!(100.005)))?;
        ledger.register_user("87654321", "Luis Paz", Some(dec!(0)))?;

        let mut out = Vec::new();
        let count = Exporter::new(&ledger).export_users_csv(&mut out)?;

        assert_eq!(count, 2);
        let text = String::from_utf8(out)?;
        assert_eq!(
            text,
            "identifier,name,balance\n12345678,Ana Torres,100.005\n87654321,Luis Paz,0\n"
        );
        Ok(())
    }

    #[test]
    fn test_export_history_csv() -> Result<()> {
        let mut users = UserRegistry::new();
        let mut ledger = LedgerService::new(&mut users);
        ledger.register_user("12345678", "Ana Torres", Some(dec!(100)))?;
        ledger.register_user("87654321", "Luis Paz", Some(dec!(0)))?;
        ledger.deposit("12345678", dec!(50.00))?;
        ledger.transfer("12345678", "87654321", dec!(30.00))?;

        let mut out = Vec::new();
        let count = Exporter::new(&ledger).export_history_csv(&mut out)?;
        assert_eq!(count, 2);

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][3], "deposit");
        assert_eq!(&rows[0][4], "50.00");
        assert_eq!(&rows[0][6], "");
        assert_eq!(&rows[1][3], "transfer");
        assert_eq!(&rows[1][5], "12345678");
        assert_eq!(&rows[1][6], "87654321");
        Ok(())
    }

    #[test]
    fn test_export_full_json() -> Result<()> {
        let mut users = UserRegistry::new();
        let mut ledger = LedgerService::new(&mut users);
        ledger.register_user("12345678", "Ana Torres", Some(dec!(100)))?;
        ledger.withdraw("12345678", dec!(0.1))?;

        let mut out = Vec::new();
        let count = Exporter::new(&ledger).export(ExportKind::Full, &mut out)?;
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value["users"][0]["id"], "12345678");
        assert_eq!(value["users"][0]["balance"], "99.9");
        assert_eq!(value["transactions"][0]["kind"], "withdrawal");
        assert_eq!(value["transactions"][0]["amount"], "0.1");
        assert!(value["transactions"][0]["destination"].is_null());
        Ok(())
    }
}
