use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::client::Client;
use crate::models::transaction::{Transaction, TransactionType};
use crate::services::goal_service::{GoalService, DEFAULT_DAYS_PER_MONTH};

use super::traits::SnapshotSource;

/// Date formats accepted for birthdates and registration dates.
const DAY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Outcome of decoding a legacy snapshot.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub clients_imported: usize,
    pub transactions_imported: usize,

    /// Transactions whose client name matched no client; kept as unassigned
    pub unresolved_references: usize,

    /// Records that could not be decoded, as [`CoreError::InvalidRecord`]
    pub skipped: Vec<CoreError>,
}

/// Top-level shape of a legacy export. Records stay untyped until decoded
/// one by one, so a single bad record cannot fail the whole file.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    clients: Vec<Value>,
    #[serde(default)]
    transactions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClient {
    #[serde(default)]
    id: Option<String>,
    name: String,
    /// Saved by the app as `mensalDinheiro`, usually a string
    #[serde(default, alias = "mensalDinheiro")]
    monthly_income: Value,
    /// Daily goal the app stored next to the income
    #[serde(default)]
    meta: Value,
    #[serde(default)]
    birthdate: Option<String>,
    #[serde(default)]
    registration_date: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    value: Value,
    #[serde(rename = "type")]
    kind: Value,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    date: String,
    /// Client *name*, as older versions stored it
    #[serde(default)]
    client_id: Option<String>,
}

/// Decoder for JSON written by older app versions, where transactions
/// point at clients by display name and values may be strings.
///
/// Client income is read from `mensalDinheiro` (or `monthlyIncome`); when
/// neither holds a positive amount, it is rebuilt as `meta * 30`.
///
/// Name references are resolved to client ids here, once, so nothing
/// downstream ever joins by name.
#[derive(Debug)]
pub struct LegacySnapshot {
    clients: Vec<Client>,
    transactions: Vec<Transaction>,
    report: ImportReport,
}

impl LegacySnapshot {
    /// Parse and decode a legacy export.
    ///
    /// Fails only when the document itself is not a JSON object of the
    /// expected shape; bad records are skipped and listed in the report.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        let mut report = ImportReport::default();

        let clients = decode_clients(raw.clients, &mut report);
        let transactions = decode_transactions(raw.transactions, &clients, &mut report);

        report.clients_imported = clients.len();
        report.transactions_imported = transactions.len();
        debug!(
            "Decoded legacy snapshot: {} clients, {} transactions, {} skipped",
            report.clients_imported,
            report.transactions_imported,
            report.skipped.len()
        );

        Ok(Self {
            clients,
            transactions,
            report,
        })
    }

    #[must_use]
    pub fn report(&self) -> &ImportReport {
        &self.report
    }

    /// Consume the snapshot, returning its parts.
    pub fn into_parts(self) -> (Vec<Client>, Vec<Transaction>, ImportReport) {
        (self.clients, self.transactions, self.report)
    }
}

impl SnapshotSource for LegacySnapshot {
    fn load_transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        Ok(self.transactions.clone())
    }

    fn load_clients(&self) -> Result<Vec<Client>, CoreError> {
        Ok(self.clients.clone())
    }
}

fn skip(report: &mut ImportReport, index: usize, reason: String) {
    warn!("Skipping legacy record #{index}: {reason}");
    report.skipped.push(CoreError::InvalidRecord { index, reason });
}

fn decode_clients(raw: Vec<Value>, report: &mut ImportReport) -> Vec<Client> {
    let goal_service = GoalService::new();
    let mut clients: Vec<Client> = Vec::with_capacity(raw.len());

    for (index, value) in raw.into_iter().enumerate() {
        let rc: RawClient = match serde_json::from_value(value) {
            Ok(rc) => rc,
            Err(e) => {
                skip(report, index, format!("client: {e}"));
                continue;
            }
        };

        let name = rc.name.trim();
        if name.is_empty() {
            skip(report, index, "client: blank name".into());
            continue;
        }
        if clients.iter().any(|c| c.is_named(name)) {
            skip(report, index, format!("client: duplicate name '{name}'"));
            continue;
        }

        let mut monthly_income = match &rc.monthly_income {
            Value::Number(n) => goal_service.parse_monthly_income(&n.to_string()),
            Value::String(s) => goal_service.parse_monthly_income(s),
            _ => Decimal::ZERO,
        };
        if monthly_income.is_zero() {
            // No usable income: rebuild it from the stored daily goal.
            if let Some(income) = decimal_from_value(&rc.meta)
                .filter(|meta| *meta > Decimal::ZERO)
                .and_then(|meta| meta.checked_mul(Decimal::from(DEFAULT_DAYS_PER_MONTH)))
            {
                debug!("Client '{name}' has no income; derived {income} from its daily goal");
                monthly_income = income;
            }
        }

        let mut client = Client::new(name, monthly_income);
        // Old ids were timestamps; only real UUIDs are kept.
        if let Some(id) = rc.id.as_deref().and_then(|s| Uuid::parse_str(s).ok()) {
            client.id = id;
        }
        client.birthdate = rc.birthdate.as_deref().and_then(parse_day);
        if let Some(day) = rc.registration_date.as_deref().and_then(parse_day) {
            client.registration_date = day;
        }
        client.color = rc.color;

        clients.push(client);
    }

    clients
}

fn decode_transactions(
    raw: Vec<Value>,
    clients: &[Client],
    report: &mut ImportReport,
) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(raw.len());

    for (index, value) in raw.into_iter().enumerate() {
        let rt: RawTransaction = match serde_json::from_value(value) {
            Ok(rt) => rt,
            Err(e) => {
                skip(report, index, format!("transaction: {e}"));
                continue;
            }
        };

        let Some(kind) = rt.kind.as_str().and_then(TransactionType::from_code) else {
            skip(report, index, format!("transaction: unrecognized type {}", rt.kind));
            continue;
        };

        let amount = match decimal_from_value(&rt.value) {
            Some(v) if v >= Decimal::ZERO => v,
            Some(v) => {
                skip(report, index, format!("transaction: negative value {v}"));
                continue;
            }
            None => {
                skip(report, index, format!("transaction: non-numeric value {}", rt.value));
                continue;
            }
        };

        let Some(date) = parse_instant(&rt.date) else {
            skip(report, index, format!("transaction: malformed date '{}'", rt.date));
            continue;
        };

        let category = rt
            .category
            .or_else(|| rt.comment.clone())
            .unwrap_or_default();
        let mut tx = Transaction::new(kind, amount, category, date);
        tx.comment = rt.comment.filter(|c| !c.trim().is_empty());

        if let Some(reference) = rt.client_id.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            match resolve_client(clients, reference) {
                Some(id) => tx.client_id = Some(id),
                None => {
                    debug!("Transaction #{index} references unknown client '{reference}'");
                    report.unresolved_references += 1;
                }
            }
        }

        transactions.push(tx);
    }

    transactions
}

/// Match by exact name first, then case-insensitively, then by id.
fn resolve_client(clients: &[Client], reference: &str) -> Option<Uuid> {
    clients
        .iter()
        .find(|c| c.name == reference)
        .or_else(|| clients.iter().find(|c| c.is_named(reference)))
        .or_else(|| {
            let id = Uuid::parse_str(reference).ok()?;
            clients.iter().find(|c| c.id == id)
        })
        .map(|c| c.id)
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| Decimal::from_scientific(&n.to_string()).ok()),
        Value::String(s) => Decimal::from_str(s.trim().replace(',', ".").as_str()).ok(),
        _ => None,
    }
}

/// An RFC 3339 instant keeps its own offset; a bare `YYYY-MM-DD` is
/// taken as midnight UTC.
fn parse_instant(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(instant);
    }
    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc).fixed_offset())
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok())
}
