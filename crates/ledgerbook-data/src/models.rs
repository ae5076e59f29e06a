//! Domain models for database entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A client of the accounting system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i32,
    pub name: String,
    /// National tax identifier (CPF/CNPJ), unique per client
    pub tax_id: String,
    pub email: String,
    /// Never serialized outward; handled by the API layer's DTOs
    #[serde(skip_serializing)]
    pub password: String,
    pub active: bool,
    pub registered_at: DateTime<Utc>,
}

/// Fields required to create a client
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub password: String,
    pub active: bool,
}

/// Fields that may change on an existing client
#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub name: String,
    pub email: String,
    pub active: bool,
}

/// Side of the ledger an account records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum AccountKind {
    Debit,
    Credit,
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Invalid account kind: {s}")),
        }
    }
}

impl From<String> for AccountKind {
    fn from(s: String) -> Self {
        s.as_str().parse().unwrap_or(Self::Debit)
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        };
        write!(f, "{kind}")
    }
}

/// A chart-of-accounts entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub kind: AccountKind,
    /// Owning client, when the account is client-scoped
    pub client_id: Option<i32>,
}

/// Fields required to create an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub client_id: Option<i32>,
}

/// Fields that may change on an existing account
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub name: String,
    pub kind: AccountKind,
    pub client_id: Option<i32>,
}

/// A cost center that ledger entries are attributed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostCenter {
    pub id: i32,
    pub name: String,
}

/// A ledger entry (one accounting record)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i32,
    /// Monetary amount, positive, at most 999999.99
    pub amount: Decimal,
    pub account_id: i32,
    pub cost_center_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields required to create a ledger entry
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub amount: Decimal,
    pub account_id: i32,
    pub cost_center_id: i32,
}

/// Fields that may change on an existing ledger entry
///
/// Applying an update also stamps `updated_at`.
#[derive(Debug, Clone)]
pub struct LedgerEntryUpdate {
    pub amount: Decimal,
    pub account_id: i32,
    pub cost_center_id: i32,
}

/// A sale linking a ledger entry to the client it was made for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i32,
    pub client_id: i32,
    pub ledger_entry_id: i32,
    /// External sales-event reference, when one exists
    pub sale_event_id: Option<i64>,
}

/// Fields required to create a sale
#[derive(Debug, Clone)]
pub struct NewSale {
    pub client_id: i32,
    pub ledger_entry_id: i32,
    pub sale_event_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_kind_round_trips_through_strings() {
        assert_eq!("debit".parse::<AccountKind>(), Ok(AccountKind::Debit));
        assert_eq!("CREDIT".parse::<AccountKind>(), Ok(AccountKind::Credit));
        assert_eq!(AccountKind::Credit.to_string(), "credit");
    }

    #[test]
    fn unknown_kind_strings_fall_back_to_debit() {
        assert_eq!(AccountKind::from("ledger".to_string()), AccountKind::Debit);
    }

    #[test]
    fn client_password_is_not_serialized() {
        let client = Client {
            id: 1,
            name: "Alpha".to_string(),
            tax_id: "12345678901".to_string(),
            email: "alpha@example.com".to_string(),
            password: "secret".to_string(),
            active: true,
            registered_at: Utc::now(),
        };
        let json = serde_json::to_string(&client).expect("serializable");
        assert!(!json.contains("secret"));
    }
}
