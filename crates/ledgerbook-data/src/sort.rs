//! Sortable columns per entity
//!
//! Each searchable entity exposes an explicit enum of the fields it can
//! be ordered by, mapped to the backing column. Unrecognized sort names
//! are not errors: they resolve to the entity's default ordering, which
//! also pins the direction (newest-first for ledger entries and sales,
//! name-ascending for the catalog-like entities).

use ledgerbook_search::SortOrder;

/// Lowercase the raw name and drop separators so `taxId`, `tax_id` and
/// `TAXID` all resolve to the same field
fn fold(raw: &str) -> String {
    raw.to_ascii_lowercase().replace(['_', '-'], "")
}

macro_rules! sortable {
    (
        $(#[$meta:meta])*
        $name:ident {
            default: ($default:ident, $default_order:expr),
            $( $variant:ident => $column:literal : [$($alias:literal),+] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Column name in the backing table
            pub const fn column(self) -> &'static str {
                match self {
                    $( Self::$variant => $column, )+
                }
            }

            /// Parse a caller-supplied sort name; `None` for unknown names
            pub fn parse(raw: &str) -> Option<Self> {
                match fold(raw).as_str() {
                    $( $( $alias )|+ => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Resolve the effective ordering for a request
            ///
            /// A recognized field keeps the requested direction; anything
            /// else falls back to the entity default (field and direction).
            pub fn resolve(sort_by: Option<&str>, order: SortOrder) -> (Self, SortOrder) {
                sort_by
                    .and_then(Self::parse)
                    .map_or((Self::$default, $default_order), |field| (field, order))
            }
        }
    };
}

sortable! {
    /// Sortable client fields, defaulting to name ascending
    ClientSort {
        default: (Name, SortOrder::Asc),
        Name => "name" : ["name"],
        TaxId => "tax_id" : ["taxid"],
        Email => "email" : ["email"],
        RegisteredAt => "registered_at" : ["registeredat"],
        Id => "id" : ["id"],
    }
}

sortable! {
    /// Sortable account fields, defaulting to name ascending
    AccountSort {
        default: (Name, SortOrder::Asc),
        Name => "name" : ["name"],
        Kind => "kind" : ["kind"],
        Id => "id" : ["id"],
    }
}

sortable! {
    /// Sortable cost center fields, defaulting to name ascending
    CostCenterSort {
        default: (Name, SortOrder::Asc),
        Name => "name" : ["name"],
        Id => "id" : ["id"],
    }
}

sortable! {
    /// Sortable ledger entry fields, defaulting to newest first
    LedgerEntrySort {
        default: (CreatedAt, SortOrder::Desc),
        Amount => "amount" : ["amount"],
        CreatedAt => "created_at" : ["createdat", "date"],
        AccountId => "account_id" : ["accountid"],
        CostCenterId => "cost_center_id" : ["costcenterid"],
        Id => "id" : ["id"],
    }
}

sortable! {
    /// Sortable sale fields, defaulting to newest (highest id) first
    SaleSort {
        default: (Id, SortOrder::Desc),
        Id => "id" : ["id"],
        ClientId => "client_id" : ["clientid", "client"],
        LedgerEntryId => "ledger_entry_id" : ["ledgerentryid"],
        SaleEventId => "sale_event_id" : ["saleeventid"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_regardless_of_casing_and_separators() {
        assert_eq!(ClientSort::parse("taxId"), Some(ClientSort::TaxId));
        assert_eq!(ClientSort::parse("TAX_ID"), Some(ClientSort::TaxId));
        assert_eq!(LedgerEntrySort::parse("createdAt"), Some(LedgerEntrySort::CreatedAt));
        assert_eq!(LedgerEntrySort::parse("date"), Some(LedgerEntrySort::CreatedAt));
    }

    #[test]
    fn unknown_fields_fall_back_to_the_entity_default() {
        let (field, order) = ClientSort::resolve(Some("nonexistent_field"), SortOrder::Desc);
        assert_eq!(field, ClientSort::Name);
        assert_eq!(order, SortOrder::Asc);

        let (field, order) = LedgerEntrySort::resolve(None, SortOrder::Asc);
        assert_eq!(field, LedgerEntrySort::CreatedAt);
        assert_eq!(order, SortOrder::Desc);
    }

    #[test]
    fn recognized_fields_keep_the_requested_direction() {
        let (field, order) = SaleSort::resolve(Some("clientId"), SortOrder::Asc);
        assert_eq!(field, SaleSort::ClientId);
        assert_eq!(order, SortOrder::Asc);
    }

    #[test]
    fn columns_match_the_schema() {
        assert_eq!(ClientSort::RegisteredAt.column(), "registered_at");
        assert_eq!(LedgerEntrySort::CostCenterId.column(), "cost_center_id");
        assert_eq!(SaleSort::LedgerEntryId.column(), "ledger_entry_id");
    }
}
