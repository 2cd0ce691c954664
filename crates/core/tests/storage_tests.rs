// ═══════════════════════════════════════════════════════════════════
// Storage Tests — SnapshotSource, MemorySnapshot, LegacySnapshot
// ═══════════════════════════════════════════════════════════════════

use chrono::{FixedOffset, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use budget_tracker_core::errors::CoreError;
use budget_tracker_core::models::client::Client;
use budget_tracker_core::models::transaction::{Transaction, TransactionType};
use budget_tracker_core::storage::legacy::LegacySnapshot;
use budget_tracker_core::storage::memory::MemorySnapshot;
use budget_tracker_core::storage::traits::SnapshotSource;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  MemorySnapshot
// ═══════════════════════════════════════════════════════════════════

mod memory_snapshot {
    use super::*;

    #[test]
    fn empty_by_default() {
        let snap = MemorySnapshot::default();
        assert!(snap.load_clients().unwrap().is_empty());
        assert!(snap.load_transactions().unwrap().is_empty());
    }

    #[test]
    fn returns_what_it_holds() {
        let client = Client::new("Ana", dec!(3000));
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 15, 10, 0, 0)
            .unwrap();
        let tx = Transaction::expense(dec!(50), "Lar", date).for_client(client.id);

        let snap = MemorySnapshot::new(vec![client.clone()], vec![tx.clone()]);
        assert_eq!(snap.load_clients().unwrap(), vec![client]);
        assert_eq!(snap.load_transactions().unwrap(), vec![tx]);
    }

    #[test]
    fn usable_as_trait_object() {
        let snap: Box<dyn SnapshotSource> = Box::new(MemorySnapshot::default());
        assert!(snap.load_clients().is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  LegacySnapshot — clients
// ═══════════════════════════════════════════════════════════════════

mod legacy_clients {
    use super::*;

    #[test]
    fn decodes_basic_client() {
        let json = r##"{
            "clients": [
                { "id": "1714000000000", "name": "Ana", "birthdate": "17/05/1990",
                  "color": "#204060", "registrationDate": "17/05/2024",
                  "mensalDinheiro": "3000", "pontos": 50, "meta": 100 }
            ]
        }"##;
        let snap = LegacySnapshot::from_json(json).unwrap();
        let clients = snap.load_clients().unwrap();

        assert_eq!(clients.len(), 1);
        let ana = &clients[0];
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.monthly_income, dec!(3000));
        assert_eq!(ana.daily_goal(), dec!(100));
        assert_eq!(ana.birthdate, Some(d(1990, 5, 17)));
        assert_eq!(ana.color.as_deref(), Some("#204060"));
        assert_eq!(snap.report().clients_imported, 1);
    }

    #[test]
    fn monthly_income_key_accepted() {
        let json = r#"{ "clients": [ { "name": "Ana", "monthlyIncome": "3000" } ] }"#;
        let clients = LegacySnapshot::from_json(json).unwrap().load_clients().unwrap();
        assert_eq!(clients[0].monthly_income, dec!(3000));
    }

    #[test]
    fn comma_income_string() {
        let json = r#"{ "clients": [ { "name": "Ana", "mensalDinheiro": "1500,60" } ] }"#;
        let clients = LegacySnapshot::from_json(json).unwrap().load_clients().unwrap();
        assert_eq!(clients[0].monthly_income, dec!(1500.60));
        assert_eq!(clients[0].daily_goal(), dec!(50));
    }

    #[test]
    fn income_rebuilt_from_daily_goal() {
        let json = r#"{ "clients": [
            { "name": "Ana", "mensalDinheiro": "", "meta": 100 },
            { "name": "Bruno", "meta": "40" },
            { "name": "Carla", "mensalDinheiro": "900", "meta": 100 },
            { "name": "Davi", "mensalDinheiro": "", "meta": 0 }
        ] }"#;
        let clients = LegacySnapshot::from_json(json).unwrap().load_clients().unwrap();
        assert_eq!(clients[0].monthly_income, dec!(3000));
        assert_eq!(clients[1].monthly_income, dec!(1200));
        // A stored income wins over a stale goal.
        assert_eq!(clients[2].monthly_income, dec!(900));
        assert_eq!(clients[3].monthly_income, Decimal::ZERO);
    }

    #[test]
    fn accented_duplicate_names_skipped() {
        let json = r#"{ "clients": [ { "name": "José" }, { "name": "JOSÉ" } ] }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        assert_eq!(snap.load_clients().unwrap().len(), 1);
        assert_eq!(snap.report().skipped.len(), 1);
    }

    #[test]
    fn numeric_income_accepted() {
        let json = r#"{ "clients": [ { "name": "Ana", "monthlyIncome": 4500 } ] }"#;
        let clients = LegacySnapshot::from_json(json).unwrap().load_clients().unwrap();
        assert_eq!(clients[0].monthly_income, dec!(4500));
        assert_eq!(clients[0].daily_goal(), dec!(150));
    }

    #[test]
    fn non_numeric_or_missing_income_is_zero() {
        let json = r#"{ "clients": [
            { "name": "Ana", "monthlyIncome": "muito" },
            { "name": "Bruno" },
            { "name": "Carla", "monthlyIncome": "-100" }
        ] }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        let clients = snap.load_clients().unwrap();
        assert_eq!(clients.len(), 3);
        assert!(clients.iter().all(|c| c.monthly_income == Decimal::ZERO));
        assert!(snap.report().skipped.is_empty());
    }

    #[test]
    fn timestamp_ids_are_replaced_uuid_ids_kept() {
        let kept = Uuid::new_v4();
        let json = format!(
            r#"{{ "clients": [
                {{ "id": "1714000000000", "name": "Ana" }},
                {{ "id": "{kept}", "name": "Bruno" }}
            ] }}"#
        );
        let clients = LegacySnapshot::from_json(&json).unwrap().load_clients().unwrap();
        assert_ne!(clients[0].id.to_string(), "1714000000000");
        assert_eq!(clients[1].id, kept);
    }

    #[test]
    fn blank_and_duplicate_names_skipped() {
        let json = r#"{ "clients": [
            { "name": "Ana" },
            { "name": "   " },
            { "name": "ana" },
            { "monthlyIncome": 10 }
        ] }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        assert_eq!(snap.load_clients().unwrap().len(), 1);
        assert_eq!(snap.report().skipped.len(), 3);
        assert!(snap
            .report()
            .skipped
            .iter()
            .all(|e| matches!(e, CoreError::InvalidRecord { .. })));
    }

    #[test]
    fn unparsable_registration_date_falls_back_to_today() {
        let json = r#"{ "clients": [
            { "name": "Ana", "registrationDate": "2024-03-01" },
            { "name": "Bruno", "registrationDate": "3/1/2024, 10:00:00 AM" }
        ] }"#;
        let clients = LegacySnapshot::from_json(json).unwrap().load_clients().unwrap();
        assert_eq!(clients[0].registration_date, d(2024, 3, 1));
        assert_eq!(
            clients[1].registration_date,
            chrono::Utc::now().date_naive()
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
//  LegacySnapshot — transactions
// ═══════════════════════════════════════════════════════════════════

mod legacy_transactions {
    use super::*;

    #[test]
    fn letter_codes_are_mapped() {
        let json = r#"{ "transactions": [
            { "value": 50, "type": "A", "category": "Receita", "date": "2025-01-15T10:00:00.000Z" },
            { "value": 20, "type": "B", "category": "Lar", "date": "2025-01-15T11:00:00.000Z" },
            { "value": 900, "type": "C", "date": "2025-01-15T12:00:00.000Z" }
        ] }"#;
        let txs = LegacySnapshot::from_json(json).unwrap().load_transactions().unwrap();
        let kinds: Vec<TransactionType> = txs.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TransactionType::Income,
                TransactionType::Expense,
                TransactionType::Reset
            ]
        );
        assert_eq!(txs[2].category, "Outros");
    }

    #[test]
    fn client_names_are_resolved_to_ids() {
        let json = r#"{
            "clients": [ { "name": "Ana", "monthlyIncome": 3000 } ],
            "transactions": [
                { "value": 50, "type": "B", "date": "2025-01-15T10:00:00Z", "clientId": "Ana" },
                { "value": 10, "type": "B", "date": "2025-01-15T10:00:00Z", "clientId": "ANA" }
            ]
        }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        let ana = snap.load_clients().unwrap().remove(0);
        let txs = snap.load_transactions().unwrap();
        assert!(txs.iter().all(|t| t.client_id == Some(ana.id)));
        assert_eq!(snap.report().unresolved_references, 0);
    }

    #[test]
    fn accented_names_resolve_ignoring_case() {
        let json = r#"{
            "clients": [ { "name": "José", "mensalDinheiro": "3000" } ],
            "transactions": [
                { "value": 50, "type": "B", "date": "2025-01-15T10:00:00Z", "clientId": "JOSÉ" }
            ]
        }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        let jose = snap.load_clients().unwrap().remove(0);
        assert_eq!(snap.load_transactions().unwrap()[0].client_id, Some(jose.id));
        assert_eq!(snap.report().unresolved_references, 0);
    }

    #[test]
    fn unknown_names_become_unassigned() {
        let json = r#"{ "transactions": [
            { "value": 5, "type": "B", "date": "2025-01-15T10:00:00Z", "clientId": "Fantasma" },
            { "value": 5, "type": "B", "date": "2025-01-15T10:00:00Z", "clientId": "" },
            { "value": 5, "type": "B", "date": "2025-01-15T10:00:00Z", "clientId": null }
        ] }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        let txs = snap.load_transactions().unwrap();
        assert_eq!(txs.len(), 3);
        assert!(txs.iter().all(|t| t.client_id.is_none()));
        assert_eq!(snap.report().unresolved_references, 1);
    }

    #[test]
    fn bad_records_are_skipped_not_fatal() {
        let json = r#"{ "transactions": [
            { "value": 5, "type": "B", "date": "2025-01-15T10:00:00Z" },
            { "value": -5, "type": "B", "date": "2025-01-15T10:00:00Z" },
            { "value": "cinco", "type": "B", "date": "2025-01-15T10:00:00Z" },
            { "value": 5, "type": "X", "date": "2025-01-15T10:00:00Z" },
            { "value": 5, "type": 2, "date": "2025-01-15T10:00:00Z" },
            { "value": 5, "type": "B", "date": "ontem" },
            { "value": 5, "type": "B" },
            "not even an object"
        ] }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        assert_eq!(snap.load_transactions().unwrap().len(), 1);
        assert_eq!(snap.report().transactions_imported, 1);
        assert_eq!(snap.report().skipped.len(), 7);
    }

    #[test]
    fn skipped_records_keep_their_index() {
        let json = r#"{ "transactions": [
            { "value": 5, "type": "B", "date": "2025-01-15T10:00:00Z" },
            { "value": 5, "type": "B", "date": "ontem" }
        ] }"#;
        let snap = LegacySnapshot::from_json(json).unwrap();
        match &snap.report().skipped[0] {
            CoreError::InvalidRecord { index, reason } => {
                assert_eq!(*index, 1);
                assert!(reason.contains("malformed date"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn string_values_with_comma() {
        let json = r#"{ "transactions": [
            { "value": "12,50", "type": "B", "date": "2025-01-15T10:00:00Z" }
        ] }"#;
        let txs = LegacySnapshot::from_json(json).unwrap().load_transactions().unwrap();
        assert_eq!(txs[0].value, dec!(12.50));
    }

    #[test]
    fn offset_is_preserved_for_day_bucketing() {
        let json = r#"{ "transactions": [
            { "value": 5, "type": "B", "date": "2025-01-15T23:30:00-03:00" }
        ] }"#;
        let txs = LegacySnapshot::from_json(json).unwrap().load_transactions().unwrap();
        assert_eq!(txs[0].day(), d(2025, 1, 15));
    }

    #[test]
    fn bare_date_is_accepted() {
        let json = r#"{ "transactions": [
            { "value": 5, "type": "B", "date": "2025-01-15" }
        ] }"#;
        let txs = LegacySnapshot::from_json(json).unwrap().load_transactions().unwrap();
        assert_eq!(txs[0].day(), d(2025, 1, 15));
    }

    #[test]
    fn comment_used_as_category_fallback() {
        let json = r#"{ "transactions": [
            { "value": 5, "type": "B", "comment": "Transporte", "date": "2025-01-15T10:00:00Z" }
        ] }"#;
        let txs = LegacySnapshot::from_json(json).unwrap().load_transactions().unwrap();
        assert_eq!(txs[0].category, "Transporte");
        assert_eq!(txs[0].comment.as_deref(), Some("Transporte"));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  LegacySnapshot — document level
// ═══════════════════════════════════════════════════════════════════

mod legacy_document {
    use super::*;

    #[test]
    fn empty_object_is_empty_snapshot() {
        let snap = LegacySnapshot::from_json("{}").unwrap();
        assert!(snap.load_clients().unwrap().is_empty());
        assert!(snap.load_transactions().unwrap().is_empty());
    }

    #[test]
    fn invalid_json_fails() {
        let result = LegacySnapshot::from_json("{ clients: ");
        assert!(matches!(result, Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn wrong_top_level_shape_fails() {
        let result = LegacySnapshot::from_json(r#"{ "clients": 5 }"#);
        assert!(matches!(result, Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn into_parts() {
        let json = r#"{
            "clients": [ { "name": "Ana" } ],
            "transactions": [ { "value": 1, "type": "B", "date": "2025-01-15" } ]
        }"#;
        let (clients, txs, report) = LegacySnapshot::from_json(json).unwrap().into_parts();
        assert_eq!(clients.len(), 1);
        assert_eq!(txs.len(), 1);
        assert_eq!(report.clients_imported, 1);
        assert_eq!(report.transactions_imported, 1);
    }
}
