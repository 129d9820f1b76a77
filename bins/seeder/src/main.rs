//! Demo data seeder for Potledger development and testing.
//!
//! Builds an IT department with category budgets, decided and pending budget
//! requests, and a few months of expenses, then writes the store snapshot the
//! server loads at startup. The stored Utiliti budget is deliberately left
//! out of step with its approved requests so recalculation has drift to fix.
//!
//! Usage: cargo run --bin seeder [snapshot-path]

use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use potledger_db::{CreateBudgetRequestInput, CreateExpenseInput, MemoryStore};
use potledger_shared::AppConfig;
use potledger_shared::types::{DepartmentId, UserId};

const DEFAULT_SNAPSHOT_PATH: &str = "data/potledger.json";

fn at(month: u32, day: u32) -> anyhow::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2025, month, day, 9, 0, 0)
        .single()
        .with_context(|| format!("Invalid seed date 2025-{month}-{day}"))
}

fn request(
    requester: UserId,
    title: &str,
    category: &str,
    amount: Decimal,
    created_at: DateTime<Utc>,
) -> CreateBudgetRequestInput {
    CreateBudgetRequestInput {
        requester_id: Some(requester),
        title: title.to_string(),
        amount,
        category: Some(category.to_string()),
        justification: None,
        created_at: Some(created_at),
    }
}

fn expense(title: &str, category: &str, amount: Decimal, date: DateTime<Utc>) -> CreateExpenseInput {
    CreateExpenseInput {
        title: title.to_string(),
        amount,
        category: Some(category.to_string()),
        date,
    }
}

async fn seed_it_department(store: &MemoryStore) -> anyhow::Result<DepartmentId> {
    let dept = store.create_department("Information Technology");
    let hod = UserId::new();
    let staff = UserId::new();

    println!("Seeding category budgets...");
    store.set_category_budget(dept, "Logistik", dec!(6000)).await?;
    store.set_category_budget(dept, "General", dec!(20000)).await?;

    println!("Seeding budget requests...");
    let approved = [
        request(hod, "Fleet maintenance", "Logistik", dec!(4000), at(3, 4)?),
        request(hod, "Electricity Q1", "Utiliti", dec!(1200), at(3, 10)?),
        request(hod, "Electricity Q2", "Utiliti", dec!(800), at(4, 2)?),
        request(staff, "Pantry Restock", "Kitchen Supply", dec!(2000), at(4, 15)?),
    ];
    for input in approved {
        let submitted = store.submit_budget_request(dept, input).await?;
        store.approve_budget_request(dept, submitted.id, hod).await?;
    }

    let rejected = store
        .submit_budget_request(dept, request(staff, "Gaming chairs", "Furniture", dec!(3500), at(4, 20)?))
        .await?;
    store.reject_budget_request(dept, rejected.id).await?;

    store
        .submit_budget_request(
            dept,
            request(staff, "Q3 Server Maintenance", "Maintenance", dec!(15000), at(5, 2)?),
        )
        .await?;

    println!("Seeding expenses...");
    let expenses = [
        expense("Courier services", "Logistik", dec!(1500), at(3, 4)?),
        expense("Electricity bill", "Utiliti", dec!(650.40), at(3, 28)?),
        expense("Coffee and snacks", "Kitchen Supply", dec!(310.75), at(4, 18)?),
        expense("Printer toner", "", dec!(89.90), at(4, 22)?),
        expense("Electricity bill", "Utiliti", dec!(702.15), at(4, 28)?),
    ];
    for input in expenses {
        store.add_expense(dept, input).await?;
    }

    // Stored total no longer matches the approved 2,000.
    store.set_category_budget(dept, "Utiliti", dec!(500)).await?;

    Ok(dept)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => AppConfig::load()
            .ok()
            .and_then(|config| config.store.snapshot_path)
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.to_string()),
    };

    let store = MemoryStore::new();

    println!("Seeding IT department...");
    let dept = seed_it_department(&store).await?;

    println!("Writing snapshot to {path}...");
    store
        .snapshot()
        .await
        .write_to(&path)
        .await
        .with_context(|| format!("Failed to write snapshot {path}"))?;

    println!("Seeding complete! Department ID: {dept}");
    Ok(())
}
