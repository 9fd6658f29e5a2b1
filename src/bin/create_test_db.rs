use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use moneywise::{
    initialize_db, process_due_recurring,
    seed::{
        AccountForm, AccountKind, BankName, BudgetForm, CategoryName, Frequency, NewBank,
        RecurringForm, RecurringType, Transaction, TransactionType, create_account, create_bank,
        create_budget, create_category, create_recurring_transaction, create_transaction,
    },
};

/// A utility for creating a test database for the moneywise web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let today = OffsetDateTime::now_utc().date();

    println!("Creating banks and accounts...");

    let bank = create_bank(NewBank::new(BankName::new_unchecked("Kiwi Bank")), &conn)?;
    let everyday = create_account(
        &AccountForm::new("Everyday", AccountKind::Checking, 1500.0).bank_id(Some(bank.id)),
        &conn,
    )?;
    let savings = create_account(
        &AccountForm::new("Savings", AccountKind::Savings, 10_000.0).bank_id(Some(bank.id)),
        &conn,
    )?;
    create_account(
        &AccountForm::new("Credit Card", AccountKind::CreditCard, 0.0),
        &conn,
    )?;

    println!("Creating categories and budgets...");

    let mut category_ids = Vec::new();

    for (name, icon, color) in [
        ("Groceries", "🛒", "#16a34a"),
        ("Dining", "🍜", "#ea580c"),
        ("Transport", "🚌", "#2563eb"),
        ("Subscriptions", "📺", "#9333ea"),
        ("Salary", "💼", "#0d9488"),
    ] {
        let category = create_category(CategoryName::new_unchecked(name), icon, color, &conn)?;
        category_ids.push(category.id);
    }

    let [groceries, dining, transport, subscriptions, salary] = category_ids[..] else {
        unreachable!("five categories were created");
    };

    for (category_id, amount) in [(groceries, 600.0), (dining, 200.0), (transport, 150.0)] {
        create_budget(
            &BudgetForm {
                category_id,
                amount,
            },
            &conn,
        )?;
    }

    println!("Creating transactions...");

    let expenses = [
        ("Countdown", 84.30, groceries),
        ("Pak'nSave", 121.75, groceries),
        ("Burger Fuel", 24.50, dining),
        ("Ramen Takara", 32.00, dining),
        ("AT Hop top up", 40.00, transport),
    ];

    for week in 0..26_i64 {
        let date = today - Duration::weeks(week);
        let (description, amount, category_id) = expenses[week as usize % expenses.len()];

        create_transaction(
            Transaction::build(amount, date, description, everyday.id)
                .transaction_type(TransactionType::Expense)
                .category_id(Some(category_id)),
            &conn,
        )?;
    }

    create_transaction(
        Transaction::build(500.0, today - Duration::days(3), "Monthly savings", everyday.id)
            .transaction_type(TransactionType::Transfer)
            .related_account_id(Some(savings.id)),
        &conn,
    )?;

    println!("Creating recurring transactions...");

    create_recurring_transaction(
        &RecurringForm {
            description: "Salary".to_owned(),
            amount: 2400.0,
            recurring_type: RecurringType::Income,
            frequency: Frequency::BiWeekly,
            start_date: today - Duration::weeks(24),
            account_id: everyday.id,
            category_id: Some(salary),
        },
        &conn,
    )?;
    create_recurring_transaction(
        &RecurringForm {
            description: "Netflix".to_owned(),
            amount: 18.99,
            recurring_type: RecurringType::Expense,
            frequency: Frequency::Monthly,
            start_date: today - Duration::weeks(20),
            account_id: everyday.id,
            category_id: Some(subscriptions),
        },
        &conn,
    )?;
    create_recurring_transaction(
        &RecurringForm {
            description: "Domain name".to_owned(),
            amount: 30.0,
            recurring_type: RecurringType::Expense,
            frequency: Frequency::Yearly,
            start_date: today - Duration::days(300),
            account_id: everyday.id,
            category_id: Some(subscriptions),
        },
        &conn,
    )?;

    let result = process_due_recurring(today, &conn)?;
    println!(
        "Created {} transactions from {} recurring transactions",
        result.transactions_created, result.templates_processed
    );

    println!("Success!");

    Ok(())
}
