//! # Seed Data Generator
//!
//! Populates a database with demo records for development.
//!
//! ## Usage
//! ```bash
//! # 40 products (default) plus parties, invoices and expenses
//! cargo run -p daftar-db --bin seed
//!
//! # Custom amount
//! cargo run -p daftar-db --bin seed -- --count 100
//!
//! # Specify database path
//! cargo run -p daftar-db --bin seed -- --db ./data/daftar.db
//! ```
//!
//! ## Generated Records
//! - Products across a few stationery/grocery categories, some below
//!   their reorder point
//! - Customers and suppliers with phone numbers
//! - Invoices over the last week in every status
//! - Expenses over the last week
//!
//! Each product has a unique SKU: `{CATEGORY}-{INDEX}`.

use chrono::Duration;
use std::env;

use daftar_core::{today, Customer, Expense, InvoiceStatus, Money, Product, Supplier};
use daftar_db::{Database, DbConfig, InvoiceLine};

/// Product categories for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "STN",
        &[
            "Blue Pen",
            "Red Pen",
            "Pencil HB",
            "Eraser",
            "A4 Notebook",
            "A5 Notebook",
            "Stapler",
            "Staples Box",
            "Ruler 30cm",
            "Glue Stick",
        ],
    ),
    (
        "GRO",
        &[
            "Rice 5kg",
            "Sugar 2kg",
            "Tea 100 Bags",
            "Dates 1kg",
            "Cooking Oil 1.5L",
            "Flour 2kg",
            "Lentils 1kg",
            "Salt 1kg",
            "Coffee 250g",
            "Honey 500g",
        ],
    ),
    (
        "BEV",
        &[
            "Water 330ml",
            "Water 1.5L",
            "Cola 330ml",
            "Orange Juice 1L",
            "Laban 1L",
            "Milk 1L",
            "Apple Juice 1L",
            "Mango Juice 1L",
            "Sparkling Water",
            "Iced Tea",
        ],
    ),
    (
        "CLN",
        &[
            "Dish Soap",
            "Laundry Powder",
            "Bleach 1L",
            "Sponges 3pk",
            "Trash Bags",
            "Glass Cleaner",
            "Floor Cleaner",
            "Hand Soap",
            "Tissues Box",
            "Paper Towels",
        ],
    ),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Al Noor Trading", "0501112233"),
    ("Sara Office Supplies", "0559876543"),
    ("Riyadh Corner Café", "0534445566"),
    ("Walk-in Customer", "0500000000"),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Gulf Wholesale", "0112223344"),
    ("Eastern Paper Mill", "0138889900"),
];

const EXPENSES: &[(&str, i64, &str)] = &[
    ("Shop rent", 2500, "Rent"),
    ("Electricity bill", 340, "Utilities"),
    ("Delivery van fuel", 180, "Transport"),
    ("Cleaning service", 150, "مصاريف عامة"),
    ("Internet", 299, "Utilities"),
];

const STATUSES: &[InvoiceStatus] = &[
    InvoiceStatus::Paid,
    InvoiceStatus::Unpaid,
    InvoiceStatus::PartiallyPaid,
    InvoiceStatus::Draft,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./daftar_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Daftar Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./daftar_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Daftar Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().len().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Products
    println!();
    println!("Generating products...");

    let mut products = Vec::new();
    let catalog = CATEGORIES
        .iter()
        .flat_map(|(code, names)| names.iter().map(move |name| (*code, *name)))
        .take(count);

    for (index, (code, name)) in catalog.enumerate() {
        let product = generate_product(code, name, index);
        match db.products().upsert(product).await {
            Ok(saved) => products.push(saved),
            Err(e) => eprintln!("Failed to insert {}: {}", name, e),
        }
    }
    println!("✓ Generated {} products", products.len());

    // Parties
    let mut customers = Vec::new();
    for (name, phone) in CUSTOMERS {
        let mut customer = Customer::new(*name);
        customer.phone = Some(phone.to_string());
        customers.push(db.customers().upsert(customer).await?);
    }

    for (name, phone) in SUPPLIERS {
        let mut supplier = Supplier::new(*name);
        supplier.phone = Some(phone.to_string());
        db.suppliers().upsert(supplier).await?;
    }
    println!(
        "✓ Generated {} customers, {} suppliers",
        customers.len(),
        SUPPLIERS.len()
    );

    // Expenses over the last week
    let today = today();
    for (offset, (description, amount, category)) in EXPENSES.iter().enumerate() {
        let mut expense = Expense::new(*description, Money::from_major(*amount));
        expense.date = today - Duration::days(offset as i64);
        expense.category = category.to_string();
        db.expenses().upsert(expense).await?;
    }
    println!("✓ Generated {} expenses", EXPENSES.len());

    // Invoices over the last week
    let mut invoices = 0;
    if !products.is_empty() {
        for day in 0..7usize {
            let customer = &customers[day % customers.len()];
            let lines: Vec<InvoiceLine> = (0..3)
                .map(|n| {
                    let product = &products[(day * 3 + n) % products.len()];
                    InvoiceLine::new(&product.id, 1 + (day + n) as i64 % 4)
                })
                .collect();
            let status = STATUSES[day % STATUSES.len()];

            let invoice = db.create_invoice(&customer.id, &lines, status).await?;
            let dated = invoice.with_date(today - Duration::days(day as i64));
            db.invoices().upsert(dated).await?;
            invoices += 1;
        }
    }
    println!("✓ Generated {} invoices", invoices);

    // Verify
    println!();
    let statement = db.reports().income_statement().await?;
    println!("  Revenue:  {}", statement.total_revenue);
    println!("  Expenses: {}", statement.total_expenses);
    println!("  Net:      {}", statement.net_profit);
    println!(
        "  Low stock: {} products",
        db.reports().low_stock().await?.len()
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic demo values.
fn generate_product(category: &str, name: &str, seed: usize) -> Product {
    let sku = format!("{}-{:03}", category, seed);

    // Sale price 2.50 - 42.40
    let sale_cents = 250 + ((seed * 137) % 4000) as i64;

    // Purchase price 60-80% of sale
    let cost_pct = 60 + (seed % 20) as i64;

    let mut product = Product::new(name, sku, Money::from_cents(sale_cents));
    product.barcode = Some(format!("628{:010}", seed));
    product.purchase_price = Money::from_cents(sale_cents * cost_pct / 100);
    product.quantity = ((seed * 7) % 60) as i64;
    product.reorder_point = 5 + (seed % 4) as i64 * 5;
    product
}
