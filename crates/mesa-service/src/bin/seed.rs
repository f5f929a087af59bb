//! # Demo Service Walkthrough
//!
//! Loads a sample menu and runs one evening through the desks: a few
//! bookings (one rejected), two orders, payments and a shift close.
//!
//! ## Usage
//! ```bash
//! cargo run -p mesa-service --bin seed
//!
//! # Use a specific config file
//! cargo run -p mesa-service --bin seed -- --config ./mesa.toml
//!
//! # More output
//! RUST_LOG=debug cargo run -p mesa-service --bin seed
//! ```

use std::env;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use mesa_core::money::Money;
use mesa_core::{MenuItem, Modifier, OrderStatus, ReservationStatus, Tender, Variant};
use mesa_service::{telemetry, BookingRequest, FrontOfHouse, MesaConfig, ServiceError};

/// (id, name, category, price in cents)
const MENU: &[(&str, &str, &str, i64)] = &[
    ("bruschetta", "Bruschetta", "Starters", 850),
    ("soup", "Soup of the Day", "Starters", 650),
    ("margherita", "Margherita", "Mains", 2800),
    ("risotto", "Mushroom Risotto", "Mains", 2400),
    ("tiramisu", "Tiramisu", "Desserts", 900),
    ("lemonade", "House Lemonade", "Drinks", 450),
    ("espresso", "Espresso", "Drinks", 300),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mesa POS demo walkthrough");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = MesaConfig::load(config_path)?;
    telemetry::init_tracing(&config.logging);
    let house = FrontOfHouse::new(&config)?;

    println!("Mesa POS demo: {}", config.restaurant.name);
    println!("================================");

    // Menu
    for (id, name, category, cents) in MENU {
        let mut item = MenuItem::new(*id, *name, *category, Money::from_cents(*cents))?;
        if *id == "margherita" {
            item = item
                .with_variant(Variant::new("margherita-l", "Large", Money::from_cents(3400))?)
                .with_modifier(Modifier::new("extra-cheese", "Extra cheese", Money::from_cents(200))?)
                .with_modifier(Modifier::new("olives", "Olives", Money::from_cents(150))?);
        }
        house.orders.upsert_menu_item(item).await;
    }
    println!("✓ Loaded {} menu items", MENU.len());

    // Reservations
    let evening = Utc::now() + Duration::hours(2);
    let first = house
        .reservations
        .book(BookingRequest::new("T1", "Okafor", 4, evening).with_duration(120))
        .await?;
    house
        .reservations
        .transition(&first.id, ReservationStatus::Confirmed)
        .await?;
    println!("✓ Booked T1 for {} ({} guests)", first.guest_name, first.party_size);

    match house
        .reservations
        .book(BookingRequest::new("T1", "Lindqvist", 2, evening + Duration::hours(1)))
        .await
    {
        Err(ServiceError::Conflict { reservation_id, .. }) => {
            println!("⚠ T1 taken an hour later (held by {})", reservation_id)
        }
        Err(e) => return Err(e.into()),
        Ok(r) => println!("? Unexpectedly booked {}", r.id),
    }

    let later = house
        .reservations
        .book(BookingRequest::new("T1", "Lindqvist", 2, evening + Duration::hours(2)))
        .await?;
    println!("✓ Booked T1 back-to-back for {}", later.guest_name);

    // Service
    house.register.open_shift("Dana", Money::from_cents(20_000)).await?;

    let table = house.orders.open_order(Some("T1".into())).await?;
    house
        .orders
        .add_line(&table.id, "margherita", None, &["extra-cheese", "olives"], 2)
        .await?;
    house.orders.add_line(&table.id, "lemonade", None, &[], 2).await?;
    house.orders.add_line(&table.id, "tiramisu", None, &[], 1).await?;
    let dine_in = house
        .orders
        .submit(&table.id, Money::from_cents(500), Money::from_cents(1_000))
        .await?;
    house.orders.advance_status(&dine_in.id, OrderStatus::InKitchen).await?;

    let takeaway = house.orders.open_order(None).await?;
    house.orders.add_line(&takeaway.id, "espresso", None, &[], 2).await?;
    let takeaway = house
        .orders
        .submit(&takeaway.id, Money::zero(), Money::zero())
        .await?;

    for order in [&dine_in, &takeaway] {
        println!(
            "✓ {}  subtotal {}  tax {}  total {}",
            order.receipt_number,
            config.format_currency(order.summary.subtotal),
            config.format_currency(order.summary.tax),
            config.format_currency(order.summary.total),
        );
    }

    // Payment
    let card_part = Money::from_cents(5_000);
    let cash_part = dine_in.summary.total - card_part + Money::from_cents(300);
    let settlement = house
        .register
        .record_settlement(
            dine_in.summary.total,
            &[Tender::card(card_part, Some("auth-0001".into())), Tender::cash(cash_part)],
        )
        .await?;
    println!("✓ Dine-in paid, change {}", config.format_currency(settlement.change));

    house
        .register
        .record_settlement(takeaway.summary.total, &[Tender::cash(takeaway.summary.total)])
        .await?;

    // Close
    let expected = house.register.expected_cash().await?;
    let counted = expected - Money::from_cents(20);
    let result = house.register.close_shift(counted).await?;
    println!(
        "✓ Shift closed: expected {}  counted {}  {:?} ({})",
        config.format_currency(result.expected),
        config.format_currency(result.counted),
        result.outcome,
        config.format_currency(result.discrepancy),
    );

    Ok(())
}
