use anyhow::{Context, Result};
use chrono::Local;
use wedding_planner::{init_logging, Config, Dashboard, Planner, RecordStore};

fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_logging(config.logging.verbosity);

    let planner = Planner::new(RecordStore::open(&config.storage.data_dir));

    for collection in planner.health() {
        if collection.status.is_unreadable() {
            eprintln!("⚠️  {} could not be read; showing it as empty", collection.file);
        }
    }

    print_summary(&planner.dashboard(Local::now().date_naive()));
    Ok(())
}

fn print_summary(dashboard: &Dashboard) {
    println!("💍 Wedding Planner");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match (&dashboard.wedding_date, dashboard.days_until) {
        (Some(date), Some(days)) if days >= 0 => println!("📅 {date} ({days} days to go)"),
        (Some(date), _) => println!("📅 {date} (done!)"),
        _ => println!("📅 No wedding date set"),
    }

    let guests = &dashboard.guests;
    println!("\n👥 Guests");
    println!("   Invited:   {}", guests.invited);
    println!("   Attending: {} (incl. plus-ones)", guests.attending);
    println!("   Declined:  {}", guests.declined);
    println!("   Awaiting:  {}", guests.awaiting);

    let budget = &dashboard.budget;
    println!("\n💰 Budget");
    println!("   Venues:    {:.2}", budget.venue_total);
    println!("   Other:     {:.2}", budget.other_total);
    println!("   Total:     {:.2}", budget.grand_total);
    if budget.unaccounted() > 0.0 {
        println!(
            "   ({:.2} of listed expense prices is not included in the total)",
            budget.unaccounted()
        );
    }

    let tasks = &dashboard.tasks;
    println!("\n✅ Tasks");
    println!("   {}/{} done ({}%)", tasks.completed, tasks.total, tasks.percent);
}
