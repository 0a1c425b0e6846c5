//! Basic example demonstrating the Foreman API client.
//!
//! Run with:
//! ```
//! FOREMAN_URL=https://foreman.example.com FOREMAN_USERNAME=admin \
//!     FOREMAN_PASSWORD=changeme cargo run --example basic
//! ```

use foremanapi::{
    Create, Delete, Domain, ForemanClient, Get, Host, PuppetClass, Search, SearchQuery,
};

#[tokio::main]
async fn main() -> foremanapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Foreman client...");
    let client = ForemanClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // First page of domains
    println!("\n--- Listing Domains (first page) ---");
    let domains = Domain::search_page(&client, &SearchQuery::new().per_page(10)).await?;
    println!("Found {} domains (total: {})", domains.len(), domains.total);
    for domain in &domains {
        println!("  - {} (#{})", domain.base.name, domain.base.id);
    }

    // Create, read back and delete a scratch domain
    println!("\n--- Domain Round Trip ---");
    let mut scratch = Domain::named("scratch.example.com");
    scratch.fullname = Some("Created by the basic example".to_string());
    let created = Domain::create(&client, &scratch).await?;
    println!("Created domain #{}", created.base.id);

    let fetched = Domain::get(&client, created.base.id).await?;
    println!("  Name: {}", fetched.base.name);
    println!("  Locations: {:?}", fetched.location_ids);
    println!("  Organizations: {:?}", fetched.organization_ids);

    let found = Domain::find_by_name(&client, "scratch.example.com").await?;
    println!("  Found by name: #{}", found.base.id);

    Domain::delete(&client, created.base.id).await?;
    println!("Deleted domain #{}", created.base.id);

    // Hosts in build mode
    println!("\n--- Hosts in Build Mode ---");
    let building = Host::search_all(&client, &SearchQuery::new().raw("build = true")).await?;
    println!("Found {} hosts in build mode", building.len());
    for host in building.iter().take(5) {
        println!("  - {} ({})", host.base.name, host.ip.as_deref().unwrap_or("no ip"));
    }

    // Puppet classes come back grouped by module
    println!("\n--- Puppet Classes ---");
    let classes = PuppetClass::search_page(&client, &SearchQuery::new().per_page(5)).await?;
    for class in &classes {
        println!(
            "  - {} [{}]",
            class.base.name,
            class.module_name.as_deref().unwrap_or("unknown")
        );
    }

    println!("\nDone!");
    Ok(())
}
