/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Configuration ===\n");

    println!("Image Settings:");
    println!("  Caching Enabled: {}", config.images.caching_enabled);
    println!("  Cache Validity: {:?}", config.images.cache_validity());
    println!("  Request Timeout: {:?}", config.images.request_timeout());
    println!("  User Agent: {}", config.images.user_agent);
    println!("  Max Cache Entries: {}", config.images.max_cache_entries);
    println!();

    println!("Fonts:");
    for entry in &config.fonts.entries {
        println!("  {:?} as {:?}", entry.file, entry.alias);
    }
    println!();

    println!("Window Settings:");
    println!("  Title: {}", config.window.title);
    println!("  Size: {}x{}", config.window.width, config.window.height);
    println!();

    match config.to_toml_string() {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
