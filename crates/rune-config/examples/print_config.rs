/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // rune.toml plus RUNE_* environment overrides
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Text Configuration ===\n");

    println!("Text Defaults:");
    println!("  Family: {}", config.text.family);
    println!("  Size: {}", config.text.size);
    println!("  Fill Color: {}", config.text.fill_color);
    println!();

    println!("Editor Settings:");
    println!("  Blink Interval: {}s", config.editor.blink_interval);
    println!("  Min Box Size: {}px", config.editor.min_box_size);
    println!("  Wrap: {}", config.editor.wrap);
    println!("  Direction: {}", config.editor.direction);
    println!();

    println!("Font Settings:");
    println!("  Extra Preloaded: {}", config.fonts.preloaded.join(", "));
    println!("  System Fonts: {}", config.fonts.system_fonts);
    println!(
        "  Fallback Ratios: width {} / height {} / baseline {}",
        config.fonts.fallback_width_ratio,
        config.fonts.fallback_height_ratio,
        config.fonts.fallback_baseline_ratio
    );
    println!();

    match config.to_toml() {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
