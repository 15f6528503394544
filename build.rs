use std::fs;

fn main() {
    // Validate default config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    let width = table
        .get("table")
        .and_then(|t| t.get("max_column_width"))
        .and_then(|w| w.as_integer());
    if let Some(width) = width {
        assert!(width >= 1, "default_config.toml: max_column_width must be >= 1");
    }
}
