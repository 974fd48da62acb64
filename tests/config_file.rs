use tinttodo::config::{self, GlyphStyle};

#[test]
fn set_then_get_round_trips_through_the_file() {
    let td = tempfile::tempdir().expect("tempdir");
    let path = td.path().join("nested").join("config.toml");

    config::set_value_string_at_path(&path, "ui.variant", "plain").expect("set variant");
    config::set_value_string_at_path(&path, "ui.glyphs", "ascii").expect("set glyphs");
    config::set_value_string_at_path(&path, "ui.tint_rows", "false").expect("set tint");

    assert_eq!(
        config::get_value_string_at_path(&path, "ui.variant").expect("get"),
        Some("plain".to_owned())
    );
    assert_eq!(
        config::get_value_string_at_path(&path, "ui.tint_rows").expect("get"),
        Some("false".to_owned())
    );

    let text = std::fs::read_to_string(&path).expect("read config");
    let cfg: config::Config = toml::from_str(&text).expect("parse config");
    assert_eq!(cfg.ui.glyphs, GlyphStyle::Ascii);
    assert!(!cfg.ui.tint_rows);
}

#[test]
fn rejects_unknown_keys_and_bad_values() {
    let td = tempfile::tempdir().expect("tempdir");
    let path = td.path().join("config.toml");

    assert!(config::set_value_string_at_path(&path, "ui.theme", "dark").is_err());
    assert!(config::set_value_string_at_path(&path, "ui.variant", "neon").is_err());
    assert!(config::set_value_string_at_path(&path, "ui.tint_rows", "maybe").is_err());
    assert!(!path.exists());
}
