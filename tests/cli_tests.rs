use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn invoice_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("invoice-builder"))
}

/// Run `init` in a fresh temp dir and return (guard, config path)
fn init_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invoice-config");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    (temp_dir, config_path)
}

fn run_ok(config_path: &Path, args: &[&str]) {
    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap()])
        .args(args)
        .assert()
        .success();
}

fn write_preview(path: &Path, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([250, 250, 250, 255]))
        .save(path)
        .unwrap();
}

#[test]
fn test_help() {
    invoice_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Build invoices and export them as paginated PDFs",
        ));
}

#[test]
fn test_version() {
    invoice_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("invoice-builder"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("invoice-config");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized invoice-builder config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("storage").is_dir());
    assert!(config_path.join("output").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let (_temp_dir, config_path) = init_config();

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_show_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_show_fresh_invoice() {
    let (_temp_dir, config_path) = init_config();

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INVOICE"))
        .stdout(predicate::str::contains("[Item Description]"))
        .stdout(predicate::str::contains("BALANCE DUE (USD):"))
        .stdout(predicate::str::contains("$0.00"));
}

#[test]
fn test_tax_only_totals() {
    let (_temp_dir, config_path) = init_config();

    run_ok(&config_path, &["item", "set", "1", "-q", "2", "-p", "50"]);
    run_ok(&config_path, &["toggle", "discount"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "totals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUB TOTAL:"))
        .stdout(predicate::str::contains("$100.00"))
        .stdout(predicate::str::contains("TAX (GST 10%):"))
        .stdout(predicate::str::contains("$10.00"))
        .stdout(predicate::str::contains("$110.00"))
        .stdout(predicate::str::contains("DISCOUNT").not());
}

#[test]
fn test_discount_only_totals() {
    let (_temp_dir, config_path) = init_config();

    run_ok(
        &config_path,
        &["item", "set", "1", "-q", "1", "-p", "200", "--discount", "50"],
    );
    run_ok(&config_path, &["set", "discount", "10"]);
    run_ok(&config_path, &["toggle", "tax"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "totals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$200.00"))
        .stdout(predicate::str::contains("-$120.00"))
        .stdout(predicate::str::contains("$80.00"))
        .stdout(predicate::str::contains("TAX").not());
}

#[test]
fn test_malformed_numbers_count_as_zero() {
    let (_temp_dir, config_path) = init_config();

    run_ok(&config_path, &["item", "set", "1", "-q", "lots", "-p", "99"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "totals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BALANCE DUE (USD):"))
        .stdout(predicate::str::contains("$0.00"));
}

#[test]
fn test_currency_symbol_in_totals() {
    let (_temp_dir, config_path) = init_config();

    run_ok(&config_path, &["set", "currency", "EUR"]);
    run_ok(&config_path, &["item", "set", "1", "-p", "1234.5"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "totals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€1,234.50"))
        .stdout(predicate::str::contains("BALANCE DUE (EUR):"));
}

#[test]
fn test_hidden_field_resets_value() {
    let (_temp_dir, config_path) = init_config();

    run_ok(&config_path, &["set", "payment-method", "Wire"]);
    run_ok(&config_path, &["set", "bank-name", "First Bank"]);
    run_ok(&config_path, &["toggle", "payment"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "set", "bank-name", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Field 'payment' is disabled"));

    run_ok(&config_path, &["toggle", "payment"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First Bank").not())
        .stdout(predicate::str::contains("Wire").not());
}

#[test]
fn test_fields_list() {
    let (_temp_dir, config_path) = init_config();

    run_ok(&config_path, &["toggle", "company-contact"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("company-contact"))
        .stdout(predicate::str::contains("Contact Info"))
        .stdout(predicate::str::contains("hidden"));
}

#[test]
fn test_last_item_is_kept() {
    let (_temp_dir, config_path) = init_config();

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "item", "remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing removed"));

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "item", "remove", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid item index '3'"));
}

#[test]
fn test_add_and_remove_items() {
    let (_temp_dir, config_path) = init_config();

    run_ok(
        &config_path,
        &["item", "add", "-d", "Consulting", "-q", "8", "-p", "150"],
    );

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "item", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consulting"))
        .stdout(predicate::str::contains("$1,200.00"));

    run_ok(&config_path, &["item", "remove", "2"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "item", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consulting").not());
}

#[test]
fn test_corrupt_storage_falls_back_to_defaults() {
    let (_temp_dir, config_path) = init_config();

    fs::write(
        config_path.join("storage").join("currentInvoice.json"),
        "{not json",
    )
    .unwrap();

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BALANCE DUE (USD):"))
        .stderr(predicate::str::contains("Ignoring saved invoice"));
}

#[test]
fn test_state_persists_as_json() {
    let (_temp_dir, config_path) = init_config();

    run_ok(&config_path, &["set", "company-name", "Acme Ltd"]);

    let saved =
        fs::read_to_string(config_path.join("storage").join("currentInvoice.json")).unwrap();
    assert!(saved.contains(r#""companyName":"Acme Ltd""#));
    assert!(saved.contains(r#""activeFields""#));
}

#[test]
fn test_logo_stored_as_data_url() {
    let (temp_dir, config_path) = init_config();
    let logo = temp_dir.path().join("logo.png");
    write_preview(&logo, 2, 2);

    run_ok(&config_path, &["logo", logo.to_str().unwrap()]);

    let saved =
        fs::read_to_string(config_path.join("storage").join("currentInvoice.json")).unwrap();
    assert!(saved.contains("data:image/png;base64,"));

    run_ok(&config_path, &["logo", "--clear"]);
    let saved =
        fs::read_to_string(config_path.join("storage").join("currentInvoice.json")).unwrap();
    assert!(!saved.contains("data:image/png"));
}

#[test]
fn test_clear_keeps_field_visibility() {
    let (_temp_dir, config_path) = init_config();

    run_ok(&config_path, &["set", "client-name", "Globex"]);
    run_ok(&config_path, &["toggle", "notes"]);
    run_ok(&config_path, &["clear"]);

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Globex").not());

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden"));

    run_ok(&config_path, &["clear", "--all"]);
    assert!(!config_path
        .join("storage")
        .join("currentInvoice.json")
        .exists());
}

#[test]
fn test_clear_resets_hidden_fields_to_defaults() {
    let (_temp_dir, config_path) = init_config();
    fs::write(
        config_path.join("config.toml"),
        "[defaults]\ncurrency = \"EUR\"\ntax_rate = 15.0\n",
    )
    .unwrap();

    run_ok(&config_path, &["toggle", "currency"]);
    run_ok(&config_path, &["toggle", "tax"]);
    run_ok(&config_path, &["clear"]);

    let saved =
        fs::read_to_string(config_path.join("storage").join("currentInvoice.json")).unwrap();
    assert!(saved.contains(r#""currency":"USD""#), "{saved}");
    assert!(saved.contains(r#""taxRate":10.0"#), "{saved}");

    invoice_cmd()
        .args(["-C", config_path.to_str().unwrap(), "totals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BALANCE DUE (USD):"))
        .stdout(predicate::str::contains("€").not());
}

#[test]
fn test_export_multi_page_pdf() {
    let (temp_dir, config_path) = init_config();
    let preview = temp_dir.path().join("preview.png");
    let output = temp_dir.path().join("invoice.pdf");
    // 3000px at 1000px wide scales to 600mm -> 3 A4 pages
    write_preview(&preview, 1000, 3000);

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "--bitmap",
            preview.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 page(s)"));

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_export_default_filename() {
    let (temp_dir, config_path) = init_config();
    let preview = temp_dir.path().join("preview.png");
    write_preview(&preview, 800, 600);

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "--bitmap",
            preview.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 page(s)"));

    let names: Vec<String> = fs::read_dir(config_path.join("output"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("invoice-"));
    assert!(names[0].ends_with(".pdf"));
}

#[test]
fn test_export_missing_preview() {
    let (temp_dir, config_path) = init_config();
    let preview = temp_dir.path().join("missing.png");

    invoice_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "--bitmap",
            preview.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Preview not found"));

    assert_eq!(fs::read_dir(config_path.join("output")).unwrap().count(), 0);
}
