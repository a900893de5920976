use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PRICE: &str = r#"{
    "TraderCategories": [
        {
            "CategoryName": "Weapons",
            "Products": [
                "AKM,1,10,1,1000,500",
                "M4A1,1,5,1,2000,900"
            ]
        },
        {
            "CategoryName": "Food",
            "Products": [
                "Apple,1,-1,1,5,2"
            ]
        }
    ]
}"#;

const GENERAL: &str = r#"{
    "Traders": [
        {
            "Id": 0,
            "Name": "pr_npc_neutrals",
            "GivenName": "Bob",
            "Role": "Weapons",
            "Position": [100.5, 20, 300],
            "Orientation": [0, 90, 0],
            "Clothes": ["Hoodie_Black"]
        }
    ],
    "CurrencyName": "Rubles"
}"#;

const IDS: &str = r#"{
    "IDs": [
        {
            "Id": 0,
            "Categories": ["Weapons"],
            "LicencesRequired": [],
            "CurrenciesAccepted": ["Rubles"]
        }
    ]
}"#;

struct TestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("home")).expect("create isolated home");
        Self { _tmp: tmp, root }
    }

    fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    fn cmd(&self, file: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("trader-editor");
        cmd.env("HOME", self.root.join("home"))
            .env("XDG_CONFIG_HOME", self.config_dir())
            .env_remove("LOG_LEVEL")
            .arg(file);
        cmd
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).expect("read document")).expect("valid json")
}

#[test]
fn show_lists_categories_with_product_counts() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .arg("show")
        .assert()
        .success()
        .stdout(contains("Weapons\tProducts: 2"))
        .stdout(contains("Food\tProducts: 1"));
}

#[test]
fn show_query_marks_nested_hit_and_hides_the_rest() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["show", "--query", "m4a1"])
        .assert()
        .success()
        .stdout(contains("Weapons ★\tM4A1 | Buy:2000 | Sell:900"))
        .stdout(contains("Food").not());
}

#[test]
fn show_does_not_rewrite_file() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file).arg("show").assert().success();
    assert_eq!(fs::read_to_string(&file).unwrap(), PRICE);
}

#[test]
fn products_query_keeps_only_matching_rows() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["products", "Weapons", "-q", "akm"])
        .assert()
        .success()
        .stdout(contains("* AKM\t1\t10\t1\t1000\t500"))
        .stdout(contains("M4A1").not());
}

#[test]
fn add_category_persists_immediately() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["add-category", "  Medical  "])
        .assert()
        .success()
        .stdout(contains("Added category: Medical"));

    let doc = read_json(&file);
    let categories = doc["TraderCategories"].as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[2]["CategoryName"], "Medical");
    assert_eq!(categories[2]["Products"], serde_json::json!([]));
}

#[test]
fn add_category_rejects_blank_name() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["add-category", "   "])
        .assert()
        .failure()
        .stderr(contains("CategoryName"));
    assert_eq!(fs::read_to_string(&file).unwrap(), PRICE);
}

#[test]
fn add_product_rejects_short_line() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["add-product", "Food", "Pear,1,2"])
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&file).unwrap(), PRICE);
}

#[test]
fn update_and_delete_product() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["update-product", "Weapons", "AKM", "AKM,0.8,20,1,1100,550"])
        .assert()
        .success();
    env.cmd(&file)
        .args(["delete-product", "Weapons", "M4A1"])
        .assert()
        .success()
        .stdout(contains("Deleted product: M4A1"));

    let doc = read_json(&file);
    assert_eq!(
        doc["TraderCategories"][0]["Products"],
        serde_json::json!(["AKM,0.8,20,1,1100,550"])
    );
}

#[test]
fn delete_missing_product_fails_without_writing() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["delete-product", "Weapons", "Mosin"])
        .assert()
        .failure()
        .stderr(contains("no product 'Mosin'"));
    assert_eq!(fs::read_to_string(&file).unwrap(), PRICE);
}

#[test]
fn add_trader_uses_template_and_next_id() {
    let env = TestEnv::new();
    let file = env.write("traders.json", GENERAL);

    env.cmd(&file)
        .args(["add-trader", "--given-name", "Alice", "--position", "-1 2 3"])
        .assert()
        .success()
        .stdout(contains("Added trader: Alice"));

    let doc = read_json(&file);
    let added = &doc["Traders"][1];
    assert_eq!(added["Id"], 1);
    assert_eq!(added["Name"], "pr_npc_neutrals");
    assert_eq!(added["Role"], "Trader");
    assert_eq!(added["Position"], serde_json::json!([-1.0, 2.0, 3.0]));
    assert_eq!(added["Clothes"], serde_json::json!([]));
    assert_eq!(doc["CurrencyName"], "Rubles");
}

#[test]
fn add_trader_reads_template_from_settings() {
    let env = TestEnv::new();
    let file = env.write("traders.json", GENERAL);
    let settings_dir = env.config_dir().join("trader-editor");
    fs::create_dir_all(&settings_dir).unwrap();
    fs::write(
        settings_dir.join("settings.json"),
        r#"{"trader_template": {"role": "Medic"}}"#,
    )
    .unwrap();

    env.cmd(&file).arg("add-trader").assert().success();

    let doc = read_json(&file);
    assert_eq!(doc["Traders"][1]["GivenName"], "New Trader");
    assert_eq!(doc["Traders"][1]["Role"], "Medic");
}

#[test]
fn update_trader_keeps_untouched_fields() {
    let env = TestEnv::new();
    let file = env.write("traders.json", GENERAL);

    env.cmd(&file)
        .args(["update-trader", "Bob", "--role", "Medic"])
        .assert()
        .success();

    let doc = read_json(&file);
    let bob = &doc["Traders"][0];
    assert_eq!(bob["Role"], "Medic");
    assert_eq!(bob["Position"], serde_json::json!([100.5, 20, 300]));
    assert_eq!(bob["Clothes"], serde_json::json!(["Hoodie_Black"]));
}

#[test]
fn update_trader_renames_and_renumbers() {
    let env = TestEnv::new();
    let file = env.write("traders.json", GENERAL);

    env.cmd(&file)
        .args(["update-trader", "Bob", "--given-name", "Robert", "--id", "abc"])
        .assert()
        .success()
        .stdout(contains("Updated trader: Robert"));

    let doc = read_json(&file);
    let robert = &doc["Traders"][0];
    assert_eq!(robert["GivenName"], "Robert");
    assert_eq!(robert["Id"], 0);
    assert_eq!(robert["Role"], "Weapons");
}

#[test]
fn products_without_query_lists_every_row() {
    let env = TestEnv::new();
    let file = env.write("prices.json", PRICE);

    env.cmd(&file)
        .args(["products", "Weapons"])
        .assert()
        .success()
        .stdout(contains("  AKM\t1\t10\t1\t1000\t500"))
        .stdout(contains("  M4A1\t1\t5\t1\t2000\t900"));
}

#[test]
fn delete_trader_by_given_name() {
    let env = TestEnv::new();
    let file = env.write("traders.json", GENERAL);

    env.cmd(&file)
        .args(["delete-trader", "Bob"])
        .assert()
        .success()
        .stdout(contains("Deleted trader: Bob (id 0)"));
    assert_eq!(read_json(&file)["Traders"], serde_json::json!([]));
}

#[test]
fn id_entries_add_and_update() {
    let env = TestEnv::new();
    let file = env.write("ids.json", IDS);

    env.cmd(&file)
        .args(["add-id", "--category", "Food", "--category", "Weapons"])
        .assert()
        .success()
        .stdout(contains("Added trader id: 1"));
    env.cmd(&file)
        .args(["update-id", "0", "--category", "Medical"])
        .assert()
        .success();

    let doc = read_json(&file);
    assert_eq!(doc["IDs"][0]["Categories"], serde_json::json!(["Medical"]));
    assert_eq!(doc["IDs"][0]["CurrenciesAccepted"], serde_json::json!(["Rubles"]));
    assert_eq!(doc["IDs"][1]["Categories"], serde_json::json!(["Food", "Weapons"]));
    assert_eq!(doc["IDs"][1]["LicencesRequired"], serde_json::json!([]));
}

#[test]
fn update_id_changes_the_id_itself() {
    let env = TestEnv::new();
    let file = env.write("ids.json", IDS);

    env.cmd(&file)
        .args(["update-id", "0", "--id", "5"])
        .assert()
        .success();

    let doc = read_json(&file);
    assert_eq!(doc["IDs"][0]["Id"], 5);
    assert_eq!(doc["IDs"][0]["Categories"], serde_json::json!(["Weapons"]));
}

#[test]
fn format_rewrites_with_four_space_indent() {
    let env = TestEnv::new();
    let file = env.write("ids.json", r#"{"IDs":[{"Id":3,"Categories":["Zoë"]}]}"#);

    env.cmd(&file).arg("format").assert().success();

    let text = fs::read_to_string(&file).unwrap();
    assert!(text.starts_with("{\n    \"IDs\": [\n        {\n            \"Id\": 3,"));
    assert!(text.contains("\"Zoë\""));
}

#[test]
fn unknown_document_is_inert() {
    let env = TestEnv::new();
    let original = r#"{"Something": 1}"#;
    let file = env.write("other.json", original);

    env.cmd(&file)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    env.cmd(&file)
        .args(["add-category", "Food"])
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

#[test]
fn missing_file_fails() {
    let env = TestEnv::new();

    env.cmd(&env.root.join("absent.json"))
        .arg("show")
        .assert()
        .failure()
        .stderr(contains("absent.json"));
}

#[test]
fn malformed_file_fails() {
    let env = TestEnv::new();
    let file = env.write("broken.json", "{ not json");

    env.cmd(&file).arg("show").assert().failure();
}
