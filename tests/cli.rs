use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

struct TestEnv {
    tmp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    /// Runs the binary with no credentials and an empty data directory
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("restyle").unwrap();
        cmd.env("HOME", self.tmp.path())
            .env("XDG_DATA_HOME", self.tmp.path().join("data"))
            .env("RESTYLE_TRYON_SIMULATION_DELAY_MS", "0")
            .env_remove("BANANA_API_KEY")
            .env_remove("BANANA_MODEL_KEY")
            .env_remove("RESTYLE_TRYON_ENDPOINT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn photo(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.tmp.path().join(name);
        fs::write(&path, bytes).expect("write photo");
        path
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn validate_rejects_large_png() {
    let env = TestEnv::new();
    let photo = env.photo("big.png", &vec![0u8; 6 * 1024 * 1024]);

    env.cmd()
        .arg("validate")
        .arg(&photo)
        .assert()
        .failure()
        .stdout(contains("volumineuse"));
}

#[test]
fn validate_rejects_gif() {
    let env = TestEnv::new();
    let photo = env.photo("anim.gif", &[0u8; 1024]);

    env.cmd()
        .arg("validate")
        .arg(&photo)
        .assert()
        .failure()
        .stdout(contains("supporté"));
}

#[test]
fn validate_json_accepts_jpeg() {
    let env = TestEnv::new();
    let photo = env.photo("me.jpeg", &[0u8; 1024]);

    let out = env.run_json(&["validate", photo.to_str().unwrap()]);
    assert_eq!(out["valid"], true);
    assert!(out.get("error").is_none());
}

#[test]
fn validate_missing_file_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["validate", "/nonexistent/me.png"])
        .assert()
        .failure()
        .stderr(contains("Failed to read"));
}

#[test]
fn encode_prints_data_url() {
    let env = TestEnv::new();
    let photo = env.photo("me.png", &[0, 0, 0]);

    env.cmd()
        .arg("encode")
        .arg(&photo)
        .assert()
        .success()
        .stdout(contains("data:image/png;base64,AAAA"));
}

#[test]
fn try_on_without_credentials_returns_photo() {
    let env = TestEnv::new();
    let photo = env.photo("me.png", &PNG_MAGIC);
    let out_path = env.tmp.path().join("result.png");

    let out = env.run_json(&[
        "try-on",
        "--photo",
        photo.to_str().unwrap(),
        "--box",
        "box-streetwear",
        "--out",
        out_path.to_str().unwrap(),
    ]);

    assert_eq!(out["success"], true);
    assert_eq!(out["outcome"]["kind"], "simulated_fallback");
    assert_eq!(out["outcome"]["reason"], "missing_credentials");
    assert!(out["resultImage"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert!(!out["message"].as_str().unwrap().is_empty());
    assert_eq!(fs::read(&out_path).unwrap(), PNG_MAGIC);
}

#[test]
fn try_on_summary_mentions_demo_mode() {
    let env = TestEnv::new();
    let photo = env.photo("me.png", &PNG_MAGIC);

    env.cmd()
        .args(["try-on", "--box", "box-vintage-90s", "--photo"])
        .arg(&photo)
        .assert()
        .success()
        .stdout(contains("Mode démo activé"))
        .stdout(contains("Format du résultat: png"));
}

#[test]
fn try_on_rejects_invalid_photo() {
    let env = TestEnv::new();
    let photo = env.photo("me.gif", &[0u8; 16]);

    env.cmd()
        .args(["try-on", "--box", "box-vintage-90s", "--photo"])
        .arg(&photo)
        .assert()
        .failure()
        .stderr(contains("supporté"));
}

#[test]
fn try_on_rejects_empty_photo() {
    let env = TestEnv::new();
    let photo = env.photo("empty.png", &[]);

    env.cmd()
        .args(["try-on", "--box", "box-vintage-90s", "--photo"])
        .arg(&photo)
        .assert()
        .failure()
        .stderr(contains("L'image est vide"));
}

#[test]
fn try_on_unknown_box_fails() {
    let env = TestEnv::new();
    let photo = env.photo("me.png", &PNG_MAGIC);

    env.cmd()
        .args(["try-on", "--box", "box-nope", "--photo"])
        .arg(&photo)
        .assert()
        .failure()
        .stderr(contains("Unknown box: box-nope"));
}

#[test]
fn try_on_reads_explicit_config_file() {
    let env = TestEnv::new();
    let photo = env.photo("me.png", &PNG_MAGIC);
    let config = env.photo("config.json", br#"{ "simulation_delay_ms": 0, "api_key": "k" }"#);

    let out = env.run_json(&[
        "--config",
        config.to_str().unwrap(),
        "try-on",
        "--photo",
        photo.to_str().unwrap(),
        "--box",
        "box-chic-bureau",
    ]);
    // model key still missing
    assert_eq!(out["outcome"]["reason"], "missing_credentials");
}

#[test]
fn catalog_sorts_by_price() {
    let env = TestEnv::new();
    let out = env.run_json(&["catalog", "--sort", "price-asc"]);

    let prices: Vec<u64> = out
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["price"].as_u64().unwrap())
        .collect();
    assert_eq!(prices, vec![39, 49, 55, 59, 69]);
}

#[test]
fn catalog_filters_by_category() {
    let env = TestEnv::new();
    env.cmd()
        .args(["catalog", "--category", "Vintage"])
        .assert()
        .success()
        .stdout(contains("2 box trouvées"))
        .stdout(contains("box-vintage-boheme"));
}

#[test]
fn catalog_reports_empty_search() {
    let env = TestEnv::new();
    env.cmd()
        .args(["catalog", "--search", "smoking"])
        .assert()
        .success()
        .stdout(contains("0 box trouvées pour \"smoking\""))
        .stdout(contains("Aucune box"));
}

#[test]
fn catalog_rejects_unknown_sort() {
    let env = TestEnv::new();
    env.cmd()
        .args(["catalog", "--sort", "cheapest"])
        .assert()
        .failure();
}

#[test]
fn cart_counts_boxes() {
    let env = TestEnv::new();
    let out = env.run_json(&["cart", "box-streetwear", "box-casual-eco"]);
    assert_eq!(out["count"], 2);
    assert_eq!(
        out["messages"][1],
        "Box Casual Éco a été ajouté à votre panier."
    );
}
