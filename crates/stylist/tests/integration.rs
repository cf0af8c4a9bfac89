use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn stylist_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("stylist");
    path
}

fn setup_test_env(extra: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/stylist.sqlite"

[chat]
recommendation_limit = 5
history_limit = 10
{}
"#,
        root.display(),
        extra
    );

    let config_path = config_dir.join("stylist.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_stylist(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = stylist_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run stylist binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn seeded_env() -> (TempDir, PathBuf) {
    let (tmp, config_path) = setup_test_env("");
    let (_, stderr, ok) = run_stylist(&config_path, &["init"]);
    assert!(ok, "init failed: {}", stderr);
    let (stdout, stderr, ok) = run_stylist(&config_path, &["catalog", "seed"]);
    assert!(ok, "seed failed: {}", stderr);
    assert!(stdout.contains("Seeded 4 products."));
    (tmp, config_path)
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env("");

    let (stdout, stderr, success) = run_stylist(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env("");

    let (_, _, success1) = run_stylist(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_stylist(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_catalog_list_after_seed() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, _, success) = run_stylist(&config_path, &["catalog", "list"]);
    assert!(success);
    assert!(stdout.contains("model1  Rayban Wayfarer  250.000đ"));
    assert!(stdout.contains("model4  Persol 649  400.000đ"));
    assert!(stdout.contains("4 products"));
}

#[test]
fn test_chat_recommends_round_frames_under_budget() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, stderr, success) = run_stylist(
        &config_path,
        &["chat", "--session", "s1", "Tôi muốn kính tròn dưới 350k"],
    );
    assert!(success, "chat failed: {}", stderr);
    assert!(stdout.contains("Conversation: 1"));
    assert!(stdout.contains("- Rayban Round: 300.000đ"));
    assert!(!stdout.contains("Wayfarer"));
}

#[test]
fn test_chat_without_match_falls_back() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, _, success) = run_stylist(
        &config_path,
        &["chat", "--session", "s1", "kính mắt mèo"],
    );
    assert!(success);
    assert!(stdout.contains("Xin lỗi, tôi không tìm thấy kính phù hợp"));
}

#[test]
fn test_chat_without_identity_mints_session() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, _, success) = run_stylist(&config_path, &["chat", "kính màu đen"]);
    assert!(success);
    assert!(stdout.contains("Session: "));
    assert!(stdout.contains("Rayban Wayfarer"));
    assert!(stdout.contains("Oakley Holbrook"));
}

#[test]
fn test_chat_rejects_both_identities() {
    let (_tmp, config_path) = seeded_env();

    let (_, _, success) = run_stylist(
        &config_path,
        &["chat", "--account", "1", "--session", "s1", "kính"],
    );
    assert!(!success);
}

#[test]
fn test_chat_json_output() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, _, success) = run_stylist(
        &config_path,
        &["chat", "--account", "42", "--json", "kính phi công"],
    );
    assert!(success);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["identity"]["kind"], "account");
    assert_eq!(value["reply"]["extracted"]["style"], "Aviator");
    assert_eq!(value["reply"]["recommendations"][0]["id"], "model4");
}

#[test]
fn test_preferences_accumulate() {
    let (_tmp, config_path) = seeded_env();

    run_stylist(&config_path, &["chat", "--session", "s1", "kính tròn dưới 350k"]);
    run_stylist(&config_path, &["chat", "--session", "s1", "màu đen"]);

    let (stdout, _, success) =
        run_stylist(&config_path, &["preferences", "--session", "s1"]);
    assert!(success);
    assert!(stdout.contains("style: Round"));
    assert!(stdout.contains("color: Black"));
    assert!(stdout.contains("max price: 350.000đ"));

    let (stdout, _, _) = run_stylist(&config_path, &["preferences", "--account", "s1"]);
    assert!(stdout.contains("No preferences stored"));
}

#[test]
fn test_history_shows_conversation() {
    let (_tmp, config_path) = seeded_env();

    run_stylist(&config_path, &["chat", "--account", "9", "kính màu đen"]);
    run_stylist(
        &config_path,
        &["chat", "--account", "9", "--conversation", "1", "dưới 300k"],
    );

    let (stdout, _, success) = run_stylist(&config_path, &["history", "--account", "9"]);
    assert!(success);
    assert!(stdout.contains("Conversation 1"));
    assert!(stdout.contains("[assistant] Xin chào!"));
    assert!(stdout.contains("[user] kính màu đen"));
    assert!(stdout.contains("[user] dưới 300k"));
}

#[test]
fn test_conversation_of_other_identity_rejected() {
    let (_tmp, config_path) = seeded_env();

    run_stylist(&config_path, &["chat", "--account", "9", "kính"]);
    let (_, stderr, success) = run_stylist(
        &config_path,
        &["chat", "--account", "10", "--conversation", "1", "kính"],
    );
    assert!(!success);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_removed_product_not_recommended() {
    let (_tmp, config_path) = seeded_env();

    let (stdout, _, success) = run_stylist(&config_path, &["catalog", "remove", "model3"]);
    assert!(success);
    assert!(stdout.contains("Removed product model3."));

    let (stdout, _, _) = run_stylist(&config_path, &["chat", "--session", "s2", "kính màu đen"]);
    assert!(stdout.contains("Rayban Wayfarer"));
    assert!(!stdout.contains("Oakley Holbrook"));

    let (_, _, success) = run_stylist(&config_path, &["catalog", "remove", "model3"]);
    assert!(!success);
}

#[test]
fn test_catalog_add_from_json() {
    let (tmp, config_path) = seeded_env();

    let file = tmp.path().join("products.json");
    fs::write(
        &file,
        r#"[{"id": "model5", "sku": "gucci_cat_eye_gold", "name": "Gucci Cat Eye",
             "price": 1250000, "description": "Kính mắt mèo Gucci gọng vàng",
             "category": "Fashion", "style": "Cat Eye"}]"#,
    )
    .unwrap();

    let (stdout, stderr, success) =
        run_stylist(&config_path, &["catalog", "add", file.to_str().unwrap()]);
    assert!(success, "add failed: {}", stderr);
    assert!(stdout.contains("Upserted 1 products."));

    let (stdout, _, _) = run_stylist(&config_path, &["chat", "--session", "s3", "kính mắt mèo"]);
    assert!(stdout.contains("- Gucci Cat Eye: 1.250.000đ"));
}

#[test]
fn test_profile_mode_from_config() {
    let (_tmp, config_path) = setup_test_env("recommend_from = \"profile\"");
    run_stylist(&config_path, &["init"]);
    run_stylist(&config_path, &["catalog", "seed"]);

    run_stylist(&config_path, &["chat", "--session", "p", "màu đen"]);
    let (stdout, _, success) =
        run_stylist(&config_path, &["chat", "--session", "p", "dưới 300k"]);
    assert!(success);
    assert!(stdout.contains("Rayban Wayfarer"));
    assert!(!stdout.contains("Oakley Holbrook"));
}

#[test]
fn test_missing_config_fails() {
    let (_, stderr, success) = run_stylist(Path::new("/nonexistent/stylist.toml"), &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
