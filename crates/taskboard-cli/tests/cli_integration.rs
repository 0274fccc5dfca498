use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn parse_json_output(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("Failed to parse JSON output")
}

fn extract_id(json: &Value) -> String {
    json["data"]["id"].as_str().unwrap().to_string()
}

/// A board file and cache directory inside one temp dir.
struct Workspace {
    _dir: TempDir,
    file: PathBuf,
    cache_dir: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        Self {
            file: dir.path().join("boards.json"),
            cache_dir: dir.path().join("cache"),
            _dir: dir,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").unwrap();
        cmd.env_remove("TASKBOARD_FILE")
            .env_remove("TASKBOARD_DEBUG_LOG")
            .arg("--file")
            .arg(&self.file)
            .arg("--cache-dir")
            .arg(&self.cache_dir);
        cmd
    }

    fn run(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).assert().success().get_output().stdout.clone();
        let json = parse_json_output(&output);
        assert!(json["success"].as_bool().unwrap());
        json
    }

    fn create(&self, args: &[&str]) -> String {
        extract_id(&self.run(args))
    }

    fn cache_slots(&self) -> Vec<PathBuf> {
        if !self.cache_dir.exists() {
            return Vec::new();
        }
        std::fs::read_dir(&self.cache_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}

/// Board with lists A = [card1, card2, card3] and B = [card4].
struct Seeded {
    board: String,
    a: String,
    b: String,
    cards: Vec<String>,
}

fn seed(ws: &Workspace) -> Seeded {
    let board = ws.create(&["board", "create", "--name", "Project Alpha"]);
    let a = ws.create(&["list", "create", "--board-id", &board, "--name", "A"]);
    let b = ws.create(&["list", "create", "--board-id", &board, "--name", "B"]);
    let mut cards = Vec::new();
    for title in ["card1", "card2", "card3"] {
        cards.push(ws.create(&["card", "create", "--list-id", &a, "--title", title]));
    }
    cards.push(ws.create(&["card", "create", "--list-id", &b, "--title", "card4"]));
    Seeded { board, a, b, cards }
}

fn card_titles(board: &Value, list_id: &str) -> Vec<String> {
    board["lists"]
        .as_array()
        .unwrap()
        .iter()
        .find(|list| list["id"] == list_id)
        .unwrap()["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["title"].as_str().unwrap().to_string())
        .collect()
}

fn slot_exists(slots: &[PathBuf], board_id: &str) -> bool {
    slots
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .any(|name| name == format!("board_{}.json", board_id))
}

mod board_tests {
    use super::*;

    #[test]
    fn test_board_create_and_list() {
        let ws = Workspace::new();

        let json = ws.run(&["board", "create", "--name", "Test Board", "--color", "#61BD4F"]);
        assert_eq!(json["data"]["name"], "Test Board");
        assert_eq!(json["data"]["color"], "#61BD4F");

        let json = ws.run(&["board", "list"]);
        assert_eq!(json["data"]["count"], 1);
        assert_eq!(json["data"]["items"][0]["name"], "Test Board");
    }

    #[test]
    fn test_board_list_empty() {
        let ws = Workspace::new();
        let json = ws.run(&["board", "list"]);
        assert_eq!(json["data"]["count"], 0);
    }

    #[test]
    fn test_board_show_nests_lists_and_cards() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&["board", "show", "--id", &s.board]);
        let board = &json["data"]["board"];
        assert_eq!(board["lists"].as_array().unwrap().len(), 2);
        assert_eq!(card_titles(board, &s.a), vec!["card1", "card2", "card3"]);
        assert_eq!(card_titles(board, &s.b), vec!["card4"]);
        assert_eq!(board["lists"][0]["cards"][1]["position"], 1);
        assert_eq!(board["lists"][0]["cards"][1]["listId"], s.a.as_str());
    }

    #[test]
    fn test_board_show_reports_due_status() {
        let ws = Workspace::new();
        let board = ws.create(&["board", "create", "--name", "Deadlines"]);
        let list = ws.create(&["list", "create", "--board-id", &board, "--name", "Doing"]);
        ws.run(&[
            "card",
            "create",
            "--list-id",
            &list,
            "--title",
            "Late",
            "--due",
            "2000-01-01T00:00:00Z",
        ]);
        ws.run(&["card", "create", "--list-id", &list, "--title", "Someday"]);

        let json = ws.run(&["board", "show", "--id", &board]);
        let due = json["data"]["due"].as_array().unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0]["title"], "Late");
        assert_eq!(due[0]["status"], "overdue");
    }

    #[test]
    fn test_board_show_not_found() {
        let ws = Workspace::new();
        ws.run(&["board", "list"]);

        ws.cmd()
            .args(["board", "show", "--id", "00000000-0000-0000-0000-000000000000"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("\"success\":false"))
            .stderr(predicate::str::contains("\"category\":\"not-found\""));
    }
}

mod move_tests {
    use super::*;

    #[test]
    fn test_cross_list_card_move() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&[
            "card",
            "move",
            "--board-id",
            &s.board,
            "--card-id",
            &s.cards[1],
            "--to-list",
            &s.b,
            "--to",
            "0",
        ]);
        assert_eq!(json["data"]["outcome"], "saved");
        assert_eq!(json["data"]["status"], "Saved");
        let events: Vec<_> = json["data"]["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(events, vec!["started", "succeeded"]);

        // The move reached the board file, not just the session
        let json = ws.run(&["board", "show", "--id", &s.board]);
        let board = &json["data"]["board"];
        assert_eq!(card_titles(board, &s.a), vec!["card1", "card3"]);
        assert_eq!(card_titles(board, &s.b), vec!["card2", "card4"]);
    }

    #[test]
    fn test_same_list_card_move() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&[
            "card",
            "move",
            "--board-id",
            &s.board,
            "--card-id",
            &s.cards[0],
            "--to",
            "2",
        ]);
        assert_eq!(
            card_titles(&json["data"]["board"], &s.a),
            vec!["card2", "card3", "card1"]
        );

        let json = ws.run(&["board", "show", "--id", &s.board]);
        let positions: Vec<_> = json["data"]["board"]["lists"][0]["cards"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["position"].as_i64().unwrap())
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_noop_move_is_ignored() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&[
            "card",
            "move",
            "--board-id",
            &s.board,
            "--card-id",
            &s.cards[1],
            "--to",
            "1",
        ]);
        assert_eq!(json["data"]["outcome"], "ignored");
        assert!(json["data"]["events"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_list_move() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&[
            "list",
            "move",
            "--board-id",
            &s.board,
            "--list-id",
            &s.a,
            "--to",
            "1",
        ]);
        assert_eq!(json["data"]["outcome"], "saved");

        let json = ws.run(&["board", "show", "--id", &s.board]);
        let order: Vec<_> = json["data"]["board"]["lists"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(order, vec![s.b.clone(), s.a.clone()]);
    }

    #[test]
    fn test_move_unknown_card_fails() {
        let ws = Workspace::new();
        let s = seed(&ws);

        ws.cmd()
            .args([
                "card",
                "move",
                "--board-id",
                &s.board,
                "--card-id",
                "00000000-0000-0000-0000-000000000000",
                "--to",
                "0",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }
}

mod edit_tests {
    use super::*;

    fn positions(board: &Value, list_id: &str) -> Vec<i64> {
        board["lists"]
            .as_array()
            .unwrap()
            .iter()
            .find(|list| list["id"] == list_id)
            .unwrap()["cards"]
            .as_array()
            .unwrap()
            .iter()
            .map(|card| card["position"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_delete_then_create_keeps_view_dense() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&["card", "delete", "--card-id", &s.cards[1]]);
        assert_eq!(json["data"]["deleted"], s.cards[1].as_str());
        let json = ws.run(&["card", "create", "--list-id", &s.a, "--title", "card5"]);
        // The file keeps the gap left by the delete
        assert_eq!(json["data"]["position"], 3);

        let json = ws.run(&["board", "show", "--id", &s.board]);
        let board = &json["data"]["board"];
        assert_eq!(card_titles(board, &s.a), vec!["card1", "card3", "card5"]);
        assert_eq!(positions(board, &s.a), vec![0, 1, 2]);

        // The cached copy of the gapped board is usable
        let json = ws.run(&["cache", "show", "--board-id", &s.board]);
        assert_eq!(json["data"]["cardsByList"][&s.a].as_array().unwrap().len(), 3);

        let json = ws.run(&[
            "card",
            "move",
            "--board-id",
            &s.board,
            "--card-id",
            &s.cards[0],
            "--to",
            "2",
        ]);
        let board = &json["data"]["board"];
        assert_eq!(card_titles(board, &s.a), vec!["card3", "card5", "card1"]);
        assert_eq!(positions(board, &s.a), vec![0, 1, 2]);
    }

    #[test]
    fn test_card_update() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&[
            "card",
            "update",
            "--card-id",
            &s.cards[0],
            "--title",
            "card1 (final)",
            "--description",
            "Ready for review",
            "--due",
            "2000-01-01T00:00:00Z",
        ]);
        assert_eq!(json["data"]["title"], "card1 (final)");
        assert_eq!(json["data"]["description"], "Ready for review");

        let json = ws.run(&["card", "update", "--card-id", &s.cards[0], "--clear-due"]);
        assert!(json["data"]["dueDate"].is_null());
        assert_eq!(json["data"]["description"], "Ready for review");

        let json = ws.run(&["board", "show", "--id", &s.board]);
        assert_eq!(card_titles(&json["data"]["board"], &s.a)[0], "card1 (final)");
        assert!(json["data"]["due"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_card_update_without_changes_fails() {
        let ws = Workspace::new();
        let s = seed(&ws);

        ws.cmd()
            .args(["card", "update", "--card-id", &s.cards[0]])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Nothing to update"));
    }

    #[test]
    fn test_list_rename_and_delete() {
        let ws = Workspace::new();
        let s = seed(&ws);

        let json = ws.run(&["list", "rename", "--list-id", &s.b, "--name", "Doing"]);
        assert_eq!(json["data"]["name"], "Doing");

        let json = ws.run(&["list", "delete", "--list-id", &s.a]);
        assert_eq!(json["data"]["deleted"], s.a.as_str());

        let json = ws.run(&["board", "show", "--id", &s.board]);
        let lists = json["data"]["board"]["lists"].as_array().unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0]["name"], "Doing");
        assert_eq!(lists[0]["position"], 0);
        assert_eq!(card_titles(&json["data"]["board"], &s.b), vec!["card4"]);
    }

    #[test]
    fn test_delete_unknown_card_is_not_found() {
        let ws = Workspace::new();
        seed(&ws);

        ws.cmd()
            .args(["card", "delete", "--card-id", "00000000-0000-0000-0000-000000000000"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("\"category\":\"not-found\""));
    }
}

mod cache_tests {
    use super::*;

    #[test]
    fn test_edits_write_cache_record() {
        let ws = Workspace::new();
        let board = ws.create(&["board", "create", "--name", "Alpha"]);
        assert!(ws.cache_slots().is_empty());

        ws.run(&["list", "create", "--board-id", &board, "--name", "A"]);
        assert!(slot_exists(&ws.cache_slots(), &board));
    }

    #[test]
    fn test_move_writes_cache_record() {
        let ws = Workspace::new();
        let s = seed(&ws);
        ws.run(&["cache", "clear", "--board-id", &s.board]);
        assert!(!slot_exists(&ws.cache_slots(), &s.board));

        ws.run(&[
            "card",
            "move",
            "--board-id",
            &s.board,
            "--card-id",
            &s.cards[1],
            "--to-list",
            &s.b,
            "--to",
            "0",
        ]);
        assert!(slot_exists(&ws.cache_slots(), &s.board));

        let json = ws.run(&["cache", "show", "--board-id", &s.board]);
        let cards_by_list = &json["data"]["cardsByList"];
        assert_eq!(cards_by_list[&s.b][0], s.cards[1].as_str());
        assert_eq!(cards_by_list[&s.a].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_cache_clear() {
        let ws = Workspace::new();
        let s = seed(&ws);
        ws.run(&[
            "list",
            "move",
            "--board-id",
            &s.board,
            "--list-id",
            &s.b,
            "--to",
            "0",
        ]);

        let json = ws.run(&["cache", "clear", "--board-id", &s.board]);
        assert_eq!(json["data"]["cleared"], s.board.as_str());
        assert!(!slot_exists(&ws.cache_slots(), &s.board));

        ws.cmd()
            .args(["cache", "show", "--board-id", &s.board])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No fresh cache record"));
    }

    #[test]
    fn test_cache_show_ignores_unreadable_slot() {
        let ws = Workspace::new();
        let s = seed(&ws);
        std::fs::create_dir_all(&ws.cache_dir).unwrap();
        let slot = Path::new(&ws.cache_dir).join(format!("board_{}.json", s.board));
        std::fs::write(&slot, "not json").unwrap();

        ws.cmd()
            .args(["cache", "show", "--board-id", &s.board])
            .assert()
            .failure();
        assert!(!slot.exists());
    }
}

mod misc_tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        Command::cargo_bin("taskboard")
            .unwrap()
            .env_remove("TASKBOARD_FILE")
            .args(["board", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--file is required"));
    }

    #[test]
    fn test_completions() {
        Command::cargo_bin("taskboard")
            .unwrap()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("taskboard"));
    }

    #[test]
    fn test_card_requires_title() {
        let ws = Workspace::new();
        let board = ws.create(&["board", "create", "--name", "Alpha"]);
        let list = ws.create(&["list", "create", "--board-id", &board, "--name", "A"]);

        ws.cmd()
            .args(["card", "create", "--list-id", &list, "--title", "  "])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Card title is required"))
            .stderr(predicate::str::contains("\"category\":\"validation\""));
    }
}
