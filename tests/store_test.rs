//! Tests for log stores.

use conquid::{
    GameConfig, GameLog, JsonFileStore, LogStore, MemoryStore, Move, Player, Position, TurnCache,
};
use tempfile::TempDir;

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

/// Creates a store in a fresh temporary directory, returns the directory
/// handle (must stay in scope to keep it alive) and the store.
fn setup_store() -> (TempDir, JsonFileStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = JsonFileStore::new(dir.path().join("games")).expect("Failed to open store");
    (dir, store)
}

fn played_cache() -> TurnCache {
    let log = GameLog::new(GameConfig::default().setup()).unwrap();
    let mut cache = TurnCache::new(log).unwrap();
    cache.submit(Move::claim(Player::One, [p(0, 0), p(0, 1)])).unwrap();
    cache.submit(Move::claim(Player::Two, [p(13, 27)])).unwrap();
    cache
}

fn check_round_trip(store: &impl LogStore) {
    let cache = played_cache();
    store.save("game-1", &cache.log().record()).expect("Save failed");

    let record = store.load("game-1").expect("Load failed").expect("Record missing");
    let restored = TurnCache::new(GameLog::from_record(record).unwrap()).unwrap();
    assert_eq!(restored.latest(), cache.latest());
    assert_eq!(restored.current_player(), Player::One);
}

#[test]
fn test_json_store_round_trip() {
    let (_dir, store) = setup_store();
    check_round_trip(&store);
}

#[test]
fn test_memory_store_round_trip() {
    check_round_trip(&MemoryStore::new());
}

#[test]
fn test_json_store_missing_game() {
    let (_dir, store) = setup_store();
    assert_eq!(store.load("nope").expect("Load failed"), None);
}

#[test]
fn test_json_store_overwrites_and_lists() {
    let (_dir, store) = setup_store();
    let cache = played_cache();
    store.save("b", &cache.log().record()).unwrap();
    store.save("a", &cache.log().record()).unwrap();
    store.save("a", &cache.log().record()).unwrap();

    assert_eq!(store.list().unwrap(), vec!["a".to_string(), "b".to_string()]);
    let leftovers: Vec<_> = std::fs::read_dir(store.dir())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty(), "Temporary files should be renamed away");
}

#[test]
fn test_json_store_rejects_path_ids() {
    let (_dir, store) = setup_store();
    let cache = played_cache();
    assert!(store.save("../outside", &cache.log().record()).is_err());
    assert!(store.load("a/b").is_err());
}

#[test]
fn test_corrupt_file_is_error() {
    let (_dir, store) = setup_store();
    std::fs::write(store.dir().join("broken.json"), "{not json").unwrap();
    let err = store.load("broken").unwrap_err();
    assert!(err.message.contains("JSON error"));
}

#[test]
fn test_config_file_sets_board_and_data_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conquid.toml");
    std::fs::write(
        &path,
        "rows = 8\ncols = 12\nbases = [[0, 0], [6, 10]]\ndata_dir = \"logs\"\n",
    )
    .unwrap();

    let config = GameConfig::from_file(&path).unwrap();
    let board = config.setup().initial_board().unwrap();
    assert_eq!((board.rows(), board.cols()), (8, 12));
    assert_eq!(config.data_dir(), &std::path::PathBuf::from("logs"));
}

#[test]
fn test_config_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "rows = \"many\"\n").unwrap();
    let err = GameConfig::from_file(&path).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}
