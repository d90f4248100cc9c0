//! Local persistence for games and their state documents.
//!
//! Each game lives in its own `SQLite` file under the storage root:
//!
//! ```text
//! <root>/<uuid>.sqlite
//!   game    # one row of lifecycle metadata
//!   state   # one row holding the serialized state document
//! ```
//!
//! The engine never touches this layer; commands load the document,
//! mutate a `State`, and write the document back.

use std::{fs, io, path::PathBuf};

use rusqlite::Connection;
use uuid::Uuid;

use crate::game::Game;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("game not found: {0}")]
    GameNotFound(Uuid),

    #[error("game already exists: {0}")]
    GameAlreadyExists(Uuid),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt game record: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based storage for games.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.townsquare/games/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".townsquare").join("games"))
    }

    /// Creates a new game, writing its metadata and initial state
    /// document to a new `SQLite` file.
    pub fn create_game(&self, game: &Game, document: &str) -> Result<()> {
        let path = self.game_path(game.id);
        if path.exists() {
            return Err(StorageError::GameAlreadyExists(game.id));
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            "CREATE TABLE game (
                 id          TEXT NOT NULL,
                 name        TEXT NOT NULL,
                 storyteller TEXT NOT NULL,
                 created_at  TEXT NOT NULL
             );
             CREATE TABLE state (
                 document TEXT NOT NULL
             );",
        )?;
        conn.execute(
            "INSERT INTO game (id, name, storyteller, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                game.id.to_string(),
                &game.name,
                &game.storyteller,
                game.created_at.to_string(),
            ],
        )?;
        conn.execute("INSERT INTO state (document) VALUES (?1)", [document])?;
        Ok(())
    }

    /// Loads a single game's metadata.
    pub fn load_game(&self, id: Uuid) -> Result<Game> {
        let conn = self.open_db(id)?;
        load_game_row(&conn)
    }

    /// Lists all games by reading each `.sqlite` file in the storage
    /// root. Unreadable or malformed files are silently skipped.
    pub fn list_games(&self) -> Result<Vec<Game>> {
        let mut games = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(games),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("sqlite") {
                continue;
            }
            let Ok(conn) = Connection::open(&path) else {
                continue;
            };
            if let Ok(game) = load_game_row(&conn) {
                games.push(game);
            }
        }
        games.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(games)
    }

    // ── State documents ──

    /// Loads a game's current state document.
    pub fn load_state(&self, id: Uuid) -> Result<String> {
        let conn = self.open_db(id)?;
        let document = conn.query_row("SELECT document FROM state LIMIT 1", [], |row| {
            row.get::<_, String>(0)
        })?;
        Ok(document)
    }

    /// Replaces a game's state document. One statement, so a
    /// read-modify-write cycle is last-writer-wins at this boundary.
    pub fn save_state(&self, id: Uuid, document: &str) -> Result<()> {
        let conn = self.open_db(id)?;
        conn.execute("UPDATE state SET document = ?1", [document])?;
        Ok(())
    }

    fn open_db(&self, id: Uuid) -> Result<Connection> {
        let path = self.game_path(id);
        if !path.exists() {
            return Err(StorageError::GameNotFound(id));
        }
        Ok(Connection::open(path)?)
    }

    fn game_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.sqlite"))
    }
}

/// Reads the single game row from an open connection.
fn load_game_row(conn: &Connection) -> Result<Game> {
    let (id_str, name, storyteller, created_at_str) = conn.query_row(
        "SELECT id, name, storyteller, created_at FROM game LIMIT 1",
        [],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        },
    )?;

    let id = id_str
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid game id: {e}")))?;
    let created_at = created_at_str
        .parse::<jiff::Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?;

    Ok(Game {
        id,
        name,
        storyteller,
        created_at,
    })
}
