use anyhow::Result;
use rusqlite::Connection;

use crate::parser::extract::JobRecord;

const DB_PATH: &str = "data/jobposts.sqlite";

pub fn connect() -> Result<Connection> {
    std::fs::create_dir_all("data")?;
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id         INTEGER PRIMARY KEY,
            url        TEXT UNIQUE NOT NULL,
            visited    BOOLEAN NOT NULL DEFAULT 0,
            visited_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pages_visited ON pages(visited);

        CREATE TABLE IF NOT EXISTS page_data (
            id         INTEGER PRIMARY KEY,
            page_id    INTEGER NOT NULL REFERENCES pages(id),
            url        TEXT NOT NULL,
            html       TEXT,
            error      TEXT,
            latency_ms INTEGER,
            fetched_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_page_data_page ON page_data(page_id);

        CREATE TABLE IF NOT EXISTS job_records (
            id                  INTEGER PRIMARY KEY,
            page_data_id        INTEGER NOT NULL REFERENCES page_data(id),
            url                 TEXT NOT NULL,
            title               TEXT NOT NULL,
            company             TEXT NOT NULL,
            skills              TEXT NOT NULL,
            experience          TEXT NOT NULL,
            location            TEXT NOT NULL,
            role_type           TEXT NOT NULL,
            description_excerpt TEXT NOT NULL,
            responsibilities    TEXT NOT NULL,
            qualifications      TEXT NOT NULL,
            processed_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_job_records_page ON job_records(page_data_id);
        ",
    )?;
    Ok(())
}

/// One fetch attempt, successful or not. Error rows still mark the page
/// visited so the queue drains.
pub struct FetchRow {
    pub page_id: i64,
    pub url: String,
    pub html: Option<String>,
    pub error: Option<String>,
    pub latency_ms: Option<i64>,
    pub fetched_at: String,
}

/// A fetched page awaiting extraction.
pub struct FetchedPage {
    pub page_data_id: i64,
    pub url: String,
    pub html: String,
}

/// Queue URLs, ignoring ones already present. Returns how many were new.
pub fn insert_pages(conn: &Connection, urls: &[String]) -> Result<usize> {
    let mut stmt = conn.prepare_cached("INSERT OR IGNORE INTO pages (url) VALUES (?1)")?;
    let mut inserted = 0;
    for url in urls {
        inserted += stmt.execute(rusqlite::params![url])?;
    }
    Ok(inserted)
}

/// Queue a single URL and return its id whether or not it was new.
pub fn insert_page(conn: &Connection, url: &str) -> Result<i64> {
    conn.prepare_cached("INSERT OR IGNORE INTO pages (url) VALUES (?1)")?
        .execute(rusqlite::params![url])?;
    let id = conn
        .prepare_cached("SELECT id FROM pages WHERE url = ?1")?
        .query_row(rusqlite::params![url], |r| r.get(0))?;
    Ok(id)
}

pub fn fetch_unvisited(conn: &Connection, limit: Option<usize>) -> Result<Vec<(i64, String)>> {
    let limit = limit.map(|n| n as i64).unwrap_or(-1);
    let mut stmt =
        conn.prepare_cached("SELECT id, url FROM pages WHERE visited = 0 ORDER BY id LIMIT ?1")?;
    let rows = stmt
        .query_map(rusqlite::params![limit], |r| Ok((r.get(0)?, r.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Store one fetch result and mark its page visited. Returns the page_data
/// row id.
pub fn save_fetch(conn: &Connection, row: &FetchRow) -> Result<i64> {
    conn.prepare_cached(
        "INSERT INTO page_data (page_id, url, html, error, latency_ms, fetched_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?
    .execute(rusqlite::params![
        row.page_id,
        row.url,
        row.html,
        row.error,
        row.latency_ms,
        row.fetched_at,
    ])?;
    let page_data_id = conn.last_insert_rowid();
    conn.prepare_cached("UPDATE pages SET visited = 1, visited_at = datetime('now') WHERE id = ?1")?
        .execute(rusqlite::params![row.page_id])?;
    Ok(page_data_id)
}

/// Fetched pages with a body and no extracted record yet.
pub fn fetch_unprocessed(conn: &Connection, limit: Option<usize>) -> Result<Vec<FetchedPage>> {
    let limit = limit.map(|n| n as i64).unwrap_or(-1);
    let mut stmt = conn.prepare_cached(
        "SELECT pd.id, pd.url, pd.html FROM page_data pd
         LEFT JOIN job_records jr ON jr.page_data_id = pd.id
         WHERE pd.html IS NOT NULL AND jr.id IS NULL
         ORDER BY pd.id LIMIT ?1",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![limit], |r| {
            Ok(FetchedPage { page_data_id: r.get(0)?, url: r.get(1)?, html: r.get(2)? })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Persist extracted records. List fields are stored as JSON strings.
pub fn save_records(conn: &Connection, records: &[(i64, String, JobRecord)]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO job_records
         (page_data_id, url, title, company, skills, experience, location, role_type,
          description_excerpt, responsibilities, qualifications)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for (page_data_id, url, record) in records {
        stmt.execute(rusqlite::params![
            page_data_id,
            url,
            record.title,
            record.company,
            serde_json::to_string(&record.skills).unwrap_or_default(),
            record.experience,
            record.location,
            record.role_type.to_string(),
            record.description_excerpt,
            serde_json::to_string(&record.responsibilities).unwrap_or_default(),
            serde_json::to_string(&record.qualifications).unwrap_or_default(),
        ])?;
    }
    Ok(())
}

pub struct Stats {
    pub total: i64,
    pub visited: i64,
    pub unvisited: i64,
    pub fetched: i64,
    pub errors: i64,
    pub processed: i64,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let one = |sql: &str| -> Result<i64> {
        Ok(conn.prepare_cached(sql)?.query_row([], |r| r.get(0))?)
    };
    Ok(Stats {
        total: one("SELECT COUNT(*) FROM pages")?,
        visited: one("SELECT COUNT(*) FROM pages WHERE visited = 1")?,
        unvisited: one("SELECT COUNT(*) FROM pages WHERE visited = 0")?,
        fetched: one("SELECT COUNT(*) FROM page_data WHERE html IS NOT NULL")?,
        errors: one("SELECT COUNT(*) FROM page_data WHERE error IS NOT NULL")?,
        processed: one("SELECT COUNT(*) FROM job_records")?,
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::process_document;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn fetch_row(page_id: i64, url: &str, html: Option<&str>) -> FetchRow {
        FetchRow {
            page_id,
            url: url.to_string(),
            html: html.map(String::from),
            error: html.is_none().then(|| "connect timeout".to_string()),
            latency_ms: Some(12),
            fetched_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn queueing_ignores_duplicates() {
        let conn = test_conn();
        let urls = vec!["https://a.example/x".to_string(), "https://a.example/x".to_string()];
        assert_eq!(insert_pages(&conn, &urls).unwrap(), 1);
        assert_eq!(fetch_unvisited(&conn, None).unwrap().len(), 1);
    }

    #[test]
    fn save_fetch_marks_visited() {
        let conn = test_conn();
        let id = insert_page(&conn, "https://a.example/x").unwrap();
        save_fetch(&conn, &fetch_row(id, "https://a.example/x", Some("<html></html>"))).unwrap();
        assert!(fetch_unvisited(&conn, None).unwrap().is_empty());
        assert_eq!(fetch_unprocessed(&conn, None).unwrap().len(), 1);
    }

    #[test]
    fn error_rows_are_not_processable() {
        let conn = test_conn();
        let id = insert_page(&conn, "https://a.example/x").unwrap();
        save_fetch(&conn, &fetch_row(id, "https://a.example/x", None)).unwrap();
        assert!(fetch_unvisited(&conn, None).unwrap().is_empty());
        assert!(fetch_unprocessed(&conn, None).unwrap().is_empty());
        assert_eq!(get_stats(&conn).unwrap().errors, 1);
    }

    #[test]
    fn record_round_trip() {
        let conn = test_conn();
        let id = insert_page(&conn, "https://a.example/x").unwrap();
        let pd = save_fetch(&conn, &fetch_row(id, "https://a.example/x", Some("<h1>Cook</h1>")))
            .unwrap();
        let record = process_document("<h1>Cook</h1>");
        save_records(&conn, &[(pd, "https://a.example/x".to_string(), record)]).unwrap();

        assert!(fetch_unprocessed(&conn, None).unwrap().is_empty());
        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.fetched, 1);

        let title: String = conn
            .prepare("SELECT title FROM job_records WHERE page_data_id = ?1")
            .unwrap()
            .query_row(rusqlite::params![pd], |r| r.get(0))
            .unwrap();
        assert_eq!(title, "Cook");
    }
}
