use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE: &str = "registrar.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS department(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS student(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            gender TEXT NOT NULL,
            age INTEGER NOT NULL,
            major TEXT NOT NULL,
            gpa REAL NOT NULL DEFAULT 0
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_student_name ON student(name)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS teacher(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            gender TEXT NOT NULL,
            age INTEGER NOT NULL,
            department_id INTEGER NOT NULL,
            salary REAL NOT NULL,
            FOREIGN KEY(department_id) REFERENCES department(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_teacher_department ON teacher(department_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS admin(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            gender TEXT NOT NULL,
            age INTEGER NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            credits INTEGER NOT NULL,
            teacher_id INTEGER NOT NULL,
            department_id INTEGER NOT NULL,
            FOREIGN KEY(teacher_id) REFERENCES teacher(id),
            FOREIGN KEY(department_id) REFERENCES department(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_course_teacher ON course(teacher_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS semester(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            season TEXT NOT NULL,
            year INTEGER NOT NULL,
            is_open INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS enrollment(
            student_id INTEGER NOT NULL,
            course_id INTEGER NOT NULL,
            teacher_id INTEGER,
            semester_id INTEGER NOT NULL,
            grade REAL NOT NULL DEFAULT -1,
            updated_at TEXT,
            PRIMARY KEY(student_id, course_id),
            FOREIGN KEY(student_id) REFERENCES student(id),
            FOREIGN KEY(course_id) REFERENCES course(id),
            FOREIGN KEY(teacher_id) REFERENCES teacher(id),
            FOREIGN KEY(semester_id) REFERENCES semester(id)
        )",
        [],
    )?;
    ensure_enrollment_updated_at(&conn)?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_enrollment_course ON enrollment(course_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_enrollment_semester ON enrollment(semester_id)",
        [],
    )?;

    Ok(conn)
}

// Workspaces created before grade edits were stamped lack the column.
fn ensure_enrollment_updated_at(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "enrollment", "updated_at")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE enrollment ADD COLUMN updated_at TEXT", [])?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
