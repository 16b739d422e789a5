use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_registrard");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn registrard");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> Option<&str> {
    value.pointer("/error/code").and_then(|v| v.as_str())
}

fn id_of(value: &serde_json::Value, key: &str) -> i64 {
    value.get(key).and_then(|v| v.as_i64()).expect(key)
}

#[test]
fn validation_and_reference_errors_surface_as_codes() {
    let workspace = temp_dir("registrard-validation-ipc");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let dept = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "departments.create",
        json!({ "name": "History" }),
    );
    let department_id = id_of(&dept, "departmentId");

    let minor = request(
        &mut stdin,
        &mut reader,
        "3",
        "teachers.create",
        json!({
            "name": "Young Teacher",
            "email": "young@example.edu",
            "gender": "Male",
            "age": 17,
            "departmentId": department_id,
            "salary": 100
        }),
    );
    assert_eq!(error_code(&minor), Some("validation_failed"));
    assert_eq!(minor.pointer("/error/details/field").and_then(|v| v.as_str()), Some("age"));

    let teacher = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "teachers.create",
        json!({
            "name": "Nadia Fares",
            "email": "nadia@example.edu",
            "gender": "Female",
            "age": 48,
            "departmentId": department_id,
            "salary": 4800
        }),
    );
    let teacher_id = id_of(&teacher, "teacherId");

    for (id, credits, ok) in [("5", 0, false), ("6", 11, false), ("7", 1, true), ("8", 10, true)] {
        let res = request(
            &mut stdin,
            &mut reader,
            id,
            "courses.create",
            json!({
                "name": format!("Seminar {}", credits),
                "description": "Readings",
                "credits": credits,
                "teacherId": teacher_id,
                "departmentId": department_id
            }),
        );
        assert_eq!(res.get("ok").and_then(|v| v.as_bool()), Some(ok), "credits {}", credits);
    }

    for (id, year, ok) in [
        ("9", 1999, false),
        ("10", 2101, false),
        ("11", 2000, true),
        ("12", 2100, true),
    ] {
        let res = request(
            &mut stdin,
            &mut reader,
            id,
            "semesters.create",
            json!({ "season": "Summer", "year": year }),
        );
        assert_eq!(res.get("ok").and_then(|v| v.as_bool()), Some(ok), "year {}", year);
    }

    let unknown_teacher = request(
        &mut stdin,
        &mut reader,
        "13",
        "courses.create",
        json!({
            "name": "Ghost Course",
            "description": "Nobody teaches it",
            "credits": 3,
            "teacherId": 999,
            "departmentId": department_id
        }),
    );
    assert_eq!(error_code(&unknown_teacher), Some("not_found"));

    let in_use = request(
        &mut stdin,
        &mut reader,
        "14",
        "departments.delete",
        json!({ "departmentId": department_id }),
    );
    assert_eq!(error_code(&in_use), Some("conflict"));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "15",
        "teachers.update",
        json!({ "teacherId": teacher_id, "salary": 5100 }),
    );
    let after = request_ok(
        &mut stdin,
        &mut reader,
        "16",
        "teachers.search",
        json!({ "name": "nadia" }),
    );
    assert_eq!(after.pointer("/teachers/0/salary").and_then(|v| v.as_f64()), Some(5100.0));
    assert_eq!(
        after.pointer("/teachers/0/email").and_then(|v| v.as_str()),
        Some("nadia@example.edu")
    );

    let admin = json!({
        "name": "Records Office",
        "email": "records@example.edu",
        "gender": "Male",
        "age": 52,
        "username": "records",
        "password": "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
    });
    let mut plain = admin.clone();
    plain["password"] = json!("secret");
    let rejected = request(&mut stdin, &mut reader, "17a", "admins.create", plain);
    assert_eq!(error_code(&rejected), Some("validation_failed"));
    assert_eq!(
        rejected.pointer("/error/details/field").and_then(|v| v.as_str()),
        Some("password")
    );
    let _ = request_ok(&mut stdin, &mut reader, "17", "admins.create", admin.clone());
    let again = request(&mut stdin, &mut reader, "18", "admins.create", admin);
    assert_eq!(error_code(&again), Some("conflict"));
    let admins = request_ok(&mut stdin, &mut reader, "19", "admins.list", json!({}));
    assert!(admins.pointer("/admins/0/password").is_none());

    let bad_type = request(
        &mut stdin,
        &mut reader,
        "20",
        "courses.get",
        json!({ "courseId": "one" }),
    );
    assert_eq!(error_code(&bad_type), Some("bad_params"));

    drop(stdin);
    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn created_student_starts_with_an_empty_gpa_cache() {
    let workspace = temp_dir("registrard-student-gpa-cache");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let student = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({
            "name": "Hana Saleh",
            "email": "hana@example.edu",
            "gender": "Female",
            "age": 23,
            "major": "Biology",
            "gpa": 3.9
        }),
    );
    let student_id = id_of(&student, "studentId");
    drop(stdin);
    let _ = child.kill();
    let _ = child.wait();

    let conn = rusqlite::Connection::open(workspace.join("registrar.sqlite3")).expect("open db");
    let cached: f64 = conn
        .query_row("SELECT gpa FROM student WHERE id = ?", [student_id], |r| r.get(0))
        .expect("student row");
    assert_eq!(cached, 0.0);
}
