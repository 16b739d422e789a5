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
fn report_models_carry_rows_and_totals() {
    let workspace = temp_dir("registrard-reports-smoke");
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
        json!({ "name": "Physics" }),
    );
    let department_id = id_of(&dept, "departmentId");
    let teacher = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "teachers.create",
        json!({
            "name": "Layla Haddad",
            "email": "layla@example.edu",
            "gender": "Female",
            "age": 44,
            "departmentId": department_id,
            "salary": 6000
        }),
    );
    let teacher_id = id_of(&teacher, "teacherId");
    let mechanics = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "courses.create",
        json!({
            "name": "Mechanics",
            "description": "Newtonian motion",
            "credits": 4,
            "teacherId": teacher_id,
            "departmentId": department_id
        }),
    );
    let optics = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "courses.create",
        json!({
            "name": "Optics",
            "description": "Light and lenses",
            "credits": 2,
            "teacherId": teacher_id,
            "departmentId": department_id
        }),
    );
    let student = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "students.create",
        json!({
            "name": "Karim Aoun",
            "email": "karim@example.edu",
            "gender": "Male",
            "age": 20,
            "major": "Physics"
        }),
    );
    let student_id = id_of(&student, "studentId");
    let fall = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "semesters.create",
        json!({ "season": "Fall", "year": 2025 }),
    );
    let semester_id = id_of(&fall, "semesterId");
    for (id, course, grade) in [("8", &mechanics, 100), ("9", &optics, 60)] {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            id,
            "enrollments.create",
            json!({
                "studentId": student_id,
                "courseId": id_of(course, "courseId"),
                "teacherId": teacher_id,
                "semesterId": semester_id,
                "grade": grade
            }),
        );
    }

    let students = request_ok(&mut stdin, &mut reader, "10", "reports.students", json!({}));
    assert_eq!(students.get("totalStudents").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(students.pointer("/students/0/gpa").and_then(|v| v.as_f64()), Some(3.47));

    let teachers = request_ok(&mut stdin, &mut reader, "11", "reports.teachers", json!({}));
    assert_eq!(teachers.get("totalSalary").and_then(|v| v.as_f64()), Some(6000.0));
    assert_eq!(
        teachers.pointer("/teachers/0/departmentName").and_then(|v| v.as_str()),
        Some("Physics")
    );

    let courses = request_ok(&mut stdin, &mut reader, "12", "reports.courses", json!({}));
    assert_eq!(courses.get("totalCredits").and_then(|v| v.as_i64()), Some(6));
    assert_eq!(
        courses.pointer("/courses/0/teacherName").and_then(|v| v.as_str()),
        Some("Layla Haddad")
    );

    let by_teacher = request_ok(
        &mut stdin,
        &mut reader,
        "13",
        "reports.coursesByTeacher",
        json!({ "teacherName": "layla" }),
    );
    assert_eq!(by_teacher.get("totalCourses").and_then(|v| v.as_i64()), Some(2));
    let nobody = request(
        &mut stdin,
        &mut reader,
        "14",
        "reports.coursesByTeacher",
        json!({ "teacherName": "nobody" }),
    );
    assert_eq!(error_code(&nobody), Some("not_found"));

    let term = request_ok(
        &mut stdin,
        &mut reader,
        "15",
        "reports.semesterResults",
        json!({ "studentName": "Karim", "season": "fall", "year": 2025 }),
    );
    assert_eq!(term.get("averageGrade").and_then(|v| v.as_f64()), Some(80.0));
    assert_eq!(term.get("gpa").and_then(|v| v.as_f64()), Some(3.47));
    assert_eq!(term.get("rows").and_then(|v| v.as_array()).map(|a| a.len()), Some(2));

    let roster = request_ok(
        &mut stdin,
        &mut reader,
        "16",
        "reports.studentsByCourseSemester",
        json!({ "courseName": "Optics", "season": "Fall", "year": 2025 }),
    );
    assert_eq!(roster.get("totalEnrollments").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(roster.pointer("/rows/0/grade").and_then(|v| v.as_f64()), Some(60.0));

    let missing = request(
        &mut stdin,
        &mut reader,
        "17",
        "reports.semesterResults",
        json!({ "studentName": "Karim", "season": "Fall" }),
    );
    assert_eq!(error_code(&missing), Some("bad_params"));

    drop(stdin);
    let _ = child.kill();
    let _ = child.wait();
}
