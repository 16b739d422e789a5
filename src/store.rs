//! SQLite-backed storage for the registrar and the IPC handlers.
//!
//! List queries follow the same lossy-read rule as the registrar: a row that
//! no longer passes domain validation is logged and left out rather than
//! failing the whole request.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use tracing::warn;

use crate::calc::CourseCatalog;
use crate::domain::{
    Admin, Course, CourseView, Department, Enrollment, Semester, Student, Teacher, TeacherView,
};
use crate::error::{RegistrarError, Result};
use crate::registrar::{EnrollmentFilter, EnrollmentRow, EnrollmentStore, PersonRow, TeacherRow};

const STUDENT_SELECT: &str = "SELECT id, name, email, gender, age, major, gpa FROM student";
const TEACHER_SELECT: &str = "SELECT
       t.id, t.name, t.email, t.gender, t.age, t.department_id, t.salary, d.name
     FROM teacher t
     LEFT JOIN department d ON d.id = t.department_id";
const COURSE_SELECT: &str = "SELECT
       c.id, c.name, c.description, c.credits, c.teacher_id, c.department_id, t.name, d.name
     FROM course c
     LEFT JOIN teacher t ON t.id = c.teacher_id
     LEFT JOIN department d ON d.id = c.department_id";
const SEMESTER_SELECT: &str = "SELECT id, season, year, is_open FROM semester";
const ADMIN_SELECT: &str = "SELECT id, name, email, gender, age, username, password FROM admin";
const ENROLLMENT_SELECT: &str = "SELECT
       e.student_id, e.course_id, e.teacher_id, e.semester_id, e.grade,
       st.name, st.email, st.gender, st.age, st.major, st.gpa,
       c.name, c.description, c.credits, c.teacher_id, c.department_id,
       t.id, t.name, t.email, t.gender, t.age, t.department_id, t.salary,
       s.season, s.year, s.is_open
     FROM enrollment e
     LEFT JOIN student st ON st.id = e.student_id
     LEFT JOIN course c ON c.id = e.course_id
     LEFT JOIN teacher t ON t.id = e.teacher_id
     LEFT JOIN semester s ON s.id = e.semester_id";

fn read_person(row: &Row<'_>, at: usize) -> rusqlite::Result<PersonRow> {
    Ok(PersonRow {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        email: row.get(at + 2)?,
        gender: row.get(at + 3)?,
        age: row.get::<_, Option<i64>>(at + 4)?.unwrap_or(0),
    })
}

/// Drops rows that fail domain validation, logging each one.
fn keep_valid<T>(entity: &'static str, rows: Vec<(i64, Result<T>)>) -> Vec<T> {
    let mut out = Vec::with_capacity(rows.len());
    for (id, r) in rows {
        match r {
            Ok(v) => out.push(v),
            Err(e) => warn!(entity, id, error = %e, "skipping malformed record"),
        }
    }
    out
}

fn like(term: &str) -> String {
    format!("%{}%", term.trim())
}

#[derive(Clone, Copy)]
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn exists(&self, table: &'static str, id: i64) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?");
        let hit: Option<i64> = self
            .conn
            .query_row(&sql, [id], |r| r.get(0))
            .optional()?;
        Ok(hit.is_some())
    }

    fn require(&self, table: &'static str, entity: &'static str, id: i64) -> Result<()> {
        if !self.exists(table, id)? {
            return Err(RegistrarError::not_found(entity, id));
        }
        Ok(())
    }

    fn count(&self, sql: &str, id: i64) -> Result<i64> {
        Ok(self.conn.query_row(sql, [id], |r| r.get(0))?)
    }

    fn refuse_if_referenced(
        &self,
        entity: &'static str,
        id: i64,
        refs: &[(&str, &str)],
    ) -> Result<()> {
        for (what, sql) in refs {
            let n = self.count(sql, id)?;
            if n > 0 {
                return Err(RegistrarError::conflict(format!(
                    "{entity} {id} is still referenced by {n} {what}"
                )));
            }
        }
        Ok(())
    }

    fn delete_by_id(&self, table: &'static str, entity: &'static str, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM {table} WHERE id = ?");
        if self.conn.execute(&sql, [id])? == 0 {
            return Err(RegistrarError::not_found(entity, id));
        }
        Ok(())
    }

    // --- departments ---

    pub fn list_departments(&self) -> Result<Vec<Department>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM department ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let name: Option<String> = row.get(1)?;
                Ok((id, name))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keep_valid(
            "department",
            rows.into_iter()
                .map(|(id, name)| (id, Department::new(id, name.unwrap_or_default())))
                .collect(),
        ))
    }

    pub fn create_department(&self, department: &Department) -> Result<i64> {
        self.conn
            .execute("INSERT INTO department(name) VALUES(?)", [department.name()])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn delete_department(&self, id: i64) -> Result<()> {
        self.refuse_if_referenced(
            "department",
            id,
            &[
                ("teachers", "SELECT COUNT(*) FROM teacher WHERE department_id = ?"),
                ("courses", "SELECT COUNT(*) FROM course WHERE department_id = ?"),
            ],
        )?;
        self.delete_by_id("department", "department", id)
    }

    // --- students ---

    fn query_students(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let person = read_person(row, 0)?;
                let major: Option<String> = row.get(5)?;
                let gpa: f64 = row.get::<_, Option<f64>>(6)?.unwrap_or(0.0);
                Ok((person, major, gpa))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keep_valid(
            "student",
            rows.into_iter()
                .map(|(person, major, gpa)| {
                    let id = person.id;
                    let student = person
                        .into_person()
                        .and_then(|p| Student::new(p, major.unwrap_or_default(), gpa));
                    (id, student)
                })
                .collect(),
        ))
    }

    pub fn list_students(&self) -> Result<Vec<Student>> {
        self.query_students(&format!("{STUDENT_SELECT} ORDER BY name, id"), vec![])
    }

    pub fn search_students(&self, name: &str) -> Result<Vec<Student>> {
        self.query_students(
            &format!("{STUDENT_SELECT} WHERE name LIKE ? ORDER BY name, id"),
            vec![Value::Text(like(name))],
        )
    }

    pub fn get_student(&self, id: i64) -> Result<Student> {
        self.query_students(
            &format!("{STUDENT_SELECT} WHERE id = ?"),
            vec![Value::Integer(id)],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| RegistrarError::not_found("student", id))
    }

    pub fn create_student(&self, student: &Student) -> Result<i64> {
        let p = student.person();
        self.conn.execute(
            "INSERT INTO student(name, email, gender, age, major, gpa) VALUES(?, ?, ?, ?, ?, ?)",
            (p.name(), p.email(), p.gender(), p.age(), student.major(), student.gpa()),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Updates the editable fields; the cached GPA column is left alone.
    pub fn update_student(&self, student: &Student) -> Result<()> {
        let p = student.person();
        let n = self.conn.execute(
            "UPDATE student SET name = ?, email = ?, gender = ?, age = ?, major = ? WHERE id = ?",
            (p.name(), p.email(), p.gender(), p.age(), student.major(), p.id()),
        )?;
        if n == 0 {
            return Err(RegistrarError::not_found("student", p.id()));
        }
        Ok(())
    }

    pub fn update_student_gpa(&self, id: i64, gpa: f64) -> Result<()> {
        let n = self
            .conn
            .execute("UPDATE student SET gpa = ? WHERE id = ?", (gpa, id))?;
        if n == 0 {
            return Err(RegistrarError::not_found("student", id));
        }
        Ok(())
    }

    pub fn delete_student(&self, id: i64) -> Result<()> {
        self.refuse_if_referenced(
            "student",
            id,
            &[("enrollments", "SELECT COUNT(*) FROM enrollment WHERE student_id = ?")],
        )?;
        self.delete_by_id("student", "student", id)
    }

    // --- teachers ---

    fn query_teachers(&self, sql: &str, params: Vec<Value>) -> Result<Vec<TeacherView>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let person = read_person(row, 0)?;
                let department_id: i64 = row.get::<_, Option<i64>>(5)?.unwrap_or(-1);
                let salary: f64 = row.get::<_, Option<f64>>(6)?.unwrap_or(-1.0);
                let department_name: Option<String> = row.get(7)?;
                Ok((person, department_id, salary, department_name))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keep_valid(
            "teacher",
            rows.into_iter()
                .map(|(person, department_id, salary, department_name)| {
                    let id = person.id;
                    let view = person
                        .into_person()
                        .and_then(|p| Teacher::new(p, department_id, salary))
                        .map(|teacher| TeacherView {
                            teacher,
                            department_name,
                        });
                    (id, view)
                })
                .collect(),
        ))
    }

    pub fn list_teachers(&self) -> Result<Vec<TeacherView>> {
        self.query_teachers(&format!("{TEACHER_SELECT} ORDER BY t.name, t.id"), vec![])
    }

    pub fn search_teachers(&self, name: &str) -> Result<Vec<TeacherView>> {
        self.query_teachers(
            &format!("{TEACHER_SELECT} WHERE t.name LIKE ? ORDER BY t.name, t.id"),
            vec![Value::Text(like(name))],
        )
    }

    pub fn get_teacher(&self, id: i64) -> Result<TeacherView> {
        self.query_teachers(
            &format!("{TEACHER_SELECT} WHERE t.id = ?"),
            vec![Value::Integer(id)],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| RegistrarError::not_found("teacher", id))
    }

    pub fn create_teacher(&self, teacher: &Teacher) -> Result<i64> {
        self.require("department", "department", teacher.department_id())?;
        let p = teacher.person();
        self.conn.execute(
            "INSERT INTO teacher(name, email, gender, age, department_id, salary)
             VALUES(?, ?, ?, ?, ?, ?)",
            (p.name(), p.email(), p.gender(), p.age(), teacher.department_id(), teacher.salary()),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_teacher(&self, teacher: &Teacher) -> Result<()> {
        self.require("department", "department", teacher.department_id())?;
        let p = teacher.person();
        let n = self.conn.execute(
            "UPDATE teacher
             SET name = ?, email = ?, gender = ?, age = ?, department_id = ?, salary = ?
             WHERE id = ?",
            (
                p.name(),
                p.email(),
                p.gender(),
                p.age(),
                teacher.department_id(),
                teacher.salary(),
                p.id(),
            ),
        )?;
        if n == 0 {
            return Err(RegistrarError::not_found("teacher", p.id()));
        }
        Ok(())
    }

    pub fn delete_teacher(&self, id: i64) -> Result<()> {
        self.refuse_if_referenced(
            "teacher",
            id,
            &[
                ("courses", "SELECT COUNT(*) FROM course WHERE teacher_id = ?"),
                ("enrollments", "SELECT COUNT(*) FROM enrollment WHERE teacher_id = ?"),
            ],
        )?;
        self.delete_by_id("teacher", "teacher", id)
    }

    // --- courses ---

    fn query_courses(&self, sql: &str, params: Vec<Value>) -> Result<Vec<CourseView>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let id: i64 = row.get(0)?;
                let name: Option<String> = row.get(1)?;
                let description: Option<String> = row.get(2)?;
                let credits: i64 = row.get::<_, Option<i64>>(3)?.unwrap_or(0);
                let teacher_id: i64 = row.get::<_, Option<i64>>(4)?.unwrap_or(-1);
                let department_id: i64 = row.get::<_, Option<i64>>(5)?.unwrap_or(-1);
                let teacher_name: Option<String> = row.get(6)?;
                let department_name: Option<String> = row.get(7)?;
                Ok((
                    id,
                    name,
                    description,
                    credits,
                    teacher_id,
                    department_id,
                    teacher_name,
                    department_name,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keep_valid(
            "course",
            rows.into_iter()
                .map(|row| {
                    let (id, name, description, credits, teacher_id, department_id, tn, dn) = row;
                    let view = Course::new(
                        id,
                        name.unwrap_or_default(),
                        description.unwrap_or_default(),
                        credits,
                        teacher_id,
                        department_id,
                    )
                    .map(|course| CourseView {
                        course,
                        teacher_name: tn,
                        department_name: dn,
                    });
                    (id, view)
                })
                .collect(),
        ))
    }

    pub fn list_courses(&self) -> Result<Vec<CourseView>> {
        self.query_courses(&format!("{COURSE_SELECT} ORDER BY c.name, c.id"), vec![])
    }

    pub fn get_course(&self, id: i64) -> Result<CourseView> {
        self.query_courses(
            &format!("{COURSE_SELECT} WHERE c.id = ?"),
            vec![Value::Integer(id)],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| RegistrarError::not_found("course", id))
    }

    pub fn courses_by_teacher(&self, teacher_id: i64) -> Result<Vec<CourseView>> {
        self.query_courses(
            &format!("{COURSE_SELECT} WHERE c.teacher_id = ? ORDER BY c.name, c.id"),
            vec![Value::Integer(teacher_id)],
        )
    }

    fn require_course_refs(&self, course: &Course) -> Result<()> {
        self.require("teacher", "teacher", course.teacher_id())?;
        self.require("department", "department", course.department_id())
    }

    pub fn create_course(&self, course: &Course) -> Result<i64> {
        self.require_course_refs(course)?;
        self.conn.execute(
            "INSERT INTO course(name, description, credits, teacher_id, department_id)
             VALUES(?, ?, ?, ?, ?)",
            (
                course.name(),
                course.description(),
                course.credits(),
                course.teacher_id(),
                course.department_id(),
            ),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_course(&self, course: &Course) -> Result<()> {
        self.require_course_refs(course)?;
        let n = self.conn.execute(
            "UPDATE course
             SET name = ?, description = ?, credits = ?, teacher_id = ?, department_id = ?
             WHERE id = ?",
            (
                course.name(),
                course.description(),
                course.credits(),
                course.teacher_id(),
                course.department_id(),
                course.id(),
            ),
        )?;
        if n == 0 {
            return Err(RegistrarError::not_found("course", course.id()));
        }
        Ok(())
    }

    pub fn delete_course(&self, id: i64) -> Result<()> {
        self.refuse_if_referenced(
            "course",
            id,
            &[("enrollments", "SELECT COUNT(*) FROM enrollment WHERE course_id = ?")],
        )?;
        self.delete_by_id("course", "course", id)
    }

    // --- semesters ---

    fn query_semesters(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Semester>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let id: i64 = row.get(0)?;
                let season: Option<String> = row.get(1)?;
                let year: i64 = row.get::<_, Option<i64>>(2)?.unwrap_or(0);
                let is_open: bool = row.get::<_, Option<bool>>(3)?.unwrap_or(false);
                Ok((id, season, year, is_open))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keep_valid(
            "semester",
            rows.into_iter()
                .map(|(id, season, year, is_open)| {
                    (id, Semester::new(id, season.unwrap_or_default(), year, is_open))
                })
                .collect(),
        ))
    }

    pub fn list_semesters(&self) -> Result<Vec<Semester>> {
        self.query_semesters(&format!("{SEMESTER_SELECT} ORDER BY year DESC, season"), vec![])
    }

    pub fn search_semesters(&self, season: &str) -> Result<Vec<Semester>> {
        self.query_semesters(
            &format!("{SEMESTER_SELECT} WHERE season LIKE ? ORDER BY year DESC, season"),
            vec![Value::Text(like(season))],
        )
    }

    pub fn get_semester(&self, id: i64) -> Result<Semester> {
        self.query_semesters(
            &format!("{SEMESTER_SELECT} WHERE id = ?"),
            vec![Value::Integer(id)],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| RegistrarError::not_found("semester", id))
    }

    pub fn create_semester(&self, semester: &Semester) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO semester(season, year, is_open) VALUES(?, ?, ?)",
            (semester.season(), semester.year(), semester.is_open()),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_semester(&self, semester: &Semester) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE semester SET season = ?, year = ?, is_open = ? WHERE id = ?",
            (semester.season(), semester.year(), semester.is_open(), semester.id()),
        )?;
        if n == 0 {
            return Err(RegistrarError::not_found("semester", semester.id()));
        }
        Ok(())
    }

    pub fn delete_semester(&self, id: i64) -> Result<()> {
        self.refuse_if_referenced(
            "semester",
            id,
            &[("enrollments", "SELECT COUNT(*) FROM enrollment WHERE semester_id = ?")],
        )?;
        self.delete_by_id("semester", "semester", id)
    }

    // --- admins ---

    fn query_admins(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Admin>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                let person = read_person(row, 0)?;
                let username: Option<String> = row.get(5)?;
                let password: Option<String> = row.get(6)?;
                Ok((person, username, password))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keep_valid(
            "admin",
            rows.into_iter()
                .map(|(person, username, password)| {
                    let id = person.id;
                    let admin = person.into_person().and_then(|p| {
                        Admin::new(p, username.unwrap_or_default(), password.unwrap_or_default())
                    });
                    (id, admin)
                })
                .collect(),
        ))
    }

    pub fn list_admins(&self) -> Result<Vec<Admin>> {
        self.query_admins(&format!("{ADMIN_SELECT} ORDER BY username"), vec![])
    }

    pub fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        Ok(self
            .query_admins(
                &format!("{ADMIN_SELECT} WHERE username = ?"),
                vec![Value::Text(username.to_string())],
            )?
            .into_iter()
            .next())
    }

    pub fn create_admin(&self, admin: &Admin) -> Result<i64> {
        let taken: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM admin WHERE username = ?",
            [admin.username()],
            |r| r.get(0),
        )?;
        if taken > 0 {
            return Err(RegistrarError::conflict(format!(
                "username '{}' is already taken",
                admin.username()
            )));
        }
        let p = admin.person();
        self.conn.execute(
            "INSERT INTO admin(name, email, gender, age, username, password)
             VALUES(?, ?, ?, ?, ?, ?)",
            (p.name(), p.email(), p.gender(), p.age(), admin.username(), admin.password()),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn delete_admin(&self, username: &str) -> Result<()> {
        if self
            .conn
            .execute("DELETE FROM admin WHERE username = ?", [username])?
            == 0
        {
            return Err(RegistrarError::not_found("admin", username));
        }
        Ok(())
    }

    fn require_enrollment_refs(&self, enrollment: &Enrollment) -> Result<()> {
        self.require("student", "student", enrollment.student_id())?;
        self.require("course", "course", enrollment.course_id())?;
        self.require("semester", "semester", enrollment.semester_id())?;
        if let Some(t) = enrollment.teacher_id() {
            self.require("teacher", "teacher", t)?;
        }
        Ok(())
    }
}

fn read_enrollment_row(row: &Row<'_>) -> rusqlite::Result<EnrollmentRow> {
    let teacher_pk: Option<i64> = row.get(16)?;
    let teacher = match teacher_pk {
        Some(_) => Some(TeacherRow {
            person: read_person(row, 16)?,
            department_id: row.get::<_, Option<i64>>(21)?.unwrap_or(-1),
            salary: row.get::<_, Option<f64>>(22)?.unwrap_or(-1.0),
        }),
        None => None,
    };
    Ok(EnrollmentRow {
        student_id: row.get(0)?,
        course_id: row.get(1)?,
        teacher_id: row.get(2)?,
        semester_id: row.get(3)?,
        grade: row.get(4)?,
        student: PersonRow {
            id: row.get(0)?,
            name: row.get(5)?,
            email: row.get(6)?,
            gender: row.get(7)?,
            age: row.get::<_, Option<i64>>(8)?.unwrap_or(0),
        },
        major: row.get(9)?,
        gpa: row.get::<_, Option<f64>>(10)?.unwrap_or(0.0),
        course_name: row.get(11)?,
        course_description: row.get(12)?,
        credits: row.get::<_, Option<i64>>(13)?.unwrap_or(0),
        course_teacher_id: row.get::<_, Option<i64>>(14)?.unwrap_or(-1),
        course_department_id: row.get::<_, Option<i64>>(15)?.unwrap_or(-1),
        teacher,
        season: row.get(23)?,
        year: row.get::<_, Option<i64>>(24)?.unwrap_or(0),
        is_open: row.get::<_, Option<bool>>(25)?.unwrap_or(false),
    })
}

impl EnrollmentStore for SqliteStore<'_> {
    fn enrollment_exists(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let hit: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM enrollment WHERE student_id = ? AND course_id = ?",
                (student_id, course_id),
                |r| r.get(0),
            )
            .optional()?;
        Ok(hit.is_some())
    }

    fn find_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        let raw: Option<(Option<i64>, i64, f64)> = self
            .conn
            .query_row(
                "SELECT teacher_id, semester_id, grade FROM enrollment
                 WHERE student_id = ? AND course_id = ?",
                (student_id, course_id),
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        raw.map(|(teacher_id, semester_id, grade)| {
            Enrollment::new(student_id, course_id, teacher_id, semester_id, grade)
        })
        .transpose()
    }

    fn save_enrollment(&self, enrollment: &Enrollment) -> Result<()> {
        self.require_enrollment_refs(enrollment)?;
        self.conn.execute(
            "INSERT INTO enrollment(
               student_id, course_id, teacher_id, semester_id, grade, updated_at
             )
             VALUES(?, ?, ?, ?, ?, ?)",
            (
                enrollment.student_id(),
                enrollment.course_id(),
                enrollment.teacher_id(),
                enrollment.semester_id(),
                enrollment.grade().raw(),
                chrono::Utc::now().to_rfc3339(),
            ),
        )?;
        Ok(())
    }

    fn update_enrollment(&self, enrollment: &Enrollment) -> Result<bool> {
        self.require("semester", "semester", enrollment.semester_id())?;
        if let Some(t) = enrollment.teacher_id() {
            self.require("teacher", "teacher", t)?;
        }
        let n = self.conn.execute(
            "UPDATE enrollment SET grade = ?, teacher_id = ?, semester_id = ?, updated_at = ?
             WHERE student_id = ? AND course_id = ?",
            (
                enrollment.grade().raw(),
                enrollment.teacher_id(),
                enrollment.semester_id(),
                chrono::Utc::now().to_rfc3339(),
                enrollment.student_id(),
                enrollment.course_id(),
            ),
        )?;
        Ok(n > 0)
    }

    fn delete_enrollment(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let n = self.conn.execute(
            "DELETE FROM enrollment WHERE student_id = ? AND course_id = ?",
            (student_id, course_id),
        )?;
        Ok(n > 0)
    }

    fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<EnrollmentRow>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(id) = filter.student_id {
            clauses.push("e.student_id = ?");
            params.push(Value::Integer(id));
        }
        if let Some(id) = filter.course_id {
            clauses.push("e.course_id = ?");
            params.push(Value::Integer(id));
        }
        if let Some(name) = filter.student_name.as_deref() {
            clauses.push("st.name LIKE ?");
            params.push(Value::Text(like(name)));
        }
        if let Some(name) = filter.course_name.as_deref() {
            clauses.push("c.name LIKE ?");
            params.push(Value::Text(like(name)));
        }
        if let Some(season) = filter.season.as_deref() {
            clauses.push("s.season = ? COLLATE NOCASE");
            params.push(Value::Text(season.trim().to_string()));
        }
        if let Some(year) = filter.year {
            clauses.push("s.year = ?");
            params.push(Value::Integer(year));
        }

        let mut sql = ENROLLMENT_SELECT.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY e.student_id, e.course_id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), read_enrollment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl CourseCatalog for SqliteStore<'_> {
    fn course_credits(&self, course_id: i64) -> Result<i64> {
        self.conn
            .query_row("SELECT credits FROM course WHERE id = ?", [course_id], |r| {
                r.get(0)
            })
            .optional()?
            .ok_or_else(|| RegistrarError::not_found("course", course_id))
    }
}
