//! The cover record: a snapshot of the form at the moment generation starts.

use serde::{Deserialize, Serialize};

/// Separator between a course code and its title ("CSE 2215 - Data Structures").
const COURSE_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverRecord {
    pub university: String,
    pub faculty: String,
    pub department: String,
    pub program: String,
    pub course: String,
    pub assignment_title: String,
    pub submitted_to: String,
    pub instructor_designation: String,
    pub submitted_by: String,
    pub student_id: String,
    pub section: String,
    pub trimester: String,
    /// ISO date, e.g. "2024-05-30".
    pub submission_date: String,
    pub is_group: bool,
    pub group_name: String,
    pub group_members: Vec<GroupMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMember {
    pub name: String,
    pub id: String,
}

impl CoverRecord {
    /// The course code in front of the title separator, if any text is there.
    pub fn course_code_token(&self) -> Option<&str> {
        let code = self
            .course
            .split(COURSE_SEPARATOR)
            .next()
            .unwrap_or_default()
            .trim();
        (!code.is_empty()).then_some(code)
    }

    /// The name the document is submitted under: the group name for group
    /// submissions, the student's name otherwise.
    pub fn submitter_name(&self) -> &str {
        if self.is_group {
            &self.group_name
        } else {
            &self.submitted_by
        }
    }

    /// The submitter name with every whitespace run replaced by one underscore.
    pub fn submitter_token(&self) -> Option<String> {
        let token = self
            .submitter_name()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        (!token.is_empty()).then_some(token)
    }

    /// Labels of required fields that are still blank, in form order.
    ///
    /// Group submissions require a group name instead of the individual
    /// student name, id and section.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let common: [(&'static str, &str); 9] = [
            ("School/Faculty", &self.faculty),
            ("Department", &self.department),
            ("Program", &self.program),
            ("Course", &self.course),
            ("Assignment Title", &self.assignment_title),
            ("Submitted To (Instructor)", &self.submitted_to),
            ("Instructor Designation", &self.instructor_designation),
            ("Trimester", &self.trimester),
            ("Date of Submission", &self.submission_date),
        ];

        let specific: Vec<(&'static str, &str)> = if self.is_group {
            vec![("Group Name", &self.group_name)]
        } else {
            vec![
                ("Student Name", &self.submitted_by),
                ("Student ID", &self.student_id),
                ("Section", &self.section),
            ]
        };

        common
            .into_iter()
            .chain(specific)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| label)
            .collect()
    }
}
