use super::models::RosterFormat;
use crate::{ImporterError, Result};
use std::collections::{HashMap, HashSet};
use storage::models::CourseCategory;
use tracing::warn;
use validator::Validate;

pub struct RosterValidator;

impl RosterValidator {
    pub fn validate(roster: &RosterFormat) -> Result<ValidationReport> {
        roster.validate()?;

        let mut report = ValidationReport::default();

        let mut coach_universities = HashMap::new();
        for coach in &roster.coaches {
            if coach_universities
                .insert(coach.email.to_lowercase(), coach.university.as_str())
                .is_some()
            {
                report
                    .errors
                    .push(format!("Coach '{}' is listed more than once", coach.email));
            }
        }

        if roster.teams.is_empty() {
            report.warnings.push("Roster contains no teams".to_string());
        }

        let team_size = usize::try_from(roster.competition.team_size).unwrap_or(0);
        let mut team_names = HashSet::new();
        let mut student_emails = HashSet::new();

        for team in &roster.teams {
            if !team_names.insert(team.name.to_lowercase()) {
                report
                    .errors
                    .push(format!("Team name '{}' is used more than once", team.name));
            }

            if team.members.len() > team_size {
                report.errors.push(format!(
                    "Team '{}' has {} members but the competition allows {}",
                    team.name,
                    team.members.len(),
                    team_size
                ));
            }

            match coach_universities.get(&team.coach_email.to_lowercase()) {
                None => report.errors.push(format!(
                    "Team '{}' references unknown coach '{}'",
                    team.name, team.coach_email
                )),
                Some(university) if *university != team.university => {
                    report.errors.push(format!(
                        "Team '{}' is from '{}' but coach '{}' supervises '{}'",
                        team.name, team.university, team.coach_email, university
                    ))
                }
                Some(_) => {}
            }

            for student in &team.members {
                let email = student.email.to_lowercase();

                if coach_universities.contains_key(&email) {
                    report.errors.push(format!(
                        "'{}' is registered as both a coach and a student",
                        student.email
                    ));
                }

                if !student_emails.insert(email) {
                    report.errors.push(format!(
                        "Student '{}' is a member of more than one team",
                        student.email
                    ));
                }

                for course in &student.completed_courses {
                    if course.parse::<CourseCategory>().is_err() {
                        report.warnings.push(format!(
                            "Student '{}' lists unknown course '{}'; it will not be scored",
                            student.email, course
                        ));
                    }
                }
            }
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster(teams: serde_json::Value) -> RosterFormat {
        serde_json::from_value(json!({
            "competition": { "name": "South Pacific Divisional" },
            "coaches": [
                { "name": "Ada", "email": "ada@unsw.edu.au", "university": "UNSW" }
            ],
            "teams": teams
        }))
        .unwrap()
    }

    fn student(email: &str) -> serde_json::Value {
        json!({ "name": email, "email": email })
    }

    #[test]
    fn test_valid_roster_passes_with_course_warning() {
        let roster = roster(json!([
            {
                "name": "Null Pointers",
                "university": "UNSW",
                "coach_email": "ada@unsw.edu.au",
                "members": [
                    {
                        "name": "Grace",
                        "email": "grace@unsw.edu.au",
                        "completed_courses": ["Data Structures", "Underwater Basket Weaving"],
                        "codeforces_rating": 1900
                    }
                ]
            }
        ]));

        let report = RosterValidator::validate(&roster).unwrap();

        assert_eq!(roster.competition.team_size, 3);
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_student_in_two_teams_is_rejected() {
        let roster = roster(json!([
            {
                "name": "A",
                "university": "UNSW",
                "coach_email": "ada@unsw.edu.au",
                "members": [student("sam@unsw.edu.au")]
            },
            {
                "name": "B",
                "university": "UNSW",
                "coach_email": "ada@unsw.edu.au",
                "members": [student("SAM@unsw.edu.au")]
            }
        ]));

        let err = RosterValidator::validate(&roster).unwrap_err();
        assert!(err.to_string().contains("more than one team"), "{err}");
    }

    #[test]
    fn test_coach_from_other_university_is_rejected() {
        let roster = roster(json!([
            {
                "name": "Visitors",
                "university": "USyd",
                "coach_email": "ada@unsw.edu.au",
                "members": [student("lee@usyd.edu.au")]
            }
        ]));

        let err = RosterValidator::validate(&roster).unwrap_err();
        assert!(err.to_string().contains("supervises"), "{err}");
    }

    #[test]
    fn test_oversized_team_fails_field_validation() {
        let roster = roster(json!([
            {
                "name": "Crowd",
                "university": "UNSW",
                "coach_email": "ada@unsw.edu.au",
                "members": [
                    student("a@unsw.edu.au"),
                    student("b@unsw.edu.au"),
                    student("c@unsw.edu.au"),
                    student("d@unsw.edu.au")
                ]
            }
        ]));

        assert!(matches!(
            RosterValidator::validate(&roster),
            Err(ImporterError::ValidationError(_))
        ));
    }

    #[test]
    fn test_competition_with_smaller_teams_is_rejected() {
        let roster: RosterFormat = serde_json::from_value(json!({
            "competition": { "name": "Pairs Cup", "team_size": 2 },
            "coaches": [
                { "name": "Ada", "email": "ada@unsw.edu.au", "university": "UNSW" }
            ],
            "teams": [
                {
                    "name": "Pair",
                    "university": "UNSW",
                    "coach_email": "ada@unsw.edu.au",
                    "members": [student("a@unsw.edu.au"), student("b@unsw.edu.au")]
                },
                {
                    "name": "Solo",
                    "university": "UNSW",
                    "coach_email": "ada@unsw.edu.au",
                    "members": [student("c@unsw.edu.au")]
                }
            ]
        }))
        .unwrap();

        assert!(matches!(
            RosterValidator::validate(&roster),
            Err(ImporterError::ValidationError(_))
        ));

        let mut three = roster.clone();
        three.competition.team_size = 3;
        assert!(RosterValidator::validate(&three).is_ok());
    }

    #[test]
    fn test_negative_rating_fails_field_validation() {
        let roster = roster(json!([
            {
                "name": "Negative",
                "university": "UNSW",
                "coach_email": "ada@unsw.edu.au",
                "members": [
                    { "name": "Neg", "email": "neg@unsw.edu.au", "codeforces_rating": -1 }
                ]
            }
        ]));

        assert!(RosterValidator::validate(&roster).is_err());
    }
}
