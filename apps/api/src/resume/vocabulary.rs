//! Skill vocabulary: expected skills per role, loaded once from a reference CSV
//! with `Role`, `ATS Keywords` and `Skills` columns (the last two comma-joined).

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::jobs::classifier::{classify, Category};

const COL_ROLE: &str = "Role";
const COL_ATS_KEYWORDS: &str = "ATS Keywords";
const COL_SKILLS: &str = "Skills";

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("skill vocabulary is missing the '{0}' column")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleSkills {
    /// Role name as first written in the reference file.
    pub role: String,
    pub skills: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    roles: Vec<RoleSkills>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleSummary {
    pub role: String,
    pub category: Category,
    pub skill_count: usize,
}

impl SkillVocabulary {
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let reader = csv::Reader::from_path(path)?;
        let vocabulary = Self::from_reader(reader)?;
        info!(
            "Loaded skill vocabulary for {} roles from {}",
            vocabulary.roles.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, VocabularyError> {
        let headers = reader.headers()?.clone();
        let index = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(VocabularyError::MissingColumn(name))
        };
        let role_idx = index(COL_ROLE)?;
        let ats_idx = index(COL_ATS_KEYWORDS)?;
        let skills_idx = index(COL_SKILLS)?;

        let mut roles: Vec<RoleSkills> = Vec::new();
        for row in reader.records() {
            let row = row?;
            let role = row.get(role_idx).unwrap_or("").trim();
            if role.is_empty() {
                continue;
            }

            let skills = [ats_idx, skills_idx]
                .into_iter()
                .filter_map(|idx| row.get(idx))
                .flat_map(|cell| cell.split(','))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            match roles.iter().position(|r| r.role.eq_ignore_ascii_case(role)) {
                Some(idx) => roles[idx].skills.extend(skills),
                None => roles.push(RoleSkills {
                    role: role.to_string(),
                    skills: skills.collect(),
                }),
            }
        }

        Ok(Self { roles })
    }

    /// Case-insensitive role lookup.
    pub fn skills_for(&self, role: &str) -> Option<&RoleSkills> {
        let role = role.trim();
        self.roles.iter().find(|r| r.role.eq_ignore_ascii_case(role))
    }

    /// Roles in file order, each placed in the job taxonomy.
    pub fn roles(&self) -> Vec<RoleSummary> {
        self.roles
            .iter()
            .map(|r| RoleSummary {
                role: r.role.clone(),
                category: classify(&r.role),
                skill_count: r.skills.len(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
