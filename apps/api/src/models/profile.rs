//! Career profile data model.
//!
//! Field names serialize in camelCase: the same names the form layer uses,
//! and the same keys that appear in the profile dump embedded in prompts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: Uuid,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub responsibilities: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub graduation_date: String,
}

/// The complete user-entered career dataset. Serialized wholesale into every prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub personal_info: PersonalInfo,
    pub summary: String,
    /// Comma-separated free text; never split.
    pub skills: String,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalInfoField {
    FullName,
    Email,
    Phone,
    Linkedin,
    Portfolio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExperienceField {
    JobTitle,
    Company,
    Location,
    StartDate,
    EndDate,
    Responsibilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationField {
    Degree,
    Institution,
    Location,
    GraduationDate,
}

impl PersonalInfo {
    pub fn field_mut(&mut self, field: PersonalInfoField) -> &mut String {
        match field {
            PersonalInfoField::FullName => &mut self.full_name,
            PersonalInfoField::Email => &mut self.email,
            PersonalInfoField::Phone => &mut self.phone,
            PersonalInfoField::Linkedin => &mut self.linkedin,
            PersonalInfoField::Portfolio => &mut self.portfolio,
        }
    }
}

impl WorkExperience {
    /// A new entry with every text field empty.
    pub fn empty(id: Uuid) -> Self {
        Self {
            id,
            job_title: String::new(),
            company: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            responsibilities: String::new(),
        }
    }

    pub fn field_mut(&mut self, field: ExperienceField) -> &mut String {
        match field {
            ExperienceField::JobTitle => &mut self.job_title,
            ExperienceField::Company => &mut self.company,
            ExperienceField::Location => &mut self.location,
            ExperienceField::StartDate => &mut self.start_date,
            ExperienceField::EndDate => &mut self.end_date,
            ExperienceField::Responsibilities => &mut self.responsibilities,
        }
    }
}

impl Education {
    /// A new entry with every text field empty.
    pub fn empty(id: Uuid) -> Self {
        Self {
            id,
            degree: String::new(),
            institution: String::new(),
            location: String::new(),
            graduation_date: String::new(),
        }
    }

    pub fn field_mut(&mut self, field: EducationField) -> &mut String {
        match field {
            EducationField::Degree => &mut self.degree,
            EducationField::Institution => &mut self.institution,
            EducationField::Location => &mut self.location,
            EducationField::GraduationDate => &mut self.graduation_date,
        }
    }
}
