//! Profile Store — holds the current `UserProfile` behind an `Arc` and applies
//! structural mutations by replacement.
//!
//! Every successful mutation installs a freshly allocated profile, so a caller
//! holding an earlier snapshot can detect change with `Arc::ptr_eq`.
//! No field validation happens here: empty or malformed text passes through.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::profile::{
    Education, EducationField, ExperienceField, PersonalInfoField, UserProfile, WorkExperience,
};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("No entry with id {0}")]
    UnknownEntry(Uuid),
}

/// A single structural mutation of the profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProfileOp {
    SetPersonalInfo {
        field: PersonalInfoField,
        value: String,
    },
    SetSummary {
        value: String,
    },
    SetSkills {
        value: String,
    },
    AddExperience,
    UpdateExperience {
        id: Uuid,
        field: ExperienceField,
        value: String,
    },
    RemoveExperience {
        id: Uuid,
    },
    AddEducation,
    UpdateEducation {
        id: Uuid,
        field: EducationField,
        value: String,
    },
    RemoveEducation {
        id: Uuid,
    },
}

#[derive(Debug, Default)]
pub struct ProfileStore {
    profile: Arc<UserProfile>,
    job_description: String,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current profile snapshot. Cheap to clone; never mutated after handout.
    pub fn profile(&self) -> Arc<UserProfile> {
        Arc::clone(&self.profile)
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn set_job_description(&mut self, value: String) {
        self.job_description = value;
    }

    /// Applies `op`. Returns the id of the new entry for `Add*` operations.
    pub fn apply(&mut self, op: ProfileOp) -> Result<Option<Uuid>, StoreError> {
        match op {
            ProfileOp::SetPersonalInfo { field, value } => {
                self.replace(|p| *p.personal_info.field_mut(field) = value);
                Ok(None)
            }
            ProfileOp::SetSummary { value } => {
                self.replace(|p| p.summary = value);
                Ok(None)
            }
            ProfileOp::SetSkills { value } => {
                self.replace(|p| p.skills = value);
                Ok(None)
            }
            ProfileOp::AddExperience => Ok(Some(self.add_experience())),
            ProfileOp::UpdateExperience { id, field, value } => {
                self.update_experience(id, field, value).map(|_| None)
            }
            ProfileOp::RemoveExperience { id } => self.remove_experience(id).map(|_| None),
            ProfileOp::AddEducation => Ok(Some(self.add_education())),
            ProfileOp::UpdateEducation { id, field, value } => {
                self.update_education(id, field, value).map(|_| None)
            }
            ProfileOp::RemoveEducation { id } => self.remove_education(id).map(|_| None),
        }
    }

    pub fn add_experience(&mut self) -> Uuid {
        let id = fresh_id(self.profile.experience.iter().map(|e| e.id));
        self.replace(|p| p.experience.push(WorkExperience::empty(id)));
        debug!("Added experience entry {id}");
        id
    }

    pub fn update_experience(
        &mut self,
        id: Uuid,
        field: ExperienceField,
        value: String,
    ) -> Result<(), StoreError> {
        let index = self
            .profile
            .experience
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownEntry(id))?;
        self.replace(|p| *p.experience[index].field_mut(field) = value);
        Ok(())
    }

    pub fn remove_experience(&mut self, id: Uuid) -> Result<(), StoreError> {
        if !self.profile.experience.iter().any(|e| e.id == id) {
            return Err(StoreError::UnknownEntry(id));
        }
        self.replace(|p| p.experience.retain(|e| e.id != id));
        debug!("Removed experience entry {id}");
        Ok(())
    }

    pub fn add_education(&mut self) -> Uuid {
        let id = fresh_id(self.profile.education.iter().map(|e| e.id));
        self.replace(|p| p.education.push(Education::empty(id)));
        debug!("Added education entry {id}");
        id
    }

    pub fn update_education(
        &mut self,
        id: Uuid,
        field: EducationField,
        value: String,
    ) -> Result<(), StoreError> {
        let index = self
            .profile
            .education
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownEntry(id))?;
        self.replace(|p| *p.education[index].field_mut(field) = value);
        Ok(())
    }

    pub fn remove_education(&mut self, id: Uuid) -> Result<(), StoreError> {
        if !self.profile.education.iter().any(|e| e.id == id) {
            return Err(StoreError::UnknownEntry(id));
        }
        self.replace(|p| p.education.retain(|e| e.id != id));
        debug!("Removed education entry {id}");
        Ok(())
    }

    /// Clones the current profile, applies `f`, and installs the result as a new allocation.
    fn replace(&mut self, f: impl FnOnce(&mut UserProfile)) {
        let mut next = UserProfile::clone(&self.profile);
        f(&mut next);
        self.profile = Arc::new(next);
    }
}

/// A v4 id not already used by a sibling entry.
fn fresh_id(existing: impl Iterator<Item = Uuid> + Clone) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if !existing.clone().any(|e| e == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = ProfileStore::new();
        let profile = store.profile();
        assert!(profile.experience.is_empty());
        assert!(profile.education.is_empty());
        assert!(profile.personal_info.full_name.is_empty());
        assert!(store.job_description().is_empty());
    }

    #[test]
    fn test_every_mutation_installs_new_profile() {
        let mut store = ProfileStore::new();
        let before = store.profile();

        store
            .apply(ProfileOp::SetSummary {
                value: "Backend engineer".to_string(),
            })
            .unwrap();

        let after = store.profile();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(before.summary.is_empty(), "old snapshot must not change");
        assert_eq!(after.summary, "Backend engineer");
    }

    #[test]
    fn test_set_personal_info_field_by_name() {
        let mut store = ProfileStore::new();
        store
            .apply(ProfileOp::SetPersonalInfo {
                field: PersonalInfoField::Email,
                value: "ada@example.com".to_string(),
            })
            .unwrap();

        let profile = store.profile();
        assert_eq!(profile.personal_info.email, "ada@example.com");
        assert!(profile.personal_info.phone.is_empty());
    }

    #[test]
    fn test_add_experience_creates_empty_entry_with_fresh_id() {
        let mut store = ProfileStore::new();
        let first = store.apply(ProfileOp::AddExperience).unwrap().unwrap();
        let second = store.apply(ProfileOp::AddExperience).unwrap().unwrap();

        assert_ne!(first, second);
        let profile = store.profile();
        assert_eq!(profile.experience.len(), 2);
        assert_eq!(profile.experience[0], WorkExperience::empty(first));
        assert_eq!(profile.experience[1].id, second);
    }

    #[test]
    fn test_add_then_remove_restores_siblings() {
        let mut store = ProfileStore::new();
        let keep = store.add_experience();
        store
            .update_experience(keep, ExperienceField::Company, "Acme".to_string())
            .unwrap();
        let before = store.profile();

        let temp = store.add_experience();
        store.remove_experience(temp).unwrap();

        let after = store.profile();
        assert_eq!(after.experience.len(), before.experience.len());
        assert_eq!(after.experience, before.experience);
        assert_eq!(after.experience[0].id, keep);
        assert_eq!(after.experience[0].company, "Acme");
    }

    #[test]
    fn test_remove_does_not_reassign_sibling_ids() {
        let mut store = ProfileStore::new();
        let a = store.add_education();
        let b = store.add_education();
        let c = store.add_education();

        store.remove_education(b).unwrap();

        let ids: Vec<Uuid> = store.profile().education.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_update_targets_only_identified_entry() {
        let mut store = ProfileStore::new();
        let a = store.add_experience();
        let b = store.add_experience();

        store
            .apply(ProfileOp::UpdateExperience {
                id: b,
                field: ExperienceField::JobTitle,
                value: "Engineer".to_string(),
            })
            .unwrap();

        let profile = store.profile();
        assert_eq!(profile.experience[0].id, a);
        assert!(profile.experience[0].job_title.is_empty());
        assert_eq!(profile.experience[1].job_title, "Engineer");
    }

    #[test]
    fn test_unknown_id_is_rejected_and_profile_kept() {
        let mut store = ProfileStore::new();
        store.add_education();
        let before = store.profile();
        let missing = Uuid::new_v4();

        let err = store
            .update_education(missing, EducationField::Degree, "BSc".to_string())
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownEntry(missing));
        assert_eq!(
            store.remove_experience(missing),
            Err(StoreError::UnknownEntry(missing))
        );
        assert!(Arc::ptr_eq(&before, &store.profile()));
    }

    #[test]
    fn test_blank_values_pass_through() {
        let mut store = ProfileStore::new();
        store
            .apply(ProfileOp::SetSkills {
                value: "   ".to_string(),
            })
            .unwrap();
        assert_eq!(store.profile().skills, "   ");
    }

    #[test]
    fn test_profile_op_deserializes_from_tagged_json() {
        let id = Uuid::new_v4();
        let json = serde_json::json!({
            "op": "update_education",
            "id": id,
            "field": "institution",
            "value": "MIT"
        });
        let op: ProfileOp = serde_json::from_value(json).unwrap();
        match op {
            ProfileOp::UpdateEducation {
                id: got,
                field,
                value,
            } => {
                assert_eq!(got, id);
                assert_eq!(field, EducationField::Institution);
                assert_eq!(value, "MIT");
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }
}
