use serde::{Deserialize, Serialize};

use crate::{ids::DirectorID, version::RecordVersion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub id: DirectorID,
    pub name: String,
    pub surname: String,
    pub awards: Vec<String>,
    pub version: RecordVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDirector {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub awards: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub awards: Option<Vec<String>>,
}

impl DirectorPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.awards.is_none()
    }

    pub fn apply(self, director: &mut Director) {
        if let Some(name) = self.name {
            director.name = name;
        }
        if let Some(surname) = self.surname {
            director.surname = surname;
        }
        if let Some(awards) = self.awards {
            director.awards = awards;
        }
    }
}
