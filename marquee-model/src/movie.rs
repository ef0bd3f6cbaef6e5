use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ids::MovieID, version::RecordVersion};

/// A movie row as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieID,
    /// Assigned by the database on insert; not part of the public payload.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    /// Runtime in minutes
    pub runtime: i32,
    pub genres: Vec<String>,
    pub version: RecordVersion,
}

/// Caller-settable attributes of a movie that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub runtime: i32,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Partial edit of a movie. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub genres: Option<Vec<String>>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.runtime.is_none()
            && self.genres.is_none()
    }

    /// Overwrite the provided fields on `movie`. Identity and version are
    /// left alone; those belong to the store.
    pub fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}
