use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::present;
use crate::{CoreError, CoreResult};

pub const MISSING_STORY_FIELDS: &str = "Missing required fields or image links";

/// Which parent collection a story is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryOwner {
    Guide,
    User,
}

impl StoryOwner {
    pub fn not_found_message(&self) -> &'static str {
        match self {
            StoryOwner::Guide => "Tour guide not found",
            StoryOwner::User => "User not found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub story_text: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub email: Option<String>,
    pub title: Option<String>,
    pub story_text: Option<String>,
    pub image_links: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStory {
    pub email: String,
    pub title: String,
    pub story_text: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<StoryRequest> for NewStory {
    type Error = CoreError;

    fn try_from(req: StoryRequest) -> CoreResult<Self> {
        let images = req.image_links.filter(|links| !links.is_empty());
        match (present(req.email), present(req.title), present(req.story_text), images) {
            (Some(email), Some(title), Some(story_text), Some(images)) => Ok(Self {
                email,
                title,
                story_text,
                images,
                created_at: Utc::now(),
            }),
            _ => Err(CoreError::Validation(MISSING_STORY_FIELDS.to_string())),
        }
    }
}

impl NewStory {
    pub fn into_story(self, id: String) -> Story {
        Story {
            id,
            email: self.email,
            title: self.title,
            story_text: self.story_text,
            images: self.images,
            created_at: Some(self.created_at),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryEditRequest {
    pub title: Option<String>,
    pub story_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryEdit {
    pub title: Option<String>,
    pub story_text: Option<String>,
}

impl TryFrom<StoryEditRequest> for StoryEdit {
    type Error = CoreError;

    fn try_from(req: StoryEditRequest) -> CoreResult<Self> {
        let edit = Self {
            title: present(req.title),
            story_text: present(req.story_text),
        };
        if edit.title.is_none() && edit.story_text.is_none() {
            return Err(CoreError::Validation("Nothing to update".to_string()));
        }
        Ok(edit)
    }
}

impl StoryEdit {
    pub fn apply(&self, story: &mut Story) -> bool {
        let mut changed = false;
        if let Some(title) = &self.title {
            changed |= story.title != *title;
            story.title = title.clone();
        }
        if let Some(text) = &self.story_text {
            changed |= story.story_text != *text;
            story.story_text = text.clone();
        }
        changed
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub image_url: Option<String>,
}

impl ImageRequest {
    pub fn into_url(self) -> CoreResult<String> {
        present(self.image_url).ok_or_else(|| CoreError::Validation("imageUrl is required".to_string()))
    }
}

/// Flattened projection of an embedded story used by the public story feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCard {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub story_text: String,
    pub image_urls: Vec<String>,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl StoryCard {
    /// `owner_email` is the parent document's email, which wins over the
    /// copy stored inside the story.
    pub fn from_story(story: &Story, owner_email: &str) -> Self {
        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            story_text: story.story_text.clone(),
            image_urls: story.images.clone(),
            email: owner_email.to_string(),
            created_at: story.created_at,
        }
    }
}
