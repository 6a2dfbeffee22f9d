//! Stories live as an embedded `stories` array inside guide and user
//! documents. Single-story updates use the positional `$` operator.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use serde::Deserialize;
use tourbook_core::models::{NewStory, Story, StoryCard, StoryEdit, StoryOwner, UpdateOutcome};
use tourbook_core::repository::StoryRepository;
use tourbook_core::CoreResult;
use tourbook_shared::Masked;
use tracing::debug;

use crate::convert::{bson_datetime, decode, decode_all, parse_object_id, store_err};
use crate::database::DbClient;

pub struct MongoStoryRepository {
    db: DbClient,
}

impl MongoStoryRepository {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }

    fn parents(&self, owner: StoryOwner) -> Collection<Document> {
        match owner {
            StoryOwner::Guide => self.db.guides(),
            StoryOwner::User => self.db.users(),
        }
    }

    async fn card_pipeline(
        &self,
        owner: StoryOwner,
        stage: Document,
    ) -> CoreResult<Vec<StoryCard>> {
        let pipeline = vec![
            doc! { "$unwind": "$stories" },
            stage,
            doc! { "$project": { "_id": 0, "email": 1, "story": "$stories" } },
        ];
        let cursor = self
            .parents(owner)
            .aggregate(pipeline)
            .await
            .map_err(store_err)?;
        let rows: Vec<UnwoundStory> = decode_all(cursor).await?;
        Ok(rows
            .iter()
            .map(|row| StoryCard::from_story(&row.story, &row.email))
            .collect())
    }

    async fn update_story(
        &self,
        owner: StoryOwner,
        story_id: &str,
        update: Document,
    ) -> CoreResult<UpdateOutcome> {
        let oid = parse_object_id(story_id)?;
        let result = self
            .parents(owner)
            .update_one(doc! { "stories._id": oid }, update)
            .await
            .map_err(store_err)?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }
}

#[derive(Deserialize)]
struct StoryParent {
    #[serde(default)]
    email: String,
    #[serde(default)]
    stories: Vec<Story>,
}

#[derive(Deserialize)]
struct UnwoundStory {
    #[serde(default)]
    email: String,
    story: Story,
}

#[derive(Deserialize)]
struct StoryTotal {
    total: u64,
}

fn story_document(id: ObjectId, story: &NewStory) -> Document {
    doc! {
        "_id": id,
        "email": story.email.as_str(),
        "title": story.title.as_str(),
        "storyText": story.story_text.as_str(),
        "images": story.images.clone(),
        "createdAt": bson_datetime(story.created_at),
    }
}

#[async_trait]
impl StoryRepository for MongoStoryRepository {
    async fn push_story(&self, owner: StoryOwner, story: NewStory) -> CoreResult<Option<Story>> {
        let id = ObjectId::new();
        let result = self
            .parents(owner)
            .update_one(
                doc! { "email": story.email.as_str() },
                doc! { "$push": { "stories": story_document(id, &story) } },
            )
            .await
            .map_err(store_err)?;
        if result.matched_count == 0 {
            return Ok(None);
        }
        debug!(?owner, story_id = %id, email = %Masked(&story.email), "Story added");
        Ok(Some(story.into_story(id.to_hex())))
    }

    async fn pull_story(&self, owner: StoryOwner, email: &str, story_id: &str) -> CoreResult<bool> {
        let oid = parse_object_id(story_id)?;
        let result = self
            .parents(owner)
            .update_one(
                doc! { "email": email },
                doc! { "$pull": { "stories": { "_id": oid } } },
            )
            .await
            .map_err(store_err)?;
        Ok(result.modified_count > 0)
    }

    async fn find_story(&self, owner: StoryOwner, story_id: &str) -> CoreResult<Option<Story>> {
        let oid = parse_object_id(story_id)?;
        let Some(parent) = self
            .parents(owner)
            .find_one(doc! { "stories._id": oid })
            .projection(doc! { "email": 1, "stories": 1 })
            .await
            .map_err(store_err)?
        else {
            return Ok(None);
        };
        let parent: StoryParent = decode(parent)?;
        let wanted = oid.to_hex();
        Ok(parent.stories.into_iter().find(|s| s.id == wanted))
    }

    async fn stories_of(&self, owner: StoryOwner, email: &str) -> CoreResult<Option<Vec<Story>>> {
        let parent = self
            .parents(owner)
            .find_one(doc! { "email": email })
            .projection(doc! { "email": 1, "stories": 1 })
            .await
            .map_err(store_err)?;
        match parent {
            Some(parent) => Ok(Some(decode::<StoryParent>(parent)?.stories)),
            None => Ok(None),
        }
    }

    async fn all_stories(&self, owner: StoryOwner) -> CoreResult<Vec<Story>> {
        let cursor = self
            .parents(owner)
            .find(doc! { "stories.0": { "$exists": true } })
            .projection(doc! { "email": 1, "stories": 1 })
            .await
            .map_err(store_err)?;
        let parents: Vec<StoryParent> = decode_all(cursor).await?;
        Ok(parents
            .into_iter()
            .flat_map(|parent| {
                let email = parent.email;
                parent.stories.into_iter().map(move |mut story| {
                    story.email = email.clone();
                    story
                })
            })
            .collect())
    }

    async fn sample_stories(&self, owner: StoryOwner, size: usize) -> CoreResult<Vec<StoryCard>> {
        let size = i64::try_from(size).unwrap_or(i64::MAX);
        self.card_pipeline(owner, doc! { "$sample": { "size": size } })
            .await
    }

    async fn recent_stories(&self, owner: StoryOwner) -> CoreResult<Vec<StoryCard>> {
        self.card_pipeline(owner, doc! { "$sort": { "stories.createdAt": -1 } })
            .await
    }

    async fn add_story_image(
        &self,
        owner: StoryOwner,
        story_id: &str,
        url: &str,
    ) -> CoreResult<UpdateOutcome> {
        self.update_story(owner, story_id, doc! { "$push": { "stories.$.images": url } })
            .await
    }

    async fn remove_story_image(
        &self,
        owner: StoryOwner,
        story_id: &str,
        url: &str,
    ) -> CoreResult<UpdateOutcome> {
        self.update_story(owner, story_id, doc! { "$pull": { "stories.$.images": url } })
            .await
    }

    async fn edit_story(
        &self,
        owner: StoryOwner,
        story_id: &str,
        edit: StoryEdit,
    ) -> CoreResult<UpdateOutcome> {
        let mut set = Document::new();
        if let Some(title) = edit.title {
            set.insert("stories.$.title", title);
        }
        if let Some(text) = edit.story_text {
            set.insert("stories.$.storyText", text);
        }
        self.update_story(owner, story_id, doc! { "$set": set }).await
    }

    async fn count_stories(&self, owner: StoryOwner) -> CoreResult<u64> {
        let pipeline = vec![
            doc! { "$project": { "n": { "$size": { "$ifNull": ["$stories", []] } } } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$n" } } },
        ];
        let cursor = self
            .parents(owner)
            .aggregate(pipeline)
            .await
            .map_err(store_err)?;
        let totals: Vec<StoryTotal> = decode_all(cursor).await?;
        Ok(totals.first().map(|t| t.total).unwrap_or(0))
    }
}
