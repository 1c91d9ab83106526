use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::{Quote, QuoteStatus};
use crate::repository::repository_error::{page_offset, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use tracing::{error, info};

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote>;
    async fn update(&self, id: ObjectId, quote: Quote) -> RepositoryResult<Quote>;
    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    /// Newest first, optionally restricted to one status.
    async fn list(&self, status: Option<QuoteStatus>, page: u32, limit: u32) -> RepositoryResult<Vec<Quote>>;
    /// Every quote with one of the given statuses, in insertion order.
    async fn list_by_statuses(&self, statuses: &[QuoteStatus]) -> RepositoryResult<Vec<Quote>>;
    /// Next value of the quote number sequence for `year`, starting at 1.
    /// Values are never handed out twice, even after deletes.
    async fn next_sequence(&self, year: i32) -> RepositoryResult<u64>;
}

pub struct MongoQuoteRepository {
    collection: mongodb::Collection<Quote>,
    counters: mongodb::Collection<Document>,
}

impl MongoQuoteRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = config.connect().await?;
        let collection = db.collection::<Quote>(&config.quote_collection);
        let counters = db.collection::<Document>(&config.counter_collection);

        let unique_number = IndexModel::builder()
            .keys(doc! { "quote_number": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(unique_number, None).await?;

        Ok(MongoQuoteRepository { collection, counters })
    }

    async fn find_many(&self, filter: Document, options: FindOptions) -> RepositoryResult<Vec<Quote>> {
        let cursor = self.collection.find(filter, options).await.map_err(|e| {
            error!("Failed to query quotes: {}", e);
            RepositoryError::database(format!("Failed to query quotes: {}", e))
        })?;
        cursor.try_collect().await.map_err(|e| {
            error!("Failed to deserialize quote: {}", e);
            RepositoryError::serialization(format!("Failed to deserialize quote: {}", e))
        })
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(quote_number = %quote.quote_number))]
    async fn create(&self, mut quote: Quote) -> RepositoryResult<Quote> {
        info!("Creating new quote");
        quote.id = Some(ObjectId::new());

        match self.collection.insert_one(&quote, None).await {
            Ok(_) => {
                info!("Quote created successfully");
                Ok(quote)
            }
            Err(e) => {
                error!("Failed to create quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => {
                error!("Quote not found for ID: {}", id);
                Err(RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to fetch quote by ID: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch quote by ID: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, quote), fields(id = %id))]
    async fn update(&self, id: ObjectId, mut quote: Quote) -> RepositoryResult<Quote> {
        info!("Updating quote");
        quote.id = Some(id);
        let mut document = bson::to_document(&quote)?;
        document.remove("_id");

        match self.collection.update_one(doc! { "_id": id }, doc! { "$set": document }, None).await {
            Ok(result) if result.matched_count > 0 => {
                info!("Quote updated successfully");
                Ok(quote)
            }
            Ok(_) => {
                error!("No quote found to update for ID: {}", id);
                Err(RepositoryError::not_found(format!("No quote found to update for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update quote: {}", e);
                Err(RepositoryError::database(format!("Failed to update quote: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(&self, id: ObjectId, status: QuoteStatus) -> RepositoryResult<Quote> {
        info!("Updating quote status");
        let update = doc! { "$set": {
            "status": bson::to_bson(&status)?,
            "updated_at": bson::to_bson(&chrono::Utc::now())?,
        } };

        match self.collection.update_one(doc! { "_id": id }, update, None).await {
            Ok(result) if result.matched_count > 0 => {
                info!("Quote status updated successfully");
                self.get_by_id(id).await
            }
            Ok(_) => {
                error!("No quote found to update status for ID: {}", id);
                Err(RepositoryError::not_found(format!("No quote found to update status for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to update quote status: {}", e);
                Err(RepositoryError::database(format!("Failed to update quote status: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting quote");
        match self.collection.delete_one(doc! { "_id": id }, None).await {
            Ok(result) if result.deleted_count > 0 => {
                info!("Quote deleted successfully");
                Ok(())
            }
            Ok(_) => {
                error!("No quote found to delete for ID: {}", id);
                Err(RepositoryError::not_found(format!("No quote found to delete for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to delete quote: {}", e);
                Err(RepositoryError::database(format!("Failed to delete quote: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, status: Option<QuoteStatus>, page: u32, limit: u32) -> RepositoryResult<Vec<Quote>> {
        let filter = match status {
            Some(status) => doc! { "status": bson::to_bson(&status)? },
            None => doc! {},
        };
        let options = FindOptions::builder()
            .sort(doc! { "_id": -1 })
            .skip(page_offset(page, limit))
            .limit(i64::from(limit))
            .build();
        let quotes = self.find_many(filter, options).await?;
        info!("Fetched {} quotes", quotes.len());
        Ok(quotes)
    }

    #[tracing::instrument(skip(self))]
    async fn list_by_statuses(&self, statuses: &[QuoteStatus]) -> RepositoryResult<Vec<Quote>> {
        let wanted = statuses
            .iter()
            .map(bson::to_bson)
            .collect::<Result<Vec<_>, _>>()?;
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let quotes = self.find_many(doc! { "status": { "$in": wanted } }, options).await?;
        info!("Fetched {} quotes", quotes.len());
        Ok(quotes)
    }

    #[tracing::instrument(skip(self))]
    async fn next_sequence(&self, year: i32) -> RepositoryResult<u64> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": format!("quote-{}", year) },
                doc! { "$inc": { "seq": 1_i64 } },
                options,
            )
            .await
            .map_err(|e| {
                error!("Failed to advance quote sequence: {}", e);
                RepositoryError::from(e)
            })?
            .ok_or_else(|| RepositoryError::database("Quote sequence upsert returned no document"))?;

        let seq = counter
            .get_i64("seq")
            .map_err(|e| RepositoryError::serialization(format!("Invalid quote sequence: {}", e)))?;
        u64::try_from(seq).map_err(|_| RepositoryError::serialization(format!("Negative quote sequence: {}", seq)))
    }
}
